pub mod api;
pub mod catalog;
pub mod driver;
pub mod envconfig;
pub mod hub;
pub mod output;
pub mod stats;

pub use api::Client;
pub use catalog::{
    ActivationModel, Catalog, CatalogEntry, Family, Identity, ModelRequest, Preprocess, Selection,
};
pub use driver::{run, RunOptions};
pub use hub::{BuiltModel, Framework, ModelHub, ModelRef};
pub use output::{save_path, ResultTable};
pub use stats::{Dataset, ManifoldStatistics, Pooling, Sampling, StatisticsSuite, Table};

pub type Result<T> = anyhow::Result<T>;
