use anyhow::Result;
use manifolds::api::Client;
use manifolds::catalog::{Catalog, Selection};
use manifolds::driver::{self, RunOptions};
use manifolds::envconfig;
use std::path::PathBuf;

pub fn compute(
    dataset: String,
    data_dir: Option<PathBuf>,
    pooling: String,
    additional: bool,
    debug: bool,
) -> Result<()> {
    let client = Client::from_env()?;
    let opts = RunOptions {
        dataset,
        data_dir,
        pooling,
        additional,
        debug,
        results_dir: envconfig::results_dir(),
    };

    driver::run(&opts, &client, &client)
}

/// Prints the selected catalogue entries as JSON lines. Metadata only; no
/// model is constructed.
pub fn catalog(additional: bool) -> Result<()> {
    let catalog = Catalog::select(Selection::from_flag(additional))?;
    for entry in catalog.entries() {
        println!("{}", serde_json::to_string(entry)?);
    }
    Ok(())
}
