use crate::catalog::{Catalog, Selection};
use crate::hub::ModelHub;
use crate::output::{save_path, ResultTable};
use crate::stats::{Dataset, Pooling, Sampling, StatisticsSuite};
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub dataset: String,
    pub data_dir: Option<PathBuf>,
    pub pooling: String,
    pub additional: bool,
    pub debug: bool,
    pub results_dir: PathBuf,
}

/// Computes and persists manifold statistics for every model the catalogue
/// yields. Re-running with the same arguments is a no-op once the output
/// file exists; deleting it is the only way to recompute.
pub fn run(opts: &RunOptions, hub: &dyn ModelHub, suite: &dyn StatisticsSuite) -> Result<()> {
    let started = Instant::now();

    // Configuration errors surface here, before any model is touched.
    let dataset: Dataset = opts.dataset.parse()?;
    let pooling: Pooling = opts.pooling.parse()?;

    let path = save_path(&opts.results_dir, dataset, pooling, opts.additional);
    if path.exists() {
        tracing::info!("results already exist: {}", path.display());
        return Ok(());
    }

    let catalog = Catalog::select(Selection::from_flag(opts.additional))?;
    tracing::info!(
        models = catalog.len(),
        dataset = %dataset,
        pooling = %pooling,
        "computing manifold statistics"
    );

    let bar = ProgressBar::new(catalog.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} {eta}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut results = ResultTable::new();
    for model in catalog.models(hub) {
        let model = model?;
        let layers = model.layers;
        bar.set_message(model.identity.id());

        let mut statistics = match dataset {
            Dataset::ImageNet => suite.imagenet(model, pooling)?,
            Dataset::ImageNet21k => {
                suite.imagenet21k(opts.data_dir.as_deref(), model, pooling, None)?
            }
            Dataset::ImageNet21kLarge => suite.imagenet21k(
                opts.data_dir.as_deref(),
                model,
                pooling,
                Some(Sampling::imagenet21k_large()),
            )?,
            Dataset::Object2Vec => suite.object2vec(opts.data_dir.as_deref(), model, pooling)?,
            Dataset::MajajHong2015 => suite.majajhong2015(model, pooling)?,
        };

        statistics.fit(layers)?;
        results.append(statistics.table())?;
        bar.inc(1);

        if opts.debug {
            break;
        }
    }
    bar.finish_and_clear();

    if opts.debug {
        tracing::info!("debug run complete, discarding results");
    } else {
        results.write_csv(&path)?;
        tracing::info!(rows = results.row_count(), "wrote {}", path.display());
    }

    tracing::info!(elapsed = ?started.elapsed(), "run finished");
    Ok(())
}
