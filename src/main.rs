mod cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "manifolds")]
#[command(version)]
#[command(about = "Compute and store manifold statistics of activation models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute manifold statistics for every model in the catalogue
    Compute {
        /// Dataset of concepts for which to compute manifold statistics
        #[arg(long)]
        dataset: String,
        /// Data directory containing stimuli
        #[arg(long = "data_dir")]
        data_dir: Option<PathBuf>,
        /// Pooling applied prior to computing the manifold statistics
        #[arg(long, default_value = "avg")]
        pooling: String,
        /// Run only the additional models (AlexNet, VGG16, SqueezeNet)
        #[arg(long = "additional_models")]
        additional_models: bool,
        /// Run a single model to make sure there are no errors
        #[arg(long)]
        debug: bool,
    },
    /// Print the selected catalogue entries as JSON lines
    Catalog {
        /// Show only the additional models (AlexNet, VGG16, SqueezeNet)
        #[arg(long = "additional_models")]
        additional_models: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compute {
            dataset,
            data_dir,
            pooling,
            additional_models,
            debug,
        } => cmd::compute(dataset, data_dir, pooling, additional_models, debug),
        Commands::Catalog { additional_models } => cmd::catalog(additional_models),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
