//! ror-reconcile CLI: suggest Wikidata relations for ROR.

use std::path::PathBuf;

use clap::Parser;
use miette::Result;

use ror_reconcile::config::ReconcileConfig;
use ror_reconcile::pipeline::Pipeline;
use ror_reconcile::registry::{DumpSource, RorDump};
use ror_reconcile::sparql::WikidataClient;

#[derive(Parser)]
#[command(
    name = "ror-reconcile",
    version,
    about = "Find Wikidata relations between ROR organizations that ROR itself lacks"
)]
struct Cli {
    /// TOML config file (default: ./reconcile.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for checkpoint tables.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Unpacked ROR data dump (JSON); downloaded here if missing
    /// (default: <data-dir>/ror-data.json).
    #[arg(long)]
    ror_dump: Option<PathBuf>,

    /// SPARQL endpoint URL.
    #[arg(long)]
    endpoint: Option<String>,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ReconcileConfig::discover(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.set_data_dir(data_dir);
    }
    if let Some(ror_dump) = cli.ror_dump {
        config.ror_dump = Some(ror_dump);
    }
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }

    let source = DumpSource::new(&config.ror_record, &config.user_agent, config.timeout());
    let registry = RorDump::open_or_fetch(&config.ror_dump_path(), &source)?;
    let client = WikidataClient::new(&config.endpoint, &config.user_agent, config.timeout());

    let pipeline = Pipeline::new(config.pipeline_config(), &client, &registry);
    let report = pipeline.run()?;

    println!("{}", report.preview(pipeline.config().preview_rows));
    Ok(())
}
