use anyhow::{Context, Result};
use tracing::debug;

use tempo_balance::cli::Args;
use tempo_balance::config;
use tempo_balance::display::{print_json_output, print_text_output};
use tempo_balance::logging;
use tempo_balance::workflow;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.debug);

    let path = config::resolve_path(args.config.as_deref());
    let mut config = config::load(&path)
        .with_context(|| format!("load config from {}", path.display()))?;
    if let Some(periods) = args.periods {
        config = config.with_periods(periods);
    }
    debug!(?config, "loaded config");

    let report = workflow::run(&config).context("compute tempo balance")?;

    if args.json {
        print_json_output(&report)?;
    } else {
        print_text_output(&report);
    }
    Ok(())
}
