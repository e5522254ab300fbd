use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(name = "tempo-balance", about = "Print your Tempo overtime balance")]
pub struct Args {
    /// Config file. Defaults to ./config.toml, then the per-user config directory
    #[arg(long, env = "TEMPO_BALANCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit JSON instead of the plain balance
    #[arg(long)]
    pub json: bool,

    /// Number of periods to fetch (overrides numberOfPeriods from the config)
    #[arg(long)]
    pub periods: Option<u32>,

    /// Debug mode: log request statuses and decoded counts
    #[arg(long, env = "TEMPO_BALANCE_DEBUG")]
    pub debug: bool,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }
}
