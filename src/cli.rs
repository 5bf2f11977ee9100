use clap::Parser;

/// Terminal form for building construction cost estimates
#[derive(Parser, Debug)]
#[command(
    name = "estimate-ledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Pick process/product pairs, price them, and save the list as a project",
    long_about = None
)]
pub struct Cli {
    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long = "api-base-url")]
    pub api_base_url: Option<String>,

    /// Write logs to this file (overrides LOG_FILE)
    #[arg(long = "log-file")]
    pub log_file: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
