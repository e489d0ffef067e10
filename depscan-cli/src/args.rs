use std::path::PathBuf;

use clap::Parser;

/// Command line arguments for the depscan service.
#[derive(Parser, Debug)]
#[command(name = "depscan", version, about = "REST service recording dependency vulnerability scans")]
pub struct Args {
    /// Address to bind the API server to
    #[arg(long = "listen", value_name = "ADDR:PORT", default_value = "127.0.0.1:8320")]
    pub listen: String,

    /// API key for bearer-token authentication (disabled if omitted)
    #[arg(long = "api-key", value_name = "TOKEN")]
    pub api_key: Option<String>,

    /// Database file path (default: per-user data directory)
    #[arg(long = "db", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Increase verbosity level (use -v or -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}
