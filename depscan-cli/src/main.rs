mod args;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing based on verbosity
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let addr: std::net::SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("invalid --listen address: {}", args.listen))?;

    let config = depscan_api::ApiConfig {
        listen_addr: addr,
        api_key: args.api_key,
        db_path: args.db,
    };

    eprintln!("depscan API server listening on http://{addr}");
    if config.api_key.is_some() {
        eprintln!("  Authentication: enabled (Bearer token required)");
    } else {
        eprintln!("  Authentication: disabled (use --api-key to enable)");
    }

    depscan_api::start_server(config).await
}
