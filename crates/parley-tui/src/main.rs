//! Parley terminal client entry point.

use std::{fs::File, sync::Mutex};

use clap::Parser;
use parley_core::SystemEnv;
use parley_tui::{Args, Runtime, TerminalDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The terminal owns stdout, so logs go to a file.
    let log_file = File::create(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    tracing::info!(server = %args.server, user = %args.username, "parley starting");

    let endpoint = args.endpoint()?;
    let driver =
        TerminalDriver::new(&args.server, args.session_cookie.clone(), args.connect_timeout())?;
    let mut runtime = Runtime::with_config(driver, SystemEnv, endpoint, args.session_config());

    runtime.run().await?;
    tracing::info!("parley stopped");
    Ok(())
}
