//! pdftools binary
//!
//! Logs go to stderr so stdout carries only the result.

use clap::Parser;
use pdftools_cli::{execute, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("pdftools v{}", env!("CARGO_PKG_VERSION"));

    let printed = execute(&cli, chrono::Utc::now().timestamp_millis())?;
    println!("{}", printed);
    Ok(())
}
