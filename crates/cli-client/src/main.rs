#![warn(clippy::all, clippy::pedantic)]

use std::process::ExitCode;

use blobbit_cli::cli::Cli;
use blobbit_cli::logging;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();

    logging::init();

    let code = Box::pin(Cli::parse().run()).await?;

    Ok(code)
}
