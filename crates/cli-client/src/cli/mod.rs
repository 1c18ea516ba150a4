mod commands;
mod keys;
mod submit;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use keyring::{PassphraseProvider, PromptPassphrase};

use crate::config::{FileConfig, default_config_path};
use crate::error::Error;

pub use commands::{Command, CoreArgs, KeyringArgs, KeysCommand, SubmitArgs};
pub use submit::{EXIT_REMOTE_REJECTION, exit_status, submit};

#[derive(Debug, Parser)]
#[command(name = "blobbit")]
#[command(about = "A CLI for submitting blobs to a Celestia consensus node")]
pub struct Cli {
    #[arg(short, long, default_value_os_t = default_config_path(), env = "BLOBBIT_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn load_config(&self) -> Result<FileConfig, Error> {
        FileConfig::load_or_default(&self.config)
    }

    pub async fn run(&self) -> Result<ExitCode, Error> {
        let config = self.load_config()?;
        let passphrase: Arc<dyn PassphraseProvider> = Arc::new(PromptPassphrase);

        match &self.command {
            Command::Submit(args) => {
                let response = submit::run(args, &config, passphrase).await?;

                Ok(ExitCode::from(submit::report(&response)))
            }
            Command::Keys { command } => {
                keys::run(command, &config, passphrase)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Config => {
                println!("{config:#?}");
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
