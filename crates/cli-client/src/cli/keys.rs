use std::sync::Arc;

use keyring::{Keyring, PassphraseProvider};

use crate::cli::{KeyringArgs, KeysCommand};
use crate::config::{FileConfig, resolve_store};
use crate::error::Error;

pub(super) fn run(command: &KeysCommand, file: &FileConfig, passphrase: Arc<dyn PassphraseProvider>) -> Result<(), Error> {
    match command {
        KeysCommand::Add { name, keyring } => {
            let identity = open(keyring, file, passphrase)?.add(name)?;

            println!("Added key '{}'", identity.name());
            identity.signer().print_details();
        }
        KeysCommand::Import { name, secret, keyring } => {
            let secret = hex::decode(secret.trim())?;
            let identity = open(keyring, file, passphrase)?.import(name, &secret)?;

            println!("Imported key '{}'", identity.name());
            identity.signer().print_details();
        }
        KeysCommand::Show { name, keyring } => {
            let identity = open(keyring, file, passphrase)?.key(name)?;

            println!("Name: {}", identity.name());
            identity.signer().print_details();
        }
        KeysCommand::List { keyring } => {
            let keyring = open(keyring, file, passphrase)?;
            let keys = keyring.list()?;

            if keys.is_empty() {
                println!("No keys in {}", keyring.dir().display());
            }

            for key in keys {
                println!("{}\t{}", key.name, key.address);
            }
        }
    }

    Ok(())
}

fn open(args: &KeyringArgs, file: &FileConfig, passphrase: Arc<dyn PassphraseProvider>) -> Result<Keyring, Error> {
    let store = resolve_store(args, file)?;

    Ok(Keyring::open(&store.path, store.backend, passphrase)?)
}
