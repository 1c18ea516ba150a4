use clap::{Args, Subcommand};
use keyring::Backend;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a blob to the Celestia blockchain
    Submit(SubmitArgs),

    /// Manage signing keys in the node store
    Keys {
        #[command(subcommand)]
        command: KeysCommand,
    },

    /// Show current configuration
    Config,
}

#[derive(Debug, Args)]
pub struct KeyringArgs {
    /// The path to root/home directory of your Celestia Node Store
    #[arg(long = "node.store", env = "BLOBBIT_NODE_STORE", default_value = "")]
    pub store: String,

    /// Keyring backend: `test` (plaintext) or `file` (passphrase protected)
    #[arg(long, env = "BLOBBIT_KEYRING_BACKEND", value_parser = parse_backend)]
    pub keyring_backend: Option<Backend>,
}

#[derive(Debug, Args)]
pub struct CoreArgs {
    /// Indicates node to connect to the given core node.
    /// Example: <ip>, 127.0.0.1. <dns>, subdomain.domain.tld
    /// Assumes RPC port 26657 and gRPC port 9090 as default unless otherwise specified.
    #[arg(long = "core.ip", default_value = "")]
    pub ip: String,

    /// Set a custom RPC port for the core node connection. The --core.ip flag must also be provided. [default: 26657]
    #[arg(long = "core.rpc.port")]
    pub rpc_port: Option<String>,

    /// Set a custom gRPC port for the core node connection. The --core.ip flag must also be provided. [default: 9090]
    /// Validated and logged only: submissions go over JSON-RPC on the RPC port.
    #[arg(long = "core.grpc.port")]
    pub grpc_port: Option<String>,
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub keyring: KeyringArgs,

    #[command(flatten)]
    pub core: CoreArgs,

    /// The namespace of the blob to submit
    #[arg(long = "blob.namespace", default_value = "1234567890")]
    pub blob_namespace: String,

    /// The blob data to submit
    #[arg(long = "blob.data", default_value = "some data")]
    pub blob_data: String,

    /// Name of the signing key in the keyring [default: my_celes_key]
    #[arg(long, env = "BLOBBIT_KEY")]
    pub key: Option<String>,

    /// Note attached to the transaction
    #[arg(long, default_value = "")]
    pub memo: String,

    /// Fee per unit of gas in utia [default: 0.1]
    #[arg(long)]
    pub gas_price: Option<f64>,

    /// How long to wait for the transaction to commit, e.g. `90s` [default: 60s]
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,
}

#[derive(Debug, Subcommand)]
pub enum KeysCommand {
    /// Generate a new key
    Add {
        name: String,

        #[command(flatten)]
        keyring: KeyringArgs,
    },

    /// Store an existing secp256k1 secret key
    Import {
        name: String,

        /// Secret key (32 bytes hex)
        #[arg(long, env = "BLOBBIT_IMPORT_SECRET", hide_env_values = true)]
        secret: String,

        #[command(flatten)]
        keyring: KeyringArgs,
    },

    /// Show a key's public details
    Show {
        name: String,

        #[command(flatten)]
        keyring: KeyringArgs,
    },

    /// List stored keys
    List {
        #[command(flatten)]
        keyring: KeyringArgs,
    },
}

fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse().map_err(|e: keyring::KeyringError| e.to_string())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use crate::cli::Cli;

    #[test]
    fn test_grpc_port_help_mentions_rpc_transport() {
        let mut cli = Cli::command();
        let submit = cli.find_subcommand_mut("submit").unwrap();
        let grpc = submit
            .get_arguments()
            .find(|arg| arg.get_long() == Some("core.grpc.port"))
            .unwrap();

        let help = grpc.get_long_help().or(grpc.get_help()).unwrap().to_string();
        assert!(help.contains("JSON-RPC on the RPC port"));
    }
}
