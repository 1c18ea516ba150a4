use std::sync::Arc;

use blob::{Blob, ShareVersion};
use keyring::{Keyring, PassphraseProvider};
use node_client::{ClientConfig, HttpTransport, NodeTransport, TxClient, TxResponse};
use signer::TxOptions;

use crate::cli::SubmitArgs;
use crate::config::{Config, FileConfig};
use crate::error::Error;

/// Process exit status when the node answered with a non-zero code.
pub const EXIT_REMOTE_REJECTION: u8 = 2;

pub(super) async fn run(
    args: &SubmitArgs,
    file: &FileConfig,
    passphrase: Arc<dyn PassphraseProvider>,
) -> Result<TxResponse, Error> {
    let config = Config::resolve(args, file)?;

    tracing::info!(
        rpc = %config.core.rpc_addr(),
        grpc = %config.core.grpc_addr(),
        "Connecting to core node"
    );

    let transport: Arc<dyn NodeTransport> = Arc::new(HttpTransport::for_host(&config.core.ip, &config.core.rpc_port));

    submit(&config, transport, passphrase).await
}

/// Load the signing key, build the blob, and submit it through `transport`.
pub async fn submit(
    config: &Config,
    transport: Arc<dyn NodeTransport>,
    passphrase: Arc<dyn PassphraseProvider>,
) -> Result<TxResponse, Error> {
    let keyring = Keyring::open(&config.store.path, config.store.backend, passphrase)?;
    let identity = keyring.key(&config.key_name)?;

    tracing::info!(key = identity.name(), address = %identity.address(), "Loaded signing key");

    let blob = Blob::new(config.namespace, config.data.clone(), ShareVersion::Zero)?;

    let client_config = ClientConfig::new()
        .with_confirm_timeout(config.timeout)
        .with_poll_interval(config.poll_interval);

    let mut client = TxClient::setup(transport, identity.into_signer(), client_config).await?;

    let options = TxOptions::new()
        .with_gas_price(config.gas_price)
        .with_memo(config.memo.as_str());
    let response = client.submit_pay_for_blob(&[blob], options).await?;

    Ok(response)
}

#[must_use]
pub const fn exit_status(response: &TxResponse) -> u8 {
    if response.is_success() { 0 } else { EXIT_REMOTE_REJECTION }
}

pub(super) fn report(response: &TxResponse) -> u8 {
    if !response.is_success() {
        println!(
            "Submission failed with code {} in codespace '{}': {}",
            response.code, response.codespace, response.raw_log
        );
    }

    println!("Response: {response:#?}");

    exit_status(response)
}
