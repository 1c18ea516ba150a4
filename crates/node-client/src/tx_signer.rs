use blob::Blob;
use signer::{Address, BlobTx, Fee, MsgPayForBlobs, SignDoc, SignedTx, Signer, SignerError, TxOptions};
use tracing::instrument;

use crate::error::ClientError;
use crate::transport::NodeTransport;
use crate::types::AccountInfo;

/// Signs transactions for one account, tracking its sequence locally.
#[derive(Debug, Clone)]
pub struct TxSigner {
    signer: Signer,
    address: Address,
    chain_id: String,
    account_number: u64,
    sequence: u64,
}

impl TxSigner {
    /// Query the node for the account's number, sequence, and chain id.
    ///
    /// Read-only on the node side, so it can be retried freely.
    #[instrument(skip_all, fields(address = %signer.address()), level = "debug", err)]
    pub async fn setup(transport: &dyn NodeTransport, signer: Signer) -> Result<Self, ClientError> {
        let address = signer.address();

        let account = transport
            .query_account(&address)
            .await
            .map_err(|source| ClientError::SignerSetup {
                address: address.to_string(),
                source,
            })?;

        tracing::debug!(
            chain_id = %account.chain_id,
            account_number = account.account_number,
            sequence = account.sequence,
            "Signer set up"
        );

        Ok(Self::new(signer, account))
    }

    #[must_use]
    pub fn new(signer: Signer, account: AccountInfo) -> Self {
        Self {
            address: signer.address(),
            signer,
            chain_id: account.chain_id,
            account_number: account.account_number,
            sequence: account.sequence,
        }
    }

    #[must_use]
    pub const fn address(&self) -> &Address {
        &self.address
    }

    #[must_use]
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    #[must_use]
    pub const fn account_number(&self) -> u64 {
        self.account_number
    }

    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Advance the local sequence once the node has accepted a transaction.
    pub const fn increment_sequence(&mut self) {
        self.sequence += 1;
    }

    /// Build and sign a pay-for-blob transaction at the current sequence.
    ///
    /// Returns the encoded bytes and their hash.
    pub fn sign_pay_for_blobs(
        &self,
        blobs: &[Blob],
        gas_limit: u64,
        options: &TxOptions,
    ) -> Result<(Vec<u8>, String), SignerError> {
        let doc = SignDoc {
            chain_id: self.chain_id.clone(),
            account_number: self.account_number,
            sequence: self.sequence,
            fee: Fee::from_gas_price(gas_limit, options.gas_price()),
            memo: options.memo().to_string(),
            msg: MsgPayForBlobs::new(self.address, blobs)?,
        };

        let tx = BlobTx {
            tx: SignedTx::sign(doc, &self.signer)?,
            blobs: blobs.to_vec(),
        };

        let bytes = tx.to_bytes()?;
        let hash = BlobTx::hash(&bytes);

        Ok((bytes, hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use blob::{Namespace, ShareVersion};

    use crate::error::TransportError;
    use crate::types::{BroadcastResponse, TxResponse};

    struct AccountTransport(Result<AccountInfo, TransportError>);

    #[async_trait]
    impl NodeTransport for AccountTransport {
        async fn query_account(&self, _address: &Address) -> Result<AccountInfo, TransportError> {
            self.0.clone()
        }

        async fn broadcast_tx(&self, _tx_bytes: &[u8]) -> Result<BroadcastResponse, TransportError> {
            unreachable!("setup never broadcasts")
        }

        async fn get_tx(&self, _tx_hash: &str) -> Result<Option<TxResponse>, TransportError> {
            unreachable!("setup never queries transactions")
        }
    }

    fn account() -> AccountInfo {
        AccountInfo {
            account_number: 42,
            sequence: 7,
            chain_id: "private".to_string(),
        }
    }

    #[tokio::test]
    async fn test_setup_reads_account() {
        let transport = AccountTransport(Ok(account()));
        let signer = Signer::generate();
        let address = signer.address();

        let tx_signer = TxSigner::setup(&transport, signer).await.unwrap();

        assert_eq!(tx_signer.address(), &address);
        assert_eq!(tx_signer.chain_id(), "private");
        assert_eq!(tx_signer.account_number(), 42);
        assert_eq!(tx_signer.sequence(), 7);
    }

    #[tokio::test]
    async fn test_setup_fails_when_account_query_fails() {
        let transport = AccountTransport(Err(TransportError::Rpc {
            code: -32603,
            message: "account not found".to_string(),
        }));

        let result = TxSigner::setup(&transport, Signer::generate()).await;

        assert!(matches!(result, Err(ClientError::SignerSetup { .. })));
    }

    #[test]
    fn test_sign_uses_current_sequence() {
        let mut tx_signer = TxSigner::new(Signer::generate(), account());
        let blob = Blob::new(Namespace::new_v0(b"1234567890").unwrap(), "some data", ShareVersion::Zero).unwrap();

        let (first, first_hash) = tx_signer.sign_pay_for_blobs(&[blob.clone()], 80_000, &TxOptions::new()).unwrap();
        let (again, again_hash) = tx_signer.sign_pay_for_blobs(&[blob.clone()], 80_000, &TxOptions::new()).unwrap();

        assert_eq!(first, again);
        assert_eq!(first_hash, again_hash);

        tx_signer.increment_sequence();
        assert_eq!(tx_signer.sequence(), 8);

        let (_, next_hash) = tx_signer.sign_pay_for_blobs(&[blob], 80_000, &TxOptions::new()).unwrap();
        assert_ne!(first_hash, next_hash);
    }

    #[test]
    fn test_sign_carries_memo() {
        let tx_signer = TxSigner::new(Signer::generate(), account());
        let blob = Blob::new(Namespace::new_v0(b"1234567890").unwrap(), "some data", ShareVersion::Zero).unwrap();

        let (bytes, _) = tx_signer
            .sign_pay_for_blobs(&[blob], 80_000, &TxOptions::new().with_memo("hello"))
            .unwrap();
        let (tx, _): (BlobTx, usize) = bincode::serde::decode_from_slice(&bytes, bincode::config::standard()).unwrap();

        assert_eq!(tx.tx.doc.memo, "hello");
        assert_eq!(tx.tx.doc.sequence, 7);
        assert_eq!(tx.tx.doc.chain_id, "private");
    }
}
