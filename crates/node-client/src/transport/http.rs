//! JSON-RPC 2.0 over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use signer::Address;
use tracing::instrument;

use super::NodeTransport;
use crate::error::TransportError;
use crate::types::{AccountInfo, BroadcastResponse, TxResponse};

/// Node transport speaking JSON-RPC 2.0 over HTTP POST.
///
/// Requests run on tokio's blocking pool. A request abandoned by a caller's
/// timeout keeps running until `request_timeout` elapses, and runtime shutdown
/// waits for it, so keep `request_timeout` short relative to the caller's deadline.
#[derive(Debug)]
pub struct HttpTransport {
    url: String,
    request_timeout: Duration,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            next_id: AtomicU64::new(1),
        }
    }

    /// Transport for `http://{host}:{port}`.
    #[must_use]
    pub fn for_host(host: &str, port: &str) -> Self {
        Self::new(format!("http://{host}:{port}"))
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self, params), level = "debug", err(level = "debug"))]
    async fn call<R>(&self, method: &'static str, params: serde_json::Value) -> Result<R, TransportError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });
        let url = self.url.clone();
        let timeout = self.request_timeout.as_secs().max(1);

        let body = tokio::task::spawn_blocking(move || -> Result<String, TransportError> {
            let response = minreq::post(&url)
                .with_timeout(timeout)
                .with_json(&payload)
                .map_err(|e| TransportError::Request(e.to_string()))?
                .send()
                .map_err(|e| TransportError::Request(e.to_string()))?;

            if response.status_code != 200 {
                return Err(TransportError::Http {
                    status: response.status_code,
                    reason: response.reason_phrase.clone(),
                });
            }

            response
                .as_str()
                .map(str::to_owned)
                .map_err(|e| TransportError::Decode(e.to_string()))
        })
        .await
        .map_err(|e| TransportError::Request(e.to_string()))??;

        let parsed: JsonRpcResponse<R> =
            serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(TransportError::Rpc {
                code: error.code,
                message: match error.data {
                    Some(data) if !data.is_empty() => format!("{}: {data}", error.message),
                    _ => error.message,
                },
            });
        }

        parsed.result.ok_or(TransportError::EmptyResponse)
    }
}

#[async_trait]
impl NodeTransport for HttpTransport {
    #[instrument(skip(self), level = "debug", err)]
    async fn query_account(&self, address: &Address) -> Result<AccountInfo, TransportError> {
        let status: StatusResult = self.call("status", serde_json::json!({})).await?;
        let account: AccountResult = self
            .call("account", serde_json::json!({ "address": address.to_string() }))
            .await?;

        Ok(AccountInfo {
            account_number: account.account_number,
            sequence: account.sequence,
            chain_id: status.node_info.network,
        })
    }

    #[instrument(skip_all, level = "debug", err)]
    async fn broadcast_tx(&self, tx_bytes: &[u8]) -> Result<BroadcastResponse, TransportError> {
        let result: BroadcastResult = self
            .call(
                "broadcast_tx_sync",
                serde_json::json!({ "tx": BASE64_STANDARD.encode(tx_bytes) }),
            )
            .await?;

        Ok(BroadcastResponse {
            tx_hash: result.hash,
            code: result.code,
            codespace: result.codespace,
            raw_log: result.log,
        })
    }

    #[instrument(skip(self), level = "debug", err)]
    async fn get_tx(&self, tx_hash: &str) -> Result<Option<TxResponse>, TransportError> {
        let result: Result<TxResult, _> = self.call("tx", serde_json::json!({ "hash": tx_hash })).await;

        match result {
            Ok(tx) => Ok(Some(TxResponse {
                height: tx.height,
                tx_hash: tx.hash,
                code: tx.tx_result.code,
                codespace: tx.tx_result.codespace,
                raw_log: tx.tx_result.log,
                gas_wanted: tx.tx_result.gas_wanted,
                gas_used: tx.tx_result.gas_used,
            })),
            Err(TransportError::Rpc { message, .. }) if message.contains("not found") => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<R> {
    result: Option<R>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResult {
    node_info: NodeInfo,
}

#[derive(Debug, Deserialize)]
struct NodeInfo {
    network: String,
}

#[derive(Debug, Deserialize)]
struct AccountResult {
    #[serde(deserialize_with = "de_u64")]
    account_number: u64,
    #[serde(deserialize_with = "de_u64")]
    sequence: u64,
}

#[derive(Debug, Deserialize)]
struct BroadcastResult {
    hash: String,
    #[serde(default)]
    code: u32,
    #[serde(default)]
    codespace: String,
    #[serde(default)]
    log: String,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    hash: String,
    #[serde(deserialize_with = "de_u64")]
    height: u64,
    tx_result: ExecResult,
}

#[derive(Debug, Deserialize)]
struct ExecResult {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    codespace: String,
    #[serde(default)]
    log: String,
    #[serde(default, deserialize_with = "de_u64")]
    gas_wanted: u64,
    #[serde(default, deserialize_with = "de_u64")]
    gas_used: u64,
}

/// Nodes encode 64-bit integers as decimal strings; accept both forms.
fn de_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
