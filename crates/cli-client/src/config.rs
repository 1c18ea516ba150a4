use std::path::{Path, PathBuf};
use std::time::Duration;

use blob::{BlobError, Namespace};
use keyring::Backend;
use serde::{Deserialize, Serialize};

use crate::cli::{CoreArgs, KeyringArgs, SubmitArgs};
use crate::error::Error;

const DEFAULT_CONFIG_PATH: &str = "blobbit.toml";
const DEFAULT_KEY_NAME: &str = "my_celes_key";
const DEFAULT_GAS_PRICE: f64 = 0.1;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;

pub const DEFAULT_RPC_PORT: &str = "26657";
pub const DEFAULT_GRPC_PORT: &str = "9090";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("must specify a node store path")]
    MissingStorePath,

    #[error("cannot specify RPC/gRPC ports without specifying an IP address for --core.ip")]
    PortWithoutIp,

    #[error("a core node is required: pass --core.ip")]
    MissingCoreIp,

    #[error("invalid blob namespace: {0}")]
    Namespace(#[from] BlobError),

    #[error("gas price must be a finite non-negative number, got {0}")]
    InvalidGasPrice(f64),

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Settings read from the optional TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub keyring: KeyringConfig,
    #[serde(default)]
    pub submit: SubmitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyringConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_key_name")]
    pub key_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitConfig {
    /// Fee per unit of gas, in utia.
    #[serde(default = "default_gas_price")]
    pub gas_price: f64,
    /// Deadline for broadcast plus confirmation.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl FileConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, Error> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

impl Default for KeyringConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            key_name: default_key_name(),
        }
    }
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            gas_price: default_gas_price(),
            timeout_secs: default_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

/// Connection details of the core node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub ip: String,
    pub rpc_port: String,
    pub grpc_port: String,
}

impl CoreConfig {
    #[must_use]
    pub fn rpc_addr(&self) -> String {
        format!("{}:{}", self.ip, self.rpc_port)
    }

    #[must_use]
    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.ip, self.grpc_port)
    }
}

/// Where the keyring lives and which backend reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub backend: Backend,
}

/// Fully resolved configuration of one `submit` invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub core: CoreConfig,
    pub key_name: String,
    pub namespace: Namespace,
    pub data: Vec<u8>,
    pub memo: String,
    pub gas_price: f64,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Config {
    /// Merge flags over the file configuration. Explicit flags win.
    pub fn resolve(args: &SubmitArgs, file: &FileConfig) -> Result<Self, ConfigError> {
        let store = resolve_store(&args.keyring, file)?;
        let core = resolve_core(&args.core)?.ok_or(ConfigError::MissingCoreIp)?;

        let namespace = Namespace::new_v0(args.blob_namespace.as_bytes())?;

        let gas_price = args.gas_price.unwrap_or(file.submit.gas_price);
        if !gas_price.is_finite() || gas_price < 0.0 {
            return Err(ConfigError::InvalidGasPrice(gas_price));
        }

        let timeout = args
            .timeout
            .map_or(Duration::from_secs(file.submit.timeout_secs), Into::into);
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            store,
            core,
            key_name: args.key.clone().unwrap_or_else(|| file.keyring.key_name.clone()),
            namespace,
            data: args.blob_data.as_bytes().to_vec(),
            memo: args.memo.clone(),
            gas_price,
            timeout,
            poll_interval: Duration::from_millis(file.submit.poll_interval_ms.max(1)),
        })
    }
}

pub fn resolve_store(args: &KeyringArgs, file: &FileConfig) -> Result<StoreConfig, ConfigError> {
    if args.store.is_empty() {
        return Err(ConfigError::MissingStorePath);
    }

    Ok(StoreConfig {
        path: PathBuf::from(&args.store),
        backend: args.keyring_backend.unwrap_or(file.keyring.backend),
    })
}

/// `None` when no core ip is given; ports are only accepted together with an ip.
pub fn resolve_core(args: &CoreArgs) -> Result<Option<CoreConfig>, ConfigError> {
    if args.ip.is_empty() {
        if args.rpc_port.is_some() || args.grpc_port.is_some() {
            return Err(ConfigError::PortWithoutIp);
        }
        return Ok(None);
    }

    Ok(Some(CoreConfig {
        ip: args.ip.clone(),
        rpc_port: args.rpc_port.clone().unwrap_or_else(|| DEFAULT_RPC_PORT.to_string()),
        grpc_port: args.grpc_port.clone().unwrap_or_else(|| DEFAULT_GRPC_PORT.to_string()),
    }))
}

fn default_key_name() -> String {
    DEFAULT_KEY_NAME.to_string()
}

const fn default_gas_price() -> f64 {
    DEFAULT_GAS_PRICE
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

#[must_use]
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}
