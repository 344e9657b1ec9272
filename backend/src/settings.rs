//! Runtime settings loaded via OrthoConfig.
//!
//! Every value can come from the command line, an `ADMIN_*` environment
//! variable or a configuration file. Accessors apply defaults and parse the
//! string-typed values so `main` only deals with ready-to-use types.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::cascade::CascadePolicy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_BLOB_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Settings that could not be turned into usable values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid blob API URL `{value}`: {source}")]
    BlobUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("blob API URL is set but ADMIN_BLOB_API_KEY is missing")]
    MissingBlobKey,
    #[error("{0}")]
    CascadePolicy(String),
}

/// Connection details for the blob deletion API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobApiSettings {
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Duration,
}

/// Configuration for the admin backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ADMIN")]
pub struct AdminSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. In-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Base URL of the blob storage API.
    pub blob_api_url: Option<String>,
    /// Secret sent with blob deletion requests.
    pub blob_api_key: Option<String>,
    /// Blob request timeout in seconds.
    pub blob_timeout_secs: Option<u64>,
    /// `best_effort` or `strict`.
    pub cascade_policy: Option<String>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Generate a throwaway session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`. Defaults to true.
    pub cookie_secure: Option<bool>,
}

impl AdminSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE).max(1)
    }

    /// Blob API settings, or `None` when no URL is configured.
    pub fn blob_api(&self) -> Result<Option<BlobApiSettings>, SettingsError> {
        let Some(raw) = self.blob_api_url.as_deref().filter(|v| !v.trim().is_empty()) else {
            return Ok(None);
        };
        let base_url = Url::parse(raw).map_err(|source| SettingsError::BlobUrl {
            value: raw.to_owned(),
            source,
        })?;
        let api_key = self
            .blob_api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingBlobKey)?;
        Ok(Some(BlobApiSettings {
            base_url,
            api_key,
            timeout: Duration::from_secs(
                self.blob_timeout_secs.unwrap_or(DEFAULT_BLOB_TIMEOUT_SECS),
            ),
        }))
    }

    pub fn cascade_policy(&self) -> Result<CascadePolicy, SettingsError> {
        self.cascade_policy
            .as_deref()
            .map_or(Ok(CascadePolicy::default()), str::parse)
            .map_err(SettingsError::CascadePolicy)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }
}
