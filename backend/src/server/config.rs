//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use backend::domain::cascade::CascadePolicy;
use backend::outbound::persistence::DbPool;
use backend::settings::BlobApiSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) blob_api: Option<BlobApiSettings>,
    pub(crate) cascade_policy: CascadePolicy,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            blob_api: None,
            cascade_policy: CascadePolicy::default(),
        }
    }

    /// Use PostgreSQL-backed repositories instead of in-memory ones.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Delete uploaded images through the blob API. Without it, deletions
    /// are only recorded in memory.
    #[must_use]
    pub fn with_blob_api(mut self, blob_api: Option<BlobApiSettings>) -> Self {
        self.blob_api = blob_api;
        self
    }

    #[must_use]
    pub fn with_cascade_policy(mut self, policy: CascadePolicy) -> Self {
        self.cascade_policy = policy;
        self
    }
}
