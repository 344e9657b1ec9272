//! Embedded PostgreSQL for Diesel adapter suites.
//!
//! One cluster is shared per test binary and every test gets a freshly
//! migrated database of its own. When the cluster cannot start, tests fail
//! unless `SKIP_TEST_CLUSTER` is truthy, in which case they are skipped.

use std::time::Duration;

use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;

const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A migrated temporary database, its pool and the runtime driving both.
pub struct MigratedDatabase {
    pub runtime: Runtime,
    pub pool: DbPool,
    _database: TemporaryDatabase,
}

impl MigratedDatabase {
    /// Run `future` to completion on the database runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= CLUSTER_RETRIES => return Err(format!("{error:?}")),
            Err(_) => {
                std::thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Create a temporary database on the shared cluster and apply migrations.
pub fn provision_database() -> Result<MigratedDatabase, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = cluster
        .temporary_database(format!("test_{}", uuid::Uuid::new_v4().simple()))
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = database.url().to_owned();

    let pool = runtime.block_on(async {
        run_pending_migrations(&url)
            .await
            .map_err(|err| err.to_string())?;
        DbPool::new(
            PoolConfig::new(url.as_str())
                .with_max_size(2)
                .with_min_idle(Some(1)),
        )
        .await
        .map_err(|err| err.to_string())
    })?;

    Ok(MigratedDatabase {
        runtime,
        pool,
        _database: database,
    })
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip (returning `None`) or fail loudly when the cluster is unavailable.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
