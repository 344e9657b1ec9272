//! Blob storage stand-in that records deletions instead of calling out.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use crate::domain::BlobKey;
use crate::domain::ports::{BlobStorage, BlobStorageError};

#[derive(Debug, Default)]
struct State {
    calls: Vec<Vec<BlobKey>>,
    failures: VecDeque<BlobStorageError>,
}

#[derive(Debug, Default)]
pub struct RecordingBlobStorage {
    state: Mutex<State>,
}

impl RecordingBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call with `error`. Queued failures are used in order.
    pub fn fail_next(&self, error: BlobStorageError) {
        super::lock(&self.state).failures.push_back(error);
    }

    /// Keys passed to each successful call, in call order.
    pub fn calls(&self) -> Vec<Vec<BlobKey>> {
        super::lock(&self.state).calls.clone()
    }
}

#[async_trait]
impl BlobStorage for RecordingBlobStorage {
    async fn delete_files(&self, keys: &[BlobKey]) -> Result<(), BlobStorageError> {
        let mut state = super::lock(&self.state);
        if let Some(error) = state.failures.pop_front() {
            return Err(error);
        }
        info!(count = keys.len(), "blob deletion recorded");
        state.calls.push(keys.to_vec());
        Ok(())
    }
}
