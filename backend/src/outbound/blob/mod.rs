//! Reqwest-backed blob storage adapter.
//!
//! Deletes uploaded profile images through the file host's batch delete
//! endpoint. The adapter owns transport details only: request shape, timeout
//! and HTTP status mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use crate::domain::BlobKey;
use crate::domain::ports::{BlobStorage, BlobStorageError};

const DELETE_FILES_PATH: &str = "v6/deleteFiles";
const API_KEY_HEADER: &str = "x-uploadthing-api-key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteFilesRequest<'a> {
    file_keys: Vec<&'a str>,
}

/// Blob storage adapter that posts batch deletions to one API endpoint.
pub struct HttpBlobStorage {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl HttpBlobStorage {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` cannot be joined with the delete path
    /// or the reqwest client cannot be constructed.
    pub fn new(
        base_url: &Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HttpBlobStorageBuildError> {
        let endpoint = delete_endpoint(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }
}

/// Errors raised while constructing [`HttpBlobStorage`].
#[derive(Debug, thiserror::Error)]
pub enum HttpBlobStorageBuildError {
    #[error("invalid blob API URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

fn delete_endpoint(base_url: &Url) -> Result<Url, url::ParseError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(DELETE_FILES_PATH)
}

#[async_trait]
impl BlobStorage for HttpBlobStorage {
    async fn delete_files(&self, keys: &[BlobKey]) -> Result<(), BlobStorageError> {
        if keys.is_empty() {
            return Ok(());
        }
        let body = DeleteFilesRequest {
            file_keys: keys.iter().map(BlobKey::as_str).collect(),
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(count = keys.len(), "blob files deleted");
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> BlobStorageError {
    if error.is_timeout() {
        BlobStorageError::timeout(error.to_string())
    } else {
        BlobStorageError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> BlobStorageError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            BlobStorageError::timeout(format!("status {}", status.as_u16()))
        }
        _ => BlobStorageError::rejected(status.as_u16(), body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://api.uploadthing.com", "https://api.uploadthing.com/v6/deleteFiles")]
    #[case("https://files.example/api/", "https://files.example/api/v6/deleteFiles")]
    #[case("https://files.example/api", "https://files.example/api/v6/deleteFiles")]
    fn endpoint_appends_delete_path(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("valid base");
        assert_eq!(delete_endpoint(&base).expect("joins").as_str(), expected);
    }

    #[rstest]
    fn request_body_uses_file_keys() {
        let keys = [BlobKey::new("img123"), BlobKey::new("img456")];
        let body = DeleteFilesRequest {
            file_keys: keys.iter().map(BlobKey::as_str).collect(),
        };

        let json = serde_json::to_value(&body).expect("serialises");

        assert_eq!(json, serde_json::json!({"fileKeys": ["img123", "img456"]}));
    }

    #[rstest]
    #[case::gateway(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, false)]
    #[case::server(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn statuses_map_to_timeout_or_rejection(#[case] status: StatusCode, #[case] timeout: bool) {
        let error = map_status_error(status, b"{\"error\": \"nope\"}");

        if timeout {
            assert!(matches!(error, BlobStorageError::Timeout { .. }));
        } else {
            assert!(
                matches!(error, BlobStorageError::Rejected { status: code, .. } if code == status.as_u16())
            );
        }
    }

    #[rstest]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }
}
