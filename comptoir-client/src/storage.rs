//! Object storage operations
//!
//! Upload, delete and public-URL derivation against the hosted backend's
//! storage service. Uploads are two round trips: the session token fetch,
//! then the transfer itself.

use reqwest::StatusCode;
use tokio::sync::mpsc;

use crate::error::{ClientError, ClientResult};
use crate::gateway::ComptoirClient;

/// Bytes handed to the transport so far, against the full payload size.
///
/// Emitted once per body chunk on the channel passed to
/// [`ComptoirClient::upload_object_with_progress`]; the final value has
/// `sent == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Chunked request body that reports cumulative progress as the transport
/// pulls it. The receiver dropping only stops the reporting, never the
/// upload.
fn progress_body(bytes: Vec<u8>, progress: mpsc::UnboundedSender<UploadProgress>) -> reqwest::Body {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes.chunks(UPLOAD_CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let mut sent = 0u64;
    let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len() as u64;
        let _ = progress.send(UploadProgress { sent, total });
        Ok::<_, std::convert::Infallible>(chunk)
    }));
    reqwest::Body::wrap_stream(stream)
}

impl ComptoirClient {
    /// Upload an object and return its public URL. With `upsert` an
    /// existing object at the same path is overwritten instead of
    /// rejected.
    pub async fn upload_object(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> ClientResult<String> {
        self.upload_object_with_progress(path, bytes, content_type, upsert, None)
            .await
    }

    /// Same upload, reporting per-chunk progress on `progress` when a
    /// sender is given. Progress is bound to this call: the channel sees
    /// events only while the transfer runs and the sender is dropped with
    /// the request body.
    pub async fn upload_object_with_progress(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
        progress: Option<mpsc::UnboundedSender<UploadProgress>>,
    ) -> ClientResult<String> {
        let token = self.session_token().await?;
        let size = bytes.len();
        let body = match progress {
            Some(tx) => progress_body(bytes, tx),
            None => reqwest::Body::from(bytes),
        };

        let response = self
            .rest()
            .inner()
            .post(self.config().storage_url(path))
            .header("apikey", &self.config().api_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.storage_error(status, response.text().await?));
        }
        tracing::info!(%path, size, "object uploaded");
        Ok(self.config().public_url(path))
    }

    /// Delete one object by path.
    pub async fn delete_object(&self, path: &str) -> ClientResult<()> {
        let token = self.session_token().await?;
        let response = self
            .rest()
            .inner()
            .delete(self.config().storage_url(path))
            .header("apikey", &self.config().api_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.storage_error(status, response.text().await?));
        }
        Ok(())
    }

    /// Bucket-relative path of one of our public URLs; `None` for foreign
    /// or hand-entered URLs.
    pub fn storage_path_of(&self, public_url: &str) -> Option<String> {
        let prefix = self.config().public_url("");
        public_url
            .strip_prefix(prefix.as_str())
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }

    /// Storage failures carry actionable causes the operator can fix;
    /// match the known ones before falling back to the generic error.
    fn storage_error(&self, status: StatusCode, body: String) -> ClientError {
        if body.contains("Bucket not found") {
            return ClientError::BucketMissing(self.config().bucket.clone());
        }
        if status == StatusCode::FORBIDDEN
            || status == StatusCode::INTERNAL_SERVER_ERROR
            || body.contains("policy")
        {
            return ClientError::StoragePermission;
        }
        if status == StatusCode::UNAUTHORIZED {
            return ClientError::Unauthorized;
        }
        ClientError::InvalidResponse(format!("storage {status}: {body}"))
    }
}
