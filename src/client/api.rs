use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::{header, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    adapters::dto::{
        file_dto::CreateFileRequest,
        upload_dto::{PresignUploadRequest, PresignUploadResponse},
    },
    client::{error::UploadError, task::LocalFile},
    domain::models::stored_file::StoredFile,
};

/// Called with `(bytes_sent, bytes_total)` as the transfer advances.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

#[async_trait]
pub trait UploadApi: Send + Sync {
    async fn request_upload_url(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<PresignUploadResponse, UploadError>;

    /// PUTs the raw bytes straight to storage.
    async fn transfer(
        &self,
        presigned_url: &str,
        file: &LocalFile,
        on_progress: ProgressFn,
    ) -> Result<(), UploadError>;
}

#[async_trait]
pub trait FilesApi: Send + Sync {
    async fn list_files(&self) -> Result<Vec<StoredFile>, UploadError>;
    async fn persist_file(&self, request: &CreateFileRequest) -> Result<StoredFile, UploadError>;
    async fn delete_file(&self, key: &str) -> Result<(), UploadError>;
}

/// How the client proves its session to the application server.
#[derive(Debug, Clone)]
pub enum ClientAuth {
    Anonymous,
    Bearer(String),
    Cookie { name: String, value: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Both client ports over HTTP.
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    auth: ClientAuth,
    chunk_size: usize,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, auth: ClientAuth) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| UploadError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Granularity of progress reports during a transfer.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            ClientAuth::Anonymous => request,
            ClientAuth::Bearer(token) => request.bearer_auth(token),
            ClientAuth::Cookie { name, value } => {
                request.header(header::COOKIE, format!("{}={}", name, value))
            }
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, UploadError> {
        self.authorized(request)
            .send()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))
    }
}

/// Maps 401/403 to their own variants and any other failure through `wrap`.
async fn check_status(
    response: Response,
    wrap: fn(String) -> UploadError,
) -> Result<Response, UploadError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED => Err(UploadError::Unauthorized),
        StatusCode::FORBIDDEN => Err(UploadError::Forbidden),
        _ => {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => format!("{} ({})", body.error, status),
                Err(_) => status.to_string(),
            };
            Err(wrap(message))
        }
    }
}

fn split_chunks(bytes: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    (0..bytes.len())
        .step_by(chunk_size)
        .map(|start| bytes.slice(start..(start + chunk_size).min(bytes.len())))
        .collect()
}

#[async_trait]
impl UploadApi for HttpApi {
    async fn request_upload_url(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<PresignUploadResponse, UploadError> {
        let body = PresignUploadRequest {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
        };
        let response = self
            .send(self.client.post(self.url("/api/upload")).json(&body))
            .await?;
        check_status(response, UploadError::PresignFailed)
            .await?
            .json()
            .await
            .map_err(|e| UploadError::PresignFailed(e.to_string()))
    }

    async fn transfer(
        &self,
        presigned_url: &str,
        file: &LocalFile,
        on_progress: ProgressFn,
    ) -> Result<(), UploadError> {
        let total = file.size();
        let mut sent = 0u64;
        let chunks = split_chunks(&file.bytes, self.chunk_size);
        let stream = futures::stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            on_progress(sent, total);
            Ok::<Bytes, std::io::Error>(chunk)
        });

        // Presigned targets carry their own credentials; no session headers.
        let response = self
            .client
            .put(presigned_url)
            .header(header::CONTENT_TYPE, file.effective_content_type())
            .header(header::CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await
            .map_err(|e| {
                warn!("Transfer of {} failed: {}", file.name, e);
                UploadError::TransferFailed(format!("Network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::TransferFailed(format!(
                "storage responded {}",
                status
            )));
        }
        debug!("Transferred {} bytes for {}", total, file.name);
        Ok(())
    }
}

#[async_trait]
impl FilesApi for HttpApi {
    async fn list_files(&self) -> Result<Vec<StoredFile>, UploadError> {
        let response = self.send(self.client.get(self.url("/api/files"))).await?;
        check_status(response, UploadError::RequestFailed)
            .await?
            .json()
            .await
            .map_err(|e| UploadError::RequestFailed(e.to_string()))
    }

    async fn persist_file(&self, request: &CreateFileRequest) -> Result<StoredFile, UploadError> {
        let response = self
            .send(self.client.post(self.url("/api/files")).json(request))
            .await?;
        check_status(response, UploadError::PersistenceFailed)
            .await?
            .json()
            .await
            .map_err(|e| UploadError::PersistenceFailed(e.to_string()))
    }

    async fn delete_file(&self, key: &str) -> Result<(), UploadError> {
        let path = format!("/api/files/{}", key);
        let response = self.send(self.client.delete(self.url(&path))).await?;
        check_status(response, UploadError::RequestFailed).await?;
        Ok(())
    }
}
