use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    error::{DisplayErrorContext, SdkError},
    presigning::PresigningConfig,
    Client,
};
use tracing::{info, warn};

use crate::{
    application::{error::ApplicationError, services::StorageService},
    domain::config::storage::StorageConfig,
    services::error::StorageError,
};

/// S3-compatible object store (AWS S3, Cloudflare R2, MinIO).
pub struct S3StorageService {
    client: Client,
    bucket_name: String,
}

impl S3StorageService {
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "filebox-static",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(config.force_path_style);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket_name: config.bucket_name.clone(),
        }
    }

    fn presigning_config(ttl: Duration) -> Result<PresigningConfig, StorageError> {
        PresigningConfig::expires_in(ttl)
            .map_err(|e| StorageError::InvalidConfiguration(e.to_string()))
    }
}

fn classify<E, R>(key: &str, error: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&error).to_string();
    match error {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            StorageError::NetworkError(message)
        }
        SdkError::ConstructionFailure(_) => StorageError::InvalidConfiguration(message),
        SdkError::ServiceError(_) if message.contains("NoSuchKey") => {
            StorageError::NotFound(key.to_string())
        }
        SdkError::ServiceError(_)
            if message.contains("AccessDenied") || message.contains("SignatureDoesNotMatch") =>
        {
            StorageError::Unauthorized(message)
        }
        _ => StorageError::ProviderError(message),
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, ApplicationError> {
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .presigned(Self::presigning_config(ttl)?)
            .await
            .map_err(|e| classify(key, e))?;

        info!(
            bucket = %self.bucket_name,
            key = %key,
            ttl_secs = ttl.as_secs(),
            "Presigned upload URL issued"
        );
        Ok(presigned.uri().to_string())
    }

    async fn presign_download(&self, key: &str, ttl: Duration) -> Result<String, ApplicationError> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(Self::presigning_config(ttl)?)
            .await
            .map_err(|e| classify(key, e))?;

        Ok(presigned.uri().to_string())
    }

    async fn delete(&self, key: &str) -> Result<(), ApplicationError> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let error = classify(key, e);
                warn!(bucket = %self.bucket_name, key = %key, "S3 delete failed: {}", error);
                error
            })?;

        info!(bucket = %self.bucket_name, key = %key, "Object deleted");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "s3"
    }
}
