//! Object storage file store (S3-compatible: AWS S3, R2, MinIO)
//!
//! Object key is the file id. The declared content type goes on the object
//! itself and the original filename is kept as user metadata.

use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{FileStore, NewFile, StoreError, StoredFile};

/// Metadata key holding the original filename.
const FILENAME_METADATA: &str = "filename";

/// Bucket connection settings
#[derive(Debug, Clone, Default)]
pub struct ObjectStoreConfig {
    pub bucket: String,
    /// Custom endpoint for S3-compatible services; enables path-style addressing.
    pub endpoint: Option<String>,
    /// Region override; the SDK default chain is used otherwise.
    pub region: Option<String>,
}

/// Stores payloads as bucket objects.
pub struct ObjectFileStore {
    client: Client,
    bucket: String,
}

impl ObjectFileStore {
    /// Build a client from the standard AWS environment (credentials, region)
    /// plus the overrides in `config`.
    pub async fn connect(config: ObjectStoreConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = config.endpoint.as_deref() {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(
            bucket = %config.bucket,
            endpoint = ?config.endpoint,
            "object store client ready"
        );
        Self::with_client(Client::from_conf(builder.build()), config.bucket)
    }

    pub fn with_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl FileStore for ObjectFileStore {
    async fn put(&self, file: NewFile) -> Result<(), StoreError> {
        let size = file.data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&file.id)
            .content_type(file.content_type)
            .metadata(FILENAME_METADATA, file.name)
            .body(ByteStream::from(file.data))
            .send()
            .await
            .map_err(|e| StoreError::ObjectStore(DisplayErrorContext(e).to_string()))?;

        tracing::debug!(file_id = %file.id, bytes = size, bucket = %self.bucket, "object stored");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<StoredFile>, StoreError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(id)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    return Ok(None);
                }
                return Err(StoreError::ObjectStore(DisplayErrorContext(err).to_string()));
            }
        };

        let name = output
            .metadata()
            .and_then(|meta| meta.get(FILENAME_METADATA))
            .cloned();
        let content_type = output.content_type().map(str::to_string);
        let etag = output.e_tag().map(str::to_string);

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::ObjectStore(e.to_string()))?
            .into_bytes();

        Ok(Some(StoredFile {
            name,
            content_type,
            data,
            etag,
        }))
    }

    fn kind(&self) -> &'static str {
        "object"
    }
}
