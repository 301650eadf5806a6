//! Image upload to Tencent COS through its S3-compatible API.
//!
//! The bucket is configured by its public URL,
//! `https://{bucket}.cos.{region}.myqcloud.com`, from which the S3
//! endpoint, region and bucket name are derived. Uploaded objects are
//! served from the same host: `https://{bucket host}/{key}`.

use std::path::Path;

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use serde::{Deserialize, Serialize};

use crate::error::CloudError;

/// Content types accepted for upload.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Upload size cap in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Key prefix for uploaded images.
pub const AVATAR_PREFIX: &str = "avatar";

pub fn is_allowed_image_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type)
}

/// COS credentials and bucket.
#[derive(Debug, Clone)]
pub struct CosConfig {
    pub secret_id: String,
    pub secret_key: String,
    pub bucket_url: String,
}

/// The parts of a COS bucket URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketLocation {
    /// Bucket name including the app id suffix, e.g. `pets-1250000000`.
    pub bucket: String,
    pub region: String,
    /// Public host, e.g. `pets-1250000000.cos.ap-shanghai.myqcloud.com`.
    pub host: String,
}

impl BucketLocation {
    /// Service endpoint for virtual-hosted S3 requests.
    pub fn endpoint(&self) -> String {
        format!("https://cos.{}.myqcloud.com", self.region)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("https://{}/{}", self.host, key)
    }
}

/// Split `https://{bucket}.cos.{region}.myqcloud.com` into its parts.
pub fn parse_bucket_url(bucket_url: &str) -> Result<BucketLocation, CloudError> {
    let invalid = || CloudError::InvalidBucketUrl(bucket_url.to_string());

    let url = reqwest::Url::parse(bucket_url).map_err(|_| invalid())?;
    let host = url.host_str().ok_or_else(invalid)?.to_string();

    let (bucket, rest) = host.split_once(".cos.").ok_or_else(invalid)?;
    let region = rest.strip_suffix(".myqcloud.com").ok_or_else(invalid)?;
    if bucket.is_empty() || region.is_empty() {
        return Err(invalid());
    }

    Ok(BucketLocation {
        bucket: bucket.to_string(),
        region: region.to_string(),
        host: host.clone(),
    })
}

/// Build `{prefix}/{nanos}{ext}`, taking the extension from the file name
/// or, failing that, from the content type.
pub fn object_key(prefix: &str, filename: &str, content_type: &str, nanos: i64) -> String {
    let ext = match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!(".{ext}"),
        None if content_type.starts_with("image/jpeg") => ".jpg".to_string(),
        None if content_type.starts_with("image/png") => ".png".to_string(),
        None => ".bin".to_string(),
    };
    format!("{prefix}/{nanos}{ext}")
}

/// A stored object's public location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub url: String,
    /// Object key within the bucket.
    pub filename: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, CloudError>;
}

/// Store an uploaded image under a fresh time-based key.
pub async fn upload_image(
    storage: &dyn ObjectStorage,
    filename: &str,
    content_type: &str,
    body: Vec<u8>,
) -> Result<StoredObject, CloudError> {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| chrono::Utc::now().timestamp_micros());
    let key = object_key(AVATAR_PREFIX, filename, content_type, nanos);
    let size = body.len();

    let stored = storage.put_object(&key, body, content_type).await?;
    tracing::info!(key = %stored.filename, size, content_type, "Uploaded image");
    Ok(stored)
}

/// [`ObjectStorage`] backed by a COS bucket.
pub struct CosStorage {
    client: aws_sdk_s3::Client,
    location: BucketLocation,
}

impl CosStorage {
    pub fn new(config: &CosConfig) -> Result<Self, CloudError> {
        let location = parse_bucket_url(&config.bucket_url)?;
        let credentials = Credentials::new(
            config.secret_id.clone(),
            config.secret_key.clone(),
            None,
            None,
            "cos-static",
        );
        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(location.region.clone()))
            .endpoint_url(location.endpoint())
            .credentials_provider(credentials)
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            location,
        })
    }

    pub fn location(&self) -> &BucketLocation {
        &self.location
    }
}

#[async_trait]
impl ObjectStorage for CosStorage {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, CloudError> {
        self.client
            .put_object()
            .bucket(&self.location.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| CloudError::Upload(DisplayErrorContext(&e).to_string()))?;

        Ok(StoredObject {
            url: self.location.public_url(key),
            filename: key.to_string(),
        })
    }
}
