/// Errors from object storage and reverse geocoding.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// The integration has no credentials configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Invalid bucket URL: {0}")]
    InvalidBucketUrl(String),

    /// The object store rejected or failed the upload.
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The remote API answered with a nonzero status in its body.
    #[error("Remote API error: {status} - {message}")]
    Upstream { status: i64, message: String },
}
