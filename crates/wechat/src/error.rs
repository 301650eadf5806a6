/// Errors from the identity-service client and the token cache.
#[derive(Debug, thiserror::Error)]
pub enum WechatError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("WeChat API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered 2xx with a nonzero `errcode`.
    #[error("WeChat API error: {code} - {message}")]
    Upstream { code: i64, message: String },
}

/// `errcode` values that mean the access token is expired or invalid.
pub const TOKEN_REJECTED_CODES: [i64; 2] = [40001, 42001];

impl WechatError {
    /// Whether the service rejected the access token used for the call.
    pub fn is_token_rejected(&self) -> bool {
        matches!(self, Self::Upstream { code, .. } if TOKEN_REJECTED_CODES.contains(code))
    }
}
