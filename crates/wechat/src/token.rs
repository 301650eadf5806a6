//! Process-wide access token cache.
//!
//! ```text
//!   EMPTY --get_token--> (fetch) --> VALID
//!   VALID --elapsed >= expires_in - 300s--> stale --get_token--> (fetch) --> VALID
//!   any   --invalidate--> EMPTY
//! ```
//!
//! Readers share a read lock for the freshness check. Refreshes hold the
//! write lock for the whole upstream call and re-check freshness after
//! acquiring it, so a burst of stale readers triggers a single fetch. A
//! failed fetch leaves the cached value untouched.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::api::{AccessToken, WechatApi};
use crate::error::WechatError;

/// Tokens are treated as expired this long before their real expiry.
pub const SAFETY_MARGIN: Duration = Duration::from_secs(300);

/// Where the cache gets new tokens from.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch(&self) -> Result<AccessToken, WechatError>;
}

#[async_trait]
impl TokenSource for WechatApi {
    async fn fetch(&self) -> Result<AccessToken, WechatError> {
        self.fetch_access_token().await
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: AccessToken,
    issued_at: Instant,
}

impl CachedToken {
    /// Fresh while `elapsed < expires_in - SAFETY_MARGIN`. Tokens whose
    /// lifetime is within the margin are never fresh.
    fn is_fresh(&self, now: Instant) -> bool {
        let lifetime = Duration::from_secs(self.token.expires_in);
        match lifetime.checked_sub(SAFETY_MARGIN) {
            Some(usable) => now.duration_since(self.issued_at) < usable,
            None => false,
        }
    }
}

pub struct TokenCache {
    source: Arc<dyn TokenSource>,
    state: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            state: RwLock::new(None),
        }
    }

    /// Return the cached token if still fresh, otherwise fetch a new one.
    pub async fn get_token(&self) -> Result<AccessToken, WechatError> {
        {
            let state = self.state.read().await;
            if let Some(cached) = state.as_ref().filter(|c| c.is_fresh(Instant::now())) {
                return Ok(cached.token.clone());
            }
        }

        let mut state = self.state.write().await;
        if let Some(cached) = state.as_ref().filter(|c| c.is_fresh(Instant::now())) {
            return Ok(cached.token.clone());
        }
        self.refresh(&mut state).await
    }

    /// Fetch a new token unconditionally and cache it on success.
    pub async fn fetch_new_token(&self) -> Result<AccessToken, WechatError> {
        let mut state = self.state.write().await;
        self.refresh(&mut state).await
    }

    /// Drop the cached token so the next [`get_token`](Self::get_token)
    /// fetches a new one.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        if state.take().is_some() {
            tracing::info!("Access token invalidated");
        }
    }

    async fn refresh(&self, state: &mut Option<CachedToken>) -> Result<AccessToken, WechatError> {
        match self.source.fetch().await {
            Ok(token) => {
                tracing::info!(expires_in = token.expires_in, "Fetched new access token");
                *state = Some(CachedToken {
                    token: token.clone(),
                    issued_at: Instant::now(),
                });
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Access token fetch failed");
                Err(e)
            }
        }
    }
}
