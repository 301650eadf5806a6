//! REST client for the WeChat mini-program endpoints.
//!
//! Covers credential issuance (`/cgi-bin/token`), login-code exchange
//! (`/sns/jscode2session`) and phone-number lookup
//! (`/wxa/business/getuserphonenumber`). Every response carries an optional
//! `errcode`/`errmsg` pair; a nonzero code becomes [`WechatError::Upstream`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::WechatError;

pub const DEFAULT_API_BASE: &str = "https://api.weixin.qq.com";

/// App credentials and endpoint settings.
#[derive(Debug, Clone)]
pub struct WechatConfig {
    pub app_id: String,
    pub app_secret: String,
    /// Base URL without trailing slash, e.g. `https://api.weixin.qq.com`.
    pub base_url: String,
    /// Bound on every outbound request.
    pub timeout: Duration,
}

/// `errcode` / `errmsg` as embedded in every response.
#[derive(Debug, Clone, Default, Deserialize)]
struct ErrorFields {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

impl ErrorFields {
    fn check(&self) -> Result<(), WechatError> {
        if self.errcode == 0 {
            Ok(())
        } else {
            Err(WechatError::Upstream {
                code: self.errcode,
                message: self.errmsg.clone(),
            })
        }
    }
}

/// A freshly issued access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Lifetime in seconds from issue.
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(flatten)]
    error: ErrorFields,
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

/// Result of exchanging a login code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSession {
    #[serde(default)]
    pub session_key: String,
    #[serde(default)]
    pub openid: String,
    #[serde(default)]
    pub unionid: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(flatten)]
    error: ErrorFields,
    #[serde(flatten)]
    session: LoginSession,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub appid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneInfo {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub pure_phone_number: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub watermark: Watermark,
}

#[derive(Debug, Deserialize)]
struct PhoneResponse {
    #[serde(flatten)]
    error: ErrorFields,
    #[serde(default)]
    phone_info: PhoneInfo,
}

/// HTTP client for the WeChat API.
pub struct WechatApi {
    client: reqwest::Client,
    config: WechatConfig,
}

impl WechatApi {
    /// Build a client whose requests time out after `config.timeout`.
    pub fn new(config: WechatConfig) -> Result<Self, WechatError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: WechatConfig) -> Self {
        Self { client, config }
    }

    /// Request a new access token with the app credentials.
    ///
    /// Sends `GET /cgi-bin/token?grant_type=client_credential`.
    pub async fn fetch_access_token(&self) -> Result<AccessToken, WechatError> {
        let response = self
            .client
            .get(format!("{}/cgi-bin/token", self.config.base_url))
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", self.config.app_id.as_str()),
                ("secret", self.config.app_secret.as_str()),
            ])
            .send()
            .await?;

        let body: TokenResponse = Self::parse_response(response).await?;
        body.error.check()?;
        Ok(AccessToken {
            access_token: body.access_token,
            expires_in: body.expires_in,
        })
    }

    /// Exchange a mini-program login code for the user's session.
    ///
    /// Sends `GET /sns/jscode2session`.
    pub async fn code_to_session(&self, code: &str) -> Result<LoginSession, WechatError> {
        let response = self
            .client
            .get(format!("{}/sns/jscode2session", self.config.base_url))
            .query(&[
                ("appid", self.config.app_id.as_str()),
                ("secret", self.config.app_secret.as_str()),
                ("js_code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let body: SessionResponse = Self::parse_response(response).await?;
        body.error.check()?;
        Ok(body.session)
    }

    /// Resolve a phone-number authorization code.
    ///
    /// Sends `POST /wxa/business/getuserphonenumber` with `{ "code" }`.
    pub async fn phone_number(
        &self,
        access_token: &str,
        code: &str,
    ) -> Result<PhoneInfo, WechatError> {
        let response = self
            .client
            .post(format!(
                "{}/wxa/business/getuserphonenumber",
                self.config.base_url
            ))
            .query(&[("access_token", access_token)])
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await?;

        let body: PhoneResponse = Self::parse_response(response).await?;
        body.error.check()?;
        Ok(body.phone_info)
    }

    // ---- private helpers ----

    /// Return the response unchanged on a 2xx status, otherwise a
    /// [`WechatError::Status`] with the body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, WechatError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(WechatError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, WechatError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
