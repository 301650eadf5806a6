pub mod api;
pub mod error;
pub mod token;

pub use api::{AccessToken, LoginSession, PhoneInfo, WechatApi, WechatConfig};
pub use error::WechatError;
pub use token::{TokenCache, TokenSource};
