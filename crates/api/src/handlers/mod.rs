pub mod pet;
pub mod place;
pub mod review;
pub mod token;
pub mod user;
pub mod wechat;
