pub mod error;
pub mod geo;
pub mod place;
pub mod search;
pub mod types;
