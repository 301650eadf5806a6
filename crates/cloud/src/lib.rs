pub mod error;
pub mod geocoder;
pub mod storage;

pub use error::CloudError;
pub use geocoder::{GeocoderConfig, ReverseGeocodeResult, ReverseGeocoder};
pub use storage::{CosConfig, CosStorage, ObjectStorage, StoredObject};
