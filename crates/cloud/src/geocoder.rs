//! Reverse geocoding through the Tencent Maps web service.
//!
//! `GET {base}/ws/geocoder/v1/?key=..&location=lat,lng&get_poi=1`. The body
//! carries its own `status`; anything but `0` is an
//! [`CloudError::Upstream`].

use std::time::Duration;

use playtime_core::place::{AdInfo, AddressComponent};
use serde::{Deserialize, Serialize};

use crate::error::CloudError;

pub const DEFAULT_MAP_API_BASE: &str = "https://apis.map.qq.com";

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Web-service key; geocoding is disabled without one.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattedAddresses {
    pub recommend: String,
    pub rough: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Poi {
    pub id: String,
    pub title: String,
    pub address: String,
    pub category: String,
    pub location: LatLng,
    #[serde(rename = "_distance")]
    pub distance: f64,
}

/// The `result` object of a reverse geocoding response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseGeocodeResult {
    pub location: LatLng,
    pub address: String,
    pub address_component: AddressComponent,
    pub ad_info: AdInfo,
    pub formatted_addresses: FormattedAddresses,
    pub poi_count: i64,
    pub pois: Vec<Poi>,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    status: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: ReverseGeocodeResult,
}

impl ReverseGeocodeResponse {
    fn into_result(self) -> Result<ReverseGeocodeResult, CloudError> {
        if self.status != 0 {
            return Err(CloudError::Upstream {
                status: self.status,
                message: self.message,
            });
        }
        Ok(self.result)
    }
}

pub struct ReverseGeocoder {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl ReverseGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self, CloudError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// The configured key, for clients that call the map SDK directly.
    pub fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Describe the address at `(lat, lng)` along with nearby POIs.
    pub async fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<ReverseGeocodeResult, CloudError> {
        let key = self.api_key().ok_or(CloudError::NotConfigured("Map API key"))?;
        let location = format!("{lat},{lng}");

        let response = self
            .client
            .get(format!("{}/ws/geocoder/v1/", self.config.base_url))
            .query(&[("key", key), ("location", location.as_str()), ("get_poi", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CloudError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ReverseGeocodeResponse = response.json().await?;
        body.into_result()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn geocoder(api_key: Option<&str>) -> ReverseGeocoder {
        ReverseGeocoder::new(GeocoderConfig {
            api_key: api_key.map(str::to_string),
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        assert_matches!(
            geocoder(None).reverse_geocode(39.9, 116.4).await,
            Err(CloudError::NotConfigured(_))
        );
        assert_matches!(
            geocoder(Some("")).reverse_geocode(39.9, 116.4).await,
            Err(CloudError::NotConfigured(_))
        );
    }

    #[test]
    fn nonzero_status_is_upstream_error() {
        let body: ReverseGeocodeResponse =
            serde_json::from_str(r#"{"status":311,"message":"key format error"}"#).unwrap();
        assert_matches!(
            body.into_result(),
            Err(CloudError::Upstream { status: 311, .. })
        );
    }

    #[test]
    fn decodes_successful_result() {
        let body: ReverseGeocodeResponse = serde_json::from_str(
            r#"{
                "status": 0,
                "message": "query ok",
                "result": {
                    "location": {"lat": 39.984154, "lng": 116.30749},
                    "address": "Beijing Haidian",
                    "address_component": {"nation": "China", "province": "Beijing", "city": "Beijing", "district": "Haidian", "street": "North 4th Ring", "street_number": "1"},
                    "ad_info": {"adcode": "110108", "nation_code": "156"},
                    "formatted_addresses": {"recommend": "Haidian Huangzhuang", "rough": "Haidian"},
                    "poi_count": 1,
                    "pois": [{"id": "p1", "title": "Park", "address": "x", "category": "park", "location": {"lat": 39.98, "lng": 116.30}, "_distance": 42.5}]
                }
            }"#,
        )
        .unwrap();

        let result = body.into_result().unwrap();
        assert_eq!(result.address_component.district, "Haidian");
        assert_eq!(result.ad_info.adcode, "110108");
        assert_eq!(result.ad_info.city_code, "");
        assert_eq!(result.pois[0].distance, 42.5);
    }
}
