use playtime_core::place::{AdInfo, AddressComponent, PlaceCategory, PlaceDetails};
use playtime_db::models::location::{Location, LocationRequest};
use playtime_db::repositories::LocationRepo;
use playtime_db::store::DocumentStore;

pub fn place_request(
    name: &str,
    description: &str,
    category: PlaceCategory,
    lat: f64,
    lon: f64,
) -> LocationRequest {
    LocationRequest {
        details: PlaceDetails {
            name: name.to_string(),
            address: "100 Test Street".to_string(),
            description: description.to_string(),
            category,
            photos: vec![],
            is_pet_friendly: true,
            pet_size: vec![],
            pet_type: vec![],
            zone: vec!["downtown".to_string()],
            address_component: AddressComponent::default(),
            ad_info: AdInfo::default(),
        },
        latitude: lat,
        longitude: lon,
    }
}

pub async fn insert_place(
    store: &dyn DocumentStore,
    name: &str,
    description: &str,
    category: PlaceCategory,
    lat: f64,
    lon: f64,
) -> Location {
    LocationRepo::create(store, &place_request(name, description, category, lat, lon))
        .await
        .unwrap()
}
