pub mod location;
pub mod pet;
pub mod review;
pub mod user;

use bson::oid::ObjectId;
use playtime_core::error::CoreError;

/// Parse a 24-char hex object id, naming `field` in the error.
pub(crate) fn parse_object_id(field: &str, value: &str) -> Result<ObjectId, CoreError> {
    ObjectId::parse_str(value)
        .map_err(|_| CoreError::Validation(format!("{field} is not a valid id: {value:?}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn bad_id_names_the_field() {
        let err = parse_object_id("place_id", "nope").unwrap_err();
        assert_matches!(&err, CoreError::Validation(msg) if msg.starts_with("place_id"));
        assert!(parse_object_id("place_id", &ObjectId::new().to_hex()).is_ok());
    }
}
