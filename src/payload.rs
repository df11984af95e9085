//! Request body decoding.
//!
//! JSON and `application/x-www-form-urlencoded` bodies decode through the
//! same serde types: form pairs become a JSON object of strings first, and
//! the lenient numeric fields in [`crate::car`] accept those strings.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use url::form_urlencoded;

use crate::request::Request;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("request body is empty")]
    Empty,
    #[error("malformed request body: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decodes by content type: form posts as forms, everything else as JSON.
pub fn decode<T: DeserializeOwned>(req: &Request) -> Result<T, PayloadError> {
    if req.is_form() {
        decode_form(req.body())
    } else {
        decode_json(req.body())
    }
}

pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, PayloadError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(PayloadError::Empty);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Repeated keys keep the last value.
pub fn decode_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, PayloadError> {
    let fields: Map<String, Value> = form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();
    Ok(serde_json::from_value(Value::Object(fields))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::{CarPatch, NewCar};

    #[test]
    fn form_body_decodes_with_coercion() {
        let car: NewCar =
            decode_form(b"brand=Lada&model=Niva+4x4&year=1995&price=3500&mileage=").unwrap();
        assert_eq!(car.model, "Niva 4x4");
        assert_eq!(car.year, Some(1995));
        assert_eq!(car.price, 3500.0);
        assert_eq!(car.mileage, None);
    }

    #[test]
    fn empty_form_field_clears_in_a_patch() {
        let patch: CarPatch = decode_form(b"mileage=&price=10").unwrap();
        assert_eq!(patch.mileage, Some(None));
        assert_eq!(patch.year, None);
        assert_eq!(patch.price, Some(10.0));
    }

    #[test]
    fn blank_json_body_is_empty() {
        assert!(matches!(decode_json::<NewCar>(b"  "), Err(PayloadError::Empty)));
        assert!(matches!(decode_json::<NewCar>(b"{"), Err(PayloadError::Malformed(_))));
    }
}
