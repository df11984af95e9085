//! Car records and the payloads that create or modify them.
//!
//! Clients send numbers either as JSON numbers or as strings (HTML forms only
//! ever send strings), so the numeric fields of [`NewCar`] and [`CarPatch`]
//! go through a lenient decoder. An empty string on an optional field means
//! the value is absent.

use serde::{Deserialize, Serialize};

/// One car on the market.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i64>,
    pub price: f64,
    pub mileage: Option<i64>,
}

impl CarRecord {
    /// Overwrites every field the patch carries. The id never changes.
    pub fn merge(&mut self, patch: CarPatch) {
        if let Some(brand) = patch.brand {
            self.brand = brand;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(mileage) = patch.mileage {
            self.mileage = mileage;
        }
    }
}

/// Insert candidate. Any `id` a client sends is ignored; the store assigns one.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewCar {
    pub brand: String,
    pub model: String,
    #[serde(default, deserialize_with = "coerce::optional_int")]
    pub year: Option<i64>,
    #[serde(deserialize_with = "coerce::number")]
    pub price: f64,
    #[serde(default, deserialize_with = "coerce::optional_int")]
    pub mileage: Option<i64>,
}

impl NewCar {
    pub(crate) fn into_record(self, id: String) -> CarRecord {
        CarRecord {
            id,
            brand: self.brand,
            model: self.model,
            year: self.year,
            price: self.price,
            mileage: self.mileage,
        }
    }
}

/// Partial update.
///
/// `year` and `mileage` are doubly optional: an absent key leaves the value
/// alone, an explicit `null` (or empty form field) clears it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CarPatch {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "coerce::clearable_int")]
    pub year: Option<Option<i64>>,
    #[serde(default, deserialize_with = "coerce::optional_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "coerce::clearable_int")]
    pub mileage: Option<Option<i64>>,
}

mod coerce {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Number(f64),
        Text(String),
    }

    impl Scalar {
        /// `None` for blank text. `NaN` and infinities are rejected.
        fn to_f64<E: Error>(&self) -> Result<Option<f64>, E> {
            let n = match self {
                Scalar::Number(n) => *n,
                Scalar::Text(s) if s.trim().is_empty() => return Ok(None),
                Scalar::Text(s) => s
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| E::custom(format!("`{s}` is not a number")))?,
            };
            if !n.is_finite() {
                return Err(E::custom(format!("`{n}` is not a finite number")));
            }
            Ok(Some(n))
        }

        fn to_i64<E: Error>(&self) -> Result<Option<i64>, E> {
            // i64::MAX as f64 rounds up to 2^63, hence the exclusive bound.
            const RANGE: std::ops::Range<f64> = (i64::MIN as f64)..(i64::MAX as f64);
            match self.to_f64::<E>()? {
                None => Ok(None),
                Some(n) if n.fract() != 0.0 => Err(E::custom(format!("`{n}` is not an integer"))),
                Some(n) if !RANGE.contains(&n) => {
                    Err(E::custom(format!("`{n}` is out of range for an integer")))
                }
                Some(n) => Ok(Some(n as i64)),
            }
        }
    }

    pub(super) fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Scalar::deserialize(d)?
            .to_f64::<D::Error>()?
            .ok_or_else(|| D::Error::custom("a number is required"))
    }

    pub(super) fn optional_number<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<f64>, D::Error> {
        match Option::<Scalar>::deserialize(d)? {
            Some(scalar) => scalar.to_f64(),
            None => Ok(None),
        }
    }

    pub(super) fn optional_int<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<i64>, D::Error> {
        match Option::<Scalar>::deserialize(d)? {
            Some(scalar) => scalar.to_i64(),
            None => Ok(None),
        }
    }

    // Only called when the key is present, so the outer `Some` marks "provided".
    pub(super) fn clearable_int<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Option<i64>>, D::Error> {
        optional_int(d).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camry() -> CarRecord {
        CarRecord {
            id: "1".into(),
            brand: "Toyota".into(),
            model: "Camry".into(),
            year: Some(2020),
            price: 25000.0,
            mileage: Some(15000),
        }
    }

    #[test]
    fn new_car_accepts_numbers_as_strings() {
        let car: NewCar = serde_json::from_str(
            r#"{"brand":"Lada","model":"Niva","year":"1995","price":"3500.5","mileage":""}"#,
        )
        .unwrap();
        assert_eq!(car.year, Some(1995));
        assert_eq!(car.price, 3500.5);
        assert_eq!(car.mileage, None);
    }

    #[test]
    fn new_car_requires_price() {
        let err = serde_json::from_str::<NewCar>(r#"{"brand":"Lada","model":"Niva"}"#);
        assert!(err.is_err());
        let err = serde_json::from_str::<NewCar>(r#"{"brand":"Lada","model":"Niva","price":"cheap"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn fractional_year_is_rejected() {
        let err = serde_json::from_str::<NewCar>(
            r#"{"brand":"Lada","model":"Niva","price":1,"year":1995.5}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for price in [r#""NaN""#, r#""inf""#, r#""-infinity""#] {
            let body = format!(r#"{{"brand":"Lada","model":"Niva","price":{price}}}"#);
            assert!(serde_json::from_str::<NewCar>(&body).is_err(), "price: {price}");
        }
        let patch = serde_json::from_str::<CarPatch>(r#"{"price":"inf"}"#);
        assert!(patch.is_err());
    }

    #[test]
    fn out_of_range_integers_are_rejected() {
        for year in [r#""1e30""#, "1e30", r#""-9.3e18""#] {
            let body = format!(r#"{{"brand":"A","model":"B","price":1,"year":{year}}}"#);
            assert!(serde_json::from_str::<NewCar>(&body).is_err(), "year: {year}");
        }
        let car: NewCar =
            serde_json::from_str(r#"{"brand":"A","model":"B","price":1,"mileage":"-9e18"}"#).unwrap();
        assert_eq!(car.mileage, Some(-9_000_000_000_000_000_000));
    }

    #[test]
    fn patch_merges_only_provided_fields() {
        let mut car = camry();
        let patch: CarPatch = serde_json::from_str(r#"{"price":24000,"id":"99"}"#).unwrap();
        car.merge(patch);
        assert_eq!(car.price, 24000.0);
        assert_eq!(car.id, "1");
        assert_eq!(car.year, Some(2020));
        assert_eq!(car.mileage, Some(15000));
    }

    #[test]
    fn patch_null_clears_optional_field() {
        let mut car = camry();
        let patch: CarPatch = serde_json::from_str(r#"{"mileage":null}"#).unwrap();
        assert_eq!(patch.mileage, Some(None));
        car.merge(patch);
        assert_eq!(car.mileage, None);
        assert_eq!(car.year, Some(2020));
    }
}
