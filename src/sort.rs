//! Sorting a car list by one of its fields.
//!
//! Comparison is decided once per call. Every record's field is first
//! projected to a number; if all of them parse, the sort is numeric. If any
//! one fails, the whole sort compares the lowercased text form instead.
//! Missing values count as `0` in the numeric pass and `""` in the text pass.
//! The sort is stable in both directions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::car::CarRecord;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SortField {
    Brand,
    Model,
    Year,
    Price,
    Mileage,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        Self::Brand,
        Self::Model,
        Self::Year,
        Self::Price,
        Self::Mileage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Brand   => "brand",
            Self::Model   => "model",
            Self::Year    => "year",
            Self::Price   => "price",
            Self::Mileage => "mileage",
        }
    }

    /// Numeric projection. `None` means the value does not parse as a number.
    fn number(self, car: &CarRecord) -> Option<f64> {
        match self {
            Self::Brand   => car.brand.trim().parse().ok(),
            Self::Model   => car.model.trim().parse().ok(),
            Self::Year    => Some(car.year.map_or(0.0, |y| y as f64)),
            Self::Price   => Some(car.price),
            Self::Mileage => Some(car.mileage.map_or(0.0, |m| m as f64)),
        }
    }

    fn text(self, car: &CarRecord) -> String {
        match self {
            Self::Brand   => car.brand.to_lowercase(),
            Self::Model   => car.model.to_lowercase(),
            Self::Year    => car.year.map(|y| y.to_string()).unwrap_or_default(),
            Self::Price   => car.price.to_string(),
            Self::Mileage => car.mileage.map(|m| m.to_string()).unwrap_or_default(),
        }
    }
}

impl FromStr for SortField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brand"   => Ok(Self::Brand),
            "model"   => Ok(Self::Model),
            "year"    => Ok(Self::Year),
            "price"   => Ok(Self::Price),
            "mileage" => Ok(Self::Mileage),
            _         => Err(()),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Lenient parse: anything that is not a descending spelling is ascending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") || s.eq_ignore_ascii_case("descending") {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending  => "asc",
            Self::Descending => "desc",
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Self::Ascending  => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

enum Keys {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Keys {
    fn project(records: &[CarRecord], field: SortField) -> Self {
        let numeric: Option<Vec<f64>> = records.iter().map(|car| field.number(car)).collect();
        match numeric {
            Some(keys) => Keys::Numeric(keys),
            None => Keys::Text(records.iter().map(|car| field.text(car)).collect()),
        }
    }

    fn compare(&self, a: usize, b: usize) -> Ordering {
        match self {
            Keys::Numeric(keys) => keys[a].total_cmp(&keys[b]),
            Keys::Text(keys) => keys[a].cmp(&keys[b]),
        }
    }
}

/// Returns a new, sorted copy of `records`. The input is untouched.
pub fn sort(records: &[CarRecord], field: SortField, order: SortOrder) -> Vec<CarRecord> {
    let keys = Keys::project(records, field);
    let mut positions: Vec<usize> = (0..records.len()).collect();
    // `sort_by` is stable, and reversing the comparator (not the output)
    // keeps ties in input order for descending sorts too.
    positions.sort_by(|&a, &b| match order {
        SortOrder::Ascending  => keys.compare(a, b),
        SortOrder::Descending => keys.compare(b, a),
    });
    positions.into_iter().map(|i| records[i].clone()).collect()
}

/// Sorts by a field given by name. Unknown names leave the order as is.
pub fn sort_by_name(records: &[CarRecord], field: &str, order: SortOrder) -> Vec<CarRecord> {
    match field.parse::<SortField>() {
        Ok(field) => sort(records, field, order),
        Err(()) => records.to_vec(),
    }
}
