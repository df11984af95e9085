//! Aggregate statistics over a car list.
//!
//! Each numeric field reports how many records carry a value plus the
//! minimum, maximum and mean of those values. A field nobody fills in reports
//! no aggregates at all rather than zeros. An empty list is its own outcome,
//! [`Statistics::NoData`].
//!
//! Means are rounded for presentation only: two decimals for price, one for
//! year and mileage.

use serde::{Serialize, Serializer};

use crate::car::CarRecord;

/// Decimal places of the rounded price mean.
pub const PRICE_DECIMALS: usize = 2;
pub const YEAR_DECIMALS: usize = 1;
pub const MILEAGE_DECIMALS: usize = 1;

/// Aggregates for one numeric field.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FieldStats {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

impl FieldStats {
    fn collect(values: impl Iterator<Item = f64>, decimals: usize) -> Self {
        let mut values: Vec<f64> = values.collect();
        if values.is_empty() {
            return Self::default();
        }
        // Summing in sorted order keeps the mean independent of record order.
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let sum: f64 = values.iter().sum();
        Self {
            count,
            min: values.first().copied(),
            max: values.last().copied(),
            avg: Some(round(sum / count as f64, decimals)),
        }
    }
}

fn round(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub price: FieldStats,
    pub year: FieldStats,
    pub mileage: FieldStats,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statistics {
    /// The collection was empty.
    NoData,
    Summary(Summary),
}

impl Statistics {
    pub fn total(&self) -> usize {
        match self {
            Statistics::NoData => 0,
            Statistics::Summary(summary) => summary.total,
        }
    }

    pub fn price(&self) -> FieldStats {
        self.field(|s| &s.price)
    }

    pub fn year(&self) -> FieldStats {
        self.field(|s| &s.year)
    }

    pub fn mileage(&self) -> FieldStats {
        self.field(|s| &s.mileage)
    }

    fn field(&self, pick: impl Fn(&Summary) -> &FieldStats) -> FieldStats {
        match self {
            Statistics::NoData => FieldStats::default(),
            Statistics::Summary(summary) => pick(summary).clone(),
        }
    }
}

/// Computes statistics over `records`. Record order does not matter.
pub fn aggregate(records: &[CarRecord]) -> Statistics {
    if records.is_empty() {
        return Statistics::NoData;
    }
    Statistics::Summary(Summary {
        total: records.len(),
        price: FieldStats::collect(records.iter().map(|c| c.price), PRICE_DECIMALS),
        year: FieldStats::collect(
            records.iter().filter_map(|c| c.year).map(|y| y as f64),
            YEAR_DECIMALS,
        ),
        mileage: FieldStats::collect(
            records.iter().filter_map(|c| c.mileage).map(|m| m as f64),
            MILEAGE_DECIMALS,
        ),
    })
}

// Both outcomes serialize to the same shape so clients never branch on
// missing keys; `status` tells them apart.
impl Serialize for Statistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Report {
            status: &'static str,
            total: usize,
            price: FieldStats,
            year: FieldStats,
            mileage: FieldStats,
        }

        let status = match self {
            Statistics::NoData => "no_data",
            Statistics::Summary(_) => "ok",
        };
        Report {
            status,
            total: self.total(),
            price: self.price(),
            year: self.year(),
            mileage: self.mileage(),
        }
        .serialize(serializer)
    }
}
