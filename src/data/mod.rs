//! Trip records: loading, cleaning and splitting.
//!
//! Raw CSV rows are read into [`TripRecord`] (every field optional), cleaned
//! into [`LabeledTrip`] (every required field present and in range), and
//! finally separated into feature rows ([`Trip`]) and the fare target.

pub mod cleaning;
pub mod loader;
pub mod split;

pub use cleaning::{clean_trips, CleaningBounds};
pub use loader::{load_trips, read_trips};
pub use split::train_test_split;

use crate::error::{Result, TaxiFareError};
use serde::{Deserialize, Serialize};

/// Column names of the trip table.
pub mod columns {
    pub const KEY: &str = "key";
    pub const FARE_AMOUNT: &str = "fare_amount";
    pub const PICKUP_DATETIME: &str = "pickup_datetime";
    pub const PICKUP_LONGITUDE: &str = "pickup_longitude";
    pub const PICKUP_LATITUDE: &str = "pickup_latitude";
    pub const DROPOFF_LONGITUDE: &str = "dropoff_longitude";
    pub const DROPOFF_LATITUDE: &str = "dropoff_latitude";
    pub const PASSENGER_COUNT: &str = "passenger_count";

    /// Columns every input table must carry.
    pub const REQUIRED: [&str; 6] = [
        FARE_AMOUNT,
        PICKUP_DATETIME,
        PICKUP_LONGITUDE,
        PICKUP_LATITUDE,
        DROPOFF_LONGITUDE,
        DROPOFF_LATITUDE,
    ];
}

/// One CSV row as read from disk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TripRecord {
    #[serde(default)]
    pub key: Option<String>,
    pub fare_amount: Option<f64>,
    pub pickup_datetime: Option<String>,
    pub pickup_longitude: Option<f64>,
    pub pickup_latitude: Option<f64>,
    pub dropoff_longitude: Option<f64>,
    pub dropoff_latitude: Option<f64>,
    #[serde(default)]
    pub passenger_count: Option<f64>,
}

/// Feature columns of a single trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub key: Option<String>,
    pub pickup_datetime: String,
    pub pickup_longitude: f64,
    pub pickup_latitude: f64,
    pub dropoff_longitude: f64,
    pub dropoff_latitude: f64,
    pub passenger_count: Option<f64>,
}

impl Trip {
    /// Value of a numeric column.
    ///
    /// The outer `None` means `column` is not a numeric column; `Some(None)`
    /// means the column exists but this trip has no value for it.
    pub fn numeric(&self, column: &str) -> Option<Option<f64>> {
        match column {
            columns::PICKUP_LONGITUDE => Some(Some(self.pickup_longitude)),
            columns::PICKUP_LATITUDE => Some(Some(self.pickup_latitude)),
            columns::DROPOFF_LONGITUDE => Some(Some(self.dropoff_longitude)),
            columns::DROPOFF_LATITUDE => Some(Some(self.dropoff_latitude)),
            columns::PASSENGER_COUNT => Some(self.passenger_count),
            _ => None,
        }
    }

    /// Value of a text column.
    pub fn text(&self, column: &str) -> Option<&str> {
        match column {
            columns::PICKUP_DATETIME => Some(&self.pickup_datetime),
            columns::KEY => self.key.as_deref(),
            _ => None,
        }
    }
}

/// A cleaned trip together with its fare.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTrip {
    pub trip: Trip,
    pub fare_amount: f64,
}

/// Separates feature rows from the fare target.
///
/// # Errors
/// [`TaxiFareError::Data`] if any fare is NaN or infinite.
pub fn split_target(rows: Vec<LabeledTrip>) -> Result<(Vec<Trip>, Vec<f64>)> {
    let mut trips = Vec::with_capacity(rows.len());
    let mut fares = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        if !row.fare_amount.is_finite() {
            return Err(TaxiFareError::Data(format!(
                "row {}: fare_amount {} is not a finite number",
                i, row.fare_amount
            )));
        }
        trips.push(row.trip);
        fares.push(row.fare_amount);
    }
    Ok((trips, fares))
}
