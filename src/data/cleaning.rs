//! Row filtering for raw trip records.

use crate::data::{LabeledTrip, Trip, TripRecord};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Plausibility bounds applied by [`clean_trips`].
///
/// Coordinate ranges are inclusive; fare and passenger bounds follow the
/// comments on each field. The defaults frame greater New York.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningBounds {
    /// Exclusive on both ends.
    pub fare_amount: (f64, f64),
    /// Lower bound inclusive, upper exclusive. Only checked when present.
    pub passenger_count: (f64, f64),
    pub pickup_latitude: (f64, f64),
    pub pickup_longitude: (f64, f64),
    pub dropoff_latitude: (f64, f64),
    pub dropoff_longitude: (f64, f64),
}

impl Default for CleaningBounds {
    fn default() -> Self {
        Self {
            fare_amount: (0.0, 4000.0),
            passenger_count: (0.0, 8.0),
            pickup_latitude: (40.0, 42.0),
            pickup_longitude: (-74.3, -72.9),
            dropoff_latitude: (40.0, 42.0),
            dropoff_longitude: (-74.0, -72.9),
        }
    }
}

fn within((lo, hi): (f64, f64), v: f64) -> bool {
    lo <= v && v <= hi
}

impl CleaningBounds {
    fn accept(&self, record: TripRecord) -> Option<LabeledTrip> {
        let fare = record.fare_amount?;
        let pickup_datetime = record.pickup_datetime.filter(|s| !s.trim().is_empty())?;
        let (plon, plat) = (record.pickup_longitude?, record.pickup_latitude?);
        let (dlon, dlat) = (record.dropoff_longitude?, record.dropoff_latitude?);

        if [plon, plat, dlon, dlat].iter().any(|&c| c == 0.0) {
            return None;
        }
        if !(self.fare_amount.0 < fare && fare < self.fare_amount.1) {
            return None;
        }
        if let Some(p) = record.passenger_count {
            if !(self.passenger_count.0 <= p && p < self.passenger_count.1) {
                return None;
            }
        }
        if !within(self.pickup_latitude, plat)
            || !within(self.pickup_longitude, plon)
            || !within(self.dropoff_latitude, dlat)
            || !within(self.dropoff_longitude, dlon)
        {
            return None;
        }

        Some(LabeledTrip {
            trip: Trip {
                key: record.key,
                pickup_datetime,
                pickup_longitude: plon,
                pickup_latitude: plat,
                dropoff_longitude: dlon,
                dropoff_latitude: dlat,
                passenger_count: record.passenger_count,
            },
            fare_amount: fare,
        })
    }
}

/// Drops incomplete and implausible rows.
///
/// A row is kept only if the fare, the pickup time and all four coordinates
/// are present, no coordinate is exactly zero, and all values lie within
/// `bounds`. `passenger_count` may be blank; when given it must be in range.
/// NaN never passes a bound check, so NaN fields are dropped as well.
pub fn clean_trips(records: Vec<TripRecord>, bounds: &CleaningBounds) -> Vec<LabeledTrip> {
    let total = records.len();
    let kept: Vec<LabeledTrip> = records
        .into_iter()
        .filter_map(|r| bounds.accept(r))
        .collect();
    info!(kept = kept.len(), dropped = total - kept.len(), "cleaned trips");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TripRecord {
        TripRecord {
            key: Some("k".to_string()),
            fare_amount: Some(9.5),
            pickup_datetime: Some("2014-03-01 08:15:00 UTC".to_string()),
            pickup_longitude: Some(-73.99),
            pickup_latitude: Some(40.75),
            dropoff_longitude: Some(-73.95),
            dropoff_latitude: Some(40.78),
            passenger_count: Some(2.0),
        }
    }

    fn kept(r: TripRecord) -> bool {
        !clean_trips(vec![r], &CleaningBounds::default()).is_empty()
    }

    #[test]
    fn test_valid_record_kept() {
        let cleaned = clean_trips(vec![record()], &CleaningBounds::default());
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].fare_amount, 9.5);
        assert_eq!(cleaned[0].trip.pickup_latitude, 40.75);
        assert_eq!(cleaned[0].trip.key.as_deref(), Some("k"));
    }

    #[test]
    fn test_missing_fields_dropped() {
        assert!(!kept(TripRecord {
            fare_amount: None,
            ..record()
        }));
        assert!(!kept(TripRecord {
            pickup_datetime: None,
            ..record()
        }));
        assert!(!kept(TripRecord {
            dropoff_latitude: None,
            ..record()
        }));
    }

    #[test]
    fn test_fare_bounds_exclusive() {
        assert!(!kept(TripRecord {
            fare_amount: Some(0.0),
            ..record()
        }));
        assert!(!kept(TripRecord {
            fare_amount: Some(-2.5),
            ..record()
        }));
        assert!(!kept(TripRecord {
            fare_amount: Some(4000.0),
            ..record()
        }));
        assert!(kept(TripRecord {
            fare_amount: Some(3999.0),
            ..record()
        }));
    }

    #[test]
    fn test_passenger_bounds() {
        assert!(kept(TripRecord {
            passenger_count: Some(0.0),
            ..record()
        }));
        assert!(!kept(TripRecord {
            passenger_count: Some(8.0),
            ..record()
        }));
        assert!(kept(TripRecord {
            passenger_count: None,
            ..record()
        }));
    }

    #[test]
    fn test_zero_and_out_of_area_coordinates_dropped() {
        assert!(!kept(TripRecord {
            pickup_longitude: Some(0.0),
            ..record()
        }));
        assert!(!kept(TripRecord {
            dropoff_latitude: Some(43.0),
            ..record()
        }));
        // dropoff longitude bound is tighter than pickup
        assert!(kept(TripRecord {
            pickup_longitude: Some(-74.2),
            ..record()
        }));
        assert!(!kept(TripRecord {
            dropoff_longitude: Some(-74.2),
            ..record()
        }));
    }

    #[test]
    fn test_nan_dropped() {
        assert!(!kept(TripRecord {
            pickup_latitude: Some(f64::NAN),
            ..record()
        }));
        assert!(!kept(TripRecord {
            fare_amount: Some(f64::NAN),
            ..record()
        }));
    }
}
