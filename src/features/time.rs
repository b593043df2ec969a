//! Calendar features of the pickup timestamp.

use crate::backend::{Backend, Tensor2D};
use crate::data::{columns, Trip};
use crate::preprocessing::{FeatureDeriver, PreprocessingError};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

const NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f %:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Parses a pickup timestamp into UTC.
///
/// Accepted forms:
/// - `2015-01-27 13:08:24 UTC`
/// - RFC 3339, e.g. `2015-01-27T13:08:24-05:00`
/// - `2015-01-27 13:08:24 +01:00`
/// - `2015-01-27 13:08:24[.fff]` with no zone, read as UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, PreprocessingError> {
    parse_utc(raw).map_err(PreprocessingError::InvalidTimestamp)
}

fn parse_utc(raw: &str) -> Result<DateTime<Utc>, String> {
    let s = raw.trim();
    if let Some(naive) = s.strip_suffix("UTC") {
        return NaiveDateTime::parse_from_str(naive.trim_end(), NAIVE_FORMAT)
            .map(|dt| Utc.from_utc_datetime(&dt))
            .map_err(|e| format!("{:?}: {}", raw, e));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
        .map(|dt| Utc.from_utc_datetime(&dt))
        .map_err(|_| format!("{:?}", raw))
}

/// Derives `[hour, dow, month, year]` from a timestamp column.
///
/// Every timestamp is normalised to UTC and then viewed at one fixed offset
/// (`utc_offset_hours`), so hour buckets never shift with daylight saving.
/// Day of week counts from Monday = 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeFeaturesEncoder {
    pub time_column: String,
    pub utc_offset_hours: i32,
}

impl Default for TimeFeaturesEncoder {
    fn default() -> Self {
        Self {
            time_column: columns::PICKUP_DATETIME.to_string(),
            utc_offset_hours: 0,
        }
    }
}

impl TimeFeaturesEncoder {
    pub fn new(time_column: &str) -> Self {
        Self {
            time_column: time_column.to_string(),
            ..Self::default()
        }
    }

    /// View timestamps at a fixed offset from UTC, e.g. `-5` for New York
    /// standard time.
    pub fn with_utc_offset_hours(mut self, hours: i32) -> Self {
        self.utc_offset_hours = hours;
        self
    }

    fn offset(&self) -> Result<FixedOffset, PreprocessingError> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                PreprocessingError::InvalidParameter(format!(
                    "utc offset of {} hours is out of range",
                    self.utc_offset_hours
                ))
            })
    }
}

impl FeatureDeriver for TimeFeaturesEncoder {
    type Row = Trip;

    fn input_columns(&self) -> Vec<&str> {
        vec![self.time_column.as_str()]
    }

    fn output_columns(&self) -> Vec<&'static str> {
        vec!["hour", "dow", "month", "year"]
    }

    fn derive<B: Backend>(&self, rows: &[Trip]) -> Result<Tensor2D<B>, PreprocessingError> {
        let offset = self.offset()?;
        let mut data = Vec::with_capacity(rows.len() * 4);
        for (i, trip) in rows.iter().enumerate() {
            let raw = trip.text(&self.time_column).ok_or_else(|| {
                PreprocessingError::MissingValues(format!("row {}: no {}", i, self.time_column))
            })?;
            let local = parse_utc(raw)
                .map_err(|e| PreprocessingError::InvalidTimestamp(format!("row {}: {}", i, e)))?
                .with_timezone(&offset);
            data.extend([
                local.hour() as f64,
                local.weekday().num_days_from_monday() as f64,
                local.month() as f64,
                local.year() as f64,
            ]);
        }
        Ok(Tensor2D::new(data, rows.len(), 4))
    }
}
