//! Great-circle distance between pickup and dropoff.

use crate::backend::{Backend, Tensor2D};
use crate::data::{columns, Trip};
use crate::preprocessing::{FeatureDeriver, PreprocessingError};
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points given in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // rounding can push `a` marginally above 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * a.min(1.0).sqrt().asin()
}

/// Derives a single `distance` column (km) from four coordinate columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceTransformer {
    pub start_lat: String,
    pub start_lon: String,
    pub end_lat: String,
    pub end_lon: String,
}

impl Default for DistanceTransformer {
    fn default() -> Self {
        Self::new(
            columns::PICKUP_LATITUDE,
            columns::PICKUP_LONGITUDE,
            columns::DROPOFF_LATITUDE,
            columns::DROPOFF_LONGITUDE,
        )
    }
}

impl DistanceTransformer {
    pub fn new(start_lat: &str, start_lon: &str, end_lat: &str, end_lon: &str) -> Self {
        Self {
            start_lat: start_lat.to_string(),
            start_lon: start_lon.to_string(),
            end_lat: end_lat.to_string(),
            end_lon: end_lon.to_string(),
        }
    }

    fn coordinate(
        &self,
        trip: &Trip,
        row: usize,
        column: &str,
        limit: f64,
    ) -> Result<f64, PreprocessingError> {
        let value = trip
            .numeric(column)
            .ok_or_else(|| {
                PreprocessingError::InvalidParameter(format!(
                    "`{}` is not a numeric column",
                    column
                ))
            })?
            .ok_or_else(|| {
                PreprocessingError::MissingValues(format!("row {}: no {}", row, column))
            })?;
        if !value.is_finite() {
            return Err(PreprocessingError::MissingValues(format!(
                "row {}: {} is {}",
                row, column, value
            )));
        }
        if value.abs() > limit {
            return Err(PreprocessingError::InvalidCoordinate(format!(
                "row {}: {} = {} outside [-{}, {}]",
                row, column, value, limit, limit
            )));
        }
        Ok(value)
    }
}

impl FeatureDeriver for DistanceTransformer {
    type Row = Trip;

    fn input_columns(&self) -> Vec<&str> {
        vec![
            self.start_lat.as_str(),
            self.start_lon.as_str(),
            self.end_lat.as_str(),
            self.end_lon.as_str(),
        ]
    }

    fn output_columns(&self) -> Vec<&'static str> {
        vec!["distance"]
    }

    fn derive<B: Backend>(&self, rows: &[Trip]) -> Result<Tensor2D<B>, PreprocessingError> {
        let distances = rows
            .iter()
            .enumerate()
            .map(|(i, trip)| {
                let lat1 = self.coordinate(trip, i, &self.start_lat, 90.0)?;
                let lon1 = self.coordinate(trip, i, &self.start_lon, 180.0)?;
                let lat2 = self.coordinate(trip, i, &self.end_lat, 90.0)?;
                let lon2 = self.coordinate(trip, i, &self.end_lon, 180.0)?;
                Ok(haversine_km(lat1, lon1, lat2, lon2))
            })
            .collect::<Result<Vec<f64>, PreprocessingError>>()?;
        Ok(Tensor2D::from_column(distances))
    }
}
