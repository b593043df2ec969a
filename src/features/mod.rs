//! Stateless feature derivers over [`Trip`](crate::data::Trip) rows.
//!
//! - [`DistanceTransformer`]: haversine distance between two coordinate pairs.
//! - [`TimeFeaturesEncoder`]: calendar features of a timestamp column.
//!
//! Both implement [`FeatureDeriver`](crate::preprocessing::FeatureDeriver);
//! neither learns anything, so they need no fit step.

pub mod distance;
pub mod time;

pub use distance::{haversine_km, DistanceTransformer, EARTH_RADIUS_KM};
pub use time::{parse_timestamp, TimeFeaturesEncoder};
