// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared walk from decoded samples to [`GeoPoint`]s.
//!
//! Each format exposes its leaf records through [`PositionSample`]; the
//! format-specific extractors only know how to reach the leaves of their
//! own document tree.

use crate::models::GeoPoint;

/// Read-only view of one recorded sample in a decoded activity document.
pub trait PositionSample {
    /// Latitude in decimal degrees, if recorded.
    fn latitude(&self) -> Option<f64>;

    /// Longitude in decimal degrees, if recorded.
    fn longitude(&self) -> Option<f64>;

    /// Capture time as RFC 3339 UTC.
    fn timestamp(&self) -> Option<String>;

    /// Elevation in meters.
    fn altitude(&self) -> Option<f64>;

    fn heart_rate(&self) -> Option<f64> {
        None
    }

    /// Build a point, or `None` unless both coordinates are present.
    fn to_point(&self) -> Option<GeoPoint> {
        let (lat, long) = (self.latitude()?, self.longitude()?);
        Some(GeoPoint {
            lat,
            long,
            timestamp: self.timestamp(),
            altitude: self.altitude(),
            heart_rate: self.heart_rate(),
        })
    }
}

/// Lazily turn samples into points, dropping samples without a full position.
pub fn extract_points<'a, S, I>(samples: I) -> impl Iterator<Item = GeoPoint> + 'a
where
    S: PositionSample + 'a,
    I: IntoIterator<Item = &'a S>,
    I::IntoIter: 'a,
{
    samples.into_iter().filter_map(|sample| sample.to_point())
}
