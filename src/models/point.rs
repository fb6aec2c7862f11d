// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Extracted GPS points and their heatmap projection.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One position extracted from an activity file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub long: f64,
    /// Capture time (RFC 3339, UTC)
    pub timestamp: Option<String>,
    /// Elevation in meters
    pub altitude: Option<f64>,
    /// Heart rate in bpm (FIT only)
    pub heart_rate: Option<f64>,
}

impl GeoPoint {
    /// A point with only a position.
    pub fn new(lat: f64, long: f64) -> Self {
        Self {
            lat,
            long,
            timestamp: None,
            altitude: None,
            heart_rate: None,
        }
    }
}

/// Heatmap intensity. Every point is weighted the same.
pub const UNIFORM_INTENSITY: f64 = 1.0;

/// `[lat, long, intensity]` triple as consumed by the heatmap layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HeatPoint(pub f64, pub f64, pub f64);

impl HeatPoint {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn long(&self) -> f64 {
        self.1
    }
}

impl From<&GeoPoint> for HeatPoint {
    fn from(point: &GeoPoint) -> Self {
        HeatPoint(point.lat, point.long, UNIFORM_INTENSITY)
    }
}

/// Bounding box of a set of points, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}
