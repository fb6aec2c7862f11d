// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod heatmap;
pub mod parse_result;
pub mod point;

pub use heatmap::{FileSummary, HeatmapResponse};
pub use parse_result::{ErrorInfo, FileParseResult, ParseResponse};
pub use point::{Bounds, GeoPoint, HeatPoint};
