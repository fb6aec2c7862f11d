// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Heatmap response model.

use super::parse_result::{ErrorInfo, FileParseResult};
use super::point::{Bounds, HeatPoint};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Response body for `POST /api/heatmap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HeatmapResponse {
    /// Points passing the range checks, ready for the heat layer
    pub valid_points: Vec<HeatPoint>,
    /// Number of points rejected by the range checks
    pub invalid_count: usize,
    /// Initial map center, one of `valid_points`
    pub center: Option<HeatPoint>,
    /// Extent of `valid_points`
    pub bounds: Option<Bounds>,
    /// Per-file outcomes, points omitted
    pub parse_results: Vec<FileSummary>,
}

/// Per-file outcome without the point payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FileSummary {
    pub file: String,
    pub points: usize,
    /// Same shape as the error entry of `POST /uploads`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl From<&FileParseResult> for FileSummary {
    fn from(result: &FileParseResult) -> Self {
        Self {
            file: result.file().to_string(),
            points: result.points().len(),
            error: result.error().cloned(),
        }
    }
}
