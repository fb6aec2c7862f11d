// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-file parse outcomes returned to the client.

use super::point::GeoPoint;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Why a single file produced no points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ErrorInfo {
    /// Machine-readable kind: read_failed, decode_failed, unsupported_format, task_failed
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

/// Outcome of parsing one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum FileParseResult {
    Parsed {
        file: String,
        parsed: bool,
        points: Vec<GeoPoint>,
    },
    Failed {
        file: String,
        error: ErrorInfo,
    },
}

impl FileParseResult {
    pub fn parsed(file: impl Into<String>, points: Vec<GeoPoint>) -> Self {
        FileParseResult::Parsed {
            file: file.into(),
            parsed: true,
            points,
        }
    }

    pub fn failed(file: impl Into<String>, error: ErrorInfo) -> Self {
        FileParseResult::Failed {
            file: file.into(),
            error,
        }
    }

    /// Original name of the uploaded file.
    pub fn file(&self) -> &str {
        match self {
            FileParseResult::Parsed { file, .. } | FileParseResult::Failed { file, .. } => file,
        }
    }

    /// Extracted points; empty for failed files.
    pub fn points(&self) -> &[GeoPoint] {
        match self {
            FileParseResult::Parsed { points, .. } => points,
            FileParseResult::Failed { .. } => &[],
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            FileParseResult::Parsed { .. } => None,
            FileParseResult::Failed { error, .. } => Some(error),
        }
    }
}

/// Response body for `POST /uploads`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ParseResponse {
    pub parse_results: Vec<FileParseResult>,
}
