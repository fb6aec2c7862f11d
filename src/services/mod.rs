// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod dispatch;
pub mod fit;
pub mod gpx;
pub mod heatmap;
pub mod track;
pub mod upload;

pub use dispatch::{FileDispatcher, FileFormat, ParseError};
pub use fit::{FitActivity, FitDecodeOptions};
pub use heatmap::{build_heatmap, classify_points, PointClassification};
pub use upload::{TempUpload, UploadBatch, UploadedFile};
