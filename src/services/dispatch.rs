// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Routes uploaded files to the matching decoder and collects the outcomes.

use crate::models::{ErrorInfo, FileParseResult, GeoPoint};
use crate::services::fit::{decode_fit, fit_points, FitDecodeOptions, FitError};
use crate::services::gpx::{decode_gpx_bytes, gpx_points, GpxError};
use crate::services::upload::{TempUpload, UploadedFile};
use futures_util::future::join_all;
use std::path::Path;

/// Activity file formats we can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Fit,
    Gpx,
}

impl FileFormat {
    /// Detect the format from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("fit") {
            Some(FileFormat::Fit)
        } else if extension.eq_ignore_ascii_case("gpx") {
            Some(FileFormat::Gpx)
        } else {
            None
        }
    }
}

/// Why one file could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Gpx(#[from] GpxError),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Parse task failed: {0}")]
    Task(String),
}

impl ParseError {
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::Read(_) => "read_failed",
            ParseError::Fit(_) | ParseError::Gpx(_) => "decode_failed",
            ParseError::UnsupportedFormat(_) => "unsupported_format",
            ParseError::Task(_) => "task_failed",
        }
    }
}

impl From<&ParseError> for ErrorInfo {
    fn from(err: &ParseError) -> Self {
        ErrorInfo {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Parses batches of uploaded files, one blocking task per file.
#[derive(Debug, Clone, Default)]
pub struct FileDispatcher {
    fit_options: FitDecodeOptions,
}

impl FileDispatcher {
    pub fn new(fit_options: FitDecodeOptions) -> Self {
        Self { fit_options }
    }

    /// Parse every file concurrently. The result has one entry per input
    /// file, in input order; a failing file never affects the others.
    ///
    /// Each stored file is deleted before its task completes.
    pub async fn parse_files(&self, files: Vec<UploadedFile>) -> Vec<FileParseResult> {
        let tasks = files.into_iter().map(|file| {
            let name = file.original_name.clone();
            let options = self.fit_options.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let upload = TempUpload::new(file);
                parse_file(upload.file(), &options)
            });

            async move {
                let outcome = handle
                    .await
                    .unwrap_or_else(|e| Err(ParseError::Task(e.to_string())));

                match outcome {
                    Ok(points) => {
                        tracing::info!(file = %name, points = points.len(), "Parsed file");
                        FileParseResult::parsed(name, points)
                    }
                    Err(e) => {
                        tracing::warn!(file = %name, kind = e.kind(), error = %e, "Failed to parse file");
                        FileParseResult::failed(name, ErrorInfo::from(&e))
                    }
                }
            }
        });

        join_all(tasks).await
    }
}

/// Read, decode and extract a single stored file.
pub fn parse_file(
    file: &UploadedFile,
    fit_options: &FitDecodeOptions,
) -> Result<Vec<GeoPoint>, ParseError> {
    let format = FileFormat::from_file_name(&file.original_name)
        .ok_or_else(|| ParseError::UnsupportedFormat(file.original_name.clone()))?;

    let bytes = std::fs::read(&file.path)?;

    let points = match format {
        FileFormat::Fit => {
            let activity = decode_fit(&bytes, fit_options)?;
            let points: Vec<GeoPoint> = fit_points(&activity).collect();
            let records = activity.records().count();
            if records > points.len() {
                tracing::debug!(
                    file = %file.original_name,
                    skipped = records - points.len(),
                    "Skipped FIT records without a position"
                );
            }
            points
        }
        FileFormat::Gpx => {
            let doc = decode_gpx_bytes(&bytes)?;
            gpx_points(&doc).collect()
        }
    };

    Ok(points)
}
