// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity upload routes.

use crate::error::{AppError, Result};
use crate::models::{FileParseResult, HeatmapResponse, ParseResponse};
use crate::services::{build_heatmap, UploadBatch};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Multipart field carrying the activity files (repeated).
const UPLOAD_FIELD: &str = "files";

/// Upload routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/uploads", post(upload_files))
        .route("/api/heatmap", post(upload_heatmap))
}

/// Parse uploaded files and return every extracted point per file.
async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ParseResponse>> {
    let parse_results = receive_and_parse(&state, multipart).await?;
    Ok(Json(ParseResponse { parse_results }))
}

/// Parse uploaded files and return validated heatmap points.
async fn upload_heatmap(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<HeatmapResponse>> {
    let parse_results = receive_and_parse(&state, multipart).await?;
    let response = build_heatmap(&parse_results, &mut rand::thread_rng());
    Ok(Json(response))
}

/// Store the request's files in a fresh batch directory, then parse them.
///
/// The batch directory lives until this function returns.
async fn receive_and_parse(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<Vec<FileParseResult>> {
    let mut batch = UploadBatch::create_in(&state.config.upload_dir).await?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            tracing::debug!(field = ?field.name(), "Ignoring multipart field");
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("file-{}", batch.len()));
        let bytes = field.bytes().await?;
        batch.store(&original_name, &bytes).await?;
    }

    if batch.is_empty() {
        return Err(AppError::BadRequest(format!(
            "No files in multipart field '{}'",
            UPLOAD_FIELD
        )));
    }

    tracing::info!(files = batch.len(), "Received upload");

    let files = batch.list().await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to list upload batch: {}", e))
    })?;
    Ok(state.dispatcher.parse_files(files).await)
}
