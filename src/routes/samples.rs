// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bundled sample activities for trying the map without own files.

use crate::error::Result;
use crate::services::FileFormat;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Sample routes: a listing and the files themselves.
pub fn routes(sample_dir: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/samples", get(list_samples))
        .nest_service("/samples", ServeDir::new(sample_dir))
}

/// List the sample file names.
async fn list_samples(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>> {
    let names = list_sample_files(&state.config.sample_dir).await?;
    Ok(Json(names))
}

/// Names of the FIT and GPX files in `dir`, sorted. A missing directory
/// has no samples.
pub async fn list_sample_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if FileFormat::from_file_name(&name).is_some() {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}
