// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity heatmap: turn uploaded FIT and GPX files into heatmap points.
//!
//! This crate provides the backend API that decodes uploaded activity
//! files, extracts their GPS positions and prepares them for a map layer.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod units;

use config::Config;
use services::FileDispatcher;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub dispatcher: FileDispatcher,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let dispatcher = FileDispatcher::new(config.fit_decode_options());
        Self { config, dispatcher }
    }
}
