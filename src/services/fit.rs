// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FIT decoding and point extraction.
//!
//! `fitparser` yields a flat list of messages. We cascade it into the
//! activity → sessions → laps → records tree that devices write: records
//! accumulate until a `lap` message closes them into a lap, and laps
//! accumulate until a `session` message closes them into a session.

use crate::models::GeoPoint;
use crate::services::track::{extract_points, PositionSample};
use crate::time_utils::format_utc_rfc3339;
use crate::units::semicircles_to_degrees;
use chrono::{DateTime, Utc};
use fitparser::de::{from_bytes_with_options, DecodeOption};
use fitparser::profile::MesgNum;
use fitparser::{FitDataRecord, Value};
use std::collections::HashSet;

/// Decoder settings.
///
/// `fitparser` already reports lengths in meters, speeds in m/s and
/// temperatures in Celsius, so only CRC handling is configurable.
#[derive(Debug, Clone)]
pub struct FitDecodeOptions {
    /// Decode files whose header or data CRC does not match.
    pub force: bool,
}

impl Default for FitDecodeOptions {
    fn default() -> Self {
        Self { force: true }
    }
}

impl FitDecodeOptions {
    fn decode_options(&self) -> HashSet<DecodeOption> {
        let mut options = HashSet::new();
        if self.force {
            options.insert(DecodeOption::SkipHeaderCrcValidation);
            options.insert(DecodeOption::SkipDataCrcValidation);
        }
        options
    }
}

/// Decoded FIT activity.
#[derive(Debug, Clone, Default)]
pub struct FitActivity {
    sessions: Vec<FitSession>,
}

#[derive(Debug, Clone, Default)]
pub struct FitSession {
    laps: Vec<FitLap>,
}

#[derive(Debug, Clone, Default)]
pub struct FitLap {
    records: Vec<FitRecord>,
}

/// One `record` message. Positions are kept in semicircles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitRecord {
    position_lat: Option<i64>,
    position_long: Option<i64>,
    timestamp: Option<DateTime<Utc>>,
    altitude: Option<f64>,
    heart_rate: Option<f64>,
}

impl FitActivity {
    pub fn new(sessions: Vec<FitSession>) -> Self {
        Self { sessions }
    }

    /// Cascade a decoded message stream into sessions, laps and records.
    pub fn from_messages<I>(messages: I) -> Self
    where
        I: IntoIterator<Item = FitDataRecord>,
    {
        let mut sessions = Vec::new();
        let mut pending_laps = Vec::new();
        let mut pending_records = Vec::new();

        for message in messages {
            match message.kind() {
                MesgNum::Record => pending_records.push(FitRecord::from_message(&message)),
                MesgNum::Lap => pending_laps.push(FitLap {
                    records: std::mem::take(&mut pending_records),
                }),
                MesgNum::Session => sessions.push(FitSession {
                    laps: std::mem::take(&mut pending_laps),
                }),
                _ => {}
            }
        }

        if !pending_records.is_empty() || !pending_laps.is_empty() {
            tracing::debug!(
                records = pending_records.len(),
                laps = pending_laps.len(),
                "Dropping FIT messages not closed by a lap or session"
            );
        }

        Self { sessions }
    }

    pub fn sessions(&self) -> &[FitSession] {
        &self.sessions
    }

    /// Every record of every lap of every session, in document order.
    pub fn records(&self) -> impl Iterator<Item = &FitRecord> {
        self.sessions
            .iter()
            .flat_map(FitSession::laps)
            .flat_map(FitLap::records)
    }
}

impl FitSession {
    pub fn new(laps: Vec<FitLap>) -> Self {
        Self { laps }
    }

    pub fn laps(&self) -> &[FitLap] {
        &self.laps
    }
}

impl FitLap {
    pub fn new(records: Vec<FitRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FitRecord] {
        &self.records
    }
}

impl FitRecord {
    /// A record at the given position, in semicircles.
    pub fn at(position_lat: i64, position_long: i64) -> Self {
        Self {
            position_lat: Some(position_lat),
            position_long: Some(position_long),
            ..Self::default()
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_altitude(mut self, meters: f64) -> Self {
        self.altitude = Some(meters);
        self
    }

    pub fn with_heart_rate(mut self, bpm: f64) -> Self {
        self.heart_rate = Some(bpm);
        self
    }

    fn from_message(message: &FitDataRecord) -> Self {
        let mut record = Self::default();
        let mut enhanced_altitude = None;

        for field in message.fields() {
            match field.name() {
                "position_lat" => record.position_lat = value_as_i64(field.value()),
                "position_long" => record.position_long = value_as_i64(field.value()),
                "timestamp" => {
                    if let Value::Timestamp(ts) = field.value() {
                        record.timestamp = Some(ts.with_timezone(&Utc));
                    }
                }
                "altitude" => record.altitude = value_as_f64(field.value()),
                "enhanced_altitude" => enhanced_altitude = value_as_f64(field.value()),
                "heart_rate" => record.heart_rate = value_as_f64(field.value()),
                _ => {}
            }
        }

        if enhanced_altitude.is_some() {
            record.altitude = enhanced_altitude;
        }
        record
    }
}

impl PositionSample for FitRecord {
    fn latitude(&self) -> Option<f64> {
        self.position_lat.map(semicircles_to_degrees)
    }

    fn longitude(&self) -> Option<f64> {
        self.position_long.map(semicircles_to_degrees)
    }

    fn timestamp(&self) -> Option<String> {
        self.timestamp.map(format_utc_rfc3339)
    }

    fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    fn heart_rate(&self) -> Option<f64> {
        self.heart_rate
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::SInt32(v) => Some(i64::from(*v)),
        Value::SInt16(v) => Some(i64::from(*v)),
        Value::SInt64(v) => Some(*v),
        Value::UInt32(v) => Some(i64::from(*v)),
        Value::Float64(v) if v.is_finite() => Some(v.round() as i64),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float32(v) => Some(f64::from(*v)),
        Value::Float64(v) => Some(*v),
        Value::SInt8(v) => Some(f64::from(*v)),
        Value::UInt8(v) => Some(f64::from(*v)),
        Value::UInt8z(v) => Some(f64::from(*v)),
        Value::Byte(v) => Some(f64::from(*v)),
        Value::SInt16(v) => Some(f64::from(*v)),
        Value::UInt16(v) => Some(f64::from(*v)),
        Value::UInt16z(v) => Some(f64::from(*v)),
        Value::SInt32(v) => Some(f64::from(*v)),
        Value::UInt32(v) => Some(f64::from(*v)),
        Value::UInt32z(v) => Some(f64::from(*v)),
        _ => None,
    }
}

/// Decode a FIT file into an activity tree.
pub fn decode_fit(bytes: &[u8], options: &FitDecodeOptions) -> Result<FitActivity, FitError> {
    let messages = from_bytes_with_options(bytes, &options.decode_options())
        .map_err(|e| FitError::Decode(e.to_string()))?;
    Ok(FitActivity::from_messages(messages))
}

/// Points from every record that carries both coordinates.
pub fn fit_points(activity: &FitActivity) -> impl Iterator<Item = GeoPoint> + '_ {
    extract_points(activity.records())
}

/// Errors from FIT decoding.
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    #[error("Failed to decode FIT file: {0}")]
    Decode(String),
}
