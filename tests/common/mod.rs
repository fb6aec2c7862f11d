// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_heatmap::config::Config;
use activity_heatmap::routes::create_router;
use activity_heatmap::AppState;
use std::sync::Arc;
use tempfile::TempDir;

/// Create a test app whose uploads land in a private temporary directory.
/// Returns the router, the shared state and the directory guard.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, TempDir) {
    create_test_app_with(|_| {})
}

/// Same as [`create_test_app`], with a hook to adjust the config.
#[allow(dead_code)]
pub fn create_test_app_with(
    configure: impl FnOnce(&mut Config),
) -> (axum::Router, Arc<AppState>, TempDir) {
    let upload_root = tempfile::tempdir().expect("Failed to create upload root");

    let mut config = Config::test_default();
    config.upload_dir = upload_root.path().to_path_buf();
    configure(&mut config);

    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state, upload_root)
}

// ─── FIT fixtures ────────────────────────────────────────────

const MESG_SESSION: u16 = 18;
const MESG_LAP: u16 = 19;
const MESG_RECORD: u16 = 20;

const BASE_UINT8: u8 = 0x02;
const BASE_UINT16: u8 = 0x84;
const BASE_SINT32: u8 = 0x85;
const BASE_UINT32: u8 = 0x86;

const FIELD_TIMESTAMP: u8 = 253;

/// Contents of one FIT `record` message.
#[derive(Debug, Clone, Copy, Default)]
#[allow(dead_code)]
pub struct RecordFields {
    pub position_lat: Option<i32>,
    pub position_long: Option<i32>,
    /// Meters
    pub altitude: Option<f64>,
    pub heart_rate: Option<u8>,
}

#[allow(dead_code)]
impl RecordFields {
    pub fn at(position_lat: i32, position_long: i32) -> Self {
        Self {
            position_lat: Some(position_lat),
            position_long: Some(position_long),
            ..Self::default()
        }
    }
}

/// Writes minimal but well-formed FIT activity files.
///
/// Every message is preceded by its own definition on local type 0, which
/// keeps field sets per message arbitrary.
#[allow(dead_code)]
pub struct FitFileBuilder {
    data: Vec<u8>,
    timestamp: u32,
}

#[allow(dead_code)]
impl FitFileBuilder {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            // 2024-01-01T00:00:00Z in seconds since the FIT epoch (1989-12-31)
            timestamp: 1_073_001_600,
        }
    }

    /// Timestamp that the next message will carry.
    pub fn next_timestamp(&self) -> u32 {
        self.timestamp
    }

    pub fn record(mut self, fields: RecordFields) -> Self {
        let mut defs = vec![(FIELD_TIMESTAMP, 4, BASE_UINT32)];
        let mut values = self.timestamp.to_le_bytes().to_vec();

        if let Some(lat) = fields.position_lat {
            defs.push((0, 4, BASE_SINT32));
            values.extend_from_slice(&lat.to_le_bytes());
        }
        if let Some(long) = fields.position_long {
            defs.push((1, 4, BASE_SINT32));
            values.extend_from_slice(&long.to_le_bytes());
        }
        if let Some(altitude) = fields.altitude {
            // scale 5, offset 500
            let raw = ((altitude + 500.0) * 5.0).round() as u16;
            defs.push((2, 2, BASE_UINT16));
            values.extend_from_slice(&raw.to_le_bytes());
        }
        if let Some(hr) = fields.heart_rate {
            defs.push((3, 1, BASE_UINT8));
            values.push(hr);
        }

        self.message(MESG_RECORD, &defs, &values);
        self.timestamp += 1;
        self
    }

    pub fn lap(mut self) -> Self {
        let values = self.timestamp.to_le_bytes();
        self.message(MESG_LAP, &[(FIELD_TIMESTAMP, 4, BASE_UINT32)], &values);
        self
    }

    pub fn session(mut self) -> Self {
        let values = self.timestamp.to_le_bytes();
        self.message(MESG_SESSION, &[(FIELD_TIMESTAMP, 4, BASE_UINT32)], &values);
        self
    }

    fn message(&mut self, global: u16, defs: &[(u8, u8, u8)], values: &[u8]) {
        // Definition message, local type 0, little endian
        self.data.push(0x40);
        self.data.push(0);
        self.data.push(0);
        self.data.extend_from_slice(&global.to_le_bytes());
        self.data.push(defs.len() as u8);
        for (number, size, base_type) in defs {
            self.data.extend_from_slice(&[*number, *size, *base_type]);
        }

        // Data message, local type 0
        self.data.push(0x00);
        self.data.extend_from_slice(values);
    }

    pub fn build(self) -> Vec<u8> {
        let mut file = Vec::with_capacity(14 + self.data.len() + 2);
        file.push(14);
        file.push(0x10);
        file.extend_from_slice(&2132u16.to_le_bytes());
        file.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        file.extend_from_slice(b".FIT");
        let header_crc = fit_crc(&file);
        file.extend_from_slice(&header_crc.to_le_bytes());

        file.extend_from_slice(&self.data);
        let crc = fit_crc(&file);
        file.extend_from_slice(&crc.to_le_bytes());
        file
    }
}

/// FIT CRC-16.
fn fit_crc(bytes: &[u8]) -> u16 {
    const CRC_TABLE: [u16; 16] = [
        0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
        0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
    ];

    bytes.iter().fold(0u16, |mut crc, &byte| {
        let tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ CRC_TABLE[(byte & 0xF) as usize];

        let tmp = CRC_TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc ^ tmp ^ CRC_TABLE[((byte >> 4) & 0xF) as usize]
    })
}

/// Single session, single lap, two positioned records.
#[allow(dead_code)]
pub fn simple_fit() -> Vec<u8> {
    FitFileBuilder::new()
        .record(RecordFields::at(1 << 29, -(1 << 29)))
        .record(RecordFields::at(1 << 28, 1 << 28))
        .lap()
        .session()
        .build()
}

// ─── GPX fixtures ────────────────────────────────────────────

#[allow(dead_code)]
pub const SIMPLE_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Morning Ride</name>
    <trkseg>
      <trkpt lat="37.3861" lon="-122.0839">
        <ele>30.5</ele>
        <time>2024-03-02T16:00:00Z</time>
      </trkpt>
      <trkpt lat="37.3870" lon="-122.0850">
        <ele>31.0</ele>
        <time>2024-03-02T16:00:05Z</time>
      </trkpt>
    </trkseg>
  </trk>
</gpx>"#;

/// One segment: a good point, a latitude-only point, an out-of-range point
/// and another good point.
#[allow(dead_code)]
pub const GAPPY_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
      <trkpt lat="45.0" lon="-120.0"><time>2024-03-02T16:00:00Z</time></trkpt>
      <trkpt lat="46.0"><time>2024-03-02T16:00:01Z</time></trkpt>
      <trkpt lat="95.0" lon="-120.5"><time>2024-03-02T16:00:02Z</time></trkpt>
      <trkpt lat="47.0" lon="-121.0"><time>2024-03-02T16:00:03Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

// ─── Multipart ───────────────────────────────────────────────

#[allow(dead_code)]
pub const BOUNDARY: &str = "heatmap-test-boundary";

/// Build a `multipart/form-data` body with one part per file.
/// Returns the content type header value and the body.
#[allow(dead_code)]
pub fn multipart_body(field: &str, files: &[(&str, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, content) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}
