// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GPX decoding and point extraction.
//!
//! The reader walks `trk/trkseg/trkpt` leniently: a waypoint with a missing
//! or unparsable coordinate is kept with that coordinate absent, and
//! coordinates are passed through as-is, so skipping and range checks
//! happen downstream. Only malformed XML fails the whole file.

use crate::models::GeoPoint;
use crate::services::track::{extract_points, PositionSample};
use crate::time_utils::normalize_rfc3339;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Decoded GPX document, reduced to its tracks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpxDocument {
    tracks: Vec<GpxTrack>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpxTrack {
    segments: Vec<GpxSegment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpxSegment {
    points: Vec<GpxWaypoint>,
}

/// One `<trkpt>`, exactly as written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpxWaypoint {
    lat: Option<f64>,
    lon: Option<f64>,
    elevation: Option<f64>,
    time: Option<String>,
}

impl GpxDocument {
    pub fn tracks(&self) -> &[GpxTrack] {
        &self.tracks
    }

    fn push_point(&mut self, waypoint: GpxWaypoint) {
        if let Some(segment) = self
            .tracks
            .last_mut()
            .and_then(|track| track.segments.last_mut())
        {
            segment.points.push(waypoint);
        }
    }
}

impl GpxTrack {
    pub fn segments(&self) -> &[GpxSegment] {
        &self.segments
    }
}

impl GpxSegment {
    pub fn points(&self) -> &[GpxWaypoint] {
        &self.points
    }
}

impl GpxWaypoint {
    fn from_element(element: &BytesStart) -> Self {
        let mut waypoint = Self::default();
        for attr in element.attributes().flatten() {
            let value = attr
                .unescape_value()
                .ok()
                .and_then(|v| v.trim().parse::<f64>().ok());
            match attr.key.local_name().as_ref() {
                b"lat" => waypoint.lat = value,
                b"lon" => waypoint.lon = value,
                _ => {}
            }
        }
        waypoint
    }
}

impl PositionSample for GpxWaypoint {
    fn latitude(&self) -> Option<f64> {
        self.lat
    }

    fn longitude(&self) -> Option<f64> {
        self.lon
    }

    fn timestamp(&self) -> Option<String> {
        self.time.as_deref().and_then(normalize_rfc3339)
    }

    fn altitude(&self) -> Option<f64> {
        self.elevation
    }
}

/// Child of `<trkpt>` whose text we keep.
#[derive(Debug, Clone, Copy)]
enum PointField {
    Elevation,
    Time,
}

impl PointField {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"ele" => Some(PointField::Elevation),
            b"time" => Some(PointField::Time),
            _ => None,
        }
    }
}

/// A `<trkpt>` whose end tag has not been read yet.
struct OpenPoint {
    waypoint: GpxWaypoint,
    /// Element nesting below the `<trkpt>` itself
    depth: usize,
    field: Option<PointField>,
}

impl OpenPoint {
    fn set_text(&mut self, text: &str) {
        match self.field {
            Some(PointField::Elevation) => self.waypoint.elevation = text.trim().parse().ok(),
            Some(PointField::Time) => self.waypoint.time = Some(text.trim().to_string()),
            None => {}
        }
    }
}

fn check_root(seen_root: &mut bool, element: &BytesStart) -> Result<(), GpxError> {
    if !*seen_root {
        if element.local_name().as_ref() != b"gpx" {
            return Err(GpxError::Decode(format!(
                "unexpected root element <{}>",
                String::from_utf8_lossy(element.name().as_ref())
            )));
        }
        *seen_root = true;
    }
    Ok(())
}

/// Parse GPX text into a document tree.
pub fn decode_gpx(text: &str) -> Result<GpxDocument, GpxError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut doc = GpxDocument::default();
    let mut seen_root = false;
    let mut open_elements = 0usize;
    let mut in_track = false;
    let mut in_segment = false;
    let mut point: Option<OpenPoint> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            GpxError::Decode(format!("{} at byte {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => {
                check_root(&mut seen_root, &e)?;
                open_elements += 1;

                if let Some(open) = point.as_mut() {
                    open.depth += 1;
                    open.field = if open.depth == 1 {
                        PointField::from_name(e.local_name().as_ref())
                    } else {
                        None
                    };
                } else {
                    match e.local_name().as_ref() {
                        b"trk" => {
                            doc.tracks.push(GpxTrack::default());
                            in_track = true;
                        }
                        b"trkseg" if in_track => {
                            if let Some(track) = doc.tracks.last_mut() {
                                track.segments.push(GpxSegment::default());
                            }
                            in_segment = true;
                        }
                        b"trkpt" if in_segment => {
                            point = Some(OpenPoint {
                                waypoint: GpxWaypoint::from_element(&e),
                                depth: 0,
                                field: None,
                            });
                        }
                        _ => {}
                    }
                }
            }
            Event::Empty(e) => {
                check_root(&mut seen_root, &e)?;
                if point.is_none() {
                    match e.local_name().as_ref() {
                        b"trk" => doc.tracks.push(GpxTrack::default()),
                        b"trkseg" if in_track => {
                            if let Some(track) = doc.tracks.last_mut() {
                                track.segments.push(GpxSegment::default());
                            }
                        }
                        b"trkpt" if in_segment => doc.push_point(GpxWaypoint::from_element(&e)),
                        _ => {}
                    }
                }
            }
            Event::Text(e) => {
                if let Some(open) = point.as_mut() {
                    if open.depth == 1 && open.field.is_some() {
                        let text = e.unescape().map_err(|e| GpxError::Decode(e.to_string()))?;
                        open.set_text(&text);
                    }
                }
            }
            Event::End(e) => {
                open_elements = open_elements.saturating_sub(1);

                let closes_point = matches!(&point, Some(open) if open.depth == 0);
                if closes_point {
                    if let Some(open) = point.take() {
                        doc.push_point(open.waypoint);
                    }
                } else if let Some(open) = point.as_mut() {
                    open.depth -= 1;
                    open.field = None;
                } else {
                    match e.local_name().as_ref() {
                        b"trk" => in_track = false,
                        b"trkseg" => in_segment = false,
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(GpxError::Decode("missing <gpx> root element".to_string()));
    }
    if open_elements > 0 {
        return Err(GpxError::Decode("unexpected end of document".to_string()));
    }
    Ok(doc)
}

/// Decode raw file content, which must be UTF-8.
pub fn decode_gpx_bytes(bytes: &[u8]) -> Result<GpxDocument, GpxError> {
    let text = std::str::from_utf8(bytes).map_err(|e| GpxError::Encoding(e.to_string()))?;
    decode_gpx(text)
}

/// Points from every waypoint of every segment of every track.
pub fn gpx_points(doc: &GpxDocument) -> impl Iterator<Item = GeoPoint> + '_ {
    extract_points(
        doc.tracks()
            .iter()
            .flat_map(GpxTrack::segments)
            .flat_map(GpxSegment::points),
    )
}

/// Errors from GPX decoding.
#[derive(Debug, thiserror::Error)]
pub enum GpxError {
    #[error("GPX file is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("Failed to parse GPX: {0}")]
    Decode(String),
}
