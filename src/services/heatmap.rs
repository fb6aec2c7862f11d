// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Point validation and heatmap assembly.

use crate::models::{Bounds, FileParseResult, FileSummary, GeoPoint, HeatPoint, HeatmapResponse};
use geo::{BoundingRect, MultiPoint, Point};
use rand::seq::SliceRandom;
use rand::Rng;

/// Whether a position can be placed on a web map.
pub fn is_valid_position(lat: f64, long: f64) -> bool {
    lat.is_finite()
        && long.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&long)
}

/// Points split by [`is_valid_position`], both halves in traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointClassification {
    pub valid_points: Vec<HeatPoint>,
    pub invalid_points: Vec<HeatPoint>,
}

/// Partition points into valid and invalid heatmap triples.
pub fn classify_points<'a, I>(points: I) -> PointClassification
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let mut classification = PointClassification::default();
    for point in points {
        let heat_point = HeatPoint::from(point);
        if is_valid_position(point.lat, point.long) {
            classification.valid_points.push(heat_point);
        } else {
            classification.invalid_points.push(heat_point);
        }
    }
    classification
}

impl PointClassification {
    pub fn total(&self) -> usize {
        self.valid_points.len() + self.invalid_points.len()
    }

    /// Share of valid points, 0-100. `None` when there are no points.
    pub fn percent_valid(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.valid_points.len() as f64 / total as f64 * 100.0),
        }
    }

    /// Pick the initial map center uniformly among the valid points.
    pub fn pick_center<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<HeatPoint> {
        self.valid_points.choose(rng).copied()
    }

    /// Bounding box of the valid points.
    pub fn bounds(&self) -> Option<Bounds> {
        let points: MultiPoint<f64> = self
            .valid_points
            .iter()
            .map(|p| Point::new(p.long(), p.lat()))
            .collect();

        points.bounding_rect().map(|rect| Bounds {
            south: rect.min().y,
            west: rect.min().x,
            north: rect.max().y,
            east: rect.max().x,
        })
    }
}

/// Classify every point of every parsed file and assemble the map payload.
pub fn build_heatmap<R: Rng + ?Sized>(
    results: &[FileParseResult],
    rng: &mut R,
) -> HeatmapResponse {
    let classification = classify_points(results.iter().flat_map(FileParseResult::points));

    tracing::info!(
        valid = classification.valid_points.len(),
        invalid = classification.invalid_points.len(),
        percent_valid = classification.percent_valid().unwrap_or(0.0),
        "Classified points"
    );

    let center = classification.pick_center(rng);
    let bounds = classification.bounds();

    HeatmapResponse {
        invalid_count: classification.invalid_points.len(),
        valid_points: classification.valid_points,
        center,
        bounds,
        parse_results: results.iter().map(FileSummary::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_range_checks() {
        assert!(is_valid_position(0.0, 0.0));
        assert!(is_valid_position(90.0, 180.0));
        assert!(is_valid_position(-90.0, -180.0));
        assert!(!is_valid_position(90.000_001, 0.0));
        assert!(!is_valid_position(0.0, -180.000_001));
        assert!(!is_valid_position(f64::NAN, 0.0));
        assert!(!is_valid_position(0.0, f64::INFINITY));
    }

    #[test]
    fn test_classification_keeps_order() {
        let points = vec![
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(100.0, 1.0),
            GeoPoint::new(2.0, 2.0),
            GeoPoint::new(f64::NAN, 2.0),
            GeoPoint::new(3.0, 3.0),
        ];
        let classification = classify_points(&points);

        let valid_lats: Vec<f64> = classification.valid_points.iter().map(|p| p.lat()).collect();
        assert_eq!(valid_lats, vec![1.0, 2.0, 3.0]);
        assert_eq!(classification.invalid_points.len(), 2);
        assert_eq!(classification.invalid_points[0], HeatPoint(100.0, 1.0, 1.0));
        assert_eq!(classification.percent_valid(), Some(60.0));
    }

    #[test]
    fn test_center_is_a_valid_point() {
        let points: Vec<GeoPoint> = (0..20).map(|i| GeoPoint::new(i as f64, 0.0)).collect();
        let classification = classify_points(&points);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let center = classification.pick_center(&mut rng).unwrap();
            assert!(classification.valid_points.contains(&center));
        }
    }

    #[test]
    fn test_no_valid_points() {
        let points = vec![GeoPoint::new(91.0, 0.0)];
        let classification = classify_points(&points);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(classification.pick_center(&mut rng), None);
        assert_eq!(classification.bounds(), None);
        assert_eq!(classify_points(&[]).percent_valid(), None);
    }

    #[test]
    fn test_bounds() {
        let points = vec![
            GeoPoint::new(45.0, -122.0),
            GeoPoint::new(46.5, -121.0),
            GeoPoint::new(44.0, -123.5),
            GeoPoint::new(95.0, 0.0),
        ];
        let bounds = classify_points(&points).bounds().unwrap();
        assert_eq!(
            bounds,
            Bounds {
                south: 44.0,
                west: -123.5,
                north: 46.5,
                east: -121.0
            }
        );
    }

    #[test]
    fn test_build_heatmap_skips_failed_files() {
        use crate::models::ErrorInfo;

        let results = vec![
            FileParseResult::parsed("a.gpx", vec![GeoPoint::new(10.0, 20.0)]),
            FileParseResult::failed(
                "b.fit",
                ErrorInfo {
                    kind: "decode_failed".into(),
                    message: "bad".into(),
                },
            ),
            FileParseResult::parsed("c.gpx", vec![GeoPoint::new(10.0, 200.0)]),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        let response = build_heatmap(&results, &mut rng);

        assert_eq!(response.valid_points, vec![HeatPoint(10.0, 20.0, 1.0)]);
        assert_eq!(response.invalid_count, 1);
        assert_eq!(response.center, Some(HeatPoint(10.0, 20.0, 1.0)));
        assert_eq!(response.parse_results.len(), 3);
        let error = response.parse_results[1].error.as_ref().unwrap();
        assert_eq!(error.kind, "decode_failed");
        assert_eq!(error.message, "bad");
        assert_eq!(response.parse_results[2].points, 1);
    }
}
