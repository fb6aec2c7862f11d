// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coordinate unit conversion.

/// Degrees per semicircle: a full turn is 2^32 semicircles.
const DEGREES_PER_SEMICIRCLE: f64 = 180.0 / 2_147_483_648.0;

/// Convert a FIT semicircle angle to decimal degrees.
///
/// Takes `i64` so that the `+2^31` boundary (exactly 180 degrees) is
/// representable, even though FIT stores positions as `sint32`.
pub fn semicircles_to_degrees(semicircles: i64) -> f64 {
    semicircles as f64 * DEGREES_PER_SEMICIRCLE
}
