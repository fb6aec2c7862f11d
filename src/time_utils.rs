// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Point timestamp normalization.
//!
//! FIT and GPX carry times in different zones and precisions; every point
//! timestamp leaves the server as whole-second RFC 3339 in UTC.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Re-express an RFC 3339 string with any offset in the canonical UTC form.
pub fn normalize_rfc3339(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| format_utc_rfc3339(dt.with_timezone(&Utc)))
}
