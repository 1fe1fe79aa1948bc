//! `Range` field grammar
//!
//! A range value is either a literal from the `RangeOptions` enum group, or
//! one or two timepoints joined by `...`:
//!
//! ```text
//! NOW-3d...NOW        ADM@08:00...DIS+1d        PAS...        FUT
//! ```
//!
//! A timepoint is an anchor token, an optional signed offset with a unit
//! letter (`s n m h d w q y`) and an optional `@HH:MM` clock time. Matching
//! is case-insensitive. Only the shape is checked, not the unit meaning.

use std::sync::OnceLock;

use regex::Regex;

use crate::schema::Schema;

/// Enum group whose members are always valid ranges
pub const RANGE_OPTIONS_GROUP: &str = "RangeOptions";

/// Interval separator
const INTERVAL: &str = "...";

fn timepoint_re() -> &'static Regex {
    static TIMEPOINT_RE: OnceLock<Regex> = OnceLock::new();
    TIMEPOINT_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(CTX|NOW|ADM|DIS|PAS|FUT|FOS|LOE|PK0|PKN|BDT|SOT|DSF|DSU)([+-]?\d+[snmhdwqy])?(@\d{2}:\d{2})?$",
        )
        .unwrap()
    })
}

/// Check whether a single timepoint expression is well formed
pub fn is_valid_timepoint(segment: &str) -> bool {
    timepoint_re().is_match(segment)
}

/// Check a value of the `Range` field.
///
/// Empty segments (`NOW...`, `...NOW`) are open ends and accepted; more
/// than one `...` is rejected.
pub fn is_valid_range(value: &str, schema: &Schema) -> bool {
    let is_option = schema
        .enum_values(RANGE_OPTIONS_GROUP)
        .is_some_and(|options| options.iter().any(|o| o == value));
    if is_option {
        return true;
    }

    let segments: Vec<&str> = value.split(INTERVAL).collect();
    if segments.len() > 2 {
        return false;
    }

    segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .all(is_valid_timepoint)
}
