//! Asset condition scale shared by inspections, assets, and the 3D sync.
//!
//! Inspections grade severity on a 1-4 scale where 1 is the worst. The same
//! number becomes the asset's `condition_score`, and the label below becomes
//! its `condition_status`.

use crate::error::CoreError;

pub const CONDITION_CRITICAL: &str = "Critical";
pub const CONDITION_POOR: &str = "Poor";
pub const CONDITION_FAIR: &str = "Fair";
pub const CONDITION_GOOD: &str = "Good";
pub const CONDITION_UNKNOWN: &str = "Unknown";

/// Lowest (worst) score on the scale.
pub const MIN_SCORE: i32 = 1;

/// Highest (best) score on the scale.
pub const MAX_SCORE: i32 = 4;

/// Labels accepted for `condition_status`.
pub const VALID_CONDITION_STATUSES: &[&str] = &[
    CONDITION_CRITICAL,
    CONDITION_POOR,
    CONDITION_FAIR,
    CONDITION_GOOD,
];

/// Viewport color for objects without a usable score.
pub const NEUTRAL_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

/// Map an inspection severity to the asset condition label.
pub fn status_for_severity(severity: i32) -> &'static str {
    match severity {
        1 => CONDITION_CRITICAL,
        2 => CONDITION_POOR,
        3 => CONDITION_FAIR,
        4 => CONDITION_GOOD,
        _ => CONDITION_UNKNOWN,
    }
}

/// Reject scores outside `1..=4`.
pub fn validate_score(field: &str, score: i32) -> Result<(), CoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be between {MIN_SCORE} and {MAX_SCORE}, got {score}"
        )))
    }
}

/// Reject condition labels that are not on the scale.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_CONDITION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid condition_status '{status}'. Must be one of: {VALID_CONDITION_STATUSES:?}"
        )))
    }
}

/// RGB color (0.0-1.0 per channel) the 3D add-on paints an object with.
pub fn viewport_color(score: Option<i32>) -> [f32; 3] {
    match score {
        Some(1) => [1.0, 0.0, 0.0],
        Some(2) => [1.0, 0.5, 0.0],
        Some(3) => [1.0, 1.0, 0.0],
        Some(4) => [0.0, 1.0, 0.0],
        _ => NEUTRAL_COLOR,
    }
}
