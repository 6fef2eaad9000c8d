//! Request validation and bounds checking.
//!
//! Every bound here is enforced before storage is touched, and each rejection
//! carries the specific field and value so the boundary layer can produce a
//! field-level error response.

use serde::{Deserialize, Serialize};

/// Maximum length of a sensor identifier.
pub const MAX_SENSOR_ID_LEN: usize = 100;

/// Maximum number of sensor IDs in one batch request.
pub const MAX_BATCH_SENSORS: usize = 100;

/// Maximum lookback window: one year in hours.
pub const MAX_WINDOW_HOURS: f64 = 8760.0;

/// Maximum per-sensor point limit for a batch request.
pub const MAX_POINTS_LIMIT: usize = 10_000;

/// Default per-sensor point limit when the caller does not supply one.
pub const DEFAULT_MAX_POINTS: usize = 500;

/// A request parameter rejected before touching storage.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new rejection
/// reasons in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// Batch request with no sensor IDs.
    #[error("sensor id list is empty")]
    EmptySensorList,

    /// Batch request with more than [`MAX_BATCH_SENSORS`] IDs.
    #[error("sensor id list has {count} entries (max {MAX_BATCH_SENSORS})")]
    TooManySensors { count: usize },

    /// A sensor ID that is empty or whitespace-only.
    #[error("sensor id at index {index} is empty")]
    EmptySensorId { index: usize },

    /// A sensor ID longer than [`MAX_SENSOR_ID_LEN`] characters.
    #[error("sensor id at index {index} is {len} characters long (max {MAX_SENSOR_ID_LEN})")]
    SensorIdTooLong { index: usize, len: usize },

    /// A window that is non-positive or not a finite number.
    #[error("hours must be a positive finite number, got {hours}")]
    InvalidHours { hours: f64 },

    /// A window longer than [`MAX_WINDOW_HOURS`].
    #[error("hours {hours} exceeds maximum {MAX_WINDOW_HOURS} (one year)")]
    HoursTooLarge { hours: f64 },

    /// A point limit outside `1..=MAX_POINTS_LIMIT`.
    #[error("max_points {max_points} is out of range (1-{MAX_POINTS_LIMIT})")]
    MaxPointsOutOfRange { max_points: usize },

    /// A retention cutoff below one day.
    #[error("days_old must be at least 1, got {days}")]
    DaysTooSmall { days: u32 },

    /// An empty sensor ID pattern for a bulk delete.
    #[error("sensor id pattern is empty")]
    EmptyPattern,
}

/// Validate a single sensor ID.
///
/// `index` is the position within a batch request; single-sensor callers pass
/// zero. IDs must be non-empty after trimming and at most
/// [`MAX_SENSOR_ID_LEN`] characters.
pub fn validate_sensor_id(index: usize, sensor_id: &str) -> Result<(), ValidationError> {
    if sensor_id.trim().is_empty() {
        return Err(ValidationError::EmptySensorId { index });
    }

    let len = sensor_id.chars().count();
    if len > MAX_SENSOR_ID_LEN {
        return Err(ValidationError::SensorIdTooLong { index, len });
    }

    Ok(())
}

/// Validate a batch sensor ID list: non-empty, bounded, every ID well-formed.
pub fn validate_sensor_ids(sensor_ids: &[String]) -> Result<(), ValidationError> {
    if sensor_ids.is_empty() {
        return Err(ValidationError::EmptySensorList);
    }

    if sensor_ids.len() > MAX_BATCH_SENSORS {
        return Err(ValidationError::TooManySensors {
            count: sensor_ids.len(),
        });
    }

    for (index, sensor_id) in sensor_ids.iter().enumerate() {
        validate_sensor_id(index, sensor_id)?;
    }

    Ok(())
}

/// Validate a lookback window: positive, finite, at most one year.
pub fn validate_hours(hours: f64) -> Result<(), ValidationError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(ValidationError::InvalidHours { hours });
    }

    if hours > MAX_WINDOW_HOURS {
        return Err(ValidationError::HoursTooLarge { hours });
    }

    Ok(())
}

/// Validate a per-sensor point limit: `1..=MAX_POINTS_LIMIT`.
pub fn validate_max_points(max_points: usize) -> Result<(), ValidationError> {
    if max_points == 0 || max_points > MAX_POINTS_LIMIT {
        return Err(ValidationError::MaxPointsOutOfRange { max_points });
    }

    Ok(())
}

/// Validate a retention cutoff in days.
pub fn validate_days(days: u32) -> Result<(), ValidationError> {
    if days < 1 {
        return Err(ValidationError::DaysTooSmall { days });
    }

    Ok(())
}
