//! Sensor reading and statistics models.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Display name used when a sensor reports no name of its own.
pub const DEFAULT_SENSOR_NAME: &str = "Unknown";

/// A stored sensor observation.
///
/// Timestamps carry the fixed +09:00 offset when returned from the store, so
/// RFC 3339 serialization includes the offset explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Database row ID.
    pub id: i64,
    /// Externally assigned sensor identifier.
    pub sensor_id: String,
    /// Display label for the sensor.
    pub sensor_name: String,
    /// Temperature in Celsius.
    pub temperature: f64,
    /// Relative humidity percentage, if the sensor reports it.
    pub humidity: Option<f64>,
    /// Signal strength in dBm. Present only for direct AP association.
    pub rssi: Option<i32>,
    /// Whether the sensor was running on battery.
    pub battery_mode: bool,
    /// When this reading was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

/// Payload for inserting a new reading.
///
/// Follows the builder pattern; only `sensor_id` and `temperature` are
/// required. The store assigns the timestamp unless `recorded_at` is set
/// explicitly (tests and backfill use this).
///
/// # Example
///
/// ```
/// use thermolog_types::NewReading;
///
/// let reading = NewReading::new("esp32-attic", 28.3)
///     .sensor_name("Attic")
///     .humidity(55.0)
///     .rssi(-72)
///     .battery_mode(true);
///
/// assert_eq!(reading.sensor_name.as_deref(), Some("Attic"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReading {
    /// Externally assigned sensor identifier.
    pub sensor_id: String,
    /// Display label; the store falls back to [`DEFAULT_SENSOR_NAME`].
    pub sensor_name: Option<String>,
    /// Temperature in Celsius.
    pub temperature: f64,
    /// Relative humidity percentage.
    pub humidity: Option<f64>,
    /// Signal strength in dBm.
    pub rssi: Option<i32>,
    /// Whether the sensor was running on battery.
    pub battery_mode: bool,
    /// Explicit timestamp; store-assigned when `None`.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub recorded_at: Option<OffsetDateTime>,
}

impl NewReading {
    /// Create a payload with the required fields only.
    pub fn new(sensor_id: &str, temperature: f64) -> Self {
        Self {
            sensor_id: sensor_id.to_string(),
            sensor_name: None,
            temperature,
            humidity: None,
            rssi: None,
            battery_mode: false,
            recorded_at: None,
        }
    }

    /// Set the display name.
    pub fn sensor_name(mut self, name: &str) -> Self {
        self.sensor_name = Some(name.to_string());
        self
    }

    /// Set the humidity percentage.
    pub fn humidity(mut self, humidity: f64) -> Self {
        self.humidity = Some(humidity);
        self
    }

    /// Set the signal strength.
    pub fn rssi(mut self, rssi: i32) -> Self {
        self.rssi = Some(rssi);
        self
    }

    /// Set the battery-mode flag.
    pub fn battery_mode(mut self, battery_mode: bool) -> Self {
        self.battery_mode = battery_mode;
        self
    }

    /// Record at an explicit instant instead of the store-assigned time.
    pub fn recorded_at(mut self, ts: OffsetDateTime) -> Self {
        self.recorded_at = Some(ts);
        self
    }
}

/// Aggregate values over a window with at least one reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsAggregate {
    /// Mean temperature in Celsius.
    pub avg: f64,
    /// Minimum temperature in Celsius.
    pub min: f64,
    /// Maximum temperature in Celsius.
    pub max: f64,
}

/// Statistics over a sensor's raw readings within a window.
///
/// `aggregate` is `None` exactly when `count` is zero. The explicit no-data
/// marker keeps callers from misreading a NaN or zero as a measurement.
/// Statistics are always computed from the full raw window, never from a
/// downsampled point set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorStats {
    /// Number of raw readings in the window.
    pub count: u64,
    /// Aggregates, present when `count > 0`.
    #[serde(flatten)]
    pub aggregate: Option<StatsAggregate>,
}

impl SensorStats {
    /// Statistics for a window with no readings.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the window contained no readings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_new_reading_defaults() {
        let reading = NewReading::new("s1", 20.0);
        assert_eq!(reading.sensor_id, "s1");
        assert_eq!(reading.temperature, 20.0);
        assert!(reading.sensor_name.is_none());
        assert!(reading.humidity.is_none());
        assert!(reading.rssi.is_none());
        assert!(!reading.battery_mode);
        assert!(reading.recorded_at.is_none());
    }

    #[test]
    fn test_new_reading_builder_chain() {
        let ts = datetime!(2025-03-01 12:00:00 +9);
        let reading = NewReading::new("s1", 20.0)
            .sensor_name("Living Room")
            .humidity(40.5)
            .rssi(-55)
            .battery_mode(true)
            .recorded_at(ts);

        assert_eq!(reading.sensor_name.as_deref(), Some("Living Room"));
        assert_eq!(reading.humidity, Some(40.5));
        assert_eq!(reading.rssi, Some(-55));
        assert!(reading.battery_mode);
        assert_eq!(reading.recorded_at, Some(ts));
    }

    #[test]
    fn test_empty_stats() {
        let stats = SensorStats::empty();
        assert_eq!(stats.count, 0);
        assert!(stats.aggregate.is_none());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_stats_serialization_flattens_aggregate() {
        let stats = SensorStats {
            count: 3,
            aggregate: Some(StatsAggregate {
                avg: 21.0,
                min: 19.5,
                max: 23.0,
            }),
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["avg"], 21.0);
        assert_eq!(json["min"], 19.5);
        assert_eq!(json["max"], 23.0);
    }

    #[test]
    fn test_empty_stats_serialization_omits_aggregate() {
        let json = serde_json::to_value(SensorStats::empty()).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json.get("avg").is_none());
    }

    #[test]
    fn test_reading_serializes_timestamp_with_offset() {
        let reading = Reading {
            id: 1,
            sensor_id: "s1".to_string(),
            sensor_name: "Unknown".to_string(),
            temperature: 22.5,
            humidity: None,
            rssi: None,
            battery_mode: false,
            recorded_at: datetime!(2025-12-24 09:15:40 +9),
        };

        let json = serde_json::to_string(&reading).unwrap();
        assert!(json.contains("2025-12-24T09:15:40+09:00"));
    }
}
