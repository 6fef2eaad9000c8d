//! Shared types for thermolog sensor data.
//!
//! This crate provides the data model used by the storage and query-engine
//! crates: sensor readings, insert payloads, per-window statistics, and the
//! fixed-offset (JST) time helpers used at serialization boundaries.
//!
//! # Example
//!
//! ```
//! use thermolog_types::{NewReading, jst};
//!
//! let reading = NewReading::new("esp32-kitchen", 21.5)
//!     .sensor_name("Kitchen")
//!     .humidity(48.0)
//!     .rssi(-61);
//!
//! assert_eq!(reading.sensor_id, "esp32-kitchen");
//! let _now = jst::now();
//! ```

pub mod jst;
pub mod reading;

pub use reading::{DEFAULT_SENSOR_NAME, NewReading, Reading, SensorStats, StatsAggregate};
