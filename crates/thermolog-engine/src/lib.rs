//! Query and aggregation engine for thermolog sensor data.
//!
//! This crate sits between the storage layer and whatever boundary consumes
//! the data (HTTP handlers, serial ingestion callbacks). It provides:
//!
//! - **Downsampling**: feature-preserving reduction of a reading series to a
//!   bounded point count, keeping extrema and sharp jumps that uniform stride
//!   sampling would discard ([`downsample`]).
//! - **Request validation**: fail-fast bounds checks on sensor IDs, window
//!   hours, and point limits before storage is touched ([`validation`]).
//! - **Batch aggregation**: fanning a multi-sensor request out over the store,
//!   downsampling each series independently and pairing it with statistics
//!   computed from the full raw window ([`Engine::range_batch`]).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use thermolog_engine::Engine;
//! use thermolog_store::Store;
//!
//! let engine = Engine::new(Arc::new(Store::open_default()?));
//!
//! let sensors = vec!["esp32-kitchen".to_string(), "esp32-attic".to_string()];
//! let results = engine.range_batch(&sensors, 24.0, 500)?;
//!
//! for (sensor_id, series) in &results {
//!     println!("{sensor_id}: {} points", series.readings.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod downsample;
mod engine;
mod error;
pub mod validation;

pub use downsample::{JUMP_THRESHOLD, downsample};
pub use engine::{Engine, SensorSeries};
pub use error::{Error, Result};
pub use validation::{DEFAULT_MAX_POINTS, ValidationError};
