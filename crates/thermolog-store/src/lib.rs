//! SQLite persistence for thermolog sensor readings.
//!
//! This crate owns the durable table of raw sensor readings and exposes the
//! narrow query surface the aggregation engine needs: insert, ascending range
//! scan, latest-per-sensor, window statistics, and retention deletes.
//!
//! All access is serialized through a single internal mutex, so a shared
//! [`Store`] handle (`Arc<Store>`) can be used from concurrent ingestion and
//! query paths without further synchronization. Sensor ingestion rates are low
//! relative to lock overhead, so the coarse lock is the whole concurrency
//! story: no operation holds it across anything but the storage call itself.
//!
//! # Example
//!
//! ```no_run
//! use thermolog_store::Store;
//! use thermolog_types::{NewReading, jst};
//! use time::Duration;
//!
//! let store = Store::open_default()?;
//! store.insert(&NewReading::new("esp32-kitchen", 21.5))?;
//!
//! let since = jst::now() - Duration::hours(24);
//! let readings = store.range_asc("esp32-kitchen", since)?;
//! # Ok::<(), thermolog_store::Error>(())
//! ```

mod error;
mod schema;
mod store;

pub use error::{Error, Result};
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/thermolog/data.db`
/// - macOS: `~/Library/Application Support/thermolog/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\thermolog\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("thermolog")
        .join("data.db")
}
