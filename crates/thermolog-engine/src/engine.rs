//! Batch aggregation over the reading store.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use thermolog_store::Store;
use thermolog_types::{NewReading, Reading, SensorStats, jst};

use crate::downsample::downsample;
use crate::error::Result;
use crate::validation;

/// Downsampled readings and raw-window statistics for one sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSeries {
    /// Readings for the window, downsampled when oversized, ascending.
    pub readings: Vec<Reading>,
    /// Statistics over the full raw window (never the downsampled set).
    pub statistics: SensorStats,
}

/// Query and aggregation engine over a shared [`Store`] handle.
///
/// All storage access goes through the store's internal lock; downsampling
/// and result assembly run on data already copied out, so concurrent
/// requests only contend for the duration of individual statements.
///
/// Window arithmetic uses JST "now": a window of `hours` covers
/// `[now - hours, now]` with the lower bound included.
#[derive(Clone)]
pub struct Engine {
    store: Arc<Store>,
}

impl Engine {
    /// Create an engine over an injected store handle.
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Start of a lookback window of `hours` relative to JST now.
    fn window_start(hours: f64) -> OffsetDateTime {
        jst::now() - Duration::seconds_f64(hours * 3600.0)
    }

    /// Validate and persist one reading, returning its row ID.
    pub fn insert_reading(&self, reading: &NewReading) -> Result<i64> {
        validation::validate_sensor_id(0, &reading.sensor_id)?;
        Ok(self.store.insert(reading)?)
    }

    /// The newest reading per distinct sensor, ordered by sensor ID.
    pub fn latest_per_sensor(&self) -> Result<Vec<Reading>> {
        Ok(self.store.latest_per_sensor()?)
    }

    /// Raw readings for one sensor over the last `hours`, ascending.
    ///
    /// No downsampling; unknown sensors yield an empty vec.
    pub fn range(&self, sensor_id: &str, hours: f64) -> Result<Vec<Reading>> {
        validation::validate_sensor_id(0, sensor_id)?;
        validation::validate_hours(hours)?;

        Ok(self.store.range_asc(sensor_id, Self::window_start(hours))?)
    }

    /// Statistics over one sensor's raw readings for the last `hours`.
    pub fn statistics(&self, sensor_id: &str, hours: f64) -> Result<SensorStats> {
        validation::validate_sensor_id(0, sensor_id)?;
        validation::validate_hours(hours)?;

        Ok(self.store.statistics(sensor_id, Self::window_start(hours))?)
    }

    /// Fetch readings and statistics for multiple sensors in one call.
    ///
    /// Validation is fail-fast: a malformed ID list, out-of-range `hours`, or
    /// out-of-range `max_points` rejects the whole call before storage is
    /// touched. Each sensor is then processed independently: range scan,
    /// downsample to at most roughly `max_points`, statistics over the same
    /// raw window. Sensors with no readings still appear in the result with
    /// an empty series and zero-count statistics, so callers can tell "no
    /// data" from "not requested". Any storage failure fails the whole batch.
    pub fn range_batch(
        &self,
        sensor_ids: &[String],
        hours: f64,
        max_points: usize,
    ) -> Result<BTreeMap<String, SensorSeries>> {
        validation::validate_sensor_ids(sensor_ids)?;
        validation::validate_hours(hours)?;
        validation::validate_max_points(max_points)?;

        let since = Self::window_start(hours);
        debug!(
            "Batch query: {} sensors, {}h window, max {} points each",
            sensor_ids.len(),
            hours,
            max_points
        );

        let mut results = BTreeMap::new();
        for sensor_id in sensor_ids {
            let raw = self.store.range_asc(sensor_id, since)?;
            let statistics = self.store.statistics(sensor_id, since)?;
            let readings = downsample(&raw, max_points);

            results.insert(sensor_id.clone(), SensorSeries { readings, statistics });
        }

        Ok(results)
    }

    /// Delete readings older than `days` days. Returns the count.
    pub fn delete_older_than(&self, days: u32) -> Result<usize> {
        validation::validate_days(days)?;

        let cutoff = jst::now() - Duration::days(i64::from(days));
        Ok(self.store.delete_older_than(cutoff)?)
    }

    /// Delete readings whose sensor ID matches a SQL `LIKE` pattern.
    pub fn delete_matching(&self, pattern: &str) -> Result<usize> {
        if pattern.trim().is_empty() {
            return Err(validation::ValidationError::EmptyPattern.into());
        }

        Ok(self.store.delete_matching(pattern)?)
    }
}
