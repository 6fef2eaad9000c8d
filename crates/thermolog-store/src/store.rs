//! Main store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;
use time::OffsetDateTime;
use tracing::{debug, info};

use thermolog_types::{DEFAULT_SENSOR_NAME, NewReading, Reading, SensorStats, StatsAggregate, jst};

use crate::error::{Error, Result};
use crate::schema;

const READING_COLUMNS: &str =
    "id, sensor_id, sensor_name, temperature, humidity, rssi, battery_mode, recorded_at";

/// SQLite-based store for sensor readings.
///
/// All operations lock the single internal connection for the duration of the
/// underlying statement, which serializes concurrent ingestion and queries
/// into one total order. Timestamps are assigned under the same lock, so per
/// sensor the write order equals the timestamp order.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL mode keeps readers from stalling the ingestion path
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        // Initialize schema
        schema::initialize(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the connection, recovering from a poisoned lock.
    ///
    /// A panic in another thread mid-statement cannot leave the SQLite side in
    /// a torn state (statements are atomic), so the data behind the lock is
    /// still consistent.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// Reading operations
impl Store {
    /// Insert one reading and return its row ID.
    ///
    /// The timestamp is assigned here, under the connection lock, unless the
    /// payload carries an explicit `recorded_at`. The write is durable before
    /// this returns; a storage fault surfaces as [`Error::Database`].
    pub fn insert(&self, reading: &NewReading) -> Result<i64> {
        let conn = self.conn();

        let recorded_at = reading.recorded_at.unwrap_or_else(jst::now);
        let sensor_name = reading
            .sensor_name
            .as_deref()
            .unwrap_or(DEFAULT_SENSOR_NAME);

        conn.execute(
            "INSERT INTO temperatures
             (sensor_id, sensor_name, temperature, humidity, rssi, battery_mode, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                reading.sensor_id,
                sensor_name,
                reading.temperature,
                reading.humidity,
                reading.rssi,
                reading.battery_mode as i64,
                recorded_at.unix_timestamp(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(
            "Inserted reading {} for {}: {}°C at {}",
            id,
            reading.sensor_id,
            reading.temperature,
            jst::format_timestamp(recorded_at)
        );
        Ok(id)
    }

    /// All readings for a sensor with `recorded_at >= since`, ascending.
    ///
    /// Returns an empty vec (not an error) when the sensor is unknown or the
    /// window is empty. Timestamp ties are ordered by row ID, so the output
    /// is deterministic.
    pub fn range_asc(&self, sensor_id: &str, since: OffsetDateTime) -> Result<Vec<Reading>> {
        let conn = self.conn();

        let sql = format!(
            "SELECT {READING_COLUMNS} FROM temperatures
             WHERE sensor_id = ?1 AND recorded_at >= ?2
             ORDER BY recorded_at ASC, id ASC"
        );
        debug!("Executing range query for {} since {}", sensor_id, since);

        let mut stmt = conn.prepare(&sql)?;
        let readings = stmt
            .query_map(
                rusqlite::params![sensor_id, since.unix_timestamp()],
                read_reading_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// The newest reading per distinct sensor, ordered by sensor ID.
    ///
    /// Ties on `recorded_at` are broken by the larger row ID, matching the
    /// order the rows were committed in.
    pub fn latest_per_sensor(&self) -> Result<Vec<Reading>> {
        let conn = self.conn();

        let sql = format!(
            "SELECT {READING_COLUMNS} FROM temperatures t
             WHERE t.id = (
                 SELECT t2.id FROM temperatures t2
                 WHERE t2.sensor_id = t.sensor_id
                 ORDER BY t2.recorded_at DESC, t2.id DESC
                 LIMIT 1
             )
             ORDER BY t.sensor_id ASC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let readings = stmt
            .query_map([], read_reading_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Count readings, optionally restricted to one sensor.
    pub fn count_readings(&self, sensor_id: Option<&str>) -> Result<u64> {
        let conn = self.conn();

        let count: i64 = match sensor_id {
            Some(id) => conn.query_row(
                "SELECT COUNT(*) FROM temperatures WHERE sensor_id = ?",
                [id],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM temperatures", [], |row| row.get(0))?,
        };

        Ok(count as u64)
    }
}

// Statistics
impl Store {
    /// Count/avg/min/max over the raw readings with `recorded_at >= since`.
    ///
    /// Computed in SQL against the full raw window, so the result is never
    /// skewed by downsampling. A window with no rows yields a zero count with
    /// no aggregate rather than NULL-turned-zero values.
    pub fn statistics(&self, sensor_id: &str, since: OffsetDateTime) -> Result<SensorStats> {
        let conn = self.conn();

        let (count, avg, min, max): (i64, Option<f64>, Option<f64>, Option<f64>) = conn.query_row(
            "SELECT COUNT(*), AVG(temperature), MIN(temperature), MAX(temperature)
             FROM temperatures
             WHERE sensor_id = ?1 AND recorded_at >= ?2",
            rusqlite::params![sensor_id, since.unix_timestamp()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

        let aggregate = match (avg, min, max) {
            (Some(avg), Some(min), Some(max)) if count > 0 => {
                Some(StatsAggregate { avg, min, max })
            }
            _ => None,
        };

        Ok(SensorStats {
            count: count as u64,
            aggregate,
        })
    }
}

// Retention
impl Store {
    /// Delete all readings strictly older than the cutoff. Returns the count.
    pub fn delete_older_than(&self, cutoff: OffsetDateTime) -> Result<usize> {
        let conn = self.conn();

        let deleted = conn.execute(
            "DELETE FROM temperatures WHERE recorded_at < ?1",
            [cutoff.unix_timestamp()],
        )?;

        info!(
            "Deleted {} readings older than {}",
            deleted,
            jst::format_timestamp(cutoff)
        );
        Ok(deleted)
    }

    /// Delete all readings whose sensor ID matches a SQL `LIKE` pattern.
    ///
    /// Used to purge test sensors (e.g. `TEST%`). Returns the count.
    pub fn delete_matching(&self, sensor_id_pattern: &str) -> Result<usize> {
        let conn = self.conn();

        let deleted = conn.execute(
            "DELETE FROM temperatures WHERE sensor_id LIKE ?1",
            [sensor_id_pattern],
        )?;

        info!(
            "Deleted {} readings matching pattern {:?}",
            deleted, sensor_id_pattern
        );
        Ok(deleted)
    }
}

/// Map a `SELECT {READING_COLUMNS}` row to a [`Reading`].
///
/// Timestamps come back as unix seconds and are shifted to JST here, at the
/// boundary where rows leave the store.
fn read_reading_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reading> {
    let ts: i64 = row.get(7)?;
    let recorded_at = OffsetDateTime::from_unix_timestamp(ts)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Integer, Box::new(e))
        })?
        .to_offset(jst::JST);

    Ok(Reading {
        id: row.get(0)?,
        sensor_id: row.get(1)?,
        sensor_name: row
            .get::<_, Option<String>>(2)?
            .unwrap_or_else(|| DEFAULT_SENSOR_NAME.to_string()),
        temperature: row.get(3)?,
        humidity: row.get(4)?,
        rssi: row.get(5)?,
        battery_mode: row.get::<_, i64>(6)? != 0,
        recorded_at,
    })
}
