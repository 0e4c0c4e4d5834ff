//! Main store implementation.

use std::path::Path;

use rusqlite::types::{Type, ValueRef};
use rusqlite::{Connection, Row};
use tracing::{debug, info, warn};

use skylog_types::{
    CurrentWeather, NOT_AVAILABLE, WeatherObservation, Wind, format_timestamp, now_timestamp,
    parse_timestamp,
};

use crate::error::{Error, Result};
use crate::models::{CsvRecord, ImportResult, present_text};
use crate::queries::{OBSERVATION_COLUMNS, ObservationQuery};
use crate::schema;

/// SQLite-based store for weather observations.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }
}

// Write operations
impl Store {
    /// Insert one observation and return its row id.
    pub fn insert(&self, obs: &WeatherObservation) -> Result<i64> {
        insert_observation(&self.conn, obs)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Stamp a current-conditions payload with the local time and store it.
    pub fn record(&self, city: &str, current: &CurrentWeather) -> Result<WeatherObservation> {
        let obs = current.clone().into_observation(city, now_timestamp());
        let id = self.insert(&obs)?;
        debug!("Recorded observation {} for {}", id, city);
        Ok(obs)
    }
}

// Read operations
impl Store {
    /// Every stored observation in insertion order.
    pub fn scan_all(&self) -> Result<Vec<WeatherObservation>> {
        let sql = format!("SELECT {} FROM weather ORDER BY rowid ASC", OBSERVATION_COLUMNS);
        debug!("Executing query: {}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], observation_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// The `limit` most recent observations, newest first.
    pub fn recent(&self, limit: u32) -> Result<Vec<WeatherObservation>> {
        self.query(&ObservationQuery::new().limit(limit))
    }

    /// Query observations with filters.
    pub fn query(&self, query: &ObservationQuery) -> Result<Vec<WeatherObservation>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_ref.as_slice(), observation_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Count stored observations.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM weather", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Whether an observation for `city` at `timestamp` is already stored.
    fn contains(conn: &Connection, obs: &WeatherObservation) -> Result<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM weather WHERE timestamp = ?1 AND city = ?2)",
            rusqlite::params![format_timestamp(&obs.timestamp), obs.city],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

// Export / import
impl Store {
    /// Export matching observations as CSV with the legacy column headers.
    pub fn export_csv(&self, query: &ObservationQuery) -> Result<String> {
        let rows = self.query(query)?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        for obs in &rows {
            writer.serialize(CsvRecord::from_observation(obs))?;
        }
        let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;

        info!("Exported {} observations as CSV", rows.len());
        String::from_utf8(bytes)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Export matching observations as a pretty-printed JSON array.
    pub fn export_json(&self, query: &ObservationQuery) -> Result<String> {
        let rows = self.query(query)?;
        info!("Exported {} observations as JSON", rows.len());
        Ok(serde_json::to_string_pretty(&rows)?)
    }

    /// Import observations from CSV text.
    ///
    /// Malformed rows are reported in [`ImportResult::errors`] and skipped;
    /// rows whose city and timestamp are already stored count as skipped.
    pub fn import_csv(&self, data: &str) -> Result<ImportResult> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());

        let mut parsed = Vec::new();
        let mut errors = Vec::new();
        for (i, record) in reader.deserialize::<CsvRecord>().enumerate() {
            // Header is line 1
            let line = i + 2;
            match record {
                Ok(record) => match record.into_observation() {
                    Ok(obs) => parsed.push(obs),
                    Err(e) => errors.push(format!("Line {}: {}", line, e)),
                },
                Err(e) => errors.push(format!("Line {}: {}", line, e)),
            }
        }

        self.import_observations(parsed, errors)
    }

    /// Import observations from a JSON array as produced by [`Store::export_json`].
    pub fn import_json(&self, data: &str) -> Result<ImportResult> {
        let values: Vec<serde_json::Value> = serde_json::from_str(data)?;

        let mut parsed = Vec::new();
        let mut errors = Vec::new();
        for (i, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<WeatherObservation>(value) {
                Ok(obs) => parsed.push(obs),
                Err(e) => errors.push(format!("Record {}: {}", i + 1, e)),
            }
        }

        self.import_observations(parsed, errors)
    }

    fn import_observations(
        &self,
        observations: Vec<WeatherObservation>,
        errors: Vec<String>,
    ) -> Result<ImportResult> {
        let mut result = ImportResult {
            total: observations.len() + errors.len(),
            errors,
            ..Default::default()
        };

        let tx = self.conn.unchecked_transaction()?;
        for obs in &observations {
            if Self::contains(&tx, obs)? {
                result.skipped += 1;
                continue;
            }
            insert_observation(&tx, obs)?;
            result.imported += 1;
        }
        tx.commit()?;

        if !result.errors.is_empty() {
            warn!("{} records could not be imported", result.errors.len());
        }
        info!(
            "Imported {} observations ({} duplicates skipped)",
            result.imported, result.skipped
        );
        Ok(result)
    }
}

fn insert_observation(conn: &Connection, obs: &WeatherObservation) -> Result<()> {
    let wind_text = obs
        .wind
        .map(|w| w.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    conn.execute(
        "INSERT INTO weather (timestamp, city, temp, feels_like, weather, humidity, pressure,
         visibility, wind, wind_speed, wind_direction_deg, sea_level, grnd_level, sunrise, sunset)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        rusqlite::params![
            format_timestamp(&obs.timestamp),
            obs.city,
            obs.temp,
            obs.feels_like,
            obs.weather,
            obs.humidity,
            obs.pressure,
            obs.visibility,
            wind_text,
            obs.wind.map(|w| w.speed),
            obs.wind.and_then(|w| w.direction_deg),
            obs.sea_level,
            obs.grnd_level,
            obs.sunrise,
            obs.sunset,
        ],
    )?;

    Ok(())
}

/// Map a row selected with [`OBSERVATION_COLUMNS`].
fn observation_from_row(row: &Row<'_>) -> rusqlite::Result<WeatherObservation> {
    let timestamp_text: String = row.get(1)?;
    let timestamp = parse_timestamp(&timestamp_text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    // Explicit columns win; rows they were never filled for fall back to the
    // legacy text.
    let wind = match optional_real(row, 10)? {
        Some(speed) => Some(Wind::new(speed, optional_real(row, 11)?)),
        None => optional_text(row, 9)?.as_deref().and_then(Wind::parse),
    };

    Ok(WeatherObservation {
        timestamp,
        city: optional_text(row, 2)?.unwrap_or_default(),
        temp: optional_real(row, 3)?,
        feels_like: optional_real(row, 4)?,
        weather: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        humidity: optional_real(row, 6)?.map(|v| v.clamp(0.0, 100.0) as u8),
        pressure: optional_real(row, 7)?.map(|v| v.max(0.0) as u32),
        visibility: optional_real(row, 8)?,
        wind,
        sea_level: optional_real(row, 12)?,
        grnd_level: optional_real(row, 13)?,
        sunrise: optional_text(row, 14)?,
        sunset: optional_text(row, 15)?,
    })
}

/// Numeric column that older databases may fill with `'N/A'` text.
fn optional_real(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<f64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Real(v) => Some(v),
        ValueRef::Integer(v) => Some(v as f64),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

fn optional_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(present_text(row.get::<_, Option<String>>(idx)?))
}
