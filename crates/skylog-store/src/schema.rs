//! Database schema and migrations.
//!
//! Version 1 is the original single-table layout, so databases written by
//! earlier releases (which never had a `schema_version` table) open as v1 and
//! are migrated in place.

use rusqlite::Connection;
use tracing::info;

use skylog_types::Wind;

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Initialize the database schema.
pub fn initialize(conn: &Connection) -> Result<()> {
    let mut version = get_schema_version(conn)?;

    if version == 0 {
        // Fresh database
        create_schema_v1(conn)?;
        version = 1;
    }

    if version < SCHEMA_VERSION {
        migrate(conn, version)?;
    }

    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    if !table_exists(conn, "schema_version")? {
        // Untracked databases that already hold observations are v1.
        return Ok(if table_exists(conn, "weather")? { 1 } else { 0 });
    }

    let version: i32 =
        conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))?;

    Ok(version)
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
        [version],
    )?;
    Ok(())
}

/// Create the initial schema (version 1).
fn create_schema_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS weather (
            timestamp TEXT,
            city TEXT,
            temp REAL,
            feels_like REAL,
            weather TEXT,
            humidity INTEGER,
            pressure INTEGER,
            visibility REAL,
            wind TEXT,
            sea_level REAL,
            grnd_level REAL,
            sunrise TEXT,
            sunset TEXT
        );
        "#,
    )?;

    Ok(())
}

/// Version 2: explicit wind columns and version tracking.
fn migrate_to_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        ALTER TABLE weather ADD COLUMN wind_speed REAL;
        ALTER TABLE weather ADD COLUMN wind_direction_deg REAL;

        CREATE INDEX IF NOT EXISTS idx_weather_timestamp ON weather(timestamp);
        "#,
    )?;

    // Backfill from the composite text; rows that don't parse keep NULLs.
    let pending: Vec<(i64, String)> = conn
        .prepare("SELECT rowid, wind FROM weather WHERE wind IS NOT NULL")?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut update = conn
        .prepare("UPDATE weather SET wind_speed = ?2, wind_direction_deg = ?3 WHERE rowid = ?1")?;
    let mut backfilled = 0;
    for (rowid, text) in pending {
        if let Some(wind) = Wind::parse(&text) {
            update.execute(rusqlite::params![rowid, wind.speed, wind.direction_deg])?;
            backfilled += 1;
        }
    }

    if backfilled > 0 {
        info!("Backfilled wind columns for {} existing observations", backfilled);
    }

    Ok(())
}

/// Run migrations from old_version to current.
fn migrate(conn: &Connection, old_version: i32) -> Result<()> {
    if old_version < 2 {
        migrate_to_v2(conn)?;
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_names(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM pragma_table_info('weather')")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_initialize_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        assert!(table_exists(&conn, "weather").unwrap());
        assert!(table_exists(&conn, "schema_version").unwrap());

        let columns = column_names(&conn);
        assert!(columns.contains(&"wind".to_string()));
        assert!(columns.contains(&"wind_speed".to_string()));
        assert!(columns.contains(&"wind_direction_deg".to_string()));
    }

    #[test]
    fn test_schema_version_tracking() {
        let conn = Connection::open_in_memory().unwrap();

        // Fresh database should have version 0
        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        initialize(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);

        // Re-initializing is a no-op
        initialize(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_untracked_database_is_v1() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_v1(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 1);
    }

    #[test]
    fn test_migration_backfills_wind_columns() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_v1(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO weather (timestamp, city, temp, humidity, pressure, wind)
                VALUES ('2024-01-01 10:00:00', 'Lagos', 31.0, 70, 1009, '3.20 m/s, 90°');
             INSERT INTO weather (timestamp, city, temp, humidity, pressure, wind)
                VALUES ('2024-01-01 11:00:00', 'Oslo', -4.5, 80, 1021, 'N/A');",
        )
        .unwrap();

        initialize(&conn).unwrap();

        let rows: Vec<(String, Option<f64>, Option<f64>)> = conn
            .prepare("SELECT city, wind_speed, wind_direction_deg FROM weather ORDER BY rowid")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(rows[0], ("Lagos".to_string(), Some(3.2), Some(90.0)));
        assert_eq!(rows[1], ("Oslo".to_string(), None, None));
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
