//! On-disk store behavior: reopening, legacy databases, and migration.

use rusqlite::Connection;
use skylog_store::{ObservationQuery, SCHEMA_VERSION, Store};
use skylog_types::{WeatherObservation, Wind};
use tempfile::tempdir;
use time::macros::datetime;

fn observation(city: &str, hour: u8, temp: f64) -> WeatherObservation {
    let timestamp = datetime!(2024-05-01 00:00:00).replace_hour(hour).unwrap();
    WeatherObservation::new(timestamp, city, temp, 60, 1012)
        .with_weather("Clear Sky")
        .with_wind(Wind::new(2.5, Some(180.0)))
}

#[test]
fn test_open_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("observations.db");

    let store = Store::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_observations_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("observations.db");

    {
        let store = Store::open(&path).unwrap();
        store.insert(&observation("Lagos", 9, 29.0)).unwrap();
        store.insert(&observation("Oslo", 10, 12.0)).unwrap();
    }

    let store = Store::open(&path).unwrap();
    let rows = store.scan_all().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], observation("Lagos", 9, 29.0));
    assert_eq!(rows[1].wind, Some(Wind::new(2.5, Some(180.0))));
}

#[test]
fn test_legacy_database_is_migrated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weather_data.db");

    // Layout written by releases that predate version tracking.
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE weather (
                timestamp TEXT, city TEXT, temp REAL, feels_like REAL, weather TEXT,
                humidity INTEGER, pressure INTEGER, visibility REAL, wind TEXT,
                sea_level REAL, grnd_level REAL, sunrise TEXT, sunset TEXT
             );
             INSERT INTO weather VALUES ('2023-11-02 14:05:11', 'Cairo', 27.3, 26.9,
                'Clear Sky', 35, 1014, 10000, '5.14 m/s, 340°', 1014, 1009, '06:05', '17:05');
             INSERT INTO weather VALUES ('2023-11-02 15:00:00', 'Cairo', 26.0, 'N/A',
                'Clear Sky', 37, 1014, 'N/A', 'N/A', 'N/A', 'N/A', 'N/A', 'N/A');",
        )
        .unwrap();
    }

    let store = Store::open(&path).unwrap();
    let rows = store.scan_all().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].wind, Some(Wind::new(5.14, Some(340.0))));
    assert_eq!(rows[0].sea_level, Some(1014.0));
    assert_eq!(rows[1].wind, None);
    assert_eq!(rows[1].feels_like, None);

    let conn = Connection::open(&path).unwrap();
    let version: i32 = conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[test]
fn test_time_range_query_and_pagination() {
    let store = Store::open_in_memory().unwrap();
    for hour in 0..6 {
        store.insert(&observation("Lima", hour, 15.0 + hour as f64)).unwrap();
    }

    let query = ObservationQuery::new()
        .since(datetime!(2024-05-01 02:00:00))
        .until(datetime!(2024-05-01 04:00:00))
        .oldest_first();
    let temps: Vec<f64> = store.query(&query).unwrap().iter().filter_map(|o| o.temp).collect();
    assert_eq!(temps, vec![17.0, 18.0, 19.0]);

    let page = store
        .query(&ObservationQuery::new().limit(2).offset(1))
        .unwrap();
    let temps: Vec<f64> = page.iter().filter_map(|o| o.temp).collect();
    assert_eq!(temps, vec![19.0, 18.0]);
}

#[test]
fn test_export_to_file_and_import_elsewhere() {
    let dir = tempdir().unwrap();
    let source = Store::open(dir.path().join("a.db")).unwrap();
    source.insert(&observation("Quito", 8, 13.0)).unwrap();
    source.insert(&observation("Quito", 9, 14.5)).unwrap();

    let export_path = dir.path().join("export.csv");
    std::fs::write(&export_path, source.export_csv(&ObservationQuery::new()).unwrap()).unwrap();

    let target = Store::open(dir.path().join("b.db")).unwrap();
    let data = std::fs::read_to_string(&export_path).unwrap();
    let result = target.import_csv(&data).unwrap();

    assert_eq!(result.imported, 2);
    assert_eq!(target.count().unwrap(), 2);
}
