//! Query builder for stored observations.
//!
//! [`ObservationQuery`] follows the builder pattern for filtering and
//! paginating the observation log.
//!
//! # Example
//!
//! ```
//! use skylog_store::{ObservationQuery, Store};
//! use time::macros::datetime;
//!
//! let store = Store::open_in_memory()?;
//!
//! // Most recent 50 observations for one city
//! let query = ObservationQuery::new().city("Lagos").limit(50);
//! let recent = store.query(&query)?;
//!
//! // Everything recorded in July, oldest first
//! let july = ObservationQuery::new()
//!     .since(datetime!(2024-07-01 00:00:00))
//!     .until(datetime!(2024-07-31 23:59:59))
//!     .oldest_first();
//! let rows = store.query(&july)?;
//! # Ok::<(), skylog_store::Error>(())
//! ```

use time::PrimitiveDateTime;

use skylog_types::format_timestamp;

/// Columns selected for every observation read, in row-mapping order.
pub(crate) const OBSERVATION_COLUMNS: &str = "rowid, timestamp, city, temp, feels_like, weather, \
     humidity, pressure, visibility, wind, wind_speed, wind_direction_deg, \
     sea_level, grnd_level, sunrise, sunset";

/// Fluent query builder for observations.
///
/// Use this to construct queries for [`Store::query`](crate::Store::query)
/// and the export methods. All filter methods are optional and can be
/// chained in any order.
///
/// By default, queries return results ordered by `timestamp` descending
/// (newest first); rows sharing a timestamp keep insertion order.
#[derive(Debug, Default, Clone)]
pub struct ObservationQuery {
    /// Filter by exact city name.
    pub city: Option<String>,
    /// Include only observations at or after this time.
    pub since: Option<PrimitiveDateTime>,
    /// Include only observations at or before this time.
    pub until: Option<PrimitiveDateTime>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
    /// Order by timestamp descending (newest first).
    pub newest_first: bool,
}

impl ObservationQuery {
    /// Create a new query with default settings.
    ///
    /// Default behavior:
    /// - No city filter
    /// - No time range filter
    /// - No limit (all matching records)
    /// - Ordered by newest first
    pub fn new() -> Self {
        Self {
            newest_first: true,
            ..Default::default()
        }
    }

    /// Filter by city. Matching is exact and case-sensitive.
    pub fn city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    /// Filter to observations recorded at or after this time.
    pub fn since(mut self, time: PrimitiveDateTime) -> Self {
        self.since = Some(time);
        self
    }

    /// Filter to observations recorded at or before this time.
    pub fn until(mut self, time: PrimitiveDateTime) -> Self {
        self.until = Some(time);
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N results.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Order results oldest first (ascending by `timestamp`).
    pub fn oldest_first(mut self) -> Self {
        self.newest_first = false;
        self
    }

    /// Build the SQL WHERE clause and parameters.
    ///
    /// Timestamps are stored as `YYYY-MM-DD HH:MM:SS` text, which compares
    /// chronologically.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref city) = self.city {
            conditions.push("city = ?");
            params.push(Box::new(city.clone()));
        }

        if let Some(since) = self.since {
            conditions.push("timestamp >= ?");
            params.push(Box::new(format_timestamp(&since)));
        }

        if let Some(until) = self.until {
            conditions.push("timestamp <= ?");
            params.push(Box::new(format_timestamp(&until)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT {} FROM weather {} ORDER BY timestamp {}, rowid {}",
            OBSERVATION_COLUMNS, where_clause, order, order
        );

        // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset))
            }
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
            (None, None) => {}
        }

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_query_new_defaults() {
        let query = ObservationQuery::new();
        assert!(query.city.is_none());
        assert!(query.since.is_none());
        assert!(query.until.is_none());
        assert!(query.limit.is_none());
        assert!(query.offset.is_none());
        assert!(query.newest_first);
    }

    #[test]
    fn test_query_default_is_different_from_new() {
        // Default doesn't set newest_first, but new() does
        assert!(!ObservationQuery::default().newest_first);
        assert!(ObservationQuery::new().newest_first);
    }

    #[test]
    fn test_query_chaining() {
        let since = datetime!(2024-01-01 00:00:00);
        let until = datetime!(2024-12-31 23:59:59);

        let query = ObservationQuery::new()
            .city("Paris")
            .since(since)
            .until(until)
            .limit(10)
            .offset(5)
            .oldest_first();

        assert_eq!(query.city, Some("Paris".to_string()));
        assert_eq!(query.since, Some(since));
        assert_eq!(query.until, Some(until));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, Some(5));
        assert!(!query.newest_first);
    }

    #[test]
    fn test_build_where_empty() {
        let (where_clause, params) = ObservationQuery::new().build_where();
        assert_eq!(where_clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_where_city_only() {
        let (where_clause, params) = ObservationQuery::new().city("Rome").build_where();
        assert_eq!(where_clause, "WHERE city = ?");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_build_where_time_range() {
        let query = ObservationQuery::new()
            .since(datetime!(2024-01-01 00:00:00))
            .until(datetime!(2024-12-31 23:59:59));
        let (where_clause, params) = query.build_where();

        assert_eq!(where_clause, "WHERE timestamp >= ? AND timestamp <= ?");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_build_sql_basic() {
        let sql = ObservationQuery::new().build_sql();

        assert!(sql.contains("FROM weather"));
        assert!(sql.contains("ORDER BY timestamp DESC, rowid DESC"));
        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn test_build_sql_oldest_first() {
        let sql = ObservationQuery::new().oldest_first().build_sql();
        assert!(sql.contains("ORDER BY timestamp ASC, rowid ASC"));
    }

    #[test]
    fn test_build_sql_pagination() {
        let sql = ObservationQuery::new().limit(50).offset(100).build_sql();
        assert!(sql.ends_with("LIMIT 50 OFFSET 100"));
    }

    #[test]
    fn test_build_sql_offset_without_limit() {
        let sql = ObservationQuery::new().offset(20).build_sql();
        assert!(sql.ends_with("LIMIT -1 OFFSET 20"));
    }

    #[test]
    fn test_build_sql_selects_wind_columns() {
        let sql = ObservationQuery::new().build_sql();
        assert!(sql.contains("wind_speed"));
        assert!(sql.contains("wind_direction_deg"));
        assert!(sql.contains("sunrise"));
    }
}
