use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{EnergyReading, ReadingRange};

/// A value bound into a readings query, tracked by position.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Text(String),
    Instant(DateTime<Utc>),
}

/// SQL text plus its positional parameters.
///
/// Only the clause structure is dynamic; values always travel in `params`
/// and are referenced by `$n` index, never spliced into the text.
#[derive(Debug, Clone)]
pub struct ReadingQuery {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

/// Build the timezone-aware readings filter.
///
/// Date bounds select whole local calendar days in `timezone`: a start of
/// Dec 19 includes everything from local midnight on the 19th, and an end
/// of Dec 19 includes the full 19th (rows strictly before local midnight
/// on the 20th). `$1` is always the timezone and is reused by every clause
/// that needs it; rows come back ordered by absolute timestamp.
pub fn build_readings_query(
    timezone: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> ReadingQuery {
    let mut sql = String::from(
        "SELECT \
            id, \
            timestamp, \
            to_char(timestamp AT TIME ZONE $1, 'YYYY-MM-DD HH24:MI:SS.US') AS local_time, \
            fridge_kwh, \
            oven_kwh, \
            lights_kwh, \
            ev_charger_kwh \
        FROM energy_consumption \
        WHERE 1=1",
    );
    let mut params = vec![QueryParam::Text(timezone.to_string())];

    if let Some(start) = start {
        sql.push_str(&format!(
            " AND timestamp >= ((${} AT TIME ZONE $1)::date)::timestamp AT TIME ZONE $1",
            params.len() + 1
        ));
        params.push(QueryParam::Instant(start));
    }
    if let Some(end) = end {
        sql.push_str(&format!(
            " AND timestamp < ((${} AT TIME ZONE $1)::date + INTERVAL '1 day')::timestamp AT TIME ZONE $1",
            params.len() + 1
        ));
        params.push(QueryParam::Instant(end));
    }

    sql.push_str(" ORDER BY timestamp");

    ReadingQuery { sql, params }
}

/// Fetch readings for an already-validated timezone and optional bounds.
pub async fn fetch_readings(
    pool: &PgPool,
    timezone: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<Vec<EnergyReading>> {
    let query = build_readings_query(timezone, start, end);

    let mut q = sqlx::query_as::<_, EnergyReading>(&query.sql);
    for param in &query.params {
        q = match param {
            QueryParam::Text(s) => q.bind(s),
            QueryParam::Instant(t) => q.bind(*t),
        };
    }

    let rows = q.fetch_all(pool).await?;
    Ok(rows)
}

/// First and last timestamps in the table, with no filtering.
pub async fn available_range(pool: &PgPool) -> Result<ReadingRange> {
    let range = sqlx::query_as::<_, ReadingRange>(
        r#"
        SELECT
            MIN(timestamp) AS start_timestamp,
            MAX(timestamp) AS end_timestamp
        FROM energy_consumption
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn unbounded_query_has_only_the_timezone_param() {
        let q = build_readings_query("UTC", None, None);

        assert_eq!(q.params, vec![QueryParam::Text("UTC".to_string())]);
        assert!(!q.sql.contains("$2"));
        assert!(q.sql.ends_with("ORDER BY timestamp"));
    }

    #[test]
    fn start_bound_filters_by_local_day_floor() {
        let start = instant(2024, 12, 19);
        let q = build_readings_query("Europe/Oslo", Some(start), None);

        assert!(q
            .sql
            .contains("timestamp >= (($2 AT TIME ZONE $1)::date)::timestamp AT TIME ZONE $1"));
        assert_eq!(
            q.params,
            vec![
                QueryParam::Text("Europe/Oslo".to_string()),
                QueryParam::Instant(start),
            ]
        );
    }

    #[test]
    fn end_bound_is_exclusive_of_the_next_local_day() {
        let end = instant(2024, 12, 19);
        let q = build_readings_query("Europe/Oslo", None, Some(end));

        assert!(q.sql.contains(
            "timestamp < (($2 AT TIME ZONE $1)::date + INTERVAL '1 day')::timestamp AT TIME ZONE $1"
        ));
        assert_eq!(q.params.len(), 2);
    }

    #[test]
    fn both_bounds_take_consecutive_indices() {
        let start = instant(2024, 12, 18);
        let end = instant(2024, 12, 19);
        let q = build_readings_query("America/New_York", Some(start), Some(end));

        assert!(q.sql.contains("$2 AT TIME ZONE $1"));
        assert!(q.sql.contains("$3 AT TIME ZONE $1"));
        assert_eq!(
            q.params,
            vec![
                QueryParam::Text("America/New_York".to_string()),
                QueryParam::Instant(start),
                QueryParam::Instant(end),
            ]
        );
    }

    #[test]
    fn values_never_appear_in_the_sql_text() {
        let q = build_readings_query("Europe/Oslo", Some(instant(2024, 12, 19)), None);

        assert!(!q.sql.contains("Oslo"));
        assert!(!q.sql.contains("2024"));
    }
}
