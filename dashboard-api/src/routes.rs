use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use energy_client::db::reading_queries;
use energy_client::{EnergyReading, ReadingRange};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::ApiError;
use crate::validate::{parse_date_input, validate_timezone};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/data", get(get_data))
        .route("/data/range", get(get_range))
        .with_state(state)
}

async fn liveness() -> &'static str {
    "Howdy"
}

#[derive(Debug, Default, Deserialize)]
pub struct DataParams {
    pub timezone: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub success: bool,
    pub data: Vec<EnergyReading>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RangeResponse {
    pub success: bool,
    pub range: ReadingRange,
    pub message: String,
}

async fn get_data(
    State(state): State<AppState>,
    Query(params): Query<DataParams>,
) -> Result<Json<DataResponse>, ApiError> {
    metrics::counter!("http_data_requests_total").increment(1);

    let (timezone, start, end) = match validate_data_params(&params) {
        Ok(validated) => validated,
        Err(e) => {
            metrics::counter!("http_data_rejected_total").increment(1);
            return Err(e);
        }
    };

    let rows = reading_queries::fetch_readings(&state.pool, &timezone, start, end).await?;

    if rows.is_empty() {
        return Err(ApiError::NoDataInRange(no_data_message(start, end)));
    }

    let message = fetched_message(&timezone, start, end);
    Ok(Json(DataResponse {
        success: true,
        data: rows,
        message,
    }))
}

async fn get_range(State(state): State<AppState>) -> Result<Json<RangeResponse>, ApiError> {
    metrics::counter!("http_range_requests_total").increment(1);

    let range = reading_queries::available_range(&state.pool).await?;

    Ok(Json(RangeResponse {
        success: true,
        range,
        message: "Start and end timestamps retrieved successfully".to_string(),
    }))
}

type ValidatedParams = (String, Option<DateTime<Utc>>, Option<DateTime<Utc>>);

/// Validation order is fixed: timezone, then start, then end, then range
/// ordering. The range check compares raw instants even though row
/// filtering is by local calendar day in the requested timezone.
fn validate_data_params(params: &DataParams) -> Result<ValidatedParams, ApiError> {
    let timezone = params
        .timezone
        .clone()
        .unwrap_or_else(|| "UTC".to_string());
    if !validate_timezone(&timezone) {
        return Err(ApiError::InvalidRequest(format!(
            "Invalid timezone: {timezone}. Please provide a valid timezone."
        )));
    }

    let start = match &params.start {
        Some(input) => Some(parse_date_input(input).map_err(|_| {
            ApiError::InvalidRequest(format!(
                "Invalid start date: \"{input}\". Please provide a valid date format \
                 (e.g., YYYY-MM-DD, MM-DD-YYYY)."
            ))
        })?),
        None => None,
    };

    let end = match &params.end {
        Some(input) => Some(parse_date_input(input).map_err(|_| {
            ApiError::InvalidRequest(format!(
                "Invalid end date: \"{input}\". Please provide a valid date format \
                 (e.g., YYYY-MM-DD, MM-DD-YYYY)."
            ))
        })?),
        None => None,
    };

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(ApiError::InvalidRequest(format!(
                "Invalid date range: Start date ({}) cannot be after end date ({}).",
                params.start.as_deref().unwrap_or_default(),
                params.end.as_deref().unwrap_or_default()
            )));
        }
    }

    Ok((timezone, start, end))
}

fn no_data_message(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    let mut msg = String::from("No data found for the specified date range");
    if let Some(s) = start {
        msg.push_str(&format!(" from {}", s.format("%Y-%m-%d")));
    }
    if let Some(e) = end {
        msg.push_str(&format!(" to {}", e.format("%Y-%m-%d")));
    }
    msg.push('.');
    msg
}

fn fetched_message(
    timezone: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> String {
    let mut msg = format!("Data fetched in {timezone} timezone");
    if start.is_some() || end.is_some() {
        let from = start
            .map(|s| s.to_rfc3339())
            .unwrap_or_else(|| "start".to_string());
        let to = end
            .map(|e| e.to_rfc3339())
            .unwrap_or_else(|| "now".to_string());
        msg.push_str(&format!(" from {from} to {to}"));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params(tz: Option<&str>, start: Option<&str>, end: Option<&str>) -> DataParams {
        DataParams {
            timezone: tz.map(String::from),
            start: start.map(String::from),
            end: end.map(String::from),
        }
    }

    #[test]
    fn timezone_defaults_to_utc() {
        let (tz, start, end) = validate_data_params(&params(None, None, None)).unwrap();
        assert_eq!(tz, "UTC");
        assert!(start.is_none());
        assert!(end.is_none());
    }

    #[test]
    fn bad_timezone_is_rejected_before_dates() {
        let err =
            validate_data_params(&params(Some("Not/AZone"), Some("also garbage"), None))
                .unwrap_err();
        match err {
            ApiError::InvalidRequest(m) => assert!(m.contains("Invalid timezone: Not/AZone")),
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_start_names_the_literal_input() {
        let err = validate_data_params(&params(None, Some("???"), None)).unwrap_err();
        match err {
            ApiError::InvalidRequest(m) => {
                assert!(m.contains("Invalid start date: \"???\""));
            }
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_end_names_the_literal_input() {
        let err = validate_data_params(&params(None, None, Some("eventually"))).unwrap_err();
        match err {
            ApiError::InvalidRequest(m) => {
                assert!(m.contains("Invalid end date: \"eventually\""));
            }
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = validate_data_params(&params(
            Some("Europe/Oslo"),
            Some("2024-12-19"),
            Some("2024-12-18"),
        ))
        .unwrap_err();
        match err {
            ApiError::InvalidRequest(m) => {
                assert!(m.contains("Start date (2024-12-19) cannot be after end date (2024-12-18)"));
            }
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn equal_start_and_end_pass_validation() {
        let (_, start, end) = validate_data_params(&params(
            Some("Europe/Oslo"),
            Some("2024-12-19"),
            Some("2024-12-19"),
        ))
        .unwrap();
        assert_eq!(start, end);
        assert!(start.is_some());
    }

    #[test]
    fn no_data_message_mentions_only_present_bounds() {
        let day = Utc.with_ymd_and_hms(2024, 12, 19, 0, 0, 0).unwrap();

        assert_eq!(
            no_data_message(None, None),
            "No data found for the specified date range."
        );
        assert_eq!(
            no_data_message(Some(day), None),
            "No data found for the specified date range from 2024-12-19."
        );
        assert_eq!(
            no_data_message(Some(day), Some(day)),
            "No data found for the specified date range from 2024-12-19 to 2024-12-19."
        );
    }

    #[test]
    fn fetched_message_describes_timezone_and_range() {
        let day = Utc.with_ymd_and_hms(2024, 12, 19, 0, 0, 0).unwrap();

        assert_eq!(
            fetched_message("UTC", None, None),
            "Data fetched in UTC timezone"
        );
        let msg = fetched_message("Europe/Oslo", None, Some(day));
        assert!(msg.starts_with("Data fetched in Europe/Oslo timezone from start to "));
    }

    #[tokio::test]
    async fn liveness_is_plain_text() {
        assert_eq!(liveness().await, "Howdy");
    }

    #[test]
    fn success_payload_shape() {
        let resp = DataResponse {
            success: true,
            data: vec![],
            message: "Data fetched in UTC timezone".to_string(),
        };
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["success"], true);
        assert!(v["data"].is_array());
        assert!(v["message"].is_string());
    }
}
