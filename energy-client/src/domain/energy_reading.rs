use chrono::{DateTime, Utc};
use serde::Serialize;

/// One time-stamped energy measurement.
///
/// `local_time` is not a column: it is `timestamp` rendered in the
/// caller-requested timezone at query time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EnergyReading {
    pub id: i32,
    pub timestamp: DateTime<Utc>,
    pub local_time: String,
    pub fridge_kwh: Option<f64>,
    pub oven_kwh: Option<f64>,
    pub lights_kwh: Option<f64>,
    pub ev_charger_kwh: Option<f64>,
}

/// MIN/MAX of `timestamp` across the whole table. Both fields are null
/// when the table is empty.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReadingRange {
    pub start_timestamp: Option<DateTime<Utc>>,
    pub end_timestamp: Option<DateTime<Utc>>,
}
