use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db::reading_queries;
use crate::domain::EnergyReading;

/// The filter a dataset was fetched with. The timezone is expected to be
/// a validated IANA name by the time it reaches the query layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingFilter {
    pub timezone: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Default for ReadingFilter {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            start: None,
            end: None,
        }
    }
}

/// Last fetched dataset plus the filter that produced it.
///
/// Owned explicitly by the embedding UI layer; `refresh` swaps both in one
/// step, so there is no ambient loading or error state to keep in sync.
#[derive(Debug, Default)]
pub struct DashboardSession {
    filter: ReadingFilter,
    data: Vec<EnergyReading>,
}

impl DashboardSession {
    pub fn filter(&self) -> &ReadingFilter {
        &self.filter
    }

    pub fn data(&self) -> &[EnergyReading] {
        &self.data
    }

    /// Re-query with `filter` and replace the held dataset. On error the
    /// previous dataset and filter are left untouched.
    pub async fn refresh(
        &mut self,
        pool: &PgPool,
        filter: ReadingFilter,
    ) -> Result<&[EnergyReading]> {
        let data =
            reading_queries::fetch_readings(pool, &filter.timezone, filter.start, filter.end)
                .await?;

        self.filter = filter;
        self.data = data;
        Ok(&self.data)
    }
}
