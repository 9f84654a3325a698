use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// The input could not be resolved to any date.
#[derive(Debug, thiserror::Error)]
#[error("invalid date input: {input}")]
pub struct InvalidDateInput {
    pub input: String,
}

/// True iff `tz` names an entry in the IANA timezone database.
pub fn validate_timezone(tz: &str) -> bool {
    tz.parse::<Tz>().is_ok()
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

// US month-first order wins for slashed and dashed dates.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
];

/// Best-effort parse of a free-form date string to an absolute instant.
///
/// Accepts relative words (`now`, `today`, `yesterday`, `tomorrow`),
/// RFC 3339, and a fixed ladder of calendar formats. Date-only inputs
/// resolve to midnight UTC.
pub fn parse_date_input(input: &str) -> Result<DateTime<Utc>, InvalidDateInput> {
    let trimmed = input.trim();

    let today = Utc::now().date_naive();
    match trimmed.to_ascii_lowercase().as_str() {
        "now" => return Ok(Utc::now()),
        "today" => return Ok(midnight_utc(today)),
        "yesterday" => return Ok(midnight_utc(today - Days::new(1))),
        "tomorrow" => return Ok(midnight_utc(today + Days::new(1))),
        _ => {}
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(midnight_utc(date));
        }
    }

    Err(InvalidDateInput {
        input: input.to_string(),
    })
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}
