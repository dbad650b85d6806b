// Query-parameter validation: raw query string -> typed per-request filter.
// Pure, no storage access; all failures are InvalidParameter.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::ApiError;

/// Validated /stats filter. Built once per request, immutable.
/// Absent `from`/`to` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsFilter {
    pub machine_id: i64,
    pub from_ts: Option<i64>,
    pub to_ts: Option<i64>,
}

impl StatsFilter {
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, ApiError> {
        let machine_id = params
            .get("machine_id")
            .ok_or_else(|| ApiError::InvalidParameter("machine_id is required".into()))?;
        let machine_id = machine_id.parse::<i64>().map_err(|_| {
            ApiError::InvalidParameter(format!("machine_id should be an integer: {machine_id}"))
        })?;

        // Empty values count as absent, same as a missing parameter.
        let from_ts = params
            .get("from")
            .filter(|v| !v.is_empty())
            .map(|v| datetime_to_ts(v))
            .transpose()?;
        let to_ts = params
            .get("to")
            .filter(|v| !v.is_empty())
            .map(|v| datetime_to_ts(v))
            .transpose()?;

        Ok(Self {
            machine_id,
            from_ts,
            to_ts,
        })
    }

    pub fn unbounded(machine_id: i64) -> Self {
        Self {
            machine_id,
            from_ts: None,
            to_ts: None,
        }
    }
}

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a date/time string to unix seconds. Accepts RFC 3339, a naive
/// datetime, a date, or a bare year; naive values are interpreted as UTC.
pub fn datetime_to_ts(value: &str) -> Result<i64, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(naive.and_utc().timestamp());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp());
    }
    if value.len() == 4
        && let Ok(year) = value.parse::<i32>()
        && let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1)
    {
        return Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp());
    }
    Err(ApiError::InvalidParameter(format!(
        "cannot parse date/time: {value}"
    )))
}
