use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::state::{FilterState, ALL_WEEKDAYS};
use crate::error::{ViewerError, ViewerResult};

/// Longest date range that may be shown at once, in days
pub const MAX_RANGE_DAYS: i64 = 50;

/// Filter form as sent by the frontend (or built from CLI flags)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub start_date: String, // YYYY-MM-DD, empty = unbounded
    #[serde(default)]
    pub end_date: String,
    #[serde(default = "all_weekdays")]
    pub weekdays: Vec<u8>,
    #[serde(default)]
    pub reservable_only: bool,
}

fn all_weekdays() -> Vec<u8> {
    ALL_WEEKDAYS.to_vec()
}

impl From<&FilterState> for FilterRequest {
    fn from(state: &FilterState) -> Self {
        let format = |date: Option<NaiveDate>| date.map(|d| d.to_string()).unwrap_or_default();
        FilterRequest {
            start_date: format(state.start_date),
            end_date: format(state.end_date),
            weekdays: state.weekdays.iter().copied().collect(),
            reservable_only: state.reservable_only,
        }
    }
}

fn parse_date(value: &str) -> ViewerResult<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ViewerError::InvalidDate(value.to_string()))
}

/// Validates a filter request and turns it into the state to apply
pub fn validate_filters(req: &FilterRequest) -> ViewerResult<FilterState> {
    let start_date = parse_date(&req.start_date)?;
    let end_date = parse_date(&req.end_date)?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        let days = (end - start).num_days();
        if days > MAX_RANGE_DAYS {
            return Err(ViewerError::RangeTooLong { days });
        }
    }

    let mut weekdays = BTreeSet::new();
    for &weekday in &req.weekdays {
        if weekday > 6 {
            return Err(ViewerError::InvalidWeekday(weekday));
        }
        weekdays.insert(weekday);
    }

    Ok(FilterState {
        start_date,
        end_date,
        weekdays,
        reservable_only: req.reservable_only,
    })
}
