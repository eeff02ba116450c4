use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::availability::SlotSource;

/// Weekday numbering used throughout: 0 = Sunday .. 6 = Saturday
pub const ALL_WEEKDAYS: [u8; 7] = [0, 1, 2, 3, 4, 5, 6];

/// Length of the date window shown before the user picks a range
pub const DEFAULT_RANGE_DAYS: u64 = 14;

/// The filters currently applied to the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub weekdays: BTreeSet<u8>,
    pub reservable_only: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            start_date: None,
            end_date: None,
            weekdays: ALL_WEEKDAYS.iter().copied().collect(),
            reservable_only: false,
        }
    }
}

impl FilterState {
    /// The first two weeks of the source (or less), every weekday, every room
    pub fn for_source<S: SlotSource + ?Sized>(source: &S) -> Self {
        let (start_date, end_date) = default_range(source.dates());
        FilterState {
            start_date,
            end_date,
            ..FilterState::default()
        }
    }

    pub fn includes_date(&self, date: NaiveDate) -> bool {
        if self.start_date.is_some_and(|start| date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }
        let weekday = date.weekday().num_days_from_sunday() as u8;
        self.weekdays.contains(&weekday)
    }

    /// Rooms and dates of `source` that pass the filters, in source order
    pub fn apply<S: SlotSource + ?Sized>(&self, source: &S) -> (Vec<String>, Vec<NaiveDate>) {
        let rooms = source
            .rooms()
            .iter()
            .filter(|room| !self.reservable_only || source.is_reservable(room))
            .cloned()
            .collect();
        let dates = source
            .dates()
            .iter()
            .copied()
            .filter(|date| self.includes_date(*date))
            .collect();
        (rooms, dates)
    }
}

/// `dates[0]` through the 14th day after it, capped at the last date
pub fn default_range(dates: &[NaiveDate]) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let (Some(first), Some(last)) = (dates.first().copied(), dates.last().copied()) else {
        return (None, None);
    };
    let window_end = first
        .checked_add_days(Days::new(DEFAULT_RANGE_DAYS - 1))
        .map_or(last, |end| end.min(last));
    (Some(first), Some(window_end))
}
