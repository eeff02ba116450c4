use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::availability::{time_labels, CellKey};

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Formats a date as shown in grid headers, e.g. "4/1(Mon)"
pub fn format_date(date: NaiveDate) -> String {
    let weekday = WEEKDAY_NAMES[date.weekday().num_days_from_sunday() as usize];
    format!("{}/{}({})", date.month(), date.day(), weekday)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub label: String,
    pub striped: bool,
    pub cells: Vec<CellKey>,
}

/// Header and row structure of the grid; rooms run down and dates across
/// unless transposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLayout {
    pub transposed: bool,
    pub corner_label: &'static str,
    pub column_headers: Vec<String>,
    pub time_labels: Vec<String>,
    pub rows: Vec<GridRow>,
}

impl GridLayout {
    pub fn build(rooms: &[String], dates: &[NaiveDate], transposed: bool) -> Self {
        if transposed {
            GridLayout {
                transposed,
                corner_label: "Date / Room",
                column_headers: rooms.to_vec(),
                time_labels: time_labels(),
                rows: dates
                    .iter()
                    .enumerate()
                    .map(|(i, date)| GridRow {
                        label: format_date(*date),
                        striped: i % 2 == 1,
                        cells: rooms.iter().map(|room| CellKey::new(room.clone(), *date)).collect(),
                    })
                    .collect(),
            }
        } else {
            GridLayout {
                transposed,
                corner_label: "Room / Date",
                column_headers: dates.iter().map(|d| format_date(*d)).collect(),
                time_labels: time_labels(),
                rows: rooms
                    .iter()
                    .enumerate()
                    .map(|(i, room)| GridRow {
                        label: room.clone(),
                        striped: i % 2 == 1,
                        cells: dates.iter().map(|date| CellKey::new(room.clone(), *date)).collect(),
                    })
                    .collect(),
            }
        }
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &CellKey> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }
}
