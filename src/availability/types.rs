use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::slot_utils::parse_time_to_minutes;

/// Reservation status of a single slot (and of every slot in a group)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotStatus {
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "reserved-others")]
    ReservedByOther,
    #[serde(rename = "reserved-self")]
    ReservedBySelf,
}

impl SlotStatus {
    pub const ALL: [SlotStatus; 3] = [
        SlotStatus::Available,
        SlotStatus::ReservedByOther,
        SlotStatus::ReservedBySelf,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SlotStatus::Available => "Available",
            SlotStatus::ReservedByOther => "Reserved by others",
            SlotStatus::ReservedBySelf => "Reserved by you",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            SlotStatus::Available => "timeslot-group-available",
            SlotStatus::ReservedByOther => "timeslot-group-reserved-others",
            SlotStatus::ReservedBySelf => "timeslot-group-reserved-self",
        }
    }

    /// Character used when drawing the grid in a terminal
    pub fn glyph(self) -> char {
        match self {
            SlotStatus::Available => '.',
            SlotStatus::ReservedByOther => '#',
            SlotStatus::ReservedBySelf => '@',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::ReservedByOther => "reserved-others",
            SlotStatus::ReservedBySelf => "reserved-self",
        }
    }
}

/// One fixed-length interval of a room's day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: u32,
    pub status: SlotStatus,
    pub start_time: String, // "H:MM"
    pub end_time: String,
    pub detail: String,
}

/// A maximal run of consecutive slots sharing one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGroup {
    pub status: SlotStatus,
    pub start_time: String,
    pub end_time: String,
    pub detail: String, // detail of the first member only
    pub slot_count: usize,
    pub first_slot_id: u32,
}

impl SlotGroup {
    pub fn time_range(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }

    /// Length of the group in minutes, if both times parse
    pub fn duration_minutes(&self) -> Option<u32> {
        let start = parse_time_to_minutes(&self.start_time)?;
        let end = parse_time_to_minutes(&self.end_time)?;
        end.checked_sub(start)
    }
}

/// Identifies one cell of the grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub room: String,
    pub date: NaiveDate,
}

impl CellKey {
    pub fn new(room: impl Into<String>, date: NaiveDate) -> Self {
        CellKey { room: room.into(), date }
    }
}
