use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};
use rand::Rng;
use tracing::{info, warn};

use super::slot_utils::{slot_end_time, slot_start_time, SLOTS_PER_DAY};
use super::types::{SlotStatus, TimeSlot};

/// Where the grid gets its rooms, dates and per-cell slots from
pub trait SlotSource {
    fn rooms(&self) -> &[String];
    fn dates(&self) -> &[NaiveDate];
    /// Whether the current user may book `room`
    fn is_reservable(&self, room: &str) -> bool;
    /// Ordered, contiguous slots of one room on one date
    fn slots(&self, room: &str, date: NaiveDate) -> Option<&[TimeSlot]>;
    /// Bumped every time the slot data changes
    fn version(&self) -> u64;
}

/// Randomly generated availability for a fixed set of rooms
#[derive(Debug, Clone)]
pub struct MockSchedule {
    rooms: Vec<String>,
    reservable: HashSet<String>,
    dates: Vec<NaiveDate>,
    data: HashMap<(String, NaiveDate), Vec<TimeSlot>>,
    version: u64,
}

impl MockSchedule {
    /// Builds `days` consecutive days starting at `first_date` and fills them.
    /// Stops early at the last date chrono can represent.
    pub fn generate<R: Rng>(first_date: NaiveDate, days: u32, rng: &mut R) -> Self {
        let rooms: Vec<String> = (1..=5).map(|n| format!("Room {}", n)).collect();
        let reservable = ["Room 1", "Room 3", "Room 4"]
            .iter()
            .map(|r| r.to_string())
            .collect();
        let dates: Vec<NaiveDate> = (0..days)
            .map_while(|offset| first_date.checked_add_days(Days::new(u64::from(offset))))
            .collect();
        if dates.len() < days as usize {
            warn!(requested = days, generated = dates.len(), "date range runs past the calendar limit");
        }

        let mut schedule = MockSchedule {
            rooms,
            reservable,
            dates,
            data: HashMap::new(),
            version: 0,
        };
        schedule.regenerate(rng);
        schedule
    }

    /// Redraws every slot and bumps the version
    pub fn regenerate<R: Rng>(&mut self, rng: &mut R) {
        let mut data = HashMap::with_capacity(self.rooms.len() * self.dates.len());
        for room in &self.rooms {
            for date in &self.dates {
                data.insert((room.clone(), *date), random_day(rng));
            }
        }
        self.data = data;
        self.version += 1;
        info!(
            rooms = self.rooms.len(),
            days = self.dates.len(),
            version = self.version,
            "generated mock availability"
        );
    }
}

fn random_day<R: Rng>(rng: &mut R) -> Vec<TimeSlot> {
    (0..SLOTS_PER_DAY)
        .map(|i| {
            let (status, detail) = random_status(rng.gen::<f64>());
            TimeSlot {
                id: i,
                status,
                start_time: slot_start_time(i),
                end_time: slot_end_time(i),
                detail: detail.to_string(),
            }
        })
        .collect()
}

/// Maps a uniform sample in [0, 1) to a status: 50% available, 30% others, 20% self
fn random_status(sample: f64) -> (SlotStatus, &'static str) {
    if sample < 0.5 {
        (SlotStatus::Available, "Open for booking")
    } else if sample < 0.8 {
        (SlotStatus::ReservedByOther, "Reserved by Taro Yamada")
    } else {
        (SlotStatus::ReservedBySelf, "Your reservation")
    }
}

impl SlotSource for MockSchedule {
    fn rooms(&self) -> &[String] {
        &self.rooms
    }

    fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    fn is_reservable(&self, room: &str) -> bool {
        self.reservable.contains(room)
    }

    fn slots(&self, room: &str, date: NaiveDate) -> Option<&[TimeSlot]> {
        self.data
            .get(&(room.to_string(), date))
            .map(|slots| slots.as_slice())
    }

    fn version(&self) -> u64 {
        self.version
    }
}
