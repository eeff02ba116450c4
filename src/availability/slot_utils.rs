/// First bookable hour of the day
pub const FIRST_HOUR: u32 = 8;

/// Number of one-hour slots per room and day (8:00 - 21:00)
pub const SLOTS_PER_DAY: u32 = 13;

/// Start time of a slot, e.g. slot 0 -> "8:00"
pub fn slot_start_time(slot: u32) -> String {
    format!("{}:00", FIRST_HOUR + slot)
}

/// End time of a slot, e.g. slot 0 -> "9:00"
pub fn slot_end_time(slot: u32) -> String {
    format!("{}:00", FIRST_HOUR + slot + 1)
}

/// Hour labels shown above every column ("8", "9", ... "20")
pub fn time_labels() -> Vec<String> {
    (0..SLOTS_PER_DAY)
        .map(|slot| slot_start_time(slot).trim_end_matches(":00").to_string())
        .collect()
}

/// Parses a time string (H:MM or HH:MM) to minutes since midnight
pub fn parse_time_to_minutes(time_str: &str) -> Option<u32> {
    let (hours, minutes) = time_str.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}
