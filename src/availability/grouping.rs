use std::collections::HashMap;

use tracing::debug;

use super::types::{CellKey, SlotGroup, TimeSlot};

/// Merges adjacent slots with the same status into groups.
///
/// Single pass: a group is opened on the first slot and on every status
/// change, and extended otherwise. The groups partition the input in order
/// and no two neighbouring groups share a status.
pub fn group_slots(slots: &[TimeSlot]) -> Vec<SlotGroup> {
    let mut groups = Vec::new();
    let mut current: Option<SlotGroup> = None;

    for slot in slots {
        match current.as_mut() {
            Some(group) if group.status == slot.status => {
                group.end_time = slot.end_time.clone();
                group.slot_count += 1;
            }
            _ => {
                if let Some(done) = current.take() {
                    groups.push(done);
                }
                current = Some(SlotGroup {
                    status: slot.status,
                    start_time: slot.start_time.clone(),
                    end_time: slot.end_time.clone(),
                    detail: slot.detail.clone(),
                    slot_count: 1,
                    first_slot_id: slot.id,
                });
            }
        }
    }

    if let Some(done) = current {
        groups.push(done);
    }

    groups
}

/// Grouped slots per cell, keyed on the cell and the source data version
/// rather than on the identity of the slot vector.
#[derive(Debug, Default)]
pub struct GroupCache {
    entries: HashMap<CellKey, (u64, Vec<SlotGroup>)>,
}

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the groups for `key`, recomputing them when `version` moved on
    pub fn groups(&mut self, key: &CellKey, version: u64, slots: &[TimeSlot]) -> &[SlotGroup] {
        let stale = !matches!(self.entries.get(key), Some((v, _)) if *v == version);
        if stale {
            debug!(room = %key.room, date = %key.date, version, "grouping slots");
            self.entries
                .insert(key.clone(), (version, group_slots(slots)));
        }
        self.entries
            .get(key)
            .map(|(_, groups)| groups.as_slice())
            .unwrap_or(&[])
    }

    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }
}
