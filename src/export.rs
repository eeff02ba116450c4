use std::io::Write;

use csv::WriterBuilder;

use crate::availability::{CellKey, SlotSource};
use crate::error::ViewerResult;
use crate::grid::GridLayout;
use crate::viewer::Viewer;

const HEADER: [&str; 9] = [
    "room",
    "date",
    "start_time",
    "end_time",
    "minutes",
    "status",
    "slot_count",
    "first_slot_id",
    "detail",
];

/// Writes one CSV record per slot group of every cell in `layout`
pub fn export_groups_to_csv<S: SlotSource, W: Write>(
    viewer: &mut Viewer<S>,
    layout: &GridLayout,
    out: W,
) -> ViewerResult<usize> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record(HEADER)?;

    let keys: Vec<CellKey> = layout.cells().cloned().collect();
    let mut records = 0;
    for key in &keys {
        let date = key.date.to_string();
        for group in viewer.groups(key)? {
            let minutes = group.duration_minutes().map(|m| m.to_string()).unwrap_or_default();
            wtr.write_record([
                key.room.as_str(),
                date.as_str(),
                group.start_time.as_str(),
                group.end_time.as_str(),
                minutes.as_str(),
                group.status.as_str(),
                group.slot_count.to_string().as_str(),
                group.first_slot_id.to_string().as_str(),
                group.detail.as_str(),
            ])?;
            records += 1;
        }
    }

    wtr.flush()?;
    Ok(records)
}
