pub mod types;
pub mod slot_utils;
pub mod grouping;
pub mod source;

pub use types::{CellKey, SlotGroup, SlotStatus};
pub use slot_utils::time_labels;
pub use grouping::GroupCache;
pub use source::{MockSchedule, SlotSource};
