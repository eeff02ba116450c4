pub mod tooltip;
pub mod interaction;
pub mod render;

pub use tooltip::{AnchorRect, Geometry, TooltipSize, Viewport};
pub use interaction::{CellControllers, CellEvent};
pub use render::{render_cell, CellView};
