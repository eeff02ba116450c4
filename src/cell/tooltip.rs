use serde::{Deserialize, Serialize};

/// Gap between the anchor cell and the tooltip
const ANCHOR_GAP: f64 = 8.0;
/// Distance kept from the right viewport edge after clamping
const EDGE_MARGIN: f64 = 16.0;

/// On-screen bounding box of the cell that triggered the tooltip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorRect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl AnchorRect {
    /// Empty in either dimension, inverted or non-finite, e.g. read before
    /// the cell was laid out
    pub fn is_degenerate(&self) -> bool {
        let coords = [self.top, self.bottom, self.left, self.right];
        if coords.iter().any(|c| !c.is_finite()) {
            return true;
        }
        self.bottom <= self.top || self.right <= self.left
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipSize {
    pub width: f64,
    pub height: f64,
}

impl Default for TooltipSize {
    fn default() -> Self {
        TooltipSize {
            width: 200.0,
            height: 180.0,
        }
    }
}

/// Top-left corner for fixed positioning of the detail panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPosition {
    pub top: f64,
    pub left: f64,
}

impl TooltipPosition {
    /// Used when no usable anchor was ever measured
    pub const FALLBACK: TooltipPosition = TooltipPosition {
        top: ANCHOR_GAP,
        left: ANCHOR_GAP,
    };
}

/// Geometry read by the caller right before a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub anchor: AnchorRect,
    pub viewport: Viewport,
}

impl Geometry {
    /// Placement for this geometry, `None` if the anchor is unusable
    pub fn placement(&self, size: TooltipSize) -> Option<TooltipPosition> {
        if self.anchor.is_degenerate() {
            return None;
        }
        Some(place_tooltip(self.anchor, self.viewport, size))
    }
}

/// Places the tooltip below the anchor, flipping above it when it would run
/// off the bottom and clamping against the right and top edges.
///
/// Narrow viewports (less than `size.width + 16` wide) can still clip on the
/// left; that case is not corrected.
pub fn place_tooltip(anchor: AnchorRect, viewport: Viewport, size: TooltipSize) -> TooltipPosition {
    let mut top = anchor.bottom + ANCHOR_GAP;
    let mut left = anchor.left;

    if anchor.bottom + size.height > viewport.height {
        top = anchor.top - size.height - ANCHOR_GAP;
    }

    if left + size.width > viewport.width {
        left = viewport.width - size.width - EDGE_MARGIN;
    }

    if top < 0.0 {
        top = ANCHOR_GAP;
    }

    TooltipPosition { top, left }
}
