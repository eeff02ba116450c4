use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::tooltip::{Geometry, TooltipPosition, TooltipSize};
use crate::availability::CellKey;

/// Which group of a cell drives the detail panel.
///
/// A selection (click) masks the hover; the masked hover is kept so that
/// toggling the selection off falls back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Active {
    #[default]
    Idle,
    Hovered {
        index: usize,
    },
    Selected {
        index: usize,
        hovered: Option<usize>,
    },
}

impl Active {
    pub fn group_index(&self) -> Option<usize> {
        match *self {
            Active::Idle => None,
            Active::Hovered { index } | Active::Selected { index, .. } => Some(index),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Active::Selected { .. })
    }

    fn hovered(&self) -> Option<usize> {
        match *self {
            Active::Idle => None,
            Active::Hovered { index } => Some(index),
            Active::Selected { hovered, .. } => hovered,
        }
    }

    /// What is left once the selection goes away
    fn without_selection(self) -> Active {
        match self.hovered() {
            Some(index) => Active::Hovered { index },
            None => Active::Idle,
        }
    }
}

/// Pointer input for one cell. Geometry is measured by the caller at the
/// moment of the event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellEvent {
    PointerEnter { group: usize, geometry: Geometry },
    PointerLeave,
    Click { group: usize, geometry: Geometry },
    Close,
}

impl CellEvent {
    fn group(&self) -> Option<usize> {
        match *self {
            CellEvent::PointerEnter { group, .. } | CellEvent::Click { group, .. } => Some(group),
            CellEvent::PointerLeave | CellEvent::Close => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct InteractionState {
    pub active: Active,
    pub tooltip: Option<TooltipPosition>,
}

impl InteractionState {
    pub fn active_group_index(&self) -> Option<usize> {
        self.active.group_index()
    }

    /// Applies one event. Pure apart from logging.
    pub fn transition(self, event: CellEvent, size: TooltipSize) -> InteractionState {
        let (active, tooltip) = match event {
            CellEvent::PointerEnter { group, geometry } => {
                let active = match self.active {
                    Active::Selected { index, .. } => Active::Selected {
                        index,
                        hovered: Some(group),
                    },
                    Active::Idle | Active::Hovered { .. } => Active::Hovered { index: group },
                };
                // Placement is refreshed on every enter, even under a pinned selection
                (active, self.placed(geometry, size))
            }
            CellEvent::PointerLeave => {
                let active = match self.active {
                    Active::Selected { index, .. } => Active::Selected {
                        index,
                        hovered: None,
                    },
                    Active::Idle | Active::Hovered { .. } => Active::Idle,
                };
                (active, self.tooltip)
            }
            CellEvent::Click { group, geometry } => match self.active {
                Active::Selected { index, .. } if index == group => {
                    (self.active.without_selection(), self.tooltip)
                }
                _ => (
                    Active::Selected {
                        index: group,
                        hovered: self.active.hovered(),
                    },
                    self.placed(geometry, size),
                ),
            },
            CellEvent::Close => (self.active.without_selection(), self.tooltip),
        };

        let tooltip = match active {
            Active::Idle => None,
            _ => tooltip,
        };
        InteractionState { active, tooltip }
    }

    fn placed(&self, geometry: Geometry, size: TooltipSize) -> Option<TooltipPosition> {
        match geometry.placement(size) {
            Some(position) => Some(position),
            None => {
                warn!(anchor = ?geometry.anchor, "degenerate anchor, keeping previous tooltip position");
                Some(self.tooltip.unwrap_or(TooltipPosition::FALLBACK))
            }
        }
    }
}

/// Interaction state of one cell, tied to the data version its group
/// indices were computed from.
#[derive(Debug, Clone, Default)]
pub struct CellController {
    state: InteractionState,
    version: u64,
}

impl CellController {
    pub fn new(version: u64) -> Self {
        CellController {
            state: InteractionState::default(),
            version,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Drops the state if the cell's data changed since it was built
    pub fn sync(&mut self, version: u64) {
        if self.version != version {
            debug!(from = self.version, to = version, "cell data changed, resetting interaction");
            self.state = InteractionState::default();
            self.version = version;
        }
    }

    /// Feeds one event; events naming a group that does not exist are ignored
    pub fn handle(&mut self, event: CellEvent, version: u64, group_count: usize, size: TooltipSize) -> InteractionState {
        self.sync(version);
        if let Some(group) = event.group() {
            if group >= group_count {
                debug!(group, group_count, "ignoring event for unknown group");
                return self.state;
            }
        }
        self.state = self.state.transition(event, size);
        self.state
    }
}

/// All cell controllers of a grid
#[derive(Debug, Default)]
pub struct CellControllers {
    cells: HashMap<CellKey, CellController>,
    tooltip_size: TooltipSize,
}

impl CellControllers {
    pub fn new(tooltip_size: TooltipSize) -> Self {
        CellControllers {
            cells: HashMap::new(),
            tooltip_size,
        }
    }

    pub fn handle(&mut self, key: &CellKey, event: CellEvent, version: u64, group_count: usize) -> InteractionState {
        let size = self.tooltip_size;
        self.cells
            .entry(key.clone())
            .or_insert_with(|| CellController::new(version))
            .handle(event, version, group_count, size)
    }

    /// Current state of a cell, empty if it was never touched or its data changed
    pub fn state(&self, key: &CellKey, version: u64) -> InteractionState {
        match self.cells.get(key) {
            Some(controller) if controller.version == version => controller.state(),
            _ => InteractionState::default(),
        }
    }
}
