use rand::Rng;
use serde::Serialize;

use crate::availability::{CellKey, GroupCache, MockSchedule, SlotGroup, SlotSource, SlotStatus};
use crate::cell::{render_cell, CellControllers, CellEvent, CellView, TooltipSize};
use crate::error::{ViewerError, ViewerResult};
use crate::filter::FilterState;
use crate::grid::GridLayout;

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub status: SlotStatus,
    pub label: &'static str,
    pub class: &'static str,
}

pub fn legend() -> Vec<LegendEntry> {
    SlotStatus::ALL
        .iter()
        .map(|status| LegendEntry {
            status: *status,
            label: status.label(),
            class: status.css_class(),
        })
        .collect()
}

/// Everything needed to draw the grid once
#[derive(Debug, Clone, Serialize)]
pub struct GridResponse {
    pub legend: Vec<LegendEntry>,
    pub layout: GridLayout,
    pub cells: Vec<CellView>,
}

/// Ties a slot source to the grouping cache and the per-cell interaction state
pub struct Viewer<S: SlotSource> {
    source: S,
    cache: GroupCache,
    cells: CellControllers,
}

impl<S: SlotSource> Viewer<S> {
    pub fn new(source: S, tooltip_size: TooltipSize) -> Self {
        Viewer {
            source,
            cache: GroupCache::new(),
            cells: CellControllers::new(tooltip_size),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Grouped slots of a cell
    pub fn groups(&mut self, key: &CellKey) -> ViewerResult<&[SlotGroup]> {
        let slots = self
            .source
            .slots(&key.room, key.date)
            .ok_or_else(|| unknown_cell(key))?;
        Ok(self.cache.groups(key, self.source.version(), slots))
    }

    pub fn cell_view(&mut self, key: &CellKey) -> ViewerResult<CellView> {
        let version = self.source.version();
        let state = self.cells.state(key, version);
        let groups = self.groups(key)?;
        Ok(render_cell(key, groups, &state))
    }

    /// Feeds a pointer event to a cell and renders the result
    pub fn handle(&mut self, key: &CellKey, event: CellEvent) -> ViewerResult<CellView> {
        let version = self.source.version();
        let group_count = self.groups(key)?.len();
        let state = self.cells.handle(key, event, version, group_count);
        let groups = self.groups(key)?;
        Ok(render_cell(key, groups, &state))
    }

    pub fn visible(&self, filter: &FilterState, transposed: bool) -> GridLayout {
        let (rooms, dates) = filter.apply(&self.source);
        GridLayout::build(&rooms, &dates, transposed)
    }

    pub fn grid(&mut self, filter: &FilterState, transposed: bool) -> ViewerResult<GridResponse> {
        let layout = self.visible(filter, transposed);
        let cells = layout
            .cells()
            .map(|key| self.cell_view(key))
            .collect::<ViewerResult<Vec<_>>>()?;
        Ok(GridResponse {
            legend: legend(),
            layout,
            cells,
        })
    }
}

impl Viewer<MockSchedule> {
    /// Redraws the mock data; every cell's interaction state becomes stale
    pub fn regenerate<R: Rng>(&mut self, rng: &mut R) -> u64 {
        self.source.regenerate(rng);
        self.cache.invalidate_all();
        self.source.version()
    }
}

fn unknown_cell(key: &CellKey) -> ViewerError {
    ViewerError::UnknownCell {
        room: key.room.clone(),
        date: key.date.to_string(),
    }
}
