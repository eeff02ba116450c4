use chrono::NaiveDate;
use serde::Serialize;

use super::interaction::InteractionState;
use super::tooltip::TooltipPosition;
use crate::availability::{CellKey, SlotGroup, SlotStatus};

/// Rendered width of one slot inside a segment
pub const SEGMENT_UNIT_PX: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub index: usize,
    pub status: SlotStatus,
    pub class: &'static str,
    pub width_px: usize,
    pub slot_count: usize,
    pub active: bool,
    pub title: String,
}

/// The floating panel describing the active group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPanel {
    pub room: String,
    pub date: NaiveDate,
    pub time_range: String,
    pub status: SlotStatus,
    pub status_label: &'static str,
    pub detail: String,
    pub position: TooltipPosition,
    /// Only a clicked (pinned) group gets a close button
    pub dismissable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub room: String,
    pub date: NaiveDate,
    pub segments: Vec<Segment>,
    pub panel: Option<DetailPanel>,
}

pub fn render_cell(key: &CellKey, groups: &[SlotGroup], state: &InteractionState) -> CellView {
    let active_index = state.active_group_index();

    let segments = groups
        .iter()
        .enumerate()
        .map(|(index, group)| Segment {
            index,
            status: group.status,
            class: group.status.css_class(),
            width_px: group.slot_count * SEGMENT_UNIT_PX,
            slot_count: group.slot_count,
            active: active_index == Some(index),
            title: format!("{}: {}", group.time_range(), group.status.label()),
        })
        .collect();

    let panel = active_index
        .and_then(|index| groups.get(index))
        .map(|group| DetailPanel {
            room: key.room.clone(),
            date: key.date,
            time_range: group.time_range(),
            status: group.status,
            status_label: group.status.label(),
            detail: group.detail.clone(),
            position: state.tooltip.unwrap_or(TooltipPosition::FALLBACK),
            dismissable: state.active.is_selected(),
        });

    CellView {
        room: key.room.clone(),
        date: key.date,
        segments,
        panel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::grouping::group_slots;
    use crate::availability::types::TimeSlot;
    use crate::cell::interaction::{Active, CellEvent};
    use crate::cell::tooltip::{AnchorRect, Geometry, TooltipSize, Viewport};

    fn key() -> CellKey {
        CellKey::new("Room 3", NaiveDate::from_ymd_opt(2024, 4, 2).unwrap())
    }

    fn groups() -> Vec<SlotGroup> {
        let statuses = [
            SlotStatus::Available,
            SlotStatus::Available,
            SlotStatus::ReservedByOther,
            SlotStatus::ReservedBySelf,
        ];
        let slots: Vec<TimeSlot> = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| TimeSlot {
                id: i as u32,
                status: *status,
                start_time: format!("{}:00", 8 + i),
                end_time: format!("{}:00", 9 + i),
                detail: format!("slot {}", i),
            })
            .collect();
        group_slots(&slots)
    }

    fn geometry() -> Geometry {
        Geometry {
            anchor: AnchorRect {
                top: 700.0,
                bottom: 750.0,
                left: 50.0,
                right: 310.0,
            },
            viewport: Viewport {
                width: 1000.0,
                height: 800.0,
            },
        }
    }

    #[test]
    fn idle_cell_has_segments_but_no_panel() {
        let view = render_cell(&key(), &groups(), &InteractionState::default());
        let widths: Vec<usize> = view.segments.iter().map(|s| s.width_px).collect();
        assert_eq!(widths, vec![40, 20, 20]);
        assert!(view.segments.iter().all(|s| !s.active));
        assert_eq!(view.segments[0].title, "8:00 - 10:00: Available");
        assert_eq!(view.segments[1].class, "timeslot-group-reserved-others");
        assert!(view.panel.is_none());
    }

    #[test]
    fn hovered_group_gets_a_panel_without_close_button() {
        let state = InteractionState::default().transition(
            CellEvent::PointerEnter {
                group: 0,
                geometry: geometry(),
            },
            TooltipSize::default(),
        );
        let view = render_cell(&key(), &groups(), &state);

        assert!(view.segments[0].active);
        let panel = view.panel.unwrap();
        assert_eq!(panel.room, "Room 3");
        assert_eq!(panel.time_range, "8:00 - 10:00");
        assert_eq!(panel.status_label, "Available");
        assert_eq!(panel.detail, "slot 0");
        assert_eq!(panel.position, TooltipPosition { top: 512.0, left: 50.0 });
        assert!(!panel.dismissable);
    }

    #[test]
    fn selected_group_panel_is_dismissable() {
        let state = InteractionState::default().transition(
            CellEvent::Click {
                group: 2,
                geometry: geometry(),
            },
            TooltipSize::default(),
        );
        assert_eq!(
            state.active,
            Active::Selected {
                index: 2,
                hovered: None
            }
        );
        let view = render_cell(&key(), &groups(), &state);
        let panel = view.panel.unwrap();
        assert_eq!(panel.status_label, "Reserved by you");
        assert!(panel.dismissable);
    }

    #[test]
    fn empty_cell_renders_nothing() {
        let view = render_cell(&key(), &[], &InteractionState::default());
        assert!(view.segments.is_empty());
        assert!(view.panel.is_none());
    }
}
