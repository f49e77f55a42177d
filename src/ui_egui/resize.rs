// Block Resize
//
// Dragging the top or bottom edge of a block changes its start or end time.
// The opposite edge stays pinned and the block never shrinks below one snap
// interval.

use egui::{Pos2, Rect, Vec2};

use crate::models::schedule::{Schedule, TimeOfDay};
use crate::services::time_grid::TimeGrid;

use super::interaction::Operation;

/// Which edge of the block is being dragged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeEdge {
    /// Top edge - adjusts start time
    Top,
    /// Bottom edge - adjusts end time
    Bottom,
}

impl ResizeEdge {
    pub fn cursor_icon(&self) -> egui::CursorIcon {
        egui::CursorIcon::ResizeVertical
    }
}

/// Upper bound for the height of an edge hit zone.
pub const EDGE_ZONE_MAX: f32 = 8.0;
/// Visual size of the handle bar
pub const HANDLE_VISUAL_SIZE: f32 = 4.0;

/// Hit zones along the top and bottom edges of a block.
///
/// Zones never cover more than a quarter of the block each, so short blocks
/// keep a body that can still be grabbed for moving.
pub struct EdgeZones {
    pub top: Rect,
    pub bottom: Rect,
}

impl EdgeZones {
    pub fn for_block(block_rect: Rect) -> Self {
        let zone_height = (block_rect.height() * 0.25).min(EDGE_ZONE_MAX);

        Self {
            top: Rect::from_min_size(
                Pos2::new(block_rect.left(), block_rect.top()),
                Vec2::new(block_rect.width(), zone_height),
            ),
            bottom: Rect::from_min_size(
                Pos2::new(block_rect.left(), block_rect.bottom() - zone_height),
                Vec2::new(block_rect.width(), zone_height),
            ),
        }
    }

    /// Which edge, if any, contains the point
    pub fn hit_test(&self, pos: Pos2) -> Option<ResizeEdge> {
        if self.top.contains(pos) {
            Some(ResizeEdge::Top)
        } else if self.bottom.contains(pos) {
            Some(ResizeEdge::Bottom)
        } else {
            None
        }
    }
}

/// In-progress edge drag. Offsets are relative to the top of the grid.
#[derive(Clone, Debug)]
pub struct ResizeDrag {
    pub schedule: Schedule,
    pub edge: ResizeEdge,
    pub top: f32,
    pub bottom: f32,
}

impl ResizeDrag {
    pub fn begin(schedule: Schedule, edge: ResizeEdge, grid: &TimeGrid) -> Self {
        let top = grid.time_to_pixel(schedule.start_minutes());
        let bottom = grid.time_to_pixel(schedule.end_minutes());
        Self {
            schedule,
            edge,
            top,
            bottom,
        }
    }

    /// Move the dragged edge to the snapped offset, clamped against the
    /// pinned edge and the grid bounds.
    pub fn update(&mut self, offset: f32, grid: &TimeGrid) {
        let snap = grid.snap_interval_px();
        let candidate = grid.snap_pixel(offset);

        match self.edge {
            ResizeEdge::Top => {
                let pinned = grid.time_to_pixel(self.schedule.end_minutes());
                self.top = candidate.min(pinned - snap).max(0.0);
            }
            ResizeEdge::Bottom => {
                let pinned = grid.time_to_pixel(self.schedule.start_minutes());
                self.bottom = candidate.max(pinned + snap).min(grid.grid_height());
            }
        }
    }

    /// New time for the dragged edge, if it differs from the original.
    pub fn finish(self, grid: &TimeGrid) -> Option<Operation> {
        let time = match self.edge {
            ResizeEdge::Top => grid.pixel_to_time(self.top),
            ResizeEdge::Bottom => grid.pixel_to_time(self.bottom),
        };

        let (unchanged, inverted) = match self.edge {
            ResizeEdge::Top => (time == self.schedule.start, time >= self.schedule.end),
            ResizeEdge::Bottom => (time == self.schedule.end, time <= self.schedule.start),
        };
        if unchanged || inverted {
            return None;
        }

        Some(Operation::Resize {
            original: self.schedule,
            edge: self.edge,
            time,
        })
    }

    /// Preview range in times, for labels while dragging.
    pub fn preview_times(&self, grid: &TimeGrid) -> (TimeOfDay, TimeOfDay) {
        match self.edge {
            ResizeEdge::Top => (grid.pixel_to_time(self.top), self.schedule.end),
            ResizeEdge::Bottom => (self.schedule.start, grid.pixel_to_time(self.bottom)),
        }
    }
}

/// Draw a handle bar on each edge of a block.
pub fn draw_handles(
    ui: &egui::Ui,
    zones: &EdgeZones,
    hovered_edge: Option<ResizeEdge>,
    color: egui::Color32,
) {
    for (rect, edge) in [(zones.top, ResizeEdge::Top), (zones.bottom, ResizeEdge::Bottom)] {
        let is_hovered = hovered_edge == Some(edge);
        let width = (rect.width() * 0.3).clamp(8.0, 28.0);
        let center_y = match edge {
            ResizeEdge::Top => rect.top() + HANDLE_VISUAL_SIZE / 2.0 + 1.0,
            ResizeEdge::Bottom => rect.bottom() - HANDLE_VISUAL_SIZE / 2.0 - 1.0,
        };
        let bar = Rect::from_center_size(
            Pos2::new(rect.center().x, center_y),
            Vec2::new(width, HANDLE_VISUAL_SIZE),
        );
        let fill = if is_hovered {
            egui::Color32::WHITE
        } else {
            color.linear_multiply(0.6)
        };
        ui.painter().rect_filled(bar, 2.0, fill);
    }
}
