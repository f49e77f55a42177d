use egui::Pos2;

use crate::models::schedule::Schedule;

use super::interaction::{BoardGeometry, Operation};

/// Snapped tops may overshoot the grid by float noise.
const EDGE_TOLERANCE: f32 = 0.5;

/// In-progress move of a whole block, possibly into another column.
#[derive(Clone, Debug)]
pub struct MoveDrag {
    pub schedule: Schedule,
    /// Distance from the block's top edge to the grab point. Constant for
    /// the whole gesture so the block does not jump under the pointer.
    pub grab_offset: f32,
    /// Column under the pointer, `None` while outside every column.
    pub target_person: Option<String>,
    /// Last accepted top offset.
    pub top: f32,
    pub pointer_pos: Pos2,
    moved_vertically: bool,
}

impl MoveDrag {
    pub fn begin(schedule: Schedule, press_pos: Pos2, geometry: &BoardGeometry) -> Self {
        let top = geometry.grid.time_to_pixel(schedule.start_minutes());
        let grab_offset = geometry.offset_y(press_pos) - top;
        let target_person = Some(schedule.name.clone());
        Self {
            schedule,
            grab_offset,
            target_person,
            top,
            pointer_pos: press_pos,
            moved_vertically: false,
        }
    }

    pub fn height(&self, geometry: &BoardGeometry) -> f32 {
        geometry
            .grid
            .duration_to_pixels(self.schedule.duration_minutes())
    }

    pub fn update(&mut self, pos: Pos2, geometry: &BoardGeometry) {
        self.pointer_pos = pos;
        self.target_person = geometry.person_at(pos.x).map(str::to_string);

        let grid = &geometry.grid;
        let candidate = grid.snap_pixel(geometry.offset_y(pos) - self.grab_offset);
        let height = self.height(geometry);
        if candidate < -EDGE_TOLERANCE || candidate + height > grid.grid_height() + EDGE_TOLERANCE
        {
            // Keep the last position that fit inside the grid.
            return;
        }

        self.top = candidate.max(0.0);
        self.moved_vertically = true;
    }

    pub fn is_valid(&self) -> bool {
        self.target_person.is_some()
    }

    pub fn finish(self, geometry: &BoardGeometry) -> Option<Operation> {
        let person = match self.target_person {
            Some(person) => person,
            None => {
                log::debug!("Move of {} dropped outside every column", self.schedule.id);
                return None;
            }
        };

        let start = if self.moved_vertically {
            geometry.grid.pixel_to_time(self.top)
        } else {
            self.schedule.start
        };
        let end = start.checked_add_minutes(self.schedule.duration_minutes() as i64)?;

        if person == self.schedule.name && start == self.schedule.start {
            return None;
        }

        Some(Operation::Move {
            original: self.schedule,
            person,
            start,
            end,
        })
    }
}
