use crate::models::schedule::TimeOfDay;
use crate::models::settings::GestureSettings;
use crate::services::time_grid::TimeGrid;

use super::{BoardGeometry, Operation};

/// Range being swept out in an empty column. Offsets are unsnapped while
/// dragging and only rounded when the gesture completes.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDrag {
    pub person: String,
    pub start_y: f32,
    pub current_y: f32,
}

impl CreateDrag {
    pub fn new(person: String, start_y: f32) -> Self {
        Self {
            person,
            start_y,
            current_y: start_y,
        }
    }

    pub fn update(&mut self, offset: f32, grid: &TimeGrid) {
        self.current_y = offset.clamp(0.0, grid.grid_height());
    }

    pub fn top(&self) -> f32 {
        self.start_y.min(self.current_y)
    }

    pub fn bottom(&self) -> f32 {
        self.start_y.max(self.current_y)
    }

    pub fn finish(self, geometry: &BoardGeometry, config: &GestureSettings) -> Option<Operation> {
        if self.bottom() - self.top() < config.min_create_span_px {
            return None;
        }

        let start = geometry.grid.pixel_to_time(self.top());
        let end = geometry.grid.pixel_to_time(self.bottom());
        if end <= start {
            return None;
        }

        Some(Operation::Create {
            person: self.person,
            date: geometry.date.clone(),
            start,
            end,
        })
    }
}

/// Block of the default length starting at the tapped row. Near the bottom
/// of the grid the end is clamped to the last row and the start pulled back
/// so the block still spans at least one snap interval.
pub fn default_block(
    person: &str,
    offset: f32,
    geometry: &BoardGeometry,
    config: &GestureSettings,
) -> Operation {
    let grid = &geometry.grid;
    let grid_end = TimeOfDay::clamped(grid.end_minutes() as i64);
    let snap = grid.snap_minutes() as i64;

    let start = grid.pixel_to_time(offset).min(grid_end);
    let end = start
        .checked_add_minutes(config.default_duration_minutes as i64)
        .unwrap_or(TimeOfDay::END_OF_DAY)
        .min(grid_end);
    let start = if end.minutes() as i64 - start.minutes() as i64 >= snap {
        start
    } else {
        TimeOfDay::clamped(end.minutes() as i64 - snap)
    };

    Operation::Create {
        person: person.to_string(),
        date: geometry.date.clone(),
        start,
        end,
    }
}
