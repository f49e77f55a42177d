use egui::Pos2;

use crate::services::time_grid::TimeGrid;

/// Horizontal extent of one person's column, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpan {
    pub person: String,
    pub left: f32,
    pub width: f32,
}

impl ColumnSpan {
    pub fn new(person: impl Into<String>, left: f32, width: f32) -> Self {
        Self {
            person: person.into(),
            left,
            width,
        }
    }

    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.left && x < self.left + self.width
    }
}

/// Where the grid is on screen for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardGeometry {
    pub grid: TimeGrid,
    /// Screen position of the first hour row's top edge.
    pub origin: Pos2,
    pub columns: Vec<ColumnSpan>,
    /// Day key new blocks are created on.
    pub date: String,
}

impl BoardGeometry {
    /// Vertical offset from the top of the grid.
    pub fn offset_y(&self, pos: Pos2) -> f32 {
        pos.y - self.origin.y
    }

    pub fn person_at(&self, x: f32) -> Option<&str> {
        self.columns
            .iter()
            .find(|column| column.contains_x(x))
            .map(|column| column.person.as_str())
    }

    pub fn column(&self, person: &str) -> Option<&ColumnSpan> {
        self.columns.iter().find(|column| column.person == person)
    }
}
