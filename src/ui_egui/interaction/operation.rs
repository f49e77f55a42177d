use crate::models::schedule::{Schedule, ScheduleId, TimeOfDay};
use crate::ui_egui::resize::ResizeEdge;

/// A completed gesture, ready for the board to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Create {
        person: String,
        date: String,
        start: TimeOfDay,
        end: TimeOfDay,
    },
    Move {
        original: Schedule,
        person: String,
        start: TimeOfDay,
        end: TimeOfDay,
    },
    Resize {
        original: Schedule,
        edge: ResizeEdge,
        time: TimeOfDay,
    },
    Delete {
        original: Schedule,
    },
    /// Open the details form for an existing block.
    Edit {
        original: Schedule,
    },
    SelectionToggled {
        id: ScheduleId,
        selected: bool,
    },
}

impl Operation {
    /// Resulting block for operations that rewrite an existing one.
    pub fn updated_schedule(&self) -> Option<Schedule> {
        match self {
            Operation::Move {
                original,
                person,
                start,
                end,
            } => Some(original.moved_to(person, *start, *end)),
            Operation::Resize {
                original,
                edge,
                time,
            } => {
                let (start, end) = match edge {
                    ResizeEdge::Top => (*time, original.end),
                    ResizeEdge::Bottom => (original.start, *time),
                };
                Some(original.moved_to(&original.name, start, end))
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Operation::Create { .. } => "create",
            Operation::Move { .. } => "move",
            Operation::Resize { .. } => "resize",
            Operation::Delete { .. } => "delete",
            Operation::Edit { .. } => "edit",
            Operation::SelectionToggled { .. } => "select",
        }
    }
}
