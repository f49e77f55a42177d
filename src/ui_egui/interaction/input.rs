use egui::Pos2;

use crate::models::schedule::Schedule;
use crate::ui_egui::resize::ResizeEdge;

/// Milliseconds on a monotonic clock shared by samples and ticks.
pub type Millis = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDevice {
    Mouse,
    Touch,
}

impl InputDevice {
    /// Touch input can mean "scroll" or "interact"; a mouse press is never
    /// ambiguous.
    pub fn supports_ambiguous_scroll(self) -> bool {
        matches!(self, InputDevice::Touch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
    /// The platform took the pointer away, e.g. the scroll view started
    /// scrolling.
    Cancel,
    DoubleClick,
}

/// Part of a block under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockZone {
    Body,
    Edge(ResizeEdge),
    DeleteButton,
}

/// What the pointer is over, resolved by the view before the sample is fed
/// to the machine.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    EmptyCell { person: String },
    Block { schedule: Schedule, zone: BlockZone },
    Outside,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerSample {
    pub device: InputDevice,
    pub phase: PointerPhase,
    pub pos: Pos2,
    pub at: Millis,
    pub target: HitTarget,
}

impl PointerSample {
    pub fn new(
        device: InputDevice,
        phase: PointerPhase,
        pos: Pos2,
        at: Millis,
        target: HitTarget,
    ) -> Self {
        Self {
            device,
            phase,
            pos,
            at,
            target,
        }
    }

    pub fn touch(phase: PointerPhase, pos: Pos2, at: Millis, target: HitTarget) -> Self {
        Self::new(InputDevice::Touch, phase, pos, at, target)
    }

    pub fn mouse(phase: PointerPhase, pos: Pos2, at: Millis, target: HitTarget) -> Self {
        Self::new(InputDevice::Mouse, phase, pos, at, target)
    }
}
