//! Pointer gesture recognition for the board.
//!
//! Every pointer sample is fed to [`InteractionMachine::handle`], which owns
//! the single active gesture. Touch presses are ambiguous (the finger might be
//! scrolling), so on touch a press first becomes a *pending* gesture that only
//! turns into an interaction after a hold timer fires without the finger
//! travelling. Mouse presses skip that step.
//!
//! Timers are deadlines compared against sample timestamps and
//! [`InteractionMachine::tick`]; nothing here reads a clock.

mod create;
mod geometry;
mod input;
mod operation;

pub use create::{default_block, CreateDrag};
pub use geometry::{BoardGeometry, ColumnSpan};
pub use input::{BlockZone, HitTarget, InputDevice, Millis, PointerPhase, PointerSample};
pub use operation::Operation;

use egui::Pos2;

use crate::models::schedule::{Schedule, ScheduleId};
use crate::models::settings::GestureSettings;

use super::drag::MoveDrag;
use super::resize::{ResizeDrag, ResizeEdge};

/// Coarse state, for status text and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    Idle,
    Pending,
    Creating,
    Moving,
    Resizing,
    Selected,
}

/// In-flight gesture to draw on top of the board.
#[derive(Debug, Clone, Copy)]
pub enum Preview<'a> {
    Creating(&'a CreateDrag),
    Moving(&'a MoveDrag),
    Resizing(&'a ResizeDrag),
}

#[derive(Debug, Clone)]
enum PendingKind {
    Creation { person: String },
    Block { schedule: Schedule, was_selected: bool },
}

#[derive(Debug, Clone)]
struct PendingGesture {
    kind: PendingKind,
    origin: Pos2,
    offset_y: f32,
    deadline: Millis,
}

#[derive(Debug, Clone)]
struct Selection {
    schedule: Schedule,
    /// Press position while the finger that confirmed the long press is
    /// still down; travelling from here turns the selection into a move.
    held_at: Option<Pos2>,
}

#[derive(Debug, Clone, Copy)]
struct TapRecord {
    pos: Pos2,
    at: Millis,
}

#[derive(Debug, Clone, Default)]
enum GestureState {
    #[default]
    Idle,
    Pending(PendingGesture),
    Creating(CreateDrag),
    Moving(MoveDrag),
    Resizing(ResizeDrag),
    Selected(Selection),
}

pub struct InteractionMachine {
    config: GestureSettings,
    state: GestureState,
    last_empty_tap: Option<TapRecord>,
    last_block_tap: Option<(ScheduleId, Millis)>,
    haptic_requested: bool,
}

impl InteractionMachine {
    pub fn new(config: GestureSettings) -> Self {
        Self {
            config,
            state: GestureState::Idle,
            last_empty_tap: None,
            last_block_tap: None,
            haptic_requested: false,
        }
    }

    pub fn phase(&self) -> InteractionPhase {
        match self.state {
            GestureState::Idle => InteractionPhase::Idle,
            GestureState::Pending(_) => InteractionPhase::Pending,
            GestureState::Creating(_) => InteractionPhase::Creating,
            GestureState::Moving(_) => InteractionPhase::Moving,
            GestureState::Resizing(_) => InteractionPhase::Resizing,
            GestureState::Selected(_) => InteractionPhase::Selected,
        }
    }

    /// Block currently shown as selected, including while a tap on it is
    /// still undecided.
    pub fn selected(&self) -> Option<ScheduleId> {
        match &self.state {
            GestureState::Selected(selection) => Some(selection.schedule.id),
            GestureState::Pending(PendingGesture {
                kind:
                    PendingKind::Block {
                        schedule,
                        was_selected: true,
                    },
                ..
            }) => Some(schedule.id),
            _ => None,
        }
    }

    /// True while a gesture owns the pointer and the scroll view must not
    /// scroll.
    pub fn captures_input(&self) -> bool {
        match &self.state {
            GestureState::Creating(_) | GestureState::Moving(_) | GestureState::Resizing(_) => {
                true
            }
            GestureState::Selected(selection) => selection.held_at.is_some(),
            GestureState::Idle | GestureState::Pending(_) => false,
        }
    }

    pub fn pending_deadline(&self) -> Option<Millis> {
        match &self.state {
            GestureState::Pending(pending) => Some(pending.deadline),
            _ => None,
        }
    }

    pub fn preview(&self) -> Option<Preview<'_>> {
        match &self.state {
            GestureState::Creating(drag) => Some(Preview::Creating(drag)),
            GestureState::Moving(drag) => Some(Preview::Moving(drag)),
            GestureState::Resizing(drag) => Some(Preview::Resizing(drag)),
            _ => None,
        }
    }

    /// Returns true once after each hold confirmation.
    pub fn take_haptic(&mut self) -> bool {
        std::mem::take(&mut self.haptic_requested)
    }

    /// Drop any gesture and selection, e.g. after the day changes.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.last_empty_tap = None;
        self.last_block_tap = None;
    }

    /// Forget a block that no longer exists.
    pub fn forget(&mut self, id: ScheduleId) {
        if self.selected() == Some(id) {
            self.state = GestureState::Idle;
        }
        if matches!(self.last_block_tap, Some((tapped, _)) if tapped == id) {
            self.last_block_tap = None;
        }
    }

    /// Fire an expired hold timer.
    pub fn tick(&mut self, now: Millis) {
        let expired = matches!(&self.state, GestureState::Pending(p) if now >= p.deadline);
        if !expired {
            return;
        }

        if let GestureState::Pending(pending) = std::mem::take(&mut self.state) {
            self.haptic_requested = true;
            self.state = match pending.kind {
                PendingKind::Creation { person } => {
                    log::debug!("Hold confirmed, creating in column {}", person);
                    GestureState::Creating(CreateDrag::new(person, pending.offset_y))
                }
                PendingKind::Block { schedule, .. } => {
                    log::debug!("Hold confirmed on {}", schedule.id);
                    GestureState::Selected(Selection {
                        schedule,
                        held_at: Some(pending.origin),
                    })
                }
            };
        }
    }

    /// Feed one pointer sample. Returns the operation the sample completed,
    /// if any.
    pub fn handle(
        &mut self,
        sample: &PointerSample,
        geometry: &BoardGeometry,
    ) -> Option<Operation> {
        self.tick(sample.at);

        let operation = match sample.phase {
            PointerPhase::Press => self.on_press(sample, geometry),
            PointerPhase::Move => {
                self.on_move(sample, geometry);
                None
            }
            PointerPhase::Release => self.on_release(sample, geometry),
            PointerPhase::Cancel => {
                self.on_cancel();
                None
            }
            PointerPhase::DoubleClick => self.on_double_click(sample, geometry),
        };

        if let Some(op) = &operation {
            log::debug!("Gesture completed: {}", op.label());
        }
        operation
    }

    fn on_press(&mut self, sample: &PointerSample, geometry: &BoardGeometry) -> Option<Operation> {
        match std::mem::take(&mut self.state) {
            active @ (GestureState::Creating(_)
            | GestureState::Moving(_)
            | GestureState::Resizing(_)) => {
                self.state = active;
                None
            }
            GestureState::Selected(selection) if selection.held_at.is_some() => {
                self.state = GestureState::Selected(selection);
                None
            }
            GestureState::Pending(pending) => {
                if let HitTarget::Block {
                    schedule,
                    zone: BlockZone::Edge(edge),
                } = &sample.target
                {
                    log::trace!("Edge press replaces pending gesture");
                    self.begin_resize(schedule, *edge, geometry);
                } else {
                    self.state = GestureState::Pending(pending);
                }
                None
            }
            GestureState::Selected(selection) => {
                self.begin_gesture(sample, geometry, Some(selection.schedule.id))
            }
            GestureState::Idle => self.begin_gesture(sample, geometry, None),
        }
    }

    fn begin_gesture(
        &mut self,
        sample: &PointerSample,
        geometry: &BoardGeometry,
        selected: Option<ScheduleId>,
    ) -> Option<Operation> {
        let offset_y = geometry.offset_y(sample.pos);
        let ambiguous = sample.device.supports_ambiguous_scroll();

        match &sample.target {
            HitTarget::Block {
                schedule,
                zone: BlockZone::Edge(edge),
            } => {
                self.begin_resize(schedule, *edge, geometry);
                None
            }
            HitTarget::Block {
                schedule,
                zone: BlockZone::DeleteButton,
            } => {
                self.forget(schedule.id);
                Some(Operation::Delete {
                    original: schedule.clone(),
                })
            }
            HitTarget::Block {
                schedule,
                zone: BlockZone::Body,
            } => {
                self.state = if ambiguous {
                    GestureState::Pending(PendingGesture {
                        kind: PendingKind::Block {
                            schedule: schedule.clone(),
                            was_selected: selected == Some(schedule.id),
                        },
                        origin: sample.pos,
                        offset_y,
                        deadline: sample.at + self.config.block_hold_ms,
                    })
                } else {
                    GestureState::Moving(MoveDrag::begin(schedule.clone(), sample.pos, geometry))
                };
                None
            }
            HitTarget::EmptyCell { person } => {
                if ambiguous {
                    if self.is_double_tap(sample) {
                        self.last_empty_tap = None;
                        return Some(default_block(person, offset_y, geometry, &self.config));
                    }
                    self.state = GestureState::Pending(PendingGesture {
                        kind: PendingKind::Creation {
                            person: person.clone(),
                        },
                        origin: sample.pos,
                        offset_y,
                        deadline: sample.at + self.config.creation_hold_ms,
                    });
                } else {
                    self.state = GestureState::Creating(CreateDrag::new(person.clone(), offset_y));
                }
                None
            }
            HitTarget::Outside => None,
        }
    }

    fn begin_resize(&mut self, schedule: &Schedule, edge: ResizeEdge, geometry: &BoardGeometry) {
        self.state = GestureState::Resizing(ResizeDrag::begin(schedule.clone(), edge, &geometry.grid));
    }

    fn is_double_tap(&self, sample: &PointerSample) -> bool {
        self.last_empty_tap.is_some_and(|tap| {
            sample.at.saturating_sub(tap.at) <= self.config.double_tap_ms
                && tap.pos.distance(sample.pos) <= self.config.double_tap_px
        })
    }

    fn on_move(&mut self, sample: &PointerSample, geometry: &BoardGeometry) {
        let offset_y = geometry.offset_y(sample.pos);
        match &mut self.state {
            GestureState::Pending(pending) => {
                let threshold = match pending.kind {
                    PendingKind::Creation { .. } => self.config.creation_cancel_px,
                    PendingKind::Block { .. } => self.config.block_cancel_px,
                };
                if pending.origin.distance(sample.pos) > threshold {
                    log::trace!("Pending gesture abandoned, pointer is scrolling");
                    self.state = GestureState::Idle;
                }
            }
            GestureState::Creating(drag) => drag.update(offset_y, &geometry.grid),
            GestureState::Moving(drag) => drag.update(sample.pos, geometry),
            GestureState::Resizing(drag) => drag.update(offset_y, &geometry.grid),
            GestureState::Selected(selection) => {
                let Some(held_at) = selection.held_at else {
                    return;
                };
                if held_at.distance(sample.pos) > self.config.block_cancel_px {
                    let mut drag = MoveDrag::begin(selection.schedule.clone(), held_at, geometry);
                    drag.update(sample.pos, geometry);
                    self.state = GestureState::Moving(drag);
                }
            }
            GestureState::Idle => {}
        }
    }

    fn on_release(
        &mut self,
        sample: &PointerSample,
        geometry: &BoardGeometry,
    ) -> Option<Operation> {
        match std::mem::take(&mut self.state) {
            GestureState::Idle => None,
            GestureState::Pending(pending) => match pending.kind {
                PendingKind::Creation { .. } => {
                    self.last_empty_tap = Some(TapRecord {
                        pos: sample.pos,
                        at: sample.at,
                    });
                    None
                }
                PendingKind::Block {
                    schedule,
                    was_selected,
                } => Some(self.block_tap(schedule, was_selected, sample.at)),
            },
            GestureState::Creating(drag) => drag.finish(geometry, &self.config),
            GestureState::Moving(drag) => drag.finish(geometry),
            GestureState::Resizing(drag) => drag.finish(&geometry.grid),
            GestureState::Selected(mut selection) => {
                let was_held = selection.held_at.take().is_some();
                let id = selection.schedule.id;
                self.state = GestureState::Selected(selection);
                was_held.then_some(Operation::SelectionToggled { id, selected: true })
            }
        }
    }

    fn block_tap(&mut self, schedule: Schedule, was_selected: bool, at: Millis) -> Operation {
        if let Some((id, tapped_at)) = self.last_block_tap.take() {
            if id == schedule.id && at.saturating_sub(tapped_at) <= self.config.double_tap_ms {
                return Operation::Edit { original: schedule };
            }
        }
        self.last_block_tap = Some((schedule.id, at));

        let id = schedule.id;
        if was_selected {
            Operation::SelectionToggled {
                id,
                selected: false,
            }
        } else {
            self.state = GestureState::Selected(Selection {
                schedule,
                held_at: None,
            });
            Operation::SelectionToggled { id, selected: true }
        }
    }

    fn on_cancel(&mut self) {
        match std::mem::take(&mut self.state) {
            GestureState::Selected(mut selection) => {
                selection.held_at = None;
                self.state = GestureState::Selected(selection);
            }
            GestureState::Idle => {}
            other => log::trace!("Pointer cancelled, discarding {}", phase_of(&other)),
        }
    }

    fn on_double_click(
        &mut self,
        sample: &PointerSample,
        geometry: &BoardGeometry,
    ) -> Option<Operation> {
        if !matches!(self.state, GestureState::Idle | GestureState::Selected(_)) {
            return None;
        }

        match &sample.target {
            HitTarget::EmptyCell { person } => Some(default_block(
                person,
                geometry.offset_y(sample.pos),
                geometry,
                &self.config,
            )),
            HitTarget::Block { schedule, .. } => {
                self.state = GestureState::Idle;
                Some(Operation::Edit {
                    original: schedule.clone(),
                })
            }
            HitTarget::Outside => None,
        }
    }
}

fn phase_of(state: &GestureState) -> &'static str {
    match state {
        GestureState::Idle => "idle",
        GestureState::Pending(_) => "pending gesture",
        GestureState::Creating(_) => "creation",
        GestureState::Moving(_) => "move",
        GestureState::Resizing(_) => "resize",
        GestureState::Selected(_) => "selection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::TimeOfDay;
    use crate::services::time_grid::TimeGrid;
    use pretty_assertions::assert_eq;

    const JINYO_X: f32 = 100.0;
    const FRIEND_X: f32 = 200.0;

    fn geometry() -> BoardGeometry {
        BoardGeometry {
            grid: TimeGrid::new(8, 24, 50.0, 15),
            origin: Pos2::new(60.0, 50.0),
            columns: vec![
                ColumnSpan::new("Jinyo", 60.0, 110.0),
                ColumnSpan::new("Friend A", 170.0, 110.0),
            ],
            date: "1.14".to_string(),
        }
    }

    fn machine() -> InteractionMachine {
        InteractionMachine::new(GestureSettings::default())
    }

    fn t(value: &str) -> TimeOfDay {
        value.parse().unwrap()
    }

    fn at(x: f32, time: &str) -> Pos2 {
        let geometry = geometry();
        Pos2::new(
            x,
            geometry.origin.y + geometry.grid.time_to_pixel(t(time).minutes()),
        )
    }

    fn block(start: &str, end: &str) -> Schedule {
        Schedule::new(ScheduleId(7), "Jinyo", "1.14", t(start), t(end)).unwrap()
    }

    fn empty(person: &str) -> HitTarget {
        HitTarget::EmptyCell {
            person: person.to_string(),
        }
    }

    fn on_block(schedule: &Schedule, zone: BlockZone) -> HitTarget {
        HitTarget::Block {
            schedule: schedule.clone(),
            zone,
        }
    }

    fn touch(phase: PointerPhase, pos: Pos2, ms: Millis, target: HitTarget) -> PointerSample {
        PointerSample::touch(phase, pos, ms, target)
    }

    fn mouse(phase: PointerPhase, pos: Pos2, ms: Millis, target: HitTarget) -> PointerSample {
        PointerSample::mouse(phase, pos, ms, target)
    }

    #[test]
    fn test_short_travel_tap_creates_nothing() {
        let geometry = geometry();
        let mut m = machine();
        let start = at(JINYO_X, "10:00");
        let moved = Pos2::new(start.x, start.y + 8.0);

        assert_eq!(m.handle(&touch(PointerPhase::Press, start, 0, empty("Jinyo")), &geometry), None);
        assert_eq!(m.handle(&touch(PointerPhase::Move, moved, 50, empty("Jinyo")), &geometry), None);
        assert_eq!(m.handle(&touch(PointerPhase::Release, moved, 100, empty("Jinyo")), &geometry), None);
        assert_eq!(m.phase(), InteractionPhase::Idle);
    }

    #[test]
    fn test_short_drag_after_hold_creates_nothing() {
        let geometry = geometry();
        let mut m = machine();
        let start = at(JINYO_X, "10:00");

        m.handle(&touch(PointerPhase::Press, start, 0, empty("Jinyo")), &geometry);
        m.tick(300);
        assert_eq!(m.phase(), InteractionPhase::Creating);

        let moved = Pos2::new(start.x, start.y + 8.0);
        m.handle(&touch(PointerPhase::Move, moved, 350, empty("Jinyo")), &geometry);
        assert_eq!(m.handle(&touch(PointerPhase::Release, moved, 400, empty("Jinyo")), &geometry), None);
    }

    #[test]
    fn test_mouse_short_drag_creates_nothing() {
        let geometry = geometry();
        let mut m = machine();
        let start = at(JINYO_X, "10:00");
        let moved = Pos2::new(start.x, start.y + 8.0);

        m.handle(&mouse(PointerPhase::Press, start, 0, empty("Jinyo")), &geometry);
        assert_eq!(m.phase(), InteractionPhase::Creating);
        m.handle(&mouse(PointerPhase::Move, moved, 20, empty("Jinyo")), &geometry);
        assert_eq!(m.handle(&mouse(PointerPhase::Release, moved, 40, empty("Jinyo")), &geometry), None);
    }

    #[test]
    fn test_double_tap_creates_one_default_block() {
        let geometry = geometry();
        let mut m = machine();
        let first = at(JINYO_X, "10:00");
        let second = Pos2::new(first.x + 9.0, first.y + 12.0);

        let mut created = Vec::new();
        for sample in [
            touch(PointerPhase::Press, first, 0, empty("Jinyo")),
            touch(PointerPhase::Release, first, 80, empty("Jinyo")),
            touch(PointerPhase::Press, second, 200, empty("Jinyo")),
            touch(PointerPhase::Release, second, 260, empty("Jinyo")),
        ] {
            created.extend(m.handle(&sample, &geometry));
        }

        assert_eq!(
            created,
            vec![Operation::Create {
                person: "Jinyo".to_string(),
                date: "1.14".to_string(),
                start: t("10:15"),
                end: t("11:15"),
            }]
        );
    }

    #[test]
    fn test_slow_second_tap_is_not_double_tap() {
        let geometry = geometry();
        let mut m = machine();
        let pos = at(JINYO_X, "10:00");

        m.handle(&touch(PointerPhase::Press, pos, 0, empty("Jinyo")), &geometry);
        m.handle(&touch(PointerPhase::Release, pos, 80, empty("Jinyo")), &geometry);
        let op = m.handle(&touch(PointerPhase::Press, pos, 500, empty("Jinyo")), &geometry);

        assert_eq!(op, None);
        assert_eq!(m.phase(), InteractionPhase::Pending);
    }

    #[test]
    fn test_double_tap_near_grid_end_clamps_to_midnight() {
        let geometry = geometry();
        let mut m = machine();
        let pos = at(JINYO_X, "23:40");

        m.handle(&touch(PointerPhase::Press, pos, 0, empty("Jinyo")), &geometry);
        m.handle(&touch(PointerPhase::Release, pos, 50, empty("Jinyo")), &geometry);
        let op = m.handle(&touch(PointerPhase::Press, pos, 150, empty("Jinyo")), &geometry);

        match op {
            Some(Operation::Create { start, end, .. }) => {
                assert_eq!(start, t("23:45"));
                assert_eq!(end, t("24:00"));
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_hold_then_drag_creates_snapped_range() {
        let geometry = geometry();
        let mut m = machine();

        m.handle(&touch(PointerPhase::Press, at(JINYO_X, "10:05"), 0, empty("Jinyo")), &geometry);
        m.tick(299);
        assert_eq!(m.phase(), InteractionPhase::Pending);
        m.tick(300);
        assert_eq!(m.phase(), InteractionPhase::Creating);
        assert!(m.take_haptic());
        assert!(!m.take_haptic());
        assert!(m.captures_input());

        m.handle(&touch(PointerPhase::Move, at(JINYO_X, "11:20"), 400, empty("Jinyo")), &geometry);
        let op = m.handle(&touch(PointerPhase::Release, at(JINYO_X, "11:20"), 450, empty("Jinyo")), &geometry);

        assert_eq!(
            op,
            Some(Operation::Create {
                person: "Jinyo".to_string(),
                date: "1.14".to_string(),
                start: t("10:00"),
                end: t("11:15"),
            })
        );
    }

    #[test]
    fn test_upward_drag_normalizes_range() {
        let geometry = geometry();
        let mut m = machine();

        m.handle(&mouse(PointerPhase::Press, at(JINYO_X, "12:00"), 0, empty("Jinyo")), &geometry);
        m.handle(&mouse(PointerPhase::Move, at(JINYO_X, "10:30"), 30, empty("Jinyo")), &geometry);
        let op = m.handle(&mouse(PointerPhase::Release, at(JINYO_X, "10:30"), 60, empty("Jinyo")), &geometry);

        match op {
            Some(Operation::Create { start, end, .. }) => {
                assert_eq!(start, t("10:30"));
                assert_eq!(end, t("12:00"));
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_movement_before_hold_yields_to_scroll() {
        let geometry = geometry();
        let mut m = machine();
        let start = at(JINYO_X, "10:00");

        m.handle(&touch(PointerPhase::Press, start, 0, empty("Jinyo")), &geometry);
        m.handle(&touch(PointerPhase::Move, Pos2::new(start.x, start.y + 13.0), 100, empty("Jinyo")), &geometry);
        assert_eq!(m.phase(), InteractionPhase::Idle);

        m.tick(400);
        assert_eq!(m.phase(), InteractionPhase::Idle);
        assert!(!m.take_haptic());
    }

    #[test]
    fn test_scroll_cancel_abandons_pending() {
        let geometry = geometry();
        let mut m = machine();
        let start = at(JINYO_X, "10:00");

        m.handle(&touch(PointerPhase::Press, start, 0, empty("Jinyo")), &geometry);
        m.handle(&touch(PointerPhase::Cancel, start, 50, HitTarget::Outside), &geometry);
        assert_eq!(m.phase(), InteractionPhase::Idle);

        // The abandoned press does not count as the first half of a double tap.
        let op = m.handle(&touch(PointerPhase::Press, start, 120, empty("Jinyo")), &geometry);
        assert_eq!(op, None);
    }

    #[test]
    fn test_bottom_edge_resize_commits_new_end() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("14:00", "15:00");
        let edge = on_block(&schedule, BlockZone::Edge(ResizeEdge::Bottom));

        m.handle(&touch(PointerPhase::Press, at(JINYO_X, "15:00"), 0, edge.clone()), &geometry);
        assert_eq!(m.phase(), InteractionPhase::Resizing);
        m.handle(&touch(PointerPhase::Move, at(JINYO_X, "15:30"), 40, edge.clone()), &geometry);
        let op = m.handle(&touch(PointerPhase::Release, at(JINYO_X, "15:30"), 80, edge), &geometry);

        assert_eq!(
            op,
            Some(Operation::Resize {
                original: schedule,
                edge: ResizeEdge::Bottom,
                time: t("15:30"),
            })
        );
    }

    #[test]
    fn test_bottom_edge_resize_clamps_above_start() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("14:00", "15:00");
        let edge = on_block(&schedule, BlockZone::Edge(ResizeEdge::Bottom));

        m.handle(&mouse(PointerPhase::Press, at(JINYO_X, "15:00"), 0, edge.clone()), &geometry);
        m.handle(&mouse(PointerPhase::Move, at(JINYO_X, "14:05"), 40, edge.clone()), &geometry);
        let op = m.handle(&mouse(PointerPhase::Release, at(JINYO_X, "13:00"), 80, edge), &geometry);

        match op {
            Some(Operation::Resize { edge, time, .. }) => {
                assert_eq!(edge, ResizeEdge::Bottom);
                assert_eq!(time, t("14:15"));
            }
            other => panic!("expected resize, got {:?}", other),
        }
    }

    #[test]
    fn test_edge_press_replaces_pending_gesture() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("14:00", "15:00");

        m.handle(&touch(PointerPhase::Press, at(FRIEND_X, "10:00"), 0, empty("Friend A")), &geometry);
        assert_eq!(m.phase(), InteractionPhase::Pending);

        let edge = on_block(&schedule, BlockZone::Edge(ResizeEdge::Top));
        m.handle(&touch(PointerPhase::Press, at(JINYO_X, "14:00"), 30, edge), &geometry);
        assert_eq!(m.phase(), InteractionPhase::Resizing);
    }

    #[test]
    fn test_second_press_during_drag_is_ignored() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("14:00", "15:00");

        m.handle(&mouse(PointerPhase::Press, at(JINYO_X, "10:00"), 0, empty("Jinyo")), &geometry);
        let op = m.handle(
            &mouse(PointerPhase::Press, at(JINYO_X, "14:30"), 10, on_block(&schedule, BlockZone::Body)),
            &geometry,
        );

        assert_eq!(op, None);
        assert_eq!(m.phase(), InteractionPhase::Creating);
    }

    #[test]
    fn test_block_tap_toggles_selection() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("14:00", "15:00");
        let body = on_block(&schedule, BlockZone::Body);
        let pos = at(JINYO_X, "14:30");

        m.handle(&touch(PointerPhase::Press, pos, 0, body.clone()), &geometry);
        let op = m.handle(&touch(PointerPhase::Release, pos, 60, body.clone()), &geometry);
        assert_eq!(op, Some(Operation::SelectionToggled { id: schedule.id, selected: true }));
        assert_eq!(m.selected(), Some(schedule.id));

        m.handle(&touch(PointerPhase::Press, pos, 1000, body.clone()), &geometry);
        assert_eq!(m.selected(), Some(schedule.id));
        let op = m.handle(&touch(PointerPhase::Release, pos, 1060, body), &geometry);
        assert_eq!(op, Some(Operation::SelectionToggled { id: schedule.id, selected: false }));
        assert_eq!(m.selected(), None);
    }

    #[test]
    fn test_block_double_tap_opens_editor() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("14:00", "15:00");
        let body = on_block(&schedule, BlockZone::Body);
        let pos = at(JINYO_X, "14:30");

        m.handle(&touch(PointerPhase::Press, pos, 0, body.clone()), &geometry);
        m.handle(&touch(PointerPhase::Release, pos, 50, body.clone()), &geometry);
        m.handle(&touch(PointerPhase::Press, pos, 150, body.clone()), &geometry);
        let op = m.handle(&touch(PointerPhase::Release, pos, 200, body), &geometry);

        assert_eq!(op, Some(Operation::Edit { original: schedule }));
        assert_eq!(m.phase(), InteractionPhase::Idle);
    }

    #[test]
    fn test_long_press_then_drag_moves_block() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("10:00", "11:00");
        let body = on_block(&schedule, BlockZone::Body);
        let press = at(JINYO_X, "10:20");

        m.handle(&touch(PointerPhase::Press, press, 0, body.clone()), &geometry);
        m.tick(400);
        assert_eq!(m.phase(), InteractionPhase::Selected);
        assert!(m.take_haptic());
        assert!(m.captures_input());

        m.handle(&touch(PointerPhase::Move, at(FRIEND_X, "12:20"), 500, empty("Friend A")), &geometry);
        assert_eq!(m.phase(), InteractionPhase::Moving);
        let op = m.handle(&touch(PointerPhase::Release, at(FRIEND_X, "12:20"), 600, empty("Friend A")), &geometry);

        assert_eq!(
            op,
            Some(Operation::Move {
                original: schedule,
                person: "Friend A".to_string(),
                start: t("12:00"),
                end: t("13:00"),
            })
        );
    }

    #[test]
    fn test_long_press_release_shows_delete_then_deletes() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("10:00", "11:00");
        let body = on_block(&schedule, BlockZone::Body);
        let press = at(JINYO_X, "10:20");

        m.handle(&touch(PointerPhase::Press, press, 0, body.clone()), &geometry);
        let op = m.handle(&touch(PointerPhase::Release, press, 500, body), &geometry);
        assert_eq!(op, Some(Operation::SelectionToggled { id: schedule.id, selected: true }));
        assert!(!m.captures_input());

        let delete = on_block(&schedule, BlockZone::DeleteButton);
        let op = m.handle(&touch(PointerPhase::Press, at(JINYO_X, "10:05"), 900, delete), &geometry);
        assert_eq!(op, Some(Operation::Delete { original: schedule }));
        assert_eq!(m.selected(), None);
    }

    #[test]
    fn test_block_press_with_travel_scrolls() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("10:00", "11:00");
        let body = on_block(&schedule, BlockZone::Body);
        let press = at(JINYO_X, "10:20");

        m.handle(&touch(PointerPhase::Press, press, 0, body.clone()), &geometry);
        m.handle(&touch(PointerPhase::Move, Pos2::new(press.x, press.y - 6.0), 80, body), &geometry);
        assert_eq!(m.phase(), InteractionPhase::Idle);
    }

    #[test]
    fn test_mouse_press_on_block_moves_immediately() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("10:00", "11:00");

        m.handle(
            &mouse(PointerPhase::Press, at(JINYO_X, "10:20"), 0, on_block(&schedule, BlockZone::Body)),
            &geometry,
        );
        assert_eq!(m.phase(), InteractionPhase::Moving);

        m.handle(&mouse(PointerPhase::Move, at(JINYO_X, "13:20"), 20, empty("Jinyo")), &geometry);
        let op = m.handle(&mouse(PointerPhase::Release, at(JINYO_X, "13:20"), 40, empty("Jinyo")), &geometry);
        match op {
            Some(Operation::Move { person, start, end, .. }) => {
                assert_eq!(person, "Jinyo");
                assert_eq!(start, t("13:00"));
                assert_eq!(end, t("14:00"));
            }
            other => panic!("expected move, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_discards_move() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("10:00", "11:00");

        m.handle(
            &mouse(PointerPhase::Press, at(JINYO_X, "10:20"), 0, on_block(&schedule, BlockZone::Body)),
            &geometry,
        );
        m.handle(&mouse(PointerPhase::Move, at(FRIEND_X, "13:20"), 20, empty("Friend A")), &geometry);
        m.handle(&mouse(PointerPhase::Cancel, at(FRIEND_X, "13:20"), 30, HitTarget::Outside), &geometry);
        let op = m.handle(&mouse(PointerPhase::Release, at(FRIEND_X, "13:20"), 40, empty("Friend A")), &geometry);

        assert_eq!(op, None);
        assert_eq!(m.phase(), InteractionPhase::Idle);
    }

    #[test]
    fn test_mouse_double_click_paths() {
        let geometry = geometry();
        let mut m = machine();
        let schedule = block("10:00", "11:00");

        let op = m.handle(
            &mouse(PointerPhase::DoubleClick, at(JINYO_X, "10:20"), 0, on_block(&schedule, BlockZone::Body)),
            &geometry,
        );
        assert_eq!(op, Some(Operation::Edit { original: schedule }));

        let op = m.handle(
            &mouse(PointerPhase::DoubleClick, at(FRIEND_X, "16:00"), 10, empty("Friend A")),
            &geometry,
        );
        match op {
            Some(Operation::Create { person, start, end, .. }) => {
                assert_eq!(person, "Friend A");
                assert_eq!(start, t("16:00"));
                assert_eq!(end, t("17:00"));
            }
            other => panic!("expected create, got {:?}", other),
        }
    }
}
