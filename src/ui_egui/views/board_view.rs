//! The schedule board: hour rows down the side, one column per person, and
//! the day's blocks laid out inside their owner's column.
//!
//! Rendering happens in one pass per frame. Raw egui pointer events are
//! resolved against this frame's layout and fed to the
//! [`InteractionMachine`] before anything is painted, so previews never lag a
//! frame behind the pointer.

use std::time::Duration;

use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::palette::{person_color, with_alpha, BoardPalette};
use crate::models::person::is_official;
use crate::models::schedule::{Schedule, ScheduleId};
use crate::models::settings::GridSettings;
use crate::services::layout::resolve_lanes;
use crate::services::time_grid::TimeGrid;
use crate::ui_egui::interaction::{
    BlockZone, BoardGeometry, ColumnSpan, HitTarget, InputDevice, InteractionMachine,
    InteractionPhase, Millis, Operation, PointerPhase, PointerSample, Preview,
};
use crate::ui_egui::resize::{draw_handles, EdgeZones};

const DELETE_BUTTON_SIZE: f32 = 18.0;
const BLOCK_GAP: f32 = 1.0;

/// Input bookkeeping that has to survive between frames.
#[derive(Debug, Default)]
pub struct BoardInputState {
    device: Option<InputDevice>,
    last_pos: Option<Pos2>,
    last_scroll_offset: Option<Vec2>,
}

/// A block's on-screen rectangle for this frame.
#[derive(Debug, Clone, Copy)]
pub struct PlacedBlock<'a> {
    pub schedule: &'a Schedule,
    pub rect: Rect,
}

/// Top-right corner, just under the top resize band.
pub fn delete_button_rect(block: Rect) -> Rect {
    let size = DELETE_BUTTON_SIZE.min(block.height()).min(block.width());
    let top = EdgeZones::for_block(block).top.bottom();
    Rect::from_min_size(Pos2::new(block.right() - size, top), Vec2::splat(size))
}

/// Resolve what lies under `pos`. Blocks drawn later sit on top. Resize
/// edges win over everything else; the delete button only exists on
/// `deletable`.
pub fn hit_test(
    pos: Pos2,
    geometry: &BoardGeometry,
    grid_rect: Rect,
    blocks: &[PlacedBlock<'_>],
    deletable: Option<ScheduleId>,
) -> HitTarget {
    if !grid_rect.contains(pos) {
        return HitTarget::Outside;
    }

    for block in blocks.iter().rev() {
        if !block.rect.contains(pos) {
            continue;
        }
        let zone = match EdgeZones::for_block(block.rect).hit_test(pos) {
            Some(edge) => BlockZone::Edge(edge),
            None if deletable == Some(block.schedule.id)
                && delete_button_rect(block.rect).contains(pos) =>
            {
                BlockZone::DeleteButton
            }
            None => BlockZone::Body,
        };
        return HitTarget::Block {
            schedule: block.schedule.clone(),
            zone,
        };
    }

    match geometry.person_at(pos.x) {
        Some(person) => HitTarget::EmptyCell {
            person: person.to_string(),
        },
        None => HitTarget::Outside,
    }
}

pub struct BoardView<'a> {
    pub settings: &'a GridSettings,
    pub grid: TimeGrid,
    pub date: &'a str,
    pub columns: &'a [String],
    pub schedules: Vec<&'a Schedule>,
    /// False while a dialog owns the pointer.
    pub interactive: bool,
}

impl<'a> BoardView<'a> {
    /// Draw the board and return the operations completed this frame.
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        machine: &mut InteractionMachine,
        input: &mut BoardInputState,
    ) -> Vec<Operation> {
        let now = (ui.input(|i| i.time) * 1000.0) as Millis;
        machine.tick(now);

        let palette = BoardPalette::from_visuals(ui.visuals());
        let output = egui::ScrollArea::both()
            .id_source("schedule_board_scroll")
            .auto_shrink([false, false])
            .drag_to_scroll(!machine.captures_input())
            .show(ui, |ui| self.show_contents(ui, machine, input, now, &palette));

        let (mut operations, geometry) = output.inner;

        // A scroll during the hold window means the finger was scrolling.
        let offset = output.state.offset;
        let scrolled = input.last_scroll_offset.is_some_and(|last| last != offset);
        input.last_scroll_offset = Some(offset);
        if scrolled && machine.phase() == InteractionPhase::Pending {
            let sample = PointerSample::new(
                input.device.unwrap_or(InputDevice::Touch),
                PointerPhase::Cancel,
                input.last_pos.unwrap_or(geometry.origin),
                now,
                HitTarget::Outside,
            );
            operations.extend(machine.handle(&sample, &geometry));
        }

        if machine.take_haptic() {
            log::debug!("Hold confirmed (haptic feedback)");
        }
        if let Some(deadline) = machine.pending_deadline() {
            ui.ctx()
                .request_repaint_after(Duration::from_millis(deadline.saturating_sub(now)));
        }

        operations
    }

    fn geometry(&self, origin: Pos2) -> BoardGeometry {
        let width = self.settings.column_width;
        BoardGeometry {
            grid: self.grid,
            origin,
            columns: self
                .columns
                .iter()
                .enumerate()
                .map(|(index, person)| {
                    ColumnSpan::new(person.clone(), origin.x + index as f32 * width, width)
                })
                .collect(),
            date: self.date.to_string(),
        }
    }

    fn show_contents(
        &self,
        ui: &mut egui::Ui,
        machine: &mut InteractionMachine,
        input: &mut BoardInputState,
        now: Millis,
        palette: &BoardPalette,
    ) -> (Vec<Operation>, BoardGeometry) {
        let settings = self.settings;
        let columns_width = self.columns.len() as f32 * settings.column_width;
        let size = Vec2::new(
            settings.time_label_width + columns_width,
            settings.header_height + self.grid.grid_height(),
        );
        let (rect, _) = ui.allocate_exact_size(size, Sense::hover());

        let origin = Pos2::new(
            rect.left() + settings.time_label_width,
            rect.top() + settings.header_height,
        );
        let geometry = self.geometry(origin);
        let grid_rect = Rect::from_min_size(origin, Vec2::new(columns_width, self.grid.grid_height()));
        let blocks = self.place_blocks(&geometry);

        let hover = ui.input(|i| i.pointer.hover_pos());
        let deletable = machine.selected().or_else(|| {
            if input.device == Some(InputDevice::Touch) {
                return None;
            }
            let pos = hover?;
            blocks
                .iter()
                .rev()
                .find(|block| block.rect.contains(pos))
                .map(|block| block.schedule.id)
        });

        let operations = if self.interactive {
            self.process_input(ui, machine, input, &geometry, grid_rect, &blocks, deletable, now)
        } else {
            Vec::new()
        };

        let painter = ui.painter_at(rect);
        self.paint_grid(&painter, &geometry, grid_rect, palette);
        self.paint_blocks(ui, &painter, &blocks, machine, deletable, hover, grid_rect, palette);
        self.paint_preview(&painter, &geometry, &blocks, machine, grid_rect, palette);

        (operations, geometry)
    }

    fn place_blocks(&self, geometry: &BoardGeometry) -> Vec<PlacedBlock<'a>> {
        let grid = &geometry.grid;
        let mut placed = Vec::with_capacity(self.schedules.len());

        for column in &geometry.columns {
            let owned = self
                .schedules
                .iter()
                .copied()
                .filter(|schedule| schedule.name == column.person);
            for laid_out in resolve_lanes(owned) {
                let left = column.left + column.width * laid_out.left_percent() / 100.0;
                let width = column.width * laid_out.width_percent() / 100.0;
                let top = geometry.origin.y + grid.time_to_pixel(laid_out.schedule.start_minutes());
                let height = grid.duration_to_pixels(laid_out.schedule.duration_minutes());
                placed.push(PlacedBlock {
                    schedule: laid_out.schedule,
                    rect: Rect::from_min_size(Pos2::new(left, top), Vec2::new(width, height))
                        .shrink(BLOCK_GAP),
                });
            }
        }
        placed
    }

    #[allow(clippy::too_many_arguments)]
    fn process_input(
        &self,
        ui: &egui::Ui,
        machine: &mut InteractionMachine,
        input: &mut BoardInputState,
        geometry: &BoardGeometry,
        grid_rect: Rect,
        blocks: &[PlacedBlock<'_>],
        deletable: Option<ScheduleId>,
        now: Millis,
    ) -> Vec<Operation> {
        let (events, touching, double_clicked, interact_pos) = ui.input(|i| {
            (
                i.events.clone(),
                i.any_touches(),
                i.pointer.button_double_clicked(egui::PointerButton::Primary),
                i.pointer.interact_pos(),
            )
        });
        let touching = touching || events.iter().any(|e| matches!(e, egui::Event::Touch { .. }));

        let mut operations = Vec::new();
        for event in &events {
            let (phase, pos) = match event {
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if *pressed {
                        input.device = Some(if touching {
                            InputDevice::Touch
                        } else {
                            InputDevice::Mouse
                        });
                        (PointerPhase::Press, *pos)
                    } else {
                        (PointerPhase::Release, *pos)
                    }
                }
                egui::Event::PointerMoved(pos) => (PointerPhase::Move, *pos),
                egui::Event::PointerGone => match input.last_pos {
                    Some(pos) => (PointerPhase::Cancel, pos),
                    None => continue,
                },
                _ => continue,
            };
            input.last_pos = Some(pos);

            let target = hit_test(pos, geometry, grid_rect, blocks, deletable);
            let device = input.device.unwrap_or(InputDevice::Mouse);
            let sample = PointerSample::new(device, phase, pos, now, target);
            operations.extend(machine.handle(&sample, geometry));
        }

        // Touch double taps are recognized by the machine itself.
        if double_clicked && input.device == Some(InputDevice::Mouse) {
            if let Some(pos) = interact_pos {
                let target = hit_test(pos, geometry, grid_rect, blocks, deletable);
                let sample = PointerSample::mouse(PointerPhase::DoubleClick, pos, now, target);
                operations.extend(machine.handle(&sample, geometry));
            }
        }

        operations
    }

    fn paint_grid(
        &self,
        painter: &egui::Painter,
        geometry: &BoardGeometry,
        grid_rect: Rect,
        palette: &BoardPalette,
    ) {
        let settings = self.settings;
        let grid = &geometry.grid;
        painter.rect_filled(grid_rect, 0.0, palette.grid_bg);

        for (index, column) in geometry.columns.iter().enumerate() {
            let header = Rect::from_min_size(
                Pos2::new(column.left, geometry.origin.y - settings.header_height),
                Vec2::new(column.width, settings.header_height),
            );
            let official = is_official(&column.person);
            let fill = if official {
                palette.official_header_bg
            } else {
                palette.header_bg
            };
            painter.rect_filled(header, 0.0, fill);
            painter.text(
                header.center(),
                Align2::CENTER_CENTER,
                &column.person,
                FontId::proportional(if official { 13.0 } else { 14.0 }),
                palette.header_text,
            );

            if index > 0 {
                painter.line_segment(
                    [
                        Pos2::new(column.left, header.top()),
                        Pos2::new(column.left, grid_rect.bottom()),
                    ],
                    Stroke::new(1.0, palette.column_line),
                );
            }
        }

        let label_x = grid_rect.left() - 6.0;
        for (row, hour) in grid.hours().enumerate() {
            let y = geometry.origin.y + row as f32 * grid.row_height();
            painter.line_segment(
                [Pos2::new(grid_rect.left(), y), Pos2::new(grid_rect.right(), y)],
                Stroke::new(1.0, palette.hour_line),
            );
            let half = y + grid.row_height() / 2.0;
            painter.line_segment(
                [Pos2::new(grid_rect.left(), half), Pos2::new(grid_rect.right(), half)],
                Stroke::new(1.0, palette.half_hour_line),
            );
            painter.text(
                Pos2::new(label_x, y),
                Align2::RIGHT_TOP,
                format!("{:02}:00", hour),
                FontId::proportional(12.0),
                palette.label_text,
            );
        }
        painter.line_segment(
            [grid_rect.left_bottom(), grid_rect.right_bottom()],
            Stroke::new(1.0, palette.hour_line),
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_blocks(
        &self,
        ui: &egui::Ui,
        painter: &egui::Painter,
        blocks: &[PlacedBlock<'_>],
        machine: &InteractionMachine,
        deletable: Option<ScheduleId>,
        hover: Option<Pos2>,
        grid_rect: Rect,
        palette: &BoardPalette,
    ) {
        let dragged = match machine.preview() {
            Some(Preview::Moving(drag)) => Some(drag.schedule.id),
            Some(Preview::Resizing(drag)) => Some(drag.schedule.id),
            _ => None,
        };
        let selected = machine.selected();
        let idle = matches!(machine.phase(), InteractionPhase::Idle | InteractionPhase::Selected);

        for block in blocks {
            let schedule = block.schedule;
            let mut fill = person_color(&schedule.name, palette.is_dark);
            if dragged == Some(schedule.id) {
                fill = with_alpha(fill, 90);
            }

            let clipped = painter.with_clip_rect(block.rect.intersect(grid_rect));
            clipped.rect_filled(block.rect, 4.0, fill);
            paint_block_label(&clipped, block.rect, schedule, palette.block_text);

            if selected == Some(schedule.id) {
                clipped.rect_stroke(block.rect, 4.0, Stroke::new(2.0, palette.selection));
            }

            let hovered = hover.is_some_and(|pos| block.rect.contains(pos));
            if idle && (hovered || selected == Some(schedule.id)) {
                let zones = EdgeZones::for_block(block.rect);
                let hovered_edge = hover.and_then(|pos| zones.hit_test(pos));
                if let Some(edge) = hovered_edge {
                    ui.ctx().set_cursor_icon(edge.cursor_icon());
                }
                draw_handles(ui, &zones, hovered_edge, palette.block_text);
            }

            if deletable == Some(schedule.id) && dragged.is_none() {
                let button = delete_button_rect(block.rect);
                clipped.circle_filled(button.center(), button.width() / 2.0 - 2.0, palette.delete_fill);
                clipped.text(
                    button.center(),
                    Align2::CENTER_CENTER,
                    "×",
                    FontId::proportional(13.0),
                    Color32::WHITE,
                );
            }
        }
    }

    fn paint_preview(
        &self,
        painter: &egui::Painter,
        geometry: &BoardGeometry,
        blocks: &[PlacedBlock<'_>],
        machine: &InteractionMachine,
        grid_rect: Rect,
        palette: &BoardPalette,
    ) {
        let grid = &geometry.grid;
        let painter = painter.with_clip_rect(grid_rect);
        let origin_y = geometry.origin.y;

        let (rect, label, valid) = match machine.preview() {
            Some(Preview::Creating(drag)) => {
                let Some(column) = geometry.column(&drag.person) else {
                    return;
                };
                let rect = Rect::from_x_y_ranges(
                    column.left..=column.left + column.width,
                    origin_y + drag.top()..=origin_y + drag.bottom(),
                );
                let label = format!(
                    "{}-{}",
                    grid.pixel_to_time(drag.top()),
                    grid.pixel_to_time(drag.bottom())
                );
                (rect, label, true)
            }
            Some(Preview::Moving(drag)) => {
                let person = drag.target_person.as_deref().unwrap_or(&drag.schedule.name);
                let Some(column) = geometry.column(person) else {
                    return;
                };
                let height = drag.height(geometry);
                let rect = Rect::from_min_size(
                    Pos2::new(column.left, origin_y + drag.top),
                    Vec2::new(column.width, height),
                );
                let start = grid.pixel_to_time(drag.top);
                let label = match start.checked_add_minutes(drag.schedule.duration_minutes() as i64) {
                    Some(end) => format!("{}-{}", start, end),
                    None => start.to_string(),
                };
                (rect, label, drag.is_valid())
            }
            Some(Preview::Resizing(drag)) => {
                let Some(block) = blocks.iter().find(|b| b.schedule.id == drag.schedule.id) else {
                    return;
                };
                let rect = Rect::from_x_y_ranges(
                    block.rect.x_range(),
                    origin_y + drag.top..=origin_y + drag.bottom,
                );
                let (start, end) = drag.preview_times(grid);
                (rect, format!("{}-{}", start, end), true)
            }
            None => return,
        };

        let fill = if valid {
            palette.preview_fill
        } else {
            palette.invalid_fill
        };
        painter.rect_filled(rect.shrink(BLOCK_GAP), 4.0, fill);
        painter.rect_stroke(rect.shrink(BLOCK_GAP), 4.0, Stroke::new(1.5, palette.preview_stroke));
        painter.text(
            rect.left_top() + Vec2::new(6.0, 4.0),
            Align2::LEFT_TOP,
            label,
            FontId::proportional(12.0),
            palette.header_text,
        );
    }
}

fn paint_block_label(painter: &egui::Painter, rect: Rect, schedule: &Schedule, color: Color32) {
    let title = schedule.reason.as_deref().unwrap_or(&schedule.name);
    let top_left = rect.left_top() + Vec2::new(5.0, 3.0);
    painter.text(
        top_left,
        Align2::LEFT_TOP,
        title,
        FontId::proportional(12.0),
        color,
    );
    if rect.height() >= 30.0 {
        painter.text(
            top_left + Vec2::new(0.0, 15.0),
            Align2::LEFT_TOP,
            schedule.time_label(),
            FontId::proportional(10.5),
            with_alpha(color, 200),
        );
    }
}
