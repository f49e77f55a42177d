use std::sync::Arc;
use std::time::Duration;

use super::toast::ToastManager;
use super::BoardApp;
use crate::models::settings::BoardSettings;
use crate::services::board::{BoardController, NoticeLevel};
use crate::services::settings::SettingsService;
use crate::services::sheet::DemoSource;
use crate::services::sync::DisabledSink;
use crate::services::time_grid::TimeGrid;
use crate::ui_egui::creation_dialog::{render_creation_dialog, CreationDialogState, DialogAction};
use crate::ui_egui::interaction::{InteractionMachine, Operation};
use crate::ui_egui::views::{BoardInputState, BoardView};

impl BoardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, store: SettingsService) -> Self {
        let settings = store.get_or_default();
        let board = match BoardController::from_settings(&settings.source) {
            Ok(board) => board,
            Err(err) => {
                log::error!("Invalid source settings, falling back to demo rows: {:#}", err);
                BoardController::new(
                    Arc::new(DemoSource),
                    Arc::new(DisabledSink),
                    settings.source.initial_date(),
                )
            }
        };
        Self::with_controller(settings, store, board)
    }

    pub fn with_controller(
        settings: BoardSettings,
        store: SettingsService,
        mut board: BoardController,
    ) -> Self {
        board.reload();
        Self {
            grid: TimeGrid::from_settings(&settings.grid),
            machine: InteractionMachine::new(settings.gestures.clone()),
            input: BoardInputState::default(),
            dialog: None,
            toasts: ToastManager::new(),
            settings,
            store,
            board,
        }
    }

    pub(super) fn handle_update(&mut self, ctx: &egui::Context) {
        self.poll_board(ctx);

        self.render_toolbar(ctx);

        let mut operations = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            operations = self.render_board(ui);
        });
        for operation in operations {
            self.apply_operation(operation);
        }

        self.render_dialog(ctx);

        let is_dark = ctx.style().visuals.dark_mode;
        self.toasts.render(ctx, is_dark);
    }

    fn poll_board(&mut self, ctx: &egui::Context) {
        let outcome = self.board.poll();
        if outcome.reloaded {
            if let Some(id) = self.machine.selected() {
                if self.board.find(id).is_none() {
                    self.machine.forget(id);
                }
            }
        }
        for notice in outcome.notices {
            match notice.level {
                NoticeLevel::Success => self.toasts.success(notice.message),
                NoticeLevel::Info => self.toasts.info(notice.message),
                NoticeLevel::Error => self.toasts.error(notice.message),
            }
        }

        if self.board.is_loading() || self.board.is_syncing() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }

    fn render_board(&mut self, ui: &mut egui::Ui) -> Vec<Operation> {
        let columns = self.board.columns();

        if columns.is_empty() {
            ui.centered_and_justified(|ui| {
                if self.board.is_loading() {
                    ui.spinner();
                } else {
                    ui.label("No schedules for this day yet.");
                }
            });
            return Vec::new();
        }

        let view = BoardView {
            settings: &self.settings.grid,
            grid: self.grid,
            date: self.board.date(),
            columns: &columns,
            schedules: self.board.visible_schedules().collect(),
            interactive: self.dialog.is_none(),
        };
        view.show(ui, &mut self.machine, &mut self.input)
    }

    fn apply_operation(&mut self, operation: Operation) {
        if let Some(updated) = operation.updated_schedule() {
            if let Operation::Move { original, .. } | Operation::Resize { original, .. } = &operation {
                self.board.update(original, updated);
            }
            return;
        }

        match operation {
            Operation::Create {
                person,
                date,
                start,
                end,
            } => {
                self.dialog = Some(CreationDialogState::for_create(&person, &date, start, end));
            }
            Operation::Edit { original } => {
                self.dialog = Some(CreationDialogState::for_edit(&original));
            }
            Operation::Delete { original } => {
                self.machine.forget(original.id);
                self.board.delete(&original);
            }
            Operation::SelectionToggled { id, selected } => {
                log::trace!("Selection of {} is now {}", id, selected);
            }
            Operation::Move { .. } | Operation::Resize { .. } => {}
        }
    }

    fn render_dialog(&mut self, ctx: &egui::Context) {
        let Some(state) = self.dialog.as_mut() else {
            return;
        };

        let Some(action) = render_creation_dialog(ctx, state, self.board.people()) else {
            return;
        };

        match action {
            DialogAction::Create(draft) => {
                if let Err(err) = self.board.create(&draft) {
                    if let Some(state) = self.dialog.as_mut() {
                        state.error_message = Some(err.to_string());
                    }
                    return;
                }
            }
            DialogAction::Update { original, updated } => {
                self.board.update(&original, updated);
            }
            DialogAction::Delete(original) => {
                self.machine.forget(original.id);
                self.board.delete(&original);
            }
            DialogAction::Cancel => {}
        }
        self.dialog = None;
    }
}
