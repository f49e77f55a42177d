mod day_selector;
mod lifecycle;
mod toast;
mod toolbar;

use crate::models::settings::BoardSettings;
use crate::services::board::BoardController;
use crate::services::settings::SettingsService;
use crate::services::time_grid::TimeGrid;
use crate::ui_egui::creation_dialog::CreationDialogState;
use crate::ui_egui::interaction::InteractionMachine;
use crate::ui_egui::views::BoardInputState;

use self::toast::ToastManager;

pub use self::day_selector::{day_label, merge_dates};

pub struct BoardApp {
    settings: BoardSettings,
    store: SettingsService,
    grid: TimeGrid,
    /// Authoritative schedules and background sync
    board: BoardController,
    machine: InteractionMachine,
    input: BoardInputState,
    /// Open create/edit form, if any
    dialog: Option<CreationDialogState>,
    toasts: ToastManager,
}

impl eframe::App for BoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_update(ctx);
    }
}
