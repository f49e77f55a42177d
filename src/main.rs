// Schedule Board Application
// Main entry point

use schedule_board::services::settings::SettingsService;
use schedule_board::ui_egui::BoardApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    log::info!("Starting Schedule Board");

    let store = SettingsService::for_user();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([480.0, 400.0])
            .with_title("Schedule Board"),
        ..Default::default()
    };

    eframe::run_native(
        "Schedule Board",
        options,
        Box::new(|cc| Ok(Box::new(BoardApp::new(cc, store)))),
    )
}
