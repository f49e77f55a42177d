use egui::{Color32, RichText};

use super::day_selector::{merge_dates, render_day_selector};
use super::BoardApp;

impl BoardApp {
    /// Day selector, reload, and a link to the backing sheet.
    pub(super) fn render_toolbar(&mut self, ctx: &egui::Context) {
        let mut dates = merge_dates(&self.settings.source.dates, &self.board.known_dates());
        if !dates.iter().any(|date| date == self.board.date()) {
            dates.insert(0, self.board.date().to_string());
        }
        let year = self.settings.source.year;

        egui::TopBottomPanel::top("board_toolbar").show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                if let Some(date) = render_day_selector(ui, self.board.date(), &dates, year) {
                    log::info!("Showing {}", date);
                    self.remember_date(&date);
                    self.board.set_date(date);
                    self.machine.reset();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(url) = self.settings.source.resolved_edit_url() {
                        if ui.button("Open sheet").clicked() {
                            if let Err(err) = webbrowser::open(&url) {
                                log::warn!("Failed to open sheet in browser: {}", err);
                                self.toasts.error("Could not open the sheet in a browser");
                            }
                        }
                    }

                    ui.label(
                        RichText::new(self.board.source_description())
                            .small()
                            .color(Color32::GRAY),
                    );

                    let loading = self.board.is_loading();
                    if ui
                        .add_enabled(!loading, egui::Button::new("Reload"))
                        .clicked()
                    {
                        self.board.reload();
                    }
                    if loading {
                        ui.spinner();
                    } else if self.board.is_syncing() {
                        ui.label(RichText::new("Saving…").color(Color32::GRAY));
                    }
                });
            });
        });
    }

    /// Reopen on the same day next time.
    fn remember_date(&mut self, date: &str) {
        self.settings.source.default_date = Some(date.to_string());
        if let Err(err) = self.store.update(&self.settings) {
            log::warn!("Failed to save settings: {:#}", err);
        }
    }
}
