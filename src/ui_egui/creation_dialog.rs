//! Details form for a new block, also used to edit an existing one.

use egui::{Color32, RichText};

use crate::models::schedule::{Schedule, ScheduleId, TimeOfDay};
use crate::services::board::CreationDraft;

#[derive(Debug, Clone, PartialEq)]
pub enum DialogMode {
    Create,
    Edit(Schedule),
}

pub enum DialogAction {
    Create(CreationDraft),
    Update { original: Schedule, updated: Schedule },
    Delete(Schedule),
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreationDialogState {
    pub mode: DialogMode,
    pub person: String,
    pub date: String,
    pub start_text: String,
    pub end_text: String,
    pub reason: String,
    pub error_message: Option<String>,
}

impl CreationDialogState {
    pub fn for_create(person: &str, date: &str, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            mode: DialogMode::Create,
            person: person.to_string(),
            date: date.to_string(),
            start_text: start.to_string(),
            end_text: end.to_string(),
            reason: String::new(),
            error_message: None,
        }
    }

    pub fn for_edit(schedule: &Schedule) -> Self {
        Self {
            mode: DialogMode::Edit(schedule.clone()),
            person: schedule.name.clone(),
            date: schedule.date.clone(),
            start_text: schedule.start.to_string(),
            end_text: schedule.end.to_string(),
            reason: schedule.reason.clone().unwrap_or_default(),
            error_message: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, DialogMode::Edit(_))
    }

    /// Check the form and turn it into a draft.
    pub fn validate(&self) -> Result<CreationDraft, String> {
        let start: TimeOfDay = self
            .start_text
            .parse()
            .map_err(|err| format!("Start: {}", err))?;
        let end: TimeOfDay = self.end_text.parse().map_err(|err| format!("End: {}", err))?;

        let draft = CreationDraft {
            person: self.person.trim().to_string(),
            date: self.date.trim().to_string(),
            start,
            end,
            reason: self.reason.trim().to_string(),
        };
        // Id is irrelevant for validation.
        draft
            .to_schedule(ScheduleId(0))
            .map_err(|err| err.to_string())?;
        Ok(draft)
    }

    fn submit(&mut self) -> Option<DialogAction> {
        let draft = match self.validate() {
            Ok(draft) => draft,
            Err(message) => {
                self.error_message = Some(message);
                return None;
            }
        };

        Some(match &self.mode {
            DialogMode::Create => DialogAction::Create(draft),
            DialogMode::Edit(original) => {
                let updated = Schedule {
                    name: draft.person,
                    date: draft.date,
                    start: draft.start,
                    end: draft.end,
                    ..original.clone()
                }
                .with_reason(draft.reason);
                DialogAction::Update {
                    original: original.clone(),
                    updated,
                }
            }
        })
    }
}

/// Show the form. Returns an action once the user is done with it.
pub fn render_creation_dialog(
    ctx: &egui::Context,
    state: &mut CreationDialogState,
    people: &[String],
) -> Option<DialogAction> {
    let mut action = None;
    let title = if state.is_edit() { "Edit Schedule" } else { "New Schedule" };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(320.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(ref error) = state.error_message {
                ui.colored_label(Color32::RED, RichText::new(error).strong());
                ui.add_space(6.0);
            }

            egui::Grid::new("creation_dialog_fields")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Person:");
                    ui.horizontal(|ui| {
                        ui.text_edit_singleline(&mut state.person);
                        egui::ComboBox::from_id_source("creation_dialog_person")
                            .selected_text("")
                            .width(24.0)
                            .show_ui(ui, |ui| {
                                for person in people {
                                    ui.selectable_value(&mut state.person, person.clone(), person.as_str());
                                }
                            });
                    });
                    ui.end_row();

                    ui.label("Date:");
                    ui.label(RichText::new(&state.date).strong());
                    ui.end_row();

                    ui.label("Start:");
                    ui.text_edit_singleline(&mut state.start_text);
                    ui.end_row();

                    ui.label("End:");
                    ui.text_edit_singleline(&mut state.end_text);
                    ui.end_row();

                    ui.label("Reason:");
                    ui.text_edit_singleline(&mut state.reason);
                    ui.end_row();
                });

            ui.add_space(10.0);
            ui.separator();
            ui.horizontal(|ui| {
                let save_label = if state.is_edit() { "Save" } else { "Add" };
                if ui.button(save_label).clicked() {
                    action = state.submit();
                }
                if ui.button("Cancel").clicked() {
                    action = Some(DialogAction::Cancel);
                }
                if let DialogMode::Edit(original) = &state.mode {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let delete = egui::Button::new(RichText::new("Delete").color(Color32::WHITE))
                            .fill(Color32::from_rgb(190, 60, 60));
                        if ui.add(delete).clicked() {
                            action = Some(DialogAction::Delete(original.clone()));
                        }
                    });
                }
            });
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        action = Some(DialogAction::Cancel);
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(value: &str) -> TimeOfDay {
        value.parse().unwrap()
    }

    #[test]
    fn test_create_form_round_trips_proposal() {
        let mut state = CreationDialogState::for_create("Jinyo", "1.14", t("10:00"), t("11:00"));
        state.reason = "  Lunch ".to_string();

        match state.submit() {
            Some(DialogAction::Create(draft)) => {
                assert_eq!(draft.person, "Jinyo");
                assert_eq!(draft.start, t("10:00"));
                assert_eq!(draft.end, t("11:00"));
                assert_eq!(draft.reason, "Lunch");
            }
            _ => panic!("expected create action"),
        }
    }

    #[test]
    fn test_invalid_times_keep_form_open() {
        let mut state = CreationDialogState::for_create("Jinyo", "1.14", t("10:00"), t("11:00"));
        state.end_text = "9:30".to_string();
        assert!(state.submit().is_none());
        assert!(state.error_message.is_some());

        state.end_text = "25:00".to_string();
        assert!(state.validate().unwrap_err().starts_with("End"));
    }

    #[test]
    fn test_empty_person_rejected() {
        let mut state = CreationDialogState::for_create("Jinyo", "1.14", t("10:00"), t("11:00"));
        state.person = "   ".to_string();
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_edit_keeps_identity() {
        let original = Schedule::new(ScheduleId(8), "Jinyo", "1.14", t("10:00"), t("11:00"))
            .unwrap()
            .with_reason("Meeting");
        let mut state = CreationDialogState::for_edit(&original);
        assert_eq!(state.reason, "Meeting");
        state.start_text = "10:30".to_string();

        match state.submit() {
            Some(DialogAction::Update { original: before, updated }) => {
                assert_eq!(before, original);
                assert_eq!(updated.id, ScheduleId(8));
                assert_eq!(updated.time_label(), "10:30-11:00");
                assert_eq!(updated.reason.as_deref(), Some("Meeting"));
            }
            _ => panic!("expected update action"),
        }
    }
}
