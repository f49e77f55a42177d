use chrono::NaiveDate;
use egui::RichText;

/// Day keys are `month.day`, e.g. `1.14`.
fn parse_day_key(key: &str) -> Option<(u32, u32)> {
    let (month, day) = key.trim().split_once('.')?;
    Some((month.trim().parse().ok()?, day.trim().parse().ok()?))
}

/// Human label for a day key, e.g. `1.14` becomes `Jan 14`. Unparseable
/// keys are shown as they are.
pub fn day_label(key: &str, year: i32) -> String {
    parse_day_key(key)
        .and_then(|(month, day)| NaiveDate::from_ymd_opt(year, month, day))
        .map(|date| date.format("%b %-d").to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Configured days first, in their configured order, then any other days
/// found in the data in calendar order.
pub fn merge_dates(configured: &[String], known: &[String]) -> Vec<String> {
    let mut extra: Vec<&String> = known
        .iter()
        .filter(|date| !configured.contains(date))
        .collect();
    extra.sort_by_key(|date| (parse_day_key(date).unwrap_or((u32::MAX, u32::MAX)), date.as_str()));

    configured
        .iter()
        .chain(extra)
        .cloned()
        .collect()
}

/// One button per day. Returns the newly chosen day.
pub fn render_day_selector(
    ui: &mut egui::Ui,
    current: &str,
    dates: &[String],
    year: i32,
) -> Option<String> {
    let mut chosen = None;
    for date in dates {
        let selected = date == current;
        let label = RichText::new(day_label(date, year));
        let label = if selected { label.strong() } else { label };
        if ui.selectable_label(selected, label).clicked() && !selected {
            chosen = Some(date.clone());
        }
    }
    chosen
}
