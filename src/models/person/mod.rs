// Person columns
// Every board column belongs to one person name

use std::collections::BTreeSet;

use super::schedule::Schedule;

/// Reserved column for the shared schedule that applies to everyone.
/// Always rendered first when present.
pub const OFFICIAL_SCHEDULE: &str = "공식 일정";

pub fn is_official(name: &str) -> bool {
    name == OFFICIAL_SCHEDULE
}

/// Column order for one day: the sorted union of known people and the
/// owners of that day's schedules, with the official column pinned first.
pub fn derive_columns<'a, I>(known_people: &[String], day_schedules: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Schedule>,
{
    let mut names: BTreeSet<&str> = known_people
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    names.extend(day_schedules.into_iter().map(|s| s.name.as_str()));

    let has_official = names.remove(OFFICIAL_SCHEDULE);

    let mut columns = Vec::with_capacity(names.len() + usize::from(has_official));
    if has_official {
        columns.push(OFFICIAL_SCHEDULE.to_string());
    }
    columns.extend(names.into_iter().map(str::to_string));
    columns
}
