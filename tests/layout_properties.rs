// Property-based tests for side-by-side lane assignment

use proptest::prelude::*;
use schedule_board::models::schedule::{Schedule, ScheduleId, TimeOfDay};
use schedule_board::services::layout::resolve_lanes;

/// (start, length) in quarter hours, kept inside one day.
fn blocks() -> impl Strategy<Value = Vec<(u16, u16)>> {
    prop::collection::vec((0u16..92, 1u16..8), 1..24)
}

fn build(blocks: &[(u16, u16)]) -> Vec<Schedule> {
    blocks
        .iter()
        .enumerate()
        .map(|(i, &(start, len))| {
            let start = TimeOfDay::from_minutes(start * 15).expect("in range");
            let end = TimeOfDay::from_minutes((start.minutes() + len * 15).min(24 * 60))
                .expect("in range");
            Schedule::new(ScheduleId(i as u64 + 1), "Jinyo", "1.14", start, end)
                .expect("valid block")
        })
        .collect()
}

fn overlaps(a: &Schedule, b: &Schedule) -> bool {
    a.start < b.end && b.start < a.end
}

proptest! {
    #[test]
    fn overlapping_blocks_never_share_a_lane(input in blocks()) {
        let schedules = build(&input);
        let laid_out = resolve_lanes(&schedules);
        prop_assert_eq!(laid_out.len(), schedules.len());

        for (i, a) in laid_out.iter().enumerate() {
            prop_assert!(a.lane < a.lane_count);
            for b in laid_out.iter().skip(i + 1) {
                if overlaps(a.schedule, b.schedule) {
                    prop_assert_ne!(a.lane, b.lane);
                }
            }
        }
    }

    #[test]
    fn lane_count_equals_peak_overlap(input in blocks()) {
        let schedules = build(&input);
        let laid_out = resolve_lanes(&schedules);

        let peak = schedules
            .iter()
            .map(|candidate| {
                schedules
                    .iter()
                    .filter(|s| s.start <= candidate.start && candidate.start < s.end)
                    .count()
            })
            .max()
            .unwrap_or(0);

        for placed in &laid_out {
            prop_assert_eq!(placed.lane_count, peak);
        }
    }

    #[test]
    fn widths_fill_the_column(input in blocks()) {
        let schedules = build(&input);
        for placed in resolve_lanes(&schedules) {
            let right = placed.left_percent() + placed.width_percent();
            prop_assert!(right <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn input_order_does_not_matter(input in blocks()) {
        let schedules = build(&input);
        let forward: Vec<(ScheduleId, usize)> = resolve_lanes(&schedules)
            .iter()
            .map(|l| (l.schedule.id, l.lane))
            .collect();
        let mut backward: Vec<(ScheduleId, usize)> = resolve_lanes(schedules.iter().rev())
            .iter()
            .map(|l| (l.schedule.id, l.lane))
            .collect();

        let mut forward = forward;
        forward.sort();
        backward.sort();
        prop_assert_eq!(forward, backward);
    }
}
