//! Side-by-side layout for overlapping blocks in one person's column.
//!
//! Greedy interval colouring: blocks are taken in start order and dropped into
//! the first lane whose last block has already ended. Touching blocks
//! (`end == start`) share a lane. Every block in the column gets the same
//! width, `100 / lane_count`.

use crate::models::schedule::Schedule;

/// A block annotated with its horizontal slot. Rebuilt on every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaidOutSchedule<'a> {
    pub schedule: &'a Schedule,
    pub lane: usize,
    pub lane_count: usize,
}

impl LaidOutSchedule<'_> {
    pub fn width_percent(&self) -> f32 {
        100.0 / self.lane_count as f32
    }

    pub fn left_percent(&self) -> f32 {
        self.lane as f32 / self.lane_count as f32 * 100.0
    }
}

/// Assign lanes to the blocks of a single column.
///
/// Callers must pass well-formed blocks (`end > start`). Ties on start time
/// are broken by end time and then id, so the assignment does not depend on
/// the order of `schedules`.
pub fn resolve_lanes<'a, I>(schedules: I) -> Vec<LaidOutSchedule<'a>>
where
    I: IntoIterator<Item = &'a Schedule>,
{
    let mut sorted: Vec<&Schedule> = schedules.into_iter().collect();
    sorted.sort_by_key(|s| (s.start, s.end, s.id));

    // End time of the most recently placed block in each lane.
    let mut lane_ends: Vec<u16> = Vec::new();
    let mut placed: Vec<(&Schedule, usize)> = Vec::with_capacity(sorted.len());

    for schedule in sorted {
        let lane = match lane_ends
            .iter()
            .position(|&end| end <= schedule.start_minutes())
        {
            Some(lane) => {
                lane_ends[lane] = schedule.end_minutes();
                lane
            }
            None => {
                lane_ends.push(schedule.end_minutes());
                lane_ends.len() - 1
            }
        };
        placed.push((schedule, lane));
    }

    let lane_count = lane_ends.len();
    placed
        .into_iter()
        .map(|(schedule, lane)| LaidOutSchedule {
            schedule,
            lane,
            lane_count,
        })
        .collect()
}
