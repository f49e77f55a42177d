//! Pixel <-> wall-clock mapping for the vertical time axis.
//!
//! Offsets are measured in pixels from the top of the first visible hour row.
//! Every conversion back to a time is rounded to the snap interval, so a block's
//! drawn edges and its committed `HH:MM` never disagree by more than half a
//! snap interval.

use crate::models::schedule::TimeOfDay;
use crate::models::settings::GridSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    start_hour: u16,
    end_hour: u16,
    row_height: f32,
    snap_minutes: u16,
}

impl TimeGrid {
    pub fn new(start_hour: u16, end_hour: u16, row_height: f32, snap_minutes: u16) -> Self {
        Self {
            start_hour,
            end_hour,
            row_height,
            snap_minutes: snap_minutes.max(1),
        }
    }

    pub fn from_settings(settings: &GridSettings) -> Self {
        Self::new(
            settings.start_hour,
            settings.end_hour,
            settings.row_height,
            settings.snap_minutes,
        )
    }

    pub fn start_hour(&self) -> u16 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u16 {
        self.end_hour
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn snap_minutes(&self) -> u16 {
        self.snap_minutes
    }

    pub fn start_minutes(&self) -> u16 {
        self.start_hour * 60
    }

    pub fn end_minutes(&self) -> u16 {
        self.end_hour * 60
    }

    pub fn pixels_per_minute(&self) -> f32 {
        self.row_height / 60.0
    }

    pub fn snap_interval_px(&self) -> f32 {
        self.snap_minutes as f32 * self.pixels_per_minute()
    }

    /// Total height of the visible window.
    pub fn grid_height(&self) -> f32 {
        (self.end_hour.saturating_sub(self.start_hour)) as f32 * self.row_height
    }

    /// Offset of a time (minutes since midnight) relative to the first row.
    /// Negative for times before the visible window.
    pub fn time_to_pixel(&self, minutes: u16) -> f32 {
        (minutes as f32 - self.start_minutes() as f32) * self.pixels_per_minute()
    }

    pub fn duration_to_pixels(&self, minutes: u16) -> f32 {
        minutes as f32 * self.pixels_per_minute()
    }

    /// Time at a pixel offset, rounded to the nearest snap interval.
    pub fn pixel_to_time(&self, offset: f32) -> TimeOfDay {
        let raw_minutes = offset / self.pixels_per_minute() + self.start_minutes() as f32;
        let snap = self.snap_minutes as f32;
        let snapped = (raw_minutes / snap).round() * snap;
        // Rounding 10:53 to 11:00 carries into the hour; whole-minute math
        // keeps that normalization implicit.
        TimeOfDay::clamped(snapped as i64)
    }

    /// Round an offset to the nearest multiple of the snap interval.
    pub fn snap_pixel(&self, offset: f32) -> f32 {
        let step = self.snap_interval_px();
        (offset / step).round() * step
    }

    /// Hours that get a labelled row, first to last.
    pub fn hours(&self) -> impl Iterator<Item = u16> {
        self.start_hour..self.end_hour
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self::from_settings(&GridSettings::default())
    }
}
