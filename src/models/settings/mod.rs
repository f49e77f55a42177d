// Settings module
// Board configuration persisted as TOML

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("start_hour ({start}) must be before end_hour ({end}) and end_hour at most 24")]
    HourWindow { start: u16, end: u16 },
    #[error("snap_minutes must be a positive divisor of 60, got {0}")]
    SnapInterval(u16),
    #[error("{0} must be a positive number of pixels")]
    Dimension(&'static str),
}

/// Geometry of the visible time grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub start_hour: u16,
    pub end_hour: u16,
    /// Height of one hour row in pixels.
    pub row_height: f32,
    pub snap_minutes: u16,
    pub column_width: f32,
    pub time_label_width: f32,
    pub header_height: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 24,
            row_height: 50.0,
            snap_minutes: 15,
            column_width: 110.0,
            time_label_width: 60.0,
            header_height: 50.0,
        }
    }
}

/// Thresholds used to tell taps, long presses, drags and scrolls apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    pub creation_hold_ms: u64,
    pub block_hold_ms: u64,
    pub creation_cancel_px: f32,
    pub block_cancel_px: f32,
    pub double_tap_ms: u64,
    pub double_tap_px: f32,
    pub min_create_span_px: f32,
    pub default_duration_minutes: u16,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            creation_hold_ms: 300,
            block_hold_ms: 400,
            creation_cancel_px: 12.0,
            block_cancel_px: 5.0,
            double_tap_ms: 300,
            double_tap_px: 20.0,
            min_create_span_px: 10.0,
            default_duration_minutes: 60,
        }
    }
}

/// Where schedules come from and where edits go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Id of a link-shared spreadsheet; used to build the CSV export URL.
    pub sheet_id: Option<String>,
    /// Explicit CSV URL; takes precedence over `sheet_id`.
    pub csv_url: Option<String>,
    /// Web app endpoint accepting create/edit/delete requests.
    pub sync_url: Option<String>,
    /// Page opened by the "Open sheet" button.
    pub edit_url: Option<String>,
    /// Day keys offered by the day selector.
    pub dates: Vec<String>,
    pub default_date: Option<String>,
    /// Year used to label day keys such as `1.14`.
    pub year: i32,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            sheet_id: None,
            csv_url: None,
            sync_url: None,
            edit_url: None,
            dates: vec!["1.14".to_string(), "1.15".to_string()],
            default_date: None,
            year: 2026,
        }
    }
}

impl SourceSettings {
    /// Resolve the CSV export URL, if any source is configured.
    pub fn resolved_csv_url(&self) -> Option<String> {
        if let Some(url) = self.csv_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }
        self.sheet_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| {
                format!(
                    "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
                    urlencoding::encode(id)
                )
            })
    }

    /// Edit link, falling back to the sheet's own edit page.
    pub fn resolved_edit_url(&self) -> Option<String> {
        if let Some(url) = self.edit_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }
        self.sheet_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| {
                format!(
                    "https://docs.google.com/spreadsheets/d/{}/edit?usp=sharing",
                    urlencoding::encode(id)
                )
            })
    }

    /// Day shown at startup.
    pub fn initial_date(&self) -> String {
        self.default_date
            .clone()
            .or_else(|| self.dates.first().cloned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub grid: GridSettings,
    pub gestures: GestureSettings,
    pub source: SourceSettings,
}

impl BoardSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let grid = &self.grid;
        if grid.start_hour >= grid.end_hour || grid.end_hour > 24 {
            return Err(SettingsError::HourWindow {
                start: grid.start_hour,
                end: grid.end_hour,
            });
        }
        if grid.snap_minutes == 0 || 60 % grid.snap_minutes != 0 {
            return Err(SettingsError::SnapInterval(grid.snap_minutes));
        }
        for (name, value) in [
            ("row_height", grid.row_height),
            ("column_width", grid.column_width),
            ("time_label_width", grid.time_label_width),
            ("header_height", grid.header_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::Dimension(name));
            }
        }
        Ok(())
    }
}
