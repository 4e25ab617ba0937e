//! Tunable shell constants.
//!
//! Every field has a default matching the classic desktop layout; a host can override any subset
//! by deserializing a partial JSON object.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Cascade placement constants.
pub struct CascadeConfig {
    /// X of the first cascaded window.
    pub origin_x: i32,
    /// Y of the first cascaded window.
    pub origin_y: i32,
    /// Diagonal step between windows in a column.
    pub step: i32,
    /// Horizontal distance between columns.
    pub column_spacing_x: i32,
    /// Extra vertical offset per column.
    pub column_spacing_y: i32,
    /// Space kept free above the taskbar before a new column starts.
    pub bottom_margin: i32,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            origin_x: 120,
            origin_y: 50,
            step: 35,
            column_spacing_x: 200,
            column_spacing_y: 20,
            bottom_margin: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Taskbar button width thresholds.
pub struct TaskbarWidths {
    /// Full button width (icon + title).
    pub default: i32,
    /// Narrow button width (icon + truncated title).
    pub reduced: i32,
    /// Icon-only button width.
    pub icon_only: i32,
    /// Width taken by the start button, tray, and padding.
    pub reserved: i32,
}

impl Default for TaskbarWidths {
    fn default() -> Self {
        Self {
            default: 160,
            reduced: 80,
            icon_only: 36,
            reserved: 230,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Desktop icon grid geometry.
pub struct IconGridConfig {
    /// Distance from the desktop edge to the first icon.
    pub margin: i32,
    /// Cell width.
    pub cell_width: i32,
    /// Cell height.
    pub cell_height: i32,
}

impl Default for IconGridConfig {
    fn default() -> Self {
        Self {
            margin: 10,
            cell_width: 90,
            cell_height: 90,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Shell-wide layout and timing configuration.
pub struct ShellConfig {
    /// Taskbar height in pixels.
    pub taskbar_height: i32,
    /// z-index of the bottom window.
    pub base_z: i32,
    /// z-index band reserved for the taskbar; windows stay below it.
    pub taskbar_z: i32,
    /// Cascade placement constants.
    pub cascade: CascadeConfig,
    /// Margin kept around anchored windows.
    pub anchor_margin: i32,
    /// Width of a window that must stay on screen after a drag.
    pub drag_visible_x: i32,
    /// Space kept above the taskbar after a drag.
    pub drag_bottom_margin: i32,
    /// Minimum visible width after a viewport resize.
    pub min_visible_width: i32,
    /// Minimum visible height after a viewport resize.
    pub min_visible_height: i32,
    /// Minimum interval between applied status updates of one window.
    pub status_throttle_ms: u64,
    /// Repeated clicks on one icon inside this window are ignored.
    pub icon_click_debounce_ms: u64,
    /// Taskbar button widths.
    pub taskbar_widths: TaskbarWidths,
    /// Desktop icon grid.
    pub icon_grid: IconGridConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            taskbar_height: 30,
            base_z: 100,
            taskbar_z: 500,
            cascade: CascadeConfig::default(),
            anchor_margin: 20,
            drag_visible_x: 100,
            drag_bottom_margin: 20,
            min_visible_width: 50,
            min_visible_height: 20,
            status_throttle_ms: 1_000,
            icon_click_debounce_ms: 300,
            taskbar_widths: TaskbarWidths::default(),
            icon_grid: IconGridConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Parses a partial JSON override on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns the JSON error message when `raw` is not a valid configuration object.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    }

    /// Highest z-index a window may receive.
    pub fn max_window_z(&self) -> i32 {
        self.taskbar_z - 1
    }
}
