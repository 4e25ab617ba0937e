//! Taskbar state: one button per open window, the start button, and the tray clock.

use desktop_shell_contract::ProgramId;

use crate::{
    config::TaskbarWidths,
    events::ShellEvent,
    model::{TaskbarEntry, WindowId},
};

/// Program opened by the tray shortcut.
pub const TRAY_PROGRAM: &str = "media-player";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How taskbar buttons are drawn for the space available.
pub enum TaskbarMode {
    /// Every button fits at full width.
    Default,
    /// Buttons are narrowed; titles truncate.
    Reduced,
    /// Only icons are shown.
    IconOnly,
    /// Even icon-only buttons do not fit; the strip scrolls.
    Overflow,
}

impl TaskbarMode {
    /// CSS class applied to the button strip.
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Default => "taskbar-programs",
            Self::Reduced => "taskbar-programs reduced",
            Self::IconOnly => "taskbar-programs icon-only",
            Self::Overflow => "taskbar-programs icon-only overflow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Button layout for the current width and entry count.
pub struct TaskbarLayout {
    /// Layout mode.
    pub mode: TaskbarMode,
    /// Width of each button in pixels.
    pub item_width: i32,
}

/// Picks the layout for `count` buttons sharing `available` pixels.
pub fn compute_taskbar_layout(available: i32, count: usize, widths: &TaskbarWidths) -> TaskbarLayout {
    if count == 0 {
        return TaskbarLayout {
            mode: TaskbarMode::Default,
            item_width: widths.default,
        };
    }
    let available = available.max(0);
    let count = count as i32;

    let mode = if count * widths.default <= available {
        TaskbarMode::Default
    } else if count * widths.reduced <= available {
        TaskbarMode::Reduced
    } else if count * widths.icon_only <= available {
        TaskbarMode::IconOnly
    } else {
        TaskbarMode::Overflow
    };
    let item_width = (available / count).clamp(widths.icon_only, widths.default);

    TaskbarLayout { mode, item_width }
}

/// Pixels left for window buttons in a taskbar spanning `viewport_width`.
pub fn available_button_width(viewport_width: i32, widths: &TaskbarWidths) -> i32 {
    (viewport_width - widths.reserved).max(0)
}

/// Formats a 24-hour time the way the tray clock shows it, e.g. `3:07 PM`.
pub fn format_clock(hour: u32, minute: u32) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour}:{minute:02} {suffix}")
}

/// Current local wall-clock time as `(hour, minute)`.
pub fn local_clock_time() -> (u32, u32) {
    #[cfg(target_arch = "wasm32")]
    {
        let date = js_sys::Date::new_0();
        (date.get_hours(), date.get_minutes())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        (0, 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Mirrors window lifecycle events into taskbar buttons.
pub struct TaskbarController {
    entries: Vec<TaskbarEntry>,
    start_pressed: bool,
}

impl TaskbarController {
    /// Creates an empty taskbar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons in creation order.
    pub fn entries(&self) -> &[TaskbarEntry] {
        &self.entries
    }

    /// Button of the active window.
    pub fn active_entry(&self) -> Option<&TaskbarEntry> {
        self.entries.iter().find(|entry| entry.active)
    }

    /// Whether the start button is drawn pressed.
    pub fn is_start_pressed(&self) -> bool {
        self.start_pressed
    }

    /// Folds one shell event into the taskbar. Returns `true` when anything changed.
    pub fn apply(&mut self, event: &ShellEvent) -> bool {
        match event {
            ShellEvent::WindowCreated {
                window,
                title,
                icon,
                ..
            } => {
                if self.entries.iter().any(|entry| &entry.id == window) {
                    return false;
                }
                self.entries.push(TaskbarEntry {
                    id: window.clone(),
                    title: title.clone(),
                    icon: icon.clone(),
                    active: false,
                });
                true
            }
            ShellEvent::WindowClosed { window, .. } => {
                let before = self.entries.len();
                self.entries.retain(|entry| &entry.id != window);
                before != self.entries.len()
            }
            ShellEvent::WindowFocused { window } => {
                if !self.entries.iter().any(|entry| &entry.id == window) {
                    return false;
                }
                let mut changed = false;
                for entry in &mut self.entries {
                    let active = &entry.id == window;
                    changed |= entry.active != active;
                    entry.active = active;
                }
                changed
            }
            ShellEvent::WindowMinimized { window } => self.deactivate(window),
            ShellEvent::StartMenuOpened => !std::mem::replace(&mut self.start_pressed, true),
            ShellEvent::StartMenuClosed => std::mem::replace(&mut self.start_pressed, false),
            _ => false,
        }
    }

    /// Intent published when a window button is clicked.
    pub fn click(&self, window: &WindowId) -> ShellEvent {
        ShellEvent::TaskbarItemClicked {
            window: window.clone(),
        }
    }

    /// Intent published when the start button is clicked.
    pub fn click_start(&self) -> ShellEvent {
        ShellEvent::StartMenuToggleRequested
    }

    /// Intent published when the tray media shortcut is clicked.
    pub fn click_tray_media(&self) -> ShellEvent {
        ShellEvent::ProgramOpenRequested {
            program: ProgramId::trusted(TRAY_PROGRAM),
        }
    }

    fn deactivate(&mut self, window: &WindowId) -> bool {
        match self.entries.iter_mut().find(|entry| &entry.id == window) {
            Some(entry) if entry.active => {
                entry.active = false;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn created(program: &str) -> ShellEvent {
        let program = ProgramId::trusted(program);
        ShellEvent::WindowCreated {
            window: WindowId::for_program(&program),
            title: program.to_string(),
            icon: String::new(),
            program,
        }
    }

    fn wid(program: &str) -> WindowId {
        WindowId::for_program(&ProgramId::trusted(program))
    }

    #[test]
    fn entries_follow_window_lifecycle() {
        let mut taskbar = TaskbarController::new();
        assert!(taskbar.apply(&created("notepad")));
        assert!(taskbar.apply(&created("about-me")));
        assert!(!taskbar.apply(&created("notepad")));
        assert_eq!(taskbar.entries().len(), 2);

        taskbar.apply(&ShellEvent::WindowFocused {
            window: wid("about-me"),
        });
        assert_eq!(taskbar.active_entry().map(|e| &e.id), Some(&wid("about-me")));

        taskbar.apply(&ShellEvent::WindowFocused {
            window: wid("notepad"),
        });
        let active: Vec<&WindowId> = taskbar
            .entries()
            .iter()
            .filter(|e| e.active)
            .map(|e| &e.id)
            .collect();
        assert_eq!(active, vec![&wid("notepad")]);

        assert!(taskbar.apply(&ShellEvent::WindowClosed {
            window: wid("notepad"),
            program: ProgramId::trusted("notepad"),
        }));
        assert_eq!(taskbar.entries().len(), 1);
        assert_eq!(taskbar.active_entry(), None);
    }

    #[test]
    fn minimizing_clears_the_active_button() {
        let mut taskbar = TaskbarController::new();
        taskbar.apply(&created("notepad"));
        taskbar.apply(&ShellEvent::WindowFocused {
            window: wid("notepad"),
        });
        assert!(taskbar.apply(&ShellEvent::WindowMinimized {
            window: wid("notepad"),
        }));
        assert_eq!(taskbar.active_entry(), None);
        assert!(!taskbar.apply(&ShellEvent::WindowMinimized {
            window: wid("notepad"),
        }));
    }

    #[test]
    fn focus_for_an_unknown_window_keeps_the_active_button() {
        let mut taskbar = TaskbarController::new();
        taskbar.apply(&created("notepad"));
        taskbar.apply(&ShellEvent::WindowFocused {
            window: wid("notepad"),
        });

        assert!(!taskbar.apply(&ShellEvent::WindowFocused {
            window: wid("about-me"),
        }));
        assert_eq!(taskbar.active_entry().map(|e| &e.id), Some(&wid("notepad")));
    }

    #[test]
    fn start_button_tracks_menu_visibility() {
        let mut taskbar = TaskbarController::new();
        assert!(taskbar.apply(&ShellEvent::StartMenuOpened));
        assert!(taskbar.is_start_pressed());
        assert!(!taskbar.apply(&ShellEvent::StartMenuOpened));
        assert!(taskbar.apply(&ShellEvent::StartMenuClosed));
        assert!(!taskbar.is_start_pressed());
    }

    #[test]
    fn clicks_become_intents() {
        let taskbar = TaskbarController::new();
        assert_eq!(
            taskbar.click(&wid("notepad")),
            ShellEvent::TaskbarItemClicked {
                window: wid("notepad")
            }
        );
        assert_eq!(taskbar.click_start(), ShellEvent::StartMenuToggleRequested);
        assert_eq!(
            taskbar.click_tray_media(),
            ShellEvent::ProgramOpenRequested {
                program: ProgramId::trusted("media-player")
            }
        );
    }

    #[test]
    fn layout_degrades_through_thresholds() {
        let widths = TaskbarWidths::default();
        assert_eq!(
            compute_taskbar_layout(800, 3, &widths),
            TaskbarLayout {
                mode: TaskbarMode::Default,
                item_width: 160
            }
        );
        assert_eq!(
            compute_taskbar_layout(400, 4, &widths),
            TaskbarLayout {
                mode: TaskbarMode::Reduced,
                item_width: 100
            }
        );
        assert_eq!(
            compute_taskbar_layout(300, 6, &widths),
            TaskbarLayout {
                mode: TaskbarMode::IconOnly,
                item_width: 50
            }
        );
        assert_eq!(
            compute_taskbar_layout(100, 9, &widths),
            TaskbarLayout {
                mode: TaskbarMode::Overflow,
                item_width: 36
            }
        );
        assert_eq!(compute_taskbar_layout(0, 0, &widths).mode, TaskbarMode::Default);
    }

    #[test]
    fn available_width_subtracts_fixed_chrome() {
        let widths = TaskbarWidths::default();
        assert_eq!(available_button_width(1024, &widths), 794);
        assert_eq!(available_button_width(100, &widths), 0);
    }

    #[test]
    fn clock_uses_twelve_hour_format() {
        assert_eq!(format_clock(0, 5), "12:05 AM");
        assert_eq!(format_clock(12, 0), "12:00 PM");
        assert_eq!(format_clock(15, 7), "3:07 PM");
        assert_eq!(format_clock(9, 41), "9:41 AM");
    }
}
