//! Render-ready projection of the whole desktop.

use desktop_shell_contract::ProgramId;

use crate::{
    model::{TaskbarEntry, Viewport, WindowId, WindowRect},
    session::SessionPhase,
    start_menu::StartMenuItem,
    taskbar::TaskbarLayout,
    window_manager::WindowPresentation,
};

/// Height of a window title bar.
pub const TITLE_BAR_HEIGHT: i32 = 30;
/// Width of the window frame border.
pub const WINDOW_BORDER: i32 = 3;
/// Height of the status line.
pub const STATUS_BAR_HEIGHT: i32 = 22;

/// Box the content frame covers inside a window of `outer` size.
pub fn content_rect(outer: WindowRect, status_bar: bool) -> WindowRect {
    let status = if status_bar { STATUS_BAR_HEIGHT } else { 0 };
    WindowRect::new(
        outer.x + WINDOW_BORDER,
        outer.y + TITLE_BAR_HEIGHT,
        (outer.w - 2 * WINDOW_BORDER).max(0),
        (outer.h - TITLE_BAR_HEIGHT - status - WINDOW_BORDER).max(0),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One pooled content frame as it should be drawn.
pub struct FrameView {
    /// Program hosted by the frame.
    pub program_id: ProgramId,
    /// DOM id of the frame element.
    pub dom_id: String,
    /// Document URI.
    pub source: String,
    /// Document generation; a change means the element must be rebuilt.
    pub generation: u32,
    /// Window showing the frame.
    pub window: Option<WindowId>,
    /// Content box; `None` while parked or minimized.
    pub rect: Option<WindowRect>,
    /// Stacking order shared with the owning window.
    pub z_index: Option<i32>,
    /// Inactive mask over the content.
    pub inactive_mask: bool,
    /// Click-blocking overlay while the start menu is open.
    pub content_overlay: bool,
    /// Loading placeholder over the content.
    pub loading: bool,
}

impl FrameView {
    /// Whether the frame is on screen.
    pub fn is_shown(&self) -> bool {
        self.rect.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One desktop icon as it should be drawn.
pub struct IconView {
    /// Program opened by the icon.
    pub program_id: ProgramId,
    /// Caption.
    pub title: String,
    /// Icon path.
    pub icon: String,
    /// Cell on the desktop.
    pub rect: WindowRect,
    /// Selected.
    pub selected: bool,
    /// Under the in-flight rubber band.
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
/// Everything the view layer needs for one render pass.
pub struct DesktopSnapshot {
    /// Boot/login phase.
    pub phase: SessionPhase,
    /// Viewport the snapshot was laid out for.
    pub viewport: Viewport,
    /// Wallpaper path.
    pub wallpaper: &'static str,
    /// Windows in id order.
    pub windows: Vec<WindowPresentation>,
    /// Pooled frames in program order.
    pub frames: Vec<FrameView>,
    /// Taskbar buttons in creation order.
    pub taskbar: Vec<TaskbarEntry>,
    /// Button layout.
    pub taskbar_layout: TaskbarLayout,
    /// Start button pressed.
    pub start_pressed: bool,
    /// Start menu showing.
    pub start_menu_open: bool,
    /// Start menu rows.
    pub start_menu_items: Vec<StartMenuItem>,
    /// Desktop icons.
    pub icons: Vec<IconView>,
    /// In-flight rubber band.
    pub selection_rect: Option<WindowRect>,
    /// When the next throttled status update is due.
    pub next_status_due_ms: Option<u64>,
}

impl DesktopSnapshot {
    /// Looks up a window projection.
    pub fn window(&self, id: &WindowId) -> Option<&WindowPresentation> {
        self.windows.iter().find(|window| &window.id == id)
    }

    /// Looks up a frame projection.
    pub fn frame(&self, program: &ProgramId) -> Option<&FrameView> {
        self.frames.iter().find(|frame| &frame.program_id == program)
    }

    /// Program whose frame element satisfies `is_source`, parked frames included.
    pub fn frame_sender(&self, is_source: impl Fn(&str) -> bool) -> Option<&ProgramId> {
        self.frames
            .iter()
            .find(|frame| is_source(&frame.dom_id))
            .map(|frame| &frame.program_id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn content_box_sits_inside_the_chrome() {
        let outer = WindowRect::new(100, 50, 550, 400);
        assert_eq!(
            content_rect(outer, true),
            WindowRect::new(103, 80, 544, 345)
        );
        assert_eq!(
            content_rect(outer, false),
            WindowRect::new(103, 80, 544, 367)
        );
        assert_eq!(
            content_rect(WindowRect::new(0, 0, 4, 10), true),
            WindowRect::new(3, 30, 0, 0)
        );
    }
}
