//! Core desktop data model types shared by the window manager, controllers, and UI.

use desktop_shell_contract::ProgramId;
use serde::{Deserialize, Serialize};

use crate::frame_pool::ContentHandle;

/// Identifier of a managed window. Each program owns at most one, named `<program>-window`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(String);

impl WindowId {
    /// Returns the window identifier owned by `program`.
    pub fn for_program(program: &ProgramId) -> Self {
        Self(program.window_key())
    }

    /// Wraps a raw identifier, for example one read back from a DOM attribute.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Pointer coordinates in desktop pixels.
pub struct Point {
    /// X coordinate in pixels.
    pub x: i32,
    /// Y coordinate in pixels.
    pub y: i32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Rectangle in desktop pixel coordinates.
pub struct WindowRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl WindowRect {
    /// Creates a rectangle.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the rectangle spanned by two corner points, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            w: (a.x - b.x).abs(),
            h: (a.y - b.y).abs(),
        }
    }

    /// Returns a translated copy.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Returns a copy moved so its top-left corner sits at `origin`.
    pub fn at(self, origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..self
        }
    }

    /// Returns the top-left corner.
    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns `true` when both rectangles overlap or touch.
    pub fn intersects(self, other: Self) -> bool {
        self.x <= other.x + other.w
            && other.x <= self.x + self.w
            && self.y <= other.y + other.h
            && other.y <= self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Browser viewport size, including the strip covered by the taskbar.
pub struct Viewport {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Viewport {
    /// Creates a viewport.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns the height left for windows above a taskbar of `taskbar_height`.
    pub fn desktop_height(self, taskbar_height: i32) -> i32 {
        (self.height - taskbar_height).max(0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle state of an open window.
pub enum WindowState {
    /// Visible at its own geometry.
    Normal,
    /// Hidden; reachable through its taskbar entry only.
    Minimized,
    /// Visible and filling the desktop area.
    Maximized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Canonical state of one open window.
pub struct WindowRecord {
    /// Window identifier derived from the program.
    pub id: WindowId,
    /// Program hosted by this window.
    pub program_id: ProgramId,
    /// Title bar text.
    pub title: String,
    /// Icon path.
    pub icon: String,
    /// Current box.
    pub geometry: WindowRect,
    /// Box saved when maximizing, restored verbatim when un-maximizing.
    pub saved_geometry: Option<WindowRect>,
    /// Lifecycle state.
    pub state: WindowState,
    /// Whether a restore from minimized should return to [`WindowState::Maximized`].
    pub restore_maximized: bool,
    /// Whether this window currently has focus.
    pub active: bool,
    /// Pooled content frame borrowed while the window is open.
    pub content: ContentHandle,
    /// Primary status line text.
    pub status_text: String,
}

impl WindowRecord {
    /// Returns `true` when the window is on screen.
    pub fn is_visible(&self) -> bool {
        self.state != WindowState::Minimized
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One taskbar button, owned by the taskbar controller.
pub struct TaskbarEntry {
    /// Window this entry represents.
    pub id: WindowId,
    /// Display title.
    pub title: String,
    /// Icon path.
    pub icon: String,
    /// Whether the window is the active one.
    pub active: bool,
}

/// Ordered window ids, front = topmost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZOrderStack {
    ids: Vec<WindowId>,
}

impl ZOrderStack {
    /// Moves `id` to the front, inserting it when absent.
    pub fn bring_to_front(&mut self, id: &WindowId) {
        self.remove(id);
        self.ids.insert(0, id.clone());
    }

    /// Removes `id`. Returns whether it was present.
    pub fn remove(&mut self, id: &WindowId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|entry| entry != id);
        self.ids.len() != before
    }

    /// Returns the topmost id.
    pub fn top(&self) -> Option<&WindowId> {
        self.ids.first()
    }

    /// Returns the stack index of `id` (0 = topmost).
    pub fn position(&self, id: &WindowId) -> Option<usize> {
        self.ids.iter().position(|entry| entry == id)
    }

    /// Returns `true` when `id` is in the stack.
    pub fn contains(&self, id: &WindowId) -> bool {
        self.position(id).is_some()
    }

    /// Returns the ids, topmost first.
    pub fn ids(&self) -> &[WindowId] {
        &self.ids
    }

    /// Returns the number of stacked windows.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` when no window is stacked.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// In-flight title-bar drag.
pub struct DragSession {
    /// Pointer position when the drag began.
    pub pointer_start: Point,
    /// Translation applied visually but not committed yet.
    pub offset: Point,
}
