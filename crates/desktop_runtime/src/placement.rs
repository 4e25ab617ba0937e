//! Window placement geometry: cascade slots, anchored boxes, and viewport clamps.

use crate::{
    config::ShellConfig,
    model::{Point, Viewport, WindowRect},
    programs::{Anchor, VerticalAlign},
};

/// Position inside the multi-column cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeCursor {
    column: i32,
    row: i32,
}

impl CascadeCursor {
    /// Current column.
    pub fn column(&self) -> i32 {
        self.column
    }

    /// Current row inside the column.
    pub fn row(&self) -> i32 {
        self.row
    }

    /// Returns the origin for a window of `height` and advances to the next slot.
    ///
    /// A column ends when the next diagonal step would push a window of this height into the
    /// bottom margin; columns wrap back to the first once they would run off the right edge.
    pub fn place(&mut self, height: i32, viewport: Viewport, config: &ShellConfig) -> Point {
        let cascade = config.cascade;
        let desktop_height = viewport.desktop_height(config.taskbar_height);

        let mut x =
            cascade.origin_x + self.column * cascade.column_spacing_x + self.row * cascade.step;
        let mut y =
            cascade.origin_y + self.column * cascade.column_spacing_y + self.row * cascade.step;

        let max_top = desktop_height - height;
        if y > max_top {
            y = max_top;
        }
        y = y.min(desktop_height - config.min_visible_height).max(0);
        x = x.min(viewport.width - config.min_visible_width).max(0);

        let next_row_y = cascade.origin_y
            + self.column * cascade.column_spacing_y
            + (self.row + 1) * cascade.step;
        if next_row_y + height > desktop_height - cascade.bottom_margin {
            self.column += 1;
            self.row = 0;
        } else {
            self.row += 1;
        }

        let wrap_limit = ((viewport.width as f64) * 0.8).min((viewport.width - 200) as f64);
        let next_column_x = cascade.origin_x + self.column * cascade.column_spacing_x;
        if next_column_x as f64 > wrap_limit {
            self.column = 0;
            self.row = 0;
        }

        Point::new(x, y)
    }
}

/// Resolves an anchored box.
///
/// `reference` is the box of the [`Anchor::LeftOf`] target; other anchors ignore it. The result
/// is clamped to stay inside the desktop minus [`ShellConfig::anchor_margin`] and never goes
/// negative.
pub fn resolve_anchor(
    anchor: &Anchor,
    offset: Point,
    (width, height): (i32, i32),
    reference: Option<WindowRect>,
    viewport: Viewport,
    config: &ShellConfig,
) -> Point {
    let (offset_x, offset_y) = (offset.x, offset.y);
    let vw = viewport.width;
    let vh = viewport.desktop_height(config.taskbar_height);
    let centered_y = (vh - height) / 2;

    let (x, y) = match anchor {
        Anchor::TopLeft => (offset_x, offset_y),
        Anchor::TopRight => (vw - width - offset_x, offset_y),
        Anchor::BottomLeft => (offset_x, vh - height - offset_y),
        Anchor::BottomRight => (vw - width - offset_x, vh - height - offset_y),
        Anchor::Center => ((vw - width) / 2 + offset_x, centered_y + offset_y),
        Anchor::CenterLeft => (offset_x, centered_y + offset_y),
        Anchor::CenterRight => (vw - width - offset_x, centered_y + offset_y),
        Anchor::LeftOf { align, .. } => {
            let reference =
                reference.unwrap_or_else(|| WindowRect::new((vw - width) / 2, centered_y, 0, 0));
            let x = reference.x - width - offset_x;
            let y = match align {
                VerticalAlign::Top => reference.y + offset_y,
                VerticalAlign::Bottom => reference.y + reference.h - height - offset_y,
            };
            (x, y)
        }
    };

    let margin = config.anchor_margin;
    let max_x = vw - width - margin;
    let max_y = vh - height - margin;
    Point::new(
        x.min(max_x).max(margin).max(0),
        y.min(max_y).max(margin).max(0),
    )
}

/// Clamps a dropped window so a grabbable sliver stays on screen.
pub fn clamp_drag_position(rect: WindowRect, viewport: Viewport, config: &ShellConfig) -> Point {
    let visible = config.drag_visible_x;
    let min_x = -rect.w + visible;
    let max_x = viewport.width - visible;
    let max_y = viewport.desktop_height(config.taskbar_height) - config.drag_bottom_margin;
    Point::new(
        rect.x.min(max_x).max(min_x),
        rect.y.min(max_y).max(0),
    )
}

/// Clamps a window after a viewport resize so at least the minimum visible box remains.
pub fn constrain_to_viewport(rect: WindowRect, viewport: Viewport, config: &ShellConfig) -> Point {
    let min_x = -rect.w + config.min_visible_width;
    let max_x = viewport.width - config.min_visible_width;
    let max_y = viewport.desktop_height(config.taskbar_height) - config.min_visible_height;
    Point::new(
        rect.x.min(max_x).max(min_x),
        rect.y.min(max_y).max(0),
    )
}

/// Box of a maximized window: the whole desktop above the taskbar.
pub fn maximized_rect(viewport: Viewport, config: &ShellConfig) -> WindowRect {
    WindowRect::new(
        0,
        0,
        viewport.width,
        viewport.desktop_height(config.taskbar_height),
    )
}
