//! Desktop icon grid, selection, and rubber-band selection.

use std::collections::{BTreeSet, HashMap};

use desktop_shell_contract::ProgramId;

use crate::{
    config::IconGridConfig,
    events::ShellEvent,
    model::{Point, WindowRect},
    programs::ProgramRegistry,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One desktop shortcut.
pub struct DesktopIcon {
    /// Program the shortcut opens.
    pub program_id: ProgramId,
    /// Caption under the icon.
    pub title: String,
    /// Icon path.
    pub icon: String,
    /// Cell occupied on the desktop.
    pub rect: WindowRect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SelectionBand {
    start: Point,
    current: Point,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Tracks which desktop icons are selected.
pub struct DesktopIconManager {
    icons: Vec<DesktopIcon>,
    grid: IconGridConfig,
    debounce_ms: u64,
    selected: BTreeSet<ProgramId>,
    highlighted: BTreeSet<ProgramId>,
    band: Option<SelectionBand>,
    dragged: bool,
    last_click_ms: HashMap<ProgramId, u64>,
}

impl DesktopIconManager {
    /// Creates icons for every program flagged for the desktop, laid out for `desktop_height`.
    pub fn new(
        registry: &ProgramRegistry,
        grid: IconGridConfig,
        debounce_ms: u64,
        desktop_height: i32,
    ) -> Self {
        let icons = registry
            .desktop_programs()
            .map(|program| DesktopIcon {
                program_id: program.id.clone(),
                title: program.title.clone(),
                icon: program.icon.clone(),
                rect: WindowRect::default(),
            })
            .collect();
        let mut manager = Self {
            icons,
            grid,
            debounce_ms,
            selected: BTreeSet::new(),
            highlighted: BTreeSet::new(),
            band: None,
            dragged: false,
            last_click_ms: HashMap::new(),
        };
        manager.layout(desktop_height);
        manager
    }

    /// Places icons column-major, starting a new column when the next cell would not fit.
    pub fn layout(&mut self, desktop_height: i32) {
        let grid = self.grid;
        let rows = ((desktop_height - grid.margin) / grid.cell_height).max(1) as usize;
        for (index, icon) in self.icons.iter_mut().enumerate() {
            let (column, row) = ((index / rows) as i32, (index % rows) as i32);
            icon.rect = WindowRect::new(
                grid.margin + column * grid.cell_width,
                grid.margin + row * grid.cell_height,
                grid.cell_width,
                grid.cell_height,
            );
        }
    }

    /// Icons in display order.
    pub fn icons(&self) -> &[DesktopIcon] {
        &self.icons
    }

    /// Whether `program`'s icon is selected.
    pub fn is_selected(&self, program: &ProgramId) -> bool {
        self.selected.contains(program)
    }

    /// Whether `program`'s icon is under the in-flight selection rectangle.
    pub fn is_highlighted(&self, program: &ProgramId) -> bool {
        self.highlighted.contains(program)
    }

    /// Selected programs in id order.
    pub fn selection(&self) -> impl Iterator<Item = &ProgramId> {
        self.selected.iter()
    }

    /// Normalized rectangle of the in-flight rubber band.
    pub fn selection_rect(&self) -> Option<WindowRect> {
        self.band
            .map(|band| WindowRect::from_corners(band.start, band.current))
    }

    /// Single click on an icon. Repeats inside the debounce window are ignored.
    ///
    /// Returns `true` when the selection changed.
    pub fn click_icon(&mut self, program: &ProgramId, ctrl: bool, now_ms: u64) -> bool {
        if !self.icons.iter().any(|icon| &icon.program_id == program) {
            return false;
        }
        if let Some(&last) = self.last_click_ms.get(program) {
            if now_ms.saturating_sub(last) < self.debounce_ms {
                return false;
            }
        }
        self.last_click_ms.insert(program.clone(), now_ms);

        if ctrl {
            if !self.selected.remove(program) {
                self.selected.insert(program.clone());
            }
        } else {
            self.selected.clear();
            self.highlighted.clear();
            self.selected.insert(program.clone());
        }
        true
    }

    /// Double click on an icon: selects it and asks for the program to open.
    pub fn double_click_icon(&mut self, program: &ProgramId) -> Option<ShellEvent> {
        self.icons
            .iter()
            .any(|icon| &icon.program_id == program)
            .then(|| {
                if !self.selected.contains(program) {
                    self.selected.clear();
                    self.selected.insert(program.clone());
                }
                ShellEvent::ProgramOpenRequested {
                    program: program.clone(),
                }
            })
    }

    /// Pointer down on empty desktop. Without `ctrl` the current selection is dropped.
    pub fn begin_band(&mut self, point: Point, ctrl: bool) {
        if !ctrl {
            self.selected.clear();
        }
        self.highlighted.clear();
        self.band = Some(SelectionBand {
            start: point,
            current: point,
        });
        self.dragged = false;
    }

    /// Pointer move during a rubber-band drag; highlights intersecting icons.
    pub fn update_band(&mut self, point: Point) -> bool {
        let Some(band) = self.band.as_mut() else {
            return false;
        };
        band.current = point;
        self.dragged = true;

        let rect = WindowRect::from_corners(band.start, band.current);
        self.highlighted = self
            .icons
            .iter()
            .filter(|icon| icon.rect.intersects(rect))
            .map(|icon| icon.program_id.clone())
            .collect();
        true
    }

    /// Pointer up: highlighted icons join the selection.
    pub fn end_band(&mut self) -> bool {
        if self.band.take().is_none() {
            return false;
        }
        let highlighted = std::mem::take(&mut self.highlighted);
        self.selected.extend(highlighted);
        true
    }

    /// Click that landed on empty desktop. A click ending a rubber-band drag keeps the selection.
    pub fn click_empty_desktop(&mut self) {
        if self.band.is_none() && !self.dragged {
            self.clear_selection();
        }
        self.dragged = false;
    }

    /// Drops every selection and highlight.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.highlighted.clear();
    }

    /// Folds a shell event in. Windows appearing or taking focus clear the selection.
    pub fn apply(&mut self, event: &ShellEvent) -> bool {
        match event {
            ShellEvent::WindowCreated { .. } | ShellEvent::WindowFocused { .. } => {
                let changed = !self.selected.is_empty() || !self.highlighted.is_empty();
                self.clear_selection();
                changed
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{model::WindowId, programs::ProgramDescriptor};

    fn pid(raw: &str) -> ProgramId {
        ProgramId::trusted(raw)
    }

    fn manager(desktop_height: i32) -> DesktopIconManager {
        let programs = ["about-me", "my-projects", "resume-pdf", "contact-me"]
            .into_iter()
            .map(|id| {
                let mut program = ProgramDescriptor::new(pid(id), id);
                program.desktop_icon = true;
                program
            })
            .chain(std::iter::once(ProgramDescriptor::new(pid("notepad"), "Notepad")))
            .collect();
        let registry = ProgramRegistry::from_descriptors(programs, Vec::new()).expect("registry");
        DesktopIconManager::new(&registry, IconGridConfig::default(), 300, desktop_height)
    }

    fn selected(manager: &DesktopIconManager) -> Vec<&str> {
        manager.selection().map(ProgramId::as_str).collect()
    }

    #[test]
    fn only_flagged_programs_get_icons_in_a_column_major_grid() {
        let icons = manager(300);
        let rects: Vec<(i32, i32)> = icons.icons().iter().map(|i| (i.rect.x, i.rect.y)).collect();
        assert_eq!(rects, vec![(10, 10), (10, 100), (10, 190), (100, 10)]);
    }

    #[test]
    fn click_selects_and_ctrl_click_toggles() {
        let mut icons = manager(1000);
        assert!(icons.click_icon(&pid("about-me"), false, 0));
        assert!(icons.click_icon(&pid("contact-me"), true, 1_000));
        assert_eq!(selected(&icons), vec!["about-me", "contact-me"]);

        icons.click_icon(&pid("about-me"), true, 2_000);
        assert_eq!(selected(&icons), vec!["contact-me"]);

        icons.click_icon(&pid("my-projects"), false, 3_000);
        assert_eq!(selected(&icons), vec!["my-projects"]);
        assert!(!icons.click_icon(&pid("notepad"), false, 4_000));
    }

    #[test]
    fn repeated_clicks_inside_the_debounce_window_are_ignored() {
        let mut icons = manager(1000);
        icons.click_icon(&pid("about-me"), true, 1_000);
        assert!(!icons.click_icon(&pid("about-me"), true, 1_299));
        assert!(icons.is_selected(&pid("about-me")));
        assert!(icons.click_icon(&pid("about-me"), true, 1_300));
        assert!(!icons.is_selected(&pid("about-me")));
    }

    #[test]
    fn double_click_requests_the_program() {
        let mut icons = manager(1000);
        assert_eq!(
            icons.double_click_icon(&pid("resume-pdf")),
            Some(ShellEvent::ProgramOpenRequested {
                program: pid("resume-pdf")
            })
        );
        assert!(icons.is_selected(&pid("resume-pdf")));
        assert_eq!(icons.double_click_icon(&pid("ghost")), None);
    }

    #[test]
    fn rubber_band_highlights_then_commits() {
        let mut icons = manager(1000);
        icons.click_icon(&pid("contact-me"), false, 0);

        icons.begin_band(Point::new(150, 150), false);
        assert!(selected(&icons).is_empty());
        icons.update_band(Point::new(5, 105));
        assert_eq!(
            icons.selection_rect(),
            Some(WindowRect::new(5, 105, 145, 45))
        );
        assert!(icons.is_highlighted(&pid("my-projects")));
        assert!(!icons.is_highlighted(&pid("about-me")));

        icons.end_band();
        icons.click_empty_desktop();
        assert_eq!(selected(&icons), vec!["my-projects"]);
        assert_eq!(icons.selection_rect(), None);
    }

    #[test]
    fn ctrl_band_adds_to_existing_selection() {
        let mut icons = manager(1000);
        icons.click_icon(&pid("contact-me"), false, 0);
        icons.begin_band(Point::new(0, 0), true);
        icons.update_band(Point::new(20, 20));
        icons.end_band();
        assert_eq!(selected(&icons), vec!["about-me", "contact-me"]);
    }

    #[test]
    fn plain_desktop_click_clears_selection() {
        let mut icons = manager(1000);
        icons.click_icon(&pid("about-me"), false, 0);
        icons.begin_band(Point::new(500, 500), true);
        icons.end_band();
        icons.click_empty_desktop();
        assert!(selected(&icons).is_empty());
    }

    #[test]
    fn window_activity_clears_selection() {
        let mut icons = manager(1000);
        icons.click_icon(&pid("about-me"), false, 0);
        assert!(icons.apply(&ShellEvent::WindowFocused {
            window: WindowId::for_program(&pid("notepad"))
        }));
        assert!(selected(&icons).is_empty());
        assert!(!icons.apply(&ShellEvent::StartMenuOpened));
    }
}
