//! Window lifecycle state machine.
//!
//! [`WindowManager`] owns the window records, the z-order stack, and the content frame pool.
//! Every transition runs to completion, leaves records and stack consistent, and returns the
//! events it produced instead of publishing them. The caller publishes after releasing its borrow,
//! which keeps re-entrant handlers from observing a half-applied transition.

use std::{collections::BTreeMap, rc::Rc};

use desktop_shell_contract::{FrameMessage, ProgramId, ShellMessage};
use thiserror::Error;

use crate::{
    config::ShellConfig,
    events::ShellEvent,
    frame_pool::ContentFramePool,
    model::{DragSession, Point, Viewport, WindowId, WindowRecord, WindowRect, WindowState, ZOrderStack},
    placement::{self, CascadeCursor},
    programs::{Anchor, Placement, ProgramDescriptor, ProgramRegistry},
    status_line::{StatusDecision, StatusThrottle},
};

/// Events produced by one transition, in publication order.
pub type Transition = Vec<ShellEvent>;

const MAX_ANCHOR_CHAIN: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Window manager failures. Stale window ids are not errors; they are ignored.
pub enum WindowManagerError {
    /// The program id is not in the registry.
    #[error("unknown program `{0}`")]
    UnknownProgram(ProgramId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Derived, read-only view of one window for rendering.
pub struct WindowPresentation {
    /// Window id.
    pub id: WindowId,
    /// Hosted program.
    pub program_id: ProgramId,
    /// Title bar text.
    pub title: String,
    /// Icon path.
    pub icon: String,
    /// Box to draw, including any uncommitted drag translation.
    pub rect: WindowRect,
    /// Stacking order; `None` while minimized.
    pub z_index: Option<i32>,
    /// Lifecycle state.
    pub state: WindowState,
    /// Whether this is the active window.
    pub active: bool,
    /// Whether the inactive mask covers the content.
    pub inactive_mask: bool,
    /// Whether the click-blocking overlay for an open start menu covers the content.
    pub content_overlay: bool,
    /// Whether the loading placeholder covers the content.
    pub loading: bool,
    /// Whether the window has a status line.
    pub status_bar: bool,
    /// Primary status text.
    pub status_text: String,
    /// Fixed secondary status cells.
    pub status_items: Vec<String>,
    /// Whether minimize is offered.
    pub can_minimize: bool,
    /// Whether maximize is offered.
    pub can_maximize: bool,
    /// Whether a title-bar drag is in progress.
    pub dragging: bool,
}

/// Owner of every window record and the z-order stack.
pub struct WindowManager {
    config: ShellConfig,
    registry: Rc<ProgramRegistry>,
    frames: ContentFramePool,
    windows: BTreeMap<WindowId, WindowRecord>,
    stack: ZOrderStack,
    viewport: Viewport,
    cascade: CascadeCursor,
    start_menu_open: bool,
    drag: Option<(WindowId, DragSession)>,
    status: StatusThrottle,
}

impl WindowManager {
    /// Creates a manager with a pre-warmed frame per registered program.
    pub fn new(config: ShellConfig, registry: Rc<ProgramRegistry>, viewport: Viewport) -> Self {
        Self {
            frames: ContentFramePool::prewarmed(&registry),
            status: StatusThrottle::new(config.status_throttle_ms),
            config,
            registry,
            windows: BTreeMap::new(),
            stack: ZOrderStack::default(),
            viewport,
            cascade: CascadeCursor::default(),
            start_menu_open: false,
            drag: None,
        }
    }

    /// Shell configuration.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Program catalog.
    pub fn registry(&self) -> &ProgramRegistry {
        &self.registry
    }

    /// Looks up a window record.
    pub fn window(&self, id: &WindowId) -> Option<&WindowRecord> {
        self.windows.get(id)
    }

    /// Iterates every open window in id order.
    pub fn windows(&self) -> impl Iterator<Item = &WindowRecord> {
        self.windows.values()
    }

    /// Returns the window hosting `program`, if open.
    pub fn window_for_program(&self, program: &ProgramId) -> Option<&WindowRecord> {
        self.windows.get(&WindowId::for_program(program))
    }

    /// z-order stack, topmost first.
    pub fn stack(&self) -> &ZOrderStack {
        &self.stack
    }

    /// Id of the active window.
    pub fn active_window(&self) -> Option<&WindowId> {
        self.windows
            .values()
            .find(|record| record.active)
            .map(|record| &record.id)
    }

    /// Content frame pool.
    pub fn frames(&self) -> &ContentFramePool {
        &self.frames
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the start menu is currently open.
    pub fn is_start_menu_open(&self) -> bool {
        self.start_menu_open
    }

    /// Earliest time a throttled status update is due.
    pub fn next_status_due_ms(&self) -> Option<u64> {
        self.status.next_due_ms()
    }

    /// z-index of a stacked window: `base_z + (len - 1 - index)`, kept below the taskbar band.
    pub fn z_index(&self, id: &WindowId) -> Option<i32> {
        let index = self.stack.position(id)? as i32;
        let len = self.stack.len() as i32;
        Some((self.config.base_z + (len - 1 - index)).min(self.config.max_window_z()))
    }

    /// Builds the render projection of one window.
    pub fn presentation(&self, id: &WindowId) -> Option<WindowPresentation> {
        let record = self.windows.get(id)?;
        let descriptor = self.registry.get(&record.program_id);
        let drag_offset = self
            .drag
            .as_ref()
            .filter(|(dragged, _)| dragged == id)
            .map(|(_, session)| session.offset);
        let loaded = self
            .frames
            .slot(&record.program_id)
            .map(|slot| slot.loaded)
            .unwrap_or(false);
        let visible = record.is_visible();

        Some(WindowPresentation {
            id: record.id.clone(),
            program_id: record.program_id.clone(),
            title: record.title.clone(),
            icon: record.icon.clone(),
            rect: drag_offset
                .map(|offset| record.geometry.offset(offset.x, offset.y))
                .unwrap_or(record.geometry),
            z_index: self.z_index(id),
            state: record.state,
            active: record.active,
            inactive_mask: visible && !record.active,
            content_overlay: visible && record.active && self.start_menu_open,
            loading: descriptor.map(|d| d.shows_loading).unwrap_or(false) && !loaded,
            status_bar: descriptor.map(|d| d.status_bar).unwrap_or(true),
            status_text: record.status_text.clone(),
            status_items: descriptor
                .map(|d| d.status_items.clone())
                .unwrap_or_default(),
            can_minimize: descriptor.map(|d| d.can_minimize).unwrap_or(true),
            can_maximize: descriptor.map(|d| d.can_maximize).unwrap_or(true),
            dragging: drag_offset.is_some(),
        })
    }

    /// Render projections of every open window, in id order.
    pub fn presentations(&self) -> Vec<WindowPresentation> {
        self.windows
            .keys()
            .filter_map(|id| self.presentation(id))
            .collect()
    }

    /// Opens `program`, or focuses/restores its existing window.
    ///
    /// # Errors
    ///
    /// Returns [`WindowManagerError::UnknownProgram`] when the registry has no such program; no
    /// window is created in that case.
    pub fn open(&mut self, program: &ProgramId) -> Result<Transition, WindowManagerError> {
        let id = WindowId::for_program(program);
        if let Some(record) = self.windows.get(&id) {
            return Ok(match record.state {
                WindowState::Minimized => self.restore(&id),
                WindowState::Normal | WindowState::Maximized => self.focus(&id),
            });
        }

        let registry = Rc::clone(&self.registry);
        let descriptor = registry
            .get(program)
            .ok_or_else(|| WindowManagerError::UnknownProgram(program.clone()))?;

        let geometry = self.initial_geometry(descriptor);
        let content = self.frames.acquire(descriptor, &id);
        let record = WindowRecord {
            id: id.clone(),
            program_id: descriptor.id.clone(),
            title: descriptor.title.clone(),
            icon: descriptor.icon.clone(),
            geometry,
            saved_geometry: None,
            state: WindowState::Normal,
            restore_maximized: false,
            active: false,
            content,
            status_text: descriptor.opening_status(),
        };
        self.windows.insert(id.clone(), record);
        self.stack.bring_to_front(&id);

        let mut events = vec![ShellEvent::WindowCreated {
            window: id.clone(),
            program: descriptor.id.clone(),
            title: descriptor.title.clone(),
            icon: descriptor.icon.clone(),
        }];
        events.extend(self.focus(&id));
        Ok(events)
    }

    /// Makes `id` the active, topmost window. No-op when already active, minimized, or stale.
    pub fn focus(&mut self, id: &WindowId) -> Transition {
        match self.windows.get(id) {
            Some(record) if record.state != WindowState::Minimized && !record.active => {}
            _ => return Vec::new(),
        }
        for record in self.windows.values_mut() {
            record.active = &record.id == id;
        }
        self.stack.bring_to_front(id);
        vec![ShellEvent::WindowFocused { window: id.clone() }]
    }

    /// Minimizes a visible window and hands focus to the next topmost window.
    pub fn minimize(&mut self, id: &WindowId) -> Transition {
        let can_minimize = self.descriptor_of(id).map(|d| d.can_minimize);
        let Some(record) = self.windows.get_mut(id) else {
            return Vec::new();
        };
        if record.state == WindowState::Minimized || can_minimize == Some(false) {
            return Vec::new();
        }

        record.restore_maximized = record.state == WindowState::Maximized;
        record.state = WindowState::Minimized;
        let was_active = std::mem::replace(&mut record.active, false);
        self.stack.remove(id);
        self.drop_drag_for(id);

        let mut events = vec![ShellEvent::WindowMinimized { window: id.clone() }];
        if was_active {
            events.extend(self.focus_topmost());
        }
        events
    }

    /// Shows a minimized window again, in the state it was minimized from, and focuses it.
    pub fn restore(&mut self, id: &WindowId) -> Transition {
        let maximized = placement::maximized_rect(self.viewport, &self.config);
        let Some(record) = self.windows.get_mut(id) else {
            return Vec::new();
        };
        if record.state != WindowState::Minimized {
            return Vec::new();
        }

        if record.restore_maximized {
            record.state = WindowState::Maximized;
            record.geometry = maximized;
        } else {
            record.state = WindowState::Normal;
        }
        record.restore_maximized = false;
        self.stack.bring_to_front(id);

        let mut events = vec![ShellEvent::WindowRestored { window: id.clone() }];
        events.extend(self.focus(id));
        events
    }

    /// Flips between Normal and Maximized, notifying the hosted content.
    pub fn toggle_maximize(&mut self, id: &WindowId) -> Transition {
        let can_maximize = self.descriptor_of(id).map(|d| d.can_maximize);
        let maximized = placement::maximized_rect(self.viewport, &self.config);
        let Some(record) = self.windows.get_mut(id) else {
            return Vec::new();
        };
        if can_maximize == Some(false) {
            return Vec::new();
        }

        let program = record.program_id.clone();
        let (event, message) = match record.state {
            WindowState::Normal => {
                record.saved_geometry = Some(record.geometry);
                record.geometry = maximized;
                record.state = WindowState::Maximized;
                (
                    ShellEvent::WindowMaximized { window: id.clone() },
                    ShellMessage::WindowMaximized,
                )
            }
            WindowState::Maximized => {
                if let Some(saved) = record.saved_geometry.take() {
                    record.geometry = saved;
                }
                record.state = WindowState::Normal;
                (
                    ShellEvent::WindowUnmaximized { window: id.clone() },
                    ShellMessage::WindowUnmaximized,
                )
            }
            WindowState::Minimized => return Vec::new(),
        };
        self.drop_drag_for(id);

        vec![
            event,
            ShellEvent::FramePostRequested { program, message },
        ]
    }

    /// Destroys a window from any state and returns its frame to the pool.
    pub fn close(&mut self, id: &WindowId) -> Transition {
        let Some(record) = self.windows.remove(id) else {
            return Vec::new();
        };
        self.stack.remove(id);
        self.frames.release(&record.content);
        self.status.forget(id);
        self.drop_drag_for(id);

        let mut events = vec![ShellEvent::WindowClosed {
            window: id.clone(),
            program: record.program_id,
        }];
        if record.active {
            events.extend(self.focus_topmost());
        }
        events
    }

    /// Interprets a taskbar click: restore when minimized, minimize when active, else focus.
    pub fn handle_taskbar_click(&mut self, id: &WindowId) -> Transition {
        let Some(record) = self.windows.get(id) else {
            return Vec::new();
        };
        match (record.state, record.active) {
            (WindowState::Minimized, _) => self.restore(id),
            (_, true) => self.minimize(id),
            (_, false) => self.focus(id),
        }
    }

    /// Handles a click on a window's content overlay.
    ///
    /// While the start menu is open the click only asks the menu to close; otherwise it focuses
    /// the window.
    pub fn click_content_overlay(&mut self, id: &WindowId) -> Transition {
        if self.start_menu_open {
            return vec![ShellEvent::StartMenuCloseRequested];
        }
        self.focus(id)
    }

    /// Records whether the start menu is open.
    pub fn set_start_menu_open(&mut self, open: bool) {
        self.start_menu_open = open;
    }

    /// Applies a message sent by the content frame of `program` at `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`WindowManagerError::UnknownProgram`] when an `open-app` request names a program
    /// that does not exist.
    pub fn handle_frame_message(
        &mut self,
        program: &ProgramId,
        message: FrameMessage,
        now_ms: u64,
    ) -> Result<Transition, WindowManagerError> {
        let id = WindowId::for_program(program);
        match message {
            FrameMessage::ContentReady => {
                if self.frames.mark_loaded(program) {
                    Ok(vec![ShellEvent::ContentReady {
                        program: program.clone(),
                    }])
                } else {
                    Ok(Vec::new())
                }
            }
            FrameMessage::OpenApp { app } => self.open(&app),
            FrameMessage::MinimizeWindow => Ok(self.minimize(&id)),
            FrameMessage::CloseWindow => Ok(self.close(&id)),
            FrameMessage::UpdateStatusBar { text } => Ok(self.offer_status(&id, text, now_ms)),
            FrameMessage::Unrecognized => Ok(Vec::new()),
        }
    }

    /// Applies throttled status updates that are due at `now_ms`.
    pub fn flush_status(&mut self, now_ms: u64) -> Transition {
        self.status
            .take_due(now_ms)
            .into_iter()
            .filter_map(|(id, text)| self.apply_status(&id, text))
            .collect()
    }

    /// Starts a title-bar drag. Focuses the window; maximized windows focus but do not move.
    pub fn begin_drag(&mut self, id: &WindowId, pointer: Point) -> Transition {
        let events = self.focus(id);
        if self
            .windows
            .get(id)
            .is_some_and(|record| record.state == WindowState::Normal)
        {
            self.drag = Some((
                id.clone(),
                DragSession {
                    pointer_start: pointer,
                    offset: Point::default(),
                },
            ));
        }
        events
    }

    /// Moves the in-flight drag. Returns `false` when no drag is active.
    pub fn update_drag(&mut self, pointer: Point) -> bool {
        match self.drag.as_mut() {
            Some((_, session)) => {
                session.offset = Point::new(
                    pointer.x - session.pointer_start.x,
                    pointer.y - session.pointer_start.y,
                );
                true
            }
            None => false,
        }
    }

    /// Ends the drag at `pointer`, committing the clamped position.
    pub fn end_drag(&mut self, pointer: Point) -> Transition {
        if !self.update_drag(pointer) {
            return Vec::new();
        }
        let Some((id, session)) = self.drag.take() else {
            return Vec::new();
        };
        let (viewport, config) = (self.viewport, self.config);
        let Some(record) = self.windows.get_mut(&id) else {
            return Vec::new();
        };
        if record.state != WindowState::Normal {
            return Vec::new();
        }

        let moved = record.geometry.offset(session.offset.x, session.offset.y);
        let origin = placement::clamp_drag_position(moved, viewport, &config);
        let committed = record.geometry.at(origin);
        if committed == record.geometry {
            return Vec::new();
        }
        record.geometry = committed;
        vec![ShellEvent::WindowMoved {
            window: id,
            rect: committed,
        }]
    }

    /// Abandons the drag without committing. Returns whether a drag was active.
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Adopts a new viewport, re-clamping normal windows and re-fitting maximized ones.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Transition {
        self.viewport = viewport;
        let maximized = placement::maximized_rect(viewport, &self.config);
        let config = self.config;

        let mut events = Vec::new();
        for record in self.windows.values_mut() {
            let next = match record.state {
                WindowState::Maximized => maximized,
                WindowState::Minimized if record.restore_maximized => continue,
                WindowState::Normal | WindowState::Minimized => record
                    .geometry
                    .at(placement::constrain_to_viewport(record.geometry, viewport, &config)),
            };
            if next != record.geometry {
                record.geometry = next;
                events.push(ShellEvent::WindowMoved {
                    window: record.id.clone(),
                    rect: next,
                });
            }
        }
        events
    }

    fn descriptor_of(&self, id: &WindowId) -> Option<&ProgramDescriptor> {
        let record = self.windows.get(id)?;
        self.registry.get(&record.program_id)
    }

    fn focus_topmost(&mut self) -> Transition {
        match self.stack.top().cloned() {
            Some(top) => self.focus(&top),
            None => Vec::new(),
        }
    }

    fn drop_drag_for(&mut self, id: &WindowId) {
        if self.drag.as_ref().is_some_and(|(dragged, _)| dragged == id) {
            self.drag = None;
        }
    }

    fn offer_status(&mut self, id: &WindowId, text: String, now_ms: u64) -> Transition {
        let accepts = self
            .descriptor_of(id)
            .is_some_and(|d| d.status_bar && d.dynamic_status);
        if !accepts {
            return Vec::new();
        }
        match self.status.offer(id, text.clone(), now_ms) {
            StatusDecision::Apply => self.apply_status(id, text).into_iter().collect(),
            StatusDecision::Deferred { .. } => Vec::new(),
        }
    }

    fn apply_status(&mut self, id: &WindowId, text: String) -> Option<ShellEvent> {
        let record = self.windows.get_mut(id)?;
        if record.status_text == text {
            return None;
        }
        record.status_text = text.clone();
        Some(ShellEvent::WindowStatusChanged {
            window: id.clone(),
            text,
        })
    }

    fn initial_geometry(&mut self, descriptor: &ProgramDescriptor) -> WindowRect {
        let (width, height) = (descriptor.width, descriptor.height);
        let origin = match &descriptor.placement {
            Placement::Cascade => self.cascade.place(height, self.viewport, &self.config),
            Placement::Anchored {
                anchor,
                offset_x,
                offset_y,
            } => {
                let reference = match anchor {
                    Anchor::LeftOf { target, .. } => self.reference_box(target, 0),
                    _ => None,
                };
                placement::resolve_anchor(
                    anchor,
                    Point::new(*offset_x, *offset_y),
                    (width, height),
                    reference,
                    self.viewport,
                    &self.config,
                )
            }
        };
        WindowRect::new(origin.x, origin.y, width, height)
    }

    /// Box a `LeftOf` placement lines up with: the target's live window when it is showing at
    /// its own size, otherwise where the target's own anchor would put it.
    fn reference_box(&self, target: &ProgramId, depth: u8) -> Option<WindowRect> {
        if let Some(record) = self.window_for_program(target) {
            if record.state == WindowState::Normal {
                return Some(record.geometry);
            }
        }
        if depth >= MAX_ANCHOR_CHAIN {
            return None;
        }
        let descriptor = self.registry.get(target)?;
        let Placement::Anchored {
            anchor,
            offset_x,
            offset_y,
        } = &descriptor.placement
        else {
            return None;
        };
        let reference = match anchor {
            Anchor::LeftOf { target: next, .. } => self.reference_box(next, depth + 1),
            _ => None,
        };
        let origin = placement::resolve_anchor(
            anchor,
            Point::new(*offset_x, *offset_y),
            (descriptor.width, descriptor.height),
            reference,
            self.viewport,
            &self.config,
        );
        Some(WindowRect::new(
            origin.x,
            origin.y,
            descriptor.width,
            descriptor.height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::programs::VerticalAlign;

    fn pid(raw: &str) -> ProgramId {
        ProgramId::trusted(raw)
    }

    fn wid(program: &str) -> WindowId {
        WindowId::for_program(&pid(program))
    }

    fn registry() -> Rc<ProgramRegistry> {
        Rc::new(
            ProgramRegistry::from_descriptors(
                vec![
                    ProgramDescriptor::new(pid("notepad"), "Notepad")
                        .with_dynamic_status("Ln 1, Col 1"),
                    ProgramDescriptor::new(pid("about-me"), "About Me")
                        .with_size(800, 600)
                        .with_placement(Placement::Anchored {
                            anchor: Anchor::Center,
                            offset_x: 0,
                            offset_y: 0,
                        }),
                    ProgramDescriptor::new(pid("resume-pdf"), "Resume.pdf")
                        .with_size(300, 400)
                        .with_placement(Placement::Anchored {
                            anchor: Anchor::LeftOf {
                                target: pid("about-me"),
                                align: VerticalAlign::Bottom,
                            },
                            offset_x: 10,
                            offset_y: 0,
                        }),
                    ProgramDescriptor::new(pid("sys-info"), "System Information")
                        .with_capabilities(false, false),
                    ProgramDescriptor::new(pid("media-player"), "Media Player").persisting(),
                ],
                Vec::new(),
            )
            .expect("registry"),
        )
    }

    fn manager() -> WindowManager {
        WindowManager::new(
            ShellConfig::default(),
            registry(),
            Viewport::new(1600, 1000),
        )
    }

    fn open(wm: &mut WindowManager, program: &str) -> Transition {
        wm.open(&pid(program)).expect("open")
    }

    fn assert_consistent(wm: &WindowManager) {
        for record in wm.windows() {
            let stacked = wm.stack().ids().iter().filter(|id| **id == record.id).count();
            match record.state {
                WindowState::Minimized => assert_eq!(stacked, 0, "{} stacked", record.id),
                _ => assert_eq!(stacked, 1, "{} not stacked once", record.id),
            }
        }
        assert_eq!(wm.stack().len(), wm.windows().filter(|r| r.is_visible()).count());
        let active: Vec<&WindowId> = wm.windows().filter(|r| r.active).map(|r| &r.id).collect();
        assert!(active.len() <= 1);
        assert_eq!(active.first().copied(), wm.stack().top());
    }

    #[test]
    fn open_creates_then_focuses() {
        let mut wm = manager();
        let events = open(&mut wm, "notepad");

        assert_eq!(
            events,
            vec![
                ShellEvent::WindowCreated {
                    window: wid("notepad"),
                    program: pid("notepad"),
                    title: "Notepad".to_string(),
                    icon: String::new(),
                },
                ShellEvent::WindowFocused {
                    window: wid("notepad")
                },
            ]
        );
        let record = wm.window(&wid("notepad")).expect("record");
        assert_eq!(record.state, WindowState::Normal);
        assert_eq!(record.status_text, "Ln 1, Col 1");
        assert_eq!(wm.stack().ids(), &[wid("notepad")]);
        assert_consistent(&wm);
    }

    #[test]
    fn open_unknown_program_creates_nothing() {
        let mut wm = manager();
        assert_eq!(
            wm.open(&pid("solitaire")),
            Err(WindowManagerError::UnknownProgram(pid("solitaire")))
        );
        assert_eq!(wm.windows().count(), 0);
    }

    #[test]
    fn reopening_focuses_or_restores_instead_of_duplicating() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        open(&mut wm, "about-me");

        let events = open(&mut wm, "notepad");
        assert_eq!(
            events,
            vec![ShellEvent::WindowFocused {
                window: wid("notepad")
            }]
        );
        assert_eq!(wm.windows().count(), 2);

        wm.minimize(&wid("notepad"));
        let events = open(&mut wm, "notepad");
        assert_eq!(
            events,
            vec![
                ShellEvent::WindowRestored {
                    window: wid("notepad")
                },
                ShellEvent::WindowFocused {
                    window: wid("notepad")
                },
            ]
        );
        assert_eq!(wm.stack().ids(), &[wid("notepad"), wid("about-me")]);
        assert_consistent(&wm);
    }

    #[test]
    fn z_indices_follow_stack_order_below_taskbar() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        open(&mut wm, "about-me");
        open(&mut wm, "media-player");

        assert_eq!(wm.z_index(&wid("media-player")), Some(102));
        assert_eq!(wm.z_index(&wid("about-me")), Some(101));
        assert_eq!(wm.z_index(&wid("notepad")), Some(100));

        let config = ShellConfig {
            base_z: 498,
            ..ShellConfig::default()
        };
        let mut capped = WindowManager::new(config, registry(), Viewport::new(1600, 1000));
        open(&mut capped, "notepad");
        open(&mut capped, "about-me");
        open(&mut capped, "media-player");
        assert_eq!(capped.z_index(&wid("media-player")), Some(499));
    }

    #[test]
    fn focus_is_a_no_op_for_active_minimized_or_stale_windows() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        assert_eq!(wm.focus(&wid("notepad")), Vec::new());
        assert_eq!(wm.focus(&wid("ghost")), Vec::new());

        open(&mut wm, "about-me");
        wm.minimize(&wid("notepad"));
        assert_eq!(wm.focus(&wid("notepad")), Vec::new());
        assert_consistent(&wm);
    }

    #[test]
    fn minimizing_the_active_window_focuses_the_next_one() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        open(&mut wm, "about-me");

        let events = wm.minimize(&wid("about-me"));
        assert_eq!(
            events,
            vec![
                ShellEvent::WindowMinimized {
                    window: wid("about-me")
                },
                ShellEvent::WindowFocused {
                    window: wid("notepad")
                },
            ]
        );
        assert_eq!(wm.active_window(), Some(&wid("notepad")));

        wm.minimize(&wid("notepad"));
        assert_eq!(wm.active_window(), None);
        assert!(wm.stack().is_empty());
        assert_consistent(&wm);
    }

    #[test]
    fn windows_without_minimize_capability_stay_visible() {
        let mut wm = manager();
        open(&mut wm, "sys-info");
        assert_eq!(wm.minimize(&wid("sys-info")), Vec::new());
        assert_eq!(wm.toggle_maximize(&wid("sys-info")), Vec::new());
        assert_eq!(wm.handle_taskbar_click(&wid("sys-info")), Vec::new());
    }

    #[test]
    fn maximize_round_trip_restores_exact_geometry() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        let before = wm.window(&wid("notepad")).expect("record").geometry;

        let events = wm.toggle_maximize(&wid("notepad"));
        assert_eq!(
            events,
            vec![
                ShellEvent::WindowMaximized {
                    window: wid("notepad")
                },
                ShellEvent::FramePostRequested {
                    program: pid("notepad"),
                    message: ShellMessage::WindowMaximized,
                },
            ]
        );
        let record = wm.window(&wid("notepad")).expect("record");
        assert_eq!(record.geometry, WindowRect::new(0, 0, 1600, 970));
        assert_eq!(record.saved_geometry, Some(before));

        wm.toggle_maximize(&wid("notepad"));
        let record = wm.window(&wid("notepad")).expect("record");
        assert_eq!(record.geometry, before);
        assert_eq!(record.state, WindowState::Normal);
        assert_eq!(record.saved_geometry, None);
    }

    #[test]
    fn restore_returns_to_maximized_when_minimized_from_there() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        let before = wm.window(&wid("notepad")).expect("record").geometry;
        wm.toggle_maximize(&wid("notepad"));
        wm.minimize(&wid("notepad"));
        wm.restore(&wid("notepad"));

        let record = wm.window(&wid("notepad")).expect("record");
        assert_eq!(record.state, WindowState::Maximized);
        assert!(record.active);

        wm.toggle_maximize(&wid("notepad"));
        assert_eq!(wm.window(&wid("notepad")).expect("record").geometry, before);
        assert_consistent(&wm);
    }

    #[test]
    fn closing_releases_the_frame_and_refocuses() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        open(&mut wm, "media-player");

        let events = wm.close(&wid("media-player"));
        assert_eq!(
            events,
            vec![
                ShellEvent::WindowClosed {
                    window: wid("media-player"),
                    program: pid("media-player"),
                },
                ShellEvent::WindowFocused {
                    window: wid("notepad")
                },
            ]
        );
        assert!(wm.frames().is_parked(&pid("media-player")));
        assert_eq!(wm.close(&wid("media-player")), Vec::new());
        assert_consistent(&wm);
    }

    #[test]
    fn closing_a_background_window_keeps_focus() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        open(&mut wm, "about-me");
        let events = wm.close(&wid("notepad"));
        assert_eq!(events.len(), 1);
        assert_eq!(wm.active_window(), Some(&wid("about-me")));
        assert_eq!(wm.stack().ids(), &[wid("about-me")]);
    }

    #[test]
    fn taskbar_click_toggles_between_states() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        open(&mut wm, "about-me");

        wm.handle_taskbar_click(&wid("notepad"));
        assert_eq!(wm.active_window(), Some(&wid("notepad")));

        wm.handle_taskbar_click(&wid("notepad"));
        assert_eq!(
            wm.window(&wid("notepad")).expect("record").state,
            WindowState::Minimized
        );
        assert_eq!(wm.active_window(), Some(&wid("about-me")));

        wm.handle_taskbar_click(&wid("notepad"));
        assert_eq!(wm.active_window(), Some(&wid("notepad")));
        assert_eq!(wm.handle_taskbar_click(&wid("ghost")), Vec::new());
        assert_consistent(&wm);
    }

    #[test]
    fn cascade_windows_get_successive_offsets() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        open(&mut wm, "media-player");
        let first = wm.window(&wid("notepad")).expect("notepad").geometry;
        let second = wm.window(&wid("media-player")).expect("media").geometry;
        assert_eq!((first.x, first.y), (120, 50));
        assert_eq!((second.x, second.y), (155, 85));
    }

    #[test]
    fn left_of_placement_uses_the_open_reference_window() {
        let mut wm = manager();
        open(&mut wm, "about-me");
        let about = wm.window(&wid("about-me")).expect("about").geometry;
        assert_eq!(about, WindowRect::new(400, 185, 800, 600));

        open(&mut wm, "resume-pdf");
        let resume = wm.window(&wid("resume-pdf")).expect("resume").geometry;
        assert_eq!(resume, WindowRect::new(90, 385, 300, 400));
    }

    #[test]
    fn start_menu_overlay_covers_only_the_active_window() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        open(&mut wm, "about-me");
        wm.set_start_menu_open(true);

        let about = wm.presentation(&wid("about-me")).expect("about");
        let notepad = wm.presentation(&wid("notepad")).expect("notepad");
        assert!(about.content_overlay && !about.inactive_mask);
        assert!(!notepad.content_overlay && notepad.inactive_mask);

        assert_eq!(
            wm.click_content_overlay(&wid("notepad")),
            vec![ShellEvent::StartMenuCloseRequested]
        );
        wm.set_start_menu_open(false);
        assert_eq!(
            wm.click_content_overlay(&wid("notepad")),
            vec![ShellEvent::WindowFocused {
                window: wid("notepad")
            }]
        );
    }

    #[test]
    fn drag_translates_visually_then_commits_clamped() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        let start = wm.window(&wid("notepad")).expect("record").geometry;

        wm.begin_drag(&wid("notepad"), Point::new(200, 60));
        assert!(wm.update_drag(Point::new(250, 90)));
        let shown = wm.presentation(&wid("notepad")).expect("presentation");
        assert_eq!(shown.rect, start.offset(50, 30));
        assert!(shown.dragging);
        assert_eq!(wm.window(&wid("notepad")).expect("record").geometry, start);

        let events = wm.end_drag(Point::new(200, -500));
        let committed = wm.window(&wid("notepad")).expect("record").geometry;
        assert_eq!(committed, WindowRect::new(120, 0, start.w, start.h));
        assert_eq!(
            events,
            vec![ShellEvent::WindowMoved {
                window: wid("notepad"),
                rect: committed
            }]
        );
    }

    #[test]
    fn cancelled_and_maximized_drags_commit_nothing() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        let start = wm.window(&wid("notepad")).expect("record").geometry;

        wm.begin_drag(&wid("notepad"), Point::new(0, 0));
        wm.update_drag(Point::new(300, 300));
        assert!(wm.cancel_drag());
        assert_eq!(wm.end_drag(Point::new(300, 300)), Vec::new());
        assert_eq!(wm.window(&wid("notepad")).expect("record").geometry, start);

        wm.toggle_maximize(&wid("notepad"));
        wm.begin_drag(&wid("notepad"), Point::new(0, 0));
        assert!(!wm.update_drag(Point::new(10, 10)));
    }

    #[test]
    fn viewport_shrink_reclamps_normal_and_refits_maximized() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        open(&mut wm, "about-me");
        wm.toggle_maximize(&wid("notepad"));

        let events = wm.set_viewport(Viewport::new(300, 200));
        assert_eq!(events.len(), 2);
        let about = wm.window(&wid("about-me")).expect("about").geometry;
        assert_eq!((about.x, about.y), (250, 150));
        assert_eq!(
            wm.window(&wid("notepad")).expect("notepad").geometry,
            WindowRect::new(0, 0, 300, 170)
        );
    }

    #[test]
    fn frame_messages_drive_the_hosting_window() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        open(&mut wm, "about-me");

        let events = wm
            .handle_frame_message(
                &pid("notepad"),
                FrameMessage::UpdateStatusBar {
                    text: "Ln 4, Col 2".into(),
                },
                1_000,
            )
            .expect("status");
        assert_eq!(
            events,
            vec![ShellEvent::WindowStatusChanged {
                window: wid("notepad"),
                text: "Ln 4, Col 2".into()
            }]
        );

        let static_status = wm
            .handle_frame_message(
                &pid("about-me"),
                FrameMessage::UpdateStatusBar { text: "hi".into() },
                1_000,
            )
            .expect("static");
        assert_eq!(static_status, Vec::new());

        wm.handle_frame_message(&pid("about-me"), FrameMessage::MinimizeWindow, 1_000)
            .expect("minimize");
        assert_eq!(
            wm.window(&wid("about-me")).expect("about").state,
            WindowState::Minimized
        );

        wm.handle_frame_message(&pid("notepad"), FrameMessage::CloseWindow, 1_000)
            .expect("close");
        assert!(wm.window(&wid("notepad")).is_none());

        assert_eq!(
            wm.handle_frame_message(&pid("notepad"), FrameMessage::Unrecognized, 1_000),
            Ok(Vec::new())
        );
        assert_eq!(
            wm.handle_frame_message(
                &pid("notepad"),
                FrameMessage::OpenApp {
                    app: pid("solitaire")
                },
                1_000
            ),
            Err(WindowManagerError::UnknownProgram(pid("solitaire")))
        );
    }

    #[test]
    fn status_updates_are_throttled_and_flushed() {
        let mut wm = manager();
        open(&mut wm, "notepad");
        let status = |text: &str| FrameMessage::UpdateStatusBar { text: text.into() };

        wm.handle_frame_message(&pid("notepad"), status("a"), 10_000)
            .expect("a");
        let held = wm
            .handle_frame_message(&pid("notepad"), status("b"), 10_400)
            .expect("b");
        assert_eq!(held, Vec::new());
        assert_eq!(wm.next_status_due_ms(), Some(11_000));
        assert_eq!(wm.window(&wid("notepad")).expect("record").status_text, "a");

        assert_eq!(
            wm.flush_status(11_000),
            vec![ShellEvent::WindowStatusChanged {
                window: wid("notepad"),
                text: "b".into()
            }]
        );
    }

    #[test]
    fn content_ready_clears_the_loading_placeholder() {
        let registry = Rc::new(
            ProgramRegistry::from_descriptors(
                vec![{
                    let mut media = ProgramDescriptor::new(pid("media-player"), "Media Player");
                    media.shows_loading = true;
                    media
                }],
                Vec::new(),
            )
            .expect("registry"),
        );
        let mut wm = WindowManager::new(ShellConfig::default(), registry, Viewport::default());
        open(&mut wm, "media-player");
        assert!(wm.presentation(&wid("media-player")).expect("p").loading);

        let events = wm
            .handle_frame_message(&pid("media-player"), FrameMessage::ContentReady, 0)
            .expect("ready");
        assert_eq!(
            events,
            vec![ShellEvent::ContentReady {
                program: pid("media-player")
            }]
        );
        assert!(!wm.presentation(&wid("media-player")).expect("p").loading);
    }
}
