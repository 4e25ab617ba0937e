//! Shell runtime: owns every controller and routes events between them.
//!
//! Input surfaces call [`DesktopRuntime::dispatch`]. Controllers answer with events that travel
//! over the [`EventBus`]; each controller borrow is released before its events are published, so
//! any handler may start another transition.

use std::{
    cell::{Ref, RefCell},
    collections::BTreeSet,
    rc::Rc,
};

use desktop_shell_contract::{FrameMessage, ProgramId};
use platform_host::{Clock, SessionStore};
use serde_json::Value;

use crate::{
    config::ShellConfig,
    desktop_icons::DesktopIconManager,
    event_bus::EventBus,
    events::{ShellEvent, Topic},
    frame_pool::frame_dom_id,
    model::{Point, Viewport, WindowId, WindowState},
    programs::ProgramRegistry,
    session::{SessionController, SessionPhase},
    snapshot::{content_rect, DesktopSnapshot, FrameView, IconView},
    start_menu::StartMenuController,
    taskbar::{available_button_width, compute_taskbar_layout, TaskbarController},
    wallpaper::wallpaper_for,
    window_manager::WindowManager,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// User and host input fed into the runtime.
pub enum ShellInput {
    /// Open or focus a program.
    OpenProgram(ProgramId),
    /// Pointer down inside a window.
    FocusWindow(WindowId),
    /// Minimize button.
    MinimizeWindow(WindowId),
    /// Maximize button or title-bar double click.
    ToggleMaximize(WindowId),
    /// Close button.
    CloseWindow(WindowId),
    /// Click on the overlay covering a window's content.
    ContentOverlayClicked(WindowId),
    /// Pointer down on a title bar.
    BeginDrag {
        /// Dragged window.
        window: WindowId,
        /// Pointer position.
        pointer: Point,
    },
    /// Pointer moved during a title-bar drag.
    DragMoved(Point),
    /// Pointer released during a title-bar drag.
    EndDrag(Point),
    /// Pointer cancelled or page lost focus during a title-bar drag.
    CancelDrag,
    /// Taskbar window button.
    TaskbarItemClicked(WindowId),
    /// Start button.
    StartButtonClicked,
    /// Tray media shortcut.
    TrayMediaClicked,
    /// Start menu row at this index.
    StartMenuItemActivated(usize),
    /// Pointer down outside the start menu and start button.
    OutsideStartMenuPressed,
    /// Key pressed anywhere in the document.
    KeyPressed(String),
    /// Single click on a desktop icon.
    IconClicked {
        /// Icon program.
        program: ProgramId,
        /// Ctrl held.
        ctrl: bool,
    },
    /// Double click on a desktop icon.
    IconDoubleClicked(ProgramId),
    /// Pointer down on empty desktop.
    DesktopPointerDown {
        /// Pointer position.
        point: Point,
        /// Ctrl held.
        ctrl: bool,
    },
    /// Pointer moved after pressing on empty desktop.
    DesktopPointerMoved(Point),
    /// Pointer released after pressing on empty desktop.
    DesktopPointerUp,
    /// Click on empty desktop.
    DesktopClicked,
    /// Browser viewport changed size.
    ViewportResized(Viewport),
    /// Timer for throttled status updates fired.
    FlushStatus,
    /// Boot animation finished.
    BootFinished,
    /// Login screen accepted the user.
    LogIn,
}

struct RuntimeInner {
    bus: EventBus<ShellEvent>,
    windows: RefCell<WindowManager>,
    taskbar: RefCell<TaskbarController>,
    start_menu: RefCell<StartMenuController>,
    icons: RefCell<DesktopIconManager>,
    session: RefCell<SessionController>,
    closing: RefCell<BTreeSet<WindowId>>,
    clock: Rc<dyn Clock>,
    store: Rc<dyn SessionStore>,
}

#[derive(Clone)]
/// Shared handle to the desktop shell. Clones refer to the same shell.
pub struct DesktopRuntime {
    inner: Rc<RuntimeInner>,
}

impl DesktopRuntime {
    /// Builds a shell and subscribes every controller to the bus.
    pub fn new(
        config: ShellConfig,
        registry: ProgramRegistry,
        viewport: Viewport,
        clock: Rc<dyn Clock>,
        store: Rc<dyn SessionStore>,
    ) -> Self {
        let registry = Rc::new(registry);
        let desktop_height = viewport.desktop_height(config.taskbar_height);
        let inner = Rc::new(RuntimeInner {
            bus: EventBus::new(),
            start_menu: RefCell::new(StartMenuController::new(&registry)),
            icons: RefCell::new(DesktopIconManager::new(
                &registry,
                config.icon_grid,
                config.icon_click_debounce_ms,
                desktop_height,
            )),
            windows: RefCell::new(WindowManager::new(config, registry, viewport)),
            taskbar: RefCell::new(TaskbarController::new()),
            session: RefCell::new(SessionController::resume(store.as_ref())),
            closing: RefCell::new(BTreeSet::new()),
            clock,
            store,
        });
        let runtime = Self { inner };
        runtime.wire();
        runtime
    }

    /// Event bus shared by every controller.
    pub fn bus(&self) -> &EventBus<ShellEvent> {
        &self.inner.bus
    }

    /// Borrows the window manager.
    ///
    /// Do not hold the borrow across [`Self::dispatch`].
    pub fn windows(&self) -> Ref<'_, WindowManager> {
        self.inner.windows.borrow()
    }

    /// Borrows the taskbar.
    pub fn taskbar(&self) -> Ref<'_, TaskbarController> {
        self.inner.taskbar.borrow()
    }

    /// Borrows the start menu.
    pub fn start_menu(&self) -> Ref<'_, StartMenuController> {
        self.inner.start_menu.borrow()
    }

    /// Borrows the desktop icons.
    pub fn icons(&self) -> Ref<'_, DesktopIconManager> {
        self.inner.icons.borrow()
    }

    /// Current boot/login phase.
    pub fn phase(&self) -> SessionPhase {
        self.inner.session.borrow().phase()
    }

    /// Publishes one event.
    pub fn publish(&self, event: ShellEvent) {
        self.inner.bus.publish(event);
    }

    fn publish_all(&self, events: Vec<ShellEvent>) {
        for event in events {
            if self.is_superseded(&event) {
                continue;
            }
            self.inner.bus.publish(event);
        }
    }

    /// A nested handler may have moved focus while a transition was being published.
    fn is_superseded(&self, event: &ShellEvent) -> bool {
        match event {
            ShellEvent::WindowFocused { window } => {
                self.inner.windows.borrow().active_window() != Some(window)
            }
            _ => false,
        }
    }

    fn now_ms(&self) -> u64 {
        self.inner.clock.now_ms()
    }

    fn on(&self, topic: Topic, handler: impl Fn(&DesktopRuntime, &ShellEvent) + 'static) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.bus.subscribe(topic, move |event| {
            if let Some(inner) = weak.upgrade() {
                handler(&DesktopRuntime { inner }, event);
            }
        });
    }

    fn wire(&self) {
        self.on(Topic::ProgramOpen, |runtime, event| {
            if let ShellEvent::ProgramOpenRequested { program } = event {
                runtime.open_program(program);
            }
        });
        self.on(Topic::TaskbarItemClicked, |runtime, event| {
            if let ShellEvent::TaskbarItemClicked { window } = event {
                let events = runtime.inner.windows.borrow_mut().handle_taskbar_click(window);
                runtime.publish_all(events);
            }
        });
        self.on(Topic::StartMenuToggle, |runtime, _| {
            let events = runtime.inner.start_menu.borrow_mut().toggle();
            runtime.publish_all(events);
        });
        self.on(Topic::StartMenuCloseRequest, |runtime, _| {
            let events = runtime.inner.start_menu.borrow_mut().close();
            runtime.publish_all(events);
        });
        for (topic, open) in [
            (Topic::StartMenuOpened, true),
            (Topic::StartMenuClosed, false),
        ] {
            self.on(topic, move |runtime, event| {
                runtime.inner.windows.borrow_mut().set_start_menu_open(open);
                runtime.inner.taskbar.borrow_mut().apply(event);
            });
        }
        for topic in [Topic::WindowCreated, Topic::WindowFocused] {
            self.on(topic, |runtime, event| {
                runtime.inner.taskbar.borrow_mut().apply(event);
                runtime.inner.icons.borrow_mut().apply(event);
            });
        }
        for topic in [Topic::WindowMinimized, Topic::WindowClosed] {
            self.on(topic, |runtime, event| {
                runtime.inner.taskbar.borrow_mut().apply(event);
            });
        }
        self.on(Topic::LogOffRequested, |runtime, _| {
            let now = runtime.now_ms();
            let store = Rc::clone(&runtime.inner.store);
            if !runtime.inner.session.borrow_mut().log_off(store.as_ref(), now) {
                leptos::logging::log!("log off ignored during login cooldown");
            }
        });
    }

    fn open_program(&self, program: &ProgramId) {
        let result = self.inner.windows.borrow_mut().open(program);
        match result {
            Ok(events) => self.publish_all(events),
            Err(err) => leptos::logging::warn!("desktop open failed: {err}"),
        }
    }

    fn close_window(&self, id: &WindowId) {
        if !self.inner.closing.borrow_mut().insert(id.clone()) {
            return;
        }
        let events = self.inner.windows.borrow_mut().close(id);
        self.publish_all(events);
        self.inner.closing.borrow_mut().remove(id);
    }

    /// Opens the program named by a `?open=` deep link. Returns `false` for malformed ids.
    pub fn open_deep_link(&self, raw: &str) -> bool {
        match ProgramId::new(raw) {
            Ok(program) => {
                self.publish(ShellEvent::ProgramOpenRequested { program });
                true
            }
            Err(err) => {
                leptos::logging::warn!("deep link `{raw}` ignored: {err}");
                false
            }
        }
    }

    /// Applies a message posted by the content frame of `program`.
    pub fn deliver_frame_message(&self, program: &ProgramId, data: &Value) {
        match FrameMessage::from_value(data) {
            FrameMessage::Unrecognized => {}
            FrameMessage::CloseWindow => self.close_window(&WindowId::for_program(program)),
            FrameMessage::OpenApp { app } => {
                self.publish(ShellEvent::ProgramOpenRequested { program: app });
            }
            message => {
                let now = self.now_ms();
                let result = self
                    .inner
                    .windows
                    .borrow_mut()
                    .handle_frame_message(program, message, now);
                match result {
                    Ok(events) => self.publish_all(events),
                    Err(err) => leptos::logging::warn!("frame message from {program} failed: {err}"),
                }
            }
        }
    }

    /// Feeds one input into the shell.
    pub fn dispatch(&self, input: ShellInput) {
        let inner = &self.inner;
        match input {
            ShellInput::OpenProgram(program) => {
                self.publish(ShellEvent::ProgramOpenRequested { program });
            }
            ShellInput::FocusWindow(id) => {
                let events = inner.windows.borrow_mut().focus(&id);
                self.publish_all(events);
            }
            ShellInput::MinimizeWindow(id) => {
                let events = inner.windows.borrow_mut().minimize(&id);
                self.publish_all(events);
            }
            ShellInput::ToggleMaximize(id) => {
                let events = inner.windows.borrow_mut().toggle_maximize(&id);
                self.publish_all(events);
            }
            ShellInput::CloseWindow(id) => self.close_window(&id),
            ShellInput::ContentOverlayClicked(id) => {
                let events = inner.windows.borrow_mut().click_content_overlay(&id);
                self.publish_all(events);
            }
            ShellInput::BeginDrag { window, pointer } => {
                let events = inner.windows.borrow_mut().begin_drag(&window, pointer);
                self.publish_all(events);
            }
            ShellInput::DragMoved(pointer) => {
                inner.windows.borrow_mut().update_drag(pointer);
            }
            ShellInput::EndDrag(pointer) => {
                let events = inner.windows.borrow_mut().end_drag(pointer);
                self.publish_all(events);
            }
            ShellInput::CancelDrag => {
                inner.windows.borrow_mut().cancel_drag();
            }
            ShellInput::TaskbarItemClicked(id) => {
                let event = inner.taskbar.borrow().click(&id);
                self.publish(event);
            }
            ShellInput::StartButtonClicked => {
                let event = inner.taskbar.borrow().click_start();
                self.publish(event);
            }
            ShellInput::TrayMediaClicked => {
                let event = inner.taskbar.borrow().click_tray_media();
                self.publish(event);
            }
            ShellInput::StartMenuItemActivated(index) => {
                let events = inner.start_menu.borrow_mut().activate(index);
                self.publish_all(events);
            }
            ShellInput::OutsideStartMenuPressed => {
                let events = inner.start_menu.borrow_mut().handle_outside_click();
                self.publish_all(events);
            }
            ShellInput::KeyPressed(key) => {
                let events = inner.start_menu.borrow_mut().handle_key(&key);
                self.publish_all(events);
            }
            ShellInput::IconClicked { program, ctrl } => {
                let now = self.now_ms();
                inner.icons.borrow_mut().click_icon(&program, ctrl, now);
            }
            ShellInput::IconDoubleClicked(program) => {
                let event = inner.icons.borrow_mut().double_click_icon(&program);
                if let Some(event) = event {
                    self.publish(event);
                }
            }
            ShellInput::DesktopPointerDown { point, ctrl } => {
                inner.icons.borrow_mut().begin_band(point, ctrl);
            }
            ShellInput::DesktopPointerMoved(point) => {
                inner.icons.borrow_mut().update_band(point);
            }
            ShellInput::DesktopPointerUp => {
                inner.icons.borrow_mut().end_band();
            }
            ShellInput::DesktopClicked => inner.icons.borrow_mut().click_empty_desktop(),
            ShellInput::ViewportResized(viewport) => {
                let (events, taskbar_height) = {
                    let mut windows = inner.windows.borrow_mut();
                    (windows.set_viewport(viewport), windows.config().taskbar_height)
                };
                inner
                    .icons
                    .borrow_mut()
                    .layout(viewport.desktop_height(taskbar_height));
                self.publish_all(events);
            }
            ShellInput::FlushStatus => {
                let now = self.now_ms();
                let events = inner.windows.borrow_mut().flush_status(now);
                self.publish_all(events);
            }
            ShellInput::BootFinished => {
                inner.session.borrow_mut().finish_boot();
            }
            ShellInput::LogIn => {
                let now = self.now_ms();
                inner
                    .session
                    .borrow_mut()
                    .log_in(inner.store.as_ref(), now);
            }
        }
    }

    /// Builds the render projection of the whole shell.
    pub fn snapshot(&self) -> DesktopSnapshot {
        let inner = &self.inner;
        let windows = inner.windows.borrow();
        let taskbar = inner.taskbar.borrow();
        let start_menu = inner.start_menu.borrow();
        let icons = inner.icons.borrow();

        let presentations = windows.presentations();
        let frames = windows
            .frames()
            .slots()
            .map(|slot| {
                let shown = slot
                    .attached_to
                    .as_ref()
                    .and_then(|id| presentations.iter().find(|p| &p.id == id))
                    .filter(|p| p.state != WindowState::Minimized);
                FrameView {
                    program_id: slot.program_id.clone(),
                    dom_id: frame_dom_id(&slot.program_id),
                    source: slot.source.clone(),
                    generation: slot.generation,
                    window: slot.attached_to.clone(),
                    rect: shown.map(|p| content_rect(p.rect, p.status_bar)),
                    z_index: shown.and_then(|p| p.z_index),
                    inactive_mask: shown.is_some_and(|p| p.inactive_mask),
                    content_overlay: shown.is_some_and(|p| p.content_overlay),
                    loading: shown.is_some_and(|p| p.loading),
                }
            })
            .collect();

        let viewport = windows.viewport();
        let widths = windows.config().taskbar_widths;
        let icon_views = icons
            .icons()
            .iter()
            .map(|icon| IconView {
                program_id: icon.program_id.clone(),
                title: icon.title.clone(),
                icon: icon.icon.clone(),
                rect: icon.rect,
                selected: icons.is_selected(&icon.program_id),
                highlighted: icons.is_highlighted(&icon.program_id),
            })
            .collect();

        DesktopSnapshot {
            phase: inner.session.borrow().phase(),
            viewport,
            wallpaper: wallpaper_for(viewport),
            windows: presentations,
            frames,
            taskbar: taskbar.entries().to_vec(),
            taskbar_layout: compute_taskbar_layout(
                available_button_width(viewport.width, &widths),
                taskbar.entries().len(),
                &widths,
            ),
            start_pressed: taskbar.is_start_pressed(),
            start_menu_open: start_menu.is_open(),
            start_menu_items: start_menu.items().to_vec(),
            icons: icon_views,
            selection_rect: icons.selection_rect(),
            next_status_due_ms: windows.next_status_due_ms(),
        }
    }
}
