//! Shell event vocabulary carried by the [`crate::event_bus::EventBus`].
//!
//! Intent events are published by input surfaces (desktop, taskbar, start menu) and interpreted by
//! the window manager. State-changed events are published after a transition has fully completed.

use desktop_shell_contract::{ProgramId, ShellMessage};

use crate::{
    event_bus::BusEvent,
    model::{WindowId, WindowRect},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Routing keys of [`ShellEvent`].
pub enum Topic {
    /// `program:open`
    ProgramOpen,
    /// `taskbar:item:clicked`
    TaskbarItemClicked,
    /// `startmenu:toggle`
    StartMenuToggle,
    /// `startmenu:close-request`
    StartMenuCloseRequest,
    /// `startmenu:opened`
    StartMenuOpened,
    /// `startmenu:closed`
    StartMenuClosed,
    /// `window:created`
    WindowCreated,
    /// `window:focused`
    WindowFocused,
    /// `window:minimized`
    WindowMinimized,
    /// `window:restored`
    WindowRestored,
    /// `window:maximized`
    WindowMaximized,
    /// `window:unmaximized`
    WindowUnmaximized,
    /// `window:closed`
    WindowClosed,
    /// `window:moved`
    WindowMoved,
    /// `window:status`
    WindowStatus,
    /// `window:content-ready`
    ContentReady,
    /// `frame:post-message`
    FramePostMessage,
    /// `url:open`
    UrlOpen,
    /// `logoff:requested`
    LogOffRequested,
}

impl Topic {
    /// Returns the wire-style topic name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProgramOpen => "program:open",
            Self::TaskbarItemClicked => "taskbar:item:clicked",
            Self::StartMenuToggle => "startmenu:toggle",
            Self::StartMenuCloseRequest => "startmenu:close-request",
            Self::StartMenuOpened => "startmenu:opened",
            Self::StartMenuClosed => "startmenu:closed",
            Self::WindowCreated => "window:created",
            Self::WindowFocused => "window:focused",
            Self::WindowMinimized => "window:minimized",
            Self::WindowRestored => "window:restored",
            Self::WindowMaximized => "window:maximized",
            Self::WindowUnmaximized => "window:unmaximized",
            Self::WindowClosed => "window:closed",
            Self::WindowMoved => "window:moved",
            Self::WindowStatus => "window:status",
            Self::ContentReady => "window:content-ready",
            Self::FramePostMessage => "frame:post-message",
            Self::UrlOpen => "url:open",
            Self::LogOffRequested => "logoff:requested",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Every message exchanged between shell components.
pub enum ShellEvent {
    /// Intent: open or focus a program.
    ProgramOpenRequested {
        /// Program to open.
        program: ProgramId,
    },
    /// Intent: a taskbar button was clicked.
    TaskbarItemClicked {
        /// Window behind the button.
        window: WindowId,
    },
    /// Intent: flip the start menu.
    StartMenuToggleRequested,
    /// Intent: close the start menu if it is open.
    StartMenuCloseRequested,
    /// The start menu opened.
    StartMenuOpened,
    /// The start menu closed.
    StartMenuClosed,
    /// A window record was created.
    WindowCreated {
        /// New window.
        window: WindowId,
        /// Hosted program.
        program: ProgramId,
        /// Title bar text.
        title: String,
        /// Icon path.
        icon: String,
    },
    /// A window became the active window.
    WindowFocused {
        /// Focused window.
        window: WindowId,
    },
    /// A window was minimized.
    WindowMinimized {
        /// Minimized window.
        window: WindowId,
    },
    /// A minimized window is visible again.
    WindowRestored {
        /// Restored window.
        window: WindowId,
    },
    /// A window now fills the desktop.
    WindowMaximized {
        /// Maximized window.
        window: WindowId,
    },
    /// A maximized window returned to its saved box.
    WindowUnmaximized {
        /// Un-maximized window.
        window: WindowId,
    },
    /// A window record was destroyed.
    WindowClosed {
        /// Closed window.
        window: WindowId,
        /// Program it hosted.
        program: ProgramId,
    },
    /// A window's committed geometry changed.
    WindowMoved {
        /// Moved window.
        window: WindowId,
        /// New box.
        rect: WindowRect,
    },
    /// A window's status line changed.
    WindowStatusChanged {
        /// Window whose status changed.
        window: WindowId,
        /// New text.
        text: String,
    },
    /// A program's content frame reported that it finished loading.
    ContentReady {
        /// Program whose frame is ready.
        program: ProgramId,
    },
    /// A message must be posted into a program's content frame.
    FramePostRequested {
        /// Target program frame.
        program: ProgramId,
        /// Message to post.
        message: ShellMessage,
    },
    /// Intent: open an external URL.
    UrlOpenRequested {
        /// Target URL.
        url: String,
    },
    /// Intent: end the session and replay the boot sequence.
    LogOffRequested,
}

impl BusEvent for ShellEvent {
    type Topic = Topic;

    fn topic(&self) -> Topic {
        match self {
            Self::ProgramOpenRequested { .. } => Topic::ProgramOpen,
            Self::TaskbarItemClicked { .. } => Topic::TaskbarItemClicked,
            Self::StartMenuToggleRequested => Topic::StartMenuToggle,
            Self::StartMenuCloseRequested => Topic::StartMenuCloseRequest,
            Self::StartMenuOpened => Topic::StartMenuOpened,
            Self::StartMenuClosed => Topic::StartMenuClosed,
            Self::WindowCreated { .. } => Topic::WindowCreated,
            Self::WindowFocused { .. } => Topic::WindowFocused,
            Self::WindowMinimized { .. } => Topic::WindowMinimized,
            Self::WindowRestored { .. } => Topic::WindowRestored,
            Self::WindowMaximized { .. } => Topic::WindowMaximized,
            Self::WindowUnmaximized { .. } => Topic::WindowUnmaximized,
            Self::WindowClosed { .. } => Topic::WindowClosed,
            Self::WindowMoved { .. } => Topic::WindowMoved,
            Self::WindowStatusChanged { .. } => Topic::WindowStatus,
            Self::ContentReady { .. } => Topic::ContentReady,
            Self::FramePostRequested { .. } => Topic::FramePostMessage,
            Self::UrlOpenRequested { .. } => Topic::UrlOpen,
            Self::LogOffRequested => Topic::LogOffRequested,
        }
    }
}
