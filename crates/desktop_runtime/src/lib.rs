//! Browser desktop shell: program catalog, window manager, taskbar, start menu, desktop icons,
//! and pooled content frames wired together over a synchronous event bus.

pub mod components;
pub mod config;
pub mod desktop_icons;
pub mod event_bus;
pub mod events;
pub mod frame_pool;
pub mod model;
pub mod persistence;
pub mod placement;
pub mod programs;
pub mod runtime;
mod runtime_context;
pub mod session;
pub mod snapshot;
pub mod start_menu;
pub mod status_line;
pub mod taskbar;
pub mod wallpaper;
pub mod window_manager;

pub use components::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use config::ShellConfig;
pub use event_bus::{BusEvent, EventBus, Subscription, SubscriptionId};
pub use events::{ShellEvent, Topic};
pub use model::*;
pub use programs::{ProgramDescriptor, ProgramRegistry};
pub use runtime::{DesktopRuntime, ShellInput};
pub use snapshot::DesktopSnapshot;
pub use window_manager::{WindowManager, WindowManagerError};
