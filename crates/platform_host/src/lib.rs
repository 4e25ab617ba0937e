//! Typed host-domain contracts shared by the desktop runtime and its browser adapters.
//!
//! This crate stays free of browser bindings. It exposes the session-scoped key/value store
//! contract and the clock abstraction used for throttling and debouncing, while concrete browser
//! adapters live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod session;
pub mod time;

pub use session::{
    load_session_with, save_session_with, MemorySessionStore, NoopSessionStore, SessionStore,
};
pub use time::{unix_time_ms_now, Clock, ManualClock, SystemClock};
