//! Session flag persistence for the boot sequence.
//!
//! The only state that survives a reload is whether the boot sequence already completed in this
//! browser session. Window layout is never persisted.

use platform_host::SessionStore;

/// Session storage key of the boot flag.
pub const BOOT_SESSION_KEY: &str = "logged_in";

const LOGGED_IN: &str = "true";
const LOGGED_OUT: &str = "false";

/// Returns `true` when the boot sequence already completed in this session.
pub fn has_completed_boot(store: &dyn SessionStore) -> bool {
    store.load_raw(BOOT_SESSION_KEY).as_deref() == Some(LOGGED_IN)
}

/// Records a completed boot and login.
pub fn mark_boot_completed(store: &dyn SessionStore) {
    if let Err(err) = store.save_raw(BOOT_SESSION_KEY, LOGGED_IN) {
        leptos::logging::warn!("boot flag save failed: {err}");
    }
}

/// Flags the session as logged out while keeping the entry.
pub fn mark_logged_out(store: &dyn SessionStore) {
    if let Err(err) = store.save_raw(BOOT_SESSION_KEY, LOGGED_OUT) {
        leptos::logging::warn!("boot flag save failed: {err}");
    }
}

/// Forgets the boot flag so the next load replays the full boot sequence.
pub fn clear_boot_flag(store: &dyn SessionStore) {
    if let Err(err) = store.remove(BOOT_SESSION_KEY) {
        leptos::logging::warn!("boot flag removal failed: {err}");
    }
}
