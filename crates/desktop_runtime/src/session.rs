//! Boot, login, and log-off phases in front of the desktop.

use platform_host::SessionStore;

use crate::persistence;

/// Boot screen duration before the login screen appears.
pub const BOOT_SCREEN_MS: u32 = 7_500;
/// Log-off requests are ignored for this long after a login.
pub const LOG_OFF_COOLDOWN_MS: u64 = 4_250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What covers the desktop right now.
pub enum SessionPhase {
    /// Boot animation.
    Booting,
    /// Login screen; the desktop is hidden and inert.
    LoggedOut,
    /// Desktop is interactive.
    Desktop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Drives the boot sequence and gates log-off.
pub struct SessionController {
    phase: SessionPhase,
    log_off_blocked_until_ms: u64,
}

impl SessionController {
    /// Skips straight to the desktop when this browser session already logged in.
    pub fn resume(store: &dyn SessionStore) -> Self {
        let phase = if persistence::has_completed_boot(store) {
            SessionPhase::Desktop
        } else {
            SessionPhase::Booting
        };
        Self {
            phase,
            log_off_blocked_until_ms: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Boot animation finished; show the login screen.
    pub fn finish_boot(&mut self) -> bool {
        if self.phase != SessionPhase::Booting {
            return false;
        }
        self.phase = SessionPhase::LoggedOut;
        true
    }

    /// The user logged in at `now_ms`.
    pub fn log_in(&mut self, store: &dyn SessionStore, now_ms: u64) -> bool {
        if self.phase == SessionPhase::Desktop {
            return false;
        }
        self.phase = SessionPhase::Desktop;
        self.log_off_blocked_until_ms = now_ms.saturating_add(LOG_OFF_COOLDOWN_MS);
        persistence::mark_boot_completed(store);
        true
    }

    /// Returns to the login screen unless a login happened too recently.
    pub fn log_off(&mut self, store: &dyn SessionStore, now_ms: u64) -> bool {
        if self.phase != SessionPhase::Desktop || now_ms < self.log_off_blocked_until_ms {
            return false;
        }
        self.phase = SessionPhase::LoggedOut;
        persistence::mark_logged_out(store);
        true
    }
}
