//! Per-window status line throttle.
//!
//! Content documents may report status text as often as they like; at most one update per window
//! is applied per interval. The latest text offered inside an interval is kept as a trailing
//! update and applied once the interval has elapsed.

use std::collections::{BTreeMap, HashMap};

use crate::model::WindowId;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of offering a status update.
pub enum StatusDecision {
    /// Apply the text now.
    Apply,
    /// Held back; it becomes due at the contained time.
    Deferred {
        /// Time at which the held text may be applied.
        due_ms: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingStatus {
    text: String,
    due_ms: u64,
}

#[derive(Debug, Clone, Default)]
/// Throttles status updates to one per interval per window.
pub struct StatusThrottle {
    interval_ms: u64,
    last_applied: HashMap<WindowId, u64>,
    pending: BTreeMap<WindowId, PendingStatus>,
}

impl StatusThrottle {
    /// Creates a throttle allowing one update per `interval_ms`.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            ..Self::default()
        }
    }

    /// Offers `text` for `window` at `now_ms`.
    pub fn offer(&mut self, window: &WindowId, text: String, now_ms: u64) -> StatusDecision {
        match self.last_applied.get(window) {
            Some(&last) if now_ms < last.saturating_add(self.interval_ms) => {
                let due_ms = last.saturating_add(self.interval_ms);
                self.pending
                    .insert(window.clone(), PendingStatus { text, due_ms });
                StatusDecision::Deferred { due_ms }
            }
            _ => {
                self.last_applied.insert(window.clone(), now_ms);
                self.pending.remove(window);
                StatusDecision::Apply
            }
        }
    }

    /// Removes and returns every held update that is due at `now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<(WindowId, String)> {
        let due: Vec<WindowId> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.due_ms <= now_ms)
            .map(|(window, _)| window.clone())
            .collect();

        due.into_iter()
            .filter_map(|window| {
                let pending = self.pending.remove(&window)?;
                self.last_applied.insert(window.clone(), now_ms);
                Some((window, pending.text))
            })
            .collect()
    }

    /// Earliest time a held update becomes due.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.values().map(|pending| pending.due_ms).min()
    }

    /// Drops all state for a closed window.
    pub fn forget(&mut self, window: &WindowId) {
        self.last_applied.remove(window);
        self.pending.remove(window);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn notepad() -> WindowId {
        WindowId::from_raw("notepad-window")
    }

    #[test]
    fn first_update_applies_immediately() {
        let mut throttle = StatusThrottle::new(1_000);
        assert_eq!(
            throttle.offer(&notepad(), "Ln 1, Col 2".into(), 5_000),
            StatusDecision::Apply
        );
        assert_eq!(throttle.next_due_ms(), None);
    }

    #[test]
    fn bursts_collapse_into_one_trailing_update() {
        let mut throttle = StatusThrottle::new(1_000);
        throttle.offer(&notepad(), "a".into(), 5_000);
        assert_eq!(
            throttle.offer(&notepad(), "b".into(), 5_100),
            StatusDecision::Deferred { due_ms: 6_000 }
        );
        throttle.offer(&notepad(), "c".into(), 5_900);

        assert_eq!(throttle.take_due(5_999), Vec::new());
        assert_eq!(throttle.take_due(6_000), vec![(notepad(), "c".to_string())]);
        assert_eq!(throttle.take_due(6_500), Vec::new());
        assert_eq!(
            throttle.offer(&notepad(), "d".into(), 6_500),
            StatusDecision::Deferred { due_ms: 7_000 }
        );
    }

    #[test]
    fn windows_are_throttled_independently() {
        let mut throttle = StatusThrottle::new(1_000);
        let media = WindowId::from_raw("media-player-window");
        throttle.offer(&notepad(), "a".into(), 0);
        assert_eq!(
            throttle.offer(&media, "Playing".into(), 10),
            StatusDecision::Apply
        );
    }

    #[test]
    fn forget_drops_pending_text() {
        let mut throttle = StatusThrottle::new(1_000);
        throttle.offer(&notepad(), "a".into(), 0);
        throttle.offer(&notepad(), "b".into(), 10);
        throttle.forget(&notepad());
        assert_eq!(throttle.take_due(10_000), Vec::new());
        assert_eq!(throttle.offer(&notepad(), "c".into(), 20), StatusDecision::Apply);
    }
}
