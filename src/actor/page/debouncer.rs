use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::time::Instant;

use super::trigger::Trigger;

/// Idle sleep when nothing is scheduled.
const IDLE: Duration = Duration::from_secs(86400);

/// Triggers coalesced into one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Batch {
    /// Trigger that opened the window
    pub(super) first: Trigger,
    /// How often each trigger fired inside the window
    pub(super) counts: FxHashMap<Trigger, usize>,
}

impl Batch {
    pub(super) fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Pure debouncer: only handles timing and trigger coalescing.
///
/// The window opens with its first trigger and closes `delay` later. Later
/// triggers join the open window without moving its deadline, so a steady
/// stream of edits still gets a pass every `delay`.
pub(super) struct Debouncer {
    delay: Duration,
    pub(super) first: Option<Trigger>,
    pub(super) counts: FxHashMap<Trigger, usize>,
    pub(super) opened: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(delay: Duration) -> Self {
        Self {
            delay,
            first: None,
            counts: FxHashMap::default(),
            opened: None,
        }
    }

    pub(super) fn add(&mut self, trigger: Trigger) {
        crate::debug!("observer"; "schedule {}", trigger);
        self.first.get_or_insert(trigger);
        *self.counts.entry(trigger).or_default() += 1;
        self.opened.get_or_insert_with(Instant::now);
    }

    /// Take the pending batch if the delay has elapsed since the window opened.
    pub(super) fn take_if_ready(&mut self) -> Option<Batch> {
        if !self.is_ready() {
            return None;
        }

        let first = self.first.take()?;
        let counts = std::mem::take(&mut self.counts);
        self.opened = None;
        Some(Batch { first, counts })
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(opened) = self.opened else {
            return false;
        };
        opened.elapsed() >= self.delay && !self.counts.is_empty()
    }

    #[cfg(test)]
    pub(super) fn is_pending(&self) -> bool {
        self.opened.is_some()
    }

    /// Precise sleep duration until the pending batch becomes ready.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(opened) = self.opened else {
            return IDLE;
        };

        self.delay
            .saturating_sub(opened.elapsed())
            .max(Duration::from_millis(1))
    }
}
