//! Run-once gate for stages shared across concurrent runs

use std::sync::atomic::{AtomicU8, Ordering};

const PENDING: u8 = 0;
const DONE: u8 = 1;

/// Observable state of a [`OneShot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShotState {
    Pending,
    Done,
}

/// Two-state gate, `Pending -> Done`, switched by compare-and-set.
///
/// Exactly one caller of [`OneShot::fire`] wins, however many threads race.
#[derive(Debug, Default)]
pub struct OneShot {
    state: AtomicU8,
}

impl OneShot {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(PENDING),
        }
    }

    /// Move to `Done`; `true` only for the call that made the transition
    pub fn fire(&self) -> bool {
        self.state
            .compare_exchange(PENDING, DONE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[must_use]
    pub fn state(&self) -> OneShotState {
        match self.state.load(Ordering::Acquire) {
            PENDING => OneShotState::Pending,
            _ => OneShotState::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn fires_once() {
        let gate = OneShot::new();
        assert_eq!(gate.state(), OneShotState::Pending);
        assert!(gate.fire());
        assert!(!gate.fire());
        assert_eq!(gate.state(), OneShotState::Done);
    }

    #[test]
    fn one_winner_across_threads() {
        let gate = OneShot::new();
        let winners = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    if gate.fire() {
                        winners.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        assert_eq!(winners.load(Ordering::Relaxed), 1);
    }
}
