//! Single-flight transition guard

use std::cell::Cell;

use serde::{Deserialize, Serialize};

/// Phase of the view transition currently in flight
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
pub enum TransitionPhase {
    #[default]
    Idle,
    /// Old view is fading out
    LeavingOld,
    /// Stray views hidden, new view unhidden, waiting for layout
    Settling,
    /// New view active, hooks and scroll resolution running
    EnteringNew,
}

/// The router's only mutual-exclusion primitive.
///
/// At most one [`TransitionGuard`] exists at a time; dropping it returns the
/// flag to [`TransitionPhase::Idle`] on every exit path, unwinding included.
#[derive(Debug, Default)]
pub struct TransitionFlag {
    phase: Cell<TransitionPhase>,
}

impl TransitionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.phase.get() != TransitionPhase::Idle
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase.get()
    }

    /// Claim the flag, or `None` if a transition is already in flight
    pub fn try_begin(&self) -> Option<TransitionGuard<'_>> {
        if self.is_active() {
            return None;
        }
        self.phase.set(TransitionPhase::Settling);
        Some(TransitionGuard { flag: self })
    }
}

/// Scoped ownership of the [`TransitionFlag`]
#[derive(Debug)]
pub struct TransitionGuard<'a> {
    flag: &'a TransitionFlag,
}

impl TransitionGuard<'_> {
    pub fn enter(&self, phase: TransitionPhase) {
        // Idle is reserved for release
        if phase != TransitionPhase::Idle {
            self.flag.phase.set(phase);
        }
    }
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        self.flag.phase.set(TransitionPhase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flight() {
        let flag = TransitionFlag::new();
        let guard = flag.try_begin();
        assert!(guard.is_some());
        assert!(flag.is_active());
        assert!(flag.try_begin().is_none());

        drop(guard);
        assert!(!flag.is_active());
        assert!(flag.try_begin().is_some());
    }

    #[test]
    fn test_phase_tracking() {
        let flag = TransitionFlag::new();
        assert_eq!(flag.phase(), TransitionPhase::Idle);

        let guard = flag.try_begin().unwrap();
        guard.enter(TransitionPhase::LeavingOld);
        assert_eq!(flag.phase(), TransitionPhase::LeavingOld);

        guard.enter(TransitionPhase::Idle);
        assert_eq!(flag.phase(), TransitionPhase::LeavingOld);

        guard.enter(TransitionPhase::EnteringNew);
        drop(guard);
        assert_eq!(flag.phase(), TransitionPhase::Idle);
    }

    #[test]
    fn test_released_on_unwind() {
        let flag = TransitionFlag::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = flag.try_begin();
            panic!("transition step failed");
        }));
        assert!(result.is_err());
        assert!(!flag.is_active());
    }
}
