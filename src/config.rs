//! Configuration types.

use std::time::Duration;

/// Policy for `previous()` when the walkthrough is already complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviousFromComplete {
    /// Ignore the call; completion is terminal for backward navigation.
    #[default]
    Ignore,
    /// Step back out of completion onto the last step.
    LastStep,
}

/// Walkthrough configuration.
#[derive(Debug, Clone)]
pub struct WalkthroughConfig {
    /// Start on the first step immediately when nothing was persisted.
    pub start_immediately: bool,
    /// Delay between a claimed step display unmounting and the auto-advance
    /// check firing.
    pub unmount_advance_delay: Duration,
    /// What `previous()` does from the `Complete` state.
    pub previous_from_complete: PreviousFromComplete,
}

impl Default for WalkthroughConfig {
    fn default() -> Self {
        Self {
            start_immediately: false,
            unmount_advance_delay: Duration::from_secs(1),
            previous_from_complete: PreviousFromComplete::Ignore,
        }
    }
}

impl WalkthroughConfig {
    /// Convenience for the common "begin as soon as constructed" case.
    pub fn immediate() -> Self {
        Self {
            start_immediately: true,
            ..Self::default()
        }
    }
}
