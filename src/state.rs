//! Active-state model — which step of the walkthrough is live.

use serde::{Deserialize, Serialize};

use crate::registry::StepRegistry;

/// Persisted marker for the completed state.
pub const COMPLETE_MARKER: &str = "complete";

/// The observable state of a walkthrough.
///
/// `NotStarted` before beginning (and after cancellation), `Active` while
/// a step is live, `Complete` once the user has finished or skipped.
/// `Complete` is terminal for forward navigation; only `cancel()` (or the
/// opt-in `previous_from_complete` policy) leaves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveState {
    NotStarted,
    Active(String),
    Complete,
}

impl ActiveState {
    /// Decode a persisted value against the registry.
    ///
    /// Returns `None` for anything that is neither the completion marker
    /// nor a known step id, so stale or malformed entries fall back to the
    /// unpersisted default instead of failing construction.
    pub fn from_persisted(raw: &str, registry: &StepRegistry) -> Option<Self> {
        if raw == COMPLETE_MARKER {
            Some(Self::Complete)
        } else if registry.contains(raw) {
            Some(Self::Active(raw.to_string()))
        } else {
            None
        }
    }

    /// The value to write through the state store, or `None` to clear the
    /// entry (nothing is persisted for `NotStarted`).
    pub fn persisted_value(&self) -> Option<&str> {
        match self {
            Self::NotStarted => None,
            Self::Active(step) => Some(step),
            Self::Complete => Some(COMPLETE_MARKER),
        }
    }

    /// Whether `step` is the currently active step.
    pub fn is_active(&self, step: &str) -> bool {
        matches!(self, Self::Active(s) if s == step)
    }

    /// The active step id, if any.
    pub fn active_step(&self) -> Option<&str> {
        match self {
            Self::Active(step) => Some(step),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    pub fn is_not_started(&self) -> bool {
        matches!(self, Self::NotStarted)
    }
}

impl Default for ActiveState {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl std::fmt::Display for ActiveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::Active(step) => write!(f, "{step}"),
            Self::Complete => write!(f, "{COMPLETE_MARKER}"),
        }
    }
}
