//! Step registry — the ordered, immutable vocabulary of a walkthrough.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// Ordered, immutable list of step ids.
///
/// Defined once at construction and validated there: the sequence must be
/// non-empty and free of duplicate ids. Every transition is computed
/// against this registry; it never changes for the lifetime of a machine.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<String>,
}

impl StepRegistry {
    /// Build a registry for the named walkthrough.
    ///
    /// Fails with [`Error::EmptySteps`] on an empty sequence and
    /// [`Error::DuplicateStep`] when two steps share an id.
    pub fn new<I, S>(walkthrough: &str, steps: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let steps: Vec<String> = steps.into_iter().map(Into::into).collect();
        if steps.is_empty() {
            return Err(Error::EmptySteps {
                name: walkthrough.to_string(),
            });
        }
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.as_str()) {
                return Err(Error::DuplicateStep {
                    name: walkthrough.to_string(),
                    step: step.clone(),
                });
            }
        }
        Ok(Self { steps })
    }

    /// Position of a step id, if it belongs to this walkthrough.
    pub fn index_of(&self, step: &str) -> Option<usize> {
        self.steps.iter().position(|s| s == step)
    }

    /// Step id at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.steps.get(index).map(String::as_str)
    }

    /// The first step — guaranteed to exist.
    pub fn first(&self) -> &str {
        &self.steps[0]
    }

    /// The last step — guaranteed to exist.
    pub fn last(&self) -> &str {
        &self.steps[self.steps.len() - 1]
    }

    pub fn contains(&self, step: &str) -> bool {
        self.index_of(step).is_some()
    }

    /// The step following `step`, or `None` when `step` is last (or not in
    /// this registry).
    pub fn after(&self, step: &str) -> Option<&str> {
        self.get(self.index_of(step)? + 1)
    }

    /// The step preceding `step`, or `None` when `step` is first (or not
    /// in this registry).
    pub fn before(&self, step: &str) -> Option<&str> {
        match self.index_of(step)? {
            0 => None,
            i => self.get(i - 1),
        }
    }

    /// Whether `step` sits at the final index.
    pub fn is_last(&self, step: &str) -> bool {
        self.index_of(step) == Some(self.steps.len() - 1)
    }

    /// Whether the walkthrough has exactly one step.
    pub fn is_only(&self) -> bool {
        self.steps.len() == 1
    }

    /// Number of steps. Construction guarantees at least one.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false — construction rejects an empty sequence.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
