//! Per-step handles — what a rendered step instance holds.
//!
//! A [`StepHandle`] represents one mounted UI instance of one step. It
//! carries the step-bound transitions (guarded so a stale instance cannot
//! move a machine that has advanced past it), the `show` decision, and the
//! mount/unmount lifecycle that drives claim arbitration and the
//! unmount-advance timer.

use tracing::debug;
use uuid::Uuid;

use crate::claims::InstanceId;
use crate::machine::Walkthrough;

/// Options for one rendered instance of a step.
#[derive(Debug, Clone, Default)]
pub struct StepOptions {
    /// Share a key between instances that may render the same step at the
    /// same time; only the first to mount gets `show = true`. Without a
    /// key, every instance is implicitly an owner.
    pub unique_key: Option<String>,
    /// Normally an unmount of the claimed display auto-advances the
    /// walkthrough after a short delay. Set to opt this step instance out.
    pub disable_next_on_unmount: bool,
}

impl StepOptions {
    /// Deduplicate display under `key`.
    pub fn unique_key(key: impl Into<String>) -> Self {
        Self {
            unique_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Keep the walkthrough in place when this instance unmounts.
    pub fn no_advance_on_unmount() -> Self {
        Self {
            disable_next_on_unmount: true,
            ..Self::default()
        }
    }
}

/// One mounted instance of one step.
///
/// Not `Clone` — the handle's identity is the instance identity used for
/// claim arbitration. A second rendering of the same step gets its own
/// handle from [`Walkthrough::step`].
pub struct StepHandle {
    machine: Walkthrough,
    step: String,
    options: StepOptions,
    instance: InstanceId,
}

impl StepHandle {
    pub(crate) fn new(machine: Walkthrough, step: String, options: StepOptions) -> Self {
        Self {
            machine,
            step,
            options,
            instance: Uuid::new_v4(),
        }
    }

    /// The step id this handle is bound to.
    pub fn step(&self) -> &str {
        &self.step
    }

    /// Whether this instance should display: the step is active AND this
    /// instance holds the display claim for its unique key (trivially true
    /// without a key).
    pub async fn show(&self) -> bool {
        self.machine.active_step().await.is_active(&self.step) && self.has_claim().await
    }

    /// Whether this step sits at the final index of the walkthrough.
    pub fn is_last(&self) -> bool {
        self.machine.registry().is_last(&self.step)
    }

    /// Whether the walkthrough has exactly one step.
    pub fn is_only(&self) -> bool {
        self.machine.registry().is_only()
    }

    /// Advance, only if this handle's step is still the active one.
    pub async fn next(&self) {
        self.machine.next_from(&self.step).await;
    }

    /// Step back, only if this handle's step is still the active one.
    pub async fn previous(&self) {
        self.machine.previous_from(&self.step).await;
    }

    /// Register this instance's display lifetime.
    ///
    /// Claims the unique key (first registration wins) and, if the claim
    /// is held, clears the step's pending unmount flag so any in-flight
    /// unmount-advance check becomes a no-op.
    pub async fn mount(&self) {
        if let Some(key) = &self.options.unique_key {
            self.machine.claim(key, self.instance).await;
        }
        if self.has_claim().await {
            self.machine.clear_unmounted(&self.step).await;
        }
    }

    /// End this instance's display lifetime.
    ///
    /// Releases the claim so a replacement instance can take over, then —
    /// if this instance held the claim and auto-advance is enabled —
    /// flags the step as unmounted and schedules the delayed advance
    /// check. The check fires only if no remount cleared the flag in the
    /// interim and the machine is still on this step.
    pub async fn unmount(&self) {
        let had_claim = self.has_claim().await;
        if let Some(key) = &self.options.unique_key {
            self.machine.release_claim(key, self.instance).await;
        }
        // Non-owning duplicates must not arm the advance timer.
        if !had_claim || self.options.disable_next_on_unmount {
            return;
        }

        self.machine.mark_unmounted(&self.step).await;
        let machine = self.machine.clone();
        let step = self.step.clone();
        let delay = machine.config().unmount_advance_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if machine.is_unmounted(&step).await {
                debug!(walkthrough = %machine.name(), step = %step, "Step unmounted, auto-advancing");
                machine.next_from(&step).await;
            }
        });
    }

    async fn has_claim(&self) -> bool {
        match &self.options.unique_key {
            Some(key) => self.machine.holds_claim(key, self.instance).await,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::config::WalkthroughConfig;
    use crate::machine::Walkthrough;
    use crate::state::ActiveState;
    use crate::store::NoopStore;

    use super::*;

    fn short_delay() -> WalkthroughConfig {
        WalkthroughConfig {
            start_immediately: true,
            unmount_advance_delay: Duration::from_millis(50),
            ..WalkthroughConfig::default()
        }
    }

    async fn machine(config: WalkthroughConfig) -> Walkthrough {
        Walkthrough::create("step-tour", ["a", "b"], config, Arc::new(NoopStore))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn show_follows_active_step() {
        let wt = machine(WalkthroughConfig::immediate()).await;
        let a = wt.step("a").unwrap();
        let b = wt.step("b").unwrap();
        a.mount().await;
        b.mount().await;

        assert!(a.show().await);
        assert!(!b.show().await);

        a.next().await;
        assert!(!a.show().await);
        assert!(b.show().await);
    }

    #[tokio::test]
    async fn derived_flags() {
        let wt = machine(WalkthroughConfig::default()).await;
        let a = wt.step("a").unwrap();
        let b = wt.step("b").unwrap();
        assert!(!a.is_last());
        assert!(b.is_last());
        assert!(!a.is_only());

        let solo = Walkthrough::create(
            "solo-tour",
            ["only"],
            WalkthroughConfig::default(),
            Arc::new(NoopStore),
        )
        .await
        .unwrap();
        let handle = solo.step("only").unwrap();
        assert!(handle.is_only());
        assert!(handle.is_last());
    }

    #[tokio::test]
    async fn unique_key_gives_exactly_one_instance_show() {
        let wt = machine(WalkthroughConfig::immediate()).await;
        let first = wt.step_with("a", StepOptions::unique_key("slot")).unwrap();
        let second = wt.step_with("a", StepOptions::unique_key("slot")).unwrap();

        first.mount().await;
        second.mount().await;

        assert!(first.show().await);
        assert!(!second.show().await);

        // Owner unmounts; a fresh instance can claim the slot.
        first.unmount().await;
        let third = wt.step_with("a", StepOptions::unique_key("slot")).unwrap();
        third.mount().await;
        assert!(third.show().await);
        assert!(!second.show().await);
    }

    #[tokio::test]
    async fn unmount_advances_after_delay() {
        let wt = machine(short_delay()).await;
        let a = wt.step("a").unwrap();
        a.mount().await;
        a.unmount().await;

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(wt.active_step().await, ActiveState::Active("b".to_string()));
    }

    #[tokio::test]
    async fn remount_inside_window_cancels_advance() {
        let wt = machine(short_delay()).await;
        let a = wt.step("a").unwrap();
        a.mount().await;
        a.unmount().await;

        let replacement = wt.step("a").unwrap();
        replacement.mount().await;

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(wt.active_step().await, ActiveState::Active("a".to_string()));
    }

    #[tokio::test]
    async fn disabled_unmount_advance_stays_put() {
        let wt = machine(short_delay()).await;
        let a = wt
            .step_with("a", StepOptions::no_advance_on_unmount())
            .unwrap();
        a.mount().await;
        a.unmount().await;

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(wt.active_step().await, ActiveState::Active("a".to_string()));
    }

    #[tokio::test]
    async fn non_owning_duplicate_does_not_arm_the_timer() {
        let wt = machine(short_delay()).await;
        let owner = wt.step_with("a", StepOptions::unique_key("slot")).unwrap();
        let loser = wt.step_with("a", StepOptions::unique_key("slot")).unwrap();
        owner.mount().await;
        loser.mount().await;

        // Only the losing duplicate unmounts; the walkthrough must stay.
        loser.unmount().await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(wt.active_step().await, ActiveState::Active("a".to_string()));
    }

    #[tokio::test]
    async fn explicit_navigation_defuses_pending_advance() {
        let wt = machine(short_delay()).await;
        let a = wt.step("a").unwrap();
        a.mount().await;
        a.unmount().await;

        // User navigates before the timer fires; the stale check must not
        // advance a second time.
        wt.next().await;
        assert_eq!(wt.active_step().await, ActiveState::Active("b".to_string()));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(wt.active_step().await, ActiveState::Active("b".to_string()));
    }

    #[tokio::test]
    async fn stale_handle_cannot_move_an_advanced_machine() {
        let wt = machine(WalkthroughConfig::immediate()).await;
        let a = wt.step("a").unwrap();
        wt.next().await;

        a.next().await;
        a.previous().await;
        assert_eq!(wt.active_step().await, ActiveState::Active("b".to_string()));
    }
}
