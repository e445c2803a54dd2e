//! Walkthrough — guided onboarding flows as a persistent step state machine.
//!
//! A walkthrough is a named, ordered sequence of step ids presented one at
//! a time. The machine tracks the active step, survives restarts through
//! an injected [`StateStore`](store::StateStore), arbitrates display
//! rights when the same step renders in several places, and auto-advances
//! when a claimed step display unmounts without explicit navigation.
//!
//! ```no_run
//! use std::sync::Arc;
//! use walkthrough::{Walkthrough, WalkthroughConfig, store::MemoryStore};
//!
//! # async fn demo() -> walkthrough::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let tour = Walkthrough::create(
//!     "first-run",
//!     ["welcome", "profile", "done"],
//!     WalkthroughConfig::immediate(),
//!     store,
//! )
//! .await?;
//!
//! let welcome = tour.step("welcome")?;
//! welcome.mount().await;
//! if welcome.show().await {
//!     welcome.next().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod machine;
pub mod registry;
pub mod state;
pub mod step;
pub mod store;

pub use claims::{ClaimRegistry, InstanceId};
pub use config::{PreviousFromComplete, WalkthroughConfig};
pub use error::{Error, Result, StoreError};
pub use machine::Walkthrough;
pub use registry::StepRegistry;
pub use state::{ActiveState, COMPLETE_MARKER};
pub use step::{StepHandle, StepOptions};
