//! # Cultiva Testing
//!
//! Testing utilities and helpers for the Cultiva state-container architecture.
//!
//! This crate provides:
//! - Mock implementations of shared Environment traits
//! - A fluent Given/When/Then harness for reducers
//! - Assertion helpers for effects
//! - A tracing initializer for tests
//!
//! ## Example
//!
//! ```ignore
//! use cultiva_testing::test_clock;
//! use cultiva_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_signup_flow() {
//!     let env = test_environment();
//!     let store = Store::new(LeadFormState::default(), LeadFormReducer::new(), env);
//!
//!     let mut handle = store.send(LeadFormAction::SubmitTapped).await.unwrap();
//!     handle.wait().await;
//!
//!     let phase = store.state(|s| s.phase).await;
//!     assert_eq!(phase, FormPhase::Editing);
//! }
//! ```

use chrono::{DateTime, Utc};
use cultiva_core::environment::Clock;


/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use cultiva_testing::mocks::FixedClock;
    /// use cultiva_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Initialize tracing for a test binary
///
/// Installs an env-filtered fmt subscriber writing through the test writer.
/// Safe to call from every test; only the first call installs the
/// subscriber.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cultiva_runtime=debug,cultiva_leadform=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::ReducerTest;
