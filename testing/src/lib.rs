//! # Reactive Reducer Testing
//!
//! Testing utilities and helpers for the Reactive Reducer adapter.
//!
//! This crate provides:
//! - Counter fixtures (state, actions, infallible and fallible reducers)
//! - Ready and hand-settled deferred values for building action sources
//! - A fluent Given-When-Then harness for dispatchers
//! - Tracing setup for test output
//!
//! ## Example
//!
//! ```
//! use reactive_reducer_core::make_promise_actions;
//! use reactive_reducer_runtime::{reduce, StateSequenceExt};
//! use reactive_reducer_testing::{counter_reducer, deferred, CounterAction, CounterState, TestError};
//!
//! # tokio_test::block_on(async {
//! let dispatch = reduce(counter_reducer, CounterState::new(2));
//! let source = make_promise_actions(vec![
//!     deferred::<_, TestError>(CounterAction::Square),
//!     deferred(CounterAction::Square),
//! ]);
//!
//! let last = dispatch.dispatch(source).last_state().await;
//! assert_eq!(last, Ok(Some(CounterState::new(16))));
//! # });
//! ```

use thiserror::Error;

/// Deferred values and streams for driving action sources
pub mod deferred;


/// Counter state, actions and reducers
pub mod fixtures;

/// Error type used by fixtures and test sources
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TestError {
    /// A deferred action or source was rejected on purpose
    #[error("Rejected: {0}")]
    Rejected(String),

    /// The fallible counter reducer would overflow
    #[error("Counter overflow applying {action:?} to {count}")]
    Overflow {
        /// Count before the failing action
        count: i64,
        /// The action that overflowed
        action: fixtures::CounterAction,
    },

    /// A manually settled deferred value failed on its own
    #[error(transparent)]
    Deferred(#[from] deferred::DeferredError),
}

/// Install a `tracing` subscriber writing to the test output.
///
/// The filter is read from `RUST_LOG` and defaults to `warn`. Calling this
/// more than once is harmless.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use deferred::{
    deferred, manual, rejected, stream_of, yielding, DeferredError, DeferredHandle, ManualDeferred,
};
pub use dispatch_test::DispatchTest;
pub use fixtures::{
    counter_reducer, fallible_counter_reducer, CounterAction, CounterState,
};
