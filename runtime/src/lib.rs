//! # Reactive Reducer Runtime
//!
//! Runtime implementation for the Reactive Reducer adapter.
//!
//! This crate turns a reducer into a reusable [`Dispatcher`] that folds
//! action sources into streams of states.
//!
//! ## Core Components
//!
//! - **`reduce` / `try_reduce`**: Bind a reducer and an initial state
//! - **Dispatcher**: Starts an independent running fold per action source
//! - **`StateSequence`**: The lazy stream of states a fold produces
//! - **`StateSequenceExt`**: Collect, take the last state, or observe each one
//!
//! ## Example
//!
//! ```
//! use futures::future;
//! use reactive_reducer_core::{make_action, make_promise_actions, ActionSource};
//! use reactive_reducer_runtime::{reduce, StateSequenceExt};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Copy, Debug)]
//! enum CounterAction {
//!     Increment,
//!     Square,
//! }
//!
//! fn counter(state: &Counter, action: CounterAction) -> Counter {
//!     match action {
//!         CounterAction::Increment => Counter { count: state.count + 1 },
//!         CounterAction::Square => Counter { count: state.count * state.count },
//!     }
//! }
//!
//! let dispatch = reduce(counter, Counter { count: 2 });
//!
//! // Synchronous action
//! let source: ActionSource<CounterAction> = make_action(CounterAction::Increment);
//! assert_eq!(dispatch.dispatch(source).to_vec_now(), Some(Ok(vec![Counter { count: 3 }])));
//!
//! // Deferred actions, awaited one after the other
//! let source = make_promise_actions(vec![
//!     future::ready(Ok::<_, String>(CounterAction::Square)),
//!     future::ready(Ok(CounterAction::Square)),
//! ]);
//! let last = futures::executor::block_on(dispatch.dispatch(source).last_state());
//! assert_eq!(last, Ok(Some(Counter { count: 16 })));
//! ```
//!
//! ## Observability
//!
//! Every state sequence runs inside a `dispatch` tracing span labelled with
//! the dispatcher name. When metrics are enabled in [`DispatcherConfig`] the
//! following counters are recorded through the `metrics` facade:
//!
//! - `dispatch.actions.reduced`
//! - `dispatch.sequences.completed`
//! - `dispatch.sequences.failed` (labelled with `reason`)

/// Dispatcher configuration
pub mod config;

/// Consumption helpers for state sequences
pub mod consume;

/// The dispatcher and the running fold it produces
pub mod dispatcher;

pub use config::DispatcherConfig;
pub use consume::StateSequenceExt;
pub use dispatcher::{reduce, try_reduce, Dispatcher, StateSequence};
