//! # Reactive Reducer Core
//!
//! Core traits and types for the Reactive Reducer dispatcher.
//!
//! This crate provides the two inputs of a dispatcher pipeline: the reducer
//! that folds actions into state, and the action sources that feed it.
//!
//! ## Core Concepts
//!
//! - **Action**: An opaque input value, never inspected by this crate
//! - **State**: An opaque value accumulated by folding actions
//! - **Reducer**: Pure function `(State, Action) → State`
//! - **Action Source**: A lazy stream of actions, consumed exactly once
//!
//! ## Action Source Constructors
//!
//! | Input                              | Constructor                       |
//! |------------------------------------|-----------------------------------|
//! | one action                         | [`make_action`]                   |
//! | a stream of actions                | [`make_async_action`]             |
//! | a future resolving to an action    | [`make_promise_action`]           |
//! | a collection of actions            | [`make_actions`]                  |
//! | a collection of streams            | [`make_async_actions`]            |
//! | a collection of futures            | [`make_promise_actions`]          |
//!
//! The dispatcher that folds a source into a stream of states lives in the
//! `reactive-reducer-runtime` crate.
//!
//! ## Example
//!
//! ```
//! use futures::{FutureExt, TryStreamExt};
//! use reactive_reducer_core::{make_actions, ActionSource, Reducer};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! let increment = |state: &Counter, by: i64| Counter { count: state.count + by };
//! let source: ActionSource<i64> = make_actions([1, 2, 3]);
//!
//! let actions = source.try_collect::<Vec<_>>().now_or_never();
//! assert_eq!(actions, Some(Ok(vec![1, 2, 3])));
//! assert_eq!(increment.reduce(&Counter { count: 0 }, 5), Counter { count: 5 });
//! ```

/// Reducer traits: the fold step applied to every action
pub mod reducer;

/// Action sources and their constructors
pub mod source;

// Re-export commonly used items
pub use reducer::{contramap, Contramap, Reducer, Total, TryReducer};
pub use source::{
    make_action, make_actions, make_async_action, make_async_actions, make_promise_action,
    make_promise_actions, ActionSource,
};
