//! Reducer traits
//!
//! A reducer folds one action into a state: `(State, Action) → State`.
//! Reducers are plain values held by a dispatcher for its whole lifetime, so
//! any `Fn(&S, A) -> S` closure qualifies, as does a unit struct with a
//! hand-written implementation.
//!
//! # Examples
//!
//! ```
//! use reactive_reducer_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//!     Double,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer<Counter, CounterAction> for CounterReducer {
//!     fn reduce(&self, state: &Counter, action: CounterAction) -> Counter {
//!         match action {
//!             CounterAction::Increment => Counter { count: state.count + 1 },
//!             CounterAction::Double => Counter { count: state.count * 2 },
//!         }
//!     }
//! }
//!
//! let next = CounterReducer.reduce(&Counter { count: 3 }, CounterAction::Double);
//! assert_eq!(next, Counter { count: 6 });
//!
//! // Closures work too
//! let add = |state: &i64, action: i64| state + action;
//! assert_eq!(Reducer::reduce(&add, &1, 2), 3);
//! ```

use std::marker::PhantomData;

/// The Reducer trait - a pure fold step
///
/// # Type Parameters
///
/// - `S`: The state type being folded
/// - `A`: The action type consumed by each step
///
/// Implementations are expected to be pure. Nothing enforces it: whatever
/// side effects a reducer performs happen once per reduced action.
pub trait Reducer<S, A> {
    /// Compute the state that follows `state` once `action` is applied
    fn reduce(&self, state: &S, action: A) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&S, A) -> S,
{
    fn reduce(&self, state: &S, action: A) -> S {
        self(state, action)
    }
}

/// A reducer whose fold step may fail
///
/// Failing with `Err(error)` terminates the state sequence being folded;
/// the error is handed to the consumer unchanged.
///
/// # Examples
///
/// ```
/// use reactive_reducer_core::reducer::TryReducer;
///
/// let checked_double = |state: &u8, (): ()| state.checked_mul(2).ok_or("overflow");
///
/// assert_eq!(checked_double.try_reduce(&100, ()), Ok(200));
/// assert_eq!(checked_double.try_reduce(&200, ()), Err("overflow"));
/// ```
pub trait TryReducer<S, A, E> {
    /// Compute the next state, or fail the fold
    ///
    /// # Errors
    ///
    /// Returns the reducer's own error when `action` cannot be applied to
    /// `state`.
    fn try_reduce(&self, state: &S, action: A) -> Result<S, E>;
}

impl<S, A, E, F> TryReducer<S, A, E> for F
where
    F: Fn(&S, A) -> Result<S, E>,
{
    fn try_reduce(&self, state: &S, action: A) -> Result<S, E> {
        self(state, action)
    }
}

/// Adapts an infallible [`Reducer`] to [`TryReducer`] for any error type.
///
/// Created by [`Total::new`]; the runtime wraps every reducer passed to
/// `reduce` in one of these so that sources failing with any `E` can be
/// folded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Total<R> {
    reducer: R,
}

impl<R> Total<R> {
    /// Wrap an infallible reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self { reducer }
    }

    /// Borrow the wrapped reducer
    #[must_use]
    pub const fn inner(&self) -> &R {
        &self.reducer
    }

    /// Unwrap into the original reducer
    #[must_use]
    pub fn into_inner(self) -> R {
        self.reducer
    }
}

impl<S, A, E, R> TryReducer<S, A, E> for Total<R>
where
    R: Reducer<S, A>,
{
    fn try_reduce(&self, state: &S, action: A) -> Result<S, E> {
        Ok(self.reducer.reduce(state, action))
    }
}

/// Lifts a reducer over `(S, A)` to one over `(S, B)` by mapping each action
/// first.
///
/// Useful when several action shapes feed the same reducer.
///
/// # Examples
///
/// ```
/// use reactive_reducer_core::reducer::{contramap, Reducer};
///
/// let add = |state: &i64, action: i64| state + action;
/// let add_len = contramap(add, |text: String| text.chars().count() as i64);
///
/// assert_eq!(add_len.reduce(&1, "abc".to_string()), 4);
/// ```
pub fn contramap<R, A, B, F>(reducer: R, f: F) -> Contramap<R, F, A>
where
    F: Fn(B) -> A,
{
    Contramap {
        reducer,
        f,
        _action: PhantomData,
    }
}

/// A reducer that maps actions before handing them to an inner reducer.
///
/// Created by [`contramap`].
pub struct Contramap<R, F, A> {
    reducer: R,
    f: F,
    _action: PhantomData<fn(A)>,
}

impl<R, F, S, A, B> Reducer<S, B> for Contramap<R, F, A>
where
    R: Reducer<S, A>,
    F: Fn(B) -> A,
{
    fn reduce(&self, state: &S, action: B) -> S {
        self.reducer.reduce(state, (self.f)(action))
    }
}
