//! Ways of consuming a state sequence.
//!
//! [`StateSequenceExt`] is implemented for every stream of `Result`s, so it
//! applies to a [`StateSequence`](crate::StateSequence) and to anything built
//! on top of one.

use futures::future::{self, FutureExt};
use futures::stream::{InspectOk, StreamExt, TryCollect, TryStream, TryStreamExt};
use std::future::Future;
use std::pin::pin;

/// Consumption helpers for state sequences
pub trait StateSequenceExt: TryStream + Sized {
    /// Collect every state, failing with the first error.
    fn to_vec(self) -> TryCollect<Self, Vec<Self::Ok>> {
        self.try_collect()
    }

    /// Collect every state without waiting.
    ///
    /// Returns `None` if any step of the sequence would have to wait (an
    /// asynchronous source that is not ready yet). Sequences built only from
    /// actions known up front are always ready.
    ///
    /// # Example
    ///
    /// ```
    /// use futures::future;
    /// use reactive_reducer_core::{make_actions, make_promise_action, ActionSource};
    /// use reactive_reducer_runtime::{reduce, StateSequenceExt};
    ///
    /// let dispatcher = reduce(|count: &i64, by: i64| count * by, 1_i64);
    ///
    /// let ready: ActionSource<i64> = make_actions([2, 3]);
    /// assert_eq!(dispatcher.dispatch(ready).to_vec_now(), Some(Ok(vec![2, 6])));
    ///
    /// let never: ActionSource<i64> = make_promise_action(future::pending());
    /// assert_eq!(dispatcher.dispatch(never).to_vec_now(), None);
    /// ```
    fn to_vec_now(self) -> Option<Result<Vec<Self::Ok>, Self::Error>> {
        self.try_collect().now_or_never()
    }

    /// Collect the states that are available without waiting, then drop the
    /// sequence.
    ///
    /// Where [`to_vec_now`](Self::to_vec_now) gives up on a sequence that
    /// would wait, this keeps what was emitted before that point and cancels
    /// the rest.
    ///
    /// # Errors
    ///
    /// Fails with the first error, if it is reached before the sequence waits.
    ///
    /// # Example
    ///
    /// ```
    /// use futures::future;
    /// use reactive_reducer_core::{make_actions, make_promise_action, ActionSource};
    /// use reactive_reducer_runtime::{reduce, StateSequenceExt};
    ///
    /// let dispatcher = reduce(|count: &i64, by: i64| count * by, 1_i64);
    ///
    /// let source: ActionSource<i64> =
    ///     make_actions([2, 3]).chain(make_promise_action(future::pending()));
    /// assert_eq!(dispatcher.dispatch(source).ready_states(), Ok(vec![2, 6]));
    /// ```
    fn ready_states(self) -> Result<Vec<Self::Ok>, Self::Error> {
        let mut stream = pin!(self.into_stream());
        let mut states = Vec::new();

        while let Some(item) = stream.next().now_or_never().flatten() {
            states.push(item?);
        }
        Ok(states)
    }

    /// Resolve to the last state, or `None` if the sequence was empty.
    ///
    /// # Errors
    ///
    /// The returned future fails with the first error of the sequence.
    fn last_state(self) -> impl Future<Output = Result<Option<Self::Ok>, Self::Error>> {
        self.try_fold(None, |_, state| future::ready(Ok(Some(state))))
    }

    /// Call `f` with every state as it passes through.
    ///
    /// `f` is not called for errors, and never called again after one.
    fn on_state<F>(self, f: F) -> InspectOk<Self, F>
    where
        F: FnMut(&Self::Ok),
    {
        self.inspect_ok(f)
    }
}

impl<St> StateSequenceExt for St where St: TryStream + Sized {}
