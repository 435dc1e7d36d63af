//! The dispatcher: folds an action source into a sequence of states.
//!
//! [`reduce`] binds a reducer and an initial state into a [`Dispatcher`].
//! Each call to [`Dispatcher::dispatch`] starts an independent running fold
//! over one [`ActionSource`] and returns it as a [`StateSequence`]: one state
//! per action, in emission order, starting from the initial state every time.
//!
//! ```text
//! action source ──► Dispatcher::dispatch ──► state sequence
//!   a1, a2, a3          s := r(s, a)          s1, s2, s3
//! ```
//!
//! The fold step runs synchronously inside `poll_next`; the sequence only
//! suspends while its source does. Dropping the sequence drops the source
//! with it, which cancels any pending stream or future upstream.

use crate::config::DispatcherConfig;
use futures::stream::{FusedStream, Stream, StreamExt};
use reactive_reducer_core::{ActionSource, Total, TryReducer};
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

/// Create a dispatcher for an infallible reducer.
///
/// The returned [`Dispatcher`] holds `reducer` for its whole lifetime and
/// restarts from `initial_state` on every [`dispatch`](Dispatcher::dispatch).
///
/// # Example
///
/// ```
/// use reactive_reducer_core::{make_actions, ActionSource};
/// use reactive_reducer_runtime::{reduce, StateSequenceExt};
///
/// let dispatcher = reduce(|count: &i64, by: i64| count + by, 1_i64);
///
/// let source: ActionSource<i64> = make_actions([1, 1, 1]);
/// let states = dispatcher.dispatch(source).to_vec_now();
///
/// assert_eq!(states, Some(Ok(vec![2, 3, 4])));
/// ```
#[must_use]
pub fn reduce<R, S>(reducer: R, initial_state: S) -> Dispatcher<Total<R>, S> {
    Dispatcher::new(Total::new(reducer), initial_state)
}

/// Create a dispatcher for a reducer that may fail.
///
/// A reducer error ends the state sequence with that error, exactly like a
/// failure of the action source.
///
/// # Example
///
/// ```
/// use reactive_reducer_core::make_actions;
/// use reactive_reducer_runtime::{try_reduce, StateSequenceExt};
///
/// let dispatcher = try_reduce(
///     |count: &u8, by: u8| count.checked_add(by).ok_or("overflow"),
///     250_u8,
/// );
///
/// let states = dispatcher.dispatch(make_actions([4, 4, 4])).to_vec_now();
/// assert_eq!(states, Some(Err("overflow")));
/// ```
#[must_use]
pub fn try_reduce<R, S>(reducer: R, initial_state: S) -> Dispatcher<R, S> {
    Dispatcher::new(reducer, initial_state)
}

/// A reusable fold of action sources, bound to a reducer and an initial state.
///
/// Dispatchers keep no state between runs: every [`dispatch`](Self::dispatch)
/// starts from the initial state, however many times the dispatcher has been
/// used before. Cloning is cheap; clones share the reducer.
pub struct Dispatcher<R, S> {
    reducer: Arc<R>,
    initial_state: S,
    config: DispatcherConfig,
}

impl<R, S> Dispatcher<R, S> {
    /// Create a dispatcher with the default configuration
    #[must_use]
    pub fn new(reducer: R, initial_state: S) -> Self {
        Self {
            reducer: Arc::new(reducer),
            initial_state,
            config: DispatcherConfig::default(),
        }
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration in use
    #[must_use]
    pub const fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The state every fold starts from
    #[must_use]
    pub const fn initial_state(&self) -> &S {
        &self.initial_state
    }

    /// The reducer applied at every fold step
    #[must_use]
    pub fn reducer(&self) -> &R {
        &self.reducer
    }

    /// Fold `source` from the initial state.
    ///
    /// The returned sequence yields `reducer(state, action)` for every action,
    /// completes when `source` completes, and yields the first error from
    /// either `source` or the reducer before ending. An empty source gives an
    /// empty sequence: the initial state itself is never emitted.
    #[must_use]
    pub fn dispatch<A, E>(&self, source: ActionSource<A, E>) -> StateSequence<S, A, E>
    where
        R: TryReducer<S, A, E> + Send + Sync + 'static,
        S: Clone,
    {
        self.dispatch_from(self.initial_state.clone(), source)
    }

    /// Fold `source` starting from `state` instead of the initial state.
    ///
    /// Use this to continue from the last state of an earlier run.
    #[must_use]
    pub fn dispatch_from<A, E>(&self, state: S, source: ActionSource<A, E>) -> StateSequence<S, A, E>
    where
        R: TryReducer<S, A, E> + Send + Sync + 'static,
    {
        let reducer: Arc<dyn TryReducer<S, A, E> + Send + Sync> = self.reducer.clone();
        StateSequence::new(reducer, state, source, self.config)
    }
}

impl<R, S: Clone> Clone for Dispatcher<R, S> {
    fn clone(&self) -> Self {
        Self {
            reducer: Arc::clone(&self.reducer),
            initial_state: self.initial_state.clone(),
            config: self.config,
        }
    }
}

impl<R, S: fmt::Debug> fmt::Debug for Dispatcher<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("initial_state", &self.initial_state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// How a state sequence ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed,
    SourceFailed,
    ReducerFailed,
}

impl Outcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::SourceFailed => "source_failed",
            Self::ReducerFailed => "reducer_failed",
        }
    }
}

/// The running fold of one action source.
///
/// Created by [`Dispatcher::dispatch`]. Yields `Ok(state)` once per action
/// and at most one `Err`, after which it is terminated.
pub struct StateSequence<S, A, E> {
    source: Option<ActionSource<A, E>>,
    reducer: Arc<dyn TryReducer<S, A, E> + Send + Sync>,
    state: S,
    emitted: usize,
    config: DispatcherConfig,
    span: tracing::Span,
}

impl<S, A, E> StateSequence<S, A, E> {
    fn new(
        reducer: Arc<dyn TryReducer<S, A, E> + Send + Sync>,
        state: S,
        source: ActionSource<A, E>,
        config: DispatcherConfig,
    ) -> Self {
        let span = tracing::debug_span!("dispatch", dispatcher = config.name);
        span.in_scope(|| tracing::trace!("Starting fold"));

        Self {
            source: Some(source),
            reducer,
            state,
            emitted: 0,
            config,
            span,
        }
    }

    /// Number of states yielded so far
    #[must_use]
    pub const fn emitted(&self) -> usize {
        self.emitted
    }

    /// The most recent state, or the starting state if nothing was reduced yet
    #[must_use]
    pub const fn current_state(&self) -> &S {
        &self.state
    }

    fn finish(&mut self, outcome: Outcome) {
        // Dropping the source stops everything upstream
        self.source = None;

        match outcome {
            Outcome::Completed => {
                tracing::debug!(emitted = self.emitted, "State sequence completed");
            },
            Outcome::SourceFailed => {
                tracing::warn!(emitted = self.emitted, "Action source failed");
            },
            Outcome::ReducerFailed => {
                tracing::warn!(emitted = self.emitted, "Reducer failed");
            },
        }

        if self.config.record_metrics {
            let name = self.config.name;
            if outcome == Outcome::Completed {
                metrics::counter!("dispatch.sequences.completed", "dispatcher" => name).increment(1);
            } else {
                metrics::counter!(
                    "dispatch.sequences.failed",
                    "dispatcher" => name,
                    "reason" => outcome.as_str()
                )
                .increment(1);
            }
        }
    }
}

// The state is never pinned; it is only read by reference and replaced.
impl<S, A, E> Unpin for StateSequence<S, A, E> {}

impl<S, A, E> Stream for StateSequence<S, A, E>
where
    S: Clone,
{
    type Item = Result<S, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let span = this.span.clone();
        let _enter = span.enter();

        let Some(source) = this.source.as_mut() else {
            return Poll::Ready(None);
        };

        match ready!(source.poll_next_unpin(cx)) {
            Some(Ok(action)) => match this.reducer.try_reduce(&this.state, action) {
                Ok(next) => {
                    this.state = next;
                    this.emitted += 1;
                    tracing::trace!(emitted = this.emitted, "Reduced action");
                    if this.config.record_metrics {
                        metrics::counter!("dispatch.actions.reduced", "dispatcher" => this.config.name)
                            .increment(1);
                    }
                    Poll::Ready(Some(Ok(this.state.clone())))
                },
                Err(error) => {
                    this.finish(Outcome::ReducerFailed);
                    Poll::Ready(Some(Err(error)))
                },
            },
            Some(Err(error)) => {
                this.finish(Outcome::SourceFailed);
                Poll::Ready(Some(Err(error)))
            },
            None => {
                this.finish(Outcome::Completed);
                Poll::Ready(None)
            },
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.source {
            // The source already allows for an early error; a reducer
            // error can only end the sequence on an item it would yield
            Some(source) => source.size_hint(),
            None => (0, Some(0)),
        }
    }
}

impl<S, A, E> FusedStream for StateSequence<S, A, E>
where
    S: Clone,
{
    fn is_terminated(&self) -> bool {
        self.source.is_none()
    }
}

impl<S, A, E> Drop for StateSequence<S, A, E> {
    fn drop(&mut self) {
        if self.source.is_some() {
            tracing::trace!(
                parent: &self.span,
                emitted = self.emitted,
                "State sequence dropped before completion"
            );
        }
    }
}

impl<S: fmt::Debug, A, E> fmt::Debug for StateSequence<S, A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSequence")
            .field("state", &self.state)
            .field("emitted", &self.emitted)
            .field("terminated", &self.source.is_none())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
