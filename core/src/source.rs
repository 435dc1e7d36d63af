//! Action sources
//!
//! An [`ActionSource`] is a lazy, single-consumer stream of actions. Every way
//! of producing actions (a value known up front, a stream, a deferred value,
//! or a collection of any of those) is normalized into this one type before it
//! reaches a dispatcher.
//!
//! Sources are pull-driven: nothing runs until the consumer polls. A source
//! that fails yields its error once and then ends, so a consumer never sees an
//! action after an error.
//!
//! # Ordering
//!
//! The collection constructors ([`make_actions`], [`make_async_actions`],
//! [`make_promise_actions`]) emit in collection order. Streams and futures
//! are drained one at a time: entry `n + 1` is not polled until entry `n`
//! has completed.
//!
//! # Example
//!
//! ```
//! use futures::{executor::block_on, stream, TryStreamExt};
//! use reactive_reducer_core::source::{make_async_actions, ActionSource};
//!
//! let source: ActionSource<u32> = make_async_actions(vec![
//!     stream::iter(vec![Ok(1), Ok(2)]),
//!     stream::iter(vec![Ok(3)]),
//! ]);
//!
//! assert_eq!(block_on(source.try_collect::<Vec<_>>()), Ok(vec![1, 2, 3]));
//! ```

use futures::stream::{self, BoxStream, FusedStream, Stream, StreamExt};
use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

/// A lazy stream of actions that ends after its first error.
///
/// # Type Parameters
///
/// - `A`: The action type
/// - `E`: The error a failing source yields; [`Infallible`] for sources that
///   cannot fail
pub struct ActionSource<A, E = Infallible> {
    // `None` once the source has completed or failed
    inner: Option<BoxStream<'static, Result<A, E>>>,
}

impl<A, E> ActionSource<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
{
    /// Wrap any fallible stream as an action source.
    ///
    /// This is the building block behind every `make_*` constructor.
    #[must_use]
    pub fn new<St>(stream: St) -> Self
    where
        St: Stream<Item = Result<A, E>> + Send + 'static,
    {
        Self {
            inner: Some(stream.boxed()),
        }
    }

    /// A source that completes without emitting anything.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(stream::empty())
    }

    /// A source that fails with `error` on the first poll.
    #[must_use]
    pub fn fail(error: E) -> Self {
        Self::new(stream::once(async move { Err(error) }))
    }

    /// Adapt a stream of plain actions, which cannot fail.
    #[must_use]
    pub fn from_values<St>(stream: St) -> Self
    where
        St: Stream<Item = A> + Send + 'static,
    {
        Self::new(stream.map(Ok))
    }

    /// Append `next` after this source has completed.
    ///
    /// `next` is not polled until `self` has completed. If `self` fails,
    /// `next` is never polled.
    #[must_use]
    pub fn chain(self, next: Self) -> Self {
        make_async_actions([self, next])
    }
}

impl<A, E> Stream for ActionSource<A, E> {
    type Item = Result<A, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(inner) = self.inner.as_mut() else {
            return Poll::Ready(None);
        };

        let item = ready!(inner.poll_next_unpin(cx));
        if !matches!(item, Some(Ok(_))) {
            // Release whatever is still pending upstream
            self.inner = None;
        }
        Poll::Ready(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            // An early error can cut the upstream short after one item
            Some(inner) => {
                let (lower, upper) = inner.size_hint();
                (lower.min(1), upper)
            },
            None => (0, Some(0)),
        }
    }
}

impl<A, E> FusedStream for ActionSource<A, E> {
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

impl<A, E> fmt::Debug for ActionSource<A, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSource")
            .field("terminated", &self.inner.is_none())
            .finish_non_exhaustive()
    }
}

/// Create a source that emits `action` on the first poll and then completes.
///
/// # Examples
///
/// ```
/// use futures::{FutureExt, StreamExt};
/// use reactive_reducer_core::source::{make_action, ActionSource};
///
/// let mut source: ActionSource<&str> = make_action("increment");
///
/// assert_eq!(source.next().now_or_never(), Some(Some(Ok("increment"))));
/// assert_eq!(source.next().now_or_never(), Some(None));
/// ```
#[must_use]
pub fn make_action<A, E>(action: A) -> ActionSource<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
{
    ActionSource::new(stream::iter([Ok(action)]))
}

/// Create a source that forwards every item of `source` unchanged.
///
/// The source completes when `source` completes, and ends right after
/// forwarding an error.
#[must_use]
pub fn make_async_action<A, E, St>(source: St) -> ActionSource<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
    St: Stream<Item = Result<A, E>> + Send + 'static,
{
    ActionSource::new(source)
}

/// Create a source that emits the action `deferred` resolves to.
///
/// `deferred` is first polled when the source is. If it resolves to
/// `Err(error)` the source yields that error and no action.
#[must_use]
pub fn make_promise_action<A, E, F>(deferred: F) -> ActionSource<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
    F: Future<Output = Result<A, E>> + Send + 'static,
{
    ActionSource::new(stream::once(deferred))
}

/// Create a source that emits each of `actions` in order.
///
/// The collection is materialized up front, so every action is ready on the
/// first poll.
#[must_use]
pub fn make_actions<A, E, I>(actions: I) -> ActionSource<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
    I: IntoIterator<Item = A>,
{
    let actions: Vec<A> = actions.into_iter().collect();
    ActionSource::new(stream::iter(actions.into_iter().map(Ok)))
}

/// Concatenate `sources`, draining each one to completion before the next.
///
/// This is a sequential concatenation, not a merge: the second stream is not
/// polled until the first has completed, even if the second already has
/// actions available. The first error ends the combined source.
///
/// # Examples
///
/// ```
/// use futures::{executor::block_on, stream, TryStreamExt};
/// use reactive_reducer_core::source::make_async_actions;
///
/// let source = make_async_actions(vec![
///     stream::iter(vec![Ok("a"), Err("boom")]),
///     stream::iter(vec![Ok("never")]),
/// ]);
///
/// assert_eq!(block_on(source.try_collect::<Vec<_>>()), Err("boom"));
/// ```
#[must_use]
pub fn make_async_actions<A, E, St, I>(sources: I) -> ActionSource<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
    St: Stream<Item = Result<A, E>> + Send + 'static,
    I: IntoIterator<Item = St>,
{
    let sources: Vec<St> = sources.into_iter().collect();
    ActionSource::new(stream::iter(sources).flatten())
}

/// Await each of `deferreds` in order, emitting each resolved action before
/// polling the next future.
///
/// The first failure ends the source; the remaining futures are dropped
/// without being polled.
///
/// # Examples
///
/// ```
/// use futures::{executor::block_on, future, TryStreamExt};
/// use reactive_reducer_core::source::make_promise_actions;
///
/// let source = make_promise_actions(vec![
///     future::ready(Ok::<_, String>(1)),
///     future::ready(Ok(2)),
/// ]);
///
/// assert_eq!(block_on(source.try_collect::<Vec<_>>()), Ok(vec![1, 2]));
/// ```
#[must_use]
pub fn make_promise_actions<A, E, F, I>(deferreds: I) -> ActionSource<A, E>
where
    A: Send + 'static,
    E: Send + 'static,
    F: Future<Output = Result<A, E>> + Send + 'static,
    I: IntoIterator<Item = F>,
{
    let deferreds: Vec<F> = deferreds.into_iter().collect();
    ActionSource::new(stream::iter(deferreds).then(|deferred| deferred))
}
