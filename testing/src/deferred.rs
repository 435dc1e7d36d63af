//! Deferred values and streams for driving action sources in tests.
//!
//! [`manual`] produces a future whose outcome the test decides, plus a
//! [`DeferredHandle`] that settles it and reports whether the consumer ever
//! polled it or has already dropped it. That is enough to observe ordering
//! (was the next future polled yet?) and cancellation (was the pending
//! future discarded?).

use futures::future::{self, Ready};
use futures::stream::{self, Once, Stream};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, ready};
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors produced by [`ManualDeferred`] itself
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredError {
    /// The handle was dropped without resolving or rejecting
    #[error("Deferred value abandoned before settling")]
    Abandoned,
}

/// A future settled by hand through its [`DeferredHandle`]
#[derive(Debug)]
pub struct ManualDeferred<A, E> {
    receiver: oneshot::Receiver<Result<A, E>>,
    polled: Arc<AtomicBool>,
}

/// Settles a [`ManualDeferred`] and observes how it was consumed
#[derive(Debug)]
pub struct DeferredHandle<A, E> {
    sender: oneshot::Sender<Result<A, E>>,
    polled: Arc<AtomicBool>,
}

/// Create a deferred value and the handle that settles it.
///
/// # Example
///
/// ```
/// use futures::FutureExt;
/// use reactive_reducer_testing::{manual, TestError};
///
/// let (handle, deferred) = manual::<u32, TestError>();
/// assert!(!handle.was_polled());
///
/// assert!(handle.resolve(7));
/// assert_eq!(deferred.now_or_never(), Some(Ok(7)));
/// ```
#[must_use]
pub fn manual<A, E>() -> (DeferredHandle<A, E>, ManualDeferred<A, E>) {
    let (sender, receiver) = oneshot::channel();
    let polled = Arc::new(AtomicBool::new(false));

    (
        DeferredHandle {
            sender,
            polled: Arc::clone(&polled),
        },
        ManualDeferred { receiver, polled },
    )
}

impl<A, E> DeferredHandle<A, E> {
    /// Settle with an action. Returns `false` if the deferred was discarded.
    pub fn resolve(self, action: A) -> bool {
        self.sender.send(Ok(action)).is_ok()
    }

    /// Settle with a failure. Returns `false` if the deferred was discarded.
    pub fn reject(self, error: E) -> bool {
        self.sender.send(Err(error)).is_ok()
    }

    /// Whether the deferred has been polled at least once
    #[must_use]
    pub fn was_polled(&self) -> bool {
        self.polled.load(Ordering::SeqCst)
    }

    /// Whether the deferred has been dropped by its consumer
    #[must_use]
    pub fn is_discarded(&self) -> bool {
        self.sender.is_closed()
    }

    /// Wait until the consumer drops the deferred
    pub async fn discarded(&mut self) {
        self.sender.closed().await;
    }
}

impl<A, E> Future for ManualDeferred<A, E>
where
    E: From<DeferredError>,
{
    type Output = Result<A, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.polled.store(true, Ordering::SeqCst);

        match ready!(Pin::new(&mut self.receiver).poll(cx)) {
            Ok(result) => Poll::Ready(result),
            Err(_) => Poll::Ready(Err(DeferredError::Abandoned.into())),
        }
    }
}

/// A future already resolved to `action`
#[must_use]
pub fn deferred<A, E>(action: A) -> Ready<Result<A, E>> {
    future::ready(Ok(action))
}

/// A future already rejected with `error`
#[must_use]
pub fn rejected<A, E>(error: E) -> Ready<Result<A, E>> {
    future::ready(Err(error))
}

/// A stream yielding `action` once and then completing
#[must_use]
pub fn stream_of<A, E>(action: A) -> Once<Ready<Result<A, E>>> {
    stream::once(future::ready(Ok(action)))
}

/// A stream yielding each of `actions`, handing control back to the runtime
/// before every item.
///
/// Unlike [`stream_of`], such a stream is never ready on its first poll.
pub fn yielding<A, E>(actions: Vec<A>) -> impl Stream<Item = Result<A, E>> + Send + 'static
where
    A: Send + 'static,
    E: Send + 'static,
{
    stream::unfold(actions.into_iter(), |mut remaining| async move {
        tokio::task::yield_now().await;
        remaining.next().map(|action| (Ok(action), remaining))
    })
}
