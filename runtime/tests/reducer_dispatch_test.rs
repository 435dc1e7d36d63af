//! Integration tests for dispatching action sources through a reducer
//!
//! Covers every action source shape, the running-fold contract, ordering of
//! asynchronous sources, failure propagation and cancellation.

#![allow(clippy::unwrap_used)] // Tests can unwrap

use futures::{stream, FutureExt, Stream, StreamExt};
use reactive_reducer_core::{
    make_action, make_actions, make_async_action, make_async_actions, make_promise_action,
    make_promise_actions, ActionSource,
};
use reactive_reducer_runtime::{reduce, try_reduce, StateSequenceExt};
use reactive_reducer_testing::{
    counter_reducer, deferred, fallible_counter_reducer, init_tracing, manual, rejected, stream_of,
    yielding, CounterAction, CounterState, TestError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_test::{assert_pending, assert_ready_eq, task};

fn identity<S: Clone>(state: &S, _action: S) -> S {
    state.clone()
}

mod sources {
    use super::*;

    #[test]
    fn make_action_creates_a_synchronous_action() {
        init_tracing();
        let action = "TEST".to_string();
        let dispatch = reduce(identity::<String>, action.clone());

        let source: ActionSource<String> = make_action(action.clone());
        let states = dispatch.dispatch(source).to_vec_now().unwrap().unwrap();

        assert_eq!(states, vec![action]);
    }

    #[tokio::test]
    async fn make_async_action_creates_an_action_from_a_stream() {
        init_tracing();
        let action = "TEST".to_string();
        let dispatch = reduce(identity::<String>, action.clone());

        let result = dispatch
            .dispatch(make_async_action(stream_of::<_, TestError>(action.clone())))
            .last_state()
            .await;

        assert_eq!(result, Ok(Some(action)));
    }

    #[tokio::test]
    async fn make_promise_action_creates_an_action_from_a_future() {
        init_tracing();
        let action = "TEST".to_string();
        let dispatch = reduce(identity::<String>, action.clone());

        let result = dispatch
            .dispatch(make_promise_action(deferred::<_, TestError>(action.clone())))
            .last_state()
            .await;

        assert_eq!(result, Ok(Some(action)));
    }
}

mod reduce_tests {
    use super::*;

    #[test]
    fn handles_a_synchronous_action() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));
        let source: ActionSource<CounterAction> = make_action(CounterAction::Increment);

        let states = dispatch.dispatch(source).to_vec_now();

        assert_eq!(states, Some(Ok(vec![CounterState::new(2)])));
    }

    #[tokio::test]
    async fn handles_an_async_action() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));

        let result = dispatch
            .dispatch(make_async_action(stream_of::<_, TestError>(CounterAction::Double)))
            .last_state()
            .await;

        assert_eq!(result, Ok(Some(CounterState::new(2))));
    }

    #[tokio::test]
    async fn handles_a_promised_action() {
        let dispatch = reduce(counter_reducer, CounterState::new(2));

        let result = dispatch
            .dispatch(make_promise_action(deferred::<_, TestError>(CounterAction::Square)))
            .last_state()
            .await;

        assert_eq!(result, Ok(Some(CounterState::new(4))));
    }

    #[test]
    fn handles_multiple_actions() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));
        let source: ActionSource<CounterAction> = make_actions([CounterAction::Increment; 3]);

        let states = dispatch.dispatch(source).to_vec_now();

        assert_eq!(
            states,
            Some(Ok(vec![
                CounterState::new(2),
                CounterState::new(3),
                CounterState::new(4),
            ]))
        );
    }

    #[test]
    fn handles_multiple_async_actions_synchronously() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));

        let states = dispatch
            .dispatch(make_async_actions(vec![
                stream_of::<_, TestError>(CounterAction::Double),
                stream_of(CounterAction::Double),
                stream_of(CounterAction::Double),
            ]))
            .to_vec_now();

        assert_eq!(
            states,
            Some(Ok(vec![
                CounterState::new(2),
                CounterState::new(4),
                CounterState::new(8),
            ]))
        );
    }

    #[tokio::test]
    async fn handles_multiple_async_actions_in_source_order() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));
        let mut seen = Vec::new();

        let source = make_async_actions(vec![
            yielding::<_, TestError>(vec![CounterAction::Double, CounterAction::Double]),
            yielding(vec![CounterAction::Double]),
        ]);
        let result = dispatch
            .dispatch(source)
            .on_state(|state| seen.push(*state))
            .last_state()
            .await;

        assert_eq!(result, Ok(Some(CounterState::new(8))));
        assert_eq!(
            seen,
            vec![CounterState::new(2), CounterState::new(4), CounterState::new(8)]
        );
    }

    #[test]
    fn handles_multiple_promised_actions_synchronously() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));

        let states = dispatch
            .dispatch(make_promise_actions(vec![
                deferred::<_, TestError>(CounterAction::Square),
                deferred(CounterAction::Square),
                deferred(CounterAction::Square),
            ]))
            .to_vec_now();

        // 1 squared stays 1
        assert_eq!(
            states,
            Some(Ok(vec![
                CounterState::new(1),
                CounterState::new(1),
                CounterState::new(1),
            ]))
        );
    }

    #[tokio::test]
    async fn handles_multiple_promised_actions_one_after_another() {
        let dispatch = reduce(counter_reducer, CounterState::new(2));
        let mut seen = Vec::new();

        let result = dispatch
            .dispatch(make_promise_actions(vec![
                deferred::<_, TestError>(CounterAction::Square),
                deferred(CounterAction::Square),
                deferred(CounterAction::Square),
            ]))
            .on_state(|state| seen.push(*state))
            .last_state()
            .await;

        assert_eq!(result, Ok(Some(CounterState::new(256))));
        assert_eq!(
            seen,
            vec![CounterState::new(4), CounterState::new(16), CounterState::new(256)]
        );
    }

    #[test]
    fn empty_source_yields_empty_sequence() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));
        let source: ActionSource<CounterAction> = make_actions([]);

        assert_eq!(dispatch.dispatch(source).to_vec_now(), Some(Ok(vec![])));
    }

    #[tokio::test]
    async fn empty_source_has_no_last_state() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));
        let source: ActionSource<CounterAction> = ActionSource::empty();

        assert_eq!(dispatch.dispatch(source).last_state().await, Ok(None));
    }

    #[test]
    fn dispatcher_is_reusable_and_restarts_each_run() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));

        for _ in 0..3 {
            let source: ActionSource<CounterAction> = make_actions([CounterAction::Double; 2]);
            assert_eq!(
                dispatch.dispatch(source).to_vec_now(),
                Some(Ok(vec![CounterState::new(2), CounterState::new(4)]))
            );
        }
    }

    #[test]
    fn last_state_can_seed_the_next_run() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));

        let first: ActionSource<CounterAction> = make_action(CounterAction::Double);
        let states = dispatch.dispatch(first).to_vec_now().unwrap().unwrap();
        let last = *states.last().unwrap();

        let second: ActionSource<CounterAction> = make_action(CounterAction::Double);
        assert_eq!(
            dispatch.dispatch_from(last, second).to_vec_now(),
            Some(Ok(vec![CounterState::new(4)]))
        );
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn rejected_promise_fails_the_sequence() {
        init_tracing();
        let dispatch = reduce(counter_reducer, CounterState::new(2));
        let error = TestError::Rejected("no action".to_string());

        let result = dispatch
            .dispatch(make_promise_action(rejected::<CounterAction, _>(error.clone())))
            .last_state()
            .await;

        assert_eq!(result, Err(error));
    }

    #[test]
    fn rejection_midway_stops_further_states() {
        let dispatch = reduce(counter_reducer, CounterState::new(2));
        let polled_after = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&polled_after);

        let source = make_promise_actions(vec![
            deferred(CounterAction::Square).boxed(),
            rejected(TestError::Rejected("second".to_string())).boxed(),
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(CounterAction::Square)
            }
            .boxed(),
        ]);

        let mut states = task::spawn(dispatch.dispatch(source));

        assert_ready_eq!(states.poll_next(), Some(Ok(CounterState::new(4))));
        assert_ready_eq!(
            states.poll_next(),
            Some(Err(TestError::Rejected("second".to_string())))
        );
        assert_ready_eq!(states.poll_next(), None);
        assert_eq!(polled_after.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failing_stream_fails_the_sequence() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));
        let upstream = stream::iter(vec![
            Ok(CounterAction::Increment),
            Err(TestError::Rejected("stream".to_string())),
            Ok(CounterAction::Increment),
        ]);

        let states = dispatch.dispatch(make_async_action(upstream)).to_vec_now();

        assert_eq!(states, Some(Err(TestError::Rejected("stream".to_string()))));
    }

    #[tokio::test]
    async fn asynchronous_stream_failure_keeps_earlier_states() {
        let dispatch = reduce(counter_reducer, CounterState::new(3));
        let upstream = async_stream::stream! {
            yield Ok(CounterAction::Increment);
            tokio::task::yield_now().await;
            yield Err(TestError::Rejected("late".to_string()));
            yield Ok(CounterAction::Increment);
        };
        let mut seen = Vec::new();

        let result = dispatch
            .dispatch(make_async_action(upstream))
            .on_state(|state| seen.push(*state))
            .last_state()
            .await;

        assert_eq!(result, Err(TestError::Rejected("late".to_string())));
        assert_eq!(seen, vec![CounterState::new(4)]);
    }

    #[test]
    fn failing_source_in_batch_skips_later_sources() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));
        let mut seen = Vec::new();

        let source = make_async_actions(vec![
            make_actions([CounterAction::Double]),
            ActionSource::fail(TestError::Rejected("middle".to_string())),
            make_actions([CounterAction::Double]),
        ]);
        let result = dispatch
            .dispatch(source)
            .on_state(|state| seen.push(*state))
            .to_vec_now();

        assert_eq!(result, Some(Err(TestError::Rejected("middle".to_string()))));
        assert_eq!(seen, vec![CounterState::new(2)]);
    }

    #[test]
    fn reducer_failure_releases_the_rest_of_the_source() {
        let (later, later_deferred) = manual::<CounterAction, TestError>();
        let dispatch = try_reduce(fallible_counter_reducer, CounterState::new(i64::MAX));

        let source = make_async_actions(vec![
            make_actions([CounterAction::Increment]),
            make_promise_action(later_deferred),
        ]);
        let mut states = task::spawn(dispatch.dispatch(source));

        assert_ready_eq!(
            states.poll_next(),
            Some(Err(TestError::Overflow {
                count: i64::MAX,
                action: CounterAction::Increment,
            }))
        );
        // The sequence is still alive, but its source is already gone
        assert!(later.is_discarded());
        assert!(!later.was_polled());
        assert_ready_eq!(states.poll_next(), None);
    }

    #[test]
    fn source_failure_releases_later_sources() {
        let (later, later_deferred) = manual::<CounterAction, TestError>();
        let dispatch = reduce(counter_reducer, CounterState::new(1));

        let source = make_async_actions(vec![
            ActionSource::fail(TestError::Rejected("first".to_string())),
            make_promise_action(later_deferred),
        ]);
        let mut states = task::spawn(dispatch.dispatch(source));

        assert_ready_eq!(
            states.poll_next(),
            Some(Err(TestError::Rejected("first".to_string())))
        );
        assert!(later.is_discarded());
        assert!(!later.was_polled());
    }

    #[test]
    fn size_hint_never_promises_more_than_an_early_error_delivers() {
        let dispatch = reduce(counter_reducer, CounterState::new(1));
        let upstream = stream::iter(vec![
            Ok(CounterAction::Increment),
            Err(TestError::Rejected("early".to_string())),
            Ok(CounterAction::Increment),
            Ok(CounterAction::Increment),
        ]);

        let states = dispatch.dispatch(make_async_action(upstream));
        let (lower, _) = states.size_hint();
        let yielded = tokio_test::block_on(states.collect::<Vec<_>>());

        assert_eq!(yielded.len(), 2);
        assert!(lower <= yielded.len());
    }

    #[test]
    fn reducer_failure_fails_the_sequence() {
        let dispatch = try_reduce(fallible_counter_reducer, CounterState::new(i64::MAX / 2 + 1));

        let states = dispatch
            .dispatch(make_actions([CounterAction::Increment, CounterAction::Double]))
            .to_vec_now();

        assert_eq!(
            states,
            Some(Err(TestError::Overflow {
                count: i64::MAX / 2 + 2,
                action: CounterAction::Double,
            }))
        );
    }
}

mod scheduling {
    use super::*;

    #[test]
    fn ready_states_returns_what_came_before_a_pending_promise() {
        let (pending, pending_deferred) = manual::<CounterAction, TestError>();
        let dispatch = reduce(counter_reducer, CounterState::new(2));

        let source = make_actions([CounterAction::Square, CounterAction::Increment])
            .chain(make_promise_action(pending_deferred));
        let states = dispatch.dispatch(source).ready_states();

        assert_eq!(states, Ok(vec![CounterState::new(4), CounterState::new(5)]));
        assert!(pending.was_polled());
        assert!(pending.is_discarded());
    }

    #[test]
    fn nothing_runs_before_the_sequence_is_polled() {
        let (handle, pending) = manual::<CounterAction, TestError>();
        let dispatch = reduce(counter_reducer, CounterState::new(1));

        let states = dispatch.dispatch(make_promise_action(pending));
        assert!(!handle.was_polled());

        let mut states = task::spawn(states);
        assert_pending!(states.poll_next());
        assert!(handle.was_polled());
    }

    #[test]
    fn later_promises_wait_for_earlier_ones() {
        let (first, first_deferred) = manual::<CounterAction, TestError>();
        let (second, second_deferred) = manual::<CounterAction, TestError>();
        let dispatch = reduce(counter_reducer, CounterState::new(2));

        let mut states =
            task::spawn(dispatch.dispatch(make_promise_actions(vec![first_deferred, second_deferred])));

        assert_pending!(states.poll_next());
        assert!(first.was_polled());
        assert!(!second.was_polled());

        // Settling the second first changes nothing: the first is still awaited.
        assert!(second.resolve(CounterAction::Increment));
        assert_pending!(states.poll_next());

        assert!(first.resolve(CounterAction::Square));
        assert_ready_eq!(states.poll_next(), Some(Ok(CounterState::new(4))));
        assert_ready_eq!(states.poll_next(), Some(Ok(CounterState::new(5))));
        assert_ready_eq!(states.poll_next(), None);
    }

    #[test]
    fn later_streams_wait_for_earlier_ones_to_complete() {
        let (first, first_deferred) = manual::<CounterAction, TestError>();
        let dispatch = reduce(counter_reducer, CounterState::new(1));

        let source = make_async_actions(vec![
            make_promise_action(first_deferred),
            make_actions([CounterAction::Increment]),
        ]);
        let mut states = task::spawn(dispatch.dispatch(source));

        assert_pending!(states.poll_next());

        assert!(first.resolve(CounterAction::Double));
        assert_ready_eq!(states.poll_next(), Some(Ok(CounterState::new(2))));
        assert_ready_eq!(states.poll_next(), Some(Ok(CounterState::new(3))));
        assert_ready_eq!(states.poll_next(), None);
    }

    #[test]
    fn dropping_the_sequence_discards_pending_promises() {
        let (pending, pending_deferred) = manual::<CounterAction, TestError>();
        let (queued, queued_deferred) = manual::<CounterAction, TestError>();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let dispatch = reduce(
            move |state: &CounterState, action: CounterAction| {
                counter.fetch_add(1, Ordering::SeqCst);
                counter_reducer(state, action)
            },
            CounterState::new(1),
        );

        let source = make_promise_actions(vec![
            deferred(CounterAction::Increment).boxed(),
            pending_deferred.boxed(),
            queued_deferred.boxed(),
        ]);
        let mut states = task::spawn(dispatch.dispatch(source));

        assert_ready_eq!(states.poll_next(), Some(Ok(CounterState::new(2))));
        assert_pending!(states.poll_next());
        assert!(!pending.is_discarded());

        drop(states);

        assert!(pending.is_discarded());
        assert!(queued.is_discarded());
        assert!(!queued.was_polled());
        assert!(!pending.resolve(CounterAction::Increment));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropping_the_sequence_is_seen_by_an_awaiting_producer() {
        let (mut handle, pending) = manual::<CounterAction, TestError>();
        let dispatch = reduce(counter_reducer, CounterState::new(1));

        let mut states = task::spawn(dispatch.dispatch(make_promise_action(pending)));
        assert_pending!(states.poll_next());

        let watcher = tokio::spawn(async move {
            handle.discarded().await;
            handle.is_discarded()
        });

        drop(states);
        assert!(watcher.await.unwrap());
    }
}

mod harness {
    use super::*;
    use reactive_reducer_core::contramap;
    use reactive_reducer_testing::DispatchTest;

    #[tokio::test]
    async fn asynchronous_sources_through_the_fluent_harness() {
        DispatchTest::<_, _, _, TestError>::new(reduce(counter_reducer, CounterState::new(1)))
            .when_source(make_async_actions(vec![
                make_async_action(yielding(vec![CounterAction::Double, CounterAction::Double])),
                make_promise_action(deferred(CounterAction::Increment)),
            ]))
            .then_states(|states| {
                assert_eq!(
                    states,
                    [CounterState::new(2), CounterState::new(4), CounterState::new(5)]
                );
            })
            .then_error(|error| assert!(error.is_none()))
            .run()
            .await;
    }

    #[tokio::test]
    async fn failure_midway_through_the_fluent_harness() {
        DispatchTest::new(reduce(counter_reducer, CounterState::new(3)))
            .given_state(CounterState::new(2))
            .when_source(make_promise_actions(vec![
                deferred(CounterAction::Square).boxed(),
                rejected(TestError::Rejected("midway".to_string())).boxed(),
                deferred(CounterAction::Square).boxed(),
            ]))
            .then_states(|states| assert_eq!(states, [CounterState::new(4)]))
            .then_error(|error| {
                assert_eq!(error, Some(&TestError::Rejected("midway".to_string())));
            })
            .run()
            .await;
    }

    #[tokio::test]
    async fn mapped_actions_feed_the_same_reducer() {
        let steps_to_actions = |step: u8| match step {
            0 => CounterAction::Increment,
            1 => CounterAction::Double,
            _ => CounterAction::Square,
        };

        DispatchTest::<_, _, _, TestError>::new(reduce(
            contramap(counter_reducer, steps_to_actions),
            CounterState::new(1),
        ))
        .when_actions([0_u8, 1, 2])
        .then_states(|states| {
            assert_eq!(
                states,
                [CounterState::new(2), CounterState::new(4), CounterState::new(16)]
            );
        })
        .run()
        .await;
    }
}
