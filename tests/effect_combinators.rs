//! Asynchronous effect combinators against a live tokio runtime.

mod common;

use std::time::Duration;

use common::*;
use effectloop::effect::{CancelToken, Effect};

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Done(u32),
    TimedOut,
}

#[tokio::test]
async fn task_dispatches_its_output() {
    let (dispatch, seen) = recorder();
    Effect::task(async { 21u32 * 2 }, Outcome::Done).run(dispatch);

    wait_for_len(&seen, 1).await;
    assert_eq!(*seen.lock(), vec![Outcome::Done(42)]);
}

#[tokio::test]
async fn fire_and_forget_task_dispatches_nothing() {
    let (dispatch, seen) = recorder::<Outcome>();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();
    Effect::task_(async move { done_tx.send(()) }).run(dispatch);

    done_rx.await.unwrap();
    assert!(seen.lock().is_empty());
}

#[test]
fn task_outside_a_runtime_is_dropped() {
    let (dispatch, seen) = recorder();
    Effect::task(async { 1u32 }, Outcome::Done).run(dispatch);
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn timeout_dispatches_fallback_when_future_is_slow() {
    let (dispatch, seen) = recorder();
    Effect::timeout(
        Duration::from_millis(20),
        async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            1u32
        },
        Outcome::Done,
        || Outcome::TimedOut,
    )
    .run(dispatch);

    wait_for_len(&seen, 1).await;
    assert_eq!(*seen.lock(), vec![Outcome::TimedOut]);
}

#[tokio::test]
async fn timeout_passes_fast_results_through() {
    let (dispatch, seen) = recorder();
    Effect::timeout(Duration::from_secs(5), async { 7u32 }, Outcome::Done, || {
        Outcome::TimedOut
    })
    .run(dispatch);

    wait_for_len(&seen, 1).await;
    assert_eq!(*seen.lock(), vec![Outcome::Done(7)]);
}

#[tokio::test]
async fn cancelled_task_never_dispatches() {
    let token = CancelToken::new();
    let (dispatch, seen) = recorder();
    Effect::task_cancellable(
        token.clone(),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            3u32
        },
        Outcome::Done,
    )
    .run(dispatch);

    token.cancel();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn uncancelled_task_dispatches() {
    let (dispatch, seen) = recorder();
    Effect::task_cancellable(CancelToken::new(), async { 3u32 }, Outcome::Done).run(dispatch);

    wait_for_len(&seen, 1).await;
    assert_eq!(*seen.lock(), vec![Outcome::Done(3)]);
}

#[tokio::test]
async fn cancellable_drops_late_dispatches() {
    let token = CancelToken::new();
    let (dispatch, seen) = recorder();
    Effect::task(
        async { tokio::time::sleep(Duration::from_millis(30)).await },
        |_| Outcome::Done(1),
    )
    .cancellable(token.clone())
    .run(dispatch);

    token.cancel();
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(seen.lock().is_empty());
}

#[tokio::test]
async fn mapped_task_is_equivalent_to_mapping_its_dispatches() {
    let (direct, direct_seen) = recorder();
    Effect::task(async { 5u32 }, |n| Outcome::Done(n * 2)).run(direct);

    let (mapped, mapped_seen) = recorder();
    Effect::task(async { 5u32 }, |n: u32| n)
        .map(|n| Outcome::Done(n * 2))
        .run(mapped);

    wait_for_len(&direct_seen, 1).await;
    wait_for_len(&mapped_seen, 1).await;
    assert_eq!(*direct_seen.lock(), *mapped_seen.lock());
}

#[tokio::test]
async fn batch_mixes_sync_and_async_members() {
    let (dispatch, seen) = recorder();
    Effect::batch([
        Effect::task(async { 2u32 }, Outcome::Done),
        Effect::none(),
        Effect::action(Outcome::Done(1)),
    ])
    .run(dispatch);

    // The synchronous member has already dispatched.
    assert_eq!(*seen.lock(), vec![Outcome::Done(1)]);
    wait_for_len(&seen, 2).await;
    assert_eq!(seen.lock()[1], Outcome::Done(2));
}
