//! Deferred side effects and their combinators.
//!
//! An [`Effect`] is pure data until it is invoked with a [`Dispatch`]. Only
//! then may it perform I/O and dispatch follow-up actions. Reducers return
//! effects; the runtime decides when to invoke them.
//!
//! ```text
//! Effect::none()            no-op, skipped by the scheduler
//! Effect::action(a)         dispatch `a` synchronously
//! Effect::from_fn(f, ok)    run fallible `f`, dispatch `ok(value)`
//! Effect::attempt(f, ok, e) run fallible `f`, dispatch `ok` or `e`
//! Effect::task(fut, ok)     spawn `fut`, dispatch `ok(output)`
//! Effect::batch(effects)    invoke each effect independently
//! effect.map(f)             re-target into another action vocabulary
//! ```

mod cancel;
mod dispatch;

pub use cancel::CancelToken;
pub use dispatch::Dispatch;

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

type Thunk<A> = Box<dyn FnOnce(Dispatch<A>) + Send>;

/// A deferred, possibly asynchronous unit of work over action type `A`.
///
/// Each effect runs at most once: [`Effect::run`] consumes it.
#[must_use = "effects do nothing unless handed to the runtime or run"]
pub struct Effect<A> {
    thunk: Option<Thunk<A>>,
}

impl<A> Effect<A> {
    /// The effect that does nothing.
    pub fn none() -> Self {
        Self { thunk: None }
    }

    pub fn is_none(&self) -> bool {
        self.thunk.is_none()
    }
}

impl<A> Default for Effect<A> {
    fn default() -> Self {
        Self::none()
    }
}

impl<A> fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("Effect::none")
        } else {
            f.write_str("Effect(..)")
        }
    }
}

impl<A: Send + 'static> Effect<A> {
    /// Wraps an arbitrary invocation body.
    pub fn new<F>(body: F) -> Self
    where
        F: FnOnce(Dispatch<A>) + Send + 'static,
    {
        Self {
            thunk: Some(Box::new(body)),
        }
    }

    /// Dispatches `action` synchronously when invoked.
    ///
    /// A reducer that answers an action with `Effect::action` of the same
    /// action loops forever; the runtime bounds such chains with
    /// `RuntimeConfig::max_sync_chain`.
    pub fn action(action: A) -> Self {
        Self::new(move |dispatch| dispatch.dispatch(action))
    }

    /// Runs a synchronous, fallible function and dispatches `on_success` of
    /// its value.
    ///
    /// On `Err` nothing is dispatched; the error is logged at `warn`. Use
    /// [`Effect::attempt`] when the reducer needs to see the failure.
    pub fn from_fn<T, E, F, S>(f: F, on_success: S) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        E: fmt::Display,
        S: FnOnce(T) -> A + Send + 'static,
    {
        Self::new(move |dispatch| match f() {
            Ok(value) => dispatch.dispatch(on_success(value)),
            Err(err) => {
                tracing::warn!(error = %err, "effect function failed, nothing dispatched");
            }
        })
    }

    /// Runs a synchronous function and ignores its outcome entirely.
    pub fn from_fn_<T, E, F>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
    {
        Self::new(move |_| {
            let _ = f();
        })
    }

    /// Runs a synchronous, fallible function and dispatches either
    /// `on_success(value)` or `on_failure(error)`.
    pub fn attempt<T, E, F, S, X>(f: F, on_success: S, on_failure: X) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        S: FnOnce(T) -> A + Send + 'static,
        X: FnOnce(E) -> A + Send + 'static,
    {
        Self::new(move |dispatch| match f() {
            Ok(value) => dispatch.dispatch(on_success(value)),
            Err(err) => dispatch.dispatch(on_failure(err)),
        })
    }

    /// Spawns `future` on the current tokio runtime and dispatches
    /// `on_success(output)` when it completes.
    ///
    /// No timeout is applied; a future that never resolves never dispatches.
    pub fn task<Fut, S>(future: Fut, on_success: S) -> Self
    where
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
        S: FnOnce(Fut::Output) -> A + Send + 'static,
    {
        Self::new(move |dispatch| {
            spawn_detached(async move {
                let output = future.await;
                dispatch.dispatch(on_success(output));
            })
        })
    }

    /// Spawns `future` and discards its output. Fire and forget.
    pub fn task_<Fut>(future: Fut) -> Self
    where
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        Self::new(move |_| {
            spawn_detached(async move {
                let _ = future.await;
            })
        })
    }

    /// Like [`Effect::task`], but dispatches `on_timeout()` instead if the
    /// future has not completed within `duration`.
    pub fn timeout<Fut, S, T>(duration: Duration, future: Fut, on_success: S, on_timeout: T) -> Self
    where
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
        S: FnOnce(Fut::Output) -> A + Send + 'static,
        T: FnOnce() -> A + Send + 'static,
    {
        Self::new(move |dispatch| {
            spawn_detached(async move {
                match tokio::time::timeout(duration, future).await {
                    Ok(output) => dispatch.dispatch(on_success(output)),
                    Err(_) => {
                        tracing::debug!(?duration, "async effect timed out");
                        dispatch.dispatch(on_timeout());
                    }
                }
            })
        })
    }

    /// Like [`Effect::task`], but stops awaiting `future` and dispatches
    /// nothing once `token` is cancelled.
    pub fn task_cancellable<Fut, S>(token: CancelToken, future: Fut, on_success: S) -> Self
    where
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
        S: FnOnce(Fut::Output) -> A + Send + 'static,
    {
        Self::new(move |dispatch| {
            spawn_detached(async move {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        tracing::debug!("async effect cancelled before completion");
                    }
                    output = future => dispatch.dispatch(on_success(output)),
                }
            })
        })
    }

    /// Combines effects that are invoked independently with the same
    /// dispatch. No ordering is promised between their dispatches, and a
    /// panic in one does not stop the others.
    pub fn batch<I>(effects: I) -> Self
    where
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut effects: Vec<Effect<A>> = effects.into_iter().filter(|e| !e.is_none()).collect();
        match effects.len() {
            0 => Self::none(),
            1 => effects.remove(0),
            _ => Self::new(move |dispatch| {
                for effect in effects {
                    let outcome =
                        panic::catch_unwind(AssertUnwindSafe(|| effect.run(dispatch.clone())));
                    if let Err(payload) = outcome {
                        tracing::error!(
                            panic = %panic_message(payload.as_ref()),
                            "batched effect panicked, continuing with siblings"
                        );
                    }
                }
            }),
        }
    }

    /// Re-targets this effect into another action vocabulary: every action
    /// it would dispatch is passed through `f` first.
    pub fn map<B, F>(self, f: F) -> Effect<B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        match self.thunk {
            None => Effect::none(),
            Some(thunk) => Effect::new(move |dispatch: Dispatch<B>| thunk(dispatch.contramap(f))),
        }
    }

    /// Guards this effect with `token`: it is skipped if the token is already
    /// cancelled when invoked, and any dispatch made after cancellation is
    /// dropped. Work already running is not interrupted.
    pub fn cancellable(self, token: CancelToken) -> Self {
        match self.thunk {
            None => Self::none(),
            Some(thunk) => Self::new(move |dispatch| {
                if token.is_cancelled() {
                    tracing::trace!("skipping effect, token already cancelled");
                    return;
                }
                let guarded = Dispatch::new(move |action| {
                    if token.is_cancelled() {
                        tracing::trace!("dropping dispatch from cancelled effect");
                    } else {
                        dispatch.dispatch(action);
                    }
                });
                thunk(guarded)
            }),
        }
    }

    /// Invokes the effect. This is the only point where side effects happen.
    pub fn run(self, dispatch: Dispatch<A>) {
        if let Some(thunk) = self.thunk {
            thunk(dispatch);
        }
    }
}

fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(future);
        }
        Err(_) => {
            tracing::error!("async effect invoked outside a tokio runtime, dropped");
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
