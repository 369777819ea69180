use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::RuntimeConfig;
use crate::effect::{panic_message, CancelToken, Dispatch, Effect};
use crate::reducer::Reducer;
use crate::runtime::scheduler::{Msg, Scheduler};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("store worker has stopped")]
    Closed,
}

/// Counters collected by a store worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub actions_reduced: u64,
    pub effects_invoked: u64,
    /// Actions dropped because their synchronous chain was too long.
    pub dropped_actions: u64,
    pub panicked_effects: u64,
    /// Reducer calls that panicked; the previous model was kept.
    pub failed_updates: u64,
}

#[derive(Default)]
struct Counters {
    actions_reduced: AtomicU64,
    effects_invoked: AtomicU64,
    dropped_actions: AtomicU64,
    panicked_effects: AtomicU64,
    failed_updates: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> RuntimeStats {
        RuntimeStats {
            actions_reduced: self.actions_reduced.load(Ordering::Relaxed),
            effects_invoked: self.effects_invoked.load(Ordering::Relaxed),
            dropped_actions: self.dropped_actions.load(Ordering::Relaxed),
            panicked_effects: self.panicked_effects.load(Ordering::Relaxed),
            failed_updates: self.failed_updates.load(Ordering::Relaxed),
        }
    }
}

struct Envelope<A> {
    action: A,
    /// How many effect invocations deep this action was dispatched
    /// synchronously. Zero for external and asynchronous dispatches.
    depth: u32,
}

/// Handle to a running workflow: the `{ model, dispatch }` pair.
///
/// A single worker task owns the model and the effect queue. Every
/// `dispatch` lands in one channel, so reducer calls never overlap and are
/// applied in dispatch order. The worker exits on [`Store::shutdown`] or
/// once every handle and in-flight dispatcher is gone.
pub struct Store<M, A> {
    tx: mpsc::UnboundedSender<Envelope<A>>,
    model: watch::Receiver<M>,
    shutdown: CancelToken,
    counters: Arc<Counters>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<M, A> Clone for Store<M, A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            model: self.model.clone(),
            shutdown: self.shutdown.clone(),
            counters: Arc::clone(&self.counters),
            worker: Arc::clone(&self.worker),
        }
    }
}

impl<M, A> Store<M, A>
where
    M: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    /// Starts a worker for `reducer`, seeded with `model`, and queues
    /// `effect` as the first effect to run.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<R>(reducer: R, model: M, effect: Effect<A>, config: &RuntimeConfig) -> Self
    where
        R: Reducer<Model = M, Action = A>,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let (publish, observed) = watch::channel(model.clone());
        let shutdown = CancelToken::new();
        let counters = Arc::new(Counters::default());

        let worker = Worker {
            scheduler: Scheduler::new(reducer, model, effect),
            tx: tx.downgrade(),
            publish,
            counters: Arc::clone(&counters),
            max_sync_chain: config.max_sync_chain,
        };
        let handle = tokio::spawn(worker.run(rx, shutdown.clone()));

        Self {
            tx,
            model: observed,
            shutdown,
            counters,
            worker: Arc::new(Mutex::new(Some(handle))),
        }
    }

    /// Queues `action` for the reducer.
    pub fn dispatch(&self, action: A) -> Result<(), RuntimeError> {
        self.tx
            .send(Envelope { action, depth: 0 })
            .map_err(|_| RuntimeError::Closed)
    }

    /// A [`Dispatch`] feeding this store, for UI glue that wants a callback.
    /// Dispatches after shutdown are dropped.
    pub fn dispatcher(&self) -> Dispatch<A> {
        let tx = self.tx.clone();
        Dispatch::new(move |action| {
            if tx.send(Envelope { action, depth: 0 }).is_err() {
                tracing::trace!("store closed, dropping action");
            }
        })
    }

    /// The most recently published model.
    pub fn model(&self) -> M {
        self.model.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<M> {
        self.model.clone()
    }

    /// Waits until a published model satisfies `predicate` and returns it.
    pub async fn wait_for<F>(&self, mut predicate: F) -> Result<M, RuntimeError>
    where
        F: FnMut(&M) -> bool,
    {
        let mut observed = self.model.clone();
        let model = observed
            .wait_for(|model| predicate(model))
            .await
            .map_err(|_| RuntimeError::Closed)?;
        Ok((*model).clone())
    }

    pub fn stats(&self) -> RuntimeStats {
        self.counters.snapshot()
    }

    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Stops the worker and waits for it to exit. Effects already spawned
    /// keep running; their dispatches are dropped.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "store worker terminated abnormally");
            }
        }
    }
}

struct Worker<R: Reducer> {
    scheduler: Scheduler<R>,
    tx: mpsc::WeakUnboundedSender<Envelope<R::Action>>,
    publish: watch::Sender<R::Model>,
    counters: Arc<Counters>,
    max_sync_chain: u32,
}

impl<R: Reducer> Worker<R> {
    async fn run(
        mut self,
        mut rx: mpsc::UnboundedReceiver<Envelope<R::Action>>,
        shutdown: CancelToken,
    ) {
        tracing::debug!("store worker started");
        self.drain(0);

        loop {
            let envelope = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    tracing::debug!("store shutdown requested");
                    break;
                }
                next = rx.recv() => match next {
                    Some(envelope) => envelope,
                    None => break,
                },
            };
            self.handle(envelope);
        }

        tracing::debug!(pending = self.scheduler.pending(), "store worker stopped");
    }

    fn handle(&mut self, envelope: Envelope<R::Action>) {
        if envelope.depth > self.max_sync_chain {
            tracing::error!(
                depth = envelope.depth,
                limit = self.max_sync_chain,
                "synchronous dispatch chain too long, dropping action"
            );
            Counters::bump(&self.counters.dropped_actions);
            return;
        }

        tracing::trace!(depth = envelope.depth, "reducing action");
        let scheduler = &mut self.scheduler;
        let reduced = panic::catch_unwind(AssertUnwindSafe(|| {
            scheduler.apply(Msg::Action(envelope.action))
        }));
        if let Err(payload) = reduced {
            tracing::error!(
                panic = %panic_message(payload.as_ref()),
                "reducer panicked, keeping previous model"
            );
            Counters::bump(&self.counters.failed_updates);
            return;
        }
        Counters::bump(&self.counters.actions_reduced);

        // Observers see the new model before its effect runs.
        self.publish.send_replace(self.scheduler.state().clone());
        self.drain(envelope.depth);
    }

    fn drain(&mut self, depth: u32) {
        while let Some(effect) = self.scheduler.apply(Msg::EffectsExecuted) {
            if effect.is_none() {
                continue;
            }
            Counters::bump(&self.counters.effects_invoked);

            let in_sync = Arc::new(AtomicBool::new(true));
            let dispatch = self.effect_dispatch(depth, Arc::clone(&in_sync));
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| effect.run(dispatch)));
            in_sync.store(false, Ordering::SeqCst);

            if let Err(payload) = outcome {
                tracing::error!(
                    panic = %panic_message(payload.as_ref()),
                    "effect panicked, nothing further dispatched from it"
                );
                Counters::bump(&self.counters.panicked_effects);
            }
        }
    }

    /// Builds the dispatch handed to one effect invocation. Actions sent
    /// while `in_sync` is set count one level deeper than the action that
    /// produced the effect.
    fn effect_dispatch(&self, depth: u32, in_sync: Arc<AtomicBool>) -> Dispatch<R::Action> {
        let Some(tx) = self.tx.upgrade() else {
            return Dispatch::ignore();
        };
        Dispatch::new(move |action| {
            let depth = if in_sync.load(Ordering::SeqCst) {
                depth.saturating_add(1)
            } else {
                0
            };
            if tx.send(Envelope { action, depth }).is_err() {
                tracing::trace!("store closed, dropping dispatched action");
            }
        })
    }
}
