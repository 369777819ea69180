use std::collections::VecDeque;

use crate::effect::Effect;
use crate::reducer::Reducer;

/// Messages understood by the scheduler state machine.
pub enum Msg<A> {
    /// A workflow action to reduce.
    Action(A),
    /// The head of the effect queue has been handed off for execution.
    EffectsExecuted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No effect is waiting.
    Idle,
    /// At least one effect is queued and the head has not been invoked.
    EffectPending,
}

/// The `{state, pending effects}` record and its transitions.
///
/// Pure bookkeeping: it never invokes an effect itself. The store worker
/// feeds it messages and runs whatever `EffectsExecuted` hands back.
pub struct Scheduler<R: Reducer> {
    reducer: R,
    state: R::Model,
    effects: VecDeque<Effect<R::Action>>,
}

impl<R: Reducer> Scheduler<R> {
    pub fn new(reducer: R, state: R::Model, initial: Effect<R::Action>) -> Self {
        let mut effects = VecDeque::new();
        effects.push_back(initial);
        Self {
            reducer,
            state,
            effects,
        }
    }

    /// Applies one message.
    ///
    /// `Action` reduces the current state and appends the resulting effect
    /// (even a no-op one) to the tail of the queue. `EffectsExecuted` pops
    /// and returns the head, or `None` when the queue is empty.
    pub fn apply(&mut self, msg: Msg<R::Action>) -> Option<Effect<R::Action>> {
        match msg {
            Msg::Action(action) => {
                let (next, effect) = self.reducer.update(self.state.clone(), action);
                self.state = next;
                self.effects.push_back(effect);
                None
            }
            Msg::EffectsExecuted => self.effects.pop_front(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.effects.is_empty() {
            Phase::Idle
        } else {
            Phase::EffectPending
        }
    }

    pub fn state(&self) -> &R::Model {
        &self.state
    }

    pub fn pending(&self) -> usize {
        self.effects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Dispatch;
    use crate::reducer::reducer_fn;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn echo() -> impl Reducer<Model = Vec<u32>, Action = u32> {
        reducer_fn(|mut log: Vec<u32>, n: u32| {
            log.push(n);
            let effect = if n % 2 == 0 {
                Effect::none()
            } else {
                Effect::action(n * 10)
            };
            (log, effect)
        })
    }

    #[test]
    fn starts_with_initial_effect_pending() {
        let scheduler = Scheduler::new(echo(), Vec::new(), Effect::none());
        assert_eq!(scheduler.phase(), Phase::EffectPending);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn effects_executed_on_empty_queue_is_noop() {
        let mut scheduler = Scheduler::new(echo(), Vec::new(), Effect::none());
        assert!(scheduler.apply(Msg::EffectsExecuted).is_some());
        assert!(scheduler.apply(Msg::EffectsExecuted).is_none());
        assert_eq!(scheduler.phase(), Phase::Idle);
    }

    #[test]
    fn actions_append_effects_in_dispatch_order() {
        let mut scheduler = Scheduler::new(echo(), Vec::new(), Effect::none());
        let _ = scheduler.apply(Msg::EffectsExecuted);

        for n in [1, 2, 3] {
            assert!(scheduler.apply(Msg::Action(n)).is_none());
        }
        assert_eq!(scheduler.state(), &vec![1, 2, 3]);
        assert_eq!(scheduler.pending(), 3);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            Dispatch::new(move |n| seen.lock().push(n))
        };
        let mut slots = Vec::new();
        while let Some(effect) = scheduler.apply(Msg::EffectsExecuted) {
            slots.push(effect.is_none());
            effect.run(sink.clone());
        }
        // The no-op effect from `2` keeps its slot between `1` and `3`.
        assert_eq!(slots, vec![false, true, false]);
        assert_eq!(*seen.lock(), vec![10, 30]);
    }
}
