//! Reducer trait for the Model-Action-Effect architecture.

use std::marker::PhantomData;

use crate::effect::Effect;

/// Reducer computes the next model and the effect to run for an action.
///
/// The reducer is the only place where state transitions happen. It must be
/// pure: any I/O belongs inside the returned [`Effect`].
pub trait Reducer: Send + 'static {
    /// The model this reducer operates on.
    type Model: Clone + Send + Sync + 'static;

    /// The action vocabulary this reducer handles.
    type Action: Send + 'static;

    fn update(
        &self,
        model: Self::Model,
        action: Self::Action,
    ) -> (Self::Model, Effect<Self::Action>);
}

/// Adapts a plain `(M, A) -> (M, Effect<A>)` function into a [`Reducer`].
pub struct FnReducer<F, M, A> {
    update: F,
    _marker: PhantomData<fn(M, A)>,
}

pub fn reducer_fn<M, A, F>(update: F) -> FnReducer<F, M, A>
where
    F: Fn(M, A) -> (M, Effect<A>),
{
    FnReducer {
        update,
        _marker: PhantomData,
    }
}

impl<F, M, A> Reducer for FnReducer<F, M, A>
where
    F: Fn(M, A) -> (M, Effect<A>) + Send + 'static,
    M: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    type Model = M;
    type Action = A;

    fn update(&self, model: M, action: A) -> (M, Effect<A>) {
        (self.update)(model, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_reducer_delegates() {
        let counter = reducer_fn(|count: i64, delta: i64| (count + delta, Effect::none()));
        let (next, effect) = counter.update(40, 2);
        assert_eq!(next, 42);
        assert!(effect.is_none());
    }
}
