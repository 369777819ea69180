//! Embedding child reducers into parent reducers.
//!
//! Each helper takes an optic into the parent model plus the child's own
//! update function and returns a parent-shaped update function. The parent
//! never looks at the child beyond what the optic exposes, so child reducers
//! keep their own unit tests.

use crate::effect::Effect;
use crate::optics::{Lens, Optional};

/// Runs `child_update` on the child focused by `lens` and maps the child's
/// effect into the parent vocabulary with `ctor`.
pub fn update_child_model_effect<P, C, PA, CA, K, U>(
    lens: Lens<P, C>,
    ctor: K,
    child_update: U,
) -> impl Fn(P, CA) -> (P, Effect<PA>)
where
    P: 'static,
    C: Clone + 'static,
    PA: Send + 'static,
    CA: Send + 'static,
    K: Fn(CA) -> PA + Clone + Send + Sync + 'static,
    U: Fn(C, CA) -> (C, Effect<CA>),
{
    move |parent, action| {
        let child = lens.get(&parent).clone();
        let (child, effect) = child_update(child, action);
        (lens.set(parent, child), effect.map(ctor.clone()))
    }
}

/// Like [`update_child_model_effect`], then lets `watch` observe the child
/// action against the updated parent. Both effects are batched.
pub fn update_child_model_effect_watch<P, C, PA, CA, K, U, W>(
    lens: Lens<P, C>,
    ctor: K,
    child_update: U,
    watch: W,
) -> impl Fn(P, CA) -> (P, Effect<PA>)
where
    P: 'static,
    C: Clone + 'static,
    PA: Send + 'static,
    CA: Clone + Send + 'static,
    K: Fn(CA) -> PA + Clone + Send + Sync + 'static,
    U: Fn(C, CA) -> (C, Effect<CA>),
    W: Fn(P, &CA) -> (P, Effect<PA>),
{
    let update = update_child_model_effect(lens, ctor, child_update);
    move |parent, action: CA| {
        let (parent, child_effect) = update(parent, action.clone());
        let (parent, watch_effect) = watch(parent, &action);
        (parent, Effect::batch([child_effect, watch_effect]))
    }
}

/// Effectful update of a child that may be absent. When it is absent the
/// parent comes back unchanged with no effect.
pub fn update_optional_child_model_effect<P, C, PA, CA, K, U>(
    optional: Optional<P, C>,
    ctor: K,
    child_update: U,
) -> impl Fn(P, CA) -> (P, Effect<PA>)
where
    P: 'static,
    C: Clone + 'static,
    PA: Send + 'static,
    CA: Send + 'static,
    K: Fn(CA) -> PA + Clone + Send + Sync + 'static,
    U: Fn(C, CA) -> (C, Effect<CA>),
{
    move |parent, action| match optional.get_option(&parent).cloned() {
        Some(child) => {
            let (child, effect) = child_update(child, action);
            (optional.set(parent, child), effect.map(ctor.clone()))
        }
        None => {
            tracing::debug!("child model absent, action ignored");
            (parent, Effect::none())
        }
    }
}

/// Optional-child counterpart of [`update_child_model_effect_watch`]. The
/// watcher runs even when the child is absent.
pub fn update_optional_child_model_effect_watch<P, C, PA, CA, K, U, W>(
    optional: Optional<P, C>,
    ctor: K,
    child_update: U,
    watch: W,
) -> impl Fn(P, CA) -> (P, Effect<PA>)
where
    P: 'static,
    C: Clone + 'static,
    PA: Send + 'static,
    CA: Clone + Send + 'static,
    K: Fn(CA) -> PA + Clone + Send + Sync + 'static,
    U: Fn(C, CA) -> (C, Effect<CA>),
    W: Fn(P, &CA) -> (P, Effect<PA>),
{
    let update = update_optional_child_model_effect(optional, ctor, child_update);
    move |parent, action: CA| {
        let (parent, child_effect) = update(parent, action.clone());
        let (parent, watch_effect) = watch(parent, &action);
        (parent, Effect::batch([child_effect, watch_effect]))
    }
}

/// Pure embedding for child updates that never produce effects.
pub fn update_child_model<P, C, CA, U>(lens: Lens<P, C>, child_update: U) -> impl Fn(P, CA) -> P
where
    P: 'static,
    C: Clone + 'static,
    U: Fn(C, CA) -> C,
{
    move |parent, action| lens.modify(parent, |child| child_update(child, action))
}

/// Pure embedding for an optional child. Absent child, unchanged parent.
pub fn update_optional_child_model<P, C, CA, U>(
    optional: Optional<P, C>,
    child_update: U,
) -> impl Fn(P, CA) -> P
where
    P: 'static,
    C: Clone + 'static,
    U: Fn(C, CA) -> C,
{
    move |parent, action| optional.modify(parent, |child| child_update(child, action))
}
