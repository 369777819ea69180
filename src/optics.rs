//! Accessor pairs that focus on part of a parent model.
//!
//! A [`Lens`] focuses on a sub-value that is always present; an
//! [`Optional`] on one that may be absent. Both are plain get/set function
//! pairs. Lens laws:
//!
//! ```text
//! lens.set(p, lens.get(&p).clone()) == p        (get-put)
//! lens.get(&lens.set(p, c)) == &c               (put-get)
//! ```
//!
//! For an optional, `set` and `modify` leave the parent untouched when the
//! focus is absent.

use std::fmt;
use std::sync::Arc;

type Getter<P, C> = Arc<dyn Fn(&P) -> &C + Send + Sync>;
type OptionGetter<P, C> = Arc<dyn Fn(&P) -> Option<&C> + Send + Sync>;
type Setter<P, C> = Arc<dyn Fn(P, C) -> P + Send + Sync>;

/// Focus on a mandatory child `C` of a parent `P`.
pub struct Lens<P, C> {
    get: Getter<P, C>,
    set: Setter<P, C>,
}

impl<P, C> Clone for Lens<P, C> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<P, C> fmt::Debug for Lens<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lens")
    }
}

impl<P: 'static, C: 'static> Lens<P, C> {
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn(&P) -> &C + Send + Sync + 'static,
        S: Fn(P, C) -> P + Send + Sync + 'static,
    {
        Self {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    pub fn get<'a>(&self, parent: &'a P) -> &'a C {
        (self.get)(parent)
    }

    pub fn set(&self, parent: P, child: C) -> P {
        (self.set)(parent, child)
    }

    /// Copies the child out, transforms it, and writes it back.
    pub fn modify<F>(&self, parent: P, f: F) -> P
    where
        C: Clone,
        F: FnOnce(C) -> C,
    {
        let child = self.get(&parent).clone();
        self.set(parent, f(child))
    }

    /// Focuses further into the child with `inner`.
    pub fn compose<D: 'static>(&self, inner: Lens<C, D>) -> Lens<P, D>
    where
        C: Clone,
    {
        let outer_get = Arc::clone(&self.get);
        let outer = self.clone();
        let inner_get = Arc::clone(&inner.get);
        Lens::new(
            move |parent: &P| inner_get(outer_get(parent)),
            move |parent: P, value: D| outer.modify(parent, |child| inner.set(child, value)),
        )
    }

    /// Focuses further into the child with an optional.
    pub fn compose_optional<D: 'static>(&self, inner: Optional<C, D>) -> Optional<P, D>
    where
        C: Clone,
    {
        let outer_get = Arc::clone(&self.get);
        let outer = self.clone();
        let inner_get = Arc::clone(&inner.get);
        Optional::new(
            move |parent: &P| inner_get(outer_get(parent)),
            move |parent: P, value: D| outer.modify(parent, |child| inner.set(child, value)),
        )
    }

    /// Views this lens as an optional that is always present.
    pub fn to_optional(&self) -> Optional<P, C> {
        let get = Arc::clone(&self.get);
        let set = Arc::clone(&self.set);
        Optional::new(move |parent: &P| Some(get(parent)), move |parent, child| set(parent, child))
    }
}

/// Focus on a child `C` that may be absent from a parent `P`.
pub struct Optional<P, C> {
    get: OptionGetter<P, C>,
    set: Setter<P, C>,
}

impl<P, C> Clone for Optional<P, C> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<P, C> fmt::Debug for Optional<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Optional")
    }
}

impl<P: 'static, C: 'static> Optional<P, C> {
    /// `set` is only consulted when `get_option` finds the child, so it may
    /// assume the focus exists.
    pub fn new<G, S>(get_option: G, set: S) -> Self
    where
        G: Fn(&P) -> Option<&C> + Send + Sync + 'static,
        S: Fn(P, C) -> P + Send + Sync + 'static,
    {
        Self {
            get: Arc::new(get_option),
            set: Arc::new(set),
        }
    }

    pub fn get_option<'a>(&self, parent: &'a P) -> Option<&'a C> {
        (self.get)(parent)
    }

    pub fn is_present(&self, parent: &P) -> bool {
        self.get_option(parent).is_some()
    }

    /// Replaces the child. Returns `parent` unchanged when the child is absent.
    pub fn set(&self, parent: P, child: C) -> P {
        if self.is_present(&parent) {
            (self.set)(parent, child)
        } else {
            parent
        }
    }

    pub fn modify<F>(&self, parent: P, f: F) -> P
    where
        C: Clone,
        F: FnOnce(C) -> C,
    {
        match self.get_option(&parent).cloned() {
            Some(child) => (self.set)(parent, f(child)),
            None => parent,
        }
    }

    pub fn compose<D: 'static>(&self, inner: Optional<C, D>) -> Optional<P, D>
    where
        C: Clone,
    {
        let outer_get = Arc::clone(&self.get);
        let outer = self.clone();
        let inner_get = Arc::clone(&inner.get);
        Optional::new(
            move |parent: &P| outer_get(parent).and_then(|child| inner_get(child)),
            move |parent: P, value: D| outer.modify(parent, |child| inner.set(child, value)),
        )
    }
}
