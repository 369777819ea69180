//! The `dispatch` callback handed to effects when they are invoked.

use std::fmt;
use std::sync::Arc;

/// A cloneable, thread-safe sink for actions.
///
/// Effects receive a `Dispatch` when invoked and may call it zero or more
/// times, synchronously or from a spawned task.
pub struct Dispatch<A> {
    sink: Arc<dyn Fn(A) + Send + Sync>,
}

impl<A> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<A> fmt::Debug for Dispatch<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch").finish_non_exhaustive()
    }
}

impl<A: Send + 'static> Dispatch<A> {
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// A sink that drops everything it receives.
    pub fn ignore() -> Self {
        Self::new(|_| {})
    }

    pub fn dispatch(&self, action: A) {
        (self.sink)(action)
    }

    /// Builds a sink for another action vocabulary that converts each value
    /// with `f` before forwarding it here.
    pub fn contramap<B, F>(&self, f: F) -> Dispatch<B>
    where
        B: Send + 'static,
        F: Fn(B) -> A + Send + Sync + 'static,
    {
        let inner = self.clone();
        Dispatch::new(move |action| inner.dispatch(f(action)))
    }
}
