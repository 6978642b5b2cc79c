//! Guard predicates for controlling transitions.
//!
//! Guards decide whether a transition whose event type matched is allowed to
//! fire, looking at the current context and the incoming event.

use super::event::Event;
use super::BoxError;
use std::sync::Arc;

type Predicate<C, P> = dyn Fn(&C, &Event<P>) -> Result<bool, BoxError> + Send + Sync;

/// Pure predicate over `(context, event)` gating a transition.
///
/// A guard is either infallible ([`Guard::new`]) or fallible
/// ([`Guard::try_new`]). A failing guard aborts the `send` that evaluated it
/// and leaves the interpreter untouched.
///
/// # Example
///
/// ```rust
/// use flowkit::core::{Event, Guard};
///
/// struct Ctx {
///     count: u32,
/// }
///
/// let below_limit = Guard::new(|ctx: &Ctx, _event: &Event<()>| ctx.count < 3);
///
/// assert!(below_limit.check(&Ctx { count: 1 }, &Event::new("NEXT")).unwrap());
/// assert!(!below_limit.check(&Ctx { count: 3 }, &Event::new("NEXT")).unwrap());
/// ```
pub struct Guard<C, P> {
    predicate: Arc<Predicate<C, P>>,
}

impl<C: 'static, P: 'static> Guard<C, P> {
    /// Create a guard from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C, &Event<P>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(move |ctx: &C, event: &Event<P>| Ok(predicate(ctx, event))),
        }
    }

    /// Create a guard from a predicate that may fail.
    pub fn try_new<F>(predicate: F) -> Self
    where
        F: Fn(&C, &Event<P>) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }
}

impl<C, P> Guard<C, P> {
    /// Evaluate the guard.
    pub fn check(&self, context: &C, event: &Event<P>) -> Result<bool, BoxError> {
        (self.predicate)(context, event)
    }
}

impl<C, P> Clone for Guard<C, P> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C, P> std::fmt::Debug for Guard<C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
