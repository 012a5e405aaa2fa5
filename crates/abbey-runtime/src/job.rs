//! Type-erased work items stored in the task table
//!
//! A dispatched item is a work function plus the context value it will be
//! called with. Both are boxed together so the table holds one payload type
//! regardless of what each task captures or returns.

use crate::context::TaskCx;

/// A unit of work that runs once against a task context
pub trait Runnable<S> {
    /// Run to completion; the result, if any, is discarded
    fn run(self: Box<Self>, cx: &mut TaskCx<'_, S>);
}

/// Payload type of the runtime's task table
pub type Task<S> = Box<dyn Runnable<S>>;

/// Work function paired with its context value
pub(crate) struct Job<F, T> {
    work: F,
    context: T,
}

impl<F, T> Job<F, T> {
    pub(crate) fn boxed<S, R>(work: F, context: T) -> Task<S>
    where
        F: FnOnce(&mut TaskCx<'_, S>, T) -> R + 'static,
        T: 'static,
    {
        Box::new(Job { work, context })
    }
}

impl<S, F, T, R> Runnable<S> for Job<F, T>
where
    F: FnOnce(&mut TaskCx<'_, S>, T) -> R,
{
    fn run(self: Box<Self>, cx: &mut TaskCx<'_, S>) {
        let Job { work, context } = *self;
        let _ = work(cx, context);
    }
}
