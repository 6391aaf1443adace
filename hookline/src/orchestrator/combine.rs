//! Combined-dispatcher construction.
//!
//! Both dispatchers are built from the priority-ordered records of one hook
//! and capture the wrapper (and scheduler) that was active at build time.
//!
//! - **Chained**: every record is wrapped with `wrap_one`, the steps are folded
//!   with [`pipe`], and the composed chain is wrapped with `wrap`.
//! - **Parallel**: every record is wrapped with `wrap_one` and submitted to the
//!   scheduler as its own task, in priority order.

use hookline_core::{
    CallbackError, CallbackRecord, CallbackWrapper, Invocation, Payload, Scheduler,
};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

/// Sequential dispatcher: the item flows from callback to callback.
pub(crate) type ChainedFn<I, C> = dyn Fn(I, &C) -> Result<I, CallbackError> + Send + Sync;

/// Broadcast dispatcher: every callback receives the same shared item.
pub(crate) type ParallelFn<I, C> = dyn Fn(Arc<I>, Arc<C>) + Send + Sync;

type Step<I, C> = Box<ChainedFn<I, C>>;

/// `pipe(f, g)(item, ctx) = g(f(item, ctx), ctx)`, short-circuiting on failure.
fn pipe<I: Payload, C: Payload>(f: Step<I, C>, g: Step<I, C>) -> Step<I, C> {
    Box::new(move |item: I, ctx: &C| g(f(item, ctx)?, ctx))
}

/// One callback as a pipeline step. "No result" passes the input through.
fn wrap_one<I: Payload, C: Payload>(
    record: CallbackRecord<I, C>,
    wrapper: Arc<dyn CallbackWrapper>,
) -> Step<I, C> {
    Box::new(move |item: I, ctx: &C| {
        let mut next = None;
        let mut call = || -> Result<(), CallbackError> {
            next = record.invoke(&item, ctx)?;
            Ok(())
        };
        wrapper.wrap_one(record.meta(), Invocation::new(&mut call))?;
        Ok(next.unwrap_or(item))
    })
}

/// Build the chained dispatcher, or `None` for an empty hook.
pub(crate) fn chained<I: Payload, C: Payload>(
    hook: &Arc<str>,
    records: &[CallbackRecord<I, C>],
    wrapper: &Arc<dyn CallbackWrapper>,
) -> Option<Arc<ChainedFn<I, C>>> {
    let callback_count = records.len();
    let composed = records
        .iter()
        .cloned()
        .map(|record| wrap_one(record, wrapper.clone()))
        .reduce(pipe::<I, C>)?;

    let hook = hook.clone();
    let wrapper = wrapper.clone();
    let dispatcher: Arc<ChainedFn<I, C>> = Arc::new(move |item: I, ctx: &C| {
        let mut input = Some(item);
        let mut output = None;
        let mut chain = || -> Result<(), CallbackError> {
            if let Some(item) = input.take() {
                output = Some(composed(item, ctx)?);
            }
            Ok(())
        };
        wrapper.wrap(&hook, callback_count, Invocation::new(&mut chain))?;
        // `input` is still set when the wrapper skipped the chain.
        output.or(input).ok_or_else(|| CallbackError::Interrupted {
            hook: hook.to_string(),
        })
    });
    Some(dispatcher)
}

/// Build the parallel dispatcher, or `None` for an empty hook.
pub(crate) fn parallel<I: Payload, C: Payload>(
    records: &[CallbackRecord<I, C>],
    wrapper: &Arc<dyn CallbackWrapper>,
    scheduler: &Arc<dyn Scheduler>,
) -> Option<Arc<ParallelFn<I, C>>> {
    if records.is_empty() {
        return None;
    }
    let records: Arc<[CallbackRecord<I, C>]> = records.into();
    let wrapper = wrapper.clone();
    let scheduler = scheduler.clone();

    let dispatcher: Arc<ParallelFn<I, C>> = Arc::new(move |item: Arc<I>, ctx: Arc<C>| {
        for record in records.iter() {
            let record = record.clone();
            let wrapper = wrapper.clone();
            let item = item.clone();
            let ctx = ctx.clone();
            scheduler.schedule(Box::new(move || {
                run_detached(&record, &*wrapper, &item, &ctx)
            }));
        }
    });
    Some(dispatcher)
}

/// Run one callback off the caller's stack. Failures and panics end here.
fn run_detached<I: Payload, C: Payload>(
    record: &CallbackRecord<I, C>,
    wrapper: &dyn CallbackWrapper,
    item: &I,
    ctx: &C,
) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut call = || record.invoke(item, ctx).map(drop);
        wrapper.wrap_one(record.meta(), Invocation::new(&mut call))
    }));
    let error = match outcome {
        Ok(Ok(())) => return,
        Ok(Err(error)) => error,
        Err(payload) => CallbackError::panicked(record.meta(), payload),
    };
    wrapper.report_detached(record.meta(), &error);
}
