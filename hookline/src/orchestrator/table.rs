//! Per-hook storage.
//!
//! Every hook owns one [`HookTable`] holding its priority-ordered records and
//! the two cached dispatchers. Tables are stored type-erased behind
//! [`ErasedTable`] so one registry can hold hooks with different item and
//! context types.

use super::combine::{self, ChainedFn, ParallelFn};
use hookline_core::{CallbackMeta, CallbackRecord, CallbackWrapper, Payload, Scheduler};
use std::{
    any::{Any, type_name},
    sync::Arc,
};

/// What a dispatcher captures when it is built.
#[derive(Clone)]
pub(crate) struct BuildContext {
    pub(crate) wrapper: Arc<dyn CallbackWrapper>,
    pub(crate) scheduler: Arc<dyn Scheduler>,
}

/// Type-erased operations the registry performs without knowing `I` and `C`.
pub(crate) trait ErasedTable: Send + Sync {
    /// Rebuild both dispatchers against the given wrapper and scheduler.
    fn rebuild(&mut self, build: &BuildContext);
    /// Drop the record with `id`. Returns whether one was present.
    fn remove(&mut self, id: &str) -> bool;
    fn contains(&self, id: &str) -> bool;
    fn metas(&self) -> Vec<CallbackMeta>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Name of the `(item, context)` pair the hook is bound to.
    fn payload_types(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Records and dispatchers of one hook.
pub(crate) struct HookTable<I, C> {
    hook: Arc<str>,
    records: Vec<CallbackRecord<I, C>>,
    chained: Option<Arc<ChainedFn<I, C>>>,
    parallel: Option<Arc<ParallelFn<I, C>>>,
}

impl<I: Payload, C: Payload> HookTable<I, C> {
    pub(crate) fn boxed(hook: &str) -> Box<dyn ErasedTable> {
        Box::new(Self {
            hook: Arc::from(hook),
            records: Vec::new(),
            chained: None,
            parallel: None,
        })
    }

    pub(crate) fn hook(&self) -> &Arc<str> {
        &self.hook
    }

    /// Insert keeping the list sorted by priority. The sort is stable, so
    /// equal priorities stay in registration order.
    pub(crate) fn insert(&mut self, record: CallbackRecord<I, C>) {
        self.records.push(record);
        self.records.sort_by_key(|record| record.meta().priority);
    }

    pub(crate) fn chained(&self) -> Option<Arc<ChainedFn<I, C>>> {
        self.chained.clone()
    }

    pub(crate) fn parallel(&self) -> Option<Arc<ParallelFn<I, C>>> {
        self.parallel.clone()
    }

    /// The name reported for a `(I, C)` pair in type mismatch errors.
    pub(crate) fn pair_name() -> &'static str {
        type_name::<(I, C)>()
    }
}

impl<I: Payload, C: Payload> ErasedTable for HookTable<I, C> {
    fn rebuild(&mut self, build: &BuildContext) {
        self.chained = combine::chained(&self.hook, &self.records, &build.wrapper);
        self.parallel = combine::parallel(&self.records, &build.wrapper, &build.scheduler);
    }

    fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| &*record.meta().id != id);
        self.records.len() != before
    }

    fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|record| &*record.meta().id == id)
    }

    fn metas(&self) -> Vec<CallbackMeta> {
        self.records.iter().map(|record| record.meta().clone()).collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn payload_types(&self) -> &'static str {
        Self::pair_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
