//! The callback registry.
//!
//! [`Callbacks`] keeps every hook's priority-ordered callbacks together with
//! two cached dispatchers per hook:
//!
//! - [`Callbacks::run`] threads an item through the callbacks in order
//! - [`Callbacks::run_async`] hands every callback to the scheduler
//!
//! Dispatchers are rebuilt whenever a hook's membership changes and whenever
//! the wrapper or scheduler is replaced. Dispatch itself runs with no lock
//! held, so callbacks may register or remove callbacks.

use super::table::{BuildContext, ErasedTable, HookTable};
use crate::config::{CallbacksConfig, Instrumentation};
use hookline_core::{
    CallbackError, CallbackMeta, CallbackOptions, CallbackRecord, CallbackWrapper, IntoOutcome,
    Payload, Priority, Scheduler,
};
use hookline_std::{
    schedulers::{PoolScheduler, ThreadScheduler},
    wrappers::DefaultWrapper,
};
use parking_lot::RwLock;
use std::{collections::HashMap, fmt, panic::Location, sync::Arc};
use uuid::Uuid;

struct State {
    tables: HashMap<String, Box<dyn ErasedTable>>,
    build: BuildContext,
}

impl State {
    fn rebuild_all(&mut self) {
        let State { tables, build } = self;
        for table in tables.values_mut() {
            table.rebuild(build);
        }
    }
}

/// Hook-based callback registry and dispatcher.
///
/// Each hook carries one item type `I` and one context type `C` (use a
/// tuple for several context values, `()` for none). The pair is fixed by
/// the first registration; later registrations or runs with a different
/// pair fail with [`CallbackError::TypeMismatch`].
///
/// # Example
///
/// ```rust
/// use hookline::{Callbacks, Priority};
///
/// let callbacks = Callbacks::new();
/// callbacks
///     .add_with_priority(
///         "beforeSave",
///         |msg: &String, _: &()| Some(msg.trim().to_string()),
///         Priority::HIGH,
///     )
///     .unwrap();
/// callbacks
///     .add("beforeSave", |msg: &String, _: &()| Some(format!("{msg}!")))
///     .unwrap();
///
/// let saved = callbacks.run("beforeSave", "  hi ".to_string(), &()).unwrap();
/// assert_eq!(saved, "hi!");
/// ```
pub struct Callbacks {
    state: RwLock<State>,
}

impl Callbacks {
    /// Create a registry with no instrumentation.
    ///
    /// Detached callbacks run on the process-wide [`PoolScheduler`]. When that
    /// pool cannot be created they fall back to one thread per task.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start building a registry.
    pub fn builder() -> CallbacksBuilder {
        CallbacksBuilder::default()
    }

    /// Create a registry using the configured instrumentation.
    pub fn from_config(config: &CallbacksConfig) -> Self {
        Self::builder()
            .instrumentation(config.instrumentation)
            .build()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register `callback` under `hook` at [`Priority::MEDIUM`] with a fresh id.
    ///
    /// Returns the id the callback was registered with.
    #[track_caller]
    pub fn add<I, C, F, R>(&self, hook: &str, callback: F) -> Result<String, CallbackError>
    where
        I: Payload,
        C: Payload,
        F: Fn(&I, &C) -> R + Send + Sync + 'static,
        R: IntoOutcome<I>,
    {
        self.add_with_options(hook, callback, CallbackOptions::new())
    }

    /// Register `callback` under `hook` at `priority` with a fresh id.
    #[track_caller]
    pub fn add_with_priority<I, C, F, R>(
        &self,
        hook: &str,
        callback: F,
        priority: impl Into<Priority>,
    ) -> Result<String, CallbackError>
    where
        I: Payload,
        C: Payload,
        F: Fn(&I, &C) -> R + Send + Sync + 'static,
        R: IntoOutcome<I>,
    {
        self.add_with_options(hook, callback, CallbackOptions::new().with_priority(priority))
    }

    /// Register `callback` under `hook` with explicit options.
    ///
    /// Registering an id that is already present under `hook` changes
    /// nothing and returns that id, whatever the callback's payload types.
    #[track_caller]
    pub fn add_with_options<I, C, F, R>(
        &self,
        hook: &str,
        callback: F,
        options: CallbackOptions,
    ) -> Result<String, CallbackError>
    where
        I: Payload,
        C: Payload,
        F: Fn(&I, &C) -> R + Send + Sync + 'static,
        R: IntoOutcome<I>,
    {
        let origin = Location::caller();
        let CallbackOptions { priority, id } = options;
        let id = id.unwrap_or_else(generate_id);

        let mut state = self.state.write();
        let State { tables, build } = &mut *state;
        let table = tables
            .entry(hook.to_string())
            .or_insert_with(|| HookTable::<I, C>::boxed(hook));
        if table.contains(&id) {
            tracing::trace!(target: "hookline", hook, id = %id, "callback already registered");
            return Ok(id);
        }

        let registered = table.payload_types();
        let Some(table) = table.as_any_mut().downcast_mut::<HookTable<I, C>>() else {
            return Err(CallbackError::TypeMismatch {
                hook: hook.to_string(),
                registered,
                requested: HookTable::<I, C>::pair_name(),
            });
        };

        let meta = CallbackMeta::new(table.hook().clone(), id.as_str(), priority, Some(origin));
        table.insert(CallbackRecord::new(meta, Arc::new(callback)));
        table.rebuild(build);

        tracing::debug!(target: "hookline", hook, id = %id, %priority, "callback registered");
        Ok(id)
    }

    /// Remove the callback `id` from `hook`. Returns whether it was present.
    ///
    /// Removing the last callback of a hook drops the hook entirely, which
    /// also releases its item/context binding.
    pub fn remove(&self, hook: &str, id: &str) -> bool {
        let mut state = self.state.write();
        let State { tables, build } = &mut *state;
        let Some(table) = tables.get_mut(hook) else {
            return false;
        };
        if !table.remove(id) {
            return false;
        }
        if table.is_empty() {
            tables.remove(hook);
        } else {
            table.rebuild(build);
        }

        tracing::debug!(target: "hookline", hook, id, "callback removed");
        true
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Thread `item` through the callbacks of `hook` in priority order.
    ///
    /// Each callback sees the previous callback's output; a callback that
    /// produces no result passes its input on unchanged. The first failure
    /// aborts the chain and is returned. A hook with no callbacks returns
    /// `item` as is.
    pub fn run<I: Payload, C: Payload>(
        &self,
        hook: &str,
        item: I,
        ctx: &C,
    ) -> Result<I, CallbackError> {
        let dispatcher = {
            let state = self.state.read();
            match state.tables.get(hook) {
                Some(table) => typed::<I, C>(hook, &**table)?.chained(),
                None => None,
            }
        };
        match dispatcher {
            Some(dispatch) => dispatch(item, ctx),
            None => Ok(item),
        }
    }

    /// Submit every callback of `hook` to the scheduler and return at once.
    ///
    /// All callbacks receive the same `item` and `ctx`; return values are
    /// discarded. Failures and panics stay inside their task and are
    /// reported through [`CallbackWrapper::report_detached`]. The only error
    /// returned here is a type mismatch.
    pub fn run_async<I: Payload, C: Payload>(
        &self,
        hook: &str,
        item: I,
        ctx: C,
    ) -> Result<(), CallbackError> {
        let dispatcher = {
            let state = self.state.read();
            match state.tables.get(hook) {
                Some(table) => typed::<I, C>(hook, &**table)?.parallel(),
                None => None,
            }
        };
        if let Some(dispatch) = dispatcher {
            dispatch(Arc::new(item), Arc::new(ctx));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Instrumentation
    // ------------------------------------------------------------------

    /// Replace the wrapper and rebuild every hook's dispatchers.
    pub fn set_wrapper<W: CallbackWrapper>(&self, wrapper: W) {
        self.replace_wrapper(Arc::new(wrapper));
    }

    /// Replace the wrapper with the one implementing `instrumentation`.
    pub fn set_instrumentation(&self, instrumentation: Instrumentation) {
        self.replace_wrapper(instrumentation.wrapper());
        tracing::debug!(target: "hookline", %instrumentation, "instrumentation changed");
    }

    /// Replace the scheduler used by [`run_async`](Self::run_async).
    pub fn set_scheduler<S: Scheduler + 'static>(&self, scheduler: S) {
        let mut state = self.state.write();
        state.build.scheduler = Arc::new(scheduler);
        state.rebuild_all();
    }

    fn replace_wrapper(&self, wrapper: Arc<dyn CallbackWrapper>) {
        let mut state = self.state.write();
        state.build.wrapper = wrapper;
        state.rebuild_all();
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Metadata of the callbacks under `hook`, in execution order.
    pub fn callbacks(&self, hook: &str) -> Vec<CallbackMeta> {
        self.state
            .read()
            .tables
            .get(hook)
            .map(|table| table.metas())
            .unwrap_or_default()
    }

    /// Names of all hooks with at least one callback, sorted.
    pub fn hooks(&self) -> Vec<String> {
        let mut hooks: Vec<String> = self.state.read().tables.keys().cloned().collect();
        hooks.sort();
        hooks
    }

    /// Whether `id` is registered under `hook`.
    pub fn contains(&self, hook: &str, id: &str) -> bool {
        self.state
            .read()
            .tables
            .get(hook)
            .is_some_and(|table| table.contains(id))
    }

    /// Total number of registered callbacks across all hooks.
    pub fn len(&self) -> usize {
        self.state.read().tables.values().map(|table| table.len()).sum()
    }

    /// Whether no callback is registered.
    pub fn is_empty(&self) -> bool {
        self.state.read().tables.is_empty()
    }
}

impl Default for Callbacks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        let mut hooks: Vec<(&str, usize)> = state
            .tables
            .iter()
            .map(|(hook, table)| (hook.as_str(), table.len()))
            .collect();
        hooks.sort();
        f.debug_struct("Callbacks").field("hooks", &hooks).finish()
    }
}

fn typed<'a, I: Payload, C: Payload>(
    hook: &str,
    table: &'a dyn ErasedTable,
) -> Result<&'a HookTable<I, C>, CallbackError> {
    table
        .as_any()
        .downcast_ref::<HookTable<I, C>>()
        .ok_or_else(|| CallbackError::TypeMismatch {
            hook: hook.to_string(),
            registered: table.payload_types(),
            requested: HookTable::<I, C>::pair_name(),
        })
}

fn default_scheduler() -> Arc<dyn Scheduler> {
    match PoolScheduler::shared() {
        Some(pool) => Arc::new(pool),
        None => Arc::new(ThreadScheduler::new()),
    }
}

fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Builder for [`Callbacks`].
///
/// # Example
///
/// ```rust
/// use hookline::{Callbacks, Instrumentation};
/// use hookline::schedulers::ThreadScheduler;
///
/// let callbacks = Callbacks::builder()
///     .instrumentation(Instrumentation::Logging)
///     .scheduler(ThreadScheduler::named("after-save"))
///     .build();
/// assert!(callbacks.is_empty());
/// ```
#[derive(Default)]
pub struct CallbacksBuilder {
    wrapper: Option<Arc<dyn CallbackWrapper>>,
    scheduler: Option<Arc<dyn Scheduler>>,
}

impl CallbacksBuilder {
    /// Decorate dispatch with `wrapper`.
    pub fn wrapper<W: CallbackWrapper>(mut self, wrapper: W) -> Self {
        self.wrapper = Some(Arc::new(wrapper));
        self
    }

    /// Decorate dispatch with the wrapper implementing `instrumentation`.
    pub fn instrumentation(mut self, instrumentation: Instrumentation) -> Self {
        self.wrapper = Some(instrumentation.wrapper());
        self
    }

    /// Run detached callbacks on `scheduler`.
    pub fn scheduler<S: Scheduler + 'static>(mut self, scheduler: S) -> Self {
        self.scheduler = Some(Arc::new(scheduler));
        self
    }

    /// Build the registry.
    pub fn build(self) -> Callbacks {
        let build = BuildContext {
            wrapper: self.wrapper.unwrap_or_else(|| Arc::new(DefaultWrapper)),
            scheduler: self.scheduler.unwrap_or_else(default_scheduler),
        };
        Callbacks {
            state: RwLock::new(State {
                tables: HashMap::new(),
                build,
            }),
        }
    }
}

impl fmt::Debug for CallbacksBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbacksBuilder")
            .field("wrapper", &self.wrapper.is_some())
            .field("scheduler", &self.scheduler.is_some())
            .finish()
    }
}
