//! Tool call scheduler use case
//!
//! Drives every call of a batch through validation, optional human
//! confirmation and execution, and delivers one aggregated completion per
//! batch.
//!
//! # Flow
//!
//! ```text
//! schedule(requests)
//!   │  resolve each tool (unknown → Error immediately)
//!   ▼
//! Validating ──validate_params / should_confirm_execute──┐  (concurrent)
//!   │                                                      │
//!   ├── no confirmation ──────────────▶ Scheduled          │
//!   └── confirmation ─▶ AwaitingApproval ─proceed─▶ Scheduled
//!                                  └──cancel──▶ Cancelled  │
//!                                                          ▼
//!             all calls Scheduled / terminal ─▶ Executing (concurrent)
//!                                                          ▼
//!                         Success | Error | Cancelled ─▶ on_all_tool_calls_complete
//! ```
//!
//! # Concurrency
//!
//! All batch state sits behind one mutex and changes only through
//! [`Batch::apply`]. Each commit settles the batch in the same critical
//! section (start execution when the gate opens, detect completion) and
//! returns the side effects, which run after the lock is released: observer
//! callbacks, spawning executions, delivering the completion.
//!
//! Every commit is tagged with the [`BatchId`] it belongs to, so a task that
//! outlives its batch (e.g. a tool that ignored cancellation) cannot touch
//! the next one even when call ids are reused.

mod types;

pub use types::{BatchCompletion, SIGNAL_CANCELLED_REASON, SchedulerError, USER_DECLINED_REASON};

use crate::config::SchedulerConfig;
use crate::ports::{
    cancellation::{CancellationSource, FreshTokens},
    tool::{ExecutionContext, LiveOutput, Tool, tool_info},
    tool_call_observer::{NoToolCallObserver, ToolCallObserver},
    tool_registry::ToolRegistryPort,
};
use conductor_domain::{
    Batch, BatchId, CallId, CompletedToolCall, ConfirmationOutcome, ToolArgs, ToolCall,
    ToolCallRequest, ToolCallStatus, Transition, current_timestamp,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Schedules batches of tool calls
///
/// Cheap to clone; clones share the same state. Methods that start work
/// (`schedule`, and the tasks it spawns) must run inside a Tokio runtime.
#[derive(Clone)]
pub struct ToolScheduler {
    inner: Arc<Inner>,
}

/// Builder for [`ToolScheduler`]
pub struct ToolSchedulerBuilder {
    registry: Arc<dyn ToolRegistryPort>,
    observer: Arc<dyn ToolCallObserver>,
    config: SchedulerConfig,
    tokens: Arc<dyn CancellationSource>,
}

impl ToolSchedulerBuilder {
    pub fn with_observer(mut self, observer: Arc<dyn ToolCallObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cancellation_source(mut self, tokens: Arc<dyn CancellationSource>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn build(self) -> ToolScheduler {
        let token = self.tokens.new_token();
        let (snapshots, _) = watch::channel(Vec::new());
        ToolScheduler {
            inner: Arc::new(Inner {
                registry: self.registry,
                observer: self.observer,
                config: self.config,
                tokens: self.tokens,
                snapshots,
                state: Mutex::new(SchedulerState {
                    next_batch: 1,
                    batch: None,
                    tools: HashMap::new(),
                    pending: HashMap::new(),
                    token,
                    completion: None,
                }),
            }),
        }
    }
}

impl ToolScheduler {
    pub fn builder(registry: Arc<dyn ToolRegistryPort>) -> ToolSchedulerBuilder {
        ToolSchedulerBuilder {
            registry,
            observer: Arc::new(NoToolCallObserver),
            config: SchedulerConfig::default(),
            tokens: Arc::new(FreshTokens),
        }
    }

    pub fn new(registry: Arc<dyn ToolRegistryPort>) -> Self {
        Self::builder(registry).build()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    /// Submit a batch of tool calls.
    ///
    /// Fails fast with [`SchedulerError::BatchInFlight`] while the previous
    /// batch has any non-terminal call; the in-flight batch is untouched.
    /// The returned handle resolves once every call is terminal.
    pub fn schedule(
        &self,
        requests: impl IntoIterator<Item = ToolCallRequest>,
    ) -> Result<BatchCompletion, SchedulerError> {
        let requests: Vec<ToolCallRequest> = requests.into_iter().collect();
        if requests.is_empty() {
            return Err(SchedulerError::EmptyBatch);
        }
        Batch::check_unique(requests.iter().map(|r| &r.call_id))?;
        self.inner.start_batch(requests)
    }

    /// Cancel every non-terminal call of the current batch.
    ///
    /// Calls that already finished keep their result. A no-op when idle.
    pub fn cancel(&self, reason: &str) {
        self.inner.cancel(reason);
    }

    /// Answer a pending confirmation.
    pub fn resolve_confirmation(
        &self,
        call_id: &CallId,
        outcome: ConfirmationOutcome,
    ) -> Result<(), SchedulerError> {
        let responder = self.inner.lock().pending.remove(call_id);
        match responder {
            Some(tx) => tx
                .send(outcome)
                .map_err(|_| SchedulerError::NoPendingConfirmation(call_id.to_string())),
            None => {
                warn!(call_id = %call_id, "No confirmation pending");
                Err(SchedulerError::NoPendingConfirmation(call_id.to_string()))
            }
        }
    }

    /// Latest batch snapshot, updated with every transition.
    ///
    /// After completion the receiver keeps the final, all-terminal snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ToolCall>> {
        self.inner.snapshots.subscribe()
    }

    /// Calls of the batch in flight, in request order; empty when idle.
    pub fn snapshot(&self) -> Vec<ToolCall> {
        self.inner
            .lock()
            .batch
            .as_ref()
            .map(Batch::snapshot)
            .unwrap_or_default()
    }

    pub fn is_idle(&self) -> bool {
        self.inner.lock().batch.is_none()
    }
}

struct Inner {
    registry: Arc<dyn ToolRegistryPort>,
    observer: Arc<dyn ToolCallObserver>,
    config: SchedulerConfig,
    tokens: Arc<dyn CancellationSource>,
    snapshots: watch::Sender<Vec<ToolCall>>,
    state: Mutex<SchedulerState>,
}

struct SchedulerState {
    next_batch: u64,
    /// `None` when idle; taken out as soon as the batch completes.
    batch: Option<Batch>,
    tools: HashMap<CallId, Arc<dyn Tool>>,
    pending: HashMap<CallId, oneshot::Sender<ConfirmationOutcome>>,
    token: CancellationToken,
    completion: Option<oneshot::Sender<Vec<CompletedToolCall>>>,
}

/// A call whose execution should be spawned.
struct Launch {
    call_id: CallId,
    tool: Arc<dyn Tool>,
    args: ToolArgs,
}

/// Side effects of one commit, run outside the lock.
#[derive(Default)]
struct Effects {
    batch: Option<BatchId>,
    token: Option<CancellationToken>,
    snapshot: Option<Vec<ToolCall>>,
    launches: Vec<Launch>,
    completed: Option<Vec<CompletedToolCall>>,
    completion: Option<oneshot::Sender<Vec<CompletedToolCall>>>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_batch(
        self: &Arc<Self>,
        requests: Vec<ToolCallRequest>,
    ) -> Result<BatchCompletion, SchedulerError> {
        let resolved: Vec<Option<Arc<dyn Tool>>> = requests
            .iter()
            .map(|r| self.registry.get_tool(&r.name))
            .collect();

        let (tx, rx) = oneshot::channel();
        let mut validations = Vec::new();

        let (batch_id, token, effects) = {
            let mut state = self.lock();
            if let Some(current) = &state.batch {
                let active = current.calls().filter(|c| !c.is_terminal()).count();
                warn!(
                    batch = %current.id(),
                    active,
                    "Rejected schedule() while a batch is in flight"
                );
                return Err(SchedulerError::BatchInFlight { active });
            }

            let batch_id = BatchId(state.next_batch);
            let now = current_timestamp();
            let mut calls = Vec::with_capacity(requests.len());
            let mut tools = HashMap::new();
            for (request, tool) in requests.into_iter().zip(resolved) {
                match tool {
                    Some(tool) => {
                        let info = tool_info(tool.as_ref(), &request.args);
                        validations.push(Launch {
                            call_id: request.call_id.clone(),
                            tool: tool.clone(),
                            args: request.args.clone(),
                        });
                        tools.insert(request.call_id.clone(), tool);
                        calls.push(ToolCall::validating(request, info, now));
                    }
                    None => {
                        debug!(call_id = %request.call_id, tool = %request.name, "Tool not found");
                        calls.push(ToolCall::unknown_tool(request, now));
                    }
                }
            }

            let batch = Batch::new(batch_id, calls)?;
            info!(batch = %batch_id, calls = batch.len(), "Scheduling tool calls");

            state.next_batch += 1;
            state.batch = Some(batch);
            state.tools = tools;
            state.completion = Some(tx);
            let token = state.token.clone();
            let effects = self.settle(&mut *state);
            (batch_id, token, effects)
        };

        self.run_effects(effects);

        for launch in validations {
            let inner = self.clone();
            let token = token.clone();
            tokio::spawn(async move {
                inner.validate_and_confirm(batch_id, launch, token).await;
            });
        }

        Ok(BatchCompletion::new(batch_id, rx))
    }

    fn cancel(self: &Arc<Self>, reason: &str) {
        let effects = {
            let mut state = self.lock();
            let Some(batch) = state.batch.take() else {
                trace!("cancel() on idle scheduler");
                return;
            };
            info!(batch = %batch.id(), reason, "Cancelling batch");
            state.token.cancel();
            state.pending.clear();
            let (batch, _) = batch.apply(
                Transition::CancelAll {
                    reason: reason.to_string(),
                },
                current_timestamp(),
            );
            state.batch = Some(batch);
            self.settle(&mut *state)
        };
        self.run_effects(effects);
    }

    /// Apply `transition` to batch `batch_id`; returns whether it changed.
    fn commit(self: &Arc<Self>, batch_id: BatchId, transition: Transition) -> bool {
        self.commit_with(batch_id, transition, |_| {})
    }

    /// Like [`commit`](Self::commit), running `on_applied` in the same
    /// critical section when the transition took effect.
    fn commit_with(
        self: &Arc<Self>,
        batch_id: BatchId,
        transition: Transition,
        on_applied: impl FnOnce(&mut SchedulerState),
    ) -> bool {
        let effects = {
            let mut state = self.lock();
            let Some(batch) = state.batch.take() else {
                trace!(batch = %batch_id, "Dropping transition for finished batch");
                return false;
            };
            if batch.id() != batch_id {
                trace!(batch = %batch_id, current = %batch.id(), "Dropping stale transition");
                state.batch = Some(batch);
                return false;
            }
            let (batch, changed) = batch.apply(transition, current_timestamp());
            state.batch = Some(batch);
            if !changed {
                return false;
            }
            on_applied(&mut *state);
            self.settle(&mut *state)
        };
        self.run_effects(effects);
        true
    }

    /// Open the execution gate and detect completion. Called with the lock held.
    fn settle(&self, state: &mut SchedulerState) -> Effects {
        let mut effects = Effects::default();
        let Some(batch) = state.batch.take() else {
            return effects;
        };
        effects.batch = Some(batch.id());

        let ready = batch.ids_with_status(ToolCallStatus::Scheduled);
        let (batch, started) = batch.apply(Transition::StartExecution, current_timestamp());
        if started {
            debug!(batch = %batch.id(), calls = ready.len(), "Starting execution");
            effects.token = Some(state.token.clone());
            for call_id in ready {
                let (Some(tool), Some(call)) = (state.tools.get(&call_id), batch.get(&call_id))
                else {
                    continue;
                };
                effects.launches.push(Launch {
                    args: call.request.args.clone(),
                    tool: tool.clone(),
                    call_id,
                });
            }
        }

        let snapshot = batch.snapshot();
        self.snapshots.send_replace(snapshot.clone());
        effects.snapshot = Some(snapshot);

        if batch.is_complete() {
            info!(batch = %batch.id(), "All tool calls complete");
            effects.completed = Some(batch.completed());
            effects.completion = state.completion.take();
            state.tools.clear();
            state.pending.clear();
            state.token = self.tokens.new_token();
        } else {
            state.batch = Some(batch);
        }
        effects
    }

    fn run_effects(self: &Arc<Self>, effects: Effects) {
        if let Some(snapshot) = &effects.snapshot {
            self.observer.on_tool_calls_update(snapshot);
        }

        if let (Some(batch_id), Some(token)) = (effects.batch, effects.token) {
            for launch in effects.launches {
                let inner = self.clone();
                let token = token.clone();
                tokio::spawn(async move {
                    inner.execute_call(batch_id, launch, token).await;
                });
            }
        }

        if let Some(completed) = effects.completed {
            self.observer.on_all_tool_calls_complete(&completed);
            if let Some(tx) = effects.completion {
                let _ = tx.send(completed);
            }
        }
    }

    fn cancelled(call_id: CallId) -> Transition {
        Transition::Cancel {
            call_id,
            reason: SIGNAL_CANCELLED_REASON.to_string(),
        }
    }

    async fn validate_and_confirm(
        self: Arc<Self>,
        batch_id: BatchId,
        launch: Launch,
        token: CancellationToken,
    ) {
        let Launch { call_id, tool, args } = launch;

        if let Err(error) = tool.validate_params(&args) {
            debug!(call_id = %call_id, %error, "Invalid tool parameters");
            self.commit(batch_id, Transition::Fail { call_id, error });
            return;
        }

        if self.config.skips_confirmation() {
            self.commit(batch_id, Transition::Schedule { call_id });
            return;
        }

        let confirmation = tokio::select! {
            biased;
            _ = token.cancelled() => {
                self.commit(batch_id, Self::cancelled(call_id));
                return;
            }
            result = tool.should_confirm_execute(&args, &token) => result,
        };

        let confirmation = match confirmation {
            Ok(None) => {
                self.commit(batch_id, Transition::Schedule { call_id });
                return;
            }
            Ok(Some(confirmation)) => confirmation,
            Err(error) => {
                debug!(call_id = %call_id, %error, "Confirmation check failed");
                self.commit(batch_id, Transition::Fail { call_id, error });
                return;
            }
        };

        let (details, hook) = confirmation.into_parts();
        if self.config.auto_approves_edits() && details.is_edit() {
            debug!(call_id = %call_id, "Auto-approving edit");
            if let Some(hook) = hook {
                hook(ConfirmationOutcome::ProceedOnce);
            }
            self.commit(batch_id, Transition::Schedule { call_id });
            return;
        }

        let (tx, rx) = oneshot::channel();
        let awaiting = self.commit_with(
            batch_id,
            Transition::AwaitApproval {
                call_id: call_id.clone(),
                confirmation: details,
            },
            |state| {
                state.pending.insert(call_id.clone(), tx);
            },
        );
        if !awaiting {
            return;
        }
        debug!(call_id = %call_id, "Awaiting approval");

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            outcome = rx => outcome.ok(),
        };

        let Some(outcome) = outcome else {
            self.commit(batch_id, Self::cancelled(call_id));
            return;
        };

        debug!(call_id = %call_id, %outcome, "Confirmation resolved");
        if let Some(hook) = hook {
            hook(outcome);
        }
        let transition = if outcome.is_proceed() {
            Transition::Schedule { call_id }
        } else {
            Transition::Cancel {
                call_id,
                reason: USER_DECLINED_REASON.to_string(),
            }
        };
        self.commit(batch_id, transition);
    }

    async fn execute_call(
        self: Arc<Self>,
        batch_id: BatchId,
        launch: Launch,
        token: CancellationToken,
    ) {
        let Launch { call_id, tool, args } = launch;

        let output = {
            let inner = Arc::downgrade(&self);
            let call_id = call_id.clone();
            LiveOutput::new(move |output| {
                if let Some(inner) = inner.upgrade() {
                    inner.commit(
                        batch_id,
                        Transition::UpdateOutput {
                            call_id: call_id.clone(),
                            output,
                        },
                    );
                }
            })
        };
        let ctx = ExecutionContext::new(token.clone(), output);

        debug!(call_id = %call_id, tool = tool.name(), "Executing tool");
        let transition = tokio::select! {
            biased;
            _ = token.cancelled() => Self::cancelled(call_id),
            result = tool.execute(&args, &ctx) => {
                if token.is_cancelled() {
                    Self::cancelled(call_id)
                } else {
                    match result {
                        Ok(result) => Transition::Succeed { call_id, result },
                        Err(error) => {
                            debug!(call_id = %call_id, %error, "Tool execution failed");
                            Transition::Fail { call_id, error }
                        }
                    }
                }
            }
        };
        self.commit(batch_id, transition);
    }
}
