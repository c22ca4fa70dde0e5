//! Orchestration of a single trace run.
//!
//! A run walks a fixed state machine:
//! `Idle -> Validating -> Synthesizing -> InitializingHost (first run only)
//! -> Executing -> Parsing -> Done`, dropping to `Failed` from any phase.
//! [`Tracer::run`] is the only recovery point: every error raised below it
//! comes back as a [`TraceFailure`] naming the phase that failed, and
//! nothing is retried.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use pytrace_core::{guard, synth, transport};
use pytrace_core::{ExecutionConfig, TraceError, TraceOutcome};

use crate::config::HostConfig;
use crate::host::InterpreterHost;

/// Phases of a trace run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TracePhase {
    Idle,
    Validating,
    Synthesizing,
    InitializingHost,
    Executing,
    Parsing,
    Done,
    Failed,
}

impl fmt::Display for TracePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TracePhase::Idle => "idle",
            TracePhase::Validating => "validating",
            TracePhase::Synthesizing => "synthesizing",
            TracePhase::InitializingHost => "initializing_host",
            TracePhase::Executing => "executing",
            TracePhase::Parsing => "parsing",
            TracePhase::Done => "done",
            TracePhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A failed run: the error and the phase it was raised in.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct TraceFailure {
    pub phase: TracePhase,
    pub error: TraceError,
}

/// Tracks the current phase of one run and logs transitions.
struct RunState {
    phase: TracePhase,
    started: Instant,
    visited: Vec<TracePhase>,
}

impl RunState {
    fn new() -> Self {
        RunState {
            phase: TracePhase::Idle,
            started: Instant::now(),
            visited: Vec::new(),
        }
    }

    fn enter(&mut self, phase: TracePhase) {
        tracing::debug!(from = %self.phase, to = %phase, "trace phase");
        self.phase = phase;
        self.visited.push(phase);
    }

    fn fail(&mut self, error: impl Into<TraceError>) -> TraceFailure {
        let error = error.into();
        let failed_in = self.phase;
        tracing::warn!(
            phase = %failed_in,
            kind = error.kind(),
            error = %error,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "trace failed"
        );
        self.phase = TracePhase::Failed;
        TraceFailure {
            phase: failed_in,
            error,
        }
    }
}

/// Runs traces against a shared [`InterpreterHost`].
#[derive(Clone)]
pub struct Tracer {
    host: Arc<InterpreterHost>,
}

impl Tracer {
    pub fn new(config: HostConfig) -> Self {
        Tracer::with_host(Arc::new(InterpreterHost::new(config)))
    }

    pub fn with_host(host: Arc<InterpreterHost>) -> Self {
        Tracer { host }
    }

    pub fn host(&self) -> &Arc<InterpreterHost> {
        &self.host
    }

    /// Validates, synthesizes, executes and decodes one trace.
    pub async fn run(
        &self,
        source: &str,
        config: &ExecutionConfig,
    ) -> Result<TraceOutcome, TraceFailure> {
        self.drive(source, config, &mut RunState::new()).await
    }

    async fn drive(
        &self,
        source: &str,
        config: &ExecutionConfig,
        state: &mut RunState,
    ) -> Result<TraceOutcome, TraceFailure> {
        state.enter(TracePhase::Validating);
        guard::check_request(source, config).map_err(|e| state.fail(e))?;

        state.enter(TracePhase::Synthesizing);
        let program = synth::synthesize_for(source, config);

        if !self.host.is_ready() {
            state.enter(TracePhase::InitializingHost);
            self.host.ensure_ready().await.map_err(|e| state.fail(e))?;
        }

        state.enter(TracePhase::Executing);
        let raw = self
            .host
            .run_program(&program)
            .await
            .map_err(|e| state.fail(e))?;

        state.enter(TracePhase::Parsing);
        let transport_str = raw.value.as_str().ok_or_else(|| {
            state.fail(TraceError::Parse(format!(
                "expected a transport string, got {}",
                json_kind(&raw.value)
            )))
        })?;
        let mut outcome = transport::parse_outcome(transport_str).map_err(|e| state.fail(e))?;
        outcome.stdout = raw.stdout;

        state.enter(TracePhase::Done);
        tracing::info!(
            function = %config.function_name,
            steps = outcome.steps.len(),
            run_ms = raw.elapsed.as_millis() as u64,
            total_ms = state.started.elapsed().as_millis() as u64,
            phases = ?state.visited,
            "trace finished"
        );
        Ok(outcome)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
