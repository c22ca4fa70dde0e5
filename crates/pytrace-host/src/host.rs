//! The embedded interpreter host.
//!
//! [`InterpreterHost`] owns the handle to the Python runtime. The handle is
//! created lazily by the first caller of [`InterpreterHost::ensure_ready`]
//! and reused for the life of the host; concurrent callers during that first
//! initialization all await the same attempt (`tokio::sync::OnceCell`). A
//! failed attempt is not cached, so the next caller tries again.
//!
//! Each program runs in a fresh runtime process fed through a small
//! bootstrap that executes the program and reports the value of its final
//! expression statement. Runs are serialized through an async mutex and
//! bounded by the configured deadline: when it passes, the process is killed.
//! Dropping a `run_program` future has the same effect, which is how callers
//! cancel a run.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::{Mutex, OnceCell};

use crate::config::HostConfig;
use crate::error::HostError;

/// Runs a program read from stdin and prints a JSON result envelope.
const BOOTSTRAP: &str = include_str!("bootstrap.py");

/// Reports version info and rejects interpreters older than 3.8.
const PROBE: &str = "import json, sys\n\
print(json.dumps({\"version\": \"%d.%d.%d\" % sys.version_info[:3], \
\"supported\": sys.version_info >= (3, 8)}))";

/// Deadline for the version probe, independent of the run deadline.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// A located, probed Python runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeHandle {
    /// Executable the host spawns for every run.
    pub executable: PathBuf,
    /// `major.minor.micro` as reported by the runtime.
    pub version: String,
}

/// Snapshot of the host's lifecycle, without triggering initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeStatus {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// What a finished program handed back.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOutput {
    /// Value of the program's final expression statement (`null` if none).
    pub value: serde_json::Value,
    /// Everything the program wrote to stdout.
    pub stdout: String,
    pub elapsed: Duration,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    stdout: String,
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    version: String,
    supported: bool,
}

/// Owner of the single Python runtime handle.
pub struct InterpreterHost {
    config: HostConfig,
    runtime: OnceCell<RuntimeHandle>,
    run_lock: Mutex<()>,
}

impl InterpreterHost {
    pub fn new(config: HostConfig) -> Self {
        InterpreterHost {
            config,
            runtime: OnceCell::new(),
            run_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Whether the runtime handle has been created.
    pub fn is_ready(&self) -> bool {
        self.runtime.initialized()
    }

    pub fn status(&self) -> RuntimeStatus {
        match self.runtime.get() {
            Some(handle) => RuntimeStatus {
                ready: true,
                executable: Some(handle.executable.display().to_string()),
                version: Some(handle.version.clone()),
            },
            None => RuntimeStatus {
                ready: false,
                executable: None,
                version: None,
            },
        }
    }

    /// Returns the runtime handle, locating and probing the runtime on first use.
    pub async fn ensure_ready(&self) -> Result<&RuntimeHandle, HostError> {
        self.runtime
            .get_or_try_init(|| locate_runtime(&self.config))
            .await
    }

    /// Runs `program` to completion and returns its final expression value.
    pub async fn run_program(&self, program: &str) -> Result<RawOutput, HostError> {
        let handle = self.ensure_ready().await?;
        let _running = self.run_lock.lock().await;

        let started = Instant::now();
        let mut child = Command::new(&handle.executable)
            .arg("-I")
            .arg("-c")
            .arg(BOOTSTRAP)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| HostError::Spawn {
                executable: handle.executable.display().to_string(),
                source,
            })?;

        let exchange = async move {
            if let Some(mut stdin) = child.stdin.take() {
                // A runtime that dies early closes the pipe; its stderr says why.
                if let Err(err) = stdin.write_all(program.as_bytes()).await {
                    tracing::warn!(error = %err, "failed to write program to runtime");
                }
            }
            child.wait_with_output().await
        };

        let output = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, exchange).await {
                Ok(output) => output?,
                Err(_) => {
                    tracing::warn!(limit_ms = limit.as_millis() as u64, "program run timed out");
                    return Err(HostError::Timeout { limit });
                }
            },
            None => exchange.await?,
        };

        let elapsed = started.elapsed();
        tracing::debug!(
            elapsed_ms = elapsed.as_millis() as u64,
            status = %output.status,
            "program run finished"
        );

        let mut raw = decode_output(output.status, &output.stdout, &output.stderr)?;
        raw.elapsed = elapsed;
        Ok(raw)
    }
}

/// Tries each configured candidate until one passes the version probe.
async fn locate_runtime(config: &HostConfig) -> Result<RuntimeHandle, HostError> {
    let mut tried = Vec::new();
    for candidate in config.candidates() {
        let label = candidate.display().to_string();
        match probe(&candidate).await {
            Ok(handle) => {
                tracing::info!(
                    executable = %handle.executable.display(),
                    version = %handle.version,
                    "python runtime ready"
                );
                return Ok(handle);
            }
            Err(err @ HostError::UnsupportedRuntime { .. }) => return Err(err),
            Err(err) => {
                tracing::debug!(candidate = %label, error = %err, "runtime candidate rejected");
                tried.push(label);
            }
        }
    }
    Err(HostError::RuntimeNotFound { tried })
}

async fn probe(executable: &Path) -> Result<RuntimeHandle, HostError> {
    let mut command = Command::new(executable);
    command
        .arg("-I")
        .arg("-c")
        .arg(PROBE)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    let output = tokio::time::timeout(PROBE_TIMEOUT, command.output())
        .await
        .map_err(|_| HostError::Timeout {
            limit: PROBE_TIMEOUT,
        })?
        .map_err(|source| HostError::Spawn {
            executable: executable.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(HostError::MalformedOutput(format!(
            "probe exited with {}",
            output.status
        )));
    }

    let report: ProbeReport = serde_json::from_slice(&output.stdout)
        .map_err(|e| HostError::MalformedOutput(format!("probe output: {}", e)))?;

    if !report.supported {
        return Err(HostError::UnsupportedRuntime {
            executable: executable.display().to_string(),
            version: report.version,
        });
    }

    Ok(RuntimeHandle {
        executable: executable.to_path_buf(),
        version: report.version,
    })
}

/// Turns the bootstrap's output into a [`RawOutput`] or the runtime's error.
fn decode_output(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> Result<RawOutput, HostError> {
    let text = String::from_utf8_lossy(stdout);
    let envelope: Envelope = match serde_json::from_str(text.trim()) {
        Ok(envelope) => envelope,
        Err(parse_err) => {
            let stderr = String::from_utf8_lossy(stderr).trim().to_string();
            return Err(if !status.success() {
                HostError::Execution {
                    message: if stderr.is_empty() {
                        format!("runtime exited with {}", status)
                    } else {
                        stderr
                    },
                }
            } else {
                HostError::MalformedOutput(parse_err.to_string())
            });
        }
    };

    if !envelope.ok {
        return Err(HostError::Execution {
            message: envelope
                .error
                .unwrap_or_else(|| "runtime reported an unnamed error".to_string()),
        });
    }

    Ok(RawOutput {
        value: envelope.value,
        stdout: envelope.stdout,
        elapsed: Duration::ZERO,
    })
}
