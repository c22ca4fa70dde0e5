//! pytrace command-line front end.
//!
//! Provides the `pytrace` binary with two subcommands: `trace`, which runs
//! the same orchestration as the HTTP server's `POST /trace` and prints the
//! steps, and `check`, which runs the denylist scan on its own.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pytrace_core::{analyzer, ExecutionConfig, TraceError, TraceOutcome};
use pytrace_host::{HostConfig, Tracer};

/// Step-by-step tracer for Python functions.
#[derive(Parser)]
#[command(name = "pytrace", about = "Step-by-step tracer for Python functions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Trace one call of a function defined in a snippet.
    Trace {
        /// Snippet file, or `-` for stdin.
        #[arg(short, long)]
        file: PathBuf,

        /// Name of the function to call.
        #[arg(short = 'n', long)]
        function: String,

        /// Argument literal, spliced into the call as Python source.
        #[arg(short, long)]
        arg: String,

        /// Print the outcome as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Per-run deadline in milliseconds (0 disables; default: env or 10000).
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Python executable (default: env `PYTRACE_PYTHON`, then `python3`/`python`).
        #[arg(long)]
        python: Option<PathBuf>,
    },
    /// Scan a snippet for forbidden patterns without running it.
    Check {
        /// Snippet file, or `-` for stdin.
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Trace {
            file,
            function,
            arg,
            json,
            timeout_ms,
            python,
        } => run_trace(&file, function, arg, json, timeout_ms, python),
        Commands::Check { file } => run_check(&file),
    };
    process::exit(exit_code);
}

/// Execute the trace subcommand.
///
/// Returns exit code: 0 = success, 1 = validation error,
/// 2 = execution error or timeout, 3 = I/O or other error.
fn run_trace(
    file: &Path,
    function: String,
    arg: String,
    json: bool,
    timeout_ms: Option<u64>,
    python: Option<PathBuf>,
) -> i32 {
    let source = match read_source(file) {
        Ok(source) => source,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };

    let mut config = match HostConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 3;
        }
    };
    if let Some(ms) = timeout_ms {
        config.timeout = (ms > 0).then(|| Duration::from_millis(ms));
    }
    if let Some(python) = python {
        config.python = Some(python);
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return 3;
        }
    };

    let tracer = Tracer::new(config);
    let exec_config = ExecutionConfig::new(function, arg);
    match runtime.block_on(tracer.run(&source, &exec_config)) {
        Ok(outcome) => {
            if json {
                match serde_json::to_string_pretty(&outcome) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Error: failed to serialize outcome: {}", e);
                        return 3;
                    }
                }
            } else {
                print!("{}", render(&outcome));
            }
            0
        }
        Err(failure) => {
            eprintln!("Error: {}", failure);
            match failure.error {
                TraceError::Validation(_) => 1,
                TraceError::Execution(_) | TraceError::Timeout(_) => 2,
                TraceError::Parse(_) | TraceError::Unknown(_) => 3,
            }
        }
    }
}

/// Execute the check subcommand. Returns 1 when any pattern matched.
fn run_check(file: &Path) -> i32 {
    let source = match read_source(file) {
        Ok(source) => source,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };

    let matched = analyzer::forbidden_matches(&source);
    if matched.is_empty() {
        println!("ok: no forbidden patterns");
        0
    } else {
        for pattern in &matched {
            println!("forbidden: {}", pattern);
        }
        1
    }
}

fn read_source(file: &Path) -> Result<String, String> {
    if file == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        Ok(source)
    } else {
        std::fs::read_to_string(file)
            .map_err(|e| format!("failed to read '{}': {}", file.display(), e))
    }
}

/// Renders steps the way the trace view shows them: 1-based step headers,
/// the line, then one `name: json` row per variable.
fn render(outcome: &TraceOutcome) -> String {
    let mut out = String::new();
    for step in &outcome.steps {
        out.push_str(&format!("Step {}\n", step.step + 1));
        out.push_str(&format!("Line {}: {}\n", step.line, step.code));
        out.push_str("Variables:\n");
        for (name, value) in &step.variables {
            out.push_str(&format!("  {}: {}\n", name, value));
        }
        out.push('\n');
    }
    if !outcome.stdout.is_empty() {
        out.push_str("Output:\n");
        for line in outcome.stdout.lines() {
            out.push_str(&format!("  {}\n", line));
        }
    }
    out.push_str(&format!("Result: {}\n", outcome.result));
    out
}
