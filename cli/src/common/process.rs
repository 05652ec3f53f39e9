//! # shipctl Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Local command execution for the docker and git backends. Post-deploy
//! commands are stored as flat strings in `deploy.json`; before anything is
//! spawned they are split into an argv-style token list by `tokenize`, so no
//! local shell ever interprets them.
//!
//! ## Architecture
//!
//! - **`tokenize`**: pure quote-aware splitter.
//! - **`CommandSpec`**: program, arguments, working directory and environment
//!   overlay for one process, plus the original command line for error
//!   messages.
//! - **`CommandRunner`**: the spawning seam. `ProcessRunner` is the real
//!   implementation on top of `tokio::process::Command` (stdio inherited, so
//!   the user sees `docker-compose`/`git` output live). Tests substitute a
//!   recording runner.
//! - **`run_command_lines`**: runs a list of command strings strictly in
//!   order and stops at the first failure.
//!
//! ## Usage
//!
//! ```rust
//! let runner = ProcessRunner;
//! let commands = vec!["npm ci".to_string(), "npm run build".to_string()];
//! process::run_command_lines(&runner, &commands, Path::new("/srv/app"), &HashMap::new()).await?;
//! ```
//!
use crate::core::error::{Result, ShipError};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, error, info};

/// Splits a command line into tokens.
///
/// A space outside quotes ends the current token. Either `"` or `'` toggles the
/// quoted state (the opening character is not remembered, so `'a"` is a closed
/// pair and an unmatched quote keeps the rest of the line quoted). Quote
/// characters are dropped. Runs of spaces never produce empty tokens.
pub fn tokenize(command: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in command.chars() {
        match ch {
            '"' | '\'' => in_quotes = !in_quotes,
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

/// A single process to spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    /// Command line as written by the user; used in messages and errors.
    pub line: String,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Applied on top of the inherited process environment; these keys win.
    pub env: HashMap<String, String>,
}

impl CommandSpec {
    /// Builds a spec from a command line. Returns `None` for a blank line.
    pub fn from_line(line: &str, cwd: &Path, env: &HashMap<String, String>) -> Option<Self> {
        let mut tokens = tokenize(line).into_iter();
        let program = tokens.next()?;
        Some(Self {
            line: line.to_string(),
            program,
            args: tokens.collect(),
            cwd: Some(cwd.to_path_buf()),
            env: env.clone(),
        })
    }

    /// Builds a spec for a fixed program and argument list (e.g. `git clone ...`).
    pub fn new(program: &str, args: &[&str], cwd: Option<&Path>) -> Self {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        Self {
            line: std::iter::once(program.to_string())
                .chain(args.iter().cloned())
                .collect::<Vec<_>>()
                .join(" "),
            program: program.to_string(),
            args,
            cwd: cwd.map(Path::to_path_buf),
            env: HashMap::new(),
        }
    }
}

/// Spawns local processes and waits for them.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `spec` to completion. A spawn failure or a non-zero exit is an
    /// `ShipError::Execution` error.
    async fn run(&self, spec: &CommandSpec) -> Result<()>;
}

/// `CommandRunner` backed by `tokio::process::Command` with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<()> {
        let mut command = tokio::process::Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
            debug!("Setting CWD for command to {}", dir.display());
        }
        command.envs(&spec.env);

        // Inherit stdio so the user sees the tool's own progress output.
        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());

        let status = command.status().await.map_err(|e| {
            anyhow!(ShipError::Execution {
                cmd: spec.line.clone(),
                status: format!("failed to start '{}': {}", spec.program, e),
            })
        })?;

        if !status.success() {
            let exit_code = status.code().map_or("?".to_string(), |c| c.to_string());
            error!("Command '{}' failed with exit code {}", spec.line, exit_code);
            return Err(anyhow!(ShipError::Execution {
                cmd: spec.line.clone(),
                status: format!("exit code {}", exit_code),
            }));
        }

        info!("Command '{}' completed successfully.", spec.line);
        Ok(())
    }
}

/// Tokenizes and runs each command line in order, rooted at `cwd` with `env`
/// overlaid. Blank lines are skipped. The first failure is returned and the
/// remaining lines are not run.
pub async fn run_command_lines(
    runner: &dyn CommandRunner,
    commands: &[String],
    cwd: &Path,
    env: &HashMap<String, String>,
) -> Result<()> {
    let total = commands.len();
    for (index, line) in commands.iter().enumerate() {
        println!("  [{}/{}] Running: {}", index + 1, total, line);
        let Some(spec) = CommandSpec::from_line(line, cwd, env) else {
            debug!("Skipping blank command at position {}", index + 1);
            continue;
        };
        runner.run(&spec).await?;
    }
    Ok(())
}

/// Recording `CommandRunner` for backend tests.
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every spec it is asked to run and fails on the configured
    /// 1-based invocation.
    #[derive(Default)]
    pub struct RecordingRunner {
        pub calls: Mutex<Vec<CommandSpec>>,
        pub fail_at: Option<usize>,
    }

    impl RecordingRunner {
        pub fn failing_at(index: usize) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_at: Some(index),
            }
        }

        pub fn lines(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.line.clone())
                .collect()
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, spec: &CommandSpec) -> Result<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(spec.clone());
            if self.fail_at == Some(calls.len()) {
                return Err(anyhow!(ShipError::Execution {
                    cmd: spec.line.clone(),
                    status: "exit code 1".to_string(),
                }));
            }
            Ok(())
        }
    }
}
