//! Sandboxed Executor
//!
//! Runs one synthesized program in an isolated environment and produces a
//! `SandboxResult`. Isolation per run:
//!
//! - a fresh scratch directory, removed on every exit path (drop-based)
//! - cleared environment, cwd pinned to the scratch dir
//! - rlimits applied between fork and exec: writable memory, CPU time,
//!   process count, file size, open files
//! - network namespace detached where permitted (strict mode makes a failed
//!   detach fatal instead of degrading)
//! - the child runs as the leader of its own session, so deadline
//!   termination signals the whole process group and takes any backgrounded
//!   descendants with it, with SIGTERM-then-SIGKILL escalation
//! - bounded stdout/stderr capture; overflow is drained and flagged as
//!   truncated, never silently dropped and never allowed to block the child
//!
//! The child is spawned with `kill_on_drop`, so orchestrator-level
//! cancellation still terminates the process and the scratch dir.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

use crate::{
    config::SandboxConfig,
    constants::{
        SANDBOX_KILL_GRACE_MS, SANDBOX_MAX_FILE_SIZE_BYTES, SANDBOX_MAX_OPEN_FILES,
        SANDBOX_MAX_PROCESSES, SANDBOX_PIPE_DRAIN_MS,
    },
    error::{AppError, AppResult},
};

use super::synthesis::SynthesizedProgram;

/// Resource limits for one sandboxed run
#[derive(Debug, Clone)]
pub struct SandboxLimits {
    pub wall_time: Duration,
    pub memory_bytes: u64,
    pub max_output_bytes: usize,
    pub strict_network_isolation: bool,
}

impl SandboxLimits {
    pub fn from_config(config: &SandboxConfig) -> Self {
        Self {
            wall_time: config.time_limit(),
            memory_bytes: config.memory_limit_mb * 1024 * 1024,
            max_output_bytes: config.max_output_bytes,
            strict_network_isolation: config.strict_network_isolation,
        }
    }
}

/// Why a sandboxed process stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCause {
    /// Exited cleanly with status 0
    Completed,
    /// Wall-clock or CPU limit breached; process forcibly terminated
    TimedOut,
    /// Nonzero exit or unexpected signal (submission fault)
    Crashed,
    /// Killed by the kernel or failed allocating under the memory ceiling
    ResourceExceeded,
}

impl CompletionCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::TimedOut => "TimedOut",
            Self::Crashed => "Crashed",
            Self::ResourceExceeded => "ResourceExceeded",
        }
    }
}

/// Raw captured output of one sandboxed process
#[derive(Debug)]
pub struct SandboxResult {
    pub stdout: String,
    pub stderr: String,
    /// Exit code when the process exited; `None` when it was signalled
    pub exit_code: Option<i32>,
    pub cause: CompletionCause,
    pub duration: Duration,
    pub stdout_truncated: bool,
    pub stderr_truncated: bool,
}

/// Outcome of driving a program through its compile and run steps
#[derive(Debug)]
pub enum SandboxOutcome {
    /// The compile step exited nonzero (or breached a limit)
    CompileFailed(SandboxResult),
    /// The program ran; inspect the result's cause
    Finished(SandboxResult),
}

/// Execute a synthesized program under full confinement.
///
/// Infrastructure faults (scratch dir creation, spawn failure) return
/// `AppError`; everything the submission itself caused is data in the
/// returned result.
pub async fn execute(
    program: &SynthesizedProgram,
    limits: &SandboxLimits,
) -> AppResult<SandboxOutcome> {
    // Scratch dir lives exactly as long as this future, including early
    // returns and cancellation.
    let scratch = tempfile::Builder::new()
        .prefix("duelbox-")
        .tempdir()
        .map_err(|e| AppError::Sandbox(format!("failed to create scratch dir: {e}")))?;

    tokio::fs::write(scratch.path().join(&program.source_file), &program.source)
        .await
        .map_err(|e| AppError::Sandbox(format!("failed to write program source: {e}")))?;

    if let Some(compile) = &program.compile_command {
        // Compilers get twice the run budget; tsc startup dwarfs most runs.
        let compile_result =
            run_confined(compile, scratch.path(), limits, limits.wall_time * 2).await?;
        if compile_result.cause != CompletionCause::Completed {
            return Ok(SandboxOutcome::CompileFailed(compile_result));
        }
    }

    let result = run_confined(&program.run_command, scratch.path(), limits, limits.wall_time).await?;
    Ok(SandboxOutcome::Finished(result))
}

/// Spawn one confined process and wait for completion or deadline.
async fn run_confined(
    argv: &[String],
    scratch: &Path,
    limits: &SandboxLimits,
    wall_time: Duration,
) -> AppResult<SandboxResult> {
    let (program_name, args) = argv
        .split_first()
        .ok_or_else(|| AppError::Sandbox("empty command".to_string()))?;

    let mut cmd = Command::new(program_name);
    cmd.args(args)
        .current_dir(scratch)
        .env_clear()
        .env(
            "PATH",
            std::env::var("PATH").unwrap_or_else(|_| "/usr/local/bin:/usr/bin:/bin".to_string()),
        )
        .env("HOME", scratch)
        .env("LANG", "C.UTF-8")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let memory_bytes = limits.memory_bytes;
    let cpu_seconds = wall_time.as_secs().max(1) + 1;
    let strict_network = limits.strict_network_isolation;

    // Runs between fork and exec in the child; async-signal-safe calls only.
    // RLIMIT_DATA rather than RLIMIT_AS: V8 reserves a multi-GiB virtual
    // cage at startup, so an address-space cap would kill Node before the
    // submission runs. RLIMIT_DATA caps writable memory, which is what the
    // ceiling is meant to bound.
    unsafe {
        cmd.pre_exec(move || {
            // Own session and process group; termination signals the group,
            // so backgrounded descendants cannot outlive the run.
            if libc::setsid() == -1 {
                return Err(std::io::Error::last_os_error());
            }
            set_rlimit(libc::RLIMIT_DATA as i32, memory_bytes)?;
            set_rlimit(libc::RLIMIT_CPU as i32, cpu_seconds)?;
            set_rlimit(libc::RLIMIT_NPROC as i32, SANDBOX_MAX_PROCESSES)?;
            set_rlimit(libc::RLIMIT_FSIZE as i32, SANDBOX_MAX_FILE_SIZE_BYTES)?;
            set_rlimit(libc::RLIMIT_NOFILE as i32, SANDBOX_MAX_OPEN_FILES)?;
            if libc::unshare(libc::CLONE_NEWNET) != 0 && strict_network {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }

    let start = Instant::now();
    let mut child = cmd
        .spawn()
        .map_err(|e| AppError::Sandbox(format!("failed to spawn {program_name}: {e}")))?;

    // Saved before `wait` reaps the child; the group id equals the pid
    // because the child called setsid.
    let pid = child.id();

    let stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| AppError::Sandbox("child stdout not captured".to_string()))?;
    let stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| AppError::Sandbox("child stderr not captured".to_string()))?;

    let cap = limits.max_output_bytes;
    let mut stdout_task = tokio::spawn(read_capped(stdout_pipe, cap));
    let mut stderr_task = tokio::spawn(read_capped(stderr_pipe, cap));

    let status = match tokio::time::timeout(wall_time, child.wait()).await {
        Ok(waited) => {
            Some(waited.map_err(|e| AppError::Sandbox(format!("wait failed: {e}")))?)
        }
        Err(_) => {
            terminate(&mut child, pid).await;
            None
        }
    };

    // Pipes reach EOF only when every holder is gone; a descendant the
    // child left behind keeps them open past the child's own exit. Bound
    // the drain, and kill the group if it stalls.
    let drain = Duration::from_millis(SANDBOX_PIPE_DRAIN_MS);
    let mut stdout_capture = await_capture(&mut stdout_task, drain).await?;
    let mut stderr_capture = await_capture(&mut stderr_task, drain).await?;

    if stdout_capture.is_none() || stderr_capture.is_none() {
        kill_group(pid, libc::SIGKILL);
        if stdout_capture.is_none() {
            stdout_capture = await_capture(&mut stdout_task, drain).await?;
        }
        if stderr_capture.is_none() {
            stderr_capture = await_capture(&mut stderr_task, drain).await?;
        }
    }

    let (stdout_bytes, stdout_truncated) = match stdout_capture {
        Some(capture) => capture,
        None => {
            stdout_task.abort();
            (Vec::new(), true)
        }
    };
    let (stderr_bytes, stderr_truncated) = match stderr_capture {
        Some(capture) => capture,
        None => {
            stderr_task.abort();
            (Vec::new(), true)
        }
    };

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&stdout_bytes).into_owned();
    let stderr = String::from_utf8_lossy(&stderr_bytes).into_owned();

    let (cause, exit_code) = classify(status, &stderr);

    Ok(SandboxResult {
        stdout,
        stderr,
        exit_code,
        cause,
        duration,
        stdout_truncated,
        stderr_truncated,
    })
}

/// Classify how the process stopped.
fn classify(
    status: Option<std::process::ExitStatus>,
    stderr: &str,
) -> (CompletionCause, Option<i32>) {
    use std::os::unix::process::ExitStatusExt;

    let Some(status) = status else {
        // Deadline fired; the process was terminated by us.
        return (CompletionCause::TimedOut, None);
    };

    if let Some(code) = status.code() {
        if code == 0 {
            (CompletionCause::Completed, Some(0))
        } else if looks_like_allocation_failure(stderr) {
            (CompletionCause::ResourceExceeded, Some(code))
        } else {
            (CompletionCause::Crashed, Some(code))
        }
    } else {
        match status.signal() {
            // SIGKILL without our deadline firing means the kernel stepped in
            Some(libc::SIGKILL) => (CompletionCause::ResourceExceeded, None),
            Some(libc::SIGXCPU) => (CompletionCause::TimedOut, None),
            Some(libc::SIGXFSZ) => (CompletionCause::ResourceExceeded, None),
            _ => (CompletionCause::Crashed, None),
        }
    }
}

/// Allocation failures under the data-segment limit usually surface as
/// runtime errors in the interpreter rather than a kernel kill.
fn looks_like_allocation_failure(stderr: &str) -> bool {
    stderr.contains("MemoryError")
        || stderr.contains("JavaScript heap out of memory")
        || stderr.contains("Cannot allocate memory")
        || stderr.contains("std::bad_alloc")
}

/// Escalating termination of the whole process group: SIGTERM, a short
/// grace period, then SIGKILL.
async fn terminate(child: &mut Child, pid: Option<u32>) {
    kill_group(pid, libc::SIGTERM);

    let grace = Duration::from_millis(SANDBOX_KILL_GRACE_MS);
    if tokio::time::timeout(grace, child.wait()).await.is_err() {
        kill_group(pid, libc::SIGKILL);
        // kill() reaps the direct child
        let _ = child.kill().await;
    }
}

/// Signal the child's process group. A negative pid addresses the group,
/// which the child leads after setsid.
fn kill_group(pid: Option<u32>, signal: i32) {
    if let Some(pid) = pid {
        unsafe {
            libc::kill(-(pid as i32), signal);
        }
    }
}

/// Await one capture task with a deadline; `None` means the pipe is still
/// held open by a surviving process.
async fn await_capture(
    task: &mut tokio::task::JoinHandle<(Vec<u8>, bool)>,
    deadline: Duration,
) -> AppResult<Option<(Vec<u8>, bool)>> {
    match tokio::time::timeout(deadline, &mut *task).await {
        Ok(joined) => joined
            .map(Some)
            .map_err(|e| AppError::Sandbox(format!("output capture failed: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Read a pipe into a capped buffer, draining past the cap so the child
/// never blocks on a full pipe.
async fn read_capped<R>(mut reader: R, cap: usize) -> (Vec<u8>, bool)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut truncated = false;
    let mut chunk = [0u8; 8192];

    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if buf.len() < cap {
                    let take = n.min(cap - buf.len());
                    buf.extend_from_slice(&chunk[..take]);
                    if take < n {
                        truncated = true;
                    }
                } else {
                    truncated = true;
                }
            }
        }
    }

    (buf, truncated)
}

fn set_rlimit(resource: i32, value: u64) -> std::io::Result<()> {
    let limit = libc::rlimit {
        rlim_cur: value as libc::rlim_t,
        rlim_max: value as libc::rlim_t,
    };
    if unsafe { libc::setrlimit(resource as _, &limit) } != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}
