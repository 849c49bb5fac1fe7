//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Maximum accepted request body size in bytes
pub const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Outer HTTP timeout in seconds. Must stay above the engine deadline so
/// the engine always answers before the transport gives up.
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 25;

// =============================================================================
// SANDBOX DEFAULTS
// =============================================================================

/// Default wall-clock limit for one sandboxed run in milliseconds
pub const DEFAULT_TIME_LIMIT_MS: u64 = 5_000;

/// Default memory ceiling in megabytes (RLIMIT_DATA)
pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 256;

/// Default cap on captured stdout/stderr, each, in bytes
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 64 * 1024;

/// Maximum number of processes/threads a sandboxed program may create
pub const SANDBOX_MAX_PROCESSES: u64 = 64;

/// Maximum open file descriptors inside the sandbox
pub const SANDBOX_MAX_OPEN_FILES: u64 = 64;

/// Maximum file size a sandboxed program may write, in bytes
pub const SANDBOX_MAX_FILE_SIZE_BYTES: u64 = 8 * 1024 * 1024;

/// Grace period between SIGTERM and SIGKILL when a deadline fires
pub const SANDBOX_KILL_GRACE_MS: u64 = 250;

/// Deadline for draining captured output after the child is gone; a stall
/// means a surviving descendant still holds the pipes
pub const SANDBOX_PIPE_DRAIN_MS: u64 = 500;

// =============================================================================
// ENGINE DEFAULTS
// =============================================================================

/// Default number of simultaneously executing sandboxes
pub const DEFAULT_MAX_CONCURRENT_SANDBOXES: usize = 8;

/// Default number of requests allowed to queue for a sandbox slot
pub const DEFAULT_MAX_QUEUE_DEPTH: usize = 32;

/// Default overall per-request deadline (synthesis + execution + comparison)
/// in milliseconds
pub const DEFAULT_REQUEST_DEADLINE_MS: u64 = 20_000;

/// Maximum characters of stderr included in error details
pub const MAX_STDERR_EXCERPT_CHARS: usize = 1_000;

// =============================================================================
// SUPPORTED LANGUAGES
// =============================================================================

/// Language identifiers
pub mod languages {
    pub const PYTHON: &str = "python";
    pub const JAVASCRIPT: &str = "javascript";
    pub const TYPESCRIPT: &str = "typescript";

    /// All supported language identifiers
    pub const ALL: &[&str] = &[PYTHON, JAVASCRIPT, TYPESCRIPT];
}
