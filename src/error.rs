// src/error.rs

//! Error types for the recipe executor
//!
//! Each pipeline stage has a dedicated terminal error. Subprocess failures
//! carry the tool's exit code and captured output so the invoking package
//! manager can surface them verbatim.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by recipe parsing, fetching, building, and testing
#[derive(Error, Debug)]
pub enum Error {
    /// A required build-time dependency could not be resolved or installed
    #[error("build dependency unavailable: {name}: {reason}")]
    DependencyUnavailable { name: String, reason: String },

    /// Fetched archive digest does not match the recipe's declared digest
    #[error("integrity mismatch for {url}: expected sha256:{expected}, got sha256:{actual}")]
    IntegrityMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    /// The configure step exited non-zero
    #[error("configure failed (exit code {code:?})\n{output}")]
    ConfigurationFailed { code: Option<i32>, output: String },

    /// The build/install step exited non-zero
    #[error("build/install failed (exit code {code:?})\n{output}")]
    BuildFailed { code: Option<i32>, output: String },

    /// The generated smoke-test project failed to configure or build
    #[error("smoke test build failed (exit code {code:?})\n{output}")]
    TestBuildFailed { code: Option<i32>, output: String },

    /// The smoke-test binary ran but printed the wrong output
    #[error("smoke test assertion failed: expected {expected:?}, got {actual:?}")]
    TestAssertionFailed { expected: String, actual: String },

    /// Failed to download the source archive
    #[error("download failed: {0}")]
    DownloadError(String),

    /// Recipe file could not be parsed or is invalid
    #[error("invalid recipe: {0}")]
    ParseError(String),

    /// A referenced file or tool does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Filesystem or subprocess I/O failure
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}
