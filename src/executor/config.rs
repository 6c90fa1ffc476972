// src/executor/config.rs

//! Configuration types for the recipe executor

use std::path::PathBuf;

/// Configuration for the Executor
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Install prefix the build installs into and the smoke test resolves
    /// the package from
    pub prefix: PathBuf,
    /// Number of parallel build jobs
    pub jobs: u32,
    /// Keep the scoped working directory after completion (for debugging)
    pub keep_workdir: bool,
    /// CMake binary to invoke (overridable for pre-provisioned toolchains)
    pub cmake_command: String,
    /// Standard arguments the invoking package manager appends to the
    /// configure step, after the executor's own defines
    pub extra_cmake_args: Vec<String>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            prefix: PathBuf::from("/usr/local"),
            jobs,
            keep_workdir: false,
            cmake_command: "cmake".to_string(),
            extra_cmake_args: Vec::new(),
        }
    }
}

impl ExecutorConfig {
    /// Create a configuration installing under the given prefix
    pub fn with_prefix(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }
}

/// Result of a successful end-to-end recipe execution
#[derive(Debug)]
pub struct InstallReport {
    /// Prefix the package was installed under
    pub prefix: PathBuf,
    /// Accumulated log of all stages, including captured tool output
    pub log: String,
    /// Non-fatal warnings (recipe validation findings, cleanup issues)
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ExecutorConfig::default();
        assert!(config.jobs > 0);
        assert!(!config.keep_workdir);
        assert_eq!(config.cmake_command, "cmake");
        assert!(config.extra_cmake_args.is_empty());
    }

    #[test]
    fn test_config_with_prefix() {
        let config = ExecutorConfig::with_prefix("/opt/pkg");
        assert_eq!(config.prefix, PathBuf::from("/opt/pkg"));
    }
}
