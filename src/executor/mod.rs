// src/executor/mod.rs

//! Recipe Executor: the install/verify pipeline
//!
//! Executes a recipe as a linear pipeline of five stages, each terminal on
//! first failure:
//!
//! 1. **Resolve** - ensure build dependencies are present
//! 2. **Fetch** - download the source archive and verify its digest
//! 3. **Configure** - run the CMake configure step in a fresh build dir
//! 4. **Install** - drive the install target into the prefix
//! 5. **Test** - build and run the generated smoke-test project
//!
//! No retries happen at this layer; retrying is the invoking package
//! manager's policy. All scratch directories are scoped temp dirs released
//! on every exit path.

mod cmake;
mod config;
pub mod deps;
mod fetch;
mod smoke;

pub use cmake::{build_install_args, configure_args, DISABLING_DEFINES};
pub use config::{ExecutorConfig, InstallReport};
pub use deps::{DependencyResolver, NoopResolver, PathResolver};
pub use fetch::{extract_archive, fetch_source, source_root};
pub use smoke::{assert_output, cmake_lists, test_source};

use crate::error::{Error, Result};
use crate::recipe::{validate_recipe, Recipe};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info};

/// The five pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Fetch,
    Configure,
    Install,
    Test,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 5] = [
        Stage::Resolve,
        Stage::Fetch,
        Stage::Configure,
        Stage::Install,
        Stage::Test,
    ];

    /// Stage name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Resolve => "resolve",
            Stage::Fetch => "fetch",
            Stage::Configure => "configure",
            Stage::Install => "install",
            Stage::Test => "test",
        }
    }
}

/// The Recipe Executor
pub struct Executor {
    config: ExecutorConfig,
    resolver: Arc<dyn DependencyResolver>,
}

impl Executor {
    /// Create an executor with the given configuration
    ///
    /// Dependencies are assumed available unless a resolver is supplied;
    /// use [`Executor::with_resolver`] to plug in the invoking package
    /// manager's installation logic.
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config,
            resolver: Arc::new(NoopResolver),
        }
    }

    /// Create an executor with a dependency resolver
    pub fn with_resolver(config: ExecutorConfig, resolver: Arc<dyn DependencyResolver>) -> Self {
        Self { config, resolver }
    }

    /// Execute the full pipeline for a recipe
    pub fn install(&self, recipe: &Recipe) -> Result<InstallReport> {
        info!(
            "installing {} version {}",
            recipe.package.name, recipe.package.version
        );

        let mut run = Run::new(self, recipe)?;

        let mut outcome = Ok(());
        for stage in Stage::ALL {
            info!("stage: {}", stage.name());
            if let Err(e) = run.run_stage(stage) {
                outcome = Err(e);
                break;
            }
        }

        let Run { workdir, log, warnings, .. } = run;
        if self.config.keep_workdir {
            let path = workdir.into_path();
            info!("keeping workdir: {}", path.display());
        }
        // Otherwise the TempDir drop releases the whole workspace, on both
        // the success and the failure path.

        outcome.map(|()| InstallReport {
            prefix: self.config.prefix.clone(),
            log,
            warnings,
        })
    }

    /// Fetch and verify a recipe's source archive without building
    ///
    /// Useful for pre-fetching and for verifying source availability.
    /// Returns the path of the verified archive inside `dest_dir`.
    pub fn fetch(&self, recipe: &Recipe, dest_dir: &std::path::Path) -> Result<PathBuf> {
        let url = recipe.archive_url();
        info!("fetching {}", url);
        fetch_source(&url, dest_dir, &recipe.source.sha256)
    }

    /// Run only the smoke test against an already-installed prefix
    pub fn smoke_test(&self, recipe: &Recipe) -> Result<()> {
        let mut log = String::new();
        smoke::run_smoke_test(
            &recipe.test,
            &self.config.prefix,
            &self.config.cmake_command,
            &mut log,
        )
    }
}

/// State for a single pipeline execution
struct Run<'a> {
    executor: &'a Executor,
    recipe: &'a Recipe,
    /// Scoped working directory, released on drop
    workdir: TempDir,
    /// Source root after extraction
    source_dir: PathBuf,
    /// Fresh build subdirectory
    build_dir: PathBuf,
    /// Accumulated log
    log: String,
    /// Non-fatal warnings
    warnings: Vec<String>,
}

impl<'a> Run<'a> {
    fn new(executor: &'a Executor, recipe: &'a Recipe) -> Result<Self> {
        let workdir = TempDir::new()
            .map_err(|e| Error::IoError(format!("failed to create workdir: {}", e)))?;
        let build_dir = workdir.path().join("build");

        Ok(Self {
            executor,
            recipe,
            workdir,
            source_dir: PathBuf::new(),
            build_dir,
            log: String::new(),
            warnings: Vec::new(),
        })
    }

    fn run_stage(&mut self, stage: Stage) -> Result<()> {
        match stage {
            Stage::Resolve => self.resolve(),
            Stage::Fetch => self.fetch(),
            Stage::Configure => self.configure(),
            Stage::Install => self.build_install(),
            Stage::Test => self.test(),
        }
    }

    /// Stage 1: validate the recipe and ensure build dependencies
    fn resolve(&mut self) -> Result<()> {
        let findings = validate_recipe(self.recipe)?;
        for finding in findings {
            self.warnings.push(finding);
        }

        let deps = self.recipe.build_deps();
        deps::ensure_dependencies(self.executor.resolver.as_ref(), &deps)
    }

    /// Stage 2: fetch the archive, verify its digest, extract it
    fn fetch(&mut self) -> Result<()> {
        let url = self.recipe.archive_url();
        let archive = fetch_source(&url, self.workdir.path(), &self.recipe.source.sha256)?;
        self.log_line(&format!("fetched and verified {}", url));

        let extract_dir = self.workdir.path().join("source");
        fs::create_dir_all(&extract_dir)?;
        extract_archive(&archive, &extract_dir)?;
        self.source_dir = source_root(&extract_dir)?;
        debug!("source root: {}", self.source_dir.display());

        Ok(())
    }

    /// Stage 3: configure in a fresh build subdirectory
    fn configure(&mut self) -> Result<()> {
        fs::create_dir_all(&self.build_dir)?;

        let config = &self.executor.config;
        let args = configure_args(
            &self.source_dir,
            &config.prefix,
            &self.recipe.build.defines,
            &config.extra_cmake_args,
        );

        let result = cmake::run_tool(&config.cmake_command, &args, &self.build_dir)?;
        self.log.push_str(&result.output);
        if !result.success {
            return Err(Error::ConfigurationFailed {
                code: result.code,
                output: result.output,
            });
        }

        self.log_line("configure complete");
        Ok(())
    }

    /// Stage 4: drive the install target into the prefix
    fn build_install(&mut self) -> Result<()> {
        let config = &self.executor.config;
        let args = build_install_args(&self.build_dir, config.jobs);

        let result = cmake::run_tool(&config.cmake_command, &args, self.workdir.path())?;
        self.log.push_str(&result.output);
        if !result.success {
            return Err(Error::BuildFailed {
                code: result.code,
                output: result.output,
            });
        }

        self.log_line(&format!("installed under {}", config.prefix.display()));
        Ok(())
    }

    /// Stage 5: generated smoke-test project against the installed prefix
    fn test(&mut self) -> Result<()> {
        let config = &self.executor.config;
        smoke::run_smoke_test(
            &self.recipe.test,
            &config.prefix,
            &config.cmake_command,
            &mut self.log,
        )
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let names: Vec<&str> = Stage::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["resolve", "fetch", "configure", "install", "test"]
        );
    }

    #[test]
    fn test_executor_default_resolver_is_noop() {
        let executor = Executor::new(ExecutorConfig::default());
        // NoopResolver reports nothing missing
        assert!(executor.resolver.check_missing(&["anything"]).unwrap().is_empty());
    }
}
