// src/executor/deps.rs

//! Build dependency resolution
//!
//! The executor stays decoupled from any particular package installation
//! mechanism: the invoking package manager supplies a resolver, and the
//! default just checks PATH.

use crate::error::{Error, Result};
use tracing::{debug, info};

/// Trait for resolving and installing build dependencies before a build
pub trait DependencyResolver: Send + Sync {
    /// Check which dependencies are missing
    ///
    /// Returns the names that are not currently available.
    fn check_missing(&self, deps: &[&str]) -> Result<Vec<String>>;

    /// Install the specified dependencies
    ///
    /// Returns the names that were actually installed. Names absent from the
    /// returned list remain unavailable.
    fn install(&self, deps: &[String]) -> Result<Vec<String>>;
}

/// A no-op resolver that assumes all dependencies are satisfied
///
/// Use this in a pre-configured build environment where availability has
/// already been ensured.
pub struct NoopResolver;

impl DependencyResolver for NoopResolver {
    fn check_missing(&self, _deps: &[&str]) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn install(&self, _deps: &[String]) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Resolver that looks build tools up on PATH
///
/// Cannot install anything; a dependency that is not an executable on PATH
/// stays missing. Library-only dependencies (headers, no binary) should be
/// handled by a package-manager-backed resolver instead.
pub struct PathResolver;

impl DependencyResolver for PathResolver {
    fn check_missing(&self, deps: &[&str]) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for dep in deps {
            match which::which(dep) {
                Ok(path) => debug!("found {} at {}", dep, path.display()),
                Err(_) => missing.push(dep.to_string()),
            }
        }
        Ok(missing)
    }

    fn install(&self, _deps: &[String]) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Ensure every named dependency is available, installing missing ones
///
/// Fails with [`Error::DependencyUnavailable`] for the first dependency the
/// resolver could neither find nor install.
pub fn ensure_dependencies(resolver: &dyn DependencyResolver, deps: &[&str]) -> Result<()> {
    if deps.is_empty() {
        debug!("no build dependencies declared");
        return Ok(());
    }

    info!("checking build dependencies: {}", deps.join(", "));
    let missing = resolver.check_missing(deps)?;
    if missing.is_empty() {
        return Ok(());
    }

    info!("installing missing build dependencies: {}", missing.join(", "));
    let installed = resolver.install(&missing)?;

    for dep in &missing {
        if !installed.contains(dep) {
            return Err(Error::DependencyUnavailable {
                name: dep.clone(),
                reason: "could not be resolved or installed".to_string(),
            });
        }
    }

    Ok(())
}
