// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe how to obtain, build, install, and
//! smoke-test a CMake-based package. A recipe is immutable once parsed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete recipe for installing and verifying a package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package identity
    pub package: PackageSection,

    /// Source archive location and integrity digest
    pub source: SourceSection,

    /// Build-time dependencies and configure options
    #[serde(default)]
    pub build: BuildSection,

    /// Post-install smoke test
    pub test: TestSection,
}

impl Recipe {
    /// Substitute variables in a string
    ///
    /// Replaces `%(version)s` and `%(name)s` with values from the package
    /// section.
    pub fn substitute(&self, template: &str) -> String {
        template
            .replace("%(version)s", &self.package.version)
            .replace("%(name)s", &self.package.name)
    }

    /// Get the archive URL with variables substituted
    pub fn archive_url(&self) -> String {
        self.substitute(&self.source.url)
    }

    /// Get the archive filename from the URL
    pub fn archive_filename(&self) -> String {
        self.archive_url()
            .split('/')
            .next_back()
            .unwrap_or("source.tar.gz")
            .to_string()
    }

    /// Names of dependencies needed at build time
    pub fn build_deps(&self) -> Vec<&str> {
        self.build
            .depends
            .iter()
            .filter(|d| d.stage == DependencyStage::Build)
            .map(|d| d.name.as_str())
            .collect()
    }
}

/// Package identity section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,
}

/// Source archive section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Source archive URL, or a local filesystem path
    ///
    /// Supports `%(version)s` substitution.
    pub url: String,

    /// SHA-256 digest of the archive, as 64 hex characters
    pub sha256: String,
}

/// Stage at which a dependency is required
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStage {
    /// Needed only while building, not at runtime
    #[default]
    Build,
    /// Needed by the installed package at runtime
    Run,
}

/// A named external tool or library the build requires
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildDependency {
    /// Tool or library name, as looked up on PATH or by the resolver
    pub name: String,

    /// When the dependency is required (defaults to build)
    #[serde(default)]
    pub stage: DependencyStage,
}

/// Build configuration section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildSection {
    /// External tools/libraries required before the build may start
    #[serde(default)]
    pub depends: Vec<BuildDependency>,

    /// Extra `-D<KEY>=<VALUE>` cache entries passed to the configure step
    ///
    /// The executor always disables superbuild, example, and test targets;
    /// these defines are appended after those.
    #[serde(default)]
    pub defines: BTreeMap<String, String>,
}

fn default_cmake_minimum() -> String {
    "3.9.2".to_string()
}

fn default_cxx_standard() -> u32 {
    11
}

/// Post-install smoke test section
///
/// The executor materializes a minimal CMake project that finds the freshly
/// installed package, links one executable against its exported target, runs
/// it, and compares trimmed stdout against `expected`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSection {
    /// Exact expected stdout, compared after trimming surrounding whitespace
    pub expected: String,

    /// `find_package` name of the installed package
    pub find_package: String,

    /// Exported namespace target to link against (e.g. `EDDL::eddl`)
    pub target: String,

    /// Header the generated test program includes
    pub header: String,

    /// Test program body; a default all-ones tensor-sum program is generated
    /// when absent
    #[serde(default)]
    pub source: Option<String>,

    /// Minimum CMake version declared by the generated project
    #[serde(default = "default_cmake_minimum")]
    pub cmake_minimum: String,

    /// C++ standard level declared by the generated project
    #[serde(default = "default_cxx_standard")]
    pub cxx_standard: u32,
}
