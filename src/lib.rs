// src/lib.rs

//! Ladle: a recipe executor for CMake packages
//!
//! Given a declarative TOML recipe (source archive URL, SHA-256 digest,
//! build dependencies, install options, smoke test), ladle resolves
//! dependencies, fetches and verifies the archive, drives the CMake
//! configure and install steps into a target prefix, and verifies the
//! installation with a generated smoke-test project.
//!
//! # Architecture
//!
//! - Linear pipeline: Resolve -> Fetch -> Configure -> Install -> Test,
//!   terminal on first failure
//! - Scoped temp workspaces, released on every exit path
//! - Integrity first: no build step runs before the archive digest matches

mod error;
pub mod executor;
pub mod hash;
pub mod recipe;

pub use error::{Error, Result};
pub use executor::{Executor, ExecutorConfig, InstallReport, Stage};
pub use recipe::{parse_recipe, parse_recipe_file, validate_recipe, Recipe};
