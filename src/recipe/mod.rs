// src/recipe/mod.rs

//! Recipe system: declarative descriptions of how to obtain, build, and
//! verify a package
//!
//! A recipe declares:
//! - The source archive URL and its SHA-256 digest
//! - Build-time dependencies (tools needed while building, not at runtime)
//! - CMake configure options
//! - A post-install smoke test with its expected output
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "eddl"
//! version = "0.8.3a"
//!
//! [source]
//! url = "https://github.com/deephealthproject/eddl/archive/v%(version)s.tar.gz"
//! sha256 = "3d0678b4e00b9a5fb9c3905cf5bd3f5daa596684af47d1e77fbabbfd82f4e064"
//!
//! [build]
//! depends = [{ name = "cmake" }, { name = "eigen" }]
//!
//! [test]
//! expected = "25"
//! find_package = "EDDL"
//! target = "EDDL::eddl"
//! header = "eddl/tensor/tensor.h"
//! ```

mod format;
pub mod parser;

pub use format::{
    BuildDependency, BuildSection, DependencyStage, PackageSection, Recipe, SourceSection,
    TestSection,
};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
