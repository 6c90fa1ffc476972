// src/cli.rs
//! CLI definitions for the ladle recipe executor
//!
//! This module contains all command-line interface definitions using clap.
//! The command implementations live in `main.rs`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ladle")]
#[command(author = "Ladle Project")]
#[command(version)]
#[command(about = "Fetch, build, install, and smoke-test CMake packages from recipes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: resolve, fetch, configure, install, test
    Install {
        /// Path to the recipe TOML file
        recipe: String,

        /// Installation prefix
        #[arg(short, long, default_value = "/usr/local")]
        prefix: String,

        /// Number of parallel build jobs (default: all cores)
        #[arg(short, long)]
        jobs: Option<u32>,

        /// Keep the scoped working directory (for debugging)
        #[arg(long)]
        keep_workdir: bool,

        /// Require build dependencies to be resolvable on PATH
        #[arg(long)]
        check_path: bool,

        /// Extra arguments appended to the configure step
        #[arg(long = "cmake-arg")]
        cmake_args: Vec<String>,
    },

    /// Download and verify a recipe's source archive without building
    Fetch {
        /// Path to the recipe TOML file
        recipe: String,

        /// Directory to place the verified archive in
        #[arg(short, long, default_value = ".")]
        dest: String,
    },

    /// Parse and validate a recipe, printing any findings
    Validate {
        /// Path to the recipe TOML file
        recipe: String,
    },

    /// Smoke-test an already-installed prefix
    Test {
        /// Path to the recipe TOML file
        recipe: String,

        /// Prefix the package was installed under
        #[arg(short, long, default_value = "/usr/local")]
        prefix: String,
    },
}
