// src/main.rs

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use ladle::executor::{Executor, ExecutorConfig, PathResolver};
use ladle::recipe::{parse_recipe_file, validate_recipe};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Install {
            recipe,
            prefix,
            jobs,
            keep_workdir,
            check_path,
            cmake_args,
        }) => {
            let recipe = parse_recipe_file(Path::new(&recipe))?;
            info!(
                "installing {} version {}",
                recipe.package.name, recipe.package.version
            );

            let mut config = ExecutorConfig::with_prefix(&prefix);
            if let Some(jobs) = jobs {
                config.jobs = jobs;
            }
            config.keep_workdir = keep_workdir;
            config.extra_cmake_args = cmake_args;

            let executor = if check_path {
                Executor::with_resolver(config, Arc::new(PathResolver))
            } else {
                Executor::new(config)
            };

            let report = executor.install(&recipe)?;
            for warning in &report.warnings {
                eprintln!("warning: {}", warning);
            }
            println!(
                "Installed {} {} under {}",
                recipe.package.name,
                recipe.package.version,
                report.prefix.display()
            );
            Ok(())
        }
        Some(Commands::Fetch { recipe, dest }) => {
            let recipe = parse_recipe_file(Path::new(&recipe))?;
            let executor = Executor::new(ExecutorConfig::default());
            let path = executor.fetch(&recipe, Path::new(&dest))?;
            println!("Fetched and verified: {}", path.display());
            Ok(())
        }
        Some(Commands::Validate { recipe }) => {
            let recipe = parse_recipe_file(Path::new(&recipe))?;
            let findings = validate_recipe(&recipe)?;
            if findings.is_empty() {
                println!("Recipe OK: {} {}", recipe.package.name, recipe.package.version);
            } else {
                for finding in &findings {
                    println!("warning: {}", finding);
                }
            }
            Ok(())
        }
        Some(Commands::Test { recipe, prefix }) => {
            let recipe = parse_recipe_file(Path::new(&recipe))?;
            let executor = Executor::new(ExecutorConfig::with_prefix(&prefix));
            executor.smoke_test(&recipe)?;
            println!("Smoke test passed: {:?}", recipe.test.expected);
            Ok(())
        }
        None => {
            println!("ladle v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'ladle --help' for usage information");
            Ok(())
        }
    }
}
