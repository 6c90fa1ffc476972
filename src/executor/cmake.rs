// src/executor/cmake.rs

//! CMake configure and build/install invocations
//!
//! Argument construction is split out as pure functions so the exact flag
//! set each stage passes is testable without running cmake.

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Defines the executor always passes to the configure step
///
/// The wrapped packages bundle nested superbuilds, example programs, and
/// their own test suites; a recipe install wants none of those targets
/// generated.
pub const DISABLING_DEFINES: [&str; 3] = [
    "-DBUILD_SUPERBUILD=OFF",
    "-DBUILD_EXAMPLES=OFF",
    "-DBUILD_TESTS=OFF",
];

/// Build the argument vector for the configure invocation
///
/// Order: source dir, the three disabling defines, the install prefix, the
/// recipe's extra defines, then the caller's standard arguments.
pub fn configure_args(
    source_dir: &Path,
    prefix: &Path,
    defines: &BTreeMap<String, String>,
    extra_args: &[String],
) -> Vec<String> {
    let mut args = vec![source_dir.display().to_string()];
    args.extend(DISABLING_DEFINES.iter().map(|d| d.to_string()));
    args.push(format!("-DCMAKE_INSTALL_PREFIX={}", prefix.display()));
    for (key, value) in defines {
        args.push(format!("-D{}={}", key, value));
    }
    args.extend(extra_args.iter().cloned());
    args
}

/// Build the argument vector for the build/install invocation
pub fn build_install_args(build_dir: &Path, jobs: u32) -> Vec<String> {
    vec![
        "--build".to_string(),
        build_dir.display().to_string(),
        "--target".to_string(),
        "install".to_string(),
        "--parallel".to_string(),
        jobs.to_string(),
    ]
}

/// Outcome of one external tool invocation
#[derive(Debug)]
pub struct ToolOutput {
    /// Whether the tool exited zero
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Combined stdout and stderr
    pub output: String,
}

/// Run an external tool, capturing combined output
pub fn run_tool(program: &str, args: &[String], cwd: &Path) -> Result<ToolOutput> {
    debug!("running {} {} (in {})", program, args.join(" "), cwd.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| crate::error::Error::IoError(format!("failed to run {}: {}", program, e)))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&stderr);
    }

    Ok(ToolOutput {
        success: output.status.success(),
        code: output.status.code(),
        output: combined,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_configure_args_contain_disabling_defines() {
        let args = configure_args(
            Path::new("/work/source"),
            Path::new("/opt/prefix"),
            &BTreeMap::new(),
            &[],
        );

        // Conformance: the three disabling defines must always be present
        for define in DISABLING_DEFINES {
            assert!(args.contains(&define.to_string()), "missing {}", define);
        }
        assert!(args.contains(&"-DCMAKE_INSTALL_PREFIX=/opt/prefix".to_string()));
        assert_eq!(args[0], "/work/source");
    }

    #[test]
    fn test_configure_args_append_defines_and_extra() {
        let mut defines = BTreeMap::new();
        defines.insert("BUILD_PROTOBUF".to_string(), "ON".to_string());

        let extra = vec!["-DCMAKE_BUILD_TYPE=Release".to_string()];
        let args = configure_args(
            Path::new("/s"),
            Path::new("/p"),
            &defines,
            &extra,
        );

        assert!(args.contains(&"-DBUILD_PROTOBUF=ON".to_string()));
        // Caller-supplied standard args come last
        assert_eq!(args.last().unwrap(), "-DCMAKE_BUILD_TYPE=Release");
    }

    #[test]
    fn test_build_install_args() {
        let args = build_install_args(Path::new("/work/build"), 8);
        assert_eq!(
            args,
            vec!["--build", "/work/build", "--target", "install", "--parallel", "8"]
        );
    }

    #[test]
    fn test_run_tool_success() {
        let out = run_tool("true", &[], &PathBuf::from("/tmp")).unwrap();
        assert!(out.success);
        assert_eq!(out.code, Some(0));
    }

    #[test]
    fn test_run_tool_failure_captures_code() {
        let out = run_tool("false", &[], &PathBuf::from("/tmp")).unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(1));
    }

    #[test]
    fn test_run_tool_captures_output() {
        let args = vec!["hello".to_string()];
        let out = run_tool("echo", &args, &PathBuf::from("/tmp")).unwrap();
        assert!(out.success);
        assert_eq!(out.output.trim(), "hello");
    }

    #[test]
    fn test_run_tool_missing_program() {
        let result = run_tool("definitely-not-a-real-tool-7f3a", &[], &PathBuf::from("/tmp"));
        assert!(result.is_err());
    }
}
