// src/executor/smoke.rs

//! Post-install smoke test
//!
//! Materializes a minimal two-file CMake project into an isolated workspace,
//! builds it against the freshly installed package, runs the binary, and
//! compares its trimmed stdout against the recipe's expected literal.

use crate::error::{Error, Result};
use crate::executor::cmake::run_tool;
use crate::recipe::TestSection;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, info};

/// Name of the generated executable target
const TEST_TARGET: &str = "smoke";

/// Render the generated project's build descriptor
pub fn cmake_lists(test: &TestSection) -> String {
    format!(
        "cmake_minimum_required(VERSION {})\n\
         project({})\n\
         \n\
         set(CMAKE_CXX_STANDARD {})\n\
         \n\
         add_executable({} test.cpp)\n\
         \n\
         find_package({} REQUIRED)\n\
         target_link_libraries({} PUBLIC {})\n",
        test.cmake_minimum,
        TEST_TARGET,
        test.cxx_standard,
        TEST_TARGET,
        test.find_package,
        TEST_TARGET,
        test.target,
    )
}

/// Render the generated test program
///
/// The default program allocates a 5x5 all-ones tensor and prints its
/// element sum; recipes with a different API override `source`.
pub fn test_source(test: &TestSection) -> String {
    if let Some(source) = &test.source {
        return source.clone();
    }

    format!(
        "#include <iostream>\n\
         #include <{}>\n\
         int main(){{\n\
         \x20\x20Tensor *t1 = Tensor::ones({{5, 5}});\n\
         \x20\x20std::cout << t1->sum() << std::endl;\n\
         }}\n",
        test.header,
    )
}

/// Run the smoke test against an installed prefix
///
/// The workspace is a scoped temp directory, released whether the test
/// passes or fails. `prefix` must be the same prefix the install stage used;
/// it is handed to CMake as `CMAKE_PREFIX_PATH` so `find_package` resolves
/// the just-installed package.
pub fn run_smoke_test(
    test: &TestSection,
    prefix: &Path,
    cmake_command: &str,
    log: &mut String,
) -> Result<()> {
    let workspace = TempDir::new()
        .map_err(|e| Error::IoError(format!("failed to create test workspace: {}", e)))?;

    fs::write(workspace.path().join("CMakeLists.txt"), cmake_lists(test))?;
    fs::write(workspace.path().join("test.cpp"), test_source(test))?;

    info!("building smoke test project");
    let configure_args = vec![
        ".".to_string(),
        format!("-DCMAKE_PREFIX_PATH={}", prefix.display()),
    ];
    let configured = run_tool(cmake_command, &configure_args, workspace.path())?;
    log.push_str(&configured.output);
    if !configured.success {
        return Err(Error::TestBuildFailed {
            code: configured.code,
            output: configured.output,
        });
    }

    let build_args = vec!["--build".to_string(), ".".to_string()];
    let built = run_tool(cmake_command, &build_args, workspace.path())?;
    log.push_str(&built.output);
    if !built.success {
        return Err(Error::TestBuildFailed {
            code: built.code,
            output: built.output,
        });
    }

    let binary = workspace.path().join(TEST_TARGET);
    debug!("running smoke test binary {}", binary.display());
    let output = Command::new(&binary)
        .current_dir(workspace.path())
        .output()
        .map_err(|e| Error::IoError(format!("failed to run smoke test binary: {}", e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_output(&stdout, &test.expected)
}

/// Compare captured output to the expected literal
///
/// The captured side is trimmed of surrounding whitespace; the comparison
/// itself is exact.
pub fn assert_output(captured: &str, expected: &str) -> Result<()> {
    let trimmed = captured.trim();
    if trimmed == expected {
        info!("smoke test passed: output {:?}", trimmed);
        Ok(())
    } else {
        Err(Error::TestAssertionFailed {
            expected: expected.to_string(),
            actual: trimmed.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_test_section() -> TestSection {
        TestSection {
            expected: "25".to_string(),
            find_package: "EDDL".to_string(),
            target: "EDDL::eddl".to_string(),
            header: "eddl/tensor/tensor.h".to_string(),
            source: None,
            cmake_minimum: "3.9.2".to_string(),
            cxx_standard: 11,
        }
    }

    #[test]
    fn test_cmake_lists_content() {
        let text = cmake_lists(&sample_test_section());
        assert!(text.contains("cmake_minimum_required(VERSION 3.9.2)"));
        assert!(text.contains("set(CMAKE_CXX_STANDARD 11)"));
        assert!(text.contains("add_executable(smoke test.cpp)"));
        assert!(text.contains("find_package(EDDL REQUIRED)"));
        assert!(text.contains("target_link_libraries(smoke PUBLIC EDDL::eddl)"));
    }

    #[test]
    fn test_default_source_program() {
        let text = test_source(&sample_test_section());
        assert!(text.contains("#include <eddl/tensor/tensor.h>"));
        assert!(text.contains("Tensor::ones({5, 5})"));
        assert!(text.contains("sum()"));
    }

    #[test]
    fn test_source_override_wins() {
        let mut section = sample_test_section();
        section.source = Some("int main(){return 0;}".to_string());
        assert_eq!(test_source(&section), "int main(){return 0;}");
    }

    #[test]
    fn test_assert_output_exact_match() {
        assert!(assert_output("25", "25").is_ok());
    }

    #[test]
    fn test_assert_output_trims_captured() {
        assert!(assert_output("25\n", "25").is_ok());
        assert!(assert_output("  25\n\n", "25").is_ok());
    }

    #[test]
    fn test_assert_output_rejects_wrong_values() {
        assert!(matches!(
            assert_output("25.0", "25"),
            Err(Error::TestAssertionFailed { ref actual, .. }) if actual == "25.0"
        ));
        assert!(assert_output("24", "25").is_err());
        assert!(assert_output("", "25").is_err());
    }

    #[test]
    fn test_assert_output_does_not_trim_expected() {
        // The expected literal is compared exactly; only the captured side
        // is trimmed
        assert!(assert_output("25", "25\n").is_err());
    }
}
