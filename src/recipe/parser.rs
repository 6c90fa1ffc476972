// src/recipe/parser.rs

//! Recipe file parsing and validation

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::recipe::format::Recipe;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("failed to read recipe file: {}", e)))?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Returns non-fatal warnings; hard defects (empty identity, malformed
/// digest, unparseable remote URL) are errors.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::ParseError("recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::ParseError("recipe package version cannot be empty".to_string()));
    }

    // The digest must be a well-formed SHA-256 hex string. Upstream recipe
    // transcriptions occasionally carry an extra hex character; those can
    // never match a real archive and are rejected here.
    if let Err(e) = Hash::new(&recipe.source.sha256) {
        return Err(Error::ParseError(format!(
            "invalid source digest {:?}: {}",
            recipe.source.sha256, e
        )));
    }

    let url = recipe.archive_url();
    if url.starts_with("http://") || url.starts_with("https://") {
        if let Err(e) = url::Url::parse(&url) {
            return Err(Error::ParseError(format!("invalid source URL {:?}: {}", url, e)));
        }
    }

    if recipe.package.description.is_none() {
        warnings.push("missing package description".to_string());
    }
    if recipe.package.homepage.is_none() {
        warnings.push("missing package homepage".to_string());
    }
    if recipe.test.expected.trim() != recipe.test.expected {
        warnings.push(
            "test expected output has surrounding whitespace; comparison trims captured output"
                .to_string(),
        );
    }
    if !recipe.build_deps().iter().any(|d| *d == "cmake") {
        warnings.push("cmake is not listed as a build dependency".to_string());
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
[package]
name = "eddl"
version = "0.8.3a"
description = "European Distributed Deep Learning Library (EDDL)"
homepage = "https://github.com/deephealthproject/eddl"

[source]
url = "https://github.com/deephealthproject/eddl/archive/v%(version)s.tar.gz"
sha256 = "3d0678b4e00b9a5fb9c3905cf5bd3f5daa596684af47d1e77fbabbfd82f4e064"

[build]
depends = [{ name = "cmake" }]

[test]
expected = "25"
find_package = "EDDL"
target = "EDDL::eddl"
header = "eddl/tensor/tensor.h"
"#;

    #[test]
    fn test_parse_valid_recipe() {
        let recipe = parse_recipe(VALID).unwrap();
        assert_eq!(recipe.package.name, "eddl");
        assert!(validate_recipe(&recipe).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(parse_recipe("this is not valid toml at all {}").is_err());
    }

    #[test]
    fn test_validate_empty_name() {
        let recipe = parse_recipe(&VALID.replace("name = \"eddl\"", "name = \"\"")).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_digest() {
        // 65 hex characters: the transcription defect from the original recipe
        let bad = VALID.replace(
            "3d0678b4e00b9a5fb9c3905cf5bd3f5daa596684af47d1e77fbabbfd82f4e064",
            "3d0678b4e00b9a5fb9c3905cf5bd3f5daa596684af47d1e77fbabbfd82f4e0645",
        );
        let recipe = parse_recipe(&bad).unwrap();
        let err = validate_recipe(&recipe).unwrap_err();
        assert!(err.to_string().contains("invalid source digest"));
    }

    #[test]
    fn test_validate_rejects_short_digest() {
        let bad = VALID.replace(
            "3d0678b4e00b9a5fb9c3905cf5bd3f5daa596684af47d1e77fbabbfd82f4e064",
            "abc123",
        );
        let recipe = parse_recipe(&bad).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_warnings() {
        let minimal = r#"
[package]
name = "demo"
version = "1.0"

[source]
url = "https://example.com/demo-1.0.tar.gz"
sha256 = "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"

[test]
expected = "1"
find_package = "Demo"
target = "Demo::demo"
header = "demo/demo.h"
"#;
        let recipe = parse_recipe(minimal).unwrap();
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("description")));
        assert!(warnings.iter().any(|w| w.contains("homepage")));
        assert!(warnings.iter().any(|w| w.contains("cmake")));
    }
}
