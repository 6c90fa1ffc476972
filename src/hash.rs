// src/hash.rs

//! SHA-256 digests for source archive integrity
//!
//! Recipes declare a single content digest for their source archive, and the
//! executor refuses to run any build step until the fetched bytes match it.
//! SHA-256 is the width the packaging convention implies; digests are stored
//! and compared as lowercase hex.

use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Read};
use std::path::Path;

/// Hex length of a SHA-256 digest
pub const SHA256_HEX_LEN: usize = 64;

/// Digest parsing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// Digest string has the wrong length (must be 64 hex chars)
    InvalidLength { expected: usize, got: usize },
    /// Digest string contains non-hex characters
    InvalidHex(String),
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, got } => {
                write!(f, "invalid digest length: expected {}, got {}", expected, got)
            }
            Self::InvalidHex(s) => write!(f, "invalid hex in digest: {}", s),
        }
    }
}

impl std::error::Error for HashError {}

/// A validated SHA-256 digest
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hash {
    value: String,
}

impl Hash {
    /// Parse and validate a digest string
    ///
    /// Rejects anything that is not exactly 64 hex characters. Some upstream
    /// recipes carry transcription defects (one hex character too many);
    /// those must fail here rather than silently never matching.
    pub fn new(value: impl Into<String>) -> Result<Self, HashError> {
        let value: String = value.into();

        if value.len() != SHA256_HEX_LEN {
            return Err(HashError::InvalidLength {
                expected: SHA256_HEX_LEN,
                got: value.len(),
            });
        }
        if !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HashError::InvalidHex(value));
        }

        Ok(Self {
            value: value.to_lowercase(),
        })
    }

    fn new_unchecked(value: String) -> Self {
        Self { value }
    }

    /// The digest as lowercase hex
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Compute the SHA-256 digest of a byte slice
pub fn hash_bytes(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Hash::new_unchecked(format!("{:x}", hasher.finalize()))
}

/// Compute the SHA-256 digest of data from a reader, streaming
pub fn hash_reader<R: Read>(reader: &mut R) -> io::Result<Hash> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(Hash::new_unchecked(format!("{:x}", hasher.finalize())))
}

/// Digest verification failure, carrying both sides of the comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyError {
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sha256 mismatch: expected {}, got {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for VerifyError {}

/// Verify a file matches an expected digest
///
/// Streams the file content rather than loading it into memory; source
/// archives can be large.
pub fn verify_file(path: &Path, expected: &str) -> Result<(), VerifyError> {
    let mut file = std::fs::File::open(path).map_err(|_| VerifyError {
        expected: expected.to_string(),
        actual: "<file read error>".to_string(),
    })?;

    let actual = hash_reader(&mut file).map_err(|_| VerifyError {
        expected: expected.to_string(),
        actual: "<hash read error>".to_string(),
    })?;

    if actual.as_str() == expected.to_lowercase() {
        Ok(())
    } else {
        Err(VerifyError {
            expected: expected.to_string(),
            actual: actual.value,
        })
    }
}
