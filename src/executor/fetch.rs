// src/executor/fetch.rs

//! Source archive fetching, integrity verification, and extraction

use crate::error::{Error, Result};
use crate::hash;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info};

/// Timeout for HTTP requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffer size for streaming downloads
const STREAM_BUFFER_SIZE: usize = 8192;

/// Fetch a source archive into `dest_dir` and verify its digest
///
/// `url` may be an http(s) URL or a local filesystem path. On digest
/// mismatch the fetched file is removed before the error is returned, so a
/// corrupt download never survives in the workspace.
pub fn fetch_source(url: &str, dest_dir: &Path, expected_sha256: &str) -> Result<PathBuf> {
    let filename = url.split('/').next_back().unwrap_or("source.tar.gz");
    let dest_path = dest_dir.join(filename);

    if url.starts_with("http://") || url.starts_with("https://") {
        info!("downloading {}", url);
        download_file(url, &dest_path)?;
    } else {
        debug!("copying local source {}", url);
        let src = Path::new(url);
        if !src.exists() {
            return Err(Error::NotFound(format!("local source not found: {}", url)));
        }
        fs::copy(src, &dest_path)?;
    }

    if let Err(e) = hash::verify_file(&dest_path, expected_sha256) {
        let _ = fs::remove_file(&dest_path);
        return Err(Error::IntegrityMismatch {
            url: url.to_string(),
            expected: e.expected,
            actual: e.actual,
        });
    }

    debug!("digest verified for {}", dest_path.display());
    Ok(dest_path)
}

/// Download a file over HTTP, streaming to disk with a progress bar
fn download_file(url: &str, dest: &Path) -> Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| Error::DownloadError(format!("failed to create HTTP client: {}", e)))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| Error::DownloadError(format!("request to {} failed: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(Error::DownloadError(format!(
            "failed to download {}: HTTP {}",
            url,
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(0);
    let pb = progress_bar(total_size, dest);

    let mut file = File::create(dest)
        .map_err(|e| Error::IoError(format!("failed to create {}: {}", dest.display(), e)))?;

    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];
    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| Error::DownloadError(format!("failed to read response: {}", e)))?;
        if bytes_read == 0 {
            break;
        }
        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::IoError(format!("failed to write data: {}", e)))?;
        downloaded += bytes_read as u64;
        pb.set_position(downloaded);
    }

    pb.finish_and_clear();
    debug!("downloaded {} bytes to {}", downloaded, dest.display());
    Ok(())
}

fn progress_bar(total_size: u64, dest: &Path) -> ProgressBar {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if total_size > 0 {
        let pb = ProgressBar::new(total_size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
                .expect("invalid progress bar template")
                .progress_chars("#>-"),
        );
        pb.set_message(name);
        pb
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {bytes} ({bytes_per_sec}) {msg}")
                .expect("invalid spinner template"),
        );
        pb.set_message(format!("{} (unknown size)", name));
        pb
    }
}

/// Extract an archive to a destination directory
///
/// Supports: .tar.gz, .tgz, .tar.xz, .txz, .tar.bz2, .tbz2, .tar
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let archive_str = archive
        .to_str()
        .ok_or_else(|| Error::IoError(format!("non-utf8 archive path: {}", archive.display())))?;
    let dest_str = dest
        .to_str()
        .ok_or_else(|| Error::IoError(format!("non-utf8 dest path: {}", dest.display())))?;

    let filename = archive.file_name().and_then(|n| n.to_str()).unwrap_or("");

    let flags = if filename.ends_with(".tar.gz") || filename.ends_with(".tgz") {
        "-xzf"
    } else if filename.ends_with(".tar.xz") || filename.ends_with(".txz") {
        "-xJf"
    } else if filename.ends_with(".tar.bz2") || filename.ends_with(".tbz2") {
        "-xjf"
    } else if filename.ends_with(".tar") {
        "-xf"
    } else {
        return Err(Error::ParseError(format!("unknown archive format: {}", filename)));
    };

    let output = Command::new("tar")
        .args([flags, archive_str, "-C", dest_str])
        .output()
        .map_err(|e| Error::IoError(format!("tar failed: {}", e)))?;

    if !output.status.success() {
        return Err(Error::IoError(format!(
            "failed to extract archive: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    Ok(())
}

/// Locate the source root inside an extraction directory
///
/// Archives usually wrap their content in a single top-level directory;
/// if so, that directory is the source root.
pub fn source_root(extract_dir: &Path) -> Result<PathBuf> {
    let entries: Vec<_> = fs::read_dir(extract_dir)?.filter_map(|e| e.ok()).collect();

    if entries.len() == 1 && entries[0].file_type().map(|t| t.is_dir()).unwrap_or(false) {
        Ok(entries[0].path())
    } else {
        Ok(extract_dir.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_bytes;

    #[test]
    fn test_fetch_local_source_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pkg-1.0.tar.gz");
        fs::write(&src, b"archive bytes").unwrap();
        let digest = hash_bytes(b"archive bytes");

        let dest_dir = tempfile::tempdir().unwrap();
        let fetched =
            fetch_source(src.to_str().unwrap(), dest_dir.path(), digest.as_str()).unwrap();
        assert!(fetched.exists());
        assert_eq!(fetched.file_name().unwrap(), "pkg-1.0.tar.gz");
    }

    #[test]
    fn test_fetch_mismatch_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pkg-1.0.tar.gz");
        fs::write(&src, b"archive bytes").unwrap();

        // Digest of different content
        let wrong = hash_bytes(b"other bytes");

        let dest_dir = tempfile::tempdir().unwrap();
        let err =
            fetch_source(src.to_str().unwrap(), dest_dir.path(), wrong.as_str()).unwrap_err();
        assert!(matches!(err, Error::IntegrityMismatch { .. }));
        // No partial file survives
        assert!(!dest_dir.path().join("pkg-1.0.tar.gz").exists());
    }

    #[test]
    fn test_fetch_missing_local_source() {
        let dest_dir = tempfile::tempdir().unwrap();
        let err = fetch_source(
            "/nonexistent/pkg.tar.gz",
            dest_dir.path(),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f",
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_extract_unknown_format() {
        let result = extract_archive(Path::new("file.unknown"), Path::new("/tmp"));
        assert!(result.is_err());
    }

    #[test]
    fn test_source_root_single_dir() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("pkg-1.0");
        fs::create_dir(&inner).unwrap();

        assert_eq!(source_root(dir.path()).unwrap(), inner);
    }

    #[test]
    fn test_source_root_flat_layout() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("CMakeLists.txt"), "").unwrap();
        fs::write(dir.path().join("main.cpp"), "").unwrap();

        assert_eq!(source_root(dir.path()).unwrap(), dir.path());
    }
}
