//! Test harness helpers.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;
use vfile::{DEFAULT_SIGNATURE_SUFFIX, SignatureFile, Sha256Digest};

use crate::signers::TestSigner;

/// Set up test logging with the given filter.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// Set up test logging with default filter (warn level).
pub fn setup_test_logging_default() {
    setup_test_logging("warn");
}

/// Write `content` to `path`.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_file(path: &Path, content: &[u8]) {
    std::fs::write(path, content)
        .unwrap_or_else(|e| panic!("Failed to write {}: {e}", path.display()));
}

/// Write `content` to `path` and its detached signatures to `path.sig`.
///
/// Each signer contributes one binary signature packet, appended in order.
/// With no signers the signature file is created empty.
///
/// # Panics
///
/// Panics if either file cannot be written.
pub fn write_signed_file(path: &Path, content: &[u8], signers: &[&TestSigner]) {
    write_file(path, content);
    let signatures: SignatureFile = signers.iter().map(|s| s.sign(content)).collect();
    let bytes = signatures
        .to_bytes()
        .expect("Failed to serialize signatures");
    write_file(&signature_path(path), &bytes);
}

/// Companion signature path for `path`: `path` plus `.sig`.
#[must_use]
pub fn signature_path(path: &Path) -> PathBuf {
    let mut sig_path = path.as_os_str().to_owned();
    sig_path.push(DEFAULT_SIGNATURE_SUFFIX);
    PathBuf::from(sig_path)
}

/// Write `content` to `path` and return its SHA-256 digest.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_hashed_file(path: &Path, content: &[u8]) -> Vec<u8> {
    write_file(path, content);
    Sha256Digest::of(content).as_bytes().to_vec()
}

/// A temporary directory for one test.
#[derive(Debug)]
pub struct TestContext {
    /// Temporary directory for the test.
    pub dir: TempDir,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a plain file in the test directory.
    #[must_use]
    pub fn write(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        write_file(&path, content);
        path
    }

    /// Create a file plus its `.sig` companion in the test directory.
    #[must_use]
    pub fn write_signed(&self, name: &str, content: &[u8], signers: &[&TestSigner]) -> PathBuf {
        let path = self.dir.path().join(name);
        write_signed_file(&path, content, signers);
        path
    }

    /// Create a file in the test directory and return its SHA-256 digest.
    #[must_use]
    pub fn write_hashed(&self, name: &str, content: &[u8]) -> (PathBuf, Vec<u8>) {
        let path = self.dir.path().join(name);
        let hash = write_hashed_file(&path, content);
        (path, hash)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
