//! Verifier configuration.
//!
//! Every field has a production default, so an empty TOML document yields
//! a working configuration.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VfileError, VfileResult};
use crate::hash::DEFAULT_BUFFER_SIZE;

/// Suffix appended to a content path to find its detached signature.
pub const DEFAULT_SIGNATURE_SUFFIX: &str = ".sig";

/// Tunables for the verify-then-open operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Suffix appended to the content path to locate the signature file.
    pub signature_suffix: String,
    /// Read buffer size used while streaming content through a digest or
    /// signature check.
    pub read_buffer_size: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            signature_suffix: DEFAULT_SIGNATURE_SUFFIX.to_owned(),
            read_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl VerifyConfig {
    /// Parse and validate a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`VfileError::Config`] if the TOML is malformed or a value
    /// fails validation.
    pub fn from_toml_str(s: &str) -> VfileResult<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| VfileError::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`VfileError::Config`] if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> VfileResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| VfileError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "loaded verifier config");
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`VfileError::Config`] describing the first invalid value.
    pub fn validate(&self) -> VfileResult<()> {
        if self.signature_suffix.is_empty() {
            return Err(VfileError::Config(
                "signature_suffix must not be empty".into(),
            ));
        }
        if self.signature_suffix.contains(['/', '\\']) {
            return Err(VfileError::Config(format!(
                "signature_suffix {:?} must not contain a path separator",
                self.signature_suffix
            )));
        }
        if self.read_buffer_size == 0 {
            return Err(VfileError::Config(
                "read_buffer_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Companion signature path for `path`.
    #[must_use]
    pub fn signature_path_for(&self, path: &Path) -> PathBuf {
        let mut os: OsString = path.as_os_str().to_owned();
        os.push(&self.signature_suffix);
        PathBuf::from(os)
    }
}
