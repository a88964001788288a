//! A configured entry point for both verification modes.

use std::path::Path;

use crate::config::VerifyConfig;
use crate::error::VfileResult;
use crate::handle::VerifiedFile;
use crate::hashed::open_hashed_file_with;
use crate::keyring::KeyRing;
use crate::signed::open_signed_file_with;

/// Verify-then-open with a validated [`VerifyConfig`].
///
/// Holds no state besides its configuration; one `Verifier` can serve any
/// number of concurrent calls.
///
/// # Example
///
/// ```no_run
/// use vfile::{Verifier, VerifyConfig, load_key_ring};
///
/// # fn main() -> vfile::VfileResult<()> {
/// let verifier = Verifier::new(VerifyConfig {
///     signature_suffix: ".asc".into(),
///     ..VerifyConfig::default()
/// })?;
/// let ring = load_key_ring("/etc/vfile/trusted.gpg")?;
/// let firmware = verifier.open_signed(&ring, "/boot/firmware.bin")?;
/// # drop(firmware);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    config: VerifyConfig,
}

impl Verifier {
    /// Create a verifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VfileError::Config`] if the configuration is invalid.
    pub fn new(config: VerifyConfig) -> VfileResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Open `path` after verifying the signature at `path` + configured suffix.
    ///
    /// # Errors
    ///
    /// See [`crate::open_signed_sig_file`].
    pub fn open_signed(&self, ring: &KeyRing, path: impl AsRef<Path>) -> VfileResult<VerifiedFile> {
        let path = path.as_ref();
        let sig_path = self.config.signature_path_for(path);
        open_signed_file_with(ring, path, &sig_path, &self.config)
    }

    /// Open `path` after verifying the signature stored at `sig_path`.
    ///
    /// # Errors
    ///
    /// See [`crate::open_signed_file`].
    pub fn open_signed_with(
        &self,
        ring: &KeyRing,
        path: impl AsRef<Path>,
        sig_path: impl AsRef<Path>,
    ) -> VfileResult<VerifiedFile> {
        open_signed_file_with(ring, path.as_ref(), sig_path.as_ref(), &self.config)
    }

    /// Open `path` after checking its SHA-256 digest against `expected`.
    ///
    /// # Errors
    ///
    /// See [`crate::open_hashed_file_256`].
    pub fn open_hashed(&self, path: impl AsRef<Path>, expected: &[u8]) -> VfileResult<VerifiedFile> {
        open_hashed_file_with(path.as_ref(), expected, &self.config)
    }
}
