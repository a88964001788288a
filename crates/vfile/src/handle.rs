//! The handle returned by a successful verification.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use pgp::types::{Fingerprint, KeyId};

use crate::hash::Sha256Digest;

/// How a [`VerifiedFile`] earned its trust.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// A detached signature by this key validated.
    Signature {
        /// ID of the key that validated the signature.
        key_id: KeyId,
        /// Fingerprint of the same key.
        fingerprint: Fingerprint,
    },
    /// The content matched the expected SHA-256 digest.
    Digest(Sha256Digest),
}

/// An open file whose content passed verification.
///
/// The handle starts at offset 0 no matter how much of the file the
/// verification step consumed. Dropping it closes the file.
#[derive(Debug)]
pub struct VerifiedFile {
    file: File,
    path: PathBuf,
    verification: Verification,
}

impl VerifiedFile {
    pub(crate) fn new(file: File, path: PathBuf, verification: Verification) -> Self {
        Self {
            file,
            path,
            verification,
        }
    }

    /// Path the file was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How the content was verified.
    #[must_use]
    pub fn verification(&self) -> &Verification {
        &self.verification
    }

    /// Give up the wrapper and take the underlying file.
    #[must_use]
    pub fn into_file(self) -> File {
        self.file
    }

    /// Read the whole verified content from the current position.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying read.
    pub fn read_to_vec(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.file.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl Read for VerifiedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for VerifiedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl From<VerifiedFile> for File {
    fn from(verified: VerifiedFile) -> Self {
        verified.file
    }
}
