//! SHA-256 content digests.
//!
//! Digests are computed by streaming the content through the hasher, so
//! verification never needs the whole file in memory.

use std::fmt;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{VfileError, VfileResult};

/// Default read buffer size for streaming digests.
pub(crate) const DEFAULT_BUFFER_SIZE: usize = 8192;

/// A SHA-256 content digest (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    /// Digest a byte slice.
    #[must_use]
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Digest everything `reader` yields, reading `buffer_size` bytes at a time.
    ///
    /// # Errors
    ///
    /// Returns the reader's I/O error unchanged.
    pub fn from_reader<R: Read>(reader: &mut R, buffer_size: usize) -> std::io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; buffer_size.max(1)];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buf[..n]);
        }
        Ok(Self(hasher.finalize().into()))
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Try to create from a slice.
    ///
    /// Returns `None` if the slice is not exactly 32 bytes.
    #[must_use]
    pub fn try_from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(slice).ok().map(Self)
    }

    /// Encode as lowercase hex.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from hex.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid hex or not 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        Self::try_from_slice(&bytes).ok_or(hex::FromHexError::InvalidStringLength)
    }
}

/// Compute the SHA-256 digest of a file.
///
/// Convenience for producers that need the expected digest of a file they
/// are about to publish.
///
/// # Errors
///
/// Returns [`VfileError::Open`] if the file cannot be opened and
/// [`VfileError::Io`] if reading it fails.
pub fn sha256_file(path: impl AsRef<Path>) -> VfileResult<Sha256Digest> {
    let path = path.as_ref();
    let mut file = std::fs::File::open(path).map_err(|source| VfileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Sha256Digest::from_reader(&mut file, DEFAULT_BUFFER_SIZE).map_err(|source| VfileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl fmt::Debug for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256Digest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Sha256Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<Sha256Digest> for [u8; 32] {
    fn from(digest: Sha256Digest) -> Self {
        digest.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_empty_digest_is_well_known() {
        assert_eq!(Sha256Digest::of(b"").to_hex(), EMPTY);
    }

    #[test]
    fn test_reader_matches_slice_across_buffer_boundary() {
        // Larger than several 7-byte buffers, not a multiple of 7.
        let data = vec![0x42u8; 1000];
        let streamed = Sha256Digest::from_reader(&mut data.as_slice(), 7).unwrap();
        assert_eq!(streamed, Sha256Digest::of(&data));
    }

    #[test]
    fn test_hex_rejects_wrong_length() {
        assert!(Sha256Digest::from_hex("abcd").is_err());
        assert_eq!(
            Sha256Digest::from_hex(EMPTY).unwrap(),
            Sha256Digest::of(b"")
        );
    }

    #[test]
    fn test_sha256_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content");
        std::fs::write(&path, b"foo").unwrap();
        assert_eq!(sha256_file(&path).unwrap(), Sha256Digest::of(b"foo"));
    }

    #[test]
    fn test_sha256_file_missing_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = sha256_file(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, VfileError::Open { .. }));
    }
}
