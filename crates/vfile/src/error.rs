//! Verification error types.
//!
//! The top-level [`VfileError`] keeps "the subject could not be opened"
//! ([`VfileError::Open`]) apart from every trust failure. Trust failures
//! wrap an inspectable cause so callers can branch on exactly why a file
//! was rejected.

use std::io;
use std::path::PathBuf;

use pgp::crypto::public_key::PublicKeyAlgorithm;
use pgp::types::KeyId;
use thiserror::Error;

/// Errors returned by key-ring loading and the verify-then-open operations.
#[derive(Debug, Error)]
pub enum VfileError {
    /// The subject file itself could not be opened.
    ///
    /// Never wrapped: this means the file is absent or inaccessible,
    /// independent of any trust decision.
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        /// Path of the subject file.
        path: PathBuf,
        /// Underlying open error.
        #[source]
        source: io::Error,
    },

    /// The file cannot be trusted by signature.
    #[error("{} is not validly signed: {cause}", .path.display())]
    Unsigned {
        /// Path of the subject file.
        path: PathBuf,
        /// Why no valid signature was found.
        #[source]
        cause: UnsignedCause,
    },

    /// The file content does not match the expected digest.
    #[error("{} has an invalid hash: {cause}", .path.display())]
    InvalidHash {
        /// Path of the subject file.
        path: PathBuf,
        /// Why the digest check failed.
        #[source]
        cause: HashCause,
    },

    /// A key ring yielded no keys of the required algorithm.
    #[error("no usable {algorithm:?} keys in key ring")]
    NoUsableKey {
        /// Algorithm that was filtered for.
        algorithm: PublicKeyAlgorithm,
    },

    /// A key file could not be parsed into a key ring.
    #[error("failed to parse key ring {}: {cause}", .path.display())]
    Parse {
        /// Path of the key file.
        path: PathBuf,
        /// What went wrong while reading or parsing.
        #[source]
        cause: ParseCause,
    },

    /// Reading or rewinding an already opened subject failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path of the subject file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid verifier configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl VfileError {
    /// Path of the file this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Open { path, .. }
            | Self::Unsigned { path, .. }
            | Self::InvalidHash { path, .. }
            | Self::Parse { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::NoUsableKey { .. } | Self::Config(_) => None,
        }
    }

    /// Whether this is a trust failure (as opposed to an I/O or setup error).
    #[must_use]
    pub fn is_untrusted(&self) -> bool {
        matches!(self, Self::Unsigned { .. } | Self::InvalidHash { .. })
    }
}

/// Why a file was found to be unsigned.
#[derive(Debug, Error)]
pub enum UnsignedCause {
    /// The companion signature file is missing or unreadable.
    #[error("cannot open signature file {}: {source}", .path.display())]
    SignatureFile {
        /// Path of the signature file.
        path: PathBuf,
        /// Underlying open or read error.
        #[source]
        source: io::Error,
    },

    /// No key ring (or an empty one) was supplied.
    #[error("no key ring supplied")]
    NoKeyRing,

    /// The signature file is not a well-formed detached signature.
    #[error("malformed signature file: {0}")]
    MalformedSignature(#[source] pgp::errors::Error),

    /// No signature was issued by a key in the ring.
    #[error("signature issued by unknown key")]
    UnknownIssuer,

    /// A signature issued by a key in the ring did not validate.
    #[error("signature by key {key_id} does not match content")]
    BadSignature {
        /// Key that issued the failing signature.
        key_id: KeyId,
    },
}

/// Why a digest check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashCause {
    /// The caller supplied an empty expected digest.
    #[error("no expected hash supplied")]
    NoExpectedHash,

    /// The content digest differs from the expected one.
    #[error("hash mismatch: got {}, want {}", hex::encode(.got), hex::encode(.want))]
    Mismatch {
        /// Digest computed from the file content.
        got: Vec<u8>,
        /// Digest the caller expected.
        want: Vec<u8>,
    },
}

/// Why a key file could not be turned into a key ring.
#[derive(Debug, Error)]
pub enum ParseCause {
    /// The key file could not be read.
    #[error("{0}")]
    Read(#[source] io::Error),

    /// The key file is not OpenPGP public key material.
    #[error("{0}")]
    Malformed(#[source] pgp::errors::Error),

    /// The key file contains no keys.
    #[error("no key material found")]
    NoKeyMaterial,
}

/// Result type for vfile operations.
pub type VfileResult<T> = Result<T, VfileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_is_not_untrusted() {
        let err = VfileError::Open {
            path: PathBuf::from("/nope"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(!err.is_untrusted());
        assert_eq!(err.path(), Some(std::path::Path::new("/nope")));
    }

    #[test]
    fn test_mismatch_display_is_hex() {
        let err = VfileError::InvalidHash {
            path: PathBuf::from("f"),
            cause: HashCause::Mismatch {
                got: vec![0xab, 0xcd],
                want: vec![0x99, 0x77],
            },
        };
        assert!(err.is_untrusted());
        assert_eq!(
            err.to_string(),
            "f has an invalid hash: hash mismatch: got abcd, want 9977"
        );
    }

    #[test]
    fn test_source_chain_reaches_cause() {
        let err = VfileError::Unsigned {
            path: PathBuf::from("f"),
            cause: UnsignedCause::NoKeyRing,
        };
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "no key ring supplied");
    }

    #[test]
    fn test_malformed_signature_chain_reaches_decoder_error() {
        let cause = crate::signature::SignatureFile::from_bytes(b"not a signature").unwrap_err();
        let err = VfileError::Unsigned {
            path: PathBuf::from("f"),
            cause,
        };
        let cause = std::error::Error::source(&err).unwrap();
        assert!(cause.to_string().starts_with("malformed signature file: "));
        assert!(cause.source().is_some());
    }
}
