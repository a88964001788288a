//! Open files only after their content matches an expected digest.

use std::fs::File;
use std::io::Seek;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::VerifyConfig;
use crate::error::{HashCause, VfileError, VfileResult};
use crate::handle::{Verification, VerifiedFile};
use crate::hash::Sha256Digest;

/// Open `path` after checking that its SHA-256 digest equals `expected`.
///
/// An empty `expected` is always a failure, never a wildcard. An empty file
/// whose expected digest is the digest of no bytes verifies normally.
///
/// # Errors
///
/// - [`VfileError::Open`] if `path` cannot be opened (never wrapped)
/// - [`VfileError::InvalidHash`] with [`HashCause::NoExpectedHash`] or
///   [`HashCause::Mismatch`]
/// - [`VfileError::Io`] if reading or rewinding the content fails
pub fn open_hashed_file_256(path: impl AsRef<Path>, expected: &[u8]) -> VfileResult<VerifiedFile> {
    open_hashed_file_with(path.as_ref(), expected, &VerifyConfig::default())
}

pub(crate) fn open_hashed_file_with(
    path: &Path,
    expected: &[u8],
    config: &VerifyConfig,
) -> VfileResult<VerifiedFile> {
    let mut file = File::open(path).map_err(|source| VfileError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let invalid = |cause: HashCause| {
        warn!(path = %path.display(), error = %cause, "rejecting file with invalid hash");
        VfileError::InvalidHash {
            path: path.to_path_buf(),
            cause,
        }
    };

    if expected.is_empty() {
        return Err(invalid(HashCause::NoExpectedHash));
    }

    let io_err = |source| VfileError::Io {
        path: path.to_path_buf(),
        source,
    };
    let digest = Sha256Digest::from_reader(&mut file, config.read_buffer_size).map_err(io_err)?;
    if digest.as_bytes().as_slice() != expected {
        return Err(invalid(HashCause::Mismatch {
            got: digest.as_bytes().to_vec(),
            want: expected.to_vec(),
        }));
    }

    file.rewind().map_err(io_err)?;

    debug!(path = %path.display(), digest = %digest, "hash verified");
    Ok(VerifiedFile::new(
        file,
        path.to_path_buf(),
        Verification::Digest(digest),
    ))
}
