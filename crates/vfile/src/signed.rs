//! Open files only after their detached signature checks out.

use std::fs::File;
use std::io::{BufReader, Seek};
use std::path::Path;

use tracing::{debug, warn};

use crate::config::VerifyConfig;
use crate::error::{UnsignedCause, VfileError, VfileResult};
use crate::handle::{Verification, VerifiedFile};
use crate::keyring::KeyRing;
use crate::signature::{SignatureFile, names_issuer};

/// Open `path` after verifying its companion signature at `path.sig`.
///
/// # Errors
///
/// - [`VfileError::Open`] if `path` itself cannot be opened (never wrapped)
/// - [`VfileError::Unsigned`] if the signature file is missing or
///   unreadable, the ring is empty, or no signature validates
/// - [`VfileError::Io`] if rewinding the content fails
pub fn open_signed_sig_file(ring: &KeyRing, path: impl AsRef<Path>) -> VfileResult<VerifiedFile> {
    let config = VerifyConfig::default();
    let path = path.as_ref();
    open_signed_file_with(ring, path, &config.signature_path_for(path), &config)
}

/// Open `path` after verifying the detached signature stored at `sig_path`.
///
/// # Errors
///
/// Same as [`open_signed_sig_file`].
pub fn open_signed_file(
    ring: &KeyRing,
    path: impl AsRef<Path>,
    sig_path: impl AsRef<Path>,
) -> VfileResult<VerifiedFile> {
    open_signed_file_with(
        ring,
        path.as_ref(),
        sig_path.as_ref(),
        &VerifyConfig::default(),
    )
}

/// The content is trusted if any signature validates against a key in the
/// ring that may have issued it. Otherwise the first key that was named as
/// issuer but failed is reported, falling back to an unknown issuer.
pub(crate) fn open_signed_file_with(
    ring: &KeyRing,
    path: &Path,
    sig_path: &Path,
    config: &VerifyConfig,
) -> VfileResult<VerifiedFile> {
    let mut file = File::open(path).map_err(|source| VfileError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    // `file` is dropped, and so closed, on every early return below.
    let unsigned = |cause: UnsignedCause| {
        warn!(path = %path.display(), error = %cause, "rejecting unsigned file");
        VfileError::Unsigned {
            path: path.to_path_buf(),
            cause,
        }
    };
    let io_err = |source| VfileError::Io {
        path: path.to_path_buf(),
        source,
    };

    let sig_bytes = std::fs::read(sig_path).map_err(|source| {
        unsigned(UnsignedCause::SignatureFile {
            path: sig_path.to_path_buf(),
            source,
        })
    })?;

    if ring.is_empty() {
        return Err(unsigned(UnsignedCause::NoKeyRing));
    }

    let signatures = SignatureFile::from_bytes(&sig_bytes).map_err(unsigned)?;

    let mut bad_issuer = None;
    for signature in signatures.iter() {
        for key in ring.issuers_of(signature) {
            file.rewind().map_err(io_err)?;
            let content = BufReader::with_capacity(config.read_buffer_size, &mut file);
            match key.verify(signature, content) {
                Ok(()) => {
                    file.rewind().map_err(io_err)?;
                    let key_id = key.key_id();
                    debug!(path = %path.display(), key_id = %key_id, "signature verified");
                    return Ok(VerifiedFile::new(
                        file,
                        path.to_path_buf(),
                        Verification::Signature {
                            key_id,
                            fingerprint: key.fingerprint(),
                        },
                    ));
                },
                Err(e) => {
                    debug!(
                        path = %path.display(),
                        key_id = %key.key_id(),
                        error = %e,
                        "signature did not validate"
                    );
                    if names_issuer(signature) && bad_issuer.is_none() {
                        bad_issuer = Some(key.key_id());
                    }
                },
            }
        }
    }

    Err(unsigned(match bad_issuer {
        Some(key_id) => UnsignedCause::BadSignature { key_id },
        None => UnsignedCause::UnknownIssuer,
    }))
}
