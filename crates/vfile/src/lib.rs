//! vfile - Verify-then-open for files on disk.
//!
//! A caller gets an open handle only after the file's content has been
//! proven trustworthy, either by:
//! - a detached OpenPGP signature from a key in a trusted [`KeyRing`]
//! - a SHA-256 digest the caller already knows
//!
//! Every failure says which of those checks went wrong, and a failed
//! verification never leaves a file open behind it.
//!
//! # Example
//!
//! ```no_run
//! use vfile::{load_key_ring, open_hashed_file_256, open_signed_sig_file, Sha256Digest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Signature next to the content at `image.bin.sig`.
//! let ring = load_key_ring("/etc/vfile/trusted.gpg")?;
//! let mut image = open_signed_sig_file(&ring, "/boot/image.bin")?;
//! let bytes = image.read_to_vec()?;
//!
//! // Digest pinned by the caller.
//! let pinned = Sha256Digest::of(&bytes);
//! let _again = open_hashed_file_256("/boot/image.bin", pinned.as_bytes())?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod config;
mod error;
mod handle;
mod hash;
mod hashed;
mod keyring;
mod signature;
mod signed;
mod verifier;

pub use config::{DEFAULT_SIGNATURE_SUFFIX, VerifyConfig};
pub use error::{HashCause, ParseCause, UnsignedCause, VfileError, VfileResult};
pub use handle::{Verification, VerifiedFile};
pub use hash::{Sha256Digest, sha256_file};
pub use hashed::open_hashed_file_256;
pub use keyring::{KeyMaterial, KeyRing, keys_for_algorithm, load_key_ring, rsa_keys};
pub use signature::SignatureFile;

pub use pgp;
pub use pgp::crypto::public_key::PublicKeyAlgorithm;
pub use pgp::types::{Fingerprint, KeyId};
pub use signed::{open_signed_file, open_signed_sig_file};
pub use verifier::Verifier;
