//! Prelude module - commonly used types for convenient import.
//!
//! Use `use vfile::prelude::*;` to import all essential types.

// Errors
pub use crate::{HashCause, UnsignedCause, VfileError, VfileResult};

// Key rings
pub use crate::{KeyId, KeyRing, PublicKeyAlgorithm, load_key_ring};

// Verify-then-open
pub use crate::{
    Verification, VerifiedFile, Verifier, open_hashed_file_256, open_signed_file,
    open_signed_sig_file,
};

// Hashing
pub use crate::Sha256Digest;
