//! Key rings: trusted OpenPGP public keys.
//!
//! A [`KeyRing`] is an ordered list of transferable public keys, each a
//! primary key plus any number of sub-keys. Key files hold one or more
//! keys, either binary (as written by `gpg --export`) or ASCII-armored
//! (`gpg --armor --export`). Binary key files concatenate into a
//! multi-key ring.
//!
//! Filtering a ring for one algorithm is a pure function
//! ([`keys_for_algorithm`], [`rsa_keys`]).

use std::io::Read;
use std::path::Path;

use pgp::composed::{Deserializable, SignedPublicKey};
use pgp::crypto::public_key::PublicKeyAlgorithm;
use pgp::packet::{PublicKey, PublicSubkey, Signature};
use pgp::ser::Serialize;
use pgp::types::{Fingerprint, KeyDetails, KeyId};
use tracing::{debug, warn};

use crate::error::{ParseCause, VfileError, VfileResult};

/// One public key out of a ring: a primary key or one of its sub-keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    /// The primary key of a transferable public key.
    Primary(PublicKey),
    /// A sub-key bound to a primary key.
    Subkey(PublicSubkey),
}

impl KeyMaterial {
    /// Public key algorithm.
    #[must_use]
    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        match self {
            Self::Primary(key) => key.algorithm(),
            Self::Subkey(key) => key.algorithm(),
        }
    }

    /// The 8-byte OpenPGP key ID.
    #[must_use]
    pub fn key_id(&self) -> KeyId {
        match self {
            Self::Primary(key) => key.legacy_key_id(),
            Self::Subkey(key) => key.legacy_key_id(),
        }
    }

    /// Full OpenPGP fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        match self {
            Self::Primary(key) => key.fingerprint(),
            Self::Subkey(key) => key.fingerprint(),
        }
    }

    /// Whether this is a sub-key.
    #[must_use]
    pub fn is_subkey(&self) -> bool {
        matches!(self, Self::Subkey(_))
    }

    /// Check `signature` over the content streamed from `data`.
    pub(crate) fn verify(&self, signature: &Signature, data: impl Read) -> pgp::errors::Result<()> {
        match self {
            Self::Primary(key) => signature.verify(key, data),
            Self::Subkey(key) => signature.verify(key, data),
        }
    }
}

/// Whether `signature` could have been issued by `key`.
///
/// A signature without issuer subpackets could be from any key.
pub(crate) fn may_have_issued(signature: &Signature, key: &impl KeyDetails) -> bool {
    let key_ids = signature.issuer_key_id();
    let fingerprints = signature.issuer_fingerprint();
    if key_ids.is_empty() && fingerprints.is_empty() {
        return true;
    }
    let key_id = key.legacy_key_id();
    let fingerprint = key.fingerprint();
    key_ids.into_iter().any(|id| *id == key_id)
        || fingerprints.into_iter().any(|fp| *fp == fingerprint)
}

/// An ordered collection of trusted public keys.
///
/// May be empty; an empty ring never validates anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRing {
    identities: Vec<SignedPublicKey>,
}

impl KeyRing {
    /// Create an empty key ring.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a public key at the end of the ring.
    ///
    /// Sub-keys whose binding signature does not verify are dropped.
    pub fn push(&mut self, key: SignedPublicKey) {
        self.identities.push(retain_bound_subkeys(key));
    }

    /// Public keys in insertion order.
    #[must_use]
    pub fn identities(&self) -> &[SignedPublicKey] {
        &self.identities
    }

    /// Whether the ring holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Number of transferable public keys (not counting sub-keys).
    #[must_use]
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Every key in the ring: ring order, primary before sub-keys.
    pub fn keys(&self) -> impl Iterator<Item = KeyMaterial> + '_ {
        self.identities.iter().flat_map(|identity| {
            std::iter::once(KeyMaterial::Primary(identity.primary_key.clone())).chain(
                identity
                    .public_subkeys
                    .iter()
                    .map(|sub| KeyMaterial::Subkey(sub.key.clone())),
            )
        })
    }

    /// Keys whose ID matches `key_id`.
    pub fn keys_by_id(&self, key_id: KeyId) -> impl Iterator<Item = KeyMaterial> + '_ {
        self.keys().filter(move |k| k.key_id() == key_id)
    }

    /// Keys that may have issued `signature`, in ring order.
    pub(crate) fn issuers_of<'a>(
        &'a self,
        signature: &'a Signature,
    ) -> impl Iterator<Item = KeyMaterial> + 'a {
        self.identities.iter().flat_map(move |identity| {
            let primary = may_have_issued(signature, &identity.primary_key)
                .then(|| KeyMaterial::Primary(identity.primary_key.clone()));
            let subkeys = identity
                .public_subkeys
                .iter()
                .filter(move |sub| may_have_issued(signature, &sub.key))
                .map(|sub| KeyMaterial::Subkey(sub.key.clone()));
            primary.into_iter().chain(subkeys)
        })
    }

    /// Parse a ring from key-file bytes, binary or ASCII-armored.
    ///
    /// Empty input yields an empty ring; [`load_key_ring`] is the entry
    /// point that rejects files without key material.
    ///
    /// # Errors
    ///
    /// Returns [`ParseCause::Malformed`] if the bytes are not OpenPGP
    /// public keys.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseCause> {
        if bytes.is_empty() {
            return Ok(Self::new());
        }
        let (keys, _headers) =
            SignedPublicKey::from_reader_many(bytes).map_err(ParseCause::Malformed)?;
        let mut ring = Self::new();
        for key in keys {
            ring.push(key.map_err(ParseCause::Malformed)?);
        }
        Ok(ring)
    }

    /// Serialise as concatenated binary public keys.
    ///
    /// # Errors
    ///
    /// Returns an error if a key fails to serialise.
    pub fn to_bytes(&self) -> pgp::errors::Result<Vec<u8>> {
        let mut out = Vec::new();
        for key in &self.identities {
            key.to_writer(&mut out)?;
        }
        Ok(out)
    }
}

impl FromIterator<SignedPublicKey> for KeyRing {
    fn from_iter<I: IntoIterator<Item = SignedPublicKey>>(iter: I) -> Self {
        let mut ring = Self::new();
        for key in iter {
            ring.push(key);
        }
        ring
    }
}

fn retain_bound_subkeys(mut key: SignedPublicKey) -> SignedPublicKey {
    let primary = &key.primary_key;
    key.public_subkeys.retain(|sub| match sub.verify_bindings(primary) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                primary = %primary.legacy_key_id(),
                subkey = %sub.key.legacy_key_id(),
                error = %e,
                "dropping sub-key without a valid binding"
            );
            false
        },
    });
    key
}

/// Load a key ring from a key file.
///
/// No normalisation or deduplication is performed.
///
/// # Errors
///
/// Returns [`VfileError::Parse`] with:
/// - [`ParseCause::Read`] if the file cannot be read (the I/O error is
///   passed through unchanged)
/// - [`ParseCause::Malformed`] if the content is not OpenPGP key material
/// - [`ParseCause::NoKeyMaterial`] if the file holds no keys
pub fn load_key_ring(path: impl AsRef<Path>) -> VfileResult<KeyRing> {
    let path = path.as_ref();
    let parse_err = |cause| VfileError::Parse {
        path: path.to_path_buf(),
        cause,
    };

    let bytes = std::fs::read(path).map_err(|e| parse_err(ParseCause::Read(e)))?;
    let ring = KeyRing::from_bytes(&bytes).map_err(parse_err)?;
    if ring.is_empty() {
        return Err(parse_err(ParseCause::NoKeyMaterial));
    }

    debug!(
        path = %path.display(),
        identities = ring.len(),
        "loaded key ring"
    );
    Ok(ring)
}

/// Flatten a ring into the keys of one algorithm.
///
/// Order is ring order, each primary key before its own sub-keys. Every
/// sub-key with a matching algorithm is retained regardless of its
/// capability flags.
///
/// # Errors
///
/// Returns [`VfileError::NoUsableKey`] if no key has the algorithm.
pub fn keys_for_algorithm(
    ring: &KeyRing,
    algorithm: PublicKeyAlgorithm,
) -> VfileResult<Vec<KeyMaterial>> {
    let keys: Vec<KeyMaterial> = ring.keys().filter(|k| k.algorithm() == algorithm).collect();
    if keys.is_empty() {
        return Err(VfileError::NoUsableKey { algorithm });
    }
    Ok(keys)
}

/// Extract every RSA key from a ring.
///
/// A ring with RSA keys alongside non-RSA ones still succeeds; only a
/// ring without any RSA key is an error.
///
/// # Errors
///
/// Returns [`VfileError::NoUsableKey`] if the ring holds no RSA key.
pub fn rsa_keys(ring: &KeyRing) -> VfileResult<Vec<KeyMaterial>> {
    keys_for_algorithm(ring, PublicKeyAlgorithm::RSA)
}
