//! Secret-key signers producing detached signatures vfile accepts.

use pgp::composed::{Deserializable, DetachedSignature, SignedPublicKey, SignedSecretKey};
use pgp::crypto::hash::HashAlgorithm;
use pgp::types::{Fingerprint, KeyDetails, KeyId, Password};
use vfile::KeyRing;

use crate::fixtures::fixture_secret_key;

#[derive(Debug, Clone, Copy)]
enum SigningPart {
    Primary,
    Subkey(usize),
}

/// An unprotected OpenPGP secret key and the part of it that signs.
#[derive(Debug)]
pub struct TestSigner {
    secret: SignedSecretKey,
    part: SigningPart,
}

impl TestSigner {
    /// Signer using the primary key of fixture `name` (`key0` or `key1`).
    ///
    /// # Panics
    ///
    /// Panics if the secret key fixture is missing or invalid.
    #[must_use]
    pub fn fixture(name: &str) -> Self {
        Self {
            secret: load_secret(name),
            part: SigningPart::Primary,
        }
    }

    /// Signer using the first secret sub-key of fixture `name`.
    ///
    /// # Panics
    ///
    /// Panics if the fixture is invalid or has no secret sub-key.
    #[must_use]
    pub fn fixture_subkey(name: &str) -> Self {
        let secret = load_secret(name);
        assert!(
            !secret.secret_subkeys.is_empty(),
            "fixture {name} has no secret sub-key"
        );
        Self {
            secret,
            part: SigningPart::Subkey(0),
        }
    }

    /// The whole public key, sub-keys included.
    #[must_use]
    pub fn public_key(&self) -> SignedPublicKey {
        self.secret.to_public_key()
    }

    /// Key ring trusting only this signer's key.
    #[must_use]
    pub fn ring(&self) -> KeyRing {
        [self.public_key()].into_iter().collect()
    }

    /// ID of the signing key.
    #[must_use]
    pub fn key_id(&self) -> KeyId {
        match self.part {
            SigningPart::Primary => self.secret.primary_key.legacy_key_id(),
            SigningPart::Subkey(i) => self.secret.secret_subkeys[i].key.legacy_key_id(),
        }
    }

    /// Fingerprint of the signing key.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        match self.part {
            SigningPart::Primary => self.secret.primary_key.fingerprint(),
            SigningPart::Subkey(i) => self.secret.secret_subkeys[i].key.fingerprint(),
        }
    }

    /// Binary-mode detached signature over `content`, SHA-256.
    ///
    /// # Panics
    ///
    /// Panics if signing fails.
    #[must_use]
    pub fn sign(&self, content: &[u8]) -> DetachedSignature {
        let rng = rand::thread_rng();
        let password = Password::empty();
        let signed = match self.part {
            SigningPart::Primary => DetachedSignature::sign_binary_data(
                rng,
                &self.secret.primary_key,
                &password,
                HashAlgorithm::Sha256,
                content,
            ),
            SigningPart::Subkey(i) => DetachedSignature::sign_binary_data(
                rng,
                &self.secret.secret_subkeys[i].key,
                &password,
                HashAlgorithm::Sha256,
                content,
            ),
        };
        signed.unwrap_or_else(|e| panic!("Signing with {} failed: {e}", self.key_id()))
    }
}

fn load_secret(name: &str) -> SignedSecretKey {
    SignedSecretKey::from_bytes(&fixture_secret_key(name)[..])
        .unwrap_or_else(|e| panic!("Invalid secret key fixture {name}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::fixture_ring;

    #[test]
    fn test_fixture_matches_ring_primary() {
        let signer = TestSigner::fixture("key0");
        let ring = fixture_ring("key0");
        assert_eq!(
            ring.identities()[0].primary_key.legacy_key_id(),
            signer.key_id()
        );
        assert_eq!(signer.ring().len(), 1);
    }

    #[test]
    fn test_subkey_signer_is_ring_subkey() {
        let signer = TestSigner::fixture_subkey("key1");
        let ring = fixture_ring("key1");
        assert_eq!(
            ring.identities()[0].public_subkeys[0].key.fingerprint(),
            signer.fingerprint()
        );
    }

    #[test]
    fn test_every_signer_verifies() {
        for signer in [
            TestSigner::fixture("key0"),
            TestSigner::fixture("key1"),
            TestSigner::fixture_subkey("key1"),
        ] {
            let sig = signer.sign(b"foo");
            let public = signer.public_key();
            let verified = match signer.part {
                SigningPart::Primary => sig.verify(&public.primary_key, b"foo"),
                SigningPart::Subkey(i) => sig.verify(&public.public_subkeys[i].key, b"foo"),
            };
            assert!(verified.is_ok(), "{}", signer.key_id());
        }
    }
}
