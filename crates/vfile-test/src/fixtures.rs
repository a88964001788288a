//! OpenPGP fixtures checked in under `crates/vfile/testdata`.
//!
//! Generated once with `gpg --batch --gen-key`:
//! - `key0`: RSA 2048 primary (sign, certify) plus an RSA encryption sub-key
//! - `key1`: RSA 2048 primary plus an RSA signing sub-key, also armored as
//!   `key1.asc`
//! - `dsakey`: a DSA primary with an ElGamal sub-key, no RSA material
//! - `keyring0+1+dsa`: the three binary exports above concatenated
//!
//! `key0-secret` and `key1-secret` are the unprotected secret keys.
//! `gpg-signed` holds `foo` with a binary signature by key0 (`.sig`) and
//! an armored one by key1's signing sub-key (`.asc`), both made by gpg.

use std::path::PathBuf;

use vfile::{KeyRing, load_key_ring};

/// Directory holding the fixtures.
#[must_use]
pub fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("vfile")
        .join("testdata")
}

/// Path of the binary key-ring fixture `name` (without extension).
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    testdata_dir().join(format!("{name}.gpg"))
}

/// Load the key-ring fixture `name`.
///
/// # Panics
///
/// Panics if the fixture is missing or does not parse.
#[must_use]
pub fn fixture_ring(name: &str) -> KeyRing {
    let path = fixture_path(name);
    load_key_ring(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {e}", path.display()))
}

/// Read the unprotected secret key fixture for `name` (`key0` or `key1`).
///
/// # Panics
///
/// Panics if the fixture is missing.
#[must_use]
pub fn fixture_secret_key(name: &str) -> Vec<u8> {
    let path = testdata_dir().join(format!("{name}-secret.gpg"));
    std::fs::read(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_exist() {
        for name in ["key0", "key1", "dsakey", "keyring0+1+dsa"] {
            assert!(fixture_path(name).exists(), "missing fixture {name}");
        }
        assert!(!fixture_secret_key("key0").is_empty());
        assert!(testdata_dir().join("gpg-signed.sig").exists());
    }

    #[test]
    fn test_combined_ring_has_every_key() {
        assert_eq!(fixture_ring("keyring0+1+dsa").len(), 3);
    }
}
