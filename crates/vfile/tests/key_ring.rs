//! Integration tests for key-ring loading and algorithm filtering.

use std::io::ErrorKind;

use vfile::pgp::types::KeyDetails;

use vfile::{
    KeyRing, ParseCause, PublicKeyAlgorithm, VfileError, keys_for_algorithm, load_key_ring,
    rsa_keys,
};
use vfile_test::{TestContext, fixture_path, fixture_ring, testdata_dir};

#[test]
fn test_rsa_keys_per_fixture() {
    let cases = [
        ("key0", Some(2)),
        ("key1", Some(2)),
        ("dsakey", None),
        ("keyring0+1+dsa", Some(4)),
    ];
    for (name, want) in cases {
        let ring = load_key_ring(fixture_path(name)).unwrap();
        match (rsa_keys(&ring), want) {
            (Ok(keys), Some(n)) => {
                assert_eq!(keys.len(), n, "{name}");
                assert!(keys.iter().all(|k| k.algorithm() == PublicKeyAlgorithm::RSA));
            },
            (Err(VfileError::NoUsableKey { algorithm }), None) => {
                assert_eq!(algorithm, PublicKeyAlgorithm::RSA);
            },
            (got, _) => panic!("{name}: unexpected result {got:?}"),
        }
    }
}

#[test]
fn test_rsa_keys_keep_ring_order() {
    let ring = fixture_ring("keyring0+1+dsa");
    let key0 = &ring.identities()[0];
    let key1 = &ring.identities()[1];

    let ids: Vec<_> = rsa_keys(&ring).unwrap().iter().map(|k| k.fingerprint()).collect();
    assert_eq!(
        ids,
        vec![
            key0.primary_key.fingerprint(),
            key0.public_subkeys[0].key.fingerprint(),
            key1.primary_key.fingerprint(),
            key1.public_subkeys[0].key.fingerprint(),
        ]
    );
}

#[test]
fn test_dsa_fixture_keeps_elgamal_subkey() {
    let ring = fixture_ring("dsakey");
    assert_eq!(
        ring.identities()[0].primary_key.algorithm(),
        PublicKeyAlgorithm::DSA
    );
    let elgamal = keys_for_algorithm(&ring, PublicKeyAlgorithm::ElgamalEncrypt).unwrap();
    assert_eq!(elgamal.len(), 1);
    assert!(elgamal[0].is_subkey());
}

#[test]
fn test_armored_and_binary_exports_agree() {
    let armored = load_key_ring(testdata_dir().join("key1.asc")).unwrap();
    assert_eq!(armored, fixture_ring("key1"));
}

#[test]
fn test_missing_key_file() {
    let ctx = TestContext::new();
    let missing = ctx.path().join("nope.gpg");
    match load_key_ring(&missing).unwrap_err() {
        VfileError::Parse {
            path,
            cause: ParseCause::Read(e),
        } => {
            assert_eq!(path, missing);
            assert_eq!(e.kind(), ErrorKind::NotFound);
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_malformed_key_file() {
    let ctx = TestContext::new();
    let path = ctx.write("bad.toml", b"[[identity]]\nname = \"x\"\n");
    assert!(matches!(
        load_key_ring(&path),
        Err(VfileError::Parse {
            cause: ParseCause::Malformed(_),
            ..
        })
    ));
}

#[test]
fn test_signature_file_is_not_a_key_ring() {
    assert!(matches!(
        load_key_ring(testdata_dir().join("gpg-signed.asc")),
        Err(VfileError::Parse {
            cause: ParseCause::Malformed(_),
            ..
        })
    ));
}

#[test]
fn test_ring_survives_serialisation() {
    let ctx = TestContext::new();
    let ring = fixture_ring("keyring0+1+dsa");
    let path = ctx.write("copy.gpg", &ring.to_bytes().unwrap());
    assert_eq!(load_key_ring(&path).unwrap(), ring);
}

#[test]
fn test_concatenated_files_match_combined_fixture() {
    let parts: Vec<u8> = ["key0", "key1", "dsakey"]
        .iter()
        .flat_map(|name| std::fs::read(fixture_path(name)).unwrap())
        .collect();
    let ring = KeyRing::from_bytes(&parts).unwrap();
    assert_eq!(ring, fixture_ring("keyring0+1+dsa"));
}
