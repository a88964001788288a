//! Detached OpenPGP signature files.
//!
//! A signature file holds one or more signature packets over the raw
//! content, binary (`gpg --detach-sign`) or ASCII-armored
//! (`gpg --armor --detach-sign`). Binary signatures by several keys can be
//! appended to one file, so content signed by several keys carries several
//! packets.

use pgp::composed::{ArmorOptions, Deserializable, DetachedSignature};
use pgp::packet::Signature;
use pgp::ser::Serialize;

use crate::error::UnsignedCause;

/// The parsed contents of a detached signature file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureFile {
    signatures: Vec<DetachedSignature>,
}

impl SignatureFile {
    /// Create an empty signature file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a signature.
    pub fn push(&mut self, signature: DetachedSignature) {
        self.signatures.push(signature);
    }

    /// Signatures in file order.
    #[must_use]
    pub fn signatures(&self) -> &[DetachedSignature] {
        &self.signatures
    }

    /// Signature packets in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter().map(|s| &s.signature)
    }

    /// Whether the file holds no signatures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Parse signature-file bytes, binary or ASCII-armored.
    ///
    /// Empty input yields a file with no signatures.
    ///
    /// # Errors
    ///
    /// Returns [`UnsignedCause::MalformedSignature`] if the bytes are not
    /// OpenPGP signature packets.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UnsignedCause> {
        if bytes.is_empty() {
            return Ok(Self::new());
        }
        let (signatures, _headers) =
            DetachedSignature::from_reader_many(bytes).map_err(UnsignedCause::MalformedSignature)?;
        let signatures = signatures
            .collect::<Result<Vec<_>, _>>()
            .map_err(UnsignedCause::MalformedSignature)?;
        Ok(Self { signatures })
    }

    /// Serialise as concatenated binary signature packets.
    ///
    /// # Errors
    ///
    /// Returns an error if a signature fails to serialise.
    pub fn to_bytes(&self) -> pgp::errors::Result<Vec<u8>> {
        let mut out = Vec::new();
        for signature in &self.signatures {
            signature.to_writer(&mut out)?;
        }
        Ok(out)
    }

    /// Serialise the first signature as an ASCII-armored block.
    ///
    /// Returns `None` for a file with no signatures.
    ///
    /// # Errors
    ///
    /// Returns an error if armoring fails.
    pub fn to_armored_string(&self) -> pgp::errors::Result<Option<String>> {
        self.signatures
            .first()
            .map(|s| s.to_armored_string(ArmorOptions::default()))
            .transpose()
    }
}

impl FromIterator<DetachedSignature> for SignatureFile {
    fn from_iter<I: IntoIterator<Item = DetachedSignature>>(iter: I) -> Self {
        Self {
            signatures: iter.into_iter().collect(),
        }
    }
}

/// Whether `signature` names its issuer by key ID or fingerprint.
pub(crate) fn names_issuer(signature: &Signature) -> bool {
    !signature.issuer_key_id().is_empty() || !signature.issuer_fingerprint().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GPG_SIG: &[u8] = include_bytes!("../testdata/gpg-signed.sig");
    const GPG_ASC: &[u8] = include_bytes!("../testdata/gpg-signed.asc");

    #[test]
    fn test_binary_signature_parses() {
        assert_eq!(GPG_SIG[0] & 0x80, 0x80);
        let file = SignatureFile::from_bytes(GPG_SIG).unwrap();
        assert_eq!(file.signatures().len(), 1);
        assert!(file.iter().all(names_issuer));
    }

    #[test]
    fn test_armored_signature_parses() {
        let file = SignatureFile::from_bytes(GPG_ASC).unwrap();
        assert_eq!(file.signatures().len(), 1);
    }

    #[test]
    fn test_concatenated_binary_signatures() {
        let asc = SignatureFile::from_bytes(GPG_ASC).unwrap();
        let mut bytes = GPG_SIG.to_vec();
        bytes.extend(asc.to_bytes().unwrap());

        let file = SignatureFile::from_bytes(&bytes).unwrap();
        assert_eq!(file.signatures().len(), 2);
        assert_eq!(file.signatures()[1], asc.signatures()[0]);
    }

    #[test]
    fn test_armored_output_parses_back() {
        let file = SignatureFile::from_bytes(GPG_SIG).unwrap();
        let armored = file.to_armored_string().unwrap().unwrap();
        assert!(armored.starts_with("-----BEGIN PGP SIGNATURE-----"));
        assert_eq!(SignatureFile::from_bytes(armored.as_bytes()).unwrap(), file);
    }

    #[test]
    fn test_empty_input_has_no_signatures() {
        let file = SignatureFile::from_bytes(b"").unwrap();
        assert!(file.is_empty());
        assert_eq!(file.to_armored_string().unwrap(), None);
    }

    #[test]
    fn test_garbage_is_malformed_with_source() {
        let err = SignatureFile::from_bytes(b"[[signature]]\nissuer = \"00\"\n").unwrap_err();
        assert!(matches!(err, UnsignedCause::MalformedSignature(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_public_key_block_is_not_a_signature() {
        let key = include_bytes!("../testdata/key1.asc");
        assert!(matches!(
            SignatureFile::from_bytes(key),
            Err(UnsignedCause::MalformedSignature(_))
        ));
    }
}
