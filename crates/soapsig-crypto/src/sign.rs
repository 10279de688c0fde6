#![forbid(unsafe_code)]

//! Signature algorithm implementations (RSA PKCS#1 v1.5).

use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{alphabet, Engine};
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use soapsig_core::{algorithm, Error};

/// Trait for signature algorithms.
///
/// `verify` returns `Ok(false)` when the signature simply does not match.
/// Signature bytes that cannot be a signature for `key` at all are an
/// error.
pub trait SignatureAlgorithm: Send + Sync {
    fn uri(&self) -> &'static str;
    fn verify(&self, key: &RsaPublicKey, data: &[u8], signature: &[u8]) -> Result<bool, Error>;
}

/// Create a signature algorithm from its URI.
pub fn from_uri(uri: &str) -> Result<Box<dyn SignatureAlgorithm>, Error> {
    match uri {
        algorithm::RSA_SHA1 => Ok(Box::new(RsaPkcs1v15Sha1)),
        _ => Err(Error::UnsupportedAlgorithm(format!("signature algorithm: {uri}"))),
    }
}

/// Lenient decoder for `SignatureValue`: nonzero trailing bits and missing
/// padding are accepted.
const SIGNATURE_VALUE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a base64 `SignatureValue`, ignoring embedded whitespace.
pub fn decode_signature_value(value: &str) -> Result<Vec<u8>, Error> {
    let clean: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    SIGNATURE_VALUE_ENGINE
        .decode(clean)
        .map_err(|e| Error::SignatureVerification(format!("SignatureValue is not base64: {e}")))
}

// ── RSA PKCS#1 v1.5 ─────────────────────────────────────────────────

/// RSA PKCS#1 v1.5 with SHA-1 (`rsa-sha1`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaPkcs1v15Sha1;

impl SignatureAlgorithm for RsaPkcs1v15Sha1 {
    fn uri(&self) -> &'static str {
        algorithm::RSA_SHA1
    }

    fn verify(&self, key: &RsaPublicKey, data: &[u8], sig_bytes: &[u8]) -> Result<bool, Error> {
        use signature::Verifier;

        if sig_bytes.len() != key.size() {
            return Err(Error::SignatureVerification(format!(
                "signature is {} bytes, key modulus is {} bytes",
                sig_bytes.len(),
                key.size()
            )));
        }
        let sig = rsa::pkcs1v15::Signature::try_from(sig_bytes)
            .map_err(|e| Error::SignatureVerification(format!("invalid RSA signature: {e}")))?;
        let vk = rsa::pkcs1v15::VerifyingKey::<sha1::Sha1>::new(key.clone());
        let valid = vk.verify(data, &sig).is_ok();
        log::debug!("rsa-sha1 over {} bytes: {}", data.len(), if valid { "match" } else { "mismatch" });
        Ok(valid)
    }
}
