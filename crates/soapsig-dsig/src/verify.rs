#![forbid(unsafe_code)]

//! XML-DSig verification of a WS-Security signed envelope.
//!
//! Processing order:
//! 1. Locate `ds:SignedInfo` in `wsse:Security/ds:Signature`
//! 2. For each `ds:Reference`: resolve the `wsu:Id` target, canonicalize,
//!    digest, compare. The first mismatch ends verification.
//! 3. Canonicalize `SignedInfo` and check `SignatureValue` with the signer's key

use crate::context::VerifyContext;
use crate::locate;
use roxmltree::{Document, Node};
use soapsig_core::{algorithm, ns, Error};
use soapsig_crypto::{digest, sign};
use soapsig_keys::Certificate;
use std::fmt;

/// Why a well-formed envelope did not verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The digest recomputed over a referenced element differs from the
    /// stated `DigestValue`.
    DigestMismatch {
        uri: String,
        expected: String,
        computed: String,
    },
    /// `SignatureValue` does not verify over the canonical `SignedInfo`.
    SignatureMismatch,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::DigestMismatch {
                uri,
                expected,
                computed,
            } => write!(
                f,
                "digest mismatch for {uri}: expected {expected}, computed {computed}"
            ),
            Failure::SignatureMismatch => f.write_str("signature value mismatch"),
        }
    }
}

/// Result of signature verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    /// Every digest matches and the signature is valid.
    Valid,
    Invalid(Failure),
}

impl VerifyResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerifyResult::Valid)
    }
}

impl VerifyContext {
    /// Verify `document` against the signer's certificate.
    pub fn verify(&self, document: &Document<'_>, certificate: &Certificate) -> Result<bool, Error> {
        Ok(self.verify_detailed(document, certificate)?.is_valid())
    }

    /// Like [`verify`](Self::verify), reporting which check failed.
    pub fn verify_detailed(
        &self,
        document: &Document<'_>,
        certificate: &Certificate,
    ) -> Result<VerifyResult, Error> {
        let signed_info = locate::signed_info(document)?;
        if self.enforce_declared_algorithms {
            self.check_declared_algorithms(signed_info)?;
        }

        let digests = self.check_digests(document, signed_info)?;
        if !digests.is_valid() {
            return Ok(digests);
        }

        if self.check_signature(signed_info, certificate)? {
            log::debug!("signature valid");
            Ok(VerifyResult::Valid)
        } else {
            log::warn!("signature value does not verify over SignedInfo");
            Ok(VerifyResult::Invalid(Failure::SignatureMismatch))
        }
    }

    /// Recompute every reference digest, stopping at the first mismatch.
    pub fn check_digests(
        &self,
        document: &Document<'_>,
        signed_info: Node<'_, '_>,
    ) -> Result<VerifyResult, Error> {
        let references = locate::references(signed_info)?;
        if references.is_empty() {
            log::warn!("SignedInfo has no Reference elements");
            return Ok(VerifyResult::Valid);
        }

        let ids = locate::wsu_ids(document);
        let options = self.reference_c14n();
        for reference in references {
            let uri = locate::reference_uri(reference)?;
            let target = locate::resolve_reference(document, &ids, uri)?;
            let expected = locate::digest_value(reference)?;

            let canonical = soapsig_c14n::canonicalize_with(target, &options)?;
            log::trace!("{uri} canonical: {}", String::from_utf8_lossy(&canonical));
            let computed = digest::digest_base64(digest::from_uri(algorithm::SHA1)?, &canonical);
            log::debug!("{uri}: {} canonical bytes, digest {computed}", canonical.len());

            if computed != expected {
                log::warn!("digest mismatch for {uri}: expected {expected}, computed {computed}");
                return Ok(VerifyResult::Invalid(Failure::DigestMismatch {
                    uri: uri.to_owned(),
                    expected,
                    computed,
                }));
            }
        }
        Ok(VerifyResult::Valid)
    }

    /// Check `SignatureValue` over the canonical form of `signed_info`.
    pub fn check_signature(
        &self,
        signed_info: Node<'_, '_>,
        certificate: &Certificate,
    ) -> Result<bool, Error> {
        let canonical = soapsig_c14n::canonicalize_with(signed_info, &self.signed_info_c14n())?;
        log::trace!("SignedInfo canonical: {}", String::from_utf8_lossy(&canonical));

        let signature = sign::decode_signature_value(&locate::signature_value(signed_info)?)?;
        log::debug!(
            "checking {} byte signature over {} bytes of SignedInfo",
            signature.len(),
            canonical.len()
        );
        self.signature_algorithm()
            .verify(certificate.public_key(), &canonical, &signature)
    }

    fn check_declared_algorithms(&self, signed_info: Node<'_, '_>) -> Result<(), Error> {
        let c14n = locate::method_algorithm(signed_info, ns::node::CANONICALIZATION_METHOD)?;
        if !soapsig_c14n::is_supported(c14n) {
            return Err(unsupported("canonicalization", c14n));
        }

        let method = locate::method_algorithm(signed_info, ns::node::SIGNATURE_METHOD)?;
        let declared = sign::from_uri(method).map_err(|_| unsupported("signature", method))?;
        if declared.uri() != self.signature_algorithm().uri() {
            return Err(unsupported("signature", method));
        }

        for reference in locate::references(signed_info)? {
            let uri = locate::method_algorithm(reference, ns::node::DIGEST_METHOD)?;
            digest::from_uri(uri).map_err(|_| unsupported("digest", uri))?;
        }
        Ok(())
    }
}

fn unsupported(kind: &str, uri: &str) -> Error {
    match algorithm::name(uri) {
        Some(name) => Error::UnsupportedAlgorithm(format!("{kind} method {name} ({uri})")),
        None => Error::UnsupportedAlgorithm(format!("{kind} method {uri}")),
    }
}

/// Verify a signed envelope with the default context.
///
/// Returns `Ok(false)` when a reference digest or the signature value does
/// not match. Structural problems are errors.
pub fn verify(document: &Document<'_>, certificate: &Certificate) -> Result<bool, Error> {
    VerifyContext::default().verify(document, certificate)
}

/// Reference digest check with the default context.
pub fn check_digests(document: &Document<'_>, signed_info: Node<'_, '_>) -> Result<bool, Error> {
    Ok(VerifyContext::default()
        .check_digests(document, signed_info)?
        .is_valid())
}

/// Signature value check with the default context.
pub fn check_signature(signed_info: Node<'_, '_>, certificate: &Certificate) -> Result<bool, Error> {
    VerifyContext::default().check_signature(signed_info, certificate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let f = Failure::DigestMismatch {
            uri: "#body".into(),
            expected: "AAA=".into(),
            computed: "BBB=".into(),
        };
        assert_eq!(
            f.to_string(),
            "digest mismatch for #body: expected AAA=, computed BBB="
        );
        assert_eq!(Failure::SignatureMismatch.to_string(), "signature value mismatch");
    }

    #[test]
    fn test_unsupported_names_known_algorithms() {
        let e = unsupported("signature", algorithm::RSA_SHA256);
        assert!(e.to_string().contains("RSA PKCS#1 v1.5 with SHA-256"));
        let e = unsupported("digest", "urn:x");
        assert_eq!(e.to_string(), "unsupported algorithm: digest method urn:x");
    }

    #[test]
    fn test_zero_references_is_valid() {
        let xml = format!(
            r#"<e:Envelope xmlns:e="{}"><e:Header><s:Security xmlns:s="{}"><Signature xmlns="{}"><SignedInfo/><SignatureValue/></Signature></s:Security></e:Header></e:Envelope>"#,
            ns::SOAP,
            ns::WSSE,
            ns::DSIG
        );
        let doc = soapsig_xml::parse(&xml).unwrap();
        let si = locate::signed_info(&doc).unwrap();
        assert!(check_digests(&doc, si).unwrap());
    }
}
