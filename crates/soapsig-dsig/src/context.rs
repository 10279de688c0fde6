#![forbid(unsafe_code)]

//! Verification context: configuration shared by every verification call.

use soapsig_c14n::C14nOptions;
use soapsig_crypto::sign::{RsaPkcs1v15Sha1, SignatureAlgorithm};

/// Configuration for verifying signed envelopes.
///
/// A context holds no per-document state and can be shared between threads.
pub struct VerifyContext {
    /// InclusiveNamespaces prefixes used when canonicalizing `SignedInfo`.
    pub signed_info_prefixes: Vec<String>,
    /// Drop ignorable blank text before canonicalizing.
    pub strip_blank_text: bool,
    /// Reject documents whose declared methods are not exc-c14n, SHA-1 and
    /// RSA-SHA1. When off the declarations are not consulted.
    pub enforce_declared_algorithms: bool,
    signature_algorithm: Box<dyn SignatureAlgorithm>,
}

impl Default for VerifyContext {
    fn default() -> Self {
        Self {
            signed_info_prefixes: vec!["soap".to_owned()],
            strip_blank_text: true,
            enforce_declared_algorithms: false,
            signature_algorithm: Box::new(RsaPkcs1v15Sha1),
        }
    }
}

impl std::fmt::Debug for VerifyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifyContext")
            .field("signed_info_prefixes", &self.signed_info_prefixes)
            .field("strip_blank_text", &self.strip_blank_text)
            .field("enforce_declared_algorithms", &self.enforce_declared_algorithms)
            .field("signature_algorithm", &self.signature_algorithm.uri())
            .finish()
    }
}

impl VerifyContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signed_info_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.signed_info_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strip_blank_text(mut self, strip: bool) -> Self {
        self.strip_blank_text = strip;
        self
    }

    pub fn with_enforce_declared_algorithms(mut self, enforce: bool) -> Self {
        self.enforce_declared_algorithms = enforce;
        self
    }

    /// Replace the signature algorithm used for `SignatureValue`.
    pub fn with_signature_algorithm(mut self, algorithm: Box<dyn SignatureAlgorithm>) -> Self {
        self.signature_algorithm = algorithm;
        self
    }

    pub fn signature_algorithm(&self) -> &dyn SignatureAlgorithm {
        self.signature_algorithm.as_ref()
    }

    /// Canonicalization options for reference targets.
    pub fn reference_c14n(&self) -> C14nOptions {
        C14nOptions::default().with_strip_blank_text(self.strip_blank_text)
    }

    /// Canonicalization options for `SignedInfo`.
    pub fn signed_info_c14n(&self) -> C14nOptions {
        self.reference_c14n()
            .with_inclusive_prefixes(self.signed_info_prefixes.iter().cloned())
    }
}
