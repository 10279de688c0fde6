#![forbid(unsafe_code)]

//! Certificate handling for soapsig.
//!
//! The verifier only needs the signer's RSA public key. It is taken from an
//! X.509 certificate (PEM or DER) or from a bare SubjectPublicKeyInfo.
//! No chain, validity period or revocation checks are made here; trusting
//! the certificate is the caller's decision.

pub mod certificate;
pub mod loader;

pub use certificate::Certificate;
pub use loader::load_certificate_file;
