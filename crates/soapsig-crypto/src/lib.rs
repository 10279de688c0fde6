#![forbid(unsafe_code)]

//! Cryptographic primitives for soapsig: SHA-1 digests and RSA PKCS#1 v1.5
//! signature verification.

pub mod digest;
pub mod sign;

pub use crate::digest::DigestAlgorithm;
pub use crate::sign::SignatureAlgorithm;
