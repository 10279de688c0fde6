#![forbid(unsafe_code)]

//! WS-Security XML Digital Signature verification.
//!
//! Verifies the single `ds:Signature` carried in the `wsse:Security` header
//! of a SOAP envelope: every `ds:Reference` digest is recomputed over the
//! exclusive canonical form of the element it names, then the
//! `ds:SignatureValue` is checked over the canonical `ds:SignedInfo` with the
//! signer's RSA public key.

pub mod context;
pub mod locate;
pub mod verify;

pub use context::VerifyContext;
pub use verify::{check_digests, check_signature, verify, Failure, VerifyResult};
