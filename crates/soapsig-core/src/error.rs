#![forbid(unsafe_code)]

/// Errors produced while verifying a WS-Security signed envelope.
///
/// A digest mismatch or a signature that does not verify is not an error:
/// those are ordinary negative results. Everything here is fatal for the
/// verification call that raised it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("invalid path expression: {0}")]
    XPath(String),

    #[error("malformed security header: {0}")]
    MalformedSecurityHeader(String),

    #[error("reference not found: {0}")]
    ReferenceNotFound(String),

    #[error("ambiguous reference: {0}")]
    AmbiguousReference(String),

    #[error("signature verification error: {0}")]
    SignatureVerification(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("canonicalization error: {0}")]
    Canonicalization(String),

    #[error("certificate error: {0}")]
    Certificate(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
