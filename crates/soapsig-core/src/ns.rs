#![forbid(unsafe_code)]

//! XML namespace constants used by the WS-Security signature profile.

/// XML Digital Signature namespace
pub const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

/// WS-Security extension namespace
pub const WSSE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";

/// WS-Security utility namespace (carries `wsu:Id`)
pub const WSU: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";

/// SOAP 1.1 envelope namespace
pub const SOAP: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// XML namespace
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// Conventional prefixes bound to the namespaces above.
///
/// These are the prefixes used in lookup paths; they are resolved against
/// the URIs, so documents may use any prefix they like.
pub mod prefix {
    pub const DSIG: &str = "ds";
    pub const WSSE: &str = "wsse";
    pub const WSU: &str = "wsu";
    pub const SOAP: &str = "soap";
}

/// The prefix-to-URI bindings used by every lookup path in the library.
pub const BINDINGS: &[(&str, &str)] = &[
    (prefix::DSIG, DSIG),
    (prefix::WSSE, WSSE),
    (prefix::WSU, WSU),
    (prefix::SOAP, SOAP),
];

// ── Element names ────────────────────────────────────────────────────

pub mod node {
    // DSig elements
    pub const SIGNATURE: &str = "Signature";
    pub const CANONICALIZATION_METHOD: &str = "CanonicalizationMethod";
    pub const SIGNATURE_METHOD: &str = "SignatureMethod";
    pub const SIGNATURE_VALUE: &str = "SignatureValue";
    pub const REFERENCE: &str = "Reference";
    pub const DIGEST_METHOD: &str = "DigestMethod";
    pub const DIGEST_VALUE: &str = "DigestValue";
}

// ── Attribute names ──────────────────────────────────────────────────

pub mod attr {
    pub const ID: &str = "Id";
    pub const URI: &str = "URI";
    pub const ALGORITHM: &str = "Algorithm";
    pub const SPACE: &str = "space";
}
