#![forbid(unsafe_code)]

//! Algorithm URI constants for the signature profile.
//!
//! Each constant is the URI string that appears in `Algorithm` attributes.
//! Only the exclusive C14N / SHA-1 / RSA-SHA1 profile is implemented; the
//! other identifiers are listed so that unsupported declarations can be
//! reported by name.

// ── Canonicalization ─────────────────────────────────────────────────

pub const C14N: &str = "http://www.w3.org/TR/2001/REC-xml-c14n-20010315";
pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
pub const EXC_C14N_WITH_COMMENTS: &str = "http://www.w3.org/2001/10/xml-exc-c14n#WithComments";

// ── Digest algorithms ────────────────────────────────────────────────

pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";

// ── Signature algorithms ─────────────────────────────────────────────

pub const RSA_SHA1: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";
pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";

/// Human readable name for a known algorithm URI.
pub fn name(uri: &str) -> Option<&'static str> {
    match uri {
        C14N => Some("C14N 1.0"),
        EXC_C14N => Some("Exclusive C14N 1.0"),
        EXC_C14N_WITH_COMMENTS => Some("Exclusive C14N 1.0 with comments"),
        SHA1 => Some("SHA-1"),
        SHA256 => Some("SHA-256"),
        RSA_SHA1 => Some("RSA PKCS#1 v1.5 with SHA-1"),
        RSA_SHA256 => Some("RSA PKCS#1 v1.5 with SHA-256"),
        _ => None,
    }
}
