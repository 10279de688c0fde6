#![forbid(unsafe_code)]

//! The signer's certificate.

use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;

/// A signer certificate reduced to what verification needs.
#[derive(Debug, Clone)]
pub struct Certificate {
    public_key: RsaPublicKey,
    subject: Option<String>,
    der: Option<Vec<u8>>,
}

impl Certificate {
    pub(crate) fn new(public_key: RsaPublicKey, subject: String, der: Vec<u8>) -> Self {
        Self {
            public_key,
            subject: Some(subject),
            der: Some(der),
        }
    }

    /// Wrap a bare RSA public key.
    pub fn from_public_key(public_key: RsaPublicKey) -> Self {
        Self {
            public_key,
            subject: None,
            der: None,
        }
    }

    /// Parse a PEM encoded X.509 certificate.
    pub fn from_pem(pem: &[u8]) -> Result<Self, soapsig_core::Error> {
        crate::loader::load_x509_cert_pem(pem)
    }

    /// Parse a DER encoded X.509 certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, soapsig_core::Error> {
        crate::loader::load_x509_cert_der(der)
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Subject distinguished name (RFC 4514), when loaded from a certificate.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// DER encoding of the certificate, when loaded from one.
    pub fn der(&self) -> Option<&[u8]> {
        self.der.as_deref()
    }

    /// Modulus size in bits.
    pub fn key_bits(&self) -> usize {
        self.public_key.size() * 8
    }
}

impl From<RsaPublicKey> for Certificate {
    fn from(public_key: RsaPublicKey) -> Self {
        Self::from_public_key(public_key)
    }
}
