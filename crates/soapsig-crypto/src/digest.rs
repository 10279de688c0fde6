#![forbid(unsafe_code)]

//! Digest (hash) algorithm implementations.

use base64::Engine;
use digest::Digest;
use soapsig_core::{algorithm, Error};

/// Trait for digest algorithms.
pub trait DigestAlgorithm: Send {
    /// Feed data into the hash.
    fn update(&mut self, data: &[u8]);
    /// Finalize and return the hash value.
    fn finalize(self: Box<Self>) -> Vec<u8>;
    /// Algorithm URI.
    fn uri(&self) -> &'static str;
}

/// Create a digest algorithm from its URI.
pub fn from_uri(uri: &str) -> Result<Box<dyn DigestAlgorithm>, Error> {
    match uri {
        algorithm::SHA1 => Ok(Box::new(Sha1Digest::default())),
        _ => Err(Error::UnsupportedAlgorithm(format!(
            "digest algorithm: {uri}"
        ))),
    }
}

/// Hash `data` with `hasher`, base64 encoded the way `DigestValue` carries it.
pub fn digest_base64(mut hasher: Box<dyn DigestAlgorithm>, data: &[u8]) -> String {
    hasher.update(data);
    base64::engine::general_purpose::STANDARD.encode(hasher.finalize())
}

/// SHA-1 of `data` as a `DigestValue`.
pub fn sha1_base64(data: &[u8]) -> String {
    digest_base64(Box::<Sha1Digest>::default(), data)
}

#[derive(Default)]
struct Sha1Digest {
    inner: sha1::Sha1,
}

impl DigestAlgorithm for Sha1Digest {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        Digest::finalize(self.inner).to_vec()
    }

    fn uri(&self) -> &'static str {
        algorithm::SHA1
    }
}
