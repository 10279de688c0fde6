#![forbid(unsafe_code)]

//! Certificate loading from PEM and DER.

use crate::Certificate;
use soapsig_core::Error;
use std::path::Path;

/// Load an X.509 certificate from PEM.
///
/// A `PUBLIC KEY` block (SubjectPublicKeyInfo) is accepted as well.
pub fn load_x509_cert_pem(pem_data: &[u8]) -> Result<Certificate, Error> {
    let pem_str = std::str::from_utf8(pem_data)
        .map_err(|e| Error::Certificate(format!("invalid PEM encoding: {e}")))?;

    // PEM files often end with extra newlines.
    let (label, der_bytes) = pem_rfc7468::decode_vec(pem_str.trim().as_bytes())
        .map_err(|e| Error::Certificate(format!("failed to decode PEM: {e}")))?;

    match label {
        "CERTIFICATE" => load_x509_cert_der(&der_bytes),
        "PUBLIC KEY" => load_spki_der(&der_bytes),
        other => Err(Error::Certificate(format!(
            "expected CERTIFICATE or PUBLIC KEY PEM label, got: {other}"
        ))),
    }
}

/// Load an X.509 certificate from DER.
pub fn load_x509_cert_der(data: &[u8]) -> Result<Certificate, Error> {
    use der::{Decode, Encode};
    use spki::DecodePublicKey;

    let cert = x509_cert::Certificate::from_der(data)
        .map_err(|e| Error::Certificate(format!("failed to parse X.509 certificate: {e}")))?;

    let spki = &cert.tbs_certificate.subject_public_key_info;
    let spki_der = spki
        .to_der()
        .map_err(|e| Error::Certificate(format!("failed to encode SPKI: {e}")))?;

    let public_key = rsa::RsaPublicKey::from_public_key_der(&spki_der).map_err(|_| {
        Error::Certificate(format!(
            "certificate key is not RSA (algorithm {})",
            spki.algorithm.oid
        ))
    })?;

    let subject = cert.tbs_certificate.subject.to_string();
    log::debug!("loaded certificate for {subject}");
    Ok(Certificate::new(public_key, subject, data.to_vec()))
}

/// Load a bare RSA SubjectPublicKeyInfo from DER.
pub fn load_spki_der(data: &[u8]) -> Result<Certificate, Error> {
    use spki::DecodePublicKey;

    rsa::RsaPublicKey::from_public_key_der(data)
        .map(Certificate::from_public_key)
        .map_err(|e| Error::Certificate(format!("not an RSA public key: {e}")))
}

/// Load a certificate file, auto-detecting PEM or DER.
pub fn load_certificate_file(path: &Path) -> Result<Certificate, Error> {
    let data = std::fs::read(path)?;
    if data.starts_with(b"-----BEGIN") {
        return load_x509_cert_pem(&data);
    }
    load_x509_cert_der(&data).or_else(|_| load_spki_der(&data)).map_err(|_| {
        Error::Certificate(format!(
            "unable to read a certificate or RSA public key from {}",
            path.display()
        ))
    })
}
