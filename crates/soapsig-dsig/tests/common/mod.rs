#![forbid(unsafe_code)]
#![allow(dead_code)]

//! Envelope signing helpers for the verification tests.

use base64::Engine;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use signature::{SignatureEncoding, Signer};
use soapsig_core::{algorithm, ns};
use soapsig_keys::Certificate;
use std::path::PathBuf;

pub const SIGNER_KEY: &str = include_str!("../../../../test-data/keys/signer-key.pem");

pub fn init_logging() {
    env_logger::try_init().ok();
}

pub fn test_data(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-data")
        .join(path)
}

pub fn certificate(name: &str) -> Certificate {
    soapsig_keys::load_certificate_file(&test_data(&format!("keys/{name}"))).unwrap()
}

/// Unsigned envelope with one `ds:Reference` per id. Digests and the
/// signature are left as `__DIGEST_<id>__` / `__SIGNATURE__` placeholders.
pub fn template(ids: &[&str], body: &str) -> String {
    let references: String = ids
        .iter()
        .map(|id| {
            format!(
                r##"
          <ds:Reference URI="#{id}">
            <ds:Transforms>
              <ds:Transform Algorithm="{exc}"/>
            </ds:Transforms>
            <ds:DigestMethod Algorithm="{sha1}"/>
            <ds:DigestValue>__DIGEST_{id}__</ds:DigestValue>
          </ds:Reference>"##,
                exc = algorithm::EXC_C14N,
                sha1 = algorithm::SHA1,
            )
        })
        .collect();

    format!(
        r#"<soap:Envelope xmlns:soap="{soap}" xmlns:wsu="{wsu}">
  <soap:Header>
    <wsse:Security xmlns:wsse="{wsse}" soap:mustUnderstand="1">
      <wsse:BinarySecurityToken wsu:Id="X509-1" ValueType="X509v3">MIIB</wsse:BinarySecurityToken>
      <ds:Signature xmlns:ds="{dsig}">
        <ds:SignedInfo>
          <ds:CanonicalizationMethod Algorithm="{exc}">
            <ec:InclusiveNamespaces xmlns:ec="{exc}" PrefixList="soap"/>
          </ds:CanonicalizationMethod>
          <ds:SignatureMethod Algorithm="{rsa_sha1}"/>{references}
        </ds:SignedInfo>
        <ds:SignatureValue>__SIGNATURE__</ds:SignatureValue>
      </ds:Signature>
      <wsu:Timestamp wsu:Id="TS-1">
        <wsu:Created>2024-03-01T12:00:00Z</wsu:Created>
        <wsu:Expires>2024-03-01T12:05:00Z</wsu:Expires>
      </wsu:Timestamp>
    </wsse:Security>
  </soap:Header>
  <soap:Body wsu:Id="id-body">
    {body}
  </soap:Body>
</soap:Envelope>"#,
        soap = ns::SOAP,
        wsu = ns::WSU,
        wsse = ns::WSSE,
        dsig = ns::DSIG,
        exc = algorithm::EXC_C14N,
        rsa_sha1 = algorithm::RSA_SHA1,
    )
}

pub const BODY: &str = r#"<m:acknowledgeTransaction xmlns:m="http://service.gateway.example/">
      <tokenInput>e9d555262db0f989e49d724b4db0b0af</tokenInput>
    </m:acknowledgeTransaction>"#;

/// Fill in the placeholders of `unsigned`: digests of the elements named by
/// `ids`, then the signature over `SignedInfo` with the signer key.
pub fn sign(unsigned: &str, ids: &[&str]) -> String {
    let mut xml = unsigned.to_owned();
    {
        let doc = soapsig_xml::parse(unsigned).unwrap();
        let id_map = soapsig_dsig::locate::wsu_ids(&doc);
        for id in ids {
            let target = id_map.resolve(&doc, id).unwrap();
            let canonical = soapsig_c14n::canonicalize(target, &[]).unwrap();
            let digest = soapsig_crypto::digest::sha1_base64(&canonical);
            xml = xml.replace(&format!("__DIGEST_{id}__"), &digest);
        }
    }

    let doc = soapsig_xml::parse(&xml).unwrap();
    let signed_info = soapsig_dsig::locate::signed_info(&doc).unwrap();
    let canonical = soapsig_c14n::canonicalize(signed_info, &["soap"]).unwrap();
    let key = RsaPrivateKey::from_pkcs8_pem(SIGNER_KEY).unwrap();
    let signing_key = rsa::pkcs1v15::SigningKey::<sha1::Sha1>::new(key);
    let signature = signing_key.sign(&canonical).to_vec();
    let encoded = base64::engine::general_purpose::STANDARD.encode(signature);
    xml.replace("__SIGNATURE__", &encoded)
}

/// Signed two-reference envelope (timestamp and body).
pub fn signed_envelope() -> String {
    let ids = ["TS-1", "id-body"];
    sign(&template(&ids, BODY), &ids)
}

/// Replace the `SignatureValue` content of `xml`.
pub fn with_signature_value(xml: &str, f: impl FnOnce(&str) -> String) -> String {
    let open = "<ds:SignatureValue>";
    let start = xml.find(open).unwrap() + open.len();
    let end = xml.find("</ds:SignatureValue>").unwrap();
    format!("{}{}{}", &xml[..start], f(&xml[start..end]), &xml[end..])
}
