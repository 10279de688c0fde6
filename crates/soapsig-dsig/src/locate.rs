#![forbid(unsafe_code)]

//! Locating the signature parts inside a SOAP envelope.
//!
//! All lookups are by namespace URI, so the prefixes a sender chooses do
//! not matter.

use roxmltree::{Document, Node};
use soapsig_core::{ns, Error};
use soapsig_xml::document::{child_elements, is_element};
use soapsig_xml::xpath::{parse_same_document_ref, Locate, NsMap};
use soapsig_xml::IdMap;

/// Where the profile places `SignedInfo`.
pub const SIGNED_INFO_PATH: &str =
    "/soap:Envelope/soap:Header/wsse:Security/ds:Signature/ds:SignedInfo";

/// The single `SignedInfo` of the envelope's security header.
pub fn signed_info<'a, 'input>(document: &'a Document<'input>) -> Result<Node<'a, 'input>, Error> {
    let found = document.find_all(SIGNED_INFO_PATH, &NsMap::wss())?;
    match found.as_slice() {
        [node] => Ok(*node),
        [] => Err(Error::MalformedSecurityHeader(
            "SignedInfo not found in wsse:Security/ds:Signature".into(),
        )),
        many => Err(Error::MalformedSecurityHeader(format!(
            "expected one SignedInfo, found {}",
            many.len()
        ))),
    }
}

/// `ds:Reference` children of `SignedInfo`, in document order.
pub fn references<'a, 'input>(signed_info: Node<'a, 'input>) -> Result<Vec<Node<'a, 'input>>, Error> {
    let path = format!("{}:{}", ns::prefix::DSIG, ns::node::REFERENCE);
    signed_info.find_all(&path, &NsMap::wss())
}

/// Stated digest of one `Reference`, with surrounding whitespace removed.
pub fn digest_value(reference: Node<'_, '_>) -> Result<String, Error> {
    let node = single_child(reference, ns::node::DIGEST_VALUE)?;
    Ok(text_content(node).trim().to_owned())
}

/// `SignatureValue` of the `Signature` that holds `signed_info`.
pub fn signature_value(signed_info: Node<'_, '_>) -> Result<String, Error> {
    let signature = signed_info
        .parent_element()
        .filter(|p| is_element(*p, ns::DSIG, ns::node::SIGNATURE))
        .ok_or_else(|| {
            Error::MalformedSecurityHeader("SignedInfo is not inside ds:Signature".into())
        })?;
    let node = single_child(signature, ns::node::SIGNATURE_VALUE)?;
    Ok(text_content(node))
}

/// `URI` attribute of a `Reference`.
pub fn reference_uri<'a>(reference: Node<'a, '_>) -> Result<&'a str, Error> {
    reference
        .attribute(ns::attr::URI)
        .ok_or_else(|| Error::ReferenceNotFound("Reference without URI".into()))
}

/// Resolve a same-document reference URI (`#id`) to the element whose
/// `wsu:Id` equals `id`.
pub fn resolve_reference<'a, 'input>(
    document: &'a Document<'input>,
    ids: &IdMap,
    uri: &str,
) -> Result<Node<'a, 'input>, Error> {
    let id = parse_same_document_ref(uri).ok_or_else(|| {
        Error::ReferenceNotFound(format!("{uri:?} is not a same-document reference"))
    })?;
    ids.resolve(document, id)
}

/// Index of `wsu:Id` values in `document`.
pub fn wsu_ids(document: &Document<'_>) -> IdMap {
    let ids = IdMap::build(document, ns::WSU, ns::attr::ID);
    if ids.is_empty() {
        log::debug!("document carries no wsu:Id attributes");
    } else {
        log::trace!("indexed {} wsu:Id values", ids.len());
    }
    ids
}

/// `Algorithm` attribute of a method element (`ds:DigestMethod`, ...)
/// below `parent`.
pub fn method_algorithm<'a>(parent: Node<'a, '_>, method: &str) -> Result<&'a str, Error> {
    single_child(parent, method)?
        .attribute(ns::attr::ALGORITHM)
        .ok_or_else(|| Error::MalformedSecurityHeader(format!("{method} without Algorithm")))
}

fn single_child<'a, 'input>(parent: Node<'a, 'input>, local: &str) -> Result<Node<'a, 'input>, Error> {
    match child_elements(parent, ns::DSIG, local).as_slice() {
        [node] => Ok(*node),
        [] => Err(Error::MalformedSecurityHeader(format!(
            "{local} not found in {}",
            parent.tag_name().name()
        ))),
        many => Err(Error::MalformedSecurityHeader(format!(
            "expected one {local} in {}, found {}",
            parent.tag_name().name(),
            many.len()
        ))),
    }
}

fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
