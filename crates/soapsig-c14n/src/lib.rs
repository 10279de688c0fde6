#![forbid(unsafe_code)]

//! Exclusive XML Canonicalization 1.0 for soapsig.
//!
//! Only the commentless variant is provided: comment nodes never reach the
//! output. Canonicalization works on a subtree of an already parsed
//! `roxmltree` document, which is how XML-DSig references and `SignedInfo`
//! are digested.

pub mod blank;
pub mod escape;
pub mod exclusive;
pub mod render;

use roxmltree::Node;
use soapsig_core::{algorithm, Error};

/// Options for a canonicalization run.
#[derive(Debug, Clone)]
pub struct C14nOptions {
    /// InclusiveNamespaces PrefixList. `#default` names the default namespace.
    pub inclusive_prefixes: Vec<String>,
    /// Drop ignorable blank text (see [`blank`]).
    pub strip_blank_text: bool,
}

impl Default for C14nOptions {
    fn default() -> Self {
        Self {
            inclusive_prefixes: Vec::new(),
            strip_blank_text: true,
        }
    }
}

impl C14nOptions {
    pub fn with_inclusive_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inclusive_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strip_blank_text(mut self, strip: bool) -> Self {
        self.strip_blank_text = strip;
        self
    }
}

/// Canonicalize the subtree rooted at `node` with the given inclusive
/// namespace prefixes and blank-text removal.
pub fn canonicalize(node: Node<'_, '_>, inclusive_prefixes: &[&str]) -> Result<Vec<u8>, Error> {
    exclusive::canonicalize(node, inclusive_prefixes, true)
}

/// Canonicalize the subtree rooted at `node` with explicit options.
pub fn canonicalize_with(node: Node<'_, '_>, options: &C14nOptions) -> Result<Vec<u8>, Error> {
    let prefixes: Vec<&str> = options.inclusive_prefixes.iter().map(String::as_str).collect();
    let output = exclusive::canonicalize(node, &prefixes, options.strip_blank_text)?;
    log::trace!(
        "canonicalized <{}> (prefixes {:?}): {} bytes",
        node.tag_name().name(),
        prefixes,
        output.len()
    );
    Ok(output)
}

/// Is `uri` the canonicalization method implemented here?
pub fn is_supported(uri: &str) -> bool {
    uri == algorithm::EXC_C14N
}
