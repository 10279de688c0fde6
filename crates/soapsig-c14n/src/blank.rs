#![forbid(unsafe_code)]

//! Blank text removal.
//!
//! Signers in this profile serialize the envelope after parsing it with
//! blank-text removal, so indentation between elements is not part of the
//! signed bytes. A whitespace-only text node is dropped when all of the
//! following hold:
//!
//! - it has at least one sibling (a lone blank child is content),
//! - the preceding sibling is not text,
//! - the parent's first child is not non-blank text (mixed content),
//! - no `xml:space="preserve"` is in scope.

use roxmltree::Node;
use soapsig_core::ns;

fn is_blank(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}

/// Is `node` a blank text node that should not appear in canonical output?
pub fn is_ignorable(node: Node<'_, '_>) -> bool {
    if !node.is_text() {
        return false;
    }
    let Some(text) = node.text() else {
        return false;
    };
    if !is_blank(text) {
        return false;
    }
    let Some(parent) = node.parent_element() else {
        return false;
    };
    let prev = node.prev_sibling();
    if prev.is_none() && node.next_sibling().is_none() {
        return false;
    }
    if prev.is_some_and(|p| p.is_text()) {
        return false;
    }
    if parent
        .first_child()
        .is_some_and(|c| c.is_text() && c.text().is_some_and(|t| !is_blank(t)))
    {
        return false;
    }
    !space_preserved(parent)
}

/// Nearest `xml:space` on the ancestor-or-self axis decides.
fn space_preserved(element: Node<'_, '_>) -> bool {
    element
        .ancestors()
        .filter(|n| n.is_element())
        .find_map(|n| n.attribute((ns::XML, ns::attr::SPACE)))
        .is_some_and(|v| v == "preserve")
}
