#![forbid(unsafe_code)]

//! Element helpers over a parsed `roxmltree::Document`.

use roxmltree::{Document, Node, NodeId};
use soapsig_core::Error;
use std::collections::HashMap;

/// Qualified name of an element (`prefix:local` or `local`) as written in
/// the source text.
///
/// roxmltree resolves prefixes away, but canonical output must reproduce
/// the prefix the document used.
pub fn qualified_name<'input>(node: Node<'_, 'input>) -> &'input str {
    let text = node.document().input_text();
    let start = node.range().start + 1;
    let tail = text.get(start..).unwrap_or("");
    let end = tail
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(tail.len());
    &tail[..end]
}

/// Qualified name of an attribute as written in the source text.
pub fn attribute_qualified_name<'input>(
    node: Node<'_, 'input>,
    attr: &roxmltree::Attribute<'_, 'input>,
) -> &'input str {
    node.document()
        .input_text()
        .get(attr.range_qname())
        .unwrap_or_else(|| attr.name())
}

/// Prefix part of a qualified name, `""` when unprefixed.
pub fn prefix_of(qname: &str) -> &str {
    qname.split_once(':').map_or("", |(p, _)| p)
}

/// Does `node` have the expanded name `{ns}local`?
pub fn is_element(node: Node<'_, '_>, ns: &str, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && node.tag_name().namespace().unwrap_or("") == ns
}

/// All child elements with the given expanded name, in document order.
pub fn child_elements<'a, 'input>(
    parent: Node<'a, 'input>,
    ns: &str,
    local: &str,
) -> Vec<Node<'a, 'input>> {
    parent
        .children()
        .filter(|n| is_element(*n, ns, local))
        .collect()
}

/// Index of element identifiers carried by one namespaced attribute
/// (e.g. `wsu:Id`).
///
/// Every carrier of an identifier is recorded so that duplicates can be
/// rejected instead of silently resolving to one of them.
#[derive(Debug, Default)]
pub struct IdMap {
    ids: HashMap<String, Vec<NodeId>>,
}

impl IdMap {
    /// Scan `doc` for elements carrying the attribute `{ns}local`.
    pub fn build(doc: &Document<'_>, ns: &str, local: &str) -> Self {
        let mut ids: HashMap<String, Vec<NodeId>> = HashMap::new();
        for node in doc.descendants().filter(|n| n.is_element()) {
            if let Some(val) = node.attribute((ns, local)) {
                ids.entry(val.to_owned()).or_default().push(node.id());
            }
        }
        Self { ids }
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolve `id` to the single element carrying it.
    pub fn resolve<'a, 'input>(
        &self,
        doc: &'a Document<'input>,
        id: &str,
    ) -> Result<Node<'a, 'input>, Error> {
        match self.ids.get(id).map(Vec::as_slice) {
            None | Some([]) => Err(Error::ReferenceNotFound(format!("no element with Id {id:?}"))),
            Some([node_id]) => doc
                .get_node(*node_id)
                .ok_or_else(|| Error::ReferenceNotFound(format!("no element with Id {id:?}"))),
            Some(many) => Err(Error::AmbiguousReference(format!(
                "Id {id:?} is carried by {} elements",
                many.len()
            ))),
        }
    }
}
