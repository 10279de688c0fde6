#![forbid(unsafe_code)]

//! Exclusive Canonical XML 1.0 (exc-C14N), without comments.
//!
//! Algorithm URI: `http://www.w3.org/2001/10/xml-exc-c14n#`
//!
//! Only "visibly utilized" namespace declarations are output. A namespace
//! is visibly utilized on an element if:
//! 1. its prefix is used by the element's tag name, or
//! 2. its prefix is used by one of the element's attributes, or
//! 3. the prefix appears in the InclusiveNamespaces PrefixList.
//!
//! A declaration is rendered only if the nearest output ancestor did not
//! already render the same binding.

use crate::render::{Attr, NsDecl};
use crate::{blank, escape};
use roxmltree::{Node, NodeType};
use soapsig_core::Error;
use soapsig_xml::document::{attribute_qualified_name, prefix_of, qualified_name};
use std::collections::{BTreeMap, BTreeSet};

/// Canonicalize the subtree rooted at `node`.
pub(crate) fn canonicalize(
    node: Node<'_, '_>,
    inclusive_prefixes: &[&str],
    strip_blank_text: bool,
) -> Result<Vec<u8>, Error> {
    let ctx = ExcC14nContext {
        inclusive_prefixes: inclusive_prefixes
            .iter()
            .map(|p| if *p == "#default" { "" } else { *p })
            .collect(),
        strip_blank_text,
    };
    let mut output = Vec::new();
    ctx.process_node(node, &mut output, &BTreeMap::new())?;
    Ok(output)
}

struct ExcC14nContext<'p> {
    /// `""` stands for the default namespace.
    inclusive_prefixes: BTreeSet<&'p str>,
    strip_blank_text: bool,
}

impl ExcC14nContext<'_> {
    fn process_node(
        &self,
        node: Node<'_, '_>,
        output: &mut Vec<u8>,
        rendered_ns: &BTreeMap<String, String>,
    ) -> Result<(), Error> {
        match node.node_type() {
            NodeType::Root => {
                for child in node.children() {
                    self.process_node(child, output, rendered_ns)?;
                }
            }
            NodeType::Element => self.process_element(node, output, rendered_ns)?,
            NodeType::Text => {
                let outside_root = node.parent().is_some_and(|p| p.node_type() == NodeType::Root);
                let skip = outside_root || (self.strip_blank_text && blank::is_ignorable(node));
                if !skip {
                    escape::write_text(output, node.text().unwrap_or(""));
                }
            }
            NodeType::Comment => {}
            NodeType::PI => {
                let Some(pi) = node.pi() else {
                    return Ok(());
                };
                let outside_root = node.parent().is_some_and(|p| p.node_type() == NodeType::Root);
                if outside_root && has_preceding_element(node) {
                    output.push(b'\n');
                }
                output.extend_from_slice(b"<?");
                output.extend_from_slice(pi.target.as_bytes());
                if let Some(value) = pi.value.filter(|v| !v.is_empty()) {
                    output.push(b' ');
                    escape::write_pi(output, value);
                }
                output.extend_from_slice(b"?>");
                if outside_root && has_following_element(node) {
                    output.push(b'\n');
                }
            }
        }
        Ok(())
    }

    fn process_element(
        &self,
        node: Node<'_, '_>,
        output: &mut Vec<u8>,
        rendered_ns: &BTreeMap<String, String>,
    ) -> Result<(), Error> {
        let elem_name = qualified_name(node);
        let elem_prefix = prefix_of(elem_name);

        let inscope_ns: BTreeMap<&str, &str> = node
            .namespaces()
            .filter(|ns| !ns.uri().is_empty())
            .map(|ns| (ns.name().unwrap_or(""), ns.uri()))
            .collect();

        let mut utilized_prefixes: BTreeSet<&str> = BTreeSet::new();
        utilized_prefixes.insert(elem_prefix);

        let mut attrs: Vec<Attr<'_>> = Vec::new();
        for attr in node.attributes() {
            let qualified = attribute_qualified_name(node, &attr);
            let prefix = prefix_of(qualified);
            if !prefix.is_empty() {
                utilized_prefixes.insert(prefix);
            }
            attrs.push(Attr {
                ns_uri: attr.namespace().unwrap_or(""),
                local_name: attr.name(),
                qualified_name: qualified,
                value: attr.value(),
            });
        }
        attrs.sort();

        utilized_prefixes.extend(self.inclusive_prefixes.iter().copied());

        let mut ns_decls: Vec<NsDecl<'_>> = Vec::new();
        for &prefix in &utilized_prefixes {
            if prefix == "xml" {
                continue;
            }
            let previously_rendered = rendered_ns.get(prefix).map(String::as_str);
            match inscope_ns.get(prefix) {
                Some(&uri) => {
                    if previously_rendered != Some(uri) {
                        ns_decls.push(NsDecl { prefix, uri });
                    }
                }
                // Element in no namespace below a rendered default namespace.
                None if prefix.is_empty() => {
                    if previously_rendered.is_some_and(|u| !u.is_empty()) {
                        ns_decls.push(NsDecl { prefix: "", uri: "" });
                    }
                }
                None if prefix == elem_prefix => {
                    return Err(Error::Canonicalization(format!(
                        "prefix {prefix:?} of <{elem_name}> is not bound"
                    )));
                }
                // Inclusive prefix with no binding in scope.
                None => {}
            }
        }
        ns_decls.sort();

        output.push(b'<');
        output.extend_from_slice(elem_name.as_bytes());
        for ns_decl in &ns_decls {
            ns_decl.write(output);
        }
        for attr in &attrs {
            attr.write(output);
        }
        output.push(b'>');

        let child_rendered_ns = if ns_decls.is_empty() {
            None
        } else {
            let mut map = rendered_ns.clone();
            for ns_decl in &ns_decls {
                map.insert(ns_decl.prefix.to_owned(), ns_decl.uri.to_owned());
            }
            Some(map)
        };
        let child_rendered_ns = child_rendered_ns.as_ref().unwrap_or(rendered_ns);

        for child in node.children() {
            self.process_node(child, output, child_rendered_ns)?;
        }

        output.extend_from_slice(b"</");
        output.extend_from_slice(elem_name.as_bytes());
        output.push(b'>');
        Ok(())
    }
}

fn has_preceding_element(node: Node<'_, '_>) -> bool {
    node.prev_siblings().skip(1).any(|n| n.is_element())
}

fn has_following_element(node: Node<'_, '_>) -> bool {
    node.next_siblings().skip(1).any(|n| n.is_element())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    fn c14n_of(xml: &str, id: &str, prefixes: &[&str]) -> String {
        let doc = Document::parse(xml).unwrap();
        let node = doc
            .descendants()
            .find(|n| n.attribute("id") == Some(id))
            .unwrap_or_else(|| doc.root_element());
        String::from_utf8(canonicalize(node, prefixes, true).unwrap()).unwrap()
    }

    #[test]
    fn test_only_utilized_namespaces() {
        let xml = r#"<soap:Envelope xmlns:soap="urn:soap" xmlns:wsu="urn:wsu" xmlns:unused="urn:x"><soap:Body id="b" wsu:Id="body"><p:Pay xmlns:p="urn:pay" amount="10">x</p:Pay></soap:Body></soap:Envelope>"#;
        assert_eq!(
            c14n_of(xml, "b", &[]),
            r#"<soap:Body xmlns:soap="urn:soap" xmlns:wsu="urn:wsu" id="b" wsu:Id="body"><p:Pay xmlns:p="urn:pay" amount="10">x</p:Pay></soap:Body>"#
        );
    }

    #[test]
    fn test_inclusive_prefix_carried_from_ancestor() {
        let xml = r##"<soap:Envelope xmlns:soap="urn:soap"><soap:Header><Signature xmlns="urn:ds"><SignedInfo id="si"><Reference URI="#a"/></SignedInfo></Signature></soap:Header></soap:Envelope>"##;
        assert_eq!(
            c14n_of(xml, "si", &["soap"]),
            r##"<SignedInfo xmlns="urn:ds" xmlns:soap="urn:soap" id="si"><Reference URI="#a"></Reference></SignedInfo>"##
        );
        assert_eq!(
            c14n_of(xml, "si", &[]),
            r##"<SignedInfo xmlns="urn:ds" id="si"><Reference URI="#a"></Reference></SignedInfo>"##
        );
    }

    #[test]
    fn test_inclusive_prefix_not_in_scope() {
        let xml = r#"<a xmlns:p="urn:p"><p:b id="x"/></a>"#;
        assert_eq!(
            c14n_of(xml, "x", &["soap"]),
            r#"<p:b xmlns:p="urn:p" id="x"></p:b>"#
        );
    }

    #[test]
    fn test_default_keyword() {
        let xml = r#"<r xmlns="urn:d" xmlns:p="urn:p"><p:e id="e"/></r>"#;
        assert_eq!(
            c14n_of(xml, "e", &["#default"]),
            r#"<p:e xmlns="urn:d" xmlns:p="urn:p" id="e"></p:e>"#
        );
        assert_eq!(c14n_of(xml, "e", &[]), r#"<p:e xmlns:p="urn:p" id="e"></p:e>"#);
    }

    #[test]
    fn test_attribute_order_and_empty_elements() {
        let xml = r#"<e b='2' a="1" xmlns:z="urn:z" z:c='3' xmlns:y="urn:y" y:d="4"/>"#;
        assert_eq!(
            c14n_of(xml, "", &[]),
            r#"<e xmlns:y="urn:y" xmlns:z="urn:z" a="1" b="2" y:d="4" z:c="3"></e>"#
        );
    }

    #[test]
    fn test_comments_never_rendered() {
        let xml = "<!-- head --><a><!-- c --><b>t<!--x-->u</b></a><!-- tail -->";
        assert_eq!(c14n_of(xml, "", &[]), "<a><b>tu</b></a>");
    }

    #[test]
    fn test_default_namespace_undeclared() {
        let xml = r#"<a xmlns="urn:a"><b id="b" xmlns=""><c/></b></a>"#;
        assert_eq!(
            c14n_of(xml, "", &[]),
            r#"<a xmlns="urn:a"><b xmlns="" id="b"><c></c></b></a>"#
        );
        assert_eq!(c14n_of(xml, "b", &[]), r#"<b id="b"><c></c></b>"#);
    }

    #[test]
    fn test_redundant_redeclaration_dropped() {
        let xml = r#"<r:a xmlns:r="urn:r"><r:b xmlns:r="urn:r"/><r:c xmlns:r="urn:other"/></r:a>"#;
        assert_eq!(
            c14n_of(xml, "", &[]),
            r#"<r:a xmlns:r="urn:r"><r:b></r:b><r:c xmlns:r="urn:other"></r:c></r:a>"#
        );
    }

    #[test]
    fn test_escaping() {
        let xml = "<a t=\"x&amp;&lt;&quot;&#9;\">1 &lt; 2 &amp;&amp; 3 &gt; 2&#13;</a>";
        assert_eq!(
            c14n_of(xml, "", &[]),
            "<a t=\"x&amp;&lt;&quot;&#x9;\">1 &lt; 2 &amp;&amp; 3 &gt; 2&#xD;</a>"
        );
    }

    #[test]
    fn test_xml_attributes_not_inherited() {
        let xml = r#"<a xml:lang="es"><b id="b"/></a>"#;
        assert_eq!(c14n_of(xml, "b", &[]), r#"<b id="b"></b>"#);
        assert_eq!(
            c14n_of(xml, "", &[]),
            r#"<a xml:lang="es"><b id="b"></b></a>"#
        );
    }

    #[test]
    fn test_processing_instruction() {
        let xml = "<?top level?><a><?pi data?><?empty?></a>";
        assert_eq!(c14n_of(xml, "", &[]), "<a><?pi data?><?empty?></a>");

        let doc = Document::parse(xml).unwrap();
        let out = canonicalize(doc.root(), &[], true).unwrap();
        assert_eq!(out, b"<?top level?>\n<a><?pi data?><?empty?></a>");
    }

    #[test]
    fn test_blank_text_policy() {
        let xml = "<a>\n  <b> </b>\n  <c>v</c>\n</a>";
        let doc = Document::parse(xml).unwrap();
        let node = doc.root_element();
        assert_eq!(
            canonicalize(node, &[], true).unwrap(),
            b"<a><b> </b><c>v</c></a>"
        );
        assert_eq!(
            canonicalize(node, &[], false).unwrap(),
            b"<a>\n  <b> </b>\n  <c>v</c>\n</a>"
        );
    }
}
