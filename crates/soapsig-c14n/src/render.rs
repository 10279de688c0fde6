#![forbid(unsafe_code)]

//! Namespace declarations and attributes in canonical order.

use crate::escape;
use std::cmp::Ordering;

/// A namespace declaration to be rendered on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsDecl<'a> {
    /// `""` for the default namespace.
    pub prefix: &'a str,
    /// `""` for an `xmlns=""` undeclaration.
    pub uri: &'a str,
}

impl NsDecl<'_> {
    pub fn write(&self, out: &mut Vec<u8>) {
        if self.prefix.is_empty() {
            out.extend_from_slice(b" xmlns=\"");
        } else {
            out.extend_from_slice(b" xmlns:");
            out.extend_from_slice(self.prefix.as_bytes());
            out.extend_from_slice(b"=\"");
        }
        escape::write_attr(out, self.uri);
        out.push(b'"');
    }
}

// Default namespace first, then by prefix.
impl Ord for NsDecl<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        (!self.prefix.is_empty(), self.prefix).cmp(&(!other.prefix.is_empty(), other.prefix))
    }
}

impl PartialOrd for NsDecl<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// An attribute to be rendered on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr<'a> {
    /// `""` when the attribute is in no namespace.
    pub ns_uri: &'a str,
    pub local_name: &'a str,
    /// Name as written in the source (`prefix:local` or `local`).
    pub qualified_name: &'a str,
    pub value: &'a str,
}

impl Attr<'_> {
    pub fn write(&self, out: &mut Vec<u8>) {
        out.push(b' ');
        out.extend_from_slice(self.qualified_name.as_bytes());
        out.extend_from_slice(b"=\"");
        escape::write_attr(out, self.value);
        out.push(b'"');
    }
}

// Unqualified attributes first by local name, then (namespace URI, local name).
impl Ord for Attr<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        (!self.ns_uri.is_empty(), self.ns_uri, self.local_name).cmp(&(
            !other.ns_uri.is_empty(),
            other.ns_uri,
            other.local_name,
        ))
    }
}

impl PartialOrd for Attr<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr<'a>(ns_uri: &'a str, qualified_name: &'a str) -> Attr<'a> {
        let local_name = qualified_name.rsplit(':').next().unwrap();
        Attr { ns_uri, local_name, qualified_name, value: "" }
    }

    #[test]
    fn test_ns_order() {
        let mut decls = vec![
            NsDecl { prefix: "wsu", uri: "urn:u" },
            NsDecl { prefix: "", uri: "urn:d" },
            NsDecl { prefix: "ds", uri: "urn:ds" },
        ];
        decls.sort();
        let prefixes: Vec<&str> = decls.iter().map(|d| d.prefix).collect();
        assert_eq!(prefixes, ["", "ds", "wsu"]);
    }

    #[test]
    fn test_attr_order() {
        // namespace URI decides, not the prefix
        let mut attrs = vec![
            attr("urn:b", "a:z"),
            attr("", "z"),
            attr("urn:a", "b:y"),
            attr("", "b"),
        ];
        attrs.sort();
        let names: Vec<&str> = attrs.iter().map(|a| a.qualified_name).collect();
        assert_eq!(names, ["b", "z", "b:y", "a:z"]);
    }

    #[test]
    fn test_write() {
        let mut out = Vec::new();
        NsDecl { prefix: "", uri: "" }.write(&mut out);
        NsDecl { prefix: "p", uri: "urn:a&b" }.write(&mut out);
        Attr { ns_uri: "", local_name: "v", qualified_name: "v", value: "1\"2" }.write(&mut out);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#" xmlns="" xmlns:p="urn:a&amp;b" v="1&quot;2""#
        );
    }
}
