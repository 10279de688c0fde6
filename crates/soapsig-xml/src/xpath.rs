#![forbid(unsafe_code)]

//! Structural path lookup for locating security header elements.
//!
//! Supports the small location-path subset needed to find WS-Security and
//! XML-DSig elements by namespace URI rather than by prefix:
//!
//! - absolute (`/a/b`), descendant (`//a`) and relative (`a/b`, `./a`, `.//a`) paths
//! - `/` child and `//` descendant steps
//! - name tests `prefix:local`, `local` (no namespace) and `*`
//! - one attribute equality predicate per step: `[@prefix:attr='value']`
//!
//! Prefixes are resolved through an [`NsMap`] supplied by the caller, never
//! through the document's own declarations.

use roxmltree::{Document, Node};
use soapsig_core::{ns, Error};

/// Prefix bindings used to resolve names in a path expression.
#[derive(Debug, Clone, Default)]
pub struct NsMap {
    bindings: Vec<(String, String)>,
}

impl NsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for `ds`, `wsse`, `wsu` and `soap`.
    pub fn wss() -> Self {
        ns::BINDINGS
            .iter()
            .fold(Self::new(), |map, (prefix, uri)| map.bind(prefix, uri))
    }

    /// Bind `prefix` to `uri`, replacing any earlier binding.
    pub fn bind(mut self, prefix: &str, uri: &str) -> Self {
        self.bindings.retain(|(p, _)| p != prefix);
        self.bindings.push((prefix.to_owned(), uri.to_owned()));
        self
    }

    pub fn uri(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, u)| u.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Name { ns: String, local: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrEquals {
    ns: String,
    local: String,
    value: String,
}

#[derive(Debug, Clone)]
struct Step {
    axis: Axis,
    test: NameTest,
    predicate: Option<AttrEquals>,
}

/// A compiled path expression.
#[derive(Debug, Clone)]
pub struct Path {
    absolute: bool,
    steps: Vec<Step>,
}

impl Path {
    /// Compile `expr`, resolving prefixes through `namespaces`.
    pub fn compile(expr: &str, namespaces: &NsMap) -> Result<Self, Error> {
        let trimmed = expr.trim();
        let (absolute, mut axis, mut rest) = if let Some(r) = trimmed.strip_prefix("//") {
            (true, Axis::Descendant, r)
        } else if let Some(r) = trimmed.strip_prefix('/') {
            (true, Axis::Child, r)
        } else if let Some(r) = trimmed.strip_prefix(".//") {
            (false, Axis::Descendant, r)
        } else if let Some(r) = trimmed.strip_prefix("./") {
            (false, Axis::Child, r)
        } else {
            (false, Axis::Child, trimmed)
        };

        let mut steps = Vec::new();
        loop {
            let (step, remainder) = split_step(rest, expr)?;
            steps.push(parse_step(step, axis, namespaces, expr)?);
            match remainder {
                None => break,
                Some(r) => {
                    if let Some(r) = r.strip_prefix("//") {
                        axis = Axis::Descendant;
                        rest = r;
                    } else {
                        axis = Axis::Child;
                        rest = &r[1..];
                    }
                }
            }
        }
        Ok(Self { absolute, steps })
    }

    /// Evaluate against a context node; results are in document order
    /// without duplicates.
    pub fn select<'a, 'input>(&self, context: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        let start = if self.absolute {
            context.document().root()
        } else {
            context
        };
        let mut current = vec![start];
        for step in &self.steps {
            let mut next: Vec<Node<'a, 'input>> = Vec::new();
            for node in &current {
                match step.axis {
                    Axis::Child => next.extend(node.children().filter(|n| step.matches(*n))),
                    Axis::Descendant => next.extend(
                        node.descendants()
                            .skip(1)
                            .filter(|n| step.matches(*n)),
                    ),
                }
            }
            next.sort_by_key(|n| n.id().get());
            next.dedup_by_key(|n| n.id().get());
            current = next;
            if current.is_empty() {
                break;
            }
        }
        current
    }
}

impl Step {
    fn matches(&self, node: Node<'_, '_>) -> bool {
        if !node.is_element() {
            return false;
        }
        let name_ok = match &self.test {
            NameTest::Any => true,
            NameTest::Name { ns, local } => {
                node.tag_name().name() == local
                    && node.tag_name().namespace().unwrap_or("") == ns
            }
        };
        name_ok
            && self.predicate.as_ref().map_or(true, |p| {
                let found = if p.ns.is_empty() {
                    node.attribute(p.local.as_str())
                } else {
                    node.attribute((p.ns.as_str(), p.local.as_str()))
                };
                found == Some(p.value.as_str())
            })
    }
}

/// Split off the first step, honouring brackets and quotes so that a `/`
/// inside a predicate value does not end the step.
fn split_step<'e>(s: &'e str, expr: &str) -> Result<(&'e str, Option<&'e str>), Error> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, ch) in s.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '/') if depth == 0 => {
                if i == 0 {
                    return Err(Error::XPath(format!("empty step in {expr:?}")));
                }
                return Ok((&s[..i], Some(&s[i..])));
            }
            _ => {}
        }
    }
    if quote.is_some() || depth != 0 {
        return Err(Error::XPath(format!("unterminated predicate in {expr:?}")));
    }
    if s.is_empty() {
        return Err(Error::XPath(format!("empty step in {expr:?}")));
    }
    Ok((s, None))
}

fn parse_step(step: &str, axis: Axis, namespaces: &NsMap, expr: &str) -> Result<Step, Error> {
    let (name, predicate) = match step.find('[') {
        Some(i) => {
            let pred = step[i..]
                .strip_prefix('[')
                .and_then(|p| p.strip_suffix(']'))
                .ok_or_else(|| Error::XPath(format!("bad predicate {step:?} in {expr:?}")))?;
            (&step[..i], Some(parse_predicate(pred, namespaces, expr)?))
        }
        None => (step, None),
    };

    let test = if name == "*" {
        NameTest::Any
    } else {
        let (ns, local) = resolve_qname(name, namespaces, expr)?;
        NameTest::Name { ns, local }
    };
    Ok(Step {
        axis,
        test,
        predicate,
    })
}

fn parse_predicate(pred: &str, namespaces: &NsMap, expr: &str) -> Result<AttrEquals, Error> {
    let bad = || Error::XPath(format!("unsupported predicate [{pred}] in {expr:?}"));
    let (lhs, rhs) = pred.split_once('=').ok_or_else(bad)?;
    let attr = lhs.trim().strip_prefix('@').ok_or_else(bad)?;
    let rhs = rhs.trim();
    let value = rhs
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| rhs.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
        .ok_or_else(bad)?;
    let (ns, local) = resolve_qname(attr, namespaces, expr)?;
    Ok(AttrEquals {
        ns,
        local,
        value: value.to_owned(),
    })
}

fn resolve_qname(qname: &str, namespaces: &NsMap, expr: &str) -> Result<(String, String), Error> {
    let valid = |s: &str| {
        !s.is_empty()
            && !s
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, ':' | '[' | ']' | '@' | '/' | '=' | '*'))
    };
    match qname.split_once(':') {
        Some((prefix, local)) => {
            if !valid(prefix) || !valid(local) {
                return Err(Error::XPath(format!("bad name {qname:?} in {expr:?}")));
            }
            let uri = namespaces
                .uri(prefix)
                .ok_or_else(|| Error::XPath(format!("unbound prefix {prefix:?} in {expr:?}")))?;
            Ok((uri.to_owned(), local.to_owned()))
        }
        None if valid(qname) => Ok((String::new(), qname.to_owned())),
        None => Err(Error::XPath(format!("bad name {qname:?} in {expr:?}"))),
    }
}

/// Same-document reference (`#foo` → `foo`).
pub fn parse_same_document_ref(uri: &str) -> Option<&str> {
    uri.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Structural lookup over a parsed tree.
pub trait Locate<'a, 'input: 'a>: Sized {
    /// All elements matching `path`, in document order.
    fn find_all(self, path: &str, namespaces: &NsMap) -> Result<Vec<Node<'a, 'input>>, Error>;

    /// First element matching `path`.
    fn find_first(self, path: &str, namespaces: &NsMap) -> Result<Option<Node<'a, 'input>>, Error> {
        Ok(self.find_all(path, namespaces)?.into_iter().next())
    }
}

impl<'a, 'input: 'a> Locate<'a, 'input> for Node<'a, 'input> {
    fn find_all(self, path: &str, namespaces: &NsMap) -> Result<Vec<Node<'a, 'input>>, Error> {
        let compiled = Path::compile(path, namespaces)?;
        let found = compiled.select(self);
        log::trace!("{path}: {} match(es)", found.len());
        Ok(found)
    }
}

impl<'a, 'input: 'a> Locate<'a, 'input> for &'a Document<'input> {
    fn find_all(self, path: &str, namespaces: &NsMap) -> Result<Vec<Node<'a, 'input>>, Error> {
        self.root().find_all(path, namespaces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVELOPE: &str = r##"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"
            xmlns:wsu="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd">
        <soap:Header>
            <x:Security xmlns:x="http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd">
                <Signature xmlns="http://www.w3.org/2000/09/xmldsig#">
                    <SignedInfo><Reference URI="#a/b"/></SignedInfo>
                </Signature>
            </x:Security>
        </soap:Header>
        <soap:Body wsu:Id="body"><item wsu:Id="a/b"/></soap:Body>
    </soap:Envelope>"##;

    #[test]
    fn test_absolute_path_by_uri_not_prefix() {
        let doc = Document::parse(ENVELOPE).unwrap();
        let found = doc
            .find_all(
                "/soap:Envelope/soap:Header/wsse:Security/ds:Signature/ds:SignedInfo",
                &NsMap::wss(),
            )
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].tag_name().name(), "SignedInfo");
    }

    #[test]
    fn test_descendant_with_predicate() {
        let doc = Document::parse(ENVELOPE).unwrap();
        let ns = NsMap::wss();
        let body = doc.find_first("//*[@wsu:Id='body']", &ns).unwrap().unwrap();
        assert_eq!(body.tag_name().name(), "Body");

        // slash inside the quoted value
        let item = doc.find_first(r#"//*[@wsu:Id="a/b"]"#, &ns).unwrap().unwrap();
        assert_eq!(item.tag_name().name(), "item");

        assert!(doc.find_first("//*[@wsu:Id='nope']", &ns).unwrap().is_none());
    }

    #[test]
    fn test_relative_from_node() {
        let doc = Document::parse(ENVELOPE).unwrap();
        let ns = NsMap::wss();
        let sig = doc.find_first("//ds:Signature", &ns).unwrap().unwrap();
        assert_eq!(sig.find_all("ds:SignedInfo/ds:Reference", &ns).unwrap().len(), 1);
        assert_eq!(sig.find_all(".//ds:Reference", &ns).unwrap().len(), 1);
        assert_eq!(sig.find_all("./ds:Reference", &ns).unwrap().len(), 0);
        // absolute path ignores the context node
        assert_eq!(sig.find_all("/soap:Envelope", &ns).unwrap().len(), 1);
    }

    #[test]
    fn test_unprefixed_name_means_no_namespace() {
        let doc = Document::parse(ENVELOPE).unwrap();
        let ns = NsMap::wss();
        assert_eq!(doc.find_all("//item", &ns).unwrap().len(), 1);
        assert_eq!(doc.find_all("//Signature", &ns).unwrap().len(), 0);
    }

    #[test]
    fn test_results_deduplicated_in_document_order() {
        let doc = Document::parse("<a><a><b n='1'/></a><b n='2'/></a>").unwrap();
        let found = doc.find_all("//a//b", &NsMap::new()).unwrap();
        let ns: Vec<&str> = found.iter().filter_map(|n| n.attribute("n")).collect();
        assert_eq!(ns, ["1", "2"]);
    }

    #[test]
    fn test_compile_errors() {
        let ns = NsMap::wss();
        for bad in ["", "/", "a//", "x:y", "a[@b]", "a[@b='c'", "a[b='c']", "a b"] {
            assert!(
                matches!(Path::compile(bad, &ns), Err(Error::XPath(_))),
                "{bad:?} should not compile"
            );
        }
    }

    #[test]
    fn test_ns_map_rebind() {
        let ns = NsMap::new().bind("p", "urn:one").bind("p", "urn:two");
        assert_eq!(ns.uri("p"), Some("urn:two"));
        assert_eq!(NsMap::wss().uri("ds"), Some(soapsig_core::ns::DSIG));
    }

    #[test]
    fn test_same_document_ref() {
        assert_eq!(parse_same_document_ref("#body"), Some("body"));
        assert_eq!(parse_same_document_ref("#"), None);
        assert_eq!(parse_same_document_ref("http://x/#y"), None);
        assert_eq!(parse_same_document_ref(""), None);
    }
}
