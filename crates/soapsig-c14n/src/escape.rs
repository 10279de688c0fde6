#![forbid(unsafe_code)]

//! Character escaping for canonical output.
//!
//! - Text nodes: `&` → `&amp;`, `<` → `&lt;`, `>` → `&gt;`, `\r` → `&#xD;`
//! - Attribute values: `&`, `<`, `"`, `\t`, `\n`, `\r`
//! - PI data: `\r` → `&#xD;`

/// Append text node content to `out`, escaped.
pub fn write_text(out: &mut Vec<u8>, s: &str) {
    write_escaped(out, s, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\r' => Some("&#xD;"),
        _ => None,
    });
}

/// Append an attribute value to `out`, escaped.
pub fn write_attr(out: &mut Vec<u8>, s: &str) {
    write_escaped(out, s, |ch| match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '"' => Some("&quot;"),
        '\t' => Some("&#x9;"),
        '\n' => Some("&#xA;"),
        '\r' => Some("&#xD;"),
        _ => None,
    });
}

/// Append processing instruction data to `out`, escaped.
pub fn write_pi(out: &mut Vec<u8>, s: &str) {
    write_escaped(out, s, |ch| (ch == '\r').then_some("&#xD;"));
}

fn write_escaped(out: &mut Vec<u8>, s: &str, entity: impl Fn(char) -> Option<&'static str>) {
    let mut plain_from = 0;
    for (i, ch) in s.char_indices() {
        if let Some(rep) = entity(ch) {
            out.extend_from_slice(&s.as_bytes()[plain_from..i]);
            out.extend_from_slice(rep.as_bytes());
            plain_from = i + ch.len_utf8();
        }
    }
    out.extend_from_slice(&s.as_bytes()[plain_from..]);
}
