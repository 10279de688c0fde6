#![forbid(unsafe_code)]

//! XML helpers for soapsig over `roxmltree`.
//!
//! Provides the parsing options used for SOAP input, a small structural
//! path language for locating security header elements, and `wsu:Id`
//! resolution.

pub mod document;
pub mod xpath;

pub use document::IdMap;
pub use xpath::{Locate, NsMap, Path};

use soapsig_core::Error;

/// Return roxmltree parsing options for SOAP messages.
///
/// SOAP 1.1 forbids a document type declaration, so DTDs are rejected.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: false,
        ..roxmltree::ParsingOptions::default()
    }
}

/// Parse a SOAP message.
pub fn parse(text: &str) -> Result<roxmltree::Document<'_>, Error> {
    roxmltree::Document::parse_with_options(text, parsing_options())
        .map_err(|e| Error::XmlParse(e.to_string()))
}
