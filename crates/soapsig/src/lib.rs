#![forbid(unsafe_code)]

//! Verification of WS-Security signed SOAP envelopes.
//!
//! ```no_run
//! let xml = std::fs::read_to_string("envelope.xml")?;
//! let doc = soapsig::xml::parse(&xml)?;
//! let cert = soapsig::keys::load_certificate_file("signer.pem".as_ref())?;
//! if soapsig::verify(&doc, &cert)? {
//!     println!("OK");
//! }
//! # Ok::<(), soapsig::Error>(())
//! ```

pub use soapsig_c14n as c14n;
pub use soapsig_core as core;
pub use soapsig_crypto as crypto;
pub use soapsig_dsig as dsig;
pub use soapsig_keys as keys;
pub use soapsig_xml as xml;

pub use soapsig_core::Error;
pub use soapsig_dsig::{verify, VerifyContext, VerifyResult};
pub use soapsig_keys::Certificate;
