#![forbid(unsafe_code)]

//! Core types shared by the soapsig crates: the error type, namespace
//! constants and algorithm identifiers.

pub mod algorithm;
pub mod error;
pub mod ns;

pub use error::Error;
