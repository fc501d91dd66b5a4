//! Parsing helpers: MIME type inference and `.eml` attachment extraction.

pub mod eml;
pub mod mime;
