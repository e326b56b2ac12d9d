pub mod csv_rows;
pub mod pdf_text;
pub mod sniffer;
pub mod spreadsheet;
pub mod xml_dte;

pub use sniffer::{extract_document, DocumentFormat};

use thiserror::Error;

/// Failure that aborts extraction of a single file.
///
/// Contained per file: the intake loop logs it, reports it for that document
/// and keeps going with the rest of the batch. Deliberately distinct from
/// `Extraction::Empty`, which is the "nothing to extract" policy outcome.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(String),
    #[error("malformed CSV: {0}")]
    Csv(String),
    #[error("unreadable spreadsheet: {0}")]
    Spreadsheet(String),
    #[error("invalid pattern: {0}")]
    Pattern(String),
    #[error("undecodable payload: {0}")]
    Payload(String),
}
