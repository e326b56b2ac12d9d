use super::{csv_rows, pdf_text, spreadsheet, xml_dte, ParseError};
use crate::models::SupplierDocument;
use crate::pricing::PricingPolicy;
use serde::{Deserialize, Serialize};

/// Parsing strategy for a supplier file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Government-style electronic invoice XML (DTE)
    XmlDte,
    Csv,
    Spreadsheet,
    /// Plain text already extracted from a PDF
    PdfText,
}

impl DocumentFormat {
    /// Select exactly one strategy from the file extension, falling back to
    /// the MIME type when the extension is missing or unknown. `None` means
    /// the file is ignored, not rejected.
    pub fn detect(file_name: &str, mime_type: Option<&str>) -> Option<Self> {
        if let Some(format) = extension(file_name).and_then(Self::from_extension) {
            return Some(format);
        }
        mime_type.and_then(Self::from_mime)
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "xml" => Some(DocumentFormat::XmlDte),
            "csv" => Some(DocumentFormat::Csv),
            "xls" | "xlsx" | "ods" => Some(DocumentFormat::Spreadsheet),
            "pdf" | "txt" => Some(DocumentFormat::PdfText),
            _ => None,
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "text/xml" | "application/xml" => Some(DocumentFormat::XmlDte),
            "text/csv" => Some(DocumentFormat::Csv),
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.oasis.opendocument.spreadsheet" => {
                Some(DocumentFormat::Spreadsheet)
            }
            "application/pdf" | "text/plain" => Some(DocumentFormat::PdfText),
            _ => None,
        }
    }
}

fn extension(file_name: &str) -> Option<&str> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
}

/// Run the matching extractor and assemble the ephemeral document.
///
/// An unrecognized format yields a document with no items and no error;
/// that policy comes from the source system and is preserved on purpose.
pub fn extract_document(
    file_name: &str,
    mime_type: Option<&str>,
    data: &[u8],
    policy: &PricingPolicy,
) -> Result<SupplierDocument, ParseError> {
    let format = DocumentFormat::detect(file_name, mime_type);
    let mut document = SupplierDocument {
        file_name: file_name.to_string(),
        format,
        proveedor: None,
        costo_total: None,
        items: Vec::new(),
    };

    let Some(format) = format else {
        return Ok(document);
    };

    let extraction = match format {
        DocumentFormat::XmlDte => xml_dte::parse(&text_of(data), policy)?,
        DocumentFormat::Csv => csv_rows::parse(&text_of(data), policy)?,
        DocumentFormat::Spreadsheet => spreadsheet::parse(data, policy)?,
        DocumentFormat::PdfText => {
            let extract = pdf_text::parse(&text_of(data), policy)?;
            document.proveedor = extract.proveedor;
            document.costo_total = extract.costo_total;
            extract.items
        }
    };

    document.items = extraction.into_items();
    Ok(document)
}

fn text_of(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_decides_the_strategy() {
        assert_eq!(
            DocumentFormat::detect("factura.xml", None),
            Some(DocumentFormat::XmlDte)
        );
        assert_eq!(
            DocumentFormat::detect("stock.csv", None),
            Some(DocumentFormat::Csv)
        );
        assert_eq!(
            DocumentFormat::detect("lista.xlsx", None),
            Some(DocumentFormat::Spreadsheet)
        );
        assert_eq!(
            DocumentFormat::detect("factura.pdf", None),
            Some(DocumentFormat::PdfText)
        );
    }

    #[test]
    fn mime_type_is_the_fallback() {
        assert_eq!(
            DocumentFormat::detect("descarga", Some("text/csv")),
            Some(DocumentFormat::Csv)
        );
        assert_eq!(
            DocumentFormat::detect("descarga.bin", Some("application/xml")),
            Some(DocumentFormat::XmlDte)
        );
    }

    #[test]
    fn unknown_formats_yield_an_empty_document_not_an_error() {
        let policy = PricingPolicy::default();
        let doc = extract_document("imagen.png", Some("image/png"), b"\x89PNG", &policy)
            .expect("unknown formats are ignored");
        assert!(doc.format.is_none());
        assert!(doc.items.is_empty());
    }
}
