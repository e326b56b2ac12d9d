use super::ParseError;
use crate::models::{Extraction, ParsedLineItem};
use crate::pricing::PricingPolicy;
use regex::Regex;

/// Literal delimiters of the line-items block. Supplier and grand total are
/// resolved independently of them, so a document missing either marker still
/// yields those two fields.
const BLOCK_START: &str = "DETALLE";
const BLOCK_END: &str = "TOTAL";

/// Capitalized phrase ending in a legal-entity suffix (Ltda, SpA, S.A,
/// E.I.R.L). First match wins.
const SUPPLIER_PATTERN: &str =
    r"([A-ZÁÉÍÓÚÑ][A-Za-zÁÉÍÓÚÑáéíóúñ&'. ]*?(?:Ltda\.?|SpA|S\.A\.?|E\.I\.R\.L\.?))";

/// One product line inside the collapsed block: serial token, quantity,
/// description up to the two-space separator, dot-grouped total.
const ITEM_PATTERN: &str = r"(\S+)  (\d+)  (.+?)  (\d{1,3}(?:\.\d{3})*)(?:\s|$)";

/// Document grand total, anywhere in the text
const TOTAL_PATTERN: &str = r"TOTAL \$\s*(\d{1,3}(?:\.\d{3})*)";

/// Everything recoverable from the pre-extracted text of a supplier PDF
#[derive(Debug, Clone)]
pub struct PdfExtraction {
    pub proveedor: Option<String>,
    pub costo_total: Option<i64>,
    pub items: Extraction,
}

/// Extract supplier, line items and grand total from PDF text.
///
/// Operates on plain text already pulled out of the PDF, not on PDF bytes.
/// A missing or malformed items block produces `Extraction::Empty`, never an
/// error; an ungroupable number produces `None` for that field only.
pub fn parse(text: &str, policy: &PricingPolicy) -> Result<PdfExtraction, ParseError> {
    let supplier_re = compile(SUPPLIER_PATTERN)?;
    let item_re = compile(ITEM_PATTERN)?;
    let total_re = compile(TOTAL_PATTERN)?;
    let whitespace_re = compile(r"\s{2,}")?;

    let proveedor = supplier_re
        .captures(text)
        .map(|caps| caps[1].trim().to_string());

    let costo_total = total_re
        .captures(text)
        .and_then(|caps| parse_grouped(&caps[1]));

    let items = match items_block(text) {
        Some(block) => extract_items(block, &item_re, &whitespace_re, policy),
        None => Extraction::Empty,
    };

    Ok(PdfExtraction {
        proveedor,
        costo_total,
        items,
    })
}

fn compile(pattern: &str) -> Result<Regex, ParseError> {
    Regex::new(pattern).map_err(|e| ParseError::Pattern(e.to_string()))
}

/// Slice between the literal start and end markers; `None` when either is
/// absent.
fn items_block(text: &str) -> Option<&str> {
    let start = text.find(BLOCK_START)?;
    let after = &text[start + BLOCK_START.len()..];
    let end = after.find(BLOCK_END)?;
    Some(&after[..end])
}

fn extract_items(
    block: &str,
    item_re: &Regex,
    whitespace_re: &Regex,
    policy: &PricingPolicy,
) -> Extraction {
    // Runs of 2+ whitespace become exactly two spaces, the field separator
    let collapsed = whitespace_re.replace_all(block, "  ");

    let mut items = Vec::new();
    for caps in item_re.captures_iter(&collapsed) {
        let serial = caps[1].to_string();
        let lowered = serial.to_lowercase();
        // shipping-fee lines, not products
        if lowered.contains("despacho") || lowered.contains("envio") {
            continue;
        }

        let quantity: i64 = caps[2].parse().unwrap_or(0);
        let description = caps[3].trim().to_string();
        let line_total = parse_grouped(&caps[4]);

        items.push(ParsedLineItem::new(
            Some(serial),
            description.clone(),
            description,
            quantity as f64,
            unit_cost(line_total, quantity),
            policy,
        ));
    }

    Extraction::from_items(items)
}

/// Strip the thousands grouping dots and parse; `None` instead of an error
/// when the digits do not form a valid number.
fn parse_grouped(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(|c| *c != '.').collect();
    digits.parse().ok()
}

fn unit_cost(line_total: Option<i64>, quantity: i64) -> i64 {
    match line_total {
        Some(total) if quantity > 0 => (total as f64 / quantity as f64).round() as i64,
        Some(total) => total,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACTURA: &str = "FACTURA ELECTRONICA\n\
Panadería y Servicios Ltda\n\
RUT 76.111.222-3\n\
\n\
DETALLE\n\
A-1001     2    Harina 25kg      31.000\n\
A-1002     10   Azucar 1kg       8.990\n\
DESPACHO-9     1    Despacho a domicilio     5.000\n\
TOTAL $ 44.990\n";

    #[test]
    fn supplier_phrase_with_legal_suffix_is_captured() {
        let policy = PricingPolicy::default();
        let extract = parse(FACTURA, &policy).unwrap();
        assert_eq!(extract.proveedor.as_deref(), Some("Panadería y Servicios Ltda"));
    }

    #[test]
    fn grand_total_is_degrouped() {
        let policy = PricingPolicy::default();
        let extract = parse("pie de pagina TOTAL $ 12.345", &policy).unwrap();
        assert_eq!(extract.costo_total, Some(12345));
    }

    #[test]
    fn items_inside_the_block_are_extracted() {
        let policy = PricingPolicy::default();
        let items = parse(FACTURA, &policy).unwrap().items.into_items();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].code.as_deref(), Some("A-1001"));
        assert_eq!(items[0].name, "Harina 25kg");
        assert_eq!(items[0].quantity, 2.0);
        // 31.000 line total over 2 units
        assert_eq!(items[0].base_cost, 15500);

        assert_eq!(items[1].code.as_deref(), Some("A-1002"));
        assert_eq!(items[1].base_cost, 899);
    }

    #[test]
    fn shipping_lines_are_excluded_by_serial_token() {
        let policy = PricingPolicy::default();
        let items = parse(FACTURA, &policy).unwrap().items.into_items();
        assert!(items.iter().all(|item| !item.name.contains("Despacho")));

        let envio = "DETALLE\nENVIO-EXPRESS  1  Envio same day  3.500\nTOTAL $ 3.500\n";
        let extract = parse(envio, &policy).unwrap();
        assert!(extract.items.is_empty());
    }

    #[test]
    fn missing_markers_mean_empty_items_but_other_fields_survive() {
        let policy = PricingPolicy::default();
        let text = "Panadería y Servicios Ltda\nsin detalle aqui\nTOTAL $ 9.990\n";
        let extract = parse(text, &policy).unwrap();
        assert!(extract.items.is_empty());
        assert_eq!(extract.proveedor.as_deref(), Some("Panadería y Servicios Ltda"));
        assert_eq!(extract.costo_total, Some(9990));
    }

    #[test]
    fn overflowing_total_becomes_null_not_a_failure() {
        let policy = PricingPolicy::default();
        // 24 digits once degrouped: not a valid i64, so the line keeps a zero
        // cost instead of failing the extraction
        let text = "DETALLE\nA-1  1  Cosa rara  999.999.999.999.999.999.999.999\nTOTAL $ 1.000\n";
        let items = parse(text, &policy).unwrap().items.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].base_cost, 0);
    }

    #[test]
    fn no_supplier_pattern_yields_none() {
        let policy = PricingPolicy::default();
        let extract = parse("boleta sin razon social\n", &policy).unwrap();
        assert!(extract.proveedor.is_none());
    }
}
