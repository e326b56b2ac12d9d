use super::ParseError;
use crate::models::{Extraction, ParsedLineItem};
use crate::pricing::PricingPolicy;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Accumulator for one `Detalle` element. Every field has a lenient default:
/// a Detalle missing QtyItem or PrcItem produces a 0, never an error.
#[derive(Default)]
struct DetalleFields {
    code: Option<String>,
    name: String,
    description: String,
    quantity: f64,
    unit_price: f64,
}

impl DetalleFields {
    fn into_item(self, policy: &PricingPolicy) -> ParsedLineItem {
        let description = if self.description.is_empty() {
            self.name.clone()
        } else {
            self.description
        };
        ParsedLineItem::new(
            self.code,
            self.name,
            description,
            self.quantity,
            self.unit_price.round() as i64,
            policy,
        )
    }
}

/// Extract line items from a DTE-style electronic invoice.
///
/// For every `Detalle` element: item code from `CdgItem/VlrCodigo`, name from
/// `NmbItem`, quantity from `QtyItem`, unit price from `PrcItem`. Only a
/// structurally broken document is an error.
pub fn parse(content: &str, policy: &PricingPolicy) -> Result<Extraction, ParseError> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut items = Vec::new();
    let mut current: Option<DetalleFields> = None;
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event().map_err(|e| ParseError::Xml(e.to_string()))? {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if tag == "Detalle" {
                    current = Some(DetalleFields::default());
                }
                path.push(tag);
            }
            Event::End(_) => {
                if path.pop().as_deref() == Some("Detalle") {
                    if let Some(fields) = current.take() {
                        items.push(fields.into_item(policy));
                    }
                }
            }
            Event::Text(t) => {
                let Some(fields) = current.as_mut() else {
                    continue;
                };
                let value = t
                    .unescape()
                    .map_err(|e| ParseError::Xml(e.to_string()))?
                    .trim()
                    .to_string();
                match path.last().map(String::as_str) {
                    Some("NmbItem") => fields.name = value,
                    Some("DscItem") => fields.description = value,
                    Some("QtyItem") => fields.quantity = value.parse().unwrap_or(0.0),
                    Some("PrcItem") => fields.unit_price = value.parse().unwrap_or(0.0),
                    Some("VlrCodigo") if parent_is(&path, "CdgItem") => {
                        if !value.is_empty() {
                            fields.code = Some(value);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(Extraction::from_items(items))
}

fn parent_is(path: &[String], tag: &str) -> bool {
    path.len() >= 2 && path[path.len() - 2] == tag
}
