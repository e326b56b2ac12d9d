use super::ParseError;
use crate::models::{Extraction, ParsedLineItem};
use crate::pricing::PricingPolicy;

/// Parse positional CSV rows: column 0 = name, 1 = quantity, 2 = base cost.
///
/// The first line is a header and is discarded. Rows with an empty name or a
/// non-positive quantity are dropped; unparseable numeric cells count as 0
/// (and then fall to the quantity rule).
pub fn parse(content: &str, policy: &PricingPolicy) -> Result<Extraction, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ParseError::Csv(e.to_string()))?;
        let name = record.get(0).unwrap_or("");
        let quantity: f64 = record
            .get(1)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0);
        let base_cost: i64 = record
            .get(2)
            .and_then(|v| v.parse::<f64>().ok())
            .map(|v| v.round() as i64)
            .unwrap_or(0);

        if name.is_empty() || quantity <= 0.0 {
            continue;
        }
        items.push(ParsedLineItem::new(
            None, name, name, quantity, base_cost, policy,
        ));
    }

    Ok(Extraction::from_items(items))
}
