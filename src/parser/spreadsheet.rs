use super::ParseError;
use crate::models::{Extraction, ParsedLineItem};
use crate::pricing::PricingPolicy;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

/// Map the first worksheet into line items.
///
/// Same positional shape as the CSV ingestion (name, quantity, base cost,
/// header row skipped); the workbook decoding itself is delegated entirely
/// to calamine.
pub fn parse(data: &[u8], policy: &PricingPolicy) -> Result<Extraction, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ParseError::Spreadsheet("workbook has no sheets".to_string()))?
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let mut items = Vec::new();
    for row in range.rows().skip(1) {
        let name = cell_text(row.first());
        let quantity = cell_number(row.get(1));
        let base_cost = cell_number(row.get(2)).round() as i64;

        if name.is_empty() || quantity <= 0.0 {
            continue;
        }
        items.push(ParsedLineItem::new(
            None,
            name.as_str(),
            name.as_str(),
            quantity,
            base_cost,
            policy,
        ));
    }

    Ok(Extraction::from_items(items))
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) => f.to_string(),
        _ => String::new(),
    }
}

fn cell_number(cell: Option<&Data>) -> f64 {
    match cell {
        Some(Data::Int(i)) => *i as f64,
        Some(Data::Float(f)) => *f,
        Some(Data::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let policy = PricingPolicy::default();
        let result = parse(b"esto no es una planilla", &policy);
        assert!(matches!(result, Err(ParseError::Spreadsheet(_))));
    }
}
