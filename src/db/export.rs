use crate::models::ReportRow;
use csv::Writer;

/// Header of the bulk-upload template
pub const TEMPLATE_HEADER: [&str; 6] = ["Producto", "Stock", "Categoria", "SKU", "Costo", "Precio"];

/// Header of the inventory report
pub const REPORT_HEADER: [&str; 8] = [
    "Producto",
    "Stock",
    "Categoria",
    "SKU",
    "Costo",
    "Precio",
    "Margen",
    "Disponible",
];

type ExportResult = Result<String, Box<dyn std::error::Error + Send + Sync>>;

/// CSV template for bulk product uploads: fixed header plus one example row
pub fn inventory_template() -> ExportResult {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(TEMPLATE_HEADER)?;
    writer.write_record(["Harina 25kg", "0", "Abarrotes", "HAR-25", "15500", "23985"])?;
    into_csv_string(writer)
}

/// Inventory report for one branch. `Margen` is the absolute peso margin,
/// `Disponible` is Si/No from the active flag and positive stock.
pub fn inventory_report(rows: &[ReportRow]) -> ExportResult {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(REPORT_HEADER)?;

    for row in rows {
        let margen = row.price - row.cost_tax_inclusive;
        let disponible = if row.active && row.stock_on_hand > 0.0 {
            "Si"
        } else {
            "No"
        };
        writer.write_record([
            row.name.clone(),
            row.stock_on_hand.to_string(),
            row.category.clone().unwrap_or_default(),
            row.code.clone(),
            row.cost_tax_inclusive.to_string(),
            row.price.to_string(),
            margen.to_string(),
            disponible.to_string(),
        ])?;
    }

    into_csv_string(writer)
}

fn into_csv_string(writer: Writer<Vec<u8>>) -> ExportResult {
    Ok(String::from_utf8(writer.into_inner()?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, stock: f64, cost: i64, price: i64, active: bool) -> ReportRow {
        ReportRow {
            name: name.to_string(),
            stock_on_hand: stock,
            category: Some("Abarrotes".to_string()),
            code: format!("SKU-{name}"),
            cost_tax_inclusive: cost,
            price,
            active,
        }
    }

    #[test]
    fn template_carries_the_fixed_header() {
        let csv = inventory_template().unwrap();
        let first_line = csv.lines().next().unwrap();
        assert_eq!(first_line, "Producto,Stock,Categoria,SKU,Costo,Precio");
    }

    #[test]
    fn report_computes_margin_and_availability() {
        let rows = vec![
            row("Harina", 12.0, 18445, 23979, true),
            row("Azucar", 0.0, 1059, 1377, true),
            row("Aceite", 4.0, 2000, 2600, false),
        ];
        let csv = inventory_report(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Producto,Stock,Categoria,SKU,Costo,Precio,Margen,Disponible"
        );
        assert_eq!(lines[1], "Harina,12,Abarrotes,SKU-Harina,18445,23979,5534,Si");
        // zero stock is not available
        assert!(lines[2].ends_with(",No"));
        // inactive products are not available even with stock
        assert!(lines[3].ends_with(",No"));
    }

    #[test]
    fn missing_category_renders_as_an_empty_cell() {
        let mut report_row = row("Harina", 1.0, 100, 130, true);
        report_row.category = None;
        let csv = inventory_report(&[report_row]).unwrap();
        assert!(csv.lines().nth(1).unwrap().contains("Harina,1,,SKU-Harina"));
    }
}
