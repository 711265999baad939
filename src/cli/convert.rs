use super::ui;
use crate::OutputFormat;
use crate::core::ConversionReceipt;
use anyhow::Result;
use comfy_table::Cell;

pub fn render(receipt: &ConversionReceipt, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return ui::to_json(receipt);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&format!("Amount ({})", receipt.from)),
        ui::header_cell("Rate"),
        ui::header_cell(&format!("Converted ({})", receipt.to)),
    ]);
    table.add_row(vec![
        Cell::new(format!("{:.2}", receipt.original_amount)),
        ui::rate_cell(receipt.exchange_rate),
        ui::amount_cell(receipt.converted_amount),
    ]);

    let total = format!("{:.2}", receipt.converted_amount);
    Ok(format!(
        "{table}\n\nTotal ({}): {}\n{}",
        ui::style_text(receipt.to.as_str(), ui::StyleType::TotalLabel),
        ui::style_text(&total, ui::StyleType::TotalValue),
        ui::style_text(
            &format!("Rate as of {}", receipt.timestamp.to_rfc3339()),
            ui::StyleType::Subtle
        )
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CurrencyCode;
    use chrono::Utc;

    fn receipt() -> ConversionReceipt {
        ConversionReceipt {
            original_amount: 100.0,
            converted_amount: 370.0,
            from: CurrencyCode::parse("USD").unwrap(),
            to: CurrencyCode::parse("ILS").unwrap(),
            exchange_rate: 3.7,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_render_table() {
        let output = render(&receipt(), OutputFormat::Table).unwrap();
        assert!(output.contains("Amount (USD)"));
        assert!(output.contains("370.00"));
        assert!(output.contains("3.7000"));
    }

    #[test]
    fn test_render_json() {
        let output = render(&receipt(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["originalAmount"], 100.0);
        assert_eq!(value["convertedAmount"], 370.0);
        assert_eq!(value["exchangeRate"], 3.7);
        assert_eq!(value["from"], "USD");
    }
}
