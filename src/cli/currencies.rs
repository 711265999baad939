use super::ui;
use crate::OutputFormat;
use crate::core::SupportedCurrency;
use anyhow::Result;
use comfy_table::Cell;

pub fn render(currencies: &[SupportedCurrency], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return ui::to_json(currencies);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
    ]);
    for currency in currencies {
        table.add_row(vec![
            Cell::new(currency.code),
            Cell::new(currency.name),
            Cell::new(currency.symbol),
        ]);
    }

    Ok(format!(
        "{}\n\n{table}",
        ui::style_text("Supported currencies", ui::StyleType::Title)
    ))
}
