use super::ui;
use crate::OutputFormat;
use crate::core::ledger::{EntryKind, LedgerEntry};
use anyhow::Result;
use comfy_table::Cell;

pub fn render(entry: &LedgerEntry, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return ui::to_json(entry);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(match entry.kind {
            EntryKind::Income => "Source",
            EntryKind::Expense => "Category",
        }),
        ui::header_cell(&format!("Original ({})", entry.original_currency)),
        ui::header_cell("Rate"),
        ui::header_cell(&format!("Amount ({})", entry.base_currency)),
    ]);
    table.add_row(vec![
        Cell::new(entry.date.to_string()),
        Cell::new(&entry.label),
        Cell::new(format!("{:.2}", entry.original_amount)),
        ui::rate_cell(entry.exchange_rate),
        ui::amount_cell(entry.amount),
    ]);

    Ok(format!(
        "{}\n\n{table}",
        ui::style_text(&format!("New {}", entry.kind), ui::StyleType::Title)
    ))
}
