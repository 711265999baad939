use super::ui;
use crate::OutputFormat;
use crate::core::{CurrencyService, RateQuote};
use anyhow::{Result, anyhow};
use comfy_table::Cell;
use futures::future::join_all;

/// Fetches `from` against every target concurrently. Failed pairs are shown
/// as N/A and make the command fail once everything has been printed.
pub async fn run(
    service: &CurrencyService,
    from: &str,
    targets: &[String],
    format: OutputFormat,
) -> Result<()> {
    let pb = ui::new_progress_bar(targets.len() as u64, true);
    pb.set_message("Fetching rates...");

    let quote_futures = targets.iter().map(|to| {
        let pb_clone = pb.clone();
        async move {
            let res = service.quote(from, to).await;
            pb_clone.inc(1);
            (to.clone(), res)
        }
    });
    let results = join_all(quote_futures).await;
    pb.finish_and_clear();

    let mut quotes = Vec::new();
    let mut failures = Vec::new();
    for (to, res) in results {
        match res {
            Ok(quote) => quotes.push(Ok(quote)),
            Err(e) => {
                failures.push(e.to_string());
                quotes.push(Err(to));
            }
        }
    }

    println!("{}", render(from, &quotes, format)?);

    if failures.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("Failed to get exchange rate: {}", failures.join("; ")))
    }
}

/// Renders successful quotes, and the target code of failed ones.
pub fn render(
    from: &str,
    quotes: &[std::result::Result<RateQuote, String>],
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        let ok: Vec<&RateQuote> = quotes.iter().filter_map(|q| q.as_ref().ok()).collect();
        return match ok.as_slice() {
            [single] if quotes.len() == 1 => ui::to_json(single),
            _ => ui::to_json(&ok),
        };
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Rate"),
        ui::header_cell("As of"),
    ]);
    for quote in quotes {
        match quote {
            Ok(q) => table.add_row(vec![
                Cell::new(q.from.as_str()),
                Cell::new(q.to.as_str()),
                ui::rate_cell(q.rate),
                Cell::new(q.timestamp.to_rfc3339()),
            ]),
            Err(to) => table.add_row(vec![
                Cell::new(from.to_uppercase()),
                Cell::new(to.to_uppercase()),
                ui::na_cell(true),
                Cell::new(ui::style_text("unavailable", ui::StyleType::Error)),
            ]),
        };
    }

    Ok(format!(
        "{}\n\n{table}",
        ui::style_text("Exchange rates", ui::StyleType::Title)
    ))
}
