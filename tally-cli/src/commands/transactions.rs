//! Transactions command - browse the stored batch

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use comfy_table::Cell;

use super::{block_on, get_context};
use crate::output;
use tally_core::services::{paginate, TransactionFilter};
use tally_core::TransactionType;

pub struct BrowseArgs {
    pub from: Option<String>,
    pub to: Option<String>,
    pub search: Option<String>,
    pub kind: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub page: usize,
    pub json: bool,
}

fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
}

pub fn run(args: BrowseArgs) -> Result<()> {
    let ctx = get_context()?;

    let filter = TransactionFilter {
        from: args.from.as_deref().map(parse_day).transpose()?,
        to: args.to.as_deref().map(parse_day).transpose()?,
        search: args.search,
        kind: args
            .kind
            .as_deref()
            .map(|k| k.parse::<TransactionType>().map_err(|e| anyhow!(e)))
            .transpose()?,
        min_amount: args.min,
        max_amount: args.max,
    };

    let stored = block_on(ctx.transactions.load())??;
    let page = paginate(filter.apply(stored), args.page);

    if args.json {
        return output::json(&page);
    }

    if page.total_items == 0 {
        println!("No transactions.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Description", "From/To", "Type", "Amount"]);
    for tx in &page.items {
        table.add_row(vec![
            Cell::new(&tx.date),
            Cell::new(&tx.description),
            Cell::new(tx.counterpart().unwrap_or_else(|| "-".to_string())),
            Cell::new(tx.kind.as_str()),
            output::amount_cell(tx.amount),
        ]);
    }
    println!("{}", table);
    output::info(&format!(
        "Page {} of {} ({} transactions)",
        page.page, page.total_pages, page.total_items
    ));

    Ok(())
}
