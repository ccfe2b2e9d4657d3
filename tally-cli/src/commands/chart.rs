//! Chart command - print one dashboard series

use anyhow::{anyhow, Result};
use colored::Colorize;
use comfy_table::Cell;

use super::{block_on, get_context};
use crate::output;
use tally_core::services::{Chart, ChartKind};

pub fn run(kind: &str, json: bool) -> Result<()> {
    let kind: ChartKind = kind.parse().map_err(|e: String| anyhow!(e))?;
    let ctx = get_context()?;

    let chart = block_on(ctx.chart_service.chart(kind))??;

    if json {
        return output::json(&chart);
    }
    if chart.is_empty() {
        println!("No data yet. Import a statement first.");
        return Ok(());
    }

    let mut table = output::create_table();
    match &chart {
        Chart::Balance(points) => {
            table.set_header(vec!["Date", "Balance"]);
            for p in points {
                table.add_row(vec![Cell::new(p.date), output::amount_cell(p.balance)]);
            }
        }
        Chart::IncomeExpenses(slices) | Chart::SpendingCategories(slices) => {
            table.set_header(vec!["Name", "Total"]);
            for s in slices {
                table.add_row(vec![Cell::new(&s.name), Cell::new(format!("{:.2}", s.value))]);
            }
        }
        Chart::Monthly(months) => {
            table.set_header(vec!["Month", "Income", "Expenses"]);
            for m in months {
                table.add_row(vec![
                    Cell::new(&m.month),
                    Cell::new(format!("{:.2}", m.income)),
                    Cell::new(format!("{:.2}", m.expenses)),
                ]);
            }
        }
        Chart::SavingsRate(points) => {
            table.set_header(vec!["Month", "Savings rate", "Savings"]);
            for p in points {
                table.add_row(vec![
                    Cell::new(&p.month),
                    Cell::new(format!("{:.1}%", p.savings_rate)),
                    output::amount_cell(p.savings),
                ]);
            }
        }
    }

    println!("{}", kind.as_str().bold());
    println!("{}", table);
    Ok(())
}
