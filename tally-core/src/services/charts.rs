//! Chart service - aggregate series for the dashboard charts
//!
//! All series are computed on the fly from the stored batch. Month keys are
//! `YYYY-MM`; transactions whose date cannot be parsed are left out of every
//! date-keyed series.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{Transaction, TransactionType};
use crate::ports::TransactionStore;

/// Number of slices in the spending categories chart
pub const TOP_CATEGORIES: usize = 6;

/// Label for debits without a counterpart
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Balance,
    IncomeExpenses,
    Monthly,
    SavingsRate,
    SpendingCategories,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Balance,
        ChartKind::IncomeExpenses,
        ChartKind::Monthly,
        ChartKind::SavingsRate,
        ChartKind::SpendingCategories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Balance => "balance",
            ChartKind::IncomeExpenses => "income-expenses",
            ChartKind::Monthly => "monthly",
            ChartKind::SavingsRate => "savings-rate",
            ChartKind::SpendingCategories => "spending-categories",
        }
    }
}

impl std::str::FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown chart: {} (expected one of balance, income-expenses, monthly, savings-rate, spending-categories)", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancePoint {
    pub date: NaiveDate,
    pub balance: f64,
}

/// One pie slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotals {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPoint {
    pub month: String,
    /// Percent of income kept, one decimal
    pub savings_rate: f64,
    pub savings: f64,
}

/// A computed series, serialized as a bare JSON array
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Chart {
    Balance(Vec<BalancePoint>),
    IncomeExpenses(Vec<Slice>),
    Monthly(Vec<MonthlyTotals>),
    SavingsRate(Vec<SavingsPoint>),
    SpendingCategories(Vec<Slice>),
}

impl Chart {
    pub fn len(&self) -> usize {
        match self {
            Chart::Balance(points) => points.len(),
            Chart::IncomeExpenses(slices) | Chart::SpendingCategories(slices) => slices.len(),
            Chart::Monthly(totals) => totals.len(),
            Chart::SavingsRate(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Chart service reading the current batch from the transaction store
pub struct ChartService {
    store: Arc<dyn TransactionStore>,
}

impl ChartService {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    pub async fn chart(&self, kind: ChartKind) -> Result<Chart> {
        let transactions = self.store.load().await?;
        Ok(compute(kind, &transactions))
    }
}

/// Compute one series over `transactions`
pub fn compute(kind: ChartKind, transactions: &[Transaction]) -> Chart {
    match kind {
        ChartKind::Balance => Chart::Balance(balance_over_time(transactions)),
        ChartKind::IncomeExpenses => Chart::IncomeExpenses(income_vs_expenses(transactions)),
        ChartKind::Monthly => Chart::Monthly(monthly_comparison(transactions)),
        ChartKind::SavingsRate => Chart::SavingsRate(savings_rate(transactions)),
        ChartKind::SpendingCategories => Chart::SpendingCategories(spending_categories(transactions)),
    }
}

/// Running balance in date order (ties keep batch order)
pub fn balance_over_time(transactions: &[Transaction]) -> Vec<BalancePoint> {
    let mut dated: Vec<(NaiveDate, f64)> = transactions
        .iter()
        .filter_map(|t| t.parsed_date().map(|d| (d, t.amount)))
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    let mut balance = 0.0;
    dated
        .into_iter()
        .map(|(date, amount)| {
            balance += amount;
            BalancePoint { date, balance }
        })
        .collect()
}

/// Absolute totals of credits ("Income") and debits ("Expenses")
///
/// Slices appear in the order their first transaction appears in the batch.
pub fn income_vs_expenses(transactions: &[Transaction]) -> Vec<Slice> {
    let mut slices: Vec<Slice> = Vec::with_capacity(2);

    for t in transactions {
        let name = match t.kind {
            TransactionType::Credit => "Income",
            TransactionType::Debit => "Expenses",
        };
        match slices.iter_mut().find(|slice| slice.name == name) {
            Some(slice) => slice.value += t.amount.abs(),
            None => slices.push(Slice { name: name.to_string(), value: t.amount.abs() }),
        }
    }

    slices
}

/// Per-month income and expenses, oldest month first
pub fn monthly_comparison(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut months: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for t in transactions {
        let Some(date) = t.parsed_date() else { continue };
        let totals = months.entry(date.format("%Y-%m").to_string()).or_insert((0.0, 0.0));
        match t.kind {
            TransactionType::Credit => totals.0 += t.amount,
            TransactionType::Debit => totals.1 += t.amount.abs(),
        }
    }

    months
        .into_iter()
        .map(|(month, (income, expenses))| MonthlyTotals { month, income, expenses })
        .collect()
}

/// Per-month share of income not spent
pub fn savings_rate(transactions: &[Transaction]) -> Vec<SavingsPoint> {
    monthly_comparison(transactions)
        .into_iter()
        .map(|m| {
            let rate = if m.income > 0.0 {
                (m.income - m.expenses) / m.income * 100.0
            } else {
                0.0
            };
            SavingsPoint {
                month: m.month,
                savings_rate: (rate * 10.0).round() / 10.0,
                savings: m.income - m.expenses,
            }
        })
        .collect()
}

/// Largest debit totals per counterpart
pub fn spending_categories(transactions: &[Transaction]) -> Vec<Slice> {
    let mut slices: Vec<Slice> = Vec::new();

    for t in transactions.iter().filter(|t| t.kind == TransactionType::Debit) {
        let name = t.counterpart().unwrap_or_else(|| UNCATEGORIZED.to_string());
        match slices.iter_mut().find(|s| s.name == name) {
            Some(slice) => slice.value += t.amount.abs(),
            None => slices.push(Slice { name, value: t.amount.abs() }),
        }
    }

    slices.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    slices.truncate(TOP_CATEGORIES);
    slices
}
