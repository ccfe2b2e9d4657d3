//! Browsing - filter and page through the stored batch

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Transaction, TransactionType};

/// Transactions per page
pub const PAGE_SIZE: usize = 10;

/// Criteria for narrowing down the transaction list
///
/// Every criterion is optional; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    /// Inclusive lower date bound
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Case-insensitive text in description or counterpart
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionType>,
    /// Bounds on the absolute amount
    #[serde(default)]
    pub min_amount: Option<f64>,
    #[serde(default)]
    pub max_amount: Option<f64>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.from.is_some() || self.to.is_some() {
            let Some(date) = tx.parsed_date() else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) || self.to.is_some_and(|to| date > to) {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }

        let magnitude = tx.amount.abs();
        if self.min_amount.is_some_and(|min| magnitude < min) || self.max_amount.is_some_and(|max| magnitude > max) {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                tx.description.to_lowercase().contains(&term)
                    || tx.counterpart().is_some_and(|c| c.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }

    /// Keep matching transactions, in batch order
    pub fn apply(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        transactions.into_iter().filter(|tx| self.matches(tx)).collect()
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually returned
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice out `page` (1-based) of `items`
///
/// Page numbers are clamped into range; an empty list has a single empty
/// page.
pub fn paginate<T>(items: Vec<T>, page: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_items.div_ceil(PAGE_SIZE).max(1);
    let page = page.clamp(1, total_pages);

    let items = items.into_iter().skip((page - 1) * PAGE_SIZE).take(PAGE_SIZE).collect();

    Page { items, page, total_pages, total_items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldValue;

    fn batch() -> Vec<Transaction> {
        vec![
            Transaction::new("2024-01-05", "Rent January", -800.0)
                .with_extra("from/to", FieldValue::Text("Hausverwaltung".to_string())),
            Transaction::new("2024-01-10", "Salary", 2500.0),
            Transaction::new("15.01.2024", "Groceries", -42.5)
                .with_extra("from/to", FieldValue::Text("REWE Markt".to_string())),
            Transaction::new("someday", "Mystery", -1.0),
        ]
    }

    fn descriptions(txs: &[Transaction]) -> Vec<&str> {
        txs.iter().map(|t| t.description.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert_eq!(TransactionFilter::default().apply(batch()).len(), 4);
    }

    #[test]
    fn test_date_range_is_inclusive_and_skips_bad_dates() {
        let filter = TransactionFilter {
            from: NaiveDate::from_ymd_opt(2024, 1, 10),
            to: NaiveDate::from_ymd_opt(2024, 1, 15),
            ..Default::default()
        };
        assert_eq!(descriptions(&filter.apply(batch())), vec!["Salary", "Groceries"]);
    }

    #[test]
    fn test_search_covers_counterpart() {
        let filter = TransactionFilter { search: Some("rewe".to_string()), ..Default::default() };
        assert_eq!(descriptions(&filter.apply(batch())), vec!["Groceries"]);

        let filter = TransactionFilter { search: Some("  ".to_string()), ..Default::default() };
        assert_eq!(filter.apply(batch()).len(), 4);
    }

    #[test]
    fn test_kind_and_amount_range() {
        let filter = TransactionFilter {
            kind: Some(TransactionType::Debit),
            min_amount: Some(10.0),
            max_amount: Some(800.0),
            ..Default::default()
        };
        assert_eq!(descriptions(&filter.apply(batch())), vec!["Rent January", "Groceries"]);
    }

    #[test]
    fn test_filter_from_query_json() {
        let filter: TransactionFilter =
            serde_json::from_str(r#"{"from": "2024-01-01", "type": "credit", "minAmount": 5}"#).unwrap();
        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.kind, Some(TransactionType::Credit));
        assert_eq!(filter.min_amount, Some(5.0));
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=23).collect();

        let first = paginate(items.clone(), 1);
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 23);

        let last = paginate(items.clone(), 3);
        assert_eq!(last.items, vec![21, 22, 23]);

        assert_eq!(paginate(items.clone(), 0).page, 1);
        assert_eq!(paginate(items, 99).page, 3);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::<u32>::new(), 2);
        assert!(page.items.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }
}
