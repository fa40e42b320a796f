use std::collections::BTreeMap;

use crate::ResultEngine;

use super::Engine;

/// Spending in one calendar month.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub total: f64,
    pub count: usize,
    /// Total per category, keyed by category name.
    pub categories: BTreeMap<String, f64>,
}

impl Engine {
    /// Per-month totals, oldest month first.
    pub async fn monthly_summary(&self) -> ResultEngine<Vec<MonthlySummary>> {
        let mut months: BTreeMap<String, MonthlySummary> = BTreeMap::new();
        for expense in self.store.list_all().await? {
            let month = expense.month();
            let summary = months
                .entry(month.clone())
                .or_insert_with(|| MonthlySummary {
                    month,
                    total: 0.0,
                    count: 0,
                    categories: BTreeMap::new(),
                });
            summary.total += expense.amount;
            summary.count += 1;
            *summary.categories.entry(expense.category).or_insert(0.0) += expense.amount;
        }
        Ok(months.into_values().collect())
    }
}
