//! Monthly rollup: income, spend, net cashflow and count per `YYYY-MM`.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::transaction::{MonthlySummary, Transaction};

/// Group transactions by month, ascending. Always a full recompute.
pub fn rollup(txns: &[Transaction]) -> Vec<MonthlySummary> {
    let mut by_month: BTreeMap<&str, MonthlySummary> = BTreeMap::new();

    for t in txns {
        let entry = by_month.entry(t.month.as_str()).or_insert_with(|| MonthlySummary {
            month: t.month.clone(),
            net_cashflow: Decimal::ZERO,
            income: Decimal::ZERO,
            spend: Decimal::ZERO,
            n_txn: 0,
        });

        entry.net_cashflow += t.amount;
        if t.is_income() {
            entry.income += t.amount;
        } else if t.is_spend() {
            entry.spend -= t.amount;
        }
        entry.n_txn += 1;
    }

    by_month.into_values().collect()
}
