//! Transaction list filtering and the filtered totals strip.

use chrono::NaiveDate;
use serde::Serialize;

use crate::transaction::{Transaction, TransactionKind, TransactionType};

/// All criteria are optional and AND-ed together.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Case-insensitive substring match on description or category.
    pub search: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub season_id: Option<String>,
    pub worker_id: Option<String>,
    /// Matches the direct target partner or the pocket payer.
    pub partner_id: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !t.description.to_lowercase().contains(&needle)
                && !t.category.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(kind) = self.transaction_type {
            if t.transaction_type() != kind {
                return false;
            }
        }
        if let Some(season_id) = &self.season_id {
            if &t.season_id != season_id {
                return false;
            }
        }
        if let Some(worker_id) = &self.worker_id {
            if t.worker_id() != Some(worker_id.as_str()) {
                return false;
            }
        }
        if let Some(partner_id) = &self.partner_id {
            let id = Some(partner_id.as_str());
            if t.partner_id() != id && t.payer_partner_id() != id {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &t.category != category {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if t.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if t.date > end {
                return false;
            }
        }
        true
    }
}

/// Matching transactions, newest first.
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: &TransactionFilter,
) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = transactions
        .iter()
        .filter(|t| filter.matches(t))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}

/// Summary strip over a (usually filtered) list. Money-in counts income and
/// contributions; money-out counts expenses, advances and withdrawals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilteredTotals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

pub fn filtered_totals(transactions: &[Transaction]) -> FilteredTotals {
    let mut income = 0.0;
    let mut expense = 0.0;
    for t in transactions {
        match t.kind {
            TransactionKind::Income { .. } | TransactionKind::PartnerContribution { .. } => {
                income += t.amount
            }
            TransactionKind::Expense { .. }
            | TransactionKind::WorkerAdvance { .. }
            | TransactionKind::PartnerWithdrawal { .. } => expense += t.amount,
        }
    }
    FilteredTotals {
        income,
        expense,
        balance: income - expense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::PaymentSource;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::new(
                "t1",
                date("2025-06-01"),
                1000.0,
                TransactionKind::income(),
                PaymentSource::FarmCash,
                "Crop Sale",
                "s1",
            )
            .with_description("potato lot"),
            Transaction::new(
                "t2",
                date("2025-06-15"),
                200.0,
                TransactionKind::expense(),
                PaymentSource::Partner {
                    payer_partner_id: "p1".to_string(),
                },
                "Fertilizer",
                "s1",
            ),
            Transaction::new(
                "t3",
                date("2025-07-01"),
                50.0,
                TransactionKind::WorkerAdvance {
                    worker_id: "w1".to_string(),
                },
                PaymentSource::FarmCash,
                "Grocery",
                "s2",
            ),
        ]
    }

    #[test]
    fn test_no_criteria_matches_all_newest_first() {
        let out = filter_transactions(&sample(), &TransactionFilter::default());
        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["t3", "t2", "t1"]);
    }

    #[test]
    fn test_search_hits_description_and_category() {
        let filter = TransactionFilter {
            search: Some("POTATO".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_transactions(&sample(), &filter).len(), 1);

        let filter = TransactionFilter {
            search: Some("fert".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_transactions(&sample(), &filter)[0].id, "t2");
    }

    #[test]
    fn test_partner_filter_matches_pocket_payer() {
        let filter = TransactionFilter {
            partner_id: Some("p1".to_string()),
            ..Default::default()
        };
        let out = filter_transactions(&sample(), &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "t2");
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let filter = TransactionFilter {
            start_date: Some(date("2025-06-15")),
            end_date: Some(date("2025-07-01")),
            ..Default::default()
        };
        let out = filter_transactions(&sample(), &filter);
        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["t3", "t2"]);
    }

    #[test]
    fn test_totals_bucket_every_kind() {
        let totals = filtered_totals(&sample());
        assert_eq!(totals.income, 1000.0);
        assert_eq!(totals.expense, 250.0);
        assert_eq!(totals.balance, 750.0);
    }
}
