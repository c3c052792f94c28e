//! Entity store: the reference collections plus the transaction log, with
//! validated mutations. Derivation stays in `financials`/`settlement`; this
//! module only guards the invariants records must satisfy to enter the log.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::categories::{CategoryGroup, CategoryMap};
use crate::people::{Partner, Worker};
use crate::season::{Season, SeasonStatus};
use crate::transaction::{Transaction, TransactionKind};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("unknown season: {0}")]
    UnknownSeason(String),
    #[error("season already closed: {0}")]
    SeasonAlreadyClosed(String),
    #[error("unknown transaction: {0}")]
    UnknownTransaction(String),
    #[error("unknown worker: {0}")]
    UnknownWorker(String),
    #[error("worker {0} has linked transactions and cannot be deleted")]
    WorkerHasTransactions(String),
    #[error("transaction {0} does not carry the worker-share flag")]
    NoWorkerShareFlag(String),
    #[error("category \"{0}\" already exists")]
    DuplicateCategory(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    pub seasons: Vec<Season>,
    pub partners: Vec<Partner>,
    pub workers: Vec<Worker>,
    pub transactions: Vec<Transaction>,
    pub categories: CategoryMap,
}

impl Store {
    pub fn season(&self, id: &str) -> Option<&Season> {
        self.seasons.iter().find(|s| s.id == id)
    }

    pub fn partner(&self, id: &str) -> Option<&Partner> {
        self.partners.iter().find(|p| p.id == id)
    }

    pub fn worker(&self, id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    fn validate_transaction(&self, t: &Transaction) -> Result<(), StoreError> {
        if t.amount <= 0.0 {
            return Err(StoreError::NonPositiveAmount);
        }
        if self.season(&t.season_id).is_none() {
            return Err(StoreError::UnknownSeason(t.season_id.clone()));
        }
        Ok(())
    }

    /// Newest entries sit at the front of the log.
    pub fn add_transaction(&mut self, t: Transaction) -> Result<(), StoreError> {
        self.validate_transaction(&t)?;
        self.transactions.insert(0, t);
        Ok(())
    }

    pub fn update_transaction(&mut self, t: Transaction) -> Result<(), StoreError> {
        self.validate_transaction(&t)?;
        let slot = self
            .transactions
            .iter_mut()
            .find(|existing| existing.id == t.id)
            .ok_or_else(|| StoreError::UnknownTransaction(t.id.clone()))?;
        *slot = t;
        Ok(())
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<(), StoreError> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::UnknownTransaction(id.to_string()))?;
        self.transactions.remove(index);
        Ok(())
    }

    /// Flip the worker-share flag on an income or expense record.
    pub fn set_worker_share(&mut self, id: &str, include: bool) -> Result<(), StoreError> {
        let t = self
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::UnknownTransaction(id.to_string()))?;
        match &mut t.kind {
            TransactionKind::Income {
                include_in_worker_share,
            }
            | TransactionKind::Expense {
                include_in_worker_share,
            } => {
                *include_in_worker_share = include;
                Ok(())
            }
            _ => Err(StoreError::NoWorkerShareFlag(id.to_string())),
        }
    }

    pub fn add_season(&mut self, season: Season) {
        self.seasons.insert(0, season);
    }

    /// OPEN -> CLOSED, once. Sets the end date to the closing day.
    pub fn close_season(&mut self, id: &str, on: NaiveDate) -> Result<(), StoreError> {
        let season = self
            .seasons
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::UnknownSeason(id.to_string()))?;
        if !season.is_open() {
            return Err(StoreError::SeasonAlreadyClosed(id.to_string()));
        }
        season.status = SeasonStatus::Closed;
        season.end_date = Some(on);
        Ok(())
    }

    /// Deleting a season cascades: every transaction in it goes too.
    pub fn delete_season(&mut self, id: &str) -> Result<(), StoreError> {
        let index = self
            .seasons
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::UnknownSeason(id.to_string()))?;
        self.seasons.remove(index);
        self.transactions.retain(|t| t.season_id != id);
        Ok(())
    }

    pub fn add_partner(&mut self, partner: Partner) {
        self.partners.push(partner);
    }

    pub fn add_worker(&mut self, worker: Worker) {
        self.workers.push(worker);
    }

    pub fn worker_has_transactions(&self, id: &str) -> bool {
        self.transactions.iter().any(|t| t.worker_id() == Some(id))
    }

    /// Precondition, not a cascade: a worker with any linked advance stays.
    pub fn delete_worker(&mut self, id: &str) -> Result<(), StoreError> {
        if self.worker_has_transactions(id) {
            return Err(StoreError::WorkerHasTransactions(id.to_string()));
        }
        let index = self
            .workers
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| StoreError::UnknownWorker(id.to_string()))?;
        self.workers.remove(index);
        Ok(())
    }

    pub fn add_category(&mut self, group: CategoryGroup, label: &str) -> Result<(), StoreError> {
        if !self.categories.add(group, label) {
            return Err(StoreError::DuplicateCategory(label.trim().to_string()));
        }
        Ok(())
    }

    /// A worker's outstanding debt: advances across all seasons.
    pub fn worker_advances_total(&self, worker_id: &str) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.worker_id() == Some(worker_id))
            .map(|t| t.amount)
            .sum()
    }

    pub fn transactions_for_season(&self, season_id: &str) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.season_id == season_id)
            .cloned()
            .collect()
    }

    /// Everything one partner has put in or taken out, itemized.
    pub fn partner_statement(&self, partner_id: &str) -> PartnerStatement {
        let mut s = PartnerStatement::default();
        for t in &self.transactions {
            if t.payer_partner_id() == Some(partner_id) {
                match t.kind {
                    TransactionKind::Expense { .. } => s.expenses_paid += t.amount,
                    TransactionKind::WorkerAdvance { .. } => s.advances_paid += t.amount,
                    TransactionKind::Income { .. } => s.income_received += t.amount,
                    _ => {}
                }
            }
            if t.partner_id() == Some(partner_id) {
                match t.kind {
                    TransactionKind::PartnerContribution { .. } => {
                        s.direct_contribution += t.amount
                    }
                    TransactionKind::PartnerWithdrawal { .. } => s.withdrawal += t.amount,
                    _ => {}
                }
            }
        }
        s.total_invested = s.direct_contribution + s.expenses_paid + s.advances_paid;
        s.net_balance = s.total_invested - s.withdrawal - s.income_received;
        s
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerStatement {
    pub direct_contribution: f64,
    pub expenses_paid: f64,
    pub advances_paid: f64,
    pub income_received: f64,
    pub total_invested: f64,
    pub withdrawal: f64,
    pub net_balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::PaymentSource;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn seeded() -> Store {
        let mut store = Store::default();
        store.add_season(Season::open("s1", "Kharif 2025", date("2025-06-01")));
        store.add_partner(Partner::new("p1", "Girish", date("2025-01-01")));
        store.add_worker(Worker::new("w1", "Ramesh", date("2025-01-01")));
        store
    }

    fn advance(id: &str, amount: f64) -> Transaction {
        Transaction::new(
            id,
            date("2025-06-10"),
            amount,
            TransactionKind::WorkerAdvance {
                worker_id: "w1".to_string(),
            },
            PaymentSource::FarmCash,
            "Grocery",
            "s1",
        )
    }

    #[test]
    fn test_add_transaction_validates_amount_and_season() {
        let mut store = seeded();
        assert_eq!(
            store.add_transaction(advance("t1", 0.0)),
            Err(StoreError::NonPositiveAmount)
        );

        let mut orphan = advance("t2", 100.0);
        orphan.season_id = "nope".to_string();
        assert_eq!(
            store.add_transaction(orphan),
            Err(StoreError::UnknownSeason("nope".to_string()))
        );

        store.add_transaction(advance("t3", 100.0)).unwrap();
        assert_eq!(store.transactions.len(), 1);
    }

    #[test]
    fn test_new_transactions_go_to_the_front() {
        let mut store = seeded();
        store.add_transaction(advance("t1", 10.0)).unwrap();
        store.add_transaction(advance("t2", 20.0)).unwrap();
        assert_eq!(store.transactions[0].id, "t2");
    }

    #[test]
    fn test_worker_delete_precondition() {
        let mut store = seeded();
        store.add_transaction(advance("t1", 100.0)).unwrap();

        assert_eq!(
            store.delete_worker("w1"),
            Err(StoreError::WorkerHasTransactions("w1".to_string()))
        );

        store.delete_transaction("t1").unwrap();
        store.delete_worker("w1").unwrap();
        assert!(store.workers.is_empty());
    }

    #[test]
    fn test_season_delete_cascades_transactions() {
        let mut store = seeded();
        store.add_season(Season::open("s2", "Rabi 2025", date("2025-11-01")));
        store.add_transaction(advance("t1", 100.0)).unwrap();

        let mut other = advance("t2", 50.0);
        other.season_id = "s2".to_string();
        store.add_transaction(other).unwrap();

        store.delete_season("s1").unwrap();
        assert!(store.season("s1").is_none());
        assert_eq!(store.transactions.len(), 1);
        assert_eq!(store.transactions[0].season_id, "s2");
    }

    #[test]
    fn test_close_season_transitions_once() {
        let mut store = seeded();
        store.close_season("s1", date("2025-10-15")).unwrap();

        let season = store.season("s1").unwrap();
        assert_eq!(season.status, SeasonStatus::Closed);
        assert_eq!(season.end_date, Some(date("2025-10-15")));

        assert_eq!(
            store.close_season("s1", date("2025-10-16")),
            Err(StoreError::SeasonAlreadyClosed("s1".to_string()))
        );
    }

    #[test]
    fn test_set_worker_share_only_on_income_and_expense() {
        let mut store = seeded();
        store.add_transaction(advance("t1", 100.0)).unwrap();
        store
            .add_transaction(Transaction::new(
                "t2",
                date("2025-06-11"),
                500.0,
                TransactionKind::income(),
                PaymentSource::FarmCash,
                "Crop Sale",
                "s1",
            ))
            .unwrap();

        store.set_worker_share("t2", false).unwrap();
        assert_eq!(
            store.transactions.iter().find(|t| t.id == "t2").unwrap().kind,
            TransactionKind::Income {
                include_in_worker_share: false
            }
        );

        assert_eq!(
            store.set_worker_share("t1", false),
            Err(StoreError::NoWorkerShareFlag("t1".to_string()))
        );
    }

    #[test]
    fn test_worker_advances_total_spans_seasons() {
        let mut store = seeded();
        store.add_season(Season::open("s2", "Rabi 2025", date("2025-11-01")));
        store.add_transaction(advance("t1", 100.0)).unwrap();
        let mut later = advance("t2", 60.0);
        later.season_id = "s2".to_string();
        store.add_transaction(later).unwrap();

        assert_eq!(store.worker_advances_total("w1"), 160.0);
    }

    #[test]
    fn test_partner_statement() {
        let mut store = seeded();
        let pocket = PaymentSource::Partner {
            payer_partner_id: "p1".to_string(),
        };

        store
            .add_transaction(Transaction::new(
                "t1",
                date("2025-06-10"),
                5000.0,
                TransactionKind::PartnerContribution {
                    partner_id: "p1".to_string(),
                },
                PaymentSource::FarmBank,
                "Capital Injection",
                "s1",
            ))
            .unwrap();
        store
            .add_transaction(Transaction::new(
                "t2",
                date("2025-06-12"),
                800.0,
                TransactionKind::expense(),
                pocket.clone(),
                "Fertilizer",
                "s1",
            ))
            .unwrap();
        store
            .add_transaction(Transaction::new(
                "t3",
                date("2025-06-13"),
                300.0,
                TransactionKind::income(),
                pocket,
                "Crop Sale",
                "s1",
            ))
            .unwrap();
        store
            .add_transaction(Transaction::new(
                "t4",
                date("2025-06-14"),
                1000.0,
                TransactionKind::PartnerWithdrawal {
                    partner_id: "p1".to_string(),
                },
                PaymentSource::FarmCash,
                "Personal Withdrawal",
                "s1",
            ))
            .unwrap();

        let s = store.partner_statement("p1");
        assert_eq!(s.direct_contribution, 5000.0);
        assert_eq!(s.expenses_paid, 800.0);
        assert_eq!(s.income_received, 300.0);
        assert_eq!(s.withdrawal, 1000.0);
        assert_eq!(s.total_invested, 5800.0);
        assert_eq!(s.net_balance, 5800.0 - 1000.0 - 300.0);
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let mut store = seeded();
        assert_eq!(
            store.add_category(CategoryGroup::Expense, " SEEDS "),
            Err(StoreError::DuplicateCategory("SEEDS".to_string()))
        );
        store
            .add_category(CategoryGroup::Expense, "Canal Fees")
            .unwrap();
    }
}
