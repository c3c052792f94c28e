//! Per-season worker share settlement.

use serde::Serialize;

use crate::transaction::{Transaction, TransactionKind};

/// Fixed worker entitlement: 20% of season income minus 20% of season
/// expense, policy, not user-configurable.
pub const WORKER_SHARE_RATE: f64 = 0.20;

/// Settlement figures for one season.
///
/// `total_income`/`total_expense` are the farm-performance numbers and count
/// every record; the `worker_*_base` pair only counts records not opted out
/// of the worker share. `final_payable` is signed: negative means the worker
/// owes the farm.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonSettlement {
    pub total_income: f64,
    pub total_expense: f64,
    pub worker_income_base: f64,
    pub worker_expense_base: f64,
    pub worker_gross_share: f64,
    pub worker_expense_share: f64,
    pub worker_net_share: f64,
    pub season_advances: f64,
    pub final_payable: f64,
}

/// Settle one season from the full transaction log. A season with no
/// transactions settles to all zeros.
pub fn settle_season(transactions: &[Transaction], season_id: &str) -> SeasonSettlement {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut worker_income_base = 0.0;
    let mut worker_expense_base = 0.0;
    let mut season_advances = 0.0;

    for t in transactions.iter().filter(|t| t.season_id == season_id) {
        match &t.kind {
            TransactionKind::Income {
                include_in_worker_share,
            } => {
                total_income += t.amount;
                if *include_in_worker_share {
                    worker_income_base += t.amount;
                }
            }
            TransactionKind::Expense {
                include_in_worker_share,
            } => {
                total_expense += t.amount;
                if *include_in_worker_share {
                    worker_expense_base += t.amount;
                }
            }
            TransactionKind::WorkerAdvance { .. } => season_advances += t.amount,
            TransactionKind::PartnerContribution { .. }
            | TransactionKind::PartnerWithdrawal { .. } => {}
        }
    }

    let worker_gross_share = worker_income_base * WORKER_SHARE_RATE;
    let worker_expense_share = worker_expense_base * WORKER_SHARE_RATE;
    let worker_net_share = worker_gross_share - worker_expense_share;
    let final_payable = worker_net_share - season_advances;

    SeasonSettlement {
        total_income,
        total_expense,
        worker_income_base,
        worker_expense_base,
        worker_gross_share,
        worker_expense_share,
        worker_net_share,
        season_advances,
        final_payable,
    }
}
