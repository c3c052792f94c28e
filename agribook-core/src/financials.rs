//! Farm-wide ledger derivation: one pure fold over the transaction log.
//!
//! Everything here is recomputed from scratch on every call. The log is the
//! source of truth; there is no incremental state to get out of sync after
//! an edit or delete.

use std::collections::HashMap;

use serde::Serialize;

use crate::distribution::{ShareDetails, distribute_profit};
use crate::people::Partner;
use crate::settlement::WORKER_SHARE_RATE;
use crate::transaction::{PaymentSource, Transaction, TransactionKind};

/// Derived farm position. Partner balances are signed: positive means the
/// farm owes the partner (net invested), negative means the partner owes the
/// farm (net withdrawn/collected).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub cash: f64,
    pub bank: f64,
    pub total_advances: f64,
    pub partner_balances: HashMap<String, f64>,
    pub share_per_partner: f64,
    pub share_details: ShareDetails,
}

pub fn derive_financials(transactions: &[Transaction], partners: &[Partner]) -> Financials {
    let mut cash = 0.0;
    let mut bank = 0.0;
    let mut total_advances = 0.0;
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut eligible_income = 0.0;
    let mut eligible_expense = 0.0;

    let mut partner_balances: HashMap<String, f64> =
        partners.iter().map(|p| (p.id.clone(), 0.0)).collect();

    for t in transactions {
        let amount = t.amount;

        match &t.kind {
            TransactionKind::Income {
                include_in_worker_share,
            } => {
                total_income += amount;
                if *include_in_worker_share {
                    eligible_income += amount;
                }
            }
            TransactionKind::Expense {
                include_in_worker_share,
            } => {
                total_expense += amount;
                if *include_in_worker_share {
                    eligible_expense += amount;
                }
            }
            TransactionKind::WorkerAdvance { .. } => total_advances += amount,
            TransactionKind::PartnerContribution { .. }
            | TransactionKind::PartnerWithdrawal { .. } => {}
        }

        // Only income and direct contributions flow into the farm; every
        // other kind flows out. Pocket payments never touch farm money.
        let inflow = matches!(
            t.kind,
            TransactionKind::Income { .. } | TransactionKind::PartnerContribution { .. }
        );
        match &t.payment_source {
            PaymentSource::FarmCash => {
                if inflow {
                    cash += amount;
                } else {
                    cash -= amount;
                }
            }
            PaymentSource::FarmBank => {
                if inflow {
                    bank += amount;
                } else {
                    bank -= amount;
                }
            }
            PaymentSource::Partner { payer_partner_id } => match &t.kind {
                TransactionKind::Expense { .. } | TransactionKind::WorkerAdvance { .. } => {
                    *partner_balances.entry(payer_partner_id.clone()).or_insert(0.0) += amount;
                }
                TransactionKind::Income { .. } => {
                    *partner_balances.entry(payer_partner_id.clone()).or_insert(0.0) -= amount;
                }
                _ => {}
            },
        }

        // Direct capital movements, applied independently of the pocket
        // rules above.
        match &t.kind {
            TransactionKind::PartnerContribution { partner_id } => {
                *partner_balances.entry(partner_id.clone()).or_insert(0.0) += amount;
            }
            TransactionKind::PartnerWithdrawal { partner_id } => {
                *partner_balances.entry(partner_id.clone()).or_insert(0.0) -= amount;
            }
            _ => {}
        }
    }

    let worker_share =
        eligible_income * WORKER_SHARE_RATE - eligible_expense * WORKER_SHARE_RATE;
    let share_details =
        distribute_profit(total_income, total_expense, worker_share, partners.len());

    Financials {
        cash,
        bank,
        total_advances,
        partner_balances,
        share_per_partner: share_details.share_per_partner,
        share_details,
    }
}
