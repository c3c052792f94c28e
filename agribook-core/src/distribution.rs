//! Partner profit distribution: equal split of what remains after the
//! worker share.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareDetails {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_farm_profit: f64,
    pub worker_share: f64,
    pub distributable_profit: f64,
    pub share_per_partner: f64,
}

/// Equal split only; weighted-capital splits are not supported. A partner
/// count of zero divides by one instead of panicking.
pub fn distribute_profit(
    total_income: f64,
    total_expense: f64,
    worker_share: f64,
    partner_count: usize,
) -> ShareDetails {
    let net_farm_profit = total_income - total_expense;
    let distributable_profit = net_farm_profit - worker_share;
    let share_per_partner = distributable_profit / partner_count.max(1) as f64;

    ShareDetails {
        total_income,
        total_expense,
        net_farm_profit,
        worker_share,
        distributable_profit,
        share_per_partner,
    }
}
