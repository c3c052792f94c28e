//! Transaction records: the central ledger entity.
//!
//! The stored wire shape is the flat record older books were written in
//! (`type`, `paymentSource`, optional `workerId`/`partnerId`/`payerPartnerId`).
//! Internally the `type`-dependent and `paymentSource`-dependent fields are
//! tagged variants, so a record can only carry the ids its kind needs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::categories::CategoryGroup;

/// Which pool of money a transaction actually moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "paymentSource")]
pub enum PaymentSource {
    #[serde(rename = "FARM_CASH")]
    FarmCash,
    #[serde(rename = "FARM_BANK")]
    FarmBank,
    /// Paid out of a partner's personal pocket, not farm money.
    #[serde(rename = "PARTNER", rename_all = "camelCase")]
    Partner { payer_partner_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransactionKind {
    #[serde(rename = "INCOME", rename_all = "camelCase")]
    Income {
        #[serde(default = "default_true")]
        include_in_worker_share: bool,
    },
    #[serde(rename = "EXPENSE", rename_all = "camelCase")]
    Expense {
        #[serde(default = "default_true")]
        include_in_worker_share: bool,
    },
    #[serde(rename = "WORKER_ADVANCE", rename_all = "camelCase")]
    WorkerAdvance { worker_id: String },
    #[serde(rename = "PARTNER_CONTRIBUTION", rename_all = "camelCase")]
    PartnerContribution { partner_id: String },
    #[serde(rename = "PARTNER_WITHDRAWAL", rename_all = "camelCase")]
    PartnerWithdrawal { partner_id: String },
}

fn default_true() -> bool {
    true
}

impl TransactionKind {
    /// Income/expense with the default worker-share flag.
    pub fn income() -> Self {
        TransactionKind::Income {
            include_in_worker_share: true,
        }
    }

    pub fn expense() -> Self {
        TransactionKind::Expense {
            include_in_worker_share: true,
        }
    }
}

/// Tag-only view of a transaction kind, for filtering and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Income,
    Expense,
    WorkerAdvance,
    PartnerContribution,
    PartnerWithdrawal,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
            TransactionType::WorkerAdvance => "WORKER_ADVANCE",
            TransactionType::PartnerContribution => "PARTNER_CONTRIBUTION",
            TransactionType::PartnerWithdrawal => "PARTNER_WITHDRAWAL",
        }
    }

    /// Which category group labels for this kind are drawn from.
    pub fn category_group(self) -> CategoryGroup {
        match self {
            TransactionType::Income => CategoryGroup::Income,
            TransactionType::Expense => CategoryGroup::Expense,
            TransactionType::WorkerAdvance => CategoryGroup::WorkerAdvance,
            TransactionType::PartnerContribution | TransactionType::PartnerWithdrawal => {
                CategoryGroup::Partner
            }
        }
    }
}

/// A single cash movement. `amount` is always positive; direction is derived
/// from the kind, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(flatten)]
    pub kind: TransactionKind,
    #[serde(flatten)]
    pub payment_source: PaymentSource,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub season_id: String,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        amount: f64,
        kind: TransactionKind,
        payment_source: PaymentSource,
        category: impl Into<String>,
        season_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            amount,
            kind,
            payment_source,
            category: category.into(),
            description: String::new(),
            season_id: season_id.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self.kind {
            TransactionKind::Income { .. } => TransactionType::Income,
            TransactionKind::Expense { .. } => TransactionType::Expense,
            TransactionKind::WorkerAdvance { .. } => TransactionType::WorkerAdvance,
            TransactionKind::PartnerContribution { .. } => TransactionType::PartnerContribution,
            TransactionKind::PartnerWithdrawal { .. } => TransactionType::PartnerWithdrawal,
        }
    }

    pub fn worker_id(&self) -> Option<&str> {
        match &self.kind {
            TransactionKind::WorkerAdvance { worker_id } => Some(worker_id),
            _ => None,
        }
    }

    pub fn partner_id(&self) -> Option<&str> {
        match &self.kind {
            TransactionKind::PartnerContribution { partner_id }
            | TransactionKind::PartnerWithdrawal { partner_id } => Some(partner_id),
            _ => None,
        }
    }

    pub fn payer_partner_id(&self) -> Option<&str> {
        match &self.payment_source {
            PaymentSource::Partner { payer_partner_id } => Some(payer_partner_id),
            _ => None,
        }
    }
}

/// Upgrade a raw stored record to the current shape in place.
///
/// Books written before payment sources existed carried a `mode` field
/// (`"BANK"` or `"CASH"`); everything else defaults to farm cash.
pub fn upgrade_legacy_record(record: &mut Value) {
    if let Value::Object(map) = record {
        if !map.contains_key("paymentSource") {
            let source = match map.get("mode").and_then(Value::as_str) {
                Some("BANK") => "FARM_BANK",
                _ => "FARM_CASH",
            };
            map.insert("paymentSource".to_string(), Value::String(source.to_string()));
        }
    }
}

/// Deserialize raw transaction records, applying the legacy upgrade first.
/// Used on both snapshot load and backup merge.
pub fn transactions_from_values(records: Vec<Value>) -> serde_json::Result<Vec<Transaction>> {
    records
        .into_iter()
        .map(|mut record| {
            upgrade_legacy_record(&mut record);
            serde_json::from_value(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_flat_record_round_trip() {
        let t = Transaction::new(
            "t1",
            date("2025-06-10"),
            500.0,
            TransactionKind::WorkerAdvance {
                worker_id: "w1".to_string(),
            },
            PaymentSource::Partner {
                payer_partner_id: "p2".to_string(),
            },
            "Grocery",
            "s1",
        )
        .with_description("advance for festival");

        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["type"], "WORKER_ADVANCE");
        assert_eq!(value["workerId"], "w1");
        assert_eq!(value["paymentSource"], "PARTNER");
        assert_eq!(value["payerPartnerId"], "p2");
        assert_eq!(value["seasonId"], "s1");

        let back: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_worker_share_flag_defaults_to_true() {
        let t: Transaction = serde_json::from_value(json!({
            "id": "t1",
            "date": "2025-02-01",
            "amount": 1000.0,
            "type": "INCOME",
            "paymentSource": "FARM_CASH",
            "category": "Crop Sale",
            "seasonId": "s1"
        }))
        .unwrap();

        assert_eq!(
            t.kind,
            TransactionKind::Income {
                include_in_worker_share: true
            }
        );
        assert_eq!(t.description, "");
    }

    #[test]
    fn test_legacy_mode_record_upgrades() {
        let raw = vec![
            json!({
                "id": "old1",
                "date": "2024-11-03",
                "amount": 700.0,
                "type": "EXPENSE",
                "mode": "BANK",
                "category": "Seeds",
                "seasonId": "s1"
            }),
            json!({
                "id": "old2",
                "date": "2024-11-04",
                "amount": 80.0,
                "type": "EXPENSE",
                "category": "Diesel/Fuel",
                "seasonId": "s1"
            }),
        ];

        let txns = transactions_from_values(raw).unwrap();
        assert_eq!(txns[0].payment_source, PaymentSource::FarmBank);
        assert_eq!(txns[1].payment_source, PaymentSource::FarmCash);
    }

    #[test]
    fn test_upgrade_leaves_current_records_alone() {
        let mut raw = json!({
            "id": "t1",
            "paymentSource": "PARTNER",
            "payerPartnerId": "p1",
            "mode": "BANK"
        });
        upgrade_legacy_record(&mut raw);
        assert_eq!(raw["paymentSource"], "PARTNER");
    }
}
