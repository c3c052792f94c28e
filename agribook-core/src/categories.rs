//! Free-text category labels, grouped by the kind of transaction they describe.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryGroup {
    Income,
    Expense,
    WorkerAdvance,
    Partner,
}

impl CategoryGroup {
    pub const ALL: [CategoryGroup; 4] = [
        CategoryGroup::Income,
        CategoryGroup::Expense,
        CategoryGroup::WorkerAdvance,
        CategoryGroup::Partner,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CategoryGroup::Income => "INCOME",
            CategoryGroup::Expense => "EXPENSE",
            CategoryGroup::WorkerAdvance => "WORKER_ADVANCE",
            CategoryGroup::Partner => "PARTNER",
        }
    }
}

/// Ordered label lists per group. Labels are only ever appended; duplicates
/// are rejected case-insensitively after trimming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMap {
    #[serde(rename = "INCOME", default)]
    pub income: Vec<String>,
    #[serde(rename = "EXPENSE", default)]
    pub expense: Vec<String>,
    #[serde(rename = "WORKER_ADVANCE", default)]
    pub worker_advance: Vec<String>,
    #[serde(rename = "PARTNER", default)]
    pub partner: Vec<String>,
}

impl Default for CategoryMap {
    fn default() -> Self {
        let labels = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            income: labels(&["Crop Sale", "By-product Sale", "Subsidy", "Other Income"]),
            expense: labels(&[
                "Seeds",
                "Fertilizer",
                "Pesticides",
                "Diesel/Fuel",
                "Machinery Rent",
                "Labor Wages",
                "Repair",
                "Other Expense",
            ]),
            worker_advance: labels(&["Grocery", "Medical", "Personal Loan", "Other"]),
            partner: labels(&["Capital Injection", "Personal Withdrawal"]),
        }
    }
}

fn norm(label: &str) -> String {
    label.trim().to_lowercase()
}

impl CategoryMap {
    pub fn group(&self, group: CategoryGroup) -> &[String] {
        match group {
            CategoryGroup::Income => &self.income,
            CategoryGroup::Expense => &self.expense,
            CategoryGroup::WorkerAdvance => &self.worker_advance,
            CategoryGroup::Partner => &self.partner,
        }
    }

    fn group_mut(&mut self, group: CategoryGroup) -> &mut Vec<String> {
        match group {
            CategoryGroup::Income => &mut self.income,
            CategoryGroup::Expense => &mut self.expense,
            CategoryGroup::WorkerAdvance => &mut self.worker_advance,
            CategoryGroup::Partner => &mut self.partner,
        }
    }

    pub fn contains(&self, group: CategoryGroup, label: &str) -> bool {
        let key = norm(label);
        self.group(group).iter().any(|c| norm(c) == key)
    }

    /// Append a label; returns false if it already exists under
    /// case-insensitive trimmed comparison.
    pub fn add(&mut self, group: CategoryGroup, label: &str) -> bool {
        if self.contains(group, label) {
            return false;
        }
        self.group_mut(group).push(label.trim().to_string());
        true
    }

    /// Case-insensitive set union per group: existing order kept, new labels
    /// appended at the end.
    pub fn merge(&mut self, incoming: &CategoryMap) {
        for group in CategoryGroup::ALL {
            let labels: Vec<String> = incoming.group(group).to_vec();
            for label in labels {
                self.add(group, &label);
            }
        }
    }

    /// Union from a raw backup `categories` object. Groups that are missing
    /// or not arrays are skipped; non-string entries are skipped.
    pub fn merge_raw(&mut self, raw: &Value) {
        for group in CategoryGroup::ALL {
            let Some(labels) = raw.get(group.key()).and_then(Value::as_array) else {
                continue;
            };
            for label in labels.iter().filter_map(Value::as_str) {
                self.add(group, label);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_rejects_case_insensitive_duplicate() {
        let mut cats = CategoryMap::default();
        assert!(!cats.add(CategoryGroup::Expense, "  seeds "));
        assert!(cats.add(CategoryGroup::Expense, "Tractor EMI"));
        assert_eq!(cats.expense.last().unwrap(), "Tractor EMI");
    }

    #[test]
    fn test_merge_keeps_order_and_appends_new() {
        let mut current = CategoryMap::default();
        let mut incoming = CategoryMap::default();
        incoming.add(CategoryGroup::Income, "Honey Sale");
        incoming.add(CategoryGroup::Income, "CROP SALE");

        let before = current.income.clone();
        current.merge(&incoming);

        assert_eq!(&current.income[..before.len()], &before[..]);
        assert_eq!(current.income.last().unwrap(), "Honey Sale");
        assert_eq!(
            current
                .income
                .iter()
                .filter(|c| c.to_lowercase() == "crop sale")
                .count(),
            1
        );
    }

    #[test]
    fn test_merge_raw_tolerates_junk_groups() {
        let mut cats = CategoryMap::default();
        cats.merge_raw(&json!({
            "INCOME": ["Crop Sale", "Lease Income", 42],
            "EXPENSE": "not-an-array"
        }));
        assert!(cats.contains(CategoryGroup::Income, "Lease Income"));
        assert_eq!(cats.expense, CategoryMap::default().expense);
    }
}
