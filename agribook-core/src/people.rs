//! Capital partners and farm workers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A capital partner. Partners are never deleted; transactions reference them
/// as a direct contribution/withdrawal target or as a pocket payer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub joined_date: NaiveDate,
}

impl Partner {
    pub fn new(id: impl Into<String>, name: impl Into<String>, joined_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: String::new(),
            joined_date,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }
}

/// A farm worker. Deletable only while no advance references them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub joined_date: NaiveDate,
}

impl Worker {
    pub fn new(id: impl Into<String>, name: impl Into<String>, joined_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: String::new(),
            joined_date,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }
}
