//! Seasons: bounded accounting periods (one crop cycle each).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonStatus {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "CLOSED")]
    Closed,
}

/// A season scopes P&L and the worker-share settlement. `end_date` is only
/// set when the season is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: SeasonStatus,
}

impl Season {
    pub fn open(id: impl Into<String>, name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date,
            end_date: None,
            status: SeasonStatus::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == SeasonStatus::Open
    }
}
