//! The backup document shape shared by full and season exports.
//!
//! Fields stay raw `Value`s on purpose: backups come from other devices and
//! other app versions, and the merge path must tolerate partial records and
//! the legacy singular-`season` exports.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const BACKUP_VERSION: &str = "1.4";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("not a recognizable backup: no transactions, workers, or seasons found")]
    NotABackup,
    #[error("backup {collection} do not fit the current record shape: {source}")]
    MalformedCollection {
        collection: &'static str,
        source: serde_json::Error,
    },
    #[error("unknown season: {0}")]
    UnknownSeason(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partners: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Value>,
    /// Legacy single-season exports carry `season` instead of `seasons`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

fn array_of(field: &Option<Value>) -> &[Value] {
    field
        .as_ref()
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

impl BackupDocument {
    pub fn transactions(&self) -> &[Value] {
        array_of(&self.transactions)
    }

    pub fn workers(&self) -> &[Value] {
        array_of(&self.workers)
    }

    pub fn partners(&self) -> &[Value] {
        array_of(&self.partners)
    }

    pub fn seasons(&self) -> &[Value] {
        array_of(&self.seasons)
    }

    /// A candidate file must carry at least one recognizable collection:
    /// a non-empty transactions or workers array, or any seasons/season
    /// field. Anything else is rejected before a merge is attempted.
    pub fn is_acceptable(&self) -> bool {
        !self.transactions().is_empty()
            || !self.workers().is_empty()
            || self.seasons.as_ref().is_some_and(|v| !v.is_null())
            || self.season.as_ref().is_some_and(|v| !v.is_null())
    }

    /// Lift a legacy singular `season` into the `seasons` array.
    pub fn normalize(&mut self) {
        if self.seasons.is_none() {
            if let Some(season) = self.season.take() {
                self.seasons = Some(Value::Array(vec![season]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_acceptance_rules() {
        let empty: BackupDocument = serde_json::from_value(json!({})).unwrap();
        assert!(!empty.is_acceptable());

        let empty_arrays: BackupDocument =
            serde_json::from_value(json!({"transactions": [], "workers": []})).unwrap();
        assert!(!empty_arrays.is_acceptable());

        let null_seasons: BackupDocument =
            serde_json::from_value(json!({"seasons": null})).unwrap();
        assert!(!null_seasons.is_acceptable());

        let season_only: BackupDocument =
            serde_json::from_value(json!({"season": {"id": "s1"}})).unwrap();
        assert!(season_only.is_acceptable());

        let txns_only: BackupDocument =
            serde_json::from_value(json!({"transactions": [{"id": "t1"}]})).unwrap();
        assert!(txns_only.is_acceptable());
    }

    #[test]
    fn test_normalize_lifts_singular_season() {
        let mut doc: BackupDocument =
            serde_json::from_value(json!({"season": {"id": "s1", "name": "Kharif"}})).unwrap();
        doc.normalize();
        assert_eq!(doc.seasons().len(), 1);
        assert_eq!(doc.seasons()[0]["id"], "s1");
        assert!(doc.season.is_none());
    }

    #[test]
    fn test_normalize_prefers_existing_seasons_array() {
        let mut doc: BackupDocument = serde_json::from_value(json!({
            "seasons": [{"id": "s1"}],
            "season": {"id": "s2"}
        }))
        .unwrap();
        doc.normalize();
        assert_eq!(doc.seasons().len(), 1);
        assert_eq!(doc.seasons()[0]["id"], "s1");
    }
}
