//! Building backup documents for exchange between devices.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use agribook_core::Store;

use crate::document::{BACKUP_VERSION, BackupDocument, BackupError};

/// Everything in one document: the normal device-to-device backup.
pub fn full_backup(store: &Store, exported_at: DateTime<Utc>) -> Result<BackupDocument, BackupError> {
    Ok(BackupDocument {
        transactions: Some(collection(&store.transactions)?),
        workers: Some(collection(&store.workers)?),
        partners: Some(collection(&store.partners)?),
        seasons: Some(collection(&store.seasons)?),
        season: None,
        categories: Some(collection(&store.categories)?),
        meta: Some(meta(exported_at, None)),
    })
}

/// One season and its transactions, with the shared reference collections.
/// Keeps the singular `season` key these exports have always used.
pub fn season_backup(
    store: &Store,
    season_id: &str,
    exported_at: DateTime<Utc>,
) -> Result<BackupDocument, BackupError> {
    let season = store
        .season(season_id)
        .ok_or_else(|| BackupError::UnknownSeason(season_id.to_string()))?;

    Ok(BackupDocument {
        transactions: Some(collection(&store.transactions_for_season(season_id))?),
        workers: Some(collection(&store.workers)?),
        partners: Some(collection(&store.partners)?),
        seasons: None,
        season: Some(collection(season)?),
        categories: Some(collection(&store.categories)?),
        meta: Some(meta(exported_at, Some("SEASON_EXPORT"))),
    })
}

pub fn full_backup_file_name(on: NaiveDate) -> String {
    format!("AgriBook_Full_Backup_{}.json", on.format("%Y-%m-%d"))
}

pub fn season_backup_file_name(season_name: &str) -> String {
    let name: Vec<&str> = season_name.split_whitespace().collect();
    format!("AgriBook_{}_Backup.json", name.join("_"))
}

fn collection<T: Serialize>(value: &T) -> Result<Value, BackupError> {
    serde_json::to_value(value).map_err(BackupError::InvalidJson)
}

fn meta(exported_at: DateTime<Utc>, kind: Option<&str>) -> Value {
    let mut meta = json!({
        "exportDate": exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "version": BACKUP_VERSION,
    });
    if let Some(kind) = kind {
        meta["type"] = Value::String(kind.to_string());
    }
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let on: NaiveDate = "2026-08-05".parse().unwrap();
        assert_eq!(full_backup_file_name(on), "AgriBook_Full_Backup_2026-08-05.json");
        assert_eq!(
            season_backup_file_name("Potato  Season 2025"),
            "AgriBook_Potato_Season_2025_Backup.json"
        );
    }
}
