//! Backup ingestion: structural validation, then an additive merge into an
//! existing store. Either the whole document merges or none of it does.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use agribook_core::{Store, merge_by_id, transactions_from_values};

use crate::document::{BackupDocument, BackupError};

/// Parse and vet a candidate backup. Malformed JSON and unrecognizable
/// documents are both rejected here, before any merge work starts.
pub fn parse_backup(json: &str) -> Result<BackupDocument, BackupError> {
    let mut doc: BackupDocument = serde_json::from_str(json)?;
    if !doc.is_acceptable() {
        return Err(BackupError::NotABackup);
    }
    doc.normalize();
    Ok(doc)
}

/// Merge a vetted document into `store`, returning the combined store.
/// Existing entries are never deleted; matching ids take the incoming
/// fields; category labels union case-insensitively.
pub fn apply_backup(store: &Store, doc: &BackupDocument) -> Result<Store, BackupError> {
    let seasons = merge_collection(&store.seasons, doc.seasons(), "seasons")?;
    let partners = merge_collection(&store.partners, doc.partners(), "partners")?;
    let workers = merge_collection(&store.workers, doc.workers(), "workers")?;

    let transactions = {
        let current = to_raw(&store.transactions, "transactions")?;
        let merged = merge_by_id(&current, doc.transactions());
        transactions_from_values(merged).map_err(|source| BackupError::MalformedCollection {
            collection: "transactions",
            source,
        })?
    };

    let mut categories = store.categories.clone();
    if let Some(raw) = &doc.categories {
        categories.merge_raw(raw);
    }

    Ok(Store {
        seasons,
        partners,
        workers,
        transactions,
        categories,
    })
}

fn to_raw<T: Serialize>(current: &[T], collection: &'static str) -> Result<Vec<Value>, BackupError> {
    current
        .iter()
        .map(|item| {
            serde_json::to_value(item).map_err(|source| BackupError::MalformedCollection {
                collection,
                source,
            })
        })
        .collect()
}

fn merge_collection<T>(
    current: &[T],
    incoming: &[Value],
    collection: &'static str,
) -> Result<Vec<T>, BackupError>
where
    T: Serialize + DeserializeOwned,
{
    let current_raw = to_raw(current, collection)?;
    merge_by_id(&current_raw, incoming)
        .into_iter()
        .map(|record| {
            serde_json::from_value(record).map_err(|source| BackupError::MalformedCollection {
                collection,
                source,
            })
        })
        .collect()
}
