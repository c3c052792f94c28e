use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use agribook_core::{CategoryMap, Store, transactions_from_values};

pub fn agribook_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("AGRIBOOK_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".agribook"))
}

pub fn ensure_agribook_home() -> Result<PathBuf> {
    let dir = agribook_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(value))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Load the five persisted blobs. Missing files mean a fresh book; raw
/// transaction records pass through the legacy upgrade on the way in.
pub fn load_store(dir: &Path) -> Result<Store> {
    let seasons = read_json(&dir.join("seasons.json"))?.unwrap_or_default();
    let partners = read_json(&dir.join("partners.json"))?.unwrap_or_default();
    let workers = read_json(&dir.join("workers.json"))?.unwrap_or_default();
    let categories: CategoryMap =
        read_json(&dir.join("categories.json"))?.unwrap_or_default();
    let transactions = match read_json::<Vec<Value>>(&dir.join("transactions.json"))? {
        Some(raw) => transactions_from_values(raw).context("parse transactions.json")?,
        None => Vec::new(),
    };

    Ok(Store {
        seasons,
        partners,
        workers,
        transactions,
        categories,
    })
}

pub fn save_store(dir: &Path, store: &Store) -> Result<()> {
    write_json(&dir.join("seasons.json"), &store.seasons)?;
    write_json(&dir.join("partners.json"), &store.partners)?;
    write_json(&dir.join("workers.json"), &store.workers)?;
    write_json(&dir.join("transactions.json"), &store.transactions)?;
    write_json(&dir.join("categories.json"), &store.categories)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agribook_core::{PaymentSource, Partner, Season, Transaction, TransactionKind};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("agribook-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_store_round_trip() {
        let dir = temp_dir("roundtrip");

        let mut store = Store::default();
        store.add_season(Season::open("s1", "Kharif 2025", date("2025-06-01")));
        store.add_partner(Partner::new("p1", "Girish", date("2025-01-01")));
        store
            .add_transaction(Transaction::new(
                "t1",
                date("2025-06-10"),
                1000.0,
                TransactionKind::income(),
                PaymentSource::FarmBank,
                "Crop Sale",
                "s1",
            ))
            .unwrap();

        save_store(&dir, &store).unwrap();
        let loaded = load_store(&dir).unwrap();
        assert_eq!(loaded, store);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_files_mean_fresh_book() {
        let dir = temp_dir("fresh");
        let store = load_store(&dir).unwrap();
        assert!(store.transactions.is_empty());
        assert_eq!(store.categories, CategoryMap::default());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_legacy_mode_records_upgrade_on_load() {
        let dir = temp_dir("legacy");
        fs::write(
            dir.join("transactions.json"),
            r#"[{"id": "t1", "date": "2024-10-01", "amount": 90.0, "type": "EXPENSE",
                 "mode": "BANK", "category": "Repair", "seasonId": "s1"}]"#,
        )
        .unwrap();

        let store = load_store(&dir).unwrap();
        assert_eq!(store.transactions[0].payment_source, PaymentSource::FarmBank);

        fs::remove_dir_all(&dir).unwrap();
    }
}
