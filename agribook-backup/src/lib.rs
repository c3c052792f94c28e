//! agribook-backup: the backup file shape and the merge path that combines
//! two bookkeeping snapshots without losing either side's entries.

pub mod document;
pub mod export;
pub mod import;

pub use document::{BACKUP_VERSION, BackupDocument, BackupError};
pub use export::{full_backup, full_backup_file_name, season_backup, season_backup_file_name};
pub use import::{apply_backup, parse_backup};
