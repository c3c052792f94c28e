//! agribook-core: pure derivation and settlement engine for farm
//! partnership books.
//!
//! Everything in this crate is synchronous and deterministic: callers hand
//! in fully materialized entity collections and read back derived values.
//! Persistence and file I/O live in the outer crates.

pub mod categories;
pub mod distribution;
pub mod filter;
pub mod financials;
pub mod merge;
pub mod people;
pub mod season;
pub mod settlement;
pub mod store;
pub mod transaction;

pub use categories::{CategoryGroup, CategoryMap};
pub use distribution::{ShareDetails, distribute_profit};
pub use filter::{FilteredTotals, TransactionFilter, filter_transactions, filtered_totals};
pub use financials::{Financials, derive_financials};
pub use merge::merge_by_id;
pub use people::{Partner, Worker};
pub use season::{Season, SeasonStatus};
pub use settlement::{SeasonSettlement, WORKER_SHARE_RATE, settle_season};
pub use store::{PartnerStatement, Store, StoreError};
pub use transaction::{
    PaymentSource, Transaction, TransactionKind, TransactionType, transactions_from_values,
    upgrade_legacy_record,
};
