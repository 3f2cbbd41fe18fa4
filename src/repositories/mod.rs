//! Repository layer for database operations.
//!
//! This module provides repository structs that encapsulate database queries
//! and operations, following the Data Mapper pattern recommended by SeaORM.
//! Repositories keep entities as pure data models while providing reusable
//! database access methods.

pub mod budget;
pub mod preferences;
pub mod recurring_transaction;
pub mod sync_state;
pub mod transaction;

pub use budget::BudgetRepository;
pub use preferences::PreferencesRepository;
pub use recurring_transaction::RecurringTransactionRepository;
pub use sync_state::SyncStateRepository;
pub use transaction::TransactionRepository;
