pub mod budget;
pub mod preferences;
pub mod recurring_transaction;
pub mod sync_state;
pub mod transaction;

pub use budget::Entity as Budget;
pub use preferences::Entity as Preferences;
pub use recurring_transaction::Entity as RecurringTransaction;
pub use sync_state::Entity as SyncState;
pub use transaction::Entity as Transaction;
