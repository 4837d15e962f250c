pub mod json_backend;

use crate::{errors::LedgerError, ledger::Ledger};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over where the ledger lives between runs.
pub trait StorageBackend {
    /// Loads the ledger; a store that has never been written yields an empty ledger.
    fn load(&self) -> Result<Ledger>;
    fn save(&self, ledger: &Ledger) -> Result<()>;
}

pub use json_backend::{load_ledger_from_path, save_ledger_to_path, JsonStorage};
