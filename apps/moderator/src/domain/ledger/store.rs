use super::Ledger;
use crate::domain::errors::LedgerError;
use async_trait::async_trait;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Reads the persisted ledger. Absent state yields an empty ledger.
    async fn load(&self) -> Result<Ledger, LedgerError>;

    /// Overwrites the persisted ledger with `ledger`.
    async fn save(&self, ledger: &Ledger) -> Result<(), LedgerError>;
}
