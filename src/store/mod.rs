//! Byte-oriented access to the directory holding the articles

pub mod local;
#[cfg(test)]
pub mod memory;

pub use local::LocalDirStore;

use crate::core::error::TransferError;

/// Remote file service the editor reads from and writes to.
///
/// Every call takes `&mut self`, so at most one transfer is in flight per store.
pub trait RemoteStore {
    /// Names of all entries in the store's directory
    fn list(&mut self) -> Result<Vec<String>, TransferError>;

    fn fetch(&mut self, name: &str) -> Result<Vec<u8>, TransferError>;

    /// Replace (or create) an entry
    fn store(&mut self, name: &str, content: &[u8]) -> Result<(), TransferError>;

    fn delete(&mut self, name: &str) -> Result<(), TransferError>;

    /// Run a shell command next to the entries
    fn run_command(&mut self, cmd: &str) -> Result<(), TransferError>;
}
