//! In-memory store for tests

use std::collections::BTreeMap;
use std::io;

use super::RemoteStore;
use crate::core::error::TransferError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
    offline: bool,
    commands: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, text)| (name.to_string(), text.as_bytes().to_vec()))
                .collect(),
            ..Self::default()
        }
    }

    /// Make every call fail as if the connection dropped
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    fn connected(&self, name: &str) -> Result<(), TransferError> {
        if self.offline {
            Err(TransferError::new(
                name,
                io::Error::new(io::ErrorKind::NotConnected, "connection lost"),
            ))
        } else {
            Ok(())
        }
    }

    fn missing(name: &str) -> TransferError {
        TransferError::new(name, io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

impl RemoteStore for MemoryStore {
    fn list(&mut self) -> Result<Vec<String>, TransferError> {
        self.connected(".")?;
        Ok(self.entries.keys().cloned().collect())
    }

    fn fetch(&mut self, name: &str) -> Result<Vec<u8>, TransferError> {
        self.connected(name)?;
        self.entries.get(name).cloned().ok_or_else(|| Self::missing(name))
    }

    fn store(&mut self, name: &str, content: &[u8]) -> Result<(), TransferError> {
        self.connected(name)?;
        self.entries.insert(name.to_string(), content.to_vec());
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), TransferError> {
        self.connected(name)?;
        self.entries
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Self::missing(name))
    }

    fn run_command(&mut self, cmd: &str) -> Result<(), TransferError> {
        self.connected(cmd)?;
        self.commands.push(cmd.to_string());
        Ok(())
    }
}
