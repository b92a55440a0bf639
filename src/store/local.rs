//! Store backed by a directory on a mounted file system

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use walkdir::WalkDir;

use super::RemoteStore;
use crate::core::error::TransferError;

/// Directory whose regular files are the store's entries
#[derive(Debug, Clone)]
pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    /// Open a store rooted at an existing directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, TransferError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(TransferError::new(
                root.display().to_string(),
                io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            ));
        }
        Ok(Self { root })
    }

    /// Resolve an entry name, refusing anything that escapes the root
    fn entry_path(&self, name: &str) -> Result<PathBuf, TransferError> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\'])
            && !name.contains("..");
        if plain {
            Ok(self.root.join(name))
        } else {
            Err(TransferError::new(
                name,
                io::Error::new(io::ErrorKind::InvalidInput, "entry names must be plain file names"),
            ))
        }
    }
}

impl RemoteStore for LocalDirStore {
    fn list(&mut self) -> Result<Vec<String>, TransferError> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                TransferError::new(self.root.display().to_string(), io::Error::other(e))
            })?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        Ok(names)
    }

    fn fetch(&mut self, name: &str) -> Result<Vec<u8>, TransferError> {
        let path = self.entry_path(name)?;
        let bytes = fs::read(&path).map_err(|e| TransferError::new(name, e))?;
        tracing::info!("Fetched {} ({} bytes)", name, bytes.len());
        Ok(bytes)
    }

    fn store(&mut self, name: &str, content: &[u8]) -> Result<(), TransferError> {
        let path = self.entry_path(name)?;
        let staging = self.root.join(format!(".{name}.part"));

        let written = fs::write(&staging, content).and_then(|()| fs::rename(&staging, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&staging);
            return Err(TransferError::new(name, e));
        }

        tracing::info!("Stored {} ({} bytes)", name, content.len());
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), TransferError> {
        let path = self.entry_path(name)?;
        fs::remove_file(&path).map_err(|e| TransferError::new(name, e))?;
        tracing::info!("Deleted {}", name);
        Ok(())
    }

    fn run_command(&mut self, cmd: &str) -> Result<(), TransferError> {
        #[cfg(windows)]
        let output = Command::new("cmd")
            .args(["/C", cmd])
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output();

        #[cfg(not(windows))]
        let output = Command::new("sh")
            .args(["-c", cmd])
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output();

        let output = output.map_err(|e| TransferError::new(cmd, e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransferError::new(
                cmd,
                io::Error::other(format!("{}: {}", output.status, stderr.trim())),
            ));
        }

        tracing::info!("Ran `{}` in {}", cmd, self.root.display());
        Ok(())
    }
}
