//! Error types shared by the catalog, the edit session and the stores

use std::io;

use thiserror::Error;

use super::document::DocumentId;

/// A remote transfer failed
#[derive(Debug, Error)]
#[error("transfer of `{name}` failed: {cause}")]
pub struct TransferError {
    /// Entry name (or command) the transfer was about
    pub name: String,
    /// Underlying cause reported by the store
    #[source]
    pub cause: io::Error,
}

impl TransferError {
    pub fn new(name: impl Into<String>, cause: io::Error) -> Self {
        Self {
            name: name.into(),
            cause,
        }
    }

    /// Whether the remote side reported the entry as missing
    #[cfg(test)]
    pub fn is_not_found(&self) -> bool {
        self.cause.kind() == io::ErrorKind::NotFound
    }
}

/// Errors surfaced by [`EditSession`](super::session::EditSession) operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("could not list remote documents: {0}")]
    Listing(#[source] TransferError),

    #[error("document not in catalog: {0}")]
    NotFound(DocumentId),

    #[error("no document named `{0}`")]
    UnknownName(String),

    #[error("no document at position {0}")]
    NoSuchIndex(usize),

    #[error("no documents left; create a new one")]
    EmptyCatalog,

    #[error("no document is open")]
    NoActiveDocument,

    #[error("`{id}` is not valid UTF-8")]
    Decode {
        id: DocumentId,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// The buffer could not be parsed as a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError {
    /// Parser diagnostic
    pub message: String,
    /// Byte offset into the buffer where parsing stopped, when known
    pub position: Option<usize>,
}

impl RenderError {
    pub fn at(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }
}
