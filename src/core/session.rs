//! The open article and its round trips to the store

use chrono::Utc;

use crate::store::RemoteStore;

use super::catalog::DocumentCatalog;
use super::document::{Buffer, DocumentId, Skeleton};
use super::error::SessionError;

/// Category given to newly created articles
pub const DEFAULT_CATEGORY: &str = "General";

/// Current time as an RFC 2822 date, the format articles carry
pub fn rfc2822_now() -> String {
    Utc::now().to_rfc2822()
}

/// Document currently being edited
#[derive(Debug, Clone)]
pub struct ActiveDocument {
    pub id: DocumentId,
    pub buffer: Buffer,
}

/// Owns the store, the catalog and the single live buffer
#[derive(Debug)]
pub struct EditSession<S> {
    store: S,
    catalog: DocumentCatalog,
    active: Option<ActiveDocument>,
    default_category: String,
}

impl<S: RemoteStore> EditSession<S> {
    /// Start a session by listing the store
    pub fn start(mut store: S) -> Result<Self, SessionError> {
        let catalog = DocumentCatalog::from_store(&mut store)?;
        Ok(Self {
            store,
            catalog,
            active: None,
            default_category: DEFAULT_CATEGORY.to_string(),
        })
    }

    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }

    pub fn catalog(&self) -> &DocumentCatalog {
        &self.catalog
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn active(&self) -> Option<&ActiveDocument> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<&DocumentId> {
        self.active.as_ref().map(|doc| &doc.id)
    }

    pub fn buffer(&self) -> Option<&Buffer> {
        self.active.as_ref().map(|doc| &doc.buffer)
    }

    pub fn buffer_mut(&mut self) -> Result<&mut Buffer, SessionError> {
        self.active
            .as_mut()
            .map(|doc| &mut doc.buffer)
            .ok_or(SessionError::NoActiveDocument)
    }

    /// Fetch a document and make it the active buffer, caret at the start.
    /// On failure the previous buffer stays active.
    pub fn open(&mut self, id: &DocumentId) -> Result<&Buffer, SessionError> {
        let bytes = self.store.fetch(id.as_str())?;
        let text = String::from_utf8(bytes).map_err(|source| SessionError::Decode {
            id: id.clone(),
            source,
        })?;

        tracing::info!("Opened {}", id);
        let doc = self.active.insert(ActiveDocument {
            id: id.clone(),
            buffer: Buffer::new(text),
        });
        Ok(&doc.buffer)
    }

    /// Open the document at a catalog position
    pub fn open_index(&mut self, index: usize) -> Result<&Buffer, SessionError> {
        if self.catalog.is_empty() {
            return Err(SessionError::EmptyCatalog);
        }
        let id = self
            .catalog
            .get(index)
            .cloned()
            .ok_or(SessionError::NoSuchIndex(index))?;
        self.open(&id)
    }

    /// Open the first catalog entry, or report that none are left
    pub fn reopen_first(&mut self) -> Result<&Buffer, SessionError> {
        self.open_index(0)
    }

    /// Write the active buffer back to the store
    pub fn save(&mut self) -> Result<(), SessionError> {
        let doc = self.active.as_ref().ok_or(SessionError::NoActiveDocument)?;
        self.store
            .store(doc.id.as_str(), doc.buffer.text().as_bytes())?;
        tracing::info!("Saved {}", doc.id);
        Ok(())
    }

    /// Persist after a line break was committed
    pub fn autosave_on_newline(&mut self) -> Result<(), SessionError> {
        self.save()
    }

    /// Allocate an id for `title`, write a fresh skeleton and open it with the
    /// caret inside `<html>`.
    ///
    /// If the initial write fails the id stays allocated in the catalog.
    pub fn create(&mut self, title: &str) -> Result<DocumentId, SessionError> {
        let id = self.catalog.allocate(title);
        let skeleton = Skeleton::new(title, &rfc2822_now(), &self.default_category);

        let mut buffer = Buffer::new(skeleton.text);
        buffer.set_caret(skeleton.body_offset);
        self.active = Some(ActiveDocument {
            id: id.clone(),
            buffer,
        });

        self.save()?;
        tracing::info!("Created {}", id);
        Ok(id)
    }

    /// Remove a document from the store, then from the catalog. Deleting the
    /// active document leaves no buffer open; follow up with
    /// [`reopen_first`](Self::reopen_first).
    pub fn delete(&mut self, id: &DocumentId) -> Result<(), SessionError> {
        if !self.catalog.contains(id) {
            return Err(SessionError::NotFound(id.clone()));
        }
        self.store.delete(id.as_str())?;
        self.catalog.remove(id)?;

        if self.active_id() == Some(id) {
            self.active = None;
        }
        tracing::info!("Deleted {}, {} documents left", id, self.catalog.len());
        Ok(())
    }

    /// Insert the current date at the caret
    pub fn insert_date(&mut self) -> Result<(), SessionError> {
        let date = rfc2822_now();
        self.buffer_mut()?.insert(&date);
        Ok(())
    }

    /// Run the store-side regeneration command
    pub fn regenerate(&mut self, cmd: &str) -> Result<(), SessionError> {
        self.store.run_command(cmd)?;
        tracing::info!("Regeneration triggered");
        Ok(())
    }

    /// Re-list the store and mirror it in the catalog
    pub fn refresh(&mut self) -> Result<(), SessionError> {
        let listing = self.store.list().map_err(SessionError::Listing)?;
        self.catalog.refresh(listing);
        Ok(())
    }
}
