//! Ordered catalog of the articles on the remote store

use crate::store::RemoteStore;

use super::document::DocumentId;
use super::error::SessionError;

/// Known document identifiers and the sequence counter for new ones
#[derive(Debug, Clone, Default)]
pub struct DocumentCatalog {
    ids: Vec<DocumentId>,
    next_seq: usize,
}

impl DocumentCatalog {
    /// Build the catalog from a remote listing. Entries without the article
    /// extension are dropped; the counter starts at the number of articles.
    pub fn initialize<I, S>(listing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = Self::mirror(listing);
        let next_seq = ids.len();
        tracing::info!("Catalog holds {} documents", ids.len());
        let catalog = Self { ids, next_seq };
        catalog.audit();
        catalog
    }

    /// List the store and build the catalog from it
    pub fn from_store(store: &mut impl RemoteStore) -> Result<Self, SessionError> {
        let listing = store.list().map_err(SessionError::Listing)?;
        Ok(Self::initialize(listing))
    }

    fn mirror<I, S>(listing: I) -> Vec<DocumentId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<_> = listing.into_iter().filter_map(DocumentId::new).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Reserve a new identifier for `title` and append it to the catalog
    pub fn allocate(&mut self, title: &str) -> DocumentId {
        let id = DocumentId::allocate(self.next_seq, title);
        self.next_seq += 1;
        self.ids.push(id.clone());
        tracing::info!("Allocated {}", id);
        id
    }

    /// Drop an identifier. The counter is left alone.
    pub fn remove(&mut self, id: &DocumentId) -> Result<(), SessionError> {
        let index = self
            .position(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        self.ids.remove(index);
        tracing::info!("Removed {} from catalog", id);
        Ok(())
    }

    /// Replace the entries with a fresh listing, keeping the counter monotonic
    pub fn refresh<I, S>(&mut self, listing: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = Self::mirror(listing);
        self.next_seq = self.next_seq.max(self.ids.len());
        tracing::info!("Catalog refreshed: {} documents", self.ids.len());
        self.audit();
    }

    /// Entries whose sequence prefix the counter has not passed yet. A later
    /// allocation may reuse their number.
    pub fn ahead_of_counter(&self) -> Vec<&DocumentId> {
        self.ids
            .iter()
            .filter(|id| id.sequence().is_some_and(|seq| seq >= self.next_seq))
            .collect()
    }

    fn audit(&self) {
        for id in self.ids.iter().filter(|id| !id.is_canonical()) {
            tracing::warn!("{} does not follow the NN-word.xml naming", id);
        }
        for id in self.ahead_of_counter() {
            tracing::warn!("{} is numbered at or past the next sequence {}", id, self.next_seq);
        }
    }

    pub fn list(&self) -> &[DocumentId] {
        &self.ids
    }

    pub fn get(&self, index: usize) -> Option<&DocumentId> {
        self.ids.get(index)
    }

    pub fn position(&self, id: &DocumentId) -> Option<usize> {
        self.ids.iter().position(|known| known == id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sequence number the next allocation will use
    #[cfg(test)]
    pub fn next_sequence(&self) -> usize {
        self.next_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn id(name: &str) -> DocumentId {
        DocumentId::new(name).unwrap()
    }

    #[test]
    fn test_initialize_filters_and_sorts() {
        let catalog = DocumentCatalog::initialize(["01-b.xml", "readme.md", "00-a.xml", "gen.py"]);
        assert_eq!(catalog.list(), &[id("00-a.xml"), id("01-b.xml")]);
        assert_eq!(catalog.next_sequence(), 2);
    }

    #[test]
    fn test_allocate_appends_distinct_ids() {
        let mut catalog = DocumentCatalog::initialize(["00-a.xml"]);
        let first = catalog.allocate("Same title");
        let second = catalog.allocate("Same title");
        let third = catalog.allocate("Same title");

        assert_eq!(first.as_str(), "01-same.xml");
        assert_eq!(second.as_str(), "02-same.xml");
        assert_ne!(second, third);
        assert_eq!(catalog.list().last(), Some(&third));
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_remove_keeps_counter() {
        let mut catalog = DocumentCatalog::initialize(["00-a.xml", "01-b.xml"]);
        catalog.remove(&id("01-b.xml")).unwrap();
        assert_eq!(catalog.list(), &[id("00-a.xml")]);

        let next = catalog.allocate("c");
        assert_eq!(next.as_str(), "02-c.xml");
    }

    #[test]
    fn test_remove_missing() {
        let mut catalog = DocumentCatalog::initialize(["00-a.xml"]);
        let err = catalog.remove(&id("09-z.xml")).unwrap_err();
        assert!(matches!(err, SessionError::NotFound(missing) if missing == id("09-z.xml")));
    }

    #[test]
    fn test_refresh_never_lowers_counter() {
        let mut catalog = DocumentCatalog::initialize(["00-a.xml", "01-b.xml", "02-c.xml"]);
        catalog.refresh(["00-a.xml"]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.next_sequence(), 3);

        catalog.refresh(["00-a.xml", "01-b.xml", "02-c.xml", "03-d.xml", "04-e.xml"]);
        assert_eq!(catalog.next_sequence(), 5);
    }

    #[test]
    fn test_from_store_listing_error() {
        let mut store = MemoryStore::new();
        store.set_offline(true);
        let err = DocumentCatalog::from_store(&mut store).unwrap_err();
        assert!(matches!(err, SessionError::Listing(_)));
    }

    #[test]
    fn test_ahead_of_counter() {
        let mut catalog = DocumentCatalog::initialize(["00-a.xml", "07-late.xml", "notes.xml"]);
        assert_eq!(catalog.next_sequence(), 3);
        assert_eq!(catalog.ahead_of_counter(), vec![&id("07-late.xml")]);

        catalog.allocate("b");
        assert_eq!(catalog.ahead_of_counter(), vec![&id("07-late.xml")]);

        catalog.refresh(["00-a.xml", "01-b.xml", "02-c.xml", "03-d.xml", "04-e.xml", "05-f.xml", "06-g.xml", "07-late.xml"]);
        assert!(catalog.ahead_of_counter().is_empty());
    }
}
