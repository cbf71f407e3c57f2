use super::{Directory, FetchRequest};
use crate::error::Result;
use crate::model::RawEntry;

/// A directory holding its entries in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    entries: Vec<RawEntry>,
}

impl InMemoryDirectory {
    pub fn new(entries: Vec<RawEntry>) -> Self {
        Self { entries }
    }

    pub fn with_entry(mut self, entry: RawEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Directory for InMemoryDirectory {
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| request.selects(entry))
            .cloned()
            .collect())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::directory::ldif;

    const SERVICES_LDIF: &str = include_str!("../../../tests/data/services.ldif");
    const STORAGE_ELEMENT_LDIF: &str = include_str!("../../../tests/data/storage_element.ldif");

    /// Every entry of the four-service fixture, in source order.
    pub fn legacy_services() -> Vec<RawEntry> {
        ldif::parse(SERVICES_LDIF)
    }

    pub fn legacy_directory() -> InMemoryDirectory {
        InMemoryDirectory::new(legacy_services())
    }

    /// One service `se_1` with an SRM and a GridFTP endpoint, one policy each.
    pub fn storage_element() -> Vec<RawEntry> {
        ldif::parse(STORAGE_ELEMENT_LDIF)
    }
}
