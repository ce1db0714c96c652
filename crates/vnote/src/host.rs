//! Host collaborator traits and an in-memory host for tests.

use crate::error::{Error, Result};
use crate::frontmatter::parse_preamble;
use crate::types::{AssembledVariant, DocumentHandle, StructuralIndex};
use std::collections::BTreeMap;

/// Read access to the documents of a host application.
pub trait DocumentStore {
    /// Look up a leaf document by path. Folders and missing paths are `None`.
    fn find(&self, path: &str) -> Option<DocumentHandle>;

    /// Read the current text of a document.
    fn read(&self, doc: &DocumentHandle) -> Result<String>;
}

/// Supplies heading, block and frontmatter positions for a document.
pub trait IndexProvider {
    /// `None` when the host has no metadata for the document.
    fn index_of(&self, doc: &DocumentHandle) -> Option<StructuralIndex>;
}

/// Everything the assembler needs from a host.
pub trait Host: DocumentStore + IndexProvider {}

impl<T: DocumentStore + IndexProvider + ?Sized> Host for T {}

/// Receives assembled variants for display.
pub trait VariantSink {
    fn present(&mut self, variant: &AssembledVariant);
}

impl VariantSink for Vec<AssembledVariant> {
    fn present(&mut self, variant: &AssembledVariant) {
        self.push(variant.clone());
    }
}

#[derive(Debug, Clone)]
struct MemoryDoc {
    text: String,
    index: Option<StructuralIndex>,
}

/// A [`Host`] backed by a map of path → text.
///
/// Documents inserted with [`MemoryHost::with_document`] get an index that
/// only carries their preamble; use [`MemoryHost::with_indexed`] to supply
/// heading and block positions.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    docs: BTreeMap<String, MemoryDoc>,
    folders: Vec<String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let index = parse_preamble(&text).map(|fm| StructuralIndex::new().with_frontmatter(fm));
        self.docs.insert(path.into(), MemoryDoc { text, index });
        self
    }

    pub fn with_indexed(
        mut self,
        path: impl Into<String>,
        text: impl Into<String>,
        index: StructuralIndex,
    ) -> Self {
        self.docs.insert(
            path.into(),
            MemoryDoc {
                text: text.into(),
                index: Some(index),
            },
        );
        self
    }

    /// Register a folder; folders are never resolvable as documents.
    pub fn with_folder(mut self, path: impl Into<String>) -> Self {
        self.folders.push(path.into());
        self
    }

    /// Replace a document's text, keeping its index.
    pub fn set_text(&mut self, path: &str, text: impl Into<String>) {
        if let Some(doc) = self.docs.get_mut(path) {
            doc.text = text.into();
        }
    }

    pub fn remove(&mut self, path: &str) {
        self.docs.remove(path);
    }
}

impl DocumentStore for MemoryHost {
    fn find(&self, path: &str) -> Option<DocumentHandle> {
        if self.folders.iter().any(|f| f == path) {
            return None;
        }
        self.docs.contains_key(path).then(|| DocumentHandle::new(path))
    }

    fn read(&self, doc: &DocumentHandle) -> Result<String> {
        self.docs
            .get(doc.path())
            .map(|d| d.text.clone())
            .ok_or_else(|| Error::NotFound(doc.path().to_string()))
    }
}

impl IndexProvider for MemoryHost {
    fn index_of(&self, doc: &DocumentHandle) -> Option<StructuralIndex> {
        self.docs.get(doc.path()).and_then(|d| d.index.clone())
    }
}
