#![doc = include_str!("../README.md")]

pub mod error;
pub mod index;
pub mod paths;
pub mod provider;
#[cfg(feature = "watcher")]
pub mod watcher;

pub use error::{Result, VaultError};
pub use index::index_markdown;
#[cfg(feature = "watcher")]
pub use watcher::{VaultWatcher, WatcherConfig, WatcherHandle};

use std::path::{Path, PathBuf};
use vnote::DocumentHandle;
use walkdir::WalkDir;

/// A directory of markdown notes and pattern files.
///
/// Documents are addressed by `/`-separated paths relative to the root.
/// Every read goes to disk; nothing is cached between calls.
///
/// # Example
///
/// ```rust,no_run
/// use vnote::{DocumentStore, Settings};
/// use vnote_vault::Vault;
///
/// let vault = Vault::open("/Users/alex/notes")?;
/// let note = vault.find("Daily/today.md").expect("note exists");
/// let mut shown: Vec<vnote::AssembledVariant> = Vec::new();
/// let variants = vnote::preview_variants(&vault, &note, &Settings::default(), &mut shown);
/// # Ok::<(), vnote_vault::VaultError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Open a vault rooted at an existing directory.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(VaultError::RootNotFound(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of a vault-relative reference.
    pub fn fs_path(&self, reference: &str) -> Result<PathBuf> {
        paths::to_fs_path(&self.root, reference)
    }

    /// Handle for a note given either as a vault-relative reference or as a
    /// filesystem path inside the vault.
    pub fn handle_for(&self, arg: &str) -> Option<DocumentHandle> {
        if let Some(handle) = vnote::DocumentStore::find(self, arg) {
            return Some(handle);
        }
        let canonical = Path::new(arg).canonicalize().ok()?;
        if !canonical.is_file() {
            return None;
        }
        let root = self.root.canonicalize().ok()?;
        paths::to_reference(&root, &canonical).map(DocumentHandle::new)
    }

    /// Every markdown note in the vault, sorted by path.
    ///
    /// Hidden files and directories are skipped.
    pub fn list_notes(&self) -> Result<Vec<String>> {
        let mut notes = Vec::new();
        let walker = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry.path().extension().and_then(|e| e.to_str()) == Some("md")
                && let Some(reference) = paths::to_reference(&self.root, entry.path())
            {
                notes.push(reference);
            }
        }
        notes.sort();
        Ok(notes)
    }
}

pub(crate) fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}
