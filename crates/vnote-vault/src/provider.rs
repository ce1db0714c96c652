//! Implementation of the `vnote` host traits over a [`Vault`].

use crate::Vault;
use crate::index::index_markdown;
use crate::paths;
use std::fs;
use tracing::{debug, trace};
use vnote::{DocumentHandle, DocumentStore, IndexProvider, StructuralIndex};

impl DocumentStore for Vault {
    fn find(&self, path: &str) -> Option<DocumentHandle> {
        let reference = match paths::normalize(path) {
            Ok(r) => r,
            Err(e) => {
                debug!(path, error = %e, "rejected document reference");
                return None;
            }
        };
        let fs_path = paths::to_fs_path(self.root(), &reference).ok()?;
        if fs_path.is_file() {
            Some(DocumentHandle::new(reference))
        } else {
            trace!(path = %reference, "no such document");
            None
        }
    }

    fn read(&self, doc: &DocumentHandle) -> vnote::Result<String> {
        let fs_path = self.fs_path(doc.path())?;
        Ok(fs::read_to_string(fs_path)?)
    }
}

impl IndexProvider for Vault {
    fn index_of(&self, doc: &DocumentHandle) -> Option<StructuralIndex> {
        match self.read(doc) {
            Ok(text) => Some(index_markdown(&text)),
            Err(e) => {
                debug!(path = doc.path(), error = %e, "cannot index document");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use vnote::{AssembledVariant, Settings};

    fn vault_with(files: &[(&str, &str)]) -> (TempDir, Vault) {
        let temp = TempDir::new().unwrap();
        for (path, text) in files {
            let full = temp.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, text).unwrap();
        }
        let vault = Vault::open(temp.path()).unwrap();
        (temp, vault)
    }

    #[test]
    fn test_find_only_files() {
        let (_temp, vault) = vault_with(&[("Patterns/p.yml", "variants: []")]);
        assert_eq!(vault.find("Patterns/p.yml").unwrap().path(), "Patterns/p.yml");
        assert_eq!(vault.find("./Patterns/p.yml").unwrap().path(), "Patterns/p.yml");
        assert!(vault.find("Patterns").is_none());
        assert!(vault.find("../p.yml").is_none());
        assert!(vault.find("").is_none());
    }

    #[test]
    fn test_read_missing_is_error() {
        let (_temp, vault) = vault_with(&[]);
        let err = vault.read(&DocumentHandle::new("gone.md")).unwrap_err();
        assert!(matches!(err, vnote::Error::Io(_)));
    }

    #[test]
    fn test_index_of() {
        let (_temp, vault) = vault_with(&[("n.md", "---\na: 1\n---\n# H\ntext ^b\n")]);
        let index = vault.index_of(&DocumentHandle::new("n.md")).unwrap();
        assert_eq!(index.headings[0].heading, "H");
        assert!(index.blocks.contains_key("b"));
        assert!(index.frontmatter.unwrap().contains_key("a"));
        assert!(vault.index_of(&DocumentHandle::new("gone.md")).is_none());
    }

    #[test]
    fn test_preview_from_disk() {
        let (_temp, vault) = vault_with(&[
            (
                "Cards/term.md",
                "---\nvirtual_workflow: cards\nlang: en\n---\n# Term\nDefinition ^def\n\n# Notes\nScratch\n",
            ),
            (
                "Patterns/cards.yml",
                "variants:\n  - id: front\n    assemble:\n      - source: current\n        include:\n          frontmatter: [lang]\n          sections: [\"# Term\"]\n  - id: back\n    assemble:\n      - source: current\n        include: { blocks: [def] }\n",
            ),
        ]);
        let note = vault.find("Cards/term.md").unwrap();
        let mut sink: Vec<AssembledVariant> = Vec::new();
        let out = vnote::preview_variants(&vault, &note, &Settings::default(), &mut sink).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].body(), "# Term\nDefinition ^def");
        assert_eq!(out[0].frontmatter.get("lang").and_then(|v| v.as_str()), Some("en"));
        assert_eq!(out[1].body(), "Definition ^def");
    }

    #[test]
    fn test_changes_are_read_fresh() {
        let (temp, vault) = vault_with(&[
            ("n.md", "---\nvirtual_workflow: p\n---\nold"),
            ("Patterns/p.yml", "variants: [{ id: v, assemble: [{ source: current, include: { all: true } }] }]"),
        ]);
        let note = vault.find("n.md").unwrap();
        let mut sink: Vec<AssembledVariant> = Vec::new();
        let first = vnote::open_first_variant(&vault, &note, &Settings::default(), &mut sink).unwrap();
        assert_eq!(first.body(), "old");

        fs::write(temp.path().join("n.md"), "---\nvirtual_workflow: p\n---\nnew").unwrap();
        let second = vnote::open_first_variant(&vault, &note, &Settings::default(), &mut sink).unwrap();
        assert_eq!(second.body(), "new");
    }
}
