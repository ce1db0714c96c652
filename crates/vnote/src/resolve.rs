//! Source reference resolution.

use crate::host::DocumentStore;
use crate::types::{DocumentHandle, SourceMap};
use tracing::debug;

/// The reserved source name for the note being assembled.
pub const CURRENT: &str = "current";

/// A resolved step source: the document and its text at read time.
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub doc: DocumentHandle,
    pub content: String,
}

/// Where a source reference points before the store is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTarget<'a> {
    Current,
    Path(&'a str),
}

/// Apply the alias precedence: `current`, then pattern aliases, then note
/// aliases, then the literal reference. Empty alias targets are ignored.
pub fn source_target<'a>(
    source: &'a str,
    pattern_sources: Option<&'a SourceMap>,
    note_aliases: Option<&'a SourceMap>,
) -> SourceTarget<'a> {
    if source == CURRENT {
        return SourceTarget::Current;
    }
    let lookup = |map: Option<&'a SourceMap>| {
        map.and_then(|m| m.get(source))
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    };
    let path = lookup(pattern_sources)
        .or_else(|| lookup(note_aliases))
        .unwrap_or(source);
    SourceTarget::Path(path)
}

/// Resolve `source` to document content, reading it fresh from `store`.
///
/// Returns `None` for unknown paths, non-documents, and read failures.
pub fn resolve_source<S: DocumentStore + ?Sized>(
    store: &S,
    target: &DocumentHandle,
    source: &str,
    pattern_sources: Option<&SourceMap>,
    note_aliases: Option<&SourceMap>,
) -> Option<ResolvedSource> {
    let doc = match source_target(source, pattern_sources, note_aliases) {
        SourceTarget::Current => target.clone(),
        SourceTarget::Path(path) => match store.find(path) {
            Some(doc) => doc,
            None => {
                debug!(source, path, "source did not resolve to a document");
                return None;
            }
        },
    };
    match store.read(&doc) {
        Ok(content) => Some(ResolvedSource { doc, content }),
        Err(e) => {
            debug!(source, path = doc.path(), error = %e, "failed to read source");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    fn map(pairs: &[(&str, &str)]) -> SourceMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_current_wins_over_aliases() {
        let p = map(&[("current", "other.md")]);
        assert_eq!(source_target("current", Some(&p), None), SourceTarget::Current);
    }

    #[test]
    fn test_pattern_alias_before_note_alias() {
        let p = map(&[("g", "pattern.md")]);
        let n = map(&[("g", "note.md"), ("h", "h.md")]);
        assert_eq!(source_target("g", Some(&p), Some(&n)), SourceTarget::Path("pattern.md"));
        assert_eq!(source_target("h", Some(&p), Some(&n)), SourceTarget::Path("h.md"));
        assert_eq!(source_target("x.md", Some(&p), Some(&n)), SourceTarget::Path("x.md"));
    }

    #[test]
    fn test_empty_alias_falls_through() {
        let p = map(&[("g", "")]);
        let n = map(&[("g", "note.md")]);
        assert_eq!(source_target("g", Some(&p), Some(&n)), SourceTarget::Path("note.md"));
    }

    #[test]
    fn test_resolve_current_reads_fresh() {
        let mut host = MemoryHost::new().with_document("note.md", "v1");
        let target = DocumentHandle::new("note.md");
        let first = resolve_source(&host, &target, "current", None, None).unwrap();
        assert_eq!(first.content, "v1");
        host.set_text("note.md", "v2");
        let second = resolve_source(&host, &target, "current", None, None).unwrap();
        assert_eq!(second.content, "v2");
    }

    #[test]
    fn test_resolve_alias() {
        let host = MemoryHost::new()
            .with_document("note.md", "")
            .with_document("ref/glossary.md", "terms");
        let p = map(&[("glossary", "ref/glossary.md")]);
        let r = resolve_source(&host, &DocumentHandle::new("note.md"), "glossary", Some(&p), None)
            .unwrap();
        assert_eq!(r.doc.path(), "ref/glossary.md");
        assert_eq!(r.content, "terms");
    }

    #[test]
    fn test_resolve_missing_and_folder() {
        let host = MemoryHost::new().with_folder("ref");
        let target = DocumentHandle::new("note.md");
        assert!(resolve_source(&host, &target, "nope.md", None, None).is_none());
        assert!(resolve_source(&host, &target, "ref", None, None).is_none());
        // the target itself is not in the store
        assert!(resolve_source(&host, &target, "current", None, None).is_none());
    }
}
