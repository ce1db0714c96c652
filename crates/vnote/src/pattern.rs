//! Pattern loading and validation.

use crate::error::PatternError;
use crate::host::DocumentStore;
use crate::types::{DocumentHandle, Pattern};
use serde_yaml::Value;
use std::collections::HashSet;
use tracing::debug;

/// Parse and validate pattern text.
///
/// The root must be a mapping with a `variants` sequence whose entries fit
/// the pattern model, and variant ids must be unique.
///
/// # Example
///
/// ```
/// let pattern = vnote::load_pattern("variants:\n  - id: short\n    assemble: []\n").unwrap();
/// assert_eq!(pattern.variants[0].id, "short");
///
/// assert!(vnote::load_pattern("variants: nope").is_err());
/// ```
pub fn load(raw: &str) -> Result<Pattern, PatternError> {
    let value: Value = serde_yaml::from_str(raw).map_err(PatternError::Syntax)?;
    let Value::Mapping(root) = &value else {
        return Err(PatternError::NotAMapping);
    };
    match root.get("variants") {
        Some(Value::Sequence(_)) => {}
        _ => return Err(PatternError::MissingVariants),
    }

    let pattern: Pattern = serde_yaml::from_value(value).map_err(PatternError::Shape)?;

    let mut seen = HashSet::new();
    for variant in &pattern.variants {
        if !seen.insert(variant.id.as_str()) {
            return Err(PatternError::DuplicateVariant(variant.id.clone()));
        }
    }
    Ok(pattern)
}

/// Read a pattern document from the store and load it.
pub fn read_pattern<S: DocumentStore + ?Sized>(
    store: &S,
    file: &DocumentHandle,
) -> Result<Pattern, PatternError> {
    let raw = store.read(file)?;
    load(&raw)
}

/// Like [`read_pattern`], but any failure means "no pattern".
pub fn try_read_pattern<S: DocumentStore + ?Sized>(store: &S, file: &DocumentHandle) -> Option<Pattern> {
    match read_pattern(store, file) {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            debug!(pattern = file.path(), error = %e, "pattern rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::types::HeadingRef;

    const FULL: &str = r###"
name: Cards
sources:
  glossary: Reference/Glossary.md
variants:
  - id: short
    name: Short
    frontmatter:
      tags: [card]
    assemble:
      - source: current
        include:
          sections: ["## Summary"]
          headings: [Intro, { title: Usage, depth: 2 }]
      - source: glossary
        include:
          blocks: [term-1]
          frontmatter: [lang]
  - id: long
    assemble:
      - source: current
        include: { all: true }
"###;

    #[test]
    fn test_load_full() {
        let p = load(FULL).unwrap();
        assert_eq!(p.name.as_deref(), Some("Cards"));
        assert_eq!(
            p.sources.as_ref().unwrap().get("glossary").map(String::as_str),
            Some("Reference/Glossary.md")
        );
        assert_eq!(p.variants.len(), 2);

        let short = &p.variants[0];
        assert_eq!(short.assemble.len(), 2);
        let inc = short.assemble[0].include.as_ref().unwrap();
        assert_eq!(inc.sections, vec!["## Summary"]);
        assert_eq!(inc.headings[0], HeadingRef::Title("Intro".into()));
        assert_eq!(inc.headings[1].title(), "Usage");
        assert!(short.frontmatter.as_ref().unwrap().contains_key("tags"));

        assert!(p.variants[1].assemble[0].include.as_ref().unwrap().all);
    }

    #[test]
    fn test_zero_variants_is_valid() {
        assert!(load("variants: []").unwrap().variants.is_empty());
    }

    #[test]
    fn test_rejects_bad_yaml() {
        assert!(matches!(load("variants: [\n"), Err(PatternError::Syntax(_))));
    }

    #[test]
    fn test_rejects_non_mapping_root() {
        assert!(matches!(load("- a\n- b\n"), Err(PatternError::NotAMapping)));
        assert!(matches!(load("just text"), Err(PatternError::NotAMapping)));
        assert!(load("").is_err());
    }

    #[test]
    fn test_rejects_missing_or_scalar_variants() {
        assert!(matches!(load("name: x"), Err(PatternError::MissingVariants)));
        assert!(matches!(load("variants: {a: 1}"), Err(PatternError::MissingVariants)));
    }

    #[test]
    fn test_rejects_bad_variant_entries() {
        assert!(matches!(load("variants: [{ name: no-id }]"), Err(PatternError::Shape(_))));
        assert!(matches!(
            load("variants: [{ id: a, assemble: [{ include: { all: true } }] }]"),
            Err(PatternError::Shape(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = load("variants: [{ id: a }, { id: a }]").unwrap_err();
        assert!(matches!(err, PatternError::DuplicateVariant(id) if id == "a"));
    }

    #[test]
    fn test_try_read_pattern() {
        let host = MemoryHost::new()
            .with_document("Patterns/good.yml", "variants: [{ id: a }]")
            .with_document("Patterns/bad.yml", "nope: [");
        assert!(try_read_pattern(&host, &DocumentHandle::new("Patterns/good.yml")).is_some());
        assert!(try_read_pattern(&host, &DocumentHandle::new("Patterns/bad.yml")).is_none());
        assert!(try_read_pattern(&host, &DocumentHandle::new("Patterns/gone.yml")).is_none());
    }
}
