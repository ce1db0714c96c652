//! Settings and per-note configuration.

use crate::host::Host;
use crate::types::{DocumentHandle, Frontmatter, SourceMap};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

pub const DEFAULT_PATTERN_FOLDER: &str = "Patterns";

/// Frontmatter keys naming a note's pattern file, in priority order.
pub const PATTERN_KEYS: [&str; 3] = ["virtual_workflow", "virtualPattern", "workflowPattern"];

/// Frontmatter keys holding a note's source aliases, in priority order.
pub const ALIAS_KEYS: [&str; 2] = ["virtual_sources", "virtualSources"];

/// How a set of variants is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Each variant as its own document.
    #[default]
    Separate,
    /// One document with a section per variant.
    Single,
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder searched for pattern names given without an extension.
    pub pattern_folder: String,
    pub default_mode: OutputMode,
    /// Re-assemble when the vault changes.
    pub auto_update: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pattern_folder: DEFAULT_PATTERN_FOLDER.to_string(),
            default_mode: OutputMode::default(),
            auto_update: false,
        }
    }
}

impl Settings {
    /// The configured pattern folder, or the default when blank.
    pub fn pattern_folder(&self) -> &str {
        match self.pattern_folder.trim() {
            "" => DEFAULT_PATTERN_FOLDER,
            folder => folder,
        }
    }
}

/// Virtual-note configuration declared in a note's own frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteConfig {
    pub pattern_path: Option<String>,
    pub source_aliases: Option<SourceMap>,
}

impl NoteConfig {
    pub fn from_frontmatter(fm: &Frontmatter) -> Self {
        let pattern_path = PATTERN_KEYS
            .iter()
            .filter_map(|k| fm.get(*k).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string);

        let source_aliases = ALIAS_KEYS
            .iter()
            .find_map(|k| fm.get(*k).and_then(Value::as_mapping))
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.as_str()?.to_string())))
                    .collect()
            });

        Self {
            pattern_path,
            source_aliases,
        }
    }

    /// Read the configuration of `note` from the host's index.
    pub fn of<H: Host + ?Sized>(host: &H, note: &DocumentHandle) -> Self {
        host.index_of(note)
            .and_then(|index| index.frontmatter)
            .map(|fm| Self::from_frontmatter(&fm))
            .unwrap_or_default()
    }
}

/// Expand a pattern reference into a store path.
///
/// References ending in `.yml`, `.yaml` or `.md` are used as-is; bare names
/// become `<folder>/<name>.yml`.
pub fn normalize_pattern_path(reference: &str, folder: &str) -> String {
    let trimmed = reference.trim();
    if [".yml", ".yaml", ".md"].iter().any(|ext| trimmed.ends_with(ext)) {
        trimmed.to_string()
    } else {
        format!("{}/{}.yml", folder, trimmed)
    }
}

/// Locate the pattern file configured for `note`, if it exists.
pub fn resolve_pattern_file<H: Host + ?Sized>(
    host: &H,
    note: &DocumentHandle,
    settings: &Settings,
) -> Option<DocumentHandle> {
    let reference = NoteConfig::of(host, note).pattern_path?;
    let path = normalize_pattern_path(&reference, settings.pattern_folder());
    let found = host.find(&path);
    if found.is_none() {
        tracing::debug!(note = note.path(), path = %path, "pattern file not found");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    fn fm(yaml: &str) -> Frontmatter {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_settings_defaults() {
        let s = Settings::default();
        assert_eq!(s.pattern_folder(), "Patterns");
        assert_eq!(s.default_mode, OutputMode::Separate);
        assert!(!s.auto_update);
    }

    #[test]
    fn test_blank_pattern_folder_falls_back() {
        let s = Settings {
            pattern_folder: "  ".into(),
            ..Settings::default()
        };
        assert_eq!(s.pattern_folder(), "Patterns");
    }

    #[test]
    fn test_settings_partial_yaml() {
        let s: Settings = serde_yaml::from_str("default_mode: single").unwrap();
        assert_eq!(s.default_mode, OutputMode::Single);
        assert_eq!(s.pattern_folder, "Patterns");
    }

    #[test]
    fn test_pattern_key_priority() {
        let c = NoteConfig::from_frontmatter(&fm("workflowPattern: c\nvirtualPattern: b\n"));
        assert_eq!(c.pattern_path.as_deref(), Some("b"));
        let c = NoteConfig::from_frontmatter(&fm("virtual_workflow: ''\nworkflowPattern: c\n"));
        assert_eq!(c.pattern_path.as_deref(), Some("c"));
        let c = NoteConfig::from_frontmatter(&fm("title: x"));
        assert!(c.pattern_path.is_none());
    }

    #[test]
    fn test_source_aliases() {
        let c = NoteConfig::from_frontmatter(&fm(
            "virtualSources: { a: A.md }\nvirtual_sources: { g: G.md, n: 3 }\n",
        ));
        let aliases = c.source_aliases.unwrap();
        assert_eq!(aliases.get("g").map(String::as_str), Some("G.md"));
        assert!(!aliases.contains_key("a"));
        assert!(!aliases.contains_key("n"));
    }

    #[test]
    fn test_normalize_pattern_path() {
        assert_eq!(normalize_pattern_path(" study ", "Patterns"), "Patterns/study.yml");
        assert_eq!(normalize_pattern_path("x/p.yaml", "Patterns"), "x/p.yaml");
        assert_eq!(normalize_pattern_path("p.md", "P"), "p.md");
        assert_eq!(normalize_pattern_path("p.yml", "P"), "p.yml");
    }

    #[test]
    fn test_resolve_pattern_file() {
        let host = MemoryHost::new()
            .with_document("note.md", "---\nvirtual_workflow: cards\n---\n")
            .with_document("orphan.md", "---\nvirtual_workflow: gone\n---\n")
            .with_document("plain.md", "text")
            .with_document("Patterns/cards.yml", "variants: []");
        let settings = Settings::default();
        let found = resolve_pattern_file(&host, &DocumentHandle::new("note.md"), &settings);
        assert_eq!(found.unwrap().path(), "Patterns/cards.yml");
        assert!(resolve_pattern_file(&host, &DocumentHandle::new("orphan.md"), &settings).is_none());
        assert!(resolve_pattern_file(&host, &DocumentHandle::new("plain.md"), &settings).is_none());
    }
}
