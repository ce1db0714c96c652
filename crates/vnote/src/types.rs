use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

/// An ordered key/value preamble, as found at the top of a markdown note.
///
/// Backed by [`serde_yaml::Mapping`], which keeps keys in first-insertion
/// order and leaves a key in place when its value is overwritten.
pub type Frontmatter = Mapping;

/// Alias → document path lookup, used both by patterns and by notes.
pub type SourceMap = HashMap<String, String>;

// ============================================================================
// Pattern
// ============================================================================

/// A declarative description of the variants to assemble for a note.
///
/// # YAML shape
///
/// ```yaml
/// name: Study cards
/// sources:
///   glossary: Reference/Glossary.md
/// variants:
///   - id: short
///     name: Short form
///     frontmatter: { tags: [card] }
///     assemble:
///       - source: current
///         include: { sections: ["# Summary"] }
///       - source: glossary
///         include: { blocks: [term-1], frontmatter: [lang] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<SourceMap>,
    pub variants: Vec<VariantSpec>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_source(mut self, alias: impl Into<String>, path: impl Into<String>) -> Self {
        self.sources
            .get_or_insert_with(SourceMap::new)
            .insert(alias.into(), path.into());
        self
    }

    pub fn with_variant(mut self, variant: VariantSpec) -> Self {
        self.variants.push(variant);
        self
    }

    /// Look up a variant by its stable id.
    pub fn variant(&self, id: &str) -> Option<&VariantSpec> {
        self.variants.iter().find(|v| v.id == id)
    }
}

/// One assembly recipe producing one output document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub assemble: Vec<AssemblyStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<Frontmatter>,
}

impl VariantSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            assemble: Vec::new(),
            frontmatter: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_step(mut self, step: AssemblyStep) -> Self {
        self.assemble.push(step);
        self
    }

    /// Set a static frontmatter default for this variant.
    pub fn with_frontmatter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.frontmatter
            .get_or_insert_with(Frontmatter::new)
            .insert(Value::String(key.into()), value.into());
        self
    }

    /// The name shown to users: `name` if set, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A source reference plus the fragments to pull out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyStep {
    /// `"current"`, a pattern alias, a note alias, or a literal path.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<IncludeSpec>,
}

impl AssemblyStep {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            include: None,
        }
    }

    pub fn including(mut self, include: IncludeSpec) -> Self {
        self.include = Some(include);
        self
    }
}

/// Inclusion directives for one step.
///
/// The directives are independent; whichever are present run in the order
/// `all`, `frontmatter`, `blocks`, `headings`, `sections`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncludeSpec {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub all: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frontmatter: Vec<String>,
    /// Block ids without the leading `^`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<HeadingRef>,
    /// Heading paths such as `"## Summary"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<String>,
}

impl IncludeSpec {
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    pub fn with_frontmatter<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frontmatter.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_blocks<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocks.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_headings<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headings
            .extend(titles.into_iter().map(|t| HeadingRef::Title(t.into())));
        self
    }

    pub fn with_sections<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections.extend(paths.into_iter().map(Into::into));
        self
    }

    /// True when no directive is present.
    pub fn is_empty(&self) -> bool {
        !self.all
            && self.frontmatter.is_empty()
            && self.blocks.is_empty()
            && self.headings.is_empty()
            && self.sections.is_empty()
    }
}

/// A heading selector: either a bare title or `{ title, depth }`.
///
/// `depth` is accepted for compatibility but matching uses the title only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeadingRef {
    Title(String),
    Detailed {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        depth: Option<u8>,
    },
}

impl HeadingRef {
    pub fn title(&self) -> &str {
        match self {
            HeadingRef::Title(t) => t,
            HeadingRef::Detailed { title, .. } => title,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// One rendered variant. Ephemeral: recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledVariant {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub frontmatter: Frontmatter,
    pub markdown: String,
}

impl AssembledVariant {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// The markdown with its leading preamble removed.
    pub fn body(&self) -> &str {
        crate::extract::strip_preamble(&self.markdown).trim_start_matches('\n')
    }
}

// ============================================================================
// Structural index
// ============================================================================

/// A zero-based line and a column counted in characters into that line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Loc {
    pub line: usize,
    pub col: usize,
}

impl Loc {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// A `start..end` range of [`Loc`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub start: Loc,
    pub end: Loc,
}

impl Position {
    pub fn new(start: Loc, end: Loc) -> Self {
        Self { start, end }
    }

    /// A position covering columns `start_col..end_col` of a single line.
    pub fn line(line: usize, start_col: usize, end_col: usize) -> Self {
        Self::new(Loc::new(line, start_col), Loc::new(line, end_col))
    }
}

/// A heading as recorded by the structural index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingEntry {
    /// Heading text without the `#` markers.
    pub heading: String,
    pub level: u8,
    pub position: Position,
}

/// Positions of the structural elements of one document.
///
/// Headings are kept in document order; block ids are stored without `^`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralIndex {
    #[serde(default)]
    pub headings: Vec<HeadingEntry>,
    #[serde(default)]
    pub blocks: HashMap<String, Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<Frontmatter>,
}

impl StructuralIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heading(mut self, heading: impl Into<String>, level: u8, position: Position) -> Self {
        self.headings.push(HeadingEntry {
            heading: heading.into(),
            level,
            position,
        });
        self
    }

    pub fn with_block(mut self, id: impl Into<String>, position: Position) -> Self {
        self.blocks.insert(id.into(), position);
        self
    }

    pub fn with_frontmatter(mut self, frontmatter: Frontmatter) -> Self {
        self.frontmatter = Some(frontmatter);
        self
    }

    /// First heading whose text equals `title` exactly.
    pub fn find_heading(&self, title: &str) -> Option<&HeadingEntry> {
        self.headings.iter().find(|h| h.heading == title)
    }
}

/// A reference to a leaf document in a [`DocumentStore`](crate::host::DocumentStore).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentHandle {
    path: String,
}

impl DocumentHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}
