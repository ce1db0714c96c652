//! Span extraction: turns inclusion directives into text fragments.

use crate::frontmatter::FrontmatterMerge;
use crate::position::LineIndex;
use crate::types::{IncludeSpec, StructuralIndex};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::trace;

static PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---[ \t]*\r?\n(?:[\s\S]*?\r?\n)?---[ \t]*(?:\r?\n|\z)")
        .expect("preamble pattern is valid")
});

/// Remove a leading `---` delimited preamble, if there is one.
pub fn strip_preamble(text: &str) -> &str {
    match PREAMBLE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// The raw preamble body (between the markers), if the text starts with one.
pub fn preamble_source(text: &str) -> Option<&str> {
    let m = PREAMBLE.find(text)?;
    let block = m.as_str();
    let body_start = block.find('\n')? + 1;
    let closing = block.trim_end_matches(['\n', '\r']).rfind('\n');
    match closing {
        Some(end) if end + 1 > body_start => Some(&block[body_start..end + 1]),
        _ => Some(""),
    }
}

/// Strip leading `#` markers and surrounding whitespace from a heading path.
pub fn normalize_heading_path(path: &str) -> &str {
    path.trim_start().trim_start_matches('#').trim()
}

/// Character range of block `id`, if the index knows it.
pub fn block_span(index: &StructuralIndex, lines: &LineIndex<'_>, id: &str) -> Option<Range<usize>> {
    let position = index.blocks.get(id)?;
    Some(lines.offset(position.start)..lines.offset(position.end))
}

/// Character range of the section under heading `title`.
///
/// The first heading with that exact text wins. The section runs to the
/// nearest heading that starts after it, at any level, or to the end.
pub fn heading_span(
    index: &StructuralIndex,
    lines: &LineIndex<'_>,
    title: &str,
) -> Option<Range<usize>> {
    let heading = index.find_heading(title)?;
    let start = lines.offset(heading.position.start);
    let end = index
        .headings
        .iter()
        .map(|h| lines.offset(h.position.start))
        .filter(|&o| o > start)
        .min()
        .unwrap_or_else(|| lines.len());
    Some(start..end)
}

/// Run every directive in `include` against one resolved document.
///
/// Text fragments are returned in directive order; copied frontmatter keys
/// go into `merge`. Anything that cannot be found is skipped.
pub fn extract(
    content: &str,
    index: Option<&StructuralIndex>,
    include: &IncludeSpec,
    merge: &mut FrontmatterMerge,
) -> Vec<String> {
    let mut parts = Vec::new();
    let lines = LineIndex::new(content);

    if include.all {
        parts.push(strip_preamble(content).to_string());
    }

    if let Some(frontmatter) = index.and_then(|i| i.frontmatter.as_ref()) {
        for key in &include.frontmatter {
            match frontmatter.get(key.as_str()) {
                Some(value) => merge.copy(key, value.clone()),
                None => trace!(key = %key, "frontmatter key not present"),
            }
        }
    }

    let Some(index) = index else {
        return parts;
    };

    for id in &include.blocks {
        match block_span(index, &lines, id) {
            Some(span) => parts.push(lines.slice(span).to_string()),
            None => trace!(block = %id, "block not found"),
        }
    }

    let headings = include.headings.iter().map(|h| h.title());
    let sections = include.sections.iter().map(|p| normalize_heading_path(p));
    for title in headings.chain(sections) {
        match heading_span(index, &lines, title) {
            Some(span) => parts.push(lines.slice(span).to_string()),
            None => trace!(heading = %title, "heading not found"),
        }
    }

    parts
}
