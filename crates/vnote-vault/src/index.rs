//! Structural index construction for markdown text.
//!
//! Headings come from `pulldown-cmark`, block anchors from a line scan for
//! trailing `^id` markers, and the preamble from `serde_yaml`.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use vnote::extract::strip_preamble;
use vnote::frontmatter::parse_preamble;
use vnote::{Loc, Position, StructuralIndex};

static BLOCK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)\^([A-Za-z0-9-]+)\s*$").expect("block marker pattern is valid")
});

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s").expect("list item pattern is valid")
});

/// Build the structural index of a markdown document.
pub fn index_markdown(text: &str) -> StructuralIndex {
    let map = LocMap::new(text);
    let mut index = StructuralIndex::new();

    for (title, level, range) in scan_headings(text) {
        let position = Position::new(map.loc(range.start), map.loc(range.end));
        index = index.with_heading(title, level, position);
    }

    for (id, position) in scan_blocks(text) {
        index.blocks.entry(id).or_insert(position);
    }

    index.frontmatter = parse_preamble(text);
    index
}

/// Byte offset → line/column conversion.
struct LocMap<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LocMap<'a> {
    fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, line_starts }
    }

    fn loc(&self, byte: usize) -> Loc {
        let byte = byte.min(self.text.len());
        let line = match self.line_starts.binary_search(&byte) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = self.text[self.line_starts[line]..byte].chars().count();
        Loc::new(line, col)
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Headings in document order with their byte ranges (without the trailing
/// line break).
fn scan_headings(text: &str) -> Vec<(String, u8, Range<usize>)> {
    let options = Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
        | Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH;

    Parser::new_ext(text, options)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::Heading { level, .. }) => {
                let source = text[range.clone()].trim_end_matches(['\n', '\r']);
                let end = range.start + source.len();
                Some((heading_title(source), heading_level_to_u8(level), range.start..end))
            }
            _ => None,
        })
        .collect()
}

/// Heading text as written, inline markup kept.
///
/// ATX headings lose their opening and closing `#` runs; setext headings
/// lose their underline.
fn heading_title(source: &str) -> String {
    let trimmed = source.trim_start();
    if trimmed.starts_with('#') {
        let content = trimmed.trim_start_matches('#').trim();
        let without_closing = content.trim_end_matches('#');
        if without_closing.is_empty() {
            return String::new();
        }
        if without_closing.ends_with([' ', '\t']) {
            return without_closing.trim_end().to_string();
        }
        return content.to_string();
    }
    let lines: Vec<&str> = source.lines().collect();
    let body = match lines.split_last() {
        Some((_underline, rest)) if !rest.is_empty() => rest,
        _ => &lines[..],
    };
    body.iter().map(|l| l.trim()).collect::<Vec<_>>().join(" ")
}

/// `^id` anchors and the span of the block each one labels.
fn scan_blocks(text: &str) -> Vec<(String, Position)> {
    let body_start_line = text[..text.len() - strip_preamble(text).len()]
        .matches('\n')
        .count();
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();

    let mut blocks = Vec::new();
    let mut in_fence = false;
    for (n, line) in lines.iter().enumerate().skip(body_start_line) {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let Some(caps) = BLOCK_MARKER.captures(line) else {
            continue;
        };
        let id = caps[1].to_string();
        let end = Loc::new(n, line.chars().count());

        let start_line = if trimmed.starts_with('^') && trimmed.len() == caps[0].trim().len() {
            // marker on its own line labels the preceding block
            let mut prev = n;
            while prev > body_start_line && lines[prev - 1].trim().is_empty() {
                prev -= 1;
            }
            if prev == body_start_line {
                n
            } else if prev == n {
                paragraph_start(&lines, n, body_start_line)
            } else {
                paragraph_start(&lines, prev - 1, body_start_line)
            }
        } else if LIST_ITEM.is_match(line) {
            n
        } else {
            paragraph_start(&lines, n, body_start_line)
        };

        blocks.push((id, Position::new(Loc::new(start_line, 0), end)));
    }
    blocks
}

/// First line of the paragraph containing line `n`.
fn paragraph_start(lines: &[&str], n: usize, floor: usize) -> usize {
    let mut start = n;
    while start > floor {
        let above = lines[start - 1];
        if above.trim().is_empty()
            || above.trim_start().starts_with('#')
            || LIST_ITEM.is_match(lines[start])
        {
            break;
        }
        start -= 1;
    }
    start
}
