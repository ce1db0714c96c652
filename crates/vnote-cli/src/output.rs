//! Printing assembled variants.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use vnote::{AssembledVariant, OutputMode, VariantSink};

#[derive(Debug, Clone, Copy, Default)]
pub struct Format {
    json: bool,
    pretty: bool,
}

impl Format {
    /// `--pretty` implies JSON.
    pub fn new(json: bool, pretty: bool) -> Self {
        Self {
            json: json || pretty,
            pretty,
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        })
    }
}

/// How a run of variants is laid out as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// The variant's markdown, unadorned.
    Document,
    /// Several variants according to the output mode.
    Variants(OutputMode),
}

/// Text for the `index`-th variant of a run.
pub fn render(variant: &AssembledVariant, layout: Layout, index: usize) -> String {
    let gap = if index == 0 { "" } else { "\n" };
    match layout {
        Layout::Document => variant.markdown.clone(),
        Layout::Variants(OutputMode::Separate) => format!(
            "{}<!-- variant: {} ({}) -->\n{}",
            gap,
            variant.id,
            variant.display_name(),
            variant.markdown
        ),
        Layout::Variants(OutputMode::Single) => {
            format!("{}## {}\n\n{}", gap, variant.display_name(), variant.body())
        }
    }
}

/// A [`VariantSink`] that writes each variant as it is presented.
///
/// Write errors are held until [`TextSink::finish`].
pub struct TextSink<W: Write> {
    out: W,
    layout: Layout,
    format: Format,
    presented: usize,
    error: Option<anyhow::Error>,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W, layout: Layout, format: Format) -> Self {
        Self {
            out,
            layout,
            format,
            presented: 0,
            error: None,
        }
    }

    /// Flush and report how many variants were written.
    pub fn finish(mut self) -> Result<usize> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.presented)
    }

    fn write(&mut self, variant: &AssembledVariant) -> Result<()> {
        let text = if self.format.is_json() {
            self.format.to_json(variant)?
        } else {
            render(variant, self.layout, self.presented)
        };
        writeln!(self.out, "{}", text)?;
        Ok(())
    }
}

impl<W: Write> VariantSink for TextSink<W> {
    fn present(&mut self, variant: &AssembledVariant) {
        if self.error.is_some() {
            return;
        }
        match self.write(variant) {
            Ok(()) => self.presented += 1,
            Err(e) => self.error = Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vnote::Frontmatter;

    fn variant(id: &str, name: Option<&str>, body: &str) -> AssembledVariant {
        AssembledVariant {
            id: id.to_string(),
            name: name.map(str::to_string),
            frontmatter: Frontmatter::new(),
            markdown: format!("---\nvirtual: true\n---\n\n{}", body),
        }
    }

    fn run(layout: Layout, format: Format, variants: &[AssembledVariant]) -> String {
        let mut sink = TextSink::new(Vec::new(), layout, format);
        for v in variants {
            sink.present(v);
        }
        assert!(sink.error.is_none());
        assert_eq!(sink.presented, variants.len());
        String::from_utf8(sink.out).unwrap()
    }

    #[test]
    fn test_document_layout() {
        let v = variant("a", None, "Body");
        assert_eq!(run(Layout::Document, Format::default(), &[v.clone()]), format!("{}\n", v.markdown));
    }

    #[test]
    fn test_separate_layout() {
        let out = run(
            Layout::Variants(OutputMode::Separate),
            Format::default(),
            &[variant("a", Some("Alpha"), "A"), variant("b", None, "B")],
        );
        assert_eq!(
            out,
            "<!-- variant: a (Alpha) -->\n---\nvirtual: true\n---\n\nA\n\n<!-- variant: b (b) -->\n---\nvirtual: true\n---\n\nB\n"
        );
    }

    #[test]
    fn test_single_layout() {
        let out = run(
            Layout::Variants(OutputMode::Single),
            Format::default(),
            &[variant("a", Some("Alpha"), "A"), variant("b", None, "B")],
        );
        assert_eq!(out, "## Alpha\n\nA\n\n## b\n\nB\n");
    }

    #[test]
    fn test_json_lines() {
        let out = run(
            Layout::Variants(OutputMode::Separate),
            Format::new(true, false),
            &[variant("a", None, "A"), variant("b", None, "B")],
        );
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["id"], "b");
        assert!(lines[0].get("name").is_none());
    }

    #[test]
    fn test_pretty_implies_json() {
        assert!(Format::new(false, true).is_json());
        assert!(!Format::default().is_json());
    }
}
