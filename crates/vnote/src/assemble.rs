//! Variant assembly: drives resolution, extraction and frontmatter merge.

use crate::extract::extract;
use crate::frontmatter::{FrontmatterMerge, ReservedKeys, render_preamble};
use crate::host::Host;
use crate::resolve::resolve_source;
use crate::types::{AssembledVariant, DocumentHandle, Pattern, SourceMap, VariantSpec};
use tracing::{debug, trace};

/// Assemble every variant of `pattern` for the note `target`.
///
/// Output order follows the pattern. Unresolvable sources and missing
/// headings or blocks are skipped; a variant with no parts still renders
/// its preamble.
///
/// # Example
///
/// ```
/// use vnote::{AssemblyStep, DocumentHandle, IncludeSpec, MemoryHost, Pattern, VariantSpec};
///
/// let host = MemoryHost::new().with_document("note.md", "Hello\nWorld");
/// let pattern = Pattern::new().with_variant(
///     VariantSpec::new("plain").with_step(AssemblyStep::new("current").including(IncludeSpec::all())),
/// );
///
/// let variants = vnote::assemble_variants(&host, &DocumentHandle::new("note.md"), &pattern, None);
/// assert_eq!(variants.len(), 1);
/// assert!(variants[0].markdown.ends_with("---\n\nHello\nWorld"));
/// ```
pub fn assemble_variants<H: Host + ?Sized>(
    host: &H,
    target: &DocumentHandle,
    pattern: &Pattern,
    note_aliases: Option<&SourceMap>,
) -> Vec<AssembledVariant> {
    pattern
        .variants
        .iter()
        .map(|variant| assemble_variant(host, target, pattern, variant, note_aliases))
        .collect()
}

/// Assemble a single variant of `pattern`.
pub fn assemble_variant<H: Host + ?Sized>(
    host: &H,
    target: &DocumentHandle,
    pattern: &Pattern,
    variant: &VariantSpec,
    note_aliases: Option<&SourceMap>,
) -> AssembledVariant {
    let reserved = ReservedKeys::new(target.path(), &variant.id, variant.name.as_deref());
    let mut merge = FrontmatterMerge::new(variant.frontmatter.as_ref(), reserved);
    let mut parts: Vec<String> = Vec::new();

    for step in &variant.assemble {
        let Some(src) = resolve_source(
            host,
            target,
            &step.source,
            pattern.sources.as_ref(),
            note_aliases,
        ) else {
            continue;
        };
        let Some(include) = step.include.as_ref() else {
            trace!(source = %step.source, "step has no include directives");
            continue;
        };
        let index = host.index_of(&src.doc);
        parts.extend(extract(&src.content, index.as_ref(), include, &mut merge));
    }

    let frontmatter = merge.finish();
    let markdown = render_markdown(&render_preamble(&frontmatter), &parts);
    debug!(variant = %variant.id, parts = parts.len(), "assembled variant");

    AssembledVariant {
        id: variant.id.clone(),
        name: variant.name.clone(),
        frontmatter,
        markdown,
    }
}

fn render_markdown(preamble: &str, parts: &[String]) -> String {
    let body = parts.join("\n\n");
    format!("{}\n\n{}", preamble, body.trim())
}
