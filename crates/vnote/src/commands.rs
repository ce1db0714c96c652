//! The user-facing operations: preview all variants, open one variant.
//!
//! Each command first checks that the note has a usable pattern. When it
//! does not, the command is [`Unavailable`] rather than failing.

use crate::assemble::{assemble_variant, assemble_variants};
use crate::config::{NoteConfig, Settings, resolve_pattern_file};
use crate::host::{Host, VariantSink};
use crate::pattern::try_read_pattern;
use crate::types::{AssembledVariant, DocumentHandle, Pattern, SourceMap};
use thiserror::Error;

/// Why a command does not apply to a note.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unavailable {
    #[error("No pattern configured for {0}")]
    NoPattern(String),

    #[error("Pattern for {0} is missing or invalid")]
    InvalidPattern(String),

    #[error("Pattern has no variants")]
    NoVariants,

    #[error("No variant with id {0}")]
    UnknownVariant(String),
}

/// A note paired with its loaded pattern and aliases.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub note: DocumentHandle,
    pub pattern_file: DocumentHandle,
    pub pattern: Pattern,
    pub source_aliases: Option<SourceMap>,
}

/// Whether the commands apply to `note`: a pattern file resolves for it.
pub fn is_available<H: Host + ?Sized>(host: &H, note: &DocumentHandle, settings: &Settings) -> bool {
    resolve_pattern_file(host, note, settings).is_some()
}

/// Resolve and load the pattern for `note`, reading everything fresh.
pub fn prepare<H: Host + ?Sized>(
    host: &H,
    note: &DocumentHandle,
    settings: &Settings,
) -> Result<Prepared, Unavailable> {
    let pattern_file = resolve_pattern_file(host, note, settings)
        .ok_or_else(|| Unavailable::NoPattern(note.path().to_string()))?;
    let pattern = try_read_pattern(host, &pattern_file)
        .ok_or_else(|| Unavailable::InvalidPattern(note.path().to_string()))?;
    let source_aliases = NoteConfig::of(host, note).source_aliases;
    Ok(Prepared {
        note: note.clone(),
        pattern_file,
        pattern,
        source_aliases,
    })
}

/// Assemble every variant of the note's pattern and present them in order.
///
/// Returns the presented variants.
pub fn preview_variants<H: Host + ?Sized>(
    host: &H,
    note: &DocumentHandle,
    settings: &Settings,
    sink: &mut dyn VariantSink,
) -> Result<Vec<AssembledVariant>, Unavailable> {
    let prepared = prepare(host, note, settings)?;
    let variants = assemble_variants(
        host,
        note,
        &prepared.pattern,
        prepared.source_aliases.as_ref(),
    );
    for variant in &variants {
        sink.present(variant);
    }
    Ok(variants)
}

/// Assemble and present only the first variant.
pub fn open_first_variant<H: Host + ?Sized>(
    host: &H,
    note: &DocumentHandle,
    settings: &Settings,
    sink: &mut dyn VariantSink,
) -> Result<AssembledVariant, Unavailable> {
    let prepared = prepare(host, note, settings)?;
    let spec = prepared.pattern.variants.first().ok_or(Unavailable::NoVariants)?;
    let variant = assemble_variant(
        host,
        note,
        &prepared.pattern,
        spec,
        prepared.source_aliases.as_ref(),
    );
    sink.present(&variant);
    Ok(variant)
}

/// Re-open a variant by its id.
pub fn open_variant<H: Host + ?Sized>(
    host: &H,
    note: &DocumentHandle,
    settings: &Settings,
    id: &str,
    sink: &mut dyn VariantSink,
) -> Result<AssembledVariant, Unavailable> {
    let prepared = prepare(host, note, settings)?;
    let spec = prepared
        .pattern
        .variant(id)
        .ok_or_else(|| Unavailable::UnknownVariant(id.to_string()))?;
    let variant = assemble_variant(
        host,
        note,
        &prepared.pattern,
        spec,
        prepared.source_aliases.as_ref(),
    );
    sink.present(&variant);
    Ok(variant)
}
