#![doc = include_str!("../README.md")]

pub mod assemble;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod frontmatter;
pub mod host;
pub mod pattern;
pub mod position;
pub mod resolve;
mod types;

pub use assemble::{assemble_variant, assemble_variants};
pub use commands::{Unavailable, open_first_variant, open_variant, preview_variants};
pub use config::{NoteConfig, OutputMode, Settings};
pub use error::{Error, PatternError, Result};
pub use frontmatter::render_preamble;
pub use host::{DocumentStore, Host, IndexProvider, MemoryHost, VariantSink};
pub use pattern::load as load_pattern;
pub use position::LineIndex;
pub use types::{
    AssembledVariant, AssemblyStep, DocumentHandle, Frontmatter, HeadingEntry, HeadingRef,
    IncludeSpec, Loc, Pattern, Position, SourceMap, StructuralIndex, VariantSpec,
};
