use crate::context::Context;
use crate::output::{Format, Layout, TextSink};
use anyhow::Result;
use tracing::debug;

pub fn run(ctx: &Context, note: &str, id: Option<&str>, format: Format) -> Result<()> {
    let note = ctx.note(note)?;
    let mut sink = TextSink::new(std::io::stdout().lock(), Layout::Document, format);
    let variant = match id {
        Some(id) => vnote::open_variant(&ctx.vault, &note, &ctx.settings, id, &mut sink)?,
        None => vnote::open_first_variant(&ctx.vault, &note, &ctx.settings, &mut sink)?,
    };
    sink.finish()?;
    debug!(note = note.path(), variant = %variant.id, "opened variant");
    Ok(())
}
