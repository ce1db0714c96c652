use crate::context::Context;
use crate::output::{Format, Layout, TextSink};
use anyhow::Result;
use tracing::info;
use vnote::OutputMode;

pub fn run(ctx: &Context, note: &str, mode: Option<OutputMode>, format: Format) -> Result<()> {
    let note = ctx.note(note)?;
    let mut sink = TextSink::new(
        std::io::stdout().lock(),
        Layout::Variants(ctx.mode(mode)),
        format,
    );
    let variants = vnote::preview_variants(&ctx.vault, &note, &ctx.settings, &mut sink)?;
    sink.finish()?;
    if variants.is_empty() {
        info!(note = note.path(), "pattern has no variants");
    }
    Ok(())
}
