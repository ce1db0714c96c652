use crate::context::Context;
use crate::output::{Format, Layout, TextSink};
use anyhow::{Context as _, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};
use vnote::{AssembledVariant, DocumentHandle, OutputMode, Unavailable, VariantSink};
use vnote_vault::VaultWatcher;

type Assembly = std::result::Result<Vec<AssembledVariant>, Unavailable>;

pub fn run(ctx: &Context, note: &str, mode: Option<OutputMode>, format: Format) -> Result<()> {
    let note = ctx.note(note)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(watch(ctx, &note, ctx.mode(mode), format))
}

async fn watch(ctx: &Context, note: &DocumentHandle, mode: OutputMode, format: Format) -> Result<()> {
    let mut latest = Latest::default();
    if let Some(assembly) = latest.update(assemble(ctx, note)) {
        show(assembly, mode, format)?;
    }

    let (tx, mut rx) = mpsc::channel(16);
    let watcher = VaultWatcher::new(ctx.vault.root().to_path_buf(), None);
    let handle = watcher
        .start(tx)
        .await
        .context("Failed to watch vault")?;
    info!(note = note.path(), "watching for changes, press Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            batch = rx.recv() => {
                let Some(paths) = batch else { break };
                debug!(?paths, "vault changed");
                if let Some(assembly) = latest.update(assemble(ctx, note)) {
                    show(assembly, mode, format)?;
                }
            }
        }
    }

    handle.stop().await;
    Ok(())
}

/// Assemble every variant of the note, read fresh from the vault.
fn assemble(ctx: &Context, note: &DocumentHandle) -> Assembly {
    let mut collected: Vec<AssembledVariant> = Vec::new();
    vnote::preview_variants(&ctx.vault, note, &ctx.settings, &mut collected)
}

fn show(assembly: &Assembly, mode: OutputMode, format: Format) -> Result<()> {
    match assembly {
        Ok(variants) => {
            let mut sink = TextSink::new(std::io::stdout().lock(), Layout::Variants(mode), format);
            for variant in variants {
                sink.present(variant);
            }
            sink.finish()?;
        }
        Err(e) => eprintln!("{}", e),
    }
    Ok(())
}

/// The last assembly shown, so unchanged output is not printed again.
#[derive(Default)]
struct Latest {
    shown: Option<Assembly>,
}

impl Latest {
    /// Record a fresh assembly; returns it when it differs from the last one.
    fn update(&mut self, next: Assembly) -> Option<&Assembly> {
        if self.shown.as_ref() == Some(&next) {
            return None;
        }
        self.shown = Some(next);
        self.shown.as_ref()
    }
}
