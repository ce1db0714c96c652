use crate::context::Context;
use crate::output::Format;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct VariantRow<'a> {
    id: &'a str,
    name: &'a str,
}

pub fn run(ctx: &Context, note: Option<&str>, format: Format) -> Result<()> {
    match note {
        Some(note) => list_variants(ctx, note, format),
        None => list_notes(ctx, format),
    }
}

/// Notes whose frontmatter points at an existing pattern file.
fn configured_notes(ctx: &Context) -> Result<Vec<String>> {
    Ok(ctx
        .vault
        .list_notes()?
        .into_iter()
        .filter(|n| {
            vnote::commands::is_available(&ctx.vault, &vnote::DocumentHandle::new(n), &ctx.settings)
        })
        .collect())
}

fn list_notes(ctx: &Context, format: Format) -> Result<()> {
    let notes = configured_notes(ctx)?;

    if format.is_json() {
        let output = serde_json::json!({ "notes": notes });
        println!("{}", format.to_json(&output)?);
    } else {
        println!("Notes with patterns:");
        println!();
        if notes.is_empty() {
            println!("  (none)");
        } else {
            for n in &notes {
                println!("  {}", n);
            }
        }
    }
    Ok(())
}

fn list_variants(ctx: &Context, note: &str, format: Format) -> Result<()> {
    let note = ctx.note(note)?;
    let prepared = vnote::commands::prepare(&ctx.vault, &note, &ctx.settings)?;
    let rows: Vec<VariantRow> = prepared
        .pattern
        .variants
        .iter()
        .map(|v| VariantRow {
            id: &v.id,
            name: v.display_name(),
        })
        .collect();

    if format.is_json() {
        let output = serde_json::json!({
            "note": note.path(),
            "pattern": prepared.pattern_file.path(),
            "variants": rows,
        });
        println!("{}", format.to_json(&output)?);
    } else {
        println!("Note: {}", note);
        println!("Pattern: {}", prepared.pattern_file);
        println!();
        if rows.is_empty() {
            println!("  (no variants)");
        } else {
            for row in &rows {
                println!("  {:<16} {}", row.id, row.name);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_configured_notes() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Patterns")).unwrap();
        fs::write(temp.path().join("Patterns/p.yml"), "variants: []").unwrap();
        fs::write(temp.path().join("a.md"), "---\nvirtual_workflow: p\n---\n").unwrap();
        fs::write(temp.path().join("b.md"), "plain").unwrap();
        fs::write(temp.path().join("c.md"), "---\nvirtual_workflow: missing\n---\n").unwrap();
        let ctx = Context::load(temp.path(), None).unwrap();
        assert_eq!(configured_notes(&ctx).unwrap(), vec!["a.md"]);
    }
}
