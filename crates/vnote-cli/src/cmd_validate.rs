use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn run(input: PathBuf) -> Result<()> {
    let content =
        std::fs::read_to_string(&input).with_context(|| format!("Failed to read {:?}", input))?;
    validate_content(&content)
}

fn validate_content(content: &str) -> Result<()> {
    match vnote::load_pattern(content) {
        Ok(pattern) => {
            let ids: Vec<&str> = pattern.variants.iter().map(|v| v.id.as_str()).collect();
            println!(
                "Valid: {} ({} variants: {})",
                pattern.name.as_deref().unwrap_or("pattern"),
                ids.len(),
                ids.join(", ")
            );
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Invalid: {}", e)),
    }
}
