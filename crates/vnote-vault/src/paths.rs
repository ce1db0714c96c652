//! Conversion between vault-relative note paths and filesystem paths.

use crate::error::{Result, VaultError};
use std::path::{Component, Path, PathBuf};

/// Normalize a vault-relative reference: `/` separators, no `.` segments.
///
/// Absolute paths and `..` segments are rejected.
pub fn normalize(reference: &str) -> Result<String> {
    let mut parts = Vec::new();
    for component in Path::new(reference.trim()).components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(s) => parts.push(s),
                None => return Err(VaultError::OutsideVault(reference.to_string())),
            },
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(VaultError::OutsideVault(reference.to_string()));
            }
        }
    }
    Ok(parts.join("/"))
}

/// Join a normalized reference onto the vault root.
pub fn to_fs_path(root: &Path, reference: &str) -> Result<PathBuf> {
    let normalized = normalize(reference)?;
    Ok(normalized.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part)))
}

/// The vault-relative form of a filesystem path under `root`.
pub fn to_reference(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    let parts = parts?;
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Whether a path names a file the vault treats as a note or pattern.
pub fn is_vault_text(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md" | "yml" | "yaml")
    )
}
