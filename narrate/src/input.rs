//! Input document validation and loading.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the input path and confirm it is safe to read: canonical
/// (no `..` left), under `allowed_root`, and a regular file.
pub fn validate_path(path: &Path, allowed_root: &Path) -> Result<PathBuf> {
    let resolved = std::fs::canonicalize(path)
        .with_context(|| format!("Input file not found: {}", path.display()))?;

    if !resolved.starts_with(allowed_root) {
        anyhow::bail!(
            "Input file must be located under {}",
            allowed_root.display()
        );
    }

    if !resolved.is_file() {
        anyhow::bail!("Input path is not a regular file: {}", resolved.display());
    }

    Ok(resolved)
}

/// Check the file size against the configured limit.
pub fn validate_size(path: &Path, max_size: u64) -> Result<()> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat input file: {}", path.display()))?
        .len();

    if size > max_size {
        anyhow::bail!("File size too large (limit: {}MB)", max_size / 1024 / 1024);
    }

    Ok(())
}

/// Read the document as UTF-8 text, rejecting empty content.
pub fn read_document(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let content =
        String::from_utf8(bytes).map_err(|_| anyhow::anyhow!("File is not UTF-8 encoded"))?;

    let content = content.trim().to_string();
    if content.is_empty() {
        anyhow::bail!("File is empty");
    }

    Ok(content)
}

/// Full input validation: safe path, size limit, non-empty UTF-8 content.
/// Returns the resolved path and the document text.
pub fn load_document(path: &Path, allowed_root: &Path, max_size: u64) -> Result<(PathBuf, String)> {
    let resolved = validate_path(path, allowed_root)?;
    validate_size(&resolved, max_size)?;
    let content = read_document(&resolved)?;
    Ok((resolved, content))
}
