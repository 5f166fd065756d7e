//! Audio segment files: naming, writing, cleanup, and the merge capability.

pub mod ffmpeg;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Capability to join ordered audio segments into one output file.
///
/// Kept narrow so tests can substitute a deterministic fake for the
/// external merge tool.
pub trait AudioMerger {
    fn merge(&self, segments: &[PathBuf], output: &Path) -> Result<()>;
}

/// Path for one segment file. Indices are 0-based internally and 1-based
/// in filenames.
pub fn segment_path(output_dir: &Path, prefix: &str, index: usize, format: &str) -> PathBuf {
    output_dir.join(format!("{prefix}_part{}.{format}", index + 1))
}

/// Path for the final merged file, placed next to the segments.
pub fn merged_path(output_dir: &Path, prefix: &str, format: &str) -> PathBuf {
    output_dir.join(format!("{prefix}_merged.{format}"))
}

/// Write one chunk's audio to its segment file, overwriting any file left
/// from a prior run.
pub fn write_segment(
    audio: &[u8],
    index: usize,
    prefix: &str,
    output_dir: &Path,
    format: &str,
) -> Result<PathBuf> {
    let path = segment_path(output_dir, prefix, index, format);
    std::fs::write(&path, audio)
        .with_context(|| format!("Failed to write segment: {}", path.display()))?;
    Ok(path)
}

/// Remove segment files, best-effort. Deletion failures are reported but
/// never escalated; the pipeline's correctness does not depend on them.
pub fn remove_segments(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            eprintln!("Failed to delete {}: {}", path.display(), e);
        }
    }
}
