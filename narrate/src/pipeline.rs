//! End-to-end narration pipeline: segment, synthesize, merge, clean up.

use crate::audio::{self, AudioMerger};
use crate::config::NarrateConfig;
use crate::synth::Synthesizer;
use crate::text::{self, TextChunk};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Drives one document through the whole pipeline. Owns the lifecycle of
/// every segment file and the merged file for the run: components report
/// errors, only the pipeline decides what is kept or discarded.
pub struct Pipeline<'a> {
    synthesizer: &'a Synthesizer,
    merger: &'a dyn AudioMerger,
    config: &'a NarrateConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        synthesizer: &'a Synthesizer,
        merger: &'a dyn AudioMerger,
        config: &'a NarrateConfig,
    ) -> Self {
        Self {
            synthesizer,
            merger,
            config,
        }
    }

    /// Run the pipeline over validated document text. Segment and merged
    /// filenames are derived from `prefix`; everything lands in
    /// `output_dir`. Returns the merged file's path.
    pub async fn run(&self, content: &str, prefix: &str, output_dir: &Path) -> Result<PathBuf> {
        let chunks = text::segment(content, self.config.token_budget);
        eprintln!("Number of segments: {}", chunks.len());

        let segments = self.synthesize_all(&chunks, prefix, output_dir).await?;

        let merged = audio::merged_path(output_dir, prefix, &self.config.response_format);
        eprintln!("Merging audio segments...");
        // Merge failure leaves the segment files in place for inspection,
        // unlike a synthesis failure.
        self.merger
            .merge(&segments, &merged)
            .context("Failed to merge audio files")?;

        audio::remove_segments(&segments);

        Ok(merged)
    }

    /// Synthesize every chunk in document order, one at a time. On any
    /// chunk's failure, every segment file created so far in this run is
    /// deleted before the error propagates; later chunks are not attempted.
    async fn synthesize_all(
        &self,
        chunks: &[TextChunk],
        prefix: &str,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut segments: Vec<PathBuf> = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            pb.set_message(format!(
                "part {}: {} chars / {} tokens",
                chunk.index + 1,
                chunk.text.chars().count(),
                chunk.token_count()
            ));

            match self.create_segment(chunk, prefix, output_dir).await {
                Ok(path) => {
                    segments.push(path);
                    pb.inc(1);
                }
                Err(e) => {
                    pb.abandon_with_message(format!("part {} failed", chunk.index + 1));
                    audio::remove_segments(&segments);
                    return Err(e)
                        .with_context(|| format!("Failed to generate part {}", chunk.index + 1));
                }
            }
        }

        pb.finish_with_message("synthesis complete");
        Ok(segments)
    }

    /// Synthesize one chunk and persist it as a segment file.
    async fn create_segment(
        &self,
        chunk: &TextChunk,
        prefix: &str,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let audio_bytes = self.synthesizer.synthesize_with_retry(&chunk.text).await?;
        audio::write_segment(
            &audio_bytes,
            chunk.index,
            prefix,
            output_dir,
            &self.config.response_format,
        )
    }
}
