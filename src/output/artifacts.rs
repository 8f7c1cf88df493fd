// Artifact files written during and after a refinement run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::refine::iteration::{IterationObserver, IterationSnapshot};

use super::render::FrequencyRenderer;
use super::terminal;

/// Quote a CSV field only when it needs it.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Format a header-less top-terms table: one row per cluster, the cluster id
/// then its terms. Short rows are padded with empty fields so that every row
/// has the same width.
pub fn format_top_terms(top: &BTreeMap<i64, Vec<String>>) -> String {
    let width = top.values().map(Vec::len).max().unwrap_or(0);
    let mut out = String::new();
    for (id, terms) in top {
        let mut fields = Vec::with_capacity(width + 1);
        fields.push(id.to_string());
        fields.extend(terms.iter().map(|t| csv_field(t)));
        fields.resize(width + 1, String::new());
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

pub fn top_terms_path(out_dir: &Path, iteration: u32) -> PathBuf {
    out_dir.join(format!("cluster_top_terms_filtered_iter{iteration}.csv"))
}

pub fn rendering_path(out_dir: &Path, cluster: i64, iteration: u32, ext: &str) -> PathBuf {
    out_dir.join(format!("cluster_{cluster}_wordcloud_filtered_iter{iteration}.{ext}"))
}

/// Observer that writes per-iteration top-terms tables and renderings.
///
/// With a progress bar attached it also ticks the bar and prints each
/// iteration's line above it as soon as the iteration completes.
pub struct ArtifactWriter<'a> {
    out_dir: &'a Path,
    renderer: Option<&'a dyn FrequencyRenderer>,
    progress: Option<ProgressBar>,
    /// Every file written, in order
    pub written: Vec<PathBuf>,
}

impl<'a> ArtifactWriter<'a> {
    pub fn new(out_dir: &'a Path, renderer: Option<&'a dyn FrequencyRenderer>) -> Self {
        Self {
            out_dir,
            renderer,
            progress: None,
            written: Vec::new(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    fn write(&mut self, path: PathBuf, bytes: &[u8]) -> Result<()> {
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote artifact");
        self.written.push(path);
        Ok(())
    }

    /// Finish and clear the progress bar, if any.
    pub fn finish(&self) {
        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }
    }
}

impl IterationObserver for ArtifactWriter<'_> {
    fn on_iteration_start(&mut self, iteration: u32, _stopwords: usize) {
        if let Some(pb) = &self.progress {
            pb.set_message(format!("iteration {iteration}"));
        }
    }

    fn on_iteration_end(&mut self, snapshot: &IterationSnapshot<'_>) -> Result<()> {
        if let Some(renderer) = self.renderer {
            for (&cluster, table) in snapshot.display {
                // Nothing survived filtering: no artifact for this cluster
                if table.is_empty() {
                    continue;
                }
                let freqs = table.most_common(table.len());
                let bytes = renderer.render(&freqs)?;
                let path =
                    rendering_path(self.out_dir, cluster, snapshot.iteration, renderer.extension());
                self.write(path, &bytes)?;
            }
        }

        let path = top_terms_path(self.out_dir, snapshot.iteration);
        self.write(path, format_top_terms(snapshot.top_terms).as_bytes())?;

        if let Some(pb) = &self.progress {
            pb.println(terminal::format_iteration(
                snapshot.iteration,
                snapshot.stopwords_before,
                snapshot.added,
            ));
            pb.inc(1);
        }
        info!(
            iteration = snapshot.iteration,
            files = self.written.len(),
            "Wrote iteration artifacts"
        );
        Ok(())
    }

    fn on_run_end(&mut self) {
        self.finish();
    }
}
