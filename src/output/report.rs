// Run report — a JSON record of what a refinement run did.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::refine::iteration::{IterationSummary, RefineParams, RefineRun};

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub iterations: u32,
    pub top_k: usize,
    pub top_terms: usize,
    pub clusters: usize,
    pub documents: usize,
    pub baseline_size: usize,
    pub final_size: usize,
    pub added_total: usize,
    pub per_iteration: Vec<IterationSummary>,
}

impl RunReport {
    pub fn new(
        started_at: DateTime<Utc>,
        params: &RefineParams,
        clusters: usize,
        documents: usize,
        baseline_size: usize,
        run: &RefineRun,
    ) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            iterations: params.iterations,
            top_k: params.top_k,
            top_terms: params.top_terms,
            clusters,
            documents,
            baseline_size,
            final_size: run.stopwords.len(),
            added_total: run.added.len(),
            per_iteration: run.iterations.clone(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run report {}", path.display()))
    }
}
