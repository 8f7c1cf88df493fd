// Iteration driver — runs aggregate -> score -> promote a fixed number of times.
//
// The stopword set is threaded through explicitly: each iteration takes the
// current set by value and hands back the expanded one. There is no
// convergence check; a run always performs the configured number of
// iterations, even after one adds nothing.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::corpus::Corpus;
use crate::stopwords::StopwordSet;

use super::aggregate::{self, ClusterFrequencies, CountFilter, FrequencyTable};
use super::promote::{self, PromotionWeights};
use super::tokenizer::{Tokenizer, WordSplitter};

pub const DEFAULT_ITERATIONS: u32 = 3;
pub const DEFAULT_TOP_K: usize = 50;
pub const DEFAULT_TOP_TERMS: usize = 20;

/// Tunables for a refinement run.
#[derive(Debug, Clone)]
pub struct RefineParams {
    pub iterations: u32,
    /// Tokens per cluster considered for candidate selection
    pub top_k: usize,
    /// Width of the per-iteration top-terms table
    pub top_terms: usize,
    pub weights: PromotionWeights,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            top_k: DEFAULT_TOP_K,
            top_terms: DEFAULT_TOP_TERMS,
            weights: PromotionWeights::default(),
        }
    }
}

/// Where the driver is in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefineState {
    /// About to run iteration `i` (1-based)
    Iterate(u32),
    Done,
}

impl RefineState {
    pub fn start(total: u32) -> Self {
        if total == 0 {
            RefineState::Done
        } else {
            RefineState::Iterate(1)
        }
    }

    /// Unconditional transition after an iteration completes.
    pub fn next(self, total: u32) -> Self {
        match self {
            RefineState::Iterate(i) if i < total => RefineState::Iterate(i + 1),
            _ => RefineState::Done,
        }
    }
}

/// Result of a single iteration.
#[derive(Debug, Clone)]
pub struct IterationOutcome {
    /// The expanded stopword set
    pub stopwords: StopwordSet,
    /// Tokens added this iteration, in rank order
    pub added: Vec<String>,
    /// The frequencies the promotion decisions were based on
    pub frequencies: ClusterFrequencies,
}

/// Run stages tokenize -> aggregate -> promote once.
pub fn refine_once<S: WordSplitter>(
    corpus: &Corpus,
    tokenizer: &Tokenizer<S>,
    mut stopwords: StopwordSet,
    params: &RefineParams,
) -> IterationOutcome {
    let frequencies = aggregate::aggregate(corpus, tokenizer, &stopwords, params.top_k);
    let candidates = promote::score_candidates(&frequencies, &params.weights);
    let candidate_count = candidates.len();
    let ranked = promote::rank_candidates(candidates);
    debug!(
        candidates = candidate_count,
        promotable = ranked.len(),
        "Scored candidates"
    );
    let added = promote::promote(&mut stopwords, &ranked);
    IterationOutcome {
        stopwords,
        added,
        frequencies,
    }
}

/// Per-cluster counts after filtering with `stopwords`, minus single-character
/// tokens. Used for top-terms tables and renderings.
pub fn display_counts<S: WordSplitter>(
    corpus: &Corpus,
    tokenizer: &Tokenizer<S>,
    stopwords: &StopwordSet,
) -> BTreeMap<i64, FrequencyTable> {
    corpus
        .clusters()
        .map(|(id, docs)| {
            (
                id,
                aggregate::count_documents(docs, tokenizer, stopwords, CountFilter::Display),
            )
        })
        .collect()
}

/// Top `n` tokens of each display table.
pub fn top_terms(tables: &BTreeMap<i64, FrequencyTable>, n: usize) -> BTreeMap<i64, Vec<String>> {
    tables
        .iter()
        .map(|(&id, table)| {
            let terms = table
                .most_common(n)
                .into_iter()
                .map(|(t, _)| t.to_string())
                .collect();
            (id, terms)
        })
        .collect()
}

/// What observers see at the end of each iteration.
pub struct IterationSnapshot<'a> {
    pub iteration: u32,
    pub stopwords_before: usize,
    pub stopwords: &'a StopwordSet,
    pub added: &'a [String],
    /// Post-promotion display counts per cluster
    pub display: &'a BTreeMap<i64, FrequencyTable>,
    pub top_terms: &'a BTreeMap<i64, Vec<String>>,
}

/// Hooks called by the driver. Artifact writing and progress display live
/// behind this so the driver itself does no I/O.
pub trait IterationObserver {
    /// Called when an iteration begins.
    fn on_iteration_start(&mut self, _iteration: u32, _stopwords: usize) {}

    /// Called once per iteration after promotion.
    fn on_iteration_end(&mut self, snapshot: &IterationSnapshot<'_>) -> Result<()>;

    /// Called once when the run stops, whether it completed or failed.
    fn on_run_end(&mut self) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl IterationObserver for NoopObserver {
    fn on_iteration_end(&mut self, _snapshot: &IterationSnapshot<'_>) -> Result<()> {
        Ok(())
    }
}

/// Summary of one iteration, kept for the run report.
#[derive(Debug, Clone, Serialize)]
pub struct IterationSummary {
    pub iteration: u32,
    pub stopwords_before: usize,
    pub added: Vec<String>,
    pub top_terms: BTreeMap<i64, Vec<String>>,
}

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct RefineRun {
    pub stopwords: StopwordSet,
    /// Every token added during the run
    pub added: StopwordSet,
    pub iterations: Vec<IterationSummary>,
}

/// Drive the full fixed-length refinement loop from `baseline`.
///
/// `observer.on_run_end` is called exactly once, also when an observer hook
/// fails partway through.
pub fn run<S: WordSplitter>(
    corpus: &Corpus,
    tokenizer: &Tokenizer<S>,
    baseline: StopwordSet,
    params: &RefineParams,
    observer: &mut dyn IterationObserver,
) -> Result<RefineRun> {
    let result = run_iterations(corpus, tokenizer, baseline, params, observer);
    observer.on_run_end();
    result
}

fn run_iterations<S: WordSplitter>(
    corpus: &Corpus,
    tokenizer: &Tokenizer<S>,
    baseline: StopwordSet,
    params: &RefineParams,
    observer: &mut dyn IterationObserver,
) -> Result<RefineRun> {
    let mut stopwords = baseline;
    let mut added_total = StopwordSet::new();
    let mut iterations = Vec::with_capacity(params.iterations as usize);
    let mut state = RefineState::start(params.iterations);

    while let RefineState::Iterate(i) = state {
        let before = stopwords.len();
        info!(iteration = i, stopwords = before, "Starting iteration");
        observer.on_iteration_start(i, before);

        let outcome = refine_once(corpus, tokenizer, stopwords, params);
        stopwords = outcome.stopwords;
        added_total.extend(outcome.added.iter());
        info!(
            iteration = i,
            added = outcome.added.len(),
            total = stopwords.len(),
            "Iteration complete"
        );

        let display = display_counts(corpus, tokenizer, &stopwords);
        let top = top_terms(&display, params.top_terms);
        observer.on_iteration_end(&IterationSnapshot {
            iteration: i,
            stopwords_before: before,
            stopwords: &stopwords,
            added: &outcome.added,
            display: &display,
            top_terms: &top,
        })?;

        iterations.push(IterationSummary {
            iteration: i,
            stopwords_before: before,
            added: outcome.added,
            top_terms: top,
        });
        state = state.next(params.iterations);
    }

    Ok(RefineRun {
        stopwords,
        added: added_total,
        iterations,
    })
}
