// Colored terminal output for refinement runs.
//
// main.rs delegates all display formatting here.

use std::collections::BTreeMap;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::refine::iteration::RefineRun;

/// Progress bar ticking once per completed iteration.
pub fn iteration_progress(total: u32) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Refining [{bar:30}] {pos}/{len} {msg}")
            .unwrap(),
    );
    pb
}

/// The line printed as each iteration completes: how many words were added,
/// followed by a preview line when there are any.
pub fn format_iteration(iteration: u32, stopwords_before: usize, added: &[String]) -> String {
    let count = if added.is_empty() {
        "0".dimmed().to_string()
    } else {
        added.len().to_string().bright_green().bold().to_string()
    };
    let mut out =
        format!("  Iteration {iteration} ({stopwords_before} stopwords before): added {count}");
    if !added.is_empty() {
        out.push_str(&format!("\n    {}", super::preview_words(added, 30).dimmed()));
    }
    out
}

/// Top terms per cluster, one block per cluster.
pub fn display_top_terms(top: &BTreeMap<i64, Vec<String>>) {
    if top.is_empty() {
        println!("No clusters to show.");
        return;
    }
    for (id, terms) in top {
        println!("  {} {}", format!("Cluster {id:>3}:").bold(), terms.join(", "));
    }
}

/// End-of-run summary.
pub fn display_run_summary(run: &RefineRun, baseline_size: usize) {
    println!(
        "\n{}",
        format!("=== Stopword refinement ({} iterations) ===", run.iterations.len()).bold()
    );
    println!("  Baseline stopwords: {baseline_size}");
    println!("  Added this run:     {}", run.added.len());
    println!("  Final stopwords:    {}", run.stopwords.len());

    // A run that promotes nothing in its last iteration has converged
    if run.iterations.last().is_some_and(|s| s.added.is_empty()) {
        println!(
            "  {}",
            "Last iteration added nothing; further iterations would not change the list.".dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_iteration() {
        colored::control::set_override(false);
        let added = vec!["journal".to_string(), "paris".to_string()];
        assert_eq!(
            format_iteration(2, 120, &added),
            "  Iteration 2 (120 stopwords before): added 2\n    journal, paris"
        );
        assert_eq!(
            format_iteration(3, 122, &[]),
            "  Iteration 3 (122 stopwords before): added 0"
        );
    }
}
