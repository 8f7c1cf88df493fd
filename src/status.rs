// Status display — configured paths, corpus size, persisted list sizes.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::config::Config;
use crate::corpus::clusters;
use crate::stopwords::store;

/// Display status to the terminal. Never fails on missing files; only on
/// files that exist but cannot be read.
pub fn show(config: &Config) -> Result<()> {
    println!("{}", "=== stoprefine status ===".bold());

    if config.data_dir.is_dir() {
        let count = std::fs::read_dir(&config.data_dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("txt"))
            .count();
        println!("Documents: {} ({count} .txt files)", config.data_dir.display());
    } else {
        println!("Documents: {} (missing)", config.data_dir.display());
    }

    if config.clusters_csv.exists() {
        let rows = clusters::read_clusters_csv(&config.clusters_csv)?;
        let mut ids: Vec<i64> = rows.iter().map(|r| r.cluster).collect();
        ids.sort_unstable();
        ids.dedup();
        println!(
            "Clusters table: {} ({} rows, {} clusters)",
            config.clusters_csv.display(),
            rows.len(),
            ids.len()
        );
    } else {
        println!("Clusters table: {} (missing)", config.clusters_csv.display());
        println!("  Run the clustering step first");
    }

    show_list("Extra stopwords", &config.extra_stopwords_path())?;
    show_list("Final stopwords", &config.final_stopwords_path())?;

    match std::fs::metadata(config.report_path()) {
        Ok(meta) => {
            let modified = meta
                .modified()
                .map(|t| chrono::DateTime::<chrono::Local>::from(t).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|_| "unknown".to_string());
            println!("Last run: {modified}");
        }
        Err(_) => println!("Last run: never"),
    }

    println!(
        "Settings: {} iterations, top-{} per cluster, {} renderer",
        config.iterations,
        config.top_k,
        format!("{:?}", config.renderer).to_lowercase()
    );
    Ok(())
}

fn show_list(label: &str, path: &Path) -> Result<()> {
    if path.exists() {
        let words = store::read_word_list(path)?;
        println!("{label}: {} ({} words)", path.display(), words.len());
    } else {
        println!("{label}: {} (not written yet)", path.display());
    }
    Ok(())
}
