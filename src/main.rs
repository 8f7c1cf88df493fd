use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use stoprefine::config::Config;
use stoprefine::corpus::Corpus;
use stoprefine::output::artifacts::ArtifactWriter;
use stoprefine::output::report::RunReport;
use stoprefine::output::terminal;
use stoprefine::refine::iteration;
use stoprefine::refine::tokenizer::Tokenizer;
use stoprefine::stopwords::{baseline, store};

/// stoprefine: iterative stopword refinement for clustered text corpora.
///
/// Promotes words that dominate many clusters at once into the stopword
/// list, so that what remains describes what makes each cluster distinct.
#[derive(Parser)]
#[command(name = "stoprefine", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the refinement loop and write stopword lists, tables and renderings
    Expand {
        /// Number of iterations (default: STOPREFINE_ITERATIONS or 3)
        #[arg(long)]
        iterations: Option<u32>,

        /// Tokens per cluster considered for promotion (default: STOPREFINE_TOP_K or 50)
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Show the top terms per cluster under the current stopword list
    TopTerms {
        /// Terms per cluster (default: STOPREFINE_TOP_TERMS or 20)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the normalized tokens of a piece of text
    Tokenize {
        /// The text to tokenize
        text: String,
    },

    /// Show configured paths and persisted list sizes
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stoprefine=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Expand { iterations, top_k } => {
            let config = Config::load()?;
            config.require_clusters()?;
            let params = config.refine_params(iterations, top_k);

            println!("Loading corpus from {}...", config.data_dir.display());
            let corpus = Corpus::load(&config.clusters_csv, &config.data_dir)?;
            if corpus.is_empty() {
                warn!("No clustered documents found; nothing will be promoted");
            }
            println!(
                "  {} documents in {} clusters",
                corpus.document_count(),
                corpus.cluster_count()
            );

            std::fs::create_dir_all(&config.out_dir).with_context(|| {
                format!("Failed to create output directory {}", config.out_dir.display())
            })?;

            let baseline = baseline::load_baseline(&config.extra_stopwords_path())?;
            let baseline_size = baseline.len();
            println!("  Baseline stopwords: {baseline_size}");

            let started_at = chrono::Utc::now();
            let tokenizer = Tokenizer::new();
            let renderer = config.renderer.build();
            let mut writer = ArtifactWriter::new(&config.out_dir, renderer.as_deref())
                .with_progress(terminal::iteration_progress(params.iterations));

            // The writer clears its progress bar when the run ends, failed or not
            let run = iteration::run(&corpus, &tokenizer, baseline, &params, &mut writer)?;

            let extra_path = config.extra_stopwords_path();
            let final_path = config.final_stopwords_path();
            store::write_stopword_set(&extra_path, &run.added)?;
            store::write_stopword_set(&final_path, &run.stopwords)?;

            let report = RunReport::new(
                started_at,
                &params,
                corpus.cluster_count(),
                corpus.document_count(),
                baseline_size,
                &run,
            );
            report.write(&config.report_path())?;
            info!(
                artifacts = writer.written.len(),
                added = run.added.len(),
                "Refinement run complete"
            );

            terminal::display_run_summary(&run, baseline_size);
            println!("\n{}", "Done.".bold());
            println!("  New extra tokens: {}", extra_path.display());
            println!("  Final stopwords:  {}", final_path.display());
            println!("  Run report:       {}", config.report_path().display());
        }

        Commands::TopTerms { limit } => {
            let config = Config::load()?;
            config.require_clusters()?;
            let corpus = Corpus::load(&config.clusters_csv, &config.data_dir)?;
            let stopwords = baseline::load_baseline(&config.extra_stopwords_path())?;

            let tokenizer = Tokenizer::new();
            let display = iteration::display_counts(&corpus, &tokenizer, &stopwords);
            let top = iteration::top_terms(&display, limit.unwrap_or(config.top_terms));

            println!(
                "\n{}",
                format!("=== Top terms ({} stopwords excluded) ===", stopwords.len()).bold()
            );
            terminal::display_top_terms(&top);
        }

        Commands::Tokenize { text } => {
            let tokens = Tokenizer::new().tokenize(&text);
            for token in tokens {
                println!("{token}");
            }
        }

        Commands::Status => {
            let config = Config::load()?;
            stoprefine::status::show(&config)?;
        }
    }

    Ok(())
}
