use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::output::render::{FrequencyRenderer, JsonRenderer, SvgCloudRenderer};
use crate::refine::iteration::{RefineParams, DEFAULT_ITERATIONS, DEFAULT_TOP_K, DEFAULT_TOP_TERMS};

/// Which frequency renderer to use for per-cluster artifacts.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererBackend {
    /// SVG word cloud (default)
    Svg,
    /// Raw distribution as JSON
    Json,
    /// No renderings at all
    None,
}

impl RendererBackend {
    pub fn build(&self) -> Option<Box<dyn FrequencyRenderer>> {
        match self {
            RendererBackend::Svg => Some(Box::new(SvgCloudRenderer::default())),
            RendererBackend::Json => Some(Box::new(JsonRenderer)),
            RendererBackend::None => None,
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// Every value has a default matching the archive layout (`data/txt` for
/// documents, `tp3` for outputs, the 1950s decade), so a bare run works from
/// the project root. The .env file is loaded at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of plain-text documents
    pub data_dir: PathBuf,
    /// Directory for every artifact (also holds the clusters table by default)
    pub out_dir: PathBuf,
    /// Decade label used in the default clusters table name, e.g. "1950_1959"
    pub decade: String,
    pub clusters_csv: PathBuf,
    pub iterations: u32,
    pub top_k: usize,
    pub top_terms: usize,
    pub renderer: RendererBackend,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let data_dir = env::var("STOPREFINE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data").join("txt"));
        let out_dir = env::var("STOPREFINE_OUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("tp3"));
        let decade = env::var("STOPREFINE_DECADE").unwrap_or_else(|_| "1950_1959".to_string());
        let clusters_csv = env::var("STOPREFINE_CLUSTERS_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|_| out_dir.join(format!("clusters_{decade}.csv")));

        let renderer = match env::var("STOPREFINE_RENDERER").as_deref() {
            Ok("json") => RendererBackend::Json,
            Ok("none") => RendererBackend::None,
            // "svg" or unset
            _ => RendererBackend::Svg,
        };

        Ok(Self {
            data_dir,
            out_dir,
            decade,
            clusters_csv,
            iterations: parse_env("STOPREFINE_ITERATIONS", DEFAULT_ITERATIONS)?,
            top_k: parse_env("STOPREFINE_TOP_K", DEFAULT_TOP_K)?,
            top_terms: parse_env("STOPREFINE_TOP_TERMS", DEFAULT_TOP_TERMS)?,
            renderer,
        })
    }

    /// Path of the persisted list of words added by refinement runs.
    pub fn extra_stopwords_path(&self) -> PathBuf {
        self.out_dir.join("stopwords_extra.txt")
    }

    /// Path of the full cumulative stopword list.
    pub fn final_stopwords_path(&self) -> PathBuf {
        self.out_dir.join("stopwords_final.txt")
    }

    pub fn report_path(&self) -> PathBuf {
        self.out_dir.join("stopwords_run.json")
    }

    /// Refinement parameters, with optional CLI overrides.
    pub fn refine_params(&self, iterations: Option<u32>, top_k: Option<usize>) -> RefineParams {
        RefineParams {
            iterations: iterations.unwrap_or(self.iterations),
            top_k: top_k.unwrap_or(self.top_k),
            top_terms: self.top_terms,
            ..RefineParams::default()
        }
    }

    /// Check that the clusters table exists. Call this before loading
    /// anything else so a missing table aborts immediately.
    pub fn require_clusters(&self) -> Result<()> {
        if !self.clusters_csv.exists() {
            anyhow::bail!(
                "Clusters table not found: {}\n\
                 Run the clustering step first, or set STOPREFINE_CLUSTERS_CSV.",
                self.clusters_csv.display()
            );
        }
        Ok(())
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}")),
        Err(_) => Ok(default),
    }
}
