// Corpus — documents grouped by their externally assigned cluster.

pub mod clusters;
pub mod loader;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::Result;
use tracing::warn;

use self::clusters::ClusterAssignment;

/// A loaded document. Immutable once read.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub text: String,
}

/// Documents grouped by cluster id, in ascending id order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    clusters: BTreeMap<i64, Vec<Document>>,
}

impl Corpus {
    /// Load the clusters table and the document store, then group documents.
    ///
    /// The clusters table is checked first so that a missing table aborts
    /// before the (potentially large) corpus is read.
    pub fn load(clusters_csv: &Path, data_dir: &Path) -> Result<Self> {
        let assignments = clusters::read_clusters_csv(clusters_csv)?;
        let texts = loader::load_documents(data_dir)?;
        Ok(Self::from_assignments(&assignments, texts))
    }

    /// Group documents by cluster. Assignments naming a file that is not in
    /// the store are skipped.
    pub fn from_assignments(
        assignments: &[ClusterAssignment],
        mut texts: HashMap<String, String>,
    ) -> Self {
        let mut clusters: BTreeMap<i64, Vec<Document>> = BTreeMap::new();
        let mut missing = 0usize;
        for row in assignments {
            // A filename listed twice keeps its first assignment only
            match texts.remove(&row.filename) {
                Some(text) => clusters.entry(row.cluster).or_default().push(Document {
                    filename: row.filename.clone(),
                    text,
                }),
                None => missing += 1,
            }
        }
        if missing > 0 {
            warn!(missing, "Clusters table names documents not found in the store, skipping them");
        }
        Self { clusters }
    }

    /// Build a corpus directly from in-memory clusters (used by tests and tools).
    pub fn from_clusters(clusters: BTreeMap<i64, Vec<Document>>) -> Self {
        Self { clusters }
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn document_count(&self) -> usize {
        self.clusters.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Iterate clusters in ascending id order.
    pub fn clusters(&self) -> impl Iterator<Item = (i64, &[Document])> {
        self.clusters.iter().map(|(id, docs)| (*id, docs.as_slice()))
    }
}
