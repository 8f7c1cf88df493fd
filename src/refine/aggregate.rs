// Cluster frequency aggregation.
//
// Per-cluster token counts (excluding current stopwords and all-digit tokens),
// each cluster truncated to its top-K tokens, plus one global count summed
// over all clusters. Everything is rebuilt from scratch every iteration
// because the exclusion set changes between iterations.

use std::collections::{BTreeMap, HashMap};

use crate::corpus::{Corpus, Document};
use crate::stopwords::StopwordSet;

use super::tokenizer::{Tokenizer, WordSplitter};

/// Token -> occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: &str, n: usize) {
        if let Some(count) = self.counts.get_mut(token) {
            *count += n;
        } else {
            self.counts.insert(token.to_string(), n);
        }
    }

    /// Add every count from `other` into this table.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (token, &n) in &other.counts {
            self.add(token, n);
        }
    }

    /// Count for `token`, zero if unseen.
    pub fn get(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `k` most frequent tokens, highest count first. Equal counts are
    /// ordered lexicographically so results never depend on hash order.
    pub fn most_common(&self, k: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> =
            self.counts.iter().map(|(t, &n)| (t.as_str(), n)).collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(k);
        entries
    }
}

impl<'a> FromIterator<&'a str> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = Self::new();
        for token in iter {
            table.add(token, 1);
        }
        table
    }
}

/// Output of one aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct ClusterFrequencies {
    /// Cluster id -> its top-K tokens, most frequent first.
    pub cluster_top: BTreeMap<i64, Vec<String>>,
    /// Counts summed over every cluster (not truncated).
    pub global_counts: FrequencyTable,
}

/// True when every character is a digit. Empty strings are not digits.
pub fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_numeric)
}

/// Which tokens survive filtering for a given purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFilter {
    /// Used for candidate selection: stopwords and all-digit tokens excluded.
    Candidates,
    /// Used for reporting and renderings: additionally drops single-character
    /// tokens.
    Display,
}

impl CountFilter {
    fn keeps(self, token: &str, stopwords: &StopwordSet) -> bool {
        if stopwords.contains(token) || is_all_digits(token) {
            return false;
        }
        match self {
            CountFilter::Candidates => true,
            CountFilter::Display => token.chars().count() > 1,
        }
    }
}

/// Count the tokens of a group of documents, after filtering.
pub fn count_documents<S: WordSplitter>(
    docs: &[Document],
    tokenizer: &Tokenizer<S>,
    stopwords: &StopwordSet,
    filter: CountFilter,
) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for doc in docs {
        for token in tokenizer.tokenize(&doc.text) {
            if filter.keeps(&token, stopwords) {
                table.add(&token, 1);
            }
        }
    }
    table
}

/// Aggregate already-computed per-cluster tables into top-K lists and the
/// global table.
pub fn aggregate_tables(
    tables: &BTreeMap<i64, FrequencyTable>,
    top_k: usize,
) -> ClusterFrequencies {
    let mut out = ClusterFrequencies::default();
    for (&cluster, table) in tables {
        let top = table
            .most_common(top_k)
            .into_iter()
            .map(|(token, _)| token.to_string())
            .collect();
        out.cluster_top.insert(cluster, top);
        out.global_counts.merge(table);
    }
    out
}

/// Full aggregation pass over a corpus.
pub fn aggregate<S: WordSplitter>(
    corpus: &Corpus,
    tokenizer: &Tokenizer<S>,
    stopwords: &StopwordSet,
    top_k: usize,
) -> ClusterFrequencies {
    let tables: BTreeMap<i64, FrequencyTable> = corpus
        .clusters()
        .map(|(id, docs)| {
            (
                id,
                count_documents(docs, tokenizer, stopwords, CountFilter::Candidates),
            )
        })
        .collect();
    aggregate_tables(&tables, top_k)
}
