// Candidate promotion — decides which tokens join the stopword set.
//
// Tokens that make it into the top-K of many clusters carry no information
// about what distinguishes one cluster from another. They are scored with a
// few additive heuristics, and high scorers that look like real words are
// promoted.
//
// Two layers overlap on purpose: the digit/length scoring rules can push a
// token over the threshold, and the alphabetic-only filter afterwards throws
// such tokens out again. Both are kept so that results match earlier runs
// token for token.

use std::collections::{BTreeMap, HashMap};

use crate::stopwords::StopwordSet;

use super::aggregate::ClusterFrequencies;

/// Score increments and thresholds for candidate selection.
#[derive(Debug, Clone)]
pub struct PromotionWeights {
    /// Tokens at most this many characters long get `short_token_points`
    pub short_token_len: usize,
    pub short_token_points: u32,
    /// Tokens containing any digit get `digit_points`
    pub digit_points: u32,
    /// Awarded when presence reaches max(min_presence, clusters / presence_divisor)
    pub presence_points: u32,
    pub min_presence: usize,
    pub presence_divisor: usize,
    /// Awarded when global frequency is strictly above `high_frequency`
    pub high_frequency: usize,
    pub high_frequency_points: u32,
    /// Minimum score for a token to become a candidate
    pub candidate_threshold: u32,
}

impl Default for PromotionWeights {
    fn default() -> Self {
        Self {
            short_token_len: 2,
            short_token_points: 2,
            digit_points: 2,
            presence_points: 3,
            min_presence: 2,
            presence_divisor: 3,
            high_frequency: 100,
            high_frequency_points: 1,
            candidate_threshold: 3,
        }
    }
}

impl PromotionWeights {
    /// Presence needed for the cross-cluster bonus with `clusters` clusters.
    pub fn presence_threshold(&self, clusters: usize) -> usize {
        self.min_presence.max(clusters / self.presence_divisor.max(1))
    }
}

/// A scored token, kept for reporting and for the sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredToken {
    pub token: String,
    pub score: u32,
    pub presence: usize,
    pub global_count: usize,
}

/// Number of distinct clusters whose top-K list contains each token.
pub fn presence_counts(cluster_top: &BTreeMap<i64, Vec<String>>) -> HashMap<&str, usize> {
    let mut presence: HashMap<&str, usize> = HashMap::new();
    for top in cluster_top.values() {
        // Each cluster counts at most once per token
        let mut seen = std::collections::HashSet::new();
        for token in top {
            if seen.insert(token.as_str()) {
                *presence.entry(token.as_str()).or_insert(0) += 1;
            }
        }
    }
    presence
}

/// Score a single token.
pub fn score_token(
    token: &str,
    presence: usize,
    global_count: usize,
    cluster_count: usize,
    weights: &PromotionWeights,
) -> u32 {
    let mut score = 0;
    if token.chars().count() <= weights.short_token_len {
        score += weights.short_token_points;
    }
    if token.chars().any(|c| c.is_numeric()) {
        score += weights.digit_points;
    }
    if presence >= weights.presence_threshold(cluster_count) {
        score += weights.presence_points;
    }
    if global_count > weights.high_frequency {
        score += weights.high_frequency_points;
    }
    score
}

/// Every token whose score meets the threshold, before the alphabetic filter.
pub fn score_candidates(
    freqs: &ClusterFrequencies,
    weights: &PromotionWeights,
) -> Vec<ScoredToken> {
    let cluster_count = freqs.cluster_top.len();
    let mut scored: Vec<ScoredToken> = presence_counts(&freqs.cluster_top)
        .into_iter()
        .map(|(token, presence)| {
            let global_count = freqs.global_counts.get(token);
            ScoredToken {
                token: token.to_string(),
                score: score_token(token, presence, global_count, cluster_count, weights),
                presence,
                global_count,
            }
        })
        .filter(|s| s.score >= weights.candidate_threshold)
        .collect();
    scored.sort_by(|a, b| a.token.cmp(&b.token));
    scored
}

/// Whether a candidate looks like a real word: longer than one character
/// and purely alphabetic.
pub fn is_promotable(token: &str) -> bool {
    token.chars().count() > 1 && token.chars().all(char::is_alphabetic)
}

/// Filter candidates and order them by presence, then global frequency
/// (both descending), then token.
pub fn rank_candidates(mut candidates: Vec<ScoredToken>) -> Vec<ScoredToken> {
    candidates.retain(|c| is_promotable(&c.token));
    candidates.sort_by(|a, b| {
        b.presence
            .cmp(&a.presence)
            .then_with(|| b.global_count.cmp(&a.global_count))
            .then_with(|| a.token.cmp(&b.token))
    });
    candidates
}

/// Add ranked candidates to `stopwords`. Returns the tokens actually added,
/// in rank order; tokens already present are skipped.
pub fn promote(stopwords: &mut StopwordSet, ranked: &[ScoredToken]) -> Vec<String> {
    ranked
        .iter()
        .filter(|c| stopwords.insert(&c.token))
        .map(|c| c.token.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_threshold() {
        let w = PromotionWeights::default();
        assert_eq!(w.presence_threshold(2), 2);
        assert_eq!(w.presence_threshold(6), 2);
        assert_eq!(w.presence_threshold(9), 3);
        assert_eq!(w.presence_threshold(10), 3);
    }

    #[test]
    fn test_score_rules_are_additive() {
        let w = PromotionWeights::default();
        // short + digit + presence + frequency
        assert_eq!(score_token("42", 5, 500, 6, &w), 8);
        // nothing applies
        assert_eq!(score_token("journal", 1, 10, 6, &w), 0);
        // presence alone reaches the threshold
        assert_eq!(score_token("journal", 2, 10, 6, &w), 3);
        // frequency is strictly greater than 100
        assert_eq!(score_token("journal", 1, 100, 6, &w), 0);
        assert_eq!(score_token("journal", 1, 101, 6, &w), 1);
    }

    #[test]
    fn test_is_promotable() {
        assert!(is_promotable("noir"));
        assert!(is_promotable("été"));
        assert!(!is_promotable("a"));
        assert!(!is_promotable("l'"));
        assert!(!is_promotable("peut-être"));
        assert!(!is_promotable("42"));
    }

    #[test]
    fn test_promote_skips_existing() {
        let mut stop: StopwordSet = ["noir"].into_iter().collect();
        let ranked = vec![
            ScoredToken { token: "noir".into(), score: 3, presence: 2, global_count: 5 },
            ScoredToken { token: "chat".into(), score: 3, presence: 2, global_count: 2 },
        ];
        assert_eq!(promote(&mut stop, &ranked), vec!["chat".to_string()]);
        assert!(stop.contains("chat"));
    }
}
