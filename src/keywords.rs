//! Keyword extraction and clustering over collected content.
//!
//! Terms are ranked by corpus frequency boosted by how often they share a
//! sentence with the seed topic. Terms whose co-occurrence contexts overlap
//! (Jaccard above the configured threshold) are merged into one cluster with a
//! single union-find pass over index pairs.

use std::collections::{BTreeSet, HashMap, HashSet};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::config::{Config, KeywordSettings};
use crate::tokenize;
use crate::types::{Article, ContentItem, Keyword};

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Articles and conjunctions
        "a", "an", "the", "and", "but", "or", "nor", "so", "yet", "both", "either", "neither",
        // Prepositions
        "about", "above", "across", "after", "against", "along", "among", "around", "at",
        "before", "behind", "below", "between", "beyond", "by", "down", "during", "for", "from",
        "in", "inside", "into", "near", "of", "off", "on", "onto", "out", "over", "past",
        "through", "to", "toward", "under", "until", "up", "upon", "with", "within", "without",
        // Pronouns
        "i", "me", "my", "we", "our", "ours", "you", "your", "yours", "he", "him", "his", "she",
        "her", "it", "its", "they", "them", "their", "what", "which", "who", "whom", "this",
        "that", "these", "those",
        // Auxiliaries
        "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having", "do",
        "does", "did", "doing", "can", "could", "shall", "should", "will", "would", "may",
        "might", "must",
        // Other
        "all", "any", "each", "every", "few", "more", "most", "other", "some", "such", "no",
        "not", "only", "own", "same", "than", "too", "very", "just", "also", "now", "here",
        "there", "when", "where", "why", "how", "then", "if", "because", "while", "get", "got",
        "like", "one", "new", "use", "using", "used", "it's", "don't", "can't",
    ]
    .into_iter()
    .collect()
});

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

// ---------------------------------------------------------------------------
// Union-find
// ---------------------------------------------------------------------------

/// Disjoint sets over keyword indices.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

struct Candidate {
    term: String,
    frequency: usize,
    relevance: f64,
}

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    settings: KeywordSettings,
}

impl KeywordExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            settings: config.keywords.clone(),
        }
    }

    /// Keywords ordered by cluster (heaviest cluster first), then by frequency
    /// within each cluster.
    pub fn extract(&self, items: &[ContentItem], seed_topic: &str) -> Vec<Keyword> {
        let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        self.extract_from_texts(&texts, seed_topic)
    }

    /// Extraction over the collected items plus the article body, seeded with
    /// the article's target keyword.
    pub fn extract_for_article(&self, items: &[ContentItem], article: &Article) -> Vec<Keyword> {
        let body = article.body_text();
        let mut texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        texts.push(&body);
        self.extract_from_texts(&texts, &article.target_keyword)
    }

    fn extract_from_texts(&self, texts: &[&str], seed_topic: &str) -> Vec<Keyword> {
        let sentence_terms: Vec<Vec<String>> = texts
            .iter()
            .flat_map(|t| tokenize::sentences(t))
            .map(|s| self.terms(&s))
            .filter(|terms| !terms.is_empty())
            .collect();
        let seed: HashSet<String> = tokenize::words(seed_topic)
            .into_iter()
            .filter(|w| !is_stopword(w))
            .collect();

        let mut frequency: HashMap<&str, usize> = HashMap::new();
        let mut seed_cooccurrence: HashMap<&str, usize> = HashMap::new();
        for terms in &sentence_terms {
            for t in terms {
                *frequency.entry(t.as_str()).or_insert(0) += 1;
            }
            let distinct: BTreeSet<&str> = terms.iter().map(String::as_str).collect();
            for t in &distinct {
                if distinct.iter().any(|o| o != t && seed.contains(*o)) {
                    *seed_cooccurrence.entry(*t).or_insert(0) += 1;
                }
            }
        }

        let mut candidates: Vec<Candidate> = frequency
            .iter()
            .map(|(term, &freq)| {
                let cooc = seed_cooccurrence.get(term).copied().unwrap_or(0);
                Candidate {
                    term: term.to_string(),
                    frequency: freq,
                    relevance: freq as f64 * (1.0 + cooc as f64),
                }
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| b.frequency.cmp(&a.frequency))
                .then_with(|| a.term.cmp(&b.term))
        });
        candidates.truncate(self.settings.max_keywords);

        let contexts = contexts(&candidates, &sentence_terms);
        let mut sets = UnionFind::new(candidates.len());
        for i in 0..candidates.len() {
            for j in i + 1..candidates.len() {
                if jaccard(&contexts[i], &contexts[j]) > self.settings.cluster_threshold {
                    sets.union(i, j);
                }
            }
        }

        let mut clusters: HashMap<usize, Vec<usize>> = HashMap::new();
        for i in 0..candidates.len() {
            let root = sets.find(i);
            clusters.entry(root).or_default().push(i);
        }
        let mut clusters: Vec<Vec<usize>> = clusters.into_values().collect();
        for members in &mut clusters {
            members.sort_by(|&a, &b| {
                candidates[b]
                    .frequency
                    .cmp(&candidates[a].frequency)
                    .then_with(|| candidates[a].term.cmp(&candidates[b].term))
            });
        }
        let total = |members: &[usize]| -> usize {
            members.iter().map(|&i| candidates[i].frequency).sum()
        };
        clusters.sort_by(|a, b| {
            total(b)
                .cmp(&total(a))
                .then_with(|| candidates[a[0]].term.cmp(&candidates[b[0]].term))
        });

        debug!(
            candidates = candidates.len(),
            clusters = clusters.len(),
            "keywords clustered"
        );

        clusters
            .iter()
            .enumerate()
            .flat_map(|(cluster_id, members)| {
                members.iter().map(move |&i| (cluster_id, i))
            })
            .map(|(cluster_id, i)| Keyword {
                term: candidates[i].term.clone(),
                frequency: candidates[i].frequency,
                relevance: candidates[i].relevance,
                cluster_id,
            })
            .collect()
    }

    fn terms(&self, sentence: &str) -> Vec<String> {
        tokenize::words(sentence)
            .into_iter()
            .filter(|w| {
                w.chars().count() >= self.settings.min_term_length
                    && !is_stopword(w)
                    && !w.chars().all(|c| c.is_ascii_digit())
            })
            .collect()
    }
}

/// For each candidate, the other terms it shares a sentence with.
fn contexts(candidates: &[Candidate], sentence_terms: &[Vec<String>]) -> Vec<HashSet<String>> {
    let index: HashMap<&str, usize> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (c.term.as_str(), i))
        .collect();
    let mut contexts = vec![HashSet::new(); candidates.len()];
    for terms in sentence_terms {
        for t in terms {
            if let Some(&i) = index.get(t.as_str()) {
                contexts[i].extend(terms.iter().filter(|o| *o != t).cloned());
            }
        }
    }
    contexts
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection(b).count();
    inter as f64 / (a.len() + b.len() - inter) as f64
}
