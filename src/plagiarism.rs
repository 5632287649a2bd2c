//! Originality scoring against a reference corpus.
//!
//! Three independent measures, each reported as an originality contribution
//! in [0, 1] (1.0 = nothing similar found), combined by a fixed weighted mean.
//! Results depend only on the article and the multiset of corpus items: the
//! order of the corpus never changes a score or a reported span.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::{Config, MeasureWeights, Thresholds};
use crate::error::InputError;
use crate::tokenize;
use crate::types::{
    Article, ContentItem, PlagiarismReport, SimilarityMeasure, SimilarityMethod, SpanMatch,
};

pub const EMPTY_CORPUS_WARNING: &str =
    "reference corpus is empty or has no text; originality score is vacuous, not measured";

const TFIDF_SPAN_TERMS: usize = 10;

/// Weighted mean of the three contributions, clamped to [0, 1].
pub fn aggregate(weights: &MeasureWeights, ngram: f64, tfidf: f64, sentence: f64) -> f64 {
    let total = weights.ngram + weights.tfidf + weights.sentence;
    if total <= 0.0 {
        return 0.0;
    }
    let weighted = weights.ngram * ngram + weights.tfidf * tfidf + weights.sentence * sentence;
    (weighted / total).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Prepared documents
// ---------------------------------------------------------------------------

struct Document {
    id: String,
    words: Vec<String>,
    ngrams: HashSet<String>,
    term_counts: BTreeMap<String, usize>,
}

impl Document {
    fn new(id: &str, text: &str, n: usize) -> Self {
        let words = tokenize::words(text);
        let ngrams = tokenize::ngrams(&words, n).collect();
        let mut term_counts = BTreeMap::new();
        for w in &words {
            *term_counts.entry(w.clone()).or_insert(0) += 1;
        }
        Self {
            id: id.to_string(),
            words,
            ngrams,
            term_counts,
        }
    }
}

struct ReferenceSentence<'a> {
    id: &'a str,
    raw: String,
    shingles: HashSet<String>,
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PlagiarismDetector {
    thresholds: Thresholds,
}

impl PlagiarismDetector {
    pub fn new(config: &Config) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
        }
    }

    pub fn detect(
        &self,
        article: &Article,
        corpus: &[ContentItem],
    ) -> Result<PlagiarismReport, InputError> {
        article.validate()?;

        let n = self.thresholds.ngram_size;
        let doc = Document::new("", &article.body_text(), n);
        let references: Vec<Document> = corpus
            .par_iter()
            .map(|item| Document::new(&item.id, &item.text, n))
            .collect();

        // Items without a single word leave nothing to compare against.
        if references.iter().all(|r| r.words.is_empty()) {
            warn!(corpus = corpus.len(), "{EMPTY_CORPUS_WARNING}");
            return Ok(vacuous_report(corpus.len()));
        }

        let ngram = self.ngram_measure(&doc, &references);
        let tfidf = self.tfidf_measure(&doc, &references);
        let (sentence, flagged_sentences) = self.sentence_measure(article, corpus);

        let originality_score = aggregate(
            &self.thresholds.weights,
            ngram.score,
            tfidf.score,
            sentence.score,
        );

        debug!(
            ngram = ngram.score,
            tfidf = tfidf.score,
            sentence = sentence.score,
            originality_score,
            flagged = flagged_sentences.len(),
            corpus = corpus.len(),
            "plagiarism measures computed"
        );

        Ok(PlagiarismReport {
            originality_score,
            measures: vec![ngram, tfidf, sentence],
            flagged_sentences,
            corpus_size: corpus.len(),
            warnings: Vec::new(),
        })
    }

    /// Jaccard similarity of word n-gram sets; the most similar item decides.
    fn ngram_measure(&self, doc: &Document, references: &[Document]) -> SimilarityMeasure {
        let per_item: Vec<(f64, Vec<SpanMatch>)> = references
            .par_iter()
            .map(|r| {
                let shared: Vec<&String> = doc.ngrams.intersection(&r.ngrams).collect();
                let union = doc.ngrams.len() + r.ngrams.len() - shared.len();
                let similarity = if union == 0 {
                    0.0
                } else {
                    shared.len() as f64 / union as f64
                };
                let spans = shared
                    .into_iter()
                    .map(|g| SpanMatch {
                        article_span: g.clone(),
                        reference_id: r.id.clone(),
                        reference_span: g.clone(),
                    })
                    .collect();
                (similarity, spans)
            })
            .collect();

        let max_similarity = per_item.iter().map(|(s, _)| *s).fold(0.0, f64::max);
        let spans: BTreeSet<SpanMatch> = per_item.into_iter().flat_map(|(_, s)| s).collect();

        SimilarityMeasure {
            method: SimilarityMethod::Ngram,
            score: 1.0 - max_similarity,
            matched_spans: self.cap(spans),
        }
    }

    /// Cosine similarity of TF-IDF vectors over the article + corpus vocabulary.
    fn tfidf_measure(&self, doc: &Document, references: &[Document]) -> SimilarityMeasure {
        let documents = references.len() + 1;
        let mut df: HashMap<&str, usize> = HashMap::new();
        for d in std::iter::once(doc).chain(references.iter()) {
            for term in d.term_counts.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        let idf = |term: &str| -> f64 {
            let count = df.get(term).copied().unwrap_or(0);
            (documents as f64 / (1 + count) as f64).ln() + 1.0
        };
        let vector = |d: &Document| -> BTreeMap<String, f64> {
            let len = d.words.len().max(1) as f64;
            d.term_counts
                .iter()
                .map(|(t, c)| (t.clone(), (*c as f64 / len) * idf(t)))
                .collect()
        };

        let article_vec = vector(doc);
        let article_norm = norm(&article_vec);

        let scored: Vec<(f64, &str, Vec<(f64, String)>)> = references
            .par_iter()
            .map(|r| {
                let ref_vec = vector(r);
                let ref_norm = norm(&ref_vec);
                let mut contributions = Vec::new();
                let mut dot = 0.0;
                for (term, a) in &article_vec {
                    if let Some(b) = ref_vec.get(term) {
                        dot += a * b;
                        contributions.push((a * b, term.clone()));
                    }
                }
                let cosine = if article_norm > 0.0 && ref_norm > 0.0 {
                    (dot / (article_norm * ref_norm)).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                (cosine, r.id.as_str(), contributions)
            })
            .collect();

        let best = scored.into_iter().max_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.1.cmp(a.1))
        });

        let (max_similarity, spans) = match best {
            Some((cosine, id, mut contributions)) if cosine > 0.0 => {
                contributions.sort_by(|a, b| {
                    b.0.partial_cmp(&a.0)
                        .unwrap_or(Ordering::Equal)
                        .then_with(|| a.1.cmp(&b.1))
                });
                let spans = contributions
                    .into_iter()
                    .take(TFIDF_SPAN_TERMS)
                    .map(|(_, term)| SpanMatch {
                        article_span: term.clone(),
                        reference_id: id.to_string(),
                        reference_span: term,
                    })
                    .collect();
                (cosine, spans)
            }
            _ => (0.0, BTreeSet::new()),
        };

        SimilarityMeasure {
            method: SimilarityMethod::TfidfCosine,
            score: 1.0 - max_similarity,
            matched_spans: self.cap(spans),
        }
    }

    /// Share of article sentences with an exact (normalized) or near-duplicate
    /// counterpart anywhere in the corpus.
    fn sentence_measure(
        &self,
        article: &Article,
        corpus: &[ContentItem],
    ) -> (SimilarityMeasure, BTreeSet<usize>) {
        let k = self.thresholds.sentence_shingle_size;
        let threshold = self.thresholds.sentence_match;
        let min_words = self.thresholds.min_sentence_words;

        // Exact lookup keeps the smallest (id, sentence) per normalized text.
        let mut exact: HashMap<String, (&str, String)> = HashMap::new();
        let mut reference_sentences: Vec<ReferenceSentence<'_>> = Vec::new();
        for item in corpus {
            for raw in tokenize::sentences(&item.text) {
                let words = tokenize::words(&raw);
                if words.is_empty() {
                    continue;
                }
                let candidate = (item.id.as_str(), raw.clone());
                exact
                    .entry(words.join(" "))
                    .and_modify(|best| {
                        if candidate < *best {
                            *best = candidate.clone();
                        }
                    })
                    .or_insert_with(|| candidate.clone());
                reference_sentences.push(ReferenceSentence {
                    id: item.id.as_str(),
                    raw,
                    shingles: shingles(&words, k),
                });
            }
        }

        let sentences = article.sentences();
        let eligible: Vec<(usize, &String, Vec<String>)> = sentences
            .iter()
            .enumerate()
            .map(|(i, s)| (i, s, tokenize::words(s)))
            .filter(|(_, _, w)| w.len() >= min_words)
            .collect();

        let matches: Vec<(usize, SpanMatch)> = eligible
            .par_iter()
            .filter_map(|(index, raw, words)| {
                if let Some((id, reference)) = exact.get(&words.join(" ")) {
                    return Some((*index, span(raw, id, reference)));
                }
                let own = shingles(words, k);
                let mut best: Option<(f64, &str, &str)> = None;
                for r in &reference_sentences {
                    let (small, large) = if own.len() < r.shingles.len() {
                        (own.len(), r.shingles.len())
                    } else {
                        (r.shingles.len(), own.len())
                    };
                    // Jaccard can never exceed |small| / |large|.
                    if large == 0 || (small as f64 / large as f64) < threshold {
                        continue;
                    }
                    let similarity = jaccard(&own, &r.shingles);
                    if similarity < threshold {
                        continue;
                    }
                    let better = match best {
                        None => true,
                        Some((s, id, text)) => {
                            similarity > s
                                || (similarity == s && (r.id, r.raw.as_str()) < (id, text))
                        }
                    };
                    if better {
                        best = Some((similarity, r.id, r.raw.as_str()));
                    }
                }
                best.map(|(_, id, reference)| (*index, span(raw, id, reference)))
            })
            .collect();

        let flagged: BTreeSet<usize> = matches.iter().map(|(i, _)| *i).collect();
        let score = if eligible.is_empty() {
            1.0
        } else {
            1.0 - flagged.len() as f64 / eligible.len() as f64
        };
        let spans: BTreeSet<SpanMatch> = matches.into_iter().map(|(_, s)| s).collect();

        (
            SimilarityMeasure {
                method: SimilarityMethod::SentenceDup,
                score,
                matched_spans: self.cap(spans),
            },
            flagged,
        )
    }

    fn cap(&self, spans: BTreeSet<SpanMatch>) -> BTreeSet<SpanMatch> {
        spans
            .into_iter()
            .take(self.thresholds.max_reported_spans)
            .collect()
    }
}

fn vacuous_report(corpus_size: usize) -> PlagiarismReport {
    PlagiarismReport {
        originality_score: 1.0,
        measures: [
            SimilarityMethod::Ngram,
            SimilarityMethod::TfidfCosine,
            SimilarityMethod::SentenceDup,
        ]
        .into_iter()
        .map(|method| SimilarityMeasure {
            method,
            score: 1.0,
            matched_spans: BTreeSet::new(),
        })
        .collect(),
        flagged_sentences: BTreeSet::new(),
        corpus_size,
        warnings: vec![EMPTY_CORPUS_WARNING.to_string()],
    }
}

fn span(article: &str, id: &str, reference: &str) -> SpanMatch {
    SpanMatch {
        article_span: article.to_string(),
        reference_id: id.to_string(),
        reference_span: reference.to_string(),
    }
}

fn shingles(words: &[String], k: usize) -> HashSet<String> {
    if words.len() >= k {
        tokenize::ngrams(words, k).collect()
    } else {
        words.iter().cloned().collect()
    }
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let inter = a.intersection(b).count();
    let union = a.len() + b.len() - inter;
    if union == 0 {
        0.0
    } else {
        inter as f64 / union as f64
    }
}

fn norm(vector: &BTreeMap<String, f64>) -> f64 {
    vector.values().map(|v| v * v).sum::<f64>().sqrt()
}
