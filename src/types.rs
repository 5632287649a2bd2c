use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::tokenize;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A collected source fragment. Used as keyword-extraction input and as
/// plagiarism reference material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            origin: origin.into(),
            timestamp: DateTime::<Utc>::default(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub frequency: usize,
    /// frequency x (1 + seed co-occurrence)
    pub relevance: f64,
    pub cluster_id: usize,
}

impl Keyword {
    /// A bare target keyword with no corpus statistics attached.
    pub fn target(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            frequency: 0,
            relevance: 0.0,
            cluster_id: 0,
        }
    }
}

/// The article under evaluation. `body` holds markdown paragraphs in order;
/// the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub meta_title: String,
    pub meta_description: String,
    pub slug: String,
    pub target_keyword: String,
    pub body: Vec<String>,
}

impl Article {
    /// Split a markdown document into paragraphs on blank lines.
    pub fn from_markdown(
        title: impl Into<String>,
        meta_title: impl Into<String>,
        meta_description: impl Into<String>,
        slug: impl Into<String>,
        target_keyword: impl Into<String>,
        markdown: &str,
    ) -> Self {
        let mut body = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in markdown.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    body.push(current.join("\n"));
                    current.clear();
                }
            } else {
                current.push(line.trim_end());
            }
        }
        if !current.is_empty() {
            body.push(current.join("\n"));
        }
        Self {
            title: title.into(),
            meta_title: meta_title.into(),
            meta_description: meta_description.into(),
            slug: slug.into(),
            target_keyword: target_keyword.into(),
            body,
        }
    }

    pub fn body_text(&self) -> String {
        self.body.join("\n\n")
    }

    pub fn paragraph_sentences(&self) -> Vec<Vec<String>> {
        self.body.iter().map(|p| tokenize::sentences(p)).collect()
    }

    /// Body sentences in document order. Sentence indices in reports refer to
    /// positions in this sequence.
    pub fn sentences(&self) -> Vec<String> {
        self.paragraph_sentences().into_iter().flatten().collect()
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.title.trim().is_empty() {
            return Err(InputError::MissingField { field: "title" });
        }
        if tokenize::words(&self.target_keyword).is_empty() {
            return Err(InputError::MissingField {
                field: "target_keyword",
            });
        }
        if self.body.iter().all(|p| p.trim().is_empty()) {
            return Err(InputError::MissingField { field: "body" });
        }
        if self.sentences().is_empty() {
            return Err(InputError::NoSentences);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SEO report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_id: String,
    pub status: CheckStatus,
    pub score: f64,
    pub message: String,
    pub is_mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoReport {
    /// One result per catalog entry, in catalog order.
    pub checks: Vec<CheckResult>,
    /// Mean score of the non-mandatory checks.
    pub aggregate_score: f64,
    pub word_count: usize,
    pub keyword_density: f64,
    pub flesch_reading_ease: f64,
    pub heading_count: usize,
    pub advice: Vec<String>,
}

impl SeoReport {
    pub fn mandatory_failures(&self) -> BTreeSet<String> {
        self.checks
            .iter()
            .filter(|c| c.is_mandatory && c.status == CheckStatus::Fail)
            .map(|c| c.check_id.clone())
            .collect()
    }

    pub fn check(&self, id: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.check_id == id)
    }
}

// ---------------------------------------------------------------------------
// Plagiarism report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    Ngram,
    TfidfCosine,
    SentenceDup,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpanMatch {
    pub article_span: String,
    pub reference_id: String,
    pub reference_span: String,
}

/// `score` is an originality contribution: 1.0 means nothing similar was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMeasure {
    pub method: SimilarityMethod,
    pub score: f64,
    pub matched_spans: BTreeSet<SpanMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismReport {
    pub originality_score: f64,
    /// Always ngram, tfidf_cosine, sentence_dup in that order.
    pub measures: Vec<SimilarityMeasure>,
    pub flagged_sentences: BTreeSet<usize>,
    pub corpus_size: usize,
    pub warnings: Vec<String>,
}

impl PlagiarismReport {
    pub fn measure(&self, method: SimilarityMethod) -> Option<&SimilarityMeasure> {
        self.measures.iter().find(|m| m.method == method)
    }
}

// ---------------------------------------------------------------------------
// Quality report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySignal {
    pub metric: String,
    pub score: f64,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub readability_score: f64,
    pub structural_score: f64,
    pub composite_score: f64,
    pub flesch_reading_ease: f64,
    /// Indices into `Article::body` of paragraphs over the length limit.
    pub long_paragraphs: Vec<usize>,
    /// Diagnostics only; they do not feed `composite_score`.
    pub signals: Vec<QualitySignal>,
}
