//! Thresholds and the SEO check catalog.
//!
//! The catalog is plain data: each entry names a built-in rule, whether it is
//! mandatory, and the numeric bounds and term lists the rule reads. Adding or
//! retuning a check means editing the catalog, not the evaluator.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Fixed defaults
// ---------------------------------------------------------------------------

pub const ORIGINALITY_THRESHOLD: f64 = 0.95;
pub const KEYWORD_DENSITY_RANGE: (f64, f64) = (0.01, 0.03);
pub const WORD_COUNT_RANGE: (f64, f64) = (2000.0, 3000.0);
pub const SENTENCE_MATCH_THRESHOLD: f64 = 0.85;
pub const NGRAM_SIZE: usize = 5;
pub const META_TITLE_RANGE: (f64, f64) = (50.0, 60.0);
pub const META_DESCRIPTION_RANGE: (f64, f64) = (150.0, 160.0);
pub const CLUSTER_JACCARD_THRESHOLD: f64 = 0.3;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: Thresholds,
    pub keywords: KeywordSettings,
    /// Year the freshness check measures against. Defaults to the current UTC year.
    pub reference_year: Option<i32>,
    pub catalog: Vec<CheckSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            keywords: KeywordSettings::default(),
            reference_year: None,
            catalog: default_catalog(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub originality: f64,
    pub sentence_match: f64,
    pub ngram_size: usize,
    /// Word-shingle size for sentence-to-sentence similarity.
    pub sentence_shingle_size: usize,
    /// Sentences shorter than this are not compared against the corpus.
    pub min_sentence_words: usize,
    pub weights: MeasureWeights,
    pub max_reported_spans: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            originality: ORIGINALITY_THRESHOLD,
            sentence_match: SENTENCE_MATCH_THRESHOLD,
            ngram_size: NGRAM_SIZE,
            sentence_shingle_size: 3,
            min_sentence_words: 4,
            weights: MeasureWeights::default(),
            max_reported_spans: 25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureWeights {
    pub ngram: f64,
    pub tfidf: f64,
    pub sentence: f64,
}

impl Default for MeasureWeights {
    fn default() -> Self {
        Self {
            ngram: 0.3,
            tfidf: 0.3,
            sentence: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSettings {
    pub cluster_threshold: f64,
    pub max_keywords: usize,
    pub min_term_length: usize,
}

impl Default for KeywordSettings {
    fn default() -> Self {
        Self {
            cluster_threshold: CLUSTER_JACCARD_THRESHOLD,
            max_keywords: 40,
            min_term_length: 3,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        unit_interval("thresholds.originality", t.originality)?;
        unit_interval("thresholds.sentence_match", t.sentence_match)?;
        unit_interval("keywords.cluster_threshold", self.keywords.cluster_threshold)?;
        if t.ngram_size == 0 {
            return Err(invalid("thresholds.ngram_size", "must be at least 1"));
        }
        if t.sentence_shingle_size == 0 {
            return Err(invalid("thresholds.sentence_shingle_size", "must be at least 1"));
        }
        let w = t.weights;
        for (field, value) in [
            ("thresholds.weights.ngram", w.ngram),
            ("thresholds.weights.tfidf", w.tfidf),
            ("thresholds.weights.sentence", w.sentence),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        if w.ngram + w.tfidf + w.sentence <= 0.0 {
            return Err(invalid("thresholds.weights", "must not all be zero"));
        }

        let mut seen = HashSet::new();
        for spec in &self.catalog {
            if spec.id.trim().is_empty() {
                return Err(invalid("catalog.id", "must not be empty"));
            }
            if !seen.insert(spec.id.as_str()) {
                return Err(ConfigError::DuplicateCheck(spec.id.clone()));
            }
            if let (Some(min), Some(max)) = (spec.bounds.get("min"), spec.bounds.get("max")) {
                if min > max {
                    return Err(invalid(
                        &format!("catalog.{}.bounds", spec.id),
                        "min exceeds max",
                    ));
                }
            }
        }
        Ok(())
    }
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "must be within [0, 1]"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Built-in predicates a catalog entry can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    WordCount,
    KeywordDensity,
    KeywordInTitle,
    KeywordInMetaTitle,
    KeywordInIntro,
    KeywordInHeadings,
    KeywordInMetaDescription,
    KeywordInSlug,
    HeadingCount,
    HeadingHierarchy,
    MetaTitleLength,
    MetaDescriptionLength,
    TitleLength,
    SlugFormat,
    InternalLinks,
    ExternalLinks,
    ImageAltText,
    ParagraphLength,
    SentenceLength,
    Readability,
    ContentFreshness,
    RelatedTerms,
    QuestionContent,
    BulletLists,
    NumberedLists,
    EmphasisUsage,
    ContentDepth,
    TopicCoverage,
    CallToAction,
    MobileFriendliness,
    FeaturedSnippet,
    FaqSection,
    VocabularyDiversity,
    SerpCompetitiveness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSpec {
    pub id: String,
    pub rule: Rule,
    pub description: String,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub bounds: BTreeMap<String, f64>,
    #[serde(default)]
    pub terms: Vec<String>,
    /// Recommendation surfaced when the check does not pass.
    #[serde(default)]
    pub advice: String,
}

impl CheckSpec {
    pub fn new(id: &str, rule: Rule, description: &str, advice: &str) -> Self {
        Self {
            id: id.to_string(),
            rule,
            description: description.to_string(),
            mandatory: false,
            bounds: BTreeMap::new(),
            terms: Vec::new(),
            advice: advice.to_string(),
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn bound(mut self, name: &str, value: f64) -> Self {
        self.bounds.insert(name.to_string(), value);
        self
    }

    pub fn range(self, (min, max): (f64, f64)) -> Self {
        self.bound("min", min).bound("max", max)
    }

    pub fn terms(mut self, terms: &[&str]) -> Self {
        self.terms = terms.iter().map(|t| t.to_string()).collect();
        self
    }
}

#[rustfmt::skip]
pub fn default_catalog() -> Vec<CheckSpec> {
    use Rule::*;
    vec![
        CheckSpec::new("word_count", WordCount, "Body word count within range",
            "Aim for 2000-3000 words for comprehensive coverage.")
            .mandatory()
            .range(WORD_COUNT_RANGE),
        CheckSpec::new("keyword_density", KeywordDensity, "Target keyword density within range",
            "Target 1-3% keyword density.")
            .range(KEYWORD_DENSITY_RANGE),
        CheckSpec::new("keyword_in_title", KeywordInTitle, "Target keyword appears in the title",
            "Include the target keyword in the title.")
            .mandatory(),
        CheckSpec::new("keyword_in_meta_title", KeywordInMetaTitle, "Target keyword appears in the meta title",
            "Include the target keyword in the meta title."),
        CheckSpec::new("keyword_in_intro", KeywordInIntro, "Target keyword appears in the first paragraph",
            "Include the keyword in the first paragraph."),
        CheckSpec::new("keyword_in_headings", KeywordInHeadings, "Target keyword appears in subheadings",
            "Include the keyword in at least 2 headings.")
            .bound("min", 2.0),
        CheckSpec::new("keyword_in_meta_description", KeywordInMetaDescription,
            "Target keyword appears in the meta description",
            "Mention the target keyword in the meta description."),
        CheckSpec::new("keyword_in_slug", KeywordInSlug, "URL slug contains the keyword",
            "Consider including the target keyword in the URL slug."),
        CheckSpec::new("heading_count", HeadingCount, "Enough headings to structure the article",
            "Add at least 5 headings for better structure.")
            .bound("min", 5.0),
        CheckSpec::new("heading_hierarchy", HeadingHierarchy, "Single H1, no skipped heading levels",
            "Use one H1 and nest subheadings without skipping levels."),
        CheckSpec::new("meta_title_length", MetaTitleLength, "Meta title length in characters",
            "Keep the meta title between 50 and 60 characters.")
            .range(META_TITLE_RANGE),
        CheckSpec::new("meta_description_length", MetaDescriptionLength,
            "Meta description length in characters",
            "Keep the meta description between 150 and 160 characters.")
            .mandatory()
            .range(META_DESCRIPTION_RANGE),
        CheckSpec::new("title_length", TitleLength, "Title length in characters",
            "Keep the title under 70 characters.")
            .range((20.0, 70.0)),
        CheckSpec::new("slug_format", SlugFormat, "Slug is lowercase, hyphenated, and short",
            "Use a short lowercase slug with hyphens between words.")
            .bound("max", 75.0),
        CheckSpec::new("internal_links", InternalLinks, "Links to related site content",
            "Add internal links to related content.")
            .bound("min", 3.0),
        CheckSpec::new("external_links", ExternalLinks, "Links to authoritative external sources",
            "Consider adding authoritative external references.")
            .bound("min", 2.0),
        CheckSpec::new("image_alt_text", ImageAltText, "Images present and carry alt text",
            "Add relevant images with descriptive alt text.")
            .bound("min", 1.0),
        CheckSpec::new("paragraph_length", ParagraphLength, "No paragraph exceeds the word limit",
            "Break up long paragraphs for readability.")
            .bound("max", 150.0),
        CheckSpec::new("sentence_length", SentenceLength, "Average sentence length in words",
            "Use shorter sentences for clarity.")
            .bound("max", 20.0),
        CheckSpec::new("readability", Readability, "Flesch reading ease",
            "Simplify language for a broader audience.")
            .bound("min", 60.0),
        CheckSpec::new("content_freshness", ContentFreshness, "Mentions the current or recent year",
            "Add current-year references or recent statistics.")
            .bound("max", 1.0),
        CheckSpec::new("related_terms", RelatedTerms, "Semantically related vocabulary present",
            "Include more semantically related keywords.")
            .bound("min", 5.0)
            .terms(&["strategy", "implementation", "best practices", "tools", "workflow",
                "automation", "efficiency", "enterprise", "solution", "platform"]),
        CheckSpec::new("question_content", QuestionContent, "Questions that match search intent",
            "Add more questions to match search intent.")
            .bound("min", 5.0),
        CheckSpec::new("bullet_lists", BulletLists, "Bulleted list items for scannability",
            "Use bullet points for scannable content.")
            .bound("min", 3.0),
        CheckSpec::new("numbered_lists", NumberedLists, "Numbered list for step-by-step content",
            "Consider numbered lists for step-by-step content.")
            .bound("min", 1.0),
        CheckSpec::new("emphasis_usage", EmphasisUsage, "Bold emphasis used in moderation",
            "Use bold for key terms, but sparingly.")
            .range((3.0, 20.0)),
        CheckSpec::new("content_depth", ContentDepth, "Long enough and broken into sections",
            "Expand on subtopics for depth.")
            .bound("min_words", 2000.0)
            .bound("min_headings", 6.0),
        CheckSpec::new("topic_coverage", TopicCoverage, "Expected article sections covered",
            "Cover the usual sections: overview, examples, challenges, conclusion.")
            .bound("min", 5.0)
            .terms(&["introduction", "overview", "implementation", "best practice",
                "challenge", "solution", "conclusion", "example"]),
        CheckSpec::new("call_to_action", CallToAction, "Closing call to action present",
            "Add a call to action for engagement.")
            .bound("min", 1.0)
            .terms(&["learn more", "get started", "contact", "download", "try", "sign up",
                "read more", "explore", "discover"]),
        CheckSpec::new("mobile_friendliness", MobileFriendliness, "Paragraphs short enough for mobile",
            "Break up content for mobile readers.")
            .bound("max_words", 100.0)
            .bound("min_ratio", 0.8),
        CheckSpec::new("featured_snippet", FeaturedSnippet, "Definitions and lists eligible for snippets",
            "Add clear definitions and lists.")
            .terms(&["is a", "refers to", "is defined as", "means"]),
        CheckSpec::new("faq_section", FaqSection, "FAQ section for schema markup",
            "Add an FAQ section for schema markup.")
            .terms(&["faq", "frequently asked"]),
        CheckSpec::new("vocabulary_diversity", VocabularyDiversity, "Share of distinct words",
            "Use more varied vocabulary.")
            .bound("min", 0.4),
        CheckSpec::new("serp_competitiveness", SerpCompetitiveness,
            "Length, structure, and density versus typical ranking pages",
            "Strengthen length, heading structure, and keyword focus together.")
            .bound("min_words", 2000.0)
            .bound("min_headings", 6.0)
            .bound("min_density", KEYWORD_DENSITY_RANGE.0)
            .bound("max_density", KEYWORD_DENSITY_RANGE.1)
            .bound("min_score", 0.7),
    ]
}
