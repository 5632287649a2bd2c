//! Rule-based SEO evaluation.
//!
//! Every catalog entry becomes exactly one `CheckResult`. Rules are pure
//! functions of the catalog entry and a read-only view of the article; a rule
//! that cannot compute its metric fails on its own without affecting others.

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::{CheckSpec, Config, Rule};
use crate::error::{CheckError, InputError};
use crate::quality::{flesch_reading_ease, readability_score};
use crate::structure::{strip_link_targets, Structure};
use crate::tokenize;
use crate::types::{Article, CheckResult, CheckStatus, Keyword, SeoReport};

/// Non-mandatory checks that miss their target but score at least this much
/// are reported as `warn` rather than `fail`.
const WARN_FLOOR: f64 = 0.5;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static SLUG_FORMAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

// ---------------------------------------------------------------------------
// Article view
// ---------------------------------------------------------------------------

/// Everything the rules read, computed once per evaluation.
struct ArticleView<'a> {
    article: &'a Article,
    body_text: String,
    words: Vec<String>,
    sentences: Vec<String>,
    structure: Structure,
    keyword: Vec<String>,
    /// Keyword words split the way `tokenize::match_words` splits text.
    keyword_match: Vec<String>,
    keyword_occurrences: usize,
    flesch: f64,
    reference_year: i32,
}

impl<'a> ArticleView<'a> {
    fn new(article: &'a Article, keyword: &Keyword, reference_year: i32) -> Self {
        let body_text = strip_link_targets(&article.body_text()).into_owned();
        let words = tokenize::words(&body_text);
        let keyword_match = tokenize::match_words(&keyword.term);
        let keyword = tokenize::words(&keyword.term);
        let sentences = article.sentences();
        let structure = Structure::parse(&article.body);
        let keyword_occurrences = tokenize::count_phrase(&words, &keyword);
        let flesch = flesch_reading_ease(&words, sentences.len());
        Self {
            article,
            body_text,
            words,
            sentences,
            structure,
            keyword,
            keyword_match,
            keyword_occurrences,
            flesch,
            reference_year,
        }
    }

    fn density(&self) -> Option<f64> {
        if self.words.is_empty() {
            None
        } else {
            Some(self.keyword_occurrences as f64 / self.words.len() as f64)
        }
    }

    fn keyword_in(&self, text: &str) -> bool {
        tokenize::contains_phrase(&tokenize::match_words(text), &self.keyword_match)
    }

    /// How many of `terms` appear anywhere in the body.
    fn term_hits(&self, terms: &[String]) -> usize {
        terms
            .iter()
            .filter(|t| tokenize::contains_phrase(&self.words, &tokenize::words(t)))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Rule outcomes
// ---------------------------------------------------------------------------

struct Outcome {
    passed: bool,
    score: f64,
    message: String,
}

impl Outcome {
    fn new(passed: bool, score: f64, message: impl Into<String>) -> Self {
        Self {
            passed,
            score: score.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    fn binary(passed: bool, miss_score: f64, hit: &str, miss: &str) -> Self {
        if passed {
            Self::new(true, 1.0, hit)
        } else {
            Self::new(false, miss_score, miss)
        }
    }
}

fn bound(spec: &CheckSpec, name: &'static str) -> Result<f64, CheckError> {
    spec.bounds
        .get(name)
        .copied()
        .ok_or_else(|| CheckError::MissingBound {
            check: spec.id.clone(),
            bound: name,
        })
}

/// 1.0 inside `[min, max]`; outside, one minus the distance to the nearest
/// bound normalized by that bound.
fn range_score(value: f64, min: f64, max: f64) -> f64 {
    let score = if value < min {
        if min > 0.0 {
            1.0 - (min - value) / min
        } else {
            0.0
        }
    } else if value > max {
        if max > 0.0 {
            1.0 - (value - max) / max
        } else {
            0.0
        }
    } else {
        1.0
    };
    score.clamp(0.0, 1.0)
}

fn ratio_score(count: f64, min: f64) -> f64 {
    if min <= 0.0 {
        1.0
    } else {
        (count / min).min(1.0)
    }
}

fn range_outcome(spec: &CheckSpec, value: f64, label: &str) -> Result<Outcome, CheckError> {
    let min = bound(spec, "min")?;
    let max = bound(spec, "max")?;
    let passed = (min..=max).contains(&value);
    let message = if passed {
        format!("{label} {value} within [{min}, {max}]")
    } else {
        format!("{label} {value} outside [{min}, {max}]")
    };
    Ok(Outcome::new(passed, range_score(value, min, max), message))
}

fn at_least_outcome(spec: &CheckSpec, count: usize, label: &str) -> Result<Outcome, CheckError> {
    let min = bound(spec, "min")?;
    let passed = count as f64 >= min;
    Ok(Outcome::new(
        passed,
        ratio_score(count as f64, min),
        format!("{count} {label} (minimum {min})"),
    ))
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn run_rule(spec: &CheckSpec, view: &ArticleView<'_>) -> Result<Outcome, CheckError> {
    let article = view.article;
    match spec.rule {
        Rule::WordCount => range_outcome(spec, view.words.len() as f64, "word count"),

        Rule::KeywordDensity => {
            let density = view
                .density()
                .ok_or(CheckError::Undefined("article has no words"))?;
            let mut outcome = range_outcome(spec, density, "keyword density")?;
            outcome.message = format!(
                "keyword density {:.4} {} [{}, {}] ({} occurrences in {} words)",
                density,
                if outcome.passed { "within" } else { "outside" },
                bound(spec, "min")?,
                bound(spec, "max")?,
                view.keyword_occurrences,
                view.words.len()
            );
            Ok(outcome)
        }

        Rule::KeywordInTitle => Ok(Outcome::binary(
            view.keyword_in(&article.title),
            0.0,
            "keyword present in title",
            "keyword missing from title",
        )),

        Rule::KeywordInMetaTitle => Ok(Outcome::binary(
            view.keyword_in(&article.meta_title),
            0.0,
            "keyword present in meta title",
            "keyword missing from meta title",
        )),

        Rule::KeywordInIntro => {
            let intro = view
                .structure
                .prose_paragraphs()
                .next()
                .map(|p| article.body[p.index].as_str())
                .unwrap_or_default();
            Ok(Outcome::binary(
                view.keyword_in(intro),
                0.3,
                "keyword present in first paragraph",
                "keyword missing from introduction",
            ))
        }

        Rule::KeywordInHeadings => {
            let hits = view
                .structure
                .headings
                .iter()
                .filter(|h| view.keyword_in(&h.text))
                .count();
            at_least_outcome(spec, hits, "headings contain the keyword")
        }

        Rule::KeywordInMetaDescription => Ok(Outcome::binary(
            view.keyword_in(&article.meta_description),
            0.3,
            "keyword present in meta description",
            "keyword missing from meta description",
        )),

        Rule::KeywordInSlug => {
            let keyword_slug = view.keyword.join("-");
            let slug = tokenize::slugify(&article.slug);
            Ok(Outcome::binary(
                !slug.is_empty() && slug.contains(&keyword_slug),
                0.6,
                "keyword-friendly URL slug",
                "URL slug does not contain the keyword",
            ))
        }

        Rule::HeadingCount => at_least_outcome(spec, view.structure.headings.len(), "headings"),

        Rule::HeadingHierarchy => {
            let total = view.structure.headings.len();
            if total == 0 {
                return Ok(Outcome::new(false, 0.0, "no headings found"));
            }
            let violations = view.structure.hierarchy_violations();
            if violations.is_empty() {
                Ok(Outcome::new(true, 1.0, "heading hierarchy is well-formed"))
            } else {
                Ok(Outcome::new(
                    false,
                    1.0 - violations.len() as f64 / total as f64,
                    violations.join("; "),
                ))
            }
        }

        Rule::MetaTitleLength => range_outcome(
            spec,
            article.meta_title.trim().chars().count() as f64,
            "meta title length",
        ),

        Rule::MetaDescriptionLength => range_outcome(
            spec,
            article.meta_description.trim().chars().count() as f64,
            "meta description length",
        ),

        Rule::TitleLength => {
            range_outcome(spec, article.title.trim().chars().count() as f64, "title length")
        }

        Rule::SlugFormat => {
            let max = bound(spec, "max")?;
            let slug = article.slug.trim();
            let well_formed = SLUG_FORMAT_RE.is_match(slug);
            let short = slug.chars().count() as f64 <= max;
            let score = 0.5 * f64::from(u8::from(well_formed)) + 0.5 * f64::from(u8::from(short));
            Ok(Outcome::new(
                well_formed && short,
                score,
                format!(
                    "slug '{slug}' is {}and {} characters",
                    if well_formed { "well-formed " } else { "malformed " },
                    slug.chars().count()
                ),
            ))
        }

        Rule::InternalLinks => {
            let internal = view.structure.links.iter().filter(|l| !l.is_external()).count();
            at_least_outcome(spec, internal, "internal links")
        }

        Rule::ExternalLinks => {
            let external = view.structure.links.iter().filter(|l| l.is_external()).count();
            at_least_outcome(spec, external, "external links")
        }

        Rule::ImageAltText => {
            let min = bound(spec, "min")?;
            let images = &view.structure.images;
            if (images.len() as f64) < min {
                return Ok(Outcome::new(
                    false,
                    ratio_score(images.len() as f64, min),
                    format!("{} images (minimum {min})", images.len()),
                ));
            }
            let with_alt = images.iter().filter(|i| !i.text.trim().is_empty()).count();
            let score = if images.is_empty() {
                1.0
            } else {
                with_alt as f64 / images.len() as f64
            };
            Ok(Outcome::new(
                with_alt == images.len(),
                score,
                format!("{with_alt} of {} images have alt text", images.len()),
            ))
        }

        Rule::ParagraphLength => {
            let max = bound(spec, "max")?;
            let prose: Vec<_> = view.structure.prose_paragraphs().collect();
            if prose.is_empty() {
                return Err(CheckError::Undefined("article has no prose paragraphs"));
            }
            let long = prose.iter().filter(|p| p.words as f64 > max).count();
            Ok(Outcome::new(
                long == 0,
                1.0 - long as f64 / prose.len() as f64,
                format!("{long} of {} paragraphs exceed {max} words", prose.len()),
            ))
        }

        Rule::SentenceLength => {
            let max = bound(spec, "max")?;
            if view.sentences.is_empty() {
                return Err(CheckError::Undefined("article has no sentences"));
            }
            let total: usize = view
                .sentences
                .iter()
                .map(|s| tokenize::words(&strip_link_targets(s)).len())
                .sum();
            let avg = total as f64 / view.sentences.len() as f64;
            let score = if avg <= max { 1.0 } else { max / avg };
            Ok(Outcome::new(
                avg <= max,
                score,
                format!("average {avg:.1} words per sentence (maximum {max})"),
            ))
        }

        Rule::Readability => {
            let min = bound(spec, "min")?;
            Ok(Outcome::new(
                view.flesch >= min,
                readability_score(view.flesch),
                format!("Flesch reading ease {:.1} (minimum {min})", view.flesch),
            ))
        }

        Rule::ContentFreshness => {
            let window = bound(spec, "max")?;
            let recent = YEAR_RE
                .find_iter(&view.body_text)
                .filter_map(|m| m.as_str().parse::<i32>().ok())
                .filter(|y| {
                    let age = f64::from(view.reference_year - y);
                    (0.0..=window).contains(&age)
                })
                .max();
            Ok(match recent {
                Some(year) => Outcome::new(true, 1.0, format!("references {year}")),
                None => Outcome::new(
                    false,
                    0.6,
                    format!("no references to {} or the prior {window} years", view.reference_year),
                ),
            })
        }

        Rule::RelatedTerms => {
            at_least_outcome(spec, view.term_hits(&spec.terms), "related terms found")
        }

        Rule::QuestionContent => {
            let questions = view
                .sentences
                .iter()
                .filter(|s| s.trim_end_matches(['"', '\'', ')']).ends_with('?'))
                .count();
            at_least_outcome(spec, questions, "questions")
        }

        Rule::BulletLists => at_least_outcome(spec, view.structure.bullet_items, "bullet items"),

        Rule::NumberedLists => {
            at_least_outcome(spec, view.structure.numbered_items, "numbered items")
        }

        Rule::EmphasisUsage => {
            range_outcome(spec, view.structure.bold_spans as f64, "bold spans")
        }

        Rule::ContentDepth => {
            let min_words = bound(spec, "min_words")?;
            let min_headings = bound(spec, "min_headings")?;
            let words = view.words.len() as f64;
            let headings = view.structure.headings.len() as f64;
            Ok(Outcome::new(
                words >= min_words && headings >= min_headings,
                0.5 * ratio_score(words, min_words) + 0.5 * ratio_score(headings, min_headings),
                format!("{words} words across {headings} headings"),
            ))
        }

        Rule::TopicCoverage => {
            let found = view.term_hits(&spec.terms);
            let mut outcome = at_least_outcome(spec, found, "expected topics covered")?;
            outcome.message = format!("{found}/{} expected topics covered", spec.terms.len());
            Ok(outcome)
        }

        Rule::CallToAction => {
            at_least_outcome(spec, view.term_hits(&spec.terms), "call-to-action phrases")
        }

        Rule::MobileFriendliness => {
            let max_words = bound(spec, "max_words")?;
            let min_ratio = bound(spec, "min_ratio")?;
            let prose: Vec<_> = view.structure.prose_paragraphs().collect();
            if prose.is_empty() {
                return Err(CheckError::Undefined("article has no prose paragraphs"));
            }
            let short = prose.iter().filter(|p| p.words as f64 <= max_words).count();
            let ratio = short as f64 / prose.len() as f64;
            Ok(Outcome::new(
                ratio >= min_ratio,
                ratio,
                format!("{:.0}% of paragraphs are at most {max_words} words", ratio * 100.0),
            ))
        }

        Rule::FeaturedSnippet => {
            let definitions = view.term_hits(&spec.terms) > 0;
            let lists = view.structure.has_lists();
            let score = match (definitions, lists) {
                (true, true) => 1.0,
                (true, false) | (false, true) => 0.6,
                (false, false) => 0.3,
            };
            Ok(Outcome::new(
                definitions && lists,
                score,
                format!("definitions: {definitions}, lists: {lists}"),
            ))
        }

        Rule::FaqSection => {
            let in_headings = view.structure.headings.iter().any(|h| {
                let words = tokenize::words(&h.text);
                spec.terms
                    .iter()
                    .any(|t| tokenize::contains_phrase(&words, &tokenize::words(t)))
            });
            Ok(Outcome::binary(
                in_headings || view.term_hits(&spec.terms) > 0,
                0.5,
                "FAQ section present",
                "no FAQ section",
            ))
        }

        Rule::VocabularyDiversity => {
            let min = bound(spec, "min")?;
            if view.words.is_empty() {
                return Err(CheckError::Undefined("article has no words"));
            }
            let unique: std::collections::HashSet<&str> =
                view.words.iter().map(String::as_str).collect();
            let ratio = unique.len() as f64 / view.words.len() as f64;
            Ok(Outcome::new(
                ratio >= min,
                ratio_score(ratio, min),
                format!("{:.1}% unique words", ratio * 100.0),
            ))
        }

        Rule::SerpCompetitiveness => {
            let min_words = bound(spec, "min_words")?;
            let min_headings = bound(spec, "min_headings")?;
            let min_density = bound(spec, "min_density")?;
            let max_density = bound(spec, "max_density")?;
            let min_score = bound(spec, "min_score")?;
            let density = view.density().unwrap_or(0.0);
            let mut score = 0.0;
            if view.words.len() as f64 >= min_words {
                score += 0.4;
            }
            if view.structure.headings.len() as f64 >= min_headings {
                score += 0.3;
            }
            if (min_density..=max_density).contains(&density) {
                score += 0.3;
            }
            Ok(Outcome::new(
                score >= min_score,
                score,
                format!("competitiveness {score:.1} (minimum {min_score})"),
            ))
        }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SeoEvaluator {
    catalog: Vec<CheckSpec>,
    reference_year: i32,
}

impl SeoEvaluator {
    pub fn new(config: &Config) -> Self {
        Self {
            catalog: config.catalog.clone(),
            reference_year: config.reference_year.unwrap_or_else(|| Utc::now().year()),
        }
    }

    pub fn catalog(&self) -> &[CheckSpec] {
        &self.catalog
    }

    pub fn evaluate(&self, article: &Article, keyword: &Keyword) -> Result<SeoReport, InputError> {
        article.validate()?;
        if tokenize::words(&keyword.term).is_empty() {
            return Err(InputError::MissingField {
                field: "target_keyword",
            });
        }

        let view = ArticleView::new(article, keyword, self.reference_year);
        let checks: Vec<CheckResult> = self
            .catalog
            .par_iter()
            .map(|spec| run_check(spec, &view))
            .collect();

        let optional: Vec<f64> = checks
            .iter()
            .filter(|c| !c.is_mandatory)
            .map(|c| c.score)
            .collect();
        let aggregate_score = if optional.is_empty() {
            1.0
        } else {
            optional.iter().sum::<f64>() / optional.len() as f64
        };

        let advice = deduplicate_advice(
            self.catalog
                .iter()
                .zip(&checks)
                .filter(|(spec, result)| result.status != CheckStatus::Pass && !spec.advice.is_empty())
                .map(|(spec, _)| spec.advice.clone())
                .collect(),
        );

        debug!(
            checks = checks.len(),
            aggregate_score,
            word_count = view.words.len(),
            "seo evaluation complete"
        );

        Ok(SeoReport {
            checks,
            aggregate_score,
            word_count: view.words.len(),
            keyword_density: view.density().map(round4).unwrap_or(0.0),
            flesch_reading_ease: view.flesch,
            heading_count: view.structure.headings.len(),
            advice,
        })
    }
}

fn run_check(spec: &CheckSpec, view: &ArticleView<'_>) -> CheckResult {
    match run_rule(spec, view) {
        Ok(outcome) => {
            let status = if outcome.passed {
                CheckStatus::Pass
            } else if spec.mandatory || outcome.score < WARN_FLOOR {
                CheckStatus::Fail
            } else {
                CheckStatus::Warn
            };
            CheckResult {
                check_id: spec.id.clone(),
                status,
                score: outcome.score,
                message: outcome.message,
                is_mandatory: spec.mandatory,
            }
        }
        Err(err) => {
            warn!(check = %spec.id, error = %err, "check could not be evaluated");
            CheckResult {
                check_id: spec.id.clone(),
                status: CheckStatus::Fail,
                score: 0.0,
                message: format!("check could not be evaluated: {err}"),
                is_mandatory: spec.mandatory,
            }
        }
    }
}

fn deduplicate_advice(advice: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut unique = Vec::new();
    for item in advice {
        if seen.insert(item.clone()) {
            unique.push(item);
        }
    }
    unique
}
