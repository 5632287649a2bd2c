//! Readability and structural quality.
//!
//! `composite_score` is an even blend of readability and structure. The
//! additional signals (human-likeness, redundancy, voice, flow, phrase reuse)
//! are reported alongside for editors but never move the composite.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::InputError;
use crate::structure::{strip_link_targets, Structure};
use crate::tokenize::{self, context_around};
use crate::types::{Article, QualityReport, QualitySignal};

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

struct Hyperparameters {
    readability_weight: f64,
    structural_weight: f64,
    list_weight: f64,
    emphasis_weight: f64,
    hierarchy_weight: f64,
    paragraph_weight: f64,
    long_paragraph_words: usize,
    readability_anchors: &'static [(f64, f64)],
    stock_phrase_penalty: f64,
    stock_phrase_examples: usize,
    context_window_chars: usize,
    redundancy_min_chars: usize,
    redundancy_jaccard: f64,
    redundancy_penalty: f64,
    passive_ratio_factor: f64,
    transition_step: f64,
    repeated_ngram_min_n: usize,
    repeated_ngram_max_n: usize,
    repeated_ngram_min_count: usize,
    phrase_reuse_penalty: f64,
}

static HP: Hyperparameters = Hyperparameters {
    readability_weight: 0.5,
    structural_weight: 0.5,
    list_weight: 0.25,
    emphasis_weight: 0.2,
    hierarchy_weight: 0.3,
    paragraph_weight: 0.25,
    long_paragraph_words: 150,
    // (Flesch reading ease, score); linear between anchors.
    readability_anchors: &[(0.0, 0.0), (30.0, 0.3), (50.0, 0.6), (60.0, 0.8), (70.0, 1.0)],
    stock_phrase_penalty: 0.05,
    stock_phrase_examples: 3,
    context_window_chars: 60,
    redundancy_min_chars: 20,
    redundancy_jaccard: 0.8,
    redundancy_penalty: 0.1,
    passive_ratio_factor: 2.0,
    transition_step: 0.08,
    repeated_ngram_min_n: 4,
    repeated_ngram_max_n: 8,
    repeated_ngram_min_count: 3,
    phrase_reuse_penalty: 0.1,
};

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static STOCK_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    let words = [
        "delve", "delves", "delving", "unlock", "unleash", "evergreen", "seamless", "seamlessly",
        "robust", "synergy", "holistic", "tapestry", "pivotal", "groundbreaking", "game-changing",
        "paradigm", "landscape", "leverage", "embark", "realm",
    ];
    let alt = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)\\b({alt})\\b")).unwrap()
});

static STOCK_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    let phrases = [
        "it's worth noting",
        "it's important to note",
        "in today's fast-paced",
        "at the end of the day",
        "let's dive in",
        "in this article, we'll",
        "without further ado",
        "in conclusion",
        "in summary",
    ];
    phrases
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", regex::escape(p))).unwrap())
        .collect()
});

static PASSIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:is|are|was|were|be|been|being)\s+\w+ed\b").unwrap());

const TRANSITIONS: &[&str] = &[
    "however",
    "therefore",
    "furthermore",
    "additionally",
    "moreover",
    "consequently",
    "thus",
    "hence",
    "first",
    "second",
    "third",
    "finally",
    "in addition",
    "as a result",
    "for example",
    "specifically",
];

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "is", "it",
        "that", "this", "with", "as", "by", "from", "was", "were", "are", "be", "been", "has",
        "have", "had", "not", "no", "do", "does", "did", "will", "would", "could", "should", "can",
        "may", "might", "if", "then", "than", "so", "up", "out", "about", "into", "over", "after",
        "before", "between", "through", "just", "also", "very", "more", "most", "some", "any",
        "each", "every", "all", "both", "few", "other", "such", "only", "own", "same", "too",
        "how", "what", "which", "who", "when", "where", "why",
    ]
    .into_iter()
    .collect()
});

// ---------------------------------------------------------------------------
// Readability
// ---------------------------------------------------------------------------

/// Flesch reading ease clamped to [0, 100].
pub fn flesch_reading_ease(words: &[String], sentence_count: usize) -> f64 {
    if words.is_empty() || sentence_count == 0 {
        return 0.0;
    }
    let syllables: usize = words.iter().map(|w| tokenize::syllables(w)).sum();
    let wps = words.len() as f64 / sentence_count as f64;
    let spw = syllables as f64 / words.len() as f64;
    (206.835 - 1.015 * wps - 84.6 * spw).clamp(0.0, 100.0)
}

/// Map Flesch reading ease onto [0, 1] with a fixed piecewise-linear scale.
pub fn readability_score(flesch: f64) -> f64 {
    let anchors = HP.readability_anchors;
    let (first_x, first_y) = anchors[0];
    if flesch <= first_x {
        return first_y;
    }
    for pair in anchors.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        if flesch <= x1 {
            return y0 + (flesch - x0) / (x1 - x0) * (y1 - y0);
        }
    }
    anchors[anchors.len() - 1].1
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn score(article: &Article) -> Result<QualityReport, InputError> {
    article.validate()?;

    let text = strip_link_targets(&article.body_text()).into_owned();
    let words = tokenize::words(&text);
    let sentences = article.sentences();
    let structure = Structure::parse(&article.body);

    let flesch = flesch_reading_ease(&words, sentences.len());
    let readability = readability_score(flesch);

    let long_paragraphs: Vec<usize> = structure
        .prose_paragraphs()
        .filter(|p| p.words > HP.long_paragraph_words)
        .map(|p| p.index)
        .collect();
    let structural = structural_score(&structure, long_paragraphs.len());
    let composite = HP.readability_weight * readability + HP.structural_weight * structural;

    let signals = vec![
        signal_human_likeness(&text),
        signal_redundancy(&sentences),
        signal_active_voice(&text, sentences.len()),
        signal_logical_flow(&words),
        signal_phrase_reuse(&words),
    ];

    debug!(
        readability,
        structural,
        composite,
        long_paragraphs = long_paragraphs.len(),
        "quality scored"
    );

    Ok(QualityReport {
        readability_score: readability,
        structural_score: structural,
        composite_score: composite,
        flesch_reading_ease: flesch,
        long_paragraphs,
        signals,
    })
}

fn structural_score(structure: &Structure, long_paragraphs: usize) -> f64 {
    let lists = if structure.has_lists() { 1.0 } else { 0.0 };
    let emphasis = if structure.bold_spans > 0 { 1.0 } else { 0.0 };
    let hierarchy = if structure.headings.is_empty() {
        0.0
    } else {
        let violations = structure.hierarchy_violations().len() as f64;
        (1.0 - violations / structure.headings.len() as f64).max(0.0)
    };
    let prose = structure.prose_paragraphs().count();
    let paragraphs = if prose == 0 {
        0.0
    } else {
        1.0 - long_paragraphs as f64 / prose as f64
    };

    HP.list_weight * lists
        + HP.emphasis_weight * emphasis
        + HP.hierarchy_weight * hierarchy
        + HP.paragraph_weight * paragraphs
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

fn signal_human_likeness(text: &str) -> QualitySignal {
    let mut hits: Vec<(usize, usize)> = STOCK_WORD_RE
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();
    for pat in STOCK_PHRASES.iter() {
        hits.extend(pat.find_iter(text).map(|m| (m.start(), m.end())));
    }
    hits.sort_unstable();

    let examples: Vec<String> = hits
        .iter()
        .take(HP.stock_phrase_examples)
        .map(|&(s, e)| context_around(text, s, e, HP.context_window_chars))
        .collect();
    let detail = if examples.is_empty() {
        "no stock AI phrasing found".to_string()
    } else {
        format!(
            "{} stock AI phrases, e.g. {}",
            hits.len(),
            examples.join(" | ")
        )
    };

    QualitySignal {
        metric: "human_likeness".to_string(),
        score: (1.0 - HP.stock_phrase_penalty * hits.len() as f64).max(0.0),
        detail,
    }
}

fn signal_redundancy(sentences: &[String]) -> QualitySignal {
    let sets: Vec<HashSet<String>> = sentences
        .iter()
        .filter(|s| s.trim().len() > HP.redundancy_min_chars)
        .map(|s| tokenize::words(s).into_iter().collect())
        .collect();

    let mut similar_pairs = 0usize;
    for i in 0..sets.len() {
        for j in i + 1..sets.len() {
            if jaccard(&sets[i], &sets[j]) > HP.redundancy_jaccard {
                similar_pairs += 1;
            }
        }
    }

    QualitySignal {
        metric: "redundancy".to_string(),
        score: (1.0 - HP.redundancy_penalty * similar_pairs as f64).max(0.0),
        detail: format!("{similar_pairs} near-duplicate sentence pairs"),
    }
}

fn signal_active_voice(text: &str, sentence_count: usize) -> QualitySignal {
    let passive = PASSIVE_RE.find_iter(text).count();
    let ratio = if sentence_count == 0 {
        0.0
    } else {
        passive as f64 / sentence_count as f64
    };
    QualitySignal {
        metric: "active_voice".to_string(),
        score: (1.0 - HP.passive_ratio_factor * ratio).max(0.0),
        detail: format!("{:.1}% passive constructions", ratio * 100.0),
    }
}

fn signal_logical_flow(words: &[String]) -> QualitySignal {
    let found = TRANSITIONS
        .iter()
        .filter(|t| tokenize::contains_phrase(words, &tokenize::words(t)))
        .count();
    QualitySignal {
        metric: "logical_flow".to_string(),
        score: (HP.transition_step * found as f64).min(1.0),
        detail: format!("{found} transition indicators"),
    }
}

fn signal_phrase_reuse(words: &[String]) -> QualitySignal {
    let repeated = find_repeated_ngrams(words);
    let detail = match repeated.first() {
        Some(top) => format!(
            "{} repeated phrases; '{}' ({}-word phrase) appears {} times",
            repeated.len(),
            top.phrase,
            top.n,
            top.count
        ),
        None => "no repeated phrases".to_string(),
    };
    QualitySignal {
        metric: "phrase_reuse".to_string(),
        score: (1.0 - HP.phrase_reuse_penalty * repeated.len() as f64).max(0.0),
        detail,
    }
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection(b).count();
    let union = a.len() + b.len() - inter;
    inter as f64 / union as f64
}

#[derive(Debug)]
struct NgramResult {
    phrase: String,
    count: usize,
    n: usize,
}

/// Repeated phrases, longest first, with sub-phrases of a longer repeated
/// phrase suppressed.
fn find_repeated_ngrams(tokens: &[String]) -> Vec<NgramResult> {
    let min_n = HP.repeated_ngram_min_n;
    let max_n = HP.repeated_ngram_max_n;
    let min_count = HP.repeated_ngram_min_count;

    if tokens.len() < min_n {
        return vec![];
    }

    let mut ngram_counts: HashMap<&[String], usize> = HashMap::new();
    for n in min_n..=max_n {
        if tokens.len() < n {
            continue;
        }
        for gram in tokens.windows(n) {
            *ngram_counts.entry(gram).or_insert(0) += 1;
        }
    }

    // Frequent enough, and carrying at least one content word.
    let mut repeated: Vec<(&[String], usize)> = ngram_counts
        .into_iter()
        .filter(|(gram, count)| {
            *count >= min_count && !gram.iter().all(|w| STOPWORDS.contains(w.as_str()))
        })
        .collect();
    if repeated.is_empty() {
        return vec![];
    }

    // Sort by (-length, -count, phrase) so suppression and output are stable.
    repeated.sort_by(|a, b| {
        b.0.len()
            .cmp(&a.0.len())
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| a.0.cmp(b.0))
    });

    let mut kept: Vec<(&[String], usize)> = Vec::new();
    for (gram, count) in repeated {
        let shadowed = kept.iter().any(|(longer, longer_count)| {
            longer.len() > gram.len()
                && *longer_count >= count
                && longer.windows(gram.len()).any(|w| w == gram)
        });
        if !shadowed {
            kept.push((gram, count));
        }
    }

    kept.into_iter()
        .map(|(gram, count)| NgramResult {
            phrase: gram.join(" "),
            count,
            n: gram.len(),
        })
        .collect()
}
