//! Text normalization: words, sentences, and n-grams.
//!
//! Everything downstream (keyword extraction, SEO checks, plagiarism measures,
//! quality scoring) goes through these functions so that every component agrees
//! on what a "word" and a "sentence" are. Empty input yields empty output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

/// A word is a run of letters/digits, optionally joined by intra-word hyphens
/// or apostrophes ("well-known", "don't"). Anything else is a separator.
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['-][\p{L}\p{N}]+)*").unwrap());

static SENTENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["'\u{201D}\u{2019})\]]*(?:\s+|$)"#).unwrap());

static BLOCK_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:#{1,6}\s|[-*+]\s|\d+[.)]\s|>)").unwrap());

static SLUG_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Tokens that end in a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "vs", "etc", "e.g", "i.e", "inc", "ltd", "corp",
    "fig", "approx", "dept", "cf",
];

/// Abbreviations that are also ordinary words; only taken as abbreviations
/// when a number follows ("No. 5", "Vol. 2").
const NUMBERED_ABBREVIATIONS: &[&str] = &["no", "vol", "pp", "art"];

/// Capitalized words that usually open a sentence rather than continue a name.
const SENTENCE_STARTERS: &[&str] = &[
    "a", "an", "the", "it", "its", "this", "that", "these", "those", "there", "then", "we", "i",
    "he", "she", "they", "you", "our", "my", "his", "her", "their", "but", "and", "so", "if",
    "when", "in", "on", "at", "for",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tokens {
    pub words: Vec<String>,
    pub sentences: Vec<String>,
}

impl Tokens {
    /// Sliding window of `n` words. Each call starts a fresh pass.
    pub fn ngrams(&self, n: usize) -> Ngrams<'_> {
        ngrams(&self.words, n)
    }
}

pub fn tokenize(text: &str) -> Tokens {
    Tokens {
        words: words(text),
        sentences: sentences(text),
    }
}

/// Lowercased words with punctuation stripped.
pub fn words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase().replace('\u{2019}', "'");
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Sentence split on terminal punctuation.
///
/// Blank lines and markdown block starts (headings, list items, blockquotes)
/// are hard boundaries, so a heading without a trailing period is still its own
/// sentence. Returned sentences keep their original casing and punctuation with
/// whitespace collapsed.
pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for block in blocks(text) {
        split_block(&block, &mut out);
    }
    out
}

/// Words for phrase matching: hyphenated compounds are split and possessive
/// endings dropped, so "Kubernetes-native" and "Kubernetes's" both contain
/// "kubernetes".
pub fn match_words(text: &str) -> Vec<String> {
    words(text)
        .iter()
        .flat_map(|w| {
            let stem = w.strip_suffix("'s").unwrap_or(w);
            stem.split('-')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// A sentence reduced to its normalized words joined by single spaces.
pub fn normalize_sentence(sentence: &str) -> String {
    words(sentence).join(" ")
}

#[derive(Debug, Clone)]
pub struct Ngrams<'a> {
    words: &'a [String],
    n: usize,
    pos: usize,
}

pub fn ngrams(words: &[String], n: usize) -> Ngrams<'_> {
    Ngrams { words, n, pos: 0 }
}

impl Iterator for Ngrams<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.n == 0 || self.pos + self.n > self.words.len() {
            return None;
        }
        let gram = self.words[self.pos..self.pos + self.n].join(" ");
        self.pos += 1;
        Some(gram)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.n == 0 {
            0
        } else {
            (self.words.len() + 1).saturating_sub(self.pos + self.n)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Ngrams<'_> {}

/// Non-overlapping occurrences are not required: "a a a" contains "a a" twice.
pub fn count_phrase(words: &[String], phrase: &[String]) -> usize {
    if phrase.is_empty() || phrase.len() > words.len() {
        return 0;
    }
    words.windows(phrase.len()).filter(|w| *w == phrase).count()
}

pub fn contains_phrase(words: &[String], phrase: &[String]) -> bool {
    count_phrase(words, phrase) > 0
}

pub fn slugify(text: &str) -> String {
    SLUG_SEPARATOR_RE
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Vowel-group syllable estimate; never less than one.
pub fn syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    let mut count = 0usize;
    let mut prev_vowel = false;
    for c in word.chars() {
        let is_vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = is_vowel;
    }
    if word.ends_with('e') && !word.ends_with("le") && count > 1 {
        count -= 1;
    }
    count.max(1)
}

pub fn is_block_marker(line: &str) -> bool {
    BLOCK_MARKER_RE.is_match(line)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_block_marker(line) {
            if !current.is_empty() {
                blocks.push(current.join(" "));
                current.clear();
            }
        }
        if !trimmed.is_empty() {
            current.push(trimmed);
        }
        // Headings are single-line blocks.
        if trimmed.starts_with('#') && is_block_marker(line) {
            blocks.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        blocks.push(current.join(" "));
    }
    blocks
}

fn split_block(block: &str, out: &mut Vec<String>) {
    let mut start = 0usize;
    for m in SENTENCE_END_RE.find_iter(block) {
        if m.end() <= start {
            continue;
        }
        if ends_with_abbreviation(&block[start..m.start()], m.as_str(), &block[m.end()..]) {
            continue;
        }
        push_sentence(&block[start..m.end()], out);
        start = m.end();
    }
    if start < block.len() {
        push_sentence(&block[start..], out);
    }
}

fn ends_with_abbreviation(preceding: &str, terminator: &str, following: &str) -> bool {
    if !terminator.starts_with('.') || terminator.trim_end().len() > 1 {
        return false;
    }
    let mut tokens = preceding.split_whitespace().rev();
    let Some(last) = tokens.next() else {
        return false;
    };
    let last = last.trim_start_matches(|c: char| !c.is_alphanumeric());
    let token = last.to_lowercase();
    let next = following.split_whitespace().next().unwrap_or_default();

    if NUMBERED_ABBREVIATIONS.contains(&token.as_str()) {
        return next.starts_with(|c: char| c.is_ascii_digit());
    }
    if is_initial(last) {
        return initial_continues(tokens.next(), next);
    }
    ABBREVIATIONS.contains(&token.as_str())
}

fn is_initial(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

/// An initial continues a name when it follows another initial ("J. R.
/// Tolkien") or sits between a capitalized word and a capitalized token that
/// does not look like a new sentence ("John F. Kennedy", "J. Smith").
fn initial_continues(before: Option<&str>, next: &str) -> bool {
    let next_word = next.trim_end_matches(|c: char| !c.is_alphanumeric());
    let next_capitalized = next_word.starts_with(char::is_uppercase);
    let next_starts_sentence = SENTENCE_STARTERS.contains(&next_word.to_lowercase().as_str());
    match before.map(|b| b.trim_end_matches('.')) {
        Some(b) if is_initial(b) => true,
        Some(b) if b.starts_with(char::is_uppercase) || b.is_empty() => {
            next_capitalized && !next_starts_sentence
        }
        Some(_) => false,
        None => next_capitalized && !next_starts_sentence,
    }
}

fn push_sentence(raw: &str, out: &mut Vec<String>) {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    // Stray punctuation ("...", "---") is not a sentence.
    if WORD_RE.is_match(&collapsed) {
        out.push(collapsed);
    }
}

pub(crate) fn context_around(text: &str, start: usize, end: usize, width: usize) -> String {
    let mid = (start + end) / 2;
    let half = width / 2;
    let ctx_start = snap_to_char_boundary(text, mid.saturating_sub(half), false);
    let ctx_end = snap_to_char_boundary(text, std::cmp::min(text.len(), mid + half), true);

    let snippet = text[ctx_start..ctx_end].replace('\n', " ");
    let prefix = if ctx_start > 0 { "..." } else { "" };
    let suffix = if ctx_end < text.len() { "..." } else { "" };
    format!("{prefix}{snippet}{suffix}")
}

/// Snap a byte offset to a valid char boundary.
/// If `forward` is true, snap forward; otherwise snap backward.
fn snap_to_char_boundary(text: &str, pos: usize, forward: bool) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    let mut p = pos;
    if forward {
        while p < text.len() && !text.is_char_boundary(p) {
            p += 1;
        }
    } else {
        while p > 0 && !text.is_char_boundary(p) {
            p -= 1;
        }
    }
    p
}
