//! Markdown structure of an article body: headings, lists, emphasis, links,
//! and per-paragraph word counts.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tokenize;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(#{1,6})\s+(.+?)\s*#*\s*$").unwrap());

static BULLET_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-*+]\s").unwrap());

static NUMBERED_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+[.)]\s").unwrap());

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*[^*]+\*\*|__[^_]+__").unwrap());

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(!?)\[([^\]]*)\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)"#).unwrap());

/// Markdown with link and image targets removed; anchor and alt text stay.
/// Word counts, density and readability are measured on this text.
pub fn strip_link_targets(text: &str) -> Cow<'_, str> {
    LINK_RE.replace_all(text, "$2")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub url: String,
}

impl Link {
    pub fn is_external(&self) -> bool {
        let url = self.url.to_ascii_lowercase();
        url.starts_with("http://") || url.starts_with("https://")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphStats {
    pub index: usize,
    pub words: usize,
    /// Paragraphs made only of heading lines.
    pub is_heading: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Structure {
    pub headings: Vec<Heading>,
    pub links: Vec<Link>,
    /// (alt text, url)
    pub images: Vec<Link>,
    pub bullet_items: usize,
    pub numbered_items: usize,
    pub bold_spans: usize,
    pub paragraphs: Vec<ParagraphStats>,
}

impl Structure {
    pub fn parse(body: &[String]) -> Self {
        let mut out = Structure::default();
        for (index, paragraph) in body.iter().enumerate() {
            let mut all_headings = true;
            let mut prose = String::new();
            for line in paragraph.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                if let Some(caps) = HEADING_RE.captures(line) {
                    out.headings.push(Heading {
                        level: caps[1].len(),
                        text: caps[2].to_string(),
                    });
                    continue;
                }
                all_headings = false;
                if BULLET_LINE_RE.is_match(line) {
                    out.bullet_items += 1;
                } else if NUMBERED_LINE_RE.is_match(line) {
                    out.numbered_items += 1;
                }
                prose.push_str(line);
                prose.push('\n');
            }

            out.bold_spans += BOLD_RE.find_iter(paragraph).count();
            for caps in LINK_RE.captures_iter(paragraph) {
                let link = Link {
                    text: caps[2].to_string(),
                    url: caps[3].to_string(),
                };
                if caps[1].is_empty() {
                    out.links.push(link);
                } else {
                    out.images.push(link);
                }
            }

            out.paragraphs.push(ParagraphStats {
                index,
                words: tokenize::words(&prose).len(),
                is_heading: all_headings,
            });
        }
        out
    }

    pub fn prose_paragraphs(&self) -> impl Iterator<Item = &ParagraphStats> {
        self.paragraphs.iter().filter(|p| !p.is_heading)
    }

    pub fn has_lists(&self) -> bool {
        self.bullet_items + self.numbered_items > 0
    }

    /// Problems in the heading outline: more than one H1, an H1 after other
    /// headings, a first heading deeper than H2, or a skipped level.
    pub fn hierarchy_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let mut previous: Option<usize> = None;
        for (i, heading) in self.headings.iter().enumerate() {
            match previous {
                None if heading.level > 2 => violations.push(format!(
                    "first heading '{}' is H{}",
                    heading.text, heading.level
                )),
                Some(_) if heading.level == 1 => {
                    violations.push(format!("extra H1 '{}' at heading {}", heading.text, i + 1))
                }
                Some(prev) if heading.level > prev + 1 => violations.push(format!(
                    "'{}' jumps from H{prev} to H{}",
                    heading.text, heading.level
                )),
                _ => {}
            }
            previous = Some(heading.level);
        }
        violations
    }
}
