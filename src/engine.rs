use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::gate::{ExportGate, GateDecision};
use crate::keywords::KeywordExtractor;
use crate::plagiarism::PlagiarismDetector;
use crate::quality;
use crate::seo::SeoEvaluator;
use crate::types::{Article, ContentItem, Keyword, PlagiarismReport, QualityReport, SeoReport};

/// Everything one evaluation produced. The decision is derived from the three
/// reports it is stored with and cannot be replaced on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    decision: GateDecision,
    seo: SeoReport,
    plagiarism: PlagiarismReport,
    quality: QualityReport,
}

impl Evaluation {
    pub fn decision(&self) -> &GateDecision {
        &self.decision
    }

    pub fn seo(&self) -> &SeoReport {
        &self.seo
    }

    pub fn plagiarism(&self) -> &PlagiarismReport {
        &self.plagiarism
    }

    pub fn quality(&self) -> &QualityReport {
        &self.quality
    }

    pub fn approved(&self) -> bool {
        self.decision.approved()
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    seo: SeoEvaluator,
    plagiarism: PlagiarismDetector,
    keywords: KeywordExtractor,
    gate: ExportGate,
}

impl Engine {
    /// Rejects an invalid configuration before any component is built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            seo: SeoEvaluator::new(&config),
            plagiarism: PlagiarismDetector::new(&config),
            keywords: KeywordExtractor::new(&config),
            gate: ExportGate::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluates against the article's own target keyword.
    pub fn evaluate(&self, article: &Article, corpus: &[ContentItem]) -> Result<Evaluation> {
        let keyword = Keyword::target(article.target_keyword.clone());
        self.evaluate_with_keyword(article, &keyword, corpus)
    }

    pub fn evaluate_with_keyword(
        &self,
        article: &Article,
        keyword: &Keyword,
        corpus: &[ContentItem],
    ) -> Result<Evaluation> {
        article.validate()?;

        let (seo, (plagiarism, quality)) = rayon::join(
            || self.seo.evaluate(article, keyword),
            || {
                rayon::join(
                    || self.plagiarism.detect(article, corpus),
                    || quality::score(article),
                )
            },
        );
        let (seo, plagiarism, quality) = (seo?, plagiarism?, quality?);

        debug!(
            seo = seo.aggregate_score,
            originality = plagiarism.originality_score,
            quality = quality.composite_score,
            "analyses complete"
        );

        let decision = self.gate.decide(&seo, &plagiarism, &quality);
        Ok(Evaluation {
            decision,
            seo,
            plagiarism,
            quality,
        })
    }

    pub fn extract_keywords(&self, items: &[ContentItem], seed_topic: &str) -> Vec<Keyword> {
        self.keywords.extract(items, seed_topic)
    }

    pub fn extract_keywords_for_article(
        &self,
        items: &[ContentItem],
        article: &Article,
    ) -> Vec<Keyword> {
        self.keywords.extract_for_article(items, article)
    }
}
