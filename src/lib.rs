//! Search-readiness and originality checks for generated articles.
//!
//! An [`Engine`] runs the SEO checklist, the plagiarism detector and the
//! quality scorer over one [`Article`], then asks the [`ExportGate`] whether
//! the article may be exported. Export code must hold an [`ExportPermit`],
//! which only [`authorize_export`] hands out for approved decisions.

pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod keywords;
pub mod plagiarism;
pub mod quality;
pub mod seo;
pub mod structure;
pub mod tokenize;
pub mod types;

pub use config::{default_catalog, CheckSpec, Config, MeasureWeights, Rule, Thresholds};
pub use engine::{Engine, Evaluation};
pub use error::{CheckError, ConfigError, Error, GateError, InputError, Result};
pub use gate::{authorize_export, ExportGate, ExportPermit, GateDecision, GateInputs, GateState};
pub use keywords::KeywordExtractor;
pub use plagiarism::PlagiarismDetector;
pub use seo::SeoEvaluator;
pub use types::{
    Article, CheckResult, CheckStatus, ContentItem, Keyword, PlagiarismReport, QualityReport,
    QualitySignal, SeoReport, SimilarityMeasure, SimilarityMethod, SpanMatch,
};
