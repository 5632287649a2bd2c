//! Export gate.
//!
//! The gate is a pure function of the three reports. A decision is approved
//! exactly when no mandatory check failed and originality reaches the
//! threshold; every other input, including a non-finite originality score,
//! blocks. `GateDecision` can only be built here, so no other code can
//! produce an approval.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::config::{Config, ORIGINALITY_THRESHOLD};
use crate::error::GateError;
use crate::types::{PlagiarismReport, QualityReport, SeoReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GateState {
    Pending,
    Approved,
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateDecision {
    approved: bool,
    reasons: Vec<String>,
    originality_score: f64,
    mandatory_failures: BTreeSet<String>,
    flagged_sentences: BTreeSet<usize>,
}

impl GateDecision {
    pub fn approved(&self) -> bool {
        self.approved
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn originality_score(&self) -> f64 {
        self.originality_score
    }

    pub fn mandatory_failures(&self) -> &BTreeSet<String> {
        &self.mandatory_failures
    }

    /// Set only when the article was blocked for originality.
    pub fn flagged_sentences(&self) -> &BTreeSet<usize> {
        &self.flagged_sentences
    }

    pub fn state(&self) -> GateState {
        if self.approved {
            GateState::Approved
        } else {
            GateState::Blocked
        }
    }
}

/// Reports collected so far. The gate stays `Pending` until all three exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateInputs<'a> {
    pub seo: Option<&'a SeoReport>,
    pub plagiarism: Option<&'a PlagiarismReport>,
    pub quality: Option<&'a QualityReport>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportGate {
    originality_threshold: f64,
}

impl Default for ExportGate {
    fn default() -> Self {
        Self {
            originality_threshold: ORIGINALITY_THRESHOLD,
        }
    }
}

impl ExportGate {
    pub fn new(config: &Config) -> Self {
        Self {
            originality_threshold: config.thresholds.originality,
        }
    }

    pub fn originality_threshold(&self) -> f64 {
        self.originality_threshold
    }

    /// `None` while any report is still missing.
    pub fn evaluate(&self, inputs: GateInputs<'_>) -> Option<GateDecision> {
        match inputs {
            GateInputs {
                seo: Some(seo),
                plagiarism: Some(plagiarism),
                quality: Some(quality),
            } => Some(self.decide(seo, plagiarism, quality)),
            _ => None,
        }
    }

    pub fn state(&self, inputs: GateInputs<'_>) -> GateState {
        self.evaluate(inputs)
            .map_or(GateState::Pending, |decision| decision.state())
    }

    /// The quality report is required input but carries no blocking rule.
    pub fn decide(
        &self,
        seo: &SeoReport,
        plagiarism: &PlagiarismReport,
        _quality: &QualityReport,
    ) -> GateDecision {
        let originality_score = plagiarism.originality_score;
        let mandatory_failures = seo.mandatory_failures();

        let decision = if !mandatory_failures.is_empty() {
            GateDecision {
                approved: false,
                reasons: mandatory_failures
                    .iter()
                    .map(|id| format!("mandatory check failed: {id}"))
                    .collect(),
                originality_score,
                mandatory_failures,
                flagged_sentences: BTreeSet::new(),
            }
        } else if originality_score.is_nan() {
            GateDecision {
                approved: false,
                reasons: vec!["originality score could not be computed".to_string()],
                originality_score,
                mandatory_failures,
                flagged_sentences: plagiarism.flagged_sentences.clone(),
            }
        } else if originality_score < self.originality_threshold {
            GateDecision {
                approved: false,
                reasons: vec![format!(
                    "originality below threshold: {:.1}% < {}%",
                    originality_score * 100.0,
                    round_percent(self.originality_threshold)
                )],
                originality_score,
                mandatory_failures,
                flagged_sentences: plagiarism.flagged_sentences.clone(),
            }
        } else {
            GateDecision {
                approved: true,
                reasons: Vec::new(),
                originality_score,
                mandatory_failures,
                flagged_sentences: BTreeSet::new(),
            }
        };

        info!(
            approved = decision.approved,
            originality_score,
            mandatory_failures = decision.mandatory_failures.len(),
            "gate decided"
        );
        decision
    }
}

fn round_percent(fraction: f64) -> f64 {
    (fraction * 1000.0).round() / 10.0
}

/// Proof that a decision approved export. Only `authorize_export` creates one.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPermit {
    originality_score: f64,
}

impl ExportPermit {
    pub fn originality_score(&self) -> f64 {
        self.originality_score
    }
}

/// Rendering collaborators call this before producing a final document.
pub fn authorize_export(decision: &GateDecision) -> Result<ExportPermit, GateError> {
    if decision.approved() {
        Ok(ExportPermit {
            originality_score: decision.originality_score(),
        })
    } else {
        Err(GateError::ExportBlocked {
            reasons: decision.reasons().to_vec(),
        })
    }
}
