// src/scoring/mod.rs
//! Confidence scoring. Baseline mode uses a weighted formula over the raw
//! strategy confidence; enhanced mode blends seven features.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ExtractorConfig;
use crate::extractors::{ExtractionMethod, SkillCandidate};
use crate::nlp::tokenizer::looks_technical;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringModel {
    Baseline,
    Ensemble,
}

/// Where a candidate sits, gathered by the pipeline before scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateContext {
    /// Distinct mentions of the same dedup key across the posting.
    pub frequency: usize,
    /// Relevance probability of the section the mention came from.
    pub section_probability: f32,
    /// Length in bytes of the field the offsets point into.
    pub field_length: usize,
}

/// Per-feature values of the ensemble, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureScores {
    pub extraction_method: f32,
    pub context_strength: f32,
    pub frequency: f32,
    pub category_relevance: f32,
    pub position_importance: f32,
    pub text_quality: f32,
    pub skill_specificity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Indicator {
    Strong,
    Medium,
    Skill,
    None,
}

pub struct ConfidenceScorer {
    model: ScoringModel,
    config: Arc<ExtractorConfig>,
}

fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let phrase = phrase.to_lowercase();
    haystack.match_indices(phrase.as_str()).any(|(i, _)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + phrase.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

impl ConfidenceScorer {
    pub fn new(model: ScoringModel, config: Arc<ExtractorConfig>) -> Self {
        Self { model, config }
    }

    /// Final confidence in [0, 1].
    pub fn score(&self, candidate: &SkillCandidate, ctx: &CandidateContext) -> f32 {
        let score = match self.model {
            ScoringModel::Baseline => self.baseline(candidate, ctx),
            ScoringModel::Ensemble => {
                let features = self.features(candidate, ctx);
                self.combine(&features)
            }
        };
        if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn indicator(&self, candidate: &SkillCandidate) -> (bool, bool, bool) {
        let context = candidate.context_snippet.to_lowercase();
        let strong = self
            .config
            .strong_indicators
            .iter()
            .any(|p| contains_phrase(&context, p));
        let medium = self
            .config
            .medium_indicators
            .iter()
            .any(|p| contains_phrase(&context, p));
        let skill = self
            .config
            .skill_indicator_phrases
            .iter()
            .any(|p| contains_phrase(&context, p));
        (strong, medium, skill)
    }

    fn strongest_indicator(&self, candidate: &SkillCandidate) -> Indicator {
        match self.indicator(candidate) {
            (true, _, _) => Indicator::Strong,
            (_, true, _) => Indicator::Medium,
            (_, _, true) => Indicator::Skill,
            _ => Indicator::None,
        }
    }

    fn baseline(&self, candidate: &SkillCandidate, ctx: &CandidateContext) -> f32 {
        let params = &self.config.baseline_scoring;
        let extra_mentions = ctx.frequency.saturating_sub(1) as f32;
        let frequency_boost = (params.frequency_step * extra_mentions).min(params.frequency_cap);
        let (strong, medium, _) = self.indicator(candidate);
        let mut score = candidate.confidence + frequency_boost;
        if strong {
            score += params.strong_indicator_boost;
        }
        if medium {
            score += params.medium_indicator_boost;
        }
        score
    }

    pub fn features(&self, candidate: &SkillCandidate, ctx: &CandidateContext) -> FeatureScores {
        let context_strength = match self.strongest_indicator(candidate) {
            Indicator::Strong => 1.0,
            Indicator::Medium => 0.7,
            Indicator::Skill => 0.6,
            Indicator::None => 0.3,
        };
        let frequency = (0.4 + 0.2 * ctx.frequency.saturating_sub(1) as f32).min(1.0);
        let relative_position = if ctx.field_length == 0 {
            0.0
        } else {
            candidate.start_offset as f32 / ctx.field_length as f32
        };
        let position_importance =
            0.7 * ctx.section_probability + 0.3 * (1.0 - relative_position.clamp(0.0, 1.0));

        FeatureScores {
            extraction_method: candidate.confidence,
            context_strength,
            frequency,
            category_relevance: self.config.category_weight(&candidate.category),
            position_importance: position_importance.clamp(0.0, 1.0),
            text_quality: text_quality(&candidate.raw_text),
            skill_specificity: self.specificity(candidate),
        }
    }

    fn specificity(&self, candidate: &SkillCandidate) -> f32 {
        if candidate.method == ExtractionMethod::Lexicon
            || self.config.lexicon.lookup(&candidate.normalized_name).is_some()
        {
            return 1.0;
        }
        if candidate.normalized_name.split_whitespace().any(looks_technical) {
            return 0.9;
        }
        if candidate.method == ExtractionMethod::Pattern {
            return 0.85;
        }
        match candidate.normalized_name.split_whitespace().count() {
            2..=3 => 0.7,
            _ => 0.5,
        }
    }

    fn combine(&self, f: &FeatureScores) -> f32 {
        let w = &self.config.ensemble_weights;
        w.extraction_method * f.extraction_method
            + w.context_strength * f.context_strength
            + w.frequency * f.frequency
            + w.category_relevance * f.category_relevance
            + w.position_importance * f.position_importance
            + w.text_quality * f.text_quality
            + w.skill_specificity * f.skill_specificity
    }
}

/// Penalises odd characters, very short spans and long run-on phrases.
fn text_quality(raw: &str) -> f32 {
    let trimmed = raw.trim();
    let chars = trimmed.chars().count();
    if chars < 2 {
        // single-letter languages (R, C) are matched case-sensitively already
        return if trimmed.chars().all(char::is_uppercase) { 0.8 } else { 0.3 };
    }
    let mut quality: f32 = 1.0;
    let odd = trimmed
        .chars()
        .filter(|c| !(c.is_alphanumeric() || c.is_whitespace() || "+#.-/&'".contains(*c)))
        .count();
    if odd > 0 {
        quality -= 0.4;
    }
    if trimmed.split_whitespace().count() > 4 || chars > 40 {
        quality -= 0.2;
    }
    quality.clamp(0.0, 1.0)
}
