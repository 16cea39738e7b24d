// src/config/mod.rs
//! Immutable parameter bundle read by every stage of the extractor.
//!
//! Two presets exist: [`ExtractorConfig::enhanced`] (tech lexicon, ensemble
//! scoring, pattern and semantic strategies) and [`ExtractorConfig::baseline`]
//! (general-skill lexicon, weighted-formula scoring). Both are validated before
//! an engine is built; a config that fails validation never reaches extraction.

pub mod file;
pub mod lexicon;
pub mod vocab;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::extractors::ExtractionMethod;
use crate::utils::error::ConfigError;

pub use file::ConfigOverrides;
pub use lexicon::{Lexicon, LexiconEntry};

/// Category assigned when nothing more specific is known.
pub const FALLBACK_CATEGORY: &str = "other";

/// Which strategies the engine may run. Mode and capabilities can still
/// disable an enabled strategy at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledStrategies {
    pub lexicon: bool,
    pub ner: bool,
    pub noun_chunk: bool,
    pub pattern: bool,
    pub semantic: bool,
}

impl Default for EnabledStrategies {
    fn default() -> Self {
        Self {
            lexicon: true,
            ner: true,
            noun_chunk: true,
            pattern: true,
            semantic: true,
        }
    }
}

impl EnabledStrategies {
    pub fn is_enabled(&self, method: ExtractionMethod) -> bool {
        match method {
            ExtractionMethod::Lexicon => self.lexicon,
            ExtractionMethod::Ner => self.ner,
            ExtractionMethod::NounChunk => self.noun_chunk,
            ExtractionMethod::Pattern => self.pattern,
            ExtractionMethod::Semantic => self.semantic,
        }
    }

    pub fn set(&mut self, method: ExtractionMethod, enabled: bool) {
        match method {
            ExtractionMethod::Lexicon => self.lexicon = enabled,
            ExtractionMethod::Ner => self.ner = enabled,
            ExtractionMethod::NounChunk => self.noun_chunk = enabled,
            ExtractionMethod::Pattern => self.pattern = enabled,
            ExtractionMethod::Semantic => self.semantic = enabled,
        }
    }
}

/// Raw confidence each strategy assigns to its own candidates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodWeights {
    pub lexicon: f32,
    pub ner: f32,
    pub noun_chunk: f32,
    pub pattern_version: f32,
    pub pattern_framework: f32,
    pub pattern_certification: f32,
    pub semantic: f32,
}

impl MethodWeights {
    fn enhanced() -> Self {
        Self {
            lexicon: 1.0,
            ner: 0.65,
            noun_chunk: 0.55,
            pattern_version: 0.8,
            pattern_framework: 0.7,
            pattern_certification: 0.8,
            semantic: 0.8,
        }
    }

    fn baseline() -> Self {
        Self {
            lexicon: 0.85,
            ..Self::enhanced()
        }
    }

    fn all(&self) -> [(&'static str, f32); 7] {
        [
            ("method_weights.lexicon", self.lexicon),
            ("method_weights.ner", self.ner),
            ("method_weights.noun_chunk", self.noun_chunk),
            ("method_weights.pattern_version", self.pattern_version),
            ("method_weights.pattern_framework", self.pattern_framework),
            ("method_weights.pattern_certification", self.pattern_certification),
            ("method_weights.semantic", self.semantic),
        ]
    }
}

/// Parameters of the baseline weighted formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineScoring {
    /// Boost per extra occurrence of the same skill.
    pub frequency_step: f32,
    /// Cap on the total frequency boost.
    pub frequency_cap: f32,
    pub strong_indicator_boost: f32,
    pub medium_indicator_boost: f32,
}

impl Default for BaselineScoring {
    fn default() -> Self {
        Self {
            frequency_step: 0.05,
            frequency_cap: 0.15,
            strong_indicator_boost: 0.15,
            medium_indicator_boost: 0.10,
        }
    }
}

/// Feature weights of the enhanced ensemble. They are expected to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleWeights {
    pub extraction_method: f32,
    pub context_strength: f32,
    pub frequency: f32,
    pub category_relevance: f32,
    pub position_importance: f32,
    pub text_quality: f32,
    pub skill_specificity: f32,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            extraction_method: 0.25,
            context_strength: 0.20,
            frequency: 0.15,
            category_relevance: 0.15,
            position_importance: 0.10,
            text_quality: 0.10,
            skill_specificity: 0.05,
        }
    }
}

impl EnsembleWeights {
    pub fn sum(&self) -> f32 {
        self.extraction_method
            + self.context_strength
            + self.frequency
            + self.category_relevance
            + self.position_importance
            + self.text_quality
            + self.skill_specificity
    }
}

/// Optional capabilities, computed once at startup from the resources that
/// actually loaded. Strategy selection is a pure function of this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub semantic_available: bool,
    pub patterns_available: bool,
}

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Ask for enhanced mode. It is granted only when the capabilities allow it.
    pub prefer_enhanced: bool,
    pub lexicon: Lexicon,
    /// Characters kept on each side of a mention for its context snippet.
    pub context_window: usize,
    /// Hard cap on any context snippet, merged snippets included.
    pub max_snippet_chars: usize,
    /// Category weight table. Its keys are the known category set.
    pub category_weights: BTreeMap<String, f32>,
    pub confidence_threshold: f32,
    pub max_skills_per_category: usize,
    pub overflow_threshold: f32,
    pub semantic_similarity_threshold: f32,
    pub enabled_strategies: EnabledStrategies,
    pub method_weights: MethodWeights,
    pub noise_words: BTreeSet<String>,
    pub noise_phrases: BTreeSet<String>,
    pub relevant_section_keywords: Vec<String>,
    pub excluded_section_keywords: Vec<String>,
    /// Phrases signalling that the body of a section talks about skills.
    pub skill_indicator_phrases: Vec<String>,
    pub strong_indicators: Vec<String>,
    pub medium_indicators: Vec<String>,
    /// Sections at least this long survive the section filter's fallback.
    pub fallback_min_section_chars: usize,
    pub baseline_scoring: BaselineScoring,
    pub ensemble_weights: EnsembleWeights,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::enhanced()
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn owned_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

impl ExtractorConfig {
    /// Tech-skill lexicon with every strategy enabled and ensemble scoring.
    pub fn enhanced() -> Self {
        Self {
            prefer_enhanced: true,
            lexicon: lexicon::tech_lexicon(),
            method_weights: MethodWeights::enhanced(),
            ..Self::common()
        }
    }

    /// General-skill lexicon, weighted-formula scoring, no semantic matching.
    pub fn baseline() -> Self {
        let mut enabled = EnabledStrategies::default();
        enabled.semantic = false;
        Self {
            prefer_enhanced: false,
            lexicon: lexicon::general_lexicon(),
            method_weights: MethodWeights::baseline(),
            enabled_strategies: enabled,
            ..Self::common()
        }
    }

    fn common() -> Self {
        Self {
            prefer_enhanced: true,
            lexicon: Lexicon::new(),
            context_window: 80,
            max_snippet_chars: 200,
            category_weights: lexicon::default_category_weights(),
            confidence_threshold: 0.6,
            max_skills_per_category: 15,
            overflow_threshold: 0.9,
            semantic_similarity_threshold: 0.7,
            enabled_strategies: EnabledStrategies::default(),
            method_weights: MethodWeights::enhanced(),
            noise_words: owned_set(vocab::NOISE_WORDS),
            noise_phrases: owned_set(vocab::NOISE_PHRASES),
            relevant_section_keywords: owned(vocab::RELEVANT_SECTION_KEYWORDS),
            excluded_section_keywords: owned(vocab::EXCLUDED_SECTION_KEYWORDS),
            skill_indicator_phrases: owned(vocab::SKILL_INDICATOR_PHRASES),
            strong_indicators: owned(vocab::STRONG_INDICATORS),
            medium_indicators: owned(vocab::MEDIUM_INDICATORS),
            fallback_min_section_chars: 100,
            baseline_scoring: BaselineScoring::default(),
            ensemble_weights: EnsembleWeights::default(),
        }
    }

    // --- Builder-style setters used by callers and tests ---

    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_max_skills_per_category(mut self, max: usize) -> Self {
        self.max_skills_per_category = max;
        self
    }

    pub fn with_strategy(mut self, method: ExtractionMethod, enabled: bool) -> Self {
        self.enabled_strategies.set(method, enabled);
        self
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Whether `category` is part of the known category set.
    pub fn is_known_category(&self, category: &str) -> bool {
        self.category_weights.contains_key(category)
    }

    pub fn category_weight(&self, category: &str) -> f32 {
        self.category_weights
            .get(category)
            .copied()
            .or_else(|| self.category_weights.get(FALLBACK_CATEGORY).copied())
            .unwrap_or(0.5)
    }

    /// Checks every range and cross-reference constraint. Called once when an
    /// engine is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("confidence_threshold", self.confidence_threshold)?;
        check_unit("overflow_threshold", self.overflow_threshold)?;
        check_unit(
            "semantic_similarity_threshold",
            self.semantic_similarity_threshold,
        )?;
        for (name, value) in self.method_weights.all() {
            check_unit(name, value)?;
        }

        let b = &self.baseline_scoring;
        check_unit("baseline_scoring.frequency_step", b.frequency_step)?;
        check_unit("baseline_scoring.frequency_cap", b.frequency_cap)?;
        check_unit("baseline_scoring.strong_indicator_boost", b.strong_indicator_boost)?;
        check_unit("baseline_scoring.medium_indicator_boost", b.medium_indicator_boost)?;

        let sum = self.ensemble_weights.sum();
        if (sum - 1.0).abs() > 1e-3 {
            return Err(ConfigError::Invalid(format!(
                "ensemble weights must sum to 1.0, got {sum:.3}"
            )));
        }

        if self.lexicon.is_empty() {
            return Err(ConfigError::EmptyLexicon);
        }
        if self.max_skills_per_category == 0 {
            return Err(ConfigError::Invalid(
                "max_skills_per_category must be at least 1".to_string(),
            ));
        }
        if self.max_snippet_chars == 0 {
            return Err(ConfigError::Invalid(
                "max_snippet_chars must be at least 1".to_string(),
            ));
        }

        for (category, weight) in &self.category_weights {
            if !(0.0..=1.0).contains(weight) {
                return Err(ConfigError::OutOfRange {
                    name: "category_weights",
                    value: *weight,
                    min: 0.0,
                    max: 1.0,
                });
            }
            if category.trim().is_empty() {
                return Err(ConfigError::Invalid("empty category name".to_string()));
            }
        }
        if !self.is_known_category(FALLBACK_CATEGORY) {
            return Err(ConfigError::UnknownCategory(FALLBACK_CATEGORY.to_string()));
        }
        for category in self.lexicon.categories() {
            if !self.is_known_category(category) {
                return Err(ConfigError::UnknownCategory(category.to_string()));
            }
        }
        self.lexicon.validate_aliases()?;

        Ok(())
    }
}

fn check_unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_nan() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        ExtractorConfig::enhanced().validate().unwrap();
        ExtractorConfig::baseline().validate().unwrap();
    }

    #[test]
    fn enhanced_lexicon_is_larger_than_baseline() {
        let enhanced = ExtractorConfig::enhanced();
        let baseline = ExtractorConfig::baseline();
        assert!(enhanced.lexicon.len() >= 400, "got {}", enhanced.lexicon.len());
        assert!(baseline.lexicon.len() >= 175, "got {}", baseline.lexicon.len());
        assert!(!baseline.enabled_strategies.semantic);
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let config = ExtractorConfig::enhanced().with_confidence_threshold(1.5);
        match config.validate() {
            Err(ConfigError::OutOfRange { name, .. }) => assert_eq!(name, "confidence_threshold"),
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn empty_lexicon_is_rejected() {
        let config = ExtractorConfig::enhanced().with_lexicon(Lexicon::new());
        assert!(matches!(config.validate(), Err(ConfigError::EmptyLexicon)));
    }

    #[test]
    fn lexicon_category_must_be_known() {
        let lexicon = Lexicon::new().with_category("quantum_knitting", &["Purl Entanglement"]);
        let config = ExtractorConfig::enhanced().with_lexicon(lexicon);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownCategory(c)) if c == "quantum_knitting"
        ));
    }

    #[test]
    fn ensemble_weights_must_sum_to_one() {
        let mut config = ExtractorConfig::enhanced();
        config.ensemble_weights.frequency = 0.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!((EnsembleWeights::default().sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_category_weight_falls_back() {
        let config = ExtractorConfig::enhanced();
        assert_eq!(
            config.category_weight("does_not_exist"),
            config.category_weight(FALLBACK_CATEGORY)
        );
    }
}
