// src/extractors/mod.rs
//! Extraction strategies. Each one turns analysed text into raw
//! [`SkillCandidate`]s; scoring, dedup and capping happen later.

pub mod lexicon;
pub mod ner;
pub mod noun_chunk;
pub mod pattern;
pub mod semantic;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ExtractorConfig;
use crate::nlp::TokenizedText;
use crate::text::context_snippet;
use crate::utils::error::ExtractError;

pub use lexicon::LexiconMatcher;
pub use ner::NerExtractor;
pub use noun_chunk::NounChunkExtractor;
pub use pattern::PatternExtractor;
pub use semantic::SemanticExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Lexicon,
    Ner,
    NounChunk,
    Pattern,
    Semantic,
}

impl ExtractionMethod {
    pub const ALL: [ExtractionMethod; 5] = [
        ExtractionMethod::Lexicon,
        ExtractionMethod::Ner,
        ExtractionMethod::NounChunk,
        ExtractionMethod::Pattern,
        ExtractionMethod::Semantic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Lexicon => "lexicon",
            ExtractionMethod::Ner => "ner",
            ExtractionMethod::NounChunk => "noun_chunk",
            ExtractionMethod::Pattern => "pattern",
            ExtractionMethod::Semantic => "semantic",
        }
    }

    /// Strategies that read tokens, entities or chunks.
    pub fn needs_language_model(&self) -> bool {
        matches!(
            self,
            ExtractionMethod::Ner | ExtractionMethod::NounChunk | ExtractionMethod::Semantic
        )
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "lexicon" => Ok(ExtractionMethod::Lexicon),
            "ner" => Ok(ExtractionMethod::Ner),
            "noun_chunk" | "nounchunk" => Ok(ExtractionMethod::NounChunk),
            "pattern" => Ok(ExtractionMethod::Pattern),
            "semantic" => Ok(ExtractionMethod::Semantic),
            other => Err(format!(
                "unknown strategy '{other}' (expected lexicon, ner, noun_chunk, pattern or semantic)"
            )),
        }
    }
}

/// An unscored mention found by exactly one strategy. Offsets are byte
/// offsets into the text handed to the strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCandidate {
    pub raw_text: String,
    pub normalized_name: String,
    pub category: String,
    pub method: ExtractionMethod,
    pub confidence: f32,
    pub context_snippet: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub source_field: String,
}

impl SkillCandidate {
    /// Moves offsets from section-relative to document-relative.
    pub fn shifted(mut self, by: usize) -> Self {
        self.start_offset += by;
        self.end_offset += by;
        self
    }

    pub fn validate(&self, config: &ExtractorConfig) -> Result<(), ExtractError> {
        if self.normalized_name.trim().is_empty() {
            return Err(ExtractError::Validation(format!(
                "empty normalized name for '{}'",
                self.raw_text
            )));
        }
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(ExtractError::Validation(format!(
                "confidence {} out of range for '{}'",
                self.confidence, self.normalized_name
            )));
        }
        if !config.is_known_category(&self.category) {
            return Err(ExtractError::Validation(format!(
                "unknown category '{}' for '{}'",
                self.category, self.normalized_name
            )));
        }
        if self.start_offset > self.end_offset {
            return Err(ExtractError::Validation(format!(
                "inverted span {}..{} for '{}'",
                self.start_offset, self.end_offset, self.normalized_name
            )));
        }
        if self.context_snippet.chars().count() > config.max_snippet_chars {
            return Err(ExtractError::Validation(format!(
                "context snippet over {} chars for '{}'",
                config.max_snippet_chars, self.normalized_name
            )));
        }
        Ok(())
    }
}

/// Fields shared by every candidate a strategy builds.
pub(crate) struct CandidateSpec<'a> {
    pub raw_text: &'a str,
    pub start: usize,
    pub end: usize,
    pub normalized_name: String,
    pub category: String,
    pub method: ExtractionMethod,
    pub confidence: f32,
}

pub(crate) fn build_candidate(
    config: &ExtractorConfig,
    text: &str,
    source_field: &str,
    spec: CandidateSpec<'_>,
) -> SkillCandidate {
    SkillCandidate {
        raw_text: spec.raw_text.to_string(),
        normalized_name: spec.normalized_name,
        category: spec.category,
        method: spec.method,
        confidence: spec.confidence.clamp(0.0, 1.0),
        context_snippet: context_snippet(
            text,
            spec.start,
            spec.end,
            config.context_window,
            config.max_snippet_chars,
        ),
        start_offset: spec.start,
        end_offset: spec.end,
        source_field: source_field.to_string(),
    }
}

/// Category for a name the lexicon doesn't know.
pub(crate) fn fallback_category(config: &ExtractorConfig, preferred: &str) -> String {
    if config.is_known_category(preferred) {
        preferred.to_string()
    } else {
        crate::config::FALLBACK_CATEGORY.to_string()
    }
}

/// One extraction strategy. Implementations must not panic on any input;
/// the pipeline still catches panics and records them as failures.
pub trait SkillStrategy: Send + Sync {
    fn method(&self) -> ExtractionMethod;

    fn extract(
        &self,
        analysed: &TokenizedText,
        raw_text: &str,
        source_field: &str,
    ) -> Result<Vec<SkillCandidate>, ExtractError>;
}
