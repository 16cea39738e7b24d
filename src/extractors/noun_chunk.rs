// src/extractors/noun_chunk.rs
use std::sync::Arc;

use tracing::trace;

use super::{build_candidate, fallback_category, CandidateSpec, ExtractionMethod, SkillCandidate, SkillStrategy};
use crate::config::{ExtractorConfig, FALLBACK_CATEGORY};
use crate::filters::SkillFilter;
use crate::nlp::tokenizer::KNOWN_VERBS;
use crate::nlp::{PosTag, Token, TokenizedText};
use crate::text::normalize_skill_name;
use crate::utils::error::ExtractError;

const MIN_WORDS: usize = 2;
const MAX_WORDS: usize = 4;

/// Nouns that make a phrase skill-like on their own.
const SKILL_NOUNS: &[&str] = &[
    "management", "analysis", "analytics", "design", "development", "engineering", "testing",
    "modeling", "modelling", "architecture", "communication", "leadership", "planning",
    "programming", "automation", "optimization", "security", "support", "writing", "research",
    "strategy", "operation", "administration", "integration", "deployment", "visualization",
    "reporting", "budgeting", "negotiation", "marketing", "sales", "accounting", "training",
    "mentoring", "pipeline", "infrastructure", "learning", "processing", "monitoring",
    "troubleshooting", "governance", "compliance", "forecasting", "scripting", "debugging",
];

// lemma -> category, checked from the phrase head backwards
const LEMMA_CATEGORIES: &[(&str, &str)] = &[
    ("manage", "managing_directing"),
    ("management", "managing_directing"),
    ("lead", "managing_directing"),
    ("leadership", "managing_directing"),
    ("direct", "managing_directing"),
    ("supervise", "managing_directing"),
    ("oversee", "managing_directing"),
    ("governance", "managing_directing"),
    ("analyze", "researching_analysing"),
    ("analyse", "researching_analysing"),
    ("analysis", "researching_analysing"),
    ("analytics", "researching_analysing"),
    ("research", "researching_analysing"),
    ("evaluate", "researching_analysing"),
    ("model", "researching_analysing"),
    ("modeling", "researching_analysing"),
    ("forecasting", "researching_analysing"),
    ("statistics", "researching_analysing"),
    ("communicate", "communicating_collaborating"),
    ("communication", "communicating_collaborating"),
    ("present", "communicating_collaborating"),
    ("presentation", "communicating_collaborating"),
    ("write", "communicating_collaborating"),
    ("writing", "communicating_collaborating"),
    ("negotiate", "communicating_collaborating"),
    ("negotiation", "communicating_collaborating"),
    ("collaborate", "communicating_collaborating"),
    ("collaboration", "communicating_collaborating"),
    ("develop", "working_with_computers"),
    ("development", "working_with_computers"),
    ("build", "working_with_computers"),
    ("program", "working_with_computers"),
    ("programming", "working_with_computers"),
    ("code", "working_with_computers"),
    ("engineer", "working_with_computers"),
    ("engineering", "working_with_computers"),
    ("deploy", "working_with_computers"),
    ("deployment", "working_with_computers"),
    ("automate", "working_with_computers"),
    ("automation", "working_with_computers"),
    ("test", "working_with_computers"),
    ("testing", "working_with_computers"),
    ("debug", "working_with_computers"),
    ("debugging", "working_with_computers"),
    ("architecture", "working_with_computers"),
    ("integration", "working_with_computers"),
    ("infrastructure", "working_with_computers"),
    ("pipeline", "working_with_computers"),
    ("processing", "working_with_computers"),
    ("monitoring", "working_with_computers"),
    ("security", "working_with_computers"),
    ("scripting", "working_with_computers"),
    ("software", "working_with_computers"),
    ("data", "working_with_computers"),
    ("plan", "organising_planning"),
    ("planning", "organising_planning"),
    ("organize", "organising_planning"),
    ("schedule", "organising_planning"),
    ("coordinate", "organising_planning"),
    ("prioritize", "organising_planning"),
    ("teach", "teaching_training"),
    ("train", "teaching_training"),
    ("training", "teaching_training"),
    ("mentor", "teaching_training"),
    ("mentoring", "teaching_training"),
    ("coach", "teaching_training"),
    ("support", "assisting_caring"),
    ("assist", "assisting_caring"),
    ("help", "assisting_caring"),
    ("care", "assisting_caring"),
    ("design", "creative_design"),
    ("draw", "creative_design"),
    ("illustrate", "creative_design"),
    ("edit", "creative_design"),
    ("produce", "creative_design"),
    ("sell", "sales_marketing"),
    ("sales", "sales_marketing"),
    ("market", "sales_marketing"),
    ("marketing", "sales_marketing"),
    ("promote", "sales_marketing"),
    ("budget", "finance_accounting"),
    ("budgeting", "finance_accounting"),
    ("forecast", "finance_accounting"),
    ("audit", "finance_accounting"),
    ("accounting", "finance_accounting"),
    ("finance", "finance_accounting"),
    ("compliance", "finance_accounting"),
];

/// Multi-word noun phrases that look like skills.
pub struct NounChunkExtractor {
    config: Arc<ExtractorConfig>,
    filter: Arc<SkillFilter>,
}

impl NounChunkExtractor {
    pub fn new(config: Arc<ExtractorConfig>, filter: Arc<SkillFilter>) -> Self {
        Self { config, filter }
    }

    fn is_skill_like(&self, tokens: &[Token]) -> bool {
        tokens.iter().any(|t| {
            t.pos.is_verbal()
                || KNOWN_VERBS.contains(&t.lemma.as_str())
                || SKILL_NOUNS.contains(&t.lemma.as_str())
                || SKILL_NOUNS.contains(&t.lower.as_str())
                || t.is_technical()
                || self.config.lexicon.lookup(&t.text).is_some()
        })
    }

    fn category_for(&self, tokens: &[Token]) -> String {
        let from_lemmas = tokens.iter().rev().find_map(|t| {
            LEMMA_CATEGORIES
                .iter()
                .find(|(lemma, _)| *lemma == t.lemma || *lemma == t.lower)
                .map(|(_, category)| *category)
        });
        match from_lemmas {
            Some(category) => fallback_category(&self.config, category),
            None => {
                // a phrase around a known tool inherits its category
                let from_lexicon = tokens
                    .iter()
                    .rev()
                    .find_map(|t| self.config.lexicon.lookup(&t.text))
                    .map(|entry| entry.category.clone());
                from_lexicon.unwrap_or_else(|| fallback_category(&self.config, FALLBACK_CATEGORY))
            }
        }
    }
}

impl SkillStrategy for NounChunkExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::NounChunk
    }

    fn extract(
        &self,
        analysed: &TokenizedText,
        raw_text: &str,
        source_field: &str,
    ) -> Result<Vec<SkillCandidate>, ExtractError> {
        let mut candidates = Vec::new();
        for chunk in &analysed.noun_chunks {
            if chunk.end > raw_text.len() || chunk.token_end > analysed.tokens.len() {
                return Err(ExtractError::strategy(
                    ExtractionMethod::NounChunk,
                    format!("chunk '{}' lies outside the analysed text", chunk.text),
                ));
            }
            let tokens = chunk.tokens(analysed);
            if !(MIN_WORDS..=MAX_WORDS).contains(&tokens.len()) {
                continue;
            }
            if !self.is_skill_like(tokens) || !self.filter.is_likely_skill(&chunk.text) {
                trace!("Chunk '{}' is not skill-like", chunk.text);
                continue;
            }
            let (name, category) = match self.config.lexicon.lookup(&chunk.text) {
                Some(entry) => (entry.canonical.clone(), entry.category.clone()),
                None => (normalize_skill_name(&chunk.text), self.category_for(tokens)),
            };
            if name.is_empty() || tokens.iter().all(|t| t.pos == PosTag::Adjective) {
                continue;
            }
            candidates.push(build_candidate(
                &self.config,
                raw_text,
                source_field,
                CandidateSpec {
                    raw_text: &raw_text[chunk.start..chunk.end],
                    start: chunk.start,
                    end: chunk.end,
                    normalized_name: name,
                    category,
                    method: ExtractionMethod::NounChunk,
                    confidence: self.config.method_weights.noun_chunk,
                },
            ));
        }
        trace!("Noun chunks produced {} candidates in {}", candidates.len(), source_field);
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{LanguageModel, RuleBasedModel};

    fn run(text: &str) -> Vec<SkillCandidate> {
        let config = Arc::new(ExtractorConfig::enhanced());
        let filter = Arc::new(SkillFilter::new(&config));
        let model = RuleBasedModel::from_lexicon(&config.lexicon);
        let analysed = model.analyze(text).unwrap();
        NounChunkExtractor::new(config, filter)
            .extract(&analysed, text, "job_description")
            .unwrap()
    }

    #[test]
    fn categorises_by_head_lemma() {
        let found = run("You bring budget forecasting and stakeholder communication.");
        let pairs: Vec<(&str, &str)> = found
            .iter()
            .map(|c| (c.normalized_name.as_str(), c.category.as_str()))
            .collect();
        assert!(pairs.contains(&("budget forecasting", "researching_analysing")), "{pairs:?}");
        assert!(pairs.contains(&("stakeholder communication", "communicating_collaborating")), "{pairs:?}");
    }

    #[test]
    fn trims_qualifiers_and_uses_lexicon_names() {
        let found = run("We want strong project management.");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].normalized_name, "Project Management");
        assert_eq!(found[0].raw_text, "project management");
        assert!((found[0].confidence - 0.55).abs() < f32::EPSILON);
    }

    #[test]
    fn skips_non_skill_phrases() {
        assert!(run("We offer competitive salary and great culture.").is_empty());
        assert!(run("5+ years Python experience.").is_empty());
    }
}
