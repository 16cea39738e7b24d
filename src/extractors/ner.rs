// src/extractors/ner.rs
use std::sync::Arc;

use tracing::trace;

use super::{build_candidate, fallback_category, CandidateSpec, ExtractionMethod, SkillCandidate, SkillStrategy};
use crate::config::{ExtractorConfig, FALLBACK_CATEGORY};
use crate::filters::SkillFilter;
use crate::nlp::{EntityLabel, EntitySpan, TokenizedText};
use crate::text::normalize_skill_name;
use crate::utils::error::ExtractError;

/// Turns PRODUCT/ORG/GPE entities from the language model into candidates.
pub struct NerExtractor {
    config: Arc<ExtractorConfig>,
    filter: Arc<SkillFilter>,
}

impl NerExtractor {
    pub fn new(config: Arc<ExtractorConfig>, filter: Arc<SkillFilter>) -> Self {
        Self { config, filter }
    }

    fn accepts(&self, entity: &EntitySpan, analysed: &TokenizedText, known: bool) -> bool {
        match entity.label {
            EntityLabel::Product => true,
            // organisations and places only when they name a tool
            EntityLabel::Org | EntityLabel::Gpe => {
                known
                    || analysed.tokens[entity.token_start..entity.token_end]
                        .iter()
                        .any(|t| t.is_technical())
            }
            EntityLabel::Misc => false,
        }
    }
}

impl SkillStrategy for NerExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Ner
    }

    fn extract(
        &self,
        analysed: &TokenizedText,
        raw_text: &str,
        source_field: &str,
    ) -> Result<Vec<SkillCandidate>, ExtractError> {
        let mut candidates = Vec::new();
        for entity in &analysed.entities {
            if entity.end > raw_text.len() || entity.token_end > analysed.tokens.len() {
                return Err(ExtractError::strategy(
                    ExtractionMethod::Ner,
                    format!("entity '{}' lies outside the analysed text", entity.text),
                ));
            }
            if !self.filter.is_likely_skill(&entity.text) {
                continue;
            }
            let entry = self.config.lexicon.lookup(&entity.text);
            if !self.accepts(entity, analysed, entry.is_some()) {
                trace!("Skipping {} entity '{}'", entity.label.as_str(), entity.text);
                continue;
            }
            let (name, category) = match entry {
                Some(entry) => (entry.canonical.clone(), entry.category.clone()),
                None => (
                    normalize_skill_name(&entity.text),
                    fallback_category(&self.config, FALLBACK_CATEGORY),
                ),
            };
            if name.is_empty() {
                continue;
            }
            candidates.push(build_candidate(
                &self.config,
                raw_text,
                source_field,
                CandidateSpec {
                    raw_text: &raw_text[entity.start..entity.end],
                    start: entity.start,
                    end: entity.end,
                    normalized_name: name,
                    category,
                    method: ExtractionMethod::Ner,
                    confidence: self.config.method_weights.ner,
                },
            ));
        }
        trace!("NER produced {} candidates in {}", candidates.len(), source_field);
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
        NerExtractor::new(config, filter)
            .extract(&analysed, text, "job_description")
            .unwrap()
    }

    #[test]
    fn emits_products_with_lexicon_names() {
        let found = run("Our stack runs on K8s with gRPC and Terraform.");
        let names: Vec<&str> = found.iter().map(|c| c.normalized_name.as_str()).collect();
        assert_eq!(names, vec!["Kubernetes", "gRPC", "Terraform"]);
        assert!(found.iter().all(|c| (c.confidence - 0.65).abs() < f32::EPSILON));
    }

    #[test]
    fn unknown_technical_names_fall_back_to_other() {
        let found = run("We built FooDB internally.");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].normalized_name, "FooDB");
        assert_eq!(found[0].category, "other");
    }

    #[test]
    fn rejects_places_titles_and_companies() {
        assert!(run("Senior Python Developer in New York, CA.").is_empty());
        assert!(run("Join Acme Labs today.").is_empty());
    }

    #[test]
    fn entity_outside_text_is_a_strategy_failure() {
        let config = Arc::new(ExtractorConfig::enhanced());
        let filter = Arc::new(SkillFilter::new(&config));
        let analysed = TokenizedText {
            entities: vec![EntitySpan {
                text: "Rust".into(),
                label: EntityLabel::Product,
                start: 40,
                end: 44,
                token_start: 0,
                token_end: 0,
            }],
            ..TokenizedText::default()
        };
        let result = NerExtractor::new(config, filter).extract(&analysed, "short", "job_description");
        assert!(matches!(result, Err(ExtractError::StrategyFailure { .. })));
    }
}
