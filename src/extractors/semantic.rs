// src/extractors/semantic.rs
use std::collections::BTreeSet;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use super::{build_candidate, CandidateSpec, ExtractionMethod, SkillCandidate, SkillStrategy};
use crate::config::{ExtractorConfig, LexiconEntry};
use crate::filters::SkillFilter;
use crate::nlp::{cosine, EmbeddingBackend, EntityLabel, TokenizedText};
use crate::utils::error::ExtractError;

struct LexiconIndex {
    entries: Vec<LexiconEntry>,
    vectors: Vec<Vec<f32>>,
}

/// Maps entity and noun-chunk phrases onto the nearest lexicon term.
pub struct SemanticExtractor {
    config: Arc<ExtractorConfig>,
    filter: Arc<SkillFilter>,
    embedder: Arc<dyn EmbeddingBackend>,
    // built on first use, shared by every call afterwards
    index: OnceCell<LexiconIndex>,
}

impl SemanticExtractor {
    pub fn new(
        config: Arc<ExtractorConfig>,
        filter: Arc<SkillFilter>,
        embedder: Arc<dyn EmbeddingBackend>,
    ) -> Self {
        Self {
            config,
            filter,
            embedder,
            index: OnceCell::new(),
        }
    }

    fn index(&self) -> Result<&LexiconIndex, ExtractError> {
        self.index.get_or_try_init(|| {
            let entries: Vec<LexiconEntry> = self
                .config
                .lexicon
                .terms()
                .map(|(category, term)| LexiconEntry {
                    canonical: term.to_string(),
                    category: category.to_string(),
                })
                .collect();
            let names: Vec<String> = entries.iter().map(|e| e.canonical.clone()).collect();
            let vectors = self.embedder.embed_batch(&names)?;
            if vectors.len() != entries.len() {
                return Err(ExtractError::Embedding(format!(
                    "backend returned {} vectors for {} terms",
                    vectors.len(),
                    entries.len()
                )));
            }
            debug!("Embedded {} lexicon terms with '{}'", entries.len(), self.embedder.name());
            Ok(LexiconIndex { entries, vectors })
        })
    }

    /// Phrases worth embedding: filtered entities and chunks the lexicon
    /// doesn't already name exactly.
    fn phrases<'a>(&self, analysed: &'a TokenizedText) -> Vec<(usize, usize, &'a str)> {
        let entities = analysed
            .entities
            .iter()
            .filter(|e| matches!(e.label, EntityLabel::Product | EntityLabel::Org))
            .map(|e| (e.start, e.end, e.text.as_str()));
        let chunks = analysed
            .noun_chunks
            .iter()
            .map(|c| (c.start, c.end, c.text.as_str()));

        let mut seen = BTreeSet::new();
        entities
            .chain(chunks)
            .filter(|(start, end, text)| {
                seen.insert((*start, *end))
                    && text.chars().count() >= 3
                    && self.config.lexicon.lookup(text).is_none()
                    && self.filter.is_likely_skill(text)
            })
            .collect()
    }
}

impl SkillStrategy for SemanticExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Semantic
    }

    fn extract(
        &self,
        analysed: &TokenizedText,
        raw_text: &str,
        source_field: &str,
    ) -> Result<Vec<SkillCandidate>, ExtractError> {
        let phrases = self.phrases(analysed);
        if phrases.is_empty() {
            return Ok(Vec::new());
        }
        let index = self.index()?;
        let texts: Vec<String> = phrases.iter().map(|(_, _, t)| t.to_string()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;

        let threshold = self.config.semantic_similarity_threshold;
        let weight = self.config.method_weights.semantic;
        let mut candidates = Vec::new();
        for ((start, end, text), vector) in phrases.into_iter().zip(vectors.iter()) {
            if end > raw_text.len() {
                return Err(ExtractError::strategy(
                    ExtractionMethod::Semantic,
                    format!("phrase '{text}' lies outside the analysed text"),
                ));
            }
            // strict > keeps the first of equally similar terms
            let mut best: Option<(usize, f32)> = None;
            for (i, term_vector) in index.vectors.iter().enumerate() {
                let similarity = cosine(vector, term_vector);
                if best.map_or(true, |(_, s)| similarity > s) {
                    best = Some((i, similarity));
                }
            }
            let Some((i, similarity)) = best else {
                continue;
            };
            if similarity < threshold {
                trace!("'{}' best similarity {:.3} below threshold", text, similarity);
                continue;
            }
            let entry = &index.entries[i];
            trace!("'{}' ~ '{}' ({:.3})", text, entry.canonical, similarity);
            candidates.push(build_candidate(
                &self.config,
                raw_text,
                source_field,
                CandidateSpec {
                    raw_text: &raw_text[start..end],
                    start,
                    end,
                    normalized_name: entry.canonical.clone(),
                    category: entry.category.clone(),
                    method: ExtractionMethod::Semantic,
                    confidence: weight * similarity,
                },
            ));
        }
        trace!("Semantic matching produced {} candidates in {}", candidates.len(), source_field);
        Ok(candidates)
    }
}
