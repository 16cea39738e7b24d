// src/pipeline/mod.rs
//! The engine: markup stripping, sectioning, strategies, scoring, dedup and
//! capping behind a single `extract_skills` call.

pub mod result;

use std::collections::{BTreeMap, BTreeSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::config::{Capabilities, ExtractorConfig};
use crate::dedup::{CategoryLimiter, Deduplicator};
use crate::extractors::{
    ExtractionMethod, LexiconMatcher, NerExtractor, NounChunkExtractor, PatternExtractor,
    SemanticExtractor, SkillCandidate, SkillStrategy,
};
use crate::filters::{SectionFilter, SkillFilter};
use crate::nlp::{LanguageModel, NlpResources, TokenizedText};
use crate::scoring::{CandidateContext, ConfidenceScorer, ScoringModel};
use crate::sections::{SectionClassifier, SectionRecord};
use crate::storage::SkillStore;
use crate::text::{dedup_key, repair_concatenations, strip_markup};
use crate::utils::error::{ConfigError, ExtractError};
use crate::utils::AppError;

pub use result::{ExtractedSkill, ExtractionResult, Mode, RunMetadata};

pub const SUMMARY_FIELD: &str = "job_summary";
pub const DESCRIPTION_FIELD: &str = "job_description";

// The summary is short and always about the role.
const SUMMARY_SECTION_PROBABILITY: f32 = 0.8;

/// A candidate plus where it came from, kept until scoring.
struct Mention {
    candidate: SkillCandidate,
    section_probability: f32,
}

/// Per-call bookkeeping.
#[derive(Default)]
struct RunState {
    failed: BTreeSet<ExtractionMethod>,
    total_candidates: usize,
}

/// Extracts skills from job postings. Build once, share behind an `Arc`;
/// every call is independent.
pub struct SkillExtractor {
    config: Arc<ExtractorConfig>,
    mode: Mode,
    capabilities: Capabilities,
    model: Option<Arc<dyn LanguageModel>>,
    strategies: Vec<Box<dyn SkillStrategy>>,
    disabled: Vec<ExtractionMethod>,
    classifier: SectionClassifier,
    section_filter: SectionFilter,
    skill_filter: Arc<SkillFilter>,
    scorer: ConfidenceScorer,
    deduplicator: Deduplicator,
    limiter: CategoryLimiter,
}

impl SkillExtractor {
    /// Validates `config`, resolves the mode once and builds the strategies
    /// the mode and capabilities allow.
    pub fn new(config: ExtractorConfig, resources: Arc<NlpResources>) -> Result<Self, ConfigError> {
        config.validate()?;
        let config = Arc::new(config);
        let capabilities = resources.capabilities();
        let mode = resolve_mode(&config, &capabilities);
        let model = load_model(&resources);
        let skill_filter = Arc::new(SkillFilter::new(&config));

        let mut strategies: Vec<Box<dyn SkillStrategy>> = Vec::new();
        for method in ExtractionMethod::ALL {
            if !strategy_available(method, &config, mode, &capabilities, model.is_some()) {
                continue;
            }
            let strategy: Box<dyn SkillStrategy> = match method {
                ExtractionMethod::Lexicon => Box::new(LexiconMatcher::new(Arc::clone(&config))),
                ExtractionMethod::Ner => {
                    Box::new(NerExtractor::new(Arc::clone(&config), Arc::clone(&skill_filter)))
                }
                ExtractionMethod::NounChunk => Box::new(NounChunkExtractor::new(
                    Arc::clone(&config),
                    Arc::clone(&skill_filter),
                )),
                ExtractionMethod::Pattern => {
                    Box::new(PatternExtractor::new(Arc::clone(&config), Arc::clone(&skill_filter)))
                }
                ExtractionMethod::Semantic => match resources.embedder() {
                    Some(embedder) => Box::new(SemanticExtractor::new(
                        Arc::clone(&config),
                        Arc::clone(&skill_filter),
                        embedder,
                    )),
                    None => continue,
                },
            };
            strategies.push(strategy);
        }

        Ok(Self::assemble(config, mode, capabilities, model, strategies, skill_filter))
    }

    /// Engine with caller-supplied strategies, for custom or mock strategies.
    /// Mode and scoring are resolved exactly as in [`SkillExtractor::new`].
    pub fn with_strategies(
        config: ExtractorConfig,
        resources: Arc<NlpResources>,
        strategies: Vec<Box<dyn SkillStrategy>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let config = Arc::new(config);
        let capabilities = resources.capabilities();
        let mode = resolve_mode(&config, &capabilities);
        let model = load_model(&resources);
        let skill_filter = Arc::new(SkillFilter::new(&config));
        Ok(Self::assemble(config, mode, capabilities, model, strategies, skill_filter))
    }

    fn assemble(
        config: Arc<ExtractorConfig>,
        mode: Mode,
        capabilities: Capabilities,
        model: Option<Arc<dyn LanguageModel>>,
        strategies: Vec<Box<dyn SkillStrategy>>,
        skill_filter: Arc<SkillFilter>,
    ) -> Self {
        let active: BTreeSet<ExtractionMethod> = strategies.iter().map(|s| s.method()).collect();
        let disabled: Vec<ExtractionMethod> = ExtractionMethod::ALL
            .into_iter()
            .filter(|m| !active.contains(m))
            .collect();
        let scoring = match mode {
            Mode::Enhanced => ScoringModel::Ensemble,
            Mode::Baseline => ScoringModel::Baseline,
        };
        info!(
            "Skill extractor ready: mode={}, strategies=[{}], disabled=[{}]",
            mode.as_str(),
            join_methods(active.iter().copied()),
            join_methods(disabled.iter().copied())
        );
        Self {
            classifier: SectionClassifier::new(&config),
            section_filter: SectionFilter::new(&config),
            scorer: ConfidenceScorer::new(scoring, Arc::clone(&config)),
            deduplicator: Deduplicator::new(config.max_snippet_chars),
            limiter: CategoryLimiter::new(config.max_skills_per_category, config.overflow_threshold),
            config,
            mode,
            capabilities,
            model,
            strategies,
            disabled,
            skill_filter,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Methods that will run on every call, in execution order.
    pub fn active_strategies(&self) -> Vec<ExtractionMethod> {
        self.strategies.iter().map(|s| s.method()).collect()
    }

    /// The plain text offsets of description skills refer to.
    pub fn prepare_text(&self, raw: &str) -> String {
        repair_concatenations(&strip_markup(raw))
    }

    /// Runs the whole pipeline over one posting. `job_description` may
    /// contain HTML. Never fails: strategy errors are recorded in the
    /// metadata instead.
    pub fn extract_skills(&self, job_summary: &str, job_description: &str) -> ExtractionResult {
        let mut state = RunState::default();
        let mut mentions: Vec<Mention> = Vec::new();
        let mut field_lengths: BTreeMap<&'static str, usize> = BTreeMap::new();

        // --- Summary: mined whole, no sectioning ---
        let summary = self.prepare_text(job_summary);
        field_lengths.insert(SUMMARY_FIELD, summary.len());
        if !summary.trim().is_empty() {
            for candidate in self.run_strategies(&summary, SUMMARY_FIELD, &mut state) {
                mentions.push(Mention {
                    candidate,
                    section_probability: SUMMARY_SECTION_PROBABILITY,
                });
            }
        }

        // --- Description: sections, filtered ---
        let description = self.prepare_text(job_description);
        field_lengths.insert(DESCRIPTION_FIELD, description.len());
        let sections = self.classifier.classify(&description);
        let selected: Vec<SectionRecord> = if description.trim().is_empty() {
            Vec::new()
        } else {
            self.section_filter.filter(&sections, &description)
        };
        debug!(
            "Using {} of {} sections: {:?}",
            selected.len(),
            sections.len(),
            selected.iter().map(|s| s.header.as_deref().unwrap_or("-")).collect::<Vec<_>>()
        );
        for section in &selected {
            if section.text.trim().is_empty() {
                continue;
            }
            for candidate in self.run_strategies(&section.text, DESCRIPTION_FIELD, &mut state) {
                mentions.push(Mention {
                    candidate: candidate.shifted(section.start_offset),
                    section_probability: section.relevance_probability,
                });
            }
        }

        let skills = self.finish(mentions, &field_lengths, &state);
        let failed: Vec<ExtractionMethod> = state.failed.iter().copied().collect();
        let result = ExtractionResult {
            metadata: RunMetadata {
                mode: self.mode,
                strategies_run: self.active_strategies(),
                strategies_failed: failed,
                strategies_disabled: self.disabled.clone(),
                confidence_threshold: self.config.confidence_threshold,
                total_candidates: state.total_candidates,
                final_count: skills.len(),
                sections_total: sections.len(),
                sections_used: selected.len(),
            },
            skills,
        };

        if let Some(violation) = result
            .contract_violation(self.config.max_skills_per_category, self.config.overflow_threshold)
        {
            panic!("Extraction result broke its guarantees: {violation}");
        }
        info!(
            "Extracted {} skills from {} candidates ({} failed strategies)",
            result.metadata.final_count,
            result.metadata.total_candidates,
            result.metadata.strategies_failed.len()
        );
        result
    }

    /// Extracts and hands the skills to `store`. Storage errors are returned
    /// as-is and never retried.
    pub fn extract_and_store(
        &self,
        job_posting_id: &str,
        enrichment_id: &str,
        job_summary: &str,
        job_description: &str,
        store: &dyn SkillStore,
    ) -> Result<ExtractionResult, AppError> {
        let result = self.extract_skills(job_summary, job_description);
        store.store_skills(job_posting_id, enrichment_id, &result.skills)?;
        Ok(result)
    }

    fn analyze(&self, text: &str, state: &mut RunState) -> Option<TokenizedText> {
        let model = self.model.as_ref()?;
        let outcome = catch_unwind(AssertUnwindSafe(|| model.analyze(text)));
        let error = match outcome {
            Ok(Ok(analysed)) => return Some(analysed),
            Ok(Err(e)) => e,
            Err(panic) => ExtractError::Model(panic_message(panic.as_ref())),
        };
        warn!("Language model '{}' failed: {}", model.name(), error);
        for strategy in &self.strategies {
            if strategy.method().needs_language_model() {
                state.failed.insert(strategy.method());
            }
        }
        None
    }

    fn run_strategies(&self, text: &str, field: &str, state: &mut RunState) -> Vec<SkillCandidate> {
        let needs_model = self.strategies.iter().any(|s| s.method().needs_language_model());
        let analysed = if needs_model { self.analyze(text, state) } else { None };
        let empty = TokenizedText::default();

        let mut found = Vec::new();
        for strategy in &self.strategies {
            let method = strategy.method();
            let tokens = match (&analysed, method.needs_language_model()) {
                (Some(analysed), _) => analysed,
                (None, false) => &empty,
                // analysis failed, already recorded
                (None, true) => continue,
            };
            let outcome = catch_unwind(AssertUnwindSafe(|| strategy.extract(tokens, text, field)));
            match outcome {
                Ok(Ok(candidates)) => {
                    debug!("{} found {} candidates in {}", method, candidates.len(), field);
                    found.extend(candidates);
                }
                Ok(Err(e)) => {
                    warn!("Strategy {} failed on {}: {}", method, field, e);
                    state.failed.insert(method);
                }
                Err(panic) => {
                    warn!(
                        "Strategy {} panicked on {}: {}",
                        method,
                        field,
                        panic_message(panic.as_ref())
                    );
                    state.failed.insert(method);
                }
            }
        }
        state.total_candidates += found.len();
        found
    }

    /// validate -> noise filter -> score -> threshold -> dedup -> cap -> sort
    fn finish(
        &self,
        mentions: Vec<Mention>,
        field_lengths: &BTreeMap<&'static str, usize>,
        state: &RunState,
    ) -> Vec<ExtractedSkill> {
        let valid: Vec<Mention> = mentions
            .into_iter()
            .filter(|m| match m.candidate.validate(&self.config) {
                Ok(()) => true,
                Err(e) => {
                    debug!("Dropping invalid candidate: {}", e);
                    false
                }
            })
            .filter(|m| {
                let noisy = self.skill_filter.is_noise(&m.candidate.normalized_name)
                    || self.skill_filter.is_noise(&m.candidate.raw_text);
                if noisy {
                    trace!("Dropping noise '{}'", m.candidate.raw_text);
                }
                !noisy
            })
            .collect();

        // distinct mention positions per skill
        let mut positions: BTreeMap<String, BTreeSet<(String, usize)>> = BTreeMap::new();
        for m in &valid {
            positions
                .entry(dedup_key(&m.candidate.normalized_name))
                .or_default()
                .insert((m.candidate.source_field.clone(), m.candidate.start_offset));
        }

        let threshold = self.config.confidence_threshold;
        let mut scored: Vec<SkillCandidate> = Vec::with_capacity(valid.len());
        for m in valid {
            let key = dedup_key(&m.candidate.normalized_name);
            let ctx = CandidateContext {
                frequency: positions.get(&key).map_or(1, BTreeSet::len),
                section_probability: m.section_probability,
                field_length: field_lengths
                    .get(m.candidate.source_field.as_str())
                    .copied()
                    .unwrap_or(0),
            };
            let score = self.scorer.score(&m.candidate, &ctx);
            if score < threshold {
                trace!("'{}' scored {:.3}, below threshold", m.candidate.normalized_name, score);
                continue;
            }
            let mut candidate = m.candidate;
            candidate.confidence = score;
            scored.push(candidate);
        }
        debug!(
            "{} of {} candidates passed the {:.2} threshold",
            scored.len(),
            state.total_candidates,
            threshold
        );

        let deduped = self.deduplicator.deduplicate(scored);
        let mut skills = self.limiter.limit(deduped);
        skills.sort_by(|a, b| {
            b.confidence_score
                .total_cmp(&a.confidence_score)
                .then_with(|| a.skill_name.cmp(&b.skill_name))
        });
        skills
    }
}

fn resolve_mode(config: &ExtractorConfig, capabilities: &Capabilities) -> Mode {
    if config.prefer_enhanced && capabilities.patterns_available {
        Mode::Enhanced
    } else {
        if config.prefer_enhanced {
            warn!("Enhanced mode requested but pattern tables are unavailable, using baseline");
        }
        Mode::Baseline
    }
}

fn load_model(resources: &NlpResources) -> Option<Arc<dyn LanguageModel>> {
    match resources.model() {
        Ok(model) => Some(model),
        Err(e) => {
            warn!("Running without a language model: {}", e);
            None
        }
    }
}

/// Pure function of config, mode and capabilities.
fn strategy_available(
    method: ExtractionMethod,
    config: &ExtractorConfig,
    mode: Mode,
    capabilities: &Capabilities,
    model_loaded: bool,
) -> bool {
    if !config.enabled_strategies.is_enabled(method) {
        return false;
    }
    match method {
        ExtractionMethod::Lexicon => true,
        ExtractionMethod::Ner | ExtractionMethod::NounChunk => model_loaded,
        ExtractionMethod::Pattern => mode == Mode::Enhanced && capabilities.patterns_available,
        ExtractionMethod::Semantic => {
            mode == Mode::Enhanced && capabilities.semantic_available && model_loaded
        }
    }
}

fn join_methods(methods: impl Iterator<Item = ExtractionMethod>) -> String {
    methods.map(|m| m.as_str()).collect::<Vec<_>>().join(", ")
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(semantic: bool, patterns: bool) -> Capabilities {
        Capabilities {
            semantic_available: semantic,
            patterns_available: patterns,
        }
    }

    #[test]
    fn mode_needs_patterns() {
        let config = ExtractorConfig::enhanced();
        assert_eq!(resolve_mode(&config, &caps(false, true)), Mode::Enhanced);
        assert_eq!(resolve_mode(&config, &caps(true, false)), Mode::Baseline);
        assert_eq!(resolve_mode(&ExtractorConfig::baseline(), &caps(true, true)), Mode::Baseline);
    }

    #[test]
    fn availability_is_a_function_of_inputs() {
        let config = ExtractorConfig::enhanced();
        let all = caps(true, true);
        assert!(strategy_available(ExtractionMethod::Semantic, &config, Mode::Enhanced, &all, true));
        assert!(!strategy_available(ExtractionMethod::Semantic, &config, Mode::Baseline, &all, true));
        assert!(!strategy_available(ExtractionMethod::Semantic, &config, Mode::Enhanced, &caps(false, true), true));
        assert!(!strategy_available(ExtractionMethod::Ner, &config, Mode::Enhanced, &all, false));
        assert!(strategy_available(ExtractionMethod::Lexicon, &config, Mode::Enhanced, &all, false));

        let config = config.with_strategy(ExtractionMethod::Pattern, false);
        assert!(!strategy_available(ExtractionMethod::Pattern, &config, Mode::Enhanced, &all, true));
    }

    #[test]
    fn baseline_engine_skips_enhanced_strategies() {
        let config = ExtractorConfig::baseline();
        let resources = Arc::new(NlpResources::builtin(&config.lexicon));
        let engine = SkillExtractor::new(config, resources).unwrap();
        assert_eq!(engine.mode(), Mode::Baseline);
        assert_eq!(
            engine.active_strategies(),
            vec![ExtractionMethod::Lexicon, ExtractionMethod::Ner, ExtractionMethod::NounChunk]
        );
    }

    #[test]
    fn invalid_config_is_fatal() {
        let config = ExtractorConfig::enhanced().with_confidence_threshold(-0.1);
        let resources = Arc::new(NlpResources::builtin(&config.lexicon));
        assert!(matches!(
            SkillExtractor::new(config, resources),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn panic_messages_are_recovered() {
        let caught = catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "boom 1");
    }
}
