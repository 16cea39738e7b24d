// tests/degradation.rs
//! Failing resources, failing strategies, shared engines and storage.

use std::sync::Arc;
use std::thread;

use skill_extractor::config::ExtractorConfig;
use skill_extractor::extractors::{ExtractionMethod, LexiconMatcher, SkillCandidate, SkillStrategy};
use skill_extractor::nlp::{LanguageModel, NlpResources, RuleBasedModel, TokenizedText};
use skill_extractor::pipeline::{ExtractedSkill, Mode, SkillExtractor};
use skill_extractor::storage::{JsonFileStore, SkillStore};
use skill_extractor::utils::error::{ExtractError, StorageError};
use skill_extractor::AppError;

const POSTING: &str = "Requirements:\n- Experience with Python and Docker\n- Terraform is a plus";

struct PanickingModel;

impl LanguageModel for PanickingModel {
    fn name(&self) -> &str {
        "panicking"
    }

    fn analyze(&self, _text: &str) -> Result<TokenizedText, ExtractError> {
        panic!("tagger crashed");
    }
}

struct FailingStrategy;

impl SkillStrategy for FailingStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Pattern
    }

    fn extract(&self, _: &TokenizedText, _: &str, _: &str) -> Result<Vec<SkillCandidate>, ExtractError> {
        Err(ExtractError::strategy(ExtractionMethod::Pattern, "regex backend offline"))
    }
}

struct PanickingStrategy;

impl SkillStrategy for PanickingStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::NounChunk
    }

    fn extract(&self, _: &TokenizedText, _: &str, _: &str) -> Result<Vec<SkillCandidate>, ExtractError> {
        panic!("index out of bounds");
    }
}

struct RejectingStore;

impl SkillStore for RejectingStore {
    fn store_skills(&self, _: &str, _: &str, _: &[ExtractedSkill]) -> Result<(), StorageError> {
        Err(StorageError::InvalidKey("database unavailable".into()))
    }
}

fn names(skills: &[ExtractedSkill]) -> Vec<&str> {
    let mut names: Vec<&str> = skills.iter().map(|s| s.skill_name.as_str()).collect();
    names.sort_unstable();
    names
}

#[test]
fn panicking_model_only_fails_model_strategies() {
    let config = ExtractorConfig::enhanced();
    let resources = Arc::new(NlpResources::from_parts(Arc::new(PanickingModel), None));
    let extractor = SkillExtractor::new(config, resources).unwrap();
    assert_eq!(extractor.mode(), Mode::Enhanced);

    let result = extractor.extract_skills("", POSTING);
    assert_eq!(names(&result.skills), vec!["Docker", "Python", "Terraform"]);
    let meta = &result.metadata;
    assert!(meta.strategies_failed.contains(&ExtractionMethod::Ner));
    assert!(meta.strategies_failed.contains(&ExtractionMethod::NounChunk));
    assert!(!meta.strategies_failed.contains(&ExtractionMethod::Lexicon));
    // no embedder was supplied
    assert_eq!(meta.strategies_disabled, vec![ExtractionMethod::Semantic]);
}

#[test]
fn missing_model_disables_model_strategies() {
    let config = ExtractorConfig::enhanced();
    let resources = Arc::new(NlpResources::new(|| {
        Err(ExtractError::Model("model files not found".into()))
    }));
    let extractor = SkillExtractor::new(config, resources).unwrap();
    assert_eq!(
        extractor.active_strategies(),
        vec![ExtractionMethod::Lexicon, ExtractionMethod::Pattern]
    );

    let result = extractor.extract_skills("", POSTING);
    assert_eq!(names(&result.skills), vec!["Docker", "Python", "Terraform"]);
    assert!(result.metadata.strategies_failed.is_empty());
    assert_eq!(
        result.metadata.strategies_disabled,
        vec![ExtractionMethod::Ner, ExtractionMethod::NounChunk, ExtractionMethod::Semantic]
    );
}

#[test]
fn failed_embedder_disables_semantic_only() {
    let config = ExtractorConfig::enhanced();
    let resources = Arc::new(
        NlpResources::new(|| {
            let model: Arc<dyn LanguageModel> = Arc::new(RuleBasedModel::new());
            Ok(model)
        })
        .with_embedder_loader(|| Err(ExtractError::Embedding("no vectors on disk".into()))),
    );
    let extractor = SkillExtractor::new(config, resources).unwrap();
    assert_eq!(extractor.mode(), Mode::Enhanced);
    assert!(!extractor.capabilities().semantic_available);
    assert!(!extractor.active_strategies().contains(&ExtractionMethod::Semantic));
    assert!(extractor.active_strategies().contains(&ExtractionMethod::Pattern));
}

#[test]
fn strategy_errors_and_panics_are_recorded() {
    let config = ExtractorConfig::enhanced();
    let resources = Arc::new(NlpResources::builtin(&config.lexicon));
    let strategies: Vec<Box<dyn SkillStrategy>> = vec![
        Box::new(LexiconMatcher::new(Arc::new(config.clone()))),
        Box::new(FailingStrategy),
        Box::new(PanickingStrategy),
    ];
    let extractor = SkillExtractor::with_strategies(config, resources, strategies).unwrap();

    let result = extractor.extract_skills("Rust services", POSTING);
    assert!(result.find("Python").is_some());
    assert!(result.find("Rust").is_some());
    assert_eq!(
        result.metadata.strategies_failed,
        vec![ExtractionMethod::NounChunk, ExtractionMethod::Pattern]
    );
    assert_eq!(
        result.metadata.strategies_run,
        vec![ExtractionMethod::Lexicon, ExtractionMethod::Pattern, ExtractionMethod::NounChunk]
    );
    assert_eq!(
        result.metadata.strategies_disabled,
        vec![ExtractionMethod::Ner, ExtractionMethod::Semantic]
    );
}

#[test]
fn multibyte_words_do_not_fail_the_tagger() {
    let config = ExtractorConfig::enhanced();
    let resources = Arc::new(NlpResources::builtin(&config.lexicon));
    let extractor = SkillExtractor::new(config, resources).unwrap();
    let result = extractor.extract_skills(
        "",
        "Requirements:\n- Experience with Python\n- Tracking CO₂ed emissions for ü₂₂ed plants",
    );
    assert!(result.metadata.strategies_failed.is_empty(), "{:?}", result.metadata);
    assert!(result.find("Python").is_some());
}

#[test]
fn shared_engine_across_threads() {
    let config = ExtractorConfig::enhanced();
    let resources = Arc::new(NlpResources::builtin(&config.lexicon));
    let extractor = Arc::new(SkillExtractor::new(config, resources).unwrap());
    let expected = serde_json::to_string(&extractor.extract_skills("", POSTING)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let extractor = Arc::clone(&extractor);
            thread::spawn(move || serde_json::to_string(&extractor.extract_skills("", POSTING)).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn one_resource_handle_serves_many_engines() {
    let resources = Arc::new(NlpResources::builtin(&ExtractorConfig::enhanced().lexicon));
    let enhanced = SkillExtractor::new(ExtractorConfig::enhanced(), Arc::clone(&resources)).unwrap();
    let baseline = SkillExtractor::new(ExtractorConfig::baseline(), resources).unwrap();
    assert_eq!(enhanced.mode(), Mode::Enhanced);
    assert_eq!(baseline.mode(), Mode::Baseline);
    assert!(baseline.extract_skills("", POSTING).find("Python").is_some());
}

#[test]
fn extract_and_store_writes_json() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExtractorConfig::enhanced();
    let resources = Arc::new(NlpResources::builtin(&config.lexicon));
    let extractor = SkillExtractor::new(config, resources).unwrap();
    let store = JsonFileStore::new(dir.path()).unwrap();

    let result = extractor
        .extract_and_store("job-7", "enrich-1", "", POSTING, &store)
        .unwrap();
    let stored = store.load_skills("job-7", "enrich-1").unwrap();
    assert_eq!(stored, result.skills);
    assert!(dir.path().join("job-7").join("enrich-1_skills_meta.json").exists());
}

#[test]
fn storage_failures_reach_the_caller() {
    let config = ExtractorConfig::enhanced();
    let resources = Arc::new(NlpResources::builtin(&config.lexicon));
    let extractor = SkillExtractor::new(config, resources).unwrap();
    let outcome = extractor.extract_and_store("job-7", "enrich-1", "", POSTING, &RejectingStore);
    assert!(matches!(outcome, Err(AppError::Storage(StorageError::InvalidKey(_)))));
}
