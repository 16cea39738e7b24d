// src/config/file.rs
//! TOML override files.
//!
//! Every field is optional; anything left out keeps the preset's default.
//!
//! ```toml
//! preset = "enhanced"
//! confidence_threshold = 0.65
//! max_skills_per_category = 10
//!
//! [enabled_strategies]
//! semantic = false
//!
//! [extra_skills]
//! devops_tools = ["Nomad", "Crossplane"]
//!
//! [extra_aliases]
//! "tf" = "Terraform"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::ExtractorConfig;
use crate::extractors::ExtractionMethod;
use crate::utils::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Enhanced,
    Baseline,
}

/// Partial strategy switches; `None` keeps the preset's value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrategyToggles {
    pub lexicon: Option<bool>,
    pub ner: Option<bool>,
    pub noun_chunk: Option<bool>,
    pub pattern: Option<bool>,
    pub semantic: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub preset: Option<Preset>,
    pub confidence_threshold: Option<f32>,
    pub max_skills_per_category: Option<usize>,
    pub context_window: Option<usize>,
    pub overflow_threshold: Option<f32>,
    pub semantic_similarity_threshold: Option<f32>,
    pub enabled_strategies: StrategyToggles,
    pub relevant_section_keywords: Option<Vec<String>>,
    pub excluded_section_keywords: Option<Vec<String>>,
    pub extra_noise_words: Vec<String>,
    /// Merged into the category weight table (new keys add categories).
    pub category_weights: BTreeMap<String, f32>,
    /// category -> extra canonical skills
    pub extra_skills: BTreeMap<String, Vec<String>>,
    /// alias -> canonical skill
    pub extra_aliases: BTreeMap<String, String>,
}

impl ConfigOverrides {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::info!("Loaded config overrides from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Starting point selected by `preset`.
    pub fn base_config(&self) -> ExtractorConfig {
        match self.preset.unwrap_or_default() {
            Preset::Enhanced => ExtractorConfig::enhanced(),
            Preset::Baseline => ExtractorConfig::baseline(),
        }
    }

    pub fn apply(self, mut config: ExtractorConfig) -> ExtractorConfig {
        if let Some(v) = self.confidence_threshold {
            config.confidence_threshold = v;
        }
        if let Some(v) = self.max_skills_per_category {
            config.max_skills_per_category = v;
        }
        if let Some(v) = self.context_window {
            config.context_window = v;
        }
        if let Some(v) = self.overflow_threshold {
            config.overflow_threshold = v;
        }
        if let Some(v) = self.semantic_similarity_threshold {
            config.semantic_similarity_threshold = v;
        }

        let toggles = [
            (ExtractionMethod::Lexicon, self.enabled_strategies.lexicon),
            (ExtractionMethod::Ner, self.enabled_strategies.ner),
            (ExtractionMethod::NounChunk, self.enabled_strategies.noun_chunk),
            (ExtractionMethod::Pattern, self.enabled_strategies.pattern),
            (ExtractionMethod::Semantic, self.enabled_strategies.semantic),
        ];
        for (method, toggle) in toggles {
            if let Some(enabled) = toggle {
                config.enabled_strategies.set(method, enabled);
            }
        }

        if let Some(keywords) = self.relevant_section_keywords {
            config.relevant_section_keywords = keywords;
        }
        if let Some(keywords) = self.excluded_section_keywords {
            config.excluded_section_keywords = keywords;
        }
        config
            .noise_words
            .extend(self.extra_noise_words.iter().map(|w| w.to_lowercase()));
        config.category_weights.extend(self.category_weights);

        for (category, skills) in &self.extra_skills {
            let terms: Vec<&str> = skills.iter().map(String::as_str).collect();
            config.lexicon.add_terms(category, &terms);
        }
        for (alias, canonical) in &self.extra_aliases {
            config.lexicon.add_alias(alias, canonical);
        }
        config
    }

    /// Preset + overrides, validated.
    pub fn into_config(self) -> Result<ExtractorConfig, ConfigError> {
        let base = self.base_config();
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_enhanced_defaults() {
        let config = ConfigOverrides::from_toml_str("").unwrap().into_config().unwrap();
        assert!(config.prefer_enhanced);
        assert!((config.confidence_threshold - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn overrides_are_applied() {
        let toml = r#"
            preset = "baseline"
            confidence_threshold = 0.7
            max_skills_per_category = 4

            [enabled_strategies]
            ner = false

            [extra_skills]
            working_with_computers = ["Nomad"]

            [extra_aliases]
            "xls" = "Microsoft Excel"
        "#;
        let config = ConfigOverrides::from_toml_str(toml).unwrap().into_config().unwrap();
        assert!(!config.prefer_enhanced);
        assert_eq!(config.max_skills_per_category, 4);
        assert!(!config.enabled_strategies.ner);
        assert!(config.enabled_strategies.lexicon);
        assert_eq!(config.lexicon.lookup("nomad").unwrap().category, "working_with_computers");
        assert_eq!(config.lexicon.lookup("XLS").unwrap().canonical, "Microsoft Excel");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            ConfigOverrides::from_toml_str("confidence = 0.5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let overrides = ConfigOverrides::from_toml_str("overflow_threshold = 2.0").unwrap();
        assert!(matches!(
            overrides.into_config(),
            Err(ConfigError::OutOfRange { name: "overflow_threshold", .. })
        ));
    }

    #[test]
    fn skills_in_unknown_category_fail_validation() {
        let toml = "[extra_skills]\nbasket_weaving = [\"Wicker\"]\n";
        let overrides = ConfigOverrides::from_toml_str(toml).unwrap();
        assert!(matches!(overrides.into_config(), Err(ConfigError::UnknownCategory(_))));
    }
}
