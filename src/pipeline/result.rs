// src/pipeline/result.rs
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::extractors::ExtractionMethod;
use crate::text::dedup_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Enhanced,
    Baseline,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Enhanced => "enhanced",
            Mode::Baseline => "baseline",
        }
    }
}

/// One deduplicated, scored skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub skill_name: String,
    pub skill_category: String,
    pub confidence_score: f32,
    pub extraction_method: ExtractionMethod,
    pub context_snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedupe_count: Option<usize>,
    #[serde(default)]
    pub category_overflow: bool,
    pub source_field: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// What happened during a run, including degraded or skipped strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub mode: Mode,
    pub strategies_run: Vec<ExtractionMethod>,
    pub strategies_failed: Vec<ExtractionMethod>,
    pub strategies_disabled: Vec<ExtractionMethod>,
    pub confidence_threshold: f32,
    pub total_candidates: usize,
    pub final_count: usize,
    pub sections_total: usize,
    pub sections_used: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub skills: Vec<ExtractedSkill>,
    pub metadata: RunMetadata,
}

impl ExtractionResult {
    pub fn skill_names(&self) -> Vec<&str> {
        self.skills.iter().map(|s| s.skill_name.as_str()).collect()
    }

    pub fn find(&self, name: &str) -> Option<&ExtractedSkill> {
        let key = dedup_key(name);
        self.skills.iter().find(|s| dedup_key(&s.skill_name) == key)
    }

    /// Checks the output guarantees. Returns a description of the first
    /// violation found.
    pub fn contract_violation(&self, max_per_category: usize, overflow_threshold: f32) -> Option<String> {
        let mut keys = BTreeSet::new();
        for skill in &self.skills {
            if !skill.confidence_score.is_finite() || !(0.0..=1.0).contains(&skill.confidence_score) {
                return Some(format!(
                    "confidence {} out of range for '{}'",
                    skill.confidence_score, skill.skill_name
                ));
            }
            if skill.skill_name.trim().is_empty() {
                return Some("empty skill name".to_string());
            }
            if !keys.insert(dedup_key(&skill.skill_name)) {
                return Some(format!("duplicate skill '{}'", skill.skill_name));
            }
        }

        let mut categories: BTreeSet<&str> = BTreeSet::new();
        for skill in &self.skills {
            categories.insert(&skill.skill_category);
        }
        for category in categories {
            let capped = self
                .skills
                .iter()
                .filter(|s| s.skill_category == category)
                .filter(|s| !(s.category_overflow && s.confidence_score > overflow_threshold))
                .count();
            if capped > max_per_category {
                return Some(format!(
                    "category '{category}' holds {capped} skills, cap is {max_per_category}"
                ));
            }
        }
        None
    }
}
