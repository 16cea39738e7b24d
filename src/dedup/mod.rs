// src/dedup/mod.rs
//! Merging of candidates that name the same skill, and the per-category cap.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::extractors::SkillCandidate;
use crate::pipeline::result::ExtractedSkill;
use crate::text::{dedup_key, truncate_chars};

const SNIPPET_SEPARATOR: &str = " | ";

fn field_rank(field: &str) -> u8 {
    match field {
        "job_summary" => 0,
        _ => 1,
    }
}

/// Orders candidates best first: highest confidence, then earliest mention.
fn best_first(a: &SkillCandidate, b: &SkillCandidate) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| field_rank(&a.source_field).cmp(&field_rank(&b.source_field)))
        .then_with(|| a.start_offset.cmp(&b.start_offset))
        .then_with(|| a.method.cmp(&b.method))
}

pub struct Deduplicator {
    max_snippet_chars: usize,
}

impl Deduplicator {
    pub fn new(max_snippet_chars: usize) -> Self {
        Self { max_snippet_chars }
    }

    /// One skill per dedup key. Input order doesn't affect the result.
    pub fn deduplicate(&self, candidates: Vec<SkillCandidate>) -> Vec<ExtractedSkill> {
        let before = candidates.len();
        let mut groups: BTreeMap<String, Vec<SkillCandidate>> = BTreeMap::new();
        for candidate in candidates {
            groups
                .entry(dedup_key(&candidate.normalized_name))
                .or_default()
                .push(candidate);
        }

        let skills: Vec<ExtractedSkill> = groups
            .into_iter()
            .filter_map(|(key, mut group)| {
                group.sort_by(best_first);
                let merged = self.merge(&group);
                if let Some(skill) = &merged {
                    trace!("'{}' merged {} candidates as '{}'", key, group.len(), skill.skill_name);
                }
                merged
            })
            .collect();
        debug!("Deduplicated {} candidates into {} skills", before, skills.len());
        skills
    }

    fn merge(&self, group: &[SkillCandidate]) -> Option<ExtractedSkill> {
        let best = group.first()?;

        // mentions in document order, for snippets and spellings
        let mut mentions: Vec<&SkillCandidate> = group.iter().collect();
        mentions.sort_by_key(|c| (field_rank(&c.source_field), c.start_offset, c.end_offset));

        let positions: BTreeSet<(&str, usize)> = group
            .iter()
            .map(|c| (c.source_field.as_str(), c.start_offset))
            .collect();

        let mut spellings: Vec<String> = Vec::new();
        let mut seen_spellings = BTreeSet::new();
        for mention in &mentions {
            let spelling = mention.raw_text.trim();
            if !spelling.is_empty() && seen_spellings.insert(spelling.to_lowercase()) {
                spellings.push(spelling.to_string());
            }
        }

        let mut snippets: Vec<&str> = vec![best.context_snippet.as_str()];
        for mention in &mentions {
            let snippet = mention.context_snippet.as_str();
            if !snippet.is_empty() && !snippets.contains(&snippet) {
                snippets.push(snippet);
            }
        }
        let context = truncate_chars(
            &snippets
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(SNIPPET_SEPARATOR),
            self.max_snippet_chars,
        );

        Some(ExtractedSkill {
            skill_name: best.normalized_name.clone(),
            skill_category: best.category.clone(),
            confidence_score: best.confidence,
            extraction_method: best.method,
            context_snippet: context,
            alternate_names: (spellings.len() > 1).then_some(spellings),
            dedupe_count: (positions.len() > 1).then_some(positions.len()),
            category_overflow: false,
            source_field: best.source_field.clone(),
            start_offset: best.start_offset,
            end_offset: best.end_offset,
        })
    }
}

pub struct CategoryLimiter {
    max_per_category: usize,
    overflow_threshold: f32,
}

impl CategoryLimiter {
    pub fn new(max_per_category: usize, overflow_threshold: f32) -> Self {
        Self {
            max_per_category,
            overflow_threshold,
        }
    }

    /// Keeps the best `max_per_category` skills of each category. Skills past
    /// the cap survive only above the overflow threshold and are flagged.
    pub fn limit(&self, skills: Vec<ExtractedSkill>) -> Vec<ExtractedSkill> {
        let mut by_category: BTreeMap<String, Vec<ExtractedSkill>> = BTreeMap::new();
        for skill in skills {
            by_category
                .entry(skill.skill_category.clone())
                .or_default()
                .push(skill);
        }

        let mut kept = Vec::new();
        for (category, mut group) in by_category {
            group.sort_by(|a, b| {
                b.confidence_score
                    .total_cmp(&a.confidence_score)
                    .then_with(|| a.skill_name.cmp(&b.skill_name))
            });
            let total = group.len();
            for (rank, mut skill) in group.into_iter().enumerate() {
                if rank < self.max_per_category {
                    kept.push(skill);
                } else if skill.confidence_score > self.overflow_threshold {
                    skill.category_overflow = true;
                    kept.push(skill);
                } else {
                    trace!("Dropping '{}' over the {} cap", skill.skill_name, category);
                }
            }
            if total > self.max_per_category {
                debug!("Category '{}' had {} skills, cap {}", category, total, self.max_per_category);
            }
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ExtractionMethod;

    fn candidate(raw: &str, name: &str, confidence: f32, start: usize) -> SkillCandidate {
        SkillCandidate {
            raw_text: raw.into(),
            normalized_name: name.into(),
            category: "devops_tools".into(),
            method: ExtractionMethod::Lexicon,
            confidence,
            context_snippet: format!("uses {raw} daily"),
            start_offset: start,
            end_offset: start + raw.len(),
            source_field: "job_description".into(),
        }
    }

    fn skill(name: &str, category: &str, confidence: f32) -> ExtractedSkill {
        ExtractedSkill {
            skill_name: name.into(),
            skill_category: category.into(),
            confidence_score: confidence,
            extraction_method: ExtractionMethod::Lexicon,
            context_snippet: String::new(),
            alternate_names: None,
            dedupe_count: None,
            category_overflow: false,
            source_field: "job_description".into(),
            start_offset: 0,
            end_offset: 0,
        }
    }

    #[test]
    fn aliases_merge_into_one_skill() {
        let merged = Deduplicator::new(200).deduplicate(vec![
            candidate("Kubernetes", "Kubernetes", 0.8, 0),
            candidate("K8s", "Kubernetes", 0.8, 40),
        ]);
        assert_eq!(merged.len(), 1);
        let k8s = &merged[0];
        assert_eq!(k8s.skill_name, "Kubernetes");
        assert_eq!(k8s.dedupe_count, Some(2));
        assert_eq!(
            k8s.alternate_names,
            Some(vec!["Kubernetes".to_string(), "K8s".to_string()])
        );
        assert_eq!(k8s.start_offset, 0);
        assert_eq!(k8s.context_snippet, "uses Kubernetes daily | uses K8s daily");
    }

    #[test]
    fn highest_confidence_wins_and_single_mentions_have_no_extras() {
        let mut ner = candidate("Docker", "Docker", 0.65, 10);
        ner.method = ExtractionMethod::Ner;
        let merged = Deduplicator::new(200).deduplicate(vec![ner, candidate("Docker", "Docker", 0.9, 10)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].extraction_method, ExtractionMethod::Lexicon);
        assert_eq!(merged[0].dedupe_count, None);
        assert_eq!(merged[0].alternate_names, None);
    }

    #[test]
    fn merged_snippets_are_capped() {
        let merged = Deduplicator::new(30).deduplicate(vec![
            candidate("Go", "Go", 0.9, 0),
            candidate("golang", "Go", 0.7, 50),
        ]);
        assert!(merged[0].context_snippet.chars().count() <= 30);
    }

    #[test]
    fn limiter_caps_and_flags_overflow() {
        let skills = vec![
            skill("A", "tools", 0.95),
            skill("B", "tools", 0.7),
            skill("C", "tools", 0.93),
            skill("D", "tools", 0.8),
            skill("E", "databases", 0.7),
        ];
        let kept = CategoryLimiter::new(2, 0.9).limit(skills);
        let names: Vec<(&str, bool)> = kept
            .iter()
            .map(|s| (s.skill_name.as_str(), s.category_overflow))
            .collect();
        assert_eq!(names, vec![("E", false), ("A", false), ("C", false)]);

        let skills = vec![
            skill("A", "tools", 0.95),
            skill("B", "tools", 0.94),
            skill("C", "tools", 0.93),
            skill("D", "tools", 0.5),
        ];
        let kept = CategoryLimiter::new(2, 0.9).limit(skills);
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().any(|s| s.skill_name == "C" && s.category_overflow));
    }
}
