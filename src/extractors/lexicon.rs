// src/extractors/lexicon.rs
use std::sync::Arc;

use tracing::trace;

use super::{build_candidate, CandidateSpec, ExtractionMethod, SkillCandidate, SkillStrategy};
use crate::config::{ExtractorConfig, LexiconEntry};
use crate::nlp::TokenizedText;
use crate::utils::error::ExtractError;

struct SurfaceForm {
    // ASCII-lowercased unless case-sensitive
    needle: String,
    case_sensitive: bool,
    single_char: bool,
    entry: LexiconEntry,
}

/// Scans for every canonical term and alias of the lexicon.
pub struct LexiconMatcher {
    config: Arc<ExtractorConfig>,
    forms: Vec<SurfaceForm>,
    weight: f32,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '+' || c == '#' || c == '_'
}

impl LexiconMatcher {
    pub fn new(config: Arc<ExtractorConfig>) -> Self {
        let mut forms: Vec<SurfaceForm> = config
            .lexicon
            .surface_forms()
            .into_iter()
            .map(|(surface, entry)| {
                let case_sensitive = config.lexicon.is_case_sensitive(&surface);
                SurfaceForm {
                    needle: if case_sensitive {
                        surface.clone()
                    } else {
                        surface.to_ascii_lowercase()
                    },
                    case_sensitive,
                    single_char: surface.chars().count() == 1,
                    entry,
                }
            })
            .collect();
        // longest first so contained matches lose
        forms.sort_by(|a, b| b.needle.len().cmp(&a.needle.len()).then_with(|| a.needle.cmp(&b.needle)));
        let weight = config.method_weights.lexicon;
        Self { config, forms, weight }
    }

    fn at_boundary(text: &str, start: usize, end: usize, single_char: bool) -> bool {
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
            return false;
        }
        // "JS" inside "Node.js", "NET" inside "ASP.NET"
        if before == Some('.') {
            let prior = text[..start - 1].chars().next_back();
            if prior.is_some_and(char::is_alphanumeric) {
                return false;
            }
        }
        // "Node" inside "Node.js"
        if after == Some('.') {
            let next = text[end + 1..].chars().next();
            if next.is_some_and(char::is_alphanumeric) {
                return false;
            }
        }
        if single_char {
            // "R&D", "C-level", "Rock 'n' Roll"
            let joiners = ['&', '-', '\'', '/', '.'];
            if before.is_some_and(|c| joiners.contains(&c)) || after.is_some_and(|c| joiners.contains(&c)) {
                return false;
            }
        }
        true
    }

    /// Non-overlapping matches as `(start, end, form index)`, in text order.
    fn find_matches(&self, text: &str) -> Vec<(usize, usize, usize)> {
        let lowered = text.to_ascii_lowercase();
        let mut taken: Vec<(usize, usize)> = Vec::new();
        let mut found = Vec::new();
        for (idx, form) in self.forms.iter().enumerate() {
            if form.needle.is_empty() {
                continue;
            }
            let haystack = if form.case_sensitive { text } else { lowered.as_str() };
            for (start, _) in haystack.match_indices(form.needle.as_str()) {
                let end = start + form.needle.len();
                if !Self::at_boundary(text, start, end, form.single_char) {
                    continue;
                }
                if taken.iter().any(|&(s, e)| start < e && s < end) {
                    trace!("'{}' at {} is inside a longer match", form.entry.canonical, start);
                    continue;
                }
                taken.push((start, end));
                found.push((start, end, idx));
            }
        }
        found.sort_unstable();
        found
    }
}

impl SkillStrategy for LexiconMatcher {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Lexicon
    }

    fn extract(
        &self,
        _analysed: &TokenizedText,
        raw_text: &str,
        source_field: &str,
    ) -> Result<Vec<SkillCandidate>, ExtractError> {
        let candidates: Vec<SkillCandidate> = self
            .find_matches(raw_text)
            .into_iter()
            .map(|(start, end, idx)| {
                let entry = &self.forms[idx].entry;
                build_candidate(
                    &self.config,
                    raw_text,
                    source_field,
                    CandidateSpec {
                        raw_text: &raw_text[start..end],
                        start,
                        end,
                        normalized_name: entry.canonical.clone(),
                        category: entry.category.clone(),
                        method: ExtractionMethod::Lexicon,
                        confidence: self.weight,
                    },
                )
            })
            .collect();
        trace!("Lexicon matched {} mentions in {}", candidates.len(), source_field);
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        let matcher = LexiconMatcher::new(Arc::new(ExtractorConfig::enhanced()));
        matcher
            .extract(&TokenizedText::default(), text, "job_description")
            .unwrap()
            .into_iter()
            .map(|c| c.normalized_name)
            .collect()
    }

    #[test]
    fn finds_every_occurrence_with_offsets() {
        let matcher = LexiconMatcher::new(Arc::new(ExtractorConfig::enhanced()));
        let text = "Python, python and PYTHON";
        let found = matcher
            .extract(&TokenizedText::default(), text, "job_description")
            .unwrap();
        assert_eq!(found.len(), 3);
        for c in &found {
            assert_eq!(c.normalized_name, "Python");
            assert_eq!(&text[c.start_offset..c.end_offset], c.raw_text);
            assert!((c.confidence - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn aliases_map_to_canonical() {
        assert_eq!(names("We run K8s on GCP"), vec!["Kubernetes", "Google Cloud Platform"]);
    }

    #[test]
    fn longest_match_wins() {
        assert_eq!(names("Deep experience with Node.js"), vec!["Node.js"]);
        assert_eq!(names("Spring Boot services"), vec!["Spring Boot"]);
    }

    #[test]
    fn respects_word_boundaries() {
        assert!(names("JavaScript").iter().all(|n| n != "Java"));
        assert!(names("Gopher and Rusty").is_empty());
        assert_eq!(names("C++ and C#"), vec!["C++", "C#"]);
    }

    #[test]
    fn short_terms_are_case_sensitive() {
        assert!(names("go to the office, r&d team").is_empty());
        assert_eq!(names("Go and R"), vec!["Go", "R"]);
    }

    #[test]
    fn baseline_weight_is_lower() {
        let matcher = LexiconMatcher::new(Arc::new(ExtractorConfig::baseline()));
        let found = matcher
            .extract(&TokenizedText::default(), "Microsoft Excel wizard", "job_description")
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!((found[0].confidence - 0.85).abs() < f32::EPSILON);
    }
}
