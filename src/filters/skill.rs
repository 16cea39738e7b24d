// src/filters/skill.rs
use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::vocab::US_STATE_CODES;
use crate::config::ExtractorConfig;
use crate::nlp::tokenizer::{noun_lemma, DETERMINERS};

static TIME_PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:\d+\+?\s*)?(?:years?|yrs?|months?|weeks?|days?|hours?|annually|daily|weekly|monthly|quarterly)\b")
        .expect("Failed to compile TIME_PERIOD_RE")
});

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\d\s.,+%$€£kK/-]+$").expect("Failed to compile NUMERIC_RE")
});

// Head nouns of job titles.
const ROLE_NOUNS: &[&str] = &[
    "developer", "engineer", "manager", "director", "analyst", "designer", "scientist",
    "architect", "administrator", "consultant", "specialist", "intern", "recruiter",
    "coordinator", "technician", "officer", "president", "representative", "associate",
    "executive", "programmer", "lead", "head", "owner", "assistant", "writer", "tester",
    "member", "candidate", "hire",
];

const SENIORITY_WORDS: &[&str] = &[
    "senior", "sr", "sr.", "junior", "jr", "jr.", "principal", "staff", "mid-level",
    "entry-level", "intermediate", "chief", "vp",
];

/// Noise rejection shared by the extraction strategies and the pipeline.
#[derive(Debug, Clone, Default)]
pub struct SkillFilter {
    noise_words: BTreeSet<String>,
    noise_phrases: BTreeSet<String>,
}

impl SkillFilter {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            noise_words: config.noise_words.iter().map(|w| w.to_lowercase()).collect(),
            noise_phrases: config.noise_phrases.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    /// Exact match against the noise word and phrase sets.
    pub fn is_noise(&self, name: &str) -> bool {
        let lower = name.trim().to_lowercase();
        self.noise_words.contains(&lower) || self.noise_phrases.contains(&lower)
    }

    fn contains_noise_phrase(&self, lower: &str) -> bool {
        let padded = format!(" {lower} ");
        self.noise_phrases
            .iter()
            .any(|p| p.contains(' ') && padded.contains(&format!(" {p} ")))
    }

    /// Whether a free-form span (entity, noun chunk) could name a skill.
    pub fn is_likely_skill(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.chars().count() < 2 {
            return false;
        }
        let lower = trimmed.to_lowercase();
        let words: Vec<&str> = lower.split_whitespace().collect();
        if words.is_empty() || words.len() > 6 {
            return false;
        }
        if DETERMINERS.contains(&words[0]) {
            tracing::trace!("Rejecting '{}': determiner prefix", trimmed);
            return false;
        }
        if NUMERIC_RE.is_match(trimmed) {
            return false;
        }
        if US_STATE_CODES.contains(&trimmed) {
            return false;
        }
        if TIME_PERIOD_RE.is_match(trimmed) {
            tracing::trace!("Rejecting '{}': time period", trimmed);
            return false;
        }
        if self.is_noise(&lower) || self.contains_noise_phrase(&lower) {
            tracing::trace!("Rejecting '{}': noise", trimmed);
            return false;
        }
        if words.iter().all(|w| self.noise_words.contains(*w)) {
            return false;
        }
        if is_job_title(&words) {
            tracing::trace!("Rejecting '{}': job title", trimmed);
            return false;
        }
        true
    }
}

fn is_job_title(words: &[&str]) -> bool {
    let Some(last) = words.last() else {
        return false;
    };
    let head = noun_lemma(last);
    if ROLE_NOUNS.contains(&head.as_str()) {
        return true;
    }
    words.len() > 1 && words.iter().any(|w| SENIORITY_WORDS.contains(w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> SkillFilter {
        SkillFilter::new(&ExtractorConfig::default())
    }

    #[test]
    fn rejects_noise_shapes() {
        let f = filter();
        for text in [
            "the team", "2024", "5+", "CA", "5+ years", "3 months", "New York",
            "competitive salary", "remote", "Python Developer", "Senior Engineers",
            "Staff Rust", "a", "full-time",
        ] {
            assert!(!f.is_likely_skill(text), "'{text}' should be rejected");
        }
    }

    #[test]
    fn accepts_skill_shapes() {
        let f = filter();
        for text in ["Kubernetes", "data pipelines", "project management", "gRPC", "C++", "AWS Lambda"] {
            assert!(f.is_likely_skill(text), "'{text}' should be accepted");
        }
    }

    #[test]
    fn noise_is_exact() {
        let f = filter();
        assert!(f.is_noise("Remote"));
        assert!(f.is_noise("new york"));
        assert!(!f.is_noise("Remote Sensing"));
    }
}
