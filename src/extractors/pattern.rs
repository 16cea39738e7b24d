// src/extractors/pattern.rs
use std::collections::BTreeSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::{build_candidate, fallback_category, CandidateSpec, ExtractionMethod, SkillCandidate, SkillStrategy};
use crate::config::{ExtractorConfig, FALLBACK_CATEGORY};
use crate::filters::SkillFilter;
use crate::nlp::tokenizer::looks_technical;
use crate::nlp::TokenizedText;
use crate::text::normalize_skill_name;
use crate::utils::error::ExtractError;

// --- Version strings: capture 1 is the product name ---
static VERSION_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Known names with a version: "Python 3.11", "Java 17", "Angular v15", ".NET 8"
        r"\b(Python|Java|PHP|Ruby|Perl|Scala|Kotlin|Swift|TypeScript|Angular|React|Vue|Django|Rails|Laravel|Spring Boot|Node\.js|PostgreSQL|MySQL|Elasticsearch|Kubernetes|Terraform|Hadoop|Spark|TensorFlow|PyTorch|Bootstrap|HTML|CSS|Oracle|Windows Server|Red Hat Enterprise Linux)\s?v?(\d+(?:\.\d+){0,2})(?:\+|\.x)?\b",
        r"(\.NET)\s?(?:Core\s)?(\d+(?:\.\d+)?)\b",
        // Any capitalised name with a dotted version: "Foo 2.3", "Bar v1.0.4"
        r"\b([A-Z][A-Za-z+#]{1,20})\s+v?(\d+\.\d+(?:\.\d+)?)\b",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

// --- Framework naming: capture 1 is the full name ---
static FRAMEWORK_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // X.js
        r"\b([A-Za-z][A-Za-z0-9]*\.js)\b",
        // "Foo framework", "Bar library", "Baz SDK"
        r"\b([A-Z][A-Za-z0-9+#.]*(?:\s[A-Z][A-Za-z0-9+#.]*)?)\s+(?:framework|library|SDK|toolkit|toolchain)\b",
        // CamelCase product names: TensorFlow, PyTorch, GraphQL
        r"\b((?:[A-Z][a-z]+){1,3}[A-Z][A-Za-z]*)\b",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

// --- Certifications: capture 1 is the certification ---
static CERTIFICATION_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(AWS Certified(?:\s[A-Z][A-Za-z\-]+){1,4})",
        r"\b((?:Google|Microsoft|Azure|Oracle|Salesforce|Cisco|Red Hat) Certified(?:\s[A-Z][A-Za-z\-]+){1,4})",
        r"\b(Certified(?:\s[A-Z][A-Za-z\-]+){1,4})",
        r"\b((?:[A-Z][A-Za-z+]+\s){1,3}(?:Certification|Certificate))\b",
        r"\b(PMP|CISSP|CISM|CISA|CCNA|CCNP|CKA|CKAD|CPA|CFA|CSM|PSM|ITIL\s?v?4|CompTIA\s(?:Security|Network|A)\+)(?:$|[^A-Za-z0-9])",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

// CamelCase words that are companies rather than tools.
const NOT_TOOLS: &[&str] = &["LinkedIn", "YouTube", "PayPal", "McDonald", "DoorDash", "WhatsApp"];

/// True when every pattern table compiled.
pub fn patterns_available() -> bool {
    !VERSION_RE.is_empty() && !FRAMEWORK_RE.is_empty() && !CERTIFICATION_RE.is_empty()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    Version,
    Framework,
    Certification,
}

/// Regex families for versions, framework names and certifications.
pub struct PatternExtractor {
    config: Arc<ExtractorConfig>,
    filter: Arc<SkillFilter>,
}

impl PatternExtractor {
    pub fn new(config: Arc<ExtractorConfig>, filter: Arc<SkillFilter>) -> Self {
        Self { config, filter }
    }

    fn weight(&self, kind: PatternKind) -> f32 {
        let weights = &self.config.method_weights;
        match kind {
            PatternKind::Version => weights.pattern_version,
            PatternKind::Framework => weights.pattern_framework,
            PatternKind::Certification => weights.pattern_certification,
        }
    }

    /// Name and category for a matched name, or `None` to drop it.
    fn resolve(&self, kind: PatternKind, name: &str) -> Option<(String, String)> {
        if let Some(entry) = self.config.lexicon.lookup(name) {
            return Some((entry.canonical.clone(), entry.category.clone()));
        }
        if !self.filter.is_likely_skill(name) || NOT_TOOLS.contains(&name) {
            return None;
        }
        match kind {
            PatternKind::Certification => Some((
                normalize_skill_name(name),
                fallback_category(&self.config, "certifications"),
            )),
            // unknown names need a technical shape to count
            PatternKind::Version | PatternKind::Framework => {
                let technical = name.split_whitespace().any(looks_technical) || name.ends_with(".js");
                technical.then(|| {
                    (
                        normalize_skill_name(name),
                        fallback_category(&self.config, FALLBACK_CATEGORY),
                    )
                })
            }
        }
    }
}

impl SkillStrategy for PatternExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Pattern
    }

    fn extract(
        &self,
        _analysed: &TokenizedText,
        raw_text: &str,
        source_field: &str,
    ) -> Result<Vec<SkillCandidate>, ExtractError> {
        if !patterns_available() {
            return Err(ExtractError::RegexError("pattern tables failed to compile".into()));
        }
        let families: [(PatternKind, &Vec<Regex>); 3] = [
            (PatternKind::Certification, &CERTIFICATION_RE),
            (PatternKind::Version, &VERSION_RE),
            (PatternKind::Framework, &FRAMEWORK_RE),
        ];
        // one candidate per span; earlier families win
        let mut seen: BTreeSet<(usize, usize)> = BTreeSet::new();
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut candidates = Vec::new();

        for (kind, patterns) in families {
            for re in patterns.iter() {
                for caps in re.captures_iter(raw_text) {
                    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                        continue;
                    };
                    let span = (name.start(), name.end());
                    if !seen.insert(span) {
                        continue;
                    }
                    if claimed.iter().any(|&(s, e)| span.0 >= s && span.1 <= e) {
                        continue;
                    }
                    let Some((normalized_name, category)) = self.resolve(kind, name.as_str()) else {
                        trace!("Pattern match '{}' rejected", name.as_str());
                        continue;
                    };
                    let (start, end) = match kind {
                        PatternKind::Version => (whole.start(), whole.end()),
                        _ => span,
                    };
                    claimed.push((start, end));
                    candidates.push(build_candidate(
                        &self.config,
                        raw_text,
                        source_field,
                        CandidateSpec {
                            raw_text: raw_text[start..end].trim_end(),
                            start,
                            end,
                            normalized_name,
                            category,
                            method: ExtractionMethod::Pattern,
                            confidence: self.weight(kind),
                        },
                    ));
                }
            }
        }
        candidates.sort_by_key(|c| (c.start_offset, c.end_offset));
        trace!("Patterns produced {} candidates in {}", candidates.len(), source_field);
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Vec<SkillCandidate> {
        let config = Arc::new(ExtractorConfig::enhanced());
        let filter = Arc::new(SkillFilter::new(&config));
        PatternExtractor::new(config, filter)
            .extract(&TokenizedText::default(), text, "job_description")
            .unwrap()
    }

    fn summary(found: &[SkillCandidate]) -> Vec<(String, f32)> {
        found
            .iter()
            .map(|c| (c.normalized_name.clone(), c.confidence))
            .collect()
    }

    #[test]
    fn versions_resolve_to_the_product() {
        let found = run("Experience with Python 3.11 and Java 17 required");
        assert_eq!(
            summary(&found),
            vec![("Python".to_string(), 0.8), ("Java".to_string(), 0.8)]
        );
        assert_eq!(found[0].raw_text, "Python 3.11");
    }

    #[test]
    fn framework_shapes() {
        let found = run("We use the Phoenix framework, Svelte.js and TensorFlow");
        let names: Vec<String> = found.iter().map(|c| c.normalized_name.clone()).collect();
        assert!(names.contains(&"TensorFlow".to_string()), "{names:?}");
        assert!(names.contains(&"Svelte".to_string()) || names.contains(&"Svelte.js".to_string()), "{names:?}");
        assert!(found.iter().all(|c| (c.confidence - 0.7).abs() < f32::EPSILON));
    }

    #[test]
    fn certifications() {
        let found = run("Holding the AWS Certified Solutions Architect and CISSP is a plus");
        let names: Vec<String> = found.iter().map(|c| c.normalized_name.clone()).collect();
        assert!(names.contains(&"AWS Certified Solutions Architect".to_string()), "{names:?}");
        assert!(names.contains(&"CISSP".to_string()), "{names:?}");
        assert!(found.iter().all(|c| c.category == "certifications"));
    }

    #[test]
    fn ignores_prose_and_companies() {
        assert!(run("5+ years of experience at LinkedIn in Section 2.1").is_empty());
    }
}
