// src/sections/mod.rs
//! Splitting a posting into sections and scoring each for skill relevance.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{ExtractorConfig, Lexicon};
use crate::utils::error::ExtractError;

// --- Header line patterns ---

static MARKDOWN_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}\s+(.+?)\s*#*$").expect("Failed to compile MARKDOWN_HEADER_RE"));

static BOLD_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*\*([^*]{2,80})\*\*\s*:?$").expect("Failed to compile BOLD_HEADER_RE")
});

static COLON_TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9 '&/,()\-]{1,60}):$").expect("Failed to compile COLON_TITLE_RE")
});

static INLINE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z '&/\-]{1,40}):\s+(\S.*)$").expect("Failed to compile INLINE_HEADER_RE")
});

static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*•·▪◦]|\d{1,2}[.)])\s+").expect("Failed to compile BULLET_RE")
});

// Technology-looking tokens used as a relevance signal.
static TECH_PATTERNS_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b[A-Z]{2,5}s?\b",                                // acronyms: AWS, SQL, APIs
        r"\b[A-Z][a-z]+[A-Z][A-Za-z]+\b",                   // CamelCase: JavaScript
        r"\b[A-Za-z]+\.(?:js|py|net|io)\b",                 // Node.js
        r"\b[A-Za-z][A-Za-z+#]*\s?v?\d+(?:\.\d+)+\b",       // versions: Python 3.11
        r"(?:\bC\+\+|\bC#|\.NET\b)",
        r"(?i)\b(?:framework|library|sdk|api|database|cloud|devops|ci/cd|microservices?|kubernetes|docker|python|java|sql)\b",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

const MAX_HEADER_WORDS: usize = 8;
const LIST_SEPARATORS: [char; 4] = [',', '/', '|', ';'];

/// A slice of the document with its relevance score. `start_offset` is the
/// byte offset of `text` within the document it was split from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub header: Option<String>,
    pub text: String,
    pub index: usize,
    pub start_offset: usize,
    pub is_relevant: bool,
    pub relevance_probability: f32,
    pub detected_keywords: Vec<String>,
}

impl SectionRecord {
    /// The whole document as one unscored section.
    pub fn whole_document(text: &str) -> Self {
        Self {
            header: None,
            text: text.to_string(),
            index: 0,
            start_offset: 0,
            is_relevant: true,
            relevance_probability: 0.5,
            detected_keywords: Vec::new(),
        }
    }
}

/// How a header relates to the configured keyword lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    Relevant,
    Excluded,
    Unknown,
}

fn keyword_matches(header_lower: &str, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    header_lower.contains(&keyword) || (header_lower.len() >= 3 && keyword.contains(header_lower))
}

/// Exclusion is checked first and wins.
pub fn match_header(header: &str, relevant: &[String], excluded: &[String]) -> HeaderMatch {
    let lower = header.trim().trim_end_matches(':').trim().to_lowercase();
    if lower.is_empty() {
        return HeaderMatch::Unknown;
    }
    if excluded.iter().any(|k| keyword_matches(&lower, k)) {
        HeaderMatch::Excluded
    } else if relevant.iter().any(|k| keyword_matches(&lower, k)) {
        HeaderMatch::Relevant
    } else {
        HeaderMatch::Unknown
    }
}

#[derive(Debug, Clone)]
pub struct SectionClassifier {
    relevant_keywords: Vec<String>,
    excluded_keywords: Vec<String>,
    indicator_phrases: Vec<String>,
    lexicon: Lexicon,
}

struct RawSection {
    header: Option<String>,
    start: usize,
    end: usize,
}

impl SectionClassifier {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            relevant_keywords: config.relevant_section_keywords.clone(),
            excluded_keywords: config.excluded_section_keywords.clone(),
            indicator_phrases: config
                .skill_indicator_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            lexicon: config.lexicon.clone(),
        }
    }

    fn is_known_keyword(&self, header: &str) -> bool {
        let lower = header.trim().to_lowercase();
        self.relevant_keywords
            .iter()
            .chain(self.excluded_keywords.iter())
            .any(|k| k.to_lowercase() == lower)
    }

    /// An ALL-CAPS line is a header unless it lists skills ("AWS, GCP, SQL",
    /// "SQL"). Known section keywords always win.
    fn is_caps_header(&self, trimmed: &str) -> bool {
        let letters: Vec<char> = trimmed.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.len() < 3
            || !letters.iter().all(|c| c.is_uppercase())
            || trimmed.ends_with(['.', ','])
            || trimmed.contains(LIST_SEPARATORS)
            || BULLET_RE.is_match(trimmed)
        {
            return false;
        }
        if match_header(trimmed, &self.relevant_keywords, &self.excluded_keywords) != HeaderMatch::Unknown {
            return true;
        }
        self.lexicon.lookup(trimmed).is_none()
            && !trimmed
                .split_whitespace()
                .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
                .any(|w| self.lexicon.lookup(w).is_some())
    }

    /// Returns `(header, content_offset)` when `line` is a header. An inline
    /// header ("Skills: Rust, Go") points the offset at its content.
    fn detect_header(&self, line: &str) -> Option<(String, Option<usize>)> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(caps) = MARKDOWN_HEADER_RE.captures(trimmed) {
            return Some((caps[1].trim().to_string(), None));
        }
        if let Some(caps) = BOLD_HEADER_RE.captures(trimmed) {
            return Some((caps[1].trim().trim_end_matches(':').to_string(), None));
        }
        let word_count = trimmed.split_whitespace().count();
        if word_count <= MAX_HEADER_WORDS {
            if let Some(caps) = COLON_TITLE_RE.captures(trimmed) {
                return Some((caps[1].trim().to_string(), None));
            }
            if self.is_caps_header(trimmed) {
                return Some((trimmed.trim_end_matches(':').to_string(), None));
            }
        }
        if let Some(caps) = INLINE_HEADER_RE.captures(trimmed) {
            if self.is_known_keyword(&caps[1]) {
                let lead = line.len() - line.trim_start().len();
                let content_at = caps.get(2).map(|m| lead + m.start());
                return Some((caps[1].trim().to_string(), content_at));
            }
        }
        None
    }

    fn split(&self, text: &str) -> Vec<RawSection> {
        let mut raw: Vec<RawSection> = Vec::new();
        let mut current = RawSection {
            header: None,
            start: 0,
            end: 0,
        };
        let mut line_start = 0;
        for line in text.split_inclusive('\n') {
            let line_end = line_start + line.len();
            let content = line.trim_end_matches(['\n', '\r']);
            if let Some((header, content_at)) = self.detect_header(content) {
                raw.push(current);
                let start = match content_at {
                    Some(offset) => line_start + offset,
                    None => line_end,
                };
                current = RawSection {
                    header: Some(header),
                    start,
                    end: line_end,
                };
            } else {
                current.end = line_end;
            }
            line_start = line_end;
        }
        raw.push(current);
        raw
    }

    /// Scores one section. Blank text is rejected.
    pub fn classify_section(
        &self,
        header: Option<&str>,
        text: &str,
        index: usize,
        start_offset: usize,
    ) -> Result<SectionRecord, ExtractError> {
        if text.trim().is_empty() {
            return Err(ExtractError::Validation(format!(
                "section {index} has no text"
            )));
        }
        let lower = text.to_lowercase();
        let mut signals: Vec<f32> = Vec::new();

        if let Some(header) = header {
            let signal = match match_header(header, &self.relevant_keywords, &self.excluded_keywords) {
                HeaderMatch::Relevant => 0.9,
                HeaderMatch::Excluded => 0.1,
                HeaderMatch::Unknown => 0.5,
            };
            signals.push(signal);
        }

        let mut detected_keywords = Vec::new();
        let mut indicator_count = 0usize;
        for phrase in &self.indicator_phrases {
            let hits = lower.matches(phrase.as_str()).count();
            if hits > 0 {
                indicator_count += hits;
                detected_keywords.push(phrase.clone());
            }
        }
        if indicator_count > 0 {
            signals.push((0.5 + 0.1 * indicator_count as f32).min(0.9));
        }

        let tech_count: usize = TECH_PATTERNS_RE.iter().map(|re| re.find_iter(text).count()).sum();
        if tech_count > 0 {
            signals.push((0.5 + 0.05 * tech_count as f32).min(0.95));
        }

        let bullets = text.lines().filter(|l| BULLET_RE.is_match(l)).count();
        if bullets > 2 {
            signals.push(0.7);
        }

        let probability = if signals.is_empty() {
            0.5
        } else {
            signals.iter().sum::<f32>() / signals.len() as f32
        };
        trace!(
            "Section {} ({:?}): {} signals, probability {:.3}",
            index,
            header,
            signals.len(),
            probability
        );

        Ok(SectionRecord {
            header: header.map(str::to_string),
            text: text.to_string(),
            index,
            start_offset,
            is_relevant: probability >= 0.5,
            relevance_probability: probability.clamp(0.0, 1.0),
            detected_keywords,
        })
    }

    /// Splits and scores `text`. Sections whose content is blank (a header
    /// followed directly by another header) are dropped.
    pub fn classify(&self, text: &str) -> Vec<SectionRecord> {
        let mut records = Vec::new();
        for raw in self.split(text) {
            let slice = &text[raw.start..raw.end.max(raw.start)];
            let leading = slice.len() - slice.trim_start().len();
            let content = slice.trim();
            if content.is_empty() {
                trace!("Skipping empty section {:?}", raw.header);
                continue;
            }
            let index = records.len();
            match self.classify_section(raw.header.as_deref(), content, index, raw.start + leading) {
                Ok(record) => records.push(record),
                Err(e) => debug!("Section skipped: {}", e),
            }
        }
        debug!("Classified {} sections", records.len());
        records
    }
}
