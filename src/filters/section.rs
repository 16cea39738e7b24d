// src/filters/section.rs
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::sections::{match_header, HeaderMatch, SectionRecord};

/// Below this many header matches, long or relevant sections are added too.
const MIN_HEADER_MATCHES: usize = 3;

#[derive(Debug, Clone)]
pub struct SectionFilter {
    relevant_keywords: Vec<String>,
    excluded_keywords: Vec<String>,
    fallback_min_chars: usize,
}

impl SectionFilter {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            relevant_keywords: config.relevant_section_keywords.clone(),
            excluded_keywords: config.excluded_section_keywords.clone(),
            fallback_min_chars: config.fallback_min_section_chars,
        }
    }

    fn header_match(&self, section: &SectionRecord) -> HeaderMatch {
        section
            .header
            .as_deref()
            .map(|h| match_header(h, &self.relevant_keywords, &self.excluded_keywords))
            .unwrap_or(HeaderMatch::Unknown)
    }

    /// Sections worth mining, in document order. Falls back to the whole of
    /// `full_text` when nothing qualifies.
    pub fn filter(&self, sections: &[SectionRecord], full_text: &str) -> Vec<SectionRecord> {
        let mut selected: Vec<usize> = sections
            .iter()
            .enumerate()
            .filter(|(_, s)| self.header_match(s) == HeaderMatch::Relevant)
            .map(|(i, _)| i)
            .collect();
        let header_matches = selected.len();

        if selected.len() < MIN_HEADER_MATCHES {
            for (i, section) in sections.iter().enumerate() {
                if selected.contains(&i) || self.header_match(section) == HeaderMatch::Excluded {
                    continue;
                }
                if section.text.chars().count() >= self.fallback_min_chars || section.is_relevant {
                    selected.push(i);
                }
            }
            selected.sort_unstable();
        }

        if selected.is_empty() {
            debug!("No section qualified; using the full text");
            return vec![SectionRecord::whole_document(full_text)];
        }
        debug!(
            "Selected {} of {} sections ({} by header)",
            selected.len(),
            sections.len(),
            header_matches
        );
        selected.into_iter().map(|i| sections[i].clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::SectionClassifier;

    fn run(text: &str) -> Vec<SectionRecord> {
        let config = ExtractorConfig::default();
        let sections = SectionClassifier::new(&config).classify(text);
        SectionFilter::new(&config).filter(&sections, text)
    }

    #[test]
    fn excluded_section_is_dropped_when_others_exist() {
        let text = "## Requirements\nRust and Go\n\n## Benefits\nFree Python lessons\n";
        let kept = run(text);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].header.as_deref(), Some("Requirements"));
    }

    #[test]
    fn excluded_only_document_falls_back_to_full_text() {
        let text = "## Benefits\nFree Python lessons\n";
        let kept = run(text);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].header.is_none());
        assert_eq!(kept[0].text, text);
    }

    #[test]
    fn output_keeps_document_order() {
        let text = "Intro about the team and the mission we share with partners worldwide, written at length to pass the size check easily.\n\n## Skills\nRust\n\n## Benefits\nDental\n";
        let kept = run(text);
        let indices: Vec<usize> = kept.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn three_header_matches_skip_the_fallback() {
        let text = "Long untitled preamble that goes on and on about culture, values and everything else a company says about itself.\n\n## Requirements\nRust\n\n## Skills\nGo\n\n## Qualifications\nBSc\n";
        let kept = run(text);
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().all(|s| s.header.is_some()));
    }
}
