// src/utils/html_debug.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::{ExtractedSkill, DESCRIPTION_FIELD};
use crate::storage::check_key;
use crate::utils::error::AppError;

/// A span to highlight in the debug page.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
    pub css_class: &'static str,
    pub title: String,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn css_class(skill: &ExtractedSkill) -> &'static str {
    use crate::extractors::ExtractionMethod::*;
    match skill.extraction_method {
        Lexicon => "hl-lexicon",
        Ner => "hl-ner",
        NounChunk => "hl-noun-chunk",
        Pattern => "hl-pattern",
        Semantic => "hl-semantic",
    }
}

/// Highlights for every description skill, titled with method and confidence.
pub fn skill_highlights(skills: &[ExtractedSkill]) -> Vec<Highlight> {
    skills
        .iter()
        .filter(|s| s.source_field == DESCRIPTION_FIELD)
        .map(|s| Highlight {
            start: s.start_offset,
            end: s.end_offset,
            css_class: css_class(s),
            title: format!(
                "{} ({}): {} {:.2}",
                s.skill_name, s.skill_category, s.extraction_method, s.confidence_score
            ),
        })
        .collect()
}

/// Renders `text` as a standalone page with `highlights` wrapped in spans.
/// Overlapping or out-of-range spans are skipped.
pub fn render_debug_html(text: &str, highlights: &[Highlight]) -> String {
    let mut page = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");
    page.push_str("body { font-family: sans-serif; white-space: pre-wrap; }\n");
    page.push_str(".hl-lexicon { background-color: #90EE90; }\n");
    page.push_str(".hl-ner { background-color: #ADD8E6; }\n");
    page.push_str(".hl-noun-chunk { background-color: #FFFF00; }\n");
    page.push_str(".hl-pattern { background-color: #FFA500; }\n");
    page.push_str(".hl-semantic { background-color: #FFC0CB; }\n");
    page.push_str("</style>\n</head>\n<body>\n");

    let mut sorted: Vec<&Highlight> = highlights.iter().collect();
    sorted.sort_by_key(|h| (h.start, h.end));

    let mut last_pos = 0;
    for h in sorted {
        let in_range = h.start >= last_pos
            && h.start < h.end
            && h.end <= text.len()
            && text.is_char_boundary(h.start)
            && text.is_char_boundary(h.end);
        if !in_range {
            tracing::trace!("Skipping highlight {}..{}", h.start, h.end);
            continue;
        }
        page.push_str(&escape(&text[last_pos..h.start]));
        page.push_str(&format!(
            "<span class=\"{}\" title=\"{}\">",
            h.css_class,
            escape(&h.title)
        ));
        page.push_str(&escape(&text[h.start..h.end]));
        page.push_str("</span>");
        last_pos = h.end;
    }
    page.push_str(&escape(&text[last_pos..]));
    page.push_str("\n</body>\n</html>");
    page
}

/// `<debug_dir>/<posting_id>_annotated.html`. Path-like ids are rejected.
pub fn annotated_path(debug_dir: &Path, posting_id: &str) -> Result<PathBuf, AppError> {
    check_key("job posting id", posting_id)?;
    Ok(debug_dir.join(format!("{posting_id}_annotated.html")))
}

/// Writes the annotated description to `path`.
pub fn save_debug_html(path: &Path, text: &str, skills: &[ExtractedSkill]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let page = render_debug_html(text, &skill_highlights(skills));
    fs::write(path, page)?;
    tracing::info!("Saved debug HTML to {}", path.display());
    Ok(())
}
