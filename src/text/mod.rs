// src/text/mod.rs
pub mod markup;
pub mod normalize;

pub use markup::{repair_concatenations, strip_markup};
pub use normalize::{collapse_whitespace, dedup_key, normalize_skill_name, truncate_chars};

/// Context snippet around `start..end`: `window` characters each side,
/// whitespace collapsed, capped at `max_chars`.
pub fn context_snippet(text: &str, start: usize, end: usize, window: usize, max_chars: usize) -> String {
    let start = start.min(text.len());
    let end = end.clamp(start, text.len());
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return String::new();
    }
    let begin = text[..start]
        .char_indices()
        .rev()
        .take(window)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let finish = text[end..]
        .char_indices()
        .nth(window)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    truncate_chars(&collapse_whitespace(&text[begin..finish]), max_chars)
}
