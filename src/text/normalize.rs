// src/text/normalize.rs
//! Skill-name cleanup and the dedup key.

use crate::nlp::tokenizer::{looks_technical, noun_lemma};

// Spellings that name the same skill. Applied to whole lowercase keys, before
// and after suffix stripping.
const SYNONYMS: &[(&str, &str)] = &[
    ("k8s", "kubernetes"),
    ("kube", "kubernetes"),
    ("postgres", "postgresql"),
    ("psql", "postgresql"),
    ("golang", "go"),
    ("js", "javascript"),
    ("ecmascript", "javascript"),
    ("es6", "javascript"),
    ("ts", "typescript"),
    ("reactjs", "react"),
    ("nodejs", "node"),
    ("vuejs", "vue"),
    ("expressjs", "express"),
    ("nextjs", "next"),
    ("mongo", "mongodb"),
    ("amazon web services", "aws"),
    ("gcp", "google cloud platform"),
    ("google cloud", "google cloud platform"),
    ("azure", "microsoft azure"),
    ("ml", "machine learning"),
    ("ai", "artificial intelligence"),
    ("nlp", "natural language processing"),
    ("sklearn", "scikit-learn"),
    ("tf", "tensorflow"),
    ("restful api", "rest api"),
    ("restful apis", "rest api"),
    ("rest apis", "rest api"),
    ("rest", "rest api"),
    ("ci/cd pipelines", "ci/cd"),
    ("excel", "microsoft excel"),
    ("ms excel", "microsoft excel"),
];

const STRIPPED_SUFFIXES: &[&str] = &[" framework", ".js", ".py"];

// Punctuation allowed at the edges of a name: "C++", "C#", ".NET".
fn is_edge_junk(c: char) -> bool {
    !(c.is_alphanumeric() || c == '+' || c == '#')
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Cleans a raw span into a display name: edge punctuation trimmed, inner
/// whitespace collapsed, a trailing lowercase plural singularised. Acronyms
/// and technical spellings are left as written.
pub fn normalize_skill_name(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let leading_dot = collapsed.starts_with('.') && collapsed.len() > 1;
    let trimmed = collapsed.trim_matches(is_edge_junk);
    let mut name = if leading_dot {
        format!(".{trimmed}")
    } else {
        trimmed.to_string()
    };
    // possessive
    if let Some(stripped) = name.strip_suffix("'s") {
        name = stripped.to_string();
    }

    let words: Vec<&str> = name.split(' ').collect();
    if words.len() > 1 {
        if let Some(last) = words.last() {
            let lowercase_word = last.chars().all(|c| c.is_ascii_lowercase());
            if lowercase_word && !looks_technical(last) {
                let lemma = noun_lemma(last);
                let mut rebuilt: Vec<&str> = words[..words.len() - 1].to_vec();
                rebuilt.push(&lemma);
                return rebuilt.join(" ");
            }
        }
    }
    name
}

fn fold_synonym(key: &str) -> String {
    SYNONYMS
        .iter()
        .find(|(from, _)| *from == key)
        .map(|(_, to)| (*to).to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Key under which near-identical skills are merged: lowercase, synonyms
/// folded, " framework"/".js"/".py" stripped, plural head singularised, then
/// folded again.
pub fn dedup_key(name: &str) -> String {
    let mut key = fold_synonym(&collapse_whitespace(&name.to_lowercase()));
    for suffix in STRIPPED_SUFFIXES {
        if let Some(stripped) = key.strip_suffix(suffix) {
            if !stripped.is_empty() {
                key = stripped.to_string();
                break;
            }
        }
    }
    let mut words: Vec<String> = key.split(' ').map(str::to_string).collect();
    if words.len() > 1 {
        if let Some(last) = words.last_mut() {
            *last = noun_lemma(last);
        }
    }
    fold_synonym(&words.join(" "))
}
