// src/text/markup.rs
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{node::Node, ElementRef, Html};

// Something that looks like a real tag, so "x < 5 > y" is left alone.
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?[a-z][a-z0-9]*(?:\s[^<>]*)?/?>|<!--")
        .expect("Failed to compile TAG_RE")
});

static INLINE_WS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").expect("Failed to compile INLINE_WS_RE"));

static BLANK_LINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("Failed to compile BLANK_LINES_RE"));

// --- Concatenation repair ---
// "managementSkills" -> "management Skills". Words that start uppercase
// (JavaScript, PostgreSQL) are product spellings and stay intact.
static GLUED_WORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([a-z]{3,})([A-Z][a-z]{2,})\b").expect("Failed to compile GLUED_WORDS_RE")
});
static GLUED_COMMA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-z\)]),([A-Za-z])").expect("Failed to compile GLUED_COMMA_RE")
});

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "ul", "ol", "table", "tr", "h1",
    "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "dl", "dt", "dd", "hr", "main",
];
const SKIPPED_TAGS: &[&str] = &["script", "style", "head", "noscript", "template"];

pub fn contains_markup(text: &str) -> bool {
    TAG_RE.is_match(text)
}

/// Converts HTML to plain text with one line per block element. List items
/// become "- " bullets so the section splitter can count them. Input without
/// tags is returned with whitespace tidied but otherwise untouched.
pub fn strip_markup(raw: &str) -> String {
    if !contains_markup(raw) {
        return tidy_whitespace(raw);
    }
    let fragment = Html::parse_fragment(raw);
    let mut out = String::with_capacity(raw.len());
    walk(fragment.root_element(), &mut out);
    tracing::trace!("Stripped markup: {} -> {} bytes", raw.len(), out.len());
    tidy_whitespace(&out)
}

fn push_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn walk(element: ElementRef, out: &mut String) {
    let name = element.value().name();
    if SKIPPED_TAGS.contains(&name) {
        return;
    }
    let is_block = BLOCK_TAGS.contains(&name);
    match name {
        "li" => {
            push_break(out);
            out.push_str("- ");
        }
        "br" => out.push('\n'),
        _ if is_block => push_break(out),
        _ => {}
    }
    // headers become title lines the splitter recognises
    let is_heading = matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6");
    if is_heading {
        out.push_str("## ");
    }

    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            walk(child_el, out);
        } else if let Node::Text(text_node) = child.value() {
            // source newlines inside text carry no meaning in HTML
            let text: &str = &text_node.text;
            out.push_str(&text.replace(['\n', '\r'], " "));
        }
    }

    if is_block || name == "li" {
        push_break(out);
    }
}

fn tidy_whitespace(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = normalized
        .lines()
        .map(|line| INLINE_WS_RE.replace_all(line.trim(), " ").into_owned())
        .collect();
    let joined = lines.join("\n");
    BLANK_LINES_RE
        .replace_all(joined.trim(), "\n\n")
        .into_owned()
}

/// Splits words that lost their separating space or comma.
pub fn repair_concatenations(text: &str) -> String {
    let spaced = GLUED_WORDS_RE.replace_all(text, "$1 $2");
    GLUED_COMMA_RE.replace_all(&spaced, "$1, $2").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_parsed() {
        let text = "Use C++ where x < 5 > y\n\n\n\nthen  stop";
        assert!(!contains_markup(text));
        assert_eq!(strip_markup(text), "Use C++ where x < 5 > y\n\nthen stop");
    }

    #[test]
    fn lists_become_bullets() {
        let html = "<h2>Requirements</h2><ul><li>Python</li><li>Docker &amp; Kubernetes</li></ul>";
        let text = strip_markup(html);
        assert_eq!(text, "## Requirements\n- Python\n- Docker & Kubernetes");
    }

    #[test]
    fn scripts_and_styles_are_dropped() {
        let html = "<p>Rust</p><script>var x = 1;</script><style>p{}</style><p>Go<br>Java</p>";
        assert_eq!(strip_markup(html), "Rust\nGo\nJava");
    }

    #[test]
    fn inline_tags_do_not_break_lines() {
        let html = "<p>Experience with <b>Terraform</b> and\n<em>Ansible</em></p>";
        assert_eq!(strip_markup(html), "Experience with Terraform and Ansible");
    }

    #[test]
    fn repairs_glued_words() {
        assert_eq!(
            repair_concatenations("strong communicationSkills,Python and JavaScript"),
            "strong communication Skills, Python and JavaScript"
        );
        assert_eq!(repair_concatenations("PostgreSQL, iOS"), "PostgreSQL, iOS");
    }
}
