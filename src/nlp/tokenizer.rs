// src/nlp/tokenizer.rs
//! Rule-based tokenizer and part-of-speech tagger.
//!
//! Good enough to find noun phrases and capitalized entity runs in job
//! postings; it is not a general-purpose English tagger.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Words keep internal `.`, `-`, `/`, `'`, `&` joints so "Node.js", "CI/CD",
// "full-time" and "R&D" stay whole. ".NET" style tokens get their own branch.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}+#]*(?:[.\-/'&][\p{L}\p{N}][\p{L}\p{N}+#]*)*|\.[A-Za-z]{2,}|\S")
        .expect("Failed to compile TOKEN_RE")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    Noun,
    ProperNoun,
    Verb,
    Gerund,
    Participle,
    Adjective,
    Adverb,
    Determiner,
    Pronoun,
    Preposition,
    Conjunction,
    Number,
    Punct,
    Other,
}

impl PosTag {
    /// Tags that may appear inside a noun phrase.
    pub fn is_content(self) -> bool {
        matches!(
            self,
            PosTag::Noun
                | PosTag::ProperNoun
                | PosTag::Adjective
                | PosTag::Gerund
                | PosTag::Participle
        )
    }

    pub fn is_verbal(self) -> bool {
        matches!(self, PosTag::Verb | PosTag::Gerund | PosTag::Participle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lower: String,
    pub lemma: String,
    pub pos: PosTag,
    /// Byte offsets into the analysed text.
    pub start: usize,
    pub end: usize,
    pub sentence_idx: usize,
}

impl Token {
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }

    pub fn is_technical(&self) -> bool {
        looks_technical(&self.text)
    }
}

pub const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "our", "your", "their", "its", "my",
    "his", "her", "some", "any", "all", "each", "every", "no", "another", "such", "both",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "we", "they", "he", "she", "it", "me", "us", "them", "him", "who", "whom",
    "which", "what", "whose", "yourself", "ourselves", "themselves", "everyone", "anyone",
    "someone",
];

const PREPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "over", "under", "across", "within", "without", "via", "per", "like", "including",
    "across", "around", "among", "toward", "towards", "upon", "as",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "so", "yet", "while", "whereas", "although", "because", "if",
    "than", "whether", "&",
];

const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "am", "will", "would", "can", "could",
    "shall", "should", "may", "might", "must", "do", "does", "did", "have", "has", "had",
];

const ADVERBS: &[&str] = &[
    "not", "very", "also", "well", "highly", "often", "daily", "weekly", "always", "never",
    "ideally", "preferably", "strongly", "closely", "quickly", "effectively", "independently",
    "together", "too", "more", "most", "less", "least", "just", "only", "even", "already",
    "still", "here", "there", "where", "when", "how", "why", "then", "now",
];

/// Adjectives common in postings; also used to demote sentence-initial capitals.
pub const ADJECTIVES: &[&str] = &[
    "strong", "excellent", "good", "great", "solid", "proven", "deep", "senior", "junior",
    "new", "large", "small", "complex", "scalable", "reliable", "robust", "modern", "fast",
    "high", "low", "hands-on", "advanced", "basic", "relevant", "related", "various",
    "multiple", "several", "other", "key", "core", "big", "real-time", "open", "native",
    "full", "best", "exceptional", "outstanding", "demonstrated", "previous", "prior",
    "current", "clean", "secure", "distributed", "cross-functional", "technical", "agile",
];

/// Base forms of verbs that drive skill categorization and gerund lemmas.
pub const KNOWN_VERBS: &[&str] = &[
    "manage", "lead", "direct", "supervise", "coordinate", "oversee", "own", "drive",
    "analyze", "analyse", "research", "evaluate", "assess", "investigate", "measure", "model",
    "communicate", "present", "write", "negotiate", "collaborate", "partner", "document",
    "develop", "build", "design", "implement", "program", "code", "engineer", "deploy",
    "configure", "automate", "maintain", "debug", "test", "optimize", "optimise", "integrate",
    "architect", "scale", "migrate", "monitor", "operate", "administer", "secure", "create",
    "plan", "organize", "organise", "schedule", "prioritize", "teach", "train", "mentor",
    "coach", "support", "assist", "help", "serve", "care", "sell", "market", "promote",
    "draw", "illustrate", "edit", "produce", "use", "work", "ship", "deliver", "run",
    "troubleshoot", "review", "process", "handle", "report", "forecast", "budget", "audit",
    "bring", "ensure", "provide", "join", "make", "take", "contribute", "solve", "improve",
    "define", "establish", "identify", "understand", "learn",
];

// Verbs that matter for tagging only; they never make a phrase skill-like.
const COMMON_VERBS: &[&str] = &[
    "want", "need", "seek", "require", "offer", "value", "expect", "enjoy", "love", "hire",
    "thrive", "welcome", "encourage", "believe", "know", "get", "give", "keep", "see", "find",
    "think", "feel", "look", "become", "stay", "grow", "apply",
];

// Lowercase words ending in -ing that are not gerunds.
const ING_NOUNS: &[&str] = &[
    "thing", "something", "nothing", "anything", "everything", "string", "strings", "morning",
    "evening", "ceiling", "spring", "king", "ring", "bring", "during", "sibling", "wing",
    "sing", "sting", "swing", "building", "meeting", "offering", "pricing", "funding",
    "onboarding", "tooling", "wellbeing", "clothing", "housing", "setting", "settings",
];

// Lowercase words ending in -ed that are not participles.
const ED_NOUNS: &[&str] = &[
    "need", "needed", "feed", "speed", "seed", "bed", "red", "shed", "indeed", "embed",
    "breed", "greed", "proceed", "succeed", "exceed", "hundred", "kindred",
];

// Lowercase words ending in -ly that are not adverbs.
const LY_NOUNS: &[&str] = &[
    "supply", "apply", "family", "assembly", "reply", "rally", "ally", "italy", "anomaly",
    "monopoly", "butterfly", "jelly", "belly", "bully", "early", "only", "friendly",
];

// Words ending in -s that are already singular.
const S_SINGULARS: &[&str] = &[
    "kubernetes", "analytics", "devops", "mlops", "aws", "sales", "ethics", "logistics",
    "statistics", "economics", "mathematics", "physics", "graphics", "news", "windows", "ios",
    "macos", "jenkins", "express", "sas", "less", "sass", "redis", "status", "process",
    "business", "access", "address", "success", "progress", "class", "css", "js", "apis",
    "gis", "ops", "this", "its", "his", "us", "plus", "bus", "campus", "focus", "bonus",
    "corpus", "census", "consensus", "basis", "analysis", "thesis", "axis", "series",
    "species", "chaos", "lens", "canvas", "atlas", "always", "was", "is", "has", "does",
    "various", "previous", "numerous", "serious", "continuous", "cross", "boss", "loss",
];

pub fn in_list(list: &[&str], word: &str) -> bool {
    list.contains(&word)
}

/// Shape test for technical tokens: "K8s", "JavaScript", "AWS", "Node.js",
/// "C++", ".NET", "APIs".
pub fn looks_technical(text: &str) -> bool {
    let has_alpha = text.chars().any(char::is_alphabetic);
    if !has_alpha {
        return false;
    }
    let lower = text.to_lowercase();
    if text.starts_with('.') && text.len() > 2 {
        return true;
    }
    if lower.ends_with(".js") || lower.ends_with(".net") || lower.ends_with(".py")
        || text.contains("++") || text.contains('#')
    {
        return true;
    }
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    if has_digit && text.len() >= 2 {
        return true;
    }
    let chars: Vec<char> = text.chars().collect();
    let upper_count = chars.iter().filter(|c| c.is_uppercase()).count();
    // acronyms, optionally pluralised: AWS, SQL, APIs
    let core: &[char] = if chars.len() > 2 && chars[chars.len() - 1] == 's' {
        &chars[..chars.len() - 1]
    } else {
        &chars[..]
    };
    if core.len() >= 2 && core.len() <= 6 && core.iter().all(|c| c.is_uppercase()) {
        return true;
    }
    // internal capital after a lowercase letter: JavaScript, iOS, PyTorch
    let camel = chars
        .windows(2)
        .any(|w| w[0].is_lowercase() && w[1].is_uppercase());
    camel && upper_count >= 1
}

/// Reduces a lowercase verb stem to a known base form when possible.
pub fn verb_lemma(stem: &str) -> String {
    if stem.is_empty() {
        return String::new();
    }
    if in_list(KNOWN_VERBS, stem) {
        return stem.to_string();
    }
    let with_e = format!("{stem}e");
    if in_list(KNOWN_VERBS, &with_e) {
        return with_e;
    }
    let mut tail = stem.char_indices().rev();
    if let (Some((last_at, last)), Some((_, before))) = (tail.next(), tail.next()) {
        if last == before {
            let undoubled = &stem[..last_at];
            if in_list(KNOWN_VERBS, undoubled) {
                return undoubled.to_string();
            }
        }
    }
    if let Some(base) = stem.strip_suffix('i') {
        let with_y = format!("{base}y");
        return with_y;
    }
    stem.to_string()
}

/// Singular form of a lowercase noun.
pub fn noun_lemma(lower: &str) -> String {
    if lower.len() <= 3 || in_list(S_SINGULARS, lower) || !lower.ends_with('s') {
        return lower.to_string();
    }
    if let Some(stem) = lower.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if lower.ends_with("sses") || lower.ends_with("xes") || lower.ends_with("ches")
        || lower.ends_with("shes")
    {
        return lower[..lower.len() - 2].to_string();
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return lower.to_string();
    }
    lower[..lower.len() - 1].to_string()
}

fn has_adjective_suffix(lower: &str) -> bool {
    lower.len() > 5
        && ["al", "ive", "ous", "ful", "able", "ible", "ic", "less"]
            .iter()
            .any(|s| lower.ends_with(s))
}

fn is_number(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '+' | '%' | '$' | '-' | 'k' | 'K'))
}

fn closed_class(lower: &str) -> Option<PosTag> {
    if in_list(DETERMINERS, lower) {
        Some(PosTag::Determiner)
    } else if in_list(PRONOUNS, lower) {
        Some(PosTag::Pronoun)
    } else if in_list(PREPOSITIONS, lower) {
        Some(PosTag::Preposition)
    } else if in_list(CONJUNCTIONS, lower) {
        Some(PosTag::Conjunction)
    } else if in_list(AUXILIARIES, lower) {
        Some(PosTag::Verb)
    } else if in_list(ADVERBS, lower) {
        Some(PosTag::Adverb)
    } else {
        None
    }
}

fn verbal_form(lower: &str) -> Option<(PosTag, String)> {
    if lower.len() >= 5 && lower.ends_with("ing") && !in_list(ING_NOUNS, lower) {
        return Some((PosTag::Gerund, verb_lemma(&lower[..lower.len() - 3])));
    }
    if lower.len() >= 5 && lower.ends_with("ed") && !in_list(ED_NOUNS, lower) {
        return Some((PosTag::Participle, verb_lemma(&lower[..lower.len() - 2])));
    }
    None
}

/// Splits `text` into tagged tokens with sentence indices.
pub fn tokenize(text: &str) -> Vec<Token> {
    // Pass 1: raw spans and sentence boundaries.
    let mut spans: Vec<(usize, usize, usize)> = Vec::new();
    let mut sentence_idx = 0;
    let mut last_end = 0;
    for m in TOKEN_RE.find_iter(text) {
        if !spans.is_empty() && text[last_end..m.start()].contains('\n') {
            sentence_idx += 1;
        }
        spans.push((m.start(), m.end(), sentence_idx));
        if matches!(m.as_str(), "." | "!" | "?" | ";" | ":") {
            sentence_idx += 1;
        }
        last_end = m.end();
    }

    // Pass 2: tags, which look at neighbours.
    let mut tokens: Vec<Token> = Vec::with_capacity(spans.len());
    for (i, &(start, end, sent)) in spans.iter().enumerate() {
        let word = &text[start..end];
        let lower = word.to_lowercase();
        let prev = tokens.last().filter(|t| t.sentence_idx == sent);
        // bullets and brackets don't count: "- Build APIs" starts a sentence
        let sentence_initial = !tokens
            .iter()
            .rev()
            .take_while(|t| t.sentence_idx == sent)
            .any(|t| t.pos != PosTag::Punct);
        let next_is_capitalized = spans
            .get(i + 1)
            .filter(|(_, _, s)| *s == sent)
            .and_then(|(s, e, _)| text[*s..*e].chars().next())
            .is_some_and(char::is_uppercase);

        let (pos, lemma) = tag_word(word, &lower, sentence_initial, next_is_capitalized, prev);
        tokens.push(Token {
            text: word.to_string(),
            lower,
            lemma,
            pos,
            start,
            end,
            sentence_idx: sent,
        });
    }
    tokens
}

fn is_verb_word(lower: &str) -> bool {
    in_list(KNOWN_VERBS, lower) || in_list(COMMON_VERBS, lower)
}

// Whether a verb-or-noun word after `prev` reads as a verb.
fn verbal_context(prev: Option<&Token>) -> bool {
    match prev {
        None => true,
        Some(t) => {
            matches!(
                t.pos,
                PosTag::Pronoun | PosTag::Conjunction | PosTag::Adverb | PosTag::Punct
            ) || in_list(AUXILIARIES, &t.lower)
                || t.lower == "to"
        }
    }
}

fn tag_word(
    word: &str,
    lower: &str,
    sentence_initial: bool,
    next_is_capitalized: bool,
    prev: Option<&Token>,
) -> (PosTag, String) {
    if !word.chars().any(char::is_alphanumeric) {
        return (PosTag::Punct, lower.to_string());
    }
    if is_number(word) {
        return (PosTag::Number, lower.to_string());
    }

    let capitalized = word.chars().next().is_some_and(char::is_uppercase);
    let technical = looks_technical(word);

    if technical {
        return (PosTag::ProperNoun, lower.to_string());
    }
    if capitalized && !sentence_initial {
        return (PosTag::ProperNoun, lower.to_string());
    }
    if capitalized && is_verb_word(lower) && verbal_context(prev) {
        return (PosTag::Verb, lower.to_string());
    }
    if capitalized && next_is_capitalized && !in_list(DETERMINERS, lower)
        && closed_class(lower).is_none()
    {
        // start of a multi-word name: "Senior Python Developer", "New York"
        return (PosTag::ProperNoun, lower.to_string());
    }

    if let Some(tag) = closed_class(lower) {
        return (tag, lower.to_string());
    }
    if lower.len() > 4 && lower.ends_with("ly") && !in_list(LY_NOUNS, lower) {
        return (PosTag::Adverb, lower.to_string());
    }
    if let Some((tag, lemma)) = verbal_form(lower) {
        return (tag, lemma);
    }
    if in_list(ADJECTIVES, lower) || has_adjective_suffix(lower) {
        return (PosTag::Adjective, lower.to_string());
    }
    if is_verb_word(lower) {
        let pos = if verbal_context(prev) { PosTag::Verb } else { PosTag::Noun };
        return (pos, lower.to_string());
    }
    if capitalized {
        return (PosTag::ProperNoun, lower.to_string());
    }
    (PosTag::Noun, noun_lemma(lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(text: &str) -> Vec<(String, PosTag)> {
        tokenize(text).into_iter().map(|t| (t.text, t.pos)).collect()
    }

    #[test]
    fn keeps_technical_tokens_whole() {
        let words: Vec<String> = tokenize("Node.js, C++, C#, CI/CD and .NET on full-time basis.")
            .into_iter()
            .map(|t| t.text)
            .collect();
        for expected in ["Node.js", "C++", "C#", "CI/CD", ".NET", "full-time"] {
            assert!(words.contains(&expected.to_string()), "missing {expected} in {words:?}");
        }
        assert_eq!(words.last().unwrap(), ".");
    }

    #[test]
    fn verb_lemma_handles_multibyte_stems() {
        assert_eq!(verb_lemma("co₂"), "co₂");
        assert_eq!(verb_lemma("ü₂₂"), "ü₂₂");
        assert_eq!(verb_lemma("plann"), "plan");
        let tokens = tokenize("CO₂ed emissions");
        assert_eq!(tokens[0].text, "CO₂ed");
    }

    #[test]
    fn offsets_point_into_text() {
        let text = "Build  APIs\nwith Go.";
        for token in tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn sentences_split_on_punctuation_and_newlines() {
        let tokens = tokenize("Python. Rust\nGo");
        let sentences: Vec<usize> = tokens.iter().map(|t| t.sentence_idx).collect();
        assert_eq!(sentences, vec![0, 0, 1, 2]);
    }

    #[test]
    fn tags_gerunds_and_lemmas() {
        let tokens = tokenize("We are managing teams and analyzing data");
        let managing = tokens.iter().find(|t| t.text == "managing").unwrap();
        assert_eq!(managing.pos, PosTag::Gerund);
        assert_eq!(managing.lemma, "manage");
        let analyzing = tokens.iter().find(|t| t.text == "analyzing").unwrap();
        assert_eq!(analyzing.lemma, "analyze");
        let teams = tokens.iter().find(|t| t.text == "teams").unwrap();
        assert_eq!(teams.lemma, "team");
    }

    #[test]
    fn sentence_initial_adjective_is_not_a_name() {
        let t = tags("Strong communication skills");
        assert_eq!(t[0].1, PosTag::Adjective);
        let t = tags("Senior Python Developer");
        assert!(t.iter().all(|(_, p)| *p == PosTag::ProperNoun));
    }

    #[test]
    fn verb_after_adjective_reads_as_noun() {
        let t = tags("We value system design and build tools");
        let design = t.iter().find(|(w, _)| w == "design").unwrap();
        assert_eq!(design.1, PosTag::Noun);
        let build = t.iter().find(|(w, _)| w == "build").unwrap();
        assert_eq!(build.1, PosTag::Verb);
    }

    #[test]
    fn technical_shapes() {
        for word in ["K8s", "JavaScript", "AWS", "APIs", "Node.js", "C++", ".NET", "iOS"] {
            assert!(looks_technical(word), "{word} should look technical");
        }
        for word in ["Python", "New", "York", "5+", "I"] {
            assert!(!looks_technical(word), "{word} should not look technical");
        }
    }

    #[test]
    fn noun_lemmas_respect_singular_exceptions() {
        assert_eq!(noun_lemma("kubernetes"), "kubernetes");
        assert_eq!(noun_lemma("pipelines"), "pipeline");
        assert_eq!(noun_lemma("technologies"), "technology");
        assert_eq!(noun_lemma("analysis"), "analysis");
        assert_eq!(noun_lemma("processes"), "process");
    }
}
