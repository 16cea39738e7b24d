// src/nlp/model.rs
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::tokenizer::{self, in_list, PosTag, Token, ADJECTIVES};
use crate::config::Lexicon;
use crate::utils::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Product,
    Org,
    Gpe,
    Misc,
}

impl EntityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Product => "PRODUCT",
            EntityLabel::Org => "ORG",
            EntityLabel::Gpe => "GPE",
            EntityLabel::Misc => "MISC",
        }
    }
}

/// A labelled span; `token_start..token_end` indexes `TokenizedText::tokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
    pub token_start: usize,
    pub token_end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub token_start: usize,
    pub token_end: usize,
}

impl ChunkSpan {
    pub fn tokens<'a>(&self, analysed: &'a TokenizedText) -> &'a [Token] {
        &analysed.tokens[self.token_start..self.token_end]
    }
}

/// Output of a [`LanguageModel`]. Offsets are byte offsets into the text that
/// was analysed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenizedText {
    pub tokens: Vec<Token>,
    pub entities: Vec<EntitySpan>,
    pub noun_chunks: Vec<ChunkSpan>,
}

/// Tokenizer, tagger and entity recognizer behind one call.
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;
    fn analyze(&self, text: &str) -> Result<TokenizedText, ExtractError>;
}

// --- Gazetteers ---

const LOCATIONS: &[&str] = &[
    "new york", "new york city", "san francisco", "los angeles", "san diego", "san jose",
    "bay area", "seattle", "boston", "chicago", "austin", "denver", "atlanta", "miami",
    "dallas", "houston", "portland", "washington", "california", "texas", "florida",
    "united states", "united kingdom", "north america", "europe", "emea", "apac", "canada",
    "germany", "france", "india", "ireland", "netherlands", "spain", "poland", "brazil",
    "mexico", "australia", "singapore", "japan", "london", "berlin", "paris", "dublin",
    "amsterdam", "toronto", "vancouver", "bangalore", "remote us", "usa",
];

const ORGANIZATIONS: &[&str] = &[
    "google", "microsoft", "amazon", "apple", "meta", "facebook", "netflix", "ibm",
    "salesforce", "stripe", "uber", "airbnb", "linkedin", "twitter", "nvidia", "intel",
    "adobe", "spotify", "shopify", "atlassian",
];

const ORG_SUFFIXES: &[&str] = &[
    "inc", "inc.", "corp", "corp.", "corporation", "llc", "ltd", "ltd.", "labs", "group",
    "company", "co.", "gmbh", "foundation", "university",
];

/// Words stripped from the front of entity runs and noun chunks.
pub const LEADING_QUALIFIERS: &[&str] = &[
    "experience", "knowledge", "understanding", "proficiency", "familiarity", "background",
    "expertise", "ability", "skills", "skill", "excellent", "exceptional", "outstanding",
    "proven", "demonstrated", "hands-on", "working", "practical", "extensive", "minimum",
];

pub fn is_leading_qualifier(lower: &str) -> bool {
    in_list(LEADING_QUALIFIERS, lower) || in_list(ADJECTIVES, lower)
}

/// Entity runs longer than this are treated as title-cased prose.
const MAX_ENTITY_TOKENS: usize = 4;
const MAX_CHUNK_TOKENS: usize = 4;

/// Heuristic model: rule-based tagging, capitalized-run entities with a
/// gazetteer, and content-word noun chunks.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedModel {
    products: BTreeSet<String>,
}

impl RuleBasedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the product gazetteer with every lexicon spelling.
    pub fn from_lexicon(lexicon: &Lexicon) -> Self {
        let products = lexicon
            .surface_forms()
            .into_iter()
            .map(|(surface, _)| surface.to_lowercase())
            .collect();
        Self { products }
    }

    pub fn with_products<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.products
            .extend(names.into_iter().map(|n| n.as_ref().to_lowercase()));
        self
    }

    fn is_entity_token(token: &Token) -> bool {
        token.pos == PosTag::ProperNoun
    }

    fn label_run(&self, run: &[Token], phrase_lower: &str, sentence_initial: bool) -> Option<EntityLabel> {
        if self.products.contains(phrase_lower)
            || run.iter().any(|t| self.products.contains(&t.lower) || t.is_technical())
        {
            return Some(EntityLabel::Product);
        }
        if in_list(ORGANIZATIONS, phrase_lower)
            || run.last().is_some_and(|t| in_list(ORG_SUFFIXES, &t.lower))
        {
            return Some(EntityLabel::Org);
        }
        // A lone capital at a sentence start is ordinary prose.
        if run.len() == 1 && sentence_initial {
            return None;
        }
        Some(EntityLabel::Org)
    }

    fn entities(&self, text: &str, tokens: &[Token]) -> Vec<EntitySpan> {
        let mut entities = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if !Self::is_entity_token(&tokens[i]) {
                i += 1;
                continue;
            }
            let mut j = i + 1;
            while j < tokens.len()
                && Self::is_entity_token(&tokens[j])
                && tokens[j].sentence_idx == tokens[i].sentence_idx
                && is_plain_gap(text, tokens[j - 1].end, tokens[j].start)
            {
                j += 1;
            }

            let sentence_initial = i == 0 || tokens[i - 1].sentence_idx != tokens[i].sentence_idx;
            let full = text[tokens[i].start..tokens[j - 1].end].to_string();
            let full_lower = full.to_lowercase();

            if in_list(LOCATIONS, &full_lower) {
                entities.push(span(&full, EntityLabel::Gpe, tokens, i, j));
            } else {
                let mut start = i;
                while start < j && is_leading_qualifier(&tokens[start].lower) && !tokens[start].is_technical() {
                    start += 1;
                }
                let len = j - start;
                if len > 0 && len <= MAX_ENTITY_TOKENS {
                    let phrase = &text[tokens[start].start..tokens[j - 1].end];
                    let initial = sentence_initial && start == i;
                    if let Some(label) = self.label_run(&tokens[start..j], &phrase.to_lowercase(), initial) {
                        entities.push(span(phrase, label, tokens, start, j));
                    }
                } else if len > MAX_ENTITY_TOKENS {
                    trace!("Skipping {}-token capitalized run '{}'", len, full);
                }
            }
            i = j;
        }
        entities
    }

    fn noun_chunks(&self, text: &str, tokens: &[Token]) -> Vec<ChunkSpan> {
        let mut chunks = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if !tokens[i].pos.is_content() {
                i += 1;
                continue;
            }
            let mut j = i + 1;
            while j < tokens.len()
                && tokens[j].pos.is_content()
                && tokens[j].sentence_idx == tokens[i].sentence_idx
                && is_plain_gap(text, tokens[j - 1].end, tokens[j].start)
            {
                j += 1;
            }
            let next = j;

            let mut start = i;
            while start < j && is_leading_qualifier(&tokens[start].lower) && !tokens[start].is_technical() {
                start += 1;
            }
            // phrase heads are nominal
            while j > start && matches!(tokens[j - 1].pos, PosTag::Adjective | PosTag::Participle) {
                j -= 1;
            }
            if j - start > MAX_CHUNK_TOKENS {
                start = j - MAX_CHUNK_TOKENS;
            }
            if j > start {
                chunks.push(ChunkSpan {
                    text: text[tokens[start].start..tokens[j - 1].end].to_string(),
                    start: tokens[start].start,
                    end: tokens[j - 1].end,
                    token_start: start,
                    token_end: j,
                });
            }
            i = next;
        }
        chunks
    }
}

fn is_plain_gap(text: &str, from: usize, to: usize) -> bool {
    text[from..to].chars().all(|c| c == ' ' || c == '\t')
}

fn span(phrase: &str, label: EntityLabel, tokens: &[Token], from: usize, to: usize) -> EntitySpan {
    EntitySpan {
        text: phrase.to_string(),
        label,
        start: tokens[from].start,
        end: tokens[to - 1].end,
        token_start: from,
        token_end: to,
    }
}

impl LanguageModel for RuleBasedModel {
    fn name(&self) -> &str {
        "rule_based"
    }

    fn analyze(&self, text: &str) -> Result<TokenizedText, ExtractError> {
        let tokens = tokenizer::tokenize(text);
        let entities = self.entities(text, &tokens);
        let noun_chunks = self.noun_chunks(text, &tokens);
        trace!(
            "Analysed {} bytes: {} tokens, {} entities, {} chunks",
            text.len(),
            tokens.len(),
            entities.len(),
            noun_chunks.len()
        );
        Ok(TokenizedText {
            tokens,
            entities,
            noun_chunks,
        })
    }
}
