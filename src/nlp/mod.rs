// src/nlp/mod.rs
pub mod embedding;
pub mod model;
pub mod resources;
pub mod tokenizer;

pub use embedding::{cosine, EmbeddingBackend, NgramEmbedder};
pub use model::{ChunkSpan, EntityLabel, EntitySpan, LanguageModel, RuleBasedModel, TokenizedText};
pub use resources::NlpResources;
pub use tokenizer::{PosTag, Token};
