// src/nlp/embedding.rs
use std::hash::Hasher;

use twox_hash::XxHash64;

use crate::utils::error::ExtractError;

/// Turns short phrases into dense vectors. Implementations must be
/// deterministic for a given input.
pub trait EmbeddingBackend: Send + Sync {
    fn name(&self) -> &str;

    fn dimensions(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, ExtractError>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ExtractError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Hashed character n-gram embedder. Approximate, but cheap and stable:
/// "data pipeline" lands close to "Data Pipelines", "k8s" does not land near
/// "Kubernetes" (the alias table covers that).
#[derive(Debug, Clone)]
pub struct NgramEmbedder {
    dimensions: usize,
    n: usize,
    seed: u64,
}

impl Default for NgramEmbedder {
    fn default() -> Self {
        Self {
            dimensions: 512,
            n: 3,
            seed: 0x5eed,
        }
    }
}

impl NgramEmbedder {
    pub fn new(dimensions: usize, n: usize) -> Result<Self, ExtractError> {
        if dimensions == 0 || n == 0 {
            return Err(ExtractError::Embedding(format!(
                "dimensions and n must be positive (got {dimensions}, {n})"
            )));
        }
        Ok(Self {
            dimensions,
            n,
            ..Self::default()
        })
    }

    fn bucket(&self, gram: &str) -> usize {
        let mut hasher = XxHash64::with_seed(self.seed);
        hasher.write(gram.as_bytes());
        (hasher.finish() % self.dimensions as u64) as usize
    }
}

impl EmbeddingBackend for NgramEmbedder {
    fn name(&self) -> &str {
        "char_ngram"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, ExtractError> {
        let mut vector = vec![0.0f32; self.dimensions];
        let normalized = text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if normalized.is_empty() {
            return Ok(vector);
        }
        let padded: Vec<char> = format!(" {normalized} ").chars().collect();
        if padded.len() < self.n {
            let idx = self.bucket(&normalized);
            vector[idx] += 1.0;
        } else {
            for window in padded.windows(self.n) {
                let gram: String = window.iter().collect();
                let idx = self.bucket(&gram);
                vector[idx] += 1.0;
            }
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in vector.iter_mut() {
                *v /= norm;
            }
        }
        Ok(vector)
    }
}

/// Cosine similarity clamped to [0, 1]; zero vectors and length mismatches
/// score 0.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
