// src/lib.rs
//! Skill extraction for job postings: section-aware, multi-strategy, with
//! confidence scoring, deduplication and per-category caps.
//!
//! ```no_run
//! use std::sync::Arc;
//! use skill_extractor::config::ExtractorConfig;
//! use skill_extractor::nlp::NlpResources;
//! use skill_extractor::pipeline::SkillExtractor;
//!
//! let config = ExtractorConfig::enhanced();
//! let resources = Arc::new(NlpResources::builtin(&config.lexicon));
//! let extractor = SkillExtractor::new(config, resources).unwrap();
//! let result = extractor.extract_skills("", "Requirements: Rust and PostgreSQL");
//! println!("{:?}", result.skill_names());
//! ```

pub mod config;
pub mod dedup;
pub mod extractors;
pub mod filters;
pub mod nlp;
pub mod pipeline;
pub mod scoring;
pub mod sections;
pub mod storage;
pub mod text;
pub mod utils;

pub use config::ExtractorConfig;
pub use pipeline::{ExtractedSkill, ExtractionResult, SkillExtractor};
pub use utils::AppError;
