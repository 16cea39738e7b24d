// src/main.rs
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use skill_extractor::config::{ConfigOverrides, ExtractorConfig};
use skill_extractor::extractors::ExtractionMethod;
use skill_extractor::nlp::NlpResources;
use skill_extractor::pipeline::{ExtractionResult, SkillExtractor};
use skill_extractor::storage::{JsonFileStore, SkillStore};
use skill_extractor::utils::{self, AppError};

/// Extracts categorised, scored skills from job postings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Posting files: plain text, HTML, or JSON with job_description/job_summary fields
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Job summary applied to every non-JSON posting
    #[arg(short, long)]
    summary: Option<String>,

    /// Use the baseline preset (general lexicon, formula scoring)
    #[arg(long)]
    baseline: bool,

    /// Disable a strategy (lexicon, ner, noun_chunk, pattern, semantic); repeatable
    #[arg(long = "disable", value_name = "METHOD")]
    disabled: Vec<ExtractionMethod>,

    /// Minimum confidence for a skill to be reported
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Maximum skills per category before overflow rules apply
    #[arg(long)]
    max_per_category: Option<usize>,

    /// TOML file with config overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Store results as JSON under this directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enrichment run id used in stored file names
    #[arg(long, default_value = "cli")]
    enrichment_id: String,

    /// Save annotated HTML of each description for debugging
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Debug-level logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostingFile {
    id: Option<String>,
    job_summary: Option<String>,
    job_description: String,
}

struct Posting {
    id: String,
    summary: String,
    description: String,
}

#[derive(Serialize)]
struct PostingOutput {
    source: String,
    job_posting_id: String,
    #[serde(flatten)]
    result: ExtractionResult,
}

fn env_value<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => {
            tracing::debug!("Using {}={} from the environment", name, raw);
            Some(value)
        }
        Err(_) => {
            tracing::warn!("Ignoring unparseable {}={}", name, raw);
            None
        }
    }
}

/// Preset, then TOML overrides, then environment, then flags.
fn build_config(args: &Args) -> Result<ExtractorConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => {
            let overrides = ConfigOverrides::load(path)?;
            let mut base = overrides.base_config();
            if args.baseline {
                base = ExtractorConfig::baseline();
            }
            overrides.apply(base)
        }
        None if args.baseline => ExtractorConfig::baseline(),
        None => ExtractorConfig::enhanced(),
    };

    if let Some(threshold) = env_value::<f32>("SKILLS_CONFIDENCE_THRESHOLD") {
        config.confidence_threshold = threshold;
    }
    if let Some(max) = env_value::<usize>("SKILLS_MAX_PER_CATEGORY") {
        config.max_skills_per_category = max;
    }

    if let Some(threshold) = args.threshold {
        config.confidence_threshold = threshold;
    }
    if let Some(max) = args.max_per_category {
        config.max_skills_per_category = max;
    }
    for method in &args.disabled {
        tracing::debug!("Disabling strategy {} from the command line", method);
        config.enabled_strategies.set(*method, false);
    }
    Ok(config)
}

fn read_posting(path: &Path, summary: Option<&str>) -> Result<Posting, AppError> {
    let content = std::fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "posting".to_string());

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let file: PostingFile = serde_json::from_str(&content).map_err(|e| {
            AppError::Processing(format!("{} is not a posting JSON file: {}", path.display(), e))
        })?;
        return Ok(Posting {
            id: file.id.unwrap_or(stem),
            summary: file.job_summary.unwrap_or_default(),
            description: file.job_description,
        });
    }
    Ok(Posting {
        id: stem,
        summary: summary.unwrap_or_default().to_string(),
        description: content,
    })
}

fn process_file(
    path: &Path,
    args: &Args,
    extractor: &SkillExtractor,
    store: Option<&JsonFileStore>,
) -> Result<PostingOutput, AppError> {
    let posting = read_posting(path, args.summary.as_deref())?;
    tracing::info!("Processing {} ({} bytes)", path.display(), posting.description.len());

    let result = match store {
        Some(store) => extractor.extract_and_store(
            &posting.id,
            &args.enrichment_id,
            &posting.summary,
            &posting.description,
            store as &dyn SkillStore,
        )?,
        None => extractor.extract_skills(&posting.summary, &posting.description),
    };

    if let Some(debug_dir) = &args.debug_dir {
        let text = extractor.prepare_text(&posting.description);
        let saved = utils::html_debug::annotated_path(debug_dir, &posting.id)
            .and_then(|debug_path| utils::html_debug::save_debug_html(&debug_path, &text, &result.skills));
        if let Err(e) = saved {
            tracing::warn!("Failed to create debug HTML: {}", e);
        }
    }

    Ok(PostingOutput {
        source: path.display().to_string(),
        job_posting_id: posting.id,
        result,
    })
}

fn main() -> Result<(), AppError> {
    // 1. Parse CLI arguments, then logging (reads RUST_LOG)
    let args = Args::parse();
    utils::logging::setup_logging(if args.verbose { "debug" } else { "info" });
    tracing::info!("Starting skill extraction for {} files", args.files.len());

    // 2. Build config and shared resources once
    let config = build_config(&args)?;
    let resources = Arc::new(NlpResources::builtin(&config.lexicon));
    let extractor = SkillExtractor::new(config, resources)?;
    tracing::info!(
        "Mode: {}, strategies: {:?}",
        extractor.mode().as_str(),
        extractor.active_strategies()
    );

    // 3. Optional storage
    let store = match &args.output_dir {
        Some(dir) => {
            let store = JsonFileStore::new(dir)?;
            tracing::info!("Storing skills under {}", store.base_dir().display());
            Some(store)
        }
        None => None,
    };

    // 4. Process every file in parallel; order of output follows input
    let outcomes: Vec<(PathBuf, Result<PostingOutput, AppError>)> = args
        .files
        .par_iter()
        .map(|path| (path.clone(), process_file(path, &args, &extractor, store.as_ref())))
        .collect();

    let mut outputs = Vec::new();
    let mut failure_count = 0;
    for (path, outcome) in outcomes {
        match outcome {
            Ok(output) => outputs.push(output),
            Err(e) => {
                tracing::error!("Failed to process {}: {}", path.display(), e);
                failure_count += 1;
            }
        }
    }

    let json = serde_json::to_string_pretty(&outputs)
        .map_err(|e| AppError::Processing(format!("Could not serialize results: {e}")))?;
    println!("{json}");

    tracing::info!(
        "Processing finished. Success: {}, Failures: {}",
        outputs.len(),
        failure_count
    );
    if outputs.is_empty() && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to process any of {failure_count} files"
        )));
    }
    Ok(())
}
