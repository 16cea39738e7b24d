// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::ExtractedSkill;
use crate::utils::error::StorageError;

/// Where extracted skills go. Failures are returned to the caller; nothing
/// here retries.
pub trait SkillStore: Send + Sync {
    fn store_skills(
        &self,
        job_posting_id: &str,
        enrichment_id: &str,
        skills: &[ExtractedSkill],
    ) -> Result<(), StorageError>;
}

/// Writes one JSON file of skills plus a metadata file per posting and
/// enrichment run.
pub struct JsonFileStore {
    base_dir: PathBuf,
}

/// Rejects keys that would escape their directory when joined onto a path.
pub fn check_key(kind: &str, key: &str) -> Result<(), StorageError> {
    let bad = key.trim().is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\'])
        || key.contains('\0');
    if bad {
        return Err(StorageError::InvalidKey(format!("{kind} '{key}'")));
    }
    Ok(())
}

impl JsonFileStore {
    /// Creates the base directory if it doesn't exist.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `<base>/<job_posting_id>/<enrichment_id>_skills.json`
    pub fn skills_path(&self, job_posting_id: &str, enrichment_id: &str) -> PathBuf {
        self.base_dir
            .join(job_posting_id)
            .join(format!("{enrichment_id}_skills.json"))
    }

    pub fn metadata_path(&self, job_posting_id: &str, enrichment_id: &str) -> PathBuf {
        self.base_dir
            .join(job_posting_id)
            .join(format!("{enrichment_id}_skills_meta.json"))
    }

    /// Reads back a stored skill list.
    pub fn load_skills(
        &self,
        job_posting_id: &str,
        enrichment_id: &str,
    ) -> Result<Vec<ExtractedSkill>, StorageError> {
        check_key("job posting id", job_posting_id)?;
        check_key("enrichment id", enrichment_id)?;
        let content = fs::read_to_string(self.skills_path(job_posting_id, enrichment_id))?;
        serde_json::from_str(&content).map_err(|e| StorageError::SerializationError(e.to_string()))
    }
}

impl SkillStore for JsonFileStore {
    fn store_skills(
        &self,
        job_posting_id: &str,
        enrichment_id: &str,
        skills: &[ExtractedSkill],
    ) -> Result<(), StorageError> {
        check_key("job posting id", job_posting_id)?;
        check_key("enrichment id", enrichment_id)?;

        let target_dir = self.base_dir.join(job_posting_id);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir)?;
        }

        let skills_path = self.skills_path(job_posting_id, enrichment_id);
        let skills_json = serde_json::to_string_pretty(skills)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&skills_path, skills_json)?;
        tracing::info!("Saved {} skills to {}", skills.len(), skills_path.display());

        let mut categories: Vec<&str> = skills.iter().map(|s| s.skill_category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        let metadata = serde_json::json!({
            "job_posting_id": job_posting_id,
            "enrichment_id": enrichment_id,
            "skill_count": skills.len(),
            "categories": categories,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });
        let metadata_path = self.metadata_path(job_posting_id, enrichment_id);
        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&metadata_path, metadata_str)?;
        tracing::debug!("Saved metadata to {}", metadata_path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ExtractionMethod;

    fn skill(name: &str) -> ExtractedSkill {
        ExtractedSkill {
            skill_name: name.into(),
            skill_category: "programming_languages".into(),
            confidence_score: 0.9,
            extraction_method: ExtractionMethod::Lexicon,
            context_snippet: format!("experience with {name}"),
            alternate_names: None,
            dedupe_count: Some(2),
            category_overflow: false,
            source_field: "job_description".into(),
            start_offset: 16,
            end_offset: 16 + name.len(),
        }
    }

    #[test]
    fn writes_skills_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("out")).unwrap();
        let skills = vec![skill("Rust"), skill("Go")];
        store.store_skills("job-42", "run1", &skills).unwrap();

        assert!(dir.path().join("out/job-42/run1_skills.json").exists());
        assert_eq!(store.load_skills("job-42", "run1").unwrap(), skills);

        let meta: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(store.metadata_path("job-42", "run1")).unwrap(),
        )
        .unwrap();
        assert_eq!(meta["skill_count"], 2);
        let timestamp = meta["extraction_timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        for key in ["../escape", "a/b", "", ".."] {
            assert!(matches!(
                store.store_skills(key, "run1", &[]),
                Err(StorageError::InvalidKey(_))
            ));
        }
        assert!(matches!(
            store.store_skills("job", "x\\y", &[]),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
