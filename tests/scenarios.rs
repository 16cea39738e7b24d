// tests/scenarios.rs
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use skill_extractor::config::ExtractorConfig;
use skill_extractor::extractors::ExtractionMethod;
use skill_extractor::nlp::NlpResources;
use skill_extractor::pipeline::{Mode, SkillExtractor};
use skill_extractor::text::dedup_key;

fn engine(config: ExtractorConfig) -> SkillExtractor {
    let resources = Arc::new(NlpResources::builtin(&config.lexicon));
    SkillExtractor::new(config, resources).expect("valid config")
}

fn names(result: &skill_extractor::ExtractionResult) -> BTreeSet<String> {
    result.skills.iter().map(|s| s.skill_name.clone()).collect()
}

const POSTING_HTML: &str = r#"
<h1>Backend Engineer</h1>
<p>We are a small team building logistics software for hospitals.</p>
<h2>Responsibilities</h2>
<ul>
  <li>Design and maintain REST APIs in Rust and Go</li>
  <li>Own our PostgreSQL and Redis data layer</li>
  <li>Run services on Kubernetes (K8s) with Terraform</li>
</ul>
<h2>Requirements</h2>
<ul>
  <li>5+ years of experience with Python or Java</li>
  <li>Strong knowledge of Docker and AWS</li>
  <li>Experience with CI/CD pipelines and GitHub Actions</li>
  <li>Kafka is a plus</li>
</ul>
<h2>Benefits</h2>
<p>Competitive salary, health insurance and a yearly learning budget.</p>
"#;

#[test]
fn scenario_a_exact_skill_set() {
    let extractor = engine(ExtractorConfig::enhanced());
    let result = extractor.extract_skills(
        "",
        "Senior Python Developer. Requirements: 5+ years Python, experience with Kubernetes, Docker, and AWS.",
    );
    let expected: BTreeSet<String> = ["Python", "Kubernetes", "Docker", "AWS"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names(&result), expected);
    for skill in &result.skills {
        assert!(skill.confidence_score >= extractor.config().confidence_threshold);
    }
    assert_eq!(result.metadata.mode, Mode::Enhanced);
}

#[test]
fn scenario_b_pure_noise_is_empty() {
    let extractor = engine(ExtractorConfig::enhanced());
    let result = extractor.extract_skills("", "New York, remote, full-time, competitive salary");
    assert!(result.skills.is_empty(), "{:?}", names(&result));
    assert_eq!(result.metadata.final_count, 0);
}

#[test]
fn scenario_c_disabling_semantic_keeps_lexicon_skills() {
    let full = engine(ExtractorConfig::enhanced()).extract_skills("", POSTING_HTML);
    let without = engine(ExtractorConfig::enhanced().with_strategy(ExtractionMethod::Semantic, false))
        .extract_skills("", POSTING_HTML);

    assert!(without.metadata.strategies_disabled.contains(&ExtractionMethod::Semantic));
    let without_names = names(&without);
    for skill in full.skills.iter().filter(|s| s.extraction_method == ExtractionMethod::Lexicon) {
        assert!(without_names.contains(&skill.skill_name), "lost {}", skill.skill_name);
    }
    for name in ["Rust", "PostgreSQL", "Docker", "AWS", "Kubernetes"] {
        assert!(without_names.contains(name), "missing {name}");
    }
}

#[test]
fn aliases_are_merged_with_count_and_spellings() {
    let extractor = engine(ExtractorConfig::enhanced().with_strategy(ExtractionMethod::Semantic, false));
    let result = extractor.extract_skills(
        "",
        "Requirements:\n- Kubernetes in production\n- Writing K8s operators",
    );
    let kubernetes: Vec<_> = result
        .skills
        .iter()
        .filter(|s| dedup_key(&s.skill_name) == "kubernetes")
        .collect();
    assert_eq!(kubernetes.len(), 1);
    let skill = kubernetes[0];
    assert_eq!(skill.skill_name, "Kubernetes");
    assert_eq!(skill.dedupe_count, Some(2));
    let spellings = skill.alternate_names.clone().unwrap_or_default();
    assert!(spellings.contains(&"Kubernetes".to_string()), "{spellings:?}");
    assert!(spellings.contains(&"K8s".to_string()), "{spellings:?}");
}

#[test]
fn benefits_section_is_excluded_when_others_exist() {
    let extractor = engine(ExtractorConfig::enhanced());
    let text = "## About Us\nWe build tools for hospitals.\n\n\
                ## Requirements\n- Rust and PostgreSQL\n- Experience with Docker\n\n\
                ## Benefits\n- Competitive PyBenefits™ plan and a Python learning stipend";
    let result = extractor.extract_skills("", text);
    let found = names(&result);
    assert!(!found.contains("Python"), "{found:?}");
    for name in ["Rust", "PostgreSQL", "Docker"] {
        assert!(found.contains(name), "missing {name} in {found:?}");
    }
    assert!(result.metadata.sections_used < result.metadata.sections_total);
}

#[test]
fn benefits_section_is_used_when_nothing_else_exists() {
    let extractor = engine(ExtractorConfig::enhanced());
    let result = extractor.extract_skills("", "## Benefits\n- A Python training stipend");
    assert!(names(&result).contains("Python"), "{:?}", names(&result));
    assert_eq!(result.metadata.sections_used, 1);
}

#[test]
fn summary_is_mined_as_its_own_field() {
    let extractor = engine(ExtractorConfig::enhanced());
    let result = extractor.extract_skills(
        "Must have deep experience with Terraform.",
        "Requirements:\n- Experience with Docker",
    );
    let terraform = result.find("Terraform").expect("Terraform from the summary");
    assert_eq!(terraform.source_field, "job_summary");
    let docker = result.find("Docker").expect("Docker from the description");
    assert_eq!(docker.source_field, "job_description");
}

#[test]
fn offsets_point_into_the_stripped_description() {
    let extractor = engine(ExtractorConfig::enhanced());
    let result = extractor.extract_skills("", POSTING_HTML);
    let prepared = extractor.prepare_text(POSTING_HTML);
    for name in ["Docker", "PostgreSQL", "Rust"] {
        let skill = result.find(name).unwrap_or_else(|| panic!("{name} missing"));
        assert_eq!(&prepared[skill.start_offset..skill.end_offset], name);
    }
}

#[test]
fn output_honours_every_guarantee() {
    let extractor = engine(ExtractorConfig::enhanced());
    let result = extractor.extract_skills("Backend role using Rust and AWS", POSTING_HTML);
    assert!(!result.skills.is_empty());

    let mut keys = BTreeSet::new();
    let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
    for skill in &result.skills {
        assert!((0.0..=1.0).contains(&skill.confidence_score));
        assert!(skill.confidence_score >= 0.6);
        assert!(!skill.skill_name.trim().is_empty());
        assert!(extractor.config().is_known_category(&skill.skill_category));
        assert!(skill.context_snippet.chars().count() <= 200);
        assert!(keys.insert(dedup_key(&skill.skill_name)), "duplicate {}", skill.skill_name);
        if !skill.category_overflow {
            *per_category.entry(skill.skill_category.as_str()).or_default() += 1;
        }
    }
    assert!(per_category.values().all(|&n| n <= 15));

    // sorted by confidence, then name
    for pair in result.skills.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.confidence_score > b.confidence_score
                || (a.confidence_score == b.confidence_score && a.skill_name <= b.skill_name)
        );
    }
    assert_eq!(result.metadata.final_count, result.skills.len());
    assert!(result.metadata.total_candidates >= result.skills.len());
}

#[test]
fn category_cap_with_overflow() {
    let mut config = ExtractorConfig::enhanced().with_max_skills_per_category(2);
    config.overflow_threshold = 0.7;
    let extractor = engine(config);
    let result = extractor.extract_skills(
        "",
        "Requirements:\n- Strong experience with Python, Java, Rust, Ruby, Scala, Kotlin and Haskell",
    );
    let languages: Vec<_> = result
        .skills
        .iter()
        .filter(|s| s.skill_category == "programming_languages")
        .collect();
    assert!(languages.len() > 2, "{:?}", names(&result));
    let capped = languages.iter().filter(|s| !s.category_overflow).count();
    assert_eq!(capped, 2);
    let overflow: Vec<_> = languages.iter().filter(|s| s.category_overflow).collect();
    assert!(!overflow.is_empty());
    for skill in overflow {
        assert!(skill.confidence_score > 0.7);
    }
}

#[test]
fn skills_listed_on_acronym_lines_are_found() {
    let extractor = engine(ExtractorConfig::enhanced());

    let slashes = extractor.extract_skills("", "Requirements\nAWS / GCP / SQL");
    assert!(names(&slashes).contains("AWS"), "{:?}", names(&slashes));
    assert!(names(&slashes).contains("SQL"), "{:?}", names(&slashes));

    let commas = extractor.extract_skills("", "Tech stack:\nAWS, GCP, SQL\nWe value curiosity.");
    assert!(names(&commas).contains("SQL"), "{:?}", names(&commas));

    let lines = extractor.extract_skills("", "Requirements:\nSQL\nPHP\nExperience with Docker");
    for name in ["SQL", "PHP", "Docker"] {
        assert!(names(&lines).contains(name), "missing {name} in {:?}", names(&lines));
    }
}

#[test]
fn identical_input_gives_identical_json_without_semantic() {
    let config = || ExtractorConfig::enhanced().with_strategy(ExtractionMethod::Semantic, false);
    let first = engine(config()).extract_skills("Rust role", POSTING_HTML);
    let second = engine(config()).extract_skills("Rust role", POSTING_HTML);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn baseline_preset_runs_formula_scoring() {
    let extractor = engine(ExtractorConfig::baseline());
    assert_eq!(extractor.mode(), Mode::Baseline);
    let result = extractor.extract_skills(
        "",
        "Qualifications:\n- Strong project management skills\n- Experience with Python",
    );
    let found = names(&result);
    assert!(found.contains("Project Management"), "{found:?}");
    assert!(found.contains("Python"), "{found:?}");
    assert!(result.metadata.strategies_disabled.contains(&ExtractionMethod::Semantic));
    assert!(result.metadata.strategies_disabled.contains(&ExtractionMethod::Pattern));
}

#[test]
fn empty_input_is_fine() {
    let extractor = engine(ExtractorConfig::enhanced());
    let result = extractor.extract_skills("", "");
    assert!(result.skills.is_empty());
    assert_eq!(result.metadata.sections_used, 0);
}
