// src/config/vocab.rs
// Default word and phrase tables. Everything here is copied into
// `ExtractorConfig` so callers can replace any of it.

/// Single words that are never skills on their own.
pub const NOISE_WORDS: &[&str] = &[
    "remote", "hybrid", "onsite", "on-site", "full-time", "part-time", "fulltime", "parttime",
    "contract", "contractor", "temporary", "permanent", "internship", "salary", "competitive",
    "compensation", "benefits", "bonus", "equity", "pto", "vacation", "insurance", "401k",
    "location", "relocation", "travel", "visa", "sponsorship", "office", "years", "year",
    "months", "experience", "team", "teams", "company", "role", "position", "job", "jobs",
    "opportunity", "opportunities", "candidate", "candidates", "applicant", "work", "working",
    "responsibilities", "requirements", "qualifications", "skills", "ability", "abilities",
    "knowledge", "understanding", "plus", "bonus points", "etc", "including", "degree",
    "bachelor", "bachelors", "master", "masters", "phd", "equivalent", "preferred", "required",
    "senior", "junior", "mid-level", "entry-level", "staff", "principal", "lead", "new",
    "york", "usa", "us", "uk", "eu", "apply", "today", "now", "hiring", "join", "us",
    "employer", "employee", "employees", "people", "customers", "clients", "users", "product",
    "products", "services", "solutions", "business", "industry", "world", "environment",
    "culture", "mission", "values", "growth", "impact", "things", "stuff", "something",
];

/// Multi-word phrases rejected by the NER and noun-chunk filters.
pub const NOISE_PHRASES: &[&str] = &[
    "new york", "san francisco", "los angeles", "bay area", "united states", "united kingdom",
    "north america", "seattle", "boston", "chicago", "austin", "denver", "london", "berlin",
    "toronto", "remote first", "remote-first", "work from home", "full time", "part time",
    "competitive salary", "competitive compensation", "health insurance", "dental insurance",
    "paid time off", "equal opportunity", "equal opportunity employer", "fast-paced environment",
    "fast paced environment", "team player", "self starter", "self-starter", "job description",
    "job requirements", "years of experience", "year of experience", "nice to have",
    "must have", "bonus points", "stock options", "parental leave", "unlimited pto",
    "flexible hours", "flexible schedule", "great culture", "dynamic team",
];

/// Section headers worth mining for skills.
pub const RELEVANT_SECTION_KEYWORDS: &[&str] = &[
    "requirements", "requirement", "qualifications", "qualification", "skills",
    "what you'll need", "what you will need", "what you bring", "what we're looking for",
    "what we are looking for", "who you are", "you have", "you will have", "must have",
    "must-have", "nice to have", "nice-to-have", "preferred", "bonus points",
    "responsibilities", "what you'll do", "what you will do", "the role", "your role",
    "technical", "tech stack", "technologies", "tools", "experience", "competencies",
    "expertise", "minimum qualifications", "basic qualifications", "key skills",
];

/// Section headers that never contain the candidate's skills.
pub const EXCLUDED_SECTION_KEYWORDS: &[&str] = &[
    "benefits", "perks", "compensation", "salary", "pay range", "what we offer",
    "we offer", "about us", "about the company", "who we are", "our company",
    "company overview", "equal opportunity", "eeo", "diversity", "how to apply",
    "application process", "legal", "disclaimer", "privacy", "location", "work environment",
    "why join", "why work", "our culture", "our mission",
];

/// Phrases in a section body that signal skill talk.
pub const SKILL_INDICATOR_PHRASES: &[&str] = &[
    "experience with", "experience in", "proficient in", "proficiency in", "proficiency with",
    "knowledge of", "familiar with", "familiarity with", "expertise in", "skilled in",
    "hands-on experience", "working knowledge", "strong understanding", "understanding of",
    "background in", "ability to", "years of experience", "fluent in", "comfortable with",
    "solid grasp", "track record",
];

/// Context phrases that strongly suggest a required skill.
pub const STRONG_INDICATORS: &[&str] = &[
    "required", "requirement", "requirements", "must have", "must-have", "must be",
    "experience with", "experience in", "proficient in", "proficiency in", "expert in",
    "expertise in", "strong", "hands-on", "years of experience", "deep knowledge",
    "advanced", "solid", "skilled in",
];

/// Context phrases that suggest a desired but optional skill.
pub const MEDIUM_INDICATORS: &[&str] = &[
    "preferred", "nice to have", "nice-to-have", "a plus", "bonus", "familiar with",
    "familiarity with", "knowledge of", "exposure to", "understanding of", "working knowledge",
    "desirable", "ideally", "comfortable with", "interest in",
];

/// Two-letter US state and territory codes, rejected as NER entities.
pub const US_STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC", "PR",
];
