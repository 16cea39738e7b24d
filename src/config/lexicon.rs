// src/config/lexicon.rs
//! Curated skill lexicons: category → canonical names, plus aliases.
//!
//! Terms that double as ordinary English words ("Spring", "Swift", "Helm") and
//! every term of two characters or fewer are matched case-sensitively.

use std::collections::{BTreeMap, BTreeSet};

use crate::utils::error::ConfigError;

/// What a surface form (canonical spelling or alias) resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub canonical: String,
    pub category: String,
}

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    categories: BTreeMap<String, Vec<String>>,
    // alias as written -> canonical spelling
    aliases: BTreeMap<String, String>,
    case_sensitive: BTreeSet<String>,
    // lowercase surface form -> entry, first registration wins
    index: BTreeMap<String, LexiconEntry>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: &str, terms: &[&str]) -> Self {
        self.add_terms(category, terms);
        self
    }

    pub fn with_aliases(mut self, pairs: &[(&str, &str)]) -> Self {
        for (alias, canonical) in pairs {
            self.add_alias(alias, canonical);
        }
        self
    }

    pub fn with_case_sensitive(mut self, terms: &[&str]) -> Self {
        self.case_sensitive
            .extend(terms.iter().map(|t| t.to_string()));
        self
    }

    pub fn add_terms(&mut self, category: &str, terms: &[&str]) {
        let bucket = self.categories.entry(category.to_string()).or_default();
        for term in terms {
            let term = term.trim();
            if term.is_empty() {
                continue;
            }
            let key = term.to_lowercase();
            if self.index.contains_key(&key) {
                tracing::trace!("Lexicon term '{}' already registered, skipping", term);
                continue;
            }
            bucket.push(term.to_string());
            self.index.insert(
                key,
                LexiconEntry {
                    canonical: term.to_string(),
                    category: category.to_string(),
                },
            );
        }
    }

    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        self.aliases.insert(alias.to_string(), canonical.to_string());
        if let Some(entry) = self.index.get(&canonical.to_lowercase()).cloned() {
            self.index.entry(alias.to_lowercase()).or_insert(entry);
        }
    }

    /// Number of canonical terms (aliases excluded).
    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .filter(|(_, terms)| !terms.is_empty())
            .map(|(c, _)| c.as_str())
    }

    /// All canonical terms with their category, in category order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories
            .iter()
            .flat_map(|(c, terms)| terms.iter().map(move |t| (c.as_str(), t.as_str())))
    }

    /// Case-insensitive lookup of a canonical spelling or alias.
    pub fn lookup(&self, name: &str) -> Option<&LexiconEntry> {
        self.index.get(&name.trim().to_lowercase())
    }

    /// Every spelling worth scanning for: canonical terms first, then aliases.
    pub fn surface_forms(&self) -> Vec<(String, LexiconEntry)> {
        let mut forms: Vec<(String, LexiconEntry)> = self
            .terms()
            .map(|(category, term)| {
                (
                    term.to_string(),
                    LexiconEntry {
                        canonical: term.to_string(),
                        category: category.to_string(),
                    },
                )
            })
            .collect();
        for (alias, canonical) in &self.aliases {
            if let Some(entry) = self.index.get(&canonical.to_lowercase()) {
                forms.push((alias.clone(), entry.clone()));
            }
        }
        forms
    }

    pub fn is_case_sensitive(&self, surface: &str) -> bool {
        surface.chars().count() <= 2 || self.case_sensitive.contains(surface)
    }

    pub fn validate_aliases(&self) -> Result<(), ConfigError> {
        for (alias, canonical) in &self.aliases {
            if !self.index.contains_key(&canonical.to_lowercase()) {
                return Err(ConfigError::Invalid(format!(
                    "alias '{alias}' points at unknown skill '{canonical}'"
                )));
            }
        }
        Ok(())
    }
}

/// Weight of each known category for the ensemble's category feature. The keys
/// double as the known category set used to validate candidates.
pub fn default_category_weights() -> BTreeMap<String, f32> {
    [
        // tech lexicon
        ("programming_languages", 1.0),
        ("web_frameworks", 0.95),
        ("databases", 0.95),
        ("cloud_platforms", 0.95),
        ("devops_tools", 0.9),
        ("data_engineering", 0.9),
        ("data_science", 0.9),
        ("machine_learning", 0.95),
        ("mobile", 0.9),
        ("testing", 0.85),
        ("security", 0.9),
        ("operating_systems", 0.8),
        ("architecture", 0.85),
        ("methodologies", 0.75),
        ("tools", 0.7),
        ("soft_skills", 0.6),
        ("certifications", 0.9),
        // general lexicon and noun-chunk heuristics
        ("communicating_collaborating", 0.65),
        ("managing_directing", 0.75),
        ("researching_analysing", 0.8),
        ("working_with_computers", 0.9),
        ("organising_planning", 0.65),
        ("teaching_training", 0.65),
        ("assisting_caring", 0.65),
        ("creative_design", 0.75),
        ("sales_marketing", 0.7),
        ("finance_accounting", 0.75),
        ("languages", 0.7),
        ("personal_attributes", 0.5),
        (super::FALLBACK_CATEGORY, 0.5),
    ]
    .into_iter()
    .map(|(c, w)| (c.to_string(), w))
    .collect()
}

/// Tech-focused lexicon used in enhanced mode.
pub fn tech_lexicon() -> Lexicon {
    Lexicon::new()
        .with_category(
            "programming_languages",
            &[
                "Python", "Java", "JavaScript", "TypeScript", "C", "C++", "C#", "Go", "Rust",
                "Ruby", "PHP", "Swift", "Kotlin", "Scala", "R", "MATLAB", "Perl", "Haskell",
                "Elixir", "Erlang", "Clojure", "F#", "Dart", "Lua", "Julia", "Groovy",
                "Objective-C", "Visual Basic", "COBOL", "Fortran", "Assembly", "Bash",
                "Shell Scripting", "PowerShell", "SQL", "PL/SQL", "T-SQL", "HTML", "CSS",
                "Sass", "Solidity", "Zig", "OCaml", "Lisp", "Prolog", "VBA", "Apex", "ABAP",
                "WebAssembly",
            ],
        )
        .with_category(
            "web_frameworks",
            &[
                "React", "Angular", "Vue.js", "Svelte", "Next.js", "Nuxt.js", "Ember.js",
                "Backbone.js", "jQuery", "Node.js", "Express.js", "NestJS", "Django", "Flask",
                "FastAPI", "Ruby on Rails", "Sinatra", "Spring", "Spring Boot", "ASP.NET",
                ".NET", ".NET Core", "Laravel", "Symfony", "CodeIgniter", "Actix", "Axum",
                "Tailwind CSS", "Bootstrap", "Redux", "GraphQL", "REST APIs", "gRPC",
                "WebSockets", "Webpack", "Vite", "Babel", "Gatsby", "Remix", "Blazor",
                "Struts", "Hibernate", "Micronaut", "Quarkus", "Deno", "Storybook",
            ],
        )
        .with_category(
            "databases",
            &[
                "PostgreSQL", "MySQL", "MariaDB", "SQLite", "Oracle Database",
                "Microsoft SQL Server", "MongoDB", "Cassandra", "Redis", "Elasticsearch",
                "DynamoDB", "Couchbase", "CouchDB", "Neo4j", "InfluxDB", "TimescaleDB",
                "Snowflake", "BigQuery", "Redshift", "ClickHouse", "CockroachDB", "Firebase",
                "Firestore", "Memcached", "HBase", "Teradata", "Db2", "Supabase", "Pinecone",
                "Solr", "OpenSearch", "Amazon Aurora", "Cosmos DB", "NoSQL",
            ],
        )
        .with_category(
            "cloud_platforms",
            &[
                "AWS", "Microsoft Azure", "Google Cloud Platform", "Amazon EC2", "Amazon S3",
                "AWS Lambda", "Amazon ECS", "Amazon EKS", "Amazon RDS", "Amazon SQS",
                "Amazon SNS", "CloudFormation", "CloudWatch", "AWS IAM", "Azure DevOps",
                "Azure Functions", "Google Kubernetes Engine", "Cloud Run", "Heroku",
                "DigitalOcean", "Vercel", "Netlify", "Cloudflare", "OpenStack", "IBM Cloud",
                "Oracle Cloud", "Alibaba Cloud", "Serverless", "Linode", "Cloud Computing",
            ],
        )
        .with_category(
            "devops_tools",
            &[
                "Docker", "Kubernetes", "Terraform", "Ansible", "Puppet", "Chef", "Jenkins",
                "GitLab CI", "GitHub Actions", "CircleCI", "Travis CI", "Argo CD", "Helm",
                "Prometheus", "Grafana", "Datadog", "New Relic", "Splunk", "ELK Stack",
                "Logstash", "Kibana", "Nagios", "Vagrant", "Packer", "Consul", "Vault",
                "Istio", "Linkerd", "Nginx", "Apache HTTP Server", "HAProxy", "Git", "GitHub",
                "GitLab", "Bitbucket", "Maven", "Gradle", "npm", "Yarn", "CI/CD",
                "Infrastructure as Code", "Podman", "OpenShift", "Rancher", "Spinnaker",
                "Pulumi", "SonarQube", "Artifactory", "Bazel", "OpenTelemetry",
            ],
        )
        .with_category(
            "data_engineering",
            &[
                "Apache Spark", "Hadoop", "Apache Kafka", "Apache Airflow", "dbt",
                "Apache Flink", "Apache Beam", "Hive", "Presto", "Trino", "Databricks",
                "Apache NiFi", "Fivetran", "Talend", "Informatica", "ETL", "Data Warehousing",
                "Data Modeling", "Data Pipelines", "Delta Lake", "Apache Iceberg", "Luigi",
                "Dagster", "Prefect", "Amazon Kinesis", "Google Pub/Sub", "RabbitMQ",
                "ActiveMQ", "Celery", "Data Lakes", "Stream Processing",
            ],
        )
        .with_category(
            "data_science",
            &[
                "Pandas", "NumPy", "SciPy", "Matplotlib", "Seaborn", "Plotly", "Jupyter",
                "Tableau", "Power BI", "Looker", "Statistics", "Data Analysis",
                "Data Visualization", "A/B Testing", "Regression Analysis",
                "Time Series Analysis", "Hypothesis Testing", "SAS", "SPSS", "Stata", "Qlik",
                "D3.js", "Alteryx", "Google Analytics", "Mixpanel", "Amplitude", "Data Mining",
                "Predictive Modeling", "Business Intelligence", "Data Science",
            ],
        )
        .with_category(
            "machine_learning",
            &[
                "Machine Learning", "Deep Learning", "Artificial Intelligence", "TensorFlow",
                "PyTorch", "Keras", "scikit-learn", "XGBoost", "LightGBM", "CatBoost",
                "Hugging Face", "Natural Language Processing", "Computer Vision",
                "Reinforcement Learning", "Large Language Models", "Generative AI",
                "LangChain", "OpenCV", "spaCy", "NLTK", "MLflow", "Kubeflow",
                "Amazon SageMaker", "Vertex AI", "ONNX", "CUDA", "Neural Networks",
                "Feature Engineering", "MLOps", "Recommendation Systems",
                "Prompt Engineering", "Retrieval-Augmented Generation", "Vector Databases",
                "JAX",
            ],
        )
        .with_category(
            "mobile",
            &[
                "iOS", "Android", "React Native", "Flutter", "SwiftUI", "UIKit", "Xamarin",
                "Ionic", "Jetpack Compose", "Android Studio", "Xcode", "Cordova",
                "Kotlin Multiplatform", "Mobile Development",
            ],
        )
        .with_category(
            "testing",
            &[
                "Unit Testing", "Integration Testing", "Test Automation", "Selenium",
                "Cypress", "Playwright", "Jest", "Mocha", "Jasmine", "pytest", "JUnit",
                "TestNG", "RSpec", "Cucumber", "Postman", "JMeter", "Gatling", "Appium",
                "Test-Driven Development", "Behavior-Driven Development", "Load Testing",
                "Quality Assurance", "Regression Testing", "Puppeteer", "Vitest",
                "End-to-End Testing",
            ],
        )
        .with_category(
            "security",
            &[
                "Cybersecurity", "Penetration Testing", "OWASP",
                "Identity and Access Management", "OAuth", "OpenID Connect", "SAML",
                "Single Sign-On", "Encryption", "PKI", "SIEM", "SOC 2", "ISO 27001", "GDPR",
                "HIPAA", "PCI DSS", "Vulnerability Management", "Threat Modeling",
                "Network Security", "Application Security", "Zero Trust", "Firewalls",
                "Burp Suite", "Wireshark", "Metasploit", "Nmap", "Kali Linux",
                "Incident Response", "JWT",
            ],
        )
        .with_category(
            "operating_systems",
            &[
                "Linux", "Unix", "Windows Server", "macOS", "Ubuntu",
                "Red Hat Enterprise Linux", "CentOS", "Debian", "Embedded Linux", "RTOS",
            ],
        )
        .with_category(
            "architecture",
            &[
                "Microservices", "Distributed Systems", "System Design",
                "Event-Driven Architecture", "Service-Oriented Architecture",
                "Domain-Driven Design", "Design Patterns", "Object-Oriented Programming",
                "Functional Programming", "Concurrency", "Multithreading", "Caching",
                "Message Queues", "API Design", "Scalability", "High Availability",
                "Data Structures", "Algorithms", "Performance Optimization",
                "Software Architecture",
            ],
        )
        .with_category(
            "methodologies",
            &[
                "Agile", "Scrum", "Kanban", "Lean", "Six Sigma", "DevOps",
                "Site Reliability Engineering", "Waterfall", "SAFe", "Extreme Programming",
                "Pair Programming", "Code Review", "Continuous Integration",
                "Continuous Delivery", "ITIL", "Project Management", "Sprint Planning",
                "Technical Documentation", "Version Control", "Product Management",
            ],
        )
        .with_category(
            "tools",
            &[
                "Jira", "Confluence", "Slack", "Microsoft Excel", "Microsoft Office",
                "Visual Studio Code", "Visual Studio", "IntelliJ IDEA", "Eclipse", "Vim",
                "Emacs", "Figma", "Sketch", "Adobe Photoshop", "Adobe Illustrator", "Notion",
                "Salesforce", "SAP", "ServiceNow", "Zendesk", "HubSpot", "Airtable", "Miro",
            ],
        )
        .with_category(
            "soft_skills",
            &[
                "Communication", "Leadership", "Teamwork", "Problem Solving",
                "Critical Thinking", "Collaboration", "Mentoring", "Time Management",
                "Adaptability", "Attention to Detail", "Stakeholder Management",
                "Presentation Skills", "Written Communication", "Verbal Communication",
                "Decision Making", "Conflict Resolution", "Creativity", "Negotiation",
                "Analytical Skills", "Customer Focus", "Self-Motivation",
                "Emotional Intelligence", "Cross-Functional Collaboration",
                "Strategic Thinking",
            ],
        )
        .with_category(
            "certifications",
            &[
                "AWS Certified Solutions Architect", "AWS Certified Developer",
                "Certified Kubernetes Administrator", "Certified ScrumMaster", "PMP",
                "CISSP", "CompTIA Security+", "CCNA", "CISM", "CKAD",
            ],
        )
        .with_aliases(&[
            ("K8s", "Kubernetes"),
            ("Golang", "Go"),
            ("JS", "JavaScript"),
            ("ES6", "JavaScript"),
            ("TS", "TypeScript"),
            ("ReactJS", "React"),
            ("React.js", "React"),
            ("VueJS", "Vue.js"),
            ("AngularJS", "Angular"),
            ("NodeJS", "Node.js"),
            ("ExpressJS", "Express.js"),
            ("NextJS", "Next.js"),
            ("Postgres", "PostgreSQL"),
            ("Mongo", "MongoDB"),
            ("MSSQL", "Microsoft SQL Server"),
            ("SQL Server", "Microsoft SQL Server"),
            ("Amazon Web Services", "AWS"),
            ("Azure", "Microsoft Azure"),
            ("GCP", "Google Cloud Platform"),
            ("Google Cloud", "Google Cloud Platform"),
            ("EC2", "Amazon EC2"),
            ("S3", "Amazon S3"),
            ("EKS", "Amazon EKS"),
            ("ECS", "Amazon ECS"),
            ("RDS", "Amazon RDS"),
            ("SQS", "Amazon SQS"),
            ("GKE", "Google Kubernetes Engine"),
            ("SageMaker", "Amazon SageMaker"),
            ("Aurora", "Amazon Aurora"),
            ("Kinesis", "Amazon Kinesis"),
            ("Spark", "Apache Spark"),
            ("PySpark", "Apache Spark"),
            ("Kafka", "Apache Kafka"),
            ("Airflow", "Apache Airflow"),
            ("Flink", "Apache Flink"),
            ("ML", "Machine Learning"),
            ("AI", "Artificial Intelligence"),
            ("NLP", "Natural Language Processing"),
            ("LLM", "Large Language Models"),
            ("LLMs", "Large Language Models"),
            ("GenAI", "Generative AI"),
            ("RAG", "Retrieval-Augmented Generation"),
            ("sklearn", "scikit-learn"),
            ("TDD", "Test-Driven Development"),
            ("BDD", "Behavior-Driven Development"),
            ("QA", "Quality Assurance"),
            ("E2E Testing", "End-to-End Testing"),
            ("SSO", "Single Sign-On"),
            ("IAM", "Identity and Access Management"),
            ("RHEL", "Red Hat Enterprise Linux"),
            ("OOP", "Object-Oriented Programming"),
            ("DDD", "Domain-Driven Design"),
            ("SOA", "Service-Oriented Architecture"),
            ("SRE", "Site Reliability Engineering"),
            ("IaC", "Infrastructure as Code"),
            ("ELK", "ELK Stack"),
            ("ArgoCD", "Argo CD"),
            ("REST", "REST APIs"),
            ("RESTful APIs", "REST APIs"),
            ("REST API", "REST APIs"),
            ("Excel", "Microsoft Excel"),
            ("VS Code", "Visual Studio Code"),
            ("VSCode", "Visual Studio Code"),
            ("CKA", "Certified Kubernetes Administrator"),
            ("CSM", "Certified ScrumMaster"),
            ("Security+", "CompTIA Security+"),
        ])
        .with_case_sensitive(&[
            "Go", "Spring", "Swift", "Rust", "Ruby", "Dart", "Julia", "Assembly", "Bash",
            "Groovy", "Elixir", "Apex", "Remix", "Gatsby", "Babel", "Hive", "Luigi",
            "Prefect", "Celery", "Helm", "Chef", "Puppet", "Vault", "Consul", "Packer",
            "Yarn", "Jest", "Mocha", "Jasmine", "Cucumber", "Postman", "Snowflake",
            "Looker", "Amplitude", "Pandas", "Lean", "Waterfall", "SAFe", "Slack",
            "Sketch", "Notion", "Eclipse", "Excel", "REST", "Spark", "Aurora", "Ionic",
            "Sass", "Lisp", "Prolog", "Storybook", "Redux", "Miro", "Presto",
            "Mongo", "Axum", "Deno", "Vite", "Flask", "Bootstrap", "Vim",
        ])
}

/// General, occupation-agnostic lexicon used in baseline mode.
pub fn general_lexicon() -> Lexicon {
    Lexicon::new()
        .with_category(
            "communicating_collaborating",
            &[
                "Communication", "Public Speaking", "Presentation", "Negotiation",
                "Active Listening", "Written Communication", "Verbal Communication",
                "Interpersonal Skills", "Teamwork", "Collaboration", "Customer Service",
                "Relationship Building", "Persuasion", "Conflict Resolution", "Storytelling",
                "Facilitation", "Stakeholder Engagement", "Cross-Cultural Communication",
            ],
        )
        .with_category(
            "managing_directing",
            &[
                "Leadership", "Project Management", "People Management", "Team Management",
                "Strategic Planning", "Budgeting", "Budget Management", "Change Management",
                "Risk Management", "Operations Management", "Performance Management",
                "Resource Allocation", "Decision Making", "Delegation", "Vendor Management",
                "Program Management", "Product Management", "Supervision",
                "Talent Management", "P&L Management", "Stakeholder Management",
                "Team Leadership",
            ],
        )
        .with_category(
            "researching_analysing",
            &[
                "Data Analysis", "Research", "Critical Thinking", "Problem Solving",
                "Analytical Skills", "Market Research", "Financial Analysis",
                "Statistical Analysis", "Quantitative Analysis", "Qualitative Research",
                "Forecasting", "Reporting", "Auditing", "Quality Control",
                "Root Cause Analysis", "Benchmarking", "Business Analysis",
                "Requirements Gathering", "Competitive Analysis", "User Research",
            ],
        )
        .with_category(
            "working_with_computers",
            &[
                "Microsoft Excel", "Microsoft Word", "Microsoft PowerPoint",
                "Microsoft Office", "Google Workspace", "SQL", "Python", "JavaScript", "HTML",
                "CSS", "Data Entry", "CRM Software", "Salesforce", "SAP", "ERP Systems",
                "Tableau", "Power BI", "Database Management", "Software Development",
                "Web Development", "IT Support", "Technical Support", "Troubleshooting",
                "Cloud Computing", "Cybersecurity", "Network Administration", "Programming",
                "QuickBooks", "Adobe Photoshop", "Adobe Creative Suite", "AutoCAD",
                "Computer Literacy", "Spreadsheets", "Jira", "HubSpot", "Zendesk",
            ],
        )
        .with_category(
            "organising_planning",
            &[
                "Time Management", "Organization", "Scheduling", "Event Planning",
                "Prioritization", "Planning", "Logistics", "Inventory Management",
                "Supply Chain Management", "Procurement", "Documentation", "Record Keeping",
                "Process Improvement", "Workflow Optimization", "Attention to Detail",
                "Multitasking",
            ],
        )
        .with_category(
            "teaching_training",
            &[
                "Training", "Mentoring", "Coaching", "Curriculum Development",
                "Instructional Design", "Onboarding", "Lesson Planning", "Tutoring",
                "Knowledge Transfer", "Workshop Facilitation",
            ],
        )
        .with_category(
            "assisting_caring",
            &[
                "Patient Care", "First Aid", "CPR", "Customer Support", "Client Relations",
                "Caregiving", "Counseling", "Social Work", "Case Management",
            ],
        )
        .with_category(
            "creative_design",
            &[
                "Graphic Design", "UX Design", "UI Design", "Content Creation", "Copywriting",
                "Video Editing", "Photography", "Branding", "Creative Writing", "Illustration",
                "Web Design", "User Experience", "Product Design", "Figma",
                "Adobe Illustrator",
            ],
        )
        .with_category(
            "sales_marketing",
            &[
                "Sales", "Business Development", "Lead Generation", "Digital Marketing",
                "Social Media Marketing", "SEO", "SEM", "Email Marketing",
                "Content Marketing", "Account Management", "Marketing Strategy",
                "Market Analysis", "Cold Calling", "Brand Management", "Public Relations",
                "E-commerce", "Google Analytics", "Campaign Management",
            ],
        )
        .with_category(
            "finance_accounting",
            &[
                "Accounting", "Bookkeeping", "Financial Reporting", "Financial Modeling",
                "Payroll", "Accounts Payable", "Accounts Receivable", "Tax Preparation",
                "Cost Analysis", "Invoicing", "GAAP", "Reconciliation",
                "Investment Analysis", "Regulatory Compliance",
            ],
        )
        .with_category(
            "languages",
            &[
                "Spanish", "French", "German", "Mandarin", "Japanese", "Portuguese", "Arabic",
                "Bilingual",
            ],
        )
        .with_category(
            "certifications",
            &["PMP", "CPA", "CFA", "Six Sigma", "ITIL", "CompTIA A+"],
        )
        .with_category(
            "personal_attributes",
            &[
                "Adaptability", "Creativity", "Self-Motivation", "Work Ethic",
                "Emotional Intelligence", "Flexibility", "Reliability", "Initiative",
            ],
        )
        .with_aliases(&[
            ("Excel", "Microsoft Excel"),
            ("PowerPoint", "Microsoft PowerPoint"),
            ("MS Office", "Microsoft Office"),
            ("G Suite", "Google Workspace"),
            ("CRM", "CRM Software"),
            ("ERP", "ERP Systems"),
            ("UX", "UX Design"),
            ("UI", "UI Design"),
            ("Search Engine Optimization", "SEO"),
            ("Customer Relationship Management", "CRM Software"),
        ])
        .with_case_sensitive(&[
            "Excel", "Organization", "Planning", "Training", "Research", "Reporting",
            "Presentation", "Sales", "Initiative", "Flexibility", "Reliability",
            "Documentation", "Programming", "Branding", "Logistics", "Payroll",
        ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_resolves_to_canonical_entry() {
        let lexicon = tech_lexicon();
        let entry = lexicon.lookup("k8s").unwrap();
        assert_eq!(entry.canonical, "Kubernetes");
        assert_eq!(entry.category, "devops_tools");
        assert_eq!(lexicon.lookup("POSTGRES").unwrap().canonical, "PostgreSQL");
    }

    #[test]
    fn short_terms_are_case_sensitive() {
        let lexicon = tech_lexicon();
        assert!(lexicon.is_case_sensitive("R"));
        assert!(lexicon.is_case_sensitive("Go"));
        assert!(lexicon.is_case_sensitive("Spring"));
        assert!(!lexicon.is_case_sensitive("Kubernetes"));
    }

    #[test]
    fn duplicate_terms_keep_first_category() {
        let lexicon = Lexicon::new()
            .with_category("a", &["Rust"])
            .with_category("b", &["rust", "Zig"]);
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.lookup("RUST").unwrap().category, "a");
    }

    #[test]
    fn dangling_alias_is_invalid() {
        let lexicon = Lexicon::new()
            .with_category("a", &["Rust"])
            .with_aliases(&[("rs", "Rustlang")]);
        assert!(lexicon.validate_aliases().is_err());
    }

    #[test]
    fn every_builtin_alias_points_somewhere() {
        tech_lexicon().validate_aliases().unwrap();
        general_lexicon().validate_aliases().unwrap();
    }

    #[test]
    fn builtin_categories_have_weights() {
        let weights = default_category_weights();
        for lexicon in [tech_lexicon(), general_lexicon()] {
            for category in lexicon.categories() {
                assert!(weights.contains_key(category), "missing weight for {category}");
            }
        }
    }
}
