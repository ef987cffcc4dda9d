//! Static vocabularies used during extraction
//!
//! Both tables ship with built-in defaults and can be replaced from the
//! `[vocabulary]` section of the configuration file without code changes.

use std::collections::HashMap;

/// Technology names recognised in vacancy descriptions, in match order
pub const DEFAULT_TECHNOLOGIES: &[&str] = &[
    "Python",
    "Django",
    "DRF",
    "Flask",
    "FastAPI",
    "aiohttp",
    "asyncio",
    "Celery",
    "SQLAlchemy",
    "Alembic",
    "Pydantic",
    "Pandas",
    "NumPy",
    "SciPy",
    "PyTorch",
    "TensorFlow",
    "Scrapy",
    "Selenium",
    "Airflow",
    "Spark",
    "SQL",
    "NoSQL",
    "PostgreSQL",
    "MySQL",
    "SQLite",
    "MongoDB",
    "Redis",
    "Elasticsearch",
    "ClickHouse",
    "RabbitMQ",
    "Kafka",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Ansible",
    "Jenkins",
    "CI/CD",
    "AWS",
    "GCP",
    "Azure",
    "Linux",
    "Git",
    "REST",
    "GraphQL",
    "gRPC",
    "Microservices",
    "JavaScript",
    "TypeScript",
    "React",
    "Vue",
    "Angular",
    "Java",
    "Golang",
    "Rust",
    "Machine Learning",
    "OOP",
];

/// Genitive Ukrainian month names as they appear in publication dates
pub const DEFAULT_MONTHS: &[(&str, u32)] = &[
    ("січня", 1),
    ("лютого", 2),
    ("березня", 3),
    ("квітня", 4),
    ("травня", 5),
    ("червня", 6),
    ("липня", 7),
    ("серпня", 8),
    ("вересня", 9),
    ("жовтня", 10),
    ("листопада", 11),
    ("грудня", 12),
];

/// Technology vocabulary and month table, immutable once built
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// (original casing, lower-cased) pairs
    technologies: Vec<(String, String)>,
    months: HashMap<String, u32>,
}

impl Vocabulary {
    /// Builds a vocabulary from explicit tables
    ///
    /// Month words are matched case-insensitively.
    pub fn new<T, M>(technologies: T, months: M) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        M: IntoIterator<Item = (String, u32)>,
    {
        let technologies = technologies
            .into_iter()
            .map(|name| {
                let name = name.into();
                let lower = name.to_lowercase();
                (name, lower)
            })
            .collect();

        let months = months
            .into_iter()
            .map(|(word, ordinal)| (word.to_lowercase(), ordinal))
            .collect();

        Self {
            technologies,
            months,
        }
    }

    /// Recognised technology names in match order
    pub fn technologies(&self) -> impl Iterator<Item = &str> {
        self.technologies.iter().map(|(name, _)| name.as_str())
    }

    /// Number of entries in the month table
    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    /// Maps a localized month word to its 1-12 ordinal
    pub fn month(&self, word: &str) -> Option<u32> {
        self.months.get(&word.to_lowercase()).copied()
    }

    /// Returns every technology whose name occurs in `text`
    ///
    /// Matching is a case-insensitive substring test; results keep the
    /// vocabulary's casing and order.
    ///
    /// ```
    /// use vacancy_crawler::extract::Vocabulary;
    ///
    /// let vocab = Vocabulary::new(["Python", "Django", "Docker", "Java"], Vec::new());
    /// assert_eq!(
    ///     vocab.match_technologies("Python, Django, and Docker"),
    ///     vec!["Python", "Django", "Docker"]
    /// );
    /// ```
    pub fn match_technologies(&self, text: &str) -> Vec<String> {
        let haystack = text.to_lowercase();
        self.technologies
            .iter()
            .filter(|(_, lower)| haystack.contains(lower.as_str()))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(
            DEFAULT_TECHNOLOGIES.iter().copied(),
            DEFAULT_MONTHS
                .iter()
                .map(|(word, ordinal)| (word.to_string(), *ordinal)),
        )
    }
}
