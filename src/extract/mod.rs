//! Field extraction for listing and vacancy pages
//!
//! This module contains the only site-specific logic in the crate:
//! - Link discovery on paginated listing pages
//! - Record extraction on vacancy detail pages
//! - The localized label rules and vocabularies both rely on

pub mod labels;
mod links;
mod record;
mod vocabulary;

pub use labels::{LabelRule, LabelRules};
pub use links::{discover_links, ListingLinks};
pub use record::{RecordExtractor, VacancyRecord};
pub use vocabulary::{Vocabulary, DEFAULT_MONTHS, DEFAULT_TECHNOLOGIES};

use std::fmt;

/// Fields of a [`VacancyRecord`], used to tag extraction failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Salary,
    Company,
    EnglishLevel,
    ExperienceYears,
    Domain,
    JobType,
    CompanyType,
    TestTaskExists,
    PublicationDate,
    ViewsCount,
    ApplicantCount,
    Technologies,
    Country,
}

impl Field {
    /// Stable snake_case name, used in logs and the failures table
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Salary => "salary",
            Self::Company => "company",
            Self::EnglishLevel => "english_level",
            Self::ExperienceYears => "experience_years",
            Self::Domain => "domain",
            Self::JobType => "job_type",
            Self::CompanyType => "company_type",
            Self::TestTaskExists => "test_task_exists",
            Self::PublicationDate => "publication_date",
            Self::ViewsCount => "views_count",
            Self::ApplicantCount => "applicant_count",
            Self::Technologies => "technologies",
            Self::Country => "country",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
