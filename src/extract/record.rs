//! Vacancy record extraction for detail pages

use crate::document::Document;
use crate::extract::labels::{LabelRules, UKRAINIAN};
use crate::extract::{Field, Vocabulary};
use crate::{ExtractError, ExtractResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const TITLE: &str = "h1";
const COMPANY: &str = ".job-details--title";
const SALARY: &str = ".public-salary-item";
const LABELLED_BLOCK: &str = "div";
const JOB_TYPE: &str = ".bi-building + div";
const COMPANY_TYPE_PRODUCT: &str = ".bi-exclude + div";
const COMPANY_TYPE_OUTSOURCE: &str = ".bi-basket3-fill + div";
const TEST_TASK: &str = ".bi-pencil-square + div";
const LOCATION: &str = ".location-text";
const LOCATION_CITY: &str = ".location-text > span";
const LOCATION_MORE_CITIES: &str = ".location-text > span > span[data-original-title]";
const MUTED_TEXT: &str = ".text-muted";
const DESCRIPTION: &str = ".row-mobile-order-2 > .mb-4";

/// One vacancy, extracted from its detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyRecord {
    /// Detail page the record was extracted from
    pub url: String,
    pub title: String,
    /// Public salary figures in page order, usually `[min, max]`
    pub salary: Option<Vec<u32>>,
    pub company: String,
    pub english_level: String,
    pub experience_years: u32,
    pub domain: Option<String>,
    pub job_type: Option<String>,
    pub company_type: Option<String>,
    pub test_task_exists: bool,
    pub publication_date: NaiveDate,
    pub views_count: u32,
    pub applicant_count: u32,
    pub technologies: Vec<String>,
    pub country: Vec<String>,
}

/// Applies the field rules to vacancy detail pages
///
/// The extractor owns its vocabulary and holds no other state, so a single
/// instance can serve any number of pages.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    vocabulary: Vocabulary,
    labels: &'static LabelRules,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new(Vocabulary::default())
    }
}

impl RecordExtractor {
    /// Creates an extractor using the Ukrainian label rules
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            labels: &UKRAINIAN,
        }
    }

    /// Extracts a complete record or reports the first field that failed
    ///
    /// Title, company, experience, publication date, views and applicant
    /// count are required. Everything else degrades to `None`, an empty list
    /// or a sentinel.
    pub fn extract<D: Document + ?Sized>(&self, document: &D) -> ExtractResult<VacancyRecord> {
        let url = document.url().as_str();

        let title = required(document.select_first(TITLE), Field::Title, url)?;
        let company = required(document.select_first(COMPANY), Field::Company, url)?;
        let experience_years = self.experience_years(document)?;
        let publication_date = self.publication_date(document)?;
        let views_count = self.muted_count(document, Field::ViewsCount)?;
        let applicant_count = self.muted_count(document, Field::ApplicantCount)?;
        let salary = self.salary(document)?;

        Ok(VacancyRecord {
            url: url.to_string(),
            title,
            salary,
            company,
            english_level: self.english_level(document),
            experience_years,
            domain: self.domain(document),
            job_type: document.select_first(JOB_TYPE),
            company_type: company_type(document),
            test_task_exists: document.select_first(TEST_TASK).is_some(),
            publication_date,
            views_count,
            applicant_count,
            technologies: self.technologies(document),
            country: country(document),
        })
    }

    /// A figure too large for `u32` fails the record instead of being dropped
    fn salary<D: Document + ?Sized>(&self, document: &D) -> ExtractResult<Option<Vec<u32>>> {
        let Some(text) = document.select_first(SALARY) else {
            return Ok(None);
        };
        let url = document.url().as_str();
        self.labels
            .find_all(Field::Salary, &text)
            .iter()
            .map(|digits| {
                digits
                    .parse()
                    .map_err(|_| unparseable(Field::Salary, url, &text))
            })
            .collect::<ExtractResult<Vec<u32>>>()
            .map(Some)
    }

    fn english_level<D: Document + ?Sized>(&self, document: &D) -> String {
        self.labelled(document, Field::EnglishLevel)
            .unwrap_or_else(|| self.labels.not_specified.to_string())
    }

    fn domain<D: Document + ?Sized>(&self, document: &D) -> Option<String> {
        self.labelled(document, Field::Domain)
    }

    fn labelled<D: Document + ?Sized>(&self, document: &D, field: Field) -> Option<String> {
        let texts = document.select_all(LABELLED_BLOCK);
        let text = self.labels.find_text(field, &texts)?;
        self.labels.labelled_value(text)
    }

    fn experience_years<D: Document + ?Sized>(&self, document: &D) -> ExtractResult<u32> {
        let url = document.url().as_str();
        let texts = document.select_all(LABELLED_BLOCK);
        let text = required(
            self.labels.find_text(Field::ExperienceYears, &texts),
            Field::ExperienceYears,
            url,
        )?;

        match text.split_whitespace().next() {
            Some(token) if token == self.labels.no_experience => Ok(0),
            Some(token) => token
                .parse()
                .map_err(|_| unparseable(Field::ExperienceYears, url, text)),
            None => Err(unparseable(Field::ExperienceYears, url, text)),
        }
    }

    fn publication_date<D: Document + ?Sized>(&self, document: &D) -> ExtractResult<NaiveDate> {
        let url = document.url().as_str();
        let texts = document.select_all(MUTED_TEXT);
        let date_text = required(
            self.labels.find_value(Field::PublicationDate, &texts),
            Field::PublicationDate,
            url,
        )?;

        let fail = || unparseable(Field::PublicationDate, url, &date_text);
        let mut parts = date_text.split_whitespace();
        let (Some(day), Some(month), Some(year)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(fail());
        };

        let day: u32 = day.parse().map_err(|_| fail())?;
        let month = self.vocabulary.month(month).ok_or_else(fail)?;
        let year: i32 = year.parse().map_err(|_| fail())?;

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(fail)
    }

    fn muted_count<D: Document + ?Sized>(&self, document: &D, field: Field) -> ExtractResult<u32> {
        let url = document.url().as_str();
        let texts = document.select_text(MUTED_TEXT);
        let digits = required(self.labels.find_value(field, &texts), field, url)?;
        digits.parse().map_err(|_| unparseable(field, url, &digits))
    }

    fn technologies<D: Document + ?Sized>(&self, document: &D) -> Vec<String> {
        document
            .select_text(DESCRIPTION)
            .first()
            .map(|text| self.vocabulary.match_technologies(text))
            .unwrap_or_default()
    }
}

/// Product company marker wins over the outsourcing one
fn company_type<D: Document + ?Sized>(document: &D) -> Option<String> {
    document
        .select_first(COMPANY_TYPE_PRODUCT)
        .or_else(|| document.select_first(COMPANY_TYPE_OUTSOURCE))
}

/// Location segments, with city annotations appended to the last one
///
/// `"Ukraine, Poland"` with city `"Remote"` and overflow `"+2 more"` becomes
/// `["Ukraine", "Poland Remote +2 more"]`. The city is appended exactly once,
/// before the overflow text.
fn country<D: Document + ?Sized>(document: &D) -> Vec<String> {
    let Some(base) = document.select_first(LOCATION) else {
        return Vec::new();
    };

    let mut countries: Vec<String> = base.split(',').map(|s| s.trim().to_string()).collect();

    if let Some(city) = document.select_first(LOCATION_CITY) {
        let more_cities = document.select_first(LOCATION_MORE_CITIES);
        if let Some(last) = countries.last_mut() {
            last.push(' ');
            last.push_str(&city);
            if let Some(more_cities) = more_cities {
                last.push(' ');
                last.push_str(&more_cities);
            }
        }
    }

    countries
}

fn required<T>(value: Option<T>, field: Field, url: &str) -> ExtractResult<T> {
    value.ok_or_else(|| ExtractError::MissingRequiredField {
        field,
        url: url.to_string(),
    })
}

fn unparseable(field: Field, url: &str, value: &str) -> ExtractError {
    ExtractError::UnparseableValue {
        field,
        url: url.to_string(),
        value: value.to_string(),
    }
}
