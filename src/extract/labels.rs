//! Localized label rules
//!
//! Every piece of human-language text the extractor looks for lives here as a
//! (field, pattern) rule. The record extractor only asks "which text matches
//! the rule for this field", so fixtures can exercise the rules directly.

use crate::extract::Field;
use regex::Regex;
use std::sync::LazyLock;

/// Ukrainian-language rules used by djinni.co
pub static UKRAINIAN: LazyLock<LabelRules> = LazyLock::new(LabelRules::ukrainian);

/// A compiled pattern bound to the field it locates
#[derive(Debug)]
pub struct LabelRule {
    pub field: Field,
    pub pattern: Regex,
}

/// Table of label rules plus the localized sentinels that go with them
#[derive(Debug)]
pub struct LabelRules {
    rules: Vec<LabelRule>,

    /// Value reported for an unstated English level
    pub not_specified: &'static str,

    /// First token of the experience text meaning "no experience"
    pub no_experience: &'static str,

    /// Separates a label from its value ("Домен: Fintech")
    pub delimiter: char,
}

impl LabelRules {
    fn ukrainian() -> Self {
        let table: &[(Field, &str)] = &[
            (Field::Salary, r"[0-9]+"),
            (Field::EnglishLevel, "Англійська:"),
            (Field::ExperienceYears, "досвіду"),
            (Field::Domain, "Домен:"),
            (Field::PublicationDate, r"[0-9]{1,2} [а-яіїє]+ [0-9]{4}"),
            (Field::ViewsCount, r"([0-9]+) перегляд"),
            (Field::ApplicantCount, r"([0-9]+) відгук"),
        ];

        let rules = table
            .iter()
            .map(|(field, pattern)| LabelRule {
                field: *field,
                pattern: Regex::new(pattern).expect("built-in label pattern must compile"),
            })
            .collect();

        Self {
            rules,
            not_specified: "Не вказано",
            no_experience: "Без",
            delimiter: ':',
        }
    }

    /// Pattern registered for `field`, if any
    pub fn pattern(&self, field: Field) -> Option<&Regex> {
        self.rules
            .iter()
            .find(|rule| rule.field == field)
            .map(|rule| &rule.pattern)
    }

    /// First text containing a match for `field`'s rule
    pub fn find_text<'a>(&self, field: Field, texts: &'a [String]) -> Option<&'a str> {
        let pattern = self.pattern(field)?;
        texts
            .iter()
            .map(String::as_str)
            .find(|text| pattern.is_match(text))
    }

    /// First match of `field`'s rule across `texts`
    ///
    /// Returns the first capture group when the rule has one, otherwise the
    /// whole match.
    pub fn find_value(&self, field: Field, texts: &[String]) -> Option<String> {
        let pattern = self.pattern(field)?;
        texts.iter().find_map(|text| {
            pattern.captures(text).map(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(0))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            })
        })
    }

    /// Every match of `field`'s rule within a single text
    pub fn find_all(&self, field: Field, text: &str) -> Vec<String> {
        self.pattern(field)
            .map(|pattern| {
                pattern
                    .find_iter(text)
                    .map(|m| m.as_str().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Value after the label delimiter, trimmed
    ///
    /// `"Англійська: Upper-Intermediate"` yields `"Upper-Intermediate"`.
    pub fn labelled_value(&self, text: &str) -> Option<String> {
        text.split(self.delimiter)
            .nth(1)
            .map(|value| value.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_label_field_has_a_rule() {
        for field in [
            Field::Salary,
            Field::EnglishLevel,
            Field::ExperienceYears,
            Field::Domain,
            Field::PublicationDate,
            Field::ViewsCount,
            Field::ApplicantCount,
        ] {
            assert!(UKRAINIAN.pattern(field).is_some(), "no rule for {}", field);
        }
        assert!(UKRAINIAN.pattern(Field::Title).is_none());
    }

    #[test]
    fn test_find_text_returns_first_match() {
        let t = texts(&["Office", "Домен: Fintech", "Домен: Adtech"]);
        assert_eq!(UKRAINIAN.find_text(Field::Domain, &t), Some("Домен: Fintech"));
    }

    #[test]
    fn test_find_value_uses_capture_group() {
        let t = texts(&["Опубліковано 5 травня 2023", "123 перегляди", "7 відгуків"]);
        assert_eq!(UKRAINIAN.find_value(Field::ViewsCount, &t), Some("123".to_string()));
        assert_eq!(UKRAINIAN.find_value(Field::ApplicantCount, &t), Some("7".to_string()));
    }

    #[test]
    fn test_find_value_whole_match_without_group() {
        let t = texts(&["Вакансія опублікована 5 травня 2023"]);
        assert_eq!(
            UKRAINIAN.find_value(Field::PublicationDate, &t),
            Some("5 травня 2023".to_string())
        );
    }

    #[test]
    fn test_find_all_digits() {
        assert_eq!(UKRAINIAN.find_all(Field::Salary, "$1000-1500"), vec!["1000", "1500"]);
        assert!(UKRAINIAN.find_all(Field::Salary, "за домовленістю").is_empty());
    }

    #[test]
    fn test_labelled_value() {
        assert_eq!(
            UKRAINIAN.labelled_value("Англійська: Upper-Intermediate"),
            Some("Upper-Intermediate".to_string())
        );
        assert_eq!(UKRAINIAN.labelled_value("no delimiter"), None);
    }
}
