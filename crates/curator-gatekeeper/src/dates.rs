//! Date extraction and temporal relevance
//!
//! Recognized formats: `dd.mm.yyyy`, `dd/mm/yyyy`, `yyyy-mm-dd` and the
//! Russian long form `15 января 2024`. Two-digit years are taken as 20xx.
//! A match that does not form a real calendar date is dropped silently.

use crate::config::DateConfig;
use crate::text::context_window;
use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref DOTTED: Regex = Regex::new(r"\b(\d{1,2})\.(\d{1,2})\.(\d{2,4})\b").unwrap();
    static ref SLASHED: Regex = Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{2,4})\b").unwrap();
    static ref ISO: Regex = Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap();
    static ref LONG: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+(января|февраля|марта|апреля|мая|июня|июля|августа|сентября|октября|ноября|декабря)\s+(\d{4})"
    )
    .unwrap();

    static ref EXPIRY_WORDS: Regex = Regex::new(
        r"(?i)(действует до|действителен до|действительна до|истекает|срок действия до|окончани\w* действия|прекращает действие|valid until|expires)"
    )
    .unwrap();
    static ref EFFECTIVE_WORDS: Regex = Regex::new(
        r"(?i)(вступает в силу|вступил\w* в силу|действует с|применяется с|начало действия|effective)"
    )
    .unwrap();
    static ref VERSION_WORDS: Regex = Regex::new(
        r"(?i)(версия от|редакци\w*|утвержд\w*|обновлен\w*|version)"
    )
    .unwrap();
}

const MONTHS: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня",
    "июля", "августа", "сентября", "октября", "ноября", "декабря",
];

/// What a date in the text refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateType {
    /// End of validity
    Expiry,
    /// Start of validity
    Effective,
    /// Edition or approval date
    Version,
    /// Anything else
    General,
}

impl DateType {
    fn label(&self) -> &'static str {
        match self {
            DateType::Expiry => "Expiry",
            DateType::Effective => "Effective",
            DateType::Version => "Version",
            DateType::General => "General",
        }
    }

    /// Expiry and effective dates bound the document's validity
    pub fn bounds_validity(&self) -> bool {
        matches!(self, DateType::Expiry | DateType::Effective)
    }
}

impl fmt::Display for DateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

/// A date found in the text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFinding {
    /// Matched text, verbatim
    pub date: String,

    /// Surrounding text
    pub context: String,

    /// Classification by nearby keywords
    #[serde(rename = "type")]
    pub date_type: DateType,

    /// Date lies before today
    pub is_expired: bool,

    /// Days left, when not expired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_expiry: Option<i64>,

    /// Parsed calendar date
    #[serde(skip)]
    pub parsed: Option<NaiveDate>,
}

impl DateFinding {
    /// Days since the date, when expired
    pub fn days_ago(&self, today: NaiveDate) -> Option<i64> {
        self.parsed
            .filter(|_| self.is_expired)
            .map(|date| (today - date).num_days())
    }
}

/// Outcome of date validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateValidation {
    /// Every recognized date, in text order
    pub dates: Vec<DateFinding>,

    /// Problems found
    pub warnings: Vec<String>,

    /// Suggested follow-ups
    pub recommendations: Vec<String>,

    /// False when an expiry or effective date has passed
    pub is_valid: bool,
}

impl DateValidation {
    /// First expired expiry/effective date, falling back to any expired date
    pub fn first_expired(&self) -> Option<&DateFinding> {
        self.dates
            .iter()
            .find(|d| d.is_expired && d.date_type.bounds_validity())
            .or_else(|| self.dates.iter().find(|d| d.is_expired))
    }
}

/// Extracts and judges the dates embedded in a document
#[derive(Debug, Clone, Default)]
pub struct DateValidator {
    config: DateConfig,
}

impl DateValidator {
    /// Create a validator with the given windows
    pub fn new(config: DateConfig) -> Self {
        Self { config }
    }

    /// Validate against today's local date
    pub fn validate(&self, text: &str) -> DateValidation {
        self.validate_at(text, Local::now().date_naive())
    }

    /// Validate against a fixed date
    pub fn validate_at(&self, text: &str, today: NaiveDate) -> DateValidation {
        let dates = self.extract(text, today);

        let mut warnings = Vec::new();
        let mut is_valid = true;
        for finding in &dates {
            let Some(parsed) = finding.parsed else { continue };
            let days = (parsed - today).num_days();

            if finding.date_type.bounds_validity() {
                if finding.is_expired {
                    is_valid = false;
                    warnings.push(format!(
                        "Document is outdated: {} date {} has expired ({} days ago)",
                        finding.date_type,
                        finding.date,
                        -days
                    ));
                } else if days <= self.config.expiring_soon_days {
                    warnings.push(format!(
                        "{} date {} is only {} days away",
                        finding.date_type.label(),
                        finding.date,
                        days
                    ));
                }
            } else if finding.date_type == DateType::Version && -days > self.config.stale_version_days {
                warnings.push(format!(
                    "Version date {} is more than {} days old; a newer edition may exist",
                    finding.date, self.config.stale_version_days
                ));
            }
        }

        let recommendations = self.recommend(&dates);

        DateValidation {
            dates,
            warnings,
            recommendations,
            is_valid,
        }
    }

    fn recommend(&self, dates: &[DateFinding]) -> Vec<String> {
        let mut recommendations = Vec::new();
        if dates.is_empty() {
            recommendations.push("No dates found; check the document's relevance manually".to_string());
            return recommendations;
        }
        if dates.iter().any(|d| d.is_expired) {
            recommendations.push("Find a newer version of this document".to_string());
        }
        if dates
            .iter()
            .any(|d| d.days_until_expiry.is_some_and(|n| n <= self.config.monitor_days))
        {
            recommendations.push(format!(
                "Monitor for updates: a date falls within the next {} days",
                self.config.monitor_days
            ));
        }
        if dates.iter().any(|d| d.date_type == DateType::Version) {
            recommendations.push("Check for a newer official version".to_string());
        }
        recommendations
    }

    /// Every parseable date in text order
    pub fn extract(&self, text: &str, today: NaiveDate) -> Vec<DateFinding> {
        let mut findings: Vec<(usize, DateFinding)> = Vec::new();

        for caps in DOTTED.captures_iter(text).chain(SLASHED.captures_iter(text)) {
            let parsed = parse_numeric(&caps[3], &caps[2], &caps[1]);
            findings.extend(self.finding(text, caps.get(0), parsed, today));
        }
        for caps in ISO.captures_iter(text) {
            let parsed = parse_numeric(&caps[1], &caps[2], &caps[3]);
            findings.extend(self.finding(text, caps.get(0), parsed, today));
        }
        for caps in LONG.captures_iter(text) {
            let parsed = parse_long(&caps[1], &caps[2], &caps[3]);
            findings.extend(self.finding(text, caps.get(0), parsed, today));
        }

        findings.sort_by_key(|(start, _)| *start);
        findings.into_iter().map(|(_, finding)| finding).collect()
    }

    fn finding(
        &self,
        text: &str,
        matched: Option<regex::Match<'_>>,
        parsed: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Option<(usize, DateFinding)> {
        let matched = matched?;
        let parsed = parsed?;
        let radius = self.config.context_radius;
        let context = context_window(text, matched.start(), matched.end(), radius);
        let preceding = context_window(&text[..matched.start()], matched.start(), matched.start(), radius);

        // the keyword right before a date outranks one that follows it
        let date_type = classify(preceding)
            .or_else(|| classify(context))
            .unwrap_or(DateType::General);

        let is_expired = parsed < today;
        Some((
            matched.start(),
            DateFinding {
                date: matched.as_str().to_string(),
                context: context.trim().to_string(),
                date_type,
                is_expired,
                days_until_expiry: (!is_expired).then(|| (parsed - today).num_days()),
                parsed: Some(parsed),
            },
        ))
    }
}

fn classify(context: &str) -> Option<DateType> {
    if EXPIRY_WORDS.is_match(context) {
        Some(DateType::Expiry)
    } else if EFFECTIVE_WORDS.is_match(context) {
        Some(DateType::Effective)
    } else if VERSION_WORDS.is_match(context) {
        Some(DateType::Version)
    } else {
        None
    }
}

/// Parse a single date written in any recognized format
///
/// ```
/// use chrono::NaiveDate;
/// use curator_gatekeeper::parse_date;
///
/// assert_eq!(parse_date("1 марта 2024"), NaiveDate::from_ymd_opt(2024, 3, 1));
/// assert_eq!(parse_date("01.03.24"), NaiveDate::from_ymd_opt(2024, 3, 1));
/// assert_eq!(parse_date("завтра"), None);
/// ```
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Some(caps) = DOTTED.captures(raw).or_else(|| SLASHED.captures(raw)) {
        return parse_numeric(&caps[3], &caps[2], &caps[1]);
    }
    if let Some(caps) = ISO.captures(raw) {
        return parse_numeric(&caps[1], &caps[2], &caps[3]);
    }
    LONG.captures(raw)
        .and_then(|caps| parse_long(&caps[1], &caps[2], &caps[3]))
}

fn parse_long(day: &str, month_name: &str, year: &str) -> Option<NaiveDate> {
    let month_name = month_name.to_lowercase();
    let month = MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

fn parse_numeric(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let mut year: i32 = year.parse().ok()?;
    if year < 100 {
        year += 2000;
    } else if year < 1000 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn validate(text: &str) -> DateValidation {
        DateValidator::default().validate_at(text, today())
    }

    #[test]
    fn test_expired_expiry_date() {
        let result = validate("Полис действует до 01.01.2020");

        assert_eq!(result.dates.len(), 1);
        let finding = &result.dates[0];
        assert_eq!(finding.date, "01.01.2020");
        assert_eq!(finding.date_type, DateType::Expiry);
        assert!(finding.is_expired);
        assert_eq!(finding.days_until_expiry, None);

        assert!(!result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("01.01.2020"));
        assert!(result.warnings[0].contains("outdated"));
        assert!(result
            .recommendations
            .contains(&"Find a newer version of this document".to_string()));
    }

    #[test]
    fn test_no_dates() {
        let result = validate("Текст без дат");
        assert!(result.dates.is_empty());
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
        assert_eq!(result.recommendations.len(), 1);
        assert!(result.recommendations[0].contains("manually"));
    }

    #[test]
    fn test_effective_date_in_future() {
        let result = validate("Новая редакция условий. Вступает в силу 15.06.2024");
        let finding = &result.dates[0];
        assert_eq!(finding.date_type, DateType::Effective);
        assert_eq!(finding.days_until_expiry, Some(14));
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("14 days away"));
        assert!(!result.warnings[0].contains("outdated"));
        assert!(result.recommendations[0].starts_with("Monitor for updates"));
    }

    #[test]
    fn test_stale_version_date() {
        let result = validate("Версия от 2022-03-10");
        assert_eq!(result.dates[0].date_type, DateType::Version);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("Version date 2022-03-10"));
        assert!(result
            .recommendations
            .contains(&"Check for a newer official version".to_string()));
    }

    #[test]
    fn test_recent_version_date_has_no_warning() {
        let result = validate("Версия от 2024-03-10");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_russian_long_form() {
        let result = validate("Документ действителен до 15 января 2030 года");
        assert_eq!(result.dates.len(), 1);
        assert_eq!(result.dates[0].date, "15 января 2030");
        assert_eq!(result.dates[0].parsed, NaiveDate::from_ymd_opt(2030, 1, 15));
        assert_eq!(result.dates[0].date_type, DateType::Expiry);
        assert!(!result.dates[0].is_expired);
    }

    #[test]
    fn test_two_digit_year_and_slashes() {
        let result = validate("Дата: 05/07/25");
        assert_eq!(result.dates[0].parsed, NaiveDate::from_ymd_opt(2025, 7, 5));
        assert_eq!(result.dates[0].date_type, DateType::General);
    }

    #[test]
    fn test_invalid_dates_are_dropped() {
        let result = validate("31.02.2024 и 45.13.2024");
        assert!(result.dates.is_empty());
    }

    #[test]
    fn test_findings_in_text_order() {
        let result = validate("2024-01-01, затем 10.10.2025 и 3 марта 2026");
        let raw: Vec<&str> = result.dates.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(raw, vec!["2024-01-01", "10.10.2025", "3 марта 2026"]);
    }

    #[test]
    fn test_preceding_keyword_wins() {
        // the first date's context also reaches "действует до"
        let result = validate("Действует с 01.01.2024 и действует до 31.12.2024");
        assert_eq!(result.dates[0].date_type, DateType::Effective);
        assert_eq!(result.dates[1].date_type, DateType::Expiry);
    }

    #[test]
    fn test_expired_general_date_recommends_newer_version() {
        let result = validate("Справка выдана 01.01.2020");
        assert_eq!(result.dates[0].date_type, DateType::General);
        assert!(result.dates[0].is_expired);
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
        assert_eq!(result.recommendations, vec!["Find a newer version of this document".to_string()]);
    }

    #[test]
    fn test_first_expired_prefers_validity_dates() {
        let result = validate("Обновлено 01.01.2021. Действует до 01.01.2022");
        let expired = result.first_expired().unwrap();
        assert_eq!(expired.date, "01.01.2022");
        assert_eq!(expired.days_ago(today()), Some(882));
    }
}
