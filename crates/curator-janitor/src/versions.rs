//! Newer-version detection among sibling documents

use chrono::NaiveDate;
use curator_domain::{Document, DocumentId};
use curator_gatekeeper::parse_date;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

const DATE: &str = r"(\d{1,2}[./]\d{1,2}[./]\d{2,4}|\d{4}-\d{2}-\d{2}|\d{1,2}\s+[а-яё]+\s+\d{4})";

lazy_static! {
    static ref EFFECTIVE_FROM: Regex =
        Regex::new(&format!(r"(?i)(?:действует|вступает\s+в\s+силу|применяется)\s+с\s+{}", DATE)).unwrap();
    static ref VERSION_OF: Regex =
        Regex::new(&format!(r"(?i)(?:версия|редакция|редакции)\s+от\s+{}", DATE)).unwrap();
}

/// The date a document takes effect, with its raw text
///
/// Looks for "действует с", "вступает в силу с" and "применяется с" first and
/// falls back to "версия от"/"редакция от". Unparseable matches are skipped.
pub fn effective_date(text: &str) -> Option<(NaiveDate, String)> {
    [&*EFFECTIVE_FROM, &*VERSION_OF].iter().find_map(|pattern| {
        pattern.captures_iter(text).find_map(|caps| {
            let raw = caps.get(1)?.as_str();
            parse_date(raw).map(|date| (date, raw.to_string()))
        })
    })
}

/// A sibling that supersedes the analyzed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewerVersionInfo {
    /// Newer sibling
    pub doc_id: DocumentId,

    /// Its title
    pub title: String,

    /// Its effective date as written
    pub effective_date: String,

    /// Human-readable explanation
    pub explanation: String,
}

/// First sibling whose effective date is strictly later than `own`
pub fn find_newer_version(
    document: &Document,
    own: &(NaiveDate, String),
    siblings: &[Document],
) -> Option<NewerVersionInfo> {
    siblings
        .iter()
        .filter(|s| s.id != document.id)
        .find_map(|sibling| {
            let (date, raw) = effective_date(&sibling.content())?;
            (date > own.0).then(|| NewerVersionInfo {
                doc_id: sibling.id,
                title: sibling.title.clone(),
                effective_date: raw.clone(),
                explanation: format!(
                    "\"{}\" ({}) effective {} is superseded by \"{}\" ({}) effective {}",
                    document.title, document.id, own.1, sibling.title, sibling.id, raw
                ),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_domain::{Approval, Chunk, Obsolescence};

    fn doc(title: &str, text: &str) -> Document {
        let id = DocumentId::new();
        Document {
            id,
            company_code: "RGS".to_string(),
            product_code: "OSAGO".to_string(),
            title: title.to_string(),
            chunks: vec![Chunk {
                doc_id: id,
                chunk_idx: 0,
                text: text.to_string(),
            }],
            source_url: None,
            file_url: None,
            version: String::new(),
            created_at: 0,
            approval: Approval::default(),
            obsolescence: Obsolescence::default(),
        }
    }

    #[test]
    fn test_effective_date_patterns() {
        let (date, raw) = effective_date("Правила действуют. Действует с 01.04.2023 года").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 4, 1).unwrap());
        assert_eq!(raw, "01.04.2023");

        let (date, _) = effective_date("Вступает в силу с 1 июля 2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());

        let (date, _) = effective_date("применяется с 2022-01-10").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2022, 1, 10).unwrap());
    }

    #[test]
    fn test_version_fallback() {
        let (date, raw) = effective_date("Редакция от 15.02.2021").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 2, 15).unwrap());
        assert_eq!(raw, "15.02.2021");
    }

    #[test]
    fn test_effective_wins_over_version() {
        let (_, raw) = effective_date("Редакция от 15.02.2021. Действует с 01.03.2021").unwrap();
        assert_eq!(raw, "01.03.2021");
    }

    #[test]
    fn test_no_effective_date() {
        assert!(effective_date("Без дат").is_none());
        assert!(effective_date("Действует с 45.45.2021").is_none());
    }

    #[test]
    fn test_finds_first_newer_sibling() {
        let old = doc("ОСАГО 2022", "Действует с 01.01.2022");
        let own = effective_date(&old.content()).unwrap();
        let siblings = vec![
            doc("ОСАГО 2021", "Действует с 01.01.2021"),
            doc("ОСАГО 2023", "Действует с 01.01.2023"),
            doc("ОСАГО 2024", "Действует с 01.01.2024"),
        ];

        let newer = find_newer_version(&old, &own, &siblings).unwrap();
        assert_eq!(newer.doc_id, siblings[1].id);
        assert!(newer.explanation.contains("ОСАГО 2022"));
        assert!(newer.explanation.contains("ОСАГО 2023"));
        assert!(newer.explanation.contains("01.01.2023"));
    }

    #[test]
    fn test_same_date_is_not_newer() {
        let old = doc("A", "Действует с 01.01.2022");
        let own = effective_date(&old.content()).unwrap();
        let siblings = vec![old.clone(), doc("B", "Действует с 01.01.2022"), doc("C", "без даты")];
        assert!(find_newer_version(&old, &own, &siblings).is_none());
    }
}
