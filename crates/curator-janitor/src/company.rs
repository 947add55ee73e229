//! Company and product heuristics
//!
//! Carrier and product names are matched with word-prefix regexes so that
//! inflected forms ("СОГАЗа", "ипотеки") count while substrings inside other
//! words ("интересов" for РЕСО) do not.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Bucket for documents that belong to no particular carrier
pub const GENERAL_COMPANY: &str = "GENERAL";

struct KeywordSet {
    code: &'static str,
    display: &'static str,
    pattern: Regex,
}

impl KeywordSet {
    fn new(code: &'static str, display: &'static str, pattern: &str) -> Self {
        Self {
            code,
            display,
            pattern: Regex::new(&format!("(?i){}", pattern)).unwrap(),
        }
    }

    fn count(&self, text: &str) -> usize {
        self.pattern.find_iter(text).count()
    }
}

lazy_static! {
    static ref COMPANIES: Vec<KeywordSet> = vec![
        KeywordSet::new("SOGAZ", "СОГАЗ", r"\b(?:согаз|sogaz)"),
        KeywordSet::new("INGOSSTRAKH", "Ингосстрах", r"\b(?:ингосстрах|ingos)"),
        KeywordSet::new("RESO", "РЕСО", r"\b(?:ресо\b|ресо-гарант|reso\b)"),
        KeywordSet::new("ALFA", "АльфаСтрахование", r"\b(?:альфа\s*-?\s*страх|альфастрах|alfastrah|alfa\b)"),
        KeywordSet::new("VSK", "ВСК", r"\b(?:вск|vsk)\b"),
        KeywordSet::new("RGS", "Росгосстрах", r"\b(?:росгосстрах|ргс\b|rgs\b)"),
        KeywordSet::new("RENESSANS", "Ренессанс", r"\b(?:ренессанс|renessans|renaissance)"),
        KeywordSet::new("SOGLASIE", "Согласие", r#"(?:\bск\s+[«"]?согласие|[«"]согласие[»"]|\bsoglasie)"#),
        KeywordSet::new(GENERAL_COMPANY, "Общие правила", r"(?:\bфедеральн\w*\s+закон|\bбанк\w*\s+росси|\bцб\s+рф\b|\bцентробанк)"),
    ];

    static ref PRODUCTS: Vec<KeywordSet> = vec![
        KeywordSet::new("OSAGO", "ОСАГО", r"\b(?:осаго|osago|автогражданк)"),
        KeywordSet::new("KASKO", "КАСКО", r"\b(?:каско|kasko|casco)"),
        KeywordSet::new("DMS", "ДМС", r"\b(?:дмс\b|dms\b|добровольн\w*\s+медицинск)"),
        KeywordSet::new("IFL", "Страхование имущества", r"\b(?:ифл\b|имуществ|квартир|недвижимост)"),
        KeywordSet::new("TRAVEL", "ВЗР", r"\b(?:взр\b|путешеств|туризм|туристическ|выезжающ|travel)"),
        KeywordSet::new("MORTGAGE", "Ипотека", r"\b(?:ипотек|mortgage)"),
        KeywordSet::new("NS", "Несчастный случай", r"\b(?:нс\b|несчастн)"),
        KeywordSet::new("LIFE", "Страхование жизни", r"\b(?:жизн|life\b)"),
    ];

    static ref INSURANCE_TERMS: Regex = Regex::new(
        r"(?i)\b(?:страхов|полис|франшиз|выплат|преми|возмещени|insurance|policy)"
    )
    .unwrap();

    static ref TEST_MARKERS: Regex = Regex::new(
        r"(?i)(?:\btest\b|\bтест\b|lorem ipsum|пример документа)"
    )
    .unwrap();
}

/// Outcome of the company-belonging check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyValidation {
    /// Suggested carrier matches the current one
    pub is_correct: bool,

    /// Carrier code stored on the document
    pub current_company: String,

    /// Carrier with the highest tally
    pub suggested_company: String,

    /// `min(0.9, mentions * 0.2)`, or 0.3 when nothing matched
    pub confidence: f64,

    /// Weighted mention count of the suggested carrier
    pub mentions: usize,
}

/// Outcome of the title check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleValidation {
    /// Title names both its product and its carrier
    pub is_correct: bool,

    /// Product keyword is missing
    pub missing_product: bool,

    /// Carrier keyword is missing
    pub missing_company: bool,

    /// Title with the missing names prefixed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_title: Option<String>,
}

/// Whether the text mentions insurance-specific terms
pub fn has_insurance_keywords(content: &str) -> bool {
    INSURANCE_TERMS.is_match(content)
}

/// Whether a title or text carries placeholder/test markers
pub fn is_test_data(title: &str, content: &str) -> bool {
    TEST_MARKERS.is_match(title) || TEST_MARKERS.is_match(content)
}

/// Tally carrier mentions (title counted twice) and compare with `current`
pub fn validate_company(title: &str, content: &str, current: &str) -> CompanyValidation {
    let mut best: Option<(&KeywordSet, usize)> = None;
    for set in COMPANIES.iter() {
        let tally = set.count(content) + 2 * set.count(title);
        if tally > 0 && best.map_or(true, |(_, top)| tally > top) {
            best = Some((set, tally));
        }
    }

    let (suggested, mentions, confidence) = match best {
        Some((set, tally)) => (set.code, tally, (tally as f64 * 0.2).min(0.9)),
        None => (GENERAL_COMPANY, 0, 0.3),
    };

    CompanyValidation {
        is_correct: suggested.eq_ignore_ascii_case(current),
        current_company: current.to_string(),
        suggested_company: suggested.to_string(),
        confidence,
        mentions,
    }
}

/// Check that the title names its product and carrier
///
/// Codes without a keyword list are not checked.
pub fn validate_title(title: &str, company_code: &str, product_code: &str) -> TitleValidation {
    let product = PRODUCTS.iter().find(|s| s.code.eq_ignore_ascii_case(product_code));
    let company = COMPANIES
        .iter()
        .filter(|s| s.code != GENERAL_COMPANY)
        .find(|s| s.code.eq_ignore_ascii_case(company_code));

    let missing_product = product.is_some_and(|s| s.count(title) == 0);
    let missing_company = company.is_some_and(|s| s.count(title) == 0);

    let mut prefix = Vec::new();
    if let (true, Some(set)) = (missing_product, product) {
        prefix.push(set.display);
    }
    if let (true, Some(set)) = (missing_company, company) {
        prefix.push(set.display);
    }

    TitleValidation {
        is_correct: prefix.is_empty(),
        missing_product,
        missing_company,
        suggested_title: (!prefix.is_empty()).then(|| format!("{} {}", prefix.join(" "), title.trim())),
    }
}
