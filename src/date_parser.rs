//! Parsing of the date strings returned by the extraction service.
//!
//! Each document type comes back in its own layout:
//!
//! - address proof: `DD MM YYYY`
//! - utility bill: `MM/DD/YYYY` (month first)
//! - driving license expiry: `DD-MM-YY` or `DD MM YY`
//! - passport expiry: `DD-MM-YYYY`, `DD/MM/YYYY` or `DD MON YYYY`
//!
//! Two-digit years always resolve to `2000 + YY`.

use chrono::NaiveDate;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::models::DocumentType;

static SPACE_SEPARATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex is valid"));
static SLASH_SEPARATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*/\s*").expect("static regex is valid"));
static HYPHEN_SEPARATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*").expect("static regex is valid"));
static HYPHEN_OR_SPACE_SEPARATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*|\s+").expect("static regex is valid"));

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Layout of a raw date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `DD MM YYYY`
    DayMonthYearSpaced,
    /// `MM/DD/YYYY`
    MonthDayYearSlashed,
    /// `DD-MM-YY` or `DD MM YY`
    DayMonthShortYear,
    /// `DD-MM-YYYY`, `DD/MM/YYYY` or `DD MON YYYY`
    PassportExpiry,
}

impl DateFormat {
    /// The layout the extraction service uses for this document type.
    pub fn for_document(doc_type: DocumentType) -> Self {
        match doc_type {
            DocumentType::AddressProof => DateFormat::DayMonthYearSpaced,
            DocumentType::UtilityBill => DateFormat::MonthDayYearSlashed,
            DocumentType::DrivingLicense => DateFormat::DayMonthShortYear,
            DocumentType::Passport => DateFormat::PassportExpiry,
        }
    }

    /// Layout as shown to users.
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::DayMonthYearSpaced => "DD MM YYYY",
            DateFormat::MonthDayYearSlashed => "MM/DD/YYYY",
            DateFormat::DayMonthShortYear => "DD-MM-YY or DD MM YY",
            DateFormat::PassportExpiry => "DD-MM-YYYY, DD/MM/YYYY or DD MON YYYY",
        }
    }

    fn separator(self, input: &str) -> &'static Regex {
        match self {
            DateFormat::DayMonthYearSpaced => &*SPACE_SEPARATED,
            DateFormat::MonthDayYearSlashed => &*SLASH_SEPARATED,
            DateFormat::DayMonthShortYear => &*HYPHEN_OR_SPACE_SEPARATED,
            DateFormat::PassportExpiry => {
                if input.contains('-') {
                    &*HYPHEN_SEPARATED
                } else if input.contains('/') {
                    &*SLASH_SEPARATED
                } else {
                    &*SPACE_SEPARATED
                }
            }
        }
    }
}

/// Why a raw date string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParseErrorKind {
    /// Nothing but whitespace.
    Empty,
    /// Wrong number of day/month/year components.
    ComponentCount { found: usize },
    /// A component is not a number of the right length: one or two digits
    /// for day and month, two or four for the year.
    InvalidComponent { token: String },
    /// Alphabetic month that is not a three-letter English abbreviation.
    UnknownMonth { token: String },
    /// Components do not name a real calendar day.
    InvalidCalendarDate { year: i32, month: u32, day: u32 },
}

/// A raw date string that could not be resolved to a calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    /// The string as received.
    pub raw: String,
    /// The layout it was expected in.
    pub format: DateFormat,
    pub kind: DateParseErrorKind,
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse '{}' as {}: ", self.raw, self.format.pattern())?;
        match &self.kind {
            DateParseErrorKind::Empty => write!(f, "empty date"),
            DateParseErrorKind::ComponentCount { found } => {
                write!(f, "expected 3 components, found {}", found)
            }
            DateParseErrorKind::InvalidComponent { token } => {
                write!(f, "'{}' is not a valid day, month or year", token)
            }
            DateParseErrorKind::UnknownMonth { token } => {
                write!(f, "'{}' is not a known month", token)
            }
            DateParseErrorKind::InvalidCalendarDate { year, month, day } => {
                write!(f, "{:04}-{:02}-{:02} is not a calendar date", year, month, day)
            }
        }
    }
}

impl std::error::Error for DateParseError {}

/// Parses `raw` in the given layout into a calendar date.
pub fn parse_document_date(raw: &str, format: DateFormat) -> Result<NaiveDate, DateParseError> {
    let fail = |kind| DateParseError {
        raw: raw.to_string(),
        format,
        kind,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(fail(DateParseErrorKind::Empty));
    }

    let tokens: Vec<&str> = format.separator(trimmed).split(trimmed).collect();
    let [first, second, year_token] = tokens.as_slice() else {
        return Err(fail(DateParseErrorKind::ComponentCount {
            found: tokens.len(),
        }));
    };

    let (day_token, month_token) = match format {
        DateFormat::MonthDayYearSlashed => (*second, *first),
        _ => (*first, *second),
    };

    let day = parse_day_or_month(day_token).map_err(fail)?;
    let month = if format == DateFormat::PassportExpiry
        && month_token.chars().all(|c| c.is_ascii_alphabetic())
    {
        month_from_abbreviation(month_token).map_err(fail)?
    } else {
        parse_day_or_month(month_token).map_err(fail)?
    };
    let year = normalize_year(year_token).map_err(fail)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| fail(DateParseErrorKind::InvalidCalendarDate { year, month, day }))
}

/// Parses the date for a document type using that type's layout.
pub fn parse_for_document(raw: &str, doc_type: DocumentType) -> Result<NaiveDate, DateParseError> {
    parse_document_date(raw, DateFormat::for_document(doc_type))
}

fn parse_day_or_month(token: &str) -> Result<u32, DateParseErrorKind> {
    parse_digits(token, &[1, 2])
}

fn month_from_abbreviation(token: &str) -> Result<u32, DateParseErrorKind> {
    let upper = token.to_ascii_uppercase();
    MONTH_ABBREVIATIONS
        .iter()
        .position(|abbr| *abbr == upper)
        .map(|index| index as u32 + 1)
        .ok_or_else(|| DateParseErrorKind::UnknownMonth {
            token: token.to_string(),
        })
}

fn normalize_year(token: &str) -> Result<i32, DateParseErrorKind> {
    let value = parse_digits(token, &[2, 4])? as i32;
    Ok(if token.len() == 2 { 2000 + value } else { value })
}

/// Parses an all-ASCII-digit token whose length is one of `lengths`.
fn parse_digits(token: &str, lengths: &[usize]) -> Result<u32, DateParseErrorKind> {
    let invalid = || DateParseErrorKind::InvalidComponent {
        token: token.to_string(),
    };
    if !lengths.contains(&token.len()) || !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    token.parse().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_address_proof_format() {
        let date = parse_document_date("15 03 2024", DateFormat::DayMonthYearSpaced).unwrap();
        assert_eq!(date, ymd(2024, 3, 15));

        // Extra whitespace between components is tolerated
        let date = parse_document_date("  1   3  2024 ", DateFormat::DayMonthYearSpaced).unwrap();
        assert_eq!(date, ymd(2024, 3, 1));
    }

    #[test]
    fn test_utility_bill_is_month_first() {
        let date = parse_document_date("01/15/2024", DateFormat::MonthDayYearSlashed).unwrap();
        assert_eq!(date, ymd(2024, 1, 15));

        let err = parse_document_date("15/01/2024", DateFormat::MonthDayYearSlashed).unwrap_err();
        assert_eq!(
            err.kind,
            DateParseErrorKind::InvalidCalendarDate {
                year: 2024,
                month: 15,
                day: 1
            }
        );
    }

    #[test]
    fn test_driving_license_separators() {
        let hyphen = parse_document_date("01-06-25", DateFormat::DayMonthShortYear).unwrap();
        let space = parse_document_date("01 06 25", DateFormat::DayMonthShortYear).unwrap();

        assert_eq!(hyphen, ymd(2025, 6, 1));
        assert_eq!(space, ymd(2025, 6, 1));
    }

    #[test]
    fn test_passport_forms() {
        let format = DateFormat::PassportExpiry;

        assert_eq!(parse_document_date("15-01-2025", format).unwrap(), ymd(2025, 1, 15));
        assert_eq!(parse_document_date("15/01/2025", format).unwrap(), ymd(2025, 1, 15));
        assert_eq!(parse_document_date("15 JAN 2025", format).unwrap(), ymd(2025, 1, 15));
        assert_eq!(parse_document_date("15 JAN 25", format).unwrap(), ymd(2025, 1, 15));
        assert_eq!(parse_document_date("03 dec 2031", format).unwrap(), ymd(2031, 12, 3));
        assert_eq!(parse_document_date("03 Sep 2031", format).unwrap(), ymd(2031, 9, 3));
    }

    #[test]
    fn test_unknown_month_abbreviation() {
        let err = parse_document_date("15 JANUARY 2025", DateFormat::PassportExpiry).unwrap_err();
        assert_eq!(
            err.kind,
            DateParseErrorKind::UnknownMonth {
                token: "JANUARY".to_string()
            }
        );
    }

    #[test]
    fn test_month_abbreviation_only_for_passport() {
        let err = parse_document_date("15 JAN 2025", DateFormat::DayMonthYearSpaced).unwrap_err();
        assert!(matches!(err.kind, DateParseErrorKind::InvalidComponent { .. }));
    }

    #[test]
    fn test_rejects_invalid_calendar_date() {
        let err = parse_document_date("31 02 2024", DateFormat::DayMonthYearSpaced).unwrap_err();
        assert_eq!(err.raw, "31 02 2024");
        assert!(matches!(
            err.kind,
            DateParseErrorKind::InvalidCalendarDate { .. }
        ));

        // Leap day is fine in a leap year
        assert!(parse_document_date("29 02 2024", DateFormat::DayMonthYearSpaced).is_ok());
    }

    #[test]
    fn test_component_count() {
        let err = parse_document_date("2024-03-15-01", DateFormat::DayMonthShortYear).unwrap_err();
        assert_eq!(err.kind, DateParseErrorKind::ComponentCount { found: 4 });

        let err = parse_document_date("15/03", DateFormat::MonthDayYearSlashed).unwrap_err();
        assert_eq!(err.kind, DateParseErrorKind::ComponentCount { found: 2 });
    }

    #[test]
    fn test_non_numeric_components() {
        let err = parse_document_date("aa bb cccc", DateFormat::DayMonthYearSpaced).unwrap_err();
        assert_eq!(
            err.kind,
            DateParseErrorKind::InvalidComponent {
                token: "aa".to_string()
            }
        );

        let err = parse_document_date("+1 03 2024", DateFormat::DayMonthYearSpaced).unwrap_err();
        assert!(matches!(err.kind, DateParseErrorKind::InvalidComponent { .. }));

        let err = parse_document_date("123 03 2024", DateFormat::DayMonthYearSpaced).unwrap_err();
        assert_eq!(
            err.kind,
            DateParseErrorKind::InvalidComponent {
                token: "123".to_string()
            }
        );
    }

    #[test]
    fn test_year_lengths() {
        let err = parse_document_date("15 03 202", DateFormat::DayMonthYearSpaced).unwrap_err();
        assert_eq!(
            err.kind,
            DateParseErrorKind::InvalidComponent {
                token: "202".to_string()
            }
        );

        // A four digit year is taken as written, even where two digits are expected
        let date = parse_document_date("01-06-2025", DateFormat::DayMonthShortYear).unwrap();
        assert_eq!(date, ymd(2025, 6, 1));
    }

    #[test]
    fn test_empty_input() {
        let err = parse_document_date("   ", DateFormat::PassportExpiry).unwrap_err();
        assert_eq!(err.kind, DateParseErrorKind::Empty);
    }

    #[test]
    fn test_error_display_carries_raw_string() {
        let err = parse_document_date("xx-06-25", DateFormat::DayMonthShortYear).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("xx-06-25"));
        assert!(message.contains("DD-MM-YY or DD MM YY"));
    }
}
