//! Date rules for each validated document type.
//!
//! Address proofs and utility bills must be recent: at most
//! `max_age_months` calendar months between the document month and the
//! current month, day of month ignored. Driving licenses and passports
//! must expire strictly after today.

use chrono::{Datelike, NaiveDate};
use std::fmt;

use crate::date_parser::{parse_for_document, DateParseError};
use crate::models::DocumentType;

/// Recency window for address proofs and utility bills.
pub const DEFAULT_MAX_AGE_MONTHS: u32 = 6;

/// Tunable parameters of the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulePolicy {
    /// Oldest acceptable age, in whole months, for age-windowed documents (inclusive).
    pub max_age_months: u32,
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self {
            max_age_months: DEFAULT_MAX_AGE_MONTHS,
        }
    }
}

/// The check applied to a document's reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    /// Valid while no more than `max_months` old.
    AgeWindow { max_months: u32 },
    /// Valid while the expiry date lies after today.
    Expiry,
}

impl DateRule {
    pub fn for_document(doc_type: DocumentType, policy: &RulePolicy) -> Self {
        if doc_type.is_age_windowed() {
            DateRule::AgeWindow {
                max_months: policy.max_age_months,
            }
        } else {
            DateRule::Expiry
        }
    }

    /// Applies the rule to an already parsed date.
    pub fn check(self, date: NaiveDate, today: NaiveDate) -> RuleCheck {
        match self {
            DateRule::AgeWindow { max_months } => {
                let months_since_issue = months_between(date, today);
                RuleCheck {
                    is_valid: i64::from(months_since_issue) <= i64::from(max_months),
                    reference_date: date,
                    measure: RuleMeasure::Age {
                        months_since_issue,
                        max_months,
                    },
                }
            }
            DateRule::Expiry => RuleCheck {
                is_valid: date > today,
                reference_date: date,
                measure: RuleMeasure::Expiry {
                    days_until_expiry: (date - today).num_days(),
                },
            },
        }
    }
}

/// Metrics computed while checking a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMeasure {
    Age { months_since_issue: i32, max_months: u32 },
    /// Zero or negative once expired.
    Expiry { days_until_expiry: i64 },
}

/// Outcome of a rule whose date could be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleCheck {
    pub is_valid: bool,
    /// Issue date for age-windowed documents, expiry date otherwise.
    pub reference_date: NaiveDate,
    pub measure: RuleMeasure,
}

impl RuleCheck {
    pub fn months_since_issue(&self) -> Option<i32> {
        match self.measure {
            RuleMeasure::Age {
                months_since_issue, ..
            } => Some(months_since_issue),
            RuleMeasure::Expiry { .. } => None,
        }
    }
}

/// The extracted record has no usable value for the rule's date field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFieldError {
    pub field: &'static str,
}

impl fmt::Display for MissingFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing or empty field '{}'", self.field)
    }
}

impl std::error::Error for MissingFieldError {}

/// Why a rule could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleFailure {
    MissingField(MissingFieldError),
    Unparseable(DateParseError),
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleFailure::MissingField(e) => write!(f, "{}", e),
            RuleFailure::Unparseable(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RuleFailure {}

impl From<DateParseError> for RuleFailure {
    fn from(err: DateParseError) -> Self {
        RuleFailure::Unparseable(err)
    }
}

impl From<MissingFieldError> for RuleFailure {
    fn from(err: MissingFieldError) -> Self {
        RuleFailure::MissingField(err)
    }
}

pub type RuleResult = Result<RuleCheck, RuleFailure>;

/// Whole calendar months from `from` to `to`, ignoring the day of month.
///
/// Negative when `from` lies in a later month than `to`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

/// Validates a raw date string with the default policy.
pub fn validate(doc_type: DocumentType, raw: &str, today: NaiveDate) -> RuleResult {
    validate_with_policy(doc_type, raw, today, &RulePolicy::default())
}

/// Validates a raw date string for `doc_type` against `today`.
pub fn validate_with_policy(
    doc_type: DocumentType,
    raw: &str,
    today: NaiveDate,
    policy: &RulePolicy,
) -> RuleResult {
    if raw.trim().is_empty() {
        return Err(MissingFieldError {
            field: doc_type.date_field(),
        }
        .into());
    }

    let date = parse_for_document(raw, doc_type)?;
    Ok(DateRule::for_document(doc_type, policy).check(date, today))
}
