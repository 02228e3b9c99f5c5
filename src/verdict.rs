use serde::{Deserialize, Serialize};

use crate::date_parser::DateFormat;
use crate::models::DocumentType;
use crate::rules::{RuleFailure, RuleMeasure, RuleResult};

/// Review status of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Not validated yet, or not validated automatically at all.
    Pending,
    Approved,
    Rejected,
}

/// Result of validating one document's date.
///
/// `message` is shown verbatim to the person who uploaded the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub status: DocumentStatus,
    pub message: String,
    /// Only set for address proofs and utility bills.
    pub months_since_issue: Option<i32>,
    /// `YYYY-MM-DD` of the parsed date, if it could be parsed.
    pub formatted_date: Option<String>,
}

impl ValidationVerdict {
    /// Placeholder for documents that no date rule applies to.
    pub fn pending() -> Self {
        Self {
            is_valid: false,
            status: DocumentStatus::Pending,
            message: "Document received and awaiting manual review.".to_string(),
            months_since_issue: None,
            formatted_date: None,
        }
    }
}

/// Turns a rule result into the verdict returned to callers.
///
/// Total: every `RuleResult`, including failures, yields an approved or
/// rejected verdict.
pub fn derive_verdict(doc_type: DocumentType, result: &RuleResult) -> ValidationVerdict {
    let label = doc_type.label();

    match result {
        Ok(check) => {
            let date = check.reference_date.format("%Y-%m-%d").to_string();
            let message = match (check.measure, check.is_valid) {
                (RuleMeasure::Age { max_months, .. }, true) => format!(
                    "{} accepted (dated {}, within the last {} months).",
                    capitalize(label),
                    date,
                    max_months
                ),
                (
                    RuleMeasure::Age {
                        months_since_issue,
                        max_months,
                    },
                    false,
                ) => format!(
                    "{} is older than {} months (dated {}, {} months ago). Please upload a document dated within the last {} months.",
                    capitalize(label),
                    max_months,
                    date,
                    months_since_issue,
                    max_months
                ),
                (RuleMeasure::Expiry { days_until_expiry }, true) => format!(
                    "{} is valid until {} ({} {} remaining).",
                    capitalize(label),
                    date,
                    days_until_expiry,
                    if days_until_expiry == 1 { "day" } else { "days" }
                ),
                (RuleMeasure::Expiry { .. }, false) => format!(
                    "{} expired on {}. Please upload a {} that has not expired.",
                    capitalize(label),
                    date,
                    label
                ),
            };

            ValidationVerdict {
                is_valid: check.is_valid,
                status: if check.is_valid {
                    DocumentStatus::Approved
                } else {
                    DocumentStatus::Rejected
                },
                message,
                months_since_issue: check.months_since_issue(),
                formatted_date: Some(date),
            }
        }
        Err(failure) => rejected(failure_message(doc_type, failure)),
    }
}

fn failure_message(doc_type: DocumentType, failure: &RuleFailure) -> String {
    let label = doc_type.label();
    let date_kind = if doc_type.is_age_windowed() {
        "document date"
    } else {
        "expiry date"
    };

    match failure {
        RuleFailure::MissingField(_) => {
            format!("No {} found on the {}.", date_kind, label)
        }
        RuleFailure::Unparseable(err) => format!(
            "Invalid {} format on the {}: '{}' (expected {}).",
            date_kind,
            label,
            err.raw.trim(),
            DateFormat::for_document(doc_type).pattern()
        ),
    }
}

fn rejected(message: String) -> ValidationVerdict {
    ValidationVerdict {
        is_valid: false,
        status: DocumentStatus::Rejected,
        message,
        months_since_issue: None,
        formatted_date: None,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::validate;
    use chrono::NaiveDate;
    use serde_json::json;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_approved_age_verdict() {
        let result = validate(DocumentType::UtilityBill, "01/15/2024", ymd(2024, 8, 1));
        let verdict = derive_verdict(DocumentType::UtilityBill, &result);

        assert!(verdict.is_valid);
        assert_eq!(verdict.status, DocumentStatus::Approved);
        assert_eq!(verdict.months_since_issue, Some(6));
        assert_eq!(verdict.formatted_date.as_deref(), Some("2024-01-15"));
        assert!(verdict.message.starts_with("Utility bill accepted"));
    }

    #[test]
    fn test_rejected_age_verdict_states_limit() {
        let result = validate(DocumentType::AddressProof, "15 01 2024", ymd(2024, 9, 1));
        let verdict = derive_verdict(DocumentType::AddressProof, &result);

        assert_eq!(verdict.status, DocumentStatus::Rejected);
        assert_eq!(verdict.months_since_issue, Some(8));
        assert!(verdict.message.contains("older than 6 months"));
    }

    #[test]
    fn test_expired_passport_verdict() {
        let result = validate(DocumentType::Passport, "01 JAN 2024", ymd(2024, 6, 1));
        let verdict = derive_verdict(DocumentType::Passport, &result);

        assert_eq!(verdict.status, DocumentStatus::Rejected);
        assert_eq!(verdict.months_since_issue, None);
        assert_eq!(verdict.formatted_date.as_deref(), Some("2024-01-01"));
        assert!(verdict.message.contains("expired on 2024-01-01"));
    }

    #[test]
    fn test_missing_and_unparseable_are_distinct() {
        let today = ymd(2024, 6, 1);

        let missing = derive_verdict(
            DocumentType::AddressProof,
            &validate(DocumentType::AddressProof, "", today),
        );
        let garbled = derive_verdict(
            DocumentType::AddressProof,
            &validate(DocumentType::AddressProof, "15 xx 2024", today),
        );

        assert_eq!(missing.message, "No document date found on the address proof.");
        assert!(garbled.message.starts_with("Invalid document date format"));
        assert!(garbled.message.contains("15 xx 2024"));
        assert_eq!(garbled.formatted_date, None);
    }

    #[test]
    fn test_expiry_failure_wording() {
        let verdict = derive_verdict(
            DocumentType::DrivingLicense,
            &validate(DocumentType::DrivingLicense, "32-13-25", ymd(2024, 1, 1)),
        );

        assert_eq!(verdict.status, DocumentStatus::Rejected);
        assert!(verdict
            .message
            .starts_with("Invalid expiry date format on the driving license"));
        assert!(verdict.message.ends_with("(expected DD-MM-YY or DD MM YY)."));
    }

    #[test]
    fn test_valid_expiry_reports_days_remaining() {
        let today = ymd(2024, 6, 1);

        let verdict = derive_verdict(
            DocumentType::Passport,
            &validate(DocumentType::Passport, "15 JUN 2024", today),
        );
        assert_eq!(
            verdict.message,
            "Passport is valid until 2024-06-15 (14 days remaining)."
        );

        let verdict = derive_verdict(
            DocumentType::DrivingLicense,
            &validate(DocumentType::DrivingLicense, "02-06-24", today),
        );
        assert_eq!(
            verdict.message,
            "Driving license is valid until 2024-06-02 (1 day remaining)."
        );
    }

    #[test]
    fn test_verdict_serializes_camel_case() {
        let verdict = derive_verdict(
            DocumentType::AddressProof,
            &validate(DocumentType::AddressProof, "", ymd(2024, 6, 1)),
        );

        assert_eq!(
            serde_json::to_value(&verdict).unwrap(),
            json!({
                "isValid": false,
                "status": "rejected",
                "message": "No document date found on the address proof.",
                "monthsSinceIssue": null,
                "formattedDate": null
            })
        );
    }

    #[test]
    fn test_pending_placeholder() {
        let verdict = ValidationVerdict::pending();

        assert_eq!(verdict.status, DocumentStatus::Pending);
        assert!(!verdict.is_valid);
    }
}
