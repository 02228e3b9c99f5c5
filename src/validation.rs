/// Document validation workflow shared by the single and batch endpoints
///
/// 1. Read the document type's date field from the extracted record
/// 2. Run the date rule against today's date
/// 3. Derive the verdict returned to the caller
use chrono::NaiveDate;
use serde_json::Value;

use crate::models::{
    DocumentKind, DocumentType, DocumentValidationResponse, ExtractedFields,
    ValidateDocumentRequest,
};
use crate::rules::{validate_with_policy, MissingFieldError, RuleFailure, RulePolicy, RuleResult};
use crate::verdict::{derive_verdict, ValidationVerdict};

/// Raw date string for `doc_type`, if present, a string, and not blank.
pub fn date_field_value(doc_type: DocumentType, fields: &ExtractedFields) -> Option<&str> {
    fields
        .get(doc_type.date_field())
        .and_then(Value::as_str)
        .filter(|raw| !raw.trim().is_empty())
}

/// Runs the rule for `doc_type` on an extracted record.
pub fn evaluate(
    doc_type: DocumentType,
    fields: &ExtractedFields,
    today: NaiveDate,
    policy: &RulePolicy,
) -> RuleResult {
    match date_field_value(doc_type, fields) {
        Some(raw) => validate_with_policy(doc_type, raw, today, policy),
        None => Err(RuleFailure::MissingField(MissingFieldError {
            field: doc_type.date_field(),
        })),
    }
}

/// Validates an extracted record and returns the verdict.
pub fn validate_document(
    doc_type: DocumentType,
    fields: &ExtractedFields,
    today: NaiveDate,
    policy: &RulePolicy,
) -> ValidationVerdict {
    let result = evaluate(doc_type, fields, today, policy);

    if let Err(failure) = &result {
        tracing::debug!("{} not evaluated: {}", doc_type, failure);
    }

    derive_verdict(doc_type, &result)
}

/// Validates any uploaded document category.
///
/// Categories without a date rule come back pending.
pub fn validate_kind(
    kind: DocumentKind,
    fields: &ExtractedFields,
    today: NaiveDate,
    policy: &RulePolicy,
) -> ValidationVerdict {
    match kind.document_type() {
        Some(doc_type) => validate_document(doc_type, fields, today, policy),
        None => ValidationVerdict::pending(),
    }
}

/// Validates several documents against the same `today`, preserving order.
pub fn validate_batch(
    documents: &[ValidateDocumentRequest],
    today: NaiveDate,
    policy: &RulePolicy,
) -> Vec<DocumentValidationResponse> {
    documents
        .iter()
        .map(|document| DocumentValidationResponse {
            document_type: document.document_type,
            verdict: validate_kind(
                document.document_type,
                &document.extracted_data,
                today,
                policy,
            ),
        })
        .collect()
}
