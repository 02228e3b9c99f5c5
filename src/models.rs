use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::verdict::ValidationVerdict;

// ============ Domain Models ============

/// Fields extracted from an uploaded document by the external extraction service.
///
/// The shape depends on the document type; only the date field of the
/// relevant rule is ever read.
pub type ExtractedFields = Map<String, Value>;

/// Document types that carry a date-based validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    /// Passport, checked against its expiry date.
    Passport,
    /// Proof of address, checked against its issue date.
    #[serde(alias = "address_proof")]
    AddressProof,
    /// Utility bill, checked against its billing date.
    #[serde(alias = "utility_bill")]
    UtilityBill,
    /// Driving license, checked against its expiry date.
    #[serde(alias = "driving_license")]
    DrivingLicense,
}

impl DocumentType {
    /// All validated document types.
    pub const ALL: [DocumentType; 4] = [
        DocumentType::Passport,
        DocumentType::AddressProof,
        DocumentType::UtilityBill,
        DocumentType::DrivingLicense,
    ];

    /// Key of the extracted field holding the date this document is judged on.
    pub fn date_field(self) -> &'static str {
        match self {
            DocumentType::AddressProof => "document_date",
            DocumentType::UtilityBill => "bill_date",
            DocumentType::DrivingLicense | DocumentType::Passport => "date_of_expiry",
        }
    }

    /// Human-readable name used in verdict messages.
    pub fn label(self) -> &'static str {
        match self {
            DocumentType::Passport => "passport",
            DocumentType::AddressProof => "address proof",
            DocumentType::UtilityBill => "utility bill",
            DocumentType::DrivingLicense => "driving license",
        }
    }

    /// Whether the document is valid only while recent enough.
    pub fn is_age_windowed(self) -> bool {
        matches!(self, DocumentType::AddressProof | DocumentType::UtilityBill)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every document category an onboarding form can upload.
///
/// Categories without a date rule are never validated and stay pending
/// until reviewed by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Passport,
    #[serde(alias = "address_proof")]
    AddressProof,
    #[serde(alias = "utility_bill")]
    UtilityBill,
    #[serde(alias = "driving_license")]
    DrivingLicense,
    /// Ultimate beneficial owner declaration.
    #[serde(alias = "ubo_declaration")]
    UboDeclaration,
    /// Corporate structure chart.
    #[serde(alias = "structure_chart")]
    StructureChart,
}

impl DocumentKind {
    /// The date rule this category is validated with, if any.
    pub fn document_type(self) -> Option<DocumentType> {
        match self {
            DocumentKind::Passport => Some(DocumentType::Passport),
            DocumentKind::AddressProof => Some(DocumentType::AddressProof),
            DocumentKind::UtilityBill => Some(DocumentType::UtilityBill),
            DocumentKind::DrivingLicense => Some(DocumentType::DrivingLicense),
            DocumentKind::UboDeclaration | DocumentKind::StructureChart => None,
        }
    }
}

impl From<DocumentType> for DocumentKind {
    fn from(doc_type: DocumentType) -> Self {
        match doc_type {
            DocumentType::Passport => DocumentKind::Passport,
            DocumentType::AddressProof => DocumentKind::AddressProof,
            DocumentType::UtilityBill => DocumentKind::UtilityBill,
            DocumentType::DrivingLicense => DocumentKind::DrivingLicense,
        }
    }
}

// ============ API Models ============

/// Request body for `POST /api/v1/documents/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateDocumentRequest {
    /// Category of the uploaded document.
    pub document_type: DocumentKind,
    /// Fields returned by the extraction service for this document.
    #[serde(default)]
    pub extracted_data: ExtractedFields,
}

/// Verdict for a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentValidationResponse {
    pub document_type: DocumentKind,
    pub verdict: ValidationVerdict,
}

/// Request body for `POST /api/v1/documents/validate/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchValidationRequest {
    pub documents: Vec<ValidateDocumentRequest>,
}

/// Verdicts for a batch, in request order, all judged against one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchValidationResponse {
    /// The "today" every document in the batch was compared with.
    pub reference_date: String,
    pub results: Vec<DocumentValidationResponse>,
}
