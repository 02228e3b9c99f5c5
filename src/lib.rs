//! KYC Document Validation Library
//!
//! Date checks for documents uploaded during corporate onboarding: parses the
//! dates returned by the extraction service, applies the per-document rule
//! (recency for address proofs and utility bills, expiry for driving licenses
//! and passports) and derives the approved/rejected verdict shown to users.
//!
//! # Modules
//!
//! - `api`: API-layer namespace.
//! - `core`: Domain-layer namespace.
//! - `clock`: Injectable source of "today".
//! - `config`: Configuration management.
//! - `date_parser`: Raw date string parsing per document layout.
//! - `errors`: HTTP error types.
//! - `handlers`: HTTP request handlers and router.
//! - `models`: Document types and request/response models.
//! - `rules`: Recency and expiry rules.
//! - `validation`: Extracted record -> rule -> verdict workflow.
//! - `verdict`: Status derivation and the verdict type.

pub mod api;
pub mod core;

pub mod clock;
pub mod config;
pub mod date_parser;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod rules;
pub mod validation;
pub mod verdict;
