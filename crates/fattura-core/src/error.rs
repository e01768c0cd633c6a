//! # Error Types
//!
//! Domain-specific error types for fattura-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fattura-core errors (this file)                                        │
//! │  ├── ValidationError  - One failing field rule                          │
//! │  ├── FieldErrors      - All failing rules of a submission, by field     │
//! │  └── CoreError        - Line item editing + wrapped validation          │
//! │                                                                         │
//! │  fattura-form errors (separate crate)                                   │
//! │  └── FormError        - What the embedding host sees (serialized)       │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → CoreError → FormError → Host     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every validation error names the field path it belongs to
//! 3. Expected invalid input is a value, never a panic

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// A single failing field rule.
///
/// `field` is the form path of the offending value, e.g. `supplierCountry`
/// or `lineItems[2].quantity`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value must have an exact length (country codes).
    #[error("{field} must be exactly {len} characters")]
    ExactLength { field: String, len: usize },

    /// Numeric value is outside an inclusive range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Invalid format (e-mail, date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the closed set of codes.
    #[error("{field} must be one of: {}", .allowed.join(", "))]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A list holds fewer entries than required.
    #[error("{field} must contain at least {min} item(s)")]
    MinItems { field: String, min: usize },
}

impl ValidationError {
    /// Returns the field path this error is attached to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::ExactLength { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::MinItems { field, .. } => field,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Every failing rule of one validation run, at most one per field.
///
/// Keeps the order in which the fields were checked, which is the order the
/// form lays them out. Serializes as a `{ field: message }` object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    errors: Vec<ValidationError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /// Records an error unless its field already has one.
    ///
    /// The first failing rule wins, so `required` is reported before a
    /// length rule on the same empty field.
    pub fn push(&mut self, error: ValidationError) {
        if self.get(error.field()).is_none() {
            self.errors.push(error);
        }
    }

    /// Records the error of a fallible check, if any.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.push(error);
        }
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field() == field)
    }

    /// Drops the error of one field (the user started correcting it).
    pub fn clear_field(&mut self, field: &str) {
        self.errors.retain(|e| e.field() != field);
    }

    /// Drops every error whose path starts with `prefix`.
    pub fn clear_prefix(&mut self, prefix: &str) {
        self.errors.retain(|e| !e.field().starts_with(prefix));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for error in &self.errors {
            map.serialize_entry(error.field(), &error.to_string())?;
        }
        map.end()
    }
}

impl FromIterator<ValidationError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        let mut errors = FieldErrors::new();
        for error in iter {
            errors.push(error);
        }
        errors
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations outside single-field validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The line item list must never become empty.
    ///
    /// ## When This Occurs
    /// - The user clicks "remove" on the only remaining line
    #[error("Cannot remove the last line item")]
    LastLineItem,

    /// No line item at the given position.
    #[error("Line item {index} not found (list has {len} items)")]
    LineItemNotFound { index: usize, len: usize },

    /// A field name sent by the host that the form does not have.
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    /// Submission rejected by the validation schema.
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "documentNumber".to_string(),
        };
        assert_eq!(err.to_string(), "documentNumber is required");

        let err = ValidationError::ExactLength {
            field: "supplierCountry".to_string(),
            len: 2,
        };
        assert_eq!(err.to_string(), "supplierCountry must be exactly 2 characters");

        let err = ValidationError::Negative {
            field: "lineItems[0].unitPrice".to_string(),
        };
        assert_eq!(err.to_string(), "lineItems[0].unitPrice must not be negative");

        let err = ValidationError::NotAllowed {
            field: "documentType".to_string(),
            allowed: vec!["TD07".into(), "TD08".into()],
        };
        assert_eq!(err.to_string(), "documentType must be one of: TD07, TD08");
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.push(ValidationError::Required {
            field: "supplierPostalCode".into(),
        });
        errors.push(ValidationError::TooShort {
            field: "supplierPostalCode".into(),
            min: 5,
        });

        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.get("supplierPostalCode"),
            Some(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_clear_prefix() {
        let mut errors: FieldErrors = vec![
            ValidationError::Required { field: "lineItems[0].description".into() },
            ValidationError::MustBePositive { field: "lineItems[0].quantity".into() },
            ValidationError::Required { field: "documentNumber".into() },
        ]
        .into_iter()
        .collect();

        errors.clear_prefix("lineItems[0].");
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["documentNumber"]);
    }

    #[test]
    fn test_serializes_as_field_message_map() {
        let errors: FieldErrors = vec![ValidationError::Required {
            field: "progressivoInvio".into(),
        }]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["progressivoInvio"], "progressivoInvio is required");
    }

    #[test]
    fn test_field_errors_convert_to_core_error() {
        let core_err: CoreError = FieldErrors::new().into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
