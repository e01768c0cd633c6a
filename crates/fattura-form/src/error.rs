//! # Form Error Type
//!
//! Unified error type returned to the embedding host.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Form                               │
//! │                                                                         │
//! │  Host (web page)              Rust                                      │
//! │  ───────────────              ────                                      │
//! │                                                                         │
//! │  form.submit()                                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  FormState::submit → Result<Invoice, FormError>                  │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Field rules fail? ── CoreError::Validation(FieldErrors) ──┐     │  │
//! │  │         │                                                  ▼     │  │
//! │  │  Editor refused?  ── CoreError::LastLineItem ────────► FormError │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "VALIDATION_ERROR",                                          │
//! │    "message": "2 field(s) need attention",                              │
//! │    "fields": { "supplierCity": "supplierCity is required", ... } }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use fattura_core::{CoreError, FieldErrors};
use serde::Serialize;

/// Error returned from form operations.
///
/// ## Serialization
/// ```json
/// {
///   "code": "LINE_ITEM_ERROR",
///   "message": "Cannot remove the last line item"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct FormError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field messages, only for `VALIDATION_ERROR`
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub fields: FieldErrors,
}

/// Error codes for form responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Submission rejected by the field rules
    ValidationError,

    /// Line item add/remove/update refused
    LineItemError,

    /// Host sent a field name the form does not have
    UnknownField,

    /// Mount target does not exist on the surface
    ContainerNotFound,

    /// Mount target already hosts a form
    ContainerOccupied,

    /// Unmount of a handle the surface does not know
    NotMounted,

    /// Host configuration could not be parsed
    InvalidConfig,
}

impl FormError {
    /// Creates a new form error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        FormError {
            code,
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    /// Creates a validation error carrying the per-field messages.
    pub fn validation(fields: FieldErrors) -> Self {
        FormError {
            code: ErrorCode::ValidationError,
            message: format!("{} field(s) need attention", fields.len()),
            fields,
        }
    }

    pub fn container_not_found(container_id: &str) -> Self {
        FormError::new(
            ErrorCode::ContainerNotFound,
            format!("Container not found: {}", container_id),
        )
    }

    pub fn container_occupied(container_id: &str) -> Self {
        FormError::new(
            ErrorCode::ContainerOccupied,
            format!("Container already hosts a form: {}", container_id),
        )
    }

    pub fn not_mounted(container_id: &str) -> Self {
        FormError::new(
            ErrorCode::NotMounted,
            format!("No form mounted by this handle in: {}", container_id),
        )
    }
}

/// Converts core errors to form errors.
impl From<CoreError> for FormError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(fields) => FormError::validation(fields),
            CoreError::LastLineItem | CoreError::LineItemNotFound { .. } => {
                FormError::new(ErrorCode::LineItemError, err.to_string())
            }
            CoreError::UnknownField(_) => FormError::new(ErrorCode::UnknownField, err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        tracing::warn!("Rejected form configuration: {}", err);
        FormError::new(
            ErrorCode::InvalidConfig,
            format!("Invalid form configuration: {}", err),
        )
    }
}

/// Result type for form operations.
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;
    use fattura_core::ValidationError;

    #[test]
    fn test_last_line_item_maps_to_line_item_error() {
        let err: FormError = CoreError::LastLineItem.into();
        assert_eq!(err.code, ErrorCode::LineItemError);
        assert_eq!(err.message, "Cannot remove the last line item");
    }

    #[test]
    fn test_validation_error_serialization() {
        let fields: FieldErrors = vec![ValidationError::Required {
            field: "supplierCity".into(),
        }]
        .into_iter()
        .collect();
        let err: FormError = CoreError::Validation(fields).into();

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "1 field(s) need attention");
        assert_eq!(json["fields"]["supplierCity"], "supplierCity is required");
    }

    #[test]
    fn test_fields_omitted_when_empty() {
        let err = FormError::container_not_found("invoice-root");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "CONTAINER_NOT_FOUND");
        assert!(json.get("fields").is_none());
    }
}
