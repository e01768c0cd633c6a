//! # Validation Module
//!
//! The validation schema of the simplified-invoice form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Submission Pipeline                                │
//! │                                                                         │
//! │  InvoiceDraft (strings, Option<f64>)                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  validate_invoice() ← THIS MODULE                                      │
//! │  ├── every field rule runs, nothing short-circuits                      │
//! │  ├── first failing rule per field is kept                               │
//! │  └── errors keyed by form path ("lineItems[1].vatRate")                 │
//! │           │                                                             │
//! │           ├── any error ──► Err(FieldErrors)  (form shows them)         │
//! │           │                                                             │
//! │           └── clean ─────► Ok(Invoice)        (typed, handed on)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fattura_core::validation::{validate_exact_length, validate_invoice};
//! use fattura_core::{InvoiceDefaults, InvoiceDraft};
//!
//! assert!(validate_exact_length("supplierCountry", "IT", 2).is_ok());
//! assert!(validate_exact_length("supplierCountry", "ITA", 2).is_err());
//!
//! // A fresh draft still lacks supplier, customer and numbering data.
//! let draft = InvoiceDraft::new(&InvoiceDefaults::default());
//! let errors = validate_invoice(&draft).unwrap_err();
//! assert!(errors.get("progressivoInvio").is_some());
//! ```

use std::str::FromStr;

use chrono::NaiveDate;
use validator::Validate;

use crate::codes::{DocumentType, FiscalRegime, VatNature};
use crate::error::{FieldErrors, ValidationError};
use crate::invoice::{
    Address, DocumentData, Invoice, InvoiceLine, Party, PartyName, Supplier, TransmissionHeader,
    VatId,
};
use crate::types::{InvoiceDraft, LineItem};
use crate::MIN_LINE_ITEMS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Length of ISO 3166 alpha-2 country codes.
pub const COUNTRY_CODE_LEN: usize = 2;

/// Minimum length of the supplier VAT number.
pub const VAT_NUMBER_MIN_LEN: usize = 11;

/// Minimum length of a postal code (CAP).
pub const POSTAL_CODE_MIN_LEN: usize = 5;

/// Inclusive bounds of a VAT rate in percent.
pub const VAT_RATE_MIN: f64 = 0.0;
pub const VAT_RATE_MAX: f64 = 100.0;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a text field is not blank.
///
/// ## Example
/// ```rust
/// use fattura_core::validation::validate_required;
///
/// assert!(validate_required("documentNumber", "FS-1").is_ok());
/// assert!(validate_required("documentNumber", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a minimum length in characters (after trimming).
pub fn validate_min_length(field: &str, value: &str, min: usize) -> ValidationResult<()> {
    if value.trim().chars().count() < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    Ok(())
}

/// Validates an exact length in characters (after trimming).
pub fn validate_exact_length(field: &str, value: &str, len: usize) -> ValidationResult<()> {
    if value.trim().chars().count() != len {
        return Err(ValidationError::ExactLength {
            field: field.to_string(),
            len,
        });
    }
    Ok(())
}

#[derive(Validate)]
struct EmailAddress {
    #[validate(email)]
    address: String,
}

/// Validates the syntax of an e-mail (PEC) address.
///
/// ## Example
/// ```rust
/// use fattura_core::validation::validate_email;
///
/// assert!(validate_email("pecDestinatario", "fatture@pec.example.it").is_ok());
/// assert!(validate_email("pecDestinatario", "not-an-email").is_err());
/// ```
pub fn validate_email(field: &str, value: &str) -> ValidationResult<()> {
    let candidate = EmailAddress {
        address: value.trim().to_string(),
    };
    candidate
        .validate()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a valid e-mail address".to_string(),
        })
}

/// Parses a value of a closed code list.
pub fn validate_code<T: FromStr>(
    field: &str,
    value: &str,
    allowed: Vec<String>,
) -> ValidationResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ValidationError::NotAllowed {
            field: field.to_string(),
            allowed,
        })
}

/// Validates a required ISO date (`YYYY-MM-DD`).
pub fn validate_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    validate_required(field, value)?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a date in YYYY-MM-DD format".to_string(),
        }
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn present(field: &str, value: Option<f64>) -> ValidationResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        }),
        None => Err(ValidationError::Required {
            field: field.to_string(),
        }),
    }
}

/// Validates a quantity: present and strictly positive.
pub fn validate_quantity(field: &str, value: Option<f64>) -> ValidationResult<f64> {
    let qty = present(field, value)?;
    if qty <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(qty)
}

/// Validates a unit price: present and not negative. Zero is allowed.
pub fn validate_unit_price(field: &str, value: Option<f64>) -> ValidationResult<f64> {
    let price = present(field, value)?;
    if price < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(price)
}

/// Validates a VAT rate in percent: present and within 0..=100.
pub fn validate_vat_rate(field: &str, value: Option<f64>) -> ValidationResult<f64> {
    let rate = present(field, value)?;
    if !(VAT_RATE_MIN..=VAT_RATE_MAX).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: VAT_RATE_MIN,
            max: VAT_RATE_MAX,
        });
    }
    Ok(rate)
}

// =============================================================================
// Line Items
// =============================================================================

/// Validates one line; failures go to `errors` under `lineItems[index].*`.
pub fn validate_line_item(
    index: usize,
    item: &LineItem,
    errors: &mut FieldErrors,
) -> Option<InvoiceLine> {
    let path = |name: &str| format!("lineItems[{}].{}", index, name);
    let before = errors.len();

    errors.check(validate_required(&path("description"), &item.description));

    let quantity = validate_quantity(&path("quantity"), item.quantity)
        .map_err(|e| errors.push(e))
        .ok();
    let unit_price = validate_unit_price(&path("unitPrice"), item.unit_price)
        .map_err(|e| errors.push(e))
        .ok();
    let vat_rate = validate_vat_rate(&path("vatRate"), item.vat_rate)
        .map_err(|e| errors.push(e))
        .ok();

    let nature_field = path("vatNature");
    let vat_nature = match item.vat_nature.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => {
            validate_code::<VatNature>(&nature_field, code, VatNature::codes())
                .map(Some)
                .map_err(|e| errors.push(e))
                .unwrap_or(None)
        }
        _ => {
            // a zero rate needs the exemption reason
            if vat_rate == Some(0.0) {
                errors.push(ValidationError::Required {
                    field: nature_field,
                });
            }
            None
        }
    };

    if errors.len() > before {
        return None;
    }

    Some(InvoiceLine {
        id: item.id.clone(),
        description: item.description.trim().to_string(),
        quantity: quantity?,
        unit_price: unit_price?,
        vat_rate: vat_rate?,
        vat_nature,
    })
}

// =============================================================================
// Whole Record
// =============================================================================

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validates the full draft.
///
/// ## Returns
/// - `Ok(Invoice)` when every rule passes
/// - `Err(FieldErrors)` with one message per failing field otherwise
pub fn validate_invoice(draft: &InvoiceDraft) -> Result<Invoice, FieldErrors> {
    let mut errors = FieldErrors::new();

    // --- Transmission ---
    errors.check(validate_required("progressivoInvio", &draft.progressivo_invio));
    let pec = optional(&draft.pec_destinatario);
    if let Some(pec) = &pec {
        errors.check(validate_email("pecDestinatario", pec));
    }

    // --- Supplier ---
    errors.check(validate_exact_length(
        "supplierCountry",
        &draft.supplier_country,
        COUNTRY_CODE_LEN,
    ));
    errors.check(validate_min_length(
        "supplierVatNumber",
        &draft.supplier_vat_number,
        VAT_NUMBER_MIN_LEN,
    ));
    errors.check(validate_required("supplierAddress", &draft.supplier_address));
    errors.check(validate_required("supplierPostalCode", &draft.supplier_postal_code));
    errors.check(validate_min_length(
        "supplierPostalCode",
        &draft.supplier_postal_code,
        POSTAL_CODE_MIN_LEN,
    ));
    errors.check(validate_required("supplierCity", &draft.supplier_city));
    errors.check(validate_exact_length(
        "supplierCountryCode",
        &draft.supplier_country_code,
        COUNTRY_CODE_LEN,
    ));
    let regime = validate_code::<FiscalRegime>(
        "supplierRegime",
        &draft.supplier_regime,
        FiscalRegime::codes(),
    )
    .map_err(|e| errors.push(e))
    .ok();

    // --- Customer ---
    errors.check(validate_required("customerAddress", &draft.customer_address));
    errors.check(validate_required("customerPostalCode", &draft.customer_postal_code));
    errors.check(validate_min_length(
        "customerPostalCode",
        &draft.customer_postal_code,
        POSTAL_CODE_MIN_LEN,
    ));
    errors.check(validate_required("customerCity", &draft.customer_city));
    errors.check(validate_exact_length(
        "customerCountryCode",
        &draft.customer_country_code,
        COUNTRY_CODE_LEN,
    ));

    // --- Document ---
    let document_type = validate_code::<DocumentType>(
        "documentType",
        &draft.document_type,
        DocumentType::codes(),
    )
    .map_err(|e| errors.push(e))
    .ok();
    let document_date = validate_date("documentDate", &draft.document_date)
        .map_err(|e| errors.push(e))
        .ok();
    errors.check(validate_required("documentNumber", &draft.document_number));

    // --- Lines ---
    let items = draft.line_items.items();
    if items.len() < MIN_LINE_ITEMS {
        errors.push(ValidationError::MinItems {
            field: "lineItems".to_string(),
            min: MIN_LINE_ITEMS,
        });
    }
    let lines: Vec<Option<InvoiceLine>> = items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_line_item(index, item, &mut errors))
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    // Every Option below is Some once `errors` is empty.
    let (Some(regime), Some(kind), Some(date)) = (regime, document_type, document_date) else {
        return Err(errors);
    };
    let Some(line_items) = lines.into_iter().collect::<Option<Vec<_>>>() else {
        return Err(errors);
    };

    Ok(Invoice {
        transmission: TransmissionHeader {
            progressivo_invio: draft.progressivo_invio.trim().to_string(),
            codice_destinatario: draft.codice_destinatario.trim().to_string(),
            pec_destinatario: pec,
        },
        supplier: Supplier {
            party: Party {
                vat_id: Some(VatId {
                    country: draft.supplier_country.trim().to_string(),
                    code: draft.supplier_vat_number.trim().to_string(),
                }),
                tax_code: optional(&draft.supplier_tax_code),
                name: PartyName::from_parts(
                    draft.supplier_name.as_deref(),
                    draft.supplier_first_name.as_deref(),
                    draft.supplier_last_name.as_deref(),
                ),
                address: Address {
                    street: draft.supplier_address.trim().to_string(),
                    civic_number: optional(&draft.supplier_civic_number),
                    postal_code: draft.supplier_postal_code.trim().to_string(),
                    city: draft.supplier_city.trim().to_string(),
                    province: optional(&draft.supplier_province),
                    country_code: draft.supplier_country_code.trim().to_string(),
                },
            },
            regime,
        },
        customer: Party {
            vat_id: optional(&draft.customer_vat_number).map(|code| VatId {
                country: optional(&draft.customer_vat_country)
                    .unwrap_or_else(|| draft.customer_country_code.trim().to_string()),
                code,
            }),
            tax_code: optional(&draft.customer_tax_code),
            name: PartyName::from_parts(
                draft.customer_name.as_deref(),
                draft.customer_first_name.as_deref(),
                draft.customer_last_name.as_deref(),
            ),
            address: Address {
                street: draft.customer_address.trim().to_string(),
                civic_number: optional(&draft.customer_civic_number),
                postal_code: draft.customer_postal_code.trim().to_string(),
                city: draft.customer_city.trim().to_string(),
                province: optional(&draft.customer_province),
                country_code: draft.customer_country_code.trim().to_string(),
            },
        },
        document: DocumentData {
            kind,
            date,
            number: draft.document_number.trim().to_string(),
            currency: draft.currency.trim().to_string(),
        },
        line_items,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
