//! # fattura-core: Pure Business Logic for the Simplified Invoice Form
//!
//! This crate is the **heart** of the form. It holds the record the user
//! edits, the rules it must satisfy and the totals derived from it, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Fattura Form Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Form (any framework)                     │   │
//! │  │   Header ──► Supplier ──► Customer ──► Lines ──► Totals/Submit  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ field events                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 fattura-form (mount, FormState)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ fattura-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │  types   │  │  editor  │  │  totals  │  │  validation  │   │   │
//! │  │   │  Draft   │  │  add /   │  │  Σ net   │  │  field rules │   │   │
//! │  │   │ LineItem │  │  remove  │  │  Σ VAT   │  │  → Invoice   │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO XML • NO NETWORK • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - The editable form record (`InvoiceDraft`, `LineItem`)
//! - [`editor`] - The never-empty line item list
//! - [`totals`] - Subtotal, VAT and grand total
//! - [`validation`] - Field rules turning a draft into an [`Invoice`]
//! - [`invoice`] - The validated, strongly typed record
//! - [`codes`] - Document types, fiscal regimes, VAT nature codes
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use fattura_core::{compute_totals, InvoiceDefaults, InvoiceDraft, LineItemEdit};
//!
//! let defaults = InvoiceDefaults::default();
//! let mut draft = InvoiceDraft::new(&defaults);
//!
//! draft.line_items.update(0, LineItemEdit::Quantity(Some(2.0))).unwrap();
//! draft.line_items.update(0, LineItemEdit::UnitPrice(Some(100.0))).unwrap();
//!
//! let totals = compute_totals(draft.line_items.items());
//! assert_eq!(totals.display().total, "244.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codes;
pub mod editor;
pub mod error;
pub mod invoice;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use codes::{DocumentType, FiscalRegime, VatNature};
pub use editor::{LineItemEdit, LineItemList};
pub use error::{CoreError, CoreResult, FieldErrors, ValidationError};
pub use invoice::Invoice;
pub use totals::{compute_totals, format_amount, Totals, TotalsDisplay};
pub use types::{InvoiceDefaults, InvoiceDraft, LineItem};
pub use validation::validate_invoice;

/// Minimum number of line items on a submitted invoice.
pub const MIN_LINE_ITEMS: usize = 1;
