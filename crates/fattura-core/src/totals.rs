//! # Totals Calculator
//!
//! Derives the document totals from the line items.
//!
//! ## Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   line net   = quantity × unitPrice                                     │
//! │   line VAT   = quantity × unitPrice × vatRate / 100                     │
//! │                                                                         │
//! │   subtotal   = Σ line net                                               │
//! │   vatTotal   = Σ line VAT                                               │
//! │   total      = subtotal + vatTotal                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are never stored: every observer recomputes them from the lines.
//! A value missing from a half-edited line counts as 0. No rounding happens
//! here; [`format_amount`] rounds to two decimals for display only.
//!
//! ## Usage
//! ```rust
//! use fattura_core::totals::{compute_totals, format_amount};
//! use fattura_core::{InvoiceDefaults, LineItem};
//!
//! let mut line = LineItem::new(&InvoiceDefaults::default());
//! line.quantity = Some(2.0);
//! line.unit_price = Some(100.0);
//!
//! let totals = compute_totals(&[line]);
//! assert_eq!(format_amount(totals.total), "244.00");
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::codes::VatNature;
use crate::invoice::InvoiceLine;
use crate::types::LineItem;

/// Anything that contributes an amount to the totals.
pub trait LineAmounts {
    fn quantity(&self) -> f64;
    fn unit_price(&self) -> f64;
    fn vat_rate(&self) -> f64;

    /// `quantity × unitPrice`.
    fn net(&self) -> f64 {
        self.quantity() * self.unit_price()
    }

    /// `quantity × unitPrice × vatRate / 100`.
    fn vat(&self) -> f64 {
        self.net() * self.vat_rate() / 100.0
    }
}

impl LineAmounts for LineItem {
    fn quantity(&self) -> f64 {
        self.quantity.unwrap_or(0.0)
    }

    fn unit_price(&self) -> f64 {
        self.unit_price.unwrap_or(0.0)
    }

    fn vat_rate(&self) -> f64 {
        self.vat_rate.unwrap_or(0.0)
    }
}

impl LineAmounts for InvoiceLine {
    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit_price(&self) -> f64 {
        self.unit_price
    }

    fn vat_rate(&self) -> f64 {
        self.vat_rate
    }
}

/// Document totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Totals {
    pub subtotal: f64,
    pub vat_total: f64,
    pub total: f64,
}

impl Totals {
    /// The three amounts rounded to two decimals.
    pub fn display(&self) -> TotalsDisplay {
        TotalsDisplay {
            subtotal: format_amount(self.subtotal),
            vat_total: format_amount(self.vat_total),
            total: format_amount(self.total),
        }
    }
}

/// Totals formatted for the form footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TotalsDisplay {
    pub subtotal: String,
    pub vat_total: String,
    pub total: String,
}

/// Computes subtotal, VAT total and grand total. Empty input gives zeros.
pub fn compute_totals<L: LineAmounts>(lines: &[L]) -> Totals {
    let (subtotal, vat_total) = lines
        .iter()
        .fold((0.0, 0.0), |(net, vat), line| (net + line.net(), vat + line.vat()));

    Totals {
        subtotal,
        vat_total,
        total: subtotal + vat_total,
    }
}

/// Rounds to two decimals for display.
pub fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    // avoid "-0.00"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.2}", rounded)
}

// =============================================================================
// VAT Summary
// =============================================================================

/// One row of the per-rate breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VatSummaryLine {
    pub vat_rate: f64,
    pub vat_nature: Option<VatNature>,
    /// Σ net of the lines at this rate.
    pub taxable: f64,
    /// Σ VAT of the lines at this rate.
    pub vat: f64,
}

/// Groups validated lines by `(vatRate, vatNature)`, in first-seen order.
pub fn vat_summary(lines: &[InvoiceLine]) -> Vec<VatSummaryLine> {
    let mut summary: Vec<VatSummaryLine> = Vec::new();

    for line in lines {
        match summary
            .iter_mut()
            .find(|row| row.vat_rate == line.vat_rate && row.vat_nature == line.vat_nature)
        {
            Some(row) => {
                row.taxable += line.net();
                row.vat += line.vat();
            }
            None => summary.push(VatSummaryLine {
                vat_rate: line.vat_rate,
                vat_nature: line.vat_nature,
                taxable: line.net(),
                vat: line.vat(),
            }),
        }
    }

    summary
}

// =============================================================================
// Unit Tests
// =============================================================================
