//! # Validated Invoice
//!
//! The strongly typed record produced by [`crate::validation::validate_invoice`]
//! and handed to the submission handler. Every value in here already passed
//! the field rules, so consumers (XML writers, transmitters) can rely on the
//! shapes without re-checking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::codes::{DocumentType, FiscalRegime, VatNature};
use crate::totals::{compute_totals, vat_summary, Totals, VatSummaryLine};

/// Transmission header (DatiTrasmissione).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TransmissionHeader {
    pub progressivo_invio: String,
    pub codice_destinatario: String,
    pub pec_destinatario: Option<String>,
}

/// VAT identifier: country prefix plus number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VatId {
    pub country: String,
    pub code: String,
}

/// How a party is named.
///
/// The form offers both a legal name and a first/last name pair; whichever
/// was filled in wins, the legal name first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum PartyName {
    LegalName {
        name: String,
    },
    #[serde(rename_all = "camelCase")]
    Person {
        first_name: String,
        last_name: String,
    },
    Unnamed,
}

impl PartyName {
    /// Picks the name variant from the optional form fields.
    pub fn from_parts(
        legal: Option<&str>,
        first: Option<&str>,
        last: Option<&str>,
    ) -> Self {
        fn clean(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }

        if let Some(name) = clean(legal) {
            return PartyName::LegalName {
                name: name.to_string(),
            };
        }
        match (clean(first), clean(last)) {
            (None, None) => PartyName::Unnamed,
            (first, last) => PartyName::Person {
                first_name: first.unwrap_or_default().to_string(),
                last_name: last.unwrap_or_default().to_string(),
            },
        }
    }

    /// Single-line display name.
    pub fn display_name(&self) -> String {
        match self {
            PartyName::LegalName { name } => name.clone(),
            PartyName::Person {
                first_name,
                last_name,
            } => format!("{} {}", first_name, last_name).trim().to_string(),
            PartyName::Unnamed => String::new(),
        }
    }
}

/// Registered office (Sede).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Address {
    pub street: String,
    pub civic_number: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub province: Option<String>,
    pub country_code: String,
}

/// A supplier or customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Party {
    pub vat_id: Option<VatId>,
    pub tax_code: Option<String>,
    pub name: PartyName,
    pub address: Address,
}

/// Supplier with its fiscal regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Supplier {
    #[serde(flatten)]
    pub party: Party,
    pub regime: FiscalRegime,
}

/// Document metadata (DatiGeneraliDocumento).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DocumentData {
    pub kind: DocumentType,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub number: String,
    pub currency: String,
}

/// A validated invoice line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceLine {
    pub id: String,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub vat_rate: f64,
    pub vat_nature: Option<VatNature>,
}

/// An accepted simplified invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Invoice {
    pub transmission: TransmissionHeader,
    pub supplier: Supplier,
    pub customer: Party,
    pub document: DocumentData,
    pub line_items: Vec<InvoiceLine>,
}

impl Invoice {
    /// Document totals, recomputed from the lines.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.line_items)
    }

    /// Per-rate breakdown of the lines.
    pub fn vat_summary(&self) -> Vec<VatSummaryLine> {
        vat_summary(&self.line_items)
    }
}
