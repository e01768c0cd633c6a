//! # Form Record Types
//!
//! The record the web form edits: flat, string-typed, tolerant of
//! half-typed input. [`crate::validation`] turns it into the strongly typed
//! [`crate::invoice::Invoice`].
//!
//! ## Field Groups
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         InvoiceDraft                                    │
//! │                                                                         │
//! │  Transmission     progressivoInvio, codiceDestinatario, pecDestinatario │
//! │  Supplier         supplierCountry, supplierVatNumber, supplierRegime,   │
//! │                   name / first+last, address block                      │
//! │  Customer         customerVatNumber?, customerTaxCode?,                 │
//! │                   name / first+last, address block                      │
//! │  Document         documentType, documentDate, documentNumber, currency  │
//! │  Lines            lineItems: [LineItem, ...]  (never empty)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names on the wire are camelCase and double as the keys of
//! [`crate::error::FieldErrors`].

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::codes::{DocumentType, FiscalRegime};
use crate::editor::LineItemList;
use crate::error::{CoreError, CoreResult};

// =============================================================================
// Defaults
// =============================================================================

/// Values a freshly initialized form starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct InvoiceDefaults {
    /// Country code used for supplier/customer (ISO 3166 alpha-2).
    pub country_code: String,

    /// Currency code (ISO 4217).
    pub currency: String,

    pub document_type: DocumentType,

    pub supplier_regime: FiscalRegime,

    /// Recipient code used when the customer only has a PEC address.
    pub codice_destinatario: String,

    /// Quantity of a new line item.
    pub quantity: f64,

    /// Unit price of a new line item.
    pub unit_price: f64,

    /// VAT rate (percent) of a new line item.
    pub vat_rate: f64,
}

impl Default for InvoiceDefaults {
    /// ## Default Values
    /// - Country: IT, currency: EUR
    /// - Document: TD07, regime: RF01
    /// - Line: 1 × 0.00 at 22%
    fn default() -> Self {
        InvoiceDefaults {
            country_code: "IT".to_string(),
            currency: "EUR".to_string(),
            document_type: DocumentType::Td07,
            supplier_regime: FiscalRegime::Rf01,
            codice_destinatario: "0000000".to_string(),
            quantity: 1.0,
            unit_price: 0.0,
            vat_rate: 22.0,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One editable invoice line.
///
/// Numeric fields are `None` while the user is still typing; totals treat
/// them as 0 and validation reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Generated identifier (UUID v4), stable across edits.
    pub id: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub quantity: Option<f64>,

    #[serde(default)]
    pub unit_price: Option<f64>,

    /// Percent, 0 to 100.
    #[serde(default)]
    pub vat_rate: Option<f64>,

    /// N1..N7, expected when `vat_rate` is 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_nature: Option<String>,
}

impl LineItem {
    /// Creates a blank line with a fresh id and the default amounts.
    pub fn new(defaults: &InvoiceDefaults) -> Self {
        LineItem {
            id: uuid::Uuid::new_v4().to_string(),
            description: String::new(),
            quantity: Some(defaults.quantity),
            unit_price: Some(defaults.unit_price),
            vat_rate: Some(defaults.vat_rate),
            vat_nature: None,
        }
    }
}

// =============================================================================
// Invoice Draft
// =============================================================================

/// The in-progress form record.
///
/// Optional text fields are `None` or blank when the user left them empty;
/// both are treated the same by validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceDraft {
    // --- Transmission header ---
    pub progressivo_invio: String,
    pub codice_destinatario: String,
    #[serde(default)]
    pub pec_destinatario: Option<String>,

    // --- Supplier (CedentePrestatore) ---
    pub supplier_country: String,
    pub supplier_vat_number: String,
    #[serde(default)]
    pub supplier_tax_code: Option<String>,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub supplier_first_name: Option<String>,
    #[serde(default)]
    pub supplier_last_name: Option<String>,
    pub supplier_address: String,
    #[serde(default)]
    pub supplier_civic_number: Option<String>,
    pub supplier_postal_code: String,
    pub supplier_city: String,
    #[serde(default)]
    pub supplier_province: Option<String>,
    pub supplier_country_code: String,
    pub supplier_regime: String,

    // --- Customer (CessionarioCommittente) ---
    #[serde(default)]
    pub customer_vat_country: Option<String>,
    #[serde(default)]
    pub customer_vat_number: Option<String>,
    #[serde(default)]
    pub customer_tax_code: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_first_name: Option<String>,
    #[serde(default)]
    pub customer_last_name: Option<String>,
    pub customer_address: String,
    #[serde(default)]
    pub customer_civic_number: Option<String>,
    pub customer_postal_code: String,
    pub customer_city: String,
    #[serde(default)]
    pub customer_province: Option<String>,
    pub customer_country_code: String,

    // --- Document ---
    pub document_type: String,
    /// ISO date, `YYYY-MM-DD`.
    pub document_date: String,
    pub document_number: String,
    pub currency: String,

    // --- Lines ---
    pub line_items: LineItemList,
}

impl InvoiceDraft {
    /// Creates a draft dated today with the given defaults and one line.
    pub fn new(defaults: &InvoiceDefaults) -> Self {
        Self::dated(defaults, Local::now().date_naive())
    }

    /// Same as [`InvoiceDraft::new`] with an explicit document date.
    pub fn dated(defaults: &InvoiceDefaults, date: NaiveDate) -> Self {
        InvoiceDraft {
            progressivo_invio: String::new(),
            codice_destinatario: defaults.codice_destinatario.clone(),
            pec_destinatario: None,

            supplier_country: defaults.country_code.clone(),
            supplier_vat_number: String::new(),
            supplier_tax_code: None,
            supplier_name: None,
            supplier_first_name: None,
            supplier_last_name: None,
            supplier_address: String::new(),
            supplier_civic_number: None,
            supplier_postal_code: String::new(),
            supplier_city: String::new(),
            supplier_province: None,
            supplier_country_code: defaults.country_code.clone(),
            supplier_regime: defaults.supplier_regime.code().to_string(),

            customer_vat_country: None,
            customer_vat_number: None,
            customer_tax_code: None,
            customer_name: None,
            customer_first_name: None,
            customer_last_name: None,
            customer_address: String::new(),
            customer_civic_number: None,
            customer_postal_code: String::new(),
            customer_city: String::new(),
            customer_province: None,
            customer_country_code: defaults.country_code.clone(),

            document_type: defaults.document_type.code().to_string(),
            document_date: date.format("%Y-%m-%d").to_string(),
            document_number: String::new(),
            currency: defaults.currency.clone(),

            line_items: LineItemList::new(defaults),
        }
    }

    /// Sets a top-level text field by its form name.
    ///
    /// Optional fields are cleared when `value` is blank. Line items are
    /// edited through [`LineItemList`] instead.
    pub fn set_field(&mut self, field: &str, value: &str) -> CoreResult<()> {
        let text = value.to_string();
        let optional = if value.trim().is_empty() {
            None
        } else {
            Some(value.to_string())
        };

        match field {
            "progressivoInvio" => self.progressivo_invio = text,
            "codiceDestinatario" => self.codice_destinatario = text,
            "pecDestinatario" => self.pec_destinatario = optional,

            "supplierCountry" => self.supplier_country = text,
            "supplierVatNumber" => self.supplier_vat_number = text,
            "supplierTaxCode" => self.supplier_tax_code = optional,
            "supplierName" => self.supplier_name = optional,
            "supplierFirstName" => self.supplier_first_name = optional,
            "supplierLastName" => self.supplier_last_name = optional,
            "supplierAddress" => self.supplier_address = text,
            "supplierCivicNumber" => self.supplier_civic_number = optional,
            "supplierPostalCode" => self.supplier_postal_code = text,
            "supplierCity" => self.supplier_city = text,
            "supplierProvince" => self.supplier_province = optional,
            "supplierCountryCode" => self.supplier_country_code = text,
            "supplierRegime" => self.supplier_regime = text,

            "customerVatCountry" => self.customer_vat_country = optional,
            "customerVatNumber" => self.customer_vat_number = optional,
            "customerTaxCode" => self.customer_tax_code = optional,
            "customerName" => self.customer_name = optional,
            "customerFirstName" => self.customer_first_name = optional,
            "customerLastName" => self.customer_last_name = optional,
            "customerAddress" => self.customer_address = text,
            "customerCivicNumber" => self.customer_civic_number = optional,
            "customerPostalCode" => self.customer_postal_code = text,
            "customerCity" => self.customer_city = text,
            "customerProvince" => self.customer_province = optional,
            "customerCountryCode" => self.customer_country_code = text,

            "documentType" => self.document_type = text,
            "documentDate" => self.document_date = text,
            "documentNumber" => self.document_number = text,
            "currency" => self.currency = text,

            other => return Err(CoreError::UnknownField(other.to_string())),
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> InvoiceDraft {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        InvoiceDraft::dated(&InvoiceDefaults::default(), date)
    }

    #[test]
    fn test_new_draft_defaults() {
        let d = draft();

        assert_eq!(d.supplier_country, "IT");
        assert_eq!(d.supplier_country_code, "IT");
        assert_eq!(d.customer_country_code, "IT");
        assert_eq!(d.document_type, "TD07");
        assert_eq!(d.currency, "EUR");
        assert_eq!(d.supplier_regime, "RF01");
        assert_eq!(d.document_date, "2024-03-15");

        assert_eq!(d.line_items.len(), 1);
        let line = &d.line_items.items()[0];
        assert_eq!(line.quantity, Some(1.0));
        assert_eq!(line.unit_price, Some(0.0));
        assert_eq!(line.vat_rate, Some(22.0));
    }

    #[test]
    fn test_new_draft_is_dated_today() {
        let d = InvoiceDraft::new(&InvoiceDefaults::default());
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(d.document_date, today);
    }

    #[test]
    fn test_line_items_get_unique_ids() {
        let defaults = InvoiceDefaults::default();
        let a = LineItem::new(&defaults);
        let b = LineItem::new(&defaults);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_set_field() {
        let mut d = draft();

        d.set_field("supplierCity", "Milano").unwrap();
        d.set_field("pecDestinatario", "fatture@pec.example.it").unwrap();
        assert_eq!(d.supplier_city, "Milano");
        assert_eq!(d.pec_destinatario.as_deref(), Some("fatture@pec.example.it"));

        d.set_field("pecDestinatario", "  ").unwrap();
        assert_eq!(d.pec_destinatario, None);

        assert_eq!(
            d.set_field("lineItems", "x"),
            Err(CoreError::UnknownField("lineItems".to_string()))
        );
    }

    #[test]
    fn test_camel_case_wire_shape() {
        let json = serde_json::to_value(draft()).unwrap();

        assert_eq!(json["supplierCountryCode"], "IT");
        assert_eq!(json["documentType"], "TD07");
        assert_eq!(json["lineItems"][0]["vatRate"], 22.0);
        assert!(json["lineItems"][0].get("vatNature").is_none());
    }

    #[test]
    fn test_defaults_from_partial_json() {
        let defaults: InvoiceDefaults =
            serde_json::from_str(r#"{ "vatRate": 10, "supplierRegime": "RF19" }"#).unwrap();

        assert_eq!(defaults.vat_rate, 10.0);
        assert_eq!(defaults.supplier_regime, FiscalRegime::Rf19);
        assert_eq!(defaults.currency, "EUR");
    }
}
