//! # Line Item List Editor
//!
//! The ordered list of invoice lines the user edits.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   initial ──► [ default line ]                                          │
//! │                                                                         │
//! │   add()        [ a, b ] ──────────► [ a, b, new ]      len + 1          │
//! │                                                                         │
//! │   remove(i)    [ a, b ] ──────────► [ b ]              len - 1          │
//! │                [ a ]    ──────────► Err(LastLineItem)  len stays 1      │
//! │                                                                         │
//! │   update(i)    [ a, b ] ──────────► [ a', b ]          len, order kept  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The editor never drops below one line. A list deserialized from the host
//! can still be empty; validation rejects that case at submission.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{InvoiceDefaults, LineItem};
use crate::MIN_LINE_ITEMS;

/// A single field edit of a line item, as produced by one input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
#[ts(export)]
pub enum LineItemEdit {
    Description(String),
    Quantity(Option<f64>),
    UnitPrice(Option<f64>),
    VatRate(Option<f64>),
    VatNature(Option<String>),
}

impl LineItemEdit {
    /// The camelCase name of the edited field.
    pub const fn field_name(&self) -> &'static str {
        match self {
            LineItemEdit::Description(_) => "description",
            LineItemEdit::Quantity(_) => "quantity",
            LineItemEdit::UnitPrice(_) => "unitPrice",
            LineItemEdit::VatRate(_) => "vatRate",
            LineItemEdit::VatNature(_) => "vatNature",
        }
    }

    fn apply(self, item: &mut LineItem) {
        match self {
            LineItemEdit::Description(text) => item.description = text,
            LineItemEdit::Quantity(value) => item.quantity = value,
            LineItemEdit::UnitPrice(value) => item.unit_price = value,
            LineItemEdit::VatRate(value) => item.vat_rate = value,
            LineItemEdit::VatNature(code) => {
                item.vat_nature = code.filter(|c| !c.trim().is_empty());
            }
        }
    }
}

/// Ordered, never-empty list of line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemList(Vec<LineItem>);

impl LineItemList {
    /// Creates the initial list: one line with the default amounts.
    pub fn new(defaults: &InvoiceDefaults) -> Self {
        LineItemList(vec![LineItem::new(defaults)])
    }

    /// Wraps lines supplied by the host as-is (may be empty).
    pub fn from_items(items: Vec<LineItem>) -> Self {
        LineItemList(items)
    }

    /// Appends a new line with a fresh id and the default amounts.
    ///
    /// Returns the index of the new line.
    pub fn add(&mut self, defaults: &InvoiceDefaults) -> usize {
        self.0.push(LineItem::new(defaults));
        self.0.len() - 1
    }

    /// Removes the line at `index`.
    ///
    /// ## Errors
    /// - `LastLineItem` when only one line is left
    /// - `LineItemNotFound` when `index` is out of range
    pub fn remove(&mut self, index: usize) -> CoreResult<LineItem> {
        if index >= self.0.len() {
            return Err(CoreError::LineItemNotFound {
                index,
                len: self.0.len(),
            });
        }
        if self.0.len() <= MIN_LINE_ITEMS {
            return Err(CoreError::LastLineItem);
        }
        Ok(self.0.remove(index))
    }

    /// Applies one field edit in place.
    pub fn update(&mut self, index: usize, edit: LineItemEdit) -> CoreResult<()> {
        let len = self.0.len();
        let item = self
            .get_mut(index)
            .ok_or(CoreError::LineItemNotFound { index, len })?;
        edit.apply(item);
        Ok(())
    }

    /// Mutable access to one line, for hosts that bind a whole row.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut LineItem> {
        self.0.get_mut(index)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> LineItemList {
        LineItemList::new(&InvoiceDefaults::default())
    }

    #[test]
    fn test_add_appends_default_line() {
        let defaults = InvoiceDefaults::default();
        let mut items = list();

        let index = items.add(&defaults);

        assert_eq!(index, 1);
        assert_eq!(items.len(), 2);
        let added = &items.items()[1];
        assert_eq!(added.quantity, Some(1.0));
        assert_eq!(added.unit_price, Some(0.0));
        assert_eq!(added.vat_rate, Some(22.0));
        assert_ne!(added.id, items.items()[0].id);
    }

    #[test]
    fn test_remove_last_line_is_refused() {
        let mut items = list();

        assert_eq!(items.remove(0), Err(CoreError::LastLineItem));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let defaults = InvoiceDefaults::default();
        let mut items = list();
        items.add(&defaults);
        items.add(&defaults);
        let ids: Vec<String> = items.items().iter().map(|i| i.id.clone()).collect();

        let removed = items.remove(1).unwrap();

        assert_eq!(removed.id, ids[1]);
        let left: Vec<&str> = items.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(left, vec![ids[0].as_str(), ids[2].as_str()]);
    }

    #[test]
    fn test_get_mut_binds_a_row() {
        let mut items = list();
        items.add(&InvoiceDefaults::default());
        let id = items.items()[1].id.clone();

        let row = items.get_mut(1).unwrap();
        row.description = "Trasferta".into();
        row.unit_price = Some(45.5);

        assert_eq!(items.len(), 2);
        assert_eq!(items.items()[1].id, id);
        assert_eq!(items.items()[1].description, "Trasferta");
        assert_eq!(items.items()[1].unit_price, Some(45.5));
        assert!(items.get_mut(2).is_none());
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut items = list();
        items.add(&InvoiceDefaults::default());

        assert_eq!(
            items.remove(5),
            Err(CoreError::LineItemNotFound { index: 5, len: 2 })
        );
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_update_in_place() {
        let mut items = list();
        let id = items.items()[0].id.clone();

        items
            .update(0, LineItemEdit::Description("Consulenza".into()))
            .unwrap();
        items.update(0, LineItemEdit::Quantity(None)).unwrap();
        items
            .update(0, LineItemEdit::VatNature(Some("".into())))
            .unwrap();

        let line = &items.items()[0];
        assert_eq!(line.id, id);
        assert_eq!(line.description, "Consulenza");
        assert_eq!(line.quantity, None);
        assert_eq!(line.vat_nature, None);
        assert_eq!(items.len(), 1);

        assert!(items.update(3, LineItemEdit::VatRate(Some(10.0))).is_err());
    }

    #[test]
    fn test_edit_wire_shape() {
        let edit: LineItemEdit =
            serde_json::from_str(r#"{ "field": "unitPrice", "value": 12.5 }"#).unwrap();
        assert_eq!(edit, LineItemEdit::UnitPrice(Some(12.5)));
        assert_eq!(edit.field_name(), "unitPrice");
    }
}
