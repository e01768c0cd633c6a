//! # Form State
//!
//! The reactive container behind one mounted form.
//!
//! ## Form Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Form State Operations                                │
//! │                                                                         │
//! │  Host Event               FormState method         Effect               │
//! │  ──────────               ────────────────         ──────               │
//! │                                                                         │
//! │  Type in field ──────────► set_field() ──────────► draft.field = v      │
//! │                                                                         │
//! │  Click "+ riga" ─────────► add_line_item() ──────► lines.push(default)  │
//! │                                                                         │
//! │  Click "rimuovi" ────────► remove_line_item() ───► lines.remove(i)      │
//! │                                                                         │
//! │  Edit line cell ─────────► update_line_item() ───► lines[i].f = v       │
//! │                                                                         │
//! │  Click "invia" ──────────► submit() ─────────────► validate → handler   │
//! │                                                                         │
//! │  Every mutation recomputes totals and notifies subscribers.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs synchronously on the caller's thread; subscribers are
//! invoked inline before the mutating call returns.

use fattura_core::{
    compute_totals, validate_invoice, FieldErrors, Invoice, InvoiceDefaults, InvoiceDraft,
    LineItem, LineItemEdit, Totals, TotalsDisplay, MIN_LINE_ITEMS,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{FormError, FormResult};
use crate::state::config::SubmitHandler;

/// Callback observing every state change.
pub type Subscriber = Box<dyn FnMut(&FormSnapshot)>;

/// Identifies a subscription for `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What the view renders after a change.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FormSnapshot {
    pub draft: InvoiceDraft,
    pub totals: Totals,
    pub totals_display: TotalsDisplay,
    #[ts(as = "std::collections::HashMap<String, String>")]
    pub errors: FieldErrors,
    /// False when only one line is left (disables the remove buttons).
    pub can_remove_line_item: bool,
}

/// Outcome of a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The submission handler received the invoice.
    Handler,
    /// No handler configured; the submission was only acknowledged.
    Acknowledged,
}

/// State of one form instance.
///
/// ## Invariants
/// - `totals` always equals `compute_totals(draft.line_items)`
/// - the editor never leaves the line list empty
/// - `errors` only holds messages from the last submit, minus the fields
///   edited since
pub struct FormState {
    defaults: InvoiceDefaults,
    draft: InvoiceDraft,
    totals: Totals,
    errors: FieldErrors,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    on_submit: Option<SubmitHandler>,
}

impl FormState {
    /// Creates a form with a new draft built from `defaults`.
    pub fn new(defaults: InvoiceDefaults) -> Self {
        let draft = InvoiceDraft::new(&defaults);
        Self::with_draft(defaults, draft)
    }

    /// Creates a form around an existing draft (e.g. restored by the host).
    pub fn with_draft(defaults: InvoiceDefaults, draft: InvoiceDraft) -> Self {
        let totals = compute_totals(draft.line_items.items());
        FormState {
            defaults,
            draft,
            totals,
            errors: FieldErrors::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
            on_submit: None,
        }
    }

    pub fn set_submit_handler(&mut self, handler: Option<SubmitHandler>) {
        self.on_submit = handler;
    }

    // =========================================================================
    // Observation
    // =========================================================================

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            draft: self.draft.clone(),
            totals: self.totals,
            totals_display: self.totals.display(),
            errors: self.errors.clone(),
            can_remove_line_item: self.draft.line_items.len() > MIN_LINE_ITEMS,
        }
    }

    /// Registers a callback run after every change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&FormSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Removes a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Sets a top-level field by its camelCase name.
    pub fn set_field(&mut self, field: &str, value: &str) -> FormResult<()> {
        debug!(field = %field, "set_field");
        self.draft.set_field(field, value)?;
        self.errors.clear_field(field);
        self.changed();
        Ok(())
    }

    /// Appends a default line. Returns its index.
    pub fn add_line_item(&mut self) -> usize {
        let index = self.draft.line_items.add(&self.defaults);
        debug!(index, count = self.draft.line_items.len(), "add_line_item");
        self.errors.clear_field("lineItems");
        self.changed();
        index
    }

    /// Removes a line; refused for the last remaining one.
    pub fn remove_line_item(&mut self, index: usize) -> FormResult<LineItem> {
        let removed = self.draft.line_items.remove(index).map_err(|e| {
            debug!(index, error = %e, "remove_line_item refused");
            e
        })?;
        debug!(index, id = %removed.id, "remove_line_item");
        // indices shifted, old line messages no longer line up
        self.errors.clear_prefix("lineItems[");
        self.changed();
        Ok(removed)
    }

    /// Applies one field edit to a line.
    pub fn update_line_item(&mut self, index: usize, edit: LineItemEdit) -> FormResult<()> {
        let field = format!("lineItems[{}].{}", index, edit.field_name());
        let rate_changed = matches!(edit, LineItemEdit::VatRate(_));
        debug!(field = %field, "update_line_item");
        self.draft.line_items.update(index, edit)?;
        self.errors.clear_field(&field);
        // a missing nature is only an error at rate 0
        if rate_changed {
            self.errors
                .clear_field(&format!("lineItems[{}].vatNature", index));
        }
        self.changed();
        Ok(())
    }

    /// Replaces the draft with a fresh one and drops all errors.
    pub fn reset(&mut self) {
        debug!("reset");
        self.draft = InvoiceDraft::new(&self.defaults);
        self.errors = FieldErrors::new();
        self.changed();
    }

    /// Validates the draft and delivers the invoice.
    ///
    /// ## Behavior
    /// - Valid: errors cleared, handler called (or local acknowledgement)
    /// - Invalid: errors stored on the state, subscribers notified, the same
    ///   errors returned as `VALIDATION_ERROR`
    pub fn submit(&mut self) -> FormResult<(Invoice, Delivery)> {
        match validate_invoice(&self.draft) {
            Ok(invoice) => {
                self.errors = FieldErrors::new();
                self.notify();

                let totals = invoice.totals();
                let delivery = match self.on_submit.as_mut() {
                    Some(handler) => {
                        handler(&invoice);
                        Delivery::Handler
                    }
                    None => Delivery::Acknowledged,
                };
                info!(
                    number = %invoice.document.number,
                    lines = invoice.line_items.len(),
                    total = %totals.display().total,
                    ?delivery,
                    "Invoice submitted"
                );
                Ok((invoice, delivery))
            }
            Err(errors) => {
                warn!(count = errors.len(), fields = %errors, "Invoice submission rejected");
                self.errors = errors.clone();
                self.notify();
                Err(FormError::validation(errors))
            }
        }
    }

    fn changed(&mut self) {
        self.totals = compute_totals(self.draft.line_items.items());
        self.notify();
    }

    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&snapshot);
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(InvoiceDefaults::default())
    }
}

impl std::fmt::Debug for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormState")
            .field("draft", &self.draft)
            .field("totals", &self.totals)
            .field("errors", &self.errors)
            .field("subscribers", &self.subscribers.len())
            .field("on_submit", &self.on_submit.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::ErrorCode;

    fn fill_valid(form: &mut FormState) {
        for (field, value) in [
            ("progressivoInvio", "00001"),
            ("supplierVatNumber", "01234567890"),
            ("supplierName", "Studio Bianchi S.r.l."),
            ("supplierAddress", "Via Roma 10"),
            ("supplierPostalCode", "20121"),
            ("supplierCity", "Milano"),
            ("customerName", "Rossi S.p.A."),
            ("customerAddress", "Via Garibaldi 5"),
            ("customerPostalCode", "00184"),
            ("customerCity", "Roma"),
            ("documentNumber", "FS-1"),
        ] {
            form.set_field(field, value).unwrap();
        }
        form.update_line_item(0, LineItemEdit::Description("Consulenza".into()))
            .unwrap();
        form.update_line_item(0, LineItemEdit::Quantity(Some(2.0)))
            .unwrap();
        form.update_line_item(0, LineItemEdit::UnitPrice(Some(100.0)))
            .unwrap();
    }

    #[test]
    fn test_totals_follow_every_edit() {
        let mut form = FormState::default();
        assert_eq!(form.totals(), Totals::default());

        form.update_line_item(0, LineItemEdit::Quantity(Some(2.0)))
            .unwrap();
        form.update_line_item(0, LineItemEdit::UnitPrice(Some(100.0)))
            .unwrap();
        assert_eq!(form.totals().display().total, "244.00");

        let index = form.add_line_item();
        form.update_line_item(index, LineItemEdit::UnitPrice(Some(10.0)))
            .unwrap();
        form.update_line_item(index, LineItemEdit::VatRate(Some(10.0)))
            .unwrap();
        assert_eq!(form.totals().display().subtotal, "210.00");
        assert_eq!(form.totals().display().vat_total, "45.00");

        form.remove_line_item(0).unwrap();
        assert_eq!(form.totals().display().total, "11.00");
    }

    #[test]
    fn test_subscribers_see_recomputed_totals() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut form = FormState::default();
        let sink = Rc::clone(&seen);
        let id = form.subscribe(move |snap| sink.borrow_mut().push(snap.totals_display.total.clone()));

        form.update_line_item(0, LineItemEdit::UnitPrice(Some(50.0)))
            .unwrap();
        form.add_line_item();

        assert_eq!(*seen.borrow(), vec!["61.00".to_string(), "61.00".to_string()]);

        assert!(form.unsubscribe(id));
        assert!(!form.unsubscribe(id));
        form.add_line_item();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_last_line_cannot_be_removed() {
        let mut form = FormState::default();
        assert!(!form.snapshot().can_remove_line_item);

        let err = form.remove_line_item(0).unwrap_err();
        assert_eq!(err.code, ErrorCode::LineItemError);
        assert_eq!(form.draft().line_items.len(), 1);

        form.add_line_item();
        assert!(form.snapshot().can_remove_line_item);
    }

    #[test]
    fn test_unknown_field() {
        let mut form = FormState::default();
        let err = form.set_field("supplierFax", "x").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownField);
    }

    #[test]
    fn test_rejected_submit_keeps_errors_until_edited() {
        let mut form = FormState::default();

        let err = form.submit().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(form.errors().get("supplierCity").is_some());
        assert!(form.errors().get("lineItems[0].description").is_some());

        form.set_field("supplierCity", "Milano").unwrap();
        assert!(form.errors().get("supplierCity").is_none());

        form.update_line_item(0, LineItemEdit::Description("Consulenza".into()))
            .unwrap();
        assert!(form.errors().get("lineItems[0].description").is_none());
        assert!(form.errors().get("documentNumber").is_some());
    }

    #[test]
    fn test_rate_edit_clears_nature_error() {
        let mut form = FormState::default();
        fill_valid(&mut form);
        form.update_line_item(0, LineItemEdit::VatRate(Some(0.0)))
            .unwrap();

        form.submit().unwrap_err();
        assert_eq!(
            form.errors().fields().collect::<Vec<_>>(),
            vec!["lineItems[0].vatNature"]
        );

        form.update_line_item(0, LineItemEdit::VatRate(Some(22.0)))
            .unwrap();
        assert!(form.errors().is_empty());
        assert!(form.submit().is_ok());
    }

    #[test]
    fn test_submit_without_handler_is_acknowledged() {
        let mut form = FormState::default();
        fill_valid(&mut form);

        let (invoice, delivery) = form.submit().unwrap();

        assert_eq!(delivery, Delivery::Acknowledged);
        assert_eq!(invoice.document.number, "FS-1");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_submit_calls_handler_with_invoice() {
        let received: Rc<RefCell<Option<Invoice>>> = Rc::default();
        let sink = Rc::clone(&received);

        let mut form = FormState::default();
        form.set_submit_handler(Some(Box::new(move |invoice: &Invoice| {
            *sink.borrow_mut() = Some(invoice.clone());
        })));
        fill_valid(&mut form);

        let (_, delivery) = form.submit().unwrap();

        assert_eq!(delivery, Delivery::Handler);
        let invoice = received.borrow().clone().unwrap();
        assert_eq!(invoice.totals().display().total, "244.00");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = FormState::default();
        fill_valid(&mut form);
        form.add_line_item();

        form.reset();

        assert_eq!(form.draft().line_items.len(), 1);
        assert_eq!(form.draft().supplier_city, "");
        assert_eq!(form.totals(), Totals::default());
    }
}
