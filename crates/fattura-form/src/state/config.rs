//! # Form Configuration
//!
//! What the host passes when mounting a form.
//!
//! ## Configuration Sources (Priority Order)
//! 1. `MountOptions` built in code (submission handler, class name)
//! 2. A JSON object from the embedding page (`FormConfig::from_json`)
//! 3. Defaults (this file)
//!
//! Configuration is read-only after mount.

use fattura_core::{Invoice, InvoiceDefaults};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::FormResult;

/// Callback receiving the validated invoice on a successful submit.
pub type SubmitHandler = Box<dyn FnMut(&Invoice)>;

/// Serializable part of the mount configuration.
///
/// ## Example
/// ```rust
/// use fattura_form::FormConfig;
///
/// let config = FormConfig::from_json(r#"{
///     "className": "invoice-form compact",
///     "defaults": { "vatRate": 10 }
/// }"#).unwrap();
///
/// assert_eq!(config.defaults.vat_rate, 10.0);
/// assert_eq!(config.defaults.currency, "EUR");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct FormConfig {
    /// Styling class applied to the form's root element.
    pub class_name: Option<String>,

    /// Initial values of a new record.
    pub defaults: InvoiceDefaults,
}

impl FormConfig {
    /// Parses the configuration object sent by the embedding page.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_json(json: &str) -> FormResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Everything `mount` needs.
#[derive(Default)]
pub struct MountOptions {
    pub config: FormConfig,

    /// Called with the validated invoice; `None` only acknowledges locally.
    pub on_submit: Option<SubmitHandler>,
}

impl MountOptions {
    pub fn new() -> Self {
        MountOptions::default()
    }

    pub fn from_config(config: FormConfig) -> Self {
        MountOptions {
            config,
            on_submit: None,
        }
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.config.class_name = Some(class_name.into());
        self
    }

    pub fn defaults(mut self, defaults: InvoiceDefaults) -> Self {
        self.config.defaults = defaults;
        self
    }

    pub fn on_submit(mut self, handler: impl FnMut(&Invoice) + 'static) -> Self {
        self.on_submit = Some(Box::new(handler));
        self
    }
}

impl std::fmt::Debug for MountOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountOptions")
            .field("config", &self.config)
            .field("on_submit", &self.on_submit.is_some())
            .finish()
    }
}
