//! # fattura-form: Headless Simplified-Invoice Form
//!
//! The stateful layer around `fattura-core`: one reactive `FormState` per
//! mounted instance, and the mount/unmount surface embedding hosts call.
//!
//! ## Module Organization
//! ```text
//! fattura_form/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── mount.rs        ◄─── Surface, FormHandle, mount / unmount
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── form.rs     ◄─── Reactive form state + submission
//! │   └── config.rs   ◄─── Mount configuration
//! └── error.rs        ◄─── FormError returned to the host
//! ```
//!
//! ## Example
//! ```rust
//! use fattura_form::{mount, unmount, MountOptions, Surface};
//! use fattura_core::LineItemEdit;
//!
//! let mut surface = Surface::with_containers(["invoice-root"]);
//! let mut handle = mount(&mut surface, "invoice-root", MountOptions::new())?;
//!
//! let form = handle.form_mut();
//! form.update_line_item(0, LineItemEdit::Quantity(Some(2.0)))?;
//! form.update_line_item(0, LineItemEdit::UnitPrice(Some(100.0)))?;
//! assert_eq!(form.totals().display().total, "244.00");
//!
//! unmount(&mut surface, handle)?;
//! # Ok::<(), fattura_form::FormError>(())
//! ```

pub mod error;
pub mod mount;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use error::{ErrorCode, FormError, FormResult};
pub use mount::{mount, unmount, FormHandle, Surface};
pub use state::{
    Delivery, FormConfig, FormSnapshot, FormState, MountOptions, SubmitHandler, SubscriptionId,
};

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,fattura_core=debug,fattura_form=debug";

/// Installs a `tracing` subscriber for hosts that have none.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every field edit
/// - `RUST_LOG=fattura_form=info` - Mount/unmount/submit only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Returns false when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        assert!(!init_tracing());
    }
}
