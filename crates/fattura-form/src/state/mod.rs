//! # Form State Management
//!
//! ```text
//! state/
//! ├── mod.rs      ◄─── State type exports
//! ├── form.rs     ◄─── FormState: draft, totals, errors, subscribers
//! └── config.rs   ◄─── FormConfig / MountOptions
//! ```
//!
//! Each mounted form owns exactly one `FormState`; nothing here is shared
//! between instances.

mod config;
mod form;

pub use config::{FormConfig, MountOptions, SubmitHandler};
pub use form::{Delivery, FormSnapshot, FormState, Subscriber, SubscriptionId};
