//! # Top-up Toolkit
//!
//! Support code for a mobile top-up backend: identity bookkeeping for services,
//! handler collection, purchase audit files and upload validation.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use topup_toolkit::{RegistryApi, Singleton, SingletonRegistry};
//!
//! struct Gateway;
//!
//! impl Singleton for Gateway {
//!     type Args = ();
//!
//!     fn construct(_: ()) -> Self {
//!         Gateway
//!     }
//! }
//!
//! let registry = SingletonRegistry::new();
//! let a = registry.instance::<Gateway>(()).unwrap();
//! let b = registry.instance::<Gateway>(()).unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```
//!
//! ## Features
//!
//! - **Singleton registry**: one instance per type, or per type and discriminator,
//!   constructed exactly once even under concurrent first use
//! - **Method collection**: gather prefix-matched handlers across a class hierarchy
//! - **Audit log**: append purchase and connection-error lines to dated files
//! - **Upload validation**: size and exact-dimension checks for uploaded images
//!
//! ## Main Items
//!
//! - [`SingletonRegistry`] / [`define_registry!`] - explicit or process-wide registries
//! - [`RegistryApi`] - `instance`, `keyed_instance`, `contains`, tracing hooks
//! - [`method_collector::collect`] / [`register_methods!`] - handler collections
//! - [`AuditLogger`] - purchase audit files
//! - [`ImageUploadField`] - upload validation
//! - [`Settings`] - base directory for log files

mod macros;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;
mod singleton;

pub mod audit_log;
pub mod error;
pub mod logging;
pub mod method_collector;
pub mod settings;
pub mod upload;

// Re-export the main public API
pub use audit_log::{AuditLogger, Outcome, PurchaseRecord, TransactionKind};
pub use error::{Error, Result};
pub use registry::SingletonRegistry;
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
pub use registry_trait::{
    ClassCell, ClassTable, PropertyTable, RegistryApi, TraceCallback, TraceSlot,
};
pub use settings::Settings;
pub use singleton::{AbstractPropertySingleton, AbstractSingleton, PropertySingleton, Singleton};
pub use upload::{Dimensions, ImageUploadField, ValidationError};
