//! An explicit singleton registry service.
//!
//! Create one `SingletonRegistry` at start-up and pass it by reference to whatever
//! needs singleton lookups. Every registry owns its own tables, so tests can build
//! a fresh one instead of sharing hidden global state. For a process-wide registry
//! reachable through free functions, see [`define_registry!`](crate::define_registry).
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use topup_toolkit::{PropertySingleton, RegistryApi, SingletonRegistry};
//!
//! struct Cache {
//!     name: String,
//! }
//!
//! impl PropertySingleton for Cache {
//!     type Key = String;
//!     type Args = ();
//!
//!     fn construct(name: &String, _: ()) -> Self {
//!         Cache { name: name.clone() }
//!     }
//! }
//!
//! let registry = SingletonRegistry::new();
//! let a1 = registry.keyed_instance::<Cache>("A".into(), ()).unwrap();
//! let a2 = registry.keyed_instance::<Cache>("A".into(), ()).unwrap();
//! let b = registry.keyed_instance::<Cache>("B".into(), ()).unwrap();
//!
//! assert!(Arc::ptr_eq(&a1, &a2));
//! assert!(!Arc::ptr_eq(&a1, &b));
//! assert_eq!(b.name, "B");
//! ```

use std::fmt;

use crate::registry_trait::{ClassTable, PropertyTable, RegistryApi, TraceSlot};

/// Owns a class-keyed table, a property-keyed table and a trace slot.
#[derive(Default)]
pub struct SingletonRegistry {
    classes: ClassTable,
    properties: PropertyTable,
    trace: TraceSlot,
}

impl SingletonRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegistryApi for SingletonRegistry {
    fn trace(&self) -> &TraceSlot {
        &self.trace
    }

    fn class_table(&self) -> &ClassTable {
        &self.classes
    }

    fn property_table(&self) -> &PropertyTable {
        &self.properties
    }
}

impl fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let classes = self.classes.lock().map(|t| t.len()).ok();
        let property_types = self.properties.lock().map(|t| t.len()).ok();
        f.debug_struct("SingletonRegistry")
            .field("classes", &classes)
            .field("property_types", &property_types)
            .finish_non_exhaustive()
    }
}
