//! Core trait defining registry behavior.
//!
//! This module provides the `RegistryApi` trait with default implementations for
//! get-or-create lookups of class-keyed and property-keyed singletons, plus the
//! trace callback plumbing.
//!
//! The class table maps a `TypeId` to the entry cell of its only instance. The
//! property table maps a `TypeId` to a type-erased `HashMap<Arc<T::Key>, _>` holding
//! one entry cell per key. A table lock is only held while an entry cell is looked
//! up or inserted; construction runs inside the cell. Entries are never removed.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::{PropertySingleton, RegistryError, RegistryEvent, Singleton};

/// Entry cell of one class-keyed singleton.
pub type ClassCell = OnceLock<Arc<dyn Any + Send + Sync>>;

/// Storage for class-keyed singletons.
pub type ClassTable = Mutex<HashMap<TypeId, Arc<ClassCell>>>;

/// Storage for property-keyed singletons. Each value holds the entry cells of one type.
pub type PropertyTable = Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>;

/// Entry cells of one property-keyed type.
type KeyedCells<T> = HashMap<Arc<<T as PropertySingleton>::Key>, Arc<OnceLock<Arc<T>>>>;

/// Type alias for the user-supplied tracing callback.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Storage for the optional trace callback.
pub type TraceSlot = Mutex<Option<Arc<TraceCallback>>>;

/// Core trait defining registry behavior.
///
/// Provides default implementations for all registry operations, requiring only
/// three accessors (`class_table`, `property_table` and `trace`) from the implementor.
///
/// # Deadlocks
///
/// Every type, and every (type, key) pair, has its own entry cell. Concurrent first
/// lookups of the same entry wait for a single constructor, and lookups of other
/// entries proceed. A constructor may look up other singletons from the same
/// registry, but it must NOT look up the entry it is building, directly or through
/// a cycle of constructors.
///
/// # Lock Poisoning Recovery
///
/// No table lock is held while a constructor runs. A constructor that panics leaves
/// its entry cell empty, and the next lookup of that entry constructs again.
pub trait RegistryApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback slot.
    fn trace(&self) -> &TraceSlot;

    /// Set a tracing callback for registry operations.
    ///
    /// The callback will be invoked for every registry operation (create, reuse,
    /// rejected, contains).
    ///
    /// # Lock Poisoning Recovery
    ///
    /// If the trace lock is poisoned, this method recovers by extracting the inner value.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Registered instances are unaffected.
    fn clear_trace_callback(&self) {
        let mut guard = self.trace().lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    /// Emit a registry event to `tracing` and to the current callback, if any.
    ///
    /// The callback runs after the trace lock is released, so it may use this
    /// registry's inspection methods.
    fn emit_event(&self, event: &RegistryEvent) {
        tracing::debug!(%event, "registry event");

        let callback = self
            .trace()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Class-keyed singletons
    // -------------------------------------------------------------------------------------------------

    /// Access the class-keyed table.
    fn class_table(&self) -> &ClassTable;

    /// Return the only instance of `T`, constructing it from `args` on first use.
    ///
    /// Once an instance exists, `args` is dropped without being looked at.
    ///
    /// # Errors
    ///
    /// - `T` is abstract
    /// - The stored entry does not downcast to `T` (should not happen)
    fn instance<T: Singleton>(&self, args: T::Args) -> Result<Arc<T>, RegistryError> {
        let type_name = type_name::<T>();
        if T::ABSTRACT {
            self.emit_event(&RegistryEvent::Rejected { type_name });
            return Err(RegistryError::AbstractRoot { type_name });
        }

        let cell = self
            .class_table()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .entry(TypeId::of::<T>())
            .or_default()
            .clone();

        let mut created = false;
        let entry = cell
            .get_or_init(|| {
                created = true;
                let instance: Arc<dyn Any + Send + Sync> = Arc::new(T::construct(args));
                instance
            })
            .clone();
        let instance = entry
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch { type_name })?;

        let event = if created {
            RegistryEvent::Create {
                type_name,
                key: None,
            }
        } else {
            RegistryEvent::Reuse {
                type_name,
                key: None,
            }
        };
        self.emit_event(&event);
        Ok(instance)
    }

    /// Check whether an instance of `T` exists.
    ///
    /// An entry whose constructor is still running, or panicked, does not count.
    ///
    /// # Errors
    ///
    /// None at present; the `Result` mirrors [`contains_keyed`](Self::contains_keyed).
    fn contains<T: Singleton>(&self) -> Result<bool, RegistryError> {
        let found = self
            .class_table()
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&TypeId::of::<T>())
            .is_some_and(|cell| cell.get().is_some());

        self.emit_event(&RegistryEvent::Contains {
            type_name: type_name::<T>(),
            key: None,
            found,
        });

        Ok(found)
    }

    // -------------------------------------------------------------------------------------------------
    // Property-keyed singletons
    // -------------------------------------------------------------------------------------------------

    /// Access the property-keyed table.
    fn property_table(&self) -> &PropertyTable;

    /// Return the instance of `T` for `key`, constructing it on first use of that key.
    ///
    /// Different keys yield independent instances. Once an instance exists for
    /// `key`, `args` is dropped without being looked at.
    ///
    /// # Errors
    ///
    /// - `T` is abstract
    /// - The per-type map does not downcast (should not happen)
    fn keyed_instance<T: PropertySingleton>(
        &self,
        key: T::Key,
        args: T::Args,
    ) -> Result<Arc<T>, RegistryError> {
        let type_name = type_name::<T>();
        if T::ABSTRACT {
            self.emit_event(&RegistryEvent::Rejected { type_name });
            return Err(RegistryError::AbstractRoot { type_name });
        }

        let rendered = format!("{key:?}");

        let (key, cell) = {
            let mut table = self
                .property_table()
                .lock()
                .unwrap_or_else(|p| p.into_inner());
            let per_type = table
                .entry(TypeId::of::<T>())
                .or_insert_with(|| Box::new(KeyedCells::<T>::new()))
                .downcast_mut::<KeyedCells<T>>()
                .ok_or(RegistryError::TypeMismatch { type_name })?;

            match per_type.get_key_value(&key) {
                Some((stored, cell)) => (stored.clone(), cell.clone()),
                None => {
                    let key = Arc::new(key);
                    let cell = Arc::new(OnceLock::new());
                    per_type.insert(key.clone(), cell.clone());
                    (key, cell)
                }
            }
        };

        let mut created = false;
        let instance = cell
            .get_or_init(|| {
                created = true;
                Arc::new(T::construct(&key, args))
            })
            .clone();

        let event = if created {
            RegistryEvent::Create {
                type_name,
                key: Some(rendered),
            }
        } else {
            RegistryEvent::Reuse {
                type_name,
                key: Some(rendered),
            }
        };
        self.emit_event(&event);
        Ok(instance)
    }

    /// Check whether an instance of `T` exists for `key`.
    ///
    /// # Errors
    ///
    /// - The per-type map does not downcast
    fn contains_keyed<T: PropertySingleton>(&self, key: &T::Key) -> Result<bool, RegistryError> {
        let found = {
            let table = self
                .property_table()
                .lock()
                .unwrap_or_else(|p| p.into_inner());
            match table.get(&TypeId::of::<T>()) {
                Some(per_type) => per_type
                    .downcast_ref::<KeyedCells<T>>()
                    .ok_or(RegistryError::TypeMismatch {
                        type_name: type_name::<T>(),
                    })?
                    .get(key)
                    .is_some_and(|cell| cell.get().is_some()),
                None => false,
            }
        };

        self.emit_event(&RegistryEvent::Contains {
            type_name: type_name::<T>(),
            key: Some(format!("{key:?}")),
            found,
        });

        Ok(found)
    }

    /// Number of distinct keys constructed for `T`.
    ///
    /// # Errors
    ///
    /// - The per-type map does not downcast
    fn keyed_len<T: PropertySingleton>(&self) -> Result<usize, RegistryError> {
        let table = self
            .property_table()
            .lock()
            .unwrap_or_else(|p| p.into_inner());
        match table.get(&TypeId::of::<T>()) {
            Some(per_type) => per_type
                .downcast_ref::<KeyedCells<T>>()
                .map(|cells| cells.values().filter(|cell| cell.get().is_some()).count())
                .ok_or(RegistryError::TypeMismatch {
                    type_name: type_name::<T>(),
                }),
            None => Ok(0),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
