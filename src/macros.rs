//! Macros for process-wide singleton registries and method collections.

/// Creates a process-wide singleton registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - Class and property table statics (hidden)
/// - Trace callback static (hidden)
/// - An `Api` struct that implements `RegistryApi`, exposed as the `API` constant
/// - Free functions delegating to `API`
///
/// Prefer [`SingletonRegistry`](crate::SingletonRegistry) where the registry can be
/// passed by reference; a generated registry lives for the whole process.
///
/// # Examples
///
/// ```rust
/// use topup_toolkit::{define_registry, Singleton};
/// use std::sync::Arc;
///
/// define_registry!(services);
///
/// struct Clock {
///     zone: &'static str,
/// }
///
/// impl Singleton for Clock {
///     type Args = &'static str;
///
///     fn construct(zone: &'static str) -> Self {
///         Clock { zone }
///     }
/// }
///
/// let first = services::instance::<Clock>("UTC").unwrap();
/// let second = services::instance::<Clock>("CET").unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(second.zone, "UTC");
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            use std::collections::HashMap;
            use std::sync::{Arc, LazyLock};

            // Class-keyed instances (module-private)
            static CLASSES: LazyLock<$crate::ClassTable> =
                LazyLock::new(|| std::sync::Mutex::new(HashMap::new()));

            // Property-keyed instances (module-private)
            static PROPERTIES: LazyLock<$crate::PropertyTable> =
                LazyLock::new(|| std::sync::Mutex::new(HashMap::new()));

            // Trace callback storage (module-private)
            static TRACE: $crate::TraceSlot = std::sync::Mutex::new(None);

            /// Zero-sized type that implements the registry API over the module statics.
            pub struct Api;

            impl $crate::RegistryApi for Api {
                fn trace(&self) -> &$crate::TraceSlot {
                    &TRACE
                }

                fn class_table(&self) -> &$crate::ClassTable {
                    &CLASSES
                }

                fn property_table(&self) -> &$crate::PropertyTable {
                    &PROPERTIES
                }
            }

            /// Convenient constant for accessing the registry API.
            pub const API: Api = Api;

            /// Return the only instance of `T`, constructing it on first use.
            pub fn instance<T: $crate::Singleton>(
                args: T::Args,
            ) -> Result<Arc<T>, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.instance::<T>(args)
            }

            /// Return the instance of `T` for `key`, constructing it on first use of that key.
            pub fn keyed_instance<T: $crate::PropertySingleton>(
                key: T::Key,
                args: T::Args,
            ) -> Result<Arc<T>, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.keyed_instance::<T>(key, args)
            }

            /// Check whether an instance of `T` exists.
            pub fn contains<T: $crate::Singleton>() -> Result<bool, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.contains::<T>()
            }

            /// Check whether an instance of `T` exists for `key`.
            pub fn contains_keyed<T: $crate::PropertySingleton>(
                key: &T::Key,
            ) -> Result<bool, $crate::RegistryError> {
                use $crate::RegistryApi;
                API.contains_keyed::<T>(key)
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                use $crate::RegistryApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::RegistryApi;
                API.clear_trace_callback()
            }
        }
    };
}

/// Implements [`RegistersMethods`](crate::method_collector::RegistersMethods) for a type.
///
/// ```rust
/// use topup_toolkit::method_collector::{ClassDescriptor, Member, RegistersMethods};
/// use topup_toolkit::register_methods;
///
/// type Handler = fn() -> &'static str;
///
/// fn handle_ping() -> &'static str { "pong" }
///
/// static PINGER: ClassDescriptor<Handler> = ClassDescriptor {
///     name: "Pinger",
///     members: &[Member::method("handle_ping", handle_ping)],
///     bases: &[],
/// };
///
/// struct Pinger;
///
/// register_methods!(
///     Pinger,
///     Handler,
///     collection: "handlers",
///     prefix: "handle_",
///     descriptor: PINGER
/// );
///
/// let handlers = Pinger::registered_methods();
/// assert_eq!(handlers.attribute(), "handlers");
/// assert_eq!((handlers.resolve("handle_ping").unwrap())(), "pong");
/// ```
#[macro_export]
macro_rules! register_methods {
    (
        $ty:ty,
        $handler:ty,
        collection: $collection:expr,
        prefix: $prefix:expr,
        descriptor: $descriptor:path $(,)?
    ) => {
        impl $crate::method_collector::RegistersMethods for $ty {
            type Handler = $handler;

            const COLLECTION: &'static str = $collection;
            const PREFIX: &'static str = $prefix;

            fn descriptor() -> &'static $crate::method_collector::ClassDescriptor<$handler> {
                &$descriptor
            }

            fn collection_cell() -> &'static std::sync::OnceLock<
                $crate::method_collector::MethodCollection<$handler>,
            > {
                static CELL: std::sync::OnceLock<
                    $crate::method_collector::MethodCollection<$handler>,
                > = std::sync::OnceLock::new();
                &CELL
            }
        }
    };
}
