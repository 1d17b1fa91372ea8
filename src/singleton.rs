//! Traits that opt a type into singleton construction.
//!
//! A type is either class-keyed ([`Singleton`], one instance per type) or
//! property-keyed ([`PropertySingleton`], one instance per type and
//! discriminator). Instances are only ever built through a registry, see
//! [`RegistryApi`](crate::RegistryApi).

use std::fmt::Debug;
use std::hash::Hash;

/// A type with at most one instance per registry.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use topup_toolkit::{RegistryApi, Singleton, SingletonRegistry};
///
/// struct Gateway {
///     endpoint: String,
/// }
///
/// impl Singleton for Gateway {
///     type Args = String;
///
///     fn construct(endpoint: String) -> Self {
///         Gateway { endpoint }
///     }
/// }
///
/// let registry = SingletonRegistry::new();
/// let first = registry.instance::<Gateway>("https://a".into()).unwrap();
/// let second = registry.instance::<Gateway>("https://b".into()).unwrap();
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(second.endpoint, "https://a");
/// ```
pub trait Singleton: Send + Sync + Sized + 'static {
    /// Arguments accepted by the construction path. Ignored once an instance exists.
    type Args;

    /// Abstract types are registry roots and are refused by every lookup.
    const ABSTRACT: bool = false;

    fn construct(args: Self::Args) -> Self;
}

/// A type with at most one instance per discriminator value.
///
/// The discriminator is always passed explicitly to
/// [`keyed_instance`](crate::RegistryApi::keyed_instance) and handed to
/// [`construct`](PropertySingleton::construct) by reference.
pub trait PropertySingleton: Send + Sync + Sized + 'static {
    type Key: Hash + Eq + Debug + Send + Sync + 'static;

    type Args;

    const ABSTRACT: bool = false;

    fn construct(key: &Self::Key, args: Self::Args) -> Self;
}

/// Root of the class-keyed singletons. Never instantiable.
#[derive(Debug)]
pub struct AbstractSingleton;

impl Singleton for AbstractSingleton {
    type Args = ();

    const ABSTRACT: bool = true;

    fn construct(_: ()) -> Self {
        AbstractSingleton
    }
}

/// Root of the property-keyed singletons. Never instantiable.
#[derive(Debug)]
pub struct AbstractPropertySingleton;

impl PropertySingleton for AbstractPropertySingleton {
    type Key = String;
    type Args = ();

    const ABSTRACT: bool = true;

    fn construct(_: &String, _: ()) -> Self {
        AbstractPropertySingleton
    }
}
