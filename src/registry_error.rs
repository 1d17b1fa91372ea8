use thiserror::Error;

/// Failures reported by singleton registry lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The requested type is declared abstract (a registry root) and cannot be instantiated.
    #[error("cannot instantiate the abstract registry root: {type_name}")]
    AbstractRoot { type_name: &'static str },

    /// A stored entry did not downcast to the type it is keyed under.
    #[error("Type mismatch in registry for type: {type_name}")]
    TypeMismatch { type_name: &'static str },
}
