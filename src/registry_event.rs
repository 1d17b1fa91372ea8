use std::fmt;

/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// Keyed events carry the `Debug` rendering of the discriminator.
///
/// # Examples
///
/// ```rust
/// use topup_toolkit::RegistryEvent;
///
/// let event = RegistryEvent::Create { type_name: "Cache", key: Some("\"A\"".into()) };
/// assert_eq!(event.to_string(), "create { type_name: Cache, key: \"A\" }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// No entry existed, so a new instance was constructed and stored.
    Create {
        type_name: &'static str,
        key: Option<String>,
    },

    /// An existing instance was handed out; construction arguments were dropped.
    Reuse {
        type_name: &'static str,
        key: Option<String>,
    },

    /// Construction of an abstract root was refused.
    Rejected { type_name: &'static str },

    /// A type (or type + key) existence check was performed.
    Contains {
        type_name: &'static str,
        key: Option<String>,
        found: bool,
    },
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &Option<String>) -> fmt::Result {
    match key {
        Some(key) => write!(f, ", key: {key}"),
        None => Ok(()),
    }
}

impl fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryEvent::Create { type_name, key } => {
                write!(f, "create {{ type_name: {type_name}")?;
                write_key(f, key)?;
                write!(f, " }}")
            }
            RegistryEvent::Reuse { type_name, key } => {
                write!(f, "reuse {{ type_name: {type_name}")?;
                write_key(f, key)?;
                write!(f, " }}")
            }
            RegistryEvent::Rejected { type_name } => {
                write!(f, "rejected {{ type_name: {type_name} }}")
            }
            RegistryEvent::Contains {
                type_name,
                key,
                found,
            } => {
                write!(f, "contains {{ type_name: {type_name}")?;
                write_key(f, key)?;
                write!(f, ", found: {found} }}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_event_display() {
        let event = RegistryEvent::Create {
            type_name: "i32",
            key: None,
        };
        assert_eq!(event.to_string(), "create { type_name: i32 }");

        let event = RegistryEvent::Reuse {
            type_name: "Cache",
            key: Some("\"A\"".to_string()),
        };
        assert_eq!(event.to_string(), "reuse { type_name: Cache, key: \"A\" }");

        let event = RegistryEvent::Contains {
            type_name: "u8",
            key: None,
            found: false,
        };
        assert_eq!(event.to_string(), "contains { type_name: u8, found: false }");

        let event = RegistryEvent::Rejected { type_name: "Root" };
        assert_eq!(event.to_string(), "rejected { type_name: Root }");
    }

    #[test]
    fn test_registry_event_clone() {
        let event = RegistryEvent::Create {
            type_name: "i32",
            key: Some("7".to_string()),
        };
        assert_eq!(event.clone(), event);
    }
}
