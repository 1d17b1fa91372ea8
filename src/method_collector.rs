//! Collects prefix-matched handler methods across a class hierarchy.
//!
//! Rust types have no reflective member list, so a class is described by a static
//! [`ClassDescriptor`]: its name, its declared members and its direct bases. [`collect`]
//! walks the descriptor and its ancestors and gathers every instance method whose name
//! starts with a prefix into a [`MethodCollection`].
//!
//! All handlers in one hierarchy share the signature `F`, typically a `fn` pointer.
//!
//! ```
//! use topup_toolkit::method_collector::{collect, ClassDescriptor, Member};
//!
//! type Handler = fn(u32) -> u32;
//!
//! fn handle_double(x: u32) -> u32 { x * 2 }
//! fn handle_square(x: u32) -> u32 { x * x }
//! fn handle_create(x: u32) -> u32 { x }
//!
//! static BASE: ClassDescriptor<Handler> = ClassDescriptor {
//!     name: "Base",
//!     members: &[Member::method("handle_double", handle_double)],
//!     bases: &[],
//! };
//!
//! static CHILD: ClassDescriptor<Handler> = ClassDescriptor {
//!     name: "Child",
//!     members: &[
//!         Member::method("handle_square", handle_square),
//!         Member::class_method("handle_create", handle_create),
//!     ],
//!     bases: &[&BASE],
//! };
//!
//! let handlers = collect(&CHILD, "handlers", "handle_");
//! assert_eq!(handlers.len(), 2);
//! assert!(handlers.contains("Base", "handle_double"));
//! assert!(!handlers.contains("Child", "handle_create"));
//! ```

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;

/// What a declared member is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind<F> {
    /// Called through an instance. Eligible for collection.
    Method(F),
    /// Factory-style, called through the class. Never collected.
    ClassMethod(F),
    /// Not callable.
    Attribute,
}

/// A member declared directly on one class.
#[derive(Debug, Clone, Copy)]
pub struct Member<F> {
    pub name: &'static str,
    pub kind: MemberKind<F>,
}

impl<F> Member<F> {
    pub const fn method(name: &'static str, handler: F) -> Self {
        Member {
            name,
            kind: MemberKind::Method(handler),
        }
    }

    pub const fn class_method(name: &'static str, handler: F) -> Self {
        Member {
            name,
            kind: MemberKind::ClassMethod(handler),
        }
    }

    pub const fn attribute(name: &'static str) -> Self {
        Member {
            name,
            kind: MemberKind::Attribute,
        }
    }
}

/// Static description of a class: its own members and its direct bases, in declaration order.
pub struct ClassDescriptor<F: 'static> {
    pub name: &'static str,
    pub members: &'static [Member<F>],
    pub bases: &'static [&'static ClassDescriptor<F>],
}

impl<F: 'static> ClassDescriptor<F> {
    /// The class followed by its ancestors.
    ///
    /// Depth-first, left to right, keeping each ancestor at its last occurrence so a
    /// base shared by several parents comes after all of them.
    pub fn resolution_order(&self) -> Vec<&ClassDescriptor<F>> {
        fn walk<'a, F: 'static>(
            class: &'a ClassDescriptor<F>,
            out: &mut Vec<&'a ClassDescriptor<F>>,
        ) {
            out.push(class);
            for base in class.bases {
                walk(base, out);
            }
        }

        let mut visited = Vec::new();
        walk(self, &mut visited);

        let mut order: Vec<&ClassDescriptor<F>> = Vec::with_capacity(visited.len());
        for (index, class) in visited.iter().enumerate() {
            let seen_later = visited[index + 1..]
                .iter()
                .any(|later| std::ptr::eq(*later, *class));
            if !seen_later {
                order.push(*class);
            }
        }
        order
    }

    /// Attribute lookup: the first member called `name` along the resolution order.
    pub fn lookup(&self, name: &str) -> Option<(&'static str, &Member<F>)> {
        self.resolution_order().into_iter().find_map(|class| {
            class
                .members
                .iter()
                .find(|member| member.name == name)
                .map(|member| (class.name, member))
        })
    }
}

impl<F: 'static> fmt::Debug for ClassDescriptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<_> = self.members.iter().map(|m| m.name).collect();
        let bases: Vec<_> = self.bases.iter().map(|b| b.name).collect();
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("members", &members)
            .field("bases", &bases)
            .finish()
    }
}

/// Identity of a collected callable: the class that declares it and its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId {
    pub owner: &'static str,
    pub name: &'static str,
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// The set of collected handlers, stored under a named collection attribute.
///
/// Iteration follows the resolution order: the class's own methods first, then its
/// ancestors'.
#[derive(Debug, Clone)]
pub struct MethodCollection<F> {
    attribute: &'static str,
    methods: IndexMap<MethodId, F>,
}

impl<F: Copy> MethodCollection<F> {
    pub fn attribute(&self) -> &'static str {
        self.attribute
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn contains(&self, owner: &str, name: &str) -> bool {
        self.methods
            .keys()
            .any(|id| id.owner == owner && id.name == name)
    }

    pub fn get(&self, id: &MethodId) -> Option<F> {
        self.methods.get(id).copied()
    }

    /// The most-derived handler called `name`, if any was collected.
    pub fn resolve(&self, name: &str) -> Option<F> {
        self.methods
            .iter()
            .find(|(id, _)| id.name == name)
            .map(|(_, handler)| *handler)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MethodId, F)> + '_ {
        self.methods.iter().map(|(id, handler)| (*id, *handler))
    }

    pub fn ids(&self) -> impl Iterator<Item = MethodId> + '_ {
        self.methods.keys().copied()
    }

    pub fn handlers(&self) -> impl Iterator<Item = F> + '_ {
        self.methods.values().copied()
    }
}

/// Gather every instance method of `class` and its ancestors whose name starts with
/// `name_prefix`.
///
/// Callables are identified by declaring class and name: an override and the method it
/// overrides are two entries, while an inherited method reached along several paths is
/// one. Handler values are never compared, so one function declared under two names,
/// or declared again by a subclass, yields an entry per declaration. Class methods and
/// attributes are skipped. No match yields an empty collection.
pub fn collect<F: Copy + 'static>(
    class: &ClassDescriptor<F>,
    collection_attribute_name: &'static str,
    name_prefix: &str,
) -> MethodCollection<F> {
    let mut methods = IndexMap::new();

    for ancestor in class.resolution_order() {
        for member in ancestor.members {
            if !member.name.starts_with(name_prefix) {
                continue;
            }
            if let MemberKind::Method(handler) = member.kind {
                methods
                    .entry(MethodId {
                        owner: ancestor.name,
                        name: member.name,
                    })
                    .or_insert(handler);
            }
        }
    }

    tracing::debug!(
        class = class.name,
        attribute = collection_attribute_name,
        prefix = name_prefix,
        collected = methods.len(),
        "collected methods"
    );

    MethodCollection {
        attribute: collection_attribute_name,
        methods,
    }
}

/// Attaches a method collection to a Rust type.
///
/// The collection is built on first access and then shared by every caller for the
/// rest of the process. Use [`register_methods!`](crate::register_methods) to implement it.
pub trait RegistersMethods: 'static {
    type Handler: Copy + Send + Sync + 'static;

    /// Name of the collection attribute.
    const COLLECTION: &'static str;

    /// Prefix a method name must start with to be collected.
    const PREFIX: &'static str;

    fn descriptor() -> &'static ClassDescriptor<Self::Handler>;

    /// Access the cell caching this type's collection.
    fn collection_cell() -> &'static OnceLock<MethodCollection<Self::Handler>>;

    fn registered_methods() -> &'static MethodCollection<Self::Handler> {
        Self::collection_cell()
            .get_or_init(|| collect(Self::descriptor(), Self::COLLECTION, Self::PREFIX))
    }
}
