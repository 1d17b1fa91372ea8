//! Handler collection across a purchase-handler hierarchy.

use topup_toolkit::method_collector::{collect, ClassDescriptor, Member, MethodId, RegistersMethods};
use topup_toolkit::register_methods;

#[derive(Debug, Default)]
struct Purchase {
    trail: Vec<&'static str>,
}

type Handler = fn(&mut Purchase);

fn handle_foo(p: &mut Purchase) {
    p.trail.push("foo");
}

fn handle_bar(p: &mut Purchase) {
    p.trail.push("bar");
}

fn handle_baz(p: &mut Purchase) {
    p.trail.push("baz");
}

fn handle_foo_override(p: &mut Purchase) {
    p.trail.push("foo-override");
}

fn handle_from_config(p: &mut Purchase) {
    p.trail.push("factory");
}

static BASE: ClassDescriptor<Handler> = ClassDescriptor {
    name: "Base",
    members: &[
        Member::method("handle_foo", handle_foo),
        Member::method("handle_bar", handle_bar),
        Member::class_method("handle_from_config", handle_from_config),
        Member::attribute("handle_timeout"),
    ],
    bases: &[],
};

static SUB: ClassDescriptor<Handler> = ClassDescriptor {
    name: "Sub",
    members: &[Member::method("handle_baz", handle_baz)],
    bases: &[&BASE],
};

static OVERRIDING: ClassDescriptor<Handler> = ClassDescriptor {
    name: "Overriding",
    members: &[Member::method("handle_foo", handle_foo_override)],
    bases: &[&SUB],
};

struct Sub;

register_methods!(Sub, Handler, collection: "handlers", prefix: "handle_", descriptor: SUB);

#[test]
fn test_subclass_collects_own_and_inherited_methods() {
    let handlers = collect(&SUB, "handlers", "handle_");

    let mut names: Vec<_> = handlers.ids().map(|id| id.name).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["handle_bar", "handle_baz", "handle_foo"]);

    assert!(handlers.contains("Sub", "handle_baz"));
    assert!(handlers.contains("Base", "handle_foo"));
    assert!(handlers.contains("Base", "handle_bar"));
}

#[test]
fn test_class_methods_and_attributes_are_excluded() {
    let handlers = collect(&BASE, "handlers", "handle_");

    assert_eq!(handlers.len(), 2);
    assert!(!handlers.contains("Base", "handle_from_config"));
    assert!(!handlers.contains("Base", "handle_timeout"));
}

#[test]
fn test_prefix_without_matches_is_empty() {
    let handlers = collect(&SUB, "validators", "validate_");

    assert!(handlers.is_empty());
    assert_eq!(handlers.attribute(), "validators");
}

#[test]
fn test_override_and_base_are_distinct_entries() {
    let handlers = collect(&OVERRIDING, "handlers", "handle_");

    assert_eq!(handlers.len(), 4);
    assert!(handlers.contains("Overriding", "handle_foo"));
    assert!(handlers.contains("Base", "handle_foo"));

    let mut purchase = Purchase::default();
    (handlers.resolve("handle_foo").unwrap())(&mut purchase);
    let base_foo = handlers
        .get(&MethodId {
            owner: "Base",
            name: "handle_foo",
        })
        .unwrap();
    base_foo(&mut purchase);
    assert_eq!(purchase.trail, vec!["foo-override", "foo"]);
}

#[test]
fn test_running_every_handler() {
    let mut purchase = Purchase::default();
    for handler in collect(&SUB, "handlers", "handle_").handlers() {
        handler(&mut purchase);
    }
    assert_eq!(purchase.trail, vec!["baz", "foo", "bar"]);
}

#[test]
fn test_registered_collection_is_shared() {
    let first = Sub::registered_methods();
    let second = Sub::registered_methods();

    assert!(std::ptr::eq(first, second));
    assert_eq!(first.attribute(), "handlers");
    assert_eq!(first.len(), 3);
}
