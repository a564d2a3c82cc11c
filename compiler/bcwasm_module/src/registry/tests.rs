#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use bcwasm_ir::{FunctionIndex, FunctionName, ImportDescriptor, SyntheticName};

use super::FunctionRegistry;
use crate::error::RegistryError;
use crate::lifecycle::Lifecycle;

/// Method bodies are plain strings in these tests.
type Registry = FunctionRegistry<&'static str>;

fn f(name: &str) -> FunctionName {
    FunctionName::new("Test", name, "()V")
}

fn synthetic(name: &str) -> SyntheticName {
    SyntheticName::new("Test", name, "()V")
}

// Identity and counting

#[test]
fn untouched_functions_are_unknown() {
    let registry = Registry::new();
    assert!(!registry.is_known(&f("main")));
    assert_eq!(registry.len(), 0);
    assert!(registry.is_empty());
    assert_eq!(registry.lifecycle(&f("main")), None);
}

#[test]
fn queries_create_unseen_records() {
    let mut registry = Registry::new();
    assert!(!registry.need_to_scan(&f("a")));
    assert!(!registry.need_to_write(&f("b")));
    assert_eq!(registry.function_index(&f("c")), FunctionIndex::UNSET);
    assert!(!registry.needs_receiver_parameter(&f("d")));
    assert_eq!(registry.import_descriptor(&f("e")), None);

    assert_eq!(registry.len(), 5);
    for name in ["a", "b", "c", "d", "e"] {
        assert!(registry.is_known(&f(name)));
        assert_eq!(registry.lifecycle(&f(name)), Some(Lifecycle::Unseen));
    }
}

#[test]
fn worklist_queries_do_not_create_records() {
    let registry = Registry::new();
    assert_eq!(registry.next_scan_later(), None);
    assert!(registry.write_later().is_empty());
    assert!(registry.needed_imports().is_empty());
    assert!(registry.is_empty());
}

#[test]
fn with_capacity_starts_empty() {
    let registry = Registry::with_capacity(64);
    assert!(registry.is_empty());
    assert!(!registry.is_finished());
}

// Discovery

#[test]
fn mark_as_needed_returns_name_without_alias() {
    let mut registry = Registry::new();
    let called = registry.mark_as_needed(&f("main")).unwrap();
    assert_eq!(called, f("main"));
    assert_eq!(registry.lifecycle(&f("main")), Some(Lifecycle::Needed));
    assert!(registry.need_to_scan(&f("main")));
}

#[test]
fn mark_as_needed_does_not_regress_lifecycle() {
    let mut registry = Registry::new();
    registry.mark_as_needed(&f("a")).unwrap();
    registry.mark_as_scanned(&f("a"), false);
    registry.mark_as_needed(&f("a")).unwrap();
    assert_eq!(registry.lifecycle(&f("a")), Some(Lifecycle::Scanned));

    registry.mark_as_written(&f("a"));
    registry.mark_as_needed(&f("a")).unwrap();
    assert_eq!(registry.lifecycle(&f("a")), Some(Lifecycle::Written));
}

#[test]
fn abstract_stays_abstract_when_needed() {
    let mut registry = Registry::new();
    registry.mark_as_abstract(&f("iface"));
    let called = registry.mark_as_needed(&f("iface")).unwrap();
    assert_eq!(called, f("iface"));
    assert_eq!(registry.lifecycle(&f("iface")), Some(Lifecycle::Abstract));
    assert!(registry.write_later().is_empty());
    assert_eq!(registry.next_scan_later(), None);
}

// Closure

#[test]
fn discovery_after_finish_is_an_error() {
    let mut registry = Registry::new();
    registry.mark_as_needed(&f("main")).unwrap();
    registry.prepare_finish();
    assert!(registry.is_finished());

    let err = registry.mark_as_needed(&f("late")).unwrap_err();
    assert_eq!(err, RegistryError::DiscoveryClosed { name: f("late") });
    assert_eq!(err.to_string(), "prepare was already finished: Test.late()V");
    assert_eq!(registry.lifecycle(&f("late")), Some(Lifecycle::Unseen));
}

#[test]
fn known_functions_can_be_needed_after_finish() {
    let mut registry = Registry::new();
    registry.mark_as_needed(&f("needed")).unwrap();
    registry.mark_as_needed(&f("scanned")).unwrap();
    registry.mark_as_scanned(&f("scanned"), false);
    registry.mark_as_needed(&f("written")).unwrap();
    registry.mark_as_written(&f("written"));
    registry.mark_as_abstract(&f("abstract"));
    registry.prepare_finish();

    for name in ["needed", "scanned", "written", "abstract"] {
        assert_eq!(registry.mark_as_needed(&f(name)), Ok(f(name)));
    }
}

#[test]
fn touched_but_unseen_is_still_fresh_after_finish() {
    let mut registry = Registry::new();
    registry.mark_as_import(&f("imported"), ImportDescriptor::binding("env", "x"));
    registry.prepare_finish();
    assert!(registry.mark_as_needed(&f("imported")).is_err());
}

#[test]
fn prepare_finish_is_idempotent() {
    let mut registry = Registry::new();
    registry.prepare_finish();
    registry.prepare_finish();
    assert!(registry.is_finished());
}

// Scanning

#[test]
fn next_scan_later_follows_registration_order() {
    let mut registry = Registry::new();
    registry.mark_as_needed(&f("a")).unwrap();
    registry.mark_as_needed(&f("b")).unwrap();
    registry.mark_as_needed(&f("c")).unwrap();

    assert_eq!(registry.next_scan_later(), Some(f("a")));
    registry.mark_as_scanned(&f("a"), false);
    assert_eq!(registry.next_scan_later(), Some(f("b")));
    registry.mark_as_scanned(&f("c"), false);
    assert_eq!(registry.next_scan_later(), Some(f("b")));
    registry.mark_as_scanned(&f("b"), false);
    assert_eq!(registry.next_scan_later(), None);
}

#[test]
fn mark_as_scanned_from_unseen() {
    let mut registry = Registry::new();
    registry.mark_as_scanned(&f("a"), true);
    assert_eq!(registry.lifecycle(&f("a")), Some(Lifecycle::Scanned));
    assert!(registry.needs_receiver_parameter(&f("a")));
}

#[test]
fn rescan_refines_receiver_flag_only() {
    let mut registry = Registry::new();
    registry.mark_as_needed(&f("a")).unwrap();
    registry.mark_as_scanned(&f("a"), true);
    registry.mark_as_written(&f("a"));
    registry.mark_as_scanned(&f("a"), false);

    assert_eq!(registry.lifecycle(&f("a")), Some(Lifecycle::Written));
    assert!(!registry.needs_receiver_parameter(&f("a")));
}

#[test]
fn scanning_abstract_keeps_lifecycle() {
    let mut registry = Registry::new();
    registry.mark_as_abstract(&f("iface"));
    registry.mark_as_scanned(&f("iface"), true);
    assert_eq!(registry.lifecycle(&f("iface")), Some(Lifecycle::Abstract));
    assert!(registry.needs_receiver_parameter(&f("iface")));
}

// Emission

#[test]
fn write_later_lists_needed_and_scanned_in_order() {
    let mut registry = Registry::new();
    registry.mark_as_needed(&f("a")).unwrap();
    registry.mark_as_needed(&f("b")).unwrap();
    registry.mark_as_scanned(&f("b"), false);
    registry.mark_as_abstract(&f("c"));
    registry.mark_as_needed(&f("d")).unwrap();
    registry.mark_as_written(&f("d"));
    registry.mark_as_import(&f("e"), ImportDescriptor::new());

    assert_eq!(registry.write_later(), vec![f("a"), f("b")]);
    assert_eq!(registry.abstracted_functions(), vec![f("a"), f("b")]);
    assert!(registry.need_to_write(&f("a")));
    assert!(!registry.need_to_write(&f("c")));
    assert!(!registry.need_to_write(&f("d")));
}

#[test]
fn mark_as_written_overrides_abstract() {
    let mut registry = Registry::new();
    registry.mark_as_abstract(&f("a"));
    registry.mark_as_written(&f("a"));
    registry.mark_as_written(&f("a"));
    assert_eq!(registry.lifecycle(&f("a")), Some(Lifecycle::Written));
}

#[test]
fn needed_imports_require_use() {
    let mut registry = Registry::new();
    registry.mark_as_import(&f("unused"), ImportDescriptor::binding("env", "unused"));
    registry.mark_as_needed(&f("plain")).unwrap();
    registry.mark_as_needed(&f("used")).unwrap();
    registry.mark_as_import(&f("used"), ImportDescriptor::binding("env", "used"));
    registry.mark_as_import(&f("scanned"), ImportDescriptor::binding("env", "scanned"));
    registry.mark_as_scanned(&f("scanned"), false);
    registry.mark_as_import(&f("written"), ImportDescriptor::binding("env", "written"));
    registry.mark_as_needed(&f("written")).unwrap();
    registry.mark_as_written(&f("written"));

    assert_eq!(registry.needed_imports(), vec![f("used"), f("scanned")]);
    let descriptor = registry.import_descriptor(&f("used")).unwrap();
    assert_eq!(descriptor.name(), Some("used"));
}

#[test]
fn import_does_not_change_lifecycle() {
    let mut registry = Registry::new();
    registry.mark_as_needed(&f("a")).unwrap();
    registry.mark_as_import(&f("a"), ImportDescriptor::binding("env", "a"));
    assert_eq!(registry.lifecycle(&f("a")), Some(Lifecycle::Needed));
}

// Aliasing

#[test]
fn alias_redirects_calls() {
    let mut registry = Registry::new();
    let sub = FunctionName::new("Sub", "run", "()V");
    let base = FunctionName::new("Base", "run", "()V");

    registry.set_alias(&sub, base.clone());
    assert_eq!(registry.lifecycle(&sub), Some(Lifecycle::Written));
    assert_eq!(registry.mark_as_needed(&sub), Ok(base.clone()));
    assert!(registry.write_later().is_empty());
    assert!(!registry.is_known(&base));
}

#[test]
fn alias_forces_written_from_any_state() {
    let mut registry = Registry::new();
    registry.mark_as_needed(&f("needed")).unwrap();
    registry.mark_as_scanned(&f("scanned"), false);
    registry.mark_as_abstract(&f("abstract"));

    for name in ["needed", "scanned", "abstract"] {
        registry.set_alias(&f(name), f("target"));
        assert_eq!(registry.lifecycle(&f(name)), Some(Lifecycle::Written));
    }
    assert!(registry.write_later().is_empty());
}

#[test]
fn alias_is_permanent() {
    let mut registry = Registry::new();
    registry.set_alias(&f("a"), f("first"));
    registry.set_alias(&f("a"), f("second"));
    assert_eq!(registry.mark_as_needed(&f("a")), Ok(f("first")));
    assert_eq!(
        registry.state(&f("a")).and_then(|s| s.alias()),
        Some(&f("first"))
    );
}

#[test]
fn aliased_unseen_function_after_finish_still_fails() {
    let mut registry = Registry::new();
    registry.set_alias(&f("a"), f("b"));
    registry.prepare_finish();
    // Written, not Unseen: the alias is returned.
    assert_eq!(registry.mark_as_needed(&f("a")), Ok(f("b")));
}

// Replacement

#[test]
fn first_replacement_wins() {
    let mut registry = Registry::new();
    registry.add_replacement(&f("a"), "body1");
    registry.add_replacement(&f("a"), "body2");
    assert_eq!(registry.replace(&f("a"), "fallback"), "body1");
    assert_eq!(registry.replacement(&f("a")), Some(&"body1"));
}

#[test]
fn replace_without_replacement_keeps_current() {
    let mut registry = Registry::new();
    assert_eq!(registry.replace(&f("a"), "current"), "current");
    assert!(registry.is_known(&f("a")));
}

#[test]
fn replacement_does_not_change_lifecycle() {
    let mut registry = Registry::new();
    registry.add_replacement(&f("a"), "body");
    assert_eq!(registry.lifecycle(&f("a")), Some(Lifecycle::Unseen));
}

// Dispatch index

#[test]
fn function_index_round_trip() {
    let mut registry = Registry::new();
    assert_eq!(registry.function_index(&f("a")), FunctionIndex::UNSET);
    registry.set_function_index(&f("a"), FunctionIndex::new(4));
    assert_eq!(registry.function_index(&f("a")).get(), Some(4));
    registry.set_function_index(&f("a"), FunctionIndex::new(7));
    assert_eq!(registry.function_index(&f("a")).raw(), 7);
}

// Re-registration

#[test]
fn replace_if_exists_moves_to_end_and_keeps_fields() {
    let mut registry = Registry::new();
    let synthetic_helper = synthetic("helper");
    let helper = synthetic_helper.as_name().clone();

    registry.mark_as_needed(&helper).unwrap();
    registry.add_replacement(&helper, "generated");
    registry.set_function_index(&helper, FunctionIndex::new(2));
    registry.mark_as_scanned(&helper, true);
    registry.mark_as_needed(&f("a")).unwrap();
    registry.mark_as_needed(&f("b")).unwrap();

    let called = registry
        .mark_as_needed_and_replace_if_exists(&synthetic_helper)
        .unwrap();
    assert_eq!(called, helper);

    let order: Vec<_> = registry.names().cloned().collect();
    assert_eq!(order, vec![f("a"), f("b"), helper.clone()]);
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.lifecycle(&helper), Some(Lifecycle::Scanned));
    assert_eq!(registry.replacement(&helper), Some(&"generated"));
    assert_eq!(registry.function_index(&helper).get(), Some(2));
    assert!(registry.needs_receiver_parameter(&helper));
    assert_eq!(registry.write_later(), vec![f("a"), f("b"), helper]);
}

#[test]
fn replace_if_exists_keeps_alias_and_import_binding() {
    let mut registry = Registry::new();
    let bridge = synthetic("bridge");
    let bound = synthetic("bound");

    registry.set_alias(bridge.as_name(), f("target"));
    registry.mark_as_import(bound.as_name(), ImportDescriptor::binding("env", "bound"));
    registry.mark_as_needed(bound.as_name()).unwrap();
    registry.mark_as_needed(&f("a")).unwrap();

    // The alias target is still returned after the move.
    assert_eq!(
        registry.mark_as_needed_and_replace_if_exists(&bridge),
        Ok(f("target"))
    );
    assert_eq!(
        registry.mark_as_needed_and_replace_if_exists(&bound),
        Ok(bound.as_name().clone())
    );

    let order: Vec<_> = registry.names().cloned().collect();
    assert_eq!(
        order,
        vec![
            f("a"),
            bridge.as_name().clone(),
            bound.as_name().clone(),
        ]
    );
    assert_eq!(registry.lifecycle(bridge.as_name()), Some(Lifecycle::Written));
    assert_eq!(
        registry.state(bridge.as_name()).and_then(|state| state.alias()),
        Some(&f("target"))
    );
    assert_eq!(registry.lifecycle(bound.as_name()), Some(Lifecycle::Needed));
    assert_eq!(
        registry
            .import_descriptor(bound.as_name())
            .and_then(ImportDescriptor::name),
        Some("bound")
    );
    assert_eq!(registry.needed_imports(), vec![bound.as_name().clone()]);
}

#[test]
fn replace_if_exists_on_new_name_inserts_needed() {
    let mut registry = Registry::new();
    registry.mark_as_needed(&f("a")).unwrap();
    let helper = synthetic("helper");
    registry.mark_as_needed_and_replace_if_exists(&helper).unwrap();

    let order: Vec<_> = registry.names().cloned().collect();
    assert_eq!(order, vec![f("a"), helper.as_name().clone()]);
    assert_eq!(registry.lifecycle(helper.as_name()), Some(Lifecycle::Needed));
}

#[test]
fn replace_if_exists_after_finish() {
    let mut registry = Registry::new();
    let known = synthetic("known");
    registry.mark_as_needed(known.as_name()).unwrap();
    registry.prepare_finish();

    assert_eq!(
        registry.mark_as_needed_and_replace_if_exists(&known),
        Ok(known.into_name())
    );
    let fresh = synthetic("fresh");
    assert_eq!(
        registry.mark_as_needed_and_replace_if_exists(&fresh),
        Err(RegistryError::DiscoveryClosed {
            name: fresh.into_name()
        })
    );
}
