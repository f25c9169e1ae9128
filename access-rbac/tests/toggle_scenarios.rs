//! End-to-end toggle scenarios against the stock catalogue.
//!
//! The first half walks concrete matrix interactions. The second half drives
//! random toggle sequences through the resolver and checks that the matrix
//! invariants survive every step:
//! 1. Dependency closure (Delete needs Edit, Edit needs a read scope)
//! 2. At most one read variant per resource
//! 3. Toggles are idempotent
//! 4. Unknown keys never change the set

use access_rbac::{Action, GrantedSet, ResourceSchema, ToggleEvent, ToggleResolver};
use proptest::prelude::*;

const CRM_OWN: &str = "CRM — Read (Own): Read";
const CRM_ALL: &str = "CRM — Read (All): Read";

fn schema() -> ResourceSchema {
    ResourceSchema::builtin().unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_group_read_grants_narrowest_variant() {
    let schema = schema();
    let r = ToggleResolver::new(&schema);

    let next = r.compute_group_toggle(&GrantedSet::new(), "customers", Action::Read, true);
    assert!(next.contains(CRM_OWN));
    assert!(next.contains("Vendor: Read"));
    assert!(!next.contains(CRM_ALL));
}

#[test]
fn test_group_edit_grants_read_scope_and_edit() {
    let schema = schema();
    let r = ToggleResolver::new(&schema);

    let next = r.compute_group_toggle(&GrantedSet::new(), "customers", Action::Edit, true);
    assert!(next.contains(CRM_OWN));
    assert!(next.contains("CRM: Edit"));
    assert!(next.contains("Vendor: Edit"));
    assert!(next.contains("Vendor: Read"));
    assert!(!next.contains("CRM: Read"));
}

#[test]
fn test_group_edit_keeps_wider_variant() {
    let schema = schema();
    let r = ToggleResolver::new(&schema);

    let start = GrantedSet::from_strings(&[CRM_ALL]);
    let next = r.compute_group_toggle(&start, "customers", Action::Edit, true);
    assert!(next.contains(CRM_ALL));
    assert!(!next.contains(CRM_OWN));
}

#[test]
fn test_variant_switch_replaces_previous_variant() {
    let schema = schema();
    let r = ToggleResolver::new(&schema);

    let own = r.compute_child_toggle_variant(
        &GrantedSet::new(),
        "customers",
        "customers-crm",
        "CRM — Read (Own)",
        true,
    );
    let all = r.compute_child_toggle_variant(
        &own,
        "customers",
        "customers-crm",
        "CRM — Read (All)",
        true,
    );
    assert!(all.contains(CRM_ALL));
    assert!(!all.contains(CRM_OWN));
}

#[test]
fn test_revoking_last_variant_revokes_writes() {
    let schema = schema();
    let r = ToggleResolver::new(&schema);

    let start = GrantedSet::from_strings(&[CRM_OWN, "CRM: Edit", "CRM: Delete"]);
    let next = r.compute_child_toggle_variant(
        &start,
        "customers",
        "customers-crm",
        "CRM — Read (Own)",
        false,
    );
    assert!(!next.contains("CRM: Edit"));
    assert!(!next.contains("CRM: Delete"));
    assert!(next.is_empty());
}

#[test]
fn test_unknown_keys_are_noops() {
    let schema = schema();
    let r = ToggleResolver::new(&schema);

    let start = GrantedSet::from_strings(&["Vendor: Read", "Inventory: Read"]);
    assert_eq!(
        r.compute_child_toggle(&start, "bogus-parent", "bogus-child", Action::Edit, true),
        start
    );
    assert_eq!(
        r.compute_group_toggle(&start, "bogus", Action::Delete, true),
        start
    );
}

#[test]
fn test_admin_only_and_mocked_rows_are_not_editable() {
    let schema = schema();
    let r = ToggleResolver::new(&schema);

    let next = r.compute_group_toggle(&GrantedSet::new(), "finance", Action::Delete, true);
    assert!(next.contains("Invoices: Delete"));
    assert!(!next.contains("Payroll: Read"));

    let next = r.compute_group_toggle(&GrantedSet::new(), "analytics", Action::Read, true);
    assert!(next.is_empty());
}

#[test]
fn test_full_admin_walkthrough() {
    let schema = schema();
    let r = ToggleResolver::new(&schema);

    let mut granted = GrantedSet::new();
    for group in ["customers", "employees", "finance", "inventory", "reports"] {
        for action in Action::all() {
            granted = r.compute_group_toggle(&granted, group, action, true);
        }
    }
    assert!(schema.violations(&granted).is_empty());
    assert!(schema.unknown_names(&granted).is_empty());

    // Widen every variant row to All
    for (parent, child, label) in [
        ("customers", "customers-crm", "CRM — Read (All)"),
        ("employees", "employees-timesheets", "Timesheets — Read (All)"),
        ("finance", "finance-expenses", "Expenses — Read (All)"),
    ] {
        granted = r.compute_child_toggle_variant(&granted, parent, child, label, true);
    }
    assert!(granted.contains("Timesheets: Edit"));
    assert!(granted.contains("Expenses: Delete"));
    assert!(!granted.contains("Expenses — Read (Own): Read"));

    // Every catalogue name except the three narrow variants
    assert_eq!(granted.len(), schema.all_permission_names().count() - 3);
    assert!(schema.violations(&granted).is_empty());
}

// ============================================================================
// Properties
// ============================================================================

const RESOURCES: &[&str] = &[
    "dashboard",
    "customers",
    "employees",
    "finance",
    "inventory",
    "reports",
    "analytics",
    "bogus",
];

const CHILDREN: &[(&str, &str)] = &[
    ("customers", "customers-crm"),
    ("customers", "customers-vendor"),
    ("employees", "employees-directory"),
    ("employees", "employees-roles"),
    ("employees", "employees-timesheets"),
    ("finance", "finance-invoices"),
    ("finance", "finance-expenses"),
    ("finance", "finance-payroll"),
    ("bogus-parent", "bogus-child"),
];

const VARIANTS: &[(&str, &str, &str)] = &[
    ("customers", "customers-crm", "CRM — Read (Own)"),
    ("customers", "customers-crm", "CRM — Read (All)"),
    ("customers", "customers-crm", "CRM — Read (Team)"),
    ("customers", "customers-vendor", "Vendor"),
    ("employees", "employees-timesheets", "Timesheets — Read (Own)"),
    ("employees", "employees-timesheets", "Timesheets — Read (All)"),
    ("finance", "finance-expenses", "Expenses — Read (Own)"),
    ("finance", "finance-expenses", "Expenses — Read (All)"),
];

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![Just(Action::Read), Just(Action::Edit), Just(Action::Delete)]
}

fn event_strategy() -> impl Strategy<Value = ToggleEvent> {
    let group = (prop::sample::select(RESOURCES), action_strategy(), any::<bool>()).prop_map(
        |(resource, action, checked)| ToggleEvent::Group {
            resource: resource.to_string(),
            action,
            checked,
        },
    );
    let child = (prop::sample::select(CHILDREN), action_strategy(), any::<bool>()).prop_map(
        |((parent, child), action, checked)| ToggleEvent::Child {
            parent: parent.to_string(),
            child: child.to_string(),
            action,
            checked,
        },
    );
    let variant = (prop::sample::select(VARIANTS), any::<bool>()).prop_map(
        |((parent, child, variant), checked)| ToggleEvent::Variant {
            parent: parent.to_string(),
            child: child.to_string(),
            variant: variant.to_string(),
            checked,
        },
    );
    prop_oneof![group, child, variant]
}

fn replay(resolver: &ToggleResolver<'_>, events: &[ToggleEvent]) -> GrantedSet {
    events
        .iter()
        .fold(GrantedSet::new(), |acc, event| resolver.apply(&acc, event))
}

proptest! {
    #[test]
    fn prop_invariants_hold_after_every_toggle(
        events in prop::collection::vec(event_strategy(), 0..40)
    ) {
        let schema = schema();
        let r = ToggleResolver::new(&schema);

        let mut granted = GrantedSet::new();
        for event in &events {
            granted = r.apply(&granted, event);
            let violations = schema.violations(&granted);
            prop_assert!(violations.is_empty(), "{:?} after {:?}", violations, event);
            prop_assert!(schema.unknown_names(&granted).is_empty());
        }
    }

    #[test]
    fn prop_toggles_are_idempotent(
        history in prop::collection::vec(event_strategy(), 0..30),
        event in event_strategy(),
    ) {
        let schema = schema();
        let r = ToggleResolver::new(&schema);

        let start = replay(&r, &history);
        let once = r.apply(&start, &event);
        let twice = r.apply(&once, &event);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_toggles_are_deterministic(
        history in prop::collection::vec(event_strategy(), 0..30),
        event in event_strategy(),
    ) {
        let schema = schema();
        let r = ToggleResolver::new(&schema);

        let start = replay(&r, &history);
        prop_assert_eq!(r.apply(&start, &event), r.apply(&start, &event));
    }

    #[test]
    fn prop_unknown_keys_never_change_the_set(
        history in prop::collection::vec(event_strategy(), 0..30),
        action in action_strategy(),
        checked in any::<bool>(),
    ) {
        let schema = schema();
        let r = ToggleResolver::new(&schema);

        let start = replay(&r, &history);
        prop_assert_eq!(
            r.compute_child_toggle(&start, "bogus-parent", "bogus-child", action, checked),
            start.clone()
        );
        prop_assert_eq!(r.compute_group_toggle(&start, "bogus", action, checked), start.clone());
        prop_assert_eq!(
            r.compute_child_toggle_variant(&start, "customers", "customers-crm", "bogus", checked),
            start
        );
    }

    #[test]
    fn prop_granting_writes_never_narrows_read_scope(
        history in prop::collection::vec(event_strategy(), 0..30),
        action in prop_oneof![Just(Action::Edit), Just(Action::Delete)],
    ) {
        let schema = schema();
        let r = ToggleResolver::new(&schema);

        let start = r.compute_child_toggle_variant(
            &replay(&r, &history),
            "customers",
            "customers-crm",
            "CRM — Read (All)",
            true,
        );
        let via_group = r.compute_group_toggle(&start, "customers", action, true);
        let via_child = r.compute_child_toggle(&start, "customers", "customers-crm", action, true);
        for next in [via_group, via_child] {
            prop_assert!(next.contains(CRM_ALL));
            prop_assert!(!next.contains(CRM_OWN));
        }
    }

    #[test]
    fn prop_revoking_granted_variant_clears_writes(
        history in prop::collection::vec(event_strategy(), 0..30),
    ) {
        let schema = schema();
        let r = ToggleResolver::new(&schema);

        let start = replay(&r, &history);
        let granted_variant = [
            "CRM — Read (Own)",
            "CRM — Read (All)",
        ]
        .into_iter()
        .find(|label| start.contains(&format!("{}: Read", label)));

        if let Some(label) = granted_variant {
            let next = r.compute_child_toggle_variant(&start, "customers", "customers-crm", label, false);
            prop_assert!(!next.contains(CRM_OWN));
            prop_assert!(!next.contains(CRM_ALL));
            prop_assert!(!next.contains("CRM: Edit"));
            prop_assert!(!next.contains("CRM: Delete"));
        }
    }
}
