use proptest::prelude::*;
use sqlgrants::privileges::expansion::replacements;
use sqlgrants::{GrantType, PrivilegeSet};

fn tokens() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(
        prop::sample::select(vec![
            "ALL",
            "ALL PRIVILEGES",
            "TEMP",
            "TEMPORARY",
            "CONNECT",
            "CREATE",
            "SELECT",
            "INSERT",
            "UPDATE",
            "USAGE",
            "EXECUTE",
        ]),
        0..8,
    )
}

fn grant_type() -> impl Strategy<Value = GrantType> {
    prop::sample::select(GrantType::ALL.to_vec())
}

proptest! {
    #[test]
    fn expansion_is_idempotent(tokens in tokens(), grant_type in grant_type()) {
        let set = PrivilegeSet::parse(tokens).unwrap();
        let once = set.expand(grant_type);
        let twice = once.expand(grant_type);
        prop_assert_eq!(once.sorted(), twice.sorted());
    }

    #[test]
    fn expansion_output_is_sorted_and_unique(tokens in tokens(), grant_type in grant_type()) {
        let expanded = PrivilegeSet::parse(tokens).unwrap().expand(grant_type);
        let listed = expanded.to_string_vec();
        prop_assert_eq!(listed, expanded.sorted());
    }
}

#[test]
fn all_expands_per_object_kind() {
    let all = PrivilegeSet::parse(["ALL"]).unwrap();
    let expected: [(GrantType, &[&str]); 8] = [
        (GrantType::RoleDatabase, &["CONNECT", "CREATE", "TEMPORARY"]),
        (GrantType::RoleSchema, &["CREATE", "USAGE"]),
        (
            GrantType::RoleTable,
            &[
                "DELETE",
                "INSERT",
                "REFERENCES",
                "SELECT",
                "TRIGGER",
                "TRUNCATE",
                "UPDATE",
            ],
        ),
        (GrantType::RoleColumn, &["INSERT", "REFERENCES", "SELECT", "UPDATE"]),
        (GrantType::RoleSequence, &["SELECT", "UPDATE", "USAGE"]),
        (GrantType::RoleRoutine, &["EXECUTE"]),
        (GrantType::RoleForeignServer, &["USAGE"]),
        (GrantType::RoleForeignDataWrapper, &["USAGE"]),
    ];
    for (grant_type, privileges) in expected {
        assert_eq!(all.expand(grant_type).sorted(), privileges, "{grant_type}");
    }
}

#[test]
fn membership_has_no_shorthands() {
    assert!(replacements(GrantType::RoleMember).is_empty());
    let set = PrivilegeSet::parse(["ALL"]).unwrap();
    assert_eq!(set.expand(GrantType::RoleMember).sorted(), vec!["ALL"]);
}

#[test]
fn temp_only_expands_for_databases() {
    let temp = PrivilegeSet::parse(["TEMP"]).unwrap();
    assert_eq!(temp.expand(GrantType::RoleDatabase).sorted(), vec!["TEMPORARY"]);
    assert_eq!(temp.expand(GrantType::RoleSchema).sorted(), vec!["TEMP"]);
}

#[test]
fn privilege_sets_compare_as_sets() {
    let left = PrivilegeSet::parse(["SELECT", "INSERT", "SELECT"]).unwrap();
    let right = PrivilegeSet::parse(["INSERT", "SELECT"]).unwrap();
    assert_eq!(left, right);
    assert_eq!(left.to_sql_list(), "SELECT, INSERT");
}
