//! Shorthand privileges and what `PostgreSQL` reports for them once granted.
//!
//! The server canonicalizes `ALL` (and `TEMP`) before storing an ACL, so
//! `aclexplode` never returns the shorthand. Desired sets are expanded with the
//! same rules before comparison. Tables follow the PostgreSQL 15 `ddl-priv`
//! abbreviations.

use crate::classifier::grant_type::GrantType;

/// A shorthand and the privileges it stands for.
pub type Replacement = (&'static str, &'static [&'static str]);

const DATABASE: &[Replacement] = &[
    ("ALL", &["CREATE", "TEMPORARY", "CONNECT"]),
    ("ALL PRIVILEGES", &["CREATE", "TEMPORARY", "CONNECT"]),
    ("TEMP", &["TEMPORARY"]),
];

const SCHEMA: &[Replacement] = &[
    ("ALL", &["CREATE", "USAGE"]),
    ("ALL PRIVILEGES", &["CREATE", "USAGE"]),
];

const TABLE: &[Replacement] = &[
    (
        "ALL",
        &[
            "SELECT",
            "INSERT",
            "UPDATE",
            "DELETE",
            "TRUNCATE",
            "REFERENCES",
            "TRIGGER",
        ],
    ),
    (
        "ALL PRIVILEGES",
        &[
            "SELECT",
            "INSERT",
            "UPDATE",
            "DELETE",
            "TRUNCATE",
            "REFERENCES",
            "TRIGGER",
        ],
    ),
];

const COLUMN: &[Replacement] = &[
    ("ALL", &["SELECT", "INSERT", "UPDATE", "REFERENCES"]),
    ("ALL PRIVILEGES", &["SELECT", "INSERT", "UPDATE", "REFERENCES"]),
];

const SEQUENCE: &[Replacement] = &[
    ("ALL", &["USAGE", "SELECT", "UPDATE"]),
    ("ALL PRIVILEGES", &["USAGE", "SELECT", "UPDATE"]),
];

const ROUTINE: &[Replacement] = &[("ALL", &["EXECUTE"]), ("ALL PRIVILEGES", &["EXECUTE"])];

const FOREIGN_OBJECT: &[Replacement] = &[("ALL", &["USAGE"]), ("ALL PRIVILEGES", &["USAGE"])];

/// All shorthands known for `grant_type`.
pub fn replacements(grant_type: GrantType) -> &'static [Replacement] {
    match grant_type {
        GrantType::RoleMember => &[],
        GrantType::RoleDatabase => DATABASE,
        GrantType::RoleSchema => SCHEMA,
        GrantType::RoleTable => TABLE,
        GrantType::RoleColumn => COLUMN,
        GrantType::RoleSequence => SEQUENCE,
        GrantType::RoleRoutine => ROUTINE,
        GrantType::RoleForeignServer | GrantType::RoleForeignDataWrapper => FOREIGN_OBJECT,
    }
}

/// Expansion of a single privilege, if it is a shorthand for `grant_type`.
pub fn replacement_for(grant_type: GrantType, privilege: &str) -> Option<&'static [&'static str]> {
    replacements(grant_type)
        .iter()
        .find(|(shorthand, _)| *shorthand == privilege)
        .map(|(_, expanded)| *expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansions_never_contain_a_shorthand() {
        for grant_type in GrantType::ALL {
            for (_, expanded) in replacements(grant_type) {
                for token in *expanded {
                    assert!(
                        replacement_for(grant_type, token).is_none(),
                        "{token} would expand again for {grant_type}"
                    );
                }
            }
        }
    }

    #[test]
    fn membership_has_no_shorthands() {
        assert!(replacement_for(GrantType::RoleMember, "ALL").is_none());
    }

    #[test]
    fn temp_is_only_a_database_shorthand() {
        assert_eq!(
            replacement_for(GrantType::RoleDatabase, "TEMP"),
            Some(&["TEMPORARY"][..])
        );
        assert!(replacement_for(GrantType::RoleSchema, "TEMP").is_none());
    }
}
