use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::classifier::grant_type::Field;
use crate::privileges::privilege::PrivilegeSet;

/// Lets the grantee re-grant what it received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GrantOption {
    /// `WITH ADMIN OPTION`, role membership only.
    Admin,
    /// `WITH GRANT OPTION`, object privileges.
    Grant,
}

impl GrantOption {
    /// Keyword placed between `WITH` and `OPTION`.
    pub fn keyword(self) -> &'static str {
        match self {
            GrantOption::Admin => "ADMIN",
            GrantOption::Grant => "GRANT",
        }
    }
}

/// A function or procedure, identified by name and argument types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    /// Unqualified routine name; the schema comes from the grant.
    pub name: String,
    /// Argument data types, in declaration order.
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl Routine {
    /// Build a routine from a name and argument types.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        arguments: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }
}

/// Declared state of a `PostgreSQL` grant, with references already resolved.
///
/// Exactly one grant shape must be derivable from which selectors are filled
/// in; see [`crate::classifier::grant_classifier::identify_grant_type`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantParameters {
    /// Grantee role.
    #[serde(default)]
    pub role: Option<String>,
    /// Role the grantee becomes a member of.
    #[serde(default)]
    pub member_of: Option<String>,
    /// Target database.
    #[serde(default)]
    pub database: Option<String>,
    /// Target schema.
    #[serde(default)]
    pub schema: Option<String>,
    /// Target tables within `schema`.
    #[serde(default)]
    pub tables: Vec<String>,
    /// Target columns of the single table in `tables`.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Target sequences within `schema`.
    #[serde(default)]
    pub sequences: Vec<String>,
    /// Target routines within `schema`.
    #[serde(default)]
    pub routines: Vec<Routine>,
    /// Target foreign-data wrappers.
    #[serde(default)]
    pub foreign_data_wrappers: Vec<String>,
    /// Target foreign servers.
    #[serde(default)]
    pub foreign_servers: Vec<String>,
    /// Privileges to grant; must be empty for membership grants.
    #[serde(default)]
    pub privileges: PrivilegeSet,
    /// Whether the grantee may pass the grant on.
    #[serde(default)]
    pub with_option: Option<GrantOption>,
    /// Revoke the default `PUBLIC` privileges on the database as well.
    #[serde(default)]
    pub revoke_public_on_db: Option<bool>,
}

impl GrantParameters {
    /// Selector fields that are present (`Some`) or non-empty.
    pub fn filled_fields(&self) -> BTreeSet<Field> {
        let candidates = [
            (Field::MemberOf, self.member_of.is_some()),
            (Field::Database, self.database.is_some()),
            (Field::Schema, self.schema.is_some()),
            (Field::Tables, !self.tables.is_empty()),
            (Field::Columns, !self.columns.is_empty()),
            (Field::Sequences, !self.sequences.is_empty()),
            (Field::Routines, !self.routines.is_empty()),
            (Field::ForeignServers, !self.foreign_servers.is_empty()),
            (Field::ForeignDataWrappers, !self.foreign_data_wrappers.is_empty()),
        ];
        candidates
            .into_iter()
            .filter_map(|(field, filled)| filled.then_some(field))
            .collect()
    }
}

/// Declared state of a `MySQL` grant.
///
/// A missing `database` or `table` means every database or table (`*`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MySqlGrantParameters {
    /// Grantee as `name` or `name@host`; the host defaults to `%`.
    #[serde(default)]
    pub user: Option<String>,
    /// Target database.
    #[serde(default)]
    pub database: Option<String>,
    /// Target table within `database`.
    #[serde(default)]
    pub table: Option<String>,
    /// Privileges to grant.
    #[serde(default)]
    pub privileges: PrivilegeSet,
    /// Write the change to the binary log; defaults to `true`.
    #[serde(default)]
    pub binlog: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_fields_ignores_empty_lists() {
        let params = GrantParameters {
            database: Some("app".to_string()),
            schema: Some("public".to_string()),
            tables: Vec::new(),
            ..Default::default()
        };
        assert_eq!(
            params.filled_fields(),
            BTreeSet::from([Field::Database, Field::Schema])
        );
    }

    #[test]
    fn parameters_deserialize_from_camel_case_spec() {
        let params: GrantParameters = serde_json::from_str(
            r#"{
                "role": "reader",
                "database": "app",
                "foreignDataWrappers": ["postgres_fdw"],
                "privileges": ["USAGE"],
                "withOption": "GRANT",
                "revokePublicOnDb": true
            }"#,
        )
        .expect("spec should deserialize");

        assert_eq!(params.foreign_data_wrappers, vec!["postgres_fdw"]);
        assert_eq!(params.with_option, Some(GrantOption::Grant));
        assert_eq!(params.revoke_public_on_db, Some(true));
    }
}
