use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::params::GrantOption;

/// Parameter fields whose presence decides the grant shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// `memberOf`
    MemberOf,
    /// `database`
    Database,
    /// `schema`
    Schema,
    /// `tables`
    Tables,
    /// `columns`
    Columns,
    /// `sequences`
    Sequences,
    /// `routines`
    Routines,
    /// `foreignServers`
    ForeignServers,
    /// `foreignDataWrappers`
    ForeignDataWrappers,
}

impl Field {
    /// Field name as spelled in the resource spec.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::MemberOf => "memberOf",
            Field::Database => "database",
            Field::Schema => "schema",
            Field::Tables => "tables",
            Field::Columns => "columns",
            Field::Sequences => "sequences",
            Field::Routines => "routines",
            Field::ForeignServers => "foreignServers",
            Field::ForeignDataWrappers => "foreignDataWrappers",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutually exclusive shapes a `PostgreSQL` grant resource can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrantType {
    /// Membership of one role in another.
    RoleMember,
    /// Privileges on a database.
    RoleDatabase,
    /// Privileges on a schema.
    RoleSchema,
    /// Privileges on one or more tables.
    RoleTable,
    /// Privileges on columns of a single table.
    RoleColumn,
    /// Privileges on one or more sequences.
    RoleSequence,
    /// Privileges on functions or procedures.
    RoleRoutine,
    /// Privileges on foreign servers.
    RoleForeignServer,
    /// Privileges on foreign-data wrappers.
    RoleForeignDataWrapper,
}

impl GrantType {
    /// Every grant type, in declaration order.
    pub const ALL: [GrantType; 9] = [
        GrantType::RoleMember,
        GrantType::RoleDatabase,
        GrantType::RoleSchema,
        GrantType::RoleTable,
        GrantType::RoleColumn,
        GrantType::RoleSequence,
        GrantType::RoleRoutine,
        GrantType::RoleForeignServer,
        GrantType::RoleForeignDataWrapper,
    ];

    /// Tag as used in the resource status and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            GrantType::RoleMember => "ROLE_MEMBER",
            GrantType::RoleDatabase => "ROLE_DATABASE",
            GrantType::RoleSchema => "ROLE_SCHEMA",
            GrantType::RoleTable => "ROLE_TABLE",
            GrantType::RoleColumn => "ROLE_COLUMN",
            GrantType::RoleSequence => "ROLE_SEQUENCE",
            GrantType::RoleRoutine => "ROLE_ROUTINE",
            GrantType::RoleForeignServer => "ROLE_FOREIGN_SERVER",
            GrantType::RoleForeignDataWrapper => "ROLE_FOREIGN_DATA_WRAPPER",
        }
    }

    /// The exact set of fields that must be filled in for this shape.
    pub fn required_fields(self) -> &'static [Field] {
        match self {
            GrantType::RoleMember => &[Field::MemberOf],
            GrantType::RoleDatabase => &[Field::Database],
            GrantType::RoleSchema => &[Field::Database, Field::Schema],
            GrantType::RoleTable => &[Field::Database, Field::Schema, Field::Tables],
            GrantType::RoleColumn => &[
                Field::Database,
                Field::Schema,
                Field::Tables,
                Field::Columns,
            ],
            GrantType::RoleSequence => &[Field::Database, Field::Schema, Field::Sequences],
            GrantType::RoleRoutine => &[Field::Database, Field::Schema, Field::Routines],
            GrantType::RoleForeignServer => &[Field::Database, Field::ForeignServers],
            GrantType::RoleForeignDataWrapper => &[Field::Database, Field::ForeignDataWrappers],
        }
    }

    /// The option keyword that lets the grantee pass this grant on.
    pub fn grant_option(self) -> GrantOption {
        match self {
            GrantType::RoleMember => GrantOption::Admin,
            _ => GrantOption::Grant,
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
