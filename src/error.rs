use crate::classifier::grant_type::GrantType;

/// Reasons a set of grant parameters cannot be turned into SQL.
///
/// None of these are retryable: the declared resource has to change first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrantError {
    /// The filled-in fields match no known grant shape.
    #[error("cannot identify grant type based on passed params")]
    UnidentifiedGrantType,
    /// A non-membership grant was declared without privileges.
    #[error("privileges not passed")]
    NoPrivileges,
    /// A membership grant was declared together with privileges.
    #[error("cannot set privileges in the same grant as memberOf")]
    MemberOfWithPrivileges,
    /// Two grant types share the same required field set.
    #[error("grant types {first} and {second} require the same set of fields")]
    AmbiguousGrantTypes {
        /// First grant type of the colliding pair.
        first: GrantType,
        /// Second grant type of the colliding pair.
        second: GrantType,
    },
    /// A field every synthesizer needs was left empty.
    #[error("{0} not passed")]
    MissingField(&'static str),
    /// Column privileges were requested on zero or several tables.
    #[error("column grants require exactly one table, got {0}")]
    ColumnsRequireSingleTable(usize),
    /// A privilege token does not match the engine grammar.
    #[error("invalid privilege {privilege:?}: {reason}")]
    InvalidPrivilege {
        /// Offending token.
        privilege: String,
        /// Grammar that was violated.
        reason: &'static str,
    },
    /// A routine argument is not a single SQL data type.
    #[error("invalid argument type {argument:?} for routine {routine}")]
    InvalidRoutineArgument {
        /// Routine name as declared.
        routine: String,
        /// Offending argument type.
        argument: String,
    },
    /// The grant option does not apply to this grant type.
    #[error("{option} OPTION cannot be used with {grant_type} grants")]
    InvalidGrantOption {
        /// Declared option keyword.
        option: &'static str,
        /// Identified grant type.
        grant_type: GrantType,
    },
    /// An identifier was declared empty.
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),
}
