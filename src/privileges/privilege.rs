use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classifier::grant_type::GrantType;
use crate::error::GrantError;
use crate::privileges::expansion;

/// Type-level grammar shared by both engines: uppercase words joined by a
/// single space or underscore (`SELECT`, `GRANT OPTION`, `REPLICATION_SLAVE_ADMIN`).
static PRIVILEGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+(?:[ _][A-Z]+)*$").expect("valid"));

/// `PostgreSQL` privileges are single keywords; `ALL PRIVILEGES` is the only
/// multi-word spelling the server accepts.
static POSTGRES_PRIVILEGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Z]+|ALL PRIVILEGES)$").expect("valid"));

/// SQL engine a grant is synthesized for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// `PostgreSQL` (roles, nine grant shapes, additive GRANT).
    Postgres,
    /// `MySQL` (host-qualified users, database/table grants).
    #[value(name = "mysql")]
    MySql,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::Postgres => write!(f, "postgres"),
            Engine::MySql => write!(f, "mysql"),
        }
    }
}

/// A single privilege keyword such as `SELECT` or `ALL PRIVILEGES`.
///
/// Privileges are keywords, not identifiers: they are emitted unquoted, so the
/// grammar is enforced whenever one is constructed or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Privilege(String);

impl Privilege {
    /// Validate a privilege token against the shared grammar.
    pub fn new(token: impl Into<String>) -> Result<Self, GrantError> {
        let token = token.into();
        if PRIVILEGE_TOKEN.is_match(&token) {
            Ok(Self(token))
        } else {
            Err(GrantError::InvalidPrivilege {
                privilege: token,
                reason: "expected uppercase words separated by a single space or underscore",
            })
        }
    }

    /// Build a privilege from trusted constant data.
    pub(crate) fn from_static(token: &'static str) -> Self {
        Self(token.to_string())
    }

    /// The keyword as written in SQL.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the narrower grammar of a specific engine.
    pub fn check_engine(&self, engine: Engine) -> Result<(), GrantError> {
        match engine {
            Engine::MySql => Ok(()),
            Engine::Postgres if POSTGRES_PRIVILEGE.is_match(&self.0) => Ok(()),
            Engine::Postgres => Err(GrantError::InvalidPrivilege {
                privilege: self.0.clone(),
                reason: "PostgreSQL privileges are single uppercase keywords",
            }),
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Privilege {
    type Err = GrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Privilege {
    type Error = GrantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Privilege> for String {
    fn from(value: Privilege) -> Self {
        value.0
    }
}

/// An ordered list of privileges with set semantics for comparison.
///
/// Emission keeps the declared order (duplicates dropped); comparison and
/// array binding use the sorted, deduplicated form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivilegeSet(Vec<Privilege>);

impl PrivilegeSet {
    /// Wrap already-validated privileges.
    pub fn new(privileges: impl IntoIterator<Item = Privilege>) -> Self {
        Self(privileges.into_iter().collect())
    }

    /// Validate and collect raw tokens.
    pub fn parse<I, S>(tokens: I) -> Result<Self, GrantError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tokens
            .into_iter()
            .map(Privilege::new)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// True when no privilege was declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of declared privileges, duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in declared order.
    pub fn iter(&self) -> std::slice::Iter<'_, Privilege> {
        self.0.iter()
    }

    /// True when `token` is one of the declared privileges.
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|p| p.as_str() == token)
    }

    /// Declared order, first occurrence of each privilege only.
    pub fn to_string_vec(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.0
            .iter()
            .filter(|p| seen.insert(p.as_str()))
            .map(ToString::to_string)
            .collect()
    }

    /// Deduplicated and sorted ascending.
    pub fn sorted(&self) -> Vec<String> {
        self.0
            .iter()
            .map(Privilege::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Comma-separated keyword list for statement text.
    pub fn to_sql_list(&self) -> String {
        self.to_string_vec().join(", ")
    }

    /// Check every privilege against the engine grammar.
    pub fn check_engine(&self, engine: Engine) -> Result<(), GrantError> {
        self.0.iter().try_for_each(|p| p.check_engine(engine))
    }

    /// Replace shorthands with the privileges the server reports back for
    /// `grant_type`; the result is deduplicated and sorted.
    ///
    /// Expanding an already-expanded set is a no-op.
    pub fn expand(&self, grant_type: GrantType) -> PrivilegeSet {
        let mut expanded = BTreeSet::new();
        for privilege in &self.0 {
            match expansion::replacement_for(grant_type, privilege.as_str()) {
                Some(tokens) => {
                    expanded.extend(tokens.iter().copied().map(Privilege::from_static));
                }
                None => {
                    expanded.insert(privilege.clone());
                }
            }
        }
        PrivilegeSet(expanded.into_iter().collect())
    }
}

impl PartialEq for PrivilegeSet {
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl Eq for PrivilegeSet {}

impl FromIterator<Privilege> for PrivilegeSet {
    fn from_iter<T: IntoIterator<Item = Privilege>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a PrivilegeSet {
    type Item = &'a Privilege;
    type IntoIter = std::slice::Iter<'a, Privilege>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> PrivilegeSet {
        PrivilegeSet::parse(tokens.iter().copied()).expect("valid privileges")
    }

    #[test]
    fn privilege_grammar_rejects_lowercase_and_punctuation() {
        assert!(Privilege::new("SELECT").is_ok());
        assert!(Privilege::new("GRANT OPTION").is_ok());
        assert!(Privilege::new("REPLICATION_SLAVE_ADMIN").is_ok());
        assert!(Privilege::new("select").is_err());
        assert!(Privilege::new("SELECT;DROP").is_err());
        assert!(Privilege::new("SELECT ").is_err());
        assert!(Privilege::new("").is_err());
    }

    #[test]
    fn postgres_grammar_is_narrower_than_mysql() {
        let multi = Privilege::new("CREATE TEMPORARY TABLES").expect("valid token");
        assert!(multi.check_engine(Engine::MySql).is_ok());
        assert!(multi.check_engine(Engine::Postgres).is_err());

        let all = Privilege::new("ALL PRIVILEGES").expect("valid token");
        assert!(all.check_engine(Engine::Postgres).is_ok());
    }

    #[test]
    fn set_equality_ignores_order_and_duplicates() {
        assert_eq!(set(&["SELECT", "INSERT"]), set(&["INSERT", "SELECT", "INSERT"]));
        assert_ne!(set(&["SELECT"]), set(&["SELECT", "INSERT"]));
    }

    #[test]
    fn emission_keeps_declared_order_without_duplicates() {
        let privileges = set(&["UPDATE", "SELECT", "UPDATE"]);
        assert_eq!(privileges.to_sql_list(), "UPDATE, SELECT");
        assert_eq!(privileges.sorted(), vec!["SELECT", "UPDATE"]);
    }

    #[test]
    fn deserialization_validates_tokens() {
        let parsed: PrivilegeSet = serde_json::from_str(r#"["SELECT","INSERT"]"#).expect("valid");
        assert_eq!(parsed.len(), 2);
        assert!(serde_json::from_str::<PrivilegeSet>(r#"["SELECT'--"]"#).is_err());
    }
}
