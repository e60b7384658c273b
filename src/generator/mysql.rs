//! `MySQL` statement synthesis.
//!
//! `MySQL` grants are keyed by `'user'@'host'` and a `db.table` target where
//! either side may be `*`. Updates are computed from a diff against `SHOW
//! GRANTS`, so only the privileges that changed are revoked or granted.

use crate::classifier::params::MySqlGrantParameters;
use crate::error::GrantError;
use crate::generator::diff::diff_privileges;
use crate::generator::statement::Statement;
use crate::parser::names::{quote_mysql_identifier, quote_mysql_value, split_user_host};
use crate::privileges::privilege::{Engine, PrivilegeSet};

/// Wildcard target.
const ANY: &str = "*";

/// One side of a `db.table` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MySqlObject {
    /// `*`
    Any,
    /// A named database or table.
    Named(String),
}

impl MySqlObject {
    fn from_field(value: &Option<String>, field: &'static str) -> Result<Self, GrantError> {
        match value.as_deref() {
            None | Some(ANY) => Ok(MySqlObject::Any),
            Some("") => Err(GrantError::EmptyIdentifier(field)),
            Some(name) => Ok(MySqlObject::Named(name.to_string())),
        }
    }

    /// Name as `SHOW GRANTS` reports it once unquoted: `*` or the bare name.
    pub fn as_target(&self) -> &str {
        match self {
            MySqlObject::Any => ANY,
            MySqlObject::Named(name) => name,
        }
    }

    /// `*` or a backtick-quoted identifier.
    pub fn to_sql(&self) -> String {
        match self {
            MySqlObject::Any => ANY.to_string(),
            MySqlObject::Named(name) => quote_mysql_identifier(name),
        }
    }
}

/// What a [`MySqlStep`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MySqlStepKind {
    /// `SET sql_log_bin = 0`
    DisableBinlog,
    /// REVOKE of some privileges.
    Revoke,
    /// GRANT of some privileges.
    Grant,
    /// `FLUSH PRIVILEGES`
    Flush,
}

/// One statement of a `MySQL` plan, tagged with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlStep {
    /// Role of the statement.
    pub kind: MySqlStepKind,
    /// The statement itself.
    pub statement: Statement,
}

impl MySqlStep {
    fn new(kind: MySqlStepKind, statement: Statement) -> Self {
        Self { kind, statement }
    }
}

/// A validated `MySQL` grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlGrant {
    user: String,
    host: String,
    database: MySqlObject,
    table: MySqlObject,
    privileges: PrivilegeSet,
    binlog: bool,
}

impl MySqlGrant {
    /// Validate `params`.
    pub fn new(params: &MySqlGrantParameters) -> Result<Self, GrantError> {
        let (user, host) = match params.user.as_deref() {
            None => return Err(GrantError::MissingField("user")),
            Some("") => return Err(GrantError::EmptyIdentifier("user")),
            Some(user) => split_user_host(user),
        };
        if user.is_empty() {
            return Err(GrantError::EmptyIdentifier("user"));
        }
        if params.privileges.is_empty() {
            return Err(GrantError::NoPrivileges);
        }
        params.privileges.check_engine(Engine::MySql)?;

        let database = MySqlObject::from_field(&params.database, "database")?;
        let table = MySqlObject::from_field(&params.table, "table")?;
        if database == MySqlObject::Any && table != MySqlObject::Any {
            return Err(GrantError::MissingField("database"));
        }

        Ok(Self {
            user,
            host,
            database,
            table,
            privileges: params.privileges.clone(),
            binlog: params.binlog.unwrap_or(true),
        })
    }

    /// Account part of every statement: `'user'@'host'`.
    pub fn grantee(&self) -> String {
        format!(
            "{}@{}",
            quote_mysql_value(&self.user),
            quote_mysql_value(&self.host)
        )
    }

    /// Target database.
    pub fn database(&self) -> &MySqlObject {
        &self.database
    }

    /// Target table.
    pub fn table(&self) -> &MySqlObject {
        &self.table
    }

    /// Declared privileges in declared order, duplicates dropped.
    pub fn privileges(&self) -> Vec<String> {
        self.privileges.to_string_vec()
    }

    /// Whether changes are written to the binary log.
    pub fn binlog(&self) -> bool {
        self.binlog
    }

    fn on_clause(&self) -> String {
        format!("{}.{}", self.database.to_sql(), self.table.to_sql())
    }

    /// `SHOW GRANTS FOR 'user'@'host'`.
    pub fn show_grants_query(&self) -> Statement {
        Statement::new(format!("SHOW GRANTS FOR {}", self.grantee()))
    }

    /// GRANT of `privileges` on the target.
    pub fn grant_query<S: AsRef<str>>(&self, privileges: &[S]) -> Statement {
        Statement::new(format!(
            "GRANT {} ON {} TO {}",
            join(privileges),
            self.on_clause(),
            self.grantee()
        ))
    }

    /// REVOKE of `privileges` on the target.
    pub fn revoke_query<S: AsRef<str>>(&self, privileges: &[S]) -> Statement {
        Statement::new(format!(
            "REVOKE {} ON {} FROM {}",
            join(privileges),
            self.on_clause(),
            self.grantee()
        ))
    }

    /// `SET sql_log_bin = 0` when binary logging is disabled for this grant.
    pub fn disable_binlog_query(&self) -> Option<Statement> {
        (!self.binlog).then(|| Statement::new("SET sql_log_bin = 0"))
    }

    /// `FLUSH PRIVILEGES`.
    pub fn flush_query(&self) -> Statement {
        Statement::new("FLUSH PRIVILEGES")
    }

    /// GRANT of the declared privileges.
    pub fn create_query(&self) -> Statement {
        self.grant_query(&self.privileges())
    }

    /// REVOKE of the declared privileges.
    pub fn delete_query(&self) -> Statement {
        self.revoke_query(&self.privileges())
    }

    /// Steps for a create, in execution order.
    pub fn create_steps(&self) -> Vec<MySqlStep> {
        self.wrap(vec![MySqlStep::new(MySqlStepKind::Grant, self.create_query())])
    }

    /// Steps that move `observed` onto the declared set: revoke first, then
    /// grant. Empty when nothing differs.
    pub fn update_steps<S: AsRef<str>>(&self, observed: &[S]) -> Vec<MySqlStep> {
        let (to_grant, to_revoke) = diff_privileges(&self.privileges(), observed);
        let mut changes = Vec::new();
        if !to_revoke.is_empty() {
            changes.push(MySqlStep::new(MySqlStepKind::Revoke, self.revoke_query(&to_revoke)));
        }
        if !to_grant.is_empty() {
            changes.push(MySqlStep::new(MySqlStepKind::Grant, self.grant_query(&to_grant)));
        }
        self.wrap(changes)
    }

    /// Steps for a delete, in execution order.
    pub fn delete_steps(&self) -> Vec<MySqlStep> {
        self.wrap(vec![MySqlStep::new(MySqlStepKind::Revoke, self.delete_query())])
    }

    /// Full statement list for a create.
    pub fn create_queries(&self) -> Vec<Statement> {
        statements(self.create_steps())
    }

    /// Full statement list for an update; empty when nothing differs.
    pub fn update_queries<S: AsRef<str>>(&self, observed: &[S]) -> Vec<Statement> {
        statements(self.update_steps(observed))
    }

    /// Full statement list for a delete.
    pub fn delete_queries(&self) -> Vec<Statement> {
        statements(self.delete_steps())
    }

    /// Binlog switch before `changes`, flush after. No changes, no steps.
    fn wrap(&self, changes: Vec<MySqlStep>) -> Vec<MySqlStep> {
        if changes.is_empty() {
            return changes;
        }
        self.disable_binlog_query()
            .map(|statement| MySqlStep::new(MySqlStepKind::DisableBinlog, statement))
            .into_iter()
            .chain(changes)
            .chain(std::iter::once(MySqlStep::new(
                MySqlStepKind::Flush,
                self.flush_query(),
            )))
            .collect()
    }
}

fn statements(steps: Vec<MySqlStep>) -> Vec<Statement> {
    steps.into_iter().map(|step| step.statement).collect()
}

fn join<S: AsRef<str>>(privileges: &[S]) -> String {
    privileges
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}
