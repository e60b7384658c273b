use std::fmt::Write as _;

use crate::generator::mysql::MySqlGrant;
use crate::generator::postgres::PgGrant;
use crate::generator::statement::Statement;
use crate::parser::names::quote_pg_identifier;

/// Reconciler action to plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Action {
    /// Existence / drift query.
    Observe,
    /// Statements for a missing grant.
    Create,
    /// Statements for a drifted grant.
    Update,
    /// Statements removing the grant.
    Delete,
    /// Every action above, in order.
    All,
}

impl Action {
    fn expand(self) -> &'static [Action] {
        match self {
            Action::Observe => &[Action::Observe],
            Action::Create => &[Action::Create],
            Action::Update => &[Action::Update],
            Action::Delete => &[Action::Delete],
            Action::All => &[
                Action::Observe,
                Action::Create,
                Action::Update,
                Action::Delete,
            ],
        }
    }
}

/// One statement of a plan with the comment that introduces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStatement {
    /// SQL comment line(s), each starting with `--`.
    pub comment: String,
    /// Statement to run.
    pub statement: Statement,
}

impl PlannedStatement {
    fn new(comment: impl Into<String>, statement: Statement) -> Self {
        Self {
            comment: comment.into(),
            statement,
        }
    }
}

fn numbered(label: &str, statements: Vec<Statement>) -> Vec<PlannedStatement> {
    let total = statements.len();
    statements
        .into_iter()
        .enumerate()
        .map(|(index, statement)| {
            PlannedStatement::new(format!("-- {label} ({}/{total})", index + 1), statement)
        })
        .collect()
}

/// Plan the `PostgreSQL` statements behind `action`.
pub fn plan_postgres(grant: &PgGrant, action: Action) -> Vec<PlannedStatement> {
    let subject = format!(
        "{} for {}",
        grant.grant_type(),
        quote_pg_identifier(grant.role())
    );
    let mut plan = Vec::new();
    for action in action.expand() {
        match action {
            Action::Observe => plan.push(PlannedStatement::new(
                format!("-- observe {subject}: true when the grant matches exactly"),
                grant.select_query(),
            )),
            Action::Create => plan.extend(numbered(
                &format!("create {subject}, one transaction"),
                grant.create_queries(),
            )),
            Action::Update => plan.extend(numbered(
                &format!("update {subject}, one transaction"),
                grant.create_queries(),
            )),
            Action::Delete => plan.push(PlannedStatement::new(
                format!("-- delete {subject}"),
                grant.delete_query(),
            )),
            Action::All => {}
        }
    }
    plan
}

/// Plan the `MySQL` statements behind `action`.
///
/// `observed` is the privilege list currently granted on the target (see
/// [`observed_privileges`](crate::parser::show_grants::observed_privileges));
/// updates are planned against an empty list when it is unknown.
pub fn plan_mysql(
    grant: &MySqlGrant,
    action: Action,
    observed: Option<&[String]>,
) -> Vec<PlannedStatement> {
    let subject = grant.grantee();
    let mut plan = Vec::new();
    for action in action.expand() {
        match action {
            Action::Observe => plan.push(PlannedStatement::new(
                format!("-- observe {subject}"),
                grant.show_grants_query(),
            )),
            Action::Create => {
                plan.extend(numbered(&format!("create {subject}"), grant.create_queries()));
            }
            Action::Update => {
                let observed = observed.unwrap_or_default();
                let statements = grant.update_queries(observed);
                if statements.is_empty() {
                    continue;
                }
                plan.extend(numbered(&format!("update {subject}"), statements));
            }
            Action::Delete => {
                plan.extend(numbered(&format!("delete {subject}"), grant.delete_queries()));
            }
            Action::All => {}
        }
    }
    plan
}

/// Render a plan as a SQL script: comment, bound values (if any), statement.
pub fn format_plan(plan: &[PlannedStatement]) -> String {
    let mut out = String::new();
    for planned in plan {
        out.push_str(&planned.comment);
        out.push('\n');
        let params = &planned.statement.params;
        if !params.is_empty() {
            let bound = params
                .iter()
                .enumerate()
                .map(|(index, value)| format!("${} = {value}", index + 1))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "-- params: {bound}");
        }
        out.push_str(&planned.statement.sql);
        out.push_str(";\n\n");
    }
    while out.ends_with('\n') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::statement::SqlValue;

    #[test]
    fn format_plan_lists_bound_values_and_trims_trailing_newlines() {
        let plan = vec![
            PlannedStatement::new(
                "-- one",
                Statement::with_params("SELECT $1", vec![SqlValue::Bool(true)]),
            ),
            PlannedStatement::new("-- two", Statement::new("FLUSH PRIVILEGES")),
        ];
        let formatted = format_plan(&plan);
        assert_eq!(
            formatted,
            "-- one\n-- params: $1 = true\nSELECT $1;\n\n-- two\nFLUSH PRIVILEGES;"
        );
    }
}
