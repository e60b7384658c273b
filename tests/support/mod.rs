#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use sqlgrants::executor::{ExecError, Executor, Row};
use sqlgrants::generator::statement::{SqlValue, Statement};
use sqlgrants::{GrantParameters, MySqlGrantParameters, PrivilegeSet};

/// What the mock saw, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Exec(Statement),
    Query(Statement),
    Transaction(Vec<Statement>),
}

/// Records every call and answers queries from a script.
///
/// Each `query`/`scan` pops the next scripted answer; an empty script answers
/// with no rows. `exec` and `exec_transaction` succeed unless an error was
/// queued with [`MockExecutor::fail_exec`].
#[derive(Default)]
pub(crate) struct MockExecutor {
    calls: Mutex<Vec<Call>>,
    answers: Mutex<VecDeque<Result<Vec<Row>, ExecError>>>,
    exec_failures: Mutex<VecDeque<ExecError>>,
}

impl MockExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn answer(self, answer: Result<Vec<Row>, ExecError>) -> Self {
        self.answers
            .lock()
            .expect("answers lock")
            .push_back(answer);
        self
    }

    pub(crate) fn answer_bool(self, value: bool) -> Self {
        self.answer(Ok(vec![Row::new(vec![SqlValue::Bool(value)])]))
    }

    pub(crate) fn answer_lines(self, lines: &[&str]) -> Self {
        let rows = lines
            .iter()
            .map(|line| Row::new(vec![SqlValue::Text((*line).to_string())]))
            .collect();
        self.answer(Ok(rows))
    }

    pub(crate) fn fail_exec(self, error: ExecError) -> Self {
        self.exec_failures
            .lock()
            .expect("failures lock")
            .push_back(error);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// SQL text of every executed statement (transactions flattened).
    pub(crate) fn executed_sql(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .flat_map(|call| match call {
                Call::Exec(statement) => vec![statement.sql],
                Call::Transaction(statements) => {
                    statements.into_iter().map(|s| s.sql).collect()
                }
                Call::Query(_) => Vec::new(),
            })
            .collect()
    }

    fn next_exec_failure(&self) -> Option<ExecError> {
        self.exec_failures
            .lock()
            .expect("failures lock")
            .pop_front()
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn exec(&self, statement: &Statement) -> Result<(), ExecError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(Call::Exec(statement.clone()));
        self.next_exec_failure().map_or(Ok(()), Err)
    }

    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, ExecError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(Call::Query(statement.clone()));
        self.answers
            .lock()
            .expect("answers lock")
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn exec_transaction(&self, statements: &[Statement]) -> Result<(), ExecError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(Call::Transaction(statements.to_vec()));
        self.next_exec_failure().map_or(Ok(()), Err)
    }
}

pub(crate) fn privileges(tokens: &[&str]) -> PrivilegeSet {
    PrivilegeSet::parse(tokens.iter().copied()).expect("test privileges should be valid")
}

pub(crate) fn database_grant(role: &str, database: &str, tokens: &[&str]) -> GrantParameters {
    GrantParameters {
        role: Some(role.to_string()),
        database: Some(database.to_string()),
        privileges: privileges(tokens),
        ..Default::default()
    }
}

pub(crate) fn table_grant(tables: &[&str], tokens: &[&str]) -> GrantParameters {
    GrantParameters {
        role: Some("reader".to_string()),
        database: Some("app".to_string()),
        schema: Some("public".to_string()),
        tables: tables.iter().map(|t| (*t).to_string()).collect(),
        privileges: privileges(tokens),
        ..Default::default()
    }
}

pub(crate) fn member_grant(role: &str, member_of: &str) -> GrantParameters {
    GrantParameters {
        role: Some(role.to_string()),
        member_of: Some(member_of.to_string()),
        ..Default::default()
    }
}

pub(crate) fn mysql_grant(
    user: &str,
    database: &str,
    table: Option<&str>,
    tokens: &[&str],
) -> MySqlGrantParameters {
    MySqlGrantParameters {
        user: Some(user.to_string()),
        database: Some(database.to_string()),
        table: table.map(str::to_string),
        privileges: privileges(tokens),
        binlog: None,
    }
}
