//! The narrow interface the reconcilers drive a live server through.
//!
//! Connections, pooling and TLS live on the other side of [`Executor`]; this
//! crate only hands it statements and reads back rows.

use async_trait::async_trait;

use crate::generator::statement::{SqlValue, Statement};

/// `ER_NONEXISTING_GRANT`: `SHOW GRANTS` or `REVOKE` for an account with no
/// grants on the host.
pub const MYSQL_ER_NONEXISTING_GRANT: u16 = 1141;

/// Failure reported by an [`Executor`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    /// A scalar query produced no row.
    #[error("no rows in result set")]
    NoRows,
    /// Server-side `MySQL` error.
    #[error("mysql error {number}: {message}")]
    MySql {
        /// Server error number.
        number: u16,
        /// Server error message.
        message: String,
    },
    /// Server-side `PostgreSQL` error.
    #[error("postgres error {sqlstate}: {message}")]
    Postgres {
        /// Five-character SQLSTATE.
        sqlstate: String,
        /// Server error message.
        message: String,
    },
    /// Connection or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// A column could not be read as the requested type.
    #[error("cannot decode column {index}: {reason}")]
    Decode {
        /// Zero-based column index.
        index: usize,
        /// What went wrong.
        reason: String,
    },
}

impl ExecError {
    /// True for `MySQL` error 1141.
    pub fn is_nonexisting_grant(&self) -> bool {
        matches!(
            self,
            ExecError::MySql { number, .. } if *number == MYSQL_ER_NONEXISTING_GRANT
        )
    }
}

/// One result row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<SqlValue>,
}

impl Row {
    /// Row with the given column values.
    pub fn new(columns: Vec<SqlValue>) -> Self {
        Self { columns }
    }

    /// Column values in select order.
    pub fn columns(&self) -> &[SqlValue] {
        &self.columns
    }

    fn column(&self, index: usize) -> Result<&SqlValue, ExecError> {
        self.columns.get(index).ok_or_else(|| ExecError::Decode {
            index,
            reason: format!("row has {} columns", self.columns.len()),
        })
    }

    /// Read column `index` as a boolean.
    pub fn get_bool(&self, index: usize) -> Result<bool, ExecError> {
        match self.column(index)? {
            SqlValue::Bool(value) => Ok(*value),
            other => Err(ExecError::Decode {
                index,
                reason: format!("expected boolean, found {other}"),
            }),
        }
    }

    /// Read column `index` as text.
    pub fn get_text(&self, index: usize) -> Result<&str, ExecError> {
        match self.column(index)? {
            SqlValue::Text(value) => Ok(value),
            other => Err(ExecError::Decode {
                index,
                reason: format!("expected text, found {other}"),
            }),
        }
    }
}

/// Runs statements against one live server.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run a statement that returns nothing.
    async fn exec(&self, statement: &Statement) -> Result<(), ExecError>;

    /// Run a query and collect every row.
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, ExecError>;

    /// Run a query and return its single row; [`ExecError::NoRows`] when empty.
    async fn scan(&self, statement: &Statement) -> Result<Row, ExecError> {
        self.query(statement)
            .await?
            .into_iter()
            .next()
            .ok_or(ExecError::NoRows)
    }

    /// Run `statements` in one transaction: all of them or none.
    async fn exec_transaction(&self, statements: &[Statement]) -> Result<(), ExecError>;
}
