use std::fmt;

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// `text`
    Text(String),
    /// `text[]`
    TextArray(Vec<String>),
    /// `boolean`
    Bool(bool),
    /// `bigint`
    Int(i64),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(value) => write!(f, "'{}'", value.replace('\'', "''")),
            SqlValue::TextArray(values) => {
                let items: Vec<String> = values
                    .iter()
                    .map(|value| format!("'{}'", value.replace('\'', "''")))
                    .collect();
                write!(f, "ARRAY[{}]", items.join(", "))
            }
            SqlValue::Bool(value) => write!(f, "{value}"),
            SqlValue::Int(value) => write!(f, "{value}"),
        }
    }
}

/// Statement text plus the values for its `$n` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text; identifiers are already quoted, values are placeholders.
    pub sql: String,
    /// Values for `$1`, `$2`, ... in order.
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// A statement without placeholders.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// A statement with positional values.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Collects values while a query is being assembled and hands out their
/// placeholders, so numbering always follows push order.
#[derive(Debug, Default)]
pub(crate) struct Binds {
    values: Vec<SqlValue>,
}

impl Binds {
    pub(crate) fn push(&mut self, value: SqlValue) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }

    pub(crate) fn text(&mut self, value: &str) -> String {
        self.push(SqlValue::Text(value.to_string()))
    }

    pub(crate) fn finish(self, sql: String) -> Statement {
        Statement::with_params(sql, self.values)
    }
}
