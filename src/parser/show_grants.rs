use std::sync::LazyLock;

use regex::Regex;

/// Synthetic token appended when a line ends in `WITH GRANT OPTION`.
pub const GRANT_OPTION: &str = "GRANT OPTION";

/// `MySQL`'s placeholder for "no privileges"; never reported to callers.
pub const USAGE: &str = "USAGE";

/// Anchored `SHOW GRANTS` line format:
///     GRANT SELECT, INSERT ON `db`.`tbl` TO 'user'@'host'
///     GRANT ALL PRIVILEGES ON `db`.* TO `user`@`%` WITH GRANT OPTION
/// Group 1 is the privilege list, groups 2 and 3 the database and table
/// (`*` or an identifier in any quoting style), group 4 the grantee and
/// group 5 the optional grant-option suffix.
static GRANT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    let ident = r#"(\*|`(?:[^`]|``)*`|"(?:[^"]|"")*"|'(?:[^']|'')*'|[^\s.`"']+)"#;
    Regex::new(&format!(
        r"^GRANT (.+?) ON {ident}\.{ident} TO (.+?)( WITH GRANT OPTION)?$"
    ))
    .expect("valid")
});

/// One object grant as reported by `SHOW GRANTS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedGrant {
    /// Privileges in reported order, `USAGE` included.
    pub privileges: Vec<String>,
    /// Unquoted database name, or `*`.
    pub database: String,
    /// Unquoted table name, or `*`.
    pub table: String,
    /// Grantee exactly as reported.
    pub grantee: String,
    /// Whether the line ends in `WITH GRANT OPTION`.
    pub with_grant_option: bool,
}

impl ObservedGrant {
    /// Parse a single line; role grants and other formats yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let captures = GRANT_LINE.captures(line.trim())?;
        Some(Self {
            privileges: captures[1]
                .split(',')
                .map(str::trim)
                .filter(|privilege| !privilege.is_empty())
                .map(str::to_string)
                .collect(),
            database: super::names::unquote_identifier(&captures[2]),
            table: super::names::unquote_identifier(&captures[3]),
            grantee: captures[4].to_string(),
            with_grant_option: captures.get(5).is_some(),
        })
    }

    /// Privileges with `USAGE` removed and `GRANT OPTION` appended when set.
    pub fn effective_privileges(&self) -> Vec<String> {
        let mut privileges: Vec<String> = self
            .privileges
            .iter()
            .filter(|privilege| privilege.as_str() != USAGE)
            .cloned()
            .collect();
        if self.with_grant_option {
            privileges.push(GRANT_OPTION.to_string());
        }
        privileges
    }
}

/// Privileges a `SHOW GRANTS` line grants on exactly `database`.`table`.
///
/// Targets are compared unquoted; `*` only matches a literal `*`. A line that
/// grants nothing but `USAGE` is the same as no grant and yields `None`.
pub fn parse_grant_line(line: &str, database: &str, table: &str) -> Option<Vec<String>> {
    let Some(grant) = ObservedGrant::parse(line) else {
        tracing::debug!(line, "skipping SHOW GRANTS line without an object grant");
        return None;
    };
    if grant.database != database || grant.table != table {
        return None;
    }
    let privileges = grant.effective_privileges();
    (!privileges.is_empty()).then_some(privileges)
}

/// Merge the privileges of every line that targets `database`.`table`.
pub fn observed_privileges<I, S>(lines: I, database: &str, table: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_grant_line(line.as_ref(), database, table))
        .flatten()
        .collect()
}
