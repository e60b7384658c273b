/// Default `MySQL` host when a user is declared without `@host`.
pub const DEFAULT_MYSQL_HOST: &str = "%";

fn quote_with(ident: &str, quote: char) -> String {
    let mut quoted = String::with_capacity(ident.len() + 2);
    quoted.push(quote);
    for ch in ident.chars() {
        if ch == quote {
            quoted.push(quote);
        }
        quoted.push(ch);
    }
    quoted.push(quote);
    quoted
}

/// Quote a `PostgreSQL` identifier: `my"role` -> `"my""role"`.
pub fn quote_pg_identifier(ident: &str) -> String {
    quote_with(ident, '"')
}

/// Quote a schema-qualified `PostgreSQL` name: `"schema"."name"`.
pub fn quote_pg_qualified(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_pg_identifier(schema), quote_pg_identifier(name))
}

/// Quote a `MySQL` identifier with backticks, doubling embedded backticks.
pub fn quote_mysql_identifier(ident: &str) -> String {
    quote_with(ident, '`')
}

/// Quote a `MySQL` string literal (account names and hosts).
pub fn quote_mysql_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("''"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

/// Split `name@host` into its parts; the host defaults to `%`.
///
/// Only the first `@` separates name from host.
pub fn split_user_host(user: &str) -> (String, String) {
    match user.split_once('@') {
        Some((name, host)) => (name.to_string(), host.to_string()),
        None => (user.to_string(), DEFAULT_MYSQL_HOST.to_string()),
    }
}

/// Return the identifier without surrounding quotes, undoubling escaped quotes.
///
/// Backticks, double quotes and single quotes are recognized, since `SHOW
/// GRANTS` output uses different styles across `MySQL` versions. Anything else
/// (including the `*` wildcard) is returned unchanged.
pub fn unquote_identifier(ident: &str) -> String {
    for quote in ['`', '"', '\''] {
        let inner = ident
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote));
        if let Some(inner) = inner {
            let doubled: String = [quote, quote].iter().collect();
            return inner.replace(&doubled, &quote.to_string());
        }
    }
    ident.to_string()
}
