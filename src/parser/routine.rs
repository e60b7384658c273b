use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::Token;

use crate::classifier::params::Routine;
use crate::error::GrantError;
use crate::parser::names::quote_pg_qualified;

/// A routine with validated, canonicalized argument types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineSignature {
    schema: String,
    name: String,
    arguments: Vec<String>,
}

impl RoutineSignature {
    /// Validate every argument as exactly one `PostgreSQL` data type.
    ///
    /// Argument types end up in statement text, so anything that does not
    /// parse as a single type (trailing tokens included) is rejected.
    pub fn new(schema: &str, routine: &Routine) -> Result<Self, GrantError> {
        if routine.name.is_empty() {
            return Err(GrantError::EmptyIdentifier("routine name"));
        }
        let arguments = routine
            .arguments
            .iter()
            .map(|argument| canonical_argument_type(&routine.name, argument))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            schema: schema.to_string(),
            name: routine.name.clone(),
            arguments,
        })
    }

    /// `schema.name(arg1,arg2)`, the form compared against the catalog.
    pub fn catalog_signature(&self) -> String {
        format!(
            "{}.{}({})",
            self.schema,
            self.name,
            self.arguments.join(",")
        )
    }

    /// `"schema"."name"(arg1,arg2)`, the form used in GRANT and REVOKE.
    pub fn to_sql(&self) -> String {
        format!(
            "{}({})",
            quote_pg_qualified(&self.schema, &self.name),
            self.arguments.join(",")
        )
    }
}

fn canonical_argument_type(routine: &str, argument: &str) -> Result<String, GrantError> {
    let invalid = || GrantError::InvalidRoutineArgument {
        routine: routine.to_string(),
        argument: argument.to_string(),
    };

    let dialect = PostgreSqlDialect {};
    let mut parser = Parser::new(&dialect)
        .try_with_sql(argument)
        .map_err(|_| invalid())?;
    let data_type = parser.parse_data_type().map_err(|_| invalid())?;
    if parser.peek_token().token != Token::EOF {
        return Err(invalid());
    }

    // Rendered from the parsed type: comments and odd spacing never reach
    // statement text.
    Ok(lowercase_unquoted(&data_type.to_string()))
}

/// Fold unquoted parts to lower case, as the server does; `"MyEnum"` keeps its case.
fn lowercase_unquoted(text: &str) -> String {
    let mut quoted = false;
    text.chars()
        .map(|ch| {
            if ch == '"' {
                quoted = !quoted;
                ch
            } else if quoted {
                ch
            } else {
                ch.to_ascii_lowercase()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routine(name: &str, arguments: &[&str]) -> Routine {
        Routine::new(name, arguments.iter().copied())
    }

    #[test]
    fn argument_types_are_lowercased_and_whitespace_collapsed() {
        let signature =
            RoutineSignature::new("public", &routine("add", &["INTEGER", "Character  Varying"]))
                .expect("valid routine");
        assert_eq!(
            signature.catalog_signature(),
            "public.add(integer,character varying)"
        );
        assert_eq!(
            signature.to_sql(),
            r#""public"."add"(integer,character varying)"#
        );
    }

    #[test]
    fn routine_without_arguments_keeps_empty_parens() {
        let signature =
            RoutineSignature::new("util", &routine("now_utc", &[])).expect("valid routine");
        assert_eq!(signature.catalog_signature(), "util.now_utc()");
    }

    #[test]
    fn argument_with_trailing_sql_is_rejected() {
        let err = RoutineSignature::new("public", &routine("f", &["text) TO public; --"]))
            .expect_err("injection attempt must fail");
        assert!(matches!(err, GrantError::InvalidRoutineArgument { .. }));
    }

    #[test]
    fn comments_never_reach_the_signature() {
        for argument in ["integer -- x", "integer /* c */", "/* c */ integer"] {
            let signature = RoutineSignature::new("public", &routine("f", &[argument]))
                .expect("a commented type is still one type");
            assert_eq!(signature.to_sql(), r#""public"."f"(integer)"#, "{argument}");
            assert_eq!(signature.catalog_signature(), "public.f(integer)");
        }
    }

    #[test]
    fn quoted_type_names_keep_their_case() {
        let signature =
            RoutineSignature::new("public", &routine("f", &[r#""MyEnum""#, "MyOther"]))
                .expect("custom types are valid");
        assert_eq!(signature.catalog_signature(), r#"public.f("MyEnum",myother)"#);
    }

    #[test]
    fn array_argument_types_are_accepted() {
        let signature = RoutineSignature::new("public", &routine("f", &["text[]"]))
            .expect("array type is valid");
        assert_eq!(signature.catalog_signature(), "public.f(text[])");
    }
}
