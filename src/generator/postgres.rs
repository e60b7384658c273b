//! `PostgreSQL` statement synthesis for the nine grant shapes.
//!
//! GRANT is additive in `PostgreSQL`, so converging on an exact privilege set
//! means revoking everything on the target and granting the desired set in one
//! transaction. The existence query compares the whole observed set against
//! the expanded desired set, which lets a single round trip decide whether that
//! transaction is needed.

use std::collections::BTreeSet;

use crate::classifier::grant_classifier::identify_grant_type;
use crate::classifier::grant_type::GrantType;
use crate::classifier::params::GrantParameters;
use crate::error::GrantError;
use crate::generator::statement::{Binds, SqlValue, Statement};
use crate::parser::names::{quote_pg_identifier, quote_pg_qualified};
use crate::parser::routine::RoutineSignature;
use crate::privileges::privilege::{Engine, PrivilegeSet};

/// Where the ACL of one kind of object lives in the system catalogs.
struct AclCatalog {
    /// FROM items preceding `aclexplode`; functions in FROM are lateral, so
    /// the ACL column can reference them.
    from: &'static str,
    acl: &'static str,
    /// Expression naming one object; used for grouping and filtering.
    name: &'static str,
    /// Fixed predicate narrowing the catalog to the right object kind.
    predicate: Option<&'static str>,
}

const DATABASE_CATALOG: AclCatalog = AclCatalog {
    from: "pg_database db",
    acl: "db.datacl",
    name: "db.datname",
    predicate: None,
};

const SCHEMA_CATALOG: AclCatalog = AclCatalog {
    from: "pg_namespace n",
    acl: "n.nspacl",
    name: "n.nspname",
    predicate: None,
};

const TABLE_CATALOG: AclCatalog = AclCatalog {
    from: "pg_class c INNER JOIN pg_namespace n ON c.relnamespace = n.oid",
    acl: "c.relacl",
    name: "c.relname",
    predicate: Some("c.relkind IN ('r', 'v', 'm', 'f', 'p')"),
};

const COLUMN_CATALOG: AclCatalog = AclCatalog {
    from: "pg_attribute a INNER JOIN pg_class c ON a.attrelid = c.oid \
           INNER JOIN pg_namespace n ON c.relnamespace = n.oid",
    acl: "a.attacl",
    name: "a.attname",
    predicate: Some("a.attnum > 0 AND NOT a.attisdropped"),
};

const SEQUENCE_CATALOG: AclCatalog = AclCatalog {
    from: "pg_class c INNER JOIN pg_namespace n ON c.relnamespace = n.oid",
    acl: "c.relacl",
    name: "c.relname",
    predicate: Some("c.relkind = 'S'"),
};

const ROUTINE_CATALOG: AclCatalog = AclCatalog {
    from: "pg_proc p INNER JOIN pg_namespace n ON p.pronamespace = n.oid",
    acl: "p.proacl",
    name: "n.nspname || '.' || p.proname || '(' || \
           replace(oidvectortypes(p.proargtypes), ', ', ',') || ')'",
    predicate: None,
};

const FOREIGN_SERVER_CATALOG: AclCatalog = AclCatalog {
    from: "pg_foreign_server srv",
    acl: "srv.srvacl",
    name: "srv.srvname",
    predicate: None,
};

const FOREIGN_DATA_WRAPPER_CATALOG: AclCatalog = AclCatalog {
    from: "pg_foreign_data_wrapper fdw",
    acl: "fdw.fdwacl",
    name: "fdw.fdwname",
    predicate: None,
};

/// The object side of a grant, one variant per grant shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PgTarget {
    /// Membership in `member_of`.
    Member {
        /// Role the grantee joins.
        member_of: String,
    },
    /// A database.
    Database {
        /// Database name.
        database: String,
    },
    /// A schema.
    Schema {
        /// Schema name.
        schema: String,
    },
    /// Tables in one schema.
    Table {
        /// Schema of every table.
        schema: String,
        /// Table names, deduplicated.
        tables: Vec<String>,
    },
    /// Columns of one table.
    Column {
        /// Schema of the table.
        schema: String,
        /// Table name.
        table: String,
        /// Column names, deduplicated.
        columns: Vec<String>,
    },
    /// Sequences in one schema.
    Sequence {
        /// Schema of every sequence.
        schema: String,
        /// Sequence names, deduplicated.
        sequences: Vec<String>,
    },
    /// Functions or procedures in one schema.
    Routine {
        /// Validated signatures, deduplicated.
        routines: Vec<RoutineSignature>,
    },
    /// Foreign servers.
    ForeignServer {
        /// Server names, deduplicated.
        servers: Vec<String>,
    },
    /// Foreign-data wrappers.
    ForeignDataWrapper {
        /// Wrapper names, deduplicated.
        wrappers: Vec<String>,
    },
}

impl PgTarget {
    /// Grant shape of this target.
    pub fn grant_type(&self) -> GrantType {
        match self {
            PgTarget::Member { .. } => GrantType::RoleMember,
            PgTarget::Database { .. } => GrantType::RoleDatabase,
            PgTarget::Schema { .. } => GrantType::RoleSchema,
            PgTarget::Table { .. } => GrantType::RoleTable,
            PgTarget::Column { .. } => GrantType::RoleColumn,
            PgTarget::Sequence { .. } => GrantType::RoleSequence,
            PgTarget::Routine { .. } => GrantType::RoleRoutine,
            PgTarget::ForeignServer { .. } => GrantType::RoleForeignServer,
            PgTarget::ForeignDataWrapper { .. } => GrantType::RoleForeignDataWrapper,
        }
    }
}

/// A validated `PostgreSQL` grant, ready for statement synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgGrant {
    role: String,
    database: Option<String>,
    target: PgTarget,
    privileges: PrivilegeSet,
    with_option: bool,
    revoke_public_on_db: bool,
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, GrantError> {
    match value.as_deref() {
        None => Err(GrantError::MissingField(field)),
        Some("") => Err(GrantError::EmptyIdentifier(field)),
        Some(value) => Ok(value.to_string()),
    }
}

fn identifiers(values: &[String], field: &'static str) -> Result<Vec<String>, GrantError> {
    if values.iter().any(String::is_empty) {
        return Err(GrantError::EmptyIdentifier(field));
    }
    let mut seen = BTreeSet::new();
    Ok(values
        .iter()
        .filter(|value| seen.insert(value.as_str()))
        .cloned()
        .collect())
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| quote_pg_identifier(name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn qualified_list(schema: &str, names: &[String]) -> String {
    names
        .iter()
        .map(|name| quote_pg_qualified(schema, name))
        .collect::<Vec<_>>()
        .join(", ")
}

impl PgGrant {
    /// Classify and validate `params`.
    pub fn new(params: &GrantParameters) -> Result<Self, GrantError> {
        let grant_type = identify_grant_type(params)?;
        let role = required(&params.role, "role")?;
        params.privileges.check_engine(Engine::Postgres)?;

        let with_option = match params.with_option {
            None => false,
            Some(option) if option == grant_type.grant_option() => true,
            Some(option) => {
                return Err(GrantError::InvalidGrantOption {
                    option: option.keyword(),
                    grant_type,
                })
            }
        };

        let target = match grant_type {
            GrantType::RoleMember => PgTarget::Member {
                member_of: required(&params.member_of, "memberOf")?,
            },
            GrantType::RoleDatabase => PgTarget::Database {
                database: required(&params.database, "database")?,
            },
            GrantType::RoleSchema => PgTarget::Schema {
                schema: required(&params.schema, "schema")?,
            },
            GrantType::RoleTable => PgTarget::Table {
                schema: required(&params.schema, "schema")?,
                tables: identifiers(&params.tables, "tables")?,
            },
            GrantType::RoleColumn => {
                let tables = identifiers(&params.tables, "tables")?;
                let [table] = tables.as_slice() else {
                    return Err(GrantError::ColumnsRequireSingleTable(tables.len()));
                };
                PgTarget::Column {
                    schema: required(&params.schema, "schema")?,
                    table: table.clone(),
                    columns: identifiers(&params.columns, "columns")?,
                }
            }
            GrantType::RoleSequence => PgTarget::Sequence {
                schema: required(&params.schema, "schema")?,
                sequences: identifiers(&params.sequences, "sequences")?,
            },
            GrantType::RoleRoutine => {
                let schema = required(&params.schema, "schema")?;
                let mut routines: Vec<RoutineSignature> = Vec::new();
                for routine in &params.routines {
                    let signature = RoutineSignature::new(&schema, routine)?;
                    if !routines.contains(&signature) {
                        routines.push(signature);
                    }
                }
                PgTarget::Routine { routines }
            }
            GrantType::RoleForeignServer => PgTarget::ForeignServer {
                servers: identifiers(&params.foreign_servers, "foreignServers")?,
            },
            GrantType::RoleForeignDataWrapper => PgTarget::ForeignDataWrapper {
                wrappers: identifiers(&params.foreign_data_wrappers, "foreignDataWrappers")?,
            },
        };

        Ok(Self {
            role,
            database: params.database.clone(),
            target,
            privileges: params.privileges.clone(),
            with_option,
            revoke_public_on_db: params.revoke_public_on_db.unwrap_or(false),
        })
    }

    /// Grant shape.
    pub fn grant_type(&self) -> GrantType {
        self.target.grant_type()
    }

    /// Database the statements must run in; `None` for membership grants,
    /// which are cluster-wide.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Grantee role.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Object side of the grant.
    pub fn target(&self) -> &PgTarget {
        &self.target
    }

    /// Parameterized query returning a single boolean: true when the live
    /// grant matches the declared one exactly.
    pub fn select_query(&self) -> Statement {
        match &self.target {
            PgTarget::Member { member_of } => {
                let mut binds = Binds::default();
                let role = binds.text(&self.role);
                let member_of = binds.text(member_of);
                let admin = binds.push(SqlValue::Bool(self.with_option));
                binds.finish(format!(
                    "SELECT EXISTS(SELECT 1 FROM pg_auth_members m \
                     INNER JOIN pg_roles mo ON m.roleid = mo.oid \
                     INNER JOIN pg_roles r ON m.member = r.oid \
                     WHERE r.rolname = {role} AND mo.rolname = {member_of} \
                     AND m.admin_option = {admin})"
                ))
            }
            PgTarget::Database { database } => {
                self.acl_query(&DATABASE_CATALOG, Scope::default(), Objects::One(database))
            }
            PgTarget::Schema { schema } => {
                self.acl_query(&SCHEMA_CATALOG, Scope::default(), Objects::One(schema))
            }
            PgTarget::Table { schema, tables } => self.acl_query(
                &TABLE_CATALOG,
                Scope::schema(schema),
                Objects::Many(tables.clone()),
            ),
            PgTarget::Column {
                schema,
                table,
                columns,
            } => self.acl_query(
                &COLUMN_CATALOG,
                Scope {
                    schema: Some(schema),
                    table: Some(table),
                },
                Objects::Many(columns.clone()),
            ),
            PgTarget::Sequence { schema, sequences } => self.acl_query(
                &SEQUENCE_CATALOG,
                Scope::schema(schema),
                Objects::Many(sequences.clone()),
            ),
            PgTarget::Routine { routines } => self.acl_query(
                &ROUTINE_CATALOG,
                Scope::default(),
                Objects::Many(
                    routines
                        .iter()
                        .map(RoutineSignature::catalog_signature)
                        .collect(),
                ),
            ),
            PgTarget::ForeignServer { servers } => self.acl_query(
                &FOREIGN_SERVER_CATALOG,
                Scope::default(),
                Objects::Many(servers.clone()),
            ),
            PgTarget::ForeignDataWrapper { wrappers } => self.acl_query(
                &FOREIGN_DATA_WRAPPER_CATALOG,
                Scope::default(),
                Objects::Many(wrappers.clone()),
            ),
        }
    }

    /// Revoke-then-grant pair (plus the optional `PUBLIC` revoke), meant to
    /// run in one transaction.
    pub fn create_queries(&self) -> Vec<Statement> {
        let role = quote_pg_identifier(&self.role);
        if let PgTarget::Member { member_of } = &self.target {
            let member_of = quote_pg_identifier(member_of);
            return vec![
                Statement::new(format!("REVOKE {member_of} FROM {role}")),
                Statement::new(format!(
                    "GRANT {member_of} TO {role}{}",
                    self.option_suffix()
                )),
            ];
        }

        let object = self.object_clause();
        let mut queries = vec![
            Statement::new(format!(
                "REVOKE {} ON {object} FROM {role}",
                self.revoke_all_clause()
            )),
            Statement::new(format!(
                "GRANT {} ON {object} TO {role}{}",
                self.privilege_clause(),
                self.option_suffix()
            )),
        ];
        if let PgTarget::Database { database } = &self.target {
            if self.revoke_public_on_db {
                queries.push(Statement::new(format!(
                    "REVOKE ALL ON DATABASE {} FROM PUBLIC",
                    quote_pg_identifier(database)
                )));
            }
        }
        queries
    }

    /// REVOKE of exactly the declared privileges (or the membership).
    pub fn delete_query(&self) -> Statement {
        let role = quote_pg_identifier(&self.role);
        match &self.target {
            PgTarget::Member { member_of } => Statement::new(format!(
                "REVOKE {} FROM {role}",
                quote_pg_identifier(member_of)
            )),
            _ => Statement::new(format!(
                "REVOKE {} ON {} FROM {role}",
                self.privilege_clause(),
                self.object_clause()
            )),
        }
    }

    fn option_suffix(&self) -> String {
        if self.with_option {
            format!(" WITH {} OPTION", self.grant_type().grant_option().keyword())
        } else {
            String::new()
        }
    }

    fn column_list(&self) -> Option<String> {
        match &self.target {
            PgTarget::Column { columns, .. } => Some(format!("({})", quoted_list(columns))),
            _ => None,
        }
    }

    fn privilege_clause(&self) -> String {
        match self.column_list() {
            Some(columns) => self
                .privileges
                .to_string_vec()
                .iter()
                .map(|privilege| format!("{privilege} {columns}"))
                .collect::<Vec<_>>()
                .join(", "),
            None => self.privileges.to_sql_list(),
        }
    }

    fn revoke_all_clause(&self) -> String {
        match self.column_list() {
            Some(columns) => format!("ALL {columns}"),
            None => "ALL".to_string(),
        }
    }

    fn object_clause(&self) -> String {
        match &self.target {
            PgTarget::Member { member_of } => quote_pg_identifier(member_of),
            PgTarget::Database { database } => {
                format!("DATABASE {}", quote_pg_identifier(database))
            }
            PgTarget::Schema { schema } => format!("SCHEMA {}", quote_pg_identifier(schema)),
            PgTarget::Table { schema, tables } => {
                format!("TABLE {}", qualified_list(schema, tables))
            }
            PgTarget::Column { schema, table, .. } => {
                format!("TABLE {}", quote_pg_qualified(schema, table))
            }
            PgTarget::Sequence { schema, sequences } => {
                format!("SEQUENCE {}", qualified_list(schema, sequences))
            }
            PgTarget::Routine { routines } => format!(
                "ROUTINE {}",
                routines
                    .iter()
                    .map(RoutineSignature::to_sql)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            PgTarget::ForeignServer { servers } => {
                format!("FOREIGN SERVER {}", quoted_list(servers))
            }
            PgTarget::ForeignDataWrapper { wrappers } => {
                format!("FOREIGN DATA WRAPPER {}", quoted_list(wrappers))
            }
        }
    }

    fn acl_query(&self, catalog: &AclCatalog, scope: Scope<'_>, objects: Objects<'_>) -> Statement {
        let mut binds = Binds::default();
        let mut filters = vec![format!("s.rolname = {}", binds.text(&self.role))];
        if let Some(schema) = scope.schema {
            filters.push(format!("n.nspname = {}", binds.text(schema)));
        }
        if let Some(table) = scope.table {
            filters.push(format!("c.relname = {}", binds.text(table)));
        }
        let count = match &objects {
            Objects::One(name) => {
                filters.push(format!("{} = {}", catalog.name, binds.text(name)));
                None
            }
            Objects::Many(names) => {
                let names_bind = binds.push(SqlValue::TextArray(names.clone()));
                filters.push(format!("{} = ANY({names_bind})", catalog.name));
                Some(names.len())
            }
        };
        if let Some(predicate) = catalog.predicate {
            filters.push(predicate.to_string());
        }

        let desired = self.privileges.expand(self.grant_type()).sorted();
        let privileges = binds.push(SqlValue::TextArray(desired));
        let grantable = binds.push(SqlValue::Bool(self.with_option));

        let matching = format!(
            "SELECT 1 FROM {from}, aclexplode({acl}) AS acl \
             INNER JOIN pg_roles s ON acl.grantee = s.oid \
             WHERE {filters} \
             GROUP BY {name} \
             HAVING array_agg(DISTINCT acl.privilege_type ORDER BY acl.privilege_type ASC) = \
             (SELECT array(SELECT unnest({privileges}::text[]) AS perms ORDER BY perms ASC)) \
             AND bool_and(acl.is_grantable = {grantable})",
            from = catalog.from,
            acl = catalog.acl,
            name = catalog.name,
            filters = filters.join(" AND "),
        );

        match count {
            None => binds.finish(format!("SELECT EXISTS({matching})")),
            Some(count) => {
                let expected = binds.push(SqlValue::Int(count as i64));
                binds.finish(format!(
                    "SELECT COUNT(*) = {expected} FROM ({matching}) AS matched"
                ))
            }
        }
    }
}

/// Filters shared by every object of a multi-object grant.
#[derive(Debug, Default, Clone, Copy)]
struct Scope<'a> {
    schema: Option<&'a str>,
    table: Option<&'a str>,
}

impl<'a> Scope<'a> {
    fn schema(schema: &'a str) -> Self {
        Self {
            schema: Some(schema),
            table: None,
        }
    }
}

enum Objects<'a> {
    One(&'a str),
    Many(Vec<String>),
}

/// Existence query for the grant described by `params`.
pub fn build_select_query(params: &GrantParameters) -> Result<Statement, GrantError> {
    Ok(PgGrant::new(params)?.select_query())
}

/// Statements that replace whatever is granted on the target with `params`.
pub fn build_create_queries(params: &GrantParameters) -> Result<Vec<Statement>, GrantError> {
    Ok(PgGrant::new(params)?.create_queries())
}

/// Statement revoking the grant described by `params`.
pub fn build_delete_query(params: &GrantParameters) -> Result<Statement, GrantError> {
    Ok(PgGrant::new(params)?.delete_query())
}
