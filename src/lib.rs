//! Classify declarative grant resources and synthesize the `PostgreSQL` and `MySQL`
//! statements that converge a live server onto them.
#![warn(missing_docs)]

/// Grant parameters, grant-type tags, and grant-type identification.
pub mod classifier;
/// Classification and validation errors.
pub mod error;
/// The database executor interface consumed by the reconcilers.
pub mod executor;
/// SQL statement synthesis for both engines and the `MySQL` privilege diff.
pub mod generator;
/// Rendering of synthesized statements as an annotated SQL plan.
pub mod output;
/// Identifier quoting, routine signatures, and `SHOW GRANTS` parsing.
pub mod parser;
/// Privilege tokens, privilege sets, and per-grant-type expansion tables.
pub mod privileges;
/// Observe/Create/Update/Delete shims over an [`executor::Executor`].
pub mod reconciler;

pub use classifier::grant_classifier::identify_grant_type;
pub use classifier::grant_type::GrantType;
pub use classifier::params::{GrantOption, GrantParameters, MySqlGrantParameters, Routine};
pub use error::GrantError;
pub use generator::diff::diff_privileges;
pub use generator::postgres::{build_create_queries, build_delete_query, build_select_query};
pub use parser::show_grants::parse_grant_line;
pub use privileges::privilege::{Privilege, PrivilegeSet};
