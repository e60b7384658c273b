/// `PostgreSQL` 15 shorthand-expansion tables, one per grant type.
pub mod expansion;
/// Privilege tokens, privilege sets, and engine grammars.
pub mod privilege;
