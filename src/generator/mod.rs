/// `MySQL` privilege diff.
pub mod diff;
/// `MySQL` GRANT/REVOKE/SHOW GRANTS synthesis.
pub mod mysql;
/// `PostgreSQL` existence query and GRANT/REVOKE synthesis.
pub mod postgres;
/// Statements with positional values.
pub mod statement;
