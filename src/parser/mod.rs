/// Identifier and literal quoting for both engines, `user@host` handling.
pub mod names;
/// Routine signatures with validated argument types.
pub mod routine;
/// Fixed-format parsing of `MySQL` `SHOW GRANTS` output.
pub mod show_grants;
