/// Writes a rendered plan to disk.
pub mod formatter;
/// Annotated SQL plans for each reconciler action.
pub mod plan;
