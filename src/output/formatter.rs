use std::path::{Component, Path, PathBuf};

use crate::output::plan::{self, PlannedStatement};

/// Write the rendered plan to `<output_dir>/<name>_plan.sql` and return the path.
pub fn write_plan(
    output_dir: &Path,
    name: &str,
    planned: &[PlannedStatement],
) -> Result<PathBuf, String> {
    validate_output_name(name)?;

    std::fs::create_dir_all(output_dir)
        .map_err(|e| format!("Failed to create output directory: {e}"))?;

    let plan_path = output_dir.join(format!("{name}_plan.sql"));
    let mut content = plan::format_plan(planned);
    content.push('\n');
    std::fs::write(&plan_path, &content)
        .map_err(|e| format!("Failed to write {}: {e}", plan_path.display()))?;

    Ok(plan_path)
}

fn validate_output_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Output name must not be empty".to_string());
    }
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return Err(format!(
            "Invalid output name '{name}': absolute paths are not allowed"
        ));
    }
    if candidate.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    }) {
        return Err(format!(
            "Invalid output name '{name}': traversal segments are not allowed"
        ));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(format!(
            "Invalid output name '{name}': path separators are not allowed"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::statement::Statement;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_path(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!("{prefix}_{nanos}"))
    }

    fn flush_plan() -> Vec<PlannedStatement> {
        vec![PlannedStatement {
            comment: "-- flush".to_string(),
            statement: Statement::new("FLUSH PRIVILEGES"),
        }]
    }

    #[test]
    fn write_plan_reports_directory_creation_errors() {
        let path = unique_path("sqlgrants_formatter_file");
        std::fs::write(&path, "not a directory").expect("should create marker file");

        let err = write_plan(&path, "grant", &flush_plan())
            .expect_err("directory creation should fail");
        assert!(err.contains("Failed to create output directory"));
    }

    #[test]
    fn write_plan_rejects_unsafe_name_paths() {
        let dir = unique_path("sqlgrants_formatter_dir");
        std::fs::create_dir_all(&dir).expect("should create temp directory");

        let err = write_plan(&dir, "nested/grant", &flush_plan())
            .expect_err("unsafe output name should fail validation");
        assert!(err.contains("Invalid output name"));

        let err = write_plan(&dir, "../escape", &flush_plan())
            .expect_err("path traversal should fail validation");
        assert!(err.contains("Invalid output name"));
    }

    #[test]
    fn write_plan_writes_the_rendered_script() {
        let dir = unique_path("sqlgrants_formatter_ok");
        let path = write_plan(&dir, "reader", &flush_plan()).expect("write_plan should succeed");

        assert_eq!(path, dir.join("reader_plan.sql"));
        let written = std::fs::read_to_string(&path).expect("plan file should exist");
        assert_eq!(written, "-- flush\nFLUSH PRIVILEGES;\n");
    }
}
