/// Failures that abort processing of a whole model file.
#[derive(Debug, thiserror::Error)]
pub enum IfcError {
    #[error("Failed to read IFC file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid IFC file: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IFC extraction task failed: {0}")]
    Task(String),
}
