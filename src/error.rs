use crate::database::DatabaseError;
use sqlx::Error as SqlxError;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing input; never touches the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced user, group, or membership does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation: duplicate group name or duplicate membership
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A numeric limit would be exceeded: per-user group cap or per-group member cap
    #[error("Capacity limit reached: {0}")]
    Capacity(String),

    /// Actor lacks the required membership or role for the action
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Service-side failure the caller cannot fix (invite-code exhaustion,
    /// storage constraint races)
    #[error("Service error: {0}")]
    Service(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLx database errors
    #[error("SQL error: {0}")]
    Sqlx(#[from] SqlxError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Stable machine-readable code, one per taxonomy kind. Internal kinds
    /// collapse to a single opaque code so storage error text never leaks.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Capacity(_) => "capacity_limit",
            AppError::Permission(_) => "permission_denied",
            AppError::Service(_) => "service_error",
            AppError::Database(_) | AppError::Sqlx(_) | AppError::Config(_) => "internal_error",
        }
    }

    /// Get HTTP status code for the error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) | AppError::Capacity(_) => 400,
            AppError::Permission(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::Service(_)
            | AppError::Database(_)
            | AppError::Sqlx(_)
            | AppError::Config(_) => 500,
        }
    }

    /// Message safe to surface to callers. Internal kinds get a fixed text.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Capacity(msg)
            | AppError::Permission(msg)
            | AppError::Service(msg) => msg.clone(),
            AppError::Database(_) | AppError::Sqlx(_) | AppError::Config(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

/// Repository-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database query error
    #[error("Query error: {0}")]
    Query(SqlxError),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate record
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// Constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A capacity limit would be exceeded (per-user cap, group full)
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// Actor lacks the role required for the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => AppError::NotFound(msg),
            RepositoryError::Query(e) => AppError::Sqlx(e),
            RepositoryError::Duplicate(msg) => AppError::Conflict(msg),
            // Constraint races the caller cannot fix (e.g. an invite-code
            // collision slipping past the advisory check) surface opaquely.
            RepositoryError::ConstraintViolation(msg) => AppError::Service(msg),
            RepositoryError::InvalidInput(msg) => AppError::Validation(msg),
            RepositoryError::CapacityExceeded(msg) => AppError::Capacity(msg),
            RepositoryError::Forbidden(msg) => AppError::Permission(msg),
        }
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => RepositoryError::NotFound("Record not found".to_string()),
            SqlxError::Database(db_err) => {
                // Common PostgreSQL error codes
                let code = db_err.code().map(|c| c.to_string());
                if code.as_deref() == Some("23505") {
                    // Unique violation
                    RepositoryError::Duplicate(db_err.message().to_string())
                } else if code.as_deref() == Some("23503") {
                    // Foreign key violation
                    RepositoryError::ConstraintViolation(db_err.message().to_string())
                } else if code.as_deref() == Some("23514") {
                    // Check constraint violation
                    RepositoryError::ConstraintViolation(db_err.message().to_string())
                } else {
                    RepositoryError::Query(err)
                }
            }
            _ => RepositoryError::Query(err),
        }
    }
}
