use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Plan collision: '{first}' and '{second}' both relocate to '{target}'")]
    PlanCollision {
        first: String,
        second: String,
        target: String,
    },

    #[error("Invalid line range {start}..{end} in '{file}': {problem}")]
    InvalidRange {
        file: String,
        start: usize,
        end: usize,
        problem: String,
    },

    #[error("Invalid argument '{field}': {problem}")]
    InvalidArgument { field: String, problem: String },

    #[error("IO error: {error} ({context})")]
    Io { error: String, context: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an IO error with the operation that produced it, e.g.
    /// `Error::io(e, format!("read {}", path.display()))`.
    pub fn io(error: std::io::Error, context: impl Into<String>) -> Self {
        Error::Io {
            error: error.to_string(),
            context: context.into(),
        }
    }

    /// Stable machine-readable code for the JSON error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Error::PlanCollision { .. } => "plan.collision",
            Error::InvalidRange { .. } => "split.invalid_range",
            Error::InvalidArgument { .. } => "validation.invalid_argument",
            Error::Io { .. } => "internal.io_error",
            Error::Json(_) => "internal.json_error",
        }
    }

    /// Process exit code for this error class. Validation failures use 2
    /// so scripts can tell bad input from IO failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::PlanCollision { .. }
            | Error::InvalidRange { .. }
            | Error::InvalidArgument { .. } => 2,
            Error::Io { .. } | Error::Json(_) => 1,
        }
    }
}
