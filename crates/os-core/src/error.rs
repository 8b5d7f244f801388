use thiserror::Error;

pub type OsResult<T> = Result<T, OsError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OsError {
    #[error("Invalid handle: '{text}'")]
    InvalidHandle { text: String },

    #[error("Object not found: {what}")]
    NotFound { what: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
