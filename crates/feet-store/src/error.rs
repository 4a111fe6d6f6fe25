use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Operation against a key holding the wrong kind of value: {key}")]
    WrongType { key: String },

    #[error("Store file {}: {message}", path.display())]
    Persistence { path: PathBuf, message: String },

    #[error("Transaction aborted after {attempts} conflicting attempts")]
    Conflict { attempts: usize },
}
