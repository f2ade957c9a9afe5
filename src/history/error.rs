use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("io error `{0}`")]
    Io(#[from] std::io::Error),
    #[error("json error `{0}`")]
    Json(#[from] serde_json::Error),
    #[error("history file root is not an object")]
    NotAnObject,
    #[error("history for category `{0}` is not an array")]
    NotAnArray(String),
}
