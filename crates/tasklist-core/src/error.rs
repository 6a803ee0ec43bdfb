use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} cannot be null")]
    NullField(&'static str),

    #[error("invalid file type: {0} (allowed: image/jpeg, image/png, image/gif)")]
    UnsupportedContentType(String),
}
