//! Error types

mod api;
mod field;
mod stream;

pub use api::*;
pub use field::*;
pub use stream::*;

/// Top-level error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error during an API call.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Error accessing a record field.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Error on the change-event channel.
    #[error(transparent)]
    Stream(#[from] StreamError),
}
