//! Uniform `{status, message, data}` envelope and the single place where
//! failures become HTTP responses.

pub mod envelope;
pub mod error;
pub mod extract;

pub use envelope::{ApiResponse, Envelope, Status};
pub use error::{ApiError, ApiResult, FieldViolation};
pub use extract::ApiPath;
