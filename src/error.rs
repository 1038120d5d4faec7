use actix_web::{http::StatusCode, ResponseError};
use thiserror::Error;

/// Request-path failures. Every variant maps to a user-facing message;
/// none of these crash the worker.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoverageError {
    #[error("no address provided")]
    EmptyAddress,

    #[error("address not found")]
    AddressNotFound,

    #[error("location outside supported region")]
    OutOfRegion,

    // geocoder unreachable, timed out, or returned garbage
    #[error("address lookup failed")]
    LookupFailure,

    #[error("unknown operator code {0}")]
    UnknownOperator(u32),

    #[error("unknown network {0:?}")]
    UnknownNetwork(String),
}

impl ResponseError for CoverageError {
    fn status_code(&self) -> StatusCode {
        match self {
            CoverageError::EmptyAddress => StatusCode::BAD_REQUEST,
            CoverageError::AddressNotFound | CoverageError::OutOfRegion => StatusCode::NOT_FOUND,
            CoverageError::LookupFailure => StatusCode::BAD_GATEWAY,
            CoverageError::UnknownOperator(_) | CoverageError::UnknownNetwork(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(CoverageError::EmptyAddress.to_string(), "no address provided");
        assert_eq!(CoverageError::AddressNotFound.to_string(), "address not found");
        assert_eq!(
            CoverageError::OutOfRegion.to_string(),
            "location outside supported region"
        );
        assert_eq!(CoverageError::LookupFailure.to_string(), "address lookup failed");
    }

    #[test]
    fn lookup_failure_is_distinct_from_not_found() {
        assert_ne!(
            CoverageError::LookupFailure.to_string(),
            CoverageError::AddressNotFound.to_string()
        );
    }
}
