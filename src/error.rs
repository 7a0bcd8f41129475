use reqwest::StatusCode;
use thiserror::Error;

/// Failures met while talking to the geocoding and summary services.
///
/// None of these escape the pipeline: the resolver turns them into the next
/// fallback step and the fetcher into a user-facing message.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Network error, timeout or undecodable body.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {0}")]
    Status(StatusCode),

    /// Successful response without the field we need.
    #[error("response carried no usable data")]
    NoData,

    /// Every geocoding source was exhausted.
    #[error("no geocoding source could name this location")]
    Unresolvable,

    #[error("coordinate out of range: ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

impl LookupError {
    /// Whether the failure means "nothing there" rather than "request broke".
    pub fn is_absence(&self) -> bool {
        matches!(self, LookupError::NoData)
            || matches!(self, LookupError::Status(status) if *status == StatusCode::NOT_FOUND)
    }
}

pub type LookupResult<T> = Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absence_covers_empty_and_not_found() {
        assert!(LookupError::NoData.is_absence());
        assert!(LookupError::Status(StatusCode::NOT_FOUND).is_absence());
        assert!(!LookupError::Status(StatusCode::BAD_GATEWAY).is_absence());
        assert!(!LookupError::Unresolvable.is_absence());
    }
}
