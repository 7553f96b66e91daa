use chartview_types::IdError;

/// Failure taxonomy for record browsing.
///
/// Every request-handling path reduces to one of these outcomes; the HTTP
/// layer decides how each is presented (redirect, client error page, or
/// failure page).
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// No demographics row exists for the requested patient.
    #[error("no record for the requested identifier")]
    NotFound,
    /// A path or query value failed validation before reaching the database.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The database was unreachable or a query failed.
    #[error("data source failure: {0}")]
    DataSource(#[from] sqlx::Error),
    /// The request carried no acceptable identity.
    #[error("access denied: {0}")]
    AuthDenied(String),
}

impl From<IdError> for ChartError {
    fn from(err: IdError) -> Self {
        ChartError::InvalidInput(err.to_string())
    }
}

pub type ChartResult<T> = std::result::Result<T, ChartError>;
