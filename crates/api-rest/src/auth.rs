//! Request-scoped authentication context.
//!
//! The identity provider sits in front of this service as a proxy and
//! forwards the authenticated account's e-mail in a request header. The
//! extractor below turns that header into an explicit [`AuthContext`]
//! passed into each protected handler; no handler reads ambient session
//! state. Requests without an acceptable identity are redirected to the
//! sign-in path.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use chartview_core::{ChartError, ChartResult, CoreConfig};

use crate::error::ApiError;
use crate::AppState;

/// The authenticated caller for one request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub email: String,
}

/// Validates a forwarded identity header value against the configured
/// e-mail domain. Comparison is case-insensitive.
///
/// # Errors
///
/// Returns `ChartError::AuthDenied` when no identity was forwarded, the
/// value is not an e-mail address, or the domain is not the allowed one.
pub fn authenticate(header_value: Option<&str>, cfg: &CoreConfig) -> ChartResult<AuthContext> {
    let raw = header_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ChartError::AuthDenied("no identity forwarded with request".into()))?;

    let email = raw.to_ascii_lowercase();
    let (_, domain) = email
        .rsplit_once('@')
        .ok_or_else(|| ChartError::AuthDenied("forwarded identity is not an e-mail".into()))?;

    if domain != cfg.allowed_email_domain() {
        return Err(ChartError::AuthDenied(format!(
            "e-mail domain {domain:?} is not permitted"
        )));
    }

    Ok(AuthContext { email })
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(state.cfg.identity_header())
            .and_then(|value| value.to_str().ok());

        authenticate(header, &state.cfg).map_err(|err| {
            tracing::warn!("rejecting {} {}: {err}", parts.method, parts.uri.path());
            ApiError::AuthDenied {
                sign_in_path: state.cfg.sign_in_path().to_owned(),
            }
        })
    }
}
