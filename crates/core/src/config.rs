//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! handlers as part of the application state. Request handling never reads
//! process-wide environment variables, which keeps behaviour consistent in
//! multi-threaded runtimes and test harnesses.

use crate::{ChartError, ChartResult};

/// Default header carrying the authenticated e-mail, as forwarded by the
/// identity-provider proxy in front of this service.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-auth-request-email";

/// Default path unauthenticated requests are redirected to.
pub const DEFAULT_SIGN_IN_PATH: &str = "/";

/// Default path of the identity proxy's sign-out endpoint.
pub const DEFAULT_SIGN_OUT_PATH: &str = "/oauth2/sign_out";

/// Default number of patient rows per page on the patient list.
pub const DEFAULT_PATIENT_PAGE_SIZE: usize = 15;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_url: String,
    allowed_email_domain: String,
    identity_header: String,
    sign_in_path: String,
    sign_out_path: String,
    patient_page_size: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `allowed_email_domain` is the bare domain (`example.org`); a leading
    /// `@` is accepted and stripped. The domain comparison performed at
    /// request time is case-insensitive, so the domain is lowercased here.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::InvalidInput` if the database URL or the e-mail
    /// domain is empty, or if the page size is zero.
    pub fn new(
        database_url: String,
        allowed_email_domain: String,
        patient_page_size: usize,
    ) -> ChartResult<Self> {
        if database_url.trim().is_empty() {
            return Err(ChartError::InvalidInput(
                "database_url cannot be empty".into(),
            ));
        }
        let domain = allowed_email_domain
            .trim()
            .trim_start_matches('@')
            .to_ascii_lowercase();
        if domain.is_empty() || domain.contains(char::is_whitespace) {
            return Err(ChartError::InvalidInput(
                "allowed_email_domain must be a bare domain such as example.org".into(),
            ));
        }

        if patient_page_size == 0 {
            return Err(ChartError::InvalidInput(
                "patient_page_size must be at least 1".into(),
            ));
        }

        Ok(Self {
            database_url,
            allowed_email_domain: domain,
            identity_header: DEFAULT_IDENTITY_HEADER.into(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.into(),
            sign_out_path: DEFAULT_SIGN_OUT_PATH.into(),
            patient_page_size,
        })
    }

    /// Overrides the identity header name.
    pub fn with_identity_header(mut self, header: String) -> ChartResult<Self> {
        let header = header.trim().to_ascii_lowercase();
        if header.is_empty() {
            return Err(ChartError::InvalidInput(
                "identity_header cannot be empty".into(),
            ));
        }
        self.identity_header = header;
        Ok(self)
    }

    /// Overrides the sign-in and sign-out paths.
    pub fn with_auth_paths(mut self, sign_in: String, sign_out: String) -> ChartResult<Self> {
        for path in [&sign_in, &sign_out] {
            if !path.starts_with('/') {
                return Err(ChartError::InvalidInput(format!(
                    "auth path must start with '/': {path:?}"
                )));
            }
        }
        self.sign_in_path = sign_in;
        self.sign_out_path = sign_out;
        Ok(self)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn allowed_email_domain(&self) -> &str {
        &self.allowed_email_domain
    }

    pub fn identity_header(&self) -> &str {
        &self.identity_header
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    pub fn sign_out_path(&self) -> &str {
        &self.sign_out_path
    }

    pub fn patient_page_size(&self) -> usize {
        self.patient_page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(domain: &str) -> ChartResult<CoreConfig> {
        CoreConfig::new("postgres://localhost/deid".into(), domain.into(), 15)
    }

    #[test]
    fn test_domain_is_normalised() {
        let cfg = config("@Example.ORG").unwrap();
        assert_eq!(cfg.allowed_email_domain(), "example.org");
    }

    #[test]
    fn test_empty_domain_rejected() {
        assert!(config("").is_err());
        assert!(config("@").is_err());
        assert!(config("exa mple.org").is_err());
    }

    #[test]
    fn test_empty_database_url_rejected() {
        assert!(CoreConfig::new("  ".into(), "example.org".into(), 15).is_err());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(CoreConfig::new("postgres://localhost/deid".into(), "example.org".into(), 0).is_err());
    }

    #[test]
    fn test_auth_path_must_be_absolute() {
        let cfg = config("example.org").unwrap();
        assert!(cfg
            .clone()
            .with_auth_paths("signin".into(), "/signout".into())
            .is_err());
        let cfg = cfg
            .with_auth_paths("/signin".into(), "/signout".into())
            .unwrap();
        assert_eq!(cfg.sign_in_path(), "/signin");
        assert_eq!(cfg.sign_out_path(), "/signout");
    }
}
