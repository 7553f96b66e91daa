//! # chartview HTTP layer
//!
//! Routes, request-scoped authentication, and server-rendered pages for
//! the patient record dashboard. Data access and reshaping live in
//! `chartview-core`; this crate owns the three page routes, the error
//! presentation, and the HTML renderer.

pub mod auth;
pub mod error;
pub mod render;

use std::sync::Arc;

use axum::extract::{Path as AxumPath, Query, State};
use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use chartview_core::config::{
    DEFAULT_PATIENT_PAGE_SIZE, DEFAULT_SIGN_IN_PATH, DEFAULT_SIGN_OUT_PATH,
};
use chartview_core::record::{queries, reshape};
use chartview_core::ui::{Breadcrumb, ExpandSet, Pagination, Section};
use chartview_core::{CoreConfig, EncounterId, PatientId};

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::render::Chrome;

/// Application state shared across request handlers.
///
/// Holds the startup-resolved configuration and the database pool; both
/// are cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub pool: PgPool,
}

/// Builds the dashboard router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/patients", get(patients_index))
        .route("/patients/:patient", get(patient_show))
        .route("/patients/:patient/:encounter", get(encounter_show))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reads configuration from the environment and prepares the server.
///
/// Returns the listen address and the ready-to-serve router.
///
/// # Environment Variables
/// - `CHART_REST_ADDR`: listen address (default: "0.0.0.0:3000")
/// - `DATABASE_URL`: Postgres connection string (required)
/// - `CHART_ALLOWED_EMAIL_DOMAIN`: accepted sign-in domain (required)
/// - `CHART_PAGE_SIZE`: patient-list page size (default: 15)
/// - `CHART_IDENTITY_HEADER`: forwarded identity header name
/// - `CHART_SIGN_IN_PATH` / `CHART_SIGN_OUT_PATH`: identity proxy paths
///
/// # Errors
///
/// Returns an error when a required variable is missing, a value fails
/// validation, or the database pool cannot be created.
pub async fn bootstrap_from_env() -> anyhow::Result<(String, Router)> {
    let addr = std::env::var("CHART_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let domain = std::env::var("CHART_ALLOWED_EMAIL_DOMAIN")
        .map_err(|_| anyhow::anyhow!("CHART_ALLOWED_EMAIL_DOMAIN must be set"))?;
    let page_size = match std::env::var("CHART_PAGE_SIZE") {
        Ok(value) => value.trim().parse()?,
        Err(_) => DEFAULT_PATIENT_PAGE_SIZE,
    };

    let mut cfg = CoreConfig::new(database_url, domain, page_size)?;
    if let Ok(header) = std::env::var("CHART_IDENTITY_HEADER") {
        cfg = cfg.with_identity_header(header)?;
    }
    let sign_in =
        std::env::var("CHART_SIGN_IN_PATH").unwrap_or_else(|_| DEFAULT_SIGN_IN_PATH.into());
    let sign_out =
        std::env::var("CHART_SIGN_OUT_PATH").unwrap_or_else(|_| DEFAULT_SIGN_OUT_PATH.into());
    cfg = cfg.with_auth_paths(sign_in, sign_out)?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(cfg.database_url())
        .await?;

    let state = AppState {
        cfg: Arc::new(cfg),
        pool,
    };
    Ok((addr, app(state)))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Health check endpoint, used by monitoring and the identity proxy.
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "chartview is alive".into(),
    })
}

/// Landing page. Unauthenticated access to any patient route lands here.
async fn home() -> Html<String> {
    Html(render::home_page())
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<usize>,
}

/// `GET /patients`: the paginated patient list.
async fn patients_index(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, ApiError> {
    let rows = queries::list_patients(&state.pool).await?;
    let patients = reshape::patient_list(rows);

    let chrome = Chrome {
        breadcrumb: Breadcrumb::PatientList,
        auth: Some(&auth),
        sign_out_path: state.cfg.sign_out_path(),
    };
    Ok(Html(render::patient_list_page(
        &patients,
        query.page.unwrap_or(0),
        Pagination::new(state.cfg.patient_page_size()),
        chrono::Utc::now().date_naive(),
        &chrome,
    )))
}

#[derive(Debug, Deserialize)]
struct PatientQuery {
    expand: Option<String>,
}

/// `GET /patients/{patientId}`: demographics and the encounter list.
async fn patient_show(
    State(state): State<AppState>,
    auth: AuthContext,
    AxumPath(patient): AxumPath<String>,
    Query(query): Query<PatientQuery>,
) -> Result<Html<String>, ApiError> {
    let patient = PatientId::parse(&patient)?;

    let row = queries::patient_detail(&state.pool, patient).await?;
    let detail = reshape::patient_detail(row);
    let expand = ExpandSet::from_param(query.expand.as_deref());

    let chrome = Chrome {
        breadcrumb: Breadcrumb::Patient(patient.as_i64()),
        auth: Some(&auth),
        sign_out_path: state.cfg.sign_out_path(),
    };
    Ok(Html(render::patient_page(
        &detail,
        &expand,
        chrono::Utc::now().date_naive(),
        &chrome,
    )))
}

#[derive(Debug, Deserialize)]
struct EncounterQuery {
    tab: Option<String>,
    expand: Option<String>,
    note: Option<usize>,
}

/// `GET /patients/{patientId}/{encounterId}`: the tabbed encounter
/// detail.
async fn encounter_show(
    State(state): State<AppState>,
    auth: AuthContext,
    AxumPath((patient, encounter)): AxumPath<(String, String)>,
    Query(query): Query<EncounterQuery>,
) -> Result<Html<String>, ApiError> {
    let patient = PatientId::parse(&patient)?;
    let encounter = EncounterId::parse(&encounter)?;

    let row = queries::encounter_detail(&state.pool, patient, encounter).await?;
    let detail = reshape::encounter_detail(row);

    let active = Section::from_param(query.tab.as_deref());
    let expand = ExpandSet::from_param(query.expand.as_deref());

    let chrome = Chrome {
        breadcrumb: Breadcrumb::Encounter {
            patient: patient.as_i64(),
            encounter: encounter.as_i64(),
        },
        auth: Some(&auth),
        sign_out_path: state.cfg.sign_out_path(),
    };
    Ok(Html(render::encounter_page(
        patient.as_i64(),
        encounter.as_i64(),
        &detail,
        active,
        &expand,
        query.note,
        chrono::Utc::now().date_naive(),
        &chrome,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::LOCATION;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let cfg = CoreConfig::new(
            "postgres://localhost/deid".into(),
            "example.org".into(),
            15,
        )
        .unwrap();
        // Lazy pool: no connection is attempted until a query runs, so
        // routes that never reach the database are testable offline.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/deid")
            .unwrap();
        AppState {
            cfg: Arc::new(cfg),
            pool,
        }
    }

    #[tokio::test]
    async fn test_health_is_open() {
        let response = app(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_home_is_open() {
        let response = app(test_state())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_route_redirects_without_identity() {
        let response = app(test_state())
            .oneshot(Request::get("/patients").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[LOCATION], "/");
    }

    #[tokio::test]
    async fn test_encounter_route_redirects_without_identity() {
        let response = app(test_state())
            .oneshot(Request::get("/patients/42/7").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[LOCATION], "/");
    }

    #[tokio::test]
    async fn test_wrong_domain_redirects_to_sign_in() {
        let request = Request::get("/patients")
            .header("x-auth-request-email", "casey@elsewhere.net")
            .body(Body::empty())
            .unwrap();
        let response = app(test_state()).oneshot(request).await.unwrap();
        assert!(response.status().is_redirection());
    }

    #[tokio::test]
    async fn test_malformed_patient_id_is_client_error() {
        let request = Request::get("/patients/42%3BDROP")
            .header("x-auth-request-email", "casey@example.org")
            .body(Body::empty())
            .unwrap();
        let response = app(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_encounter_id_is_client_error() {
        let request = Request::get("/patients/42/seven")
            .header("x-auth-request-email", "casey@example.org")
            .body(Body::empty())
            .unwrap();
        let response = app(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
