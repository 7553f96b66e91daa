//! Raw result rows, named after the source schema.
//!
//! Each page issues one query returning at most a handful of shapes: scalar
//! demographic columns plus child collections aggregated into JSON arrays.
//! Scalars decode through `sqlx::FromRow`; the JSON arrays decode through
//! `sqlx::types::Json` into the `Raw*` element structs below. The queries
//! `COALESCE` every aggregate to `'[]'`, so a category with no rows decodes
//! to an empty vec rather than a null.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::types::Json;

/// Scalar columns of the `demographics` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DemographicsRow {
    pub patient_num: i64,
    pub birth_date_shifted: Option<NaiveDate>,
    pub gender_identity: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
    pub state_c: Option<String>,
    pub zip3: Option<String>,
    pub pcp_provider_name: Option<String>,
}

/// One row of the patient-list query.
#[derive(Debug, sqlx::FromRow)]
pub struct PatientListRow {
    #[sqlx(flatten)]
    pub demographics: DemographicsRow,
    pub encounter_count: i64,
}

/// The single row of the patient-detail query.
#[derive(Debug, sqlx::FromRow)]
pub struct PatientDetailRow {
    #[sqlx(flatten)]
    pub demographics: DemographicsRow,
    pub encounters: Json<Vec<RawEncounter>>,
}

/// The single row of the encounter-detail query.
#[derive(Debug, sqlx::FromRow)]
pub struct EncounterDetailRow {
    #[sqlx(flatten)]
    pub demographics: DemographicsRow,
    pub diagnoses: Json<Vec<RawDiagnosis>>,
    pub procedures: Json<Vec<RawProcedure>>,
    pub imaging_reports: Json<Vec<RawImagingReport>>,
    pub orders: Json<Vec<RawOrderNote>>,
    pub hno_notes: Json<Vec<RawHnoNote>>,
}

/// `encounters` element as emitted by `json_agg`. Timestamps arrive as the
/// JSON strings Postgres produces and stay strings from here on.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEncounter {
    pub encounter_num: i64,
    pub contact_date: Option<String>,
    pub enc_type_name: Option<String>,
    pub visit_provider_name: Option<String>,
    pub department_name: Option<String>,
    pub note_count: i64,
}

/// `diagnosis` element.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDiagnosis {
    pub dx_name: Option<String>,
    pub dx_type: Option<String>,
    pub dx_source: Option<String>,
    pub dx_date: Option<String>,
}

/// `procedures` element.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProcedure {
    pub order_proc_id: i64,
    pub proc_source: Option<String>,
    pub proc_code: Option<String>,
    pub proc_name: Option<String>,
    pub order_type: Option<String>,
    pub provider_name: Option<String>,
}

/// `imaging_reports_deid` element.
#[derive(Debug, Clone, Deserialize)]
pub struct RawImagingReport {
    pub order_proc_id: i64,
    pub specimen_taken_time: Option<String>,
    pub order_type: Option<String>,
    pub impression_date: Option<String>,
    pub note_text: Option<String>,
}

/// `order_results_deid` element.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderNote {
    pub order_proc_id: i64,
    pub order_type: Option<String>,
    pub specimen_taken_time: Option<String>,
    pub contact_date: Option<String>,
    pub note_text: Option<String>,
}

/// `hno_notes_deid` element.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHnoNote {
    pub note_num: i64,
    pub contact_date: Option<String>,
    pub note_type: Option<String>,
    pub note_text: Option<String>,
}
