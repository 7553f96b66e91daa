//! Canonical view models.
//!
//! One schema per entity, camelCase on the wire, UI-oriented field names.
//! Earlier drafts of these pages disagreed about field sets and spelling;
//! this module is the single replacement. Date fields are the raw strings
//! the database produced; formatting belongs to the renderer. Note bodies
//! are plain text by the time they land here.

use serde::Serialize;

/// Demographic header shared by every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    pub id: i64,
    pub dob: String,
    pub sex: String,
    pub race: String,
    pub ethnicity: String,
    pub zip: String,
    pub pcp: String,
}

/// One row of the patient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    #[serde(flatten)]
    pub demographics: Demographics,
    pub encounters: i64,
}

/// Patient detail: demographics plus the encounter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetail {
    pub demographics: Demographics,
    pub encounters: Vec<EncounterSummary>,
}

/// One encounter row on the patient page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterSummary {
    pub encounter_id: i64,
    pub encounter_date: String,
    pub encounter_name: String,
    pub visit_provider: VisitProvider,
    pub notes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitProvider {
    pub name: String,
    pub department: String,
}

/// Encounter detail: demographics plus the five tabbed collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterDetail {
    pub demographics: Demographics,
    pub diagnoses: Vec<Diagnosis>,
    pub procedures: Vec<Procedure>,
    pub imaging_reports: Vec<ImagingReport>,
    pub orders: Vec<OrderNote>,
    pub hno_notes: Vec<HnoNote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub name: String,
    pub description: String,
    pub source: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub order_id: i64,
    pub source: String,
    pub code: String,
    pub name: String,
    pub order_type: String,
    pub provider: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingReport {
    pub order_id: i64,
    pub specimen_taken_time: String,
    pub order_type: String,
    pub impression_date: String,
    pub note_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNote {
    pub order_id: i64,
    pub order_type: String,
    pub specimen_taken_time: String,
    pub contact_date: String,
    pub note_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HnoNote {
    pub note_num: i64,
    pub contact_date: String,
    pub note_type: String,
    pub note_text: String,
}
