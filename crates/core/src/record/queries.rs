//! Query builder: one parameterised statement per page.
//!
//! Identifiers reach this module only as validated [`PatientId`] /
//! [`EncounterId`] values and are bound as `$n` parameters; query text is
//! never assembled from request input. Child collections are attached as
//! `json_agg` arrays `COALESCE`d to `'[]'`, ordered inside the aggregate by
//! the category's date column (procedures carry no ordering).

use chartview_types::{EncounterId, PatientId};
use sqlx::PgPool;

use crate::error::{ChartError, ChartResult};
use crate::record::rows::{EncounterDetailRow, PatientDetailRow, PatientListRow};

/// Patient list: demographics joined to a per-patient encounter count.
/// Ordered by patient number so pagination is stable across requests.
const PATIENT_LIST_SQL: &str = r#"
SELECT d.patient_num, d.birth_date_shifted, d.gender_identity, d.race, d.ethnicity,
       d.state_c, d.zip3, d.pcp_provider_name,
       COALESCE(e.encounter_count, 0) AS encounter_count
FROM demographics d
LEFT JOIN (
    SELECT patient_num, COUNT(*) AS encounter_count
    FROM encounters
    GROUP BY patient_num
) e ON d.patient_num = e.patient_num
ORDER BY d.patient_num
"#;

/// Patient detail: demographic scalars plus the patient's encounters as a
/// JSON array, newest visit first, each carrying its H&O note count.
const PATIENT_DETAIL_SQL: &str = r#"
SELECT d.patient_num, d.birth_date_shifted, d.gender_identity, d.race, d.ethnicity,
       d.state_c, d.zip3, d.pcp_provider_name,
       COALESCE((
           SELECT json_agg(enc ORDER BY enc.contact_date DESC)
           FROM (
               SELECT e.encounter_num, e.contact_date, e.enc_type_name,
                      e.visit_provider_name, e.department_name,
                      (SELECT COUNT(*)
                       FROM hno_notes_deid n
                       WHERE n.patient_num = e.patient_num
                         AND n.encounter_num = e.encounter_num) AS note_count
               FROM encounters e
               WHERE e.patient_num = d.patient_num
           ) enc
       ), '[]'::json) AS encounters
FROM demographics d
WHERE d.patient_num = $1
"#;

/// Encounter detail: demographic scalars plus the five child categories as
/// JSON arrays scoped to the patient and encounter.
const ENCOUNTER_DETAIL_SQL: &str = r#"
SELECT d.patient_num, d.birth_date_shifted, d.gender_identity, d.race, d.ethnicity,
       d.state_c, d.zip3, d.pcp_provider_name,
       COALESCE((
           SELECT json_agg(dx ORDER BY dx.dx_date DESC)
           FROM (
               SELECT dx_name, dx_type, dx_source, dx_date
               FROM diagnosis
               WHERE patient_num = $1 AND encounter_num = $2
           ) dx
       ), '[]'::json) AS diagnoses,
       COALESCE((
           SELECT json_agg(pr)
           FROM (
               SELECT order_proc_id, proc_source, proc_code, proc_name,
                      order_type, provider_name
               FROM procedures
               WHERE patient_num = $1 AND encounter_num = $2
           ) pr
       ), '[]'::json) AS procedures,
       COALESCE((
           SELECT json_agg(im ORDER BY im.impression_date DESC)
           FROM (
               SELECT order_proc_id, specimen_taken_time, order_type,
                      impression_date, note_text
               FROM imaging_reports_deid
               WHERE patient_num = $1 AND encounter_num = $2
           ) im
       ), '[]'::json) AS imaging_reports,
       COALESCE((
           SELECT json_agg(o ORDER BY o.contact_date DESC)
           FROM (
               SELECT order_proc_id, order_type, specimen_taken_time,
                      contact_date, note_text
               FROM order_results_deid
               WHERE patient_num = $1 AND encounter_num = $2
           ) o
       ), '[]'::json) AS orders,
       COALESCE((
           SELECT json_agg(h ORDER BY h.contact_date DESC)
           FROM (
               SELECT note_num, contact_date, note_type, note_text
               FROM hno_notes_deid
               WHERE patient_num = $1 AND encounter_num = $2
           ) h
       ), '[]'::json) AS hno_notes
FROM demographics d
WHERE d.patient_num = $1
"#;

/// Fetches every patient row for the list page.
///
/// # Errors
///
/// Returns `ChartError::DataSource` if the query fails.
pub async fn list_patients(pool: &PgPool) -> ChartResult<Vec<PatientListRow>> {
    let rows = sqlx::query_as::<_, PatientListRow>(PATIENT_LIST_SQL)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Fetches the detail row for one patient.
///
/// # Errors
///
/// Returns `ChartError::NotFound` when no demographics row exists for
/// `patient`, and `ChartError::DataSource` if the query fails.
pub async fn patient_detail(pool: &PgPool, patient: PatientId) -> ChartResult<PatientDetailRow> {
    sqlx::query_as::<_, PatientDetailRow>(PATIENT_DETAIL_SQL)
        .bind(patient.as_i64())
        .fetch_optional(pool)
        .await?
        .ok_or(ChartError::NotFound)
}

/// Fetches the detail row for one encounter of one patient.
///
/// A patient with no rows in a child category still yields a row with
/// empty arrays; only a missing demographics row is `NotFound`.
///
/// # Errors
///
/// Returns `ChartError::NotFound` when no demographics row exists for
/// `patient`, and `ChartError::DataSource` if the query fails.
pub async fn encounter_detail(
    pool: &PgPool,
    patient: PatientId,
    encounter: EncounterId,
) -> ChartResult<EncounterDetailRow> {
    sqlx::query_as::<_, EncounterDetailRow>(ENCOUNTER_DETAIL_SQL)
        .bind(patient.as_i64())
        .bind(encounter.as_i64())
        .fetch_optional(pool)
        .await?
        .ok_or(ChartError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_queries_are_parameterised() {
        assert!(PATIENT_DETAIL_SQL.contains("= $1"));
        assert!(ENCOUNTER_DETAIL_SQL.contains("= $1"));
        assert!(ENCOUNTER_DETAIL_SQL.contains("= $2"));
        for sql in [PATIENT_LIST_SQL, PATIENT_DETAIL_SQL, ENCOUNTER_DETAIL_SQL] {
            assert!(!sql.contains("format!"));
            assert!(!sql.contains('{'));
        }
    }

    #[test]
    fn test_aggregates_default_to_empty_arrays() {
        assert_eq!(PATIENT_DETAIL_SQL.matches("'[]'::json").count(), 1);
        assert_eq!(ENCOUNTER_DETAIL_SQL.matches("'[]'::json").count(), 5);
    }

    #[test]
    fn test_category_orderings() {
        assert!(ENCOUNTER_DETAIL_SQL.contains("ORDER BY dx.dx_date DESC"));
        assert!(ENCOUNTER_DETAIL_SQL.contains("ORDER BY im.impression_date DESC"));
        assert!(ENCOUNTER_DETAIL_SQL.contains("ORDER BY o.contact_date DESC"));
        assert!(ENCOUNTER_DETAIL_SQL.contains("ORDER BY h.contact_date DESC"));
        // Procedures are aggregated without an ordering.
        assert!(!ENCOUNTER_DETAIL_SQL.contains("json_agg(pr ORDER BY"));
    }
}
