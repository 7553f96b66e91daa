//! Row reshaping: raw result rows into canonical view models.
//!
//! Pure functions, no I/O. Source-schema column names map onto the
//! UI-oriented field names here and nowhere else. Null scalars become
//! empty strings, absent child collections are already empty vecs by the
//! time they arrive (the queries `COALESCE` to `'[]'`), and note bodies are
//! reduced to plain text on the way through so nothing downstream ever
//! holds raw markup.

use crate::format::compose_zip;
use crate::record::rows::{
    DemographicsRow, EncounterDetailRow, PatientDetailRow, PatientListRow, RawDiagnosis,
    RawEncounter, RawHnoNote, RawImagingReport, RawOrderNote, RawProcedure,
};
use crate::record::view::{
    Demographics, Diagnosis, EncounterDetail, EncounterSummary, HnoNote, ImagingReport, OrderNote,
    PatientDetail, PatientSummary, Procedure, VisitProvider,
};
use crate::sanitise::note_text_plain;

pub fn demographics(row: DemographicsRow) -> Demographics {
    Demographics {
        id: row.patient_num,
        dob: row
            .birth_date_shifted
            .map(|d| d.to_string())
            .unwrap_or_default(),
        sex: row.gender_identity.unwrap_or_default(),
        race: row.race.unwrap_or_default(),
        ethnicity: row.ethnicity.unwrap_or_default(),
        zip: compose_zip(
            row.state_c.as_deref().unwrap_or_default(),
            row.zip3.as_deref().unwrap_or_default(),
        ),
        pcp: row.pcp_provider_name.unwrap_or_default(),
    }
}

pub fn patient_summary(row: PatientListRow) -> PatientSummary {
    PatientSummary {
        demographics: demographics(row.demographics),
        encounters: row.encounter_count,
    }
}

pub fn patient_list(rows: Vec<PatientListRow>) -> Vec<PatientSummary> {
    rows.into_iter().map(patient_summary).collect()
}

pub fn patient_detail(row: PatientDetailRow) -> PatientDetail {
    PatientDetail {
        demographics: demographics(row.demographics),
        encounters: row.encounters.0.into_iter().map(encounter_summary).collect(),
    }
}

pub fn encounter_detail(row: EncounterDetailRow) -> EncounterDetail {
    EncounterDetail {
        demographics: demographics(row.demographics),
        diagnoses: row.diagnoses.0.into_iter().map(diagnosis).collect(),
        procedures: row.procedures.0.into_iter().map(procedure).collect(),
        imaging_reports: row
            .imaging_reports
            .0
            .into_iter()
            .map(imaging_report)
            .collect(),
        orders: row.orders.0.into_iter().map(order_note).collect(),
        hno_notes: row.hno_notes.0.into_iter().map(hno_note).collect(),
    }
}

fn encounter_summary(raw: RawEncounter) -> EncounterSummary {
    EncounterSummary {
        encounter_id: raw.encounter_num,
        encounter_date: raw.contact_date.unwrap_or_default(),
        encounter_name: raw.enc_type_name.unwrap_or_default(),
        visit_provider: VisitProvider {
            name: raw.visit_provider_name.unwrap_or_default(),
            department: raw.department_name.unwrap_or_default(),
        },
        notes: raw.note_count,
    }
}

fn diagnosis(raw: RawDiagnosis) -> Diagnosis {
    Diagnosis {
        name: raw.dx_name.unwrap_or_default(),
        description: raw.dx_type.unwrap_or_default(),
        source: raw.dx_source.unwrap_or_default(),
        date: raw.dx_date.unwrap_or_default(),
    }
}

fn procedure(raw: RawProcedure) -> Procedure {
    Procedure {
        order_id: raw.order_proc_id,
        source: raw.proc_source.unwrap_or_default(),
        code: raw.proc_code.unwrap_or_default(),
        name: raw.proc_name.unwrap_or_default(),
        order_type: raw.order_type.unwrap_or_default(),
        provider: raw.provider_name.unwrap_or_default(),
    }
}

fn imaging_report(raw: RawImagingReport) -> ImagingReport {
    ImagingReport {
        order_id: raw.order_proc_id,
        specimen_taken_time: raw.specimen_taken_time.unwrap_or_default(),
        order_type: raw.order_type.unwrap_or_default(),
        impression_date: raw.impression_date.unwrap_or_default(),
        note_text: note_text_plain(&raw.note_text.unwrap_or_default()),
    }
}

fn order_note(raw: RawOrderNote) -> OrderNote {
    OrderNote {
        order_id: raw.order_proc_id,
        order_type: raw.order_type.unwrap_or_default(),
        specimen_taken_time: raw.specimen_taken_time.unwrap_or_default(),
        contact_date: raw.contact_date.unwrap_or_default(),
        note_text: note_text_plain(&raw.note_text.unwrap_or_default()),
    }
}

fn hno_note(raw: RawHnoNote) -> HnoNote {
    HnoNote {
        note_num: raw.note_num,
        contact_date: raw.contact_date.unwrap_or_default(),
        note_type: raw.note_type.unwrap_or_default(),
        note_text: note_text_plain(&raw.note_text.unwrap_or_default()),
    }
}
