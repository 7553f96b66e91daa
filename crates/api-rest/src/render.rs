//! Server-side page rendering.
//!
//! Each page is a pure function of the reshaped view model plus the UI
//! state carried in the URL (active tab, expanded sections, page index,
//! open note). Every dynamic value passes through [`escape`]; note bodies
//! are already plain text by the time they get here and are escaped again
//! like everything else.

use chrono::NaiveDate;

use chartview_core::format::{age_display, long_date, short_date, slash_date};
use chartview_core::record::view::{
    Demographics, EncounterDetail, PatientDetail, PatientSummary,
};
use chartview_core::ui::{Breadcrumb, ExpandSet, Pagination, Section, SECTION_ROW_PREFIX};

use crate::auth::AuthContext;

/// Escapes a value for embedding in HTML text or attribute position.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Header state shared by every page: where we are and who is signed in.
pub struct Chrome<'a> {
    pub breadcrumb: Breadcrumb,
    pub auth: Option<&'a AuthContext>,
    pub sign_out_path: &'a str,
}

const STYLESHEET: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }
header { position: sticky; top: 0; border-bottom: 1px solid #e5e7eb; background: #fff; padding: 0.75rem 2.5%; }
nav.breadcrumb ol { list-style: none; display: flex; gap: 0.5rem; margin: 0; padding: 0; font-size: 0.75rem; }
nav.breadcrumb li + li::before { content: "\203A"; margin-right: 0.5rem; color: #6b7280; }
nav.breadcrumb a { color: #374151; text-decoration: none; }
header .identity { float: right; font-size: 0.75rem; color: #6b7280; }
header h2 { color: #2563eb; border-bottom: 2px solid #2563eb; width: fit-content; margin: 0.75rem 0 0; padding-bottom: 0.5rem; font-size: 1rem; }
main { max-width: 95%; margin: 0 auto; padding-bottom: 1.5rem; }
h1 { font-size: 1.5rem; padding: 1.5rem 0; }
.card { border: 1px solid #e5e7eb; border-radius: 0.5rem; padding: 1.5rem; margin: 1.75rem 0; }
.card h2 { text-transform: uppercase; font-size: 1rem; color: #1d4ed8; }
.blocks { display: grid; grid-template-columns: repeat(7, 1fr); margin-top: 1.25rem; }
.blocks .title { display: block; font-size: 0.875rem; color: #6b7280; }
.blocks .value { font-weight: 600; }
table { width: 100%; border-collapse: collapse; }
th { text-transform: uppercase; text-align: left; font-size: 0.75rem; color: #6b7280; padding: 0.75rem; }
td { border-top: 1px solid #f3f4f6; padding: 0.75rem; font-size: 0.875rem; }
td a { color: inherit; text-decoration: none; }
.badge { background: #f3f4f6; border-radius: 9999px; padding: 0.125rem 0.625rem; font-size: 0.75rem; font-weight: 600; }
.capitalize { text-transform: capitalize; }
.subtext { display: block; color: #6b7280; font-size: 0.75rem; }
.toggle { color: #2563eb; font-size: 0.875rem; display: block; padding: 1rem 0 0 1rem; text-decoration: none; }
.tabs { display: flex; gap: 0.25rem; padding: 0.25rem; background: #f3f4f6; border-radius: 0.375rem; width: fit-content; }
.tabs a { padding: 0.375rem 0.75rem; border-radius: 0.25rem; font-size: 0.875rem; color: #374151; text-decoration: none; }
.tabs a.active { background: #fff; font-weight: 600; }
.note-row { border-bottom: 1px solid #e5e7eb; padding: 1rem; font-size: 0.875rem; }
.note-row a { color: #1d4ed8; text-decoration: underline; }
.note-panel { border: 1px solid #e5e7eb; border-radius: 0.5rem; padding: 1.5rem; margin: 1.75rem 0; background: #f9fafb; }
.note-panel pre { white-space: pre-wrap; font-family: inherit; font-size: 0.875rem; }
.pagination { display: flex; justify-content: center; gap: 0.5rem; margin: 1.5rem 0; font-size: 0.875rem; }
.pagination a, .pagination span { padding: 0.5rem 0.75rem; border-radius: 0.375rem; color: #374151; text-decoration: none; }
.pagination .active { border: 1px solid #d1d5db; }
"#;

fn layout(title: &str, chrome: &Chrome, body: &str) -> String {
    let mut trail = String::new();
    for (label, href) in chrome.breadcrumb.trail() {
        match href {
            Some(href) => trail.push_str(&format!(
                "<li><a href=\"{href}\">{}</a></li>",
                escape(&label)
            )),
            None => trail.push_str(&format!("<li>{}</li>", escape(&label))),
        }
    }

    let identity = match chrome.auth {
        Some(ctx) => format!(
            "<span class=\"identity\">{} &middot; <a href=\"{}\">Sign out</a></span>",
            escape(&ctx.email),
            escape(chrome.sign_out_path)
        ),
        None => String::new(),
    };

    let heading = match chrome.breadcrumb.heading() {
        Some(heading) => format!("<h2>{}</h2>", escape(&heading)),
        None => String::new(),
    };

    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{title}</title><style>{STYLESHEET}</style></head><body>\
         <header>{identity}<nav class=\"breadcrumb\" aria-label=\"Breadcrumb\"><ol>{trail}</ol></nav>{heading}</header>\
         <main>{body}</main></body></html>",
        title = escape(title),
    )
}

/// Landing page; doubles as the sign-in destination for unauthenticated
/// requests.
pub fn home_page() -> String {
    let chrome = Chrome {
        breadcrumb: Breadcrumb::PatientList,
        auth: None,
        sign_out_path: "",
    };
    layout(
        "Patient Record Browser",
        &chrome,
        "<h1>Patient Record Browser</h1>\
         <p>Browse de-identified patient records. You will be asked to sign in \
         with your organisation account.</p>\
         <p><a href=\"/patients\">Browse patients</a></p>",
    )
}

/// Standalone error page for client errors and data-source failures.
pub fn error_page(title: &str, message: &str) -> String {
    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{title}</title><style>{STYLESHEET}</style></head><body>\
         <main><h1>{title}</h1><p>{message}</p>\
         <p><a href=\"/patients\">Back to patient list</a></p></main></body></html>",
        title = escape(title),
        message = escape(message),
    )
}

/// Page links for the pagination control: all pages when few, otherwise the
/// first page, a window around the current page, and the last page, with
/// `None` marking a gap.
pub fn page_links(current: usize, total: usize) -> Vec<Option<usize>> {
    if total <= 7 {
        return (0..total).map(Some).collect();
    }
    let mut links = Vec::new();
    let mut last: Option<usize> = None;
    for page in 0..total {
        let keep = page == 0 || page + 1 == total || page.abs_diff(current) <= 2;
        if !keep {
            continue;
        }
        if let Some(prev) = last {
            if page != prev + 1 {
                links.push(None);
            }
        }
        links.push(Some(page));
        last = Some(page);
    }
    links
}

fn pagination_nav(current: usize, total: usize) -> String {
    if total <= 1 {
        return String::new();
    }
    let mut nav = String::from("<nav class=\"pagination\">");
    if current > 0 {
        nav.push_str(&format!(
            "<a href=\"/patients?page={}\">&lt; Previous</a>",
            current - 1
        ));
    }
    for link in page_links(current, total) {
        match link {
            Some(page) if page == current => {
                nav.push_str(&format!("<span class=\"active\">{}</span>", page + 1));
            }
            Some(page) => {
                nav.push_str(&format!(
                    "<a href=\"/patients?page={page}\">{}</a>",
                    page + 1
                ));
            }
            None => nav.push_str("<span>&hellip;</span>"),
        }
    }
    if current + 1 < total {
        nav.push_str(&format!(
            "<a href=\"/patients?page={}\">Next &gt;</a>",
            current + 1
        ));
    }
    nav.push_str("</nav>");
    nav
}

/// The paginated patient list.
pub fn patient_list_page(
    patients: &[PatientSummary],
    page: usize,
    pagination: Pagination,
    today: NaiveDate,
    chrome: &Chrome,
) -> String {
    let total_pages = pagination.total_pages(patients.len());
    let mut rows = String::new();
    for patient in pagination.slice(patients, page) {
        let d = &patient.demographics;
        let plural = if patient.encounters == 1 { "" } else { "s" };
        rows.push_str(&format!(
            "<tr><td><a href=\"/patients/{id}\">#{id}</a></td>\
             <td>{dob}</td><td>{age}</td><td class=\"capitalize\">{sex}</td>\
             <td>{zip}</td>\
             <td><span class=\"badge\">{count} Encounter{plural}</span></td></tr>",
            id = d.id,
            dob = escape(&short_date(&d.dob)),
            age = escape(&age_display(&d.dob, today).unwrap_or_default()),
            sex = escape(&d.sex),
            zip = escape(&d.zip),
            count = patient.encounters,
        ));
    }

    let body = format!(
        "<h1>{count} Patients</h1>\
         <table><thead><tr><th>Patient ID</th><th>Date of Birth</th><th>Age</th>\
         <th>Gender</th><th>Zip Code</th><th>Encounters</th></tr></thead>\
         <tbody>{rows}</tbody></table>{nav}",
        count = patients.len(),
        nav = pagination_nav(page, total_pages),
    );
    layout("Patients", chrome, &body)
}

fn demographics_card(d: &Demographics, today: NaiveDate) -> String {
    let dob = format!(
        "{}({})",
        slash_date(&d.dob),
        age_display(&d.dob, today).unwrap_or_default()
    );
    let blocks = [
        ("Patient ID", format!("#{}", d.id), ""),
        ("DOB", dob, ""),
        ("Gender", d.sex.clone(), "capitalize"),
        ("Race", d.race.clone(), "capitalize"),
        ("Ethnicity", d.ethnicity.clone(), "capitalize"),
        ("Zip Code", d.zip.clone(), ""),
        ("Primary Care Provider", d.pcp.clone(), ""),
    ];
    let mut cells = String::new();
    for (title, value, class) in blocks {
        cells.push_str(&format!(
            "<div class=\"{class}\"><span class=\"title\">{title}</span>\
             <span class=\"value\">{}</span></div>",
            escape(&value),
        ));
    }
    format!(
        "<section class=\"card\"><h2>Patient Demographics</h2>\
         <div class=\"blocks\">{cells}</div></section>"
    )
}

fn patient_href(patient: i64, expand: &ExpandSet) -> String {
    match expand.to_param() {
        Some(param) => format!("/patients/{patient}?expand={param}"),
        None => format!("/patients/{patient}"),
    }
}

fn encounter_href(
    patient: i64,
    encounter: i64,
    tab: Section,
    expand: &ExpandSet,
    note: Option<usize>,
) -> String {
    let mut href = format!("/patients/{patient}/{encounter}?tab={}", tab.slug());
    if let Some(param) = expand.to_param() {
        href.push_str("&expand=");
        href.push_str(&param);
    }
    if let Some(ix) = note {
        href.push_str(&format!("&note={ix}"));
    }
    href
}

/// Expand slug for the encounter list on the patient page.
pub const ENCOUNTERS_SLUG: &str = "encounters";

fn toggle_link(total: usize, expanded: bool, href: &str) -> String {
    if total <= SECTION_ROW_PREFIX {
        return String::new();
    }
    let label = if expanded { "Show Less" } else { "View All" };
    format!("<a class=\"toggle\" href=\"{href}\">{label}</a>")
}

/// Patient detail: demographics plus the encounter list.
pub fn patient_page(
    detail: &PatientDetail,
    expand: &ExpandSet,
    today: NaiveDate,
    chrome: &Chrome,
) -> String {
    let patient = detail.demographics.id;
    let limit = expand.row_limit(ENCOUNTERS_SLUG);
    let visible = limit.visible_of(detail.encounters.len());

    let mut rows = String::new();
    for enc in &detail.encounters[..visible] {
        let href = encounter_href(patient, enc.encounter_id, Section::default(), &ExpandSet::default(), None);
        rows.push_str(&format!(
            "<tr><td><a href=\"{href}\">#{id}</a></td>\
             <td class=\"capitalize\">{name}</td>\
             <td>{provider}<span class=\"subtext\">{department} Department</span></td>\
             <td>{date}</td>\
             <td><span class=\"badge\">{notes} Notes</span></td></tr>",
            id = enc.encounter_id,
            name = escape(&enc.encounter_name),
            provider = escape(&enc.visit_provider.name),
            department = escape(&enc.visit_provider.department),
            date = escape(&long_date(&enc.encounter_date)),
            notes = enc.notes,
        ));
    }

    let toggle = toggle_link(
        detail.encounters.len(),
        limit.is_expanded(),
        &patient_href(patient, &expand.toggled(ENCOUNTERS_SLUG)),
    );

    let body = format!(
        "{card}<section class=\"card\"><h2>Encounters</h2>\
         <table><thead><tr><th>Encounter ID</th><th>Encounter Name</th>\
         <th>Visit Provider</th><th>Date &amp; Time</th><th>Encounter Notes</th></tr></thead>\
         <tbody>{rows}</tbody></table>{toggle}</section>",
        card = demographics_card(&detail.demographics, today),
    );
    layout(&format!("Patient #{patient}"), chrome, &body)
}

/// A note-bearing row flattened for the line-item sections.
struct NoteRow<'a> {
    title: &'a str,
    date: &'a str,
    body: &'a str,
}

fn note_rows<'a>(detail: &'a EncounterDetail, section: Section) -> Vec<NoteRow<'a>> {
    match section {
        Section::ImagingReports => detail
            .imaging_reports
            .iter()
            .map(|r| NoteRow {
                title: if r.order_type.is_empty() {
                    "Imaging Report"
                } else {
                    &r.order_type
                },
                date: &r.impression_date,
                body: &r.note_text,
            })
            .collect(),
        Section::OrdersNotes => detail
            .orders
            .iter()
            .map(|o| NoteRow {
                title: if o.order_type.is_empty() {
                    "Order"
                } else {
                    &o.order_type
                },
                date: &o.contact_date,
                body: &o.note_text,
            })
            .collect(),
        Section::HnoNotes => detail
            .hno_notes
            .iter()
            .map(|n| NoteRow {
                title: if n.note_type.is_empty() {
                    "Note"
                } else {
                    &n.note_type
                },
                date: &n.contact_date,
                body: &n.note_text,
            })
            .collect(),
        Section::Diagnosis | Section::Procedures => Vec::new(),
    }
}

fn diagnosis_table(detail: &EncounterDetail, visible: usize) -> String {
    let mut rows = String::new();
    for dx in &detail.diagnoses[..visible] {
        rows.push_str(&format!(
            "<tr><td>{name}</td><td>{description}</td><td>{source}</td><td>{date}</td></tr>",
            name = escape(&dx.name),
            description = escape(&dx.description),
            source = escape(&dx.source),
            date = escape(&short_date(&dx.date)),
        ));
    }
    format!(
        "<table><thead><tr><th>Diagnosis Name</th><th>Description</th>\
         <th>Source</th><th>Date of Diagnosis</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

fn procedures_table(detail: &EncounterDetail, visible: usize) -> String {
    let mut rows = String::new();
    for row in &detail.procedures[..visible] {
        rows.push_str(&format!(
            "<tr><td>#{id}</td><td>{name}</td><td>{code}</td><td>{order_type}</td>\
             <td>{source}</td><td>{provider}</td></tr>",
            id = row.order_id,
            name = escape(&row.name),
            code = escape(&row.code),
            order_type = escape(&row.order_type),
            source = escape(&row.source),
            provider = escape(&row.provider),
        ));
    }
    format!(
        "<table><thead><tr><th>Order ID</th><th>Procedure Name</th><th>Code</th>\
         <th>Order Type</th><th>Source</th><th>Provider</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

fn note_list(
    rows: &[NoteRow<'_>],
    visible: usize,
    patient: i64,
    encounter: i64,
    active: Section,
    expand: &ExpandSet,
) -> String {
    let mut out = String::new();
    for (ix, row) in rows[..visible].iter().enumerate() {
        let href = encounter_href(patient, encounter, active, expand, Some(ix));
        out.push_str(&format!(
            "<div class=\"note-row\"><a href=\"{href}\">{title}</a>, {date}</div>",
            title = escape(row.title),
            date = escape(&long_date(row.date)),
        ));
    }
    out
}

fn note_panel(
    rows: &[NoteRow<'_>],
    note: usize,
    patient: i64,
    encounter: i64,
    active: Section,
    expand: &ExpandSet,
) -> String {
    let Some(row) = rows.get(note) else {
        return String::new();
    };
    let close = encounter_href(patient, encounter, active, expand, None);
    format!(
        "<aside class=\"note-panel\"><h2>View Note</h2>\
         <p>{title}, {date}</p><pre>{body}</pre>\
         <a href=\"{close}\">Close</a></aside>",
        title = escape(row.title),
        date = escape(&long_date(row.date)),
        body = escape(row.body),
    )
}

/// Encounter detail: demographics, the five tabbed sections, and the note
/// panel when a note row is open.
pub fn encounter_page(
    patient: i64,
    encounter: i64,
    detail: &EncounterDetail,
    active: Section,
    expand: &ExpandSet,
    note: Option<usize>,
    today: NaiveDate,
    chrome: &Chrome,
) -> String {
    let mut tabs = String::from("<div class=\"tabs\">");
    for section in Section::ALL {
        let class = if section == active { " class=\"active\"" } else { "" };
        let href = encounter_href(patient, encounter, section, expand, None);
        tabs.push_str(&format!(
            "<a{class} href=\"{href}\">{}</a>",
            section.label()
        ));
    }
    tabs.push_str("</div>");

    let limit = expand.row_limit(active.slug());
    let rows = note_rows(detail, active);
    let (total, content) = match active {
        Section::Diagnosis => (
            detail.diagnoses.len(),
            diagnosis_table(detail, limit.visible_of(detail.diagnoses.len())),
        ),
        Section::Procedures => (
            detail.procedures.len(),
            procedures_table(detail, limit.visible_of(detail.procedures.len())),
        ),
        _ => (
            rows.len(),
            note_list(
                &rows,
                limit.visible_of(rows.len()),
                patient,
                encounter,
                active,
                expand,
            ),
        ),
    };

    let toggle = toggle_link(
        total,
        limit.is_expanded(),
        &encounter_href(patient, encounter, active, &expand.toggled(active.slug()), None),
    );

    let panel = match note {
        Some(ix) => note_panel(&rows, ix, patient, encounter, active, expand),
        None => String::new(),
    };

    let body = format!(
        "{card}{tabs}<section class=\"card\"><h2>{label}</h2>{content}{toggle}</section>{panel}",
        card = demographics_card(&detail.demographics, today),
        label = active.label(),
    );
    layout(
        &format!("Patient #{patient}, Encounter #{encounter}"),
        chrome,
        &body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartview_core::record::view::{
        Diagnosis, EncounterSummary, HnoNote, OrderNote, VisitProvider,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn demographics() -> Demographics {
        Demographics {
            id: 42,
            dob: "1980-06-15".into(),
            sex: "female".into(),
            race: "Asian".into(),
            ethnicity: "Not Hispanic or Latino".into(),
            zip: "MI481".into(),
            pcp: "Lee, Morgan".into(),
        }
    }

    fn chrome(breadcrumb: Breadcrumb) -> Chrome<'static> {
        Chrome {
            breadcrumb,
            auth: None,
            sign_out_path: "/oauth2/sign_out",
        }
    }

    fn summaries(count: usize) -> Vec<PatientSummary> {
        (0..count)
            .map(|ix| PatientSummary {
                demographics: Demographics {
                    id: ix as i64 + 1,
                    ..demographics()
                },
                encounters: 2,
            })
            .collect()
    }

    fn encounter_detail_fixture(orders: usize) -> EncounterDetail {
        EncounterDetail {
            demographics: demographics(),
            diagnoses: vec![Diagnosis {
                name: "Hypertension".into(),
                description: "High blood pressure".into(),
                source: "Problem List".into(),
                date: "2021-06-13".into(),
            }],
            procedures: vec![],
            imaging_reports: vec![],
            orders: (0..orders)
                .map(|ix| OrderNote {
                    order_id: ix as i64 + 1,
                    order_type: "Lab".into(),
                    specimen_taken_time: String::new(),
                    contact_date: "2021-06-13T16:05:00".into(),
                    note_text: "BP < 120 & stable".into(),
                })
                .collect(),
            hno_notes: vec![HnoNote {
                note_num: 9,
                contact_date: "2021-06-14T09:00:00".into(),
                note_type: "Progress Note".into(),
                note_text: "doing well".into(),
            }],
        }
    }

    #[test]
    fn test_escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_page_links_small_total_lists_every_page() {
        assert_eq!(
            page_links(0, 3),
            vec![Some(0), Some(1), Some(2)]
        );
    }

    #[test]
    fn test_page_links_windows_large_totals() {
        let links = page_links(0, 42);
        assert_eq!(links.first(), Some(&Some(0)));
        assert_eq!(links.last(), Some(&Some(41)));
        assert!(links.contains(&None));

        let links = page_links(20, 42);
        assert!(links.contains(&Some(18)));
        assert!(links.contains(&Some(22)));
        assert!(!links.contains(&Some(10)));
    }

    #[test]
    fn test_patient_list_page_slices_and_links() {
        let patients = summaries(20);
        let html = patient_list_page(
            &patients,
            0,
            Pagination::new(15),
            today(),
            &chrome(Breadcrumb::PatientList),
        );
        assert!(html.contains("20 Patients"));
        assert!(html.contains("href=\"/patients/1\""));
        assert!(html.contains("href=\"/patients/15\""));
        assert!(!html.contains("href=\"/patients/16\""));
        assert!(html.contains("href=\"/patients?page=1\""));
    }

    #[test]
    fn test_patient_list_second_page_has_remainder() {
        let patients = summaries(20);
        let html = patient_list_page(
            &patients,
            1,
            Pagination::new(15),
            today(),
            &chrome(Breadcrumb::PatientList),
        );
        assert!(html.contains("href=\"/patients/16\""));
        assert!(!html.contains("href=\"/patients/15\""));
    }

    #[test]
    fn test_patient_page_prefix_and_toggle() {
        let detail = PatientDetail {
            demographics: demographics(),
            encounters: (0..8)
                .map(|ix| EncounterSummary {
                    encounter_id: ix as i64 + 1,
                    encounter_date: "2021-06-13T16:05:00".into(),
                    encounter_name: "Office Visit".into(),
                    visit_provider: VisitProvider {
                        name: "Lee, Morgan".into(),
                        department: "Cardiology".into(),
                    },
                    notes: 1,
                })
                .collect(),
        };
        let html = patient_page(
            &detail,
            &ExpandSet::default(),
            today(),
            &chrome(Breadcrumb::Patient(42)),
        );
        assert!(html.contains("href=\"/patients/42/5?tab=diagnosis\""));
        assert!(!html.contains("href=\"/patients/42/6?tab=diagnosis\""));
        assert!(html.contains("View All"));
        assert!(html.contains("href=\"/patients/42?expand=encounters\""));

        let html = patient_page(
            &detail,
            &ExpandSet::from_param(Some("encounters")),
            today(),
            &chrome(Breadcrumb::Patient(42)),
        );
        assert!(html.contains("href=\"/patients/42/8?tab=diagnosis\""));
        assert!(html.contains("Show Less"));
        assert!(html.contains("href=\"/patients/42\""));
    }

    #[test]
    fn test_demographics_card_values() {
        let detail = PatientDetail {
            demographics: demographics(),
            encounters: vec![],
        };
        let html = patient_page(
            &detail,
            &ExpandSet::default(),
            today(),
            &chrome(Breadcrumb::Patient(42)),
        );
        assert!(html.contains("6/15/1980(43 yrs)"));
        assert!(html.contains("MI481"));
        assert!(html.contains("Lee, Morgan"));
    }

    #[test]
    fn test_encounter_page_tab_switch_preserves_expand() {
        let detail = encounter_detail_fixture(2);
        let expand = ExpandSet::from_param(Some("orders-notes"));
        let html = encounter_page(
            42,
            7,
            &detail,
            Section::Diagnosis,
            &expand,
            None,
            today(),
            &chrome(Breadcrumb::Encounter {
                patient: 42,
                encounter: 7,
            }),
        );
        assert!(html.contains("href=\"/patients/42/7?tab=procedures&expand=orders-notes\""));
        assert!(html.contains("href=\"/patients/42/7?tab=hno-notes&expand=orders-notes\""));
    }

    #[test]
    fn test_encounter_page_orders_prefix_and_note_links() {
        let detail = encounter_detail_fixture(8);
        let html = encounter_page(
            42,
            7,
            &detail,
            Section::OrdersNotes,
            &ExpandSet::default(),
            None,
            today(),
            &chrome(Breadcrumb::Encounter {
                patient: 42,
                encounter: 7,
            }),
        );
        assert!(html.contains("note=4"));
        assert!(!html.contains("note=5"));
        assert!(html.contains("View All"));
        assert!(html.contains("tab=orders-notes&expand=orders-notes"));
    }

    #[test]
    fn test_note_panel_renders_escaped_body() {
        let detail = encounter_detail_fixture(2);
        let html = encounter_page(
            42,
            7,
            &detail,
            Section::OrdersNotes,
            &ExpandSet::default(),
            Some(0),
            today(),
            &chrome(Breadcrumb::Encounter {
                patient: 42,
                encounter: 7,
            }),
        );
        assert!(html.contains("View Note"));
        assert!(html.contains("BP &lt; 120 &amp; stable"));
        assert!(html.contains("13th June 2021, 4:05pm"));
    }

    #[test]
    fn test_note_panel_out_of_range_index_is_ignored() {
        let detail = encounter_detail_fixture(2);
        let html = encounter_page(
            42,
            7,
            &detail,
            Section::OrdersNotes,
            &ExpandSet::default(),
            Some(99),
            today(),
            &chrome(Breadcrumb::Encounter {
                patient: 42,
                encounter: 7,
            }),
        );
        assert!(!html.contains("View Note"));
    }

    #[test]
    fn test_empty_sections_render_without_rows() {
        let detail = EncounterDetail {
            demographics: demographics(),
            diagnoses: vec![],
            procedures: vec![],
            imaging_reports: vec![],
            orders: vec![],
            hno_notes: vec![],
        };
        let html = encounter_page(
            42,
            7,
            &detail,
            Section::ImagingReports,
            &ExpandSet::default(),
            None,
            today(),
            &chrome(Breadcrumb::Encounter {
                patient: 42,
                encounter: 7,
            }),
        );
        assert!(html.contains("Imaging Reports"));
        assert!(!html.contains("<div class=\"note-row\""));
        assert!(!html.contains("View All"));
    }
}
