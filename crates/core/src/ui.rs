//! Presentation-layer state.
//!
//! The pages are stateless with respect to data: everything the UI owns
//! (which tab is active, which sections are expanded, which page of the
//! patient list is showing) round-trips through query parameters. These
//! types model that state as pure values so the behaviour is testable
//! without a server.

/// Rows shown by a collapsed list section before the expand toggle.
pub const SECTION_ROW_PREFIX: usize = 5;

/// Expand/collapse state for one list section.
///
/// A collapsed section shows a fixed prefix of its sequence; expanding
/// shows the whole sequence. The toggle is idempotent: collapsing after
/// expanding returns to the same prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowLimit {
    expanded: bool,
}

impl RowLimit {
    pub fn new(expanded: bool) -> Self {
        Self { expanded }
    }

    pub fn is_expanded(self) -> bool {
        self.expanded
    }

    /// Number of rows visible out of `total`.
    pub fn visible_of(self, total: usize) -> usize {
        if self.expanded {
            total
        } else {
            total.min(SECTION_ROW_PREFIX)
        }
    }

    pub fn toggled(self) -> Self {
        Self {
            expanded: !self.expanded,
        }
    }
}

/// Fixed-size pagination over the full patient sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
}

impl Pagination {
    /// `page_size` of zero is treated as one; `CoreConfig` rejects zero
    /// before it can reach here.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(self) -> usize {
        self.page_size
    }

    pub fn total_pages(self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// The zero-indexed `page` of `items`. An out-of-range page index
    /// yields an empty slice.
    pub fn slice<'a, T>(self, items: &'a [T], page: usize) -> &'a [T] {
        let Some(start) = page.checked_mul(self.page_size) else {
            return &[];
        };
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}

/// The tabbed sections of the encounter detail page. Exactly one is active
/// at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Diagnosis,
    Procedures,
    ImagingReports,
    OrdersNotes,
    HnoNotes,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Diagnosis,
        Section::Procedures,
        Section::ImagingReports,
        Section::OrdersNotes,
        Section::HnoNotes,
    ];

    /// Stable identifier used in query parameters.
    pub fn slug(self) -> &'static str {
        match self {
            Section::Diagnosis => "diagnosis",
            Section::Procedures => "procedures",
            Section::ImagingReports => "imaging-reports",
            Section::OrdersNotes => "orders-notes",
            Section::HnoNotes => "hno-notes",
        }
    }

    /// Tab caption.
    pub fn label(self) -> &'static str {
        match self {
            Section::Diagnosis => "Diagnosis",
            Section::Procedures => "Procedures",
            Section::ImagingReports => "Imaging Reports",
            Section::OrdersNotes => "Orders & Notes",
            Section::HnoNotes => "H&O Notes",
        }
    }

    /// Resolves a query-parameter value; unknown or missing values fall
    /// back to the default tab.
    pub fn from_param(param: Option<&str>) -> Section {
        param
            .and_then(|slug| Section::ALL.into_iter().find(|s| s.slug() == slug))
            .unwrap_or_default()
    }
}

/// The set of expanded sections, as carried by the `expand` query
/// parameter (comma-separated slugs).
///
/// Switching tabs rewrites only the `tab` parameter, so expand state for
/// every section survives tab changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpandSet {
    slugs: Vec<String>,
}

impl ExpandSet {
    pub fn from_param(param: Option<&str>) -> Self {
        let mut slugs = Vec::new();
        for slug in param.unwrap_or_default().split(',') {
            let slug = slug.trim();
            if !slug.is_empty() && !slugs.iter().any(|s| s == slug) {
                slugs.push(slug.to_owned());
            }
        }
        Self { slugs }
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.slugs.iter().any(|s| s == slug)
    }

    pub fn row_limit(&self, slug: &str) -> RowLimit {
        RowLimit::new(self.contains(slug))
    }

    /// Returns the set with `slug`'s membership flipped; other members are
    /// untouched.
    pub fn toggled(&self, slug: &str) -> Self {
        let mut slugs = self.slugs.clone();
        match slugs.iter().position(|s| s == slug) {
            Some(ix) => {
                slugs.remove(ix);
            }
            None => slugs.push(slug.to_owned()),
        }
        Self { slugs }
    }

    /// Query-parameter value, or `None` when nothing is expanded.
    pub fn to_param(&self) -> Option<String> {
        if self.slugs.is_empty() {
            None
        } else {
            Some(self.slugs.join(","))
        }
    }
}

/// Where in the record hierarchy the current path points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breadcrumb {
    PatientList,
    Patient(i64),
    Encounter { patient: i64, encounter: i64 },
}

impl Breadcrumb {
    /// Classifies a request path. Returns `None` for paths outside the
    /// patient-browsing routes.
    pub fn from_path(path: &str) -> Option<Breadcrumb> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        if segments.next() != Some("patients") {
            return None;
        }
        let patient = match segments.next() {
            None => return Some(Breadcrumb::PatientList),
            Some(seg) => seg.parse::<i64>().ok()?,
        };
        let encounter = match segments.next() {
            None => return Some(Breadcrumb::Patient(patient)),
            Some(seg) => seg.parse::<i64>().ok()?,
        };
        if segments.next().is_some() {
            return None;
        }
        Some(Breadcrumb::Encounter { patient, encounter })
    }

    /// Page heading under the trail. The list page carries no patient
    /// heading; patient and encounter pages show the patient number taken
    /// from the path.
    pub fn heading(&self) -> Option<String> {
        match self {
            Breadcrumb::PatientList => None,
            Breadcrumb::Patient(patient) | Breadcrumb::Encounter { patient, .. } => {
                Some(format!("Patient #{patient}"))
            }
        }
    }

    /// Trail entries as `(label, href)`; the current location has no href.
    pub fn trail(&self) -> Vec<(String, Option<String>)> {
        let mut items = vec![("Home".to_owned(), Some("/".to_owned()))];
        match self {
            Breadcrumb::PatientList => {
                items.push(("Patient List".to_owned(), None));
            }
            Breadcrumb::Patient(patient) => {
                items.push(("Patient List".to_owned(), Some("/patients".to_owned())));
                items.push((format!("Patient #{patient}"), None));
            }
            Breadcrumb::Encounter { patient, encounter } => {
                items.push(("Patient List".to_owned(), Some("/patients".to_owned())));
                items.push((
                    format!("Patient #{patient}"),
                    Some(format!("/patients/{patient}")),
                ));
                items.push((format!("Encounter #{encounter}"), None));
            }
        }
        items
    }
}
