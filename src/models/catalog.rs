use serde::Serialize;

/// How many days a purchased course stays usable.
pub const COURSE_VALIDITY_DAYS: i64 = 20;
/// How many attempts a fresh entitlement starts with.
pub const INITIAL_ATTEMPTS: i32 = 30;
/// The selection code that expands to both catalog courses.
pub const COMBO_CODE: &str = "combo";
/// The price charged for the combo selection.
pub const COMBO_PRICE: f64 = 799.0;

/// One course in the fixed catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogCourse {
    /// The course identifier.
    pub id: &'static str,
    /// The display name.
    pub name: &'static str,
    /// The subject code.
    pub subject: &'static str,
    /// The price for buying this course on its own.
    pub price: f64,
}

/// The fixed two-course catalog.
pub const CATALOG: [CatalogCourse; 2] = [
    CatalogCourse {
        id: "soft-skills",
        name: "Soft Skills Course",
        subject: "CSS",
        price: 499.0,
    },
    CatalogCourse {
        id: "language-skills",
        name: "Language Skills Course",
        subject: "CLS",
        price: 499.0,
    },
];

/// A course descriptor resolved from an order's selection code.
#[derive(Debug, Clone)]
pub struct ResolvedCourse {
    pub id: String,
    pub name: String,
    pub subject: String,
}

impl From<&CatalogCourse> for ResolvedCourse {
    fn from(course: &CatalogCourse) -> Self {
        Self {
            id: course.id.to_string(),
            name: course.name.to_string(),
            subject: course.subject.to_string(),
        }
    }
}

/// Looks up a catalog course by id.
pub fn catalog_course(id: &str) -> Option<&'static CatalogCourse> {
    CATALOG.iter().find(|course| course.id == id)
}

/// Resolves an order's selection code into course descriptors plus the
/// server-side price for recognized selections.
///
/// The combo code expands to both catalog courses sharing one order. An
/// unrecognized code passes through as a single generic entry with no catalog
/// price, so the caller falls back to the client-supplied amount.
pub fn resolve_selection(code: &str) -> (Vec<ResolvedCourse>, Option<f64>) {
    if code == COMBO_CODE {
        let courses = CATALOG.iter().map(ResolvedCourse::from).collect();
        return (courses, Some(COMBO_PRICE));
    }

    if let Some(course) = catalog_course(code) {
        return (vec![ResolvedCourse::from(course)], Some(course.price));
    }

    let passthrough = ResolvedCourse {
        id: code.to_string(),
        name: code.to_string(),
        subject: "OTHER".to_string(),
    };
    (vec![passthrough], None)
}
