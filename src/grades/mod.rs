#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Grade specifications and the catalog holding them.
pub mod spec;
/// The in-memory grade sheet.
pub mod table;

pub use spec::{GradeSpec, GradeSpecCatalog, NO_GRADE_PRIORITY};
pub use table::{GradeTable, PrecedenceViolation, SetOutcome};
