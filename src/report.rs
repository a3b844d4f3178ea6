#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use itertools::Itertools;
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};

use crate::{
    grades::GradeSpecCatalog,
    marker::{ChangeRecord, NewGrades},
};

/// Builds the edit message announcing new grades, one paragraph per grading
/// author.
///
/// Returns `None` when there is nothing to announce, in which case no
/// message should be written.
pub fn format_edit_msg<S: AsRef<str>>(new_grades: &NewGrades, assignments: &[S]) -> Option<String> {
    if new_grades.values().all(Vec::is_empty) {
        return None;
    }

    let assignments = assignments.iter().map(AsRef::as_ref).sorted().join(", ");
    let notifications = new_grades
        .iter()
        .filter(|(_, changes)| !changes.is_empty())
        .map(|(author, changes)| {
            let lines = changes
                .iter()
                .map(|c| format!("{} {} {}", c.student, c.assignment, c.symbol))
                .join("\n");
            format!("@{author}\n{lines}")
        })
        .join("\n\n");

    Some(format!("Report grades for {assignments}\n\n{notifications}"))
}

/// Renders every change as a terminal table.
pub fn summary_table(new_grades: &NewGrades) -> String {
    let changes: Vec<&ChangeRecord> = new_grades.values().flatten().collect();
    let total = changes.len();

    Table::new(changes)
        .with(Style::modern())
        .with(Panel::header("New grades"))
        .with(Panel::footer(format!("Total: {total}")))
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Modify::new(Rows::last()).with(Alignment::center()))
        .to_string()
}

/// Renders a catalog's grade specs, most significant first.
pub fn catalog_table(catalog: &GradeSpecCatalog) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Priority", "Symbol", "Title pattern"]);
    for spec in catalog.specs().iter().sorted_by_key(|s| s.priority()) {
        builder.push_record([
            spec.priority().to_string(),
            spec.symbol().to_string(),
            spec.pattern().unwrap_or_default().to_string(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::modern())
        .with(Panel::header("Grade specs"))
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
