#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::HashSet;

use anyhow::Result;

use crate::{
    config::RecordConfig,
    file::{read_grades_file, read_results_file, write_edit_msg, write_grades_file},
    grades::{GradeSpecCatalog, GradeTable},
    marker::{Marker, NewGrades},
    notify::Notifier,
    report::format_edit_msg,
};

/// Records grades from listed grading issues into the grades file.
///
/// When at least one cell changed, the edit message is written first and
/// the grades file is rewritten after it. Otherwise neither file is touched.
pub fn record_grades(config: &RecordConfig, notifier: &mut impl Notifier) -> Result<NewGrades> {
    let catalog = GradeSpecCatalog::build(&config.grade_specs)?;

    let results = read_results_file(&config.hook_results_file)?;
    results.check_issue_state(config.allow_other_states)?;

    let (headers, rows) = read_grades_file(&config.grades_file)?;
    let mut table = GradeTable::new(headers, rows, &catalog)?;

    let teachers: HashSet<String> = config.teachers.iter().cloned().collect();
    let new_grades = Marker::builder()
        .catalog(&catalog)
        .results(&results)
        .teams(&config.teams)
        .assignments(&config.assignments)
        .teachers(&teachers)
        .build()
        .resolve(&mut table, notifier)?;

    match format_edit_msg(&new_grades, &config.assignments) {
        Some(msg) => {
            write_edit_msg(&config.edit_msg_file, &msg)?;
            write_grades_file(&config.grades_file, &table)?;
            tracing::info!(
                "Wrote edit message to {}",
                config.edit_msg_file.display()
            );
        }
        None => tracing::warn!("No new grades reported"),
    }

    Ok(new_grades)
}
