#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fs, path::Path};

use anyhow::{Context, Result, ensure};

use crate::{grades::GradeTable, issues::HookResults, types::StudentTeam};

/// Reads a results file written by the issue listing step.
pub fn read_results_file(path: &Path) -> Result<HookResults> {
    ensure!(path.is_file(), "no such file: {}", path.display());
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Could not read results file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Could not parse results file {}", path.display()))
}

/// Reads a grades CSV file into its header row and body rows, trimming every
/// cell.
pub fn read_grades_file(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    ensure!(path.is_file(), "no such file: {}", path.display());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Could not open grades file {}", path.display()))?;

    let mut records = reader.records();
    let headers = match records.next() {
        Some(record) => record
            .with_context(|| format!("Could not read header row of {}", path.display()))?
            .iter()
            .map(String::from)
            .collect(),
        None => anyhow::bail!("grades file {} is empty", path.display()),
    };

    let rows = records
        .map(|record| {
            record
                .map(|r| r.iter().map(String::from).collect())
                .with_context(|| format!("Could not read a row of {}", path.display()))
        })
        .collect::<Result<Vec<Vec<String>>>>()?;

    Ok((headers, rows))
}

/// Writes the grade table back as CSV, right-justifying each column.
pub fn write_grades_file(path: &Path, table: &GradeTable<'_>) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Could not open {} for writing", path.display()))?;
    for row in table.justified_rows() {
        writer
            .write_record(&row)
            .with_context(|| format!("Could not write to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Could not write to {}", path.display()))
}

/// Writes the edit message.
pub fn write_edit_msg(path: &Path, msg: &str) -> Result<()> {
    fs::write(path, msg).with_context(|| format!("Could not write edit message to {}", path.display()))
}

/// Reads a students file: one team per line, members separated by
/// whitespace. Blank lines are skipped.
pub fn read_students_file(path: &Path) -> Result<Vec<StudentTeam>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Could not read students file {}", path.display()))?;
    Ok(parse_teams(&contents))
}

/// Parses one team per line, members separated by whitespace.
pub fn parse_teams(contents: &str) -> Vec<StudentTeam> {
    contents
        .lines()
        .map(str::split_whitespace)
        .map(StudentTeam::new)
        .filter(|team| !team.members().is_empty())
        .collect()
}
