#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::{BTreeSet, HashMap};

use super::spec::{GradeSpec, GradeSpecCatalog};
use crate::{constants::USERNAME_COLUMN, error::GradingError};

/// A refused attempt to replace a grade with a less significant one.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "refusing to overwrite {current} (priority {current_priority}) with {candidate} (priority \
     {candidate_priority}) for {student} on {assignment}"
)]
pub struct PrecedenceViolation {
    /// Student whose cell was targeted.
    pub student:            String,
    /// Assignment column of the cell.
    pub assignment:         String,
    /// Symbol currently in the cell.
    pub current:            String,
    /// Priority of the current symbol.
    pub current_priority:   u32,
    /// Symbol that was refused.
    pub candidate:          String,
    /// Priority of the refused symbol.
    pub candidate_priority: u32,
}

/// What a call to [`GradeTable::set_if_higher_precedence`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// The cell now holds the candidate symbol.
    Changed {
        /// Symbol the cell held before.
        previous: String,
    },
    /// The cell already held the candidate symbol.
    Unchanged,
    /// The cell holds a more significant grade and was left alone.
    Rejected(PrecedenceViolation),
}

impl SetOutcome {
    /// Whether the cell value changed.
    pub fn is_changed(&self) -> bool {
        matches!(self, SetOutcome::Changed { .. })
    }
}

/// An in-memory grade sheet: one header row and one row per student.
///
/// Row and column indices are built once when the table is created. Writes
/// go through [`GradeTable::set_if_higher_precedence`], which never lets a
/// less significant grade replace a more significant one.
#[derive(Debug, Clone)]
pub struct GradeTable<'c> {
    /// Column names, in file order.
    headers:      Vec<String>,
    /// Body rows, each as long as `headers`.
    rows:         Vec<Vec<String>>,
    /// Username -> row number.
    student_rows: HashMap<String, usize>,
    /// Column name -> column number.
    columns:      HashMap<String, usize>,
    /// Catalog used to rank the symbols already in the table.
    catalog:      &'c GradeSpecCatalog,
}

impl<'c> GradeTable<'c> {
    /// Creates a table from trimmed headers and rows.
    ///
    /// Fails if there is no `username` column or a row is not as wide as the
    /// header row. If a username appears twice, the last row wins.
    pub fn new(
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        catalog: &'c GradeSpecCatalog,
    ) -> Result<Self, GradingError> {
        let columns: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();

        let username_col = *columns
            .get(USERNAME_COLUMN)
            .ok_or_else(|| GradingError::MissingKey {
                kind: "column",
                key:  USERNAME_COLUMN.to_string(),
            })?;

        if let Some((i, _)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(GradingError::RaggedRow {
                line:     i + 2,
                cells:    rows[i].len(),
                expected: headers.len(),
            });
        }

        let student_rows = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row[username_col].clone(), i))
            .collect();

        Ok(Self {
            headers,
            rows,
            student_rows,
            columns,
            catalog,
        })
    }

    /// Returns the header row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the body rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the catalog symbols are ranked by.
    pub fn catalog(&self) -> &'c GradeSpecCatalog {
        self.catalog
    }

    /// Resolves a cell position.
    fn position(&self, student: &str, assignment: &str) -> Result<(usize, usize), GradingError> {
        let row = *self
            .student_rows
            .get(student)
            .ok_or_else(|| GradingError::MissingKey {
                kind: "student",
                key:  student.to_string(),
            })?;
        let col = *self
            .columns
            .get(assignment)
            .ok_or_else(|| GradingError::MissingKey {
                kind: "assignment",
                key:  assignment.to_string(),
            })?;
        Ok((row, col))
    }

    /// Returns the symbol recorded for `student` on `assignment`.
    pub fn get(&self, student: &str, assignment: &str) -> Result<&str, GradingError> {
        let (row, col) = self.position(student, assignment)?;
        Ok(&self.rows[row][col])
    }

    /// Writes `candidate` into the cell unless the cell already holds a more
    /// significant grade.
    ///
    /// Equal priorities do not block a write. Writing the symbol a cell
    /// already holds is reported as [`SetOutcome::Unchanged`].
    pub fn set_if_higher_precedence(
        &mut self,
        student: &str,
        assignment: &str,
        candidate: &GradeSpec,
    ) -> Result<SetOutcome, GradingError> {
        let (row, col) = self.position(student, assignment)?;
        let cell = &mut self.rows[row][col];

        let current =
            self.catalog
                .spec_for_symbol(cell)
                .ok_or_else(|| GradingError::UnknownSymbol {
                    symbol:     cell.clone(),
                    student:    student.to_string(),
                    assignment: assignment.to_string(),
                })?;

        if current.outranks(candidate) {
            return Ok(SetOutcome::Rejected(PrecedenceViolation {
                student:            student.to_string(),
                assignment:         assignment.to_string(),
                current:            current.symbol().to_string(),
                current_priority:   current.priority(),
                candidate:          candidate.symbol().to_string(),
                candidate_priority: candidate.priority(),
            }));
        }

        if cell == candidate.symbol() {
            return Ok(SetOutcome::Unchanged);
        }

        let previous = std::mem::replace(cell, candidate.symbol().to_string());
        Ok(SetOutcome::Changed { previous })
    }

    /// Fails with every username that has no row, sorted.
    pub fn check_students_present<I, S>(&self, usernames: I) -> Result<(), GradingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let missing: BTreeSet<String> = usernames
            .into_iter()
            .filter(|u| !self.student_rows.contains_key(u.as_ref()))
            .map(|u| u.as_ref().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(GradingError::MissingStudents(missing.into_iter().collect()))
        }
    }

    /// Fails on the first assignment that has no column.
    pub fn check_assignments_present<I, S>(&self, assignments: I) -> Result<(), GradingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match assignments
            .into_iter()
            .find(|a| !self.columns.contains_key(a.as_ref()))
        {
            Some(a) => Err(GradingError::MissingKey {
                kind: "assignment",
                key:  a.as_ref().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Header and body rows with each column right-justified to its widest
    /// cell.
    pub fn justified_rows(&self) -> Vec<Vec<String>> {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                std::iter::once(&self.headers)
                    .chain(self.rows.iter())
                    .map(|row| row[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        std::iter::once(&self.headers)
            .chain(self.rows.iter())
            .map(|row| {
                row.iter()
                    .zip(&widths)
                    .map(|(cell, &width)| format!("{cell:>width$}"))
                    .collect()
            })
            .collect()
    }
}
