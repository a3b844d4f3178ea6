#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::{BTreeMap, HashSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use typed_builder::TypedBuilder;

use crate::{
    constants::REPO_NAME_SEPARATOR,
    error::GradingError,
    grades::{GradeSpec, GradeSpecCatalog, GradeTable, SetOutcome},
    issues::{HookResults, Issue, authorize},
    notify::{Advisory, Notifier},
    types::StudentTeam,
};

/// Name of the repository a team works on for an assignment.
pub fn repo_name(team_name: &str, assignment: &str) -> String {
    format!("{team_name}{REPO_NAME_SEPARATOR}{assignment}")
}

/// A grade sheet cell that changed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct ChangeRecord {
    /// Student whose grade changed.
    #[tabled(rename = "Student")]
    pub student:    String,
    /// Assignment column.
    #[tabled(rename = "Assignment")]
    pub assignment: String,
    /// Symbol now in the cell.
    #[tabled(rename = "Grade")]
    pub symbol:     String,
    /// Who opened the grading issue.
    #[tabled(rename = "Graded by")]
    pub author:     String,
}

/// Change records grouped by grading author, authors in sorted order.
pub type NewGrades = BTreeMap<String, Vec<ChangeRecord>>;

/// The grade picked for one repository, before it is written.
#[derive(Debug)]
struct Selection<'a> {
    /// Team owning the repository.
    team:       &'a StudentTeam,
    /// Assignment the repository belongs to.
    assignment: &'a str,
    /// Winning grade spec.
    spec:       &'a GradeSpec,
    /// Author of the winning grading issue.
    author:     String,
}

/// Resolves grades for every team and assignment from listed issues.
///
/// Selection happens for all repositories before anything is written, so a
/// fatal error leaves the grade table as it was. Writes are then applied in
/// team-major order.
#[derive(TypedBuilder)]
pub struct Marker<'a> {
    /// Grade specs deciding what counts as a grading issue.
    catalog:     &'a GradeSpecCatalog,
    /// Listed issues per repository.
    results:     &'a HookResults,
    /// Teams to grade.
    teams:       &'a [StudentTeam],
    /// Assignments to grade.
    assignments: &'a [String],
    /// Usernames allowed to open grading issues.
    teachers:    &'a HashSet<String>,
}

impl<'a> Marker<'a> {
    /// Records grades into `table` and returns the cells that changed,
    /// grouped by the author of the grading issue.
    pub fn resolve(
        &self,
        table: &mut GradeTable<'_>,
        notifier: &mut impl Notifier,
    ) -> Result<NewGrades, GradingError> {
        table.check_assignments_present(self.assignments)?;
        table.check_students_present(self.teams.iter().flat_map(StudentTeam::members))?;

        let selections: Vec<Selection<'a>> = self
            .teams
            .iter()
            .cartesian_product(self.assignments)
            .map(|(team, assignment)| self.select(team, assignment, notifier))
            .filter_map_ok(|selection| selection)
            .collect::<Result<_, _>>()?;

        // Every targeted cell must hold a rankable symbol before the first write.
        for selection in &selections {
            for student in selection.team.members() {
                let current = table.get(student, selection.assignment)?;
                if self.catalog.spec_for_symbol(current).is_none() {
                    return Err(GradingError::UnknownSymbol {
                        symbol:     current.to_string(),
                        student:    student.clone(),
                        assignment: selection.assignment.to_string(),
                    });
                }
            }
        }

        let mut new_grades = NewGrades::new();
        for selection in selections {
            for student in selection.team.members() {
                match table.set_if_higher_precedence(
                    student,
                    selection.assignment,
                    selection.spec,
                )? {
                    SetOutcome::Changed { .. } => {
                        notifier.notify(Advisory::GradeRecorded {
                            student:    student.clone(),
                            assignment: selection.assignment.to_string(),
                            symbol:     selection.spec.symbol().to_string(),
                        });
                        new_grades
                            .entry(selection.author.clone())
                            .or_default()
                            .push(ChangeRecord {
                                student:    student.clone(),
                                assignment: selection.assignment.to_string(),
                                symbol:     selection.spec.symbol().to_string(),
                                author:     selection.author.clone(),
                            });
                    }
                    SetOutcome::Unchanged => {}
                    SetOutcome::Rejected(violation) => {
                        notifier.notify(Advisory::PrecedenceViolation(violation))
                    }
                }
            }
        }

        Ok(new_grades)
    }

    /// Picks the most significant authorized grading issue in the repository
    /// of `team` for `assignment`, if there is one.
    fn select(
        &self,
        team: &'a StudentTeam,
        assignment: &'a str,
        notifier: &mut impl Notifier,
    ) -> Result<Option<Selection<'a>>, GradingError> {
        let repo = repo_name(&team.name(), assignment);
        let Some(record) = self.results.list_issues(&repo)? else {
            notifier.notify(Advisory::MissingResults { repo });
            return Ok(None);
        };

        let issues = record
            .issues()
            .map_err(|e| GradingError::MalformedIssue {
                repo:   repo.clone(),
                reason: e.to_string(),
            })?;

        let catalog: &'a GradeSpecCatalog = self.catalog;
        let candidates: Vec<(usize, &'a GradeSpec, &Issue)> = issues
            .iter()
            .flat_map(|issue| {
                catalog
                    .matching(&issue.title)
                    .map(move |(index, spec)| (index, spec, issue))
            })
            .collect();

        let grading_issues = candidates
            .iter()
            .map(|(_, _, issue)| *issue)
            .unique_by(|issue| issue.number);
        let (authorized, unauthorized) = authorize(grading_issues, self.teachers);

        for issue in unauthorized {
            notifier.notify(Advisory::UnauthorizedIssue {
                repo:   repo.clone(),
                number: issue.number,
                author: issue.author.clone(),
            });
        }

        let authorized: HashSet<u64> = authorized.iter().map(|issue| issue.number).collect();
        let winner = candidates
            .into_iter()
            .filter(|(_, _, issue)| authorized.contains(&issue.number))
            .min_by_key(|(index, spec, issue)| {
                (
                    spec.priority(),
                    *index,
                    issue.created_at.is_none(),
                    issue.created_at,
                    issue.number,
                )
            });

        Ok(winner.map(|(_, spec, issue)| Selection {
            team,
            assignment,
            spec,
            author: issue.author.clone(),
        }))
    }
}
