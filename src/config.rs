#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result, ensure};
use typed_builder::TypedBuilder;

use crate::{
    constants::{DEFAULT_EDIT_MSG_FILE, ENV_PREFIX, GRADESPEC_ENV_SUFFIX},
    file::read_students_file,
    types::StudentTeam,
};

/// Environment variable naming the results file.
const HOOK_RESULTS_FILE_VAR: &str = "CSVGRADES_HOOK_RESULTS_FILE";
/// Environment variable naming the grades file.
const GRADES_FILE_VAR: &str = "CSVGRADES_GRADES_FILE";
/// Environment variable naming the edit message file.
const EDIT_MSG_FILE_VAR: &str = "CSVGRADES_EDIT_MSG_FILE";
/// Environment variable listing teachers, comma separated.
const TEACHERS_VAR: &str = "CSVGRADES_TEACHERS";

/// Splits a comma separated list, dropping blank entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Settings taken from `CSVGRADES_*` environment variables (and `.env`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDefaults {
    /// From `CSVGRADES_HOOK_RESULTS_FILE`.
    hook_results_file: Option<PathBuf>,
    /// From `CSVGRADES_GRADES_FILE`.
    grades_file:       Option<PathBuf>,
    /// From `CSVGRADES_EDIT_MSG_FILE`.
    edit_msg_file:     Option<PathBuf>,
    /// From `CSVGRADES_TEACHERS`.
    teachers:          Vec<String>,
    /// From every `CSVGRADES_*_GRADESPEC`, in variable name order.
    grade_specs:       Vec<String>,
}

impl EnvDefaults {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Reads settings from `(name, value)` pairs; unrelated names are
    /// ignored.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .filter(|(name, _)| name.starts_with(ENV_PREFIX))
            .map(|(name, value)| (name, value.trim().to_string()))
            .filter(|(_, value)| !value.is_empty())
            .collect();

        let path = |name: &str| vars.get(name).map(PathBuf::from);

        Self {
            hook_results_file: path(HOOK_RESULTS_FILE_VAR),
            grades_file:       path(GRADES_FILE_VAR),
            edit_msg_file:     path(EDIT_MSG_FILE_VAR),
            teachers:          vars
                .get(TEACHERS_VAR)
                .map(|raw| split_list(raw))
                .unwrap_or_default(),
            grade_specs:       vars
                .iter()
                .filter(|(name, _)| name.ends_with(GRADESPEC_ENV_SUFFIX))
                .map(|(_, value)| value.clone())
                .collect(),
        }
    }

    /// Grade specs from `CSVGRADES_*_GRADESPEC` variables.
    pub fn grade_specs(&self) -> &[String] {
        &self.grade_specs
    }
}

/// Options for `record` as given on the command line. Anything left out
/// falls back to [`EnvDefaults`].
#[derive(Debug, Clone, Default)]
pub struct RecordArgs {
    /// Results file written by the issue listing step.
    pub hook_results_file:  Option<PathBuf>,
    /// Grades CSV file to update.
    pub grades_file:        Option<PathBuf>,
    /// Where to write the edit message.
    pub edit_msg_file:      Option<PathBuf>,
    /// Grade specs, `<PRIORITY>:<SYMBOL>:<REGEX>`.
    pub grade_specs:        Vec<String>,
    /// Usernames allowed to open grading issues.
    pub teachers:           Vec<String>,
    /// Teams, members separated by commas.
    pub students:           Vec<String>,
    /// File with one team per line.
    pub students_file:      Option<PathBuf>,
    /// Assignment (template repository) names.
    pub assignments:        Vec<String>,
    /// Accept results listed with a state other than `all`.
    pub allow_other_states: bool,
}

impl RecordArgs {
    /// Merges these options with `env` and checks that nothing required is
    /// missing.
    pub fn resolve(self, env: EnvDefaults) -> Result<RecordConfig> {
        let hook_results_file = self
            .hook_results_file
            .or(env.hook_results_file)
            .with_context(|| {
                format!("No results file given: pass --hook-results-file or set {HOOK_RESULTS_FILE_VAR}")
            })?;
        let grades_file = self
            .grades_file
            .or(env.grades_file)
            .with_context(|| {
                format!("No grades file given: pass --grades-file or set {GRADES_FILE_VAR}")
            })?;
        let edit_msg_file = self
            .edit_msg_file
            .or(env.edit_msg_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EDIT_MSG_FILE));

        let grade_specs = if self.grade_specs.is_empty() {
            env.grade_specs
        } else {
            self.grade_specs
        };
        ensure!(
            !grade_specs.is_empty(),
            "No grade specs given: pass --grade-specs or set {ENV_PREFIX}<NAME>{GRADESPEC_ENV_SUFFIX}"
        );

        let teachers = if self.teachers.is_empty() {
            env.teachers
        } else {
            self.teachers.iter().flat_map(|t| split_list(t)).collect()
        };
        ensure!(!teachers.is_empty(), "No teachers given: pass --teachers or set {TEACHERS_VAR}");

        let mut teams: Vec<StudentTeam> = self
            .students
            .iter()
            .map(|s| StudentTeam::new(split_list(s)))
            .filter(|team| !team.members().is_empty())
            .collect();
        if let Some(path) = &self.students_file {
            teams.extend(read_students_file(path)?);
        }
        ensure!(!teams.is_empty(), "No students given: pass --students or --students-file");

        ensure!(!self.assignments.is_empty(), "No assignments given: pass --assignments");

        Ok(RecordConfig::builder()
            .hook_results_file(hook_results_file)
            .grades_file(grades_file)
            .edit_msg_file(edit_msg_file)
            .grade_specs(grade_specs)
            .teachers(teachers)
            .teams(teams)
            .assignments(self.assignments)
            .allow_other_states(self.allow_other_states)
            .build())
    }
}

/// Everything `record` needs, fully resolved.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct RecordConfig {
    /// Results file written by the issue listing step.
    pub hook_results_file:  PathBuf,
    /// Grades CSV file to update.
    pub grades_file:        PathBuf,
    /// Where to write the edit message.
    #[builder(default = PathBuf::from(DEFAULT_EDIT_MSG_FILE))]
    pub edit_msg_file:      PathBuf,
    /// Grade spec format strings.
    pub grade_specs:        Vec<String>,
    /// Usernames allowed to open grading issues.
    pub teachers:           Vec<String>,
    /// Teams to grade.
    pub teams:              Vec<StudentTeam>,
    /// Assignments to grade.
    pub assignments:        Vec<String>,
    /// Accept results listed with a state other than `all`.
    #[builder(default)]
    pub allow_other_states: bool,
}
