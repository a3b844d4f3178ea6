//! # csvgrades
//!
//! Records grades from grading issues into a CSV grade sheet.
//!
//! Teachers grade a student repository by opening an issue whose title
//! matches a grade spec such as `1:P:[Pp]ass`. Given the issues listed per
//! repository, this crate picks the most significant grading issue opened by
//! an authorized teacher and writes its symbol into the grade sheet, never
//! replacing a more significant grade that is already there. Every change
//! is collected into an edit message addressed to the teacher who graded.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Settings for the `record` command, from the command line and environment
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Errors raised while resolving grades
pub mod error;
/// Reading and writing the results, grades, students, and message files
pub mod file;
/// Grade specs and the grade sheet
pub mod grades;
/// Issues and the results of listing them
pub mod issues;
/// Picks a grade per repository and writes it into the grade sheet
pub mod marker;
/// Advisory events raised while resolving grades
pub mod notify;
/// The `record` command, from files in to files out
pub mod record;
/// Edit message and terminal tables
pub mod report;
/// Shared value types
pub mod types;

pub use error::GradingError;
pub use record::record_grades;
