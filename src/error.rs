#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use itertools::Itertools;

/// Errors raised while resolving grades.
///
/// Every variant is fatal for the run it occurs in. Precedence violations
/// are not part of this enum since they are recovered where they happen,
/// see [`crate::grades::PrecedenceViolation`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GradingError {
    /// A grade spec string does not follow `<PRIORITY>:<SYMBOL>:<REGEX>`.
    #[error("invalid grade spec format string: `{format}` ({reason})")]
    Format {
        /// The offending format string.
        format: String,
        /// What is wrong with it.
        reason: String,
    },
    /// Two grade specs in one catalog share a symbol.
    #[error("grade spec symbol `{0}` is used more than once")]
    DuplicateSymbol(String),
    /// A student or assignment is not in the grade sheet.
    #[error("{kind} `{key}` is missing from the grades file")]
    MissingKey {
        /// Either `student`, `assignment` or `column`.
        kind: &'static str,
        /// The key that could not be found.
        key:  String,
    },
    /// A grade sheet row does not have one cell per column.
    #[error("line {line} of the grades file has {cells} cells, expected {expected}")]
    RaggedRow {
        /// One-based line number in the grades file.
        line:     usize,
        /// Number of cells on that line.
        cells:    usize,
        /// Number of header columns.
        expected: usize,
    },
    /// One or more students are not in the grade sheet.
    #[error("student(s) {} missing from the grades file", .0.iter().join(", "))]
    MissingStudents(Vec<String>),
    /// A repository has hook results, but none of them lists its issues.
    #[error("hook results for {0} does not contain 'list-issues' result")]
    MissingRecord(String),
    /// A `list-issues` result holds something that is not an issue.
    #[error("malformed issue in hook results for {repo}: {reason}")]
    MalformedIssue {
        /// Repository whose results are malformed.
        repo:   String,
        /// Decoding error.
        reason: String,
    },
    /// A grade sheet cell holds a symbol no grade spec defines.
    #[error("grade `{symbol}` for {student} on {assignment} does not match any grade spec")]
    UnknownSymbol {
        /// The unrecognized symbol.
        symbol:     String,
        /// Student whose cell holds the symbol.
        student:    String,
        /// Assignment column of the cell.
        assignment: String,
    },
    /// The hook results carry no `list-issues` metadata entry.
    #[error("can't locate list-issues metainfo in hook results")]
    MissingMetadata,
    /// Issues were listed with a state filter other than `all`.
    #[error(
        "`list-issues` was run with state `{0}` instead of the --all flag. This may cause \
         grading issues to be missed. Re-run list-issues with the --all flag, or run this \
         command with --allow-other-states to record grades anyway."
    )]
    IssueStateNotAll(String),
}
