#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::grades::PrecedenceViolation;

/// Something worth telling the user about that does not stop a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// A grading issue was opened by someone not allowed to grade.
    UnauthorizedIssue {
        /// Repository holding the issue.
        repo:   String,
        /// Issue number.
        number: u64,
        /// Who opened it.
        author: String,
    },
    /// A repository has no entry in the results file.
    MissingResults {
        /// Repository name that was looked up.
        repo: String,
    },
    /// A less significant grade was kept from replacing a recorded one.
    PrecedenceViolation(PrecedenceViolation),
    /// A grade was written into the grade sheet.
    GradeRecorded {
        /// Student who got the grade.
        student:    String,
        /// Assignment column.
        assignment: String,
        /// Symbol written.
        symbol:     String,
    },
}

/// Sink for [`Advisory`] events raised while resolving grades.
pub trait Notifier {
    /// Receives one event.
    fn notify(&mut self, advisory: Advisory);
}

/// Forwards advisories to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, advisory: Advisory) {
        match advisory {
            Advisory::UnauthorizedIssue {
                repo,
                number,
                author,
            } => tracing::warn!("Grading issue {repo}#{number} by unauthorized user {author}"),
            Advisory::MissingResults { repo } => {
                tracing::warn!("No hook results for {repo}")
            }
            Advisory::PrecedenceViolation(violation) => tracing::warn!("{violation}"),
            Advisory::GradeRecorded {
                student,
                assignment,
                symbol,
            } => tracing::info!("{symbol} for {student} on {assignment}"),
        }
    }
}

/// Keeps every advisory it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    /// Received advisories.
    pub advisories: Vec<Advisory>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, advisory: Advisory) {
        self.advisories.push(advisory);
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, advisory: Advisory) {
        (**self).notify(advisory);
    }
}
