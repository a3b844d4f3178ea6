#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Name of the grade sheet column holding student usernames.
pub const USERNAME_COLUMN: &str = "username";

/// Name of the hook result that lists a repository's issues. Also the
/// top-level key of the results file that carries listing metadata.
pub const LIST_ISSUES: &str = "list-issues";

/// Separator between team name and assignment name in repository names.
pub const REPO_NAME_SEPARATOR: &str = "-";

/// Separator between member usernames in a team name.
pub const TEAM_NAME_SEPARATOR: &str = "-";

/// Default location of the edit message.
pub const DEFAULT_EDIT_MSG_FILE: &str = "edit_msg.txt";

/// Prefix shared by every environment variable the command reads.
pub const ENV_PREFIX: &str = "CSVGRADES_";

/// Suffix of environment variables holding one grade spec each.
pub const GRADESPEC_ENV_SUFFIX: &str = "_GRADESPEC";
