use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::constants::TEAM_NAME_SEPARATOR;

/// A team of students sharing one repository per assignment.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct StudentTeam {
    /// Usernames of the members, in the order they were given.
    members: Vec<String>,
}

impl StudentTeam {
    /// Creates a team from its members' usernames.
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the members.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// The team name: member usernames sorted and joined with `-`.
    pub fn name(&self) -> String {
        self.members.iter().sorted().join(TEAM_NAME_SEPARATOR)
    }
}

impl fmt::Display for StudentTeam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
