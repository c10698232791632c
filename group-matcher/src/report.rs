use std::fmt;
use std::time::Duration;

use indexmap::IndexSet;

use crate::groups::Grouping;

pub const SEPARATOR: &str = "================================================================";

/// The textual grouping report.
///
/// ```text
/// Number of groups containing more than 1 string: 1
/// Group 1:
/// "";"2";""
/// "3";"2";""
/// Group 2:
/// "1";"";""
/// ================================================================
/// Number of groups: 2
/// ```
pub struct Report<'a> {
    grouping: &'a Grouping,
    lines: &'a IndexSet<String>,
    elapsed: Option<Duration>,
}

impl<'a> Report<'a> {
    pub fn new(grouping: &'a Grouping, lines: &'a IndexSet<String>) -> Self {
        Self {
            grouping,
            lines,
            elapsed: None,
        }
    }

    /// Appends a `Done in ...` line with the given wall-clock time.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }
}

pub fn done_in(elapsed: Duration) -> String {
    format!("Done in {:.3} seconds!", elapsed.as_secs_f64())
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Number of groups containing more than 1 string: {}",
            self.grouping.first_singleton()
        )?;

        for (n, group) in self.grouping.groups().iter().enumerate() {
            writeln!(f, "Group {}:", n + 1)?;
            for &member in group.members() {
                // Member indices are record indices into `lines`
                let line = self.lines.get_index(member).ok_or(fmt::Error)?;
                writeln!(f, "{line}")?;
            }
        }

        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "Number of groups: {}", self.grouping.len())?;

        if let Some(elapsed) = self.elapsed {
            writeln!(f, "{}", done_in(elapsed))?;
        }
        Ok(())
    }
}
