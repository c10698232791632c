use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Fatal errors that abort a whole run.
#[derive(Debug, Error, Diagnostic)]
pub enum GroupingError {
    #[error("input file {} not found", path.display())]
    #[diagnostic(code(group_matcher::input_not_found))]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error while reading input file {}", path.display())]
    #[diagnostic(code(group_matcher::input_read))]
    InputRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing to output file {}", path.display())]
    #[diagnostic(
        code(group_matcher::output_write),
        help("the report is only put in place once fully written; check the output directory exists and is writable")
    )]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GroupingError {
    pub(crate) fn input(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::InputNotFound { path, source },
            _ => Self::InputRead { path, source },
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }
}
