use std::hash::{Hash, Hasher};

use chumsky::prelude::*;
use miette::Diagnostic;
use thiserror::Error;

/// Number of columns in a record of the default format.
pub const FIELD_COUNT: usize = 3;

/// A numeric field value.
///
/// Only finite numbers are representable and `-0.0` is folded into `0.0`, so two
/// values compare equal exactly when they are numerically equal. This is what
/// lets the value be used as a hash key.
#[derive(Debug, Clone, Copy)]
pub struct Value(f64);

impl Value {
    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // Folds -0.0 into 0.0
        Some(Self(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Parsed fields of one line. `None` marks an absent (empty) field.
pub type Fields = Vec<Option<Value>>;

#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
pub enum RecordError {
    #[error("wrong number of columns (should be {expected}, found {found}): {line}")]
    #[diagnostic(code(group_matcher::record::field_count))]
    FieldCount {
        expected: usize,
        found: usize,
        line: String,
    },

    #[error("column {column} is not a quoted token: {line}")]
    #[diagnostic(
        code(group_matcher::record::unquoted),
        help("every column must be wrapped in quotes, e.g. \"42\" or \"\"")
    )]
    Unquoted { column: usize, line: String },

    #[error("cannot format column {column} to a number ({content:?}): {line}")]
    #[diagnostic(
        code(group_matcher::record::not_numeric),
        help("quoted content must be empty or a finite decimal number")
    )]
    NotNumeric {
        column: usize,
        content: String,
        line: String,
    },
}

/// Describes how a raw line is split into quoted columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFormat {
    pub field_count: usize,
    pub separator: char,
    pub quote: char,
}

impl Default for RecordFormat {
    fn default() -> Self {
        Self {
            field_count: FIELD_COUNT,
            separator: ';',
            quote: '"',
        }
    }
}

/// A single quoted token, yielding the text between the quotes.
fn quoted<'a>(quote: char) -> impl Parser<'a, &'a str, &'a str, extra::Err<Rich<'a, char>>> {
    just(quote)
        .ignore_then(none_of(quote).repeated().to_slice())
        .then_ignore(just(quote))
        .then_ignore(end())
}

impl RecordFormat {
    /// Parses one raw line into exactly `field_count` optional values.
    ///
    /// Splitting keeps empty segments, so `"1";"2";` has three columns and the
    /// last one fails as unquoted rather than being silently dropped.
    pub fn parse(&self, line: &str) -> Result<Fields, RecordError> {
        let segments = line.split(self.separator).collect::<Vec<_>>();
        if segments.len() != self.field_count {
            return Err(RecordError::FieldCount {
                expected: self.field_count,
                found: segments.len(),
                line: line.to_string(),
            });
        }

        let token = quoted(self.quote);

        segments
            .into_iter()
            .enumerate()
            .map(|(i, segment)| {
                let column = i + 1;
                let content = token.parse(segment).into_result().map_err(|_| {
                    RecordError::Unquoted {
                        column,
                        line: line.to_string(),
                    }
                })?;

                if content.is_empty() {
                    return Ok(None);
                }

                content
                    .parse::<f64>()
                    .ok()
                    .and_then(Value::new)
                    .map(Some)
                    .ok_or_else(|| RecordError::NotNumeric {
                        column,
                        content: content.to_string(),
                        line: line.to_string(),
                    })
            })
            .collect()
    }
}
