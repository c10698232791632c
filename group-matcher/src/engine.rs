use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::{self, BufRead};

use indexmap::IndexSet;

use crate::dsu::Dsu;
use crate::groups::Grouping;
use crate::record::{Fields, RecordError, RecordFormat, Value};

/// Counters collected while feeding lines into a [`GroupingEngine`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub lines_read: usize,
    pub duplicates: usize,
    pub rejected: usize,
}

/// What happened to a well-formed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line became a new record with this index.
    Registered(usize),
    /// The exact same text was already registered.
    Duplicate,
}

/// Single-pass grouping of records that share a value in any column.
///
/// Edges between records are never stored. Each column keeps a map from value to
/// the first record that introduced it, and any later record carrying the same
/// value is unioned with that anchor.
#[derive(Debug)]
pub struct GroupingEngine {
    format: RecordFormat,
    /// Distinct raw lines in registration order. The position is the record index.
    lines: IndexSet<String>,
    /// Per column: value -> index of the first record holding it.
    first_seen: Vec<HashMap<Value, usize>>,
    dsu: Dsu,
    stats: EngineStats,
}

impl Default for GroupingEngine {
    fn default() -> Self {
        Self::new(RecordFormat::default())
    }
}

impl GroupingEngine {
    pub fn new(format: RecordFormat) -> Self {
        Self {
            format,
            lines: IndexSet::new(),
            first_seen: vec![HashMap::new(); format.field_count],
            dsu: Dsu::new(),
            stats: EngineStats::default(),
        }
    }

    pub fn format(&self) -> &RecordFormat {
        &self.format
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Raw text of every registered record, indexed by record index.
    pub fn lines(&self) -> &IndexSet<String> {
        &self.lines
    }

    /// Feeds a single raw line.
    ///
    /// Malformed lines are returned as errors and leave the engine untouched, so
    /// they never consume a record index.
    pub fn push_line(&mut self, line: &str) -> Result<LineOutcome, RecordError> {
        self.stats.lines_read += 1;

        let fields = match self.format.parse(line) {
            Ok(fields) => fields,
            Err(e) => {
                self.stats.rejected += 1;
                return Err(e);
            }
        };

        if self.lines.contains(line) {
            self.stats.duplicates += 1;
            return Ok(LineOutcome::Duplicate);
        }

        let (index, _) = self.lines.insert_full(line.to_string());
        let id = self.dsu.add();
        debug_assert_eq!(index, id);

        self.link_columns(index, &fields);
        Ok(LineOutcome::Registered(index))
    }

    fn link_columns(&mut self, index: usize, fields: &Fields) {
        for (column, value) in self.first_seen.iter_mut().zip(fields) {
            let Some(value) = value else {
                continue;
            };

            match column.entry(*value) {
                // The first record to introduce a value stays the anchor for it
                Entry::Occupied(anchor) => {
                    self.dsu.union(*anchor.get(), index);
                }
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
        }
    }

    /// Feeds every line of `reader`, logging and skipping the malformed ones.
    ///
    /// Only I/O errors abort ingestion.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn ingest<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            if let Err(e) = self.push_line(&line) {
                tracing::warn!(line = line_number + 1, "{e}");
            }
        }

        tracing::info!(
            lines_read = self.stats.lines_read,
            records = self.lines.len(),
            duplicates = self.stats.duplicates,
            rejected = self.stats.rejected,
            "ingestion finished"
        );
        Ok(())
    }

    /// Consumes the engine, producing the final groups alongside the record lines.
    pub fn finish(mut self) -> (Grouping, IndexSet<String>) {
        let grouping = Grouping::extract(&mut self.dsu);
        (grouping, self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use itertools::Itertools;

    fn engine_with(lines: &[&str]) -> GroupingEngine {
        let mut engine = GroupingEngine::default();
        engine
            .ingest(lines.join("\n").as_bytes())
            .expect("reading from memory cannot fail");
        engine
    }

    #[test]
    fn duplicates_are_dropped_by_text() {
        let mut engine = GroupingEngine::default();
        assert_eq!(Ok(LineOutcome::Registered(0)), engine.push_line(r#""1";"";"""#));
        assert_eq!(Ok(LineOutcome::Duplicate), engine.push_line(r#""1";"";"""#));
        // Same values, different text: a new record
        assert_eq!(
            Ok(LineOutcome::Registered(1)),
            engine.push_line(r#""1.0";"";"""#)
        );
        assert_eq!(2, engine.len());
        assert_eq!(1, engine.stats().duplicates);
    }

    #[test]
    fn rejected_lines_do_not_consume_an_index() {
        let mut engine = GroupingEngine::default();
        assert!(engine.push_line(r#""1";"2""#).is_err());
        assert!(engine.push_line(r#""abc";"";"""#).is_err());
        assert_eq!(Ok(LineOutcome::Registered(0)), engine.push_line(r#""1";"2";"3""#));
        assert_eq!(
            EngineStats {
                lines_read: 3,
                duplicates: 0,
                rejected: 2
            },
            engine.stats()
        );
    }

    #[test]
    fn first_introducer_stays_anchor() {
        let mut engine = engine_with(&[
            r#""5";"";"""#,
            r#""5";"";"""#,
            r#""5";"1";"""#,
            r#""5";"2";"""#,
        ]);
        assert_eq!(3, engine.len());
        assert_eq!(Some(&0), engine.first_seen[0].get(&Value::new(5.0).unwrap()));
        assert!(engine.dsu.same_set(0, 2));
        assert!(engine.dsu.same_set(1, 2));
    }

    #[test]
    fn one_record_bridges_two_groups_through_different_columns() {
        let mut engine = engine_with(&[r#""1";"";"""#, r#""";"2";"""#, r#""1";"2";"""#]);
        assert_eq!(1, engine.dsu.num_sets());
        assert!(engine.dsu.same_set(0, 1));

        let (grouping, _) = engine.finish();
        assert_eq!(1, grouping.len());
        assert_eq!(&[0, 1, 2], grouping.groups()[0].members());
    }

    #[test]
    fn values_only_match_within_the_same_column() {
        let engine = engine_with(&[r#""1";"";"""#, r#""";"1";"""#, r#""";"";"1""#]);
        assert_eq!(3, engine.dsu.num_sets());
    }

    #[test]
    fn records_sharing_a_value_share_a_group() {
        // Deterministic pseudo-random rows with plenty of collisions and blanks
        let rows = (0..200u64)
            .map(|i| {
                let cell = |seed: u64| {
                    let v = (i * seed + seed * 7) % 23;
                    if v % 5 == 0 {
                        String::new()
                    } else {
                        v.to_string()
                    }
                };
                format!(r#""{}";"{}";"{}""#, cell(31), cell(17), cell(13))
            })
            .collect::<Vec<_>>();
        let rows = rows.iter().map(String::as_str).collect::<Vec<_>>();

        let mut engine = engine_with(&rows);
        let format = *engine.format();
        let parsed = engine
            .lines()
            .iter()
            .map(|line| format.parse(line).unwrap())
            .collect::<Vec<_>>();

        for (a, b) in (0..parsed.len()).tuple_combinations() {
            let shares_value = parsed[a]
                .iter()
                .zip(&parsed[b])
                .any(|(x, y)| x.is_some() && x == y);
            if shares_value {
                assert!(engine.dsu.same_set(a, b), "records {a} and {b} share a value");
            }
        }
    }
}
