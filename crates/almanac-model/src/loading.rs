// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Almanac loader.
//!
//! This module turns the line-oriented almanac text format into a validated
//! `Almanac`: a `seeds:` line, followed by one block per stage, each block
//! introduced by a `<name> map:` header and made of
//! `destination_start source_start length` rows.
//!
//! ```raw
//! seeds: 79 14 55 13
//!
//! seed-to-soil map:
//! 50 98 2
//! 52 50 48
//! ```
//!
//! Blank lines are separators and carry no meaning. Anything after a `#` is
//! a comment. Every error is reported with the 1-based line it was found on;
//! rule-level errors (empty rule, overlap) point at the offending row.
//!
//! The loader accepts any `BufRead`, file path, raw reader, or string slice.

use crate::{
    almanac::Almanac,
    error::FormatError,
    rule::RuleRow,
    table::{RuleTable, build_rule_table},
};
use num_traits::{PrimInt, Signed};
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};
use thiserror::Error;

const SEEDS_PREFIX: &str = "seeds:";
const HEADER_SUFFIX: &str = "map:";
const FIELDS_PER_RULE: usize = 3;

/// The error type for the almanac loading process.
#[derive(Debug, Error)]
pub enum AlmanacLoaderError {
    /// An I/O error occurred while reading the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A line of the input is malformed.
    #[error("line {line}: {source}")]
    Format {
        line: usize,
        #[source]
        source: FormatError,
    },
    /// The input as a whole is malformed (e.g. it has no seeds at all).
    #[error(transparent)]
    Almanac(#[from] FormatError),
}

impl AlmanacLoaderError {
    /// Returns the underlying format error, if there is one.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            Self::Io(_) => None,
            Self::Format { source, .. } => Some(source),
            Self::Almanac(e) => Some(e),
        }
    }

    /// Returns the line the error was found on, if it is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Format { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// A configurable loader for almanac text.
///
/// # Configuration
/// * `allow_empty_stages`: If false, a header followed by no rows is an error.
///   If true (default), such a stage is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlmanacLoader<T> {
    allow_empty_stages: bool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for AlmanacLoader<T> {
    fn default() -> Self {
        Self {
            allow_empty_stages: true,
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A stage whose header has been read but whose rows are still arriving.
struct PendingStage<T> {
    name: String,
    header_line: usize,
    rows: Vec<RuleRow<T>>,
    row_lines: Vec<usize>,
}

impl<T> AlmanacLoader<T>
where
    T: PrimInt + Signed + FromStr + Display,
{
    /// Creates a new `AlmanacLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether a stage without rows is accepted as the identity.
    #[inline]
    pub fn allow_empty_stages(mut self, yes: bool) -> Self {
        self.allow_empty_stages = yes;
        self
    }

    /// Loads an almanac from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Almanac<T>, AlmanacLoaderError> {
        let mut seeds: Option<Vec<T>> = None;
        let mut stages: Vec<RuleTable<T>> = Vec::new();
        let mut current: Option<PendingStage<T>> = None;

        for (index, line) in rdr.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let content = strip_comment(&line).trim();
            if content.is_empty() {
                continue;
            }

            if let Some(values) = content.strip_prefix(SEEDS_PREFIX) {
                if seeds.is_some() {
                    return Err(format_error(line_no, FormatError::DuplicateSeeds));
                }
                let parsed = values
                    .split_whitespace()
                    .map(parse_token::<T>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| format_error(line_no, e))?;
                seeds = Some(parsed);
                continue;
            }

            if let Some(header) = content.strip_suffix(HEADER_SUFFIX) {
                if seeds.is_none() {
                    return Err(format_error(line_no, FormatError::MissingSeeds));
                }
                let name = header
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| format_error(line_no, FormatError::MissingStageName))?;
                if let Some(done) = current.take() {
                    stages.push(self.finish_stage(done)?);
                }
                current = Some(PendingStage {
                    name: name.to_owned(),
                    header_line: line_no,
                    rows: Vec::new(),
                    row_lines: Vec::new(),
                });
                continue;
            }

            let Some(stage) = current.as_mut() else {
                return Err(format_error(line_no, FormatError::RuleOutsideStage));
            };
            stage
                .rows
                .push(parse_row(content).map_err(|e| format_error(line_no, e))?);
            stage.row_lines.push(line_no);
        }

        if let Some(done) = current.take() {
            stages.push(self.finish_stage(done)?);
        }

        let seeds = seeds.ok_or(FormatError::MissingSeeds)?;
        Ok(Almanac::new(seeds, stages))
    }

    /// Loads an almanac from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Almanac<T>, AlmanacLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an almanac from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Almanac<T>, AlmanacLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an almanac from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Almanac<T>, AlmanacLoaderError> {
        self.from_reader(s.as_bytes())
    }

    /// Validates a completed stage block and turns it into a table.
    fn finish_stage(&self, stage: PendingStage<T>) -> Result<RuleTable<T>, AlmanacLoaderError> {
        let PendingStage {
            name,
            header_line,
            rows,
            row_lines,
        } = stage;

        if rows.is_empty() && !self.allow_empty_stages {
            return Err(format_error(header_line, FormatError::EmptyStage { stage: name }));
        }

        build_rule_table(name, rows).map_err(|e| {
            let line = match &e {
                FormatError::InvalidRule { rule, .. } => row_lines[*rule],
                FormatError::OverlappingRules { second, .. } => row_lines[*second],
                _ => header_line,
            };
            format_error(line, e)
        })
    }
}

#[inline]
fn format_error(line: usize, source: FormatError) -> AlmanacLoaderError {
    AlmanacLoaderError::Format { line, source }
}

#[inline]
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_token<T: FromStr>(token: &str) -> Result<T, FormatError> {
    token.parse::<T>().map_err(|_| FormatError::InvalidNumber {
        token: token.to_owned(),
        type_name: std::any::type_name::<T>(),
    })
}

fn parse_row<T: FromStr>(content: &str) -> Result<RuleRow<T>, FormatError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    if tokens.len() != FIELDS_PER_RULE {
        return Err(FormatError::FieldCount {
            expected: FIELDS_PER_RULE,
            found: tokens.len(),
        });
    }
    Ok(RuleRow::new(
        parse_token(tokens[0])?,
        parse_token(tokens[1])?,
        parse_token(tokens[2])?,
    ))
}
