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

//! Input integrity errors.
//!
//! Every variant is raised while rule tables or an almanac are being built.
//! A `FormatError` is fatal for the whole build: no table is returned and no
//! partially validated stage list reaches the engine.

use thiserror::Error;

/// Why a single `(destination, source, length)` row cannot become a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleRowError {
    /// The length is zero or negative.
    #[error("length must be positive")]
    NonPositiveLength,
    /// `source + length` or `destination - source` does not fit the value type.
    #[error("rule bounds overflow the value type")]
    Overflow,
}

/// Malformed almanac data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A rule line did not contain the expected number of fields.
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    /// A token could not be parsed into the value type.
    #[error("could not parse token '{token}' as type {type_name}")]
    InvalidNumber {
        token: String,
        type_name: &'static str,
    },

    /// A row could not be turned into a rule.
    #[error("rule #{rule} of stage '{stage}' is invalid: {reason}")]
    InvalidRule {
        stage: String,
        rule: usize,
        #[source]
        reason: RuleRowError,
    },

    /// Two rules of the same stage claim the same source values.
    /// `first < second` are positions in the stage's rule list.
    #[error("rules #{first} and #{second} of stage '{stage}' overlap on {overlap}")]
    OverlappingRules {
        stage: String,
        first: usize,
        second: usize,
        overlap: String,
    },

    /// Range-mode seeds must come in `(start, length)` pairs.
    #[error("seed ranges need an even number of values, found {count}")]
    OddSeedCount { count: usize },

    /// A `(start, length)` seed pair has a negative length or overflows.
    #[error("seed pair #{pair} is not a valid range")]
    InvalidSeedRange { pair: usize },

    /// The input has no `seeds:` line before its first stage.
    #[error("missing 'seeds:' line")]
    MissingSeeds,

    /// The input declares seeds more than once.
    #[error("duplicate 'seeds:' line")]
    DuplicateSeeds,

    /// A stage header has no name in front of `map:`.
    #[error("stage header has no name")]
    MissingStageName,

    /// A rule line appeared before any stage header.
    #[error("rule line outside of any stage")]
    RuleOutsideStage,

    /// A stage has no rules while empty stages are disallowed.
    #[error("stage '{stage}' has no rules")]
    EmptyStage { stage: String },
}
