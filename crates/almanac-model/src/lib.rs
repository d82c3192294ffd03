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

//! # Almanac Model
//!
//! **The domain model for multi-stage range translation.**
//!
//! This crate turns raw almanac data into validated, immutable structures the
//! translation engine (`almanac_engine`) can run without further checks.
//!
//! ## Architecture
//!
//! * **`index`**: `StageIndex`, a strongly typed position in the stage list.
//! * **`rule`**: `MappingRule` (a source interval plus a signed offset) and the
//!   raw `RuleRow` it is built from.
//! * **`table`**: `RuleTable`, one named stage whose rules never overlap, and
//!   the `build_rule_table` entry point.
//! * **`almanac`**: `Almanac`, the seed list plus the ordered stages.
//! * **`loading`**: `AlmanacLoader`, the line-oriented text loader.
//! * **`error`**: `FormatError`, every way the input can be malformed.
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: overlapping rules, empty rules and offset overflow are
//!     rejected while a table is built, never while it is being applied.
//! 2.  **Half-open everywhere**: a rule with source `s` and length `n` covers
//!     `[s, s + n)`; the value `s + n` passes through untouched.

pub mod almanac;
pub mod error;
pub mod index;
pub mod loading;
pub mod rule;
pub mod table;
