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

//! Almanac engine: range translation across sequential stages
//!
//! Pushes whole sets of half-open integer ranges through an ordered list of
//! rule tables without enumerating individual values, then reports the
//! smallest reachable value.
//!
//! Core flow
//! - Load or build an `almanac_model::almanac::Almanac<T>` (or bare tables).
//! - Assemble a `pipeline::Pipeline` directly or via `pipeline::PipelineBuilder`.
//! - Run seed ranges with `Pipeline::run`, or single values with
//!   `Pipeline::run_points`.
//! - Optionally attach a monitor to observe every split.
//!
//! Design highlights
//! - Work-list splitting: each pending interval meets at most one rule per
//!   step; uncovered remainders are pushed back and retried.
//! - Checked arithmetic: an offset that leaves `T` aborts the run with
//!   `PipelineError::OffsetOverflow` instead of wrapping.
//! - Monitors observe only; the result is the same with or without them.
//!
//! Module map
//! - `translate`: single-stage splitting and the `TranslateRanges` trait.
//! - `pipeline`: stage composition, minimum extraction and the builder.
//! - `monitor`: translation monitors (log, composite, no-op).
//! - `result`: run outcomes with statistics.
//! - `stats`: lightweight counters/timing.
//! - `error`: runtime failures.

pub mod error;
pub mod monitor;
pub mod pipeline;
pub mod result;
pub mod stats;
pub mod translate;
