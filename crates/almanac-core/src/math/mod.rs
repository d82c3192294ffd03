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

//! # Math Primitives
//!
//! Half-open interval math for range translation.
//!
//! ## Submodules
//!
//! - `interval`: A generic `[start, end)` interval type with validation,
//!   predicates (intersection, adjacency, containment), set operations
//!   (intersection/union/difference) and overflow-checked shifting.
//! - `range_set`: An unordered collection of non-empty intervals with
//!   minimum extraction, point counting and adjacency coalescing.
//!
//! ## Motivation
//!
//! Splitting a range against a rule boundary is where off-by-one errors
//! creep in. With exclusive upper bounds, a split at `b` always produces
//! `[a, b)` and `[b, c)`, and the lengths of the pieces add up exactly.

pub mod interval;
pub mod range_set;
