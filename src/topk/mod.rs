// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Top-K frequent elements sketch.
//!
//! # Overview
//!
//! This sketch implements the Space-Saving algorithm from "Efficient
//! Computation of Frequent and Top-k Elements in Data Streams" by Metwally,
//! Agrawal, and Abbadi, 2006.
//!
//! The sketch observes a stream of typed [`Value`](crate::value::Value)s and
//! retains at most a bounded number of distinct values, grouped into buckets
//! of equal estimated count. When the sketch is full, a new value replaces
//! the oldest element of the minimum-count bucket and inherits that count as
//! its error bound, so for every retained value the true occurrence count is
//! guaranteed to lie in `[count - epsilon, count]`. Any value whose true
//! frequency exceeds `n / capacity` (over a stream of `n` observations) is
//! guaranteed to be retained.
//!
//! This implementation provides the following capabilities:
//! * Observe single values online ([`TopkSketch::encounter`]).
//! * Query the top-k values, and per-value count and error bound.
//! * Merge itself with another sketch built over a compatible stream, with
//!   optional pruning back to capacity.
//! * Serialize to bytes, or deserialize from bytes, for storage or
//!   transmission.
//!
//! The sketch is a single-threaded data structure: callers that share one
//! across threads must serialize access.
//!
//! # Examples
//!
//! ```
//! # use topk_sketch::topk::TopkSketch;
//! # use topk_sketch::value::Value;
//! let mut sketch = TopkSketch::new(100);
//! for line in ["GET /", "GET /health", "GET /"] {
//!     sketch.encounter(Value::from(line)).unwrap();
//! }
//!
//! let top = sketch.top_k(1).unwrap();
//! assert_eq!(top[0], Value::from("GET /"));
//! ```

mod chain;
mod serialization;
mod sketch;

pub use self::sketch::Row;
pub use self::sketch::TopkSketch;
