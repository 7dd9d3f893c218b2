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

//! # Top-K Frequent Elements Sketch
//!
//! A probabilistic sketch for tracking the most frequent elements of a data
//! stream in bounded space, based on the Metwally-Agrawal-Abbadi
//! "Space-Saving" algorithm. The sketch observes typed values, keeps a
//! conservative count estimate with a per-element error bound, supports
//! merging sketches built over compatible streams, and serializes to a
//! portable byte image.
//!
//! See the [`topk`] module for the algorithm overview and guarantees.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod error;
pub mod topk;
pub mod value;

mod codec;
mod hash;
