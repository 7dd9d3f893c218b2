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

mod composite;

pub(crate) use self::composite::CompositeHash;
pub(crate) use self::composite::HashKey;

/// The seed used when deriving element keys from values.
///
/// Choosing a seed is somewhat arbitrary; what matters is that it never
/// changes. Keys are a pure function of the element type, the value bytes,
/// and this seed, and both merging two sketches and deserializing a stored
/// image assume that the same value always maps to the same key. Once images
/// of this sketch have been stored, you are stuck with this seed.
pub(crate) const DEFAULT_KEY_SEED: u64 = 9001;
