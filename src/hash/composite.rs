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

use xxhash_rust::xxh3::xxh3_128_with_seed;

use crate::hash::DEFAULT_KEY_SEED;
use crate::value::Value;
use crate::value::ValueType;

/// A stable 128-bit key identifying one retained value.
///
/// Equal values of the same type always produce equal keys, across program
/// runs of the same binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct HashKey(pub(crate) u128);

/// Derives element keys for one element type.
///
/// The collaborator is constructed lazily, the first time a sketch learns
/// its element type, and refuses values of any other type afterwards.
#[derive(Debug, Clone)]
pub(crate) struct CompositeHash {
    ty: ValueType,
}

impl CompositeHash {
    /// Creates a key deriver for the given element type.
    pub fn new(ty: ValueType) -> Self {
        Self { ty }
    }

    /// Returns the element type this deriver was built for.
    pub fn value_type(&self) -> ValueType {
        self.ty
    }

    /// Derives the key for a value, or `None` if the value's type differs
    /// from the element type.
    pub fn make_key(&self, value: &Value) -> Option<HashKey> {
        if value.value_type() != self.ty {
            return None;
        }

        let key = match value {
            Value::Bool(b) => hash_bytes(&[*b as u8]),
            Value::Int(i) => hash_bytes(&i.to_le_bytes()),
            Value::Count(c) => hash_bytes(&c.to_le_bytes()),
            Value::Double(d) => hash_bytes(&d.to_bits().to_le_bytes()),
            Value::Str(s) => hash_bytes(s.as_bytes()),
        };
        Some(key)
    }
}

fn hash_bytes(bytes: &[u8]) -> HashKey {
    HashKey(xxh3_128_with_seed(bytes, DEFAULT_KEY_SEED))
}
