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

use crate::error::Error;
use crate::value::ValueType;

/// Serialization version.
pub(super) const SERIAL_VERSION: u8 = 1;

/// Type tag of an image whose sketch never learned an element type.
pub(super) const TYPE_TAG_NIL: u8 = 0;

const TYPE_TAG_BOOL: u8 = 1;
const TYPE_TAG_INT: u8 = 2;
const TYPE_TAG_COUNT: u8 = 3;
const TYPE_TAG_DOUBLE: u8 = 4;
const TYPE_TAG_STR: u8 = 5;

/// Returns the wire tag for an element type, [`TYPE_TAG_NIL`] when absent.
pub(super) fn type_tag(ty: Option<ValueType>) -> u8 {
    match ty {
        None => TYPE_TAG_NIL,
        Some(ValueType::Bool) => TYPE_TAG_BOOL,
        Some(ValueType::Int) => TYPE_TAG_INT,
        Some(ValueType::Count) => TYPE_TAG_COUNT,
        Some(ValueType::Double) => TYPE_TAG_DOUBLE,
        Some(ValueType::Str) => TYPE_TAG_STR,
    }
}

/// Decodes a wire tag back into an element type.
pub(super) fn type_from_tag(tag: u8) -> Result<Option<ValueType>, Error> {
    let ty = match tag {
        TYPE_TAG_NIL => None,
        TYPE_TAG_BOOL => Some(ValueType::Bool),
        TYPE_TAG_INT => Some(ValueType::Int),
        TYPE_TAG_COUNT => Some(ValueType::Count),
        TYPE_TAG_DOUBLE => Some(ValueType::Double),
        TYPE_TAG_STR => Some(ValueType::Str),
        other => return Err(Error::deserial(format!("invalid element type tag: {other}"))),
    };
    Ok(ty)
}
