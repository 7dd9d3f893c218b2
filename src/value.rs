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

//! Dynamically typed observation values.
//!
//! A sketch observes a stream of [`Value`]s and requires every retained value
//! to share one [`ValueType`]. The first observation establishes the type;
//! later observations and merge partners must match it.

use std::fmt;
use std::sync::Arc;

use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::error::Error;

/// The type descriptor of a [`Value`], used for homogeneity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// A boolean.
    Bool,
    /// A signed 64-bit integer.
    Int,
    /// An unsigned 64-bit counter.
    Count,
    /// A 64-bit floating-point number.
    Double,
    /// A UTF-8 string.
    Str,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Count => "count",
            ValueType::Double => "double",
            ValueType::Str => "string",
        };
        write!(f, "{name}")
    }
}

/// A single typed observation.
///
/// Cloning a `Value` is cheap: string payloads are reference-shared, so
/// retaining a value in a sketch never copies its data.
///
/// Two `Double` values compare equal iff their bit patterns are equal. This
/// matches the canonical byte encoding used for key derivation and the wire
/// form, and it is what makes `Eq` sound for this type (`NaN` equals itself).
///
/// # Examples
///
/// ```
/// # use topk_sketch::value::Value;
/// # use topk_sketch::value::ValueType;
/// let v = Value::from("apple");
/// assert_eq!(v.value_type(), ValueType::Str);
/// assert_eq!(v, Value::from("apple"));
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// An unsigned 64-bit counter.
    Count(u64),
    /// A 64-bit floating-point number.
    Double(f64),
    /// A UTF-8 string with reference-shared storage.
    Str(Arc<str>),
}

impl Value {
    /// Returns the type descriptor of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Count(_) => ValueType::Count,
            Value::Double(_) => ValueType::Double,
            Value::Str(_) => ValueType::Str,
        }
    }

    /// Writes the canonical payload of this value.
    ///
    /// The payload carries no type tag; the element type of the enclosing
    /// sketch image determines how it is read back.
    pub(crate) fn write_payload(&self, bytes: &mut SketchBytes) {
        match self {
            Value::Bool(b) => bytes.write_u8(*b as u8),
            Value::Int(i) => bytes.write_i64_le(*i),
            Value::Count(c) => bytes.write_u64_le(*c),
            Value::Double(d) => bytes.write_f64_le(*d),
            Value::Str(s) => {
                bytes.write_u32_le(s.len() as u32);
                bytes.write(s.as_bytes());
            }
        }
    }

    /// Reads a canonical payload of the given type.
    pub(crate) fn read_payload(ty: ValueType, cursor: &mut SketchSlice<'_>) -> Result<Value, Error> {
        let value = match ty {
            ValueType::Bool => match cursor
                .read_u8()
                .map_err(|_| Error::insufficient_data("bool payload"))?
            {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                other => {
                    return Err(Error::deserial(format!("invalid bool payload: {other}")));
                }
            },
            ValueType::Int => Value::Int(
                cursor
                    .read_i64_le()
                    .map_err(|_| Error::insufficient_data("int payload"))?,
            ),
            ValueType::Count => Value::Count(
                cursor
                    .read_u64_le()
                    .map_err(|_| Error::insufficient_data("count payload"))?,
            ),
            ValueType::Double => Value::Double(
                cursor
                    .read_f64_le()
                    .map_err(|_| Error::insufficient_data("double payload"))?,
            ),
            ValueType::Str => {
                let len = cursor
                    .read_u32_le()
                    .map_err(|_| Error::insufficient_data("string payload length"))?;
                if u64::from(len) > cursor.remaining() {
                    return Err(Error::insufficient_data("string payload bytes"));
                }
                let mut buf = vec![0; len as usize];
                cursor
                    .read_exact(&mut buf)
                    .map_err(|_| Error::insufficient_data("string payload bytes"))?;
                let s = String::from_utf8(buf)
                    .map_err(|_| Error::deserial("invalid UTF-8 string payload"))?;
                Value::Str(Arc::from(s.as_str()))
            }
        };
        Ok(value)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Count(a), Value::Count(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Count(c) => write!(f, "{c}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Count(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Arc::from(value.as_str()))
    }
}
