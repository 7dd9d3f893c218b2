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

//! Top-K sketch implementation.

use std::collections::HashMap;

use crate::codec::Family;
use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::error::Error;
use crate::hash::CompositeHash;
use crate::hash::HashKey;
use crate::topk::chain::BucketChain;
use crate::topk::chain::BucketId;
use crate::topk::serialization::SERIAL_VERSION;
use crate::topk::serialization::type_from_tag;
use crate::topk::serialization::type_tag;
use crate::value::Value;
use crate::value::ValueType;

/// One retained observation.
///
/// The element record owns the value reference and the error bound; the
/// bucket handle is a relation into the chain, never a second owner.
#[derive(Debug, Clone)]
struct Element {
    value: Value,
    epsilon: u64,
    bucket: BucketId,
}

/// Result row for top-k queries.
///
/// The true occurrence count of the value lies in
/// `[count - epsilon, count]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    value: Value,
    count: u64,
    epsilon: u64,
}

impl Row {
    /// Returns the retained value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the estimated occurrence count.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the upper bound on the overestimation of the count.
    pub fn epsilon(&self) -> u64 {
        self.epsilon
    }
}

/// Top-K frequent elements sketch.
///
/// The sketch retains at most `capacity` distinct values. For each retained
/// value it maintains a conservative count estimate together with an error
/// bound; the true count always lies in `[count - epsilon, count]`.
///
/// See [`crate::topk`] for an overview and the error guarantees.
///
/// # Examples
///
/// ```
/// # use topk_sketch::topk::TopkSketch;
/// # use topk_sketch::value::Value;
/// let mut sketch = TopkSketch::new(3);
/// for name in ["a", "a", "b", "c", "a", "b"] {
///     sketch.encounter(Value::from(name)).unwrap();
/// }
///
/// assert_eq!(sketch.count_of(&Value::from("a")).unwrap(), 3);
/// assert_eq!(sketch.top_k(2).unwrap(), vec![Value::from("a"), Value::from("b")]);
/// ```
#[derive(Debug, Clone)]
pub struct TopkSketch {
    capacity: u64,
    num_elements: u64,
    pruned: bool,
    hasher: Option<CompositeHash>,
    index: HashMap<HashKey, Element>,
    chain: BucketChain,
}

impl TopkSketch {
    /// Creates a new sketch retaining at most `capacity` distinct values.
    ///
    /// A capacity of zero is representable (it is what [`TopkSketch::default`]
    /// and deserialization of such an image produce) but such a sketch
    /// rejects every [`TopkSketch::encounter`].
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            num_elements: 0,
            pruned: false,
            hasher: None,
            index: HashMap::new(),
            chain: BucketChain::new(),
        }
    }

    /// Returns the maximum number of retained values.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Returns the current number of retained values.
    pub fn num_elements(&self) -> u64 {
        self.num_elements
    }

    /// Returns true if the sketch retains no values.
    pub fn is_empty(&self) -> bool {
        self.num_elements == 0
    }

    /// Returns true if the sketch has ever discarded an element.
    ///
    /// The flag is sticky: once an eviction or a merge prune has happened it
    /// never resets.
    pub fn is_pruned(&self) -> bool {
        self.pruned
    }

    /// Returns the element type, or `None` if the sketch has observed nothing.
    pub fn value_type(&self) -> Option<ValueType> {
        self.hasher.as_ref().map(CompositeHash::value_type)
    }

    /// Observes one value.
    ///
    /// The first observation establishes the sketch's element type; later
    /// observations of a differing type fail with
    /// [`ErrorKind::TypeMismatch`](crate::error::ErrorKind::TypeMismatch)
    /// and leave the sketch unchanged.
    ///
    /// When the sketch is full and the value is new, the oldest element of
    /// the minimum-count bucket is evicted and the new element takes over
    /// its slot, inheriting that bucket's count as its error bound.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topk_sketch::topk::TopkSketch;
    /// # use topk_sketch::value::Value;
    /// let mut sketch = TopkSketch::new(2);
    /// sketch.encounter(Value::from(1u64)).unwrap();
    /// sketch.encounter(Value::from(1u64)).unwrap();
    /// assert_eq!(sketch.count_of(&Value::from(1u64)).unwrap(), 2);
    ///
    /// // the element type is now `count`; a string no longer fits
    /// assert!(sketch.encounter(Value::from("a")).is_err());
    /// ```
    pub fn encounter(&mut self, value: Value) -> Result<(), Error> {
        if self.capacity == 0 {
            return Err(Error::invalid_argument(
                "sketch was built without capacity for retained elements",
            ));
        }

        if self.hasher.is_none() {
            self.typify(value.value_type());
        }
        let key = self.key_for(&value)?;

        if self.index.contains_key(&key) {
            self.increment_counter(key, 1);
            return Ok(());
        }

        if self.num_elements < self.capacity {
            // room left: retain at count 1
            let head = self.chain.head();
            let dest = match head {
                Some(id) if self.chain.count(id) == 1 => id,
                _ => self.chain.insert_before(head, 1),
            };
            self.chain.push_back_element(dest, key);
            self.index.insert(
                key,
                Element {
                    value,
                    epsilon: 0,
                    bucket: dest,
                },
            );
            self.num_elements += 1;
            return Ok(());
        }

        // full: replace the oldest element of the minimum-count bucket. The
        // new element inherits the displaced slot's count as its error bound
        // and must still be incremented, so it records this observation on
        // top of the inherited baseline.
        let head = self.chain.head().expect("full sketch with empty chain");
        let victim = self
            .chain
            .pop_front_element(head)
            .expect("chain holds an empty bucket");
        self.index.remove(&victim);
        self.pruned = true;

        let epsilon = self.chain.count(head);
        self.chain.push_back_element(head, key);
        self.index.insert(
            key,
            Element {
                value,
                epsilon,
                bucket: head,
            },
        );
        self.increment_counter(key, 1);
        Ok(())
    }

    /// Merges `other` into this sketch.
    ///
    /// Elements present in both sketches add their counts and error bounds;
    /// elements only in `other` are adopted with their counts. With
    /// `do_prune` the result is cut back to this sketch's capacity by
    /// evicting minimum-count elements (oldest first), setting the pruned
    /// flag for each eviction.
    ///
    /// Merging sketches of differing element types fails with
    /// [`ErrorKind::TypeMismatch`](crate::error::ErrorKind::TypeMismatch)
    /// and leaves this sketch unchanged. Merging an empty sketch is a no-op.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topk_sketch::topk::TopkSketch;
    /// # use topk_sketch::value::Value;
    /// let mut left = TopkSketch::new(4);
    /// let mut right = TopkSketch::new(4);
    /// for _ in 0..3 {
    ///     left.encounter(Value::from("a")).unwrap();
    /// }
    /// for _ in 0..4 {
    ///     right.encounter(Value::from("b")).unwrap();
    /// }
    ///
    /// left.merge(&right, true).unwrap();
    /// assert_eq!(left.count_of(&Value::from("a")).unwrap(), 3);
    /// assert_eq!(left.count_of(&Value::from("b")).unwrap(), 4);
    /// ```
    pub fn merge(&mut self, other: &TopkSketch, do_prune: bool) -> Result<(), Error> {
        let Some(other_ty) = other.value_type() else {
            // merge-from is empty, nothing to do
            debug_assert_eq!(other.num_elements, 0);
            return Ok(());
        };

        if do_prune && self.capacity == 0 {
            return Err(Error::invalid_argument(
                "cannot prune a sketch without capacity",
            ));
        }

        match self.value_type() {
            None => {
                debug_assert_eq!(self.num_elements, 0);
                self.typify(other_ty);
            }
            Some(ty) if ty != other_ty => {
                return Err(Error::type_mismatch(format!(
                    "cannot merge top-k sketches of differing element types ({ty} and {other_ty})"
                )));
            }
            Some(_) => {}
        }

        // Keys are a pure function of the element type, the value bytes, and
        // a fixed seed, so the donor's keys are valid in this sketch.
        let mut pos = other.chain.head();
        while let Some(bucket) = pos {
            let count = other.chain.count(bucket);
            for key in other.chain.elements(bucket) {
                let donor = other
                    .index
                    .get(&key)
                    .expect("chain key missing from element table");
                match self.index.get_mut(&key) {
                    Some(existing) => {
                        existing.epsilon += donor.epsilon;
                        self.increment_counter(key, count);
                    }
                    None => {
                        self.place_new(key, donor.value.clone(), donor.epsilon, count);
                    }
                }
            }
            pos = other.chain.next(bucket);
        }

        if !do_prune {
            return Ok(());
        }

        while self.num_elements > self.capacity {
            self.pruned = true;
            let head = self.chain.head().expect("retained elements without buckets");
            let victim = self
                .chain
                .pop_front_element(head)
                .expect("chain holds an empty bucket");
            self.index.remove(&victim);
            if self.chain.num_elements(head) == 0 {
                self.chain.erase(head);
            }
            self.num_elements -= 1;
        }
        Ok(())
    }

    /// Returns the values with the highest estimated counts.
    ///
    /// Values are emitted bucket by bucket from the highest count downwards.
    /// The boundary bucket is emitted whole, so the result **may hold more
    /// than `k` values**; callers wanting exactly `k` must truncate. With
    /// `k = 0` the result is empty.
    ///
    /// Fails with [`ErrorKind::EmptySketch`](crate::error::ErrorKind::EmptySketch)
    /// when the sketch retains nothing.
    pub fn top_k(&self, k: usize) -> Result<Vec<Value>, Error> {
        if self.num_elements == 0 {
            return Err(Error::empty_sketch("cannot compute the top k of an empty sketch"));
        }

        let mut out = Vec::new();
        let mut pos = self.chain.tail();
        while out.len() < k {
            let Some(bucket) = pos else { break };
            for key in self.chain.elements(bucket) {
                if let Some(element) = self.index.get(&key) {
                    out.push(element.value.clone());
                }
            }
            pos = self.chain.prev(bucket);
        }
        Ok(out)
    }

    /// Returns the estimated occurrence count for the value.
    ///
    /// Fails with [`ErrorKind::MissingItem`](crate::error::ErrorKind::MissingItem)
    /// when the value is not currently retained.
    pub fn count_of(&self, value: &Value) -> Result<u64, Error> {
        let element = self
            .lookup(value)
            .ok_or_else(|| Error::missing_item("value is not in the top-k set"))?;
        Ok(self.chain.count(element.bucket))
    }

    /// Returns the error bound on the value's estimated count.
    ///
    /// Fails with [`ErrorKind::MissingItem`](crate::error::ErrorKind::MissingItem)
    /// when the value is not currently retained.
    pub fn epsilon_of(&self, value: &Value) -> Result<u64, Error> {
        let element = self
            .lookup(value)
            .ok_or_else(|| Error::missing_item("value is not in the top-k set"))?;
        Ok(element.epsilon)
    }

    /// Returns the sum of all estimated counts.
    ///
    /// On a sketch that was never pruned this equals the number of
    /// observations. Once [`TopkSketch::is_pruned`] is true the sum
    /// underestimates the true stream cardinality, since discarded elements
    /// no longer contribute.
    pub fn sum(&self) -> u64 {
        let mut sum = 0;
        let mut pos = self.chain.head();
        while let Some(bucket) = pos {
            sum += self.chain.count(bucket) * self.chain.num_elements(bucket) as u64;
            pos = self.chain.next(bucket);
        }
        sum
    }

    /// Returns every retained value with its count and error bound, ordered
    /// by descending count (insertion order within equal counts).
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.num_elements as usize);
        let mut pos = self.chain.tail();
        while let Some(bucket) = pos {
            let count = self.chain.count(bucket);
            for key in self.chain.elements(bucket) {
                if let Some(element) = self.index.get(&key) {
                    rows.push(Row {
                        value: element.value.clone(),
                        count,
                        epsilon: element.epsilon,
                    });
                }
            }
            pos = self.chain.prev(bucket);
        }
        rows
    }

    /// Serializes this sketch into a byte vector.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topk_sketch::topk::TopkSketch;
    /// # use topk_sketch::value::Value;
    /// let mut sketch = TopkSketch::new(3);
    /// sketch.encounter(Value::from("a")).unwrap();
    /// let bytes = sketch.serialize();
    ///
    /// let decoded = TopkSketch::deserialize(&bytes).unwrap();
    /// assert_eq!(decoded.count_of(&Value::from("a")).unwrap(), 1);
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let estimate = 20 + self.chain.len() * 16 + self.num_elements as usize * 16;
        let mut bytes = SketchBytes::with_capacity(estimate);

        bytes.write_u8(SERIAL_VERSION);
        bytes.write_u8(Family::TOPK.id);
        bytes.write_u64_le(self.capacity);
        bytes.write_u64_le(self.num_elements);
        bytes.write_u8(self.pruned as u8);
        bytes.write_u8(type_tag(self.value_type()));

        let mut pos = self.chain.head();
        while let Some(bucket) = pos {
            bytes.write_u64_le(self.chain.num_elements(bucket) as u64);
            bytes.write_u64_le(self.chain.count(bucket));
            for key in self.chain.elements(bucket) {
                if let Some(element) = self.index.get(&key) {
                    bytes.write_u64_le(element.epsilon);
                    element.value.write_payload(&mut bytes);
                }
            }
            pos = self.chain.next(bucket);
        }

        bytes.into_bytes()
    }

    /// Deserializes a sketch from bytes.
    ///
    /// The image is rejected with
    /// [`ErrorKind::InvalidData`](crate::error::ErrorKind::InvalidData) if
    /// its header, element total, or trailing length is malformed, or if it
    /// describes a sketch no sequence of operations could have produced.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
            move |_| Error::insufficient_data(tag)
        }

        let mut cursor = SketchSlice::new(bytes);
        let serial_version = cursor.read_u8().map_err(make_error("serial_version"))?;
        let family = cursor.read_u8().map_err(make_error("family"))?;

        if serial_version != SERIAL_VERSION {
            return Err(Error::unsupported_serial_version(
                SERIAL_VERSION,
                serial_version,
            ));
        }
        Family::TOPK.validate_id(family)?;

        let capacity = cursor.read_u64_le().map_err(make_error("capacity"))?;
        let num_elements = cursor.read_u64_le().map_err(make_error("num_elements"))?;
        let pruned = match cursor.read_u8().map_err(make_error("pruned"))? {
            0 => false,
            1 => true,
            other => return Err(Error::deserial(format!("invalid pruned flag: {other}"))),
        };
        let tag = cursor.read_u8().map_err(make_error("type_tag"))?;
        let value_type = type_from_tag(tag)?;

        if capacity > 0 && num_elements > capacity {
            return Err(Error::deserial("num_elements exceeds capacity"));
        }

        let mut sketch = TopkSketch::new(capacity);
        sketch.pruned = pruned;

        match value_type {
            None => {
                if num_elements > 0 {
                    return Err(Error::deserial(
                        "element entries present in an untypified image",
                    ));
                }
            }
            Some(ty) => {
                let hasher = CompositeHash::new(ty);
                let mut read: u64 = 0;
                let mut last_count: u64 = 0;
                while read < num_elements {
                    let in_bucket = cursor
                        .read_u64_le()
                        .map_err(make_error("elements_in_bucket"))?;
                    let count = cursor.read_u64_le().map_err(make_error("bucket_count"))?;

                    if in_bucket == 0 {
                        return Err(Error::deserial("empty bucket record"));
                    }
                    if count == 0 || count <= last_count {
                        return Err(Error::deserial(
                            "bucket counts must be positive and strictly increasing",
                        ));
                    }
                    if in_bucket > num_elements - read {
                        return Err(Error::deserial(
                            "bucket holds more elements than the image declares",
                        ));
                    }
                    last_count = count;

                    let bucket = sketch.chain.insert_before(None, count);
                    for _ in 0..in_bucket {
                        let epsilon = cursor.read_u64_le().map_err(make_error("epsilon"))?;
                        if epsilon > count {
                            return Err(Error::deserial(
                                "element error bound exceeds its bucket count",
                            ));
                        }
                        let value = Value::read_payload(ty, &mut cursor)?;
                        let Some(key) = hasher.make_key(&value) else {
                            return Err(Error::deserial(
                                "value payload does not match the element type",
                            ));
                        };
                        let element = Element {
                            value,
                            epsilon,
                            bucket,
                        };
                        if sketch.index.insert(key, element).is_some() {
                            return Err(Error::deserial("duplicate element in image"));
                        }
                        sketch.chain.push_back_element(bucket, key);
                        read += 1;
                    }
                }
                sketch.hasher = Some(hasher);
            }
        }

        if cursor.remaining() != 0 {
            return Err(Error::deserial("trailing bytes after sketch image"));
        }

        sketch.num_elements = num_elements;
        Ok(sketch)
    }

    fn typify(&mut self, ty: ValueType) {
        debug_assert!(self.hasher.is_none());
        self.hasher = Some(CompositeHash::new(ty));
    }

    fn key_for(&self, value: &Value) -> Result<HashKey, Error> {
        let hasher = self
            .hasher
            .as_ref()
            .ok_or_else(|| Error::missing_item("sketch has not retained any elements"))?;
        hasher.make_key(value).ok_or_else(|| {
            Error::type_mismatch(format!(
                "cannot add a {} value to a sketch tracking {} elements",
                value.value_type(),
                hasher.value_type()
            ))
        })
    }

    fn lookup(&self, value: &Value) -> Option<&Element> {
        let key = self.hasher.as_ref()?.make_key(value)?;
        self.index.get(&key)
    }

    /// Moves the element to the bucket counting `current + delta`, creating
    /// that bucket if it does not exist and erasing the vacated bucket when
    /// it empties.
    fn increment_counter(&mut self, key: HashKey, delta: u64) {
        let cur = match self.index.get(&key) {
            Some(element) => element.bucket,
            None => return,
        };
        let target = self.chain.count(cur) + delta;

        // one step for delta == 1 unless counts have gaps; merge may walk
        let mut pos = self.chain.next(cur);
        while let Some(bucket) = pos {
            if self.chain.count(bucket) >= target {
                break;
            }
            pos = self.chain.next(bucket);
        }
        let dest = match pos {
            Some(bucket) if self.chain.count(bucket) == target => bucket,
            _ => self.chain.insert_before(pos, target),
        };

        self.chain.remove_element(cur, key);
        self.chain.push_back_element(dest, key);
        if let Some(element) = self.index.get_mut(&key) {
            element.bucket = dest;
        }
        if self.chain.num_elements(cur) == 0 {
            self.chain.erase(cur);
        }
    }

    /// Inserts a not-yet-retained element directly into the bucket with the
    /// given count, splicing a fresh bucket into place when none exists.
    fn place_new(&mut self, key: HashKey, value: Value, epsilon: u64, count: u64) {
        let mut pos = self.chain.head();
        while let Some(bucket) = pos {
            if self.chain.count(bucket) >= count {
                break;
            }
            pos = self.chain.next(bucket);
        }
        let dest = match pos {
            Some(bucket) if self.chain.count(bucket) == count => bucket,
            _ => self.chain.insert_before(pos, count),
        };

        self.chain.push_back_element(dest, key);
        self.index.insert(
            key,
            Element {
                value,
                epsilon,
                bucket: dest,
            },
        );
        self.num_elements += 1;
    }
}

impl Default for TopkSketch {
    fn default() -> Self {
        Self::new(0)
    }
}
