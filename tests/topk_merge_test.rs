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

use topk_sketch::error::ErrorKind;
use topk_sketch::topk::TopkSketch;
use topk_sketch::value::Value;
use topk_sketch::value::ValueType;

fn sketch_of(capacity: u64, stream: &[&str]) -> TopkSketch {
    let mut sketch = TopkSketch::new(capacity);
    for name in stream {
        sketch.encounter(Value::from(*name)).unwrap();
    }
    sketch
}

fn rows_of(sketch: &TopkSketch) -> Vec<(String, u64, u64)> {
    sketch
        .rows()
        .iter()
        .map(|row| (row.value().to_string(), row.count(), row.epsilon()))
        .collect()
}

#[test]
fn test_merge_unions_counts() {
    let mut left = sketch_of(4, &["a", "a", "a", "b", "b"]);
    let right = sketch_of(4, &["b", "b", "b", "b", "c"]);

    left.merge(&right, true).unwrap();

    assert_eq!(left.num_elements(), 3);
    assert!(!left.is_pruned());
    assert_eq!(
        rows_of(&left),
        vec![
            ("b".to_string(), 6, 0),
            ("a".to_string(), 3, 0),
            ("c".to_string(), 1, 0),
        ]
    );
}

#[test]
fn test_merge_from_empty_is_noop() {
    let mut sketch = sketch_of(3, &["a", "b"]);
    let before = rows_of(&sketch);

    sketch.merge(&TopkSketch::default(), false).unwrap();
    sketch.merge(&TopkSketch::new(3), true).unwrap();

    assert_eq!(rows_of(&sketch), before);
    assert!(!sketch.is_pruned());
}

#[test]
fn test_merge_into_empty_adopts_type() {
    let mut sketch = TopkSketch::new(4);
    let donor = sketch_of(4, &["a", "a", "b"]);

    sketch.merge(&donor, true).unwrap();

    assert_eq!(sketch.value_type(), Some(ValueType::Str));
    assert_eq!(sketch.num_elements(), 2);
    assert_eq!(sketch.count_of(&Value::from("a")).unwrap(), 2);
    assert_eq!(sketch.count_of(&Value::from("b")).unwrap(), 1);
}

#[test]
fn test_merge_type_mismatch_leaves_receiver_unchanged() {
    let mut sketch = sketch_of(3, &["a", "b"]);
    let before = rows_of(&sketch);

    let mut donor = TopkSketch::new(3);
    donor.encounter(Value::from(1u64)).unwrap();

    let err = sketch.merge(&donor, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(rows_of(&sketch), before);
}

#[test]
fn test_merge_with_clone_doubles_counts() {
    let mut sketch = sketch_of(10, &["a", "a", "b"]);
    let snapshot = sketch.clone();

    sketch.merge(&snapshot, true).unwrap();

    assert_eq!(sketch.num_elements(), 2);
    assert_eq!(sketch.count_of(&Value::from("a")).unwrap(), 4);
    assert_eq!(sketch.count_of(&Value::from("b")).unwrap(), 2);
    assert_eq!(sketch.epsilon_of(&Value::from("a")).unwrap(), 0);
}

#[test]
fn test_merge_prune_cuts_back_to_capacity() {
    let mut left = sketch_of(2, &["a", "a", "a", "b", "b"]);
    let right = sketch_of(4, &["c", "d"]);

    left.merge(&right, true).unwrap();

    assert_eq!(left.num_elements(), 2);
    assert!(left.is_pruned());
    assert_eq!(left.count_of(&Value::from("a")).unwrap(), 3);
    assert_eq!(left.count_of(&Value::from("b")).unwrap(), 2);
    assert_eq!(
        left.count_of(&Value::from("c")).unwrap_err().kind(),
        ErrorKind::MissingItem
    );
    assert_eq!(
        left.count_of(&Value::from("d")).unwrap_err().kind(),
        ErrorKind::MissingItem
    );
}

#[test]
fn test_merge_without_prune_may_exceed_capacity() {
    let mut left = sketch_of(2, &["a", "b"]);
    let right = sketch_of(2, &["c", "d"]);

    left.merge(&right, false).unwrap();

    assert_eq!(left.num_elements(), 4);
    assert!(!left.is_pruned());
}

#[test]
fn test_merge_accumulates_error_bounds() {
    // both streams evicted their oldest minimum, so "c" carries an error
    // bound of 1 on each side
    let left_stream = ["a", "b", "c"];
    let mut left = sketch_of(2, &left_stream);
    let right = sketch_of(2, &left_stream);
    assert_eq!(left.epsilon_of(&Value::from("c")).unwrap(), 1);

    left.merge(&right, true).unwrap();

    assert_eq!(left.count_of(&Value::from("c")).unwrap(), 4);
    assert_eq!(left.epsilon_of(&Value::from("c")).unwrap(), 2);
}

#[test]
fn test_merge_prune_without_capacity_fails() {
    let mut sketch = TopkSketch::default();
    let donor = sketch_of(2, &["a"]);

    let err = sketch.merge(&donor, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(sketch.num_elements(), 0);

    // without pruning the capacity-less receiver may still collect elements
    sketch.merge(&donor, false).unwrap();
    assert_eq!(sketch.num_elements(), 1);
    assert_eq!(sketch.count_of(&Value::from("a")).unwrap(), 1);
}

#[test]
fn test_merge_prune_evicts_oldest_of_minimum_bucket() {
    let mut left = sketch_of(3, &["a", "a", "b"]);
    let right = sketch_of(3, &["c", "c", "c", "d"]);

    left.merge(&right, true).unwrap();

    // "b" and the adopted "d" tie at count 1; "b" is the older entry of the
    // minimum bucket and is the one pruned
    assert_eq!(left.num_elements(), 3);
    assert!(left.is_pruned());
    assert_eq!(
        rows_of(&left),
        vec![
            ("c".to_string(), 3, 0),
            ("a".to_string(), 2, 0),
            ("d".to_string(), 1, 0),
        ]
    );
}
