//! Flattened query results

use std::collections::BTreeMap;

use serde::Serialize;

use super::Timestamp;

/// One timestamped value of a point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointValue {
    /// When the value was recorded.
    pub time: Timestamp,
    /// The value, exactly as the server sent it.
    pub value: String,
}

impl PointValue {
    /// Creates a new point value.
    pub fn new(time: Timestamp, value: impl Into<String>) -> Self {
        Self {
            time,
            value: value.into(),
        }
    }
}

/// The direct children of one point-set.
///
/// Children are listed in arrival order. The same child may appear more than
/// once when the server repeats it across fragments or pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PointSetMembers {
    /// Identifiers of child point-sets.
    pub point_set_ids: Vec<String>,
    /// Identifiers of child points.
    pub point_ids: Vec<String>,
}

impl PointSetMembers {
    /// Appends another fragment's children after this one's.
    pub fn append(&mut self, mut other: PointSetMembers) {
        self.point_set_ids.append(&mut other.point_set_ids);
        self.point_ids.append(&mut other.point_ids);
    }

    /// Returns `true` if no child has been recorded.
    pub fn is_empty(&self) -> bool {
        self.point_set_ids.is_empty() && self.point_ids.is_empty()
    }
}

/// Point identifier to its values, in arrival order.
pub type PointMap = BTreeMap<String, Vec<PointValue>>;

/// Point-set identifier to its direct children.
pub type PointSetMap = BTreeMap<String, PointSetMembers>;

/// Appends every entry of `page` to `acc`, concatenating values of repeated points.
pub fn merge_points(acc: &mut PointMap, page: PointMap) {
    for (id, mut values) in page {
        acc.entry(id).or_default().append(&mut values);
    }
}

/// Appends every entry of `page` to `acc`, concatenating children of repeated point-sets.
pub fn merge_point_sets(acc: &mut PointSetMap, page: PointSetMap) {
    for (id, members) in page {
        acc.entry(id).or_default().append(members);
    }
}
