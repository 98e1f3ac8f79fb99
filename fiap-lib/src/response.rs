//! Merged result of a full fetch

use serde::Serialize;

use crate::api::query::Page;
use crate::model::PointMap;
use crate::model::PointSetMap;
use crate::model::PointValue;
use crate::model::merge_point_sets;
use crate::model::merge_points;

/// Everything a fetch returned, merged across pages by entity ID.
///
/// Values of a point that appears on several pages are concatenated in page
/// order; children of a repeated point-set are appended the same way.
///
/// # Example
///
/// ```ignore
/// let result = client.fetch([Key::new("http://example.org/point/1")]).await?;
///
/// if let Some(values) = result.values("http://example.org/point/1") {
///     for v in values {
///         println!("{} = {}", v.time, v.value);
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchResult {
    /// Point identifier to its values.
    pub points: PointMap,
    /// Point-set identifier to its direct children.
    pub point_sets: PointSetMap,
    #[serde(skip)]
    pages: usize,
}

impl FetchResult {
    /// Merges one page into this result.
    pub fn merge(&mut self, page: Page) {
        self.pages += 1;
        let (points, point_sets) = page.into_parts();
        if let Some(points) = points {
            merge_points(&mut self.points, points);
        }
        if let Some(point_sets) = point_sets {
            merge_point_sets(&mut self.point_sets, point_sets);
        }
    }

    /// Returns the number of pages merged.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Returns the values of one point, if it was returned.
    pub fn values(&self, point_id: &str) -> Option<&[PointValue]> {
        self.points.get(point_id).map(Vec::as_slice)
    }

    /// Returns `true` if no point and no point-set was returned.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.point_sets.is_empty()
    }
}
