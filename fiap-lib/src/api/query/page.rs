//! Page type for paginated query results.

use uuid::Uuid;

use crate::model::PointMap;
use crate::model::PointSetMap;

/// One decoded response page.
///
/// The maps are `None` when the page body held neither points nor
/// point-sets, and `Some` (possibly empty) otherwise. This keeps "the server
/// sent nothing" apart from "the server sent zero entities".
///
/// # Example
///
/// ```ignore
/// let mut pages = client.query([Key::new("http://example.org/p")]).into_async_iter();
///
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     if let Some(points) = page.points() {
///         println!("page {}: {} points", page.number(), points.len());
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    number: usize,
    points: Option<PointMap>,
    point_sets: Option<PointSetMap>,
    /// Cursor for fetching the next page.
    cursor: Option<Uuid>,
}

impl Page {
    /// Creates a new page from decoded maps and the echoed cursor.
    pub fn new(
        points: Option<PointMap>,
        point_sets: Option<PointSetMap>,
        cursor: Option<Uuid>,
    ) -> Self {
        Self {
            number: 1,
            points,
            point_sets,
            cursor,
        }
    }

    /// Sets the 1-based page number.
    pub fn with_number(mut self, number: usize) -> Self {
        self.number = number;
        self
    }

    /// Returns the 1-based position of this page in its fetch.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Returns the point values on this page, if the body had any entities.
    pub fn points(&self) -> Option<&PointMap> {
        self.points.as_ref()
    }

    /// Returns the point-set membership on this page, if the body had any entities.
    pub fn point_sets(&self) -> Option<&PointSetMap> {
        self.point_sets.as_ref()
    }

    /// Returns the cursor for fetching the next page, if available.
    pub fn cursor(&self) -> Option<Uuid> {
        self.cursor
    }

    /// Returns `true` if the body held neither points nor point-sets.
    pub fn is_empty(&self) -> bool {
        self.points.is_none() && self.point_sets.is_none()
    }

    /// Returns `true` if there are more pages available.
    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    /// Consumes the page and returns its maps.
    pub fn into_parts(self) -> (Option<PointMap>, Option<PointSetMap>) {
        (self.points, self.point_sets)
    }
}
