//! Query keys and their time filters

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::FixedOffset;

/// A point in time with its UTC offset, as FIAP transmits it.
pub type Timestamp = DateTime<FixedOffset>;

/// A lookup key: an entity identifier plus optional filters on its `time` attribute.
///
/// Every comparison is optional and independent. Setting `gteq` and `lteq`
/// together describes a closed range, but nothing stops a caller from setting
/// any combination.
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use fiap_lib::model::{Key, Select};
///
/// let from = DateTime::parse_from_rfc3339("2012-02-02T00:00:00+09:00").unwrap();
/// let key = Key::new("http://example.org/point/1")
///     .at_or_after(from)
///     .select(Select::Maximum);
///
/// assert_eq!(key.id, "http://example.org/point/1");
/// assert_eq!(key.gteq, Some(from));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Key {
    /// Point or point-set identifier.
    pub id: String,
    /// `time == eq`
    pub eq: Option<Timestamp>,
    /// `time != neq`
    pub neq: Option<Timestamp>,
    /// `time < lt`
    pub lt: Option<Timestamp>,
    /// `time > gt`
    pub gt: Option<Timestamp>,
    /// `time <= lteq`
    pub lteq: Option<Timestamp>,
    /// `time >= gteq`
    pub gteq: Option<Timestamp>,
    /// Restrict the match to its minimum or maximum.
    pub select: Select,
}

impl Key {
    /// The attribute every filter applies to.
    pub const ATTR_NAME: &'static str = "time";

    /// Creates a key with no filters.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Sets the `eq` filter.
    pub fn equals(mut self, time: Timestamp) -> Self {
        self.eq = Some(time);
        self
    }

    /// Sets the `neq` filter.
    pub fn not_equals(mut self, time: Timestamp) -> Self {
        self.neq = Some(time);
        self
    }

    /// Sets the `lt` filter.
    pub fn before(mut self, time: Timestamp) -> Self {
        self.lt = Some(time);
        self
    }

    /// Sets the `gt` filter.
    pub fn after(mut self, time: Timestamp) -> Self {
        self.gt = Some(time);
        self
    }

    /// Sets the `lteq` filter.
    pub fn at_or_before(mut self, time: Timestamp) -> Self {
        self.lteq = Some(time);
        self
    }

    /// Sets the `gteq` filter.
    pub fn at_or_after(mut self, time: Timestamp) -> Self {
        self.gteq = Some(time);
        self
    }

    /// Sets both ends of a closed range (`gteq` and `lteq`).
    pub fn between(self, from: Timestamp, to: Timestamp) -> Self {
        self.at_or_after(from).at_or_before(to)
    }

    /// Sets the selection modifier.
    pub fn select(mut self, select: Select) -> Self {
        self.select = select;
        self
    }

    /// Shorthand for the most recent value only.
    pub fn latest(self) -> Self {
        self.select(Select::Maximum)
    }

    /// Shorthand for the oldest value only.
    pub fn oldest(self) -> Self {
        self.select(Select::Minimum)
    }

    /// Returns the comparison filters in wire order, paired with their attribute names.
    pub fn comparisons(&self) -> [(&'static str, Option<Timestamp>); 6] {
        [
            ("eq", self.eq),
            ("neq", self.neq),
            ("lt", self.lt),
            ("gt", self.gt),
            ("lteq", self.lteq),
            ("gteq", self.gteq),
        ]
    }

    /// Returns `true` if no comparison and no selection is set.
    pub fn is_unfiltered(&self) -> bool {
        self.select == Select::None && self.comparisons().iter().all(|(_, t)| t.is_none())
    }
}

/// Selection modifier on a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Select {
    /// Every value in the range.
    #[default]
    None,
    /// Only the minimum (oldest) matching value.
    Minimum,
    /// Only the maximum (newest) matching value.
    Maximum,
}

impl Select {
    /// Returns the wire attribute value, or `None` when the attribute is omitted.
    pub fn as_wire(&self) -> Option<&'static str> {
        match self {
            Select::None => None,
            Select::Minimum => Some("minimum"),
            Select::Maximum => Some("maximum"),
        }
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire().unwrap_or("none"))
    }
}

impl FromStr for Select {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Select::None),
            "min" | "minimum" => Ok(Select::Minimum),
            "max" | "maximum" => Ok(Select::Maximum),
            other => Err(format!(
                "unknown selection '{}', expected none, minimum or maximum",
                other
            )),
        }
    }
}

/// How a filter timestamp equal to the Unix epoch is written to the wire.
///
/// An unset filter (`None`) is always omitted. This only decides what happens
/// to a filter that was explicitly set to the zero instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroTime {
    /// Write it like any other instant (`eq="1970-01-01T00:00:00+00:00"`).
    #[default]
    Emit,
    /// Treat it as unset and omit the attribute.
    Omit,
}

impl ZeroTime {
    /// Applies the policy, returning the timestamp to write, if any.
    pub fn apply(&self, time: Option<Timestamp>) -> Option<Timestamp> {
        match (self, time) {
            (ZeroTime::Omit, Some(t)) if t.timestamp() == 0 && t.timestamp_subsec_nanos() == 0 => {
                None
            }
            (_, t) => t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> Timestamp {
        DateTime::parse_from_rfc3339("1970-01-01T00:00:00+00:00").unwrap()
    }

    #[test]
    fn test_builder_sets_independent_filters() {
        let t = DateTime::parse_from_rfc3339("2012-02-02T16:34:05+09:00").unwrap();
        let key = Key::new("A").before(t).not_equals(t);
        assert_eq!(key.lt, Some(t));
        assert_eq!(key.neq, Some(t));
        assert_eq!(key.eq, None);
        assert!(!key.is_unfiltered());
        assert!(Key::new("A").is_unfiltered());
    }

    #[test]
    fn test_between_sets_closed_range() {
        let from = DateTime::parse_from_rfc3339("2012-01-01T00:00:00Z").unwrap();
        let to = DateTime::parse_from_rfc3339("2012-12-31T00:00:00Z").unwrap();
        let key = Key::new("A").between(from, to);
        assert_eq!(key.gteq, Some(from));
        assert_eq!(key.lteq, Some(to));
    }

    #[test]
    fn test_select_parsing() {
        assert_eq!("max".parse::<Select>().unwrap(), Select::Maximum);
        assert_eq!("Minimum".parse::<Select>().unwrap(), Select::Minimum);
        assert_eq!("".parse::<Select>().unwrap(), Select::None);
        assert!("latest".parse::<Select>().is_err());
        assert_eq!(Select::None.as_wire(), None);
    }

    #[test]
    fn test_zero_time_policy() {
        assert_eq!(ZeroTime::Emit.apply(Some(epoch())), Some(epoch()));
        assert_eq!(ZeroTime::Omit.apply(Some(epoch())), None);
        assert_eq!(ZeroTime::Omit.apply(None), None);

        // Epoch expressed in another offset is still the zero instant.
        let shifted = DateTime::parse_from_rfc3339("1970-01-01T09:00:00+09:00").unwrap();
        assert_eq!(ZeroTime::Omit.apply(Some(shifted)), None);

        let later = DateTime::parse_from_rfc3339("1970-01-01T00:00:01+00:00").unwrap();
        assert_eq!(ZeroTime::Omit.apply(Some(later)), Some(later));
    }
}
