//! Flattening response trees into per-ID maps.

use chrono::DateTime;
use uuid::Uuid;

use crate::error::Error;
use crate::error::ProtocolError;
use crate::error::ServerError;
use crate::model::PointMap;
use crate::model::PointSetMap;
use crate::model::PointValue;

use super::wire;
use super::Page;

/// Decodes one response tree into a [`Page`].
///
/// The header must be present. An `<error>` in it ends the fetch with a
/// [`ServerError`]. Otherwise the body must be present too, and is flattened
/// with [`flatten_body`].
pub fn decode_page(transport: wire::Transport, operation: &str) -> Result<Page, Error> {
    let header = transport.header.ok_or(ProtocolError::missing("header"))?;

    if let Some(error) = header.error {
        log::warn!("server reported {} for '{}': {}", error.kind, operation, error.value);
        return Err(ServerError::new(operation, error.kind, error.value).into());
    }
    if !header.ok {
        log::debug!("response header for '{}' has neither OK nor error", operation);
    }

    let body = transport.body.ok_or(ProtocolError::missing("body"))?;

    let cursor = match header.query.and_then(|q| q.cursor) {
        Some(cursor) => parse_cursor(&cursor)?,
        None => None,
    };

    let (points, point_sets) = flatten_body(body)?;
    Ok(Page::new(points, point_sets, cursor))
}

/// Reads an echoed cursor. Empty means there is no next page.
pub fn parse_cursor(cursor: &str) -> Result<Option<Uuid>, ProtocolError> {
    let cursor = cursor.trim();
    if cursor.is_empty() {
        return Ok(None);
    }
    Uuid::parse_str(cursor)
        .map(Some)
        .map_err(|_| ProtocolError::InvalidCursor(cursor.to_string()))
}

/// Flattens a body into point values and point-set membership.
///
/// Every point-set at any depth gets its own entry holding only its direct
/// children. Repeated IDs append to the existing entry in document order.
/// Points nested in point-sets contribute their values when they carry any.
///
/// Returns `(None, None)` when the body holds neither points nor point-sets.
pub fn flatten_body(
    body: wire::Body,
) -> Result<(Option<PointMap>, Option<PointSetMap>), ProtocolError> {
    if body.is_empty() {
        return Ok((None, None));
    }

    let mut points = PointMap::new();
    let mut point_sets = PointSetMap::new();

    for point in body.points {
        collect_values(point, &mut points)?;
    }
    for point_set in body.point_sets {
        flatten_point_set(point_set, &mut points, &mut point_sets)?;
    }

    Ok((Some(points), Some(point_sets)))
}

fn flatten_point_set(
    point_set: wire::PointSet,
    points: &mut PointMap,
    point_sets: &mut PointSetMap,
) -> Result<(), ProtocolError> {
    let wire::PointSet {
        id,
        points: child_points,
        point_sets: child_sets,
    } = point_set;

    let members = point_sets.entry(id).or_default();
    members
        .point_ids
        .extend(child_points.iter().map(|p| p.id.clone()));
    members
        .point_set_ids
        .extend(child_sets.iter().map(|s| s.id.clone()));

    for point in child_points {
        if !point.values.is_empty() {
            collect_values(point, points)?;
        }
    }
    for child in child_sets {
        flatten_point_set(child, points, point_sets)?;
    }
    Ok(())
}

fn collect_values(point: wire::Point, points: &mut PointMap) -> Result<(), ProtocolError> {
    let wire::Point { id, values } = point;

    let values = values
        .into_iter()
        .map(|value| decode_value(&id, value))
        .collect::<Result<Vec<_>, _>>()?;

    points.entry(id).or_default().extend(values);
    Ok(())
}

fn decode_value(point: &str, value: wire::Value) -> Result<PointValue, ProtocolError> {
    let raw = value.time.ok_or_else(|| ProtocolError::MissingTime {
        point: point.to_string(),
    })?;
    let time = DateTime::parse_from_rfc3339(raw.trim()).map_err(|_| ProtocolError::InvalidTime {
        point: point.to_string(),
        time: raw.clone(),
    })?;
    Ok(PointValue::new(time, value.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::merge_point_sets;

    fn point(id: &str, values: &[(&str, &str)]) -> wire::Point {
        wire::Point {
            id: id.to_string(),
            values: values
                .iter()
                .map(|(time, text)| wire::Value {
                    time: Some(time.to_string()),
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    fn point_set(id: &str, points: Vec<wire::Point>, point_sets: Vec<wire::PointSet>) -> wire::PointSet {
        wire::PointSet {
            id: id.to_string(),
            points,
            point_sets,
        }
    }

    fn transport(cursor: Option<&str>, body: Option<wire::Body>) -> wire::Transport {
        wire::Transport {
            header: Some(wire::Header {
                ok: true,
                error: None,
                query: Some(wire::QueryEcho {
                    cursor: cursor.map(str::to_string),
                    ..Default::default()
                }),
            }),
            body,
        }
    }

    #[test]
    fn test_single_point_page() {
        let body = wire::Body {
            points: vec![point("A", &[("2012-02-02T16:34:05+09:00", "30")])],
            point_sets: vec![],
        };
        let page = decode_page(transport(Some(""), Some(body)), "query").unwrap();

        let points = page.points().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points["A"][0].value, "30");
        assert_eq!(points["A"][0].time.to_rfc3339(), "2012-02-02T16:34:05+09:00");
        assert!(page.point_sets().unwrap().is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_empty_body_leaves_maps_unset() {
        let page = decode_page(transport(None, Some(wire::Body::default())), "query").unwrap();
        assert!(page.is_empty());
        assert!(page.points().is_none());
        assert!(page.point_sets().is_none());
    }

    #[test]
    fn test_nested_point_sets_are_flattened_one_level_each() {
        let body = wire::Body {
            points: vec![],
            point_sets: vec![point_set(
                "B",
                vec![point("B1", &[])],
                vec![point_set(
                    "B2",
                    vec![point("B2a", &[])],
                    vec![point_set("B3", vec![point("B3a", &[])], vec![])],
                )],
            )],
        };
        let (points, sets) = flatten_body(body).unwrap();
        let sets = sets.unwrap();

        assert!(points.unwrap().is_empty());
        assert_eq!(sets["B"].point_ids, ["B1"]);
        assert_eq!(sets["B"].point_set_ids, ["B2"]);
        assert_eq!(sets["B2"].point_ids, ["B2a"]);
        assert_eq!(sets["B2"].point_set_ids, ["B3"]);
        assert_eq!(sets["B3"].point_ids, ["B3a"]);
        assert!(sets["B3"].point_set_ids.is_empty());
    }

    #[test]
    fn test_sibling_point_sets_with_same_id_append() {
        let body = wire::Body {
            points: vec![],
            point_sets: vec![
                point_set("X", vec![point("p1", &[])], vec![]),
                point_set("X", vec![point("p2", &[]), point("p1", &[])], vec![]),
            ],
        };
        let (_, sets) = flatten_body(body).unwrap();
        assert_eq!(sets.unwrap()["X"].point_ids, ["p1", "p2", "p1"]);
    }

    #[test]
    fn test_fragment_order_does_not_change_membership() {
        let first = || wire::Body {
            points: vec![],
            point_sets: vec![point_set("X", vec![point("a", &[])], vec![])],
        };
        let second = || wire::Body {
            points: vec![],
            point_sets: vec![point_set("X", vec![point("b", &[])], vec![point_set("Y", vec![], vec![])])],
        };

        let merge = |bodies: Vec<wire::Body>| {
            let mut acc = PointSetMap::new();
            for body in bodies {
                merge_point_sets(&mut acc, flatten_body(body).unwrap().1.unwrap());
            }
            acc
        };

        let forward = merge(vec![first(), second()]);
        let backward = merge(vec![second(), first()]);

        let mut f = forward["X"].point_ids.clone();
        let mut b = backward["X"].point_ids.clone();
        f.sort();
        b.sort();
        assert_eq!(f, ["a", "b"]);
        assert_eq!(f, b);
        assert_eq!(forward["X"].point_set_ids, backward["X"].point_set_ids);
    }

    #[test]
    fn test_repeated_points_concatenate_values() {
        let body = wire::Body {
            points: vec![
                point("A", &[("2012-02-02T16:34:05+09:00", "1")]),
                point("A", &[("2012-02-02T16:35:05+09:00", "2")]),
            ],
            point_sets: vec![point_set(
                "S",
                vec![point("A", &[("2012-02-02T16:36:05+09:00", "3")])],
                vec![],
            )],
        };
        let (points, sets) = flatten_body(body).unwrap();
        let values: Vec<_> = points.unwrap()["A"].iter().map(|v| v.value.clone()).collect();
        assert_eq!(values, ["1", "2", "3"]);
        assert_eq!(sets.unwrap()["S"].point_ids, ["A"]);
    }

    #[test]
    fn test_cursor_parsing() {
        assert_eq!(parse_cursor("").unwrap(), None);
        assert_eq!(parse_cursor("  ").unwrap(), None);
        assert_eq!(
            parse_cursor("6f3e3c64-9a43-4d2b-8d53-2b7c1f0a4e11").unwrap(),
            Some(Uuid::parse_str("6f3e3c64-9a43-4d2b-8d53-2b7c1f0a4e11").unwrap())
        );
        assert_eq!(
            parse_cursor("next-please"),
            Err(ProtocolError::InvalidCursor("next-please".to_string()))
        );
    }

    #[test]
    fn test_missing_header_or_body() {
        let err = decode_page(wire::Transport::default(), "query").unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::MissingElement { element: "header" })
        ));

        let err = decode_page(transport(None, None), "query").unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::MissingElement { element: "body" })
        ));
    }

    #[test]
    fn test_server_error_in_header() {
        let mut tree = transport(None, None);
        if let Some(header) = tree.header.as_mut() {
            header.ok = false;
            header.error = Some(wire::HeaderError {
                kind: "POINT_NOT_FOUND".to_string(),
                value: "X".to_string(),
            });
        }
        let err = decode_page(tree, "query").unwrap_err();
        let server = err.server_error().unwrap();
        assert!(server.has_kind("point_not_found"));
        assert_eq!(server.message, "X");
        assert_eq!(server.operation, "query");
    }

    #[test]
    fn test_bad_value_time() {
        let body = wire::Body {
            points: vec![point("A", &[("yesterday", "1")])],
            point_sets: vec![],
        };
        assert_eq!(
            flatten_body(body).unwrap_err(),
            ProtocolError::InvalidTime {
                point: "A".to_string(),
                time: "yesterday".to_string(),
            }
        );

        let body = wire::Body {
            points: vec![wire::Point {
                id: "A".to_string(),
                values: vec![wire::Value {
                    time: None,
                    text: "1".to_string(),
                }],
            }],
            point_sets: vec![],
        };
        assert_eq!(
            flatten_body(body).unwrap_err(),
            ProtocolError::MissingTime {
                point: "A".to_string()
            }
        );
    }
}
