//! FIAP response XML parsing.
//!
//! The document is first read into a small element tree with `quick-xml`, then
//! mapped onto the [`wire`](super::wire) types. Element and attribute names are
//! matched by local name, so any namespace prefix the server picks is accepted.

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Error;
use crate::error::ProtocolError;
use crate::error::TransportError;

use super::wire;

/// A parsed XML element.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, ProtocolError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(ProtocolError::xml)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(ProtocolError::xml)?.into_owned();
            attrs.push((key, value));
        }
        Ok(Self {
            name,
            attrs,
            ..Default::default()
        })
    }

    /// Text with surrounding whitespace removed, for elements whose text is
    /// not data.
    fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn required_attr(&self, name: &'static str) -> Result<String, ProtocolError> {
        self.attr(name)
            .map(str::to_string)
            .ok_or_else(|| ProtocolError::MissingAttribute {
                element: self.name.clone(),
                attribute: name,
            })
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Depth-first search, including this element.
    fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

/// Reads a whole document into an element tree.
///
/// Text is kept exactly as sent; callers trim where whitespace is not data.
fn parse_document(xml: &str) -> Result<Element, ProtocolError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(ProtocolError::xml)? {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => attach(&mut stack, &mut root, Element::open(&start)?)?,
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ProtocolError::xml("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text.unescape().map_err(ProtocolError::xml)?);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ProtocolError::xml("document ended inside an element"));
    }
    root.ok_or_else(|| ProtocolError::xml("document has no root element"))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ProtocolError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(ProtocolError::xml("document has more than one root element")),
    }
    Ok(())
}

/// Parses a `<{operation}RS>` SOAP response into its `<transport>` tree.
///
/// A SOAP `Fault` anywhere in the document is reported as a transport error.
/// A document without a `<transport>` element is a protocol error.
pub fn parse_response(xml: &str, operation: &str) -> Result<wire::Transport, Error> {
    let root = parse_document(xml)?;

    if let Some(fault) = root.find("Fault") {
        let text = |name: &str| {
            fault
                .child(name)
                .map(|c| c.trimmed_text().to_string())
                .unwrap_or_default()
        };
        return Err(TransportError::fault(operation, text("faultcode"), text("faultstring")).into());
    }

    let transport = root
        .find("transport")
        .ok_or(ProtocolError::missing("transport"))?;
    Ok(transport_from(transport)?)
}

fn transport_from(element: &Element) -> Result<wire::Transport, ProtocolError> {
    Ok(wire::Transport {
        header: element.child("header").map(header_from),
        body: element.child("body").map(body_from).transpose()?,
    })
}

fn header_from(element: &Element) -> wire::Header {
    wire::Header {
        ok: element.child("OK").is_some(),
        error: element.child("error").map(|e| wire::HeaderError {
            kind: e.attr("type").unwrap_or_default().to_string(),
            value: e.trimmed_text().to_string(),
        }),
        query: element.child("query").map(|q| wire::QueryEcho {
            id: q.attr("id").map(str::to_string),
            query_type: q.attr("type").map(str::to_string),
            cursor: q.attr("cursor").map(str::to_string),
            acceptable_size: q.attr("acceptableSize").map(str::to_string),
        }),
    }
}

fn body_from(element: &Element) -> Result<wire::Body, ProtocolError> {
    Ok(wire::Body {
        points: element
            .children_named("point")
            .map(point_from)
            .collect::<Result<Vec<_>, _>>()?,
        point_sets: element
            .children_named("pointSet")
            .map(point_set_from)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn point_set_from(element: &Element) -> Result<wire::PointSet, ProtocolError> {
    Ok(wire::PointSet {
        id: element.required_attr("id")?,
        points: element
            .children_named("point")
            .map(point_from)
            .collect::<Result<Vec<_>, _>>()?,
        point_sets: element
            .children_named("pointSet")
            .map(point_set_from)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn point_from(element: &Element) -> Result<wire::Point, ProtocolError> {
    Ok(wire::Point {
        id: element.required_attr("id")?,
        values: element
            .children_named("value")
            .map(|v| wire::Value {
                time: v.attr("time").map(str::to_string),
                text: v.text.clone(),
            })
            .collect(),
    })
}
