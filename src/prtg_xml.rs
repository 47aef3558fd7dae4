use std::collections::BTreeMap;
use std::str;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Deserialize;
use serde_xml_rs::from_reader;

use crate::error::{PrtgError, Result};

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
// generic element tree

/// A parsed XML element. PRTG replies carry a free set of properties per
/// object, so they are read into this shape first and mapped to nodes after.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.as_str())
    }

    pub fn is_scalar(&self) -> bool {
        self.children.is_empty()
    }
}

fn xml_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> PrtgError {
    PrtgError::ParserError(format!(
        "xml error at position {}: {}",
        reader.buffer_position(),
        err
    ))
}

fn start_element(reader: &Reader<&[u8]>, start: &BytesStart) -> Result<Element> {
    let name = str::from_utf8(start.name().as_ref())
        .map_err(|err| xml_error(reader, err))?
        .to_string();
    let mut attributes = BTreeMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| xml_error(reader, err))?;
        let key = str::from_utf8(attr.key.as_ref())
            .map_err(|err| xml_error(reader, err))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| xml_error(reader, err))?
            .to_string();
        attributes.insert(key, value);
    }
    Ok(Element {
        name,
        attributes,
        ..Default::default()
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Reads a whole document into an [`Element`] tree and returns the document element.
pub(crate) fn parse_document(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref start)) => {
                let element = start_element(&reader, start)?;
                stack.push(element);
            }
            Ok(Event::Empty(ref start)) => {
                let element = start_element(&reader, start)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Ok(Event::Text(ref text)) => {
                let text = text.unescape().map_err(|err| xml_error(&reader, err))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(cdata)) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(xml_error(&reader, err)),
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(PrtgError::ParserError(format!(
            "unexpected end of document, unclosed element <{}>",
            stack[stack.len() - 1].name
        )));
    }

    root.ok_or_else(|| PrtgError::ParserError("empty xml document".to_string()))
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
// table.xml?content=sensortree

/// Returns the element of the requested object, i.e. the single child of
/// `<prtg><sensortree><nodes>`.
pub(crate) fn parse_sensortree(xml: &str, id: i64) -> Result<Element> {
    let document = parse_document(xml)?;
    document
        .child("sensortree")
        .and_then(|tree| tree.child("nodes"))
        .ok_or_else(|| PrtgError::ParserError("no <sensortree><nodes> in response".to_string()))?
        .children
        .iter()
        .next()
        .cloned()
        .ok_or_else(|| PrtgError::ResourceNotFound(format!("no objects at id {}", id)))
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
// table.xml?content=channels

/// Returns the `<item>` elements of a channel table.
pub(crate) fn parse_channel_items(xml: &str) -> Result<Vec<Element>> {
    let document = parse_document(xml)?;
    Ok(document.children_named("item").cloned().collect())
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
// getobjectproperty.htm / getobjectstatus.htm

#[derive(Debug, Deserialize)]
pub(crate) struct ObjectResult {
    #[serde(default)]
    pub result: String,
}

const PROPERTY_NOT_FOUND: &str = "(Property not found)";

/// Parses `<prtg><version/><result>...</result></prtg>`.
pub(crate) fn parse_result(xml: &str, name: &str) -> Result<String> {
    let reply: ObjectResult = from_reader(xml.as_bytes())?;
    let result = reply.result.trim().to_string();
    if result == PROPERTY_NOT_FOUND {
        return Err(PrtgError::ResourceNotFound(format!(
            "no object property of name: {}",
            name
        )));
    }
    Ok(result)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SENSORTREE: &str = r##"<?xml version="1.0" encoding="UTF-8" ?>
<prtg>
  <prtg-version>21.1.65.1767</prtg-version>
  <sensortree>
    <nodes>
      <group id="0" noaccess="0" active="-1">
        <id>0</id>
        <name>Root</name>
        <tags></tags>
        <probenode id="1" noaccess="0" active="-1">
          <id>1</id>
          <name>Local Probe</name>
          <status_raw>3</status_raw>
          <group id="53" noaccess="0" active="-1">
            <id>53</id>
            <name>Servers &amp; Storage</name>
            <device id="40" noaccess="0" active="-1">
              <id>40</id>
              <name>dc01</name>
              <host>10.0.0.1</host>
              <tags>windows dc</tags>
              <sensor id="2001" noaccess="0" active="-1">
                <id>2001</id>
                <name>Ping</name>
                <sensortype>Ping</sensortype>
                <status>Up</status>
                <status_raw>3</status_raw>
                <active>true</active>
                <lastvalue>1 msec</lastvalue>
                <tags>pingsensor</tags>
              </sensor>
            </device>
          </group>
        </probenode>
      </group>
    </nodes>
  </sensortree>
</prtg>
"##;

    #[test]
    fn parse_sensortree_top_element() {
        let root = parse_sensortree(SENSORTREE, 0).unwrap();
        assert_eq!(root.name, "group");
        assert_eq!(root.attributes.get("noaccess").map(String::as_str), Some("0"));
        assert_eq!(root.child_text("name"), Some("Root"));
        assert_eq!(root.child_text("tags"), Some(""));

        let probe = root.child("probenode").unwrap();
        let group = probe.child("group").unwrap();
        assert_eq!(group.child_text("name"), Some("Servers & Storage"));
        let device = group.child("device").unwrap();
        assert_eq!(device.children_named("sensor").count(), 1);
    }

    #[test]
    fn empty_sensortree_is_not_found() {
        let xml = r##"<prtg><sensortree><nodes></nodes></sensortree></prtg>"##;
        assert!(matches!(
            parse_sensortree(xml, 99999),
            Err(PrtgError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn broken_xml_is_an_error() {
        assert!(matches!(
            parse_document("<prtg><sensortree>"),
            Err(PrtgError::ParserError(_))
        ));
    }

    #[test]
    fn parse_channels() {
        let xml = r##"<?xml version="1.0" encoding="UTF-8" ?>
<channels totalcount="2" listend="1">
  <prtg-version>21.1.65.1767</prtg-version>
  <item>
    <name>Downtime</name>
    <lastvalue></lastvalue>
    <lastvalue_raw></lastvalue_raw>
    <objid>-4</objid>
  </item>
  <item>
    <name>Ping Time</name>
    <lastvalue>1,024 msec</lastvalue>
    <lastvalue_raw>1024.0000</lastvalue_raw>
    <objid>0</objid>
  </item>
</channels>
"##;
        let items = parse_channel_items(xml).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].child_text("objid"), Some("-4"));
        assert_eq!(items[1].child_text("lastvalue"), Some("1,024 msec"));
    }

    #[test]
    fn parse_property_result() {
        let xml = r##"<?xml version="1.0" encoding="UTF-8"?>
<prtg>
  <version>21.1.65.1767</version>
  <result>windows dc</result>
</prtg>
"##;
        assert_eq!(parse_result(xml, "tags").unwrap(), "windows dc");

        let xml = r##"<prtg><version>21.1.65.1767</version><result>(Property not found)</result></prtg>"##;
        assert!(matches!(
            parse_result(xml, "nope"),
            Err(PrtgError::ResourceNotFound(_))
        ));
    }
}
