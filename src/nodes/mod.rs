use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{PrtgError, Result};
use crate::prtg_xml::Element;

mod node_impl;
mod status;
pub use node_impl::VALID_INTERVALS;
pub use status::Status;

/// The fixed PRTG object hierarchy. `Root` is the object a tree was loaded from.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NodeKind {
    Root,
    Probe,
    Group,
    Device,
    Sensor,
    Channel,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::Probe => "Probe",
            NodeKind::Group => "Group",
            NodeKind::Device => "Device",
            NodeKind::Sensor => "Sensor",
            NodeKind::Channel => "Channel",
        }
    }

    /// Maps a sensortree tag to a kind.
    pub(crate) fn from_tag(tag: &str) -> Option<NodeKind> {
        match tag {
            "probenode" => Some(NodeKind::Probe),
            "group" => Some(NodeKind::Group),
            "device" => Some(NodeKind::Device),
            "sensor" => Some(NodeKind::Sensor),
            _ => None,
        }
    }

    pub fn can_contain(&self, child: NodeKind) -> bool {
        use NodeKind::*;
        match self {
            Root => matches!(child, Probe | Group | Device | Sensor),
            Group => matches!(child, Probe | Group | Device),
            Probe => matches!(child, Group | Device),
            Device => child == Sensor,
            Sensor => child == Channel,
            Channel => false,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A local copy of one PRTG object and the subtree below it.
///
/// Every scalar value PRTG reports for the object (`name`, `status`, `tags`,
/// `host`, ...) is kept in [`Node::properties`]. The copy is only as fresh as the
/// last load or refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    id: i64,
    parent_id: Option<i64>,
    properties: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    children: Vec<Node>,
}

fn parse_id(element: &Element, tag: &str) -> Result<i64> {
    let raw = element.child_text(tag).ok_or_else(|| {
        PrtgError::ParserError(format!("<{}> element without <{}>", element.name, tag))
    })?;
    raw.trim().parse::<i64>().map_err(|_| {
        PrtgError::ParserError(format!("invalid id {:?} in <{}>", raw, element.name))
    })
}

impl Node {
    pub(crate) fn from_element(element: &Element, kind: NodeKind, parent_id: Option<i64>) -> Result<Self> {
        let id_tag = if kind == NodeKind::Channel { "objid" } else { "id" };
        let id = parse_id(element, id_tag)?;

        let mut properties = BTreeMap::new();
        let mut children = Vec::new();
        for child in &element.children {
            match NodeKind::from_tag(&child.name) {
                Some(child_kind) if kind.can_contain(child_kind) => {
                    children.push(Node::from_element(child, child_kind, Some(id))?);
                }
                _ if child.is_scalar() => {
                    properties.insert(child.name.clone(), child.text.clone());
                }
                _ => {}
            }
        }

        Ok(Node {
            kind,
            id,
            parent_id,
            properties,
            attributes: element.attributes.clone(),
            children,
        })
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Id of the containing object: the device of a sensor, the sensor of a channel.
    pub fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }

    pub fn name(&self) -> &str {
        self.property("name").unwrap_or_default()
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// XML attributes of the object element (`noaccess`, `active`, ...).
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn status(&self) -> Option<Status> {
        self.property("status_raw")?.parse().ok()
    }

    pub fn status_text(&self) -> Option<&str> {
        self.property("status")
    }

    /// Sensors report `<active>true</active>`, containers an `active="-1"` attribute.
    pub fn is_active(&self) -> bool {
        let raw = self
            .property("active")
            .or_else(|| self.attributes.get("active").map(String::as_str));
        match raw.map(str::trim) {
            Some("false") | Some("0") => false,
            _ => true,
        }
    }

    pub fn tags(&self) -> Vec<&str> {
        self.property("tags")
            .map(|tags| tags.split_whitespace().collect())
            .unwrap_or_default()
    }

    fn children_of_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.children.iter().filter(|node| node.kind == kind).collect()
    }

    pub fn probes(&self) -> Vec<&Node> {
        self.children_of_kind(NodeKind::Probe)
    }

    pub fn groups(&self) -> Vec<&Node> {
        self.children_of_kind(NodeKind::Group)
    }

    pub fn devices(&self) -> Vec<&Node> {
        self.children_of_kind(NodeKind::Device)
    }

    pub fn sensors(&self) -> Vec<&Node> {
        self.children_of_kind(NodeKind::Sensor)
    }

    /// Empty until [`Node::load_channels`] ran.
    pub fn channels(&self) -> Vec<&Node> {
        self.children_of_kind(NodeKind::Channel)
    }

    /// All nodes below this one of the given kind, depth first in document order.
    pub fn descendants_of_kind(&self, kind: NodeKind) -> Vec<&Node> {
        fn walk<'a>(node: &'a Node, kind: NodeKind, out: &mut Vec<&'a Node>) {
            for child in &node.children {
                if child.kind == kind {
                    out.push(child);
                }
                walk(child, kind, out);
            }
        }
        let mut out = Vec::new();
        walk(self, kind, &mut out);
        out
    }

    /// Finds the node with `id` among this node and everything below it.
    ///
    /// Channel ids are only unique per sensor, so channels are never matched.
    pub fn search_by_id(&self, id: i64) -> Option<&Node> {
        if self.id == id && self.kind != NodeKind::Channel {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.search_by_id(id))
    }

    pub fn search_by_id_mut(&mut self, id: i64) -> Option<&mut Node> {
        if self.id == id && self.kind != NodeKind::Channel {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.search_by_id_mut(id))
    }

    /// Sensors of a device grouped by their status text. `Up`, `Down`,
    /// `Warning` and `Paused` are always present.
    pub fn sensors_by_status(&self) -> BTreeMap<String, Vec<&Node>> {
        let mut by_status: BTreeMap<String, Vec<&Node>> = ["Up", "Down", "Warning", "Paused"]
            .iter()
            .map(|status| (status.to_string(), Vec::new()))
            .collect();
        for sensor in self.sensors() {
            let status = sensor.status_text().unwrap_or("Unknown").trim().to_string();
            by_status.entry(status).or_default().push(sensor);
        }
        by_status
    }

    /// Numeric part of a channel's last value.
    pub fn last_value(&self) -> Option<f64> {
        self.property("lastvalue_raw")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .or_else(|| parse_last_value(self.property("lastvalue")?).map(|(value, _)| value))
    }

    /// Unit of a channel's last value, e.g. `msec` for `"12 msec"`.
    pub fn unit(&self) -> Option<&str> {
        parse_last_value(self.property("lastvalue")?).and_then(|(_, unit)| unit)
    }

    pub(crate) fn set_local(&mut self, name: &str, value: impl ToString) {
        self.properties.insert(name.to_string(), value.to_string());
    }

    pub(crate) fn clear_local(&mut self, name: &str) {
        self.properties.remove(name);
    }

    pub(crate) fn replace_channels(&mut self, channels: Vec<Node>) {
        self.children.retain(|child| child.kind != NodeKind::Channel);
        self.children.extend(channels);
    }
}

/// Splits a formatted value such as `"1,024 msec"` into `(1024.0, Some("msec"))`.
fn parse_last_value(raw: &str) -> Option<(f64, Option<&str>)> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^\s*(-?[\d,]*\.?\d+)\s*(.*?)\s*$").unwrap();
    }
    let captures = RE.captures(raw)?;
    let value = captures
        .get(1)?
        .as_str()
        .replace(',', "")
        .parse::<f64>()
        .ok()?;
    let unit = captures
        .get(2)
        .map(|unit| unit.as_str())
        .filter(|unit| !unit.is_empty());
    Some((value, unit))
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            NodeKind::Channel => write!(f, "<Name: {}, ID: {}>", self.name(), self.id),
            _ => write!(
                f,
                "<Name: {}, ID: {}, Active: {}>",
                self.name(),
                self.id,
                self.is_active()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prtg_xml::{self, tests::SENSORTREE};

    fn root() -> Node {
        let element = prtg_xml::parse_sensortree(SENSORTREE, 0).unwrap();
        Node::from_element(&element, NodeKind::Root, None).unwrap()
    }

    #[test]
    fn builds_hierarchy() {
        let root = root();
        assert_eq!(root.kind(), NodeKind::Root);
        assert_eq!(root.id(), 0);
        assert_eq!(root.name(), "Root");
        assert_eq!(root.property("tags"), Some(""));

        let probes = root.probes();
        assert_eq!(probes.len(), 1);
        assert_eq!(probes[0].name(), "Local Probe");
        assert_eq!(probes[0].parent_id(), Some(0));

        let group = probes[0].groups()[0];
        assert_eq!(group.id(), 53);
        assert_eq!(group.name(), "Servers & Storage");

        let device = group.devices()[0];
        assert_eq!(device.property("host"), Some("10.0.0.1"));
        assert_eq!(device.tags(), vec!["windows", "dc"]);

        let sensor = device.sensors()[0];
        assert_eq!(sensor.id(), 2001);
        assert_eq!(sensor.parent_id(), Some(40));
        assert_eq!(sensor.status(), Some(Status::Up));
        assert!(sensor.is_active());
        assert!(sensor.channels().is_empty());
    }

    #[test]
    fn flattened_views_and_search() {
        let mut root = root();
        assert_eq!(root.descendants_of_kind(NodeKind::Probe).len(), 1);
        assert_eq!(root.descendants_of_kind(NodeKind::Group).len(), 1);
        assert_eq!(root.descendants_of_kind(NodeKind::Device).len(), 1);
        assert_eq!(root.descendants_of_kind(NodeKind::Sensor).len(), 1);

        assert_eq!(root.search_by_id(40).map(Node::kind), Some(NodeKind::Device));
        assert!(root.search_by_id(12345).is_none());

        root.search_by_id_mut(2001).unwrap().set_local("name", "Ping v2");
        assert_eq!(root.search_by_id(2001).unwrap().name(), "Ping v2");
    }

    #[test]
    fn missing_id_is_a_parse_error() {
        let element = prtg_xml::parse_document("<device><name>x</name></device>").unwrap();
        assert!(matches!(
            Node::from_element(&element, NodeKind::Device, None),
            Err(PrtgError::ParserError(_))
        ));
    }

    #[test]
    fn sensors_by_status() {
        let xml = r##"<device><id>40</id><name>dc01</name>
            <sensor><id>1</id><status>Up</status></sensor>
            <sensor><id>2</id><status>Down</status></sensor>
            <sensor><id>3</id><status>Up</status></sensor>
            <sensor><id>4</id><status>Unusual</status></sensor>
        </device>"##;
        let element = prtg_xml::parse_document(xml).unwrap();
        let device = Node::from_element(&element, NodeKind::Device, None).unwrap();
        let by_status = device.sensors_by_status();
        assert_eq!(by_status["Up"].len(), 2);
        assert_eq!(by_status["Down"].len(), 1);
        assert!(by_status["Warning"].is_empty());
        assert!(by_status["Paused"].is_empty());
        assert_eq!(by_status["Unusual"][0].id(), 4);
    }

    #[test]
    fn last_value() {
        assert_eq!(parse_last_value("1,024 msec"), Some((1024.0, Some("msec"))));
        assert_eq!(parse_last_value("99.5 %"), Some((99.5, Some("%"))));
        assert_eq!(parse_last_value("17"), Some((17.0, None)));
        assert_eq!(parse_last_value(""), None);
        assert_eq!(parse_last_value("No data"), None);

        let xml = r##"<item><name>Ping Time</name><lastvalue>12 msec</lastvalue><objid>0</objid></item>"##;
        let element = prtg_xml::parse_document(xml).unwrap();
        let channel = Node::from_element(&element, NodeKind::Channel, Some(2001)).unwrap();
        assert_eq!(channel.last_value(), Some(12.0));
        assert_eq!(channel.unit(), Some("msec"));
        assert_eq!(channel.to_string(), "<Name: Ping Time, ID: 0>");
    }

    #[test]
    fn display() {
        let root = root();
        assert_eq!(root.to_string(), "<Name: Root, ID: 0, Active: true>");
    }
}
