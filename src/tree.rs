use tracing::debug;

use crate::error::Result;
use crate::nodes::{Node, NodeKind};
use crate::PrtgClient;

/// A local copy of the PRTG object tree below a root id (0 = the whole server).
#[derive(Debug, Clone)]
pub struct PrtgTree {
    root_id: i64,
    root: Node,
}

impl PrtgTree {
    pub fn load(client: &PrtgClient, root_id: i64) -> Result<Self> {
        let root = client.load_node_as(root_id, NodeKind::Root)?;
        let tree = PrtgTree { root_id, root };
        debug!(
            "loaded tree at {}: {} probes, {} groups, {} devices, {} sensors",
            root_id,
            tree.all_probes().len(),
            tree.all_groups().len(),
            tree.all_devices().len(),
            tree.all_sensors().len()
        );
        Ok(tree)
    }

    /// Downloads the tree again and replaces everything cached.
    pub fn refresh(&mut self, client: &PrtgClient) -> Result<()> {
        self.root = client.load_node_as(self.root_id, NodeKind::Root)?;
        Ok(())
    }

    pub fn root_id(&self) -> i64 {
        self.root_id
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn probes(&self) -> Vec<&Node> {
        self.root.probes()
    }

    pub fn groups(&self) -> Vec<&Node> {
        self.root.groups()
    }

    pub fn devices(&self) -> Vec<&Node> {
        self.root.devices()
    }

    pub fn all_probes(&self) -> Vec<&Node> {
        self.root.descendants_of_kind(NodeKind::Probe)
    }

    pub fn all_groups(&self) -> Vec<&Node> {
        self.root.descendants_of_kind(NodeKind::Group)
    }

    pub fn all_devices(&self) -> Vec<&Node> {
        self.root.descendants_of_kind(NodeKind::Device)
    }

    pub fn all_sensors(&self) -> Vec<&Node> {
        self.root.descendants_of_kind(NodeKind::Sensor)
    }

    pub fn search_by_id(&self, id: i64) -> Option<&Node> {
        self.root.search_by_id(id)
    }

    pub fn search_by_id_mut(&mut self, id: i64) -> Option<&mut Node> {
        self.root.search_by_id_mut(id)
    }
}
