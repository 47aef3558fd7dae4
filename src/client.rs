use std::time::Duration;

use chrono::NaiveDateTime;
use reqwest::blocking::{Client, Response};
use tracing::debug;
use url::Url;

use crate::api::{self, Command, ObjectRef};
use crate::chart::GraphOptions;
use crate::config::ConnectionConfig;
use crate::error::{PrtgError, Result};
use crate::historic::{self, HistoricData};
use crate::nodes::{Node, NodeKind};
use crate::prtg_xml;
use crate::tree::PrtgTree;

/// The main interface to the PRTG API.
///
/// Every method sends exactly one blocking request. Node level actions that
/// also keep the local copy up to date live on [`Node`].
#[derive(Clone)]
pub struct PrtgClient {
    config: ConnectionConfig,
    base_url: Url,
    http: Client,
}

impl PrtgClient {
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        if config.timeout().is_zero() {
            return Err(PrtgError::Config("timeout must be greater than zero".to_string()));
        }
        let http = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(!config.verify)
            .build()?;
        Ok(PrtgClient {
            config,
            base_url,
            http,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    // -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

    /// Loads the tree below the configured root id.
    pub fn load_tree(&self) -> Result<PrtgTree> {
        PrtgTree::load(self, self.config.root_id)
    }

    pub fn load_tree_at(&self, root_id: i64) -> Result<PrtgTree> {
        PrtgTree::load(self, root_id)
    }

    /// Loads a single object with everything below it.
    pub fn load_node(&self, id: i64) -> Result<Node> {
        let element = self.sensor_tree(id)?;
        let kind = NodeKind::from_tag(&element.name).ok_or_else(|| {
            PrtgError::ParserError(format!("unexpected <{}> in sensortree", element.name))
        })?;
        Node::from_element(&element, kind, None)
    }

    /// Loads a single object that has to be of `kind`. A `Root` accepts any object.
    pub(crate) fn load_node_as(&self, id: i64, kind: NodeKind) -> Result<Node> {
        let element = self.sensor_tree(id)?;
        if kind != NodeKind::Root && NodeKind::from_tag(&element.name) != Some(kind) {
            return Err(PrtgError::ParserError(format!(
                "expected a {} at id {}, got <{}>",
                kind, id, element.name
            )));
        }
        Node::from_element(&element, kind, None)
    }

    /// Loads a device and its sensors without downloading the whole tree.
    pub fn load_device(&self, id: i64) -> Result<Node> {
        self.load_node_as(id, NodeKind::Device)
    }

    /// Loads a sensor together with its channels.
    pub fn load_sensor(&self, id: i64) -> Result<Node> {
        let mut sensor = self.load_node_as(id, NodeKind::Sensor)?;
        sensor.load_channels(self)?;
        Ok(sensor)
    }

    /// Channels of a sensor, as returned by the channel table.
    pub fn channels(&self, sensor_id: i64) -> Result<Vec<Node>> {
        let xml = self.request_text(Command::Channels { sensor_id })?;
        prtg_xml::parse_channel_items(&xml)?
            .iter()
            .map(|item| Node::from_element(item, NodeKind::Channel, Some(sensor_id)))
            .collect()
    }

    // -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

    pub fn rename(&self, id: i64, name: impl ToString) -> Result<()> {
        let name = name.to_string();
        self.request(Command::Rename { id, name })?;
        Ok(())
    }

    /// Pauses `id`, indefinitely without a duration. Durations are rounded up
    /// to whole minutes.
    pub fn pause(&self, id: i64, duration: Option<Duration>, message: Option<&str>) -> Result<()> {
        let message = message.map(String::from);
        let minutes = duration.map(|duration| ((duration.as_millis() + 59_999) / 60_000) as u64);
        let cmd = match minutes {
            Some(minutes) if minutes > 0 => Command::PauseFor {
                id,
                minutes,
                message,
            },
            _ => Command::Pause { id, message },
        };
        self.request(cmd)?;
        Ok(())
    }

    pub fn resume(&self, id: i64) -> Result<()> {
        self.request(Command::Resume { id })?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        debug!("deleting object {}", id);
        self.request(Command::Delete { id })?;
        Ok(())
    }

    pub fn duplicate(&self, id: i64, name: impl ToString, target_id: i64) -> Result<()> {
        let name = name.to_string();
        self.request(Command::Duplicate {
            id,
            name,
            target_id,
        })?;
        Ok(())
    }

    pub fn set_property(&self, target: ObjectRef, name: impl ToString, value: impl ToString) -> Result<()> {
        let name = name.to_string();
        let value = value.to_string();
        self.request(Command::SetProperty {
            target,
            name,
            value,
        })?;
        Ok(())
    }

    pub fn get_property(&self, target: ObjectRef, name: impl ToString) -> Result<String> {
        let name = name.to_string();
        let xml = self.request_text(Command::GetProperty {
            target,
            name: name.clone(),
        })?;
        prtg_xml::parse_result(&xml, &name)
    }

    pub fn get_status(&self, id: i64) -> Result<String> {
        let xml = self.request_text(Command::GetStatus { id })?;
        prtg_xml::parse_result(&xml, "status")
    }

    pub fn acknowledge(&self, id: i64, message: impl ToString) -> Result<()> {
        let message = message.to_string();
        self.request(Command::Acknowledge { id, message })?;
        Ok(())
    }

    /// Raw image data of a sensor graph.
    pub fn chart(&self, sensor_id: i64, options: &GraphOptions) -> Result<Vec<u8>> {
        let response = self.request(Command::Chart {
            sensor_id,
            options: options.clone(),
        })?;
        Ok(response.bytes()?.to_vec())
    }

    /// Historic values of `id` between `start` and `end`, averaged over
    /// `average` seconds (0 = raw values).
    pub fn historic_data(
        &self,
        id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        average: u32,
    ) -> Result<HistoricData> {
        let csv = self.request_text(Command::HistoricData {
            id,
            start,
            end,
            average,
        })?;
        historic::parse_historic_csv(&csv)
    }

    // -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

    pub(crate) fn sensor_tree(&self, id: i64) -> Result<prtg_xml::Element> {
        let xml = self.request_text(Command::SensorTree { id })?;
        prtg_xml::parse_sensortree(&xml, id)
    }

    fn request(&self, cmd: Command) -> Result<Response> {
        api::request(&self.http, &self.base_url, &self.config, &cmd)
    }

    fn request_text(&self, cmd: Command) -> Result<String> {
        Ok(self.request(cmd)?.text()?)
    }
}

impl std::fmt::Debug for PrtgClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrtgClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .finish()
    }
}
