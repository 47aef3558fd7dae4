use std::path::Path;
use std::time::Duration;

use dialoguer::Confirm;
use tracing::{debug, warn};

use super::{Node, NodeKind, Status};
use crate::api::ObjectRef;
use crate::chart::GraphOptions;
use crate::error::{PrtgError, Result};
use crate::PrtgClient;

/// Scanning intervals (seconds) PRTG offers out of the box.
pub const VALID_INTERVALS: [u32; 11] = [
    30, 60, 300, 600, 900, 1800, 3600, 14400, 21600, 43200, 86400,
];

impl Node {
    /// How property endpoints address this node.
    pub fn object_ref(&self) -> ObjectRef {
        match (self.kind, self.parent_id) {
            (NodeKind::Channel, Some(sensor_id)) => ObjectRef::channel(sensor_id, self.id),
            _ => ObjectRef::object(self.id),
        }
    }

    fn require_kind(&self, kind: NodeKind, action: &str) -> Result<()> {
        if self.kind != kind {
            return Err(PrtgError::InvalidOperation(format!(
                "{} is only supported on a {}, {} is a {}",
                action, kind, self, self.kind
            )));
        }
        Ok(())
    }

    fn parent_sensor(&self) -> Result<i64> {
        self.parent_id.ok_or_else(|| {
            PrtgError::InvalidOperation(format!("channel {} has no parent sensor", self))
        })
    }

    pub fn rename(&mut self, client: &PrtgClient, name: &str) -> Result<()> {
        if self.kind == NodeKind::Channel {
            return self.set_property(client, "name", name);
        }
        client.rename(self.id, name)?;
        self.set_local("name", name);
        Ok(())
    }

    /// Pauses the object, indefinitely when `duration` is `None`. Durations are
    /// sent in whole minutes. Channels cannot be paused, so their sensor is.
    pub fn pause(
        &mut self,
        client: &PrtgClient,
        duration: Option<Duration>,
        message: Option<&str>,
    ) -> Result<()> {
        if self.kind == NodeKind::Channel {
            let sensor_id = self.parent_sensor()?;
            warn!("channels cannot be paused, pausing parent sensor {}", sensor_id);
            return client.pause(sensor_id, duration, message);
        }
        client.pause(self.id, duration, message)?;
        self.set_local("status", "Paused");
        self.set_local("status_raw", Status::PausedByUser.raw());
        self.set_local("active", "false");
        debug!("{} {} marked as paused", self.kind, self.id);
        Ok(())
    }

    /// Resumes monitoring. The resulting status is only known after a
    /// refresh, so the cached status is cleared.
    pub fn resume(&mut self, client: &PrtgClient) -> Result<()> {
        if self.kind == NodeKind::Channel {
            let sensor_id = self.parent_sensor()?;
            warn!("channels cannot be resumed, resuming parent sensor {}", sensor_id);
            return client.resume(sensor_id);
        }
        client.resume(self.id)?;
        self.clear_local("status");
        self.clear_local("status_raw");
        self.set_local("active", "true");
        debug!("{} {} marked as resumed", self.kind, self.id);
        Ok(())
    }

    /// Clones the object below `target_id` under a new name. New objects can
    /// only be created this way through the API.
    pub fn duplicate(&self, client: &PrtgClient, name: &str, target_id: i64) -> Result<()> {
        match self.kind {
            NodeKind::Root => Err(PrtgError::InvalidOperation(
                "You cannot clone the root object.".to_string(),
            )),
            NodeKind::Channel => Err(PrtgError::InvalidOperation(
                "You cannot clone a channel".to_string(),
            )),
            _ => client.duplicate(self.id, name, target_id),
        }
    }

    /// Deletes the object on the server. With `confirm` the user is asked on
    /// the terminal first. Returns whether the delete request was sent. The
    /// local node stays until the next refresh.
    pub fn delete(&self, client: &PrtgClient, confirm: bool) -> Result<bool> {
        match self.kind {
            NodeKind::Root => {
                return Err(PrtgError::InvalidOperation(
                    "You cannot delete the root object.".to_string(),
                ))
            }
            NodeKind::Channel => {
                return Err(PrtgError::InvalidOperation(
                    "You cannot delete a channel".to_string(),
                ))
            }
            _ => {}
        }

        if confirm {
            let proceed = Confirm::new()
                .with_prompt(format!(
                    "Delete {} {}? Would you like to continue?",
                    self.kind, self
                ))
                .default(false)
                .interact()?;
            if !proceed {
                warn!("delete of {} {} declined", self.kind, self.id);
                return Ok(false);
            }
        }

        client.delete(self.id)?;
        Ok(true)
    }

    /// Reloads this node from the server.
    ///
    /// Containers (root, probes, groups, devices) get new properties and a new
    /// set of children. Sensors reload their properties, and their channels if
    /// those were loaded before. Channels re-read their sensor's channel table.
    pub fn refresh(&mut self, client: &PrtgClient) -> Result<()> {
        match self.kind {
            NodeKind::Channel => {
                let sensor_id = self.parent_sensor()?;
                let fresh = client
                    .channels(sensor_id)?
                    .into_iter()
                    .find(|channel| channel.id == self.id)
                    .ok_or_else(|| {
                        PrtgError::ResourceNotFound(format!(
                            "channel {} of sensor {}",
                            self.id, sensor_id
                        ))
                    })?;
                *self = fresh;
            }
            NodeKind::Sensor => {
                let had_channels = !self.channels().is_empty();
                let fresh = client.load_node_as(self.id, NodeKind::Sensor)?;
                self.properties = fresh.properties;
                self.attributes = fresh.attributes;
                if had_channels {
                    self.load_channels(client)?;
                }
            }
            kind => {
                let fresh = client.load_node_as(self.id, kind)?;
                self.properties = fresh.properties;
                self.attributes = fresh.attributes;
                self.children = fresh.children;
            }
        }
        debug!("refreshed {} {}", self.kind, self.id);
        Ok(())
    }

    pub fn set_property(&mut self, client: &PrtgClient, name: &str, value: &str) -> Result<()> {
        client.set_property(self.object_ref(), name, value)?;
        self.set_local(name, value);
        Ok(())
    }

    /// Reads a property from the server and caches it locally.
    pub fn get_property(&mut self, client: &PrtgClient, name: &str) -> Result<String> {
        let value = client.get_property(self.object_ref(), name)?;
        self.set_local(name, &value);
        Ok(value)
    }

    /// Sets the `params` property of a sensor.
    pub fn set_additional_param(&mut self, client: &PrtgClient, params: &str) -> Result<()> {
        self.require_kind(NodeKind::Sensor, "set_additional_param")?;
        self.set_property(client, "params", params)
    }

    /// Sets the scanning interval in seconds, see [`VALID_INTERVALS`].
    ///
    /// Inheritance of the interval still has to be switched off manually.
    pub fn set_interval(&mut self, client: &PrtgClient, interval: u32) -> Result<()> {
        if !VALID_INTERVALS.contains(&interval) {
            return Err(PrtgError::InvalidOperation(format!(
                "invalid interval {}s, valid intervals are {:?}",
                interval, VALID_INTERVALS
            )));
        }
        self.set_property(client, "interval", &interval.to_string())
    }

    /// Sets the address (`host` property) of a device.
    pub fn set_host(&mut self, client: &PrtgClient, host: &str) -> Result<()> {
        self.require_kind(NodeKind::Device, "set_host")?;
        self.set_property(client, "host", host)
    }

    /// Appends `tags` to the tags of the object, or replaces them with
    /// `clear_old`. Existing tags are taken from the cache and only fetched
    /// when the node has none cached.
    pub fn add_tags<S: AsRef<str>>(
        &mut self,
        client: &PrtgClient,
        tags: &[S],
        clear_old: bool,
    ) -> Result<()> {
        let mut all: Vec<String> = if clear_old {
            Vec::new()
        } else {
            let current = match self.property("tags") {
                Some(current) => current.to_string(),
                None => self.get_property(client, "tags")?,
            };
            current.split_whitespace().map(String::from).collect()
        };
        all.extend(tags.iter().map(|tag| tag.as_ref().to_string()));
        self.set_property(client, "tags", &all.join(" "))
    }

    /// Fetches the channels of a sensor, replacing the ones loaded before.
    pub fn load_channels(&mut self, client: &PrtgClient) -> Result<()> {
        self.require_kind(NodeKind::Sensor, "load_channels")?;
        let channels = client.channels(self.id)?;
        debug!("sensor {} has {} channels", self.id, channels.len());
        self.replace_channels(channels);
        Ok(())
    }

    /// Reads the current status text from the server and caches it.
    pub fn get_status(&mut self, client: &PrtgClient) -> Result<String> {
        let status = client.get_status(self.id)?;
        self.set_local("status", &status);
        Ok(status)
    }

    /// Acknowledges the alarm of a sensor, then re-reads its status.
    pub fn acknowledge(&mut self, client: &PrtgClient, message: &str) -> Result<()> {
        self.require_kind(NodeKind::Sensor, "acknowledge")?;
        client.acknowledge(self.id, message)?;
        self.get_status(client)?;
        Ok(())
    }

    /// Downloads a graph of a sensor and writes it to `path`.
    pub fn save_graph(
        &self,
        client: &PrtgClient,
        path: impl AsRef<Path>,
        options: &GraphOptions,
    ) -> Result<()> {
        self.require_kind(NodeKind::Sensor, "save_graph")?;
        let bytes = client.chart(self.id, options)?;
        std::fs::write(path.as_ref(), bytes)?;
        debug!(
            "saved graph of sensor {} to {}",
            self.id,
            path.as_ref().display()
        );
        Ok(())
    }
}
