use chrono::NaiveDateTime;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use tracing::info;
use url::Url;

use crate::chart::GraphOptions;
use crate::config::ConnectionConfig;
use crate::error::{PrtgError, Result};

/// Address of a PRTG object as the property endpoints expect it. Channels are
/// addressed through their sensor (`id`) plus the channel id (`subid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    pub id: i64,
    pub subid: Option<i64>,
}

impl ObjectRef {
    pub fn object(id: i64) -> Self {
        ObjectRef { id, subid: None }
    }

    pub fn channel(sensor_id: i64, channel_id: i64) -> Self {
        ObjectRef {
            id: sensor_id,
            subid: Some(channel_id),
        }
    }
}

/// Date format of the historic data endpoint.
pub(crate) const HISTORIC_DATE_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    SensorTree {
        id: i64,
    },
    Channels {
        sensor_id: i64,
    },
    Rename {
        id: i64,
        name: String,
    },
    Pause {
        id: i64,
        message: Option<String>,
    },
    PauseFor {
        id: i64,
        minutes: u64,
        message: Option<String>,
    },
    Resume {
        id: i64,
    },
    Delete {
        id: i64,
    },
    SetProperty {
        target: ObjectRef,
        name: String,
        value: String,
    },
    GetProperty {
        target: ObjectRef,
        name: String,
    },
    GetStatus {
        id: i64,
    },
    Duplicate {
        id: i64,
        name: String,
        target_id: i64,
    },
    Acknowledge {
        id: i64,
        message: String,
    },
    Chart {
        sensor_id: i64,
        options: GraphOptions,
    },
    HistoricData {
        id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        average: u32,
    },
}

fn push_target(query: &mut Vec<(&'static str, String)>, target: &ObjectRef) {
    query.push(("id", target.id.to_string()));
    if let Some(subid) = target.subid {
        query.push(("subid", subid.to_string()));
    }
}

impl Command {
    /// Path relative to the server root. Everything except charts lives below `api/`.
    pub(crate) fn path(&self) -> String {
        use Command::*;
        let endpoint = match self {
            SensorTree { .. } | Channels { .. } => "table.xml",
            Rename { .. } => "rename.htm",
            Pause { .. } | Resume { .. } => "pause.htm",
            PauseFor { .. } => "pauseobjectfor.htm",
            Delete { .. } => "deleteobject.htm",
            SetProperty { .. } => "setobjectproperty.htm",
            GetProperty { .. } => "getobjectproperty.htm",
            GetStatus { .. } => "getobjectstatus.htm",
            Duplicate { .. } => "duplicateobject.htm",
            Acknowledge { .. } => "acknowledgealarm.htm",
            HistoricData { .. } => "historicdata.csv",
            Chart { options, .. } => return format!("chart.{}", options.format.extension()),
        };
        format!("api/{}", endpoint)
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        use Command::*;
        let mut query: Vec<(&'static str, String)> = Vec::new();
        match self {
            SensorTree { id } => {
                query.push(("content", "sensortree".to_string()));
                query.push(("output", "xml".to_string()));
                query.push(("id", id.to_string()));
            }
            Channels { sensor_id } => {
                query.push(("content", "channels".to_string()));
                query.push(("output", "xml".to_string()));
                query.push(("columns", "name,lastvalue_,objid".to_string()));
                query.push(("id", sensor_id.to_string()));
            }
            Rename { id, name } => {
                query.push(("id", id.to_string()));
                query.push(("value", name.clone()));
            }
            Pause { id, message } => {
                query.push(("id", id.to_string()));
                query.push(("action", "0".to_string()));
                if let Some(message) = message {
                    query.push(("pausemsg", message.clone()));
                }
            }
            PauseFor {
                id,
                minutes,
                message,
            } => {
                query.push(("id", id.to_string()));
                query.push(("duration", minutes.to_string()));
                if let Some(message) = message {
                    query.push(("pausemsg", message.clone()));
                }
            }
            Resume { id } => {
                query.push(("id", id.to_string()));
                query.push(("action", "1".to_string()));
            }
            Delete { id } => {
                query.push(("id", id.to_string()));
                query.push(("approve", "1".to_string()));
            }
            SetProperty {
                target,
                name,
                value,
            } => {
                push_target(&mut query, target);
                query.push(("name", name.clone()));
                query.push(("value", value.clone()));
            }
            GetProperty { target, name } => {
                push_target(&mut query, target);
                query.push(("name", name.clone()));
                query.push(("show", "text".to_string()));
            }
            GetStatus { id } => {
                query.push(("id", id.to_string()));
                query.push(("name", "status".to_string()));
                query.push(("show", "text".to_string()));
            }
            Duplicate {
                id,
                name,
                target_id,
            } => {
                query.push(("id", id.to_string()));
                query.push(("name", name.clone()));
                query.push(("targetid", target_id.to_string()));
            }
            Acknowledge { id, message } => {
                query.push(("id", id.to_string()));
                query.push(("ackmsg", message.clone()));
            }
            Chart { sensor_id, options } => {
                let (width, height, font) = options.size.dimensions();
                query.push(("type", "graph".to_string()));
                query.push(("graphid", options.graph_id.to_string()));
                query.push(("id", sensor_id.to_string()));
                query.push(("width", width.to_string()));
                query.push(("height", height.to_string()));
                if !options.hidden_channels.is_empty() {
                    let hidden = options
                        .hidden_channels
                        .iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>()
                        .join(",");
                    query.push(("hide", hidden));
                }
                query.push(("plotcolor", "#ffffff".to_string()));
                query.push(("gridcolor", "#ffffff".to_string()));
                query.push((
                    "graphstyling",
                    format!("showLegend='1' baseFontSize='{}'", font),
                ));
            }
            HistoricData {
                id,
                start,
                end,
                average,
            } => {
                query.push(("id", id.to_string()));
                query.push(("avg", average.to_string()));
                query.push(("sdate", start.format(HISTORIC_DATE_FORMAT).to_string()));
                query.push(("edate", end.format(HISTORIC_DATE_FORMAT).to_string()));
            }
        }
        query
    }
}

/// Sends one raw HTTP request to the PRTG server.
pub(crate) fn request(
    http: &Client,
    base_url: &Url,
    config: &ConnectionConfig,
    cmd: &Command,
) -> Result<Response> {
    let path = cmd.path();
    let url = base_url
        .join(&path)
        .map_err(|err| PrtgError::Config(format!("cannot build url for {}: {}", path, err)))?;

    let response = http
        .get(url.clone())
        .query(&cmd.query())
        .query(&[
            ("username", config.user.as_str()),
            ("passhash", config.passhash.as_str()),
        ])
        .send()?;
    let status = response.status();
    info!(
        "[prtg api] {} status: {:?} {:?}",
        path,
        status,
        status.canonical_reason().unwrap_or_default()
    );

    match status {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(PrtgError::Authentication),
        StatusCode::NOT_FOUND => Err(PrtgError::ResourceNotFound(format!(
            "no resource at url {}",
            url
        ))),
        status => Err(PrtgError::Status(status)),
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
