use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{PrtgError, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Protocol {
    type Err = PrtgError;

    fn from_str(input: &str) -> Result<Self> {
        match input.to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            _ => Err(PrtgError::Config(format!(
                "unsupported protocol {:?}, expected http or https",
                input
            ))),
        }
    }
}

fn default_verify() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    30_000
}

/// Everything needed to reach a PRTG server.
///
/// Authentication uses the account's passhash (PRTG web interface > Setup >
/// Account Settings), never the plain password.
#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub user: String,
    pub passhash: String,
    #[serde(default)]
    pub protocol: Protocol,
    /// Falls back to the protocol's port (443 for https, 80 for http).
    #[serde(default)]
    pub port: Option<u16>,
    /// Id of the group/probe the tree is loaded from. 0 is the server root.
    #[serde(default)]
    pub root_id: i64,
    /// Verify the server's TLS certificate.
    #[serde(default = "default_verify")]
    pub verify: bool,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ConnectionConfig {
    pub fn new(host: impl ToString, user: impl ToString, passhash: impl ToString) -> Self {
        ConnectionConfig {
            host: host.to_string(),
            user: user.to_string(),
            passhash: passhash.to_string(),
            protocol: Protocol::default(),
            port: None,
            root_id: 0,
            verify: default_verify(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Takes protocol, host and port from `url`, e.g. `https://prtg.example.com:8443`.
    pub fn from_url(url: &str, user: impl ToString, passhash: impl ToString) -> Result<Self> {
        let url = Url::parse(url).map_err(|err| PrtgError::Config(format!("{url:?}: {err}")))?;
        let protocol: Protocol = url.scheme().parse()?;
        let host = url
            .host_str()
            .ok_or_else(|| PrtgError::Config(format!("no host in {:?}", url.as_str())))?;
        let mut config = ConnectionConfig::new(host, user, passhash).with_protocol(protocol);
        config.port = url.port();
        Ok(config)
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_root_id(mut self, root_id: i64) -> Self {
        self.root_id = root_id;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.protocol.default_port())
    }

    /// `{protocol}://{host}:{port}/`
    pub fn base_url(&self) -> Result<Url> {
        let raw = format!("{}://{}:{}/", self.protocol, self.host, self.port());
        Url::parse(&raw).map_err(|err| PrtgError::Config(format!("{raw:?}: {err}")))
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("passhash", &"***")
            .field("protocol", &self.protocol)
            .field("port", &self.port())
            .field("root_id", &self.root_id)
            .field("verify", &self.verify)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
