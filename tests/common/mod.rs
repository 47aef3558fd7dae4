#![allow(dead_code)]

use mockito::{Matcher, Mock, Server};
use prtgapi::{ConnectionConfig, PrtgClient};

pub const USER: &str = "prtgadmin";
pub const PASSHASH: &str = "1234567890";

/// Root with one probe holding two groups, the second group has one device
/// with two sensors.
pub const TREE: &str = r##"<?xml version="1.0" encoding="UTF-8" ?>
<prtg>
  <prtg-version>21.1.65.1767</prtg-version>
  <sensortree>
    <nodes>
      <group id="0" noaccess="0" active="-1">
        <id>0</id>
        <name>Root</name>
        <probenode id="1" noaccess="0" active="-1">
          <id>1</id>
          <name>Local Probe</name>
          <group id="10" noaccess="0" active="-1">
            <id>10</id>
            <name>Linux</name>
          </group>
          <group id="20" noaccess="0" active="-1">
            <id>20</id>
            <name>Windows</name>
            <device id="2100" noaccess="0" active="-1">
              <id>2100</id>
              <name>dc01</name>
              <host>10.0.0.10</host>
              <tags>windows dc</tags>
              <sensor id="3001" noaccess="0" active="-1">
                <id>3001</id>
                <name>Ping</name>
                <status>Up</status>
                <status_raw>3</status_raw>
                <active>true</active>
                <tags>pingsensor</tags>
              </sensor>
              <sensor id="3002" noaccess="0" active="-1">
                <id>3002</id>
                <name>HTTP</name>
                <status>Down</status>
                <status_raw>5</status_raw>
                <active>true</active>
              </sensor>
            </device>
          </group>
        </probenode>
      </group>
    </nodes>
  </sensortree>
</prtg>
"##;

/// Group 20 after a second device was added on the server.
pub const GROUP_20: &str = r##"<?xml version="1.0" encoding="UTF-8" ?>
<prtg>
  <sensortree>
    <nodes>
      <group id="20" noaccess="0" active="-1">
        <id>20</id>
        <name>Windows Servers</name>
        <device id="2100" noaccess="0" active="-1">
          <id>2100</id>
          <name>dc01</name>
        </device>
        <device id="2101" noaccess="0" active="-1">
          <id>2101</id>
          <name>dc02</name>
        </device>
      </group>
    </nodes>
  </sensortree>
</prtg>
"##;

/// Device 2100 with its ping sensor renamed and a new sensor on the server.
pub const DEVICE_2100: &str = r##"<?xml version="1.0" encoding="UTF-8" ?>
<prtg>
  <sensortree>
    <nodes>
      <device id="2100" noaccess="0" active="-1">
        <id>2100</id>
        <name>dc01</name>
        <host>10.0.0.10</host>
        <tags>windows dc</tags>
        <sensor id="3001" noaccess="0" active="-1">
          <id>3001</id>
          <name>Ping 2</name>
          <status>Warning</status>
          <status_raw>4</status_raw>
        </sensor>
        <sensor id="3003" noaccess="0" active="-1">
          <id>3003</id>
          <name>Disk Free</name>
          <status>Up</status>
          <status_raw>3</status_raw>
        </sensor>
      </device>
    </nodes>
  </sensortree>
</prtg>
"##;

pub const SENSOR_3001: &str = r##"<?xml version="1.0" encoding="UTF-8" ?>
<prtg>
  <sensortree>
    <nodes>
      <sensor id="3001" noaccess="0" active="-1">
        <id>3001</id>
        <name>Ping</name>
        <status>Up</status>
        <status_raw>3</status_raw>
        <active>true</active>
      </sensor>
    </nodes>
  </sensortree>
</prtg>
"##;

pub const CHANNELS_3001: &str = r##"<?xml version="1.0" encoding="UTF-8" ?>
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
    <lastvalue>12 msec</lastvalue>
    <lastvalue_raw>12.0000</lastvalue_raw>
    <objid>0</objid>
  </item>
</channels>
"##;

pub fn result(value: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><prtg><version>21.1.65.1767</version><result>{}</result></prtg>",
        value
    )
}

pub fn client(server: &Server) -> PrtgClient {
    let config = ConnectionConfig::from_url(&server.url(), USER, PASSHASH).unwrap();
    PrtgClient::new(config).unwrap()
}

/// Matches the credentials plus every given pair.
pub fn query(pairs: &[(&str, &str)]) -> Matcher {
    let mut matchers = vec![
        Matcher::UrlEncoded("username".into(), USER.into()),
        Matcher::UrlEncoded("passhash".into(), PASSHASH.into()),
    ];
    matchers.extend(
        pairs
            .iter()
            .map(|(key, value)| Matcher::UrlEncoded(key.to_string(), value.to_string())),
    );
    Matcher::AllOf(matchers)
}

pub fn mock_sensortree(server: &mut Server, id: i64, body: &str) -> Mock {
    server
        .mock("GET", "/api/table.xml")
        .match_query(query(&[
            ("content", "sensortree"),
            ("output", "xml"),
            ("id", &id.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml; charset=UTF-8")
        .with_body(body)
        .expect(1)
        .create()
}

pub fn mock_channels(server: &mut Server, sensor_id: i64, body: &str) -> Mock {
    server
        .mock("GET", "/api/table.xml")
        .match_query(query(&[
            ("content", "channels"),
            ("id", &sensor_id.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml; charset=UTF-8")
        .with_body(body)
        .expect(1)
        .create()
}

/// An endpoint answering `<html>OK</html>` exactly once for the given query.
pub fn mock_action(server: &mut Server, path: &str, pairs: &[(&str, &str)]) -> Mock {
    server
        .mock("GET", path)
        .match_query(query(pairs))
        .with_status(200)
        .with_body("<html>OK</html>")
        .expect(1)
        .create()
}

/// Fails the test on [`Mock::assert`] if any request reaches the server.
pub fn mock_nothing(server: &mut Server) -> Mock {
    server
        .mock("GET", Matcher::Any)
        .match_query(Matcher::Any)
        .expect(0)
        .create()
}
