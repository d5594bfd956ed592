//! UDP listener section of the configuration file.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Address to listen on, e.g. `0.0.0.0:2055`. The `udp://` scheme
    /// prefix and a bare `:port` are also accepted.
    pub service_address: String,

    /// How many received packets may wait for the decoder before new
    /// arrivals are dropped.
    pub allowed_pending_messages: usize,

    /// Largest datagram accepted from the socket, in bytes.
    pub read_buffer_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            service_address: "0.0.0.0:2055".to_string(),
            allowed_pending_messages: 10_000,
            read_buffer_size: 65_535,
        }
    }
}

impl ListenerConfig {
    /// Parses `service_address` into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let raw = self.service_address.trim();
        let raw = raw.strip_prefix("udp://").unwrap_or(raw);
        if let Some(port) = raw.strip_prefix(':') {
            let port: u16 = port
                .parse()
                .map_err(|_| format!("Invalid port in service_address [{}]", self.service_address))?;
            return Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port));
        }
        raw.parse::<SocketAddr>()
            .map_err(|e| format!("Invalid service_address [{}]: {e}", self.service_address))
    }
}
