use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Public key identifying a liteserver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteServerId {
    #[serde(rename = "@type")]
    pub key_type: String,
    pub key: String,
}

/// Typed view of a single `liteservers` entry.
///
/// Global configs store the address as a signed 32-bit integer, so the IPv4
/// octets are recovered by reinterpreting it as unsigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteServerDescriptor {
    pub ip: i64,
    pub port: u16,
    pub id: LiteServerId,
}

impl LiteServerDescriptor {
    pub fn ipv4(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.ip as u32)
    }
}

impl fmt::Display for LiteServerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ipv4(), self.port)
    }
}
