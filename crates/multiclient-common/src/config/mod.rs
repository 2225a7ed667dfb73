//! Network-wide config handling.
//!
//! A TON global config describes the whole network: the DHT bootstrap nodes,
//! the zerostate/validator info and a list of liteservers. The multiclient
//! opens one connection per liteserver, and each connection must only ever see
//! its own endpoint, so the global document is partitioned into one document
//! per liteserver that keeps the shared metadata verbatim.

pub mod liteserver;
pub mod partition;

pub use liteserver::{LiteServerDescriptor, LiteServerId};
pub use partition::{split_global_config_by_liteservers, GlobalConfig};
