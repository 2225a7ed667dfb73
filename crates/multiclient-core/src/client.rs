//! The seam between the multiclient and a single liteserver connection.
//!
//! The multiclient never speaks the liteserver protocol itself. It only needs
//! two probes from each connection, and a way to open one connection per
//! partitioned config at startup.

use multiclient_common::Result;
use std::future::Future;
use std::path::PathBuf;

/// Workchain id of the masterchain.
pub const MASTERCHAIN_ID: i32 = -1;

/// Shard prefix covering the whole workchain (`0x8000_0000_0000_0000`).
pub const SHARD_ID_ALL: i64 = i64::MIN;

/// Configuration handed to each connection at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Serialized global config holding exactly one liteserver
    pub global_config: String,
    /// Dedicated key-store directory for this connection, if key storage is enabled
    pub key_store: Option<PathBuf>,
    /// Network label, opaque to the multiclient
    pub blockchain_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId {
    pub workchain: i32,
    pub shard: i64,
    pub seqno: u32,
}

/// Result of a chain head query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterchainInfo {
    pub last: BlockId,
}

/// Parameters of a block lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLookup {
    /// Bitmask selecting which of `id.seqno`, `lt` and `utime` the lookup keys on
    pub mode: u32,
    pub id: BlockId,
    pub lt: u64,
    pub utime: u32,
}

impl BlockLookup {
    pub const MODE_BY_SEQNO: u32 = 1;

    pub fn by_seqno(id: BlockId) -> Self {
        Self {
            mode: Self::MODE_BY_SEQNO,
            id,
            lt: 0,
            utime: 0,
        }
    }
}

/// A connection to one liteserver.
///
/// Implementations run their transport independently; the multiclient only
/// awaits the returned futures from spawned probe tasks.
pub trait LiteClient: Send + Sync + 'static {
    /// Fetches the current masterchain head.
    fn get_masterchain_info(&self) -> impl Future<Output = Result<MasterchainInfo>> + Send;

    /// Looks up a block, returning its id on success.
    fn lookup_block(&self, lookup: BlockLookup) -> impl Future<Output = Result<BlockId>> + Send;
}

/// Opens liteserver connections during registry bootstrap.
pub trait ClientFactory {
    type Client: LiteClient;

    /// Opens the connection for the liteserver at `index`.
    ///
    /// # Errors
    ///
    /// Any error aborts multiclient startup.
    fn connect(&self, index: usize, config: ClientConfig) -> Result<Self::Client>;
}

impl<F, C> ClientFactory for F
where
    F: Fn(usize, ClientConfig) -> Result<C>,
    C: LiteClient,
{
    type Client = C;

    fn connect(&self, index: usize, config: ClientConfig) -> Result<C> {
        self(index, config)
    }
}
