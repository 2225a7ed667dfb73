use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;

/// Liveness and capability view of a worker, as used by the selector.
pub trait Eligible {
    fn is_alive(&self) -> bool;
    fn is_archival(&self) -> bool;
}

/// A liteserver connection in the registry with its monitoring state
#[derive(Debug)]
pub struct Worker<C> {
    client: Arc<C>,
    /// Result of the last completed alive-probe
    pub alive: bool,
    /// An alive-probe is outstanding
    pub probe_in_flight: bool,
    /// Masterchain head seqno from the last successful alive-probe
    pub last_chain_seqno: Option<u32>,
    /// Failed alive-probes since the last success
    pub consecutive_failures: u32,
    /// Earliest time the next alive-probe may be issued
    pub retry_not_before: Option<Instant>,
    /// Result of the last completed archival probe
    pub archival: bool,
    /// An archival probe is outstanding
    pub archival_probe_in_flight: bool,
    /// Set when the worker crossed the failure ceiling
    pub excluded_since: Option<Instant>,
}

impl<C> Worker<C> {
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
            alive: false,
            probe_in_flight: false,
            last_chain_seqno: None,
            consecutive_failures: 0,
            retry_not_before: None,
            archival: false,
            archival_probe_in_flight: false,
            excluded_since: None,
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded_since.is_some()
    }

    pub fn status(&self, index: usize) -> WorkerStatus {
        WorkerStatus {
            index,
            alive: self.alive,
            archival: self.archival,
            probe_in_flight: self.probe_in_flight,
            last_chain_seqno: self.last_chain_seqno,
            consecutive_failures: self.consecutive_failures,
            excluded: self.is_excluded(),
        }
    }
}

impl<C> Eligible for Worker<C> {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn is_archival(&self) -> bool {
        self.archival
    }
}

/// Point-in-time copy of a worker's state, without its connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerStatus {
    pub index: usize,
    pub alive: bool,
    pub archival: bool,
    pub probe_in_flight: bool,
    pub last_chain_seqno: Option<u32>,
    pub consecutive_failures: u32,
    pub excluded: bool,
}

impl WorkerStatus {
    /// A status with the given liveness flags and otherwise idle state.
    pub fn new(index: usize, alive: bool, archival: bool) -> Self {
        Self {
            index,
            alive,
            archival,
            probe_in_flight: false,
            last_chain_seqno: None,
            consecutive_failures: 0,
            excluded: false,
        }
    }
}

impl Eligible for WorkerStatus {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn is_archival(&self) -> bool {
        self.archival
    }
}
