use tracing::debug;

use crate::client::{BlockId, BlockLookup, MASTERCHAIN_ID, SHARD_ID_ALL};
use crate::worker::Worker;

/// Seqno of the reference block used to detect archival liteservers.
///
/// Regular liteservers prune old state, so only an archival node can still
/// resolve a masterchain block this close to genesis.
pub const ARCHIVAL_REFERENCE_SEQNO: u32 = 3;

/// Classifies alive workers as archival or not.
#[derive(Debug, Clone)]
pub struct ArchivalChecker {
    lookup: BlockLookup,
}

impl ArchivalChecker {
    pub fn new() -> Self {
        Self {
            lookup: BlockLookup::by_seqno(BlockId {
                workchain: MASTERCHAIN_ID,
                shard: SHARD_ID_ALL,
                seqno: ARCHIVAL_REFERENCE_SEQNO,
            }),
        }
    }

    /// The block lookup sent as the archival probe.
    pub fn lookup(&self) -> BlockLookup {
        self.lookup
    }

    /// Marks and returns the workers that get an archival probe now.
    ///
    /// Dead workers are skipped, as are workers whose previous archival probe
    /// has not completed.
    pub fn due_probes<C>(&self, workers: &mut [Worker<C>]) -> Vec<usize> {
        workers
            .iter_mut()
            .enumerate()
            .filter(|(_, worker)| worker.alive && !worker.archival_probe_in_flight)
            .map(|(index, worker)| {
                worker.archival_probe_in_flight = true;
                index
            })
            .collect()
    }

    /// Applies a completed archival probe.
    pub fn apply_result<C>(&self, index: usize, worker: &mut Worker<C>, is_archival: bool) {
        debug!("LS #{} archival: {}", index, is_archival);
        worker.archival_probe_in_flight = false;
        worker.archival = is_archival;
    }
}

impl Default for ArchivalChecker {
    fn default() -> Self {
        Self::new()
    }
}
