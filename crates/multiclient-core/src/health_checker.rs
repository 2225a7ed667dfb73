use multiclient_common::Result;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::client::MasterchainInfo;
use crate::worker::Worker;

/// Health check configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckConfig {
    /// Failed retries tolerated before a dead worker stops being probed
    pub max_consecutive_alive_check_errors: u32,
    /// Fixed wait after a failed alive-probe before the next attempt
    pub retry_interval: Duration,
    /// Upper bound on a single probe; a probe that exceeds it counts as failed
    pub probe_timeout: Duration,
    /// How long an excluded worker waits before a recovery probe.
    ///
    /// `None` keeps excluded workers out for the life of the process.
    pub exclusion_cooldown: Option<Duration>,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            max_consecutive_alive_check_errors: 3,
            retry_interval: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(5),
            exclusion_cooldown: Some(Duration::from_secs(300)),
        }
    }
}

/// What the health pass decided for one worker on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliveCheck {
    /// An earlier probe has not completed yet
    InFlight,
    /// Over the failure ceiling and not yet due for a recovery probe
    Excluded,
    /// Dead and inside its retry window
    WaitingForRetry,
    /// Issue a probe now
    Probe,
}

/// Decides which workers get an alive-probe and applies probe results.
///
/// The checker holds no per-worker state of its own; everything lives in
/// the [`Worker`] records, which only the owning scheduling loop mutates.
#[derive(Debug, Clone)]
pub struct HealthChecker {
    config: HealthCheckConfig,
}

impl HealthChecker {
    pub fn new(config: HealthCheckConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HealthCheckConfig {
        &self.config
    }

    /// Evaluates one worker for this tick.
    ///
    /// Consumes an elapsed retry window (clearing it and counting the retry)
    /// and marks the worker in flight when the decision is [`AliveCheck::Probe`].
    pub fn evaluate<C>(&self, index: usize, worker: &mut Worker<C>, now: Instant) -> AliveCheck {
        if worker.probe_in_flight {
            debug!("LS #{} is waiting for update", index);
            return AliveCheck::InFlight;
        }

        if !worker.alive {
            if worker.consecutive_failures > self.config.max_consecutive_alive_check_errors {
                return self.evaluate_excluded(index, worker, now);
            }

            match worker.retry_not_before {
                Some(deadline) if now >= deadline => {
                    debug!("LS #{} retrying check", index);
                    worker.retry_not_before = None;
                    worker.consecutive_failures += 1;
                }
                Some(_) => {
                    debug!("LS #{} waiting for retry", index);
                    return AliveCheck::WaitingForRetry;
                }
                None if worker.consecutive_failures != 0 => {
                    return AliveCheck::WaitingForRetry;
                }
                None => {}
            }
        }

        worker.probe_in_flight = true;
        AliveCheck::Probe
    }

    fn evaluate_excluded<C>(&self, index: usize, worker: &mut Worker<C>, now: Instant) -> AliveCheck {
        let Some(since) = worker.excluded_since else {
            warn!(
                "LS #{} excluded after {} consecutive failed alive checks",
                index, worker.consecutive_failures
            );
            worker.excluded_since = Some(now);
            return AliveCheck::Excluded;
        };

        match self.config.exclusion_cooldown {
            Some(cooldown) if now.saturating_duration_since(since) >= cooldown => {
                info!("LS #{} sending recovery probe", index);
                worker.excluded_since = Some(now);
                worker.retry_not_before = None;
                worker.probe_in_flight = true;
                AliveCheck::Probe
            }
            _ => {
                debug!("LS #{} is dead, retry count exceeded", index);
                AliveCheck::Excluded
            }
        }
    }

    /// Runs [`evaluate`](Self::evaluate) over every worker in index order and
    /// returns the indices that must be probed now.
    pub fn due_probes<C>(&self, workers: &mut [Worker<C>], now: Instant) -> Vec<usize> {
        workers
            .iter_mut()
            .enumerate()
            .filter_map(|(index, worker)| {
                (self.evaluate(index, worker, now) == AliveCheck::Probe).then_some(index)
            })
            .collect()
    }

    /// Applies a completed alive-probe.
    pub fn apply_result<C>(
        &self,
        index: usize,
        worker: &mut Worker<C>,
        result: Result<MasterchainInfo>,
        now: Instant,
    ) {
        worker.probe_in_flight = false;

        match result {
            Ok(info) => {
                let seqno = info.last.seqno;
                debug!("LS #{} is_alive: true last_mc_seqno: {}", index, seqno);
                if !worker.alive {
                    if worker.is_excluded() {
                        info!("LS #{} recovered at seqno {}", index, seqno);
                    } else {
                        info!("LS #{} is alive at seqno {}", index, seqno);
                    }
                }
                worker.alive = true;
                worker.last_chain_seqno = Some(seqno);
                worker.consecutive_failures = 0;
                worker.retry_not_before = None;
                worker.excluded_since = None;
            }
            Err(e) => {
                debug!("LS #{} is_alive: false ({})", index, e);
                if worker.alive {
                    warn!("LS #{} stopped responding: {}", index, e);
                }
                worker.alive = false;
                worker.retry_not_before = Some(now + self.config.retry_interval);
            }
        }
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new(HealthCheckConfig::default())
    }
}
