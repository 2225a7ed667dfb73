use futures::future::join_all;
use multiclient_common::error::{MulticlientError, Result};
use multiclient_common::{RequestParameters, Selection};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, Interval};
use tracing::{debug, info};

use crate::archival_checker::ArchivalChecker;
use crate::client::{ClientFactory, LiteClient, MasterchainInfo};
use crate::config::MultiClientConfig;
use crate::health_checker::HealthChecker;
use crate::registry::WorkerRegistry;
use crate::scheduler::Scheduler;
use crate::selector::select_workers;
use crate::worker::WorkerStatus;

const COMMAND_QUEUE_SIZE: usize = 256;

/// Completion of a probe, delivered back to the monitor loop.
#[derive(Debug)]
enum ProbeEvent {
    Alive {
        index: usize,
        result: Result<MasterchainInfo>,
    },
    Archival {
        index: usize,
        is_archival: bool,
    },
}

enum Command {
    Select {
        selection: Selection,
        reply: oneshot::Sender<Vec<usize>>,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<WorkerStatus>>,
    },
}

/// Liteserver multiclient - routes requests across a fixed fleet of
/// liteserver connections.
///
/// A single background task (the monitor) owns every worker record. Timer
/// ticks, probe completions and selection requests all arrive at that task
/// as events and are applied one at a time, so worker state needs no locks.
///
/// # Monitoring
///
/// - **Health**: every tick (1s) each worker gets a masterchain-head probe,
///   unless one is outstanding or it is backing off after a failure
/// - **Archival**: every 10s each alive worker is asked for a block near
///   genesis; success marks it archival
/// - **Exclusion**: a worker that keeps failing past the configured ceiling
///   stops being probed until its exclusion cooldown elapses
///
/// # Routing
///
/// [`select_workers`](Self::select_workers) returns worker indices for a
/// request; [`send_request`](Self::send_request) additionally runs a call on
/// each selected connection. Responses are returned per worker and never
/// merged.
///
/// The handle is cheap to clone. The monitor stops once every handle is
/// dropped.
pub struct MultiClient<C> {
    commands: mpsc::Sender<Command>,
    clients: Arc<[Arc<C>]>,
}

impl<C> Clone for MultiClient<C> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            clients: Arc::clone(&self.clients),
        }
    }
}

impl<C: LiteClient> MultiClient<C> {
    /// Bootstraps the worker registry and starts the monitor.
    ///
    /// # Errors
    ///
    /// Fails without starting anything if the config is invalid, the global
    /// config cannot be read or lists no liteservers, the key store cannot be
    /// reset, or any connection fails to open.
    pub async fn start<F>(config: MultiClientConfig, factory: &F) -> Result<Self>
    where
        F: ClientFactory<Client = C>,
    {
        config.validate()?;
        let registry = WorkerRegistry::bootstrap(&config, factory).await?;
        Ok(Self::spawn(registry, &config))
    }

    /// Starts the monitor over already opened connections.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `NoLiteServers` for an empty client list and `InvalidConfig`
    /// for an invalid config.
    pub fn from_clients(clients: Vec<C>, config: &MultiClientConfig) -> Result<Self> {
        config.validate()?;
        let registry = WorkerRegistry::from_clients(clients)?;
        Ok(Self::spawn(registry, config))
    }

    fn spawn(registry: WorkerRegistry<C>, config: &MultiClientConfig) -> Self {
        let clients: Arc<[Arc<C>]> = registry
            .workers()
            .iter()
            .map(|worker| Arc::clone(worker.client()))
            .collect();

        let start = Instant::now();
        let scheduler = Scheduler::new(config.scheduler.clone(), start);
        let ticker = scheduler.ticker(start);
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE_SIZE);

        let monitor = Monitor {
            registry,
            health: HealthChecker::new(config.health.clone()),
            archival: ArchivalChecker::new(),
            scheduler,
            rng,
            events_tx,
        };

        info!("Multiclient started with {} workers", clients.len());
        // Detached; the loop exits once every command sender is dropped
        tokio::spawn(monitor.run(ticker, events_rx, commands_rx));

        Self {
            commands: commands_tx,
            clients,
        }
    }

    /// Number of workers (fixed at startup).
    pub fn worker_count(&self) -> usize {
        self.clients.len()
    }

    /// Connection of the worker at `index`.
    pub fn client(&self, index: usize) -> Option<Arc<C>> {
        self.clients.get(index).cloned()
    }

    /// Selects workers for a request.
    ///
    /// An empty result means no worker is eligible.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the parameters are an invalid combination
    /// - `Shutdown` if the monitor is gone
    pub async fn select_workers(&self, params: &RequestParameters) -> Result<Vec<usize>> {
        self.select(params.validate()?).await
    }

    /// Like [`select_workers`](Self::select_workers) but treats an empty
    /// selection as `NoEligibleWorkers`.
    pub async fn select_or_unavailable(&self, params: &RequestParameters) -> Result<Vec<usize>> {
        let selected = self.select_workers(params).await?;
        if selected.is_empty() {
            return Err(MulticlientError::NoEligibleWorkers);
        }
        Ok(selected)
    }

    /// Selects workers for an already validated selection.
    pub async fn select(&self, selection: Selection) -> Result<Vec<usize>> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Select { selection, reply })
            .await
            .map_err(|_| MulticlientError::Shutdown)?;
        rx.await.map_err(|_| MulticlientError::Shutdown)
    }

    /// Current state of every worker, in index order.
    pub async fn snapshot(&self) -> Result<Vec<WorkerStatus>> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| MulticlientError::Shutdown)?;
        rx.await.map_err(|_| MulticlientError::Shutdown)
    }

    /// Runs `request` on every selected worker concurrently.
    ///
    /// Results come back per worker, in selection order, and are not merged.
    ///
    /// # Errors
    ///
    /// Returns `NoEligibleWorkers` when nothing can serve the request, plus
    /// the errors of [`select_workers`](Self::select_workers). Failures of
    /// individual calls are reported in the per-worker results.
    pub async fn send_request<T, F, Fut>(
        &self,
        params: &RequestParameters,
        request: F,
    ) -> Result<Vec<(usize, Result<T>)>>
    where
        F: Fn(Arc<C>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let selected = self.select_or_unavailable(params).await?;

        let calls = selected.into_iter().filter_map(|index| {
            let call = request(self.client(index)?);
            Some(async move { (index, call.await) })
        });

        Ok(join_all(calls).await)
    }
}

/// Sole owner of the worker registry.
struct Monitor<C> {
    registry: WorkerRegistry<C>,
    health: HealthChecker,
    archival: ArchivalChecker,
    scheduler: Scheduler,
    rng: StdRng,
    events_tx: mpsc::UnboundedSender<ProbeEvent>,
}

impl<C: LiteClient> Monitor<C> {
    async fn run(
        mut self,
        mut ticker: Interval,
        mut events: mpsc::UnboundedReceiver<ProbeEvent>,
        mut commands: mpsc::Receiver<Command>,
    ) {
        loop {
            tokio::select! {
                _ = ticker.tick() => self.on_tick(Instant::now()),
                Some(event) = events.recv() => self.on_probe_completed(event, Instant::now()),
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
            }
        }

        info!("Multiclient monitor stopped");
    }

    fn on_tick(&mut self, now: Instant) {
        debug!("Checking alive workers");
        for index in self.health.due_probes(self.registry.workers_mut(), now) {
            self.spawn_alive_probe(index);
        }

        if self.scheduler.archival_due(now) {
            debug!("Checking archival workers");
            for index in self.archival.due_probes(self.registry.workers_mut()) {
                self.spawn_archival_probe(index);
            }
        }
    }

    fn spawn_alive_probe(&self, index: usize) {
        let Some(worker) = self.registry.get(index) else {
            return;
        };
        let client = Arc::clone(worker.client());
        let timeout = self.health.config().probe_timeout;
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            let result = with_timeout(timeout, client.get_masterchain_info()).await;
            // The monitor only stops once every handle is gone
            let _ = events.send(ProbeEvent::Alive { index, result });
        });
    }

    fn spawn_archival_probe(&self, index: usize) {
        let Some(worker) = self.registry.get(index) else {
            return;
        };
        let client = Arc::clone(worker.client());
        let timeout = self.health.config().probe_timeout;
        let lookup = self.archival.lookup();
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            let result = with_timeout(timeout, client.lookup_block(lookup)).await;
            let _ = events.send(ProbeEvent::Archival {
                index,
                is_archival: result.is_ok(),
            });
        });
    }

    fn on_probe_completed(&mut self, event: ProbeEvent, now: Instant) {
        match event {
            ProbeEvent::Alive { index, result } => {
                if let Some(worker) = self.registry.get_mut(index) {
                    self.health.apply_result(index, worker, result, now);
                }
            }
            ProbeEvent::Archival { index, is_archival } => {
                if let Some(worker) = self.registry.get_mut(index) {
                    self.archival.apply_result(index, worker, is_archival);
                }
            }
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Select { selection, reply } => {
                let selected = select_workers(self.registry.workers(), &selection, &mut self.rng);
                let _ = reply.send(selected);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.registry.snapshot());
            }
        }
    }
}

async fn with_timeout<T>(timeout: Duration, future: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| MulticlientError::Timeout(timeout_millis(timeout)))?
}

fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}
