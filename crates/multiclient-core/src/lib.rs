//! Liteserver Multiclient Core
//!
//! Fans requests out across a fixed fleet of liteserver connections while
//! tracking which of them are alive and which keep full (archival) history.
//!
//! # Components
//!
//! - [`registry`] - Index-addressed worker records, built once at startup
//! - [`health_checker`] - Alive-probe decisions, fixed backoff and the failure ceiling
//! - [`archival_checker`] - Archival capability probes for alive workers
//! - [`scheduler`] - The 1s tick and the slower archival cadence
//! - [`selector`] - Pure Broadcast/Single/Multiple routing over a registry view
//! - [`multi_client`] - The monitor loop that owns all worker state, and its handle
//! - [`client`] - Traits a liteserver connection implementation provides

pub mod archival_checker;
pub mod client;
pub mod config;
pub mod health_checker;
pub mod multi_client;
pub mod registry;
pub mod scheduler;
pub mod selector;
pub mod worker;

pub use archival_checker::ArchivalChecker;
pub use client::{BlockId, BlockLookup, ClientConfig, ClientFactory, LiteClient, MasterchainInfo};
pub use config::MultiClientConfig;
pub use health_checker::{AliveCheck, HealthCheckConfig, HealthChecker};
pub use multi_client::MultiClient;
pub use registry::WorkerRegistry;
pub use scheduler::{Scheduler, SchedulerConfig};
pub use selector::select_workers;
pub use worker::{Eligible, Worker, WorkerStatus};
