use std::sync::Arc;

use fabriq_lifecycle::{
    BatchCoordinator, LifecycleMachine, LineageService, ReviewLedger, VersionStore,
};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// The pool is created once at startup; every service receives it here by
/// dependency injection. Cheaply cloneable (inner data is behind `Arc` or
/// is itself a pool handle).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fabriq_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Single-item lifecycle transitions.
    pub machine: LifecycleMachine,
    /// Version snapshots, diffing, rollback.
    pub versions: VersionStore,
    /// Batch transitions.
    pub batch: BatchCoordinator,
    /// Read-side review ledger queries.
    pub ledger: ReviewLedger,
    /// Fork lineage traversal and creation.
    pub lineage: LineageService,
}

impl AppState {
    pub fn new(pool: fabriq_db::DbPool, config: ServerConfig) -> Self {
        Self {
            machine: LifecycleMachine::new(pool.clone()),
            versions: VersionStore::new(pool.clone()),
            batch: BatchCoordinator::new(pool.clone()),
            ledger: ReviewLedger::new(pool.clone()),
            lineage: LineageService::new(pool.clone()),
            config: Arc::new(config),
            pool,
        }
    }
}
