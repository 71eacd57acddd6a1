//! Lifecycle services for solutions: the state machine that mediates every
//! status change, the append-only version store, the batch transition
//! coordinator, and the read-side ledger queries.
//!
//! All services receive the connection pool by dependency injection; none
//! creates its own client.

pub mod batch;
pub mod error;
pub mod lineage;
pub mod machine;
pub mod stats;
pub mod versions;

pub use batch::{BatchCoordinator, BatchItemFailure, BatchOp, BatchOutcome, MAX_BATCH_SIZE};
pub use lineage::{Lineage, LineageService};
pub use machine::{Actor, LifecycleMachine};
pub use stats::{ReviewLedger, ReviewStats, ReviewerStats};
pub use versions::VersionStore;
