//! Upgrade/fork lineage: a fork is a distinct solution linked back to its
//! source via `upgraded_from_id`, independent of the source's version
//! history.

use serde::Serialize;

use fabriq_core::error::CoreError;
use fabriq_core::status::SolutionStatus;
use fabriq_core::types::DbId;
use fabriq_db::models::solution::Solution;
use fabriq_db::repositories::SolutionRepo;
use fabriq_db::DbPool;

use crate::error::db_err;
use crate::machine::Actor;

/// The lineage neighborhood of one solution: its source (if it is itself a
/// fork) and the forks derived from it.
#[derive(Debug, Serialize)]
pub struct Lineage {
    pub solution: Solution,
    pub source: Option<Solution>,
    pub forks: Vec<Solution>,
}

/// Read-only lineage traversal plus fork creation.
#[derive(Clone)]
pub struct LineageService {
    pool: DbPool,
}

impl LineageService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fetch a solution together with its source and derived forks.
    pub async fn get_lineage(&self, solution_id: DbId) -> Result<Lineage, CoreError> {
        let solution = self.fetch(solution_id).await?;

        let source = match solution.upgraded_from_id {
            Some(source_id) => SolutionRepo::find_by_id(&self.pool, source_id)
                .await
                .map_err(db_err)?,
            None => None,
        };
        let forks = SolutionRepo::list_forks(&self.pool, solution_id)
            .await
            .map_err(db_err)?;

        Ok(Lineage {
            solution,
            source,
            forks,
        })
    }

    /// Create a new draft solution derived from `source_id`. The fork
    /// starts its own lifecycle and version history from scratch; only
    /// the back-reference ties it to its origin. Archived solutions
    /// cannot be forked.
    pub async fn fork_solution(
        &self,
        source_id: DbId,
        actor: &Actor,
        title: Option<String>,
    ) -> Result<Solution, CoreError> {
        let source = self.fetch(source_id).await?;

        if source.status_enum()? == SolutionStatus::Archived {
            return Err(CoreError::InvalidState(format!(
                "solution {source_id} is archived and cannot be forked"
            )));
        }

        let title = title.unwrap_or_else(|| format!("{} (upgrade)", source.title));
        let fork = SolutionRepo::create_fork(&self.pool, &source, actor.id, &title)
            .await
            .map_err(db_err)?;

        tracing::info!(
            source_id,
            fork_id = fork.id,
            creator_id = actor.id,
            "solution forked"
        );
        Ok(fork)
    }

    async fn fetch(&self, solution_id: DbId) -> Result<Solution, CoreError> {
        SolutionRepo::find_by_id(&self.pool, solution_id)
            .await
            .map_err(db_err)?
            .ok_or(CoreError::NotFound {
                entity: "solution",
                id: solution_id,
            })
    }
}
