use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::allocator::Allocator;
use super::config::AllocationConfig;
use super::domain::{AllocationError, Internship, Student};
use super::report::{summarize, AllocationReport};
use super::repository::{AllocationRun, AllocationRunRepository, RepositoryError, RunId};
use super::scoring::{score_pair, ScoreBreakdown};

/// Input snapshot for one allocation run. Without `config` the service default applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub students: Vec<Student>,
    pub internships: Vec<Internship>,
    #[serde(default)]
    pub config: Option<AllocationConfig>,
}

/// Single pair to score without committing anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub student: Student,
    pub internship: Internship,
    #[serde(default)]
    pub config: Option<AllocationConfig>,
}

/// Service composing the allocator, statistics, and run repository.
pub struct AllocationService<R> {
    repository: Arc<R>,
    default_config: AllocationConfig,
}

static RUN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_run_id() -> RunId {
    let id = RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RunId(format!("run-{id:06}"))
}

impl<R> AllocationService<R>
where
    R: AllocationRunRepository + 'static,
{
    pub fn new(repository: Arc<R>, default_config: AllocationConfig) -> Self {
        Self {
            repository,
            default_config,
        }
    }

    /// Allocate the submitted cohort, summarize it, and persist the run.
    pub fn run(&self, request: AllocationRequest) -> Result<AllocationRun, AllocationServiceError> {
        let AllocationRequest {
            students,
            internships,
            config,
        } = request;

        let allocator = Allocator::new(config.unwrap_or_else(|| self.default_config.clone()))
            .map_err(AllocationError::from)?;
        let results = allocator.allocate(&students, &internships)?;
        let statistics = summarize(&results, &students);

        let run = AllocationRun {
            run_id: next_run_id(),
            created_at: Utc::now(),
            config: allocator.config().clone(),
            warnings: allocator.warnings().to_vec(),
            students,
            internships,
            results,
            statistics,
        };

        info!(
            run_id = %run.run_id,
            allocated = run.statistics.total_allocated,
            warnings = run.warnings.len(),
            "allocation run stored"
        );

        let stored = self.repository.insert(run)?;
        Ok(stored)
    }

    pub fn get(&self, run_id: &RunId) -> Result<AllocationRun, AllocationServiceError> {
        let run = self
            .repository
            .fetch(run_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(run)
    }

    pub fn report(
        &self,
        run_id: &RunId,
        generated_at: DateTime<Utc>,
    ) -> Result<AllocationReport, AllocationServiceError> {
        Ok(self.get(run_id)?.report(generated_at))
    }

    /// Score one pair as a first allocation, after validating every input.
    pub fn preview(&self, request: PreviewRequest) -> Result<ScoreBreakdown, AllocationServiceError> {
        let PreviewRequest {
            student,
            internship,
            config,
        } = request;

        let config = config.unwrap_or_else(|| self.default_config.clone());
        config.validate().map_err(AllocationError::from)?;
        student.validate().map_err(AllocationError::from)?;
        internship.validate().map_err(AllocationError::from)?;

        Ok(score_pair(&student, &internship, &config))
    }
}

/// Error raised by the allocation service.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
