use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::{AllocationConfig, ConfigWarning};
use super::domain::{AllocationResult, Internship, Student};
use super::report::{AllocationReport, AllocationStatistics};

/// Identifier wrapper for completed allocation runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository record holding the inputs, configuration, and outcome of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRun {
    pub run_id: RunId,
    pub created_at: DateTime<Utc>,
    pub config: AllocationConfig,
    pub warnings: Vec<ConfigWarning>,
    pub students: Vec<Student>,
    pub internships: Vec<Internship>,
    pub results: Vec<AllocationResult>,
    pub statistics: AllocationStatistics,
}

impl AllocationRun {
    pub fn view(&self) -> AllocationRunView {
        AllocationRunView {
            run_id: self.run_id.clone(),
            created_at: self.created_at,
            students_considered: self.students.len(),
            seats_offered: self
                .internships
                .iter()
                .map(|internship| internship.positions as usize)
                .sum(),
            warnings: self
                .warnings
                .iter()
                .map(ConfigWarning::message)
                .collect(),
            statistics: self.statistics.clone(),
            results: self.results.clone(),
        }
    }

    pub fn report(&self, generated_at: DateTime<Utc>) -> AllocationReport {
        AllocationReport::build(&self.config, &self.results, &self.students, generated_at)
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait AllocationRunRepository: Send + Sync {
    fn insert(&self, run: AllocationRun) -> Result<AllocationRun, RepositoryError>;
    fn fetch(&self, id: &RunId) -> Result<Option<AllocationRun>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("run already exists")]
    Conflict,
    #[error("run not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Response shape for a stored run.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationRunView {
    pub run_id: RunId,
    pub created_at: DateTime<Utc>,
    pub students_considered: usize,
    pub seats_offered: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub statistics: AllocationStatistics,
    pub results: Vec<AllocationResult>,
}
