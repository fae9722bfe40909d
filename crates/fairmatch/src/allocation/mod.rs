//! Fairness-aware internship allocation.
//!
//! Students are scored against openings with a weighted rubric (skills, CGPA, location and
//! diversity) and assigned greedily in application order while honoring per-internship
//! capacity and per-state caps. Everything below `allocate` and `summarize` is a pure,
//! synchronous transform of its inputs; the service, repository, and router modules wrap it
//! for HTTP callers.

mod allocator;
pub mod config;
pub mod domain;
pub mod report;
pub mod repository;
pub mod roster;
pub mod router;
pub(crate) mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use allocator::{allocate, Allocator};
pub use config::{
    AllocationConfig, ConfigWarning, DiversityMode, ReservationQuotas, ScoringWeights,
};
pub use domain::{
    AllocationError, AllocationResult, Demographics, Gender, Internship, InternshipId,
    InternshipWorkMode, ReservationCategory, Student, StudentId, StudentPreferences,
    ValidationError, WorkMode,
};
pub use report::{summarize, AllocationReport, AllocationStatistics, MatchScoreDistribution};
pub use repository::{
    AllocationRun, AllocationRunRepository, AllocationRunView, RepositoryError, RunId,
};
pub use roster::{InternshipCatalogImporter, RosterImportError, StudentRosterImporter};
pub use router::allocation_router;
pub use scoring::{score_pair, Eligibility, ScoreBreakdown};
pub use service::{AllocationRequest, AllocationService, AllocationServiceError, PreviewRequest};
