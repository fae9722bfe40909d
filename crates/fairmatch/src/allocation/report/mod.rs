mod export;
mod summary;
pub mod views;

pub use export::AllocationReport;
pub use summary::{summarize, AllocationStatistics, MatchScoreDistribution};
