use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::super::domain::{AllocationResult, Gender, ReservationCategory, Student, StudentId};

/// Four-bucket histogram of committed match scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScoreDistribution {
    /// 90 and above.
    pub excellent: usize,
    /// 80 up to 90.
    pub good: usize,
    /// 70 up to 80.
    pub fair: usize,
    /// Everything below 70.
    pub acceptable: usize,
}

impl MatchScoreDistribution {
    fn record(&mut self, score: f64) {
        if score >= 90.0 {
            self.excellent += 1;
        } else if score >= 80.0 {
            self.good += 1;
        } else if score >= 70.0 {
            self.fair += 1;
        } else {
            self.acceptable += 1;
        }
    }
}

/// Aggregate view of a completed allocation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationStatistics {
    pub total_allocated: usize,
    /// 0 when nothing was allocated.
    pub average_match_score: f64,
    /// 0 when nothing was allocated.
    pub average_fairness_score: f64,
    pub category_distribution: BTreeMap<ReservationCategory, usize>,
    pub gender_distribution: BTreeMap<Gender, usize>,
    pub state_distribution: BTreeMap<String, usize>,
    pub match_score_distribution: MatchScoreDistribution,
}

impl AllocationStatistics {
    /// Results whose student was found in the roster, i.e. the demographic denominator.
    pub fn matched_students(&self) -> usize {
        self.category_distribution.values().sum()
    }
}

/// Summarize `results` against the roster they were allocated from.
///
/// Results whose student id is not in `students` are left out of the histogram and the
/// demographic distributions. The score averages cover every result and are not rounded.
pub fn summarize(results: &[AllocationResult], students: &[Student]) -> AllocationStatistics {
    let roster: HashMap<&StudentId, &Student> = students
        .iter()
        .map(|student| (&student.id, student))
        .collect();

    let mut statistics = AllocationStatistics {
        total_allocated: results.len(),
        average_match_score: mean(results.iter().map(|result| result.match_score)),
        average_fairness_score: mean(results.iter().map(|result| result.fairness_score)),
        ..AllocationStatistics::default()
    };

    for result in results {
        let Some(student) = roster.get(&result.student_id) else {
            continue;
        };

        statistics
            .match_score_distribution
            .record(result.match_score);

        *statistics
            .category_distribution
            .entry(student.demographics.category)
            .or_default() += 1;
        *statistics
            .gender_distribution
            .entry(student.demographics.gender)
            .or_default() += 1;
        *statistics
            .state_distribution
            .entry(student.state.clone())
            .or_default() += 1;
    }

    statistics
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}
