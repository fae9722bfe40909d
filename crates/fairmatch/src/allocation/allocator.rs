use std::collections::BTreeMap;

use tracing::{debug, info};

use super::config::{AllocationConfig, ConfigWarning};
use super::domain::{
    validate_inputs, AllocationError, AllocationResult, Internship, ReservationCategory, Student,
    ValidationError,
};
use super::scoring::{allocation_reason, fairness_score, DiversityTally, MatchScorer};

/// Single-pass greedy allocator that processes students first-come-first-served.
#[derive(Debug, Clone)]
pub struct Allocator {
    config: AllocationConfig,
    warnings: Vec<ConfigWarning>,
}

impl Allocator {
    pub fn new(config: AllocationConfig) -> Result<Self, ValidationError> {
        let warnings = config.validate()?;
        Ok(Self { config, warnings })
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Assign each student at most one internship.
    ///
    /// Students are visited in ascending `applied_at` order (ties keep input order) and each
    /// takes the first strictly highest-scoring internship that still has seats. Nobody is
    /// revisited, so identical inputs always produce the identical result sequence.
    pub fn allocate(
        &self,
        students: &[Student],
        internships: &[Internship],
    ) -> Result<Vec<AllocationResult>, AllocationError> {
        validate_inputs(students, internships)?;

        let mut queue: Vec<&Student> = students.iter().collect();
        queue.sort_by_key(|student| student.applied_at);

        let scorer = MatchScorer::new(&self.config);
        let mut state = AllocatorState::new(internships);

        for student in queue {
            state.step(&scorer, &self.config, student, internships);
        }

        info!(
            students = students.len(),
            internships = internships.len(),
            allocated = state.results.len(),
            categories = ?state.category_counts,
            "allocation run complete"
        );

        Ok(state.into_results())
    }
}

/// Convenience wrapper validating `config` and running one allocation pass.
pub fn allocate(
    students: &[Student],
    internships: &[Internship],
    config: &AllocationConfig,
) -> Result<Vec<AllocationResult>, AllocationError> {
    Allocator::new(config.clone())?.allocate(students, internships)
}

/// Mutable counters threaded through one run. Every vector is index-aligned with the
/// internship slice the state was built from.
#[derive(Debug)]
pub(crate) struct AllocatorState {
    remaining: Vec<u32>,
    tallies: Vec<DiversityTally>,
    state_counts: BTreeMap<String, u32>,
    category_counts: BTreeMap<ReservationCategory, u32>,
    results: Vec<AllocationResult>,
}

impl AllocatorState {
    pub(crate) fn new(internships: &[Internship]) -> Self {
        Self {
            remaining: internships
                .iter()
                .map(|internship| internship.positions)
                .collect(),
            tallies: vec![DiversityTally::default(); internships.len()],
            state_counts: BTreeMap::new(),
            category_counts: BTreeMap::new(),
            results: Vec::new(),
        }
    }

    /// Process one student, returning the committed result if a seat was assigned.
    pub(crate) fn step(
        &mut self,
        scorer: &MatchScorer<'_>,
        config: &AllocationConfig,
        student: &Student,
        internships: &[Internship],
    ) -> Option<&AllocationResult> {
        let cap = config.state_cap(&student.state);
        let allocated_from_state = self
            .state_counts
            .get(&student.state)
            .copied()
            .unwrap_or_default();
        if allocated_from_state >= cap {
            debug!(student = %student.id, state = %student.state, cap, "state cap reached");
            return None;
        }

        let mut best: Option<(usize, f64)> = None;
        for (index, internship) in internships.iter().enumerate() {
            if self.remaining[index] == 0 {
                continue;
            }

            let score = scorer.composite(student, internship, Some(&self.tallies[index]));
            if score <= 0.0 {
                continue;
            }

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }

        let Some((index, match_score)) = best else {
            debug!(student = %student.id, "no eligible internship with open seats");
            return None;
        };

        let internship = &internships[index];
        let diversity_contribution = scorer.diversity(student, Some(&self.tallies[index]));

        self.remaining[index] -= 1;
        *self.state_counts.entry(student.state.clone()).or_default() += 1;
        *self
            .category_counts
            .entry(student.demographics.category)
            .or_default() += 1;
        self.tallies[index].record(student);

        debug!(
            student = %student.id,
            internship = %internship.id,
            match_score,
            remaining = self.remaining[index],
            "allocation committed"
        );

        self.results.push(AllocationResult {
            student_id: student.id.clone(),
            internship_id: internship.id.clone(),
            match_score,
            allocation_reason: allocation_reason(student, internship, match_score),
            fairness_score: fairness_score(student, internship),
            diversity_contribution,
        });
        self.results.last()
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> &[u32] {
        &self.remaining
    }

    #[cfg(test)]
    pub(crate) fn state_count(&self, state: &str) -> u32 {
        self.state_counts.get(state).copied().unwrap_or_default()
    }

    pub(crate) fn into_results(self) -> Vec<AllocationResult> {
        self.results
    }
}
