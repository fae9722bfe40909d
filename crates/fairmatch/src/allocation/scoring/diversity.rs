use std::borrow::Borrow;
use std::collections::BTreeMap;

use super::super::config::{AllocationConfig, DiversityMode};
use super::super::domain::{Gender, ReservationCategory, Student};

const FIRST_ALLOCATION_SCORE: f64 = 50.0;
const CATEGORY_BONUS: f64 = 30.0;
const GENDER_BONUS: f64 = 20.0;
const STATE_BONUS: f64 = 15.0;
const STATE_SHARE_TARGET: f64 = 0.2;

/// Running demographic counts of the students committed to one internship.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DiversityTally {
    total: usize,
    categories: BTreeMap<ReservationCategory, usize>,
    genders: BTreeMap<Gender, usize>,
    states: BTreeMap<String, usize>,
}

impl DiversityTally {
    pub(crate) fn record(&mut self, student: &Student) {
        self.total += 1;
        *self
            .categories
            .entry(student.demographics.category)
            .or_default() += 1;
        *self.genders.entry(student.demographics.gender).or_default() += 1;
        *self.states.entry(student.state.clone()).or_default() += 1;
    }

    pub(crate) fn total(&self) -> usize {
        self.total
    }

    fn share<K, Q>(&self, counts: &BTreeMap<K, usize>, key: &Q) -> f64
    where
        K: Borrow<Q> + Ord,
        Q: Ord + ?Sized,
    {
        if self.total == 0 {
            return 0.0;
        }
        counts.get(key).copied().unwrap_or_default() as f64 / self.total as f64
    }

    fn category_share(&self, category: ReservationCategory) -> f64 {
        self.share(&self.categories, &category)
    }

    fn gender_share(&self, gender: Gender) -> f64 {
        self.share(&self.genders, &gender)
    }

    fn state_share(&self, state: &str) -> f64 {
        self.share(&self.states, state)
    }
}

/// Diversity contribution of adding `student` to an internship whose commits are in `tally`.
pub(crate) fn diversity_score(
    student: &Student,
    tally: Option<&DiversityTally>,
    config: &AllocationConfig,
) -> f64 {
    let Some(tally) = tally.filter(|tally| tally.total() > 0) else {
        return FIRST_ALLOCATION_SCORE;
    };

    let demographics = student.demographics;
    let (category_share, gender_share, state_share) = match config.diversity_mode {
        DiversityMode::Tallied => (
            tally.category_share(demographics.category),
            tally.gender_share(demographics.gender),
            tally.state_share(&student.state),
        ),
        DiversityMode::Legacy => (0.0, 0.0, 0.0),
    };

    let mut score = 0.0;

    let category_target = config.reservation_quotas.target(demographics.category) / 100.0;
    if category_share < category_target {
        score += CATEGORY_BONUS;
    }

    if gender_share < config.gender_diversity_target / 100.0 {
        score += GENDER_BONUS;
    }

    if state_share < STATE_SHARE_TARGET {
        score += STATE_BONUS;
    }

    f64::min(score, 100.0)
}
