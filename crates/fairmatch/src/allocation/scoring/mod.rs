mod diversity;
mod policy;
mod rules;

pub(crate) use diversity::DiversityTally;
pub use policy::Eligibility;
pub(crate) use policy::{allocation_reason, fairness_score};

use serde::{Deserialize, Serialize};

use super::config::AllocationConfig;
use super::domain::{Internship, InternshipId, Student, StudentId};

/// Applies the weighted rubric from an [`AllocationConfig`] to student/internship pairs.
pub(crate) struct MatchScorer<'a> {
    config: &'a AllocationConfig,
}

impl<'a> MatchScorer<'a> {
    pub(crate) fn new(config: &'a AllocationConfig) -> Self {
        Self { config }
    }

    /// Composite match score, or 0 when the pair fails the eligibility gate.
    pub(crate) fn composite(
        &self,
        student: &Student,
        internship: &Internship,
        tally: Option<&DiversityTally>,
    ) -> f64 {
        if !policy::check_eligibility(student, internship).is_eligible() {
            return 0.0;
        }

        self.weighted(
            rules::skill_match(student, internship),
            rules::cgpa_score(student, internship),
            rules::location_score(student, internship),
            self.diversity(student, tally),
        )
    }

    pub(crate) fn diversity(&self, student: &Student, tally: Option<&DiversityTally>) -> f64 {
        diversity::diversity_score(student, tally, self.config)
    }

    pub(crate) fn breakdown(
        &self,
        student: &Student,
        internship: &Internship,
        tally: Option<&DiversityTally>,
    ) -> ScoreBreakdown {
        let eligibility = policy::check_eligibility(student, internship);
        let skill = rules::skill_match(student, internship);
        let cgpa = rules::cgpa_score(student, internship);
        let location = rules::location_score(student, internship);
        let diversity = self.diversity(student, tally);

        let composite = if eligibility.is_eligible() {
            self.weighted(skill, cgpa, location, diversity)
        } else {
            0.0
        };

        ScoreBreakdown {
            student_id: student.id.clone(),
            internship_id: internship.id.clone(),
            eligibility,
            skill,
            cgpa,
            location,
            diversity,
            composite,
        }
    }

    // Divides by 100 regardless of the configured weight total.
    fn weighted(&self, skill: f64, cgpa: f64, location: f64, diversity: f64) -> f64 {
        let weights = &self.config.weights;
        let raw = (skill * weights.skill
            + cgpa * weights.cgpa
            + location * weights.location
            + diversity * weights.diversity)
            / 100.0;
        round_to_hundredths(raw)
    }
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Transparent view of every factor behind a composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub student_id: StudentId,
    pub internship_id: InternshipId,
    pub eligibility: Eligibility,
    pub skill: f64,
    pub cgpa: f64,
    pub location: f64,
    pub diversity: f64,
    pub composite: f64,
}

/// Scores one pair as if it were the first allocation against the internship.
pub fn score_pair(
    student: &Student,
    internship: &Internship,
    config: &AllocationConfig,
) -> ScoreBreakdown {
    MatchScorer::new(config).breakdown(student, internship, None)
}

#[cfg(test)]
pub(crate) use rules::{cgpa_score, location_score, region_of, skill_match};
#[cfg(test)]
pub(crate) use diversity::diversity_score;
#[cfg(test)]
pub(crate) use policy::check_eligibility;
