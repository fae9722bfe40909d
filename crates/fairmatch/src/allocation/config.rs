use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{ReservationCategory, ValidationError};

const PERCENT_TOLERANCE: f64 = 1e-6;

/// Administrator-tunable settings for one allocation run.
///
/// Missing fields fall back to the government defaults so callers can send partial overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub weights: ScoringWeights,
    pub reservation_quotas: ReservationQuotas,
    /// Minimum share (percent) targeted for genders other than the one already dominant.
    pub gender_diversity_target: f64,
    pub state_quotas: BTreeMap<String, u32>,
    /// Cap applied to any state absent from `state_quotas`.
    pub max_allocations_per_state: u32,
    pub diversity_mode: DiversityMode,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        let state_quotas = [
            ("Maharashtra", 200),
            ("Karnataka", 180),
            ("Tamil Nadu", 170),
            ("Delhi", 120),
            ("Uttar Pradesh", 250),
            ("West Bengal", 140),
            ("Gujarat", 130),
            ("Rajasthan", 110),
            ("Andhra Pradesh", 100),
            ("Telangana", 90),
        ]
        .into_iter()
        .map(|(state, cap)| (state.to_string(), cap))
        .collect();

        Self {
            weights: ScoringWeights::default(),
            reservation_quotas: ReservationQuotas::default(),
            gender_diversity_target: 33.0,
            state_quotas,
            max_allocations_per_state: 300,
            diversity_mode: DiversityMode::default(),
        }
    }
}

impl AllocationConfig {
    /// Rejects malformed values and reports tolerated inconsistencies as warnings.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, ValidationError> {
        for (factor, value) in self.weights.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidWeight { factor, value });
            }
        }

        for category in ReservationCategory::ordered() {
            let value = self.reservation_quotas.target(category);
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(ValidationError::InvalidQuota { category, value });
            }
        }

        let target = self.gender_diversity_target;
        if !target.is_finite() || !(0.0..=100.0).contains(&target) {
            return Err(ValidationError::InvalidGenderTarget(target));
        }

        Ok(self.warnings())
    }

    pub fn warnings(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let weight_total = self.weights.total();
        if (weight_total - 100.0).abs() > PERCENT_TOLERANCE {
            warnings.push(ConfigWarning::WeightSumMismatch {
                total: weight_total,
            });
        }

        let quota_total = self.reservation_quotas.total();
        if (quota_total - 100.0).abs() > PERCENT_TOLERANCE {
            warnings.push(ConfigWarning::QuotaSumMismatch { total: quota_total });
        }

        warnings
    }

    /// Configured cap for `state`, or the global default when the state is not listed.
    pub fn state_cap(&self, state: &str) -> u32 {
        self.state_quotas
            .get(state)
            .copied()
            .unwrap_or(self.max_allocations_per_state)
    }
}

/// Percent weights for each scoring factor. The composite always divides by 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skill: f64,
    pub cgpa: f64,
    pub location: f64,
    pub diversity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill: 40.0,
            cgpa: 25.0,
            location: 20.0,
            diversity: 15.0,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.skill + self.cgpa + self.location + self.diversity
    }

    fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("skill", self.skill),
            ("cgpa", self.cgpa),
            ("location", self.location),
            ("diversity", self.diversity),
        ]
    }
}

/// Target share of total allocations per reservation category, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReservationQuotas {
    #[serde(rename = "SC")]
    pub sc: f64,
    #[serde(rename = "ST")]
    pub st: f64,
    #[serde(rename = "OBC")]
    pub obc: f64,
    #[serde(rename = "EWS")]
    pub ews: f64,
    #[serde(rename = "General")]
    pub general: f64,
}

impl Default for ReservationQuotas {
    fn default() -> Self {
        Self {
            sc: 15.0,
            st: 7.5,
            obc: 27.0,
            ews: 10.0,
            general: 40.5,
        }
    }
}

impl ReservationQuotas {
    pub fn target(&self, category: ReservationCategory) -> f64 {
        match category {
            ReservationCategory::General => self.general,
            ReservationCategory::Obc => self.obc,
            ReservationCategory::Sc => self.sc,
            ReservationCategory::St => self.st,
            ReservationCategory::Ews => self.ews,
        }
    }

    pub fn total(&self) -> f64 {
        ReservationCategory::ordered()
            .into_iter()
            .map(|category| self.target(category))
            .sum()
    }
}

/// How the diversity factor reads prior allocations at an internship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiversityMode {
    /// Compare live category, gender, and state shares among committed allocations.
    #[default]
    Tallied,
    /// Never consult prior demographics: every underrepresentation check passes.
    Legacy,
}

/// Tolerated configuration inconsistencies surfaced to administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigWarning {
    WeightSumMismatch { total: f64 },
    QuotaSumMismatch { total: f64 },
}

impl ConfigWarning {
    pub fn message(&self) -> String {
        match self {
            ConfigWarning::WeightSumMismatch { total } => format!(
                "scoring weights sum to {total:.1} instead of 100; composite scores are still divided by 100"
            ),
            ConfigWarning::QuotaSumMismatch { total } => {
                format!("reservation quotas sum to {total:.1}% instead of 100%")
            }
        }
    }
}
