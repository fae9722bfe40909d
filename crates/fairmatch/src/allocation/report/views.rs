use serde::Serialize;

use super::super::domain::ReservationCategory;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateAllocationEntry {
    pub state: String,
    pub allocated: usize,
    pub cap: u32,
    pub utilization_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAllocationEntry {
    pub category: ReservationCategory,
    pub category_label: &'static str,
    pub allocated: usize,
    /// Seats the quota would reserve for this category given the allocated total.
    pub target: usize,
    pub quota_pct: f64,
    pub share_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FairnessMetrics {
    pub overall_fairness_score: f64,
    /// 100 minus the total variation distance between category shares and quotas.
    pub quota_compliance_pct: f64,
    /// Share of allocations held by students outside the most common gender.
    pub minority_gender_share_pct: f64,
    pub gender_target_met: bool,
    /// Distinct allocated home states over distinct applicant home states.
    pub geographic_coverage_pct: f64,
}
