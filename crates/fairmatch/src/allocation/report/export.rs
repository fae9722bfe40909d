use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::super::config::AllocationConfig;
use super::super::domain::{AllocationResult, ReservationCategory, Student};
use super::super::scoring::round_to_hundredths;
use super::summary::{summarize, AllocationStatistics};
use super::views::{CategoryAllocationEntry, FairnessMetrics, StateAllocationEntry};

/// Downloadable summary of a run: totals, breakdowns, fairness metrics, and the raw results.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationReport {
    pub generated_at: DateTime<Utc>,
    pub config: AllocationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub statistics: AllocationStatistics,
    pub state_breakdown: Vec<StateAllocationEntry>,
    pub category_breakdown: Vec<CategoryAllocationEntry>,
    pub fairness_metrics: FairnessMetrics,
    pub results: Vec<AllocationResult>,
}

impl AllocationReport {
    pub fn build(
        config: &AllocationConfig,
        results: &[AllocationResult],
        students: &[Student],
        generated_at: DateTime<Utc>,
    ) -> Self {
        let statistics = summarize(results, students);
        let state_breakdown = state_breakdown(config, &statistics);
        let category_breakdown = category_breakdown(config, &statistics);
        let fairness_metrics = fairness_metrics(config, &statistics, &category_breakdown, students);

        Self {
            generated_at,
            config: config.clone(),
            warnings: config
                .warnings()
                .iter()
                .map(|warning| warning.message())
                .collect(),
            statistics,
            state_breakdown,
            category_breakdown,
            fairness_metrics,
            results: results.to_vec(),
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "allocation-report-{}.json",
            self.generated_at.date_naive().format("%Y-%m-%d")
        )
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    round_to_hundredths(part / whole * 100.0)
}

fn state_breakdown(
    config: &AllocationConfig,
    statistics: &AllocationStatistics,
) -> Vec<StateAllocationEntry> {
    let states: BTreeSet<&String> = config
        .state_quotas
        .keys()
        .chain(statistics.state_distribution.keys())
        .collect();

    states
        .into_iter()
        .map(|state| {
            let allocated = statistics
                .state_distribution
                .get(state)
                .copied()
                .unwrap_or_default();
            let cap = config.state_cap(state);
            StateAllocationEntry {
                state: state.clone(),
                allocated,
                cap,
                utilization_pct: percentage(allocated as f64, cap as f64),
            }
        })
        .collect()
}

fn category_breakdown(
    config: &AllocationConfig,
    statistics: &AllocationStatistics,
) -> Vec<CategoryAllocationEntry> {
    let total = statistics.matched_students();

    ReservationCategory::ordered()
        .into_iter()
        .map(|category| {
            let allocated = statistics
                .category_distribution
                .get(&category)
                .copied()
                .unwrap_or_default();
            let quota_pct = config.reservation_quotas.target(category);
            CategoryAllocationEntry {
                category,
                category_label: category.label(),
                allocated,
                target: (total as f64 * quota_pct / 100.0).round() as usize,
                quota_pct,
                share_pct: percentage(allocated as f64, total as f64),
            }
        })
        .collect()
}

fn fairness_metrics(
    config: &AllocationConfig,
    statistics: &AllocationStatistics,
    categories: &[CategoryAllocationEntry],
    students: &[Student],
) -> FairnessMetrics {
    let total = statistics.matched_students();
    if total == 0 {
        return FairnessMetrics::default();
    }

    let deviation: f64 = categories
        .iter()
        .map(|entry| (entry.share_pct - entry.quota_pct).abs())
        .sum();
    let quota_compliance_pct = round_to_hundredths((100.0 - deviation / 2.0).clamp(0.0, 100.0));

    let majority = statistics
        .gender_distribution
        .values()
        .copied()
        .max()
        .unwrap_or_default();
    let minority_gender_share_pct = percentage((total - majority) as f64, total as f64);

    let applicant_states: HashSet<&str> = students
        .iter()
        .map(|student| student.state.as_str())
        .collect();
    let geographic_coverage_pct = percentage(
        statistics.state_distribution.len() as f64,
        applicant_states.len() as f64,
    );

    FairnessMetrics {
        overall_fairness_score: round_to_hundredths(statistics.average_fairness_score),
        quota_compliance_pct,
        minority_gender_share_pct,
        gender_target_met: minority_gender_share_pct >= config.gender_diversity_target,
        geographic_coverage_pct,
    }
}
