use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{TimeZone, Utc};
use fairmatch::allocation::{
    allocate, allocation_router, score_pair, summarize, AllocationConfig, AllocationReport,
    AllocationRun, AllocationRunRepository, AllocationService, Internship,
    InternshipCatalogImporter, RepositoryError, RunId, Student, StudentRosterImporter,
};
use tower::ServiceExt;

fn sample_cohort() -> (Vec<Student>, Vec<Internship>) {
    let students = StudentRosterImporter::from_reader(
        &include_bytes!("../data/sample_students.csv")[..],
    )
    .expect("student roster imports");
    let internships = InternshipCatalogImporter::from_reader(
        &include_bytes!("../data/sample_internships.csv")[..],
    )
    .expect("internship catalog imports");
    (students, internships)
}

#[test]
fn sample_cohort_respects_every_constraint() {
    let (students, internships) = sample_cohort();
    let config = AllocationConfig::default();

    let results = allocate(&students, &internships, &config).expect("allocation succeeds");
    assert!(!results.is_empty());

    let roster: HashMap<_, _> = students.iter().map(|s| (&s.id, s)).collect();
    let catalog: HashMap<_, _> = internships.iter().map(|i| (&i.id, i)).collect();

    let mut seen = HashSet::new();
    let mut per_internship: HashMap<_, u32> = HashMap::new();
    let mut per_state: HashMap<&str, u32> = HashMap::new();

    for result in &results {
        assert!(seen.insert(&result.student_id), "student allocated twice");
        *per_internship.entry(&result.internship_id).or_default() += 1;

        let student = roster[&result.student_id];
        let internship = catalog[&result.internship_id];
        *per_state.entry(student.state.as_str()).or_default() += 1;

        assert!(score_pair(student, internship, &config)
            .eligibility
            .is_eligible());
        assert!(result.match_score > 0.0 && result.match_score <= 100.0);
        assert!((0.0..=100.0).contains(&result.fairness_score));
        assert!((0.0..=100.0).contains(&result.diversity_contribution));
        assert!(!result.allocation_reason.is_empty());
    }

    for (id, count) in per_internship {
        assert!(count <= catalog[id].positions);
    }
    for (state, count) in per_state {
        assert!(count <= config.state_cap(state));
    }
}

#[test]
fn allocation_is_deterministic_and_follows_application_order() {
    let (students, internships) = sample_cohort();
    let config = AllocationConfig::default();

    let first = allocate(&students, &internships, &config).expect("first run");

    let mut shuffled = students.clone();
    shuffled.reverse();
    let second = allocate(&shuffled, &internships, &config).expect("second run");

    assert_eq!(first, second);

    let order: HashMap<_, _> = students.iter().map(|s| (&s.id, s.applied_at)).collect();
    assert!(first
        .windows(2)
        .all(|pair| order[&pair[0].student_id] <= order[&pair[1].student_id]));
}

#[test]
fn statistics_match_the_allocated_cohort() {
    let (students, internships) = sample_cohort();
    let results =
        allocate(&students, &internships, &AllocationConfig::default()).expect("allocation");

    let statistics = summarize(&results, &students);
    assert_eq!(statistics.total_allocated, results.len());
    assert_eq!(statistics.matched_students(), results.len());
    assert_eq!(
        statistics.gender_distribution.values().sum::<usize>(),
        results.len()
    );

    let histogram = statistics.match_score_distribution;
    assert_eq!(
        histogram.excellent + histogram.good + histogram.fair + histogram.acceptable,
        results.len()
    );

    let report = AllocationReport::build(
        &AllocationConfig::default(),
        &results,
        &students,
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
    );
    assert_eq!(report.file_name(), "allocation-report-2025-01-15.json");
    assert!(report.fairness_metrics.geographic_coverage_pct > 0.0);
}

#[derive(Default, Clone)]
struct InMemoryRuns {
    runs: Arc<Mutex<HashMap<RunId, AllocationRun>>>,
}

impl AllocationRunRepository for InMemoryRuns {
    fn insert(&self, run: AllocationRun) -> Result<AllocationRun, RepositoryError> {
        let mut guard = self.runs.lock().expect("runs mutex poisoned");
        if guard.contains_key(&run.run_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(run.run_id.clone(), run.clone());
        Ok(run)
    }

    fn fetch(&self, id: &RunId) -> Result<Option<AllocationRun>, RepositoryError> {
        Ok(self.runs.lock().expect("runs mutex poisoned").get(id).cloned())
    }
}

#[tokio::test]
async fn http_run_then_report_round_trip() {
    let (students, internships) = sample_cohort();
    let service = Arc::new(AllocationService::new(
        Arc::new(InMemoryRuns::default()),
        AllocationConfig::default(),
    ));
    let router = allocation_router(service);

    let payload = serde_json::json!({
        "students": students,
        "internships": internships,
    });
    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/allocations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&payload).expect("encode payload"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let created: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    let run_id = created["run_id"].as_str().expect("run id").to_string();

    let response = router
        .oneshot(
            Request::get(format!("/api/v1/allocations/{run_id}/report"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::CONTENT_DISPOSITION));
}
