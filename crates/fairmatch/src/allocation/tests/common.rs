use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::allocation::domain::{
    Demographics, Gender, Internship, InternshipId, InternshipWorkMode, ReservationCategory,
    Student, StudentId, StudentPreferences, WorkMode,
};
use crate::allocation::repository::{
    AllocationRun, AllocationRunRepository, RepositoryError, RunId,
};
use crate::allocation::{AllocationConfig, AllocationService};

pub(super) fn applied(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0)
        .single()
        .expect("valid timestamp")
        + Duration::minutes(minutes)
}

/// Delhi BTech third-year with Python, General/Male, applied at the base timestamp.
pub(super) fn student(id: &str) -> Student {
    Student {
        id: StudentId(id.to_string()),
        name: format!("Student {id}"),
        email: format!("{id}@example.in"),
        cgpa: 8.0,
        university: "Delhi Technological University".to_string(),
        state: "Delhi".to_string(),
        course: "btech".to_string(),
        year: 3,
        skills: vec!["Python".to_string()],
        preferences: StudentPreferences {
            locations: Vec::new(),
            industries: vec!["Technology".to_string()],
            work_mode: WorkMode::Any,
        },
        demographics: Demographics {
            category: ReservationCategory::General,
            gender: Gender::Male,
            disability: false,
        },
        applied_at: applied(0),
    }
}

pub(super) fn student_with(
    id: &str,
    category: ReservationCategory,
    gender: Gender,
    state: &str,
) -> Student {
    let mut student = student(id);
    student.demographics.category = category;
    student.demographics.gender = gender;
    student.state = state.to_string();
    student
}

/// Delhi opening for Python skills, min CGPA 7, one seat, open to all third-years.
pub(super) fn internship(id: &str) -> Internship {
    Internship {
        id: InternshipId(id.to_string()),
        title: "Software Intern".to_string(),
        company: "Bharat Systems".to_string(),
        department: "engineering".to_string(),
        location: "Delhi".to_string(),
        skills: vec!["Python".to_string()],
        min_cgpa: 7.0,
        positions: 1,
        work_mode: InternshipWorkMode::Hybrid,
        eligible_courses: vec!["all".to_string()],
        eligible_years: vec![3],
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    runs: Arc<Mutex<HashMap<RunId, AllocationRun>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.runs.lock().expect("repository mutex poisoned").len()
    }
}

impl AllocationRunRepository for MemoryRepository {
    fn insert(&self, run: AllocationRun) -> Result<AllocationRun, RepositoryError> {
        let mut guard = self.runs.lock().expect("repository mutex poisoned");
        if guard.contains_key(&run.run_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(run.run_id.clone(), run.clone());
        Ok(run)
    }

    fn fetch(&self, id: &RunId) -> Result<Option<AllocationRun>, RepositoryError> {
        let guard = self.runs.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl AllocationRunRepository for UnavailableRepository {
    fn insert(&self, _run: AllocationRun) -> Result<AllocationRun, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RunId) -> Result<Option<AllocationRun>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (AllocationService<MemoryRepository>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let service = AllocationService::new(Arc::new(repository.clone()), AllocationConfig::default());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
