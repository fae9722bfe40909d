use chrono::{DateTime, NaiveDate, Utc};
use fairmatch::allocation::{AllocationRun, AllocationRunRepository, RepositoryError, RunId};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local run store. Runs are never evicted and keep their full inputs, so memory grows
/// with every stored run until the process exits.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAllocationRunRepository {
    runs: Arc<Mutex<HashMap<RunId, AllocationRun>>>,
}

impl AllocationRunRepository for InMemoryAllocationRunRepository {
    fn insert(&self, run: AllocationRun) -> Result<AllocationRun, RepositoryError> {
        let mut guard = self
            .runs
            .lock()
            .map_err(|_| RepositoryError::Unavailable("run store poisoned".to_string()))?;
        if guard.contains_key(&run.run_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(run.run_id.clone(), run.clone());
        Ok(run)
    }

    fn fetch(&self, id: &RunId) -> Result<Option<AllocationRun>, RepositoryError> {
        let guard = self
            .runs
            .lock()
            .map_err(|_| RepositoryError::Unavailable("run store poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Report timestamp for `date` at midnight UTC, or the current instant.
pub(crate) fn report_timestamp(date: Option<NaiveDate>) -> DateTime<Utc> {
    date.and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now)
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
