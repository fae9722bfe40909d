use crate::infra::{parse_date, report_timestamp};
use chrono::NaiveDate;
use clap::Args;
use fairmatch::allocation::{
    AllocationReport, AllocationResult, Allocator, Internship, InternshipCatalogImporter, Student,
    StudentRosterImporter,
};
use fairmatch::config::load_allocation_config;
use fairmatch::error::AppError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const SAMPLE_STUDENTS: &str = include_str!("../../../crates/fairmatch/data/sample_students.csv");
const SAMPLE_INTERNSHIPS: &str =
    include_str!("../../../crates/fairmatch/data/sample_internships.csv");

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print every allocation alongside the summary.
    #[arg(long)]
    pub(crate) list_allocations: bool,
    /// Stamp the report with this date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) report_date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// Student roster CSV export
    #[arg(long)]
    pub(crate) students: PathBuf,
    /// Internship catalog CSV export
    #[arg(long)]
    pub(crate) internships: PathBuf,
    /// JSON allocation rubric; government defaults when omitted
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Write the JSON report to this file, or into this directory under its default name
    #[arg(long)]
    pub(crate) report: Option<PathBuf>,
    /// Stamp the report with this date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) report_date: Option<NaiveDate>,
    /// Include a full allocation listing in the output
    #[arg(long)]
    pub(crate) list_allocations: bool,
}

pub(crate) fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let AllocateArgs {
        students,
        internships,
        config,
        report,
        report_date,
        list_allocations,
    } = args;

    let students = StudentRosterImporter::from_path(&students)?;
    let internships = InternshipCatalogImporter::from_path(&internships)?;
    let config = match config {
        Some(path) => load_allocation_config(path)?,
        None => Default::default(),
    };

    let allocator = Allocator::new(config).map_err(|err| AppError::Allocation(err.into()))?;
    let results = allocator.allocate(&students, &internships)?;
    let report_data = AllocationReport::build(
        allocator.config(),
        &results,
        &students,
        report_timestamp(report_date),
    );

    render_allocation_report(
        &report_data,
        &students,
        &internships,
        "roster import",
        list_allocations,
    );

    if let Some(target) = report {
        let written = write_report(&report_data, &target)?;
        println!("\nReport written to {}", written.display());
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        list_allocations,
        report_date,
    } = args;

    let (students, internships) = sample_cohort()?;
    let allocator = Allocator::new(Default::default())
        .map_err(|err| AppError::Allocation(err.into()))?;
    let results = allocator.allocate(&students, &internships)?;
    let report = AllocationReport::build(
        allocator.config(),
        &results,
        &students,
        report_timestamp(report_date),
    );

    println!("Fairness-aware internship allocation demo");
    render_allocation_report(
        &report,
        &students,
        &internships,
        "built-in sample cohort",
        list_allocations,
    );
    print_unallocated(&students, &results);

    Ok(())
}

pub(crate) fn sample_cohort() -> Result<(Vec<Student>, Vec<Internship>), AppError> {
    let students = StudentRosterImporter::from_reader(SAMPLE_STUDENTS.as_bytes())?;
    let internships = InternshipCatalogImporter::from_reader(SAMPLE_INTERNSHIPS.as_bytes())?;
    Ok((students, internships))
}

pub(crate) fn write_report(report: &AllocationReport, target: &Path) -> Result<PathBuf, AppError> {
    let path = if target.is_dir() {
        target.join(report.file_name())
    } else {
        target.to_path_buf()
    };

    std::fs::write(&path, report.to_json_pretty()?)?;
    Ok(path)
}

pub(crate) fn render_allocation_report(
    report: &AllocationReport,
    students: &[Student],
    internships: &[Internship],
    source: &str,
    list_allocations: bool,
) {
    let statistics = &report.statistics;
    let seats: u32 = internships.iter().map(|internship| internship.positions).sum();

    println!("Data source: {source}");
    println!(
        "Cohort: {} students | {} internships | {} seats",
        students.len(),
        internships.len(),
        seats
    );

    for warning in &report.warnings {
        println!("Warning: {warning}");
    }

    println!(
        "\nAllocated {} of {} students ({} seats left open)",
        statistics.total_allocated,
        students.len(),
        (seats as usize).saturating_sub(statistics.total_allocated)
    );
    println!(
        "Average match score {:.2} | average fairness score {:.2}",
        statistics.average_match_score, statistics.average_fairness_score
    );

    let histogram = statistics.match_score_distribution;
    println!(
        "Match quality: {} excellent, {} good, {} fair, {} acceptable",
        histogram.excellent, histogram.good, histogram.fair, histogram.acceptable
    );

    println!("\nReservation categories");
    for entry in &report.category_breakdown {
        println!(
            "- {}: {} allocated ({:.1}% vs {:.1}% quota, target {})",
            entry.category_label, entry.allocated, entry.share_pct, entry.quota_pct, entry.target
        );
    }

    println!("\nGender");
    for (gender, count) in &statistics.gender_distribution {
        println!("- {}: {}", gender.label(), count);
    }

    let active_states: Vec<_> = report
        .state_breakdown
        .iter()
        .filter(|entry| entry.allocated > 0)
        .collect();
    if active_states.is_empty() {
        println!("\nStates: none allocated");
    } else {
        println!("\nStates");
        for entry in active_states {
            println!(
                "- {}: {} of {} cap ({:.1}% used)",
                entry.state, entry.allocated, entry.cap, entry.utilization_pct
            );
        }
    }

    let metrics = &report.fairness_metrics;
    println!(
        "\nQuota compliance {:.1}% | minority gender share {:.1}% (target {}) | geographic coverage {:.1}%",
        metrics.quota_compliance_pct,
        metrics.minority_gender_share_pct,
        if metrics.gender_target_met { "met" } else { "missed" },
        metrics.geographic_coverage_pct
    );

    if list_allocations {
        print_allocations(&report.results, students, internships);
    }
}

fn print_allocations(
    results: &[AllocationResult],
    students: &[Student],
    internships: &[Internship],
) {
    let names: HashMap<_, _> = students
        .iter()
        .map(|student| (&student.id, student.name.as_str()))
        .collect();
    let titles: HashMap<_, _> = internships
        .iter()
        .map(|internship| (&internship.id, internship))
        .collect();

    println!("\nAllocations");
    for result in results {
        let name = names.get(&result.student_id).copied().unwrap_or("unknown");
        let placement = titles
            .get(&result.internship_id)
            .map(|internship| format!("{} at {}", internship.title, internship.company))
            .unwrap_or_else(|| result.internship_id.to_string());
        println!(
            "- {} ({}) -> {} | match {:.2} | fairness {:.0} | {}",
            name,
            result.student_id,
            placement,
            result.match_score,
            result.fairness_score,
            result.allocation_reason
        );
    }
}

fn print_unallocated(students: &[Student], results: &[AllocationResult]) {
    let placed: Vec<_> = results.iter().map(|result| &result.student_id).collect();
    let waiting: Vec<_> = students
        .iter()
        .filter(|student| !placed.contains(&&student.id))
        .collect();

    if waiting.is_empty() {
        println!("\nEvery applicant received a placement");
        return;
    }

    println!("\nWaitlisted");
    for student in waiting {
        println!("- {} ({}, {})", student.name, student.id, student.state);
    }
}
