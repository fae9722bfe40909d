use serde::{Deserialize, Serialize};

use super::super::domain::{Gender, Internship, Student};

const BASE_FAIRNESS: f64 = 70.0;
const RESERVED_CATEGORY_BONUS: f64 = 15.0;
const TECH_GENDER_BONUS: f64 = 10.0;
const DISABILITY_BONUS: f64 = 5.0;

/// Departments where women remain underrepresented among placements.
const TECH_DEPARTMENTS: [&str; 2] = ["engineering", "data-science"];

/// Outcome of the hard pass/fail checks applied before any weighted scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    BelowMinimumCgpa { required: f64, actual: f64 },
    CourseNotEligible { course: String },
    YearNotEligible { year: u8 },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

pub(crate) fn check_eligibility(student: &Student, internship: &Internship) -> Eligibility {
    if student.cgpa < internship.min_cgpa {
        return Eligibility::BelowMinimumCgpa {
            required: internship.min_cgpa,
            actual: student.cgpa,
        };
    }

    if !internship.accepts_course(&student.course) {
        return Eligibility::CourseNotEligible {
            course: student.course.clone(),
        };
    }

    if !internship.accepts_year(student.year) {
        return Eligibility::YearNotEligible { year: student.year };
    }

    Eligibility::Eligible
}

/// Diagnostic equal-opportunity score recorded with each commit. Never affects ordering.
pub(crate) fn fairness_score(student: &Student, internship: &Internship) -> f64 {
    let demographics = student.demographics;
    let mut score = BASE_FAIRNESS;

    if demographics.category.is_reserved() {
        score += RESERVED_CATEGORY_BONUS;
    }

    let department = internship.department.trim().to_lowercase();
    if demographics.gender == Gender::Female && TECH_DEPARTMENTS.contains(&department.as_str()) {
        score += TECH_GENDER_BONUS;
    }

    if demographics.disability {
        score += DISABILITY_BONUS;
    }

    f64::min(score, 100.0)
}

pub(crate) fn allocation_reason(student: &Student, internship: &Internship, score: f64) -> String {
    let mut reasons = Vec::new();

    if score >= 90.0 {
        reasons.push("Excellent skill match");
    } else if score >= 80.0 {
        reasons.push("Strong skill alignment");
    } else if score >= 70.0 {
        reasons.push("Good overall fit");
    }

    if student.state == internship.location {
        reasons.push("Local candidate preference");
    }

    if student.cgpa >= internship.min_cgpa + 1.0 {
        reasons.push("Exceeds academic requirements");
    }

    if reasons.is_empty() {
        "Meets basic requirements".to_string()
    } else {
        reasons.join(", ")
    }
}
