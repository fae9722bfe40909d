use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest CGPA on the grading scale used by participating universities.
pub const MAX_CGPA: f64 = 10.0;

/// Course wildcard accepted in [`Internship::eligible_courses`].
pub const ALL_COURSES: &str = "all";

/// Identifier wrapper for registered students.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for posted internships.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InternshipId(pub String);

impl fmt::Display for InternshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Applicant snapshot consumed by the allocator. Read-only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub cgpa: f64,
    pub university: String,
    pub state: String,
    pub course: String,
    pub year: u8,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub preferences: StudentPreferences,
    pub demographics: Demographics,
    /// Submission time; the only key used to order students during allocation.
    pub applied_at: DateTime<Utc>,
}

impl Student {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.0.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier { kind: "student" });
        }

        if !self.cgpa.is_finite() || !(0.0..=MAX_CGPA).contains(&self.cgpa) {
            return Err(ValidationError::InvalidCgpa {
                student: self.id.clone(),
                value: self.cgpa,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentPreferences {
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub work_mode: WorkMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub category: ReservationCategory,
    pub gender: Gender,
    #[serde(default)]
    pub disability: bool,
}

/// Work arrangement a student is willing to accept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    Remote,
    Hybrid,
    Onsite,
    #[default]
    Any,
}

/// Work arrangement offered by an internship. Never "any".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InternshipWorkMode {
    Remote,
    Hybrid,
    Onsite,
}

/// Government reservation categories. Exactly one applies to every student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReservationCategory {
    General,
    #[serde(rename = "OBC")]
    Obc,
    #[serde(rename = "SC")]
    Sc,
    #[serde(rename = "ST")]
    St,
    #[serde(rename = "EWS")]
    Ews,
}

impl ReservationCategory {
    pub const fn ordered() -> [Self; 5] {
        [Self::General, Self::Obc, Self::Sc, Self::St, Self::Ews]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Obc => "OBC",
            Self::Sc => "SC",
            Self::St => "ST",
            Self::Ews => "EWS",
        }
    }

    /// Categories that receive the reserved-category fairness bonus.
    pub const fn is_reserved(self) -> bool {
        !matches!(self, Self::General)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GENERAL" | "GEN" => Some(Self::General),
            "OBC" => Some(Self::Obc),
            "SC" => Some(Self::Sc),
            "ST" => Some(Self::St),
            "EWS" => Some(Self::Ews),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            "other" | "o" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Posted opening with its eligibility rules and remaining seats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Internship {
    pub id: InternshipId,
    pub title: String,
    pub company: String,
    pub department: String,
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub min_cgpa: f64,
    pub positions: u32,
    pub work_mode: InternshipWorkMode,
    #[serde(default)]
    pub eligible_courses: Vec<String>,
    #[serde(default)]
    pub eligible_years: Vec<u8>,
}

impl Internship {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.0.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier { kind: "internship" });
        }

        if !self.min_cgpa.is_finite() || !(0.0..=MAX_CGPA).contains(&self.min_cgpa) {
            return Err(ValidationError::InvalidMinimumCgpa {
                internship: self.id.clone(),
                value: self.min_cgpa,
            });
        }

        Ok(())
    }

    /// Course check with both sides normalized, honoring the `all` wildcard.
    pub fn accepts_course(&self, course: &str) -> bool {
        let course = course.trim().to_lowercase();
        self.eligible_courses.iter().any(|eligible| {
            let eligible = eligible.trim().to_lowercase();
            eligible == ALL_COURSES || eligible == course
        })
    }

    pub fn accepts_year(&self, year: u8) -> bool {
        self.eligible_years.contains(&year)
    }
}

/// A committed student to internship pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub student_id: StudentId,
    pub internship_id: InternshipId,
    pub match_score: f64,
    /// Display-only explanation; never consulted by the allocator.
    pub allocation_reason: String,
    pub fairness_score: f64,
    pub diversity_contribution: f64,
}

/// Rejections raised while constructing or checking allocation inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{kind} id must not be empty")]
    EmptyIdentifier { kind: &'static str },
    #[error("student {student} has cgpa {value}, expected a value between 0 and 10")]
    InvalidCgpa { student: StudentId, value: f64 },
    #[error("internship {internship} has minimum cgpa {value}, expected a value between 0 and 10")]
    InvalidMinimumCgpa { internship: InternshipId, value: f64 },
    #[error("{factor} weight must be a finite, non-negative number (got {value})")]
    InvalidWeight { factor: &'static str, value: f64 },
    #[error("{} reservation quota must be a finite percentage between 0 and 100 (got {value})", .category.label())]
    InvalidQuota {
        category: ReservationCategory,
        value: f64,
    },
    #[error("gender diversity target must be a percentage between 0 and 100 (got {0})")]
    InvalidGenderTarget(f64),
    #[error("student {0} appears more than once")]
    DuplicateStudent(StudentId),
    #[error("internship {0} appears more than once")]
    DuplicateInternship(InternshipId),
}

/// Error returned by [`crate::allocation::allocate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub(crate) fn validate_inputs(
    students: &[Student],
    internships: &[Internship],
) -> Result<(), ValidationError> {
    let mut seen_students = HashSet::new();
    for student in students {
        student.validate()?;
        if !seen_students.insert(&student.id) {
            return Err(ValidationError::DuplicateStudent(student.id.clone()));
        }
    }

    let mut seen_internships = HashSet::new();
    for internship in internships {
        internship.validate()?;
        if !seen_internships.insert(&internship.id) {
            return Err(ValidationError::DuplicateInternship(internship.id.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_serialize_with_government_labels() {
        let encoded = serde_json::to_string(&ReservationCategory::Obc).expect("serialize");
        assert_eq!(encoded, "\"OBC\"");

        let decoded: ReservationCategory = serde_json::from_str("\"EWS\"").expect("deserialize");
        assert_eq!(decoded, ReservationCategory::Ews);
    }

    #[test]
    fn unknown_category_is_rejected_at_deserialization() {
        let result = serde_json::from_str::<ReservationCategory>("\"NRI\"");
        assert!(result.is_err());
    }

    #[test]
    fn course_matching_ignores_case_on_both_sides() {
        let internship = Internship {
            id: InternshipId("int-1".to_string()),
            title: "Data Analyst".to_string(),
            company: "Acme".to_string(),
            department: "data-science".to_string(),
            location: "Delhi".to_string(),
            skills: Vec::new(),
            min_cgpa: 6.0,
            positions: 1,
            work_mode: InternshipWorkMode::Hybrid,
            eligible_courses: vec!["BTech".to_string()],
            eligible_years: vec![3],
        };

        assert!(internship.accepts_course("btech"));
        assert!(internship.accepts_course("BTECH "));
        assert!(!internship.accepts_course("mba"));
    }

    #[test]
    fn wildcard_course_accepts_everything() {
        let internship = Internship {
            id: InternshipId("int-2".to_string()),
            title: "Policy Research".to_string(),
            company: "NITI".to_string(),
            department: "policy".to_string(),
            location: "Delhi".to_string(),
            skills: Vec::new(),
            min_cgpa: 6.0,
            positions: 1,
            work_mode: InternshipWorkMode::Onsite,
            eligible_courses: vec!["All".to_string()],
            eligible_years: vec![2, 3],
        };

        assert!(internship.accepts_course("ba"));
        assert!(internship.accepts_year(2));
        assert!(!internship.accepts_year(4));
    }
}
