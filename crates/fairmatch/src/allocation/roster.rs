//! CSV import for student rosters and internship catalogs exported from the intake portal.
//!
//! Multi-valued columns (skills, locations, courses, years) are `;`-separated.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::domain::{
    Demographics, Gender, Internship, InternshipId, InternshipWorkMode, ReservationCategory,
    Student, StudentId, StudentPreferences, ValidationError, WorkMode,
};

const LIST_SEPARATOR: char = ';';

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Field {
        row: usize,
        column: &'static str,
        message: String,
    },
    Validation(ValidationError),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Field {
                row,
                column,
                message,
            } => write!(f, "row {}, column '{}': {}", row, column, message),
            RosterImportError::Validation(err) => write!(f, "invalid roster entry: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Field { .. } => None,
            RosterImportError::Validation(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<ValidationError> for RosterImportError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

pub struct StudentRosterImporter;

impl StudentRosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Student>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Student>, RosterImportError> {
        let mut students = Vec::new();
        for (index, record) in csv_reader(reader).deserialize::<StudentRow>().enumerate() {
            let student = record?.into_student(index + 2)?;
            student.validate()?;
            students.push(student);
        }
        Ok(students)
    }
}

pub struct InternshipCatalogImporter;

impl InternshipCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Internship>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Internship>, RosterImportError> {
        let mut internships = Vec::new();
        for (index, record) in csv_reader(reader)
            .deserialize::<InternshipRow>()
            .enumerate()
        {
            let internship = record?.into_internship(index + 2)?;
            internship.validate()?;
            internships.push(internship);
        }
        Ok(internships)
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

#[derive(Debug, Deserialize)]
struct StudentRow {
    id: String,
    name: String,
    #[serde(default)]
    email: String,
    cgpa: f64,
    #[serde(default)]
    university: String,
    state: String,
    course: String,
    year: u8,
    #[serde(default, deserialize_with = "split_list")]
    skills: Vec<String>,
    #[serde(default, deserialize_with = "split_list")]
    preferred_locations: Vec<String>,
    #[serde(default, deserialize_with = "split_list")]
    preferred_industries: Vec<String>,
    #[serde(default)]
    work_mode: String,
    category: String,
    gender: String,
    #[serde(default)]
    disability: String,
    applied_at: String,
}

impl StudentRow {
    fn into_student(self, row: usize) -> Result<Student, RosterImportError> {
        let field_error = |column: &'static str, message: String| RosterImportError::Field {
            row,
            column,
            message,
        };

        let category = ReservationCategory::parse(&self.category)
            .ok_or_else(|| field_error("category", format!("unknown category '{}'", self.category)))?;
        let gender = Gender::parse(&self.gender)
            .ok_or_else(|| field_error("gender", format!("unknown gender '{}'", self.gender)))?;
        let work_mode = parse_work_mode(&self.work_mode)
            .ok_or_else(|| field_error("work_mode", format!("unknown work mode '{}'", self.work_mode)))?;
        let disability = parse_flag(&self.disability)
            .ok_or_else(|| field_error("disability", format!("expected yes/no, got '{}'", self.disability)))?;
        let applied_at = parse_timestamp(&self.applied_at).ok_or_else(|| {
            field_error(
                "applied_at",
                format!("expected RFC 3339 or YYYY-MM-DD, got '{}'", self.applied_at),
            )
        })?;

        Ok(Student {
            id: StudentId(self.id),
            name: self.name,
            email: self.email,
            cgpa: self.cgpa,
            university: self.university,
            state: self.state,
            course: self.course,
            year: self.year,
            skills: self.skills,
            preferences: StudentPreferences {
                locations: self.preferred_locations,
                industries: self.preferred_industries,
                work_mode,
            },
            demographics: Demographics {
                category,
                gender,
                disability,
            },
            applied_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct InternshipRow {
    id: String,
    title: String,
    company: String,
    #[serde(default)]
    department: String,
    location: String,
    #[serde(default, deserialize_with = "split_list")]
    skills: Vec<String>,
    min_cgpa: f64,
    positions: u32,
    work_mode: String,
    #[serde(default, deserialize_with = "split_list")]
    eligible_courses: Vec<String>,
    #[serde(default, deserialize_with = "split_list")]
    eligible_years: Vec<String>,
}

impl InternshipRow {
    fn into_internship(self, row: usize) -> Result<Internship, RosterImportError> {
        let work_mode = match parse_work_mode(&self.work_mode) {
            Some(WorkMode::Remote) => InternshipWorkMode::Remote,
            Some(WorkMode::Hybrid) => InternshipWorkMode::Hybrid,
            Some(WorkMode::Onsite) => InternshipWorkMode::Onsite,
            Some(WorkMode::Any) | None => {
                return Err(RosterImportError::Field {
                    row,
                    column: "work_mode",
                    message: format!(
                        "expected remote, hybrid, or onsite, got '{}'",
                        self.work_mode
                    ),
                })
            }
        };

        let eligible_years = self
            .eligible_years
            .iter()
            .map(|year| {
                year.parse::<u8>().map_err(|_| RosterImportError::Field {
                    row,
                    column: "eligible_years",
                    message: format!("'{year}' is not a year of study"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Internship {
            id: InternshipId(self.id),
            title: self.title,
            company: self.company,
            department: self.department,
            location: self.location,
            skills: self.skills,
            min_cgpa: self.min_cgpa,
            positions: self.positions,
            work_mode,
            eligible_courses: self.eligible_courses,
            eligible_years,
        })
    }
}

fn split_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect())
}

fn parse_work_mode(value: &str) -> Option<WorkMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "any" => Some(WorkMode::Any),
        "remote" => Some(WorkMode::Remote),
        "hybrid" => Some(WorkMode::Hybrid),
        "onsite" | "on-site" => Some(WorkMode::Onsite),
        _ => None,
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "no" | "n" | "false" | "0" => Some(false),
        "yes" | "y" | "true" | "1" => Some(true),
        _ => None,
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
