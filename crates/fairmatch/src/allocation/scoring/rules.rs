use super::super::domain::{Internship, Student};

const HOME_STATE_SCORE: f64 = 100.0;
const PREFERRED_LOCATION_SCORE: f64 = 80.0;
const SAME_REGION_SCORE: f64 = 60.0;
const DISTANT_LOCATION_SCORE: f64 = 30.0;

const MAX_CGPA_BONUS: f64 = 20.0;

/// Macro-regions used for the proximity tier. States outside every list never share a region.
const REGIONS: [(&str, &[&str]); 4] = [
    (
        "North",
        &["Delhi", "Punjab", "Haryana", "Uttar Pradesh", "Uttarakhand"],
    ),
    (
        "South",
        &[
            "Karnataka",
            "Tamil Nadu",
            "Andhra Pradesh",
            "Telangana",
            "Kerala",
        ],
    ),
    ("West", &["Maharashtra", "Gujarat", "Rajasthan", "Goa"]),
    ("East", &["West Bengal", "Odisha", "Jharkhand", "Bihar"]),
];

/// Share of required skills covered by the student, matched by case-insensitive containment
/// in either direction.
pub(crate) fn skill_match(student: &Student, internship: &Internship) -> f64 {
    if internship.skills.is_empty() {
        return 100.0;
    }

    let student_skills: Vec<String> = student
        .skills
        .iter()
        .map(|skill| skill.to_lowercase())
        .collect();

    let matched = internship
        .skills
        .iter()
        .map(|skill| skill.to_lowercase())
        .filter(|required| {
            student_skills.iter().any(|owned| {
                owned.contains(required.as_str()) || required.contains(owned.as_str())
            })
        })
        .count();

    matched as f64 / internship.skills.len() as f64 * 100.0
}

/// Normalized CGPA plus a capped bonus for clearing the minimum. Zero below the minimum.
pub(crate) fn cgpa_score(student: &Student, internship: &Internship) -> f64 {
    if student.cgpa < internship.min_cgpa {
        return 0.0;
    }

    let normalized = student.cgpa / 10.0 * 100.0;
    let bonus = ((student.cgpa - internship.min_cgpa) * 10.0).min(MAX_CGPA_BONUS);
    (normalized + bonus).min(100.0)
}

pub(crate) fn location_score(student: &Student, internship: &Internship) -> f64 {
    if student.state == internship.location {
        return HOME_STATE_SCORE;
    }

    if student
        .preferences
        .locations
        .iter()
        .any(|location| location == &internship.location)
    {
        return PREFERRED_LOCATION_SCORE;
    }

    if shares_region(&student.state, &internship.location) {
        return SAME_REGION_SCORE;
    }

    DISTANT_LOCATION_SCORE
}

pub(crate) fn region_of(state: &str) -> Option<&'static str> {
    REGIONS
        .iter()
        .find(|(_, states)| states.contains(&state))
        .map(|(region, _)| *region)
}

fn shares_region(left: &str, right: &str) -> bool {
    matches!((region_of(left), region_of(right)), (Some(a), Some(b)) if a == b)
}
