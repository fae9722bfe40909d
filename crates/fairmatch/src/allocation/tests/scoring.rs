use super::common::*;
use crate::allocation::config::{AllocationConfig, DiversityMode};
use crate::allocation::domain::{Gender, ReservationCategory};
use crate::allocation::scoring::{
    cgpa_score, check_eligibility, diversity_score, location_score, region_of, score_pair,
    skill_match, DiversityTally, Eligibility, MatchScorer,
};

#[test]
fn empty_required_skills_always_score_full_marks() {
    let mut opening = internship("int-open");
    opening.skills.clear();

    let mut novice = student("stu-novice");
    novice.skills.clear();
    assert_close(skill_match(&novice, &opening), 100.0);

    let mut expert = student("stu-expert");
    expert.skills = vec!["Rust".to_string(), "Go".to_string()];
    assert_close(skill_match(&expert, &opening), 100.0);
}

#[test]
fn skill_match_uses_bidirectional_case_insensitive_containment() {
    let mut opening = internship("int-ml");
    opening.skills = vec![
        "Machine Learning".to_string(),
        "React".to_string(),
        "SQL".to_string(),
        "Docker".to_string(),
    ];

    let mut applicant = student("stu-ml");
    applicant.skills = vec!["machine".to_string(), "ReactJS".to_string()];

    assert_close(skill_match(&applicant, &opening), 50.0);
}

#[test]
fn cgpa_below_minimum_scores_zero() {
    let mut applicant = student("stu-low");
    applicant.cgpa = 6.0;
    assert_close(cgpa_score(&applicant, &internship("int-1")), 0.0);
}

#[test]
fn cgpa_bonus_is_capped() {
    let mut opening = internship("int-1");
    opening.min_cgpa = 5.0;

    let mut applicant = student("stu-top");
    applicant.cgpa = 9.5;
    // 95 normalized + min(45, 20) bonus, capped at 100.
    assert_close(cgpa_score(&applicant, &opening), 100.0);

    applicant.cgpa = 7.0;
    assert_close(cgpa_score(&applicant, &opening), 90.0);
}

#[test]
fn location_tiers_follow_home_preference_and_region() {
    let mut opening = internship("int-1");
    let mut applicant = student("stu-1");

    assert_close(location_score(&applicant, &opening), 100.0);

    opening.location = "Karnataka".to_string();
    applicant.preferences.locations = vec!["Karnataka".to_string()];
    assert_close(location_score(&applicant, &opening), 80.0);

    applicant.preferences.locations.clear();
    opening.location = "Punjab".to_string();
    assert_close(location_score(&applicant, &opening), 60.0);

    opening.location = "Kerala".to_string();
    assert_close(location_score(&applicant, &opening), 30.0);
}

#[test]
fn states_outside_every_region_never_share_one() {
    assert_eq!(region_of("Assam"), None);

    let mut applicant = student("stu-ne");
    applicant.state = "Assam".to_string();
    let mut opening = internship("int-ne");
    opening.location = "Meghalaya".to_string();

    assert_close(location_score(&applicant, &opening), 30.0);
}

#[test]
fn eligibility_gate_reports_each_failure() {
    let opening = internship("int-1");

    let mut low = student("stu-low");
    low.cgpa = 6.5;
    assert_eq!(
        check_eligibility(&low, &opening),
        Eligibility::BelowMinimumCgpa {
            required: 7.0,
            actual: 6.5
        }
    );

    let mut restricted = internship("int-mba");
    restricted.eligible_courses = vec!["MBA".to_string()];
    let engineer = student("stu-eng");
    assert!(matches!(
        check_eligibility(&engineer, &restricted),
        Eligibility::CourseNotEligible { .. }
    ));

    let mut first_year = student("stu-y1");
    first_year.year = 1;
    assert_eq!(
        check_eligibility(&first_year, &opening),
        Eligibility::YearNotEligible { year: 1 }
    );
}

#[test]
fn ineligible_pairs_have_zero_composite() {
    let config = AllocationConfig::default();
    let scorer = MatchScorer::new(&config);

    let mut applicant = student("stu-low");
    applicant.cgpa = 6.0;
    let opening = internship("int-1");

    assert_close(scorer.composite(&applicant, &opening, None), 0.0);

    let breakdown = score_pair(&applicant, &opening, &config);
    assert!(!breakdown.eligibility.is_eligible());
    assert_close(breakdown.composite, 0.0);
    assert_close(breakdown.skill, 100.0);
}

#[test]
fn home_state_python_match_scores_ninety() {
    let config = AllocationConfig::default();
    let breakdown = score_pair(&student("stu-a"), &internship("int-a"), &config);

    assert_eq!(breakdown.eligibility, Eligibility::Eligible);
    assert_close(breakdown.skill, 100.0);
    assert_close(breakdown.location, 100.0);
    assert_close(breakdown.cgpa, 90.0);
    assert_close(breakdown.diversity, 50.0);
    // (100*40 + 90*25 + 100*20 + 50*15) / 100
    assert_close(breakdown.composite, 90.0);
}

#[test]
fn composite_divides_by_one_hundred_even_when_weights_do_not() {
    let mut config = AllocationConfig::default();
    config.weights.skill = 30.0;
    config.weights.cgpa = 30.0;
    config.weights.location = 0.0;
    config.weights.diversity = 0.0;

    let breakdown = score_pair(&student("stu-a"), &internship("int-a"), &config);
    // (100*30 + 90*30) / 100, not normalized by the 60 weight total.
    assert_close(breakdown.composite, 57.0);
}

#[test]
fn composite_is_rounded_to_two_decimals() {
    let config = AllocationConfig::default();
    let mut opening = internship("int-r");
    opening.skills = vec!["Python".to_string(), "Java".to_string(), "Go".to_string()];

    let breakdown = score_pair(&student("stu-r"), &opening, &config);
    // skill 33.33.. * 40 / 100 = 13.333..; 13.33 + 22.5 + 20 + 7.5
    assert_close(breakdown.composite, 63.33);
}

#[test]
fn first_allocation_receives_base_diversity_score() {
    let config = AllocationConfig::default();
    let applicant = student("stu-1");

    assert_close(diversity_score(&applicant, None, &config), 50.0);
    assert_close(
        diversity_score(&applicant, Some(&DiversityTally::default()), &config),
        50.0,
    );
}

#[test]
fn tallied_diversity_rewards_underrepresented_students() {
    let config = AllocationConfig::default();
    let mut tally = DiversityTally::default();
    tally.record(&student("stu-first"));

    let lookalike = student("stu-same");
    assert_close(diversity_score(&lookalike, Some(&tally), &config), 0.0);

    let newcomer = student_with("stu-new", ReservationCategory::Sc, Gender::Female, "Kerala");
    assert_close(diversity_score(&newcomer, Some(&tally), &config), 65.0);

    let same_state_woman =
        student_with("stu-dl", ReservationCategory::General, Gender::Female, "Delhi");
    assert_close(diversity_score(&same_state_woman, Some(&tally), &config), 20.0);
}

#[test]
fn tallied_diversity_uses_live_shares() {
    let config = AllocationConfig::default();
    let mut tally = DiversityTally::default();
    tally.record(&student_with("a", ReservationCategory::Obc, Gender::Female, "Bihar"));
    tally.record(&student_with("b", ReservationCategory::General, Gender::Male, "Goa"));
    tally.record(&student_with("c", ReservationCategory::General, Gender::Male, "Kerala"));
    tally.record(&student_with("d", ReservationCategory::General, Gender::Male, "Punjab"));
    tally.record(&student_with("e", ReservationCategory::General, Gender::Male, "Odisha"));

    // OBC share 0.2 < 0.27, female share 0.2 < 0.33, Bihar share 0.2 is not below 0.2.
    let candidate = student_with("f", ReservationCategory::Obc, Gender::Female, "Bihar");
    assert_close(diversity_score(&candidate, Some(&tally), &config), 50.0);
}

#[test]
fn legacy_diversity_ignores_prior_demographics() {
    let mut config = AllocationConfig::default();
    config.diversity_mode = DiversityMode::Legacy;

    let mut tally = DiversityTally::default();
    tally.record(&student("stu-first"));

    let lookalike = student("stu-same");
    assert_close(diversity_score(&lookalike, Some(&tally), &config), 65.0);

    config.reservation_quotas.general = 0.0;
    assert_close(diversity_score(&lookalike, Some(&tally), &config), 35.0);
}
