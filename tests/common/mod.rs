//! Shared fixtures for integration tests

#![allow(dead_code)]

use polars::prelude::*;

fn cycle<'a>(values: &[&'a str], n: usize, offset: usize) -> Vec<&'a str> {
    (0..n).map(|i| values[(i + offset) % values.len()]).collect()
}

/// Raw applicant records with every column of the dataset.
///
/// `target` holds `n - positives` zeros followed by `positives` ones.
pub fn raw_applicants(n: usize, positives: usize) -> DataFrame {
    let enrollee_id: Vec<i64> = (0..n).map(|i| 1000 + i as i64).collect();
    let city_development_index: Vec<f64> = (0..n)
        .map(|i| [0.92, 0.624, 0.776, 0.767, 0.91][i % 5])
        .collect();
    let gender: Vec<&str> = (0..n).map(|i| if i % 2 == 0 { "Male" } else { "Female" }).collect();
    let relevent_experience: Vec<&str> = (0..n)
        .map(|i| {
            if i % 3 == 0 {
                "No relevent experience"
            } else {
                "Has relevent experience"
            }
        })
        .collect();
    let training_hours: Vec<i64> = (0..n).map(|i| ((i * 13) % 50 + 4) as i64).collect();
    let target: Vec<f64> = (0..n).map(|i| if i < n - positives { 0.0 } else { 1.0 }).collect();

    df!(
        "enrollee_id" => &enrollee_id,
        "city" => &cycle(&["city_103", "city_21", "city_16", "city_114"], n, 0),
        "city_development_index" => &city_development_index,
        "gender" => &gender,
        "relevent_experience" => &relevent_experience,
        "enrolled_university" => &cycle(&["no_enrollment", "Full time course", "Part time course"], n, 1),
        "education_level" => &cycle(&["Graduate", "Masters", "High School", "Phd"], n, 0),
        "major_discipline" => &cycle(&["STEM", "Humanities", "Business Degree"], n, 2),
        "experience" => &cycle(&[">20", "15", "5", "<1", "10"], n, 3),
        "company_size" => &cycle(&["50-99", "<10", "10000+", "100-500"], n, 1),
        "company_type" => &cycle(&["Pvt Ltd", "Funded Startup", "Public Sector"], n, 0),
        "last_new_job" => &cycle(&["1", "never", ">4", "2"], n, 2),
        "training_hours" => &training_hours,
        "target" => &target,
    )
    .unwrap()
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns().iter().map(|c| c.name().to_string()).collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobchange_prep=warn".into()),
        )
        .with_test_writer()
        .try_init();
}
