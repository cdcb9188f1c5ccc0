//! Column layout of the job-change applicant dataset.

/// Label column
pub const TARGET: &str = "target";

pub const ENROLLEE_ID: &str = "enrollee_id";
pub const CITY: &str = "city";
pub const CITY_DEVELOPMENT_INDEX: &str = "city_development_index";
pub const GENDER: &str = "gender";
pub const RELEVENT_EXPERIENCE: &str = "relevent_experience";
pub const ENROLLED_UNIVERSITY: &str = "enrolled_university";
pub const EDUCATION_LEVEL: &str = "education_level";
pub const MAJOR_DISCIPLINE: &str = "major_discipline";
pub const EXPERIENCE: &str = "experience";
pub const COMPANY_SIZE: &str = "company_size";
pub const COMPANY_TYPE: &str = "company_type";
pub const LAST_NEW_JOB: &str = "last_new_job";
pub const TRAINING_HOURS: &str = "training_hours";

/// Nominal columns expanded into indicator columns
pub const DUMMY_COLUMNS: [&str; 5] = [
    GENDER,
    RELEVENT_EXPERIENCE,
    ENROLLED_UNIVERSITY,
    MAJOR_DISCIPLINE,
    COMPANY_SIZE,
];

/// Columns replaced in place by integer codes
pub const ENCODED_COLUMNS: [&str; 7] = [
    CITY,
    CITY_DEVELOPMENT_INDEX,
    EXPERIENCE,
    COMPANY_TYPE,
    EDUCATION_LEVEL,
    LAST_NEW_JOB,
    TRAINING_HOURS,
];

/// Identifier columns with no predictive value
pub const DROPPED_COLUMNS: [&str; 1] = [ENROLLEE_ID];

/// Every column a raw record table must carry
pub const RAW_COLUMNS: [&str; 14] = [
    ENROLLEE_ID,
    CITY,
    CITY_DEVELOPMENT_INDEX,
    GENDER,
    RELEVENT_EXPERIENCE,
    ENROLLED_UNIVERSITY,
    EDUCATION_LEVEL,
    MAJOR_DISCIPLINE,
    EXPERIENCE,
    COMPANY_SIZE,
    COMPANY_TYPE,
    LAST_NEW_JOB,
    TRAINING_HOURS,
    TARGET,
];
