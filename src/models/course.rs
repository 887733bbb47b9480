//! Course domain models
//!
//! Category-style fields are choice-constrained strings; the choice tables
//! below are also served verbatim by the choices endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const CATEGORY_CHOICES: &[(&str, &str)] = &[("CREDITS", "Credits"), ("CBCS", "CBCS")];

pub const COURSE_CATEGORY_CHOICES: &[(&str, &str)] =
    &[("COMPULSORY", "Compulsory"), ("ELECTIVE", "Elective")];

pub const TYPE_CHOICES: &[(&str, &str)] = &[
    ("DISSERTATION", "Dissertation"),
    ("LABORATORY", "Laboratory"),
    ("PRACTICAL", "Practical"),
    ("PROJECT", "Project"),
    ("THEORY", "Theory"),
    ("THEORY AND PRACTICAL", "Theory and Practical"),
    ("TUTORIAL", "Tutorial"),
];

pub const CREDIT_SCHEME_CHOICES: &[(&str, &str)] =
    &[("CREDIT", "Credit"), ("CBCS", "CBCS"), ("NEP", "NEP")];

pub const CBCS_CATEGORY_CHOICES: &[(&str, &str)] = &[
    ("MAJOR", "Major"),
    ("MINOR", "Minor"),
    ("CORE", "Core"),
    ("DSE", "DSE"),
    ("GE", "GE"),
    ("OE", "OE"),
    ("VAC", "VAC"),
    ("AECC", "AECC"),
    ("SEC", "SEC"),
    ("MDC", "MDC"),
    ("IDC", "IDC"),
];

pub const QUALIFYING_CHOICES: &[(&str, &str)] = &[("NO", "No"), ("YES", "Yes")];

/// Course
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub category: String,
    pub course_category: String,
    pub course_type: String,
    pub credit_scheme: String,
    pub cbcs_category: String,
    pub department_id: Uuid,
    pub maximum_credit: i32,
    pub qualifying_in_nature: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create course request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 10))]
    pub course_code: String,
    #[validate(length(min = 1, max = 200))]
    pub course_name: String,
    pub category: String,
    pub course_category: String,
    pub course_type: String,
    pub credit_scheme: String,
    pub cbcs_category: String,
    pub department_id: Uuid,
    #[validate(range(min = 0, max = 20))]
    #[serde(default)]
    pub maximum_credit: i32,
    #[serde(default = "default_qualifying")]
    pub qualifying_in_nature: String,
}

fn default_qualifying() -> String {
    "NO".to_string()
}

/// Update course request (partial)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 10))]
    pub course_code: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub course_name: Option<String>,
    pub category: Option<String>,
    pub course_category: Option<String>,
    pub course_type: Option<String>,
    pub credit_scheme: Option<String>,
    pub cbcs_category: Option<String>,
    pub department_id: Option<Uuid>,
    #[validate(range(min = 0, max = 20))]
    pub maximum_credit: Option<i32>,
    pub qualifying_in_nature: Option<String>,
}
