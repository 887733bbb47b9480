//! Department domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Faculty choice table (code, display label)
pub const FACULTY_CHOICES: &[(&str, &str)] = &[
    ("I&C", "Information & Computing"),
    ("E&T", "Engineering & Technology"),
    ("I&R", "Interdisciplinary and Research"),
    ("LS", "Life Sciences"),
    ("LAMS", "Liberal Arts & Media Studies"),
    ("MS", "Management Studies"),
    ("SC", "Sciences"),
    ("CCSD", "CCSD"),
];

/// Department
/// (name, faculty) pairs are unique
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub faculty: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create department request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub faculty: String,
}

/// Update department request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDepartmentRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub faculty: Option<String>,
}
