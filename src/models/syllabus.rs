//! Syllabus domain models
//!
//! Syllabi are stored as text documents attached to a course. The uploader
//! is recorded from the authenticated request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Syllabus document
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Syllabus {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create syllabus request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSyllabusRequest {
    pub course_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub content: String,
}

/// Update syllabus request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSyllabusRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub content: Option<String>,
}
