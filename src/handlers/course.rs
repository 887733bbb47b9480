//! 课程管理的 HTTP 处理器
//! 读取开放匿名访问，写入需要认证

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{choice_entries, course::*, is_valid_choice},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub department_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    10
}

const MAX_PAGE_SIZE: i64 = 100;

/// 校验请求中的所有选项字段，Option 为 None 时跳过
fn validate_choice_fields(
    category: Option<&str>,
    course_category: Option<&str>,
    course_type: Option<&str>,
    credit_scheme: Option<&str>,
    cbcs_category: Option<&str>,
    qualifying_in_nature: Option<&str>,
) -> Result<(), AppError> {
    let checks: [(&str, Option<&str>, &[(&str, &str)]); 6] = [
        ("category", category, CATEGORY_CHOICES),
        ("course_category", course_category, COURSE_CATEGORY_CHOICES),
        ("course_type", course_type, TYPE_CHOICES),
        ("credit_scheme", credit_scheme, CREDIT_SCHEME_CHOICES),
        ("cbcs_category", cbcs_category, CBCS_CATEGORY_CHOICES),
        ("qualifying_in_nature", qualifying_in_nature, QUALIFYING_CHOICES),
    ];

    for (field, value, choices) in checks {
        if let Some(value) = value {
            if !is_valid_choice(choices, value) {
                return Err(AppError::validation(format!(
                    "Invalid {}: {}",
                    field, value
                )));
            }
        }
    }

    Ok(())
}

/// 课程列表（匿名可读），支持 search / department_id / limit / offset
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.max(0);

    let repo = crate::repository::CourseRepository::new(state.db.clone());
    let courses = repo
        .list(query.search.as_deref(), query.department_id, limit, offset)
        .await?;
    let total = repo.count(query.search.as_deref(), query.department_id).await?;

    Ok(Json(json!({
        "courses": courses,
        "count": total,
        "limit": limit,
        "offset": offset
    })))
}

/// 全部选项表（匿名可读）
pub async fn course_choices() -> impl IntoResponse {
    Json(json!({
        "CATEGORY": choice_entries(CATEGORY_CHOICES),
        "COURSE_CATEGORY": choice_entries(COURSE_CATEGORY_CHOICES),
        "TYPE": choice_entries(TYPE_CHOICES),
        "CREDIT_SCHEME": choice_entries(CREDIT_SCHEME_CHOICES),
        "CBCS_CATEGORY": choice_entries(CBCS_CATEGORY_CHOICES),
        "QUALIFYING_IN_NATURE": choice_entries(QUALIFYING_CHOICES),
    }))
}

/// 创建课程
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    validate_choice_fields(
        Some(&req.category),
        Some(&req.course_category),
        Some(&req.course_type),
        Some(&req.credit_scheme),
        Some(&req.cbcs_category),
        Some(&req.qualifying_in_nature),
    )?;

    let repo = crate::repository::CourseRepository::new(state.db.clone());

    // 课程代码全局唯一
    if repo.find_by_code(&req.course_code).await?.is_some() {
        return Err(AppError::validation("A course with this code already exists"));
    }

    // 院系外键必须指向存在的院系
    let department_repo = crate::repository::DepartmentRepository::new(state.db.clone());
    if department_repo.find_by_id(req.department_id).await?.is_none() {
        return Err(AppError::validation("Unknown department"));
    }

    let course = repo.create(&req).await?;

    tracing::info!(user_id = %auth_context.user_id, course_id = %course.id, "Course created");

    Ok(Json(json!({
        "message": "Course created successfully",
        "course": course
    })))
}

/// 获取课程详情（匿名可读）
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repo = crate::repository::CourseRepository::new(state.db.clone());
    let course = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    Ok(Json(course))
}

/// 更新课程
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    validate_choice_fields(
        req.category.as_deref(),
        req.course_category.as_deref(),
        req.course_type.as_deref(),
        req.credit_scheme.as_deref(),
        req.cbcs_category.as_deref(),
        req.qualifying_in_nature.as_deref(),
    )?;

    let repo = crate::repository::CourseRepository::new(state.db.clone());

    // 改码时同样要求课程代码全局唯一
    if let Some(code) = &req.course_code {
        if let Some(existing) = repo.find_by_code(code).await? {
            if existing.id != id {
                return Err(AppError::validation("A course with this code already exists"));
            }
        }
    }

    if let Some(department_id) = req.department_id {
        let department_repo = crate::repository::DepartmentRepository::new(state.db.clone());
        if department_repo.find_by_id(department_id).await?.is_none() {
            return Err(AppError::validation("Unknown department"));
        }
    }

    let course = repo
        .update(id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))?;

    Ok(Json(json!({
        "message": "Course updated successfully",
        "course": course
    })))
}

/// 删除课程
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repo = crate::repository::CourseRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::not_found("Course not found"));
    }

    tracing::info!(user_id = %auth_context.user_id, course_id = %id, "Course deleted");

    Ok(Json(json!({
        "message": "Course deleted successfully"
    })))
}
