//! 院系管理的 HTTP 处理器
//! 读取开放匿名访问，写入需要认证

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::{choice_entries, department::*, is_valid_choice},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 院系列表（匿名可读）
pub async fn list_departments(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let repo = crate::repository::DepartmentRepository::new(state.db.clone());
    let departments = repo.list().await?;

    Ok(Json(json!({
        "departments": departments,
        "count": departments.len()
    })))
}

/// 学部选项表（匿名可读）
pub async fn faculty_choices() -> impl IntoResponse {
    Json(choice_entries(FACULTY_CHOICES))
}

/// 创建院系
pub async fn create_department(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateDepartmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    if !is_valid_choice(FACULTY_CHOICES, &req.faculty) {
        return Err(AppError::validation(format!("Invalid faculty: {}", req.faculty)));
    }

    let repo = crate::repository::DepartmentRepository::new(state.db.clone());

    // (name, faculty) 组合唯一
    if repo.exists(&req.name, &req.faculty).await? {
        return Err(AppError::validation(
            "A department with this name already exists in this faculty",
        ));
    }

    let department = repo.create(&req).await?;

    tracing::info!(user_id = %auth_context.user_id, department_id = %department.id, "Department created");

    Ok(Json(json!({
        "message": "Department created successfully",
        "department": department
    })))
}

/// 获取院系详情（匿名可读）
pub async fn get_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repo = crate::repository::DepartmentRepository::new(state.db.clone());
    let department = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Department not found"))?;

    Ok(Json(department))
}

/// 更新院系
pub async fn update_department(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDepartmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    if let Some(faculty) = &req.faculty {
        if !is_valid_choice(FACULTY_CHOICES, faculty) {
            return Err(AppError::validation(format!("Invalid faculty: {}", faculty)));
        }
    }

    let repo = crate::repository::DepartmentRepository::new(state.db.clone());
    let current = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Department not found"))?;

    // 更新后的 (name, faculty) 组合同样必须唯一
    let name = req.name.as_deref().unwrap_or(&current.name);
    let faculty = req.faculty.as_deref().unwrap_or(&current.faculty);
    if (name, faculty) != (current.name.as_str(), current.faculty.as_str())
        && repo.exists(name, faculty).await?
    {
        return Err(AppError::validation(
            "A department with this name already exists in this faculty",
        ));
    }

    let department = repo
        .update(id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Department not found"))?;

    Ok(Json(json!({
        "message": "Department updated successfully",
        "department": department
    })))
}

/// 删除院系
pub async fn delete_department(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repo = crate::repository::DepartmentRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::not_found("Department not found"));
    }

    tracing::info!(user_id = %auth_context.user_id, department_id = %id, "Department deleted");

    Ok(Json(json!({
        "message": "Department deleted successfully"
    })))
}
