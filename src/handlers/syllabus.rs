//! 教学大纲的 HTTP 处理器
//! 读取开放匿名访问，写入需要认证；创建时记录上传者

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::syllabus::*,
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
    pub course_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    10
}

/// 教学大纲列表（匿名可读），支持按课程过滤
pub async fn list_syllabi(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.clamp(1, 100);
    let offset = query.offset.max(0);

    let repo = crate::repository::SyllabusRepository::new(state.db.clone());
    let syllabi = repo.list(query.course_id, limit, offset).await?;
    let total = repo.count(query.course_id).await?;

    Ok(Json(json!({
        "syllabi": syllabi,
        "count": total,
        "limit": limit,
        "offset": offset
    })))
}

/// 创建教学大纲
pub async fn create_syllabus(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateSyllabusRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    // 课程外键必须有效
    let course_repo = crate::repository::CourseRepository::new(state.db.clone());
    if course_repo.find_by_id(req.course_id).await?.is_none() {
        return Err(AppError::validation("Unknown course"));
    }

    let repo = crate::repository::SyllabusRepository::new(state.db.clone());
    let syllabus = repo.create(&req, auth_context.user_id).await?;

    tracing::info!(user_id = %auth_context.user_id, syllabus_id = %syllabus.id, "Syllabus created");

    Ok(Json(json!({
        "message": "Syllabus created successfully",
        "syllabus": syllabus
    })))
}

/// 获取教学大纲详情（匿名可读）
pub async fn get_syllabus(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repo = crate::repository::SyllabusRepository::new(state.db.clone());
    let syllabus = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Syllabus not found"))?;

    Ok(Json(syllabus))
}

/// 更新教学大纲
pub async fn update_syllabus(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSyllabusRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = crate::repository::SyllabusRepository::new(state.db.clone());
    let syllabus = repo
        .update(id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Syllabus not found"))?;

    Ok(Json(json!({
        "message": "Syllabus updated successfully",
        "syllabus": syllabus
    })))
}

/// 删除教学大纲
pub async fn delete_syllabus(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repo = crate::repository::SyllabusRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::not_found("Syllabus not found"));
    }

    tracing::info!(user_id = %auth_context.user_id, syllabus_id = %id, "Syllabus deleted");

    Ok(Json(json!({
        "message": "Syllabus deleted successfully"
    })))
}
