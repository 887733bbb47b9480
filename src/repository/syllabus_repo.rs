//! Syllabus repository (数据库访问层)

use crate::{error::AppError, models::syllabus::*};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct SyllabusRepository {
    db: PgPool,
}

impl SyllabusRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出教学大纲，支持按课程过滤
    pub async fn list(
        &self,
        course_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Syllabus>, AppError> {
        let syllabi = sqlx::query_as::<_, Syllabus>(
            r#"
            SELECT * FROM syllabi
            WHERE ($1::uuid IS NULL OR course_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(course_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(syllabi)
    }

    /// 统计匹配的教学大纲数量
    pub async fn count(&self, course_id: Option<Uuid>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query(
            "SELECT COUNT(*) FROM syllabi WHERE ($1::uuid IS NULL OR course_id = $1)",
        )
        .bind(course_id)
        .fetch_one(&self.db)
        .await?
        .get(0);

        Ok(count)
    }

    /// 根据 ID 查找教学大纲
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Syllabus>, AppError> {
        let syllabus = sqlx::query_as::<_, Syllabus>("SELECT * FROM syllabi WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(syllabus)
    }

    /// 创建教学大纲，记录上传者
    pub async fn create(
        &self,
        req: &CreateSyllabusRequest,
        uploaded_by: Uuid,
    ) -> Result<Syllabus, AppError> {
        let syllabus = sqlx::query_as::<_, Syllabus>(
            r#"
            INSERT INTO syllabi (course_id, title, content, uploaded_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(req.course_id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(uploaded_by)
        .fetch_one(&self.db)
        .await?;

        Ok(syllabus)
    }

    /// 更新教学大纲
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateSyllabusRequest,
    ) -> Result<Option<Syllabus>, AppError> {
        let syllabus = sqlx::query_as::<_, Syllabus>(
            r#"
            UPDATE syllabi
            SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.content)
        .fetch_optional(&self.db)
        .await?;

        Ok(syllabus)
    }

    /// 删除教学大纲
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM syllabi WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
