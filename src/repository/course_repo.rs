//! Course repository (数据库访问层)

use crate::{error::AppError, models::course::*};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct CourseRepository {
    db: PgPool,
}

impl CourseRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出课程，支持按课程代码/名称模糊搜索和按院系过滤
    pub async fn list(
        &self,
        search: Option<&str>,
        department_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Course>, AppError> {
        let pattern = search.map(|s| format!("%{}%", s));

        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT * FROM courses
            WHERE ($1::text IS NULL OR course_code ILIKE $1 OR course_name ILIKE $1)
              AND ($2::uuid IS NULL OR department_id = $2)
            ORDER BY course_code
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(pattern)
        .bind(department_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(courses)
    }

    /// 统计匹配的课程数量
    pub async fn count(
        &self,
        search: Option<&str>,
        department_id: Option<Uuid>,
    ) -> Result<i64, AppError> {
        let pattern = search.map(|s| format!("%{}%", s));

        let count: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) FROM courses
            WHERE ($1::text IS NULL OR course_code ILIKE $1 OR course_name ILIKE $1)
              AND ($2::uuid IS NULL OR department_id = $2)
            "#,
        )
        .bind(pattern)
        .bind(department_id)
        .fetch_one(&self.db)
        .await?
        .get(0);

        Ok(count)
    }

    /// 根据 ID 查找课程
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(course)
    }

    /// 根据课程代码查找（代码全局唯一）
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE course_code = $1")
            .bind(code)
            .fetch_optional(&self.db)
            .await?;

        Ok(course)
    }

    /// 创建课程
    pub async fn create(&self, req: &CreateCourseRequest) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (
                course_code, course_name, category, course_category, course_type,
                credit_scheme, cbcs_category, department_id, maximum_credit,
                qualifying_in_nature
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&req.course_code)
        .bind(&req.course_name)
        .bind(&req.category)
        .bind(&req.course_category)
        .bind(&req.course_type)
        .bind(&req.credit_scheme)
        .bind(&req.cbcs_category)
        .bind(req.department_id)
        .bind(req.maximum_credit)
        .bind(&req.qualifying_in_nature)
        .fetch_one(&self.db)
        .await?;

        Ok(course)
    }

    /// 更新课程（未提供的字段保持不变）
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateCourseRequest,
    ) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET
                course_code = COALESCE($2, course_code),
                course_name = COALESCE($3, course_name),
                category = COALESCE($4, category),
                course_category = COALESCE($5, course_category),
                course_type = COALESCE($6, course_type),
                credit_scheme = COALESCE($7, credit_scheme),
                cbcs_category = COALESCE($8, cbcs_category),
                department_id = COALESCE($9, department_id),
                maximum_credit = COALESCE($10, maximum_credit),
                qualifying_in_nature = COALESCE($11, qualifying_in_nature),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.course_code)
        .bind(&req.course_name)
        .bind(&req.category)
        .bind(&req.course_category)
        .bind(&req.course_type)
        .bind(&req.credit_scheme)
        .bind(&req.cbcs_category)
        .bind(req.department_id)
        .bind(req.maximum_credit)
        .bind(&req.qualifying_in_nature)
        .fetch_optional(&self.db)
        .await?;

        Ok(course)
    }

    /// 删除课程
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
