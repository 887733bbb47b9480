//! Department repository (数据库访问层)

use crate::{error::AppError, models::department::*};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct DepartmentRepository {
    db: PgPool,
}

impl DepartmentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出所有院系（不分页，数量有限）
    pub async fn list(&self) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>(
            "SELECT * FROM departments ORDER BY faculty, name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(departments)
    }

    /// 根据 ID 查找院系
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Department>, AppError> {
        let department = sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(department)
    }

    /// 检查 (name, faculty) 组合是否已存在
    pub async fn exists(&self, name: &str, faculty: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query(
            "SELECT COUNT(*) FROM departments WHERE name = $1 AND faculty = $2",
        )
        .bind(name)
        .bind(faculty)
        .fetch_one(&self.db)
        .await?
        .get(0);

        Ok(count > 0)
    }

    /// 创建院系
    pub async fn create(&self, req: &CreateDepartmentRequest) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (name, faculty)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.faculty)
        .fetch_one(&self.db)
        .await?;

        Ok(department)
    }

    /// 更新院系
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateDepartmentRequest,
    ) -> Result<Option<Department>, AppError> {
        let department = sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments
            SET
                name = COALESCE($2, name),
                faculty = COALESCE($3, faculty),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.faculty)
        .fetch_optional(&self.db)
        .await?;

        Ok(department)
    }

    /// 删除院系（级联删除其下课程）
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
