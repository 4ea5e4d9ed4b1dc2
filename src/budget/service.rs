use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Budget, BudgetDto};
use crate::errors::AppError;

/// Service layer for budget CRUD.
pub struct BudgetService;

impl BudgetService {
    /// All budgets of a user, oldest first.
    pub async fn list_budgets(pool: &PgPool, user_id: Uuid) -> Result<Vec<Budget>, AppError> {
        let budgets = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, category, amount, period, start_date, created_at, updated_at
            FROM budgets
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(budgets)
    }

    pub async fn create_budget(
        pool: &PgPool,
        user_id: Uuid,
        dto: &BudgetDto,
    ) -> Result<Budget, AppError> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (user_id, category, amount, period)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, category, amount, period, start_date, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&dto.category)
        .bind(dto.amount)
        .bind(dto.period.as_str())
        .fetch_one(pool)
        .await?;

        Ok(budget)
    }

    pub async fn update_budget(
        pool: &PgPool,
        user_id: Uuid,
        budget_id: Uuid,
        dto: &BudgetDto,
    ) -> Result<Budget, AppError> {
        sqlx::query_as::<_, Budget>(
            r#"
            UPDATE budgets
            SET category = $3, amount = $4, period = $5, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, category, amount, period, start_date, created_at, updated_at
            "#,
        )
        .bind(budget_id)
        .bind(user_id)
        .bind(&dto.category)
        .bind(dto.amount)
        .bind(dto.period.as_str())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Budget not found".to_string()))
    }

    pub async fn delete_budget(
        pool: &PgPool,
        user_id: Uuid,
        budget_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1 AND user_id = $2")
            .bind(budget_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Budget not found".to_string()));
        }

        Ok(())
    }
}
