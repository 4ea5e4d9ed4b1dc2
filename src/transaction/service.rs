use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Transaction, TransactionDto, TransactionFilters};
use crate::dates::DateRange;
use crate::errors::AppError;

/// Service layer for transaction CRUD.
/// Every statement is scoped by `user_id`, so a foreign id behaves exactly like a missing one.
pub struct TransactionService;

impl TransactionService {
    pub async fn create_transaction(
        pool: &PgPool,
        user_id: Uuid,
        dto: &TransactionDto,
    ) -> Result<Transaction, AppError> {
        let date = dto.date.unwrap_or_else(Utc::now);

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions
                (user_id, amount, transaction_type, category, description, transaction_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, amount, transaction_type, category, description,
                      transaction_date, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(dto.amount)
        .bind(dto.transaction_type.as_str())
        .bind(&dto.category)
        .bind(&dto.description)
        .bind(date)
        .fetch_one(pool)
        .await?;

        Ok(transaction)
    }

    pub async fn get_transaction(
        pool: &PgPool,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Transaction, AppError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, amount, transaction_type, category, description,
                   transaction_date, created_at, updated_at
            FROM transactions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
    }

    /// Replace a transaction's fields. Absent `description`/`date` keep their stored values.
    pub async fn update_transaction(
        pool: &PgPool,
        user_id: Uuid,
        transaction_id: Uuid,
        dto: &TransactionDto,
    ) -> Result<Transaction, AppError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions SET
                amount = $3,
                transaction_type = $4,
                category = $5,
                description = COALESCE($6, description),
                transaction_date = COALESCE($7, transaction_date),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, amount, transaction_type, category, description,
                      transaction_date, created_at, updated_at
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .bind(dto.amount)
        .bind(dto.transaction_type.as_str())
        .bind(&dto.category)
        .bind(&dto.description)
        .bind(dto.date)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
    }

    pub async fn delete_transaction(
        pool: &PgPool,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(transaction_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Transaction not found".to_string()));
        }

        Ok(())
    }

    /// One page of transactions plus the total matching count, fetched concurrently.
    pub async fn list_transactions(
        pool: &PgPool,
        user_id: Uuid,
        filters: &TransactionFilters,
    ) -> Result<(Vec<Transaction>, i64), AppError> {
        let page = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, amount, transaction_type, category, description,
                   transaction_date, created_at, updated_at
            FROM transactions
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR transaction_date >= $2)
              AND ($3::timestamptz IS NULL OR transaction_date <= $3)
              AND ($4::text IS NULL OR category = $4)
            ORDER BY transaction_date DESC, created_at DESC, id DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(user_id)
        .bind(filters.start)
        .bind(filters.end)
        .bind(&filters.category)
        .bind(filters.page.limit)
        .bind(filters.page.offset())
        .fetch_all(pool);

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR transaction_date >= $2)
              AND ($3::timestamptz IS NULL OR transaction_date <= $3)
              AND ($4::text IS NULL OR category = $4)
            "#,
        )
        .bind(user_id)
        .bind(filters.start)
        .bind(filters.end)
        .bind(&filters.category)
        .fetch_one(pool);

        let (transactions, total) = futures::try_join!(page, total)?;
        Ok((transactions, total))
    }

    /// Every transaction inside `range`, newest first.
    pub async fn list_in_range(
        pool: &PgPool,
        user_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<Transaction>, AppError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, amount, transaction_type, category, description,
                   transaction_date, created_at, updated_at
            FROM transactions
            WHERE user_id = $1 AND transaction_date >= $2 AND transaction_date <= $3
            ORDER BY transaction_date DESC, created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

        Ok(transactions)
    }
}
