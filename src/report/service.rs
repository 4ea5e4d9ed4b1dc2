use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{
    BudgetComparison, CategorySpend, CategoryTotal, FinancialReport, SpendingGroup,
};
use super::reconcile::reconcile;
use crate::budget::service::BudgetService;
use crate::dates::{DateRange, PeriodEcho};
use crate::errors::AppError;
use crate::transaction::models::TransactionType;

/// Aggregate queries over a user's transactions.
///
/// Every query takes an optional inclusive range; `None` means all time.
/// Sums over zero rows come back as `0`, never `NULL`.
pub struct ReportService;

type Bounds = (Option<DateTime<Utc>>, Option<DateTime<Utc>>);

fn bounds(range: Option<&DateRange>) -> Bounds {
    (range.map(|r| r.start), range.map(|r| r.end))
}

impl ReportService {
    pub async fn total_by_type(
        pool: &PgPool,
        user_id: Uuid,
        transaction_type: TransactionType,
        range: Option<&DateRange>,
    ) -> Result<Decimal, AppError> {
        let (start, end) = bounds(range);
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE user_id = $1
              AND transaction_type = $2
              AND ($3::timestamptz IS NULL OR transaction_date >= $3)
              AND ($4::timestamptz IS NULL OR transaction_date <= $4)
            "#,
        )
        .bind(user_id)
        .bind(transaction_type.as_str())
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;

        Ok(total)
    }

    /// Sum of one category regardless of type.
    pub async fn total_by_category(
        pool: &PgPool,
        user_id: Uuid,
        category: &str,
        range: Option<&DateRange>,
    ) -> Result<Decimal, AppError> {
        let (start, end) = bounds(range);
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE user_id = $1
              AND category = $2
              AND ($3::timestamptz IS NULL OR transaction_date >= $3)
              AND ($4::timestamptz IS NULL OR transaction_date <= $4)
            "#,
        )
        .bind(user_id)
        .bind(category)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;

        Ok(total)
    }

    /// The `n` largest expense categories, ties going to the alphabetically smaller name.
    pub async fn top_expense_categories(
        pool: &PgPool,
        user_id: Uuid,
        n: i64,
        range: Option<&DateRange>,
    ) -> Result<Vec<CategorySpend>, AppError> {
        let (start, end) = bounds(range);
        let rows = sqlx::query_as::<_, CategorySpend>(
            r#"
            SELECT category, COALESCE(SUM(amount), 0) AS total
            FROM transactions
            WHERE user_id = $1
              AND transaction_type = 'expense'
              AND ($2::timestamptz IS NULL OR transaction_date >= $2)
              AND ($3::timestamptz IS NULL OR transaction_date <= $3)
            GROUP BY category
            ORDER BY total DESC, category ASC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .bind(n)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Sum and count per (category, type), largest sum first.
    pub async fn spending_summary(
        pool: &PgPool,
        user_id: Uuid,
        range: Option<&DateRange>,
    ) -> Result<Vec<SpendingGroup>, AppError> {
        let (start, end) = bounds(range);
        let groups = sqlx::query_as::<_, SpendingGroup>(
            r#"
            SELECT category,
                   transaction_type,
                   COALESCE(SUM(amount), 0) AS total,
                   COUNT(*) AS count
            FROM transactions
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR transaction_date >= $2)
              AND ($3::timestamptz IS NULL OR transaction_date <= $3)
            GROUP BY category, transaction_type
            ORDER BY total DESC, category ASC, transaction_type ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(groups)
    }

    /// Budgets of the user against expenses in the given calendar month.
    pub async fn budget_vs_actual(
        pool: &PgPool,
        user_id: Uuid,
        month: &DateRange,
    ) -> Result<Vec<BudgetComparison>, AppError> {
        let budgets = BudgetService::list_budgets(pool, user_id);
        let spend = Self::expense_by_category_alphabetical(pool, user_id, month);

        let (budgets, spend) = futures::try_join!(budgets, spend)?;
        Ok(reconcile(&budgets, &spend))
    }

    async fn expense_by_category_alphabetical(
        pool: &PgPool,
        user_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<CategorySpend>, AppError> {
        let rows = sqlx::query_as::<_, CategorySpend>(
            r#"
            SELECT category, COALESCE(SUM(amount), 0) AS total
            FROM transactions
            WHERE user_id = $1
              AND transaction_type = 'expense'
              AND transaction_date >= $2
              AND transaction_date <= $3
            GROUP BY category
            ORDER BY category ASC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn category_summary(
        pool: &PgPool,
        user_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<CategoryTotal>, AppError> {
        let rows = sqlx::query_as::<_, CategoryTotal>(
            r#"
            SELECT category, transaction_type, COALESCE(SUM(amount), 0) AS total
            FROM transactions
            WHERE user_id = $1
              AND transaction_date >= $2
              AND transaction_date <= $3
            GROUP BY category, transaction_type
            ORDER BY transaction_type ASC, total DESC, category ASC
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Income, expenses and per-category totals for `range`, queried concurrently.
    pub async fn financial_report(
        pool: &PgPool,
        user_id: Uuid,
        range: &DateRange,
        period: PeriodEcho,
    ) -> Result<FinancialReport, AppError> {
        let income = Self::total_by_type(pool, user_id, TransactionType::Income, Some(range));
        let expenses = Self::total_by_type(pool, user_id, TransactionType::Expense, Some(range));
        let summary = Self::category_summary(pool, user_id, range);

        let (income, expenses, summary) = futures::try_join!(income, expenses, summary)?;
        Ok(FinancialReport::new(period, income, expenses, summary))
    }
}
