use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use super::generator::MockData;
use crate::errors::AppError;

pub struct SeedService;

impl SeedService {
    /// Insert generated transactions and budgets for `user_id`; all or nothing.
    pub async fn insert_mock_data(
        pool: &PgPool,
        user_id: Uuid,
        data: &MockData,
    ) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;

        let mut transactions: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO transactions \
             (user_id, amount, transaction_type, category, description, transaction_date) ",
        );
        transactions.push_values(&data.transactions, |mut row, t| {
            row.push_bind(user_id)
                .push_bind(t.amount)
                .push_bind(t.transaction_type.as_str())
                .push_bind(t.category)
                .push_bind(&t.description)
                .push_bind(t.date);
        });
        transactions.build().execute(&mut *tx).await?;

        let mut budgets: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO budgets (user_id, category, amount, period) ");
        budgets.push_values(&data.budgets, |mut row, b| {
            row.push_bind(user_id)
                .push_bind(b.category)
                .push_bind(b.amount)
                .push_bind(b.period.as_str());
        });
        budgets.build().execute(&mut *tx).await?;

        tx.commit().await?;

        info!(
            %user_id,
            transactions = data.transactions.len(),
            budgets = data.budgets.len(),
            "Inserted mock data"
        );
        Ok(())
    }
}
