use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::transaction::models::validate_amount;

/// Recurrence unit a budget amount applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        }
    }
}

/// Database entity for budgets
#[derive(Debug, Clone, FromRow)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub amount: Decimal,
    pub period: String,
    pub start_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Food")]
    pub category: String,
    /// Spending limit for the period
    #[schema(example = 600.00)]
    pub amount: Decimal,
    #[schema(example = "monthly")]
    pub period: String,
    pub start_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Budget> for BudgetResponse {
    fn from(budget: Budget) -> Self {
        Self {
            id: budget.id,
            user_id: budget.user_id,
            category: budget.category,
            amount: budget.amount,
            period: budget.period,
            start_date: budget.start_date,
            created_at: budget.created_at,
            updated_at: budget.updated_at,
        }
    }
}

/// Request body for creating or replacing a budget
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BudgetDto {
    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    #[schema(example = "Food")]
    pub category: String,

    #[validate(custom(function = "validate_amount"))]
    #[schema(example = 600.00)]
    pub amount: Decimal,

    /// Defaults to monthly
    #[serde(default)]
    pub period: BudgetPeriod,
}

/// Path parameters for budget ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct BudgetIdPath {
    /// Budget UUID
    pub id: Uuid,
}
