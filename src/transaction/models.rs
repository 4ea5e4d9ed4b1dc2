use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::dates::{deserialize_optional_date, parse_param, Bound, DateRange};
use crate::errors::AppError;
use crate::pagination::{PageRequest, DEFAULT_LIMIT, DEFAULT_PAGE};

/// Transaction type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received
    Income,
    /// Money spent
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// Database model for transactions
#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub transaction_type: String,
    pub category: String,
    pub description: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transaction information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Signed amount
    #[schema(example = 42.50)]
    pub amount: Decimal,
    /// income or expense
    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub transaction_type: String,
    #[schema(example = "Food")]
    pub category: String,
    #[schema(example = "Weekly groceries")]
    pub description: Option<String>,
    /// When the money moved
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            amount: t.amount,
            transaction_type: t.transaction_type,
            category: t.category,
            description: t.description,
            date: t.transaction_date,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Largest magnitude a `NUMERIC(14,2)` amount column can hold, exclusive.
const AMOUNT_LIMIT: i64 = 1_000_000_000_000;

/// Amounts must fit the `NUMERIC(14,2)` columns exactly: at most two decimal
/// places and a magnitude below 10^12.
pub fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::new("amount_scale")
            .with_message("Amount must have at most 2 decimal places".into()));
    }
    if amount.abs() >= Decimal::from(AMOUNT_LIMIT) {
        return Err(ValidationError::new("amount_range")
            .with_message("Amount must be less than 1000000000000 in magnitude".into()));
    }
    Ok(())
}

/// Request body for creating or replacing a transaction
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransactionDto {
    /// Signed amount, at most two decimal places
    #[validate(custom(function = "validate_amount"))]
    #[schema(example = 42.50)]
    pub amount: Decimal,

    /// income or expense
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Free-text category label
    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    #[schema(example = "Food")]
    pub category: String,

    /// Optional description (may be empty)
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    #[schema(example = "Weekly groceries")]
    pub description: Option<String>,

    /// Date or RFC 3339 timestamp; defaults to now on create
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>, example = "2024-01-15")]
    pub date: Option<DateTime<Utc>>,
}

/// Query parameters for listing transactions
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListQuery {
    /// Earliest date (inclusive), YYYY-MM-DD or RFC 3339
    pub start_date: Option<String>,
    /// Latest date (inclusive), YYYY-MM-DD or RFC 3339
    pub end_date: Option<String>,
    /// Exact category match
    pub category: Option<String>,

    /// Page number, starting at 1
    #[validate(range(min = 1, message = "page must be at least 1"))]
    #[serde(default = "default_page")]
    #[param(example = 1)]
    pub page: i64,

    /// Items per page (1-100)
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    #[serde(default = "default_limit")]
    #[param(example = 10)]
    pub limit: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Validated, parsed form of [`TransactionListQuery`].
#[derive(Debug, Clone)]
pub struct TransactionFilters {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub page: PageRequest,
}

impl TryFrom<&TransactionListQuery> for TransactionFilters {
    type Error = AppError;

    fn try_from(query: &TransactionListQuery) -> Result<Self, Self::Error> {
        query.validate()?;

        // Either bound may be given alone here
        let start = query
            .start_date
            .as_deref()
            .map(|s| parse_param("startDate", s, Bound::Start))
            .transpose()?;
        let end = query
            .end_date
            .as_deref()
            .map(|s| parse_param("endDate", s, Bound::End))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            DateRange::new(start, end)?;
        }

        Ok(Self {
            start,
            end,
            category: query.category.clone().filter(|c| !c.is_empty()),
            page: PageRequest {
                page: query.page,
                limit: query.limit,
            },
        })
    }
}

/// Paginated list response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedTransactionResponse {
    pub transactions: Vec<TransactionResponse>,
    #[schema(example = 1)]
    pub current_page: i64,
    #[schema(example = 20)]
    pub total_pages: i64,
    #[schema(example = 200)]
    pub total_transactions: i64,
}

/// Path parameters for transaction ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionIdPath {
    /// Transaction UUID
    pub id: Uuid,
}

/// Confirmation body for deletes
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Transaction deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
