use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dates::PeriodEcho;

/// Query parameters carrying an optional or required date range
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    /// YYYY-MM-DD or RFC 3339
    #[param(example = "2024-01-01")]
    pub start_date: Option<String>,
    /// YYYY-MM-DD or RFC 3339 (a plain date includes the whole day)
    #[param(example = "2024-01-31")]
    pub end_date: Option<String>,
}

/// Query parameters for the budget comparison
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct MonthYearQuery {
    /// Month, 1-12
    #[validate(required(message = "Month and year are required query parameters"))]
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    #[param(example = 1)]
    pub month: Option<u32>,

    #[validate(required(message = "Month and year are required query parameters"))]
    #[validate(range(min = 1970, max = 9999, message = "Year must be between 1970 and 9999"))]
    #[param(example = 2024)]
    pub year: Option<i32>,
}

/// Sum and count of one (category, type) group
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct SpendingGroup {
    #[schema(example = "Food")]
    pub category: String,
    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub transaction_type: String,
    #[schema(example = 50.00)]
    pub total: Decimal,
    #[schema(example = 2)]
    pub count: i64,
}

/// Sum of one (category, type) group, as used in the financial report
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct CategoryTotal {
    #[schema(example = "Food")]
    pub category: String,
    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub transaction_type: String,
    #[schema(example = 50.00)]
    pub total: Decimal,
}

/// Expense sum of a single category
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CategorySpend {
    pub category: String,
    pub total: Decimal,
}

/// One row of budget vs. actual spending
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BudgetComparison {
    #[schema(example = "Food")]
    pub category: String,
    #[schema(example = 600.00)]
    pub budgeted: Decimal,
    #[schema(example = 450.00)]
    pub actual: Decimal,
    /// budgeted - actual; negative means overspent
    #[schema(example = 150.00)]
    pub difference: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthPeriod {
    #[schema(example = 1)]
    pub month: u32,
    #[schema(example = 2024)]
    pub year: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BudgetComparisonResponse {
    pub period: MonthPeriod,
    pub comparison: Vec<BudgetComparison>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub period: PeriodEcho,
    #[schema(example = 3200.00)]
    pub income: Decimal,
    #[schema(example = 2100.00)]
    pub expenses: Decimal,
    /// income - expenses
    #[schema(example = 1100.00)]
    pub net_savings: Decimal,
    pub category_summary: Vec<CategoryTotal>,
}

impl FinancialReport {
    pub fn new(
        period: PeriodEcho,
        income: Decimal,
        expenses: Decimal,
        category_summary: Vec<CategoryTotal>,
    ) -> Self {
        Self {
            period,
            income,
            expenses,
            net_savings: income - expenses,
            category_summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month_year(month: Option<u32>, year: Option<i32>) -> MonthYearQuery {
        MonthYearQuery { month, year }
    }

    #[test]
    fn test_month_year_validation() {
        assert!(month_year(Some(1), Some(2024)).validate().is_ok());
        assert!(month_year(None, Some(2024)).validate().is_err());
        assert!(month_year(Some(1), None).validate().is_err());
        assert!(month_year(Some(13), Some(2024)).validate().is_err());
        assert!(month_year(Some(0), Some(2024)).validate().is_err());
    }

    #[test]
    fn test_report_net_savings() {
        let report = FinancialReport::new(
            PeriodEcho {
                start_date: "2024-01-01".into(),
                end_date: "2024-01-31".into(),
            },
            Decimal::from(100),
            Decimal::from(50),
            Vec::new(),
        );
        assert_eq!(report.net_savings, Decimal::from(50));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["netSavings"], 50.0);
        assert_eq!(json["period"]["startDate"], "2024-01-01");
    }
}
